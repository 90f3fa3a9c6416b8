//! Database query modules.
//!
//! Every function takes a plain `&rusqlite::Connection`, so callers can run
//! them on a pooled connection or inside a transaction.

pub mod points;
