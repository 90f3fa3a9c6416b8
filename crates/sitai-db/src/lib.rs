//! sitai-db: persistence layer for excavation points.
//!
//! SQLite storage behind an r2d2 pool, the idempotent table definition,
//! row models, the `points` query module, and [`PointStore`], the handle
//! the rest of the application talks to.

pub mod models;
pub mod pool;
pub mod queries;
pub mod schema;
pub mod store;

pub use models::{PointRecord, SearchField};
pub use store::PointStore;
