//! Sitai - catalog of archaeological excavation points
//!
//! This library crate exposes the command-line front end's building blocks
//! (configuration, input forms, text rendering) for integration testing.

pub mod config;
pub mod display;
pub mod form;
