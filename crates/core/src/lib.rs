//! Core business logic for voteboard.

pub mod services;

pub use services::*;
