//! HTTP handlers for entity requests.

pub mod entity;
pub use entity::*;
