//! Terminal rendering of a trail in progress.

pub mod field;
pub mod render;
