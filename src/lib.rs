#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

//! Constrained random-walk trail generator.
//!
//! [`simulation::TrailAgent`] lays a self-avoiding, non-reversing trail on a
//! square grid one step at a time; [`export`] renders the finished trail as
//! coordinate lines and [`ui`] draws it in a terminal.

pub mod export;
pub mod simulation;
pub mod ui;
