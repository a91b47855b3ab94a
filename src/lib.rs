//! Card name → Standard rotation year.
//!
//! Reads a wide card dump, resolves each printing's expansion code to the
//! year that expansion rotates out, and keeps the latest year per card name.

pub mod config;
pub mod expansions;
pub mod fetch;
pub mod lookup;
pub mod process;
