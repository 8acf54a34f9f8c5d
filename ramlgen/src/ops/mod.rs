//! Core operations.
//!
//! This module contains the business logic for ramlgen commands,
//! separated from CLI argument parsing and output rendering.

pub mod generate;

pub use generate::generate;
