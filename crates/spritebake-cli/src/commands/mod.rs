//! CLI command implementations.

pub mod bake;
