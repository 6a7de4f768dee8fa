//! Test fixtures for tabweave crates.
//!
//! Provides a fluent builder for populated simulated windows plus a
//! seeded in-memory store, so integration tests read as a description of
//! the window they start from.

mod fixtures;
mod world;

pub use fixtures::{mixed_window, research_window};
pub use world::{World, WorldBuilder};
