//! Browser adapters for the core seams.

pub mod api;
pub mod dom;
