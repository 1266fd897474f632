//! Command implementations

pub mod api;
pub mod profile;
pub mod resources;
