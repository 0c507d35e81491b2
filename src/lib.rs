//! Catalog application library: resource modules and validation helpers.

pub mod modules;
pub mod utils;
