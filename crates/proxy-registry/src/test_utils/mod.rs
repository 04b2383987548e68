//! Test utilities for the proxy registry.

mod logging;
mod value_store;

pub use logging::*;
pub use value_store::*;
