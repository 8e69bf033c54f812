pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
pub mod engine;
mod error;
pub mod format;
pub mod model;
pub mod reconciler;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{error_type, Error, ErrorType, IntoResult, Result};
