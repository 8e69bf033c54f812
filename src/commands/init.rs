use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` file with default settings.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/gofinances`
///
/// # Errors
/// - Returns an error if the directory already holds a config file or if any file operation
///   fails.
pub async fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the data directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the gofinances directory and config at {}",
        config.root().display()
    )
    .into())
}
