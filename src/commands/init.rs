use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and its `config.json`, plus an empty SQLite database when the
/// SQLite store is chosen.
///
/// # Errors
/// - Returns an error if the directory already holds a config file or any file operation fails.
pub async fn init(rewards_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(rewards_home, args.store(), args.bind())
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Created the rewards directory at {} using the {} store",
        config.root().display(),
        config.store()
    )
    .into())
}
