//! Command implementations

pub mod check;
pub mod generate;

use crate::cli::SourceArgs;
use anyhow::{Context, Result};
use blockgen_build::{Options, introspect::SourceTree};
use blockgen_config::Config;
use std::path::Path;

/// Layer config file, environment and flags into pass options.
pub fn options(args: &SourceArgs) -> Result<Options> {
    let config = match &args.config {
        Some(path) => Config::load(path)?.with_env(),
        None => Config::discover(Path::new("."))?,
    };

    resolve(config, args)
}

fn resolve(config: Config, args: &SourceArgs) -> Result<Options> {
    let config = config.merge(Config {
        base_package: args.base_package.clone(),
        module_name: args.module_name.clone(),
        runtime_crate: args.runtime_crate.clone(),
        platform_support: args.platform_support.clone(),
    });

    Options::try_from(config).context("incomplete configuration")
}

pub fn source(args: &SourceArgs) -> Result<SourceTree> {
    SourceTree::scan(&args.src)
        .with_context(|| format!("failed to read sources under {}", args.src.display()))
}

///
/// TESTS
///
