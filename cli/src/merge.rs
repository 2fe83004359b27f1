#![deny(missing_docs)]

//! # Merge Command
//!
//! Merges missing handlers described by a service description file into the project tree.

use crate::error::CliResult;
use apimerge_core::merge::MergeConfig;
use apimerge_core::naming::DEFAULT_STYLE;
use apimerge_core::{AppError, DiskStore, MergeEngine, RunReport, ServiceDescription};
use std::path::PathBuf;

/// Arguments for the merge command.
#[derive(clap::Args, Debug, Clone)]
pub struct MergeArgs {
    /// Path to the service description (`.json`, otherwise YAML).
    #[clap(long, env = "APIMERGE_API")]
    pub api: PathBuf,

    /// Project working directory.
    #[clap(long, env = "APIMERGE_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// File naming style (gozero, go_zero, go-zero, goZero, GoZero).
    #[clap(long, env = "APIMERGE_STYLE", default_value = DEFAULT_STYLE)]
    pub style: String,

    /// Directory holding template overrides (`<home>/api/handlers.tpl`).
    #[clap(long, env = "APIMERGE_TEMPLATE_HOME")]
    pub home: Option<PathBuf>,
}

/// Executes the merge, calling `notice` for every handler as it is merged.
pub fn execute(args: &MergeArgs, notice: impl Fn(&str)) -> CliResult<RunReport> {
    if !args.api.exists() {
        return Err(AppError::Description(format!(
            "Service description not found: {:?}",
            args.api
        ))
        .into());
    }

    let description = ServiceDescription::load(&args.api)?;
    let config = MergeConfig {
        dir: args.dir.clone(),
        style: args.style.clone(),
        template_home: args.home.clone(),
    };

    log::info!("merging handlers from {:?} into {:?}", args.api, args.dir);
    let engine = MergeEngine::new(&DiskStore, &config)?.on_merge(notice);
    Ok(engine.run(&description)?)
}
