#![deny(missing_docs)]

//! # Plugin Command
//!
//! Runs the merge with its inputs delivered by a host generator: a JSON payload on
//! stdin carrying the service description, the project directory and the naming style.

use crate::error::{CliError, CliResult};
use apimerge_core::merge::MergeConfig;
use apimerge_core::naming::DEFAULT_STYLE;
use apimerge_core::{DiskStore, MergeEngine, RunReport, ServiceDescription};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// Arguments for the plugin command.
#[derive(clap::Args, Debug, Clone)]
pub struct PluginArgs {
    /// Directory holding template overrides (`<home>/api/handlers.tpl`).
    #[clap(long, env = "APIMERGE_TEMPLATE_HOME")]
    pub home: Option<PathBuf>,
}

/// Payload written by the host generator.
#[derive(Debug, Deserialize)]
pub struct PluginPayload {
    /// The service description.
    pub api: ServiceDescription,
    /// Project working directory.
    pub dir: PathBuf,
    /// File naming style.
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

impl PluginPayload {
    /// Decodes a payload from `reader`.
    pub fn from_reader(mut reader: impl Read) -> CliResult<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        serde_json::from_str(&text).map_err(|e| CliError::Payload(e.to_string()))
    }
}

/// Executes the merge described by the payload on `input`, calling `notice` for every merged handler.
pub fn execute(args: &PluginArgs, input: impl Read, notice: impl Fn(&str)) -> CliResult<RunReport> {
    let payload = PluginPayload::from_reader(input)?;
    let config = MergeConfig {
        dir: payload.dir,
        style: payload.style,
        template_home: args.home.clone(),
    };

    log::info!("plugin merge into {:?}", config.dir);
    let engine = MergeEngine::new(&DiskStore, &config)?.on_merge(notice);
    Ok(engine.run(&payload.api)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_plugin_payload_drives_merge() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"shop\"\n").unwrap();

        let payload = serde_json::json!({
            "api": {"service": {"groups": [{"routes": [{
                "path": "/ping",
                "annotations": {"server": {"handler": "ping"}}
            }]}]}},
            "dir": dir.path(),
            "style": "gozero"
        });

        let seen = std::cell::RefCell::new(Vec::new());
        let report = execute(&PluginArgs { home: None }, payload.to_string().as_bytes(), |name| {
            seen.borrow_mut().push(name.to_string())
        })
        .unwrap();
        assert_eq!(report.merged_handlers().collect::<Vec<_>>(), vec!["ping_handler"]);
        assert_eq!(seen.into_inner(), vec!["ping_handler"]);
        assert!(dir.path().join("src/handler/handlers.rs").exists());
    }

    #[test]
    fn test_malformed_payload() {
        let err = PluginPayload::from_reader("{\"api\":".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Payload(_)));
    }

    #[test]
    fn test_style_defaults_when_absent() {
        let payload = PluginPayload::from_reader(r#"{"api": {}, "dir": "."}"#.as_bytes()).unwrap();
        assert_eq!(payload.style, DEFAULT_STYLE);
        assert!(payload.api.service.groups.is_empty());
    }
}
