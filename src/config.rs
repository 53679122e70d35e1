//! Configuration utilities.

use anyhow::{bail, Context};
use clap::builder;
use clap::error::ErrorKind;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default public endpoint of the directions API.
fn default_server() -> String {
    "https://api.openrouteservice.org".to_owned()
}

/// Description of the OpenRouteService endpoint to query routes from. See
/// <https://openrouteservice.org/dev/#/signup> to obtain an API key.
#[derive(Clone, Debug, Deserialize)]
pub struct OrsConfig {
    /// Address of the directions server, without a trailing slash.
    #[serde(default = "default_server")]
    pub server: String,
    /// API key, attached to each request in the Authorization header.
    pub api_key: String,
}

impl OrsConfig {
    /// Reads an OpenRouteService configuration from the given JSON file.
    fn read_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| {
            format!(
                "Failed to read OpenRouteService configuration from: {}",
                path.display()
            )
        })?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader).with_context(|| {
            format!(
                "Failed to parse OpenRouteService configuration from: {}",
                path.display()
            )
        })?;

        if config.api_key.is_empty() {
            bail!("Expected a non-empty api_key");
        }

        Ok(config)
    }
}

/// Helper struct to parse an [`OrsConfig`] directly from a Clap argument.
#[derive(Clone)]
pub struct OrsConfigParser;

impl builder::TypedValueParser for OrsConfigParser {
    type Value = OrsConfig;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        OrsConfig::read_from_file(value).map_err(|e| {
            let arg_str = arg.map(|a| a.to_string());
            let msg = format!(
                "Failed to parse OpenRouteService configuration{}{}: {}\n",
                arg_str.map(|a| format!(" ({})", a)).unwrap_or_default(),
                value
                    .to_str()
                    .map(|f| format!(" from file `{}`", f))
                    .unwrap_or_default(),
                e
            );
            clap::Error::raw(ErrorKind::Io, msg).with_cmd(cmd)
        })
    }
}

impl builder::ValueParserFactory for OrsConfig {
    type Parser = OrsConfigParser;

    fn value_parser() -> Self::Parser {
        OrsConfigParser
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_config_with_default_server() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ors.json");
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{"api_key": "abc123"}}"#).unwrap();

        let config = OrsConfig::read_from_file(&path).unwrap();
        assert_eq!(config.server, "https://api.openrouteservice.org");
        assert_eq!(config.api_key, "abc123");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ors.json");
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{"api_key": ""}}"#).unwrap();

        assert!(OrsConfig::read_from_file(&path).is_err());
    }
}
