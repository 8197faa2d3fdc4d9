//! Decoding of input documents into the tree type queries run against.
//!
//! Every format is decoded into a [`serde_json::Value`]; formats other than
//! JSON need their cargo feature.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;
use std::path::Path;

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// JSON
    #[default]
    Json,
    /// YAML
    Yaml,
    /// TOML
    Toml,
    /// CBOR
    Cbor,
    /// MessagePack
    Msgpack,
}

impl Format {
    /// Guesses the format from a file extension, defaulting to JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            Some("cbor") => Self::Cbor,
            Some("msgpack" | "mp") => Self::Msgpack,
            _ => Self::Json,
        }
    }
}

/// Decodes `bytes` in the given format.
///
/// # Errors
///
/// Returns an error if the input is not a valid document of that format, or
/// if the format's feature is disabled.
pub fn parse_document(bytes: &[u8], format: Format) -> Result<Value> {
    log::debug!("decoding {} byte(s) as {format:?}", bytes.len());
    let value = match format {
        Format::Json => {
            serde_json::from_slice(bytes).context("Failed to parse JSON")?
        }
        #[cfg(feature = "yaml")]
        Format::Yaml => {
            serde_yaml::from_slice(bytes).context("Failed to parse YAML")?
        }
        #[cfg(feature = "toml")]
        Format::Toml => {
            let text = std::str::from_utf8(bytes).context("TOML input is not UTF-8")?;
            toml::from_str(text).context("Failed to parse TOML")?
        }
        #[cfg(feature = "cbor")]
        Format::Cbor => {
            ciborium::from_reader(bytes).context("Failed to parse CBOR")?
        }
        #[cfg(feature = "msgpack")]
        Format::Msgpack => {
            rmp_serde::from_slice(bytes).context("Failed to parse MessagePack")?
        }
        #[cfg(not(feature = "yaml"))]
        Format::Yaml => bail_disabled("yaml")?,
        #[cfg(not(feature = "toml"))]
        Format::Toml => bail_disabled("toml")?,
        #[cfg(not(feature = "cbor"))]
        Format::Cbor => bail_disabled("cbor")?,
        #[cfg(not(feature = "msgpack"))]
        Format::Msgpack => bail_disabled("msgpack")?,
    };
    Ok(value)
}

/// Error for a format whose cargo feature is not enabled.
#[allow(dead_code)]
fn bail_disabled(feature: &str) -> Result<Value> {
    anyhow::bail!("support for this format requires the `{feature}` feature")
}
