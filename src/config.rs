//! `polystruct.toml`: markers, naming conventions and emission switches.
//!
//! Every key is optional; an absent file means defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::GenError;
use crate::span::Span;

pub const CONFIG_FILE: &str = "polystruct.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub markers: Markers,
    pub naming: Naming,
    pub emit: EmitOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    /// Attribute that asks for a sum type to be generated for a trait.
    pub sum_type: String,
    /// Attribute that selects the forwarding field of a host type.
    pub delegate: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            sum_type: "polystruct".to_string(),
            delegate: "delegate".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Naming {
    pub strip_prefix: String,
    pub fallback_prefix: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            strip_prefix: "I".to_string(),
            fallback_prefix: "Any".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitOptions {
    /// Derives placed on the generated enum; every variant must support them.
    pub derives: Vec<String>,
    /// Emit `unwrapped()` / `unwrapped_mut()` (needs a dyn-compatible trait).
    pub unwrapped: bool,
    pub size_information: bool,
    /// Leading `// @generated` comment.
    pub header: bool,
    /// Generate independent artifacts on the rayon pool.
    pub parallel: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            derives: Vec::new(),
            unwrapped: true,
            size_information: true,
            header: true,
            parallel: true,
        }
    }
}

impl Config {
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, GenError> {
        toml::from_str(source).map_err(|e| {
            let span = e.span().map(|r| Span::new(r.start, r.end));
            GenError::config(e.message().to_string(), path.to_path_buf(), span)
        })
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| GenError::config(format!("failed to read config: {e}"), path.to_path_buf(), None))?;
        Self::from_toml(&source, path)
    }

    /// `polystruct.toml` in `dir`, if present.
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }
}
