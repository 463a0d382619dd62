// File: src/config.rs
// Purpose: Navigator configuration parsing from rhtmx.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::fragment::CRAWLABLE_MARKER;
use crate::resource::LinkOptions;

/// What the navigator reports for an unknown page key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
    /// Report the home page as the fallback
    #[default]
    Home,
    /// Report no fallback
    Reject,
}

/// Navigator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// URI key of the page served for an empty fragment (case-insensitive)
    #[serde(default)]
    pub home_page: Option<String>,

    /// Marker put before the page key of crawlable pages (default: "!")
    #[serde(default = "default_crawlable_marker")]
    pub crawlable_marker: String,

    /// Register page lists all-or-nothing (default: false)
    #[serde(default = "default_false")]
    pub atomic_batch_registration: bool,

    /// Links use the CamelCase display name instead of the URI key
    #[serde(default = "default_false")]
    pub display_name_links: bool,

    #[serde(default)]
    pub not_found: NotFoundPolicy,
}

/// Layout of the config file: settings live under `[navigator]`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    navigator: NavigatorConfig,
}

fn default_crawlable_marker() -> String {
    CRAWLABLE_MARKER.to_string()
}

fn default_false() -> bool {
    false
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            home_page: None,
            crawlable_marker: default_crawlable_marker(),
            atomic_batch_registration: false,
            display_name_links: false,
            not_found: NotFoundPolicy::default(),
        }
    }
}

impl NavigatorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }

    /// Parse configuration from TOML text; empty text means defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = toml::from_str(content).context("Invalid navigator configuration")?;
        Ok(file.navigator)
    }

    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            crawlable_marker: self.crawlable_marker.clone(),
            display_name_links: self.display_name_links,
        }
    }
}
