#![doc = include_str!("../README.md")]

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "catalog.toml";

#[derive(Debug, Error)]
pub enum CatalogConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Explicit executable locations for the gettext utilities.
///
/// A bare name (`msgfmt`) is left for the caller to look up on `PATH`; any
/// other relative path is resolved against the configuration directory.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToolOverrides {
    #[serde(default)]
    pub msginit: Option<PathBuf>,
    #[serde(default)]
    pub msgmerge: Option<PathBuf>,
    #[serde(default)]
    pub msgfmt: Option<PathBuf>,
    #[serde(default)]
    pub xgettext: Option<PathBuf>,
}

impl ToolOverrides {
    /// Returns the override for a tool by its executable name.
    pub fn get(&self, name: &str) -> Option<&Path> {
        match name {
            "msginit" => self.msginit.as_deref(),
            "msgmerge" => self.msgmerge.as_deref(),
            "msgfmt" => self.msgfmt.as_deref(),
            "xgettext" => self.xgettext.as_deref(),
            _ => None,
        }
    }

    fn resolve_against(&mut self, base: &Path) {
        for slot in [
            &mut self.msginit,
            &mut self.msgmerge,
            &mut self.msgfmt,
            &mut self.xgettext,
        ] {
            if let Some(path) = slot.as_mut()
                && path.is_relative()
                && !is_bare_name(path)
            {
                *path = base.join(&*path);
            }
        }
    }
}

/// The configuration for `locale-catalog`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Project name, shown in the run header.
    #[serde(default)]
    pub project: Option<String>,
    /// Directory holding the module source trees.
    #[serde(default)]
    pub project_dir: Option<PathBuf>,
    /// Explicit tool locations.
    #[serde(default)]
    pub tools: ToolOverrides,
}

impl CatalogConfig {
    /// Reads the configuration from a path.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CatalogConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut config: CatalogConfig = toml::from_str(&content)?;

        let base = path.parent().unwrap_or(Path::new("."));
        config.resolve_against(base);

        Ok(config)
    }

    /// Reads `catalog.toml` from `dir` if it exists.
    pub fn discover_in(dir: &Path) -> Result<Option<Self>, CatalogConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read_from_path(path).map(Some)
    }

    fn resolve_against(&mut self, base: &Path) {
        if let Some(dir) = self.project_dir.as_mut()
            && dir.is_relative()
        {
            *dir = base.join(&*dir);
        }
        self.tools.resolve_against(base);
    }
}

fn is_bare_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
