use super::Tool;
use locale_catalog_toml::ToolOverrides;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

const HOMEBREW: &str = "brew";
const GETTEXT_FORMULA: &str = "gettext";

#[derive(Debug, Error)]
pub enum ToolResolveError {
    /// The executable is nowhere to be found.
    #[error("{tool} not found in {searched}")]
    NotFound { tool: Tool, searched: String },
    /// The package manager exists but lacks the package providing the tools.
    #[error("{manager} is installed but package '{package}' is not")]
    PackageNotInstalled {
        manager: &'static str,
        package: &'static str,
    },
    /// The package manager could not be run.
    #[error(transparent)]
    PackageManager(#[from] std::io::Error),
}

/// Strategy for turning a [`Tool`] into an executable path.
pub trait ToolResolver {
    /// Short description used in logs and error messages.
    fn describe(&self) -> &'static str;

    fn resolve(&self, tool: Tool) -> Result<PathBuf, ToolResolveError>;
}

/// Looks tools up on the executable search path.
#[derive(Clone, Debug)]
pub struct PathResolver {
    search_path: Option<OsString>,
}

impl PathResolver {
    /// Uses the `PATH` of the current process.
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn lookup(&self, name: &str) -> Option<PathBuf> {
        which::which_in(name, self.search_path.as_ref(), ".").ok()
    }
}

impl ToolResolver for PathResolver {
    fn describe(&self) -> &'static str {
        "PATH"
    }

    fn resolve(&self, tool: Tool) -> Result<PathBuf, ToolResolveError> {
        self.lookup(tool.name()).ok_or_else(|| ToolResolveError::NotFound {
            tool,
            searched: self.describe().to_string(),
        })
    }
}

/// Uses the gettext keg installed by Homebrew.
///
/// Homebrew does not link gettext into `PATH` on macOS, so the tools live
/// under `$(brew --prefix gettext)/bin`.
#[derive(Clone, Debug)]
pub struct HomebrewResolver {
    bin_dir: PathBuf,
}

impl HomebrewResolver {
    pub fn new(prefix: impl AsRef<Path>) -> Self {
        Self {
            bin_dir: prefix.as_ref().join("bin"),
        }
    }

    /// Ask `brew` where gettext is installed.
    pub fn detect(brew: &Path) -> Result<Self, ToolResolveError> {
        let output = Command::new(brew)
            .args(["--prefix", "--installed", GETTEXT_FORMULA])
            .output()?;

        let prefix = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || prefix.is_empty() {
            return Err(ToolResolveError::PackageNotInstalled {
                manager: HOMEBREW,
                package: GETTEXT_FORMULA,
            });
        }

        tracing::debug!(%prefix, "using Homebrew gettext");
        Ok(Self::new(prefix))
    }
}

impl ToolResolver for HomebrewResolver {
    fn describe(&self) -> &'static str {
        "Homebrew gettext"
    }

    fn resolve(&self, tool: Tool) -> Result<PathBuf, ToolResolveError> {
        let path = self.bin_dir.join(tool.name());
        if path.is_file() {
            Ok(path)
        } else {
            Err(ToolResolveError::NotFound {
                tool,
                searched: self.bin_dir.display().to_string(),
            })
        }
    }
}

/// Applies explicit paths from `catalog.toml` before asking another resolver.
pub struct OverrideResolver {
    overrides: ToolOverrides,
    search: PathResolver,
    fallback: Box<dyn ToolResolver>,
}

impl OverrideResolver {
    pub fn new(
        overrides: ToolOverrides,
        search: PathResolver,
        fallback: Box<dyn ToolResolver>,
    ) -> Self {
        Self {
            overrides,
            search,
            fallback,
        }
    }
}

impl ToolResolver for OverrideResolver {
    fn describe(&self) -> &'static str {
        self.fallback.describe()
    }

    fn resolve(&self, tool: Tool) -> Result<PathBuf, ToolResolveError> {
        let Some(configured) = self.overrides.get(tool.name()) else {
            return self.fallback.resolve(tool);
        };

        let found = if configured.components().count() == 1 && configured.is_relative() {
            configured.to_str().and_then(|name| self.search.lookup(name))
        } else {
            configured.is_file().then(|| configured.to_path_buf())
        };

        found.ok_or_else(|| ToolResolveError::NotFound {
            tool,
            searched: format!("catalog.toml ({})", configured.display()),
        })
    }
}

/// Pick the resolver for this platform.
///
/// On macOS a `brew` on the search path means the Homebrew keg is used;
/// everywhere else tools come straight from the search path. Homebrew is
/// not consulted when `catalog.toml` names every tool.
pub fn select_resolver(
    overrides: ToolOverrides,
    search: PathResolver,
) -> Result<Box<dyn ToolResolver>, ToolResolveError> {
    let fully_overridden = Tool::ALL
        .iter()
        .all(|tool| overrides.get(tool.name()).is_some());

    let base: Box<dyn ToolResolver> = match search.lookup(HOMEBREW) {
        Some(brew) if cfg!(target_os = "macos") && !fully_overridden => {
            Box::new(HomebrewResolver::detect(&brew)?)
        },
        _ => Box::new(search.clone()),
    };

    if overrides == ToolOverrides::default() {
        Ok(base)
    } else {
        Ok(Box::new(OverrideResolver::new(overrides, search, base)))
    }
}
