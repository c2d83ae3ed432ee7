//! Location of the gettext executables.
//!
//! A [`Toolchain`] is resolved once per run through a [`ToolResolver`] and
//! then passed to every stage, so the rest of the pipeline never looks at
//! `PATH` or the package manager.

mod resolver;

pub use resolver::{
    HomebrewResolver, OverrideResolver, PathResolver, ToolResolveError, ToolResolver,
    select_resolver,
};

use crate::core::{CliError, PackageNotInstalledError, ToolNotFoundError};
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the four gettext utilities the pipeline drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    MsgInit,
    MsgMerge,
    MsgFmt,
    XGettext,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::MsgInit, Tool::MsgMerge, Tool::MsgFmt, Tool::XGettext];

    /// Executable name.
    pub fn name(self) -> &'static str {
        match self {
            Tool::MsgInit => "msginit",
            Tool::MsgMerge => "msgmerge",
            Tool::MsgFmt => "msgfmt",
            Tool::XGettext => "xgettext",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved executable paths for every [`Tool`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    msginit: PathBuf,
    msgmerge: PathBuf,
    msgfmt: PathBuf,
    xgettext: PathBuf,
}

impl Toolchain {
    /// Resolve all four tools, failing on the first one that is missing.
    pub fn resolve(resolver: &dyn ToolResolver) -> Result<Self, ToolResolveError> {
        tracing::debug!(resolver = resolver.describe(), "resolving gettext tools");
        Ok(Self {
            msginit: resolver.resolve(Tool::MsgInit)?,
            msgmerge: resolver.resolve(Tool::MsgMerge)?,
            msgfmt: resolver.resolve(Tool::MsgFmt)?,
            xgettext: resolver.resolve(Tool::XGettext)?,
        })
    }

    pub fn path(&self, tool: Tool) -> &Path {
        match tool {
            Tool::MsgInit => &self.msginit,
            Tool::MsgMerge => &self.msgmerge,
            Tool::MsgFmt => &self.msgfmt,
            Tool::XGettext => &self.xgettext,
        }
    }

    /// Tools paired with their paths, in [`Tool::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Tool, &Path)> {
        Tool::ALL.into_iter().map(|tool| (tool, self.path(tool)))
    }
}

impl From<ToolResolveError> for CliError {
    fn from(err: ToolResolveError) -> Self {
        match err {
            ToolResolveError::NotFound { tool, searched } => ToolNotFoundError {
                tool: tool.name().to_string(),
                searched,
            }
            .into(),
            ToolResolveError::PackageNotInstalled { manager, package } => {
                PackageNotInstalledError {
                    manager: manager.to_string(),
                    package: package.to_string(),
                }
                .into()
            },
            ToolResolveError::PackageManager(err) => {
                CliError::Other(format!("failed to query package manager: {}", err))
            },
        }
    }
}
