use crate::toolchain::{Tool, Toolchain};
use crate::utils::ui;
use anyhow::{Context as _, Result, bail};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A single external tool call, built up before it is run or printed.
#[derive(Clone, Debug)]
pub struct Invocation {
    tool: Tool,
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(toolchain: &Toolchain, tool: Tool) -> Self {
        Self {
            tool,
            program: toolchain.path(tool).to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append `--flag=<path>`.
    pub fn path_flag(self, flag: &str, path: &Path) -> Self {
        let mut arg = OsString::from(flag);
        arg.push("=");
        arg.push(path);
        self.arg(arg)
    }

    /// Run the tool to completion, failing on a non-zero exit status.
    ///
    /// The error message carries the exit status and trimmed stderr.
    pub fn run(&self) -> Result<()> {
        tracing::debug!(command = %self, "running");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                bail!("{} exited with {}", self.tool, output.status)
            }
            bail!("{} exited with {}: {}", self.tool, output.status, stderr)
        }

        Ok(())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &OsStr) -> String {
    let text = arg.to_string_lossy();
    if text.is_empty() || text.contains(char::is_whitespace) {
        format!("'{}'", text)
    } else {
        text.into_owned()
    }
}

/// Runs invocations, or only prints them in dry-run mode.
#[derive(Clone, Copy, Debug)]
pub struct Runner {
    dry_run: bool,
}

impl Runner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn execute(&self, invocation: &Invocation) -> Result<()> {
        if self.dry_run {
            ui::print_would_run(&invocation.to_string());
            return Ok(());
        }
        invocation.run()
    }
}
