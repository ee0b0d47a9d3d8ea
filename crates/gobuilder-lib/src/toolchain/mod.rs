//! External tool invocation.
//!
//! Each build action turns its inputs into one or more [`Invocation`]s and
//! hands them to an [`Executor`]. Configuration (tool paths, target platform,
//! scratch cache directories) is applied per invocation and never written to
//! this process's environment.

mod asm;
mod compile;
mod link;
mod stdlib;

#[cfg(test)]
mod compile_tests;
#[cfg(test)]
mod link_tests;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

pub use asm::{AsmRequest, pkgpath_token};
pub use compile::CompileRequest;
pub use link::LinkRequest;

use crate::importcfg::ImportcfgManager;
use crate::source::BuildContext;
use crate::source::constraint::DEFAULT_GO_RELEASE;
use crate::{Error, Result};

/// Tool locations and the target platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub gccgo: PathBuf,
    pub ar: PathBuf,
    pub go: PathBuf,
    /// Target OS; the host's when unset.
    pub goos: Option<String>,
    /// Target architecture; the host's when unset.
    pub goarch: Option<String>,
    pub tags: Vec<String>,
    pub go_release: u32,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            gccgo: PathBuf::from("gccgo"),
            ar: PathBuf::from("ar"),
            go: PathBuf::from("go"),
            goos: None,
            goarch: None,
            tags: Vec::new(),
            go_release: DEFAULT_GO_RELEASE,
        }
    }
}

impl ToolchainConfig {
    pub fn build_context(&self) -> BuildContext {
        let mut ctx = BuildContext::host()
            .with_tags(self.tags.iter().cloned())
            .with_release(self.go_release);
        if let Some(goos) = &self.goos {
            ctx.goos = goos.clone();
        }
        if let Some(goarch) = &self.goarch {
            ctx.goarch = goarch.clone();
        }
        ctx
    }
}

/// One external process: program, arguments, and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Set on the child only, on top of the inherited environment.
    pub env: Vec<(OsString, OsString)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        Error::ToolchainSpawn {
            program: self.program.clone(),
            source,
        }
    }

    fn failed(&self, status: std::process::ExitStatus) -> Error {
        Error::ToolchainFailed {
            command: self.to_string(),
            status,
        }
    }
}

/// Shell-like rendering for logs and error messages.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key.to_string_lossy(), value.to_string_lossy())?;
        }
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs invocations.
pub trait Executor {
    /// Runs to completion with output streams passed through.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Runs to completion and returns captured stdout. Stderr passes through.
    fn output(&self, invocation: &Invocation) -> Result<Vec<u8>>;
}

/// Runs invocations as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        log::info!("{invocation}");
        let status = invocation
            .command()
            .status()
            .map_err(|e| invocation.spawn_error(e))?;
        if !status.success() {
            return Err(invocation.failed(status));
        }
        Ok(())
    }

    fn output(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        log::info!("{invocation}");
        let output = invocation
            .command()
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| invocation.spawn_error(e))?;
        if !output.status.success() {
            return Err(invocation.failed(output.status));
        }
        Ok(output.stdout)
    }
}

/// Entry point for every build action.
#[derive(Debug, Clone)]
pub struct Toolchain<E = SystemExecutor> {
    config: ToolchainConfig,
    importcfg: ImportcfgManager,
    executor: E,
}

impl Toolchain {
    pub fn new(config: ToolchainConfig, importcfg: ImportcfgManager) -> Self {
        Self::with_executor(config, importcfg, SystemExecutor)
    }
}

impl<E: Executor> Toolchain<E> {
    pub fn with_executor(config: ToolchainConfig, importcfg: ImportcfgManager, executor: E) -> Self {
        Self {
            config,
            importcfg,
            executor,
        }
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    pub fn importcfg(&self) -> &ImportcfgManager {
        &self.importcfg
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}
