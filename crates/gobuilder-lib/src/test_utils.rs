use std::cell::RefCell;
use std::fs;
use std::path::Path;

use crate::toolchain::{Executor, Invocation};
use crate::{Error, Result};

const IMPORTCFG_FLAG: &str = "-fgo-importcfg=";

/// Records invocations instead of running them.
///
/// Scratch importcfg files passed to the compiler are read at run time,
/// before the action deletes them.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    invocations: RefCell<Vec<Invocation>>,
    importcfgs: RefCell<Vec<String>>,
    stdout: Vec<u8>,
    fail_at: Option<usize>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Fails the `index`th invocation, counting from zero.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    pub fn importcfgs(&self) -> Vec<String> {
        self.importcfgs.borrow().clone()
    }

    /// One line per invocation, with `root` stripped and scratch paths masked.
    pub fn rendered(&self, root: &Path) -> String {
        let prefix = format!("{}/", root.display());
        let mut lines = Vec::new();
        for invocation in self.invocations.borrow().iter() {
            let mut words = Vec::new();
            for (key, value) in &invocation.env {
                let value = match key.to_str() {
                    Some("GOCACHE") => "<gocache>".to_owned(),
                    _ => value.to_string_lossy().into_owned(),
                };
                words.push(format!("{}={value}", key.to_string_lossy()));
            }
            words.push(invocation.program.display().to_string());
            for arg in &invocation.args {
                let arg = arg.to_string_lossy();
                if arg.starts_with(IMPORTCFG_FLAG) {
                    words.push(format!("{IMPORTCFG_FLAG}<scratch>"));
                } else {
                    words.push(arg.replace(&prefix, ""));
                }
            }
            lines.push(words.join(" "));
        }
        lines.join("\n")
    }

    fn record(&self, invocation: &Invocation) -> Result<()> {
        let index = self.invocations.borrow().len();
        self.invocations.borrow_mut().push(invocation.clone());
        for arg in &invocation.args {
            if let Some(path) = arg.to_str().and_then(|a| a.strip_prefix(IMPORTCFG_FLAG)) {
                let text = fs::read_to_string(path).unwrap();
                self.importcfgs.borrow_mut().push(text);
            }
        }
        if self.fail_at == Some(index) {
            return Err(Error::ToolchainSpawn {
                program: invocation.program.clone(),
                source: std::io::Error::other("simulated failure"),
            });
        }
        Ok(())
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.record(invocation)
    }

    fn output(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        self.record(invocation)?;
        Ok(self.stdout.clone())
    }
}

/// Writes `contents` to `root/name`, creating parent directories.
pub fn write_file(root: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}
