//! # Subprocess Transform
//!
//! Runs one external program, writes the page to its stdin and collects its
//! stdout. The child and its pipes live inside a single `transform` call and
//! the child is killed if that call is dropped before it finishes.

use super::Transform;
use crate::errors::PipelineError;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Default collaborator: `python3 stdin_adapter.py`.
pub const DEFAULT_PROGRAM: &str = "python3";
pub const DEFAULT_ARGS: &[&str] = &["stdin_adapter.py"];

#[derive(Clone, Debug)]
pub struct StdinTransform {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl StdinTransform {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    /// Runs the program from `dir` instead of the current directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for StdinTransform {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect(),
        )
    }
}

#[async_trait]
impl Transform for StdinTransform {
    async fn transform(&self, html: &[u8]) -> Result<Vec<u8>, PipelineError> {
        info!("Running transform: {} {:?}", self.program, self.args);

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| PipelineError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            PipelineError::ProcessIo(io::Error::new(
                io::ErrorKind::Other,
                "transform stdin was not captured",
            ))
        })?;

        // Feed stdin while stdout is being drained, otherwise a large page can
        // fill both pipe buffers and stall the child.
        let feed = async move {
            let written = stdin.write_all(html).await;
            drop(stdin);
            match written {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    warn!("Transform closed stdin before reading the whole page");
                    Ok(())
                }
                other => other,
            }
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(PipelineError::ProcessIo)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PipelineError::TransformFailed {
                status: output.status,
                stderr,
            });
        }
        fed.map_err(PipelineError::StdinWrite)?;

        debug!(
            "Transform wrote {} bytes to stdout, {} to stderr",
            output.stdout.len(),
            output.stderr.len()
        );
        Ok(output.stdout)
    }
}
