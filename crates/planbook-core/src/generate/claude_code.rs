//! Claude Code generator backend.
//!
//! Runs `claude -p --output-format json` as a subprocess, feeds the prompt
//! on stdin, and returns the `result` text from the JSON envelope it prints.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::contract::GenerationRequest;
use super::prompt::build_generation_prompt;
use super::trait_def::LessonGenerator;

/// Generator backed by the [Claude Code](https://docs.anthropic.com/en/docs/claude-code) CLI.
#[derive(Debug, Clone)]
pub struct ClaudeCodeGenerator {
    /// Path to the `claude` binary. Defaults to `"claude"` (found via `$PATH`).
    claude_binary_path: String,
    /// Model alias or name passed via `--model`, if set.
    model: Option<String>,
}

impl ClaudeCodeGenerator {
    /// Create a generator that will look for `claude` on `$PATH`.
    pub fn new() -> Self {
        Self {
            claude_binary_path: "claude".to_string(),
            model: None,
        }
    }

    /// Create a generator with a custom binary path.
    pub fn with_binary(path: impl Into<String>) -> Self {
        Self {
            claude_binary_path: path.into(),
            model: None,
        }
    }

    pub fn model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn binary_path(&self) -> &str {
        &self.claude_binary_path
    }
}

impl Default for ClaudeCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The final envelope printed by `claude -p --output-format json`.
#[derive(Debug, Deserialize)]
struct ResultEnvelope {
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    result: Option<String>,
}

/// Pull the response text out of Claude Code's JSON output.
fn extract_result(stdout: &str) -> Result<String> {
    let envelope: ResultEnvelope =
        serde_json::from_str(stdout.trim()).context("malformed JSON envelope from claude")?;

    match (envelope.is_error, envelope.result) {
        (true, Some(message)) => bail!("claude reported an error: {message}"),
        (true, None) => bail!("claude reported an error"),
        (false, Some(text)) => Ok(text),
        (false, None) => bail!("claude output has no result field"),
    }
}

#[async_trait]
impl LessonGenerator for ClaudeCodeGenerator {
    fn name(&self) -> &str {
        "claude-code"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let prompt = build_generation_prompt(request);

        let mut cmd = Command::new(&self.claude_binary_path);
        cmd.arg("-p").arg("--output-format").arg("json");
        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().with_context(|| {
            format!(
                "failed to spawn claude binary at '{}' -- is it installed and on PATH?",
                self.claude_binary_path
            )
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .context("failed to send prompt to claude")?;
        }

        let output = child
            .wait_with_output()
            .await
            .context("failed to wait for claude")?;

        debug!(status = %output.status, bytes = output.stdout.len(), "claude exited");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("claude exited with {}: {}", output.status, stderr.trim());
        }

        let stdout = String::from_utf8(output.stdout).context("claude output is not UTF-8")?;
        extract_result(&stdout)
    }
}
