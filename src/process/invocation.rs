//! Invocation and output types for child processes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Maximum number of characters kept from a failing child's stderr
const STDERR_SNIPPET_CHARS: usize = 2000;

/// How the child's standard streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoMode {
    /// Output is buffered and returned to the caller
    Captured,
    /// Child shares the orchestrator's stdin/stdout/stderr
    Inherited,
}

/// Error types for process execution
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}{}", exit_label(.exit_code), snippet_suffix(.stderr_snippet))]
    NonZeroExit {
        command: String,
        exit_code: Option<i32>,
        stderr_snippet: String,
    },

    #[error("`{command}` timed out after {} seconds", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },
}

impl ExecError {
    /// Exit code reported by the child, if it ran to completion
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::NonZeroExit { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// Trailing stderr captured from the child (empty for inherited I/O)
    pub fn stderr_snippet(&self) -> &str {
        match self {
            ExecError::NonZeroExit { stderr_snippet, .. } => stderr_snippet,
            _ => "",
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn snippet_suffix(snippet: &str) -> String {
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {}", snippet)
    }
}

/// A single external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub io_mode: IoMode,
    pub current_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Build an invocation from an argv list (`argv[0]` is the program)
    ///
    /// Returns `None` when `argv` is empty.
    pub fn from_argv(argv: &[String], io_mode: IoMode) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            io_mode,
            current_dir: None,
            timeout: None,
        })
    }

    pub fn captured<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            io_mode: IoMode::Captured,
            current_dir: None,
            timeout: None,
        }
    }

    pub fn inherited<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            io_mode: IoMode::Inherited,
            ..Self::captured(program, args)
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The command line as an operator would type it
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("\"{}\"", part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output of a child that exited cleanly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// Captured stdout (empty for inherited I/O)
    pub stdout: String,

    /// Captured stderr (empty for inherited I/O)
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Keep the tail of a child's stderr, trimmed to a readable size
pub fn stderr_snippet(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    if count <= STDERR_SNIPPET_CHARS {
        return trimmed.to_string();
    }
    let tail: String = trimmed.chars().skip(count - STDERR_SNIPPET_CHARS).collect();
    format!("...{}", tail)
}
