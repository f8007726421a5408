//! External collaborators of the caption workflow
//!
//! The captioning model and the text editor are both external programs. They
//! sit behind small traits so the review loop can be driven by fakes in tests.

use crate::core::config::{CaptionConfig, EditorConfig};
use crate::core::error::{Result, ToolError};
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// What the captioning model is asked about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRequest {
    /// Path of the rendered JPEG
    pub image: PathBuf,
    /// Fully rendered prompt
    pub prompt: String,
}

/// Produces free-form caption text for an image
pub trait Captioner {
    fn caption(&mut self, request: &CaptionRequest) -> Result<String>;
}

/// Lets the user edit text and returns the result
pub trait TextEditor {
    fn edit(&mut self, initial: &str) -> Result<String>;
}

/// Runs a model CLI such as `ollama run llava <prompt>` and captures its stdout
#[derive(Debug, Clone)]
pub struct CommandCaptioner {
    program: String,
    args: Vec<String>,
    fail_on_nonzero_exit: bool,
}

impl CommandCaptioner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            fail_on_nonzero_exit: false,
        }
    }

    pub fn from_config(config: &CaptionConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
            .fail_on_nonzero_exit(config.fail_on_nonzero_exit)
    }

    /// Turn a non-zero exit status into [`ToolError::ToolFailed`]
    pub fn fail_on_nonzero_exit(mut self, strict: bool) -> Self {
        self.fail_on_nonzero_exit = strict;
        self
    }
}

impl Captioner for CommandCaptioner {
    fn caption(&mut self, request: &CaptionRequest) -> Result<String> {
        debug!(
            "Running: {} {} <prompt for {}>",
            self.program,
            self.args.join(" "),
            request.image.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&request.prompt)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ToolError::Launch {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            if self.fail_on_nonzero_exit {
                return Err(ToolError::ToolFailed {
                    program: self.program.clone(),
                    code,
                    stderr,
                });
            }
            warn!(
                "'{}' exited with status {}; using whatever it printed. {}",
                self.program, code, stderr
            );
        }

        Ok(text)
    }
}

/// Opens the text in an external editor and blocks until it exits
#[derive(Debug, Clone)]
pub struct CommandEditor {
    program: String,
    args: Vec<String>,
    temp_dir: Option<PathBuf>,
}

impl CommandEditor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            temp_dir: None,
        }
    }

    /// Parse a command line such as `code --wait`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    /// Pick the editor: config, then `$VISUAL`, then `$EDITOR`, then the platform default
    pub fn resolve(config: &EditorConfig) -> Self {
        let from_env = |name: &str| std::env::var(name).ok();
        config
            .command
            .clone()
            .or_else(|| from_env("VISUAL"))
            .or_else(|| from_env("EDITOR"))
            .and_then(|line| Self::from_command_line(&line))
            .unwrap_or_else(|| Self::new(default_editor(), Vec::new()))
    }

    /// Create the edit file in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn launch(&self, path: &Path) -> Result<()> {
        debug!("Opening {} in {}", path.display(), self.program);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|e| ToolError::Launch {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            warn!(
                "Editor '{}' exited with status {}; reading the file anyway",
                self.program,
                status.code().unwrap_or(-1)
            );
        }
        Ok(())
    }
}

impl TextEditor for CommandEditor {
    fn edit(&mut self, initial: &str) -> Result<String> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("caption-").suffix(".txt");
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        // Close our handle so the editor can replace the file; the path is
        // still removed when `path` drops, whichever way we leave.
        let path = file.into_temp_path();
        self.launch(&path)?;
        let text = fs::read_to_string(&path)?;
        path.close()?;

        Ok(text)
    }
}

fn default_editor() -> &'static str {
    if cfg!(target_os = "windows") {
        "notepad"
    } else {
        "vi"
    }
}
