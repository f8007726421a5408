//! Caption review session
//!
//! A session renders the RAW to a transient JPEG, asks the captioning model for
//! text and then loops on the user's directives until the text is accepted:
//!
//! ```text
//! Generating -> Reviewing -> Accepted
//!                  |  ^
//!                  v  |
//!        Editing / Regenerating
//! ```
//!
//! The transient JPEG is removed on every way out of the session, including
//! errors, and the accepted text is written to the output path exactly once.
//! An existing file at the preferred JPEG path is never touched; the session
//! renders to a unique sibling instead. Attach a [`TransientRegistry`] to let
//! a signal handler remove the JPEG when the process is interrupted.

use crate::caption::collaborators::{CaptionRequest, Captioner, TextEditor};
use crate::caption::directive::{Directive, DirectiveSource};
use crate::caption::prompt::PromptTemplate;
use crate::convert::JpegRenderer;
use crate::core::error::{Result, ToolError};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Printed when the answer isn't one of the directives
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Please enter 'a', 'e', or 'r'.";

/// Where a session reads from and writes to
#[derive(Debug, Clone)]
pub struct CaptionJob {
    pub raw_path: PathBuf,
    pub output_path: PathBuf,
    cleanup: Option<TransientRegistry>,
}

impl CaptionJob {
    pub fn new(raw_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            raw_path: raw_path.into(),
            output_path: output_path.into(),
            cleanup: None,
        }
    }

    /// Record the transient JPEG in `registry` while it exists
    pub fn with_cleanup(mut self, registry: TransientRegistry) -> Self {
        self.cleanup = Some(registry);
        self
    }

    /// Preferred transient JPEG path: next to the RAW with a `.jpg` extension
    pub fn transient_jpeg_path(&self) -> PathBuf {
        self.raw_path.with_extension("jpg")
    }
}

/// Tracks the live transient JPEG so an interrupt handler can remove it.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct TransientRegistry {
    pending: Arc<Mutex<Option<PathBuf>>>,
}

impl TransientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, path: &Path) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(path.to_path_buf());
        }
    }

    fn clear(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = None;
        }
    }

    /// The transient JPEG that currently exists, if any
    pub fn pending(&self) -> Option<PathBuf> {
        self.pending.lock().ok().and_then(|pending| pending.clone())
    }

    /// Delete the registered file, if any. Returns the path that was removed.
    pub fn cleanup(&self) -> Option<PathBuf> {
        let path = self.pending.lock().ok()?.take()?;
        match fs::remove_file(&path) {
            Ok(()) => Some(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to remove {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Generating,
    Reviewing,
    Editing,
    Regenerating,
    Accepted,
}

/// Counters for the log line at the end of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub generations: usize,
    pub edits: usize,
    pub invalid_inputs: usize,
}

/// Result of applying one directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Accepted,
    Edited,
    Regenerated,
    Rejected(String),
}

/// Result of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionOutcome {
    pub output_path: PathBuf,
    pub text: String,
    pub stats: SessionStats,
}

/// The rendered JPEG, deleted when dropped
#[derive(Debug)]
pub struct TransientJpeg {
    path: PathBuf,
    removed: bool,
    registry: Option<TransientRegistry>,
}

impl TransientJpeg {
    /// Render `raw` to `preferred`, or to a unique sibling when `preferred`
    /// is already taken (a camera JPEG, a file left by an earlier run).
    pub fn create(
        raw: &Path,
        preferred: PathBuf,
        renderer: &dyn JpegRenderer,
        registry: Option<TransientRegistry>,
    ) -> Result<Self> {
        let path = if preferred.exists() {
            let sibling = unique_sibling(&preferred)?;
            warn!(
                "{} already exists, rendering to {} instead",
                preferred.display(),
                sibling.display()
            );
            sibling
        } else {
            preferred
        };

        // Guard first, so a half-written file is cleaned up if rendering fails
        let guard = Self {
            path,
            removed: false,
            registry,
        };
        if let Some(registry) = &guard.registry {
            registry.register(&guard.path);
        }
        info!("Converting {} to {}", raw.display(), guard.path.display());
        renderer.render(raw, &guard.path)?;
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting failures
    pub fn remove(&mut self) -> Result<()> {
        if !self.removed {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
                debug!("Removed {}", self.path.display());
            }
            self.removed = true;
            if let Some(registry) = &self.registry {
                registry.clear();
            }
        }
        Ok(())
    }
}

impl Drop for TransientJpeg {
    fn drop(&mut self) {
        if !self.removed && self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
        if let Some(registry) = &self.registry {
            registry.clear();
        }
    }
}

/// Reserve `<stem>-XXXXXX.jpg` in the same directory as `preferred`
fn unique_sibling(preferred: &Path) -> Result<PathBuf> {
    let dir = match preferred.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = preferred
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let reserved = tempfile::Builder::new()
        .prefix(&format!("{}-", stem))
        .suffix(".jpg")
        .tempfile_in(dir)?
        .into_temp_path()
        .keep()
        .map_err(|e| ToolError::from(e.error))?;
    Ok(reserved)
}

/// The interactive parts of a session
pub struct Collaborators<'a> {
    pub captioner: &'a mut dyn Captioner,
    pub editor: &'a mut dyn TextEditor,
    pub directives: &'a mut dyn DirectiveSource,
}

/// One RAW photo being captioned
#[derive(Debug)]
pub struct CaptionSession {
    job: CaptionJob,
    jpeg: TransientJpeg,
    request: CaptionRequest,
    current_text: String,
    state: SessionState,
    stats: SessionStats,
}

impl CaptionSession {
    /// Render the transient JPEG and prepare the prompt
    pub fn open(
        job: CaptionJob,
        template: &PromptTemplate,
        renderer: &dyn JpegRenderer,
    ) -> Result<Self> {
        let jpeg = TransientJpeg::create(
            &job.raw_path,
            job.transient_jpeg_path(),
            renderer,
            job.cleanup.clone(),
        )?;
        let request = CaptionRequest {
            image: jpeg.path().to_path_buf(),
            prompt: template.render(jpeg.path()),
        };

        Ok(Self {
            job,
            jpeg,
            request,
            current_text: String::new(),
            state: SessionState::Generating,
            stats: SessionStats::default(),
        })
    }

    /// Ask the model for text, replacing the current text
    pub fn generate(&mut self, captioner: &mut dyn Captioner) -> Result<&str> {
        if !matches!(
            self.state,
            SessionState::Generating | SessionState::Regenerating
        ) {
            return Err(ToolError::InvalidState(format!(
                "cannot generate while {:?}",
                self.state
            )));
        }

        info!("Generating caption for {}", self.request.image.display());
        self.current_text = captioner.caption(&self.request)?;
        self.stats.generations += 1;
        if self.current_text.trim().is_empty() {
            warn!("The captioning model returned no text");
        }
        self.state = SessionState::Reviewing;
        Ok(&self.current_text)
    }

    /// Apply one review directive
    pub fn apply(
        &mut self,
        directive: Directive,
        captioner: &mut dyn Captioner,
        editor: &mut dyn TextEditor,
    ) -> Result<Transition> {
        if self.state != SessionState::Reviewing {
            return Err(ToolError::InvalidState(format!(
                "cannot apply {:?} while {:?}",
                directive, self.state
            )));
        }

        match directive {
            Directive::Accept => {
                self.state = SessionState::Accepted;
                Ok(Transition::Accepted)
            }
            Directive::Edit => {
                self.state = SessionState::Editing;
                self.current_text = editor.edit(&self.current_text)?;
                self.stats.edits += 1;
                self.state = SessionState::Reviewing;
                Ok(Transition::Edited)
            }
            Directive::Regenerate => {
                self.state = SessionState::Regenerating;
                self.generate(captioner)?;
                Ok(Transition::Regenerated)
            }
            Directive::Invalid(input) => {
                debug!("Ignoring review input {:?}", input);
                self.stats.invalid_inputs += 1;
                Ok(Transition::Rejected(input))
            }
        }
    }

    /// Remove the transient JPEG, then write the accepted text to the output path
    pub fn finish(mut self) -> Result<CaptionOutcome> {
        if self.state != SessionState::Accepted {
            return Err(ToolError::InvalidState(format!(
                "cannot finish while {:?}",
                self.state
            )));
        }

        self.jpeg.remove()?;
        fs::write(&self.job.output_path, &self.current_text)?;
        info!(
            "Saved caption to {} ({} generation(s), {} edit(s))",
            self.job.output_path.display(),
            self.stats.generations,
            self.stats.edits
        );

        Ok(CaptionOutcome {
            output_path: self.job.output_path.clone(),
            text: std::mem::take(&mut self.current_text),
            stats: self.stats,
        })
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn jpeg_path(&self) -> &Path {
        self.jpeg.path()
    }

    pub fn request(&self) -> &CaptionRequest {
        &self.request
    }
}

/// Show the current text and loop on directives until the user accepts
pub fn run_review<W: Write>(
    session: &mut CaptionSession,
    collaborators: &mut Collaborators<'_>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{}", session.current_text())?;

    loop {
        let directive = collaborators.directives.next_directive()?;
        match session.apply(
            directive,
            &mut *collaborators.captioner,
            &mut *collaborators.editor,
        )? {
            Transition::Accepted => return Ok(()),
            Transition::Edited | Transition::Regenerated => {
                writeln!(out, "{}", session.current_text())?
            }
            Transition::Rejected(_) => writeln!(out, "{}", INVALID_INPUT_MESSAGE)?,
        }
    }
}

/// Run a whole session: render, generate, review, save, acknowledge
pub fn run_caption_workflow<W: Write>(
    job: CaptionJob,
    template: &PromptTemplate,
    renderer: &dyn JpegRenderer,
    collaborators: &mut Collaborators<'_>,
    out: &mut W,
) -> Result<CaptionOutcome> {
    let mut session = CaptionSession::open(job, template, renderer)?;
    session.generate(&mut *collaborators.captioner)?;
    run_review(&mut session, collaborators, out)?;
    let outcome = session.finish()?;
    collaborators.directives.acknowledge()?;
    Ok(outcome)
}
