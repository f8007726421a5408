//! Deterministic stand-ins for the external collaborators, used by the tests

use crate::caption::collaborators::{CaptionRequest, Captioner, TextEditor};
use crate::caption::directive::{Directive, DirectiveSource};
use crate::convert::JpegRenderer;
use crate::core::error::{Result, ToolError};
use std::cell::Cell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

/// Writes a few bytes where the JPEG should go
#[derive(Debug, Default)]
pub struct FakeRenderer {
    pub calls: Cell<usize>,
    /// Write the file, then report a decode error
    pub fail_after_write: bool,
}

impl JpegRenderer for FakeRenderer {
    fn render(&self, raw: &Path, jpeg: &Path) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        fs::write(jpeg, b"\xFF\xD8 fake jpeg")?;
        if self.fail_after_write {
            return Err(ToolError::RawDecode {
                path: raw.to_path_buf(),
                message: "truncated file".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns canned responses in order, repeating the last one
#[derive(Debug)]
pub struct CannedCaptioner {
    responses: VecDeque<String>,
    pub requests: Vec<CaptionRequest>,
}

impl CannedCaptioner {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|s| s.to_string()).collect(),
            requests: Vec::new(),
        }
    }
}

impl Captioner for CannedCaptioner {
    fn caption(&mut self, request: &CaptionRequest) -> Result<String> {
        self.requests.push(request.clone());
        let text = if self.responses.len() > 1 {
            self.responses.pop_front()
        } else {
            self.responses.front().cloned()
        };
        Ok(text.unwrap_or_default())
    }
}

/// Replaces whatever it is given with a fixed text
#[derive(Debug)]
pub struct ScriptedEditor {
    replacement: String,
    pub seen: Vec<String>,
}

impl ScriptedEditor {
    pub fn new(replacement: &str) -> Self {
        Self {
            replacement: replacement.to_string(),
            seen: Vec::new(),
        }
    }
}

impl TextEditor for ScriptedEditor {
    fn edit(&mut self, initial: &str) -> Result<String> {
        self.seen.push(initial.to_string());
        Ok(self.replacement.clone())
    }
}

/// An editor that can't be started
#[derive(Debug)]
pub struct FailingEditor;

impl TextEditor for FailingEditor {
    fn edit(&mut self, _initial: &str) -> Result<String> {
        Err(ToolError::Launch {
            program: "editor".to_string(),
            message: "No such file or directory".to_string(),
        })
    }
}

/// Answers the review prompt from a script; errors like closed stdin when it runs out
#[derive(Debug)]
pub struct ScriptedDirectives {
    inputs: VecDeque<String>,
    pub asked: usize,
    pub acknowledged: bool,
}

impl ScriptedDirectives {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            asked: 0,
            acknowledged: false,
        }
    }
}

impl DirectiveSource for ScriptedDirectives {
    fn next_directive(&mut self) -> Result<Directive> {
        self.asked += 1;
        self.inputs
            .pop_front()
            .map(|input| Directive::parse(&input))
            .ok_or_else(|| ToolError::Prompt("script exhausted".to_string()))
    }

    fn acknowledge(&mut self) -> Result<()> {
        self.acknowledged = true;
        Ok(())
    }
}
