//! Caption workflow
//!
//! Generates tags, a caption and a short write-up for one RAW photo with an
//! external model, then lets the user accept, edit or regenerate the text
//! before it is saved.
//!
//! # Submodules
//!
//! - `prompt` - The prompt sent to the model
//! - `collaborators` - Model and editor traits plus their subprocess implementations
//! - `directive` - Review directives and the console source
//! - `session` - The review state machine

pub mod collaborators;
pub mod directive;
pub mod prompt;
pub mod session;

#[cfg(test)]
pub(crate) mod fakes;

pub use collaborators::{CaptionRequest, Captioner, CommandCaptioner, CommandEditor, TextEditor};
pub use directive::{ConsoleDirectives, Directive, DirectiveSource};
pub use prompt::PromptTemplate;
pub use session::{
    run_caption_workflow, run_review, CaptionJob, CaptionOutcome, CaptionSession, Collaborators,
    SessionState, TransientRegistry,
};
