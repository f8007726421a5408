//! Prompt template for the captioning model

use crate::core::config::DEFAULT_PROMPT;
use log::warn;
use std::path::Path;

/// Placeholder replaced by the JPEG path
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// A prompt with an `{image}` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template. One without a placeholder gets the path appended on its own line.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        if !template.contains(IMAGE_PLACEHOLDER) {
            warn!(
                "Caption prompt has no {} placeholder; the image path will be appended",
                IMAGE_PLACEHOLDER
            );
        }
        Self { template }
    }

    pub fn render(&self, image: &Path) -> String {
        let image = image.display().to_string();
        if self.template.contains(IMAGE_PLACEHOLDER) {
            self.template.replace(IMAGE_PLACEHOLDER, &image)
        } else {
            format!("{}\n{}", self.template.trim_end(), image)
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}
