//! RAW caption tool - CLI Entry Point
//!
//! Renders a temporary JPEG, asks the configured model for tags and a
//! caption, and runs the accept/edit/regenerate review before saving.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use raw_caption_tools::caption::{
    run_caption_workflow, CaptionJob, CommandCaptioner, CommandEditor, Collaborators,
    ConsoleDirectives, PromptTemplate, TransientRegistry,
};
use raw_caption_tools::cli::{self, CaptionArgs};
use raw_caption_tools::convert::RawConverter;

fn main() -> Result<()> {
    let args = CaptionArgs::parse();

    let mut config = cli::load_config(args.config.as_deref());
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    cli::init_logging(&config.logging)?;

    if let Some(ref path) = args.generate_config {
        return cli::generate_config_file(path);
    }
    let (Some(raw_file), Some(output_file)) = (args.raw_file, args.output_file) else {
        anyhow::bail!("A RAW file and an output file are required");
    };

    // Ctrl+C during review removes the transient JPEG before exiting
    let registry = TransientRegistry::new();
    let handler_registry = registry.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted. Removing the transient JPEG and exiting without saving...");
        handler_registry.cleanup();
        std::process::exit(130);
    })
    .context("Failed to set Ctrl+C handler")?;

    info!("{} v{} (caption)", raw_caption_tools::NAME, raw_caption_tools::VERSION);

    let template = PromptTemplate::new(config.caption.prompt.clone());
    let renderer = RawConverter::from_config(&config);
    let mut captioner = CommandCaptioner::from_config(&config.caption);
    let mut editor = CommandEditor::resolve(&config.editor);
    let mut directives = ConsoleDirectives::new();
    debug!(
        "Model: {} {:?}, editor: {}",
        config.caption.program,
        config.caption.args,
        editor.program()
    );

    let mut collaborators = Collaborators {
        captioner: &mut captioner,
        editor: &mut editor,
        directives: &mut directives,
    };

    let job = CaptionJob::new(raw_file, output_file).with_cleanup(registry);
    let outcome = run_caption_workflow(
        job,
        &template,
        &renderer,
        &mut collaborators,
        &mut std::io::stdout(),
    )?;

    debug!(
        "Session for {} finished with {} invalid answer(s)",
        outcome.output_path.display(),
        outcome.stats.invalid_inputs
    );

    Ok(())
}
