//! CLI logic for the Switchyard railroad diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use switchyard::{DiagramBuilder, SwitchyardError, config::MetricsProvider};

/// Run the Switchyard CLI application
///
/// Reads the diagram description at `args.input`, renders it and writes the
/// SVG document to `args.output`. Command-line rendering flags override the
/// loaded configuration.
///
/// # Errors
///
/// Returns `SwitchyardError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SwitchyardError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    let render = app_config.render_mut();
    if let Some(scale) = args.scale {
        render.set_scale(scale);
    }
    if args.transparent {
        render.set_transparent(true);
    }
    if args.estimate_text {
        render.set_text_metrics(MetricsProvider::Estimated);
    }
    debug!(render:? = app_config.render(); "Effective render settings");

    let source = fs::read_to_string(&args.input)?;

    let mut builder = DiagramBuilder::new(app_config);
    if let Some(title) = &args.title {
        builder = builder.with_title(title);
    }
    let diagram = builder.parse(&source)?;
    let svg = builder.render_svg(&diagram)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
