//! CLI logic for the ucd use case diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Emit};

use std::{fs, io::Write as _};

use log::info;

use ucd::{
    DiagramBuilder, UcdError,
    config::{AppConfig, OutputFormat},
};

/// Run the ucd CLI application
///
/// Reads the input file, parses it, and writes the requested output to the
/// output file or stdout.
///
/// # Errors
///
/// Returns `UcdError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Lexical, syntax and semantic errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), UcdError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let output = match args.emit {
        Some(Emit::Tokens) => DiagramBuilder::new(app_config).render_tokens(&source)?,
        emit => {
            let builder = DiagramBuilder::new(with_emit(app_config, emit));
            let diagram = builder.parse(&source)?;
            builder.render(&diagram)?
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            info!(output_file = path.as_str(); "Output written");
        }
        None => std::io::stdout().write_all(output.as_bytes())?,
    }

    Ok(())
}

/// Override the configured output format with an explicit `--emit`.
fn with_emit(config: AppConfig, emit: Option<Emit>) -> AppConfig {
    let format = match emit {
        Some(Emit::Tree) => OutputFormat::Text,
        Some(Emit::Json) => OutputFormat::Json,
        Some(Emit::Tokens) | None => return config,
    };
    AppConfig::new(config.output().clone().with_format(format))
}
