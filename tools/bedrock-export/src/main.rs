//! bedrock-export - Bedrock geometry export tool
//!
//! Converts interchange geometry (.json) to Bedrock entity geometry (.geo.json)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use bedrock_export::rig_common::Geometry;
use bedrock_export::{export_document, ExportOptions};

/// Extension written next to the input when no output path is given
const GEOMETRY_EXT: &str = "geo.json";

#[derive(Parser)]
#[command(name = "bedrock-export")]
#[command(about = "Bedrock geometry export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a geometry to a .geo.json file
    Export {
        /// Input interchange geometry (.json)
        input: PathBuf,

        /// Output .geo.json file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export options (.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Geometry identifier (overrides config)
        #[arg(long)]
        identifier: Option<String>,

        /// Uniform mesh scale (overrides config)
        #[arg(long)]
        scale: Option<f32>,

        /// Flip V texture coordinates (overrides config)
        #[arg(long)]
        flip_uvs: bool,
    },

    /// Validate a geometry without exporting
    Check {
        /// Input interchange geometry (.json)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            identifier,
            scale,
            flip_uvs,
        } => {
            let mut options = match config {
                Some(path) => load_options(&path)?,
                None => ExportOptions::default(),
            };
            if identifier.is_some() {
                options.identifier = identifier;
            }
            if let Some(scale) = scale {
                options.scale = scale;
            }
            options.flip_uvs |= flip_uvs;
            options.validate()?;

            let output = output.unwrap_or_else(|| input.with_extension(GEOMETRY_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let geometry = load_geometry(&input)?;
            let document = export_document(&geometry, &options);

            let mut text = serde_json::to_string_pretty(&document)?;
            text.push('\n');
            fs::write(&output, text)
                .with_context(|| format!("Failed to write output: {:?}", output))?;
            tracing::info!("Done!");
        }

        Commands::Check { input } => {
            tracing::info!("Checking geometry {:?}", input);
            let geometry = load_geometry(&input)?;
            let bounds = geometry.calculate_bounds();
            tracing::info!(
                "'{}': {} meshes, {} vertices, {} triangles, {} bones",
                geometry.id(),
                geometry.meshes().len(),
                geometry.vertex_count(),
                geometry.triangle_count(),
                geometry.bones().len()
            );
            tracing::info!("Bounds: min={} max={}", bounds.min, bounds.max);
            tracing::info!("Geometry is valid!");
        }
    }

    Ok(())
}

fn load_geometry(path: &Path) -> Result<Geometry> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to open geometry: {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid geometry: {:?}", path))
}

fn load_options(path: &Path) -> Result<ExportOptions> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to open options: {:?}", path))?;
    ExportOptions::from_toml_str(&text).with_context(|| format!("Invalid options: {:?}", path))
}
