//! fos-font-tool - build an SDF font resource from a TrueType file

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fos_font_import::{BinaryFontWriter, FontImportConfig, FontImporter, ResourceSerializer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Import a TrueType font into an SDF atlas resource", long_about = None)]
struct Args {
    /// Source font file (.ttf / .otf)
    font: PathBuf,

    /// Output resource path
    #[arg(short, long)]
    output: PathBuf,

    /// JSON meta file with import options
    #[arg(long)]
    meta: Option<PathBuf>,

    /// Characters to import (space is always added)
    #[arg(long)]
    characters: Option<String>,

    /// Em size in pixels
    #[arg(long)]
    resolution: Option<u32>,

    /// Distance field range in pixels
    #[arg(long)]
    sdf_range: Option<u32>,

    /// Empty border around every glyph cell
    #[arg(long)]
    padding: Option<u32>,

    /// Also write the atlas as a grayscale PNG
    #[arg(long)]
    atlas_png: Option<PathBuf>,
}

impl Args {
    /// Meta file values, then command line overrides
    fn import_config(&self) -> Result<FontImportConfig> {
        let mut config = match &self.meta {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading meta file {}", path.display()))?;
                FontImportConfig::from_json(&json)?
            }
            None => FontImportConfig::default(),
        };

        if let Some(characters) = &self.characters {
            config = config.with_characters(characters);
        }
        if let Some(resolution) = self.resolution {
            config = config.with_resolution(resolution);
        }
        if let Some(sdf_range) = self.sdf_range {
            config = config.with_sdf_range(sdf_range);
        }
        if let Some(padding) = self.padding {
            config = config.with_padding(padding);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let config = args.import_config()?;
    let data = std::fs::read(&args.font)
        .with_context(|| format!("reading font {}", args.font.display()))?;

    let importer = FontImporter::new(config);
    let font = importer
        .build(&data)
        .with_context(|| format!("importing {}", args.font.display()))?;

    if let Some(path) = &args.atlas_png {
        font.atlas
            .save_png(path)
            .with_context(|| format!("writing atlas {}", path.display()))?;
    }

    let glyph_count = font.glyphs.len();
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    BinaryFontWriter::new(BufWriter::new(file))
        .write_font(font)
        .with_context(|| format!("writing {}", args.output.display()))?;

    tracing::info!("Wrote {} glyphs to {}", glyph_count, args.output.display());
    Ok(())
}
