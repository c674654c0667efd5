//! Command-line interface for the `flashsheet` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flashsheet::{
    DEFAULT_SHEET_SIZE, DeckHeader, Error, Inkscape, ParseOptions, PdfJoin, Pipeline,
    SheetLayout, Template, parse_with,
};
use tracing::info;

pub mod common;
pub mod utils;

use common::CategoryStyleArg;
use utils::{read_text, write_output};

/// Render a vocabulary file into printable flashcard sheets (PDF).
#[derive(Parser, Debug)]
#[command(name = "flashsheet", version)]
pub struct Cli {
    /// Vocabulary text file (`-` for stdin).
    pub input: PathBuf,

    /// Merged PDF to produce.
    pub output: Option<PathBuf>,

    /// SVG template for the front side of each sheet.
    #[arg(long, default_value = "Karten-Front.svg")]
    pub front_template: PathBuf,

    /// SVG template for the back side of each sheet.
    #[arg(long, default_value = "Karten-Back.svg")]
    pub back_template: PathBuf,

    /// Cards per sheet.
    #[arg(long, default_value_t = DEFAULT_SHEET_SIZE)]
    pub sheet_size: usize,

    /// Category placeholder convention used by the templates.
    #[arg(long, default_value_t = CategoryStyleArg::Split, value_enum)]
    pub category_style: CategoryStyleArg,

    /// Separator between the two labels for `--category-style joined`.
    #[arg(long, default_value = " / ")]
    pub category_separator: String,

    /// Blank the placeholders of empty slots on the last sheet.
    #[arg(long)]
    pub blank_unused: bool,

    /// Drop a final card that is not closed by `==` or a heading.
    #[arg(long)]
    pub drop_trailing: bool,

    /// Directory for the per-sheet SVG and PDF files.
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Leave the per-sheet SVG and PDF files in place.
    #[arg(long)]
    pub keep_intermediates: bool,

    /// Program used to convert SVG to PDF.
    #[arg(long, default_value = "inkscape")]
    pub inkscape: String,

    /// Program used to join the sheet PDFs.
    #[arg(long, default_value = "pdfjoin")]
    pub pdfjoin: String,

    /// Join pages in portrait instead of landscape orientation.
    #[arg(long)]
    pub portrait: bool,

    /// Write the parsed deck as JSON lines (`-` for stdout).
    #[arg(long, value_name = "PATH")]
    pub export_deck: Option<PathBuf>,

    /// Stop after parsing (and exporting); no OUTPUT needed.
    #[arg(long)]
    pub parse_only: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Execute the full run described by `cli`.
pub fn run(cli: Cli) -> Result<()> {
    let output = if cli.parse_only {
        None
    } else {
        Some(cli.output.clone().ok_or(Error::MissingArgument("OUTPUT"))?)
    };

    let text = read_text(&cli.input)?;
    let options = ParseOptions {
        keep_trailing: !cli.drop_trailing,
        header: DeckHeader::new(Some(cli.input.clone())),
    };
    let deck = parse_with(&text, options)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;
    info!(cards = deck.len(), input = %cli.input.display(), "parsed deck");

    if let Some(path) = &cli.export_deck {
        if path.as_os_str() == "-" {
            write_output(path, &deck.to_jsonl()?)?;
        } else {
            deck.save_jsonl(path)?;
        }
    }

    let Some(output) = output else {
        eprintln!("Parsed {} cards from {}", deck.len(), cli.input.display());
        return Ok(());
    };

    let front = Template::load(&cli.front_template).context("failed to load front template")?;
    let back = Template::load(&cli.back_template).context("failed to load back template")?;
    let pipeline = Pipeline {
        front,
        back,
        layout: SheetLayout {
            sheet_size: cli.sheet_size,
            category_style: cli.category_style.into_style(&cli.category_separator),
            blank_unused: cli.blank_unused,
        },
        work_dir: cli.work_dir.clone(),
        keep_intermediates: cli.keep_intermediates,
    };
    let renderer = Inkscape {
        program: cli.inkscape.clone().into(),
    };
    let merger = PdfJoin {
        program: cli.pdfjoin.clone().into(),
        landscape: !cli.portrait,
    };

    let summary = pipeline
        .render_deck(&deck, &output, &renderer, &merger)
        .with_context(|| format!("failed to render {}", output.display()))?;
    println!(
        "Rendered {} cards on {} sheets to {}",
        summary.cards,
        summary.sheets,
        summary.output.display()
    );
    Ok(())
}
