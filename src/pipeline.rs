//! Parse, lay out, render and merge a vocabulary file into one PDF.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::external::{Merger, Renderer};
use crate::parser::{ParseOptions, parse_with};
use crate::sheets::Sheet;
use crate::templates::{SheetLayout, Template, placeholders_in};

/// Everything needed to turn a deck into sheets, except the external tools.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub front: Template,
    pub back: Template,
    pub layout: SheetLayout,
    /// Directory that receives the per-sheet SVG and PDF files.
    pub work_dir: PathBuf,
    pub keep_intermediates: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub cards: usize,
    pub sheets: usize,
    pub output: PathBuf,
}

impl Pipeline {
    pub fn new(front: Template, back: Template) -> Self {
        Self {
            front,
            back,
            layout: SheetLayout::default(),
            work_dir: PathBuf::from("."),
            keep_intermediates: false,
        }
    }

    /// Parse `text` and render it into `output`.
    pub fn run(
        &self,
        text: &str,
        options: ParseOptions,
        output: &Path,
        renderer: &dyn Renderer,
        merger: &dyn Merger,
    ) -> Result<RunSummary> {
        let deck = parse_with(text, options)?;
        self.render_deck(&deck, output, renderer, merger)
    }

    /// Render an already parsed deck into `output`.
    pub fn render_deck(
        &self,
        deck: &Deck,
        output: &Path,
        renderer: &dyn Renderer,
        merger: &dyn Merger,
    ) -> Result<RunSummary> {
        let sheets = deck.sheets(self.layout.sheet_size)?;
        if sheets.len() == 0 {
            return Err(Error::EmptyDeck);
        }
        let sheet_count = sheets.len();
        info!(
            cards = deck.len(),
            sheets = sheet_count,
            "rendering deck"
        );

        let mut intermediates = Intermediates::new(self.keep_intermediates);
        let mut pdfs = Vec::with_capacity(sheet_count * 2);
        for sheet in sheets {
            let fields = self.layout.fields(&sheet);
            for (side, template) in [("front", &self.front), ("back", &self.back)] {
                let document = template.render(&fields);
                let unresolved = placeholders_in(&document);
                if !unresolved.is_empty() {
                    debug!(
                        sheet = sheet.index,
                        side,
                        ?unresolved,
                        "placeholders left in rendered document"
                    );
                }
                let pdf = self.render_side(&sheet, side, &document, renderer, &mut intermediates)?;
                pdfs.push(pdf);
            }
        }

        merger.merge(&pdfs, output)?;
        info!(output = %output.display(), "merged sheets");

        Ok(RunSummary {
            cards: deck.len(),
            sheets: sheet_count,
            output: output.to_path_buf(),
        })
    }

    fn render_side(
        &self,
        sheet: &Sheet<'_>,
        side: &str,
        document: &str,
        renderer: &dyn Renderer,
        intermediates: &mut Intermediates,
    ) -> Result<PathBuf> {
        let base = self.work_dir.join(sheet.basename(side));
        let svg = base.with_extension("svg");
        let pdf = base.with_extension("pdf");

        intermediates.track(svg.clone());
        fs::write(&svg, document).map_err(|err| Error::io("write", &svg, err))?;

        intermediates.track(pdf.clone());
        renderer.render(&svg, &pdf)?;
        debug!(sheet = sheet.index, side, pdf = %pdf.display(), "rendered");
        Ok(pdf)
    }
}

/// Per-sheet files created during a run, removed when the guard goes out of scope.
#[derive(Debug)]
pub struct Intermediates {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl Intermediates {
    pub fn new(keep: bool) -> Self {
        Self {
            paths: Vec::new(),
            keep,
        }
    }

    pub fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for Intermediates {
    fn drop(&mut self) {
        if self.keep {
            debug!(count = self.paths.len(), "keeping intermediate files");
            return;
        }
        for path in &self.paths {
            match fs::remove_file(path) {
                Ok(()) => {}
                // the renderer may have failed before producing its output
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => warn!(path = %path.display(), %err, "failed to remove intermediate file"),
            }
        }
    }
}
