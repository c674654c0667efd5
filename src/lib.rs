//! Turn plain-text vocabulary lists into printable flashcard sheets.
//!
//! The text is parsed into a [`Deck`], split into [`Sheet`]s, and every sheet
//! is written into a front and a back SVG [`Template`]. External tools
//! ([`Renderer`], [`Merger`]) convert the SVGs to PDF and join them.

mod deck;
mod error;
mod external;
mod parser;
mod pipeline;
mod sheets;
mod templates;

pub use deck::{CardRecord, Category, Deck, DeckHeader};
pub use error::{Error, Result};
pub use external::{Inkscape, Merger, PdfJoin, Renderer};
pub use parser::{ParseOptions, parse, parse_with};
pub use pipeline::{Intermediates, Pipeline, RunSummary};
pub use sheets::{DEFAULT_SHEET_SIZE, Sheet, Sheets, batch};
pub use templates::{CategoryStyle, FieldMap, SheetLayout, Template, escape_xml, placeholders_in};
