//! Line-oriented vocabulary markup.
//!
//! ```text
//! # Animals
//! ## Pets
//! cat
//! --
//! Katze
//! --
//! The cat sleeps on the sofa.
//! ==
//! dog
//! --
//! Hund
//! ==
//! ```
//!
//! `# ` and `## ` set the primary and secondary category of every following
//! card, `--` ends a field and `==` ends a card. A card holds at most three
//! fields: front term, back term and an example. Every other line, blank
//! lines included, belongs to the field being collected.

use tracing::{debug, warn};

use crate::deck::{CardRecord, Category, Deck, DeckHeader};
use crate::error::Result;

/// Knobs for [`parse_with`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Finish a trailing card that is not closed by `==` or a heading.
    pub keep_trailing: bool,
    pub header: DeckHeader,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_trailing: true,
            header: DeckHeader::default(),
        }
    }
}

/// Parse vocabulary markup with default options.
pub fn parse(text: &str) -> Result<Deck> {
    parse_with(text, ParseOptions::default())
}

pub fn parse_with(text: &str, options: ParseOptions) -> Result<Deck> {
    let mut parser = Parser::new(options.header);
    for (idx, raw) in text.lines().enumerate() {
        parser.process_line(raw, idx + 1)?;
    }
    parser.finish(options.keep_trailing)
}

enum LineType<'a> {
    Primary(&'a str),
    Secondary(&'a str),
    EndOfCard,
    EndOfField,
    Text(&'a str),
}

impl<'a> LineType<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix("# ") {
            LineType::Primary(rest)
        } else if let Some(rest) = line.strip_prefix("## ") {
            LineType::Secondary(rest)
        } else if line == "==" {
            LineType::EndOfCard
        } else if line == "--" {
            LineType::EndOfField
        } else {
            LineType::Text(line)
        }
    }
}

struct Parser {
    deck: Deck,
    category: Category,
    current: CardRecord,
    buffer: Vec<String>,
    /// Line of the first buffered line, used when warning about dropped text.
    buffer_start: Option<usize>,
}

impl Parser {
    fn new(header: DeckHeader) -> Self {
        let category = Category::default();
        Self {
            deck: Deck::new(header),
            current: CardRecord::new(category.clone(), 1),
            category,
            buffer: Vec::new(),
            buffer_start: None,
        }
    }

    fn process_line(&mut self, raw: &str, line_num: usize) -> Result<()> {
        match LineType::classify(raw.trim()) {
            LineType::Primary(label) => {
                self.end_card(line_num)?;
                self.category.primary = label.to_string();
                self.current = CardRecord::new(self.category.clone(), line_num + 1);
            }
            LineType::Secondary(label) => {
                self.end_card(line_num)?;
                self.category.secondary = label.to_string();
                self.current = CardRecord::new(self.category.clone(), line_num + 1);
            }
            LineType::EndOfCard => {
                self.end_card(line_num)?;
                self.current = CardRecord::new(self.category.clone(), line_num + 1);
            }
            LineType::EndOfField => self.flush(line_num)?,
            LineType::Text(text) => {
                self.buffer_start.get_or_insert(line_num);
                self.buffer.push(text.to_string());
            }
        }
        Ok(())
    }

    /// Commit the buffered lines as the next field of the current card.
    fn flush(&mut self, line_num: usize) -> Result<()> {
        let data = self.buffer.join("\n");
        self.buffer.clear();
        self.buffer_start = None;
        self.current.add_field(data, line_num)
    }

    /// Flush and hand the current card to the deck. The caller starts the next card.
    fn end_card(&mut self, line_num: usize) -> Result<()> {
        self.flush(line_num)?;
        let card = std::mem::replace(
            &mut self.current,
            CardRecord::new(self.category.clone(), line_num),
        );
        let start = card.line;
        if self.deck.push(card) {
            debug!(line = start, cards = self.deck.len(), "card complete");
        }
        Ok(())
    }

    fn finish(mut self, keep_trailing: bool) -> Result<Deck> {
        if keep_trailing {
            let eof = self.buffer_start.map_or(0, |start| start + self.buffer.len());
            self.end_card(eof.max(self.current.line))?;
        } else if self.current.has_data() || self.buffer.iter().any(|l| !l.is_empty()) {
            let line = if self.current.has_data() {
                self.current.line
            } else {
                self.buffer_start.unwrap_or(self.current.line)
            };
            warn!(line, "dropping trailing card that is not closed by '==' or a heading");
        }
        Ok(self.deck)
    }
}
