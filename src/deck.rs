use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const DECK_VERSION: u8 = 1;

/// Heading labels a card inherits from the `# ` and `## ` lines above it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub primary: String,
    pub secondary: String,
}

impl Category {
    pub fn new<P: Into<String>, S: Into<String>>(primary: P, secondary: S) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Both labels joined with `separator`, leaving it out when either label is empty.
    pub fn joined(&self, separator: &str) -> String {
        match (self.primary.is_empty(), self.secondary.is_empty()) {
            (false, false) => format!("{}{}{}", self.primary, separator, self.secondary),
            (false, true) => self.primary.clone(),
            (true, false) => self.secondary.clone(),
            (true, true) => String::new(),
        }
    }
}

/// One flashcard as read from the vocabulary file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRecord {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// 1-based line on which the card's block started.
    pub line: usize,
}

impl CardRecord {
    pub fn new(category: Category, line: usize) -> Self {
        Self {
            category,
            front_term: None,
            back_term: None,
            example: None,
            line,
        }
    }

    /// Fill the next free field (front, back, then example).
    ///
    /// Empty data is ignored and does not use up a field. `flush_line` is only
    /// used to report where a fourth field was attempted.
    pub fn add_field(&mut self, data: String, flush_line: usize) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let slot = if self.front_term.is_none() {
            &mut self.front_term
        } else if self.back_term.is_none() {
            &mut self.back_term
        } else if self.example.is_none() {
            &mut self.example
        } else {
            return Err(Error::TooManyFields {
                card_line: self.line,
                line: flush_line,
            });
        };
        *slot = Some(data);
        Ok(())
    }

    /// A card counts once its front term is set.
    pub fn has_data(&self) -> bool {
        self.front_term.is_some()
    }
}

/// Metadata written as the first line of an exported deck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckHeader {
    pub version: u8,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl DeckHeader {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self {
            version: DECK_VERSION,
            created_at: Utc::now(),
            source,
        }
    }
}

impl Default for DeckHeader {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Ordered, append-only collection of parsed cards.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub header: DeckHeader,
    cards: Vec<CardRecord>,
}

impl Deck {
    pub fn new(header: DeckHeader) -> Self {
        Self {
            header,
            cards: Vec::new(),
        }
    }

    /// Append a card if it carries data; empty cards are discarded.
    ///
    /// Returns whether the card was kept.
    pub fn push(&mut self, card: CardRecord) -> bool {
        if !card.has_data() {
            return false;
        }
        self.cards.push(card);
        true
    }

    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.cards.iter()
    }

    /// Serialize the deck as JSON lines: one header line, then one line per card.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = serde_json::to_string(&DeckLine::Header(&self.header))?;
        out.push('\n');
        for card in &self.cards {
            out.push_str(&serde_json::to_string(&DeckLine::Card(card))?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn save_jsonl(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|err| Error::io("create deck file", path, err))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &DeckLine::Header(&self.header))?;
        writer
            .write_all(b"\n")
            .map_err(|err| Error::io("write deck file", path, err))?;
        for card in &self.cards {
            serde_json::to_writer(&mut writer, &DeckLine::Card(card))?;
            writer
                .write_all(b"\n")
                .map_err(|err| Error::io("write deck file", path, err))?;
        }
        writer
            .flush()
            .map_err(|err| Error::io("write deck file", path, err))
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum DeckLine<'a> {
    Header(&'a DeckHeader),
    Card(&'a CardRecord),
}
