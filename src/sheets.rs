//! Splitting a deck into printable sheets.

use crate::deck::{CardRecord, Deck};
use crate::error::{Error, Result};

/// Cards printed on one physical page pair by default.
pub const DEFAULT_SHEET_SIZE: usize = 9;

/// A contiguous run of cards destined for one front/back page pair.
#[derive(Debug, Clone, Copy)]
pub struct Sheet<'a> {
    /// Zero-based position of the sheet in the deck.
    pub index: usize,
    pub cards: &'a [CardRecord],
}

impl<'a> Sheet<'a> {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Base file name for this sheet's intermediates, e.g. `Sheet03-front`.
    pub fn basename(&self, side: &str) -> String {
        format!("Sheet{:02}-{}", self.index, side)
    }
}

/// Iterator over the sheets of a deck. Clone it to walk the deck again.
#[derive(Debug, Clone)]
pub struct Sheets<'a> {
    chunks: std::slice::Chunks<'a, CardRecord>,
    next_index: usize,
}

impl<'a> Iterator for Sheets<'a> {
    type Item = Sheet<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let cards = self.chunks.next()?;
        let index = self.next_index;
        self.next_index += 1;
        Some(Sheet { index, cards })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Sheets<'_> {}

/// Batch `cards` into sheets of `size`; the final sheet may be shorter.
pub fn batch(cards: &[CardRecord], size: usize) -> Result<Sheets<'_>> {
    if size == 0 {
        return Err(Error::InvalidSheetSize);
    }
    Ok(Sheets {
        chunks: cards.chunks(size),
        next_index: 0,
    })
}

impl Deck {
    pub fn sheets(&self, size: usize) -> Result<Sheets<'_>> {
        batch(self.cards(), size)
    }
}
