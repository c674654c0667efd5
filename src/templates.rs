use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::sheets::Sheet;

/// Placeholder name (without the surrounding `@`) to value. `None` renders empty.
pub type FieldMap = BTreeMap<String, Option<String>>;

/// An SVG document with `@Name@` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    text: String,
}

impl Template {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, text: T) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).map_err(|err| Error::io("read template", path, err))?;
        Ok(Self::new(path.display().to_string(), text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace every `@Name@` whose name is in `fields` with the XML-escaped value.
    ///
    /// Tokens without a mapping are copied through unchanged. Substituted
    /// values are never scanned again, so card text containing `@` cannot
    /// pull in other fields.
    pub fn render(&self, fields: &FieldMap) -> String {
        let text = self.text.as_str();
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find('@') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let replaced = after.find('@').and_then(|close| {
                fields
                    .get(&after[..close])
                    .map(|value| (close, value.as_deref().unwrap_or("")))
            });
            match replaced {
                Some((close, value)) => {
                    out.push_str(&escape_xml(value));
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('@');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Distinct placeholder names present in the template, sorted.
    pub fn placeholders(&self) -> BTreeSet<String> {
        placeholders_in(&self.text)
    }
}

/// Names of every `@Name@` token in `text`, where a name is ASCII alphanumeric.
pub fn placeholders_in(text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut rest = text;
    while let Some(open) = rest.find('@') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('@') else {
            break;
        };
        let name = &after[..close];
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric()) {
            found.insert(name.to_string());
            rest = &after[close + 1..];
        } else {
            rest = after;
        }
    }
    found
}

/// Escape text for use inside XML character data.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Which category placeholders the templates use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryStyle {
    /// `@Category{i}l@` holds the primary label, `@Category{i}r@` the secondary.
    Split,
    /// `@Category{i}@` holds both labels joined by `separator`.
    Joined { separator: String },
}

impl Default for CategoryStyle {
    fn default() -> Self {
        CategoryStyle::Split
    }
}

/// Maps the cards of a sheet onto numbered template slots.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub sheet_size: usize,
    pub category_style: CategoryStyle,
    /// Fill slots past the last card of a short sheet with empty text.
    pub blank_unused: bool,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sheet_size: crate::sheets::DEFAULT_SHEET_SIZE,
            category_style: CategoryStyle::default(),
            blank_unused: false,
        }
    }
}

impl SheetLayout {
    /// Build the placeholder values shared by the front and back templates.
    ///
    /// The front shows the back term on top with an empty bottom line; the
    /// back shows the front term on top and the example below.
    pub fn fields(&self, sheet: &Sheet<'_>) -> FieldMap {
        let mut fields = FieldMap::new();
        for (offset, card) in sheet.cards.iter().enumerate() {
            let i = offset + 1;
            match &self.category_style {
                CategoryStyle::Split => {
                    fields.insert(
                        format!("Category{i}l"),
                        Some(card.category.primary.clone()),
                    );
                    fields.insert(
                        format!("Category{i}r"),
                        Some(card.category.secondary.clone()),
                    );
                }
                CategoryStyle::Joined { separator } => {
                    fields.insert(
                        format!("Category{i}"),
                        Some(card.category.joined(separator)),
                    );
                }
            }
            fields.insert(format!("FrontTop{i}"), card.back_term.clone());
            fields.insert(format!("FrontBottom{i}"), None);
            fields.insert(format!("BackTop{i}"), card.front_term.clone());
            fields.insert(format!("BackBottom{i}"), card.example.clone());
        }
        if self.blank_unused {
            for i in sheet.len() + 1..=self.sheet_size {
                for name in self.slot_names(i) {
                    fields.insert(name, None);
                }
            }
        }
        fields
    }

    fn slot_names(&self, i: usize) -> Vec<String> {
        let mut names = match self.category_style {
            CategoryStyle::Split => vec![format!("Category{i}l"), format!("Category{i}r")],
            CategoryStyle::Joined { .. } => vec![format!("Category{i}")],
        };
        names.extend([
            format!("FrontTop{i}"),
            format!("FrontBottom{i}"),
            format!("BackTop{i}"),
            format!("BackBottom{i}"),
        ]);
        names
    }
}
