//! Shared clap helper types.

use clap::ValueEnum;
use flashsheet::CategoryStyle;

/// Category placeholder convention used by the templates.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CategoryStyleArg {
    /// `@Category{i}l@` and `@Category{i}r@`
    Split,
    /// `@Category{i}@`
    Joined,
}

impl CategoryStyleArg {
    pub fn into_style(self, separator: &str) -> CategoryStyle {
        match self {
            CategoryStyleArg::Split => CategoryStyle::Split,
            CategoryStyleArg::Joined => CategoryStyle::Joined {
                separator: separator.to_string(),
            },
        }
    }
}
