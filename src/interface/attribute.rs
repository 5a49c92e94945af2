//! Comma-separated attribute lists.
//!
//! Projection joins lists with [`join`]; the builder splits them back with
//! [`split`], so the two must stay symmetric.

use crate::interface::error::ParseError;

const SEPARATOR: &str = ", ";

/// Join list items into one attribute value.
pub fn join<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut out = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push_str(SEPARATOR);
        }
        out.push_str(value.as_ref());
    }
    out
}

/// Split an attribute value into trimmed items.
///
/// Trailing empty items are dropped. An empty item anywhere else is an error.
pub fn split(value: &str) -> Result<Vec<&str>, ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let mut items: Vec<&str> = value.split(',').map(str::trim).collect();
    while items.last().is_some_and(|item| item.is_empty()) {
        items.pop();
    }
    if items.iter().any(|item| item.is_empty()) {
        return Err(ParseError::EmptyItem);
    }
    Ok(items)
}
