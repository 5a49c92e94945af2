//! Field-identified configuration diagnostics.

use std::fmt;
use std::net::AddrParseError;
use std::num::ParseIntError;

use thiserror::Error;

use crate::crypto::KeyFormatError;

/// The interface attribute a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Address,
    Dns,
    ExcludedApplications,
    IncludedApplications,
    ListenPort,
    Mtu,
    PrivateKey,
    Jc,
    Jmin,
    Jmax,
    S1,
    S2,
    H1,
    H2,
    H3,
    H4,
}

impl Location {
    /// Attribute name as written in a wg-quick `[Interface]` section.
    pub fn name(&self) -> &'static str {
        match self {
            Location::Address => "Address",
            Location::Dns => "DNS",
            Location::ExcludedApplications => "ExcludedApplications",
            Location::IncludedApplications => "IncludedApplications",
            Location::ListenPort => "ListenPort",
            Location::Mtu => "MTU",
            Location::PrivateKey => "PrivateKey",
            Location::Jc => "Jc",
            Location::Jmin => "Jmin",
            Location::Jmax => "Jmax",
            Location::S1 => "S1",
            Location::S2 => "S2",
            Location::H1 => "H1",
            Location::H2 => "H2",
            Location::H3 => "H3",
            Location::H4 => "H4",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an attribute was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// Text does not follow the attribute's grammar.
    SyntaxError,
    /// Text is not a decimal number.
    InvalidNumber,
    /// Value parsed but is out of range or inconsistent with another attribute.
    InvalidValue,
    /// Key text could not be decoded.
    InvalidKey,
    /// A required attribute was never set.
    MissingAttribute,
    /// Two attributes that cannot be combined were both set.
    MutuallyExclusive,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reason::SyntaxError => "syntax error",
            Reason::InvalidNumber => "invalid number",
            Reason::InvalidValue => "invalid value",
            Reason::InvalidKey => "invalid key",
            Reason::MissingAttribute => "missing attribute",
            Reason::MutuallyExclusive => "conflicts with another attribute",
        };
        f.write_str(text)
    }
}

/// Low-level cause underneath a [`BadConfigError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Key(#[from] KeyFormatError),

    #[error(transparent)]
    Number(#[from] ParseIntError),

    #[error(transparent)]
    Address(#[from] AddrParseError),

    #[error("prefix length {mask} exceeds {max}")]
    PrefixLength { mask: String, max: u8 },

    #[error("not a valid address or hostname")]
    Hostname,

    #[error("numeric address given as a search domain")]
    NumericDomain,

    #[error("Jmin {jmin} exceeds Jmax {jmax}")]
    JunkRange { jmin: u16, jmax: u16 },

    #[error("empty list item")]
    EmptyItem,
}

/// A configuration attribute that failed validation.
///
/// Always names the offending attribute and, when available, the text that
/// was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {reason}{}", describe_text(.text))]
pub struct BadConfigError {
    pub location: Location,
    pub reason: Reason,
    pub text: Option<String>,
    #[source]
    pub source: Option<ParseError>,
}

fn describe_text(text: &Option<String>) -> String {
    match text {
        Some(text) => format!(" `{}`", text),
        None => String::new(),
    }
}

impl BadConfigError {
    pub fn new(location: Location, reason: Reason, text: Option<String>) -> Self {
        Self {
            location,
            reason,
            text,
            source: None,
        }
    }

    /// Attach the underlying parse failure.
    pub fn with_source(mut self, source: impl Into<ParseError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Result type for builder operations.
pub type ConfigResult<T> = Result<T, BadConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BadConfigError::new(
            Location::ListenPort,
            Reason::InvalidValue,
            Some("99999".to_string()),
        );
        assert_eq!(err.to_string(), "ListenPort: invalid value `99999`");

        let err = BadConfigError::new(Location::PrivateKey, Reason::MissingAttribute, None);
        assert_eq!(err.to_string(), "PrivateKey: missing attribute");
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let err = BadConfigError::new(Location::PrivateKey, Reason::InvalidKey, Some("abc".into()))
            .with_source(KeyFormatError::Length { actual: 3 });
        assert!(err.source().is_some());
        assert_eq!(err.source, Some(ParseError::Key(KeyFormatError::Length { actual: 3 })));
    }
}
