//! Address, network and hostname parsing.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Serialize, Serializer};

use crate::interface::error::ParseError;

const MAX_HOSTNAME_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// Parse a numeric IPv4 or IPv6 address. IPv6 may be wrapped in brackets.
///
/// Hostnames are never resolved.
pub fn parse_address(text: &str) -> Result<IpAddr, ParseError> {
    let text = text
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(text);
    Ok(text.parse::<IpAddr>()?)
}

/// Check whether `text` is a syntactically valid DNS hostname.
pub fn is_hostname(text: &str) -> bool {
    let text = text.strip_suffix('.').unwrap_or(text);
    if text.is_empty() || text.len() > MAX_HOSTNAME_LENGTH {
        return false;
    }

    let labels: Vec<&str> = text.split('.').collect();
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });

    // An all-numeric final label would make "10.0.0.300" a hostname.
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.chars().any(|c| !c.is_ascii_digit()));

    labels_ok && tld_ok
}

/// An interface address with its prefix length. Host bits are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InetNetwork(IpNet);

impl InetNetwork {
    pub fn new(address: IpAddr, mask: u8) -> Result<Self, ParseError> {
        IpNet::new(address, mask)
            .map(Self)
            .map_err(|_| ParseError::PrefixLength {
                mask: mask.to_string(),
                max: max_prefix_len(&address),
            })
    }

    /// Parse `address[/mask]`. A missing mask means a single host.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let (address_text, mask_text) = match text.rsplit_once('/') {
            Some((address, mask)) => (address, Some(mask)),
            None => (text, None),
        };

        let address = parse_address(address_text)?;
        let max = max_prefix_len(&address);
        let mask = match mask_text {
            Some(mask_text) => {
                let mask: u32 = mask_text.parse()?;
                if mask > u32::from(max) {
                    return Err(ParseError::PrefixLength {
                        mask: mask_text.to_string(),
                        max,
                    });
                }
                mask as u8
            }
            None => max,
        };

        Self::new(address, mask)
    }

    pub fn address(&self) -> IpAddr {
        self.0.addr()
    }

    pub fn mask(&self) -> u8 {
        self.0.prefix_len()
    }

    /// The network this address belongs to, with host bits cleared.
    pub fn network(&self) -> IpNet {
        self.0.trunc()
    }
}

fn max_prefix_len(address: &IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl fmt::Display for InetNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address(), self.mask())
    }
}

impl FromStr for InetNetwork {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for InetNetwork {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
