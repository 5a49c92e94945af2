//! The validated interface record.

use std::fmt::Write as _;
use std::net::IpAddr;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::crypto::KeyPair;
use crate::interface::attribute;
use crate::interface::builder::InterfaceBuilder;
use crate::interface::inet::InetNetwork;

/// A fully validated tunnel interface.
///
/// Only [`InterfaceBuilder::build`] creates one; it never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub(super) addresses: Vec<InetNetwork>,
    pub(super) dns_servers: Vec<IpAddr>,
    pub(super) dns_search_domains: Vec<String>,
    pub(super) excluded_applications: Vec<String>,
    pub(super) included_applications: Vec<String>,
    #[serde(serialize_with = "serialize_key_pair")]
    pub(super) key_pair: KeyPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) listen_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) mtu: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) jc: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) jmin: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) jmax: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) s1: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) s2: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) h1: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) h2: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) h3: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) h4: Option<u32>,
}

fn serialize_key_pair<S: Serializer>(key_pair: &KeyPair, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("KeyPair", 2)?;
    state.serialize_field("private_key", &key_pair.private_key().to_base64())?;
    state.serialize_field("public_key", &key_pair.public_key().to_base64())?;
    state.end()
}

impl Interface {
    pub fn builder() -> InterfaceBuilder {
        InterfaceBuilder::new()
    }

    pub fn addresses(&self) -> &[InetNetwork] {
        &self.addresses
    }

    pub fn dns_servers(&self) -> &[IpAddr] {
        &self.dns_servers
    }

    pub fn dns_search_domains(&self) -> &[String] {
        &self.dns_search_domains
    }

    pub fn excluded_applications(&self) -> &[String] {
        &self.excluded_applications
    }

    pub fn included_applications(&self) -> &[String] {
        &self.included_applications
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn listen_port(&self) -> Option<u16> {
        self.listen_port
    }

    pub fn mtu(&self) -> Option<u16> {
        self.mtu
    }

    pub fn jc(&self) -> Option<u16> {
        self.jc
    }

    pub fn jmin(&self) -> Option<u16> {
        self.jmin
    }

    pub fn jmax(&self) -> Option<u16> {
        self.jmax
    }

    pub fn s1(&self) -> Option<u16> {
        self.s1
    }

    pub fn s2(&self) -> Option<u16> {
        self.s2
    }

    pub fn h1(&self) -> Option<u32> {
        self.h1
    }

    pub fn h2(&self) -> Option<u32> {
        self.h2
    }

    pub fn h3(&self) -> Option<u32> {
        self.h3
    }

    pub fn h4(&self) -> Option<u32> {
        self.h4
    }

    /// DNS servers followed by search domains, as one attribute value.
    pub fn dns_attribute(&self) -> String {
        let servers = self.dns_servers.iter().map(|server| server.to_string());
        attribute::join(servers.chain(self.dns_search_domains.iter().cloned()))
    }

    /// Render the `[Interface]` section body in wg-quick syntax.
    pub fn to_wg_quick_string(&self) -> String {
        let mut out = String::new();
        if !self.addresses.is_empty() {
            let _ = writeln!(out, "Address = {}", attribute::join(self.addresses.iter().map(ToString::to_string)));
        }
        if !self.dns_servers.is_empty() || !self.dns_search_domains.is_empty() {
            let _ = writeln!(out, "DNS = {}", self.dns_attribute());
        }
        if !self.excluded_applications.is_empty() {
            let _ = writeln!(out, "ExcludedApplications = {}", attribute::join(&self.excluded_applications));
        }
        if !self.included_applications.is_empty() {
            let _ = writeln!(out, "IncludedApplications = {}", attribute::join(&self.included_applications));
        }

        let numeric: [(&str, Option<u32>); 11] = [
            ("ListenPort", self.listen_port.map(u32::from)),
            ("MTU", self.mtu.map(u32::from)),
            ("Jc", self.jc.map(u32::from)),
            ("Jmin", self.jmin.map(u32::from)),
            ("Jmax", self.jmax.map(u32::from)),
            ("S1", self.s1.map(u32::from)),
            ("S2", self.s2.map(u32::from)),
            ("H1", self.h1),
            ("H2", self.h2),
            ("H3", self.h3),
            ("H4", self.h4),
        ];
        for (name, value) in numeric {
            if let Some(value) = value {
                let _ = writeln!(out, "{} = {}", name, value);
            }
        }

        let _ = writeln!(out, "PrivateKey = {}", self.key_pair.private_key().to_base64());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "LAr1aNSNF9d0MjwUgAVC4020T0N/E5NUtqVv5EnsSz0=";

    fn sample() -> Interface {
        let mut builder = Interface::builder();
        builder
            .parse_addresses("10.0.0.2/32, fd00::2/128")
            .unwrap()
            .parse_dns_servers("1.1.1.1, corp.example")
            .unwrap()
            .parse_listen_port("51820")
            .unwrap()
            .parse_jc("4")
            .unwrap()
            .parse_h1("1234567")
            .unwrap()
            .parse_private_key(TEST_PRIVATE_KEY)
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_dns_attribute_lists_servers_before_domains() {
        assert_eq!(sample().dns_attribute(), "1.1.1.1, corp.example");
    }

    #[test]
    fn test_wg_quick_string() {
        let text = sample().to_wg_quick_string();
        assert_eq!(
            text,
            "Address = 10.0.0.2/32, fd00::2/128\n\
             DNS = 1.1.1.1, corp.example\n\
             ListenPort = 51820\n\
             Jc = 4\n\
             H1 = 1234567\n\
             PrivateKey = LAr1aNSNF9d0MjwUgAVC4020T0N/E5NUtqVv5EnsSz0=\n"
        );
    }

    #[test]
    fn test_serialize_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["addresses"][0], "10.0.0.2/32");
        assert_eq!(json["dns_servers"][0], "1.1.1.1");
        assert_eq!(json["key_pair"]["public_key"], "TYgl6QQ73tlGKiaV5zV701XqI+M6KGoUJI9kC+n4uUk=");
        assert_eq!(json["listen_port"], 51820);
        assert!(json.get("mtu").is_none());
    }
}
