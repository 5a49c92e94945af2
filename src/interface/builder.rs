//! Field-by-field construction of a validated [`Interface`].
//!
//! Every `parse_*` operation validates its whole input before touching the
//! builder, so a failed call leaves the builder as it was. Cross-field rules
//! are checked once, in [`InterfaceBuilder::build`].

use std::net::IpAddr;
use std::num::{IntErrorKind, ParseIntError};

use crate::crypto::{Key, KeyPair};
use crate::interface::attribute;
use crate::interface::error::{BadConfigError, ConfigResult, Location, ParseError, Reason};
use crate::interface::inet::{self, InetNetwork};
use crate::interface::model::Interface;

/// Smallest MTU accepted (IPv4 minimum reassembly size).
pub const MIN_MTU: u16 = 576;
/// Largest junk packet count.
pub const MAX_JC: u16 = 128;
/// Largest junk packet size.
pub const MAX_JUNK_SIZE: u16 = 1280;
/// Largest init-packet padding.
pub const MAX_S1: u16 = 1132;
/// Largest response-packet padding.
pub const MAX_S2: u16 = 1188;

/// Builder for [`Interface`].
#[derive(Debug, Default)]
pub struct InterfaceBuilder {
    addresses: Vec<InetNetwork>,
    dns_servers: Vec<IpAddr>,
    dns_search_domains: Vec<String>,
    excluded_applications: Vec<String>,
    included_applications: Vec<String>,
    key_pair: Option<KeyPair>,
    listen_port: Option<u16>,
    mtu: Option<u16>,
    jc: Option<u16>,
    jmin: Option<u16>,
    jmax: Option<u16>,
    s1: Option<u16>,
    s2: Option<u16>,
    h1: Option<u32>,
    h2: Option<u32>,
    h3: Option<u32>,
    h4: Option<u32>,
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn syntax_error(location: Location, text: &str, source: ParseError) -> BadConfigError {
    BadConfigError::new(location, Reason::SyntaxError, Some(text.to_string())).with_source(source)
}

fn invalid_value(location: Location, value: impl ToString) -> BadConfigError {
    BadConfigError::new(location, Reason::InvalidValue, Some(value.to_string()))
}

/// A search domain must be a hostname and must not read as an address.
fn check_search_domain(domain: String) -> ConfigResult<String> {
    if inet::parse_address(&domain).is_ok() {
        return Err(syntax_error(Location::Dns, &domain, ParseError::NumericDomain));
    }
    if !inet::is_hostname(&domain) {
        return Err(syntax_error(Location::Dns, &domain, ParseError::Hostname));
    }
    Ok(domain)
}

/// Parse a decimal integer and check it against `min..=max`.
///
/// Digits too large for `i64` are a range error, like any other out-of-range value.
fn parse_bounded(location: Location, text: &str, min: i64, max: i64) -> ConfigResult<i64> {
    let value: i64 = text.trim().parse().map_err(|e: ParseIntError| {
        let reason = match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Reason::InvalidValue,
            _ => Reason::InvalidNumber,
        };
        BadConfigError::new(location, reason, Some(text.to_string())).with_source(ParseError::Number(e))
    })?;
    if value < min || value > max {
        return Err(invalid_value(location, text));
    }
    Ok(value)
}

fn parse_u16(location: Location, text: &str) -> ConfigResult<u16> {
    parse_bounded(location, text, 0, i64::from(u16::MAX)).map(|value| value as u16)
}

fn parse_u32(location: Location, text: &str) -> ConfigResult<u32> {
    parse_bounded(location, text, 0, i64::from(u32::MAX)).map(|value| value as u32)
}

fn check_max(location: Location, value: u16, max: u16) -> ConfigResult<u16> {
    if value > max {
        return Err(invalid_value(location, value));
    }
    Ok(value)
}

impl InterfaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_address(&mut self, address: InetNetwork) -> &mut Self {
        push_unique(&mut self.addresses, address);
        self
    }

    pub fn add_dns_server(&mut self, server: IpAddr) -> &mut Self {
        push_unique(&mut self.dns_servers, server);
        self
    }

    /// Rejects anything that would not read back as a search domain.
    pub fn add_dns_search_domain(&mut self, domain: impl Into<String>) -> ConfigResult<&mut Self> {
        let domain = check_search_domain(domain.into())?;
        push_unique(&mut self.dns_search_domains, domain);
        Ok(self)
    }

    pub fn set_key_pair(&mut self, key_pair: KeyPair) -> &mut Self {
        self.key_pair = Some(key_pair);
        self
    }

    /// Port `0` leaves the port unset.
    pub fn set_listen_port(&mut self, listen_port: u16) -> &mut Self {
        self.listen_port = (listen_port != 0).then_some(listen_port);
        self
    }

    /// MTU `0` leaves the MTU unset.
    pub fn set_mtu(&mut self, mtu: u16) -> ConfigResult<&mut Self> {
        if mtu != 0 && mtu < MIN_MTU {
            return Err(invalid_value(Location::Mtu, mtu));
        }
        self.mtu = (mtu != 0).then_some(mtu);
        Ok(self)
    }

    pub fn set_jc(&mut self, jc: u16) -> ConfigResult<&mut Self> {
        self.jc = Some(check_max(Location::Jc, jc, MAX_JC)?);
        Ok(self)
    }

    pub fn set_jmin(&mut self, jmin: u16) -> ConfigResult<&mut Self> {
        self.jmin = Some(check_max(Location::Jmin, jmin, MAX_JUNK_SIZE)?);
        Ok(self)
    }

    pub fn set_jmax(&mut self, jmax: u16) -> ConfigResult<&mut Self> {
        self.jmax = Some(check_max(Location::Jmax, jmax, MAX_JUNK_SIZE)?);
        Ok(self)
    }

    pub fn set_s1(&mut self, s1: u16) -> ConfigResult<&mut Self> {
        self.s1 = Some(check_max(Location::S1, s1, MAX_S1)?);
        Ok(self)
    }

    pub fn set_s2(&mut self, s2: u16) -> ConfigResult<&mut Self> {
        self.s2 = Some(check_max(Location::S2, s2, MAX_S2)?);
        Ok(self)
    }

    pub fn set_h1(&mut self, h1: u32) -> &mut Self {
        self.h1 = Some(h1);
        self
    }

    pub fn set_h2(&mut self, h2: u32) -> &mut Self {
        self.h2 = Some(h2);
        self
    }

    pub fn set_h3(&mut self, h3: u32) -> &mut Self {
        self.h3 = Some(h3);
        self
    }

    pub fn set_h4(&mut self, h4: u32) -> &mut Self {
        self.h4 = Some(h4);
        self
    }

    pub fn parse_addresses(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let items = attribute::split(text).map_err(|e| syntax_error(Location::Address, text, e))?;
        let mut parsed = Vec::with_capacity(items.len());
        for item in items {
            let network = InetNetwork::parse(item).map_err(|e| syntax_error(Location::Address, item, e))?;
            parsed.push(network);
        }
        for network in parsed {
            self.add_address(network);
        }
        Ok(self)
    }

    /// Numeric items become DNS servers; valid hostnames become search domains.
    pub fn parse_dns_servers(&mut self, text: &str) -> ConfigResult<&mut Self> {
        enum DnsItem {
            Server(IpAddr),
            SearchDomain(String),
        }

        let items = attribute::split(text).map_err(|e| syntax_error(Location::Dns, text, e))?;
        let mut parsed = Vec::with_capacity(items.len());
        for item in items {
            match inet::parse_address(item) {
                Ok(server) => parsed.push(DnsItem::Server(server)),
                Err(_) => {
                    let domain = check_search_domain(item.to_string())?;
                    parsed.push(DnsItem::SearchDomain(domain));
                }
            }
        }
        for item in parsed {
            match item {
                DnsItem::Server(server) => push_unique(&mut self.dns_servers, server),
                DnsItem::SearchDomain(domain) => push_unique(&mut self.dns_search_domains, domain),
            }
        }
        Ok(self)
    }

    pub fn exclude_applications<I, T>(&mut self, applications: I) -> ConfigResult<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let applications = collect_applications(Location::ExcludedApplications, applications)?;
        for application in applications {
            push_unique(&mut self.excluded_applications, application);
        }
        Ok(self)
    }

    pub fn include_applications<I, T>(&mut self, applications: I) -> ConfigResult<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let applications = collect_applications(Location::IncludedApplications, applications)?;
        for application in applications {
            push_unique(&mut self.included_applications, application);
        }
        Ok(self)
    }

    pub fn parse_listen_port(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let port = parse_u16(Location::ListenPort, text)?;
        Ok(self.set_listen_port(port))
    }

    pub fn parse_mtu(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let mtu = parse_u16(Location::Mtu, text)?;
        self.set_mtu(mtu)
    }

    pub fn parse_private_key(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let key = Key::from_base64(text).map_err(|e| {
            BadConfigError::new(Location::PrivateKey, Reason::InvalidKey, Some(text.to_string()))
                .with_source(e)
        })?;
        Ok(self.set_key_pair(KeyPair::from_private_key(key)))
    }

    pub fn parse_jc(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let jc = parse_u16(Location::Jc, text)?;
        self.set_jc(jc)
    }

    pub fn parse_jmin(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let jmin = parse_u16(Location::Jmin, text)?;
        self.set_jmin(jmin)
    }

    pub fn parse_jmax(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let jmax = parse_u16(Location::Jmax, text)?;
        self.set_jmax(jmax)
    }

    pub fn parse_s1(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let s1 = parse_u16(Location::S1, text)?;
        self.set_s1(s1)
    }

    pub fn parse_s2(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let s2 = parse_u16(Location::S2, text)?;
        self.set_s2(s2)
    }

    pub fn parse_h1(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let h1 = parse_u32(Location::H1, text)?;
        Ok(self.set_h1(h1))
    }

    pub fn parse_h2(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let h2 = parse_u32(Location::H2, text)?;
        Ok(self.set_h2(h2))
    }

    pub fn parse_h3(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let h3 = parse_u32(Location::H3, text)?;
        Ok(self.set_h3(h3))
    }

    pub fn parse_h4(&mut self, text: &str) -> ConfigResult<&mut Self> {
        let h4 = parse_u32(Location::H4, text)?;
        Ok(self.set_h4(h4))
    }

    /// Apply cross-field rules and produce the validated interface.
    pub fn build(self) -> ConfigResult<Interface> {
        let key_pair = self
            .key_pair
            .ok_or_else(|| BadConfigError::new(Location::PrivateKey, Reason::MissingAttribute, None))?;

        if !self.excluded_applications.is_empty() && !self.included_applications.is_empty() {
            return Err(BadConfigError::new(
                Location::IncludedApplications,
                Reason::MutuallyExclusive,
                Some(attribute::join(&self.included_applications)),
            ));
        }

        if let (Some(jmin), Some(jmax)) = (self.jmin, self.jmax) {
            if jmin > jmax {
                return Err(
                    BadConfigError::new(Location::Jmin, Reason::InvalidValue, Some(jmin.to_string()))
                        .with_source(ParseError::JunkRange { jmin, jmax }),
                );
            }
        }

        Ok(Interface {
            addresses: self.addresses,
            dns_servers: self.dns_servers,
            dns_search_domains: self.dns_search_domains,
            excluded_applications: self.excluded_applications,
            included_applications: self.included_applications,
            key_pair,
            listen_port: self.listen_port,
            mtu: self.mtu,
            jc: self.jc,
            jmin: self.jmin,
            jmax: self.jmax,
            s1: self.s1,
            s2: self.s2,
            h1: self.h1,
            h2: self.h2,
            h3: self.h3,
            h4: self.h4,
        })
    }
}

fn collect_applications<I, T>(location: Location, applications: I) -> ConfigResult<Vec<String>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut out = Vec::new();
    for application in applications {
        let application = application.as_ref().trim();
        if application.is_empty() {
            return Err(invalid_value(location, application));
        }
        out.push(application.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "LAr1aNSNF9d0MjwUgAVC4020T0N/E5NUtqVv5EnsSz0=";

    fn keyed() -> InterfaceBuilder {
        let mut builder = InterfaceBuilder::new();
        builder.parse_private_key(TEST_PRIVATE_KEY).unwrap();
        builder
    }

    #[test]
    fn test_build_requires_key_pair() {
        let err = InterfaceBuilder::new().build().unwrap_err();
        assert_eq!(err.location, Location::PrivateKey);
        assert_eq!(err.reason, Reason::MissingAttribute);
    }

    #[test]
    fn test_minimal_interface() {
        let mut builder = keyed();
        builder.parse_addresses("10.0.0.2/32").unwrap();
        let iface = builder.build().unwrap();
        assert_eq!(iface.addresses().len(), 1);
        assert_eq!(iface.addresses()[0].to_string(), "10.0.0.2/32");
        assert!(iface.listen_port().is_none());
        assert!(iface.mtu().is_none());
        assert!(iface.dns_servers().is_empty());
    }

    #[test]
    fn test_parse_addresses_is_atomic() {
        let mut builder = keyed();
        let err = builder.parse_addresses("10.0.0.2/32, not-an-ip").unwrap_err();
        assert_eq!(err.location, Location::Address);
        assert_eq!(err.reason, Reason::SyntaxError);
        assert_eq!(err.text.as_deref(), Some("not-an-ip"));
        assert!(builder.build().unwrap().addresses().is_empty());
    }

    #[test]
    fn test_addresses_deduplicate() {
        let mut builder = keyed();
        builder.parse_addresses("10.0.0.2, 10.0.0.2/32").unwrap();
        assert_eq!(builder.build().unwrap().addresses().len(), 1);
    }

    #[test]
    fn test_dns_split_by_syntax() {
        let mut builder = keyed();
        builder.parse_dns_servers("corp.example, 1.1.1.1, 2606:4700::1111").unwrap();
        let iface = builder.build().unwrap();
        assert_eq!(iface.dns_servers().len(), 2);
        assert_eq!(iface.dns_search_domains().to_vec(), vec!["corp.example".to_string()]);
    }

    #[test]
    fn test_dns_rejects_garbage() {
        let err = keyed().parse_dns_servers("1.1.1.1, bad host").unwrap_err();
        assert_eq!(err.location, Location::Dns);
        assert_eq!(err.text.as_deref(), Some("bad host"));
        assert_eq!(err.source, Some(ParseError::Hostname));
    }

    #[test]
    fn test_typed_search_domain_is_checked() {
        let err = keyed().add_dns_search_domain("bad host").unwrap_err();
        assert_eq!(err.location, Location::Dns);
        assert_eq!(err.reason, Reason::SyntaxError);
        assert_eq!(err.source, Some(ParseError::Hostname));

        let err = keyed().add_dns_search_domain("1.2.3.4").unwrap_err();
        assert_eq!(err.reason, Reason::SyntaxError);
        assert_eq!(err.source, Some(ParseError::NumericDomain));

        let mut builder = keyed();
        builder.add_dns_search_domain("corp.example").unwrap();
        builder.add_dns_server("1.1.1.1".parse().unwrap());
        let iface = builder.build().unwrap();

        let mut reparsed = keyed();
        reparsed.parse_dns_servers(&iface.dns_attribute()).unwrap();
        assert_eq!(reparsed.build().unwrap(), iface);
    }

    #[test]
    fn test_listen_port_range() {
        let err = keyed().parse_listen_port("99999").unwrap_err();
        assert_eq!(err.location, Location::ListenPort);
        assert_eq!(err.reason, Reason::InvalidValue);

        let err = keyed().parse_listen_port("port").unwrap_err();
        assert_eq!(err.reason, Reason::InvalidNumber);

        let err = keyed().parse_listen_port("-1").unwrap_err();
        assert_eq!(err.reason, Reason::InvalidValue);

        let err = keyed().parse_listen_port("99999999999999999999").unwrap_err();
        assert_eq!(err.reason, Reason::InvalidValue);
        assert_eq!(err.text.as_deref(), Some("99999999999999999999"));

        let err = keyed().parse_h1("-99999999999999999999").unwrap_err();
        assert_eq!(err.reason, Reason::InvalidValue);

        let mut builder = keyed();
        builder.parse_listen_port("0").unwrap();
        assert!(builder.build().unwrap().listen_port().is_none());
    }

    #[test]
    fn test_mtu_range() {
        let err = keyed().parse_mtu("100").unwrap_err();
        assert_eq!(err.location, Location::Mtu);
        assert_eq!(err.reason, Reason::InvalidValue);

        let mut builder = keyed();
        builder.parse_mtu("1420").unwrap();
        assert_eq!(builder.build().unwrap().mtu(), Some(1420));
    }

    #[test]
    fn test_invalid_private_key() {
        let err = InterfaceBuilder::new().parse_private_key("invalid_key").unwrap_err();
        assert_eq!(err.location, Location::PrivateKey);
        assert_eq!(err.reason, Reason::InvalidKey);
        assert!(matches!(err.source, Some(ParseError::Key(_))));
    }

    #[test]
    fn test_applications_are_exclusive() {
        let mut builder = keyed();
        builder.exclude_applications(["com.example.a"]).unwrap();
        builder.include_applications(["com.example.b"]).unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err.location, Location::IncludedApplications);
        assert_eq!(err.reason, Reason::MutuallyExclusive);
    }

    #[test]
    fn test_blank_application_rejected() {
        let err = keyed().exclude_applications(["com.example.a", "  "]).unwrap_err();
        assert_eq!(err.location, Location::ExcludedApplications);
    }

    #[test]
    fn test_junk_bounds() {
        assert_eq!(keyed().parse_jc("129").unwrap_err().location, Location::Jc);
        assert_eq!(keyed().parse_jmax("1281").unwrap_err().location, Location::Jmax);

        let mut builder = keyed();
        builder.parse_jmin("100").unwrap().parse_jmax("50").unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err.location, Location::Jmin);
        assert_eq!(err.reason, Reason::InvalidValue);
        assert_eq!(err.text.as_deref(), Some("100"));
        assert_eq!(err.source, Some(ParseError::JunkRange { jmin: 100, jmax: 50 }));

        let mut builder = keyed();
        builder.parse_jc("0").unwrap().parse_jmin("50").unwrap().parse_jmax("50").unwrap();
        let iface = builder.build().unwrap();
        assert_eq!(iface.jc(), Some(0));
        assert_eq!((iface.jmin(), iface.jmax()), (Some(50), Some(50)));
    }

    #[test]
    fn test_padding_and_header_values() {
        assert_eq!(keyed().parse_s1("1133").unwrap_err().location, Location::S1);
        assert_eq!(keyed().parse_s2("1189").unwrap_err().location, Location::S2);
        assert_eq!(keyed().parse_h3("4294967296").unwrap_err().location, Location::H3);

        let mut builder = keyed();
        builder
            .parse_s1("15")
            .unwrap()
            .parse_s2("18")
            .unwrap()
            .parse_h1("1")
            .unwrap()
            .parse_h4("4294967295")
            .unwrap();
        let iface = builder.build().unwrap();
        assert_eq!((iface.s1(), iface.s2()), (Some(15), Some(18)));
        assert_eq!((iface.h1(), iface.h4()), (Some(1), Some(u32::MAX)));
        assert!(iface.h2().is_none());
    }
}
