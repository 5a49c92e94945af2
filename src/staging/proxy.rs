//! Editable staging record for one tunnel interface.

use std::fmt;

use bytes::Bytes;

use crate::crypto::{Key, KeyPair};
use crate::interface::{attribute, ConfigResult, Interface, InterfaceBuilder};
use crate::staging::observable::{Property, PropertyChangeRegistry, SubscriptionId};
use crate::staging::parcel::{ParcelReader, ParcelResult, ParcelWriter};

/// Current byte-layout version written by [`InterfaceProxy::to_bytes`].
pub const PARCEL_VERSION: u32 = 1;

/// Interface configuration staged as plain text for editing.
///
/// Nothing is validated while editing. [`resolve`](Self::resolve) hands the
/// non-empty fields to [`InterfaceBuilder`](crate::interface::InterfaceBuilder)
/// and relays its verdict unchanged.
pub struct InterfaceProxy {
    addresses: String,
    dns_servers: String,
    excluded_applications: Vec<String>,
    included_applications: Vec<String>,
    listen_port: String,
    mtu: String,
    private_key: String,
    jc: String,
    jmin: String,
    jmax: String,
    s1: String,
    s2: String,
    h1: String,
    h2: String,
    h3: String,
    h4: String,
    registry: PropertyChangeRegistry<InterfaceProxy>,
}

fn optional_text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl InterfaceProxy {
    /// Create an empty proxy.
    pub fn new() -> Self {
        Self {
            addresses: String::new(),
            dns_servers: String::new(),
            excluded_applications: Vec::new(),
            included_applications: Vec::new(),
            listen_port: String::new(),
            mtu: String::new(),
            private_key: String::new(),
            jc: String::new(),
            jmin: String::new(),
            jmax: String::new(),
            s1: String::new(),
            s2: String::new(),
            h1: String::new(),
            h2: String::new(),
            h3: String::new(),
            h4: String::new(),
            registry: PropertyChangeRegistry::new(),
        }
    }

    /// Project a validated interface into editable text.
    pub fn from_interface(other: &Interface) -> Self {
        let mut proxy = Self::new();
        proxy.set_addresses(attribute::join(other.addresses().iter().map(ToString::to_string)));
        proxy.set_dns_servers(other.dns_attribute());
        proxy.set_excluded_applications(other.excluded_applications().iter().cloned());
        proxy.set_included_applications(other.included_applications().iter().cloned());
        proxy.set_listen_port(optional_text(other.listen_port()));
        proxy.set_mtu(optional_text(other.mtu()));
        proxy.set_private_key(other.key_pair().private_key().to_base64());
        proxy.set_jc(optional_text(other.jc()));
        proxy.set_jmin(optional_text(other.jmin()));
        proxy.set_jmax(optional_text(other.jmax()));
        proxy.set_s1(optional_text(other.s1()));
        proxy.set_s2(optional_text(other.s2()));
        proxy.set_h1(optional_text(other.h1()));
        proxy.set_h2(optional_text(other.h2()));
        proxy.set_h3(optional_text(other.h3()));
        proxy.set_h4(optional_text(other.h4()));
        proxy
    }

    /// Register a change observer. Safe to call from inside a callback.
    pub fn subscribe(&self, callback: impl Fn(&InterfaceProxy, Property) + 'static) -> SubscriptionId {
        self.registry.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.registry.unsubscribe(id)
    }

    fn notify(&self, property: Property) {
        self.registry.notify(self, property);
    }

    pub fn addresses(&self) -> &str {
        &self.addresses
    }

    pub fn set_addresses(&mut self, value: impl Into<String>) {
        self.addresses = value.into();
        self.notify(Property::Addresses);
    }

    pub fn dns_servers(&self) -> &str {
        &self.dns_servers
    }

    pub fn set_dns_servers(&mut self, value: impl Into<String>) {
        self.dns_servers = value.into();
        self.notify(Property::DnsServers);
    }

    pub fn excluded_applications(&self) -> &[String] {
        &self.excluded_applications
    }

    pub fn set_excluded_applications<I, T>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.excluded_applications = values.into_iter().map(Into::into).collect();
        self.notify(Property::ExcludedApplications);
    }

    pub fn push_excluded_application(&mut self, value: impl Into<String>) {
        self.excluded_applications.push(value.into());
        self.notify(Property::ExcludedApplications);
    }

    /// Remove every occurrence of `value`. Returns true if anything was removed.
    pub fn remove_excluded_application(&mut self, value: &str) -> bool {
        let before = self.excluded_applications.len();
        self.excluded_applications.retain(|existing| existing != value);
        let removed = self.excluded_applications.len() != before;
        if removed {
            self.notify(Property::ExcludedApplications);
        }
        removed
    }

    pub fn included_applications(&self) -> &[String] {
        &self.included_applications
    }

    pub fn set_included_applications<I, T>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.included_applications = values.into_iter().map(Into::into).collect();
        self.notify(Property::IncludedApplications);
    }

    pub fn push_included_application(&mut self, value: impl Into<String>) {
        self.included_applications.push(value.into());
        self.notify(Property::IncludedApplications);
    }

    /// Remove every occurrence of `value`. Returns true if anything was removed.
    pub fn remove_included_application(&mut self, value: &str) -> bool {
        let before = self.included_applications.len();
        self.included_applications.retain(|existing| existing != value);
        let removed = self.included_applications.len() != before;
        if removed {
            self.notify(Property::IncludedApplications);
        }
        removed
    }

    pub fn listen_port(&self) -> &str {
        &self.listen_port
    }

    pub fn set_listen_port(&mut self, value: impl Into<String>) {
        self.listen_port = value.into();
        self.notify(Property::ListenPort);
    }

    pub fn mtu(&self) -> &str {
        &self.mtu
    }

    pub fn set_mtu(&mut self, value: impl Into<String>) {
        self.mtu = value.into();
        self.notify(Property::Mtu);
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Also notifies [`Property::PublicKey`], which is derived from this field.
    pub fn set_private_key(&mut self, value: impl Into<String>) {
        self.private_key = value.into();
        self.notify(Property::PrivateKey);
        self.notify(Property::PublicKey);
    }

    /// Public key derived from the staged private key.
    ///
    /// Recomputed on every call. Returns an empty string when the private key
    /// is empty or cannot be decoded.
    pub fn public_key(&self) -> String {
        match Key::from_base64(&self.private_key) {
            Ok(private_key) => Key::generate_public_key(&private_key).to_base64(),
            Err(_) => String::new(),
        }
    }

    /// Replace the staged private key with a freshly generated one.
    pub fn generate_key_pair(&mut self) {
        let key_pair = KeyPair::generate();
        self.private_key = key_pair.private_key().to_base64();
        self.notify(Property::PrivateKey);
        self.notify(Property::PublicKey);
        tracing::debug!(public_key = %key_pair.public_key().to_base64(), "Generated interface key pair");
    }

    pub fn jc(&self) -> &str {
        &self.jc
    }

    pub fn set_jc(&mut self, value: impl Into<String>) {
        self.jc = value.into();
        self.notify(Property::Jc);
    }

    pub fn jmin(&self) -> &str {
        &self.jmin
    }

    pub fn set_jmin(&mut self, value: impl Into<String>) {
        self.jmin = value.into();
        self.notify(Property::Jmin);
    }

    pub fn jmax(&self) -> &str {
        &self.jmax
    }

    pub fn set_jmax(&mut self, value: impl Into<String>) {
        self.jmax = value.into();
        self.notify(Property::Jmax);
    }

    pub fn s1(&self) -> &str {
        &self.s1
    }

    pub fn set_s1(&mut self, value: impl Into<String>) {
        self.s1 = value.into();
        self.notify(Property::S1);
    }

    pub fn s2(&self) -> &str {
        &self.s2
    }

    pub fn set_s2(&mut self, value: impl Into<String>) {
        self.s2 = value.into();
        self.notify(Property::S2);
    }

    pub fn h1(&self) -> &str {
        &self.h1
    }

    pub fn set_h1(&mut self, value: impl Into<String>) {
        self.h1 = value.into();
        self.notify(Property::H1);
    }

    pub fn h2(&self) -> &str {
        &self.h2
    }

    pub fn set_h2(&mut self, value: impl Into<String>) {
        self.h2 = value.into();
        self.notify(Property::H2);
    }

    pub fn h3(&self) -> &str {
        &self.h3
    }

    pub fn set_h3(&mut self, value: impl Into<String>) {
        self.h3 = value.into();
        self.notify(Property::H3);
    }

    pub fn h4(&self) -> &str {
        &self.h4
    }

    pub fn set_h4(&mut self, value: impl Into<String>) {
        self.h4 = value.into();
        self.notify(Property::H4);
    }

    /// Names of the fields that currently hold text (or list items).
    pub fn staged_fields(&self) -> Vec<Property> {
        let text_fields = [
            (Property::Addresses, &self.addresses),
            (Property::DnsServers, &self.dns_servers),
            (Property::ListenPort, &self.listen_port),
            (Property::Mtu, &self.mtu),
            (Property::PrivateKey, &self.private_key),
            (Property::Jc, &self.jc),
            (Property::Jmin, &self.jmin),
            (Property::Jmax, &self.jmax),
            (Property::S1, &self.s1),
            (Property::S2, &self.s2),
            (Property::H1, &self.h1),
            (Property::H2, &self.h2),
            (Property::H3, &self.h3),
            (Property::H4, &self.h4),
        ];
        let mut fields: Vec<Property> = text_fields
            .into_iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(property, _)| property)
            .collect();
        if !self.excluded_applications.is_empty() {
            fields.push(Property::ExcludedApplications);
        }
        if !self.included_applications.is_empty() {
            fields.push(Property::IncludedApplications);
        }
        fields
    }

    /// Build a validated interface from the staged fields.
    ///
    /// Empty text fields and empty lists are skipped, so the matching
    /// attribute ends up absent. The first builder error stops resolution and
    /// is returned as-is.
    pub fn resolve(&self) -> ConfigResult<Interface> {
        tracing::debug!(fields = ?self.staged_fields(), "Resolving staged interface");

        let mut builder = Interface::builder();
        self.forward_fields(&mut builder)
            .and_then(|()| builder.build())
            .inspect_err(|e| {
                tracing::debug!(
                    location = %e.location,
                    reason = %e.reason,
                    "Staged interface rejected"
                );
            })
    }

    fn forward_fields(&self, builder: &mut InterfaceBuilder) -> ConfigResult<()> {
        if !self.addresses.is_empty() {
            builder.parse_addresses(&self.addresses)?;
        }
        if !self.dns_servers.is_empty() {
            builder.parse_dns_servers(&self.dns_servers)?;
        }
        if !self.excluded_applications.is_empty() {
            builder.exclude_applications(&self.excluded_applications)?;
        }
        if !self.included_applications.is_empty() {
            builder.include_applications(&self.included_applications)?;
        }
        if !self.listen_port.is_empty() {
            builder.parse_listen_port(&self.listen_port)?;
        }
        if !self.mtu.is_empty() {
            builder.parse_mtu(&self.mtu)?;
        }
        if !self.private_key.is_empty() {
            builder.parse_private_key(&self.private_key)?;
        }
        if !self.jc.is_empty() {
            builder.parse_jc(&self.jc)?;
        }
        if !self.jmin.is_empty() {
            builder.parse_jmin(&self.jmin)?;
        }
        if !self.jmax.is_empty() {
            builder.parse_jmax(&self.jmax)?;
        }
        if !self.s1.is_empty() {
            builder.parse_s1(&self.s1)?;
        }
        if !self.s2.is_empty() {
            builder.parse_s2(&self.s2)?;
        }
        if !self.h1.is_empty() {
            builder.parse_h1(&self.h1)?;
        }
        if !self.h2.is_empty() {
            builder.parse_h2(&self.h2)?;
        }
        if !self.h3.is_empty() {
            builder.parse_h3(&self.h3)?;
        }
        if !self.h4.is_empty() {
            builder.parse_h4(&self.h4)?;
        }
        Ok(())
    }

    /// Write the byte-layout form.
    ///
    /// `s1`, `s2` and `h1`..`h4` are not part of the layout.
    pub fn to_bytes(&self) -> ParcelResult<Bytes> {
        let mut writer = ParcelWriter::new(PARCEL_VERSION);
        writer.write_string(&self.addresses)?;
        writer.write_string(&self.dns_servers)?;
        writer.write_string_list(&self.excluded_applications)?;
        writer.write_string_list(&self.included_applications)?;
        writer.write_string(&self.listen_port)?;
        writer.write_string(&self.mtu)?;
        writer.write_string(&self.private_key)?;
        writer.write_string(&self.jc)?;
        writer.write_string(&self.jmin)?;
        writer.write_string(&self.jmax)?;
        Ok(writer.finish())
    }

    /// Read a proxy written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> ParcelResult<Self> {
        let mut reader = ParcelReader::new(Bytes::copy_from_slice(bytes), PARCEL_VERSION)?;
        let mut proxy = Self::new();
        proxy.addresses = reader.read_string()?;
        proxy.dns_servers = reader.read_string()?;
        proxy.excluded_applications = reader.read_string_list()?;
        proxy.included_applications = reader.read_string_list()?;
        proxy.listen_port = reader.read_string()?;
        proxy.mtu = reader.read_string()?;
        proxy.private_key = reader.read_string()?;
        proxy.jc = reader.read_string()?;
        proxy.jmin = reader.read_string()?;
        proxy.jmax = reader.read_string()?;
        reader.finish()?;
        Ok(proxy)
    }
}

impl Default for InterfaceProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Interface> for InterfaceProxy {
    fn from(other: &Interface) -> Self {
        Self::from_interface(other)
    }
}

/// Copies staged values only; observers stay with the original.
impl Clone for InterfaceProxy {
    fn clone(&self) -> Self {
        Self {
            addresses: self.addresses.clone(),
            dns_servers: self.dns_servers.clone(),
            excluded_applications: self.excluded_applications.clone(),
            included_applications: self.included_applications.clone(),
            listen_port: self.listen_port.clone(),
            mtu: self.mtu.clone(),
            private_key: self.private_key.clone(),
            jc: self.jc.clone(),
            jmin: self.jmin.clone(),
            jmax: self.jmax.clone(),
            s1: self.s1.clone(),
            s2: self.s2.clone(),
            h1: self.h1.clone(),
            h2: self.h2.clone(),
            h3: self.h3.clone(),
            h4: self.h4.clone(),
            registry: PropertyChangeRegistry::new(),
        }
    }
}

impl PartialEq for InterfaceProxy {
    fn eq(&self, other: &Self) -> bool {
        self.addresses == other.addresses
            && self.dns_servers == other.dns_servers
            && self.excluded_applications == other.excluded_applications
            && self.included_applications == other.included_applications
            && self.listen_port == other.listen_port
            && self.mtu == other.mtu
            && self.private_key == other.private_key
            && self.jc == other.jc
            && self.jmin == other.jmin
            && self.jmax == other.jmax
            && self.s1 == other.s1
            && self.s2 == other.s2
            && self.h1 == other.h1
            && self.h2 == other.h2
            && self.h3 == other.h3
            && self.h4 == other.h4
    }
}

impl Eq for InterfaceProxy {}

impl fmt::Debug for InterfaceProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let private_key = if self.private_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("InterfaceProxy")
            .field("addresses", &self.addresses)
            .field("dns_servers", &self.dns_servers)
            .field("excluded_applications", &self.excluded_applications)
            .field("included_applications", &self.included_applications)
            .field("listen_port", &self.listen_port)
            .field("mtu", &self.mtu)
            .field("private_key", &private_key)
            .field("jc", &self.jc)
            .field("jmin", &self.jmin)
            .field("jmax", &self.jmax)
            .field("s1", &self.s1)
            .field("s2", &self.s2)
            .field("h1", &self.h1)
            .field("h2", &self.h2)
            .field("h3", &self.h3)
            .field("h4", &self.h4)
            .finish()
    }
}
