//! Interface drafts: staged interface text kept in a TOML file.
//!
//! A draft holds exactly what an editor would hold. Nothing is parsed or
//! range-checked on load; numeric attributes may be written either as TOML
//! integers or as strings and are kept as text.
//!
//! ```toml
//! addresses = "10.0.0.2/32, fd00::2/128"
//! dns_servers = "1.1.1.1"
//! private_key = "yAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk="
//! mtu = 1420
//! excluded_applications = ["com.example.app"]
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::loader::{read_toml, ConfigError};
use crate::staging::InterfaceProxy;

/// Text mirror of every staged interface field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterfaceDraft {
    pub addresses: String,
    pub dns_servers: String,
    pub excluded_applications: Vec<String>,
    pub included_applications: Vec<String>,
    #[serde(deserialize_with = "text_or_integer")]
    pub listen_port: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub mtu: String,
    pub private_key: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub jc: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub jmin: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub jmax: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub s1: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub s2: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub h1: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub h2: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub h3: String,
    #[serde(deserialize_with = "text_or_integer")]
    pub h4: String,
}

fn text_or_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(value) => value.to_string(),
    })
}

impl InterfaceDraft {
    /// Stage the draft in a fresh proxy.
    pub fn into_proxy(self) -> InterfaceProxy {
        let mut proxy = InterfaceProxy::new();
        proxy.set_addresses(self.addresses);
        proxy.set_dns_servers(self.dns_servers);
        proxy.set_excluded_applications(self.excluded_applications);
        proxy.set_included_applications(self.included_applications);
        proxy.set_listen_port(self.listen_port);
        proxy.set_mtu(self.mtu);
        proxy.set_private_key(self.private_key);
        proxy.set_jc(self.jc);
        proxy.set_jmin(self.jmin);
        proxy.set_jmax(self.jmax);
        proxy.set_s1(self.s1);
        proxy.set_s2(self.s2);
        proxy.set_h1(self.h1);
        proxy.set_h2(self.h2);
        proxy.set_h3(self.h3);
        proxy.set_h4(self.h4);
        proxy
    }

    /// Capture the staged text of a proxy.
    pub fn from_proxy(proxy: &InterfaceProxy) -> Self {
        Self {
            addresses: proxy.addresses().to_string(),
            dns_servers: proxy.dns_servers().to_string(),
            excluded_applications: proxy.excluded_applications().to_vec(),
            included_applications: proxy.included_applications().to_vec(),
            listen_port: proxy.listen_port().to_string(),
            mtu: proxy.mtu().to_string(),
            private_key: proxy.private_key().to_string(),
            jc: proxy.jc().to_string(),
            jmin: proxy.jmin().to_string(),
            jmax: proxy.jmax().to_string(),
            s1: proxy.s1().to_string(),
            s2: proxy.s2().to_string(),
            h1: proxy.h1().to_string(),
            h2: proxy.h2().to_string(),
            h3: proxy.h3().to_string(),
            h4: proxy.h4().to_string(),
        }
    }
}

/// Load a draft from a TOML file.
pub fn load_draft(path: &Path) -> Result<InterfaceDraft, ConfigError> {
    let draft: InterfaceDraft = read_toml(path)?;
    tracing::debug!(path = %path.display(), "Interface draft loaded");
    Ok(draft)
}
