//! Shared fixtures for integration tests.

use std::path::PathBuf;

use wg_interface_proxy::staging::InterfaceProxy;

/// Known private key and the public key x25519 derives from it.
pub const PRIVATE_KEY: &str = "LAr1aNSNF9d0MjwUgAVC4020T0N/E5NUtqVv5EnsSz0=";
pub const PUBLIC_KEY: &str = "TYgl6QQ73tlGKiaV5zV701XqI+M6KGoUJI9kC+n4uUk=";

/// Second known pair.
#[allow(dead_code)]
pub const OTHER_PRIVATE_KEY: &str = "yAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk=";
#[allow(dead_code)]
pub const OTHER_PUBLIC_KEY: &str = "HIgo9xNzJMWLKASShiTqIybxZ0U3wGLiUeJ1PKf8ykw=";

/// Proxy with every field that survives the byte layout filled in.
#[allow(dead_code)]
pub fn populated_proxy() -> InterfaceProxy {
    let mut proxy = InterfaceProxy::new();
    proxy.set_addresses("10.0.0.2/32, fd00::2/128");
    proxy.set_dns_servers("1.1.1.1, 2606:4700:4700::1111, corp.example");
    proxy.set_excluded_applications(["com.example.browser", "com.example.mail"]);
    proxy.set_listen_port("51820");
    proxy.set_mtu("1420");
    proxy.set_private_key(PRIVATE_KEY);
    proxy.set_jc("4");
    proxy.set_jmin("40");
    proxy.set_jmax("70");
    proxy
}

/// Per-process path under the temp directory. Callers remove the file.
#[allow(dead_code)]
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "wg_interface_proxy_it_{}_{}",
        std::process::id(),
        name
    ))
}
