//! Byte layout of a staging record.

mod common;

use common::{populated_proxy, PRIVATE_KEY};
use wg_interface_proxy::staging::{InterfaceProxy, ParcelError, PARCEL_VERSION};

#[test]
fn test_ten_fields_survive() {
    let proxy = populated_proxy();
    let restored = InterfaceProxy::from_bytes(&proxy.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, proxy);
    assert_eq!(restored.private_key(), PRIVATE_KEY);
}

#[test]
fn test_empty_proxy_layout() {
    let bytes = InterfaceProxy::new().to_bytes().unwrap();
    // version + ten zero-length prefixes
    assert_eq!(bytes.len(), 4 + 10 * 4);
    assert_eq!(&bytes[..4], &PARCEL_VERSION.to_be_bytes());
    assert!(bytes[4..].iter().all(|b| *b == 0));
    assert_eq!(InterfaceProxy::from_bytes(&bytes).unwrap(), InterfaceProxy::new());
}

#[test]
fn test_field_order() {
    let mut proxy = InterfaceProxy::new();
    proxy.set_addresses("a");
    proxy.set_jmax("z");
    let bytes = proxy.to_bytes().unwrap();

    assert_eq!(&bytes[4..9], &[0, 0, 0, 1, b'a']);
    assert_eq!(&bytes[bytes.len() - 5..], &[0, 0, 0, 1, b'z']);
}

#[test]
fn test_obfuscation_fields_dropped() {
    let mut proxy = populated_proxy();
    proxy.set_s1("15");
    proxy.set_s2("18");
    proxy.set_h1("1");
    proxy.set_h2("2");
    proxy.set_h3("3");
    proxy.set_h4("4");

    let restored = InterfaceProxy::from_bytes(&proxy.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, populated_proxy());
}

#[test]
fn test_restored_proxy_resolves_the_same() {
    let proxy = populated_proxy();
    let restored = InterfaceProxy::from_bytes(&proxy.to_bytes().unwrap()).unwrap();
    assert_eq!(restored.resolve().unwrap(), proxy.resolve().unwrap());
}

#[test]
fn test_wrong_version() {
    let mut bytes = InterfaceProxy::new().to_bytes().unwrap().to_vec();
    bytes[3] = 9;
    assert_eq!(
        InterfaceProxy::from_bytes(&bytes).unwrap_err(),
        ParcelError::UnsupportedVersion(9)
    );
}

#[test]
fn test_corrupt_input() {
    let bytes = populated_proxy().to_bytes().unwrap();
    for cut in [0, 3, 10, bytes.len() / 2, bytes.len() - 1] {
        assert!(matches!(
            InterfaceProxy::from_bytes(&bytes[..cut]),
            Err(ParcelError::UnexpectedEof { .. })
        ));
    }

    let mut padded = bytes.to_vec();
    padded.push(0);
    assert_eq!(
        InterfaceProxy::from_bytes(&padded).unwrap_err(),
        ParcelError::TrailingBytes(1)
    );
}
