//! Process-wide namespace behavior.
//!
//! These tests mutate the global registry, so they live in their own test
//! binary and run one after another through a shared lock.

use parking_lot::Mutex;
use plistkit::plist::{self, TypeKind, WriteOptions};

static SERIAL: Mutex<()> = Mutex::new(());

#[test]
fn merge_global_adds_aliases() {
    let _guard = SERIAL.lock();
    plist::reset_global();

    plist::merge_global([(TypeKind::Integer, vec!["num", "integer"])]).unwrap();
    {
        let ns = plist::global();
        assert!(ns.is_kind("num", TypeKind::Integer));
        assert!(ns.is_kind("integer", TypeKind::Integer));
        assert!(ns.is_kind("key", TypeKind::Key));
        assert!(!ns.is_kind("num", TypeKind::Real));
    }

    let root = plist::parse_str("<plist><dict><key>a</key><num>7</num></dict></plist>").unwrap();
    assert_eq!(root.get("a").unwrap().kind(), TypeKind::Integer);
    assert_eq!(root.get("a").unwrap().text(), Some("7"));

    // canonical spelling follows the merged list
    let mut dict = plist::PlistNode::dict();
    dict.set("b", plist::PlistNode::integer(1)).unwrap();
    assert_eq!(
        plist::to_xml_string(&dict, &WriteOptions::default()).unwrap(),
        "<plist><dict><key>b</key><num>1</num></dict></plist>"
    );

    plist::reset_global();
}

#[test]
fn reset_global_restores_defaults() {
    let _guard = SERIAL.lock();
    plist::merge_global([(TypeKind::Integer, vec!["int"])]).unwrap();
    assert!(plist::parse_str("<array><integer>1</integer></array>").is_err());

    plist::reset_global();
    assert!(!plist::global().contains("int"));
    let root = plist::parse_str("<array><integer>1</integer></array>").unwrap();
    assert_eq!(root.len(), 1);
}

#[test]
fn rejected_merge_leaves_global_untouched() {
    let _guard = SERIAL.lock();
    plist::reset_global();

    let result = plist::merge_global([
        (TypeKind::Integer, vec!["int"]),
        (TypeKind::Real, Vec::new()),
    ]);
    assert!(matches!(result, Err(plistkit::Error::Value(_))));
    assert!(!plist::global().contains("int"));
    assert_eq!(plist::global().canonical(TypeKind::Integer), "integer");
}
