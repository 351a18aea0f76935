// src/tests/references_tests.rs

#![allow(non_snake_case)]

use crate::data::record::{
    Severity,
    TransactionStatus,
};
use crate::data::references::{
    Computer,
    Dictionary,
    EventKind,
    Fingerprint,
    Metadata,
    PrimaryPort,
    ReferenceDictionaries,
    SecondaryPort,
    User,
    WorkServer,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn new_references() -> ReferenceDictionaries {
    let mut references = ReferenceDictionaries::new();
    references.users.insert(1, User::new(1, String::from("uuid-1"), String::from("Administrator")));
    references.computers.insert(1, Computer::new(1, String::from("WORKSTATION-01")));
    references.events.insert(4, EventKind::new(4, String::from("_$Data$_.New")));
    references.metadata.insert(1, Metadata::new(1, String::from("uuid-m"), String::from("Catalog.Goods")));
    references.work_servers.insert(1, WorkServer::new(1, String::from("srv-01")));
    references.primary_ports.insert(1, PrimaryPort::new(1, 1541));
    references.secondary_ports.insert(1, SecondaryPort::new(1, 1560));
    references
}

#[test]
fn test_Dictionary() {
    let mut dictionary: Dictionary<Computer> = Dictionary::new();
    assert!(dictionary.is_empty());
    dictionary.insert(2, Computer::new(2, String::from("b")));
    dictionary.insert(1, Computer::new(1, String::from("a")));
    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.get(1).map(|c| c.name.as_str()), Some("a"));
    assert_eq!(dictionary.get(3), None);
    let codes: Vec<i64> = dictionary.iter().map(|(code, _)| *code).collect();
    assert_eq!(codes, vec![1, 2]);
    // a later entry for the same code replaces the earlier
    dictionary.insert(1, Computer::new(1, String::from("c")));
    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.get(1).map(|c| c.name.as_str()), Some("c"));
}

#[test]
fn test_by_code() {
    let references = new_references();
    assert_eq!(references.len(), 7);
    assert_eq!(references.user_by_code(1).map(|u| u.uuid.as_str()), Some("uuid-1"));
    assert_eq!(references.user_by_code(2), None);
    assert_eq!(references.computer_by_code(1).map(|c| c.to_string()), Some(String::from("WORKSTATION-01")));
    assert_eq!(references.application_by_code(1), None);
    assert_eq!(references.event_by_code(4).map(|e| e.name.as_str()), Some("_$Data$_.New"));
    assert_eq!(references.metadata_by_code(1).map(|m| m.name.as_str()), Some("Catalog.Goods"));
    assert_eq!(references.work_server_by_code(1).map(|w| w.name.as_str()), Some("srv-01"));
    assert_eq!(references.primary_port_by_code(1).map(|p| p.port), Some(1541));
    assert_eq!(references.secondary_port_by_code(1).map(|p| p.port), Some(1560));
}

#[test]
fn test_clear() {
    let mut references = new_references();
    assert!(!references.is_empty());
    references.clear();
    assert!(references.is_empty());
}

#[test]
fn test_fingerprint_stable() {
    let fp1: Fingerprint = new_references().fingerprint().unwrap();
    let fp2: Fingerprint = new_references().fingerprint().unwrap();
    assert_eq!(fp1, fp2);
    // hex SHA-256
    assert_eq!(fp1.len(), 64);
    assert!(fp1.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_fingerprint_insert_order() {
    let mut a = ReferenceDictionaries::new();
    a.computers.insert(1, Computer::new(1, String::from("a")));
    a.computers.insert(2, Computer::new(2, String::from("b")));
    let mut b = ReferenceDictionaries::new();
    b.computers.insert(2, Computer::new(2, String::from("b")));
    b.computers.insert(1, Computer::new(1, String::from("a")));
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn test_fingerprint_changes() {
    let fp0: Fingerprint = new_references().fingerprint().unwrap();

    let mut references = new_references();
    references.users.insert(2, User::new(2, String::from("uuid-2"), String::from("Clerk")));
    assert_ne!(fp0, references.fingerprint().unwrap(), "added user");

    let mut references = new_references();
    references.secondary_ports.insert(2, SecondaryPort::new(2, 1561));
    assert_ne!(fp0, references.fingerprint().unwrap(), "added port");

    let mut references = new_references();
    references.computers.insert(1, Computer::new(1, String::from("renamed")));
    assert_ne!(fp0, references.fingerprint().unwrap(), "renamed computer");
}

#[test]
fn test_fingerprint_same_entry_other_dictionary() {
    let mut a = ReferenceDictionaries::new();
    a.computers.insert(1, Computer::new(1, String::from("x")));
    let mut b = ReferenceDictionaries::new();
    b.work_servers.insert(1, WorkServer::new(1, String::from("x")));
    assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn test_fingerprint_empty() {
    let fp = ReferenceDictionaries::new().fingerprint().unwrap();
    assert_eq!(fp.len(), 64);
}

#[test]
fn test_enumerations() {
    assert_eq!(Severity::iterator().count(), 5);
    assert_eq!(TransactionStatus::iterator().count(), 5);
    assert_eq!(Severity::from_code("W"), Severity::Warning);
    assert_eq!(Severity::from_code("N"), Severity::Note);
    assert_eq!(Severity::from_code("?"), Severity::Unknown);
    assert_eq!(TransactionStatus::from_code("R"), TransactionStatus::Unfinished);
    assert_eq!(TransactionStatus::from_code("C"), TransactionStatus::RolledBack);
    assert_eq!(TransactionStatus::from_code(""), TransactionStatus::Unknown);
    assert_eq!(Severity::Error.to_string(), "Error");
}
