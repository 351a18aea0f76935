// src/data/references.rs

//! Reference dictionaries.
//!
//! Records refer to users, computers, applications, event kinds, metadata,
//! work servers and ports by small integer codes. The header file of the
//! journal (`1Cv8.lgf`) maps those codes to full values. Each category is a
//! separate [`Dictionary`]; codes are unique within one dictionary but not
//! across dictionaries.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Result;

use ::serde::{
    Deserialize,
    Serialize,
};
use ::sha2::{
    Digest,
    Sha256,
};

use crate::data::record::{
    Severity,
    TransactionStatus,
};

/// Code of a reference entry as written in the journal.
pub type Code = i64;

/// Hex digest over all dictionaries, see [`ReferenceDictionaries::fingerprint`].
pub type Fingerprint = String;

/// Declare a reference entry that is a `code` and a `name`.
macro_rules! named_reference {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub code: Code,
            pub name: String,
        }

        impl $name {
            pub fn new(code: Code, name: String) -> $name {
                $name { code, name }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.name)
            }
        }
    };
}

/// Declare a reference entry that is a `code` and a port number.
macro_rules! port_reference {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub code: Code,
            pub port: i64,
        }

        impl $name {
            pub fn new(code: Code, port: i64) -> $name {
                $name { code, port }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.port)
            }
        }
    };
}

/// An infobase user, header type `1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub code: Code,
    pub uuid: String,
    pub name: String,
}

impl User {
    pub fn new(code: Code, uuid: String, name: String) -> User {
        User { code, uuid, name }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A metadata object, header type `5`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    pub code: Code,
    pub uuid: String,
    pub name: String,
}

impl Metadata {
    pub fn new(code: Code, uuid: String, name: String) -> Metadata {
        Metadata { code, uuid, name }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

named_reference!(
    /// A client computer, header type `2`.
    Computer
);
named_reference!(
    /// A client application kind, header type `3`.
    Application
);
named_reference!(
    /// An event kind, e.g. `_$Session$_.Start`, header type `4`.
    EventKind
);
named_reference!(
    /// A cluster work server, header type `6`.
    WorkServer
);
port_reference!(
    /// Main port of a work server, header type `7`.
    PrimaryPort
);
port_reference!(
    /// Secondary port of a work server, header type `8`.
    SecondaryPort
);

/// A code → entry lookup table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dictionary<T> {
    entries: BTreeMap<Code, T>,
}

impl<T> Default for Dictionary<T> {
    fn default() -> Dictionary<T> {
        Dictionary {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Dictionary<T> {
    pub fn new() -> Dictionary<T> {
        Dictionary::default()
    }

    /// Insert `entry` for `code`. A later entry for the same code replaces
    /// the earlier one.
    pub fn insert(
        &mut self,
        code: Code,
        entry: T,
    ) {
        self.entries.insert(code, entry);
    }

    pub fn get(
        &self,
        code: Code,
    ) -> Option<&T> {
        self.entries.get(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending `Code` order.
    pub fn iter(&self) -> btree_map::Iter<'_, Code, T> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// All eight reference dictionaries of one journal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceDictionaries {
    pub users: Dictionary<User>,
    pub computers: Dictionary<Computer>,
    pub applications: Dictionary<Application>,
    pub events: Dictionary<EventKind>,
    pub metadata: Dictionary<Metadata>,
    pub work_servers: Dictionary<WorkServer>,
    pub primary_ports: Dictionary<PrimaryPort>,
    pub secondary_ports: Dictionary<SecondaryPort>,
}

/// Everything covered by the fingerprint, in a fixed order.
#[derive(Serialize)]
struct FingerprintData<'a> {
    applications: &'a Dictionary<Application>,
    computers: &'a Dictionary<Computer>,
    events: &'a Dictionary<EventKind>,
    metadata: &'a Dictionary<Metadata>,
    primary_ports: &'a Dictionary<PrimaryPort>,
    secondary_ports: &'a Dictionary<SecondaryPort>,
    severities: Vec<Severity>,
    transaction_statuses: Vec<TransactionStatus>,
    users: &'a Dictionary<User>,
    work_servers: &'a Dictionary<WorkServer>,
}

impl ReferenceDictionaries {
    pub fn new() -> ReferenceDictionaries {
        ReferenceDictionaries::default()
    }

    /// Total count of entries in all dictionaries.
    pub fn len(&self) -> usize {
        self.users.len()
            + self.computers.len()
            + self.applications.len()
            + self.events.len()
            + self.metadata.len()
            + self.work_servers.len()
            + self.primary_ports.len()
            + self.secondary_ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.users.clear();
        self.computers.clear();
        self.applications.clear();
        self.events.clear();
        self.metadata.clear();
        self.work_servers.clear();
        self.primary_ports.clear();
        self.secondary_ports.clear();
    }

    pub fn user_by_code(
        &self,
        code: Code,
    ) -> Option<&User> {
        self.users.get(code)
    }

    pub fn computer_by_code(
        &self,
        code: Code,
    ) -> Option<&Computer> {
        self.computers.get(code)
    }

    pub fn application_by_code(
        &self,
        code: Code,
    ) -> Option<&Application> {
        self.applications.get(code)
    }

    pub fn event_by_code(
        &self,
        code: Code,
    ) -> Option<&EventKind> {
        self.events.get(code)
    }

    pub fn metadata_by_code(
        &self,
        code: Code,
    ) -> Option<&Metadata> {
        self.metadata.get(code)
    }

    pub fn work_server_by_code(
        &self,
        code: Code,
    ) -> Option<&WorkServer> {
        self.work_servers.get(code)
    }

    pub fn primary_port_by_code(
        &self,
        code: Code,
    ) -> Option<&PrimaryPort> {
        self.primary_ports.get(code)
    }

    pub fn secondary_port_by_code(
        &self,
        code: Code,
    ) -> Option<&SecondaryPort> {
        self.secondary_ports.get(code)
    }

    /// SHA-256 hex digest over every entry of every dictionary plus the
    /// fixed [`Severity`] and [`TransactionStatus`] enumerations.
    ///
    /// Only for change detection between two refreshes.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        let data = FingerprintData {
            applications: &self.applications,
            computers: &self.computers,
            events: &self.events,
            metadata: &self.metadata,
            primary_ports: &self.primary_ports,
            secondary_ports: &self.secondary_ports,
            severities: Severity::iterator().copied().collect(),
            transaction_statuses: TransactionStatus::iterator().copied().collect(),
            users: &self.users,
            work_servers: &self.work_servers,
        };
        let mut hasher = Sha256::new();
        serde_json::to_writer(&mut hasher, &data)?;

        Ok(hex::encode(hasher.finalize()))
    }
}
