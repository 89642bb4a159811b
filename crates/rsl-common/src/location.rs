//! Declaring locations of compilation units.
//!
//! A `Location` is part of the nominal identity of every composite and
//! interface type: two declarations with the same qualified identifier in
//! different locations are different types. The location also contributes
//! the prefix of a type's stable `TypeId` string:
//!
//! | Location | Prefix | Example `TypeId` |
//! |----------|--------|------------------|
//! | String | `S` | `S.test.Foo` |
//! | Identifier | `I` | `I.Crypto.Foo` |
//! | Address | `A` | `A.0000000000000001.Foo` |
//! | Transaction | `t` | `t.a1b2.Foo` |
//! | Script | `s` | `s.a1b2.Foo` |
//! | REPL | `REPL` | `REPL.Foo` |

use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Location {
    /// A named in-memory unit, mostly used by tests and tooling.
    String(String),
    /// A built-in unit addressed by name.
    Identifier(String),
    /// Code stored in an account.
    Address(u64),
    /// A transaction, identified by the hex encoding of its hash.
    Transaction(String),
    /// A script, identified by the hex encoding of its hash.
    Script(String),
    Repl,
}

impl Location {
    /// The location kind prefix used in `TypeId` strings.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::String(_) => "S",
            Self::Identifier(_) => "I",
            Self::Address(_) => "A",
            Self::Transaction(_) => "t",
            Self::Script(_) => "s",
            Self::Repl => "REPL",
        }
    }

    /// The location's own identifier, including the kind prefix.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::String(name) | Self::Identifier(name) => format!("{}.{name}", self.prefix()),
            Self::Address(address) => format!("{}.{address:016x}", self.prefix()),
            Self::Transaction(hash) | Self::Script(hash) => format!("{}.{hash}", self.prefix()),
            Self::Repl => self.prefix().to_string(),
        }
    }

    /// Builds the `TypeId` string of a type declared in this location.
    #[must_use]
    pub fn type_id(&self, qualified_identifier: &str) -> String {
        let mut id = self.id();
        id.push('.');
        id.push_str(qualified_identifier);
        id
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(name) | Self::Identifier(name) => f.write_str(name),
            Self::Address(address) => write!(f, "0x{address:016x}"),
            Self::Transaction(hash) | Self::Script(hash) => f.write_str(hash),
            Self::Repl => f.write_str("REPL"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/location_tests.rs"]
mod tests;
