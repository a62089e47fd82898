//! Member introspection for providers
//!
//! Providers describe the members they expose so a router can answer
//! "does this member exist" and "which members are there" on their behalf.

use serde::{Deserialize, Serialize};

/// Whether a member is an operation or a plain value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
}

/// Descriptor of a single provider member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub kind: MemberKind,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl MemberDescriptor {
    /// A read-only, enumerable, non-configurable method
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            writable: false,
            enumerable: true,
            configurable: false,
        }
    }

    /// A read-only, enumerable, non-configurable property
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            writable: false,
            enumerable: true,
            configurable: false,
        }
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    pub fn configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }
}

/// Providers that can describe their own members
pub trait Introspect {
    /// Every member the provider exposes
    fn members(&self) -> Vec<MemberDescriptor>;

    fn has_member(&self, name: &str) -> bool {
        self.members().iter().any(|m| m.name == name)
    }

    /// Names of enumerable members, in declaration order
    fn member_names(&self) -> Vec<String> {
        self.members()
            .into_iter()
            .filter(|m| m.enumerable)
            .map(|m| m.name)
            .collect()
    }

    fn describe(&self, name: &str) -> Option<MemberDescriptor> {
        self.members().into_iter().find(|m| m.name == name)
    }
}
