// 🏷️ Classification Group - named category for parties and accounts
//
// Three separate identity spaces share this type:
// - address groups (parties)
// - account groups (balance accounts)
// - budget groups (budget accounts)

use super::{Entity, EntityKind};
use crate::registry::{Arena, Registry};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// GROUP KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKind {
    /// Groups parties in the address book
    Address,

    /// Groups balance accounts
    Account,

    /// Groups budget accounts
    Budget,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Address => "Address",
            GroupKind::Account => "Account",
            GroupKind::Budget => "Budget",
        }
    }
}

/// Which side of the balance an account group sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSide {
    Assets,
    Liabilities,
}

// ============================================================================
// GROUP ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationGroup {
    pub id: i32,
    pub kind: GroupKind,
    pub name: String,

    /// Only meaningful for account groups.
    pub side: Option<BalanceSide>,
}

impl ClassificationGroup {
    pub fn new(kind: GroupKind, id: i32, name: String) -> Self {
        ClassificationGroup {
            id,
            kind,
            name,
            side: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub kind: GroupKind,
    pub id: i32,
}

impl GroupKey {
    pub fn new(kind: GroupKind, id: i32) -> Self {
        GroupKey { kind, id }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Entity for ClassificationGroup {
    type Key = GroupKey;

    fn key(&self) -> GroupKey {
        GroupKey::new(self.kind, self.id)
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Group(self.kind)
    }

    fn key_kind(key: &GroupKey) -> EntityKind {
        EntityKind::Group(key.kind)
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.groups
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.groups
    }
}
