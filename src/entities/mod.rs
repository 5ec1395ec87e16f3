// Entity Models - the typed nodes of one build pass
//
// Each entity:
// - lives in an arena owned by the pass `Registry`
// - has an identity key that is unique within its arena
// - points at other entities through `Id<T>` handles, never through copies
//
// Two relationship fields naming the same identity hold the same handle, so
// they reach the same instance.

pub mod group;
pub mod payment_term;
pub mod postal_code;
pub mod letter_template;
pub mod party;
pub mod account_book;
pub mod account;
pub mod time_series;
pub mod ledger_line;

pub use group::{BalanceSide, ClassificationGroup, GroupKey, GroupKind};
pub use payment_term::PaymentTerm;
pub use postal_code::{PostalCode, PostalCodeKey};
pub use letter_template::LetterTemplate;
pub use party::{OrganizationDetails, Party, PartyDetails, PartyRole, PersonDetails};
pub use account_book::AccountBook;
pub use account::{Account, AccountDetails, AccountKey, AccountKind};
pub use time_series::{BudgetRecord, CreditRecord, Period, PeriodRecord};
pub use ledger_line::{LedgerLine, LedgerLineKey};

use crate::registry::{Arena, Registry};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Group(GroupKind),
    PaymentTerm,
    PostalCode,
    LetterTemplate,
    /// Either party variant; used where the concrete kind is not known.
    Party,
    Person,
    Organization,
    AccountBook,
    /// Either account variant; used where the concrete kind is not known.
    Account,
    BalanceAccount,
    BudgetAccount,
    LedgerLine,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Group(GroupKind::Address) => "address group",
            EntityKind::Group(GroupKind::Account) => "account group",
            EntityKind::Group(GroupKind::Budget) => "budget group",
            EntityKind::PaymentTerm => "payment term",
            EntityKind::PostalCode => "postal code",
            EntityKind::LetterTemplate => "letter template",
            EntityKind::Party => "party",
            EntityKind::Person => "person",
            EntityKind::Organization => "organization",
            EntityKind::AccountBook => "account book",
            EntityKind::Account => "account",
            EntityKind::BalanceAccount => "balance account",
            EntityKind::BudgetAccount => "budget account",
            EntityKind::LedgerLine => "ledger line",
        }
    }

    pub fn is_classification_group(&self) -> bool {
        matches!(self, EntityKind::Group(_))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TYPED HANDLE
// ============================================================================

/// Handle to an entity inside one `Registry`.
///
/// Handles are only meaningful for the registry that issued them. Equal
/// handles mean the same instance.
pub struct Id<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub(crate) fn new(index: usize) -> Self {
        Id {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index)
    }
}

// ============================================================================
// ENTITY TRAIT
// ============================================================================

/// An entity kind stored in the pass registry.
pub trait Entity: Sized + 'static {
    /// Identity within the arena of this entity type.
    type Key: Clone + Eq + Hash + fmt::Debug + fmt::Display;

    fn key(&self) -> Self::Key;

    /// Concrete kind of this instance (for error reporting).
    fn kind(&self) -> EntityKind;

    /// Kind reported when a key of this type cannot be resolved.
    fn key_kind(key: &Self::Key) -> EntityKind;

    fn arena(registry: &Registry) -> &Arena<Self>;

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self>;
}
