// 🗂️ Identifier Registry - one arena per entity kind, scoped to a build pass
//
// "One identity, one instance": every (kind, key) maps to exactly one slot.
// Relationship fields store the slot's `Id<T>`, so reference equality is
// handle equality.
//
// The registry is owned by a single pass and never shared; a second pass over
// the same data gets its own registry and its own instances.

use crate::entities::{
    Account, AccountBook, ClassificationGroup, Entity, Id, LedgerLine, LetterTemplate, Party,
    PaymentTerm, PostalCode,
};
use crate::error::BuildError;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

// ============================================================================
// ARENA
// ============================================================================

/// Storage for one entity type plus its identity index
pub struct Arena<T: Entity> {
    items: Vec<T>,
    index: HashMap<T::Key, Id<T>>,
}

impl<T: Entity> Arena<T> {
    pub fn new() -> Self {
        Arena {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    /// Pure lookup by identity; never constructs
    pub fn lookup(&self, key: &T::Key) -> Option<Id<T>> {
        self.index.get(key).copied()
    }

    /// All entities in registration order
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (Id::new(index), item))
    }

    fn insert(&mut self, entity: T) -> Result<Id<T>, BuildError> {
        let key = entity.key();
        if self.index.contains_key(&key) {
            return Err(BuildError::duplicate(entity.kind(), &key));
        }

        let id = Id::new(self.items.len());
        self.items.push(entity);
        self.index.insert(key, id);
        Ok(id)
    }

    fn truncate(&mut self, len: usize) {
        if len >= self.items.len() {
            return;
        }
        self.items.truncate(len);
        self.index.retain(|_, id| id.index() < len);
    }

    fn items_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.iter_mut()
    }
}

impl<T: Entity> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Arena sizes at a point in time; everything registered later can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    groups: usize,
    payment_terms: usize,
    postal_codes: usize,
    letter_templates: usize,
    parties: usize,
    account_books: usize,
    accounts: usize,
    ledger_lines: usize,
}

/// The object graph of one build pass
#[derive(Default)]
pub struct Registry {
    pub(crate) groups: Arena<ClassificationGroup>,
    pub(crate) payment_terms: Arena<PaymentTerm>,
    pub(crate) postal_codes: Arena<PostalCode>,
    pub(crate) letter_templates: Arena<LetterTemplate>,
    pub(crate) parties: Arena<Party>,
    pub(crate) account_books: Arena<AccountBook>,
    pub(crate) accounts: Arena<Account>,
    pub(crate) ledger_lines: Arena<LedgerLine>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new instance under its identity.
    ///
    /// Fails with `DuplicateIdentity` if the identity is already taken in this pass.
    pub fn register<T: Entity>(&mut self, entity: T) -> Result<Id<T>, BuildError> {
        let kind = entity.kind();
        let id = T::arena_mut(self).insert(entity)?;
        tracing::debug!(%kind, slot = id.index(), "registered");
        Ok(id)
    }

    pub fn lookup<T: Entity>(&self, key: &T::Key) -> Option<Id<T>> {
        T::arena(self).lookup(key)
    }

    /// Lookup that reports a missing identity as `ReferenceNotFound`
    pub fn resolve<T: Entity>(&self, key: &T::Key) -> Result<Id<T>, BuildError> {
        self.lookup(key)
            .ok_or_else(|| BuildError::not_found(T::key_kind(key), key))
    }

    pub fn get<T: Entity>(&self, id: Id<T>) -> Option<&T> {
        T::arena(self).get(id)
    }

    pub fn get_mut<T: Entity>(&mut self, id: Id<T>) -> Option<&mut T> {
        T::arena_mut(self).get_mut(id)
    }

    /// Lookup by identity, returning the instance itself
    pub fn find<T: Entity>(&self, key: &T::Key) -> Option<&T> {
        self.lookup(key).and_then(|id| self.get(id))
    }

    pub fn iter<T: Entity>(&self) -> impl Iterator<Item = (Id<T>, &T)> + '_ {
        T::arena(self).iter()
    }

    pub fn count<T: Entity>(&self) -> usize {
        T::arena(self).len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
            && self.payment_terms.is_empty()
            && self.postal_codes.is_empty()
            && self.letter_templates.is_empty()
            && self.parties.is_empty()
            && self.account_books.is_empty()
            && self.accounts.is_empty()
            && self.ledger_lines.is_empty()
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            groups: self.groups.len(),
            payment_terms: self.payment_terms.len(),
            postal_codes: self.postal_codes.len(),
            letter_templates: self.letter_templates.len(),
            parties: self.parties.len(),
            account_books: self.account_books.len(),
            accounts: self.accounts.len(),
            ledger_lines: self.ledger_lines.len(),
        }
    }

    /// Undo every registration made after `checkpoint`.
    ///
    /// Handles only grow, so anything with an index at or past the checkpoint
    /// is newer; back-collections of surviving entities are pruned of them.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.groups.truncate(checkpoint.groups);
        self.payment_terms.truncate(checkpoint.payment_terms);
        self.postal_codes.truncate(checkpoint.postal_codes);
        self.letter_templates.truncate(checkpoint.letter_templates);
        self.parties.truncate(checkpoint.parties);
        self.account_books.truncate(checkpoint.account_books);
        self.accounts.truncate(checkpoint.accounts);
        self.ledger_lines.truncate(checkpoint.ledger_lines);

        for party in self.parties.items_mut() {
            party.prune(checkpoint.parties, checkpoint.ledger_lines);
        }
        for book in self.account_books.items_mut() {
            book.prune(checkpoint.accounts);
        }
        for account in self.accounts.items_mut() {
            account.prune(checkpoint.ledger_lines);
        }
    }
}

/// Panics if `id` was not issued by this registry.
impl<T: Entity> Index<Id<T>> for Registry {
    type Output = T;

    fn index(&self, id: Id<T>) -> &T {
        &T::arena(self).items[id.index()]
    }
}

impl<T: Entity> IndexMut<Id<T>> for Registry {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        &mut T::arena_mut(self).items[id.index()]
    }
}

// ============================================================================
// TESTS
// ============================================================================
