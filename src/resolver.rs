// 🔎 Reference Resolvers - where a pass finds records it was not handed directly
//
// A resolver answers "give me the flat record for this key". The pass maps
// the answer through the ordinary mappers, so pulled entities pass the same
// validation as everything else.
//
// Two variants:
// - MapResolver: closed, pre-seeded set backed by a map
// - FnResolver: callback invoked on demand
//
// The pass asks each resolver at most once per key and remembers the answer.

use crate::dispatcher::TargetKind;
use crate::entities::{EntityKind, GroupKind};
use crate::error::BuildError;
use crate::views::{FlatRecord, GroupView, LetterTemplateView, PartyView, PaymentTermView};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// REFERENCE
// ============================================================================

/// A relationship key that may need on-demand resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Group(GroupKind, i32),
    PaymentTerm(i32),
    LetterTemplate(i32),
    Organization(i32),
}

impl Reference {
    pub fn id(&self) -> i32 {
        match *self {
            Reference::Group(_, id)
            | Reference::PaymentTerm(id)
            | Reference::LetterTemplate(id)
            | Reference::Organization(id) => id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Reference::Group(kind, _) => EntityKind::Group(*kind),
            Reference::PaymentTerm(_) => EntityKind::PaymentTerm,
            Reference::LetterTemplate(_) => EntityKind::LetterTemplate,
            Reference::Organization(_) => EntityKind::Organization,
        }
    }

    /// Target kind a record resolved for this reference is built as
    pub fn target(&self) -> TargetKind {
        match self {
            Reference::Group(kind, _) => TargetKind::group(*kind),
            Reference::PaymentTerm(_) => TargetKind::PaymentTerm,
            Reference::LetterTemplate(_) => TargetKind::LetterTemplate,
            Reference::Organization(_) => TargetKind::Organization,
        }
    }

    pub(crate) fn not_found(&self) -> BuildError {
        BuildError::not_found(self.kind(), self.id())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

// ============================================================================
// RESOLVER TRAIT
// ============================================================================

pub trait ReferenceResolver {
    /// Flat record for `reference`, `Ok(None)` when this resolver does not know it.
    ///
    /// Errors are foreign failures (I/O, decoding); the pass wraps them as
    /// `BuildError::Unexpected`.
    fn resolve(&self, reference: &Reference) -> anyhow::Result<Option<FlatRecord>>;
}

impl<R: ReferenceResolver + ?Sized> ReferenceResolver for &R {
    fn resolve(&self, reference: &Reference) -> anyhow::Result<Option<FlatRecord>> {
        (**self).resolve(reference)
    }
}

impl<R: ReferenceResolver + ?Sized> ReferenceResolver for Box<R> {
    fn resolve(&self, reference: &Reference) -> anyhow::Result<Option<FlatRecord>> {
        (**self).resolve(reference)
    }
}

// ============================================================================
// MAP RESOLVER
// ============================================================================

/// Pre-seeded closed set of records
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    records: HashMap<Reference, FlatRecord>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: Reference, record: impl Into<FlatRecord>) {
        self.records.insert(reference, record.into());
    }

    pub fn with_groups(mut self, kind: GroupKind, views: impl IntoIterator<Item = GroupView>) -> Self {
        for view in views {
            self.insert(Reference::Group(kind, view.id), view);
        }
        self
    }

    pub fn with_payment_terms(mut self, views: impl IntoIterator<Item = PaymentTermView>) -> Self {
        for view in views {
            self.insert(Reference::PaymentTerm(view.id), view);
        }
        self
    }

    pub fn with_letter_templates(
        mut self,
        views: impl IntoIterator<Item = LetterTemplateView>,
    ) -> Self {
        for view in views {
            self.insert(Reference::LetterTemplate(view.id), view);
        }
        self
    }

    pub fn with_organizations(mut self, views: impl IntoIterator<Item = PartyView>) -> Self {
        for view in views {
            self.insert(Reference::Organization(view.id), view);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ReferenceResolver for MapResolver {
    fn resolve(&self, reference: &Reference) -> anyhow::Result<Option<FlatRecord>> {
        Ok(self.records.get(reference).cloned())
    }
}

// ============================================================================
// FN RESOLVER
// ============================================================================

/// Callback resolver; the callback must be idempotent for a given key
pub struct FnResolver<F> {
    resolve: F,
}

impl<F> FnResolver<F>
where
    F: Fn(&Reference) -> anyhow::Result<Option<FlatRecord>>,
{
    pub fn new(resolve: F) -> Self {
        FnResolver { resolve }
    }
}

impl<F> ReferenceResolver for FnResolver<F>
where
    F: Fn(&Reference) -> anyhow::Result<Option<FlatRecord>>,
{
    fn resolve(&self, reference: &Reference) -> anyhow::Result<Option<FlatRecord>> {
        (self.resolve)(reference)
    }
}

/// Shorthand for `FnResolver::new`
pub fn from_fn<F>(resolve: F) -> FnResolver<F>
where
    F: Fn(&Reference) -> anyhow::Result<Option<FlatRecord>>,
{
    FnResolver::new(resolve)
}

// ============================================================================
// RESOLVER CHAIN (per pass)
// ============================================================================

/// Ordered resolvers plus the per-pass memo of their answers
#[derive(Default)]
pub(crate) struct ResolverChain<'r> {
    resolvers: Vec<Box<dyn ReferenceResolver + 'r>>,
    answers: HashMap<Reference, Option<FlatRecord>>,
}

impl<'r> ResolverChain<'r> {
    pub(crate) fn push(&mut self, resolver: Box<dyn ReferenceResolver + 'r>) {
        self.resolvers.push(resolver);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// First answer from the resolvers in registration order, memoized per key.
    ///
    /// Misses are memoized too; failures are not.
    pub(crate) fn pull(&mut self, reference: &Reference) -> Result<Option<FlatRecord>, BuildError> {
        if let Some(answer) = self.answers.get(reference) {
            return Ok(answer.clone());
        }

        let mut answer = None;
        for resolver in &self.resolvers {
            let record = resolver.resolve(reference).map_err(|source| {
                BuildError::unexpected(format!("resolver failed for {}", reference), source)
            })?;
            if record.is_some() {
                answer = record;
                break;
            }
        }

        tracing::debug!(%reference, found = answer.is_some(), "pulled reference");
        self.answers.insert(*reference, answer.clone());
        Ok(answer)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn cash() -> PaymentTermView {
        PaymentTermView {
            id: 1,
            name: "Cash".to_string(),
        }
    }

    #[test]
    fn test_reference_target_and_kind() {
        let reference = Reference::Group(GroupKind::Budget, 4);
        assert_eq!(reference.kind(), EntityKind::Group(GroupKind::Budget));
        assert_eq!(reference.target(), TargetKind::BudgetGroup);
        assert_eq!(reference.to_string(), "budget group 4");
        assert_eq!(Reference::Organization(48).target(), TargetKind::Organization);
    }

    #[test]
    fn test_map_resolver_hits_and_misses() {
        let resolver = MapResolver::new().with_payment_terms(vec![cash()]);

        let hit = resolver.resolve(&Reference::PaymentTerm(1)).unwrap();
        assert_eq!(hit, Some(FlatRecord::PaymentTerm(cash())));

        let miss = resolver.resolve(&Reference::PaymentTerm(2)).unwrap();
        assert!(miss.is_none());

        // Same number, different kind
        assert!(resolver.resolve(&Reference::LetterTemplate(1)).unwrap().is_none());
    }

    #[test]
    fn test_chain_memoizes_hits_and_misses() {
        let calls = Cell::new(0);
        let resolver = from_fn(|reference: &Reference| {
            calls.set(calls.get() + 1);
            Ok(match reference {
                Reference::PaymentTerm(1) => Some(cash().into()),
                _ => None,
            })
        });

        let mut chain = ResolverChain::default();
        chain.push(Box::new(resolver));

        assert!(chain.pull(&Reference::PaymentTerm(1)).unwrap().is_some());
        assert!(chain.pull(&Reference::PaymentTerm(1)).unwrap().is_some());
        assert!(chain.pull(&Reference::PaymentTerm(2)).unwrap().is_none());
        assert!(chain.pull(&Reference::PaymentTerm(2)).unwrap().is_none());

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_chain_asks_resolvers_in_order() {
        let first = MapResolver::new().with_payment_terms(vec![cash()]);
        let second = from_fn(|_: &Reference| -> anyhow::Result<Option<FlatRecord>> {
            Ok(Some(
                PaymentTermView {
                    id: 1,
                    name: "Net 30".to_string(),
                }
                .into(),
            ))
        });

        let mut chain = ResolverChain::default();
        chain.push(Box::new(first));
        chain.push(Box::new(second));

        let record = chain.pull(&Reference::PaymentTerm(1)).unwrap();
        assert_eq!(record, Some(FlatRecord::PaymentTerm(cash())));
    }

    #[test]
    fn test_chain_wraps_resolver_failure() {
        let failing = from_fn(|_: &Reference| -> anyhow::Result<Option<FlatRecord>> {
            Err(anyhow::anyhow!("backend offline"))
        });

        let mut chain = ResolverChain::default();
        chain.push(Box::new(failing));

        match chain.pull(&Reference::Organization(48)) {
            Err(BuildError::Unexpected { context, source }) => {
                assert_eq!(context, "resolver failed for organization 48");
                assert_eq!(source.to_string(), "backend offline");
            }
            other => panic!("expected unexpected error, got {:?}", other),
        }
    }
}
