// 🚦 Generic Build Dispatcher - single entry point of a build pass
//
// The caller names the target kind; the dispatcher routes the flat record to
// the matching mapper. Unknown (record, target) pairs are rejected.
//
// Every public build is all-or-nothing: the registry is checkpointed before
// the build and rolled back if anything fails, so a failed build leaves no
// trace in the graph.

use crate::entities::{
    AccountBook, ClassificationGroup, Entity, GroupKind, Id, LetterTemplate, Party, PartyRole,
    PaymentTerm, PostalCode,
};
use crate::error::BuildError;
use crate::options::BuildOptions;
use crate::registry::Registry;
use crate::resolver::{Reference, ReferenceResolver, ResolverChain};
use crate::views::{AccountBookView, FlatRecord, GroupView, LetterTemplateView, PartyView, PaymentTermView, PostalCodeView};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// TARGET KIND
// ============================================================================

/// Output kind requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    AddressGroup,
    AccountGroup,
    BudgetGroup,
    PaymentTerm,
    PostalCode,
    LetterTemplate,
    Person,
    Organization,
    AccountBook,
}

impl TargetKind {
    pub fn group(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Address => TargetKind::AddressGroup,
            GroupKind::Account => TargetKind::AccountGroup,
            GroupKind::Budget => TargetKind::BudgetGroup,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::AddressGroup => "AddressGroup",
            TargetKind::AccountGroup => "AccountGroup",
            TargetKind::BudgetGroup => "BudgetGroup",
            TargetKind::PaymentTerm => "PaymentTerm",
            TargetKind::PostalCode => "PostalCode",
            TargetKind::LetterTemplate => "LetterTemplate",
            TargetKind::Person => "Person",
            TargetKind::Organization => "Organization",
            TargetKind::AccountBook => "AccountBook",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BUILT
// ============================================================================

/// Handle to the root entity produced by one build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Built {
    Group(Id<ClassificationGroup>),
    PaymentTerm(Id<PaymentTerm>),
    PostalCode(Id<PostalCode>),
    LetterTemplate(Id<LetterTemplate>),
    Party(Id<Party>),
    AccountBook(Id<AccountBook>),
}

impl Built {
    pub fn group(self) -> Option<Id<ClassificationGroup>> {
        match self {
            Built::Group(id) => Some(id),
            _ => None,
        }
    }

    pub fn payment_term(self) -> Option<Id<PaymentTerm>> {
        match self {
            Built::PaymentTerm(id) => Some(id),
            _ => None,
        }
    }

    pub fn postal_code(self) -> Option<Id<PostalCode>> {
        match self {
            Built::PostalCode(id) => Some(id),
            _ => None,
        }
    }

    pub fn letter_template(self) -> Option<Id<LetterTemplate>> {
        match self {
            Built::LetterTemplate(id) => Some(id),
            _ => None,
        }
    }

    pub fn party(self) -> Option<Id<Party>> {
        match self {
            Built::Party(id) => Some(id),
            _ => None,
        }
    }

    pub fn account_book(self) -> Option<Id<AccountBook>> {
        match self {
            Built::AccountBook(id) => Some(id),
            _ => None,
        }
    }
}

// ============================================================================
// SEED SET
// ============================================================================

/// Closed set of leaf and party records built eagerly, before any assembly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSet {
    pub address_groups: Vec<GroupView>,
    pub account_groups: Vec<GroupView>,
    pub budget_groups: Vec<GroupView>,
    pub payment_terms: Vec<PaymentTermView>,
    pub postal_codes: Vec<PostalCodeView>,
    pub letter_templates: Vec<LetterTemplateView>,
    pub organizations: Vec<PartyView>,
    pub persons: Vec<PartyView>,
}

impl SeedSet {
    pub fn len(&self) -> usize {
        self.address_groups.len()
            + self.account_groups.len()
            + self.budget_groups.len()
            + self.payment_terms.len()
            + self.postal_codes.len()
            + self.letter_templates.len()
            + self.organizations.len()
            + self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in build order: leaves, then organizations, then persons
    fn into_ordered(self) -> Vec<(TargetKind, FlatRecord)> {
        let mut ordered = Vec::with_capacity(self.len());
        let groups = [
            (TargetKind::AddressGroup, self.address_groups),
            (TargetKind::AccountGroup, self.account_groups),
            (TargetKind::BudgetGroup, self.budget_groups),
        ];
        for (target, views) in groups {
            ordered.extend(views.into_iter().map(|v| (target, FlatRecord::Group(v))));
        }
        ordered.extend(self.payment_terms.into_iter().map(|v| (TargetKind::PaymentTerm, v.into())));
        ordered.extend(self.postal_codes.into_iter().map(|v| (TargetKind::PostalCode, v.into())));
        ordered.extend(self.letter_templates.into_iter().map(|v| (TargetKind::LetterTemplate, v.into())));
        ordered.extend(self.organizations.into_iter().map(|v| (TargetKind::Organization, v.into())));
        ordered.extend(self.persons.into_iter().map(|v| (TargetKind::Person, v.into())));
        ordered
    }
}

// ============================================================================
// BUILD PASS
// ============================================================================

/// One synchronous build/resolve pass with its own registry
pub struct BuildPass<'r> {
    id: Uuid,
    options: BuildOptions,
    pub(crate) registry: Registry,
    resolvers: ResolverChain<'r>,
    span: tracing::Span,
}

impl<'r> BuildPass<'r> {
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    pub fn with_options(options: BuildOptions) -> Self {
        let id = Uuid::new_v4();
        BuildPass {
            id,
            options,
            registry: Registry::new(),
            resolvers: ResolverChain::default(),
            span: tracing::debug_span!("build_pass", pass = %id),
        }
    }

    /// Add a pull resolver; resolvers are asked in the order they were added,
    /// and only for keys the registry does not already hold.
    pub fn with_resolver<R: ReferenceResolver + 'r>(mut self, resolver: R) -> Self {
        self.add_resolver(resolver);
        self
    }

    pub fn add_resolver<R: ReferenceResolver + 'r>(&mut self, resolver: R) {
        self.resolvers.push(Box::new(resolver));
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for callers that edit the finished graph
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Finish the pass and hand over the graph
    pub fn into_registry(self) -> Registry {
        self.registry
    }

    // ------------------------------------------------------------------------
    // Public builds (atomic)
    // ------------------------------------------------------------------------

    /// Build one record as `target`
    pub fn build(&mut self, target: TargetKind, record: FlatRecord) -> Result<Built, BuildError> {
        self.atomically(|pass| pass.dispatch(target, record))
    }

    /// Build every record as `target`, preserving input order.
    ///
    /// One failing element aborts the whole collection.
    pub fn build_all<I>(&mut self, target: TargetKind, records: I) -> Result<Vec<Built>, BuildError>
    where
        I: IntoIterator<Item = FlatRecord>,
    {
        self.atomically(|pass| {
            records
                .into_iter()
                .map(|record| pass.dispatch(target, record))
                .collect()
        })
    }

    /// Bulk pre-seed: build a closed set in dependency order.
    ///
    /// Returns the number of entities built from the set.
    pub fn seed(&mut self, seed: SeedSet) -> Result<usize, BuildError> {
        let ordered = seed.into_ordered();
        let count = ordered.len();
        self.atomically(|pass| {
            for (target, record) in ordered {
                pass.dispatch(target, record)?;
            }
            Ok(())
        })?;
        tracing::info!(pass = %self.id, entities = count, "seeded");
        Ok(count)
    }

    pub fn build_person(&mut self, view: PartyView) -> Result<Id<Party>, BuildError> {
        self.atomically(|pass| pass.make_party(view, PartyRole::Person))
    }

    pub fn build_organization(&mut self, view: PartyView) -> Result<Id<Party>, BuildError> {
        self.atomically(|pass| pass.make_party(view, PartyRole::Organization))
    }

    pub fn build_account_book(&mut self, view: AccountBookView) -> Result<Id<AccountBook>, BuildError> {
        self.atomically(|pass| pass.make_account_book(view))
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn atomically<T>(
        &mut self,
        build: impl FnOnce(&mut Self) -> Result<T, BuildError>,
    ) -> Result<T, BuildError> {
        let span = self.span.clone();
        let _entered = span.enter();

        let checkpoint = self.registry.checkpoint();
        match build(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(error = %err, "build failed, rolling back");
                self.registry.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// Route a record to the mapper for `target`
    pub(crate) fn dispatch(&mut self, target: TargetKind, record: FlatRecord) -> Result<Built, BuildError> {
        match (target, record) {
            (TargetKind::AddressGroup, FlatRecord::Group(view)) => {
                self.make_group(GroupKind::Address, view).map(Built::Group)
            }
            (TargetKind::AccountGroup, FlatRecord::Group(view)) => {
                self.make_group(GroupKind::Account, view).map(Built::Group)
            }
            (TargetKind::BudgetGroup, FlatRecord::Group(view)) => {
                self.make_group(GroupKind::Budget, view).map(Built::Group)
            }
            (TargetKind::PaymentTerm, FlatRecord::PaymentTerm(view)) => {
                self.make_payment_term(view).map(Built::PaymentTerm)
            }
            (TargetKind::PostalCode, FlatRecord::PostalCode(view)) => {
                self.make_postal_code(view).map(Built::PostalCode)
            }
            (TargetKind::LetterTemplate, FlatRecord::LetterTemplate(view)) => {
                self.make_letter_template(view).map(Built::LetterTemplate)
            }
            (TargetKind::Person, FlatRecord::Party(view)) => {
                self.make_party(view, PartyRole::Person).map(Built::Party)
            }
            (TargetKind::Organization, FlatRecord::Party(view)) => {
                self.make_party(view, PartyRole::Organization).map(Built::Party)
            }
            (TargetKind::AccountBook, FlatRecord::AccountBook(view)) => {
                self.make_account_book(view).map(Built::AccountBook)
            }
            (target, record) => Err(BuildError::UnsupportedMapping {
                record: record.shape(),
                target,
            }),
        }
    }

    /// Registry first, then the pull resolvers.
    ///
    /// A pulled record is built through `dispatch` and registered, so the next
    /// request for the same key finds it in the registry.
    pub(crate) fn resolve_reference<T: Entity>(
        &mut self,
        reference: Reference,
        key: T::Key,
    ) -> Result<Id<T>, BuildError> {
        if let Some(id) = self.registry.lookup::<T>(&key) {
            return Ok(id);
        }
        if self.resolvers.is_empty() {
            return Err(reference.not_found());
        }

        let record = self
            .resolvers
            .pull(&reference)?
            .ok_or_else(|| reference.not_found())?;

        if record.numeric_id() != Some(reference.id()) {
            return Err(BuildError::unexpected(
                format!("resolver answered {} with another record", reference),
                anyhow::anyhow!("got a {} record with id {:?}", record.shape(), record.numeric_id()),
            ));
        }

        self.dispatch(reference.target(), record)?;
        self.registry
            .lookup::<T>(&key)
            .ok_or_else(|| reference.not_found())
    }
}

impl Default for BuildPass<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
