// 👥 Polymorphic Party Mapper - party views → persons and organizations
//
// Person and organization views have the same shape; the caller says which
// variant to build. Construction runs in two phases:
// 1. resolve every relationship (group, payment term, organization)
// 2. register the party and wire the back-reference into the organization
//
// Nothing is registered until phase 1 has fully succeeded.

use crate::dispatcher::BuildPass;
use crate::entities::{
    ClassificationGroup, GroupKey, GroupKind, Id, OrganizationDetails, Party, PartyDetails,
    PartyRole, PaymentTerm, PersonDetails,
};
use crate::error::BuildError;
use crate::leaf_mapper::{require_identity, require_text};
use crate::resolver::Reference;
use crate::views::{self, PartyView};

impl<'r> BuildPass<'r> {
    pub(crate) fn make_party(&mut self, view: PartyView, role: PartyRole) -> Result<Id<Party>, BuildError> {
        require_identity(view.id, "id")?;
        require_text(&view.name, "name")?;

        // Phase 1: relationships
        let group_id = views::key(view.group).ok_or_else(|| BuildError::validation("group"))?;
        let group = self.resolve_group(GroupKind::Address, group_id)?;

        let payment_term = match views::optional_key(view.payment_term) {
            Some(id) => Some(self.resolve_payment_term(id)?),
            None => None,
        };

        let organization_id = view.organization.as_ref().and_then(|stub| views::key(stub.id));
        let organization = match (role, organization_id) {
            (PartyRole::Person, Some(id)) => Some(self.resolve_organization(id)?),
            (PartyRole::Organization, Some(id)) => {
                tracing::debug!(party = view.id, organization = id, "organization stub ignored on organization");
                None
            }
            (_, None) => None,
        };

        // Phase 2: register and wire
        let details = match role {
            PartyRole::Person => PartyDetails::Person(PersonDetails {
                mobile: view.mobile,
                birthday: view.birthday,
                organization,
            }),
            PartyRole::Organization => PartyDetails::Organization(OrganizationDetails {
                secondary_phone: view.secondary_phone,
                fax: view.fax,
                persons: Vec::new(),
            }),
        };

        let party = Party {
            id: view.id,
            name: view.name,
            group,
            payment_term,
            street: view.street,
            postal_city: view.postal_city,
            phone: view.phone,
            email: view.email,
            web: view.web,
            ledger_lines: Vec::new(),
            details,
        };
        let party = self.registry.register(party)?;

        if let Some(organization) = organization {
            self.registry[organization].link_person(party);
        }

        Ok(party)
    }

    pub(crate) fn resolve_group(
        &mut self,
        kind: GroupKind,
        id: i32,
    ) -> Result<Id<ClassificationGroup>, BuildError> {
        self.resolve_reference(Reference::Group(kind, id), GroupKey::new(kind, id))
    }

    pub(crate) fn resolve_payment_term(&mut self, id: i32) -> Result<Id<PaymentTerm>, BuildError> {
        self.resolve_reference(Reference::PaymentTerm(id), id)
    }

    /// Resolve a party that must be an organization
    pub(crate) fn resolve_organization(&mut self, id: i32) -> Result<Id<Party>, BuildError> {
        let reference = Reference::Organization(id);
        let party = self.resolve_reference::<Party>(reference, id)?;
        if !self.registry[party].is_organization() {
            return Err(reference.not_found());
        }
        Ok(party)
    }
}

// ============================================================================
// TESTS
// ============================================================================
