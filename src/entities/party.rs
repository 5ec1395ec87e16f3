// 👥 Party Entity - person or organization in the address book
//
// Both variants share one identity space (the party number) and the common
// address data. The variant part carries the person ↔ organization cycle:
// - a person optionally points at the organization it belongs to
// - an organization lists every person pointing at it
//
// Parties also collect the ledger lines that name them as debtor/counterpart.

use super::{ClassificationGroup, Entity, EntityKind, Id, LedgerLine, PaymentTerm};
use crate::registry::{Arena, Registry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// PARTY ROLE
// ============================================================================

/// Concrete party variant requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyRole {
    Person,
    Organization,
}

impl PartyRole {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            PartyRole::Person => EntityKind::Person,
            PartyRole::Organization => EntityKind::Organization,
        }
    }
}

// ============================================================================
// VARIANT DETAILS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonDetails {
    pub mobile: Option<String>,
    pub birthday: Option<NaiveDate>,

    /// Organization this person belongs to (back-referenced by `persons`)
    pub organization: Option<Id<Party>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationDetails {
    pub secondary_phone: Option<String>,
    pub fax: Option<String>,

    /// Every person whose `organization` is this party, in build order
    pub persons: Vec<Id<Party>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartyDetails {
    Person(PersonDetails),
    Organization(OrganizationDetails),
}

// ============================================================================
// PARTY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    pub id: i32,
    pub name: String,

    /// Address group (mandatory)
    pub group: Id<ClassificationGroup>,

    pub payment_term: Option<Id<PaymentTerm>>,

    pub street: Option<String>,
    pub postal_city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub web: Option<String>,

    /// Ledger lines naming this party, in build order
    pub ledger_lines: Vec<Id<LedgerLine>>,

    pub details: PartyDetails,
}

impl Party {
    /// Create a party with empty contact data and no relationships besides its group
    pub fn new(id: i32, name: String, group: Id<ClassificationGroup>, role: PartyRole) -> Self {
        let details = match role {
            PartyRole::Person => PartyDetails::Person(PersonDetails::default()),
            PartyRole::Organization => PartyDetails::Organization(OrganizationDetails::default()),
        };

        Party {
            id,
            name,
            group,
            payment_term: None,
            street: None,
            postal_city: None,
            phone: None,
            email: None,
            web: None,
            ledger_lines: Vec::new(),
            details,
        }
    }

    pub fn role(&self) -> PartyRole {
        match self.details {
            PartyDetails::Person(_) => PartyRole::Person,
            PartyDetails::Organization(_) => PartyRole::Organization,
        }
    }

    pub fn is_person(&self) -> bool {
        self.role() == PartyRole::Person
    }

    pub fn is_organization(&self) -> bool {
        self.role() == PartyRole::Organization
    }

    pub fn as_person(&self) -> Option<&PersonDetails> {
        match &self.details {
            PartyDetails::Person(details) => Some(details),
            PartyDetails::Organization(_) => None,
        }
    }

    pub fn as_organization(&self) -> Option<&OrganizationDetails> {
        match &self.details {
            PartyDetails::Organization(details) => Some(details),
            PartyDetails::Person(_) => None,
        }
    }

    /// Organization of a person (always `None` for organizations)
    pub fn organization(&self) -> Option<Id<Party>> {
        self.as_person().and_then(|p| p.organization)
    }

    /// Persons of an organization (always empty for persons)
    pub fn persons(&self) -> &[Id<Party>] {
        match &self.details {
            PartyDetails::Organization(details) => &details.persons,
            PartyDetails::Person(_) => &[],
        }
    }

    /// Add a person to this organization's collection, keeping it free of duplicates.
    ///
    /// Returns false when this party is not an organization or already lists the person.
    pub(crate) fn link_person(&mut self, person: Id<Party>) -> bool {
        match &mut self.details {
            PartyDetails::Organization(details) if !details.persons.contains(&person) => {
                details.persons.push(person);
                true
            }
            _ => false,
        }
    }

    /// Lines are linked right after registration, so handles arrive in increasing order
    pub(crate) fn link_ledger_line(&mut self, line: Id<LedgerLine>) {
        debug_assert!(self.ledger_lines.last().map_or(true, |last| *last < line));
        self.ledger_lines.push(line);
    }

    /// Drop collection entries whose handles were issued after a checkpoint.
    pub(crate) fn prune(&mut self, parties: usize, ledger_lines: usize) {
        self.ledger_lines.retain(|line| line.index() < ledger_lines);
        if let PartyDetails::Organization(details) = &mut self.details {
            details.persons.retain(|person| person.index() < parties);
        }
    }
}

impl Entity for Party {
    type Key = i32;

    fn key(&self) -> i32 {
        self.id
    }

    fn kind(&self) -> EntityKind {
        self.role().entity_kind()
    }

    fn key_kind(_key: &i32) -> EntityKind {
        EntityKind::Party
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.parties
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.parties
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Id<ClassificationGroup> {
        Id::new(0)
    }

    #[test]
    fn test_party_roles() {
        let person = Party::new(1, "Ole".to_string(), group(), PartyRole::Person);
        let organization = Party::new(48, "Acme".to_string(), group(), PartyRole::Organization);

        assert!(person.is_person());
        assert!(organization.is_organization());
        assert_eq!(person.kind(), EntityKind::Person);
        assert_eq!(organization.kind(), EntityKind::Organization);
        assert!(person.persons().is_empty());
        assert!(organization.organization().is_none());
    }

    #[test]
    fn test_link_person_only_once() {
        let mut organization = Party::new(48, "Acme".to_string(), group(), PartyRole::Organization);
        let person: Id<Party> = Id::new(1);

        assert!(organization.link_person(person));
        assert!(!organization.link_person(person));
        assert_eq!(organization.persons(), &[person]);
    }

    #[test]
    fn test_person_cannot_collect_persons() {
        let mut person = Party::new(1, "Ole".to_string(), group(), PartyRole::Person);
        assert!(!person.link_person(Id::new(2)));
        assert!(person.persons().is_empty());
    }

    #[test]
    fn test_prune_drops_newer_handles() {
        let mut organization = Party::new(48, "Acme".to_string(), group(), PartyRole::Organization);
        organization.link_person(Id::new(1));
        organization.link_person(Id::new(5));
        organization.link_ledger_line(Id::new(0));
        organization.link_ledger_line(Id::new(3));

        organization.prune(4, 2);

        assert_eq!(organization.persons(), &[Id::new(1)]);
        assert_eq!(organization.ledger_lines, vec![Id::new(0)]);
    }

    #[test]
    fn test_link_many_ledger_lines() {
        let mut person = Party::new(1, "Ole".to_string(), group(), PartyRole::Person);
        for index in 0..10_000 {
            person.link_ledger_line(Id::new(index));
        }

        assert_eq!(person.ledger_lines.len(), 10_000);
        assert_eq!(person.ledger_lines.first(), Some(&Id::new(0)));
        assert_eq!(person.ledger_lines.last(), Some(&Id::new(9_999)));
    }
}
