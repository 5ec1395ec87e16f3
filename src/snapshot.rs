// 📸 Graph Snapshot - handle-free copy of a registry, plus a content fingerprint
//
// Handles are only meaningful inside the registry that issued them, so the
// snapshot replaces every handle with the identity it points at and sorts
// every collection by identity. Two passes over the same data therefore
// produce equal snapshots and equal fingerprints.

use crate::entities::{
    Account, AccountBook, AccountKind, BalanceSide, BudgetRecord, ClassificationGroup,
    CreditRecord, Entity, GroupKind, LedgerLine, LedgerLineKey, LetterTemplate, Party, PartyDetails,
    PartyRole, PaymentTerm, PostalCode,
};
use crate::registry::Registry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// SNAPSHOT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub kind: GroupKind,
    pub id: i32,
    pub name: String,
    pub side: Option<BalanceSide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTermSnapshot {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalCodeSnapshot {
    pub country_code: String,
    pub code: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterTemplateSnapshot {
    pub id: i32,
    pub name: String,
    pub lines: Vec<String>,
    pub company_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub id: i32,
    pub role: PartyRole,
    pub name: String,
    pub group: i32,
    pub payment_term: Option<i32>,
    pub street: Option<String>,
    pub postal_city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub web: Option<String>,
    pub mobile: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub organization: Option<i32>,
    pub secondary_phone: Option<String>,
    pub fax: Option<String>,
    pub persons: Vec<i32>,
    pub ledger_lines: Vec<LedgerLineKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub code: String,
    pub kind: AccountKind,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub group: i32,
    pub credit_records: Vec<CreditRecord>,
    pub budget_records: Vec<BudgetRecord>,
    /// Sequence numbers
    pub ledger_lines: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBookSnapshot {
    pub id: i32,
    pub name: String,
    pub letter_template: Option<i32>,
    pub accounts: Vec<AccountSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLineSnapshot {
    pub book_id: i32,
    pub sequence: i32,
    pub date: NaiveDate,
    pub voucher: Option<String>,
    pub text: String,
    pub account: String,
    pub budget_account: Option<String>,
    pub debit: f64,
    pub credit: f64,
    pub party: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub groups: Vec<GroupSnapshot>,
    pub payment_terms: Vec<PaymentTermSnapshot>,
    pub postal_codes: Vec<PostalCodeSnapshot>,
    pub letter_templates: Vec<LetterTemplateSnapshot>,
    pub parties: Vec<PartySnapshot>,
    pub account_books: Vec<AccountBookSnapshot>,
    pub ledger_lines: Vec<LedgerLineSnapshot>,
}

impl GraphSnapshot {
    /// SHA-256 over the JSON form, hex encoded
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&json);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

// ============================================================================
// TAKING A SNAPSHOT
// ============================================================================

pub fn snapshot(registry: &Registry) -> GraphSnapshot {
    let mut groups: Vec<GroupSnapshot> = registry
        .iter::<ClassificationGroup>()
        .map(|(_, group)| GroupSnapshot {
            kind: group.kind,
            id: group.id,
            name: group.name.clone(),
            side: group.side,
        })
        .collect();
    groups.sort_by_key(|group| (group.kind, group.id));

    let mut payment_terms: Vec<PaymentTermSnapshot> = registry
        .iter::<PaymentTerm>()
        .map(|(_, term)| PaymentTermSnapshot {
            id: term.id,
            name: term.name.clone(),
        })
        .collect();
    payment_terms.sort_by_key(|term| term.id);

    let mut postal_codes: Vec<PostalCodeSnapshot> = registry
        .iter::<PostalCode>()
        .map(|(_, code)| PostalCodeSnapshot {
            country_code: code.country_code.clone(),
            code: code.code.clone(),
            city: code.city.clone(),
        })
        .collect();
    postal_codes.sort_by(|a, b| (&a.country_code, &a.code).cmp(&(&b.country_code, &b.code)));

    let mut letter_templates: Vec<LetterTemplateSnapshot> = registry
        .iter::<LetterTemplate>()
        .map(|(_, template)| LetterTemplateSnapshot {
            id: template.id,
            name: template.name.clone(),
            lines: template.lines.clone(),
            company_number: template.company_number.clone(),
        })
        .collect();
    letter_templates.sort_by_key(|template| template.id);

    let mut parties: Vec<PartySnapshot> = registry
        .iter::<Party>()
        .map(|(_, party)| snapshot_party(registry, party))
        .collect();
    parties.sort_by_key(|party| party.id);

    let mut account_books: Vec<AccountBookSnapshot> = registry
        .iter::<AccountBook>()
        .map(|(_, book)| snapshot_book(registry, book))
        .collect();
    account_books.sort_by_key(|book| book.id);

    let mut ledger_lines: Vec<LedgerLineSnapshot> = registry
        .iter::<LedgerLine>()
        .map(|(_, line)| LedgerLineSnapshot {
            book_id: line.book_id,
            sequence: line.sequence,
            date: line.date,
            voucher: line.voucher.clone(),
            text: line.text.clone(),
            account: registry[line.account].code.clone(),
            budget_account: line.budget_account.map(|id| registry[id].code.clone()),
            debit: line.debit,
            credit: line.credit,
            party: line.party.map(|id| registry[id].id),
        })
        .collect();
    ledger_lines.sort_by_key(|line| (line.book_id, line.sequence));

    GraphSnapshot {
        groups,
        payment_terms,
        postal_codes,
        letter_templates,
        parties,
        account_books,
        ledger_lines,
    }
}

fn snapshot_party(registry: &Registry, party: &Party) -> PartySnapshot {
    let mut snapshot = PartySnapshot {
        id: party.id,
        role: party.role(),
        name: party.name.clone(),
        group: registry[party.group].id,
        payment_term: party.payment_term.map(|id| registry[id].id),
        street: party.street.clone(),
        postal_city: party.postal_city.clone(),
        phone: party.phone.clone(),
        email: party.email.clone(),
        web: party.web.clone(),
        mobile: None,
        birthday: None,
        organization: None,
        secondary_phone: None,
        fax: None,
        persons: Vec::new(),
        ledger_lines: party.ledger_lines.iter().map(|&id| registry[id].key()).collect(),
    };
    snapshot.ledger_lines.sort();

    match &party.details {
        PartyDetails::Person(person) => {
            snapshot.mobile = person.mobile.clone();
            snapshot.birthday = person.birthday;
            snapshot.organization = person.organization.map(|id| registry[id].id);
        }
        PartyDetails::Organization(organization) => {
            snapshot.secondary_phone = organization.secondary_phone.clone();
            snapshot.fax = organization.fax.clone();
            snapshot.persons = organization.persons.iter().map(|&id| registry[id].id).collect();
            snapshot.persons.sort();
        }
    }

    snapshot
}

fn snapshot_book(registry: &Registry, book: &AccountBook) -> AccountBookSnapshot {
    let mut accounts: Vec<AccountSnapshot> = book
        .accounts
        .iter()
        .map(|&id| snapshot_account(registry, &registry[id]))
        .collect();
    accounts.sort_by(|a, b| a.code.cmp(&b.code));

    AccountBookSnapshot {
        id: book.id,
        name: book.name.clone(),
        letter_template: book.letter_template.map(|id| registry[id].id),
        accounts,
    }
}

fn snapshot_account(registry: &Registry, account: &Account) -> AccountSnapshot {
    let mut ledger_lines: Vec<i32> = account
        .ledger_lines
        .iter()
        .map(|&id| registry[id].sequence)
        .collect();
    ledger_lines.sort();

    AccountSnapshot {
        code: account.code.clone(),
        kind: account.account_kind(),
        name: account.name.clone(),
        description: account.description.clone(),
        notes: account.notes.clone(),
        group: registry[account.group].id,
        credit_records: account.credit_records().to_vec(),
        budget_records: account.budget_records().to_vec(),
        ledger_lines,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{BuildPass, SeedSet};
    use crate::views::{GroupView, PartyStub, PartyView, PaymentTermView};

    fn seed(persons_first: bool) -> SeedSet {
        let acme = PartyView {
            id: 48,
            name: "Acme".to_string(),
            group: 1,
            ..PartyView::default()
        };
        let people: Vec<PartyView> = [(1, "Ole"), (2, "Eva")]
            .into_iter()
            .map(|(id, name)| PartyView {
                id,
                name: name.to_string(),
                group: 1,
                payment_term: Some(1),
                organization: Some(PartyStub {
                    id: 48,
                    name: "Acme".to_string(),
                }),
                ..PartyView::default()
            })
            .collect();

        let mut persons = people;
        if persons_first {
            persons.reverse();
        }

        SeedSet {
            address_groups: vec![GroupView {
                id: 1,
                name: "Family".to_string(),
                side: None,
            }],
            payment_terms: vec![PaymentTermView {
                id: 1,
                name: "Cash".to_string(),
            }],
            organizations: vec![acme],
            persons,
            ..SeedSet::default()
        }
    }

    fn build(seed_set: SeedSet) -> GraphSnapshot {
        let mut pass = BuildPass::new();
        pass.seed(seed_set).unwrap();
        snapshot(pass.registry())
    }

    #[test]
    fn test_snapshot_replaces_handles_with_ids() {
        let snapshot = build(seed(false));

        let acme = snapshot.parties.iter().find(|p| p.id == 48).unwrap();
        assert_eq!(acme.role, PartyRole::Organization);
        assert_eq!(acme.persons, vec![1, 2]);

        let ole = snapshot.parties.iter().find(|p| p.id == 1).unwrap();
        assert_eq!(ole.organization, Some(48));
        assert_eq!(ole.payment_term, Some(1));
        assert_eq!(ole.group, 1);
    }

    #[test]
    fn test_fingerprint_independent_of_input_order() {
        let first = build(seed(false));
        let second = build(seed(true));

        assert_eq!(first, second);
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let mut changed = seed(false);
        changed.payment_terms[0].name = "Net 8".to_string();

        let a = build(seed(false)).fingerprint().unwrap();
        let b = build(changed).fingerprint().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_empty_registry_snapshot() {
        let snapshot = snapshot(&Registry::new());
        assert_eq!(snapshot, GraphSnapshot::default());
    }
}
