// Graph scenarios - end-to-end builds through the public API

use chrono::NaiveDate;
use intranet_graph::{
    from_fn, snapshot, Account, AccountBookView, AccountKey, AccountView, BuildError, BuildOptions,
    BuildPass, ClassificationGroup, CreditRecordView, EntityKind, FlatRecord, GroupKind, GroupView,
    LedgerLine, LedgerLineView, MapResolver, Party, PartyStub, PartyView, PaymentTermView,
    Reference, SeedSet, TargetKind, TimeSeriesPolicy,
};

// ============================================================================
// FIXTURES
// ============================================================================

fn family() -> GroupView {
    GroupView {
        id: 1,
        name: "Family".to_string(),
        side: None,
    }
}

fn cash() -> PaymentTermView {
    PaymentTermView {
        id: 1,
        name: "Cash".to_string(),
    }
}

fn acme() -> PartyView {
    PartyView {
        id: 48,
        name: "Acme".to_string(),
        group: 1,
        ..PartyView::default()
    }
}

fn person(id: i32, name: &str) -> PartyView {
    PartyView {
        id,
        name: name.to_string(),
        group: 1,
        payment_term: Some(1),
        organization: Some(PartyStub {
            id: 48,
            name: "Acme".to_string(),
        }),
        ..PartyView::default()
    }
}

fn address_seed() -> SeedSet {
    SeedSet {
        address_groups: vec![family()],
        account_groups: vec![GroupView {
            id: 10,
            name: "Bank".to_string(),
            side: None,
        }],
        payment_terms: vec![cash()],
        organizations: vec![acme()],
        persons: vec![person(1, "Ole"), person(2, "Eva")],
        ..SeedSet::default()
    }
}

fn household(credit_records: Vec<CreditRecordView>) -> AccountBookView {
    AccountBookView {
        id: 1,
        name: "Household".to_string(),
        accounts: vec![AccountView {
            code: "BANK".to_string(),
            name: "Bank".to_string(),
            description: None,
            notes: None,
            group: 10,
        }],
        credit_records,
        ledger_lines: vec![LedgerLineView {
            sequence: 1,
            date: NaiveDate::from_ymd_opt(2010, 11, 5).unwrap(),
            voucher: None,
            account: "BANK".to_string(),
            text: "Loan to Ole".to_string(),
            budget_account: None,
            debit: 0.0,
            credit: 50.0,
            party: Some(1),
        }],
        ..AccountBookView::default()
    }
}

fn credit(month: u32, amount: f64) -> CreditRecordView {
    CreditRecordView {
        account: "BANK".to_string(),
        year: 2010,
        month,
        credit: amount,
    }
}

// ============================================================================
// IDENTITY
// ============================================================================

#[test]
fn test_shared_group_is_one_instance() {
    let mut pass = BuildPass::new();
    pass.seed(address_seed()).unwrap();

    let registry = pass.registry();
    let ole = registry.find::<Party>(&1).unwrap();
    let eva = registry.find::<Party>(&2).unwrap();

    assert_eq!(ole.group, eva.group);
    assert_eq!(registry.count::<ClassificationGroup>(), 2);
}

#[test]
fn test_duplicate_leaf_identity_rejected() {
    let mut pass = BuildPass::new();
    let result = pass.build_all(
        TargetKind::AddressGroup,
        vec![FlatRecord::from(family()), FlatRecord::from(family())],
    );

    match result {
        Err(BuildError::DuplicateIdentity { kind, id }) => {
            assert_eq!(kind, EntityKind::Group(GroupKind::Address));
            assert_eq!(id, "1");
        }
        other => panic!("expected duplicate identity, got {:?}", other),
    }
    assert!(pass.registry().is_empty());
}

// ============================================================================
// CYCLES
// ============================================================================

#[test]
fn test_back_reference_same_in_either_build_order() {
    // Organization first, persons after
    let mut forward = BuildPass::new();
    forward.seed(address_seed()).unwrap();

    // Persons first; the organization is pulled on demand
    let resolver = MapResolver::new().with_organizations(vec![acme()]);
    let mut pulled = BuildPass::new().with_resolver(resolver);
    pulled
        .seed(SeedSet {
            organizations: vec![],
            ..address_seed()
        })
        .unwrap();

    for pass in [&forward, &pulled] {
        let registry = pass.registry();
        let acme = registry.lookup::<Party>(&48).unwrap();
        let members: Vec<i32> = registry[acme]
            .persons()
            .iter()
            .map(|&id| registry[id].id)
            .collect();
        assert_eq!(members, vec![1, 2]);

        for &member in registry[acme].persons() {
            assert_eq!(registry[member].organization(), Some(acme));
        }
    }

    assert_eq!(
        snapshot(forward.registry()).fingerprint().unwrap(),
        snapshot(pulled.registry()).fingerprint().unwrap()
    );
}

// ============================================================================
// INTEGRITY
// ============================================================================

#[test]
fn test_missing_group_leaves_no_partial_party() {
    let mut pass = BuildPass::new();
    let result = pass.build(
        TargetKind::Person,
        PartyView {
            id: 1,
            name: "Ole".to_string(),
            group: 9,
            ..PartyView::default()
        }
        .into(),
    );

    match result {
        Err(BuildError::ReferenceNotFound { kind, id }) => {
            assert_eq!(kind, EntityKind::Group(GroupKind::Address));
            assert_eq!(id, "9");
        }
        other => panic!("expected missing group, got {:?}", other),
    }
    assert!(pass.registry().lookup::<Party>(&1).is_none());
}

#[test]
fn test_resolver_failure_is_wrapped() {
    let failing = from_fn(|reference: &Reference| {
        Err(anyhow::anyhow!("lookup of {} timed out", reference))
    });
    let mut pass = BuildPass::new().with_resolver(failing);

    let err = pass
        .build_person(PartyView {
            id: 1,
            name: "Ole".to_string(),
            group: 1,
            ..PartyView::default()
        })
        .unwrap_err();

    assert!(!err.is_integrity_failure());
    match err {
        BuildError::Unexpected { source, .. } => {
            assert_eq!(source.to_string(), "lookup of address group 1 timed out");
        }
        other => panic!("expected wrapped failure, got {:?}", other),
    }
}

// ============================================================================
// LEDGER LINES
// ============================================================================

#[test]
fn test_ledger_line_shared_between_account_and_party() {
    let mut pass = BuildPass::new();
    pass.seed(address_seed()).unwrap();
    pass.build_account_book(household(vec![])).unwrap();

    let (line, bank, ole) = {
        let registry = pass.registry();
        let bank = registry.lookup::<Account>(&AccountKey::new(1, "BANK")).unwrap();
        let ole = registry.lookup::<Party>(&1).unwrap();

        assert_eq!(registry[bank].ledger_lines.len(), 1);
        assert_eq!(registry[ole].ledger_lines.len(), 1);
        assert_eq!(registry[bank].ledger_lines[0], registry[ole].ledger_lines[0]);
        (registry[bank].ledger_lines[0], bank, ole)
    };

    pass.registry_mut()[line].text = "Loan repaid".to_string();

    let registry = pass.registry();
    let via_account = &registry[registry[bank].ledger_lines[0]];
    let via_party = &registry[registry[ole].ledger_lines[0]];
    assert_eq!(via_account.text, "Loan repaid");
    assert_eq!(via_party.text, "Loan repaid");
    assert_eq!(registry.count::<LedgerLine>(), 1);
}

// ============================================================================
// TIME SERIES
// ============================================================================

#[test]
fn test_duplicate_credit_record_later_wins() {
    let mut pass = BuildPass::new();
    pass.seed(address_seed()).unwrap();
    pass.build_account_book(household(vec![credit(11, 1000.0), credit(11, 2500.0)]))
        .unwrap();

    let bank = pass.registry().find::<Account>(&AccountKey::new(1, "BANK")).unwrap();
    assert_eq!(bank.credit_records().len(), 1);
    assert_eq!(bank.credit_records()[0].credit, 2500.0);
}

#[test]
fn test_duplicate_credit_record_rejected() {
    let options = BuildOptions::new().with_time_series_policy(TimeSeriesPolicy::Reject);
    let mut pass = BuildPass::with_options(options);
    pass.seed(address_seed()).unwrap();

    let result = pass.build_account_book(household(vec![credit(11, 1000.0), credit(11, 2500.0)]));
    assert!(matches!(
        result,
        Err(BuildError::DuplicateTimeSeriesEntry { year: 2010, month: 11, .. })
    ));

    // The failed book left nothing behind, the seeded parties are intact
    let registry = pass.registry();
    assert_eq!(registry.count::<Account>(), 0);
    assert!(registry.find::<Party>(&1).unwrap().ledger_lines.is_empty());
}

// ============================================================================
// LEAVES AND SENTINELS
// ============================================================================

#[test]
fn test_leaf_round_trip() {
    let mut pass = BuildPass::new();
    let built = pass
        .build(TargetKind::AddressGroup, family().into())
        .unwrap();

    let group = &pass.registry()[built.group().unwrap()];
    assert_eq!(group.id, 1);
    assert_eq!(group.name, "Family");
    assert_eq!(group.side, None);
}

#[test]
fn test_unset_payment_term_never_looked_up() {
    let resolver = from_fn(|reference: &Reference| {
        assert!(!matches!(reference, Reference::PaymentTerm(_)), "payment term looked up");
        Ok(None)
    });
    let mut pass = BuildPass::new().with_resolver(resolver);
    pass.build(TargetKind::AddressGroup, family().into()).unwrap();

    let ole = pass
        .build_person(PartyView {
            id: 1,
            name: "Ole".to_string(),
            group: 1,
            payment_term: Some(0),
            ..PartyView::default()
        })
        .unwrap();

    assert!(pass.registry()[ole].payment_term.is_none());
}

// ============================================================================
// CONCRETE SCENARIO
// ============================================================================

#[test]
fn test_ole_at_acme() {
    let mut pass = BuildPass::new();
    pass.seed(SeedSet {
        address_groups: vec![family()],
        payment_terms: vec![cash()],
        organizations: vec![acme()],
        ..SeedSet::default()
    })
    .unwrap();

    let ole = pass.build_person(person(1, "Ole")).unwrap();

    let registry = pass.registry();
    let person = &registry[ole];
    assert_eq!(registry[person.group].name, "Family");
    assert_eq!(registry[person.payment_term.unwrap()].name, "Cash");

    let organization = person.organization().unwrap();
    assert_eq!(registry[organization].name, "Acme");
    assert!(registry[organization]
        .persons()
        .iter()
        .any(|&member| registry[member].id == 1));
}

#[test]
fn test_two_passes_equal_but_distinct() {
    let build = || {
        let mut pass = BuildPass::new();
        pass.seed(address_seed()).unwrap();
        pass.build_account_book(household(vec![credit(11, 1000.0)])).unwrap();
        pass
    };

    let first = build();
    let second = build();

    assert_ne!(first.id(), second.id());
    assert_eq!(snapshot(first.registry()), snapshot(second.registry()));
}
