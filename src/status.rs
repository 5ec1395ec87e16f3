// 📊 Status Calculations - read-only figures over a built graph
//
// Everything here walks handles already wired by the assembler; nothing is
// looked up by key except the entry points the caller names.

use crate::entities::{
    time_series, Account, AccountBook, AccountKey, BalanceSide, Entity, Id, LedgerLine, Party,
    Period,
};
use crate::registry::Registry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// BALANCE ACCOUNTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceStatus {
    pub account: AccountKey,
    pub name: String,
    pub date: NaiveDate,

    /// Credit limit in force for the date's month
    pub credit: f64,

    /// Σ(debit − credit) of lines dated on or before the date
    pub balance: f64,

    pub available: f64,
}

/// `None` when `account` is a budget account
pub fn balance_status(registry: &Registry, account: Id<Account>, date: NaiveDate) -> Option<BalanceStatus> {
    let entry = &registry[account];
    if !entry.is_balance() {
        return None;
    }

    let credit = time_series::latest_at(entry.credit_records(), Period::of(date))
        .map(|record| record.credit)
        .unwrap_or(0.0);
    let balance = sum_lines(registry, &entry.ledger_lines, |line_date| line_date <= date);

    Some(BalanceStatus {
        account: entry.key(),
        name: entry.name.clone(),
        date,
        credit,
        balance,
        available: credit + balance,
    })
}

// ============================================================================
// BUDGET ACCOUNTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub account: AccountKey,
    pub name: String,
    pub period: Period,

    /// Income minus expenses planned for the month
    pub budget: f64,

    /// Posted so far this month, up to and including the date
    pub posted: f64,

    pub remaining: f64,
}

/// `None` when `account` is a balance account
pub fn budget_status(registry: &Registry, account: Id<Account>, date: NaiveDate) -> Option<BudgetStatus> {
    let entry = &registry[account];
    if !entry.is_budget() {
        return None;
    }

    let period = Period::of(date);
    let budget = time_series::record_for(entry.budget_records(), period)
        .map(|record| record.budget())
        .unwrap_or(0.0);
    let posted = sum_lines(registry, &entry.ledger_lines, |line_date| {
        period.contains(line_date) && line_date <= date
    });

    Some(BudgetStatus {
        account: entry.key(),
        name: entry.name.clone(),
        period,
        budget,
        posted,
        remaining: budget - posted,
    })
}

// ============================================================================
// PARTIES
// ============================================================================

pub fn party_balance(registry: &Registry, party: Id<Party>, date: NaiveDate) -> f64 {
    sum_lines(registry, &registry[party].ledger_lines, |line_date| line_date <= date)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debtor {
    pub id: i32,
    pub name: String,
    pub balance: f64,
}

/// Parties with an outstanding balance at `date`, ordered by id
pub fn debtors(registry: &Registry, date: NaiveDate) -> Vec<Debtor> {
    let mut debtors: Vec<Debtor> = registry
        .iter::<Party>()
        .filter(|(_, party)| !party.ledger_lines.is_empty())
        .map(|(id, party)| Debtor {
            id: party.id,
            name: party.name.clone(),
            balance: party_balance(registry, id, date),
        })
        .filter(|debtor| debtor.balance.abs() > f64::EPSILON)
        .collect();

    debtors.sort_by_key(|debtor| debtor.id);
    debtors
}

// ============================================================================
// BOOK TOTALS
// ============================================================================

/// Balance account totals of one book, split by balance side of the account group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookTotals {
    pub assets: f64,
    pub liabilities: f64,

    /// Accounts whose group carries no side
    pub unclassified: f64,
}

pub fn book_totals(registry: &Registry, book: Id<AccountBook>, date: NaiveDate) -> BookTotals {
    let mut totals = BookTotals::default();

    for &account in &registry[book].accounts {
        let Some(status) = balance_status(registry, account, date) else {
            continue;
        };
        match registry[registry[account].group].side {
            Some(BalanceSide::Assets) => totals.assets += status.balance,
            Some(BalanceSide::Liabilities) => totals.liabilities += status.balance,
            None => totals.unclassified += status.balance,
        }
    }

    totals
}

fn sum_lines<F>(registry: &Registry, lines: &[Id<LedgerLine>], include: F) -> f64
where
    F: Fn(NaiveDate) -> bool,
{
    lines
        .iter()
        .map(|&line| &registry[line])
        .filter(|line| include(line.date))
        .map(|line| line.amount())
        .sum()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{BuildPass, SeedSet};
    use crate::views::{
        AccountBookView, AccountView, BudgetRecordView, CreditRecordView, GroupView,
        LedgerLineView, PartyView,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn group(id: i32, name: &str, side: Option<BalanceSide>) -> GroupView {
        GroupView {
            id,
            name: name.to_string(),
            side,
        }
    }

    fn account(code: &str, group: i32) -> AccountView {
        AccountView {
            code: code.to_string(),
            name: code.to_string(),
            description: None,
            notes: None,
            group,
        }
    }

    fn line(sequence: i32, on: NaiveDate, account: &str, debit: f64, credit: f64) -> LedgerLineView {
        LedgerLineView {
            sequence,
            date: on,
            voucher: Some(format!("B{}", sequence)),
            account: account.to_string(),
            text: "entry".to_string(),
            budget_account: None,
            debit,
            credit,
            party: None,
        }
    }

    /// Household book: one bank account, one card debt, one food budget
    fn household() -> (BuildPass<'static>, Id<AccountBook>) {
        let mut pass = BuildPass::new();
        pass.seed(SeedSet {
            address_groups: vec![group(1, "Family", None)],
            account_groups: vec![
                group(10, "Bank", Some(BalanceSide::Assets)),
                group(11, "Cards", Some(BalanceSide::Liabilities)),
            ],
            budget_groups: vec![group(20, "Food", None)],
            persons: vec![
                PartyView {
                    id: 2,
                    name: "Eva".to_string(),
                    group: 1,
                    ..PartyView::default()
                },
                PartyView {
                    id: 1,
                    name: "Ole".to_string(),
                    group: 1,
                    ..PartyView::default()
                },
            ],
            ..SeedSet::default()
        })
        .unwrap();

        let mut groceries = line(3, date(2010, 11, 20), "BANK", 0.0, 400.0);
        groceries.budget_account = Some("FOOD".to_string());
        let mut october = line(4, date(2010, 10, 28), "BANK", 0.0, 100.0);
        october.budget_account = Some("FOOD".to_string());
        let mut loan = line(5, date(2010, 11, 2), "BANK", 0.0, 50.0);
        loan.party = Some(1);
        let mut repaid = line(6, date(2010, 11, 25), "BANK", 20.0, 0.0);
        repaid.party = Some(1);
        let mut settled = line(7, date(2010, 11, 3), "BANK", 0.0, 10.0);
        settled.party = Some(2);
        let mut settled_back = line(8, date(2010, 11, 4), "BANK", 10.0, 0.0);
        settled_back.party = Some(2);

        let view = AccountBookView {
            id: 1,
            name: "Household".to_string(),
            accounts: vec![account("BANK", 10), account("VISA", 11)],
            budget_accounts: vec![account("FOOD", 20)],
            credit_records: vec![
                CreditRecordView {
                    account: "BANK".to_string(),
                    year: 2010,
                    month: 1,
                    credit: 5000.0,
                },
                CreditRecordView {
                    account: "BANK".to_string(),
                    year: 2010,
                    month: 12,
                    credit: 9000.0,
                },
            ],
            budget_records: vec![BudgetRecordView {
                account: "FOOD".to_string(),
                year: 2010,
                month: 11,
                income: 0.0,
                expenses: 3000.0,
            }],
            ledger_lines: vec![
                line(1, date(2010, 11, 1), "BANK", 10000.0, 0.0),
                line(2, date(2010, 11, 5), "VISA", 0.0, 1500.0),
                groceries,
                october,
                loan,
                repaid,
                settled,
                settled_back,
            ],
            ..AccountBookView::default()
        };
        let book = pass.build_account_book(view).unwrap();
        (pass, book)
    }

    fn account_id(pass: &BuildPass<'_>, code: &str) -> Id<Account> {
        pass.registry().lookup::<Account>(&AccountKey::new(1, code)).unwrap()
    }

    #[test]
    fn test_balance_status() {
        let (pass, _) = household();
        let bank = account_id(&pass, "BANK");

        let status = balance_status(pass.registry(), bank, date(2010, 11, 10)).unwrap();
        assert_eq!(status.credit, 5000.0);
        assert_eq!(status.balance, 10000.0 - 50.0 - 10.0 + 10.0 - 100.0);
        assert_eq!(status.available, status.credit + status.balance);

        let later = balance_status(pass.registry(), bank, date(2010, 12, 1)).unwrap();
        assert_eq!(later.credit, 9000.0);
    }

    #[test]
    fn test_balance_status_rejects_budget_account() {
        let (pass, _) = household();
        let food = account_id(&pass, "FOOD");
        assert!(balance_status(pass.registry(), food, date(2010, 11, 30)).is_none());
    }

    #[test]
    fn test_budget_status_counts_only_the_month() {
        let (pass, _) = household();
        let food = account_id(&pass, "FOOD");

        let status = budget_status(pass.registry(), food, date(2010, 11, 30)).unwrap();
        assert_eq!(status.period, Period::new(2010, 11).unwrap());
        assert_eq!(status.budget, -3000.0);
        assert_eq!(status.posted, -400.0);
        assert_eq!(status.remaining, -2600.0);

        let early = budget_status(pass.registry(), food, date(2010, 11, 15)).unwrap();
        assert_eq!(early.posted, 0.0);
    }

    #[test]
    fn test_party_balance_and_debtors() {
        let (pass, _) = household();
        let registry = pass.registry();
        let ole = registry.lookup::<Party>(&1).unwrap();

        assert_eq!(party_balance(registry, ole, date(2010, 11, 10)), -50.0);
        assert_eq!(party_balance(registry, ole, date(2010, 11, 30)), -30.0);

        // Eva is settled, so only Ole owes anything
        let debtors = debtors(registry, date(2010, 11, 30));
        assert_eq!(debtors.len(), 1);
        assert_eq!(debtors[0].id, 1);
        assert_eq!(debtors[0].balance, -30.0);
    }

    #[test]
    fn test_book_totals_by_side() {
        let (pass, book) = household();
        let totals = book_totals(pass.registry(), book, date(2010, 11, 30));

        assert_eq!(totals.assets, 10000.0 - 400.0 - 100.0 - 50.0 + 20.0 - 10.0 + 10.0);
        assert_eq!(totals.liabilities, -1500.0);
        assert_eq!(totals.unclassified, 0.0);
    }
}
