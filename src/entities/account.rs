// 💳 Account Entity - balance or budget account inside an account book
//
// Identity is (account book id, account code). Both variants share the code
// space of their book. The variant part owns the monthly time series:
// - balance accounts: credit records
// - budget accounts: budget records

use super::{
    AccountBook, BudgetRecord, ClassificationGroup, CreditRecord, Entity, EntityKind, GroupKind,
    Id, LedgerLine,
};
use crate::registry::{Arena, Registry};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ACCOUNT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    /// Tracks money held (bank accounts, cash, loans)
    Balance,

    /// Tracks planned income/expenses per month
    Budget,
}

impl AccountKind {
    /// Classification group kind an account of this kind belongs to
    pub fn group_kind(&self) -> GroupKind {
        match self {
            AccountKind::Balance => GroupKind::Account,
            AccountKind::Budget => GroupKind::Budget,
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            AccountKind::Balance => EntityKind::BalanceAccount,
            AccountKind::Budget => EntityKind::BudgetAccount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountDetails {
    Balance { credit_records: Vec<CreditRecord> },
    Budget { budget_records: Vec<BudgetRecord> },
}

impl AccountDetails {
    pub fn empty(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Balance => AccountDetails::Balance {
                credit_records: Vec::new(),
            },
            AccountKind::Budget => AccountDetails::Budget {
                budget_records: Vec::new(),
            },
        }
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Owning book (back-reference)
    pub book: Id<AccountBook>,
    pub book_id: i32,

    /// Account code, unique within the book (e.g. "DANKORT")
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,

    /// Account group for balance accounts, budget group for budget accounts
    pub group: Id<ClassificationGroup>,

    /// Ledger lines posted on (or budgeted against) this account, in build order
    pub ledger_lines: Vec<Id<LedgerLine>>,

    pub details: AccountDetails,
}

impl Account {
    pub fn new(
        book: Id<AccountBook>,
        book_id: i32,
        code: String,
        name: String,
        group: Id<ClassificationGroup>,
        kind: AccountKind,
    ) -> Self {
        Account {
            book,
            book_id,
            code,
            name,
            description: None,
            notes: None,
            group,
            ledger_lines: Vec::new(),
            details: AccountDetails::empty(kind),
        }
    }

    pub fn account_kind(&self) -> AccountKind {
        match self.details {
            AccountDetails::Balance { .. } => AccountKind::Balance,
            AccountDetails::Budget { .. } => AccountKind::Budget,
        }
    }

    pub fn is_balance(&self) -> bool {
        self.account_kind() == AccountKind::Balance
    }

    pub fn is_budget(&self) -> bool {
        self.account_kind() == AccountKind::Budget
    }

    pub fn credit_records(&self) -> &[CreditRecord] {
        match &self.details {
            AccountDetails::Balance { credit_records } => credit_records,
            AccountDetails::Budget { .. } => &[],
        }
    }

    pub fn budget_records(&self) -> &[BudgetRecord] {
        match &self.details {
            AccountDetails::Budget { budget_records } => budget_records,
            AccountDetails::Balance { .. } => &[],
        }
    }

    pub(crate) fn credit_records_mut(&mut self) -> Option<&mut Vec<CreditRecord>> {
        match &mut self.details {
            AccountDetails::Balance { credit_records } => Some(credit_records),
            AccountDetails::Budget { .. } => None,
        }
    }

    pub(crate) fn budget_records_mut(&mut self) -> Option<&mut Vec<BudgetRecord>> {
        match &mut self.details {
            AccountDetails::Budget { budget_records } => Some(budget_records),
            AccountDetails::Balance { .. } => None,
        }
    }

    /// Lines are linked right after registration, so handles arrive in increasing order
    pub(crate) fn link_ledger_line(&mut self, line: Id<LedgerLine>) {
        debug_assert!(self.ledger_lines.last().map_or(true, |last| *last < line));
        self.ledger_lines.push(line);
    }

    pub(crate) fn prune(&mut self, ledger_lines: usize) {
        self.ledger_lines.retain(|line| line.index() < ledger_lines);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountKey {
    pub book_id: i32,
    pub code: String,
}

impl AccountKey {
    pub fn new(book_id: i32, code: impl Into<String>) -> Self {
        AccountKey {
            book_id,
            code: code.into(),
        }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.book_id, self.code)
    }
}

impl Entity for Account {
    type Key = AccountKey;

    fn key(&self) -> AccountKey {
        AccountKey::new(self.book_id, self.code.clone())
    }

    fn kind(&self) -> EntityKind {
        self.account_kind().entity_kind()
    }

    fn key_kind(_key: &AccountKey) -> EntityKind {
        EntityKind::Account
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.accounts
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.accounts
    }
}

// ============================================================================
// TESTS
// ============================================================================
