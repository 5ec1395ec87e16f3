// 🧾 Ledger Line - one journal entry posted on a balance account
//
// A line belongs to several collections at once:
// - its account's ledger lines
// - its budget account's ledger lines (when budgeted)
// - its party's ledger lines (when a debtor/counterpart is named)
// All of them hold the same handle.

use super::{Account, Entity, EntityKind, Id, Party};
use crate::registry::{Arena, Registry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerLine {
    pub book_id: i32,

    /// Sequence number, unique within the book
    pub sequence: i32,

    pub date: NaiveDate,

    /// Voucher reference (bilag)
    pub voucher: Option<String>,
    pub text: String,

    pub account: Id<Account>,
    pub budget_account: Option<Id<Account>>,

    pub debit: f64,
    pub credit: f64,

    /// Debtor or counterpart
    pub party: Option<Id<Party>>,
}

impl LedgerLine {
    /// Signed amount (debit positive)
    pub fn amount(&self) -> f64 {
        self.debit - self.credit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerLineKey {
    pub book_id: i32,
    pub sequence: i32,
}

impl fmt::Display for LedgerLineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.book_id, self.sequence)
    }
}

impl Entity for LedgerLine {
    type Key = LedgerLineKey;

    fn key(&self) -> LedgerLineKey {
        LedgerLineKey {
            book_id: self.book_id,
            sequence: self.sequence,
        }
    }

    fn kind(&self) -> EntityKind {
        EntityKind::LedgerLine
    }

    fn key_kind(_key: &LedgerLineKey) -> EntityKind {
        EntityKind::LedgerLine
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.ledger_lines
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.ledger_lines
    }
}
