// 📥 Flat Views - denormalized input records as delivered by the transport layer
//
// Views only ever carry keys: a bare number/code, or a minimal stub (key plus
// display name). They are tree-shaped and never cyclic.
//
// Relationship sentinels: a numeric key <= 0, a missing value, or a blank
// code means "no relationship".

use crate::entities::BalanceSide;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// LEAF VIEWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub side: Option<BalanceSide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTermView {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalCodeView {
    pub country_code: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterTemplateView {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub company_number: Option<String>,
}

// ============================================================================
// PARTY VIEWS
// ============================================================================

/// Minimal nested reference: key plus display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyStub {
    pub id: i32,
    #[serde(default)]
    pub name: String,
}

/// Shared shape for persons and organizations; the caller decides which one to build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyView {
    pub id: i32,
    pub name: String,

    /// Address group key (mandatory)
    pub group: i32,

    pub payment_term: Option<i32>,

    pub street: Option<String>,
    pub postal_city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub web: Option<String>,

    // Person only
    pub mobile: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub organization: Option<PartyStub>,

    // Organization only
    pub secondary_phone: Option<String>,
    pub fax: Option<String>,
}

// ============================================================================
// ACCOUNT BOOK VIEWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    /// Account group key for balance accounts, budget group key for budget accounts
    pub group: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecordView {
    /// Account code within the book
    pub account: String,
    pub year: i32,
    pub month: u32,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecordView {
    pub account: String,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLineView {
    pub sequence: i32,
    pub date: NaiveDate,
    #[serde(default)]
    pub voucher: Option<String>,
    pub account: String,
    pub text: String,
    #[serde(default)]
    pub budget_account: Option<String>,
    #[serde(default)]
    pub debit: f64,
    #[serde(default)]
    pub credit: f64,
    #[serde(default)]
    pub party: Option<i32>,
}

/// An account book with all rows belonging to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountBookView {
    pub id: i32,
    pub name: String,
    pub letter_template: Option<i32>,
    pub accounts: Vec<AccountView>,
    pub budget_accounts: Vec<AccountView>,
    pub credit_records: Vec<CreditRecordView>,
    pub budget_records: Vec<BudgetRecordView>,
    pub ledger_lines: Vec<LedgerLineView>,
}

// ============================================================================
// FLAT RECORD
// ============================================================================

/// Any input record the dispatcher accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum FlatRecord {
    Group(GroupView),
    PaymentTerm(PaymentTermView),
    PostalCode(PostalCodeView),
    LetterTemplate(LetterTemplateView),
    Party(PartyView),
    AccountBook(AccountBookView),
}

impl FlatRecord {
    /// Short name of the record shape (for error messages)
    pub fn shape(&self) -> &'static str {
        match self {
            FlatRecord::Group(_) => "group",
            FlatRecord::PaymentTerm(_) => "payment term",
            FlatRecord::PostalCode(_) => "postal code",
            FlatRecord::LetterTemplate(_) => "letter template",
            FlatRecord::Party(_) => "party",
            FlatRecord::AccountBook(_) => "account book",
        }
    }

    /// Numeric identity of the record, if its kind has one
    pub fn numeric_id(&self) -> Option<i32> {
        match self {
            FlatRecord::Group(view) => Some(view.id),
            FlatRecord::PaymentTerm(view) => Some(view.id),
            FlatRecord::PostalCode(_) => None,
            FlatRecord::LetterTemplate(view) => Some(view.id),
            FlatRecord::Party(view) => Some(view.id),
            FlatRecord::AccountBook(view) => Some(view.id),
        }
    }
}

impl From<GroupView> for FlatRecord {
    fn from(view: GroupView) -> Self {
        FlatRecord::Group(view)
    }
}

impl From<PaymentTermView> for FlatRecord {
    fn from(view: PaymentTermView) -> Self {
        FlatRecord::PaymentTerm(view)
    }
}

impl From<PostalCodeView> for FlatRecord {
    fn from(view: PostalCodeView) -> Self {
        FlatRecord::PostalCode(view)
    }
}

impl From<LetterTemplateView> for FlatRecord {
    fn from(view: LetterTemplateView) -> Self {
        FlatRecord::LetterTemplate(view)
    }
}

impl From<PartyView> for FlatRecord {
    fn from(view: PartyView) -> Self {
        FlatRecord::Party(view)
    }
}

impl From<AccountBookView> for FlatRecord {
    fn from(view: AccountBookView) -> Self {
        FlatRecord::AccountBook(view)
    }
}

// ============================================================================
// SENTINELS
// ============================================================================

/// Numeric relationship key, or `None` for the "no relationship" sentinel
pub fn key(value: i32) -> Option<i32> {
    (value > 0).then_some(value)
}

pub fn optional_key(value: Option<i32>) -> Option<i32> {
    value.and_then(key)
}

/// Code relationship key, or `None` for a blank code
pub fn code(value: Option<&str>) -> Option<&str> {
    value.filter(|code| !code.trim().is_empty())
}
