// Intranet Graph - Core Library
// Turns flat back-office records into one consistent, possibly cyclic,
// graph of typed domain entities per build pass.

pub mod entities;
pub mod error;
pub mod views;
pub mod registry;
pub mod resolver;
pub mod leaf_mapper;
pub mod party_mapper;
pub mod assembler;
pub mod dispatcher;
pub mod options;
pub mod status;
pub mod snapshot;
pub mod fixtures;

// Re-export commonly used types
pub use entities::{
    Account, AccountBook, AccountKey, AccountKind, BalanceSide, BudgetRecord, ClassificationGroup,
    CreditRecord, Entity, EntityKind, GroupKey, GroupKind, Id, LedgerLine, LedgerLineKey,
    LetterTemplate, Party, PartyRole, PaymentTerm, Period, PostalCode, PostalCodeKey,
};
pub use error::BuildError;
pub use views::{
    AccountBookView, AccountView, BudgetRecordView, CreditRecordView, FlatRecord, GroupView,
    LedgerLineView, LetterTemplateView, PartyStub, PartyView, PaymentTermView, PostalCodeView,
};
pub use registry::{Arena, Registry};
pub use resolver::{from_fn, FnResolver, MapResolver, Reference, ReferenceResolver};
pub use leaf_mapper::{map_group, map_letter_template, map_payment_term, map_postal_code};
pub use dispatcher::{BuildPass, Built, SeedSet, TargetKind};
pub use options::{BuildOptions, TimeSeriesPolicy};
pub use status::{
    balance_status, book_totals, budget_status, debtors, party_balance, BalanceStatus,
    BookTotals, BudgetStatus, Debtor,
};
pub use snapshot::{snapshot, GraphSnapshot};
pub use fixtures::{load_csv, load_json, Dataset};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
