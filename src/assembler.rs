// 🏗️ Financial Aggregate Assembler - one account book with its whole subgraph
//
// Steps run strictly in order, each one using entities built by the ones
// before it:
// 1. init         - optional letter template, register the book
// 2. accounts     - balance accounts, then budget accounts
// 3. time series  - credit and budget records onto their accounts
// 4. ledger lines - register, then link into account, budget account, party
//
// Parties named by ledger lines must already be in the registry.

use crate::dispatcher::BuildPass;
use crate::entities::{
    Account, AccountBook, AccountKey, AccountKind, BudgetRecord, CreditRecord, EntityKind, Id,
    LedgerLine, LetterTemplate, Party, Period,
};
use crate::entities::time_series;
use crate::error::BuildError;
use crate::leaf_mapper::{require_identity, require_text};
use crate::resolver::Reference;
use crate::views::{
    self, AccountBookView, AccountView, BudgetRecordView, CreditRecordView, LedgerLineView,
};

impl<'r> BuildPass<'r> {
    pub(crate) fn make_account_book(&mut self, view: AccountBookView) -> Result<Id<AccountBook>, BuildError> {
        require_identity(view.id, "id")?;
        require_text(&view.name, "name")?;

        // Step 1: init
        let letter_template = match views::optional_key(view.letter_template) {
            Some(id) => Some(self.resolve_letter_template(id)?),
            None => None,
        };
        let book = self
            .registry
            .register(AccountBook::new(view.id, view.name, letter_template))?;

        // Step 2: accounts
        for account in view.accounts {
            self.make_account(book, view.id, account, AccountKind::Balance)?;
        }
        for account in view.budget_accounts {
            self.make_account(book, view.id, account, AccountKind::Budget)?;
        }

        // Step 3: time series
        for record in view.credit_records {
            self.add_credit_record(view.id, record)?;
        }
        for record in view.budget_records {
            self.add_budget_record(view.id, record)?;
        }

        // Step 4: ledger lines
        let line_count = view.ledger_lines.len();
        for line in view.ledger_lines {
            self.make_ledger_line(view.id, line)?;
        }

        tracing::info!(
            book = view.id,
            accounts = self.registry[book].accounts.len(),
            ledger_lines = line_count,
            "assembled account book"
        );
        Ok(book)
    }

    pub(crate) fn resolve_letter_template(&mut self, id: i32) -> Result<Id<LetterTemplate>, BuildError> {
        self.resolve_reference(Reference::LetterTemplate(id), id)
    }

    fn make_account(
        &mut self,
        book: Id<AccountBook>,
        book_id: i32,
        view: AccountView,
        kind: AccountKind,
    ) -> Result<Id<Account>, BuildError> {
        require_text(&view.code, "code")?;
        require_text(&view.name, "name")?;

        let group_id = views::key(view.group).ok_or_else(|| BuildError::validation("group"))?;
        let group = self.resolve_group(kind.group_kind(), group_id)?;

        let mut account = Account::new(book, book_id, view.code, view.name, group, kind);
        account.description = view.description;
        account.notes = view.notes;

        let account = self.registry.register(account)?;
        self.registry[book].accounts.push(account);
        Ok(account)
    }

    /// Account of this book with the given code and kind
    fn local_account(&self, book_id: i32, code: &str, kind: AccountKind) -> Result<Id<Account>, BuildError> {
        let key = AccountKey::new(book_id, code);
        match self.registry.lookup::<Account>(&key) {
            Some(id) if self.registry[id].account_kind() == kind => Ok(id),
            _ => Err(BuildError::not_found(kind.entity_kind(), key)),
        }
    }

    fn add_credit_record(&mut self, book_id: i32, view: CreditRecordView) -> Result<(), BuildError> {
        let period = Period::new(view.year, view.month).ok_or_else(|| BuildError::validation("month"))?;
        let account = self.local_account(book_id, &view.account, AccountKind::Balance)?;
        let policy = self.options().time_series_policy;
        let label = AccountKey::new(book_id, view.account.as_str()).to_string();

        let record = CreditRecord {
            period,
            credit: view.credit,
        };
        let records = self.registry[account]
            .credit_records_mut()
            .ok_or_else(|| BuildError::not_found(EntityKind::BalanceAccount, &label))?;
        if time_series::merge(records, record, policy, &label)? {
            tracing::warn!(account = %label, %period, "credit record replaced by later row");
        }
        Ok(())
    }

    fn add_budget_record(&mut self, book_id: i32, view: BudgetRecordView) -> Result<(), BuildError> {
        let period = Period::new(view.year, view.month).ok_or_else(|| BuildError::validation("month"))?;
        let account = self.local_account(book_id, &view.account, AccountKind::Budget)?;
        let policy = self.options().time_series_policy;
        let label = AccountKey::new(book_id, view.account.as_str()).to_string();

        let record = BudgetRecord {
            period,
            income: view.income,
            expenses: view.expenses,
        };
        let records = self.registry[account]
            .budget_records_mut()
            .ok_or_else(|| BuildError::not_found(EntityKind::BudgetAccount, &label))?;
        if time_series::merge(records, record, policy, &label)? {
            tracing::warn!(account = %label, %period, "budget record replaced by later row");
        }
        Ok(())
    }

    fn make_ledger_line(&mut self, book_id: i32, view: LedgerLineView) -> Result<Id<LedgerLine>, BuildError> {
        require_identity(view.sequence, "sequence")?;
        require_text(&view.account, "account")?;
        require_text(&view.text, "text")?;

        // Relationships first
        let account = self.local_account(book_id, &view.account, AccountKind::Balance)?;
        let budget_account = match views::code(view.budget_account.as_deref()) {
            Some(code) => Some(self.local_account(book_id, code, AccountKind::Budget)?),
            None => None,
        };
        let party = match views::optional_key(view.party) {
            Some(id) => Some(self.registry.resolve::<Party>(&id)?),
            None => None,
        };

        let line = LedgerLine {
            book_id,
            sequence: view.sequence,
            date: view.date,
            voucher: view.voucher,
            text: view.text,
            account,
            budget_account,
            debit: view.debit,
            credit: view.credit,
            party,
        };
        let line = self.registry.register(line)?;

        // Then every collection the line belongs to
        self.registry[account].link_ledger_line(line);
        if let Some(budget_account) = budget_account {
            self.registry[budget_account].link_ledger_line(line);
        }
        if let Some(party) = party {
            self.registry[party].link_ledger_line(line);
        }

        Ok(line)
    }
}

// ============================================================================
// TESTS
// ============================================================================
