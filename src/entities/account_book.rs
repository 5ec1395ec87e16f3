// 📒 Account Book - aggregate root owning balance and budget accounts

use super::{Account, Entity, EntityKind, Id, LetterTemplate};
use crate::registry::{Arena, Registry};

#[derive(Debug, Clone, PartialEq)]
pub struct AccountBook {
    pub id: i32,
    pub name: String,

    /// Letterhead used on reports (optional)
    pub letter_template: Option<Id<LetterTemplate>>,

    /// Balance and budget accounts, in build order
    pub accounts: Vec<Id<Account>>,
}

impl AccountBook {
    pub fn new(id: i32, name: String, letter_template: Option<Id<LetterTemplate>>) -> Self {
        AccountBook {
            id,
            name,
            letter_template,
            accounts: Vec::new(),
        }
    }

    pub(crate) fn prune(&mut self, accounts: usize) {
        self.accounts.retain(|account| account.index() < accounts);
    }
}

impl Entity for AccountBook {
    type Key = i32;

    fn key(&self) -> i32 {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::AccountBook
    }

    fn key_kind(_key: &i32) -> EntityKind {
        EntityKind::AccountBook
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.account_books
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.account_books
    }
}
