// 💵 Payment Term - how a party settles its invoices (cash, 8 days net, ...)

use super::{Entity, EntityKind};
use crate::registry::{Arena, Registry};

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTerm {
    pub id: i32,
    pub name: String,
}

impl PaymentTerm {
    pub fn new(id: i32, name: String) -> Self {
        PaymentTerm { id, name }
    }
}

impl Entity for PaymentTerm {
    type Key = i32;

    fn key(&self) -> i32 {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::PaymentTerm
    }

    fn key_kind(_key: &i32) -> EntityKind {
        EntityKind::PaymentTerm
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.payment_terms
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.payment_terms
    }
}
