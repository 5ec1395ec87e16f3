// ✉️ Letter Template - letterhead printed on account book reports

use super::{Entity, EntityKind};
use crate::registry::{Arena, Registry};

/// Maximum number of header lines a letterhead can carry.
pub const MAX_LINES: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct LetterTemplate {
    pub id: i32,
    pub name: String,

    /// Header lines, top to bottom (at most `MAX_LINES`)
    pub lines: Vec<String>,

    /// Company registration number printed in the footer
    pub company_number: Option<String>,
}

impl LetterTemplate {
    pub fn new(id: i32, name: String) -> Self {
        LetterTemplate {
            id,
            name,
            lines: Vec::new(),
            company_number: None,
        }
    }
}

impl Entity for LetterTemplate {
    type Key = i32;

    fn key(&self) -> i32 {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::LetterTemplate
    }

    fn key_kind(_key: &i32) -> EntityKind {
        EntityKind::LetterTemplate
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.letter_templates
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.letter_templates
    }
}
