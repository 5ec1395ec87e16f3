// 🍃 Leaf Entity Mapper - flat leaf views → registered domain entities
//
// Leaves have no outward relationships: mapping is 1:1, the scalar values
// are copied through unchanged, and the result is registered right away.

use crate::dispatcher::BuildPass;
use crate::entities::letter_template::MAX_LINES;
use crate::entities::{ClassificationGroup, GroupKind, Id, LetterTemplate, PaymentTerm, PostalCode};
use crate::error::BuildError;
use crate::views::{GroupView, LetterTemplateView, PaymentTermView, PostalCodeView};

// ============================================================================
// FIELD VALIDATION
// ============================================================================

/// Required text must contain something other than whitespace
pub(crate) fn require_text(value: &str, field: &str) -> Result<(), BuildError> {
    if value.trim().is_empty() {
        return Err(BuildError::validation(field));
    }
    Ok(())
}

/// Numeric identities must be positive (0 is the "no relationship" sentinel)
pub(crate) fn require_identity(value: i32, field: &str) -> Result<i32, BuildError> {
    if value <= 0 {
        return Err(BuildError::validation(field));
    }
    Ok(value)
}

// ============================================================================
// PURE MAPPINGS
// ============================================================================

pub fn map_group(kind: GroupKind, view: GroupView) -> Result<ClassificationGroup, BuildError> {
    require_identity(view.id, "id")?;
    require_text(&view.name, "name")?;

    let mut group = ClassificationGroup::new(kind, view.id, view.name);
    group.side = view.side;
    Ok(group)
}

pub fn map_payment_term(view: PaymentTermView) -> Result<PaymentTerm, BuildError> {
    require_identity(view.id, "id")?;
    require_text(&view.name, "name")?;

    Ok(PaymentTerm::new(view.id, view.name))
}

pub fn map_postal_code(view: PostalCodeView) -> Result<PostalCode, BuildError> {
    require_text(&view.country_code, "country_code")?;
    require_text(&view.postal_code, "postal_code")?;
    require_text(&view.city, "city")?;

    Ok(PostalCode::new(view.country_code, view.postal_code, view.city))
}

pub fn map_letter_template(view: LetterTemplateView) -> Result<LetterTemplate, BuildError> {
    require_identity(view.id, "id")?;
    require_text(&view.name, "name")?;
    if view.lines.len() > MAX_LINES {
        return Err(BuildError::validation("lines"));
    }

    let mut template = LetterTemplate::new(view.id, view.name);
    template.lines = view.lines;
    template.company_number = view.company_number;
    Ok(template)
}

// ============================================================================
// REGISTERING MAPPINGS
// ============================================================================

impl<'r> BuildPass<'r> {
    pub(crate) fn make_group(
        &mut self,
        kind: GroupKind,
        view: GroupView,
    ) -> Result<Id<ClassificationGroup>, BuildError> {
        let group = map_group(kind, view)?;
        self.registry.register(group)
    }

    pub(crate) fn make_payment_term(
        &mut self,
        view: PaymentTermView,
    ) -> Result<Id<PaymentTerm>, BuildError> {
        let term = map_payment_term(view)?;
        self.registry.register(term)
    }

    pub(crate) fn make_postal_code(
        &mut self,
        view: PostalCodeView,
    ) -> Result<Id<PostalCode>, BuildError> {
        let code = map_postal_code(view)?;
        self.registry.register(code)
    }

    pub(crate) fn make_letter_template(
        &mut self,
        view: LetterTemplateView,
    ) -> Result<Id<LetterTemplate>, BuildError> {
        let template = map_letter_template(view)?;
        self.registry.register(template)
    }
}

// ============================================================================
// TESTS
// ============================================================================
