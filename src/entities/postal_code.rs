// 📮 Postal Code - city lookup keyed by (country, code)

use super::{Entity, EntityKind};
use crate::registry::{Arena, Registry};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct PostalCode {
    /// ISO 3166-1 alpha-2 country code (e.g. "DK")
    pub country_code: String,
    pub code: String,
    pub city: String,
}

impl PostalCode {
    pub fn new(country_code: String, code: String, city: String) -> Self {
        PostalCode {
            country_code,
            code,
            city,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostalCodeKey {
    pub country_code: String,
    pub code: String,
}

impl fmt::Display for PostalCodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.country_code, self.code)
    }
}

impl Entity for PostalCode {
    type Key = PostalCodeKey;

    fn key(&self) -> PostalCodeKey {
        PostalCodeKey {
            country_code: self.country_code.clone(),
            code: self.code.clone(),
        }
    }

    fn kind(&self) -> EntityKind {
        EntityKind::PostalCode
    }

    fn key_kind(_key: &PostalCodeKey) -> EntityKind {
        EntityKind::PostalCode
    }

    fn arena(registry: &Registry) -> &Arena<Self> {
        &registry.postal_codes
    }

    fn arena_mut(registry: &mut Registry) -> &mut Arena<Self> {
        &mut registry.postal_codes
    }
}
