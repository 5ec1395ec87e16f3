// ❗ Build Errors - one error shape for every build pass failure
//
// Known failures (validation, integrity) travel unchanged from the component
// that raised them up to the caller. Anything foreign, such as a resolver
// that fails while fetching a record, is wrapped into `Unexpected` together
// with its cause.

use crate::dispatcher::TargetKind;
use crate::entities::EntityKind;

/// Every failure a build pass can report.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A required scalar on an input record is missing or empty.
    #[error("required field `{field}` is missing or empty")]
    Validation { field: String },

    /// A mandatory relationship could not be resolved via the registry or a pull resolver.
    #[error("{kind} {id} not found")]
    ReferenceNotFound { kind: EntityKind, id: String },

    /// Two records claim the same identity within one pass.
    #[error("{kind} {id} is already registered in this build pass")]
    DuplicateIdentity { kind: EntityKind, id: String },

    /// Two time-series rows for the same account and period.
    #[error("account {account} already has a record for {year}-{month:02}")]
    DuplicateTimeSeriesEntry { account: String, year: i32, month: u32 },

    /// The record shape cannot produce the requested target kind.
    #[error("cannot build {target} from a {record} record")]
    UnsupportedMapping { record: &'static str, target: TargetKind },

    /// A failure outside the taxonomy above, with its original cause.
    #[error("{context}")]
    Unexpected {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl BuildError {
    pub fn validation(field: impl Into<String>) -> Self {
        BuildError::Validation {
            field: field.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        BuildError::ReferenceNotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn duplicate(kind: EntityKind, id: impl ToString) -> Self {
        BuildError::DuplicateIdentity {
            kind,
            id: id.to_string(),
        }
    }

    pub fn unexpected(context: impl Into<String>, source: anyhow::Error) -> Self {
        BuildError::Unexpected {
            context: context.into(),
            source,
        }
    }

    /// True for failures caused by inconsistent input data (as opposed to a
    /// malformed single record or a foreign failure).
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            BuildError::ReferenceNotFound { .. }
                | BuildError::DuplicateIdentity { .. }
                | BuildError::DuplicateTimeSeriesEntry { .. }
        )
    }
}
