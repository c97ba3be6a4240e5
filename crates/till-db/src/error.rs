//! # Database and Ledger Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError ← categorised, original sqlx error kept as the source         │
//! │       │                                                                 │
//! │       │          ValidationError / CoreError (till-core)               │
//! │       │                     │                                           │
//! │       ▼                     ▼                                           │
//! │  LedgerError::Storage   LedgerError::Rejected                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  caller: err.kind() → Validation | Referential | Policy | Storage      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use till_core::{CoreError, ValidationError};

// =============================================================================
// DbError
// =============================================================================

/// Storage gateway errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - An UPDATE keyed by id touched zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (product code, document numbers).
    ///
    /// `value` is known only when the caller re-labels the error, as
    /// product insert does with the code it tried.
    #[error(
        "Duplicate {field}{}",
        .value.as_deref().map(|v| format!(": '{}' already exists", v)).unwrap_or_default()
    )]
    UniqueViolation {
        field: String,
        value: Option<String>,
        #[source]
        source: sqlx::Error,
    },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    /// CHECK constraint or guard trigger fired.
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    /// A row that must never change (the walk-in customer).
    #[error("{entity} {id} cannot be modified")]
    Immutable { entity: String, id: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement, commit or rollback failure.
    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Pool exhausted (acquire timed out).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSaveFailed(String),

    /// Catalog input rejected before insert.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Re-labels a UniqueViolation with the field and value the caller
    /// tried to insert. Other errors pass through unchanged.
    pub fn label_duplicate(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            DbError::UniqueViolation { source, .. } => DbError::UniqueViolation {
                field: field.into(),
                value: Some(value.into()),
                source,
            },
            other => other,
        }
    }

    /// True for errors caused by an id that does not resolve.
    pub fn is_referential(&self) -> bool {
        matches!(
            self,
            DbError::NotFound { .. } | DbError::ForeignKeyViolation { .. }
        )
    }

    /// True if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DbError::InvalidConfig(_) | DbError::ConfigLoadFailed(_) | DbError::ConfigSaveFailed(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → by message: UNIQUE / FOREIGN KEY / CHECK / trigger
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Query (source kept)
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(msg) = err.as_database_error().map(|e| e.message().to_string()) {
            // SQLite messages:
            //   "UNIQUE constraint failed: <table>.<column>"
            //   "FOREIGN KEY constraint failed"
            //   "CHECK constraint failed: <expr>"
            if let Some(field) = msg.split("UNIQUE constraint failed: ").nth(1) {
                return DbError::UniqueViolation {
                    field: field.to_string(),
                    value: None,
                    source: err,
                };
            }
            if msg.contains("FOREIGN KEY constraint failed") {
                return DbError::ForeignKeyViolation {
                    message: msg,
                    source: err,
                };
            }
            if msg.contains("CHECK constraint failed") || msg.contains("is immutable") {
                return DbError::ConstraintViolation {
                    message: msg,
                    source: err,
                };
            }
            return DbError::Query(err);
        }

        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::Query(other),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for DbError {
    fn from(err: toml::de::Error) -> Self {
        DbError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for DbError {
    fn from(err: toml::ser::Error) -> Self {
        DbError::ConfigSaveFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// LedgerError
// =============================================================================

/// Coarse failure class of a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Bad request; nothing was written.
    Validation,
    /// An id did not resolve; the scope (if open) was rolled back.
    Referential,
    /// A store policy refused the operation (stock, returns, credit).
    Policy,
    /// The storage gateway failed; the scope was rolled back.
    Storage,
}

/// Error returned by `LedgerEngine` operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl LedgerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LedgerError::Rejected(CoreError::Validation(_)) => FailureKind::Validation,
            LedgerError::Rejected(e) if e.is_referential() => FailureKind::Referential,
            LedgerError::Rejected(_) => FailureKind::Policy,
            LedgerError::Storage(e) if e.is_referential() => FailureKind::Referential,
            LedgerError::Storage(_) => FailureKind::Storage,
        }
    }

    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Rejected(CoreError::Validation(v)) => Some(v),
            _ => None,
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Rejected(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Storage(err.into())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn driver_error(msg: &str) -> sqlx::Error {
        sqlx::Error::Protocol(msg.to_string())
    }

    #[test]
    fn test_error_display() {
        assert_eq!(DbError::not_found("Product", 42).to_string(), "Product not found: 42");

        let unlabelled = DbError::UniqueViolation {
            field: "sales.invoice_number".to_string(),
            value: None,
            source: driver_error("UNIQUE constraint failed: sales.invoice_number"),
        };
        assert_eq!(unlabelled.to_string(), "Duplicate sales.invoice_number");

        let labelled = unlabelled.label_duplicate("invoice number", "INV-20260314-0001");
        assert_eq!(
            labelled.to_string(),
            "Duplicate invoice number: 'INV-20260314-0001' already exists"
        );
    }

    #[test]
    fn test_constraint_errors_keep_driver_cause() {
        let err = DbError::ConstraintViolation {
            message: "CHECK constraint failed: qty > 0".to_string(),
            source: driver_error("CHECK constraint failed: qty > 0"),
        };
        let cause = std::error::Error::source(&err).map(ToString::to_string);
        assert!(cause.is_some_and(|c| c.contains("qty > 0")));

        let ledger: LedgerError = err.into();
        assert!(std::error::Error::source(&ledger).is_some());

        assert!(DbError::PoolExhausted.label_duplicate("code", "X").to_string().contains("pool"));
    }

    #[test]
    fn test_sqlx_mapping() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound { .. }));
        assert!(matches!(DbError::from(sqlx::Error::PoolTimedOut), DbError::PoolExhausted));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_failure_kinds() {
        let validation: LedgerError = ValidationError::EmptyCart.into();
        assert_eq!(validation.kind(), FailureKind::Validation);
        assert!(validation.as_validation().is_some());

        let referential: LedgerError = CoreError::SupplierNotFound(3).into();
        assert_eq!(referential.kind(), FailureKind::Referential);

        let policy: LedgerError = CoreError::InsufficientStock {
            code: "P".to_string(),
            available: 0,
            requested: 1,
        }
        .into();
        assert_eq!(policy.kind(), FailureKind::Policy);

        let fk: LedgerError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
            source: driver_error("FOREIGN KEY constraint failed"),
        }
        .into();
        assert_eq!(fk.kind(), FailureKind::Referential);

        let storage: LedgerError = DbError::PoolExhausted.into();
        assert_eq!(storage.kind(), FailureKind::Storage);
    }

    #[test]
    fn test_config_errors() {
        assert!(DbError::InvalidConfig("x".into()).is_config_error());
        assert!(!DbError::PoolExhausted.is_config_error());
    }
}
