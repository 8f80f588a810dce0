//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use rust_xlsxwriter::XlsxError;
use smartcon_domain::SmartconError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SmartconError);

impl From<InfraError> for SmartconError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SmartconError> for InfraError {
    fn from(value: SmartconError) -> Self {
        InfraError(value)
    }
}

trait IntoSmartconError {
    fn into_smartcon(self) -> SmartconError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SmartconError */
/* -------------------------------------------------------------------------- */

impl IntoSmartconError for SqlError {
    fn into_smartcon(self) -> SmartconError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        SmartconError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        SmartconError::Database("database is locked".into())
                    }
                    // SQLITE_CONSTRAINT_PRIMARYKEY / SQLITE_CONSTRAINT_UNIQUE
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        SmartconError::Conflict(format!("document already exists: {message}"))
                    }
                    _ => SmartconError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => SmartconError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                SmartconError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SmartconError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => SmartconError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => SmartconError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_smartcon())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SmartconError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(SmartconError::Database(format!("connection pool: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SmartconError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(SmartconError::Database(format!("malformed stored document: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SmartconError */
/* -------------------------------------------------------------------------- */

impl IntoSmartconError for HttpError {
    fn into_smartcon(self) -> SmartconError {
        if self.is_timeout() {
            return SmartconError::Network("HTTP request timed out".into());
        }
        if self.is_connect() {
            return SmartconError::Network("HTTP connection failure".into());
        }
        if self.is_decode() {
            return SmartconError::Network(format!("unexpected response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => SmartconError::Auth(message),
                404 => SmartconError::NotFound(message),
                400..=499 if code != 429 => SmartconError::InvalidInput(message),
                _ => SmartconError::Network(message),
            };
        }

        SmartconError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_smartcon())
    }
}

/* -------------------------------------------------------------------------- */
/* rust_xlsxwriter::XlsxError → SmartconError */
/* -------------------------------------------------------------------------- */

impl From<XlsxError> for InfraError {
    fn from(value: XlsxError) -> Self {
        InfraError(SmartconError::Export(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
