use thiserror::Error;

/// How a persistence failure should be classified.
///
/// The loader treats every storage failure as recoverable for the batch,
/// but callers inspecting the error can tell a constraint violation from
/// a dead connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Constraint violation (unique, not-null, check).
    Constraint,

    /// The database could not be reached or opened, or is locked/busy.
    Connection,

    /// A value could not be converted to or from an SQL type.
    Serialization,

    /// Anything SQLite reports that does not fit the buckets above.
    Other,
}

impl StorageErrorKind {
    /// Classify a rusqlite error into a storage error kind.
    pub fn classify(err: &rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match err {
            rusqlite::Error::SqliteFailure(ffi_err, _) => match ffi_err.code {
                ErrorCode::ConstraintViolation => StorageErrorKind::Constraint,
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::ReadOnly
                | ErrorCode::PermissionDenied => StorageErrorKind::Connection,
                ErrorCode::TypeMismatch => StorageErrorKind::Serialization,
                _ => StorageErrorKind::Other,
            },
            rusqlite::Error::ToSqlConversionFailure(_)
            | rusqlite::Error::FromSqlConversionFailure(_, _, _)
            | rusqlite::Error::Utf8Error(_)
            | rusqlite::Error::InvalidColumnType(_, _, _) => StorageErrorKind::Serialization,
            _ => StorageErrorKind::Other,
        }
    }
}

impl std::fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StorageErrorKind::Constraint => "constraint",
            StorageErrorKind::Connection => "connection",
            StorageErrorKind::Serialization => "serialization",
            StorageErrorKind::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Storage error ({kind}) for table {table}: {message}")]
    Storage {
        table: String,
        kind: StorageErrorKind,
        message: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    /// Wrap a rusqlite error as a classified storage error for `table`.
    pub fn storage(table: &str, err: rusqlite::Error) -> Self {
        IngestError::Storage {
            table: table.to_string(),
            kind: StorageErrorKind::classify(&err),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
