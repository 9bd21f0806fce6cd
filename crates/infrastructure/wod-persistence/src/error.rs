#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("catalog store missing")]
    Missing,
    #[error("catalog store schema is invalid or corrupt")]
    Corrupt,
    #[error("catalog store is from a newer release (schema_version={found}, supported={supported})")]
    NewerSchema { found: u32, supported: u32 },
    #[error("catalog store is already open in this process")]
    DatabaseAlreadyOpen,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("redb error: {0}")]
    Redb(Box<redb::Error>),
    #[error("redb database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("redb transaction error: {0}")]
    RedbTransaction(Box<redb::TransactionError>),
    #[error("redb table error: {0}")]
    RedbTable(Box<redb::TableError>),
    #[error("redb storage error: {0}")]
    RedbStorage(Box<redb::StorageError>),
    #[error("redb commit error: {0}")]
    RedbCommit(Box<redb::CommitError>),
    #[error("stored record {stored} does not match key {key}")]
    KeyMismatch { key: String, stored: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Missing,
    Corrupt,
    NewerSchema,
    Busy,
    Io,
    Codec,
    Backend,
}

impl StorageError {
    /// Whether reopening later may succeed without touching the file.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), StorageErrorKind::Busy | StorageErrorKind::Io)
    }

    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::Missing => StorageErrorKind::Missing,
            StorageError::Corrupt => StorageErrorKind::Corrupt,
            StorageError::NewerSchema { .. } => StorageErrorKind::NewerSchema,
            StorageError::DatabaseAlreadyOpen => StorageErrorKind::Busy,
            StorageError::Io(_) => StorageErrorKind::Io,
            StorageError::Serde(_) => StorageErrorKind::Codec,
            StorageError::KeyMismatch { .. } => StorageErrorKind::Corrupt,
            StorageError::Redb(_)
            | StorageError::RedbDatabase(_)
            | StorageError::RedbTransaction(_)
            | StorageError::RedbTable(_)
            | StorageError::RedbStorage(_)
            | StorageError::RedbCommit(_) => StorageErrorKind::Backend,
        }
    }
}

macro_rules! boxed_backend_error {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for StorageError {
                fn from(value: $source) -> Self {
                    Self::$variant(Box::new(value))
                }
            }
        )+
    };
}

boxed_backend_error!(
    redb::Error => Redb,
    redb::TransactionError => RedbTransaction,
    redb::TableError => RedbTable,
    redb::StorageError => RedbStorage,
    redb::CommitError => RedbCommit,
);

// Already-open databases are a state, not a backend failure.
impl From<redb::DatabaseError> for StorageError {
    fn from(value: redb::DatabaseError) -> Self {
        match value {
            redb::DatabaseError::DatabaseAlreadyOpen => Self::DatabaseAlreadyOpen,
            other => Self::RedbDatabase(Box::new(other)),
        }
    }
}
