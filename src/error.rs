// Error taxonomy for the catalog store
use thiserror::Error;

/// Errors surfaced by the catalog store.
///
/// "Not found" is never an error: lookups return id 0, fetches return the
/// default record, and the video-site lookup returns an empty string.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A store access failed while working against the named table.
    #[error("error accessing {table}: {source}")]
    Store {
        table: &'static str,
        source: rusqlite::Error,
    },

    /// Opening the store or creating/dropping the schema failed.
    #[error("schema error: {source}")]
    Schema { source: rusqlite::Error },

    /// The store directory could not be created.
    #[error("cannot create store directory: {0}")]
    Io(#[from] std::io::Error),

    /// Caller precondition violated; rejected before any store access.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl StoreError {
    /// Wrap a rusqlite error with the table it occurred against.
    pub(crate) fn store(table: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
        move |source| StoreError::Store { table, source }
    }

    pub(crate) fn schema(source: rusqlite::Error) -> StoreError {
        StoreError::Schema { source }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
