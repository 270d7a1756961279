//! Data source error types using thiserror.

use sgraph_common::{RefId, SGraphError};

/// Errors returned to the host.
#[derive(thiserror::Error, Debug)]
pub enum DataSourceError {
    /// One query target failed; the whole query fails with it.
    #[error("Query target '{ref_id}' failed: {source}")]
    Target {
        /// The failing target.
        ref_id: RefId,
        /// What went wrong.
        #[source]
        source: SGraphError,
    },

    /// Settings or request-level failure.
    #[error(transparent)]
    Core(#[from] SGraphError),
}

impl DataSourceError {
    /// The underlying SGraph error.
    pub fn inner(&self) -> &SGraphError {
        match self {
            Self::Target { source, .. } | Self::Core(source) => source,
        }
    }
}

/// Result type for data source operations.
pub type DataSourceResult<T> = Result<T, DataSourceError>;
