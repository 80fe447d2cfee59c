//! Error types shared by every flownet crate.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FlowError>;

/// All the ways turning flow records into graphs can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// A granularity string outside county/prefecture/province.
    #[error("granularity must be one of county, prefecture, province, got '{0}'")]
    InvalidGranularity(String),

    /// A location code whose truncated prefix is not numeric.
    #[error("location code '{0}' has a non-numeric prefix")]
    MalformedCode(String),

    /// A truncated code with no entry in the reference table.
    #[error("code {code} not found in the {table} reference table")]
    UnknownLocation { table: &'static str, code: u32 },

    /// A gender code outside the closed enumeration.
    #[error("unknown gender code {0}")]
    UnknownGender(u8),

    /// An education-level code outside the closed enumeration.
    #[error("unknown education level code {0}")]
    UnknownEducationLevel(u8),

    /// Metrics requested on a graph too small to have any.
    #[error("graph has {nodes} node(s); topological metrics need at least 2")]
    DegenerateGraph { nodes: usize },
}
