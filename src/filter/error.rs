use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid filter field: {0}")]
    InvalidField(String),

    // A trailing backslash would escape the closing quote
    #[error("Invalid filter value: {0}")]
    InvalidValue(String),

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),
}
