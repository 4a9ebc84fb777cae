use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Cannot sort by column: {0}")]
    InvalidColumn(String),

    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),
}
