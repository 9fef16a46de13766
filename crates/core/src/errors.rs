use thiserror::Error;

use crate::domain::line_item::{LineItemField, LineItemKind};
use crate::export::ExportError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("section heading must not be empty")]
    EmptySectionLabel,
    #[error("row {index} does not exist (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },
    #[error("{field} cannot be edited on a {kind} row")]
    FieldNotEditable { field: LineItemField, kind: LineItemKind },
    #[error("unknown line item field `{0}`")]
    UnknownField(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("export failure: {0}")]
    Export(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<ExportError> for ApplicationError {
    fn from(error: ExportError) -> Self {
        Self::Export(error.to_string())
    }
}

impl ApplicationError {
    /// Exit code used by the operator CLI for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Domain(_) => 1,
            Self::Configuration(_) => 2,
            Self::Persistence(_) => 4,
            Self::Export(_) => 6,
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "validation",
            Self::Configuration(_) => "config_validation",
            Self::Persistence(_) => "persistence",
            Self::Export(_) => "export",
        }
    }
}
