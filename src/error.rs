use thiserror::Error;

use crate::sim::{ActionKind, RegistryHandle};

/// Fatal simulation errors. These indicate a programming or lifecycle bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("no stepping function registered for action kind {0:?}")]
    MissingAction(ActionKind),

    #[error("registry handle {0:?} is not registered")]
    RegistryCorruption(RegistryHandle),
}

/// A rejected tunable edit. The tunable keeps its previous value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}: cannot parse {raw:?}: {reason}")]
pub struct ParseError {
    pub name: &'static str,
    pub raw: String,
    pub reason: String,
}

/// A panel edit that could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no tunable named {0:?}")]
    UnknownTunable(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, SimError>;
