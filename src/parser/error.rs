use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Fatal for one document. A batch driver records it and moves on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("metadata not found: {0}")]
    MetadataNotFound(String),
}

/// Recoverable findings; the session is still produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    UnmatchedAgendaAnnouncement { label: String, id: String, offset: usize },
    UnresolvedAgendaTopic { label: String, id: String },
    UnmatchedAgendaSplit { label: String, id: String, offset: usize },
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn push(&mut self, warning: Warning) {
        match &warning {
            Warning::UnmatchedAgendaAnnouncement { label, id, offset } => {
                warn!(label = %label, id = %id, offset, "announcement matches no agenda topic, dropped")
            }
            Warning::UnresolvedAgendaTopic { label, id } => {
                warn!(label = %label, id = %id, "no debate found for agenda topic")
            }
            Warning::UnmatchedAgendaSplit { label, id, offset } => {
                warn!(label = %label, id = %id, offset, "no contribution contains agenda topic start")
            }
        }
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
