//! Errors raised at the terminal boundary.

use gambit_core::{RulesError, SnapshotError};

/// Malformed text typed at a prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The line was blank.
    #[error("entered empty string, please try again")]
    Empty,

    /// The text is not a column letter followed by a row digit.
    #[error("incorrect input format {text:?}: give the column and row with no spaces, e.g. A2 or B6")]
    BadCoordinate {
        /// The text as typed.
        text: String,
    },

    /// A save name that cannot be used as a file name.
    #[error("invalid save name {name:?}")]
    BadSaveName {
        /// The name as typed.
        name: String,
    },
}

/// Errors that can end an interactive session.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Bad text at a prompt.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A request the rules refused.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A save file whose contents do not describe a playable game.
    #[error("corrupt save: {source}")]
    Snapshot {
        /// The validation failure.
        #[from]
        source: SnapshotError,
    },

    /// A save file that does not exist.
    #[error("save file {name} not found")]
    SaveNotFound {
        /// The requested save name.
        name: String,
    },

    /// Reading from the terminal or the save directory failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A save file is not valid JSON for a game snapshot.
    #[error("malformed save file: {source}")]
    Json {
        /// The underlying decoding error.
        #[from]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Return `true` if the player can simply be asked again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CliError::Input(_) | CliError::SaveNotFound { .. } => true,
            CliError::Rules(err) => err.is_recoverable(),
            _ => false,
        }
    }
}
