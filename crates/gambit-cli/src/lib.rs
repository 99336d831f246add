//! Terminal front end for gambit: coordinate parsing, save files and the turn loop.

pub mod error;
pub mod notation;
pub mod save;
pub mod session;

pub use error::{CliError, InputError};
pub use notation::parse_square;
pub use save::SaveStore;
pub use session::{Session, SessionConfig, SessionEnd};
