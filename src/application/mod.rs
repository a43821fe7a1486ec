//! Application layer: edit scripts and the session that runs them

pub mod error;
pub mod script;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use script::{parse_line, parse_script, Command};
pub use session::{RunSummary, Session, Step};
