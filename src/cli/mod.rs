//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs, one per subcommand.

mod compliance;
mod standards;

pub use compliance::run_compliance;
pub use standards::run_standards;
