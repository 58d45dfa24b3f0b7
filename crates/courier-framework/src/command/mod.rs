//! Command routing.
//!
//! - [`CommandFilter`]: forwards one command name to a delegate
//! - [`ValidatingCommandFilter`]: also enforces an argument count and
//!   replies with usage text on mismatch
//! - [`HelpHandler`]: answers `/help` with a listing built from
//!   [`CommandSignature`]s
//!
//! All three cancel the event when the command name matches, so the first
//! matching filter owns the command unless its delegate clears the flag.
//! Register them under [`MessageType::COMMAND`](crate::MessageType::COMMAND).

mod filter;
mod help;
mod validating;

pub use filter::CommandFilter;
pub use help::HelpHandler;
pub use validating::{Argument, CommandSignature, ValidatingCommandFilter};
