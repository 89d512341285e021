// ABOUTME: Command module aggregator for the yardcheck CLI.
// ABOUTME: Re-exports validate, status, and submit command handlers.

mod status;
mod submit;
mod validate;

pub use status::status;
pub use submit::submit;
pub use validate::{check_digit, validate};
