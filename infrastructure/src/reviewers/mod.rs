//! Reviewer backend adapters
//!
//! Two equivalent call paths behind the same port: [`direct`] speaks JSON
//! over stdin/stdout of the reviewer command, [`legacy`] passes the request
//! as argv and reads plain text. [`routing`] maps reviewer ids to commands.

pub mod direct;
pub mod legacy;
pub mod routing;
