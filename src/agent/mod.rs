//! The tool protocol engine: markup scanning, file tool execution, and the
//! conversation session that ties them to the transport.

pub mod protocol;
pub mod session;
pub mod system_prompt;
pub mod tools;

pub use session::Session;
