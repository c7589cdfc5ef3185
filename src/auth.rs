//! Credential bundle model, token secrets, and the token response shape shared by login and
//! renewal exchanges.

pub mod bundle;
pub mod response;
pub mod secret;

pub use bundle::*;
pub use response::*;
pub use secret::*;
