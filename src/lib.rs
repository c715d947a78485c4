#![warn(clippy::pedantic)]
#![warn(clippy::panic)]
#![forbid(unsafe_code)]

pub use authorized_keys::Store;
pub use key::AuthorizedKey;
pub use username::Username;

pub mod authorized_keys;
pub mod cli;
pub mod github;
pub mod key;
pub mod username;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
