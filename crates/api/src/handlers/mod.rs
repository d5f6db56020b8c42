pub mod auth;
pub mod directory;
pub mod tickets;
pub mod users;
