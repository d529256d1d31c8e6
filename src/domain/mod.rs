pub mod auth;
pub mod limits;
pub mod quota;
pub mod role;
pub mod user;
