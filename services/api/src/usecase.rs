pub mod patient;
pub mod prescription;
pub mod session;
pub mod user;
