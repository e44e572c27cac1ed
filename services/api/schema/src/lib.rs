//! sea-orm entities for the optica API service.

pub mod frames;
pub mod lenses;
pub mod patients;
pub mod prescription_eyes;
pub mod prescriptions;
pub mod users;
