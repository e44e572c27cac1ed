use sea_orm::DatabaseConnection;

use crate::config::RegistrationMode;
use crate::infra::db::{DbPatientRepository, DbPrescriptionRepository, DbUserRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub registration_mode: RegistrationMode,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn patient_repo(&self) -> DbPatientRepository {
        DbPatientRepository {
            db: self.db.clone(),
        }
    }

    pub fn prescription_repo(&self) -> DbPrescriptionRepository {
        DbPrescriptionRepository {
            db: self.db.clone(),
        }
    }
}
