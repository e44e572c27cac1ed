#![allow(async_fn_in_trait)]

use uuid::Uuid;

use optica_domain::pagination::PageRequest;

use crate::domain::types::{
    Patient, PatientListFilter, PatientSortBy, Prescription, User,
};
use crate::error::ApiError;

/// Repository for staff accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// True when another user already holds `email`. `exclude` skips the
    /// given user so updates do not collide with themselves.
    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, ApiError>;

    /// Page of users ordered by creation time, plus the total count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError>;

    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Persist the mutable columns of an existing user, `jti` included.
    async fn update(&self, user: &User) -> Result<(), ApiError>;

    /// Delete a user. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

// Lets one usecase delegate to another without giving up its repository.
impl<R: UserRepository> UserRepository for &R {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        (**self).find_by_id(id).await
    }
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        (**self).find_by_email(email).await
    }
    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, ApiError> {
        (**self).email_exists(email, exclude).await
    }
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        (**self).list(page).await
    }
    async fn create(&self, user: &User) -> Result<(), ApiError> {
        (**self).create(user).await
    }
    async fn update(&self, user: &User) -> Result<(), ApiError> {
        (**self).update(user).await
    }
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        (**self).delete(id).await
    }
}

/// Repository for patient records.
pub trait PatientRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, ApiError>;

    /// Filtered, sorted page of one user's patients plus the total count
    /// matching the filter. Every caller passes their own id; patients are
    /// never listed across owners.
    async fn list(
        &self,
        owner: Uuid,
        filter: &PatientListFilter,
        sort_by: PatientSortBy,
        page: PageRequest,
    ) -> Result<(Vec<Patient>, u64), ApiError>;

    /// True when another patient already holds `national_id`.
    async fn national_id_exists(
        &self,
        national_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, ApiError>;

    async fn create(&self, patient: &Patient) -> Result<(), ApiError>;
    async fn update(&self, patient: &Patient) -> Result<(), ApiError>;

    /// Delete a patient and, via cascade, its prescriptions. Returns `true`
    /// if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Distinct non-null city values among `owner`'s patients, for filter
    /// dropdowns.
    async fn distinct_cities(&self, owner: Uuid) -> Result<Vec<String>, ApiError>;
    async fn distinct_states(&self, owner: Uuid) -> Result<Vec<String>, ApiError>;
}

/// Repository for prescription aggregates. Reads and writes always cover
/// the parent row together with its eyes, lenses, and frame.
pub trait PrescriptionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prescription>, ApiError>;

    /// Page of a patient's prescriptions, newest exam first, plus the
    /// total count.
    async fn list_for_patient(
        &self,
        patient_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Prescription>, u64), ApiError>;

    /// True when another prescription already holds `order_number`.
    async fn order_number_exists(
        &self,
        order_number: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, ApiError>;

    /// Insert the whole aggregate in one transaction.
    async fn create(&self, prescription: &Prescription) -> Result<(), ApiError>;

    /// Persist the whole aggregate in one transaction: the parent row is
    /// updated, sub-records present on `prescription` are upserted by id,
    /// and the listed ids are deleted.
    async fn update(
        &self,
        prescription: &Prescription,
        removed_eyes: &[Uuid],
        removed_lenses: &[Uuid],
        removed_frame: Option<Uuid>,
    ) -> Result<(), ApiError>;

    /// Delete a prescription and, via cascade, its sub-records. Returns
    /// `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}
