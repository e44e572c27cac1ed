use chrono::Utc;
use uuid::Uuid;

use optica_domain::pagination::{PageMeta, PageRequest};

use crate::authz::{Actor, ensure_owns_patient};
use crate::domain::repository::PatientRepository;
use crate::domain::types::{
    Patient, PatientAttrs, PatientListFilter, PatientPatch, PatientSortBy,
};
use crate::error::ApiError;

// ── CreatePatient ────────────────────────────────────────────────────────────

pub struct CreatePatientUseCase<R: PatientRepository> {
    pub repo: R,
}

impl<R: PatientRepository> CreatePatientUseCase<R> {
    pub async fn execute(&self, actor: &Actor, attrs: PatientAttrs) -> Result<Patient, ApiError> {
        let errors = attrs.validate();
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        if self.repo.national_id_exists(&attrs.national_id, None).await? {
            return Err(ApiError::NationalIdTaken);
        }

        let now = Utc::now();
        let patient = Patient {
            id: Uuid::now_v7(),
            user_id: actor.id,
            first_name: attrs.first_name,
            last_name: attrs.last_name,
            national_id: attrs.national_id,
            email: attrs.email,
            phone: attrs.phone,
            birth_date: attrs.birth_date,
            address: attrs.address,
            city: attrs.city,
            state: attrs.state,
            zip_code: attrs.zip_code,
            emergency_contact: attrs.emergency_contact,
            emergency_phone: attrs.emergency_phone,
            insurance_provider: attrs.insurance_provider,
            insurance_number: attrs.insurance_number,
            active: attrs.active.unwrap_or(true),
            notes: attrs.notes,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&patient).await?;
        Ok(patient)
    }
}

// ── ListPatients ─────────────────────────────────────────────────────────────

pub struct ListPatientsUseCase<R: PatientRepository> {
    pub repo: R,
}

impl<R: PatientRepository> ListPatientsUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        filter: PatientListFilter,
        sort_by: PatientSortBy,
        page: PageRequest,
    ) -> Result<(Vec<Patient>, PageMeta), ApiError> {
        let page = page.clamped();
        // Listing is owner-scoped for every role, admins included.
        let (patients, total) = self
            .repo
            .list(actor.id, &filter, sort_by, page)
            .await?;
        Ok((patients, PageMeta::new(page, total)))
    }
}

// ── GetPatient ───────────────────────────────────────────────────────────────

pub struct GetPatientUseCase<R: PatientRepository> {
    pub repo: R,
}

impl<R: PatientRepository> GetPatientUseCase<R> {
    pub async fn execute(&self, actor: &Actor, patient_id: Uuid) -> Result<Patient, ApiError> {
        let patient = self
            .repo
            .find_by_id(patient_id)
            .await?
            .ok_or(ApiError::PatientNotFound)?;
        ensure_owns_patient(actor, &patient)?;
        Ok(patient)
    }
}

// ── UpdatePatient ────────────────────────────────────────────────────────────

pub struct UpdatePatientUseCase<R: PatientRepository> {
    pub repo: R,
}

impl<R: PatientRepository> UpdatePatientUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        patient_id: Uuid,
        patch: PatientPatch,
    ) -> Result<Patient, ApiError> {
        let mut patient = self
            .repo
            .find_by_id(patient_id)
            .await?
            .ok_or(ApiError::PatientNotFound)?;
        ensure_owns_patient(actor, &patient)?;

        let errors = patch.validate();
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        if let Some(ref national_id) = patch.national_id {
            if national_id != &patient.national_id
                && self
                    .repo
                    .national_id_exists(national_id, Some(patient_id))
                    .await?
            {
                return Err(ApiError::NationalIdTaken);
            }
        }

        patch.apply_to(&mut patient);
        patient.updated_at = Utc::now();
        self.repo.update(&patient).await?;
        Ok(patient)
    }
}

// ── DeletePatient ────────────────────────────────────────────────────────────

/// Deletes the patient and, via cascade, every prescription under it.
pub struct DeletePatientUseCase<R: PatientRepository> {
    pub repo: R,
}

impl<R: PatientRepository> DeletePatientUseCase<R> {
    pub async fn execute(&self, actor: &Actor, patient_id: Uuid) -> Result<(), ApiError> {
        let patient = self
            .repo
            .find_by_id(patient_id)
            .await?
            .ok_or(ApiError::PatientNotFound)?;
        ensure_owns_patient(actor, &patient)?;
        self.repo.delete(patient_id).await?;
        Ok(())
    }
}

// ── TogglePatientStatus ──────────────────────────────────────────────────────

pub struct TogglePatientStatusUseCase<R: PatientRepository> {
    pub repo: R,
}

impl<R: PatientRepository> TogglePatientStatusUseCase<R> {
    pub async fn execute(&self, actor: &Actor, patient_id: Uuid) -> Result<Patient, ApiError> {
        let mut patient = self
            .repo
            .find_by_id(patient_id)
            .await?
            .ok_or(ApiError::PatientNotFound)?;
        ensure_owns_patient(actor, &patient)?;

        patient.active = !patient.active;
        patient.updated_at = Utc::now();
        self.repo.update(&patient).await?;
        Ok(patient)
    }
}

// ── PatientFilterOptions ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct PatientFilterOptions {
    pub cities: Vec<String>,
    pub states: Vec<String>,
}

/// Distinct city/state values for the caller's visible patients, used to
/// populate filter dropdowns.
pub struct PatientFilterOptionsUseCase<R: PatientRepository> {
    pub repo: R,
}

impl<R: PatientRepository> PatientFilterOptionsUseCase<R> {
    pub async fn execute(&self, actor: &Actor) -> Result<PatientFilterOptions, ApiError> {
        Ok(PatientFilterOptions {
            cities: self.repo.distinct_cities(actor.id).await?,
            states: self.repo.distinct_states(actor.id).await?,
        })
    }
}
