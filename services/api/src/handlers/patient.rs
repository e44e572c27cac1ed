use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use optica_domain::pagination::{PageMeta, PageRequest};

use crate::authz::Actor;
use crate::domain::types::{Patient, PatientAttrs, PatientListFilter, PatientPatch, PatientSortBy};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::patient::{
    CreatePatientUseCase, DeletePatientUseCase, GetPatientUseCase, ListPatientsUseCase,
    PatientFilterOptionsUseCase, TogglePatientStatusUseCase, UpdatePatientUseCase,
};

#[derive(Serialize)]
pub struct PatientResponse {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub national_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub active: bool,
    pub notes: Option<String>,
    #[serde(serialize_with = "optica_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<Utc>,
    #[serde(serialize_with = "optica_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: patient.id.to_string(),
            user_id: patient.user_id.to_string(),
            full_name: patient.full_name(),
            age: patient.age(today),
            first_name: patient.first_name,
            last_name: patient.last_name,
            national_id: patient.national_id,
            email: patient.email,
            phone: patient.phone,
            birth_date: patient.birth_date,
            address: patient.address,
            city: patient.city,
            state: patient.state,
            zip_code: patient.zip_code,
            emergency_contact: patient.emergency_contact,
            emergency_phone: patient.emergency_phone,
            insurance_provider: patient.insurance_provider,
            insurance_number: patient.insurance_number,
            active: patient.active,
            notes: patient.notes,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

// ── GET /patients ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListPatientsQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// "active" or "inactive"; anything else means no status filter.
    pub status: Option<String>,
    pub sorted_by: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize)]
pub struct PatientListResponse {
    pub items: Vec<PatientResponse>,
    pub meta: PageMeta,
}

pub async fn list_patients(
    actor: Actor,
    State(state): State<AppState>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let filter = PatientListFilter {
        search: query.search,
        city: query.city,
        state: query.state,
        active: match query.status.as_deref() {
            Some("active") => Some(true),
            Some("inactive") => Some(false),
            _ => None,
        },
    };
    let sort_by = PatientSortBy::from_param(query.sorted_by.as_deref());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let usecase = ListPatientsUseCase {
        repo: state.patient_repo(),
    };
    let (patients, meta) = usecase.execute(&actor, filter, sort_by, page).await?;
    Ok(Json(PatientListResponse {
        items: patients.into_iter().map(Into::into).collect(),
        meta,
    }))
}

// ── GET /patients/filter-options ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct FilterOptionsResponse {
    pub cities: Vec<String>,
    pub states: Vec<String>,
}

pub async fn patient_filter_options(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let usecase = PatientFilterOptionsUseCase {
        repo: state.patient_repo(),
    };
    let options = usecase.execute(&actor).await?;
    Ok(Json(FilterOptionsResponse {
        cities: options.cities,
        states: options.states,
    }))
}

// ── POST /patients ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

pub async fn create_patient(
    actor: Actor,
    State(state): State<AppState>,
    Json(body): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let usecase = CreatePatientUseCase {
        repo: state.patient_repo(),
    };
    let patient = usecase
        .execute(
            &actor,
            PatientAttrs {
                first_name: body.first_name,
                last_name: body.last_name,
                national_id: body.national_id,
                email: body.email,
                phone: body.phone,
                birth_date: body.birth_date,
                address: body.address,
                city: body.city,
                state: body.state,
                zip_code: body.zip_code,
                emergency_contact: body.emergency_contact,
                emergency_phone: body.emergency_phone,
                insurance_provider: body.insurance_provider,
                insurance_number: body.insurance_number,
                active: body.active,
                notes: body.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(patient.into())))
}

// ── GET /patients/{id} ───────────────────────────────────────────────────────

pub async fn get_patient(
    actor: Actor,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientResponse>, ApiError> {
    let usecase = GetPatientUseCase {
        repo: state.patient_repo(),
    };
    let patient = usecase.execute(&actor, patient_id).await?;
    Ok(Json(patient.into()))
}

// ── PATCH /patients/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

pub async fn update_patient(
    actor: Actor,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Json(body): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, ApiError> {
    let usecase = UpdatePatientUseCase {
        repo: state.patient_repo(),
    };
    let patient = usecase
        .execute(
            &actor,
            patient_id,
            PatientPatch {
                first_name: body.first_name,
                last_name: body.last_name,
                national_id: body.national_id,
                email: body.email,
                phone: body.phone,
                birth_date: body.birth_date,
                address: body.address,
                city: body.city,
                state: body.state,
                zip_code: body.zip_code,
                emergency_contact: body.emergency_contact,
                emergency_phone: body.emergency_phone,
                insurance_provider: body.insurance_provider,
                insurance_number: body.insurance_number,
                active: body.active,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(patient.into()))
}

// ── DELETE /patients/{id} ────────────────────────────────────────────────────

pub async fn delete_patient(
    actor: Actor,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeletePatientUseCase {
        repo: state.patient_repo(),
    };
    usecase.execute(&actor, patient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /patients/{id}/toggle-status ────────────────────────────────────────

pub async fn toggle_patient_status(
    actor: Actor,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientResponse>, ApiError> {
    let usecase = TogglePatientStatusUseCase {
        repo: state.patient_repo(),
    };
    let patient = usecase.execute(&actor, patient_id).await?;
    Ok(Json(patient.into()))
}
