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
use crate::domain::types::{
    EyeAttrs, EyeType, Frame, FrameAttrs, Lens, LensAttrs, LensEye, NestedWrite, Prescription,
    PrescriptionAttrs, PrescriptionEye, PrescriptionStatus,
};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::prescription::{
    CreatePrescriptionInput, CreatePrescriptionUseCase, DeletePrescriptionUseCase,
    GetPrescriptionUseCase, ListPrescriptionsUseCase, UpdatePrescriptionInput,
    UpdatePrescriptionUseCase,
};

fn parse_eye_type(s: &str) -> Result<EyeType, ApiError> {
    EyeType::from_str_opt(s).ok_or_else(|| ApiError::field("eyes", "eye_type must be OD or OS"))
}

fn parse_lens_eye(s: &str) -> Result<LensEye, ApiError> {
    LensEye::from_str_opt(s)
        .ok_or_else(|| ApiError::field("lenses", "eye_type must be OD, OS or Both"))
}

fn parse_status(s: &str) -> Result<PrescriptionStatus, ApiError> {
    PrescriptionStatus::from_str_opt(s)
        .ok_or_else(|| ApiError::field("status", "must be pending, completed, delivered or cancelled"))
}

// ── Request bodies ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EyeBody {
    pub eye_type: String,
    pub sphere: Option<f64>,
    pub cylinder: Option<f64>,
    pub axis: Option<i32>,
    pub add: Option<f64>,
    pub prism: Option<f64>,
    pub prism_base: Option<String>,
    pub dnp: Option<f64>,
    pub npd: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
}

impl EyeBody {
    fn into_attrs(self) -> Result<EyeAttrs, ApiError> {
        Ok(EyeAttrs {
            eye_type: parse_eye_type(&self.eye_type)?,
            sphere: self.sphere,
            cylinder: self.cylinder,
            axis: self.axis,
            add: self.add,
            prism: self.prism,
            prism_base: self.prism_base,
            dnp: self.dnp,
            npd: self.npd,
            height: self.height,
            notes: self.notes,
        })
    }
}

/// Nested write form: `_destroy` with an id deletes, an id updates, no id
/// creates.
#[derive(Deserialize)]
pub struct EyeWriteBody {
    pub id: Option<Uuid>,
    #[serde(default, rename = "_destroy")]
    pub destroy: bool,
    pub eye_type: Option<String>,
    pub sphere: Option<f64>,
    pub cylinder: Option<f64>,
    pub axis: Option<i32>,
    pub add: Option<f64>,
    pub prism: Option<f64>,
    pub prism_base: Option<String>,
    pub dnp: Option<f64>,
    pub npd: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
}

impl EyeWriteBody {
    fn into_write(self) -> Result<NestedWrite<EyeAttrs>, ApiError> {
        if self.destroy {
            return self
                .id
                .map(NestedWrite::Delete)
                .ok_or_else(|| ApiError::field("eyes", "_destroy requires an id"));
        }
        let eye_type = self
            .eye_type
            .ok_or_else(|| ApiError::field("eyes", "eye_type is required"))?;
        let attrs = EyeAttrs {
            eye_type: parse_eye_type(&eye_type)?,
            sphere: self.sphere,
            cylinder: self.cylinder,
            axis: self.axis,
            add: self.add,
            prism: self.prism,
            prism_base: self.prism_base,
            dnp: self.dnp,
            npd: self.npd,
            height: self.height,
            notes: self.notes,
        };
        Ok(match self.id {
            Some(id) => NestedWrite::Update(id, attrs),
            None => NestedWrite::Create(attrs),
        })
    }
}

#[derive(Deserialize)]
pub struct LensBody {
    pub eye_type: String,
    pub lens_type: Option<String>,
    pub material: Option<String>,
    #[serde(default)]
    pub coatings: Vec<String>,
    pub refractive_index: Option<f64>,
    pub tint: Option<String>,
    pub photochromic: Option<bool>,
    pub progressive: Option<bool>,
    pub special_properties: Option<String>,
    pub notes: Option<String>,
}

impl LensBody {
    fn into_attrs(self) -> Result<LensAttrs, ApiError> {
        Ok(LensAttrs {
            eye_type: parse_lens_eye(&self.eye_type)?,
            lens_type: self.lens_type,
            material: self.material,
            coatings: self.coatings,
            refractive_index: self.refractive_index,
            tint: self.tint,
            photochromic: self.photochromic,
            progressive: self.progressive,
            special_properties: self.special_properties,
            notes: self.notes,
        })
    }
}

#[derive(Deserialize)]
pub struct LensWriteBody {
    pub id: Option<Uuid>,
    #[serde(default, rename = "_destroy")]
    pub destroy: bool,
    pub eye_type: Option<String>,
    pub lens_type: Option<String>,
    pub material: Option<String>,
    #[serde(default)]
    pub coatings: Vec<String>,
    pub refractive_index: Option<f64>,
    pub tint: Option<String>,
    pub photochromic: Option<bool>,
    pub progressive: Option<bool>,
    pub special_properties: Option<String>,
    pub notes: Option<String>,
}

impl LensWriteBody {
    fn into_write(self) -> Result<NestedWrite<LensAttrs>, ApiError> {
        if self.destroy {
            return self
                .id
                .map(NestedWrite::Delete)
                .ok_or_else(|| ApiError::field("lenses", "_destroy requires an id"));
        }
        let eye_type = self
            .eye_type
            .ok_or_else(|| ApiError::field("lenses", "eye_type is required"))?;
        let attrs = LensAttrs {
            eye_type: parse_lens_eye(&eye_type)?,
            lens_type: self.lens_type,
            material: self.material,
            coatings: self.coatings,
            refractive_index: self.refractive_index,
            tint: self.tint,
            photochromic: self.photochromic,
            progressive: self.progressive,
            special_properties: self.special_properties,
            notes: self.notes,
        };
        Ok(match self.id {
            Some(id) => NestedWrite::Update(id, attrs),
            None => NestedWrite::Create(attrs),
        })
    }
}

#[derive(Deserialize)]
pub struct FrameBody {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub frame_width: Option<f64>,
    pub lens_width: Option<f64>,
    pub bridge_size: Option<f64>,
    pub temple_length: Option<f64>,
    pub frame_cost: Option<f64>,
    pub special_features: Option<String>,
    pub notes: Option<String>,
}

impl FrameBody {
    fn into_attrs(self) -> FrameAttrs {
        FrameAttrs {
            brand: self.brand,
            model: self.model,
            material: self.material,
            color: self.color,
            style: self.style,
            frame_width: self.frame_width,
            lens_width: self.lens_width,
            bridge_size: self.bridge_size,
            temple_length: self.temple_length,
            frame_cost: self.frame_cost,
            special_features: self.special_features,
            notes: self.notes,
        }
    }
}

#[derive(Deserialize)]
pub struct FrameWriteBody {
    pub id: Option<Uuid>,
    #[serde(default, rename = "_destroy")]
    pub destroy: bool,
    #[serde(flatten)]
    pub fields: FrameBody,
}

impl FrameWriteBody {
    fn into_write(self) -> Result<NestedWrite<FrameAttrs>, ApiError> {
        if self.destroy {
            return self
                .id
                .map(NestedWrite::Delete)
                .ok_or_else(|| ApiError::field("frame", "_destroy requires an id"));
        }
        let attrs = self.fields.into_attrs();
        Ok(match self.id {
            Some(id) => NestedWrite::Update(id, attrs),
            None => NestedWrite::Create(attrs),
        })
    }
}

#[derive(Deserialize)]
pub struct CreatePrescriptionRequest {
    pub exam_date: Option<NaiveDate>,
    pub observations: Option<String>,
    pub order_number: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub distance_va_od: Option<f64>,
    pub distance_va_os: Option<f64>,
    pub near_va_od: Option<f64>,
    pub near_va_os: Option<f64>,
    #[serde(default)]
    pub eyes: Vec<EyeBody>,
    #[serde(default)]
    pub lenses: Vec<LensBody>,
    pub frame: Option<FrameBody>,
}

#[derive(Deserialize)]
pub struct UpdatePrescriptionRequest {
    pub exam_date: Option<NaiveDate>,
    pub observations: Option<String>,
    pub order_number: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub distance_va_od: Option<f64>,
    pub distance_va_os: Option<f64>,
    pub near_va_od: Option<f64>,
    pub near_va_os: Option<f64>,
    #[serde(default)]
    pub eyes: Vec<EyeWriteBody>,
    #[serde(default)]
    pub lenses: Vec<LensWriteBody>,
    pub frame: Option<FrameWriteBody>,
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EyeResponse {
    pub id: String,
    pub eye_type: &'static str,
    pub sphere: Option<f64>,
    pub cylinder: Option<f64>,
    pub axis: Option<i32>,
    pub add: Option<f64>,
    pub prism: Option<f64>,
    pub prism_base: Option<String>,
    pub dnp: Option<f64>,
    pub npd: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
}

impl From<PrescriptionEye> for EyeResponse {
    fn from(eye: PrescriptionEye) -> Self {
        Self {
            id: eye.id.to_string(),
            eye_type: eye.eye_type.as_str(),
            sphere: eye.sphere,
            cylinder: eye.cylinder,
            axis: eye.axis,
            add: eye.add,
            prism: eye.prism,
            prism_base: eye.prism_base,
            dnp: eye.dnp,
            npd: eye.npd,
            height: eye.height,
            notes: eye.notes,
        }
    }
}

#[derive(Serialize)]
pub struct LensResponse {
    pub id: String,
    pub eye_type: &'static str,
    pub lens_type: Option<String>,
    pub material: Option<String>,
    pub coatings: Vec<String>,
    pub refractive_index: Option<f64>,
    pub tint: Option<String>,
    pub photochromic: bool,
    pub progressive: bool,
    pub special_properties: Option<String>,
    pub notes: Option<String>,
}

impl From<Lens> for LensResponse {
    fn from(lens: Lens) -> Self {
        Self {
            id: lens.id.to_string(),
            eye_type: lens.eye_type.as_str(),
            lens_type: lens.lens_type,
            material: lens.material,
            coatings: lens.coatings,
            refractive_index: lens.refractive_index,
            tint: lens.tint,
            photochromic: lens.photochromic,
            progressive: lens.progressive,
            special_properties: lens.special_properties,
            notes: lens.notes,
        }
    }
}

#[derive(Serialize)]
pub struct FrameResponse {
    pub id: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub frame_width: Option<f64>,
    pub lens_width: Option<f64>,
    pub bridge_size: Option<f64>,
    pub temple_length: Option<f64>,
    pub frame_cost: Option<f64>,
    pub special_features: Option<String>,
    pub notes: Option<String>,
}

impl From<Frame> for FrameResponse {
    fn from(frame: Frame) -> Self {
        Self {
            id: frame.id.to_string(),
            brand: frame.brand,
            model: frame.model,
            material: frame.material,
            color: frame.color,
            style: frame.style,
            frame_width: frame.frame_width,
            lens_width: frame.lens_width,
            bridge_size: frame.bridge_size,
            temple_length: frame.temple_length,
            frame_cost: frame.frame_cost,
            special_features: frame.special_features,
            notes: frame.notes,
        }
    }
}

#[derive(Serialize)]
pub struct PrescriptionResponse {
    pub id: String,
    pub patient_id: String,
    pub user_id: String,
    pub exam_date: Option<NaiveDate>,
    pub observations: Option<String>,
    pub order_number: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub total_balance: f64,
    pub fully_paid: bool,
    pub is_overdue: bool,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: &'static str,
    pub distance_va_od: Option<f64>,
    pub distance_va_os: Option<f64>,
    pub near_va_od: Option<f64>,
    pub near_va_os: Option<f64>,
    pub eyes: Vec<EyeResponse>,
    pub lenses: Vec<LensResponse>,
    pub frame: Option<FrameResponse>,
    #[serde(serialize_with = "optica_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<Utc>,
    #[serde(serialize_with = "optica_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<Prescription> for PrescriptionResponse {
    fn from(prescription: Prescription) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: prescription.id.to_string(),
            patient_id: prescription.patient_id.to_string(),
            user_id: prescription.user_id.to_string(),
            total_balance: prescription.total_balance(),
            fully_paid: prescription.fully_paid(),
            is_overdue: prescription.is_overdue(today),
            status: prescription.status.as_str(),
            exam_date: prescription.exam_date,
            observations: prescription.observations,
            order_number: prescription.order_number,
            total_cost: prescription.total_cost,
            deposit_paid: prescription.deposit_paid,
            expected_delivery_date: prescription.expected_delivery_date,
            distance_va_od: prescription.distance_va_od,
            distance_va_os: prescription.distance_va_os,
            near_va_od: prescription.near_va_od,
            near_va_os: prescription.near_va_os,
            eyes: prescription.eyes.into_iter().map(Into::into).collect(),
            lenses: prescription.lenses.into_iter().map(Into::into).collect(),
            frame: prescription.frame.map(Into::into),
            created_at: prescription.created_at,
            updated_at: prescription.updated_at,
        }
    }
}

// ── GET /patients/{id}/prescriptions ─────────────────────────────────────────

#[derive(Serialize)]
pub struct PrescriptionListResponse {
    pub items: Vec<PrescriptionResponse>,
    pub meta: PageMeta,
}

pub async fn list_prescriptions(
    actor: Actor,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PrescriptionListResponse>, ApiError> {
    let usecase = ListPrescriptionsUseCase {
        patients: state.patient_repo(),
        prescriptions: state.prescription_repo(),
    };
    let (items, meta) = usecase.execute(&actor, patient_id, page).await?;
    Ok(Json(PrescriptionListResponse {
        items: items.into_iter().map(Into::into).collect(),
        meta,
    }))
}

// ── POST /patients/{id}/prescriptions ────────────────────────────────────────

pub async fn create_prescription(
    actor: Actor,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Json(body): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<PrescriptionResponse>), ApiError> {
    let attrs = PrescriptionAttrs {
        exam_date: body.exam_date,
        observations: body.observations,
        order_number: body.order_number,
        total_cost: body.total_cost,
        deposit_paid: body.deposit_paid,
        expected_delivery_date: body.expected_delivery_date,
        status: body.status.as_deref().map(parse_status).transpose()?,
        distance_va_od: body.distance_va_od,
        distance_va_os: body.distance_va_os,
        near_va_od: body.near_va_od,
        near_va_os: body.near_va_os,
    };
    let eyes = body
        .eyes
        .into_iter()
        .map(EyeBody::into_attrs)
        .collect::<Result<Vec<_>, _>>()?;
    let lenses = body
        .lenses
        .into_iter()
        .map(LensBody::into_attrs)
        .collect::<Result<Vec<_>, _>>()?;

    let usecase = CreatePrescriptionUseCase {
        patients: state.patient_repo(),
        prescriptions: state.prescription_repo(),
    };
    let prescription = usecase
        .execute(
            &actor,
            patient_id,
            CreatePrescriptionInput {
                attrs,
                eyes,
                lenses,
                frame: body.frame.map(FrameBody::into_attrs),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(prescription.into())))
}

// ── GET /prescriptions/{id} ──────────────────────────────────────────────────

pub async fn get_prescription(
    actor: Actor,
    State(state): State<AppState>,
    Path(prescription_id): Path<Uuid>,
) -> Result<Json<PrescriptionResponse>, ApiError> {
    let usecase = GetPrescriptionUseCase {
        patients: state.patient_repo(),
        prescriptions: state.prescription_repo(),
    };
    let prescription = usecase.execute(&actor, prescription_id).await?;
    Ok(Json(prescription.into()))
}

// ── PATCH /prescriptions/{id} ────────────────────────────────────────────────

pub async fn update_prescription(
    actor: Actor,
    State(state): State<AppState>,
    Path(prescription_id): Path<Uuid>,
    Json(body): Json<UpdatePrescriptionRequest>,
) -> Result<Json<PrescriptionResponse>, ApiError> {
    let attrs = PrescriptionAttrs {
        exam_date: body.exam_date,
        observations: body.observations,
        order_number: body.order_number,
        total_cost: body.total_cost,
        deposit_paid: body.deposit_paid,
        expected_delivery_date: body.expected_delivery_date,
        status: body.status.as_deref().map(parse_status).transpose()?,
        distance_va_od: body.distance_va_od,
        distance_va_os: body.distance_va_os,
        near_va_od: body.near_va_od,
        near_va_os: body.near_va_os,
    };
    let eyes = body
        .eyes
        .into_iter()
        .map(EyeWriteBody::into_write)
        .collect::<Result<Vec<_>, _>>()?;
    let lenses = body
        .lenses
        .into_iter()
        .map(LensWriteBody::into_write)
        .collect::<Result<Vec<_>, _>>()?;
    let frame = body.frame.map(FrameWriteBody::into_write).transpose()?;

    let usecase = UpdatePrescriptionUseCase {
        patients: state.patient_repo(),
        prescriptions: state.prescription_repo(),
    };
    let prescription = usecase
        .execute(
            &actor,
            prescription_id,
            UpdatePrescriptionInput {
                attrs,
                eyes,
                lenses,
                frame,
            },
        )
        .await?;
    Ok(Json(prescription.into()))
}

// ── DELETE /prescriptions/{id} ───────────────────────────────────────────────

pub async fn delete_prescription(
    actor: Actor,
    State(state): State<AppState>,
    Path(prescription_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeletePrescriptionUseCase {
        patients: state.patient_repo(),
        prescriptions: state.prescription_repo(),
    };
    usecase.execute(&actor, prescription_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
