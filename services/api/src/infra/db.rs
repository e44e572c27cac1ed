use anyhow::{Context as _, anyhow};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict, extension::postgres::PgExpr},
};
use uuid::Uuid;

use optica_api_schema::{frames, lenses, patients, prescription_eyes, prescriptions, users};
use optica_domain::pagination::{PageRequest, Sort};
use optica_domain::role::Role;

use crate::domain::repository::{PatientRepository, PrescriptionRepository, UserRepository};
use crate::domain::types::{
    EyeType, Frame, Lens, LensEye, Patient, PatientListFilter, PatientSortBy, Prescription,
    PrescriptionEye, PrescriptionStatus, User,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, ApiError> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(users::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.context("count users by email")?;
        Ok(count > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let page = page.clamped();
        let query = users::Entity::find().order_by_asc(users::Column::CreatedAt);
        let total = query.clone().count(&self.db).await.context("count users")?;
        let models = query
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        let items = models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_i16()),
            jti: Set(user.jti),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_i16()),
            jti: Set(user.jti),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .update(&self.db)
        .await
        .context("update user")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = Role::from_i16(model.role)
        .ok_or_else(|| anyhow!("unknown role value {} for user {}", model.role, model.id))?;
    Ok(User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        role,
        jti: model.jti,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Patient repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPatientRepository {
    pub db: DatabaseConnection,
}

impl PatientRepository for DbPatientRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, ApiError> {
        let model = patients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find patient by id")?;
        Ok(model.map(patient_from_model))
    }

    async fn list(
        &self,
        owner: Uuid,
        filter: &PatientListFilter,
        sort_by: PatientSortBy,
        page: PageRequest,
    ) -> Result<(Vec<Patient>, u64), ApiError> {
        let page = page.clamped();

        let mut query = patients::Entity::find().filter(patients::Column::UserId.eq(owner));
        if let Some(term) = filter.search.as_deref().map(str::trim) {
            if !term.is_empty() {
                let pattern = format!("%{term}%");
                query = query.filter(
                    Condition::any()
                        .add(Expr::col(patients::Column::FirstName).ilike(pattern.as_str()))
                        .add(Expr::col(patients::Column::LastName).ilike(pattern.as_str()))
                        .add(Expr::col(patients::Column::NationalId).ilike(pattern.as_str()))
                        .add(Expr::col(patients::Column::Email).ilike(pattern.as_str()))
                        .add(Expr::col(patients::Column::Phone).ilike(pattern.as_str())),
                );
            }
        }
        if let Some(ref city) = filter.city {
            query = query.filter(patients::Column::City.eq(city));
        }
        if let Some(ref state) = filter.state {
            query = query.filter(patients::Column::State.eq(state));
        }
        if let Some(active) = filter.active {
            query = query.filter(patients::Column::Active.eq(active));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count patients")?;

        query = match sort_by {
            PatientSortBy::Name(Sort::Asc) => query
                .order_by_asc(patients::Column::FirstName)
                .order_by_asc(patients::Column::LastName),
            PatientSortBy::Name(Sort::Desc) => query
                .order_by_desc(patients::Column::FirstName)
                .order_by_desc(patients::Column::LastName),
            PatientSortBy::Email(Sort::Asc) => query.order_by_asc(patients::Column::Email),
            PatientSortBy::Email(Sort::Desc) => query.order_by_desc(patients::Column::Email),
            PatientSortBy::Created(Sort::Asc) => query.order_by_asc(patients::Column::CreatedAt),
            PatientSortBy::Created(Sort::Desc) => query.order_by_desc(patients::Column::CreatedAt),
            // Age ascending means youngest first, so birth date descending.
            PatientSortBy::Age(Sort::Asc) => query.order_by_desc(patients::Column::BirthDate),
            PatientSortBy::Age(Sort::Desc) => query.order_by_asc(patients::Column::BirthDate),
        };

        let models = query
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list patients")?;
        Ok((models.into_iter().map(patient_from_model).collect(), total))
    }

    async fn national_id_exists(
        &self,
        national_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, ApiError> {
        let mut query =
            patients::Entity::find().filter(patients::Column::NationalId.eq(national_id));
        if let Some(id) = exclude {
            query = query.filter(patients::Column::Id.ne(id));
        }
        let count = query
            .count(&self.db)
            .await
            .context("count patients by national id")?;
        Ok(count > 0)
    }

    async fn create(&self, patient: &Patient) -> Result<(), ApiError> {
        patient_to_active_model(patient)
            .insert(&self.db)
            .await
            .context("create patient")?;
        Ok(())
    }

    async fn update(&self, patient: &Patient) -> Result<(), ApiError> {
        patient_to_active_model(patient)
            .update(&self.db)
            .await
            .context("update patient")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = patients::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete patient")?;
        Ok(result.rows_affected > 0)
    }

    async fn distinct_cities(&self, owner: Uuid) -> Result<Vec<String>, ApiError> {
        patients::Entity::find()
            .select_only()
            .column(patients::Column::City)
            .distinct()
            .filter(patients::Column::UserId.eq(owner))
            .filter(patients::Column::City.is_not_null())
            .order_by_asc(patients::Column::City)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list distinct cities")
            .map_err(Into::into)
    }

    async fn distinct_states(&self, owner: Uuid) -> Result<Vec<String>, ApiError> {
        patients::Entity::find()
            .select_only()
            .column(patients::Column::State)
            .distinct()
            .filter(patients::Column::UserId.eq(owner))
            .filter(patients::Column::State.is_not_null())
            .order_by_asc(patients::Column::State)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list distinct states")
            .map_err(Into::into)
    }
}

fn patient_from_model(model: patients::Model) -> Patient {
    Patient {
        id: model.id,
        user_id: model.user_id,
        first_name: model.first_name,
        last_name: model.last_name,
        national_id: model.national_id,
        email: model.email,
        phone: model.phone,
        birth_date: model.birth_date,
        address: model.address,
        city: model.city,
        state: model.state,
        zip_code: model.zip_code,
        emergency_contact: model.emergency_contact,
        emergency_phone: model.emergency_phone,
        insurance_provider: model.insurance_provider,
        insurance_number: model.insurance_number,
        active: model.active,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn patient_to_active_model(patient: &Patient) -> patients::ActiveModel {
    patients::ActiveModel {
        id: Set(patient.id),
        user_id: Set(patient.user_id),
        first_name: Set(patient.first_name.clone()),
        last_name: Set(patient.last_name.clone()),
        national_id: Set(patient.national_id.clone()),
        email: Set(patient.email.clone()),
        phone: Set(patient.phone.clone()),
        birth_date: Set(patient.birth_date),
        address: Set(patient.address.clone()),
        city: Set(patient.city.clone()),
        state: Set(patient.state.clone()),
        zip_code: Set(patient.zip_code.clone()),
        emergency_contact: Set(patient.emergency_contact.clone()),
        emergency_phone: Set(patient.emergency_phone.clone()),
        insurance_provider: Set(patient.insurance_provider.clone()),
        insurance_number: Set(patient.insurance_number.clone()),
        active: Set(patient.active),
        notes: Set(patient.notes.clone()),
        created_at: Set(patient.created_at),
        updated_at: Set(patient.updated_at),
    }
}

// ── Prescription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPrescriptionRepository {
    pub db: DatabaseConnection,
}

impl DbPrescriptionRepository {
    async fn load_aggregate(
        &self,
        parent: prescriptions::Model,
    ) -> Result<Prescription, ApiError> {
        let eye_models = prescription_eyes::Entity::find()
            .filter(prescription_eyes::Column::PrescriptionId.eq(parent.id))
            .order_by_asc(prescription_eyes::Column::EyeType)
            .all(&self.db)
            .await
            .context("list prescription eyes")?;
        let lens_models = lenses::Entity::find()
            .filter(lenses::Column::PrescriptionId.eq(parent.id))
            .order_by_asc(lenses::Column::EyeType)
            .all(&self.db)
            .await
            .context("list lenses")?;
        let frame_model = frames::Entity::find()
            .filter(frames::Column::PrescriptionId.eq(parent.id))
            .one(&self.db)
            .await
            .context("find frame")?;

        let eyes = eye_models
            .into_iter()
            .map(eye_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        let lenses = lens_models
            .into_iter()
            .map(lens_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        prescription_from_models(parent, eyes, lenses, frame_model.map(frame_from_model))
    }
}

impl PrescriptionRepository for DbPrescriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prescription>, ApiError> {
        let parent = prescriptions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find prescription by id")?;
        match parent {
            Some(parent) => Ok(Some(self.load_aggregate(parent).await?)),
            None => Ok(None),
        }
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Prescription>, u64), ApiError> {
        let page = page.clamped();
        let query = prescriptions::Entity::find()
            .filter(prescriptions::Column::PatientId.eq(patient_id));
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count prescriptions")?;
        let parents = query
            .order_by_desc(prescriptions::Column::ExamDate)
            .order_by_desc(prescriptions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list prescriptions")?;

        let mut results = Vec::with_capacity(parents.len());
        for parent in parents {
            results.push(self.load_aggregate(parent).await?);
        }
        Ok((results, total))
    }

    async fn order_number_exists(
        &self,
        order_number: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, ApiError> {
        let mut query = prescriptions::Entity::find()
            .filter(prescriptions::Column::OrderNumber.eq(order_number));
        if let Some(id) = exclude {
            query = query.filter(prescriptions::Column::Id.ne(id));
        }
        let count = query
            .count(&self.db)
            .await
            .context("count prescriptions by order number")?;
        Ok(count > 0)
    }

    async fn create(&self, prescription: &Prescription) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let prescription = prescription.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    prescription_to_active_model(&prescription).insert(txn).await?;
                    for eye in &prescription.eyes {
                        eye_to_active_model(eye, prescription.id, now).insert(txn).await?;
                    }
                    for lens in &prescription.lenses {
                        lens_to_active_model(lens, prescription.id, now).insert(txn).await?;
                    }
                    if let Some(ref frame) = prescription.frame {
                        frame_to_active_model(frame, prescription.id, now).insert(txn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("create prescription")?;
        Ok(())
    }

    async fn update(
        &self,
        prescription: &Prescription,
        removed_eyes: &[Uuid],
        removed_lenses: &[Uuid],
        removed_frame: Option<Uuid>,
    ) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let prescription = prescription.clone();
                let removed_eyes = removed_eyes.to_vec();
                let removed_lenses = removed_lenses.to_vec();
                Box::pin(async move {
                    let now = Utc::now();
                    prescription_to_active_model(&prescription).update(txn).await?;

                    for eye in &prescription.eyes {
                        prescription_eyes::Entity::insert(eye_to_active_model(
                            eye,
                            prescription.id,
                            now,
                        ))
                        .on_conflict(
                            OnConflict::column(prescription_eyes::Column::Id)
                                .update_columns([
                                    prescription_eyes::Column::EyeType,
                                    prescription_eyes::Column::Sphere,
                                    prescription_eyes::Column::Cylinder,
                                    prescription_eyes::Column::Axis,
                                    prescription_eyes::Column::Add,
                                    prescription_eyes::Column::Prism,
                                    prescription_eyes::Column::PrismBase,
                                    prescription_eyes::Column::Dnp,
                                    prescription_eyes::Column::Npd,
                                    prescription_eyes::Column::Height,
                                    prescription_eyes::Column::Notes,
                                    prescription_eyes::Column::UpdatedAt,
                                ])
                                .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    }
                    if !removed_eyes.is_empty() {
                        prescription_eyes::Entity::delete_many()
                            .filter(
                                prescription_eyes::Column::PrescriptionId.eq(prescription.id),
                            )
                            .filter(prescription_eyes::Column::Id.is_in(removed_eyes))
                            .exec(txn)
                            .await?;
                    }

                    for lens in &prescription.lenses {
                        lenses::Entity::insert(lens_to_active_model(lens, prescription.id, now))
                            .on_conflict(
                                OnConflict::column(lenses::Column::Id)
                                    .update_columns([
                                        lenses::Column::EyeType,
                                        lenses::Column::LensType,
                                        lenses::Column::Material,
                                        lenses::Column::Coatings,
                                        lenses::Column::RefractiveIndex,
                                        lenses::Column::Tint,
                                        lenses::Column::Photochromic,
                                        lenses::Column::Progressive,
                                        lenses::Column::SpecialProperties,
                                        lenses::Column::Notes,
                                        lenses::Column::UpdatedAt,
                                    ])
                                    .to_owned(),
                            )
                            .exec_without_returning(txn)
                            .await?;
                    }
                    if !removed_lenses.is_empty() {
                        lenses::Entity::delete_many()
                            .filter(lenses::Column::PrescriptionId.eq(prescription.id))
                            .filter(lenses::Column::Id.is_in(removed_lenses))
                            .exec(txn)
                            .await?;
                    }

                    if let Some(ref frame) = prescription.frame {
                        frames::Entity::insert(frame_to_active_model(frame, prescription.id, now))
                            .on_conflict(
                                OnConflict::column(frames::Column::PrescriptionId)
                                    .update_columns([
                                        frames::Column::Brand,
                                        frames::Column::Model,
                                        frames::Column::Material,
                                        frames::Column::Color,
                                        frames::Column::Style,
                                        frames::Column::FrameWidth,
                                        frames::Column::LensWidth,
                                        frames::Column::BridgeSize,
                                        frames::Column::TempleLength,
                                        frames::Column::FrameCost,
                                        frames::Column::SpecialFeatures,
                                        frames::Column::Notes,
                                        frames::Column::UpdatedAt,
                                    ])
                                    .to_owned(),
                            )
                            .exec_without_returning(txn)
                            .await?;
                    }
                    if let Some(frame_id) = removed_frame {
                        frames::Entity::delete_many()
                            .filter(frames::Column::PrescriptionId.eq(prescription.id))
                            .filter(frames::Column::Id.eq(frame_id))
                            .exec(txn)
                            .await?;
                    }

                    Ok(())
                })
            })
            .await
            .context("update prescription")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = prescriptions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete prescription")?;
        Ok(result.rows_affected > 0)
    }
}

fn prescription_from_models(
    model: prescriptions::Model,
    eyes: Vec<PrescriptionEye>,
    lenses: Vec<Lens>,
    frame: Option<Frame>,
) -> Result<Prescription, ApiError> {
    let status = PrescriptionStatus::from_str_opt(&model.status).ok_or_else(|| {
        anyhow!(
            "unknown status {:?} for prescription {}",
            model.status,
            model.id
        )
    })?;
    Ok(Prescription {
        id: model.id,
        patient_id: model.patient_id,
        user_id: model.user_id,
        exam_date: model.exam_date,
        observations: model.observations,
        order_number: model.order_number,
        total_cost: model.total_cost,
        deposit_paid: model.deposit_paid,
        expected_delivery_date: model.expected_delivery_date,
        status,
        distance_va_od: model.distance_va_od,
        distance_va_os: model.distance_va_os,
        near_va_od: model.near_va_od,
        near_va_os: model.near_va_os,
        eyes,
        lenses,
        frame,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn prescription_to_active_model(prescription: &Prescription) -> prescriptions::ActiveModel {
    prescriptions::ActiveModel {
        id: Set(prescription.id),
        patient_id: Set(prescription.patient_id),
        user_id: Set(prescription.user_id),
        exam_date: Set(prescription.exam_date),
        observations: Set(prescription.observations.clone()),
        order_number: Set(prescription.order_number.clone()),
        total_cost: Set(prescription.total_cost),
        deposit_paid: Set(prescription.deposit_paid),
        expected_delivery_date: Set(prescription.expected_delivery_date),
        status: Set(prescription.status.as_str().to_owned()),
        distance_va_od: Set(prescription.distance_va_od),
        distance_va_os: Set(prescription.distance_va_os),
        near_va_od: Set(prescription.near_va_od),
        near_va_os: Set(prescription.near_va_os),
        created_at: Set(prescription.created_at),
        updated_at: Set(prescription.updated_at),
    }
}

fn eye_from_model(model: prescription_eyes::Model) -> Result<PrescriptionEye, ApiError> {
    let eye_type = EyeType::from_str_opt(&model.eye_type).ok_or_else(|| {
        anyhow!(
            "unknown eye type {:?} for prescription eye {}",
            model.eye_type,
            model.id
        )
    })?;
    Ok(PrescriptionEye {
        id: model.id,
        eye_type,
        sphere: model.sphere,
        cylinder: model.cylinder,
        axis: model.axis,
        add: model.add,
        prism: model.prism,
        prism_base: model.prism_base,
        dnp: model.dnp,
        npd: model.npd,
        height: model.height,
        notes: model.notes,
    })
}

fn eye_to_active_model(
    eye: &PrescriptionEye,
    prescription_id: Uuid,
    now: chrono::DateTime<Utc>,
) -> prescription_eyes::ActiveModel {
    prescription_eyes::ActiveModel {
        id: Set(eye.id),
        prescription_id: Set(prescription_id),
        eye_type: Set(eye.eye_type.as_str().to_owned()),
        sphere: Set(eye.sphere),
        cylinder: Set(eye.cylinder),
        axis: Set(eye.axis),
        add: Set(eye.add),
        prism: Set(eye.prism),
        prism_base: Set(eye.prism_base.clone()),
        dnp: Set(eye.dnp),
        npd: Set(eye.npd),
        height: Set(eye.height),
        notes: Set(eye.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn lens_from_model(model: lenses::Model) -> Result<Lens, ApiError> {
    let eye_type = LensEye::from_str_opt(&model.eye_type).ok_or_else(|| {
        anyhow!("unknown eye type {:?} for lens {}", model.eye_type, model.id)
    })?;
    Ok(Lens {
        id: model.id,
        eye_type,
        lens_type: model.lens_type,
        material: model.material,
        coatings: coatings_from_db(model.coatings.as_deref()),
        refractive_index: model.refractive_index,
        tint: model.tint,
        photochromic: model.photochromic,
        progressive: model.progressive,
        special_properties: model.special_properties,
        notes: model.notes,
    })
}

fn lens_to_active_model(
    lens: &Lens,
    prescription_id: Uuid,
    now: chrono::DateTime<Utc>,
) -> lenses::ActiveModel {
    lenses::ActiveModel {
        id: Set(lens.id),
        prescription_id: Set(prescription_id),
        eye_type: Set(lens.eye_type.as_str().to_owned()),
        lens_type: Set(lens.lens_type.clone()),
        material: Set(lens.material.clone()),
        coatings: Set(coatings_to_db(&lens.coatings)),
        refractive_index: Set(lens.refractive_index),
        tint: Set(lens.tint.clone()),
        photochromic: Set(lens.photochromic),
        progressive: Set(lens.progressive),
        special_properties: Set(lens.special_properties.clone()),
        notes: Set(lens.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn frame_from_model(model: frames::Model) -> Frame {
    Frame {
        id: model.id,
        brand: model.brand,
        model: model.model,
        material: model.material,
        color: model.color,
        style: model.style,
        frame_width: model.frame_width,
        lens_width: model.lens_width,
        bridge_size: model.bridge_size,
        temple_length: model.temple_length,
        frame_cost: model.frame_cost,
        special_features: model.special_features,
        notes: model.notes,
    }
}

fn frame_to_active_model(
    frame: &Frame,
    prescription_id: Uuid,
    now: chrono::DateTime<Utc>,
) -> frames::ActiveModel {
    frames::ActiveModel {
        id: Set(frame.id),
        prescription_id: Set(prescription_id),
        brand: Set(frame.brand.clone()),
        model: Set(frame.model.clone()),
        material: Set(frame.material.clone()),
        color: Set(frame.color.clone()),
        style: Set(frame.style.clone()),
        frame_width: Set(frame.frame_width),
        lens_width: Set(frame.lens_width),
        bridge_size: Set(frame.bridge_size),
        temple_length: Set(frame.temple_length),
        frame_cost: Set(frame.frame_cost),
        special_features: Set(frame.special_features.clone()),
        notes: Set(frame.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

// ── Coatings codec ───────────────────────────────────────────────────────────

/// Canonical storage is a JSON array string; an empty list stores NULL.
fn coatings_to_db(coatings: &[String]) -> Option<String> {
    if coatings.is_empty() {
        None
    } else {
        Some(serde_json::json!(coatings).to_string())
    }
}

/// Reads the canonical JSON form, falling back to the legacy
/// comma-delimited format for rows written before the migration.
fn coatings_from_db(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(raw) {
        return parsed;
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
