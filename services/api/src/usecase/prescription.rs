use chrono::Utc;
use uuid::Uuid;

use optica_domain::pagination::{PageMeta, PageRequest};

use crate::authz::{Actor, ensure_owns_patient};
use crate::domain::repository::{PatientRepository, PrescriptionRepository};
use crate::domain::types::{
    EyeAttrs, Frame, FrameAttrs, Lens, LensAttrs, LensEye, NestedWrite, Patient, Prescription,
    PrescriptionAttrs, PrescriptionEye,
};
use crate::error::{ApiError, FieldError};

async fn owned_patient<P: PatientRepository>(
    patients: &P,
    actor: &Actor,
    patient_id: Uuid,
) -> Result<Patient, ApiError> {
    let patient = patients
        .find_by_id(patient_id)
        .await?
        .ok_or(ApiError::PatientNotFound)?;
    ensure_owns_patient(actor, &patient)?;
    Ok(patient)
}

/// Prescription access is transitive through the owning patient. A
/// prescription whose patient row has vanished is treated as gone.
async fn owned_prescription<P: PatientRepository, R: PrescriptionRepository>(
    patients: &P,
    prescriptions: &R,
    actor: &Actor,
    prescription_id: Uuid,
) -> Result<Prescription, ApiError> {
    let prescription = prescriptions
        .find_by_id(prescription_id)
        .await?
        .ok_or(ApiError::PrescriptionNotFound)?;
    let patient = patients
        .find_by_id(prescription.patient_id)
        .await?
        .ok_or(ApiError::PrescriptionNotFound)?;
    ensure_owns_patient(actor, &patient)?;
    Ok(prescription)
}

fn check_eye_set(eyes: &[PrescriptionEye]) -> Option<FieldError> {
    for (i, eye) in eyes.iter().enumerate() {
        if eyes[..i].iter().any(|e| e.eye_type == eye.eye_type) {
            return Some(FieldError::new("eyes", "duplicate eye type"));
        }
    }
    None
}

/// At most one lens per eye type, and a `Both` lens excludes any other.
fn check_lens_set(lenses: &[Lens]) -> Option<FieldError> {
    for (i, lens) in lenses.iter().enumerate() {
        if lenses[..i].iter().any(|l| l.eye_type == lens.eye_type) {
            return Some(FieldError::new("lenses", "duplicate eye type"));
        }
    }
    if lenses.len() > 1 && lenses.iter().any(|l| l.eye_type == LensEye::Both) {
        return Some(FieldError::new(
            "lenses",
            "a Both lens must be the only lens",
        ));
    }
    None
}

fn eye_from_attrs(attrs: EyeAttrs) -> PrescriptionEye {
    PrescriptionEye {
        id: Uuid::now_v7(),
        eye_type: attrs.eye_type,
        sphere: attrs.sphere,
        cylinder: attrs.cylinder,
        axis: attrs.axis,
        add: attrs.add,
        prism: attrs.prism,
        prism_base: attrs.prism_base,
        dnp: attrs.dnp,
        npd: attrs.npd,
        height: attrs.height,
        notes: attrs.notes,
    }
}

fn apply_eye_attrs(eye: &mut PrescriptionEye, attrs: EyeAttrs) {
    let id = eye.id;
    *eye = eye_from_attrs(attrs);
    eye.id = id;
}

fn lens_from_attrs(attrs: LensAttrs) -> Lens {
    Lens {
        id: Uuid::now_v7(),
        eye_type: attrs.eye_type,
        lens_type: attrs.lens_type,
        material: attrs.material,
        coatings: attrs.coatings,
        refractive_index: attrs.refractive_index,
        tint: attrs.tint,
        photochromic: attrs.photochromic.unwrap_or(false),
        progressive: attrs.progressive.unwrap_or(false),
        special_properties: attrs.special_properties,
        notes: attrs.notes,
    }
}

fn apply_lens_attrs(lens: &mut Lens, attrs: LensAttrs) {
    let id = lens.id;
    *lens = lens_from_attrs(attrs);
    lens.id = id;
}

fn frame_from_attrs(attrs: FrameAttrs) -> Frame {
    Frame {
        id: Uuid::now_v7(),
        brand: attrs.brand,
        model: attrs.model,
        material: attrs.material,
        color: attrs.color,
        style: attrs.style,
        frame_width: attrs.frame_width,
        lens_width: attrs.lens_width,
        bridge_size: attrs.bridge_size,
        temple_length: attrs.temple_length,
        frame_cost: attrs.frame_cost,
        special_features: attrs.special_features,
        notes: attrs.notes,
    }
}

fn apply_parent_attrs(prescription: &mut Prescription, attrs: &PrescriptionAttrs) {
    if let Some(v) = attrs.exam_date {
        prescription.exam_date = Some(v);
    }
    if let Some(ref v) = attrs.observations {
        prescription.observations = Some(v.clone());
    }
    if let Some(ref v) = attrs.order_number {
        prescription.order_number = Some(v.clone());
    }
    if let Some(v) = attrs.total_cost {
        prescription.total_cost = Some(v);
    }
    if let Some(v) = attrs.deposit_paid {
        prescription.deposit_paid = Some(v);
    }
    if let Some(v) = attrs.expected_delivery_date {
        prescription.expected_delivery_date = Some(v);
    }
    if let Some(v) = attrs.status {
        prescription.status = v;
    }
    if let Some(v) = attrs.distance_va_od {
        prescription.distance_va_od = Some(v);
    }
    if let Some(v) = attrs.distance_va_os {
        prescription.distance_va_os = Some(v);
    }
    if let Some(v) = attrs.near_va_od {
        prescription.near_va_od = Some(v);
    }
    if let Some(v) = attrs.near_va_os {
        prescription.near_va_os = Some(v);
    }
}

// ── CreatePrescription ───────────────────────────────────────────────────────

pub struct CreatePrescriptionInput {
    pub attrs: PrescriptionAttrs,
    pub eyes: Vec<EyeAttrs>,
    pub lenses: Vec<LensAttrs>,
    pub frame: Option<FrameAttrs>,
}

pub struct CreatePrescriptionUseCase<P: PatientRepository, R: PrescriptionRepository> {
    pub patients: P,
    pub prescriptions: R,
}

impl<P: PatientRepository, R: PrescriptionRepository> CreatePrescriptionUseCase<P, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        patient_id: Uuid,
        input: CreatePrescriptionInput,
    ) -> Result<Prescription, ApiError> {
        let patient = owned_patient(&self.patients, actor, patient_id).await?;

        let mut errors = input.attrs.validate();
        for eye in &input.eyes {
            errors.extend(eye.validate());
        }

        let eyes: Vec<PrescriptionEye> = input.eyes.into_iter().map(eye_from_attrs).collect();
        let lenses: Vec<Lens> = input.lenses.into_iter().map(lens_from_attrs).collect();
        errors.extend(check_eye_set(&eyes));
        errors.extend(check_lens_set(&lenses));
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if let Some(ref order_number) = input.attrs.order_number {
            if self
                .prescriptions
                .order_number_exists(order_number, None)
                .await?
            {
                return Err(ApiError::OrderNumberTaken);
            }
        }

        let now = Utc::now();
        let prescription = Prescription {
            id: Uuid::now_v7(),
            patient_id: patient.id,
            // The acting user becomes the author.
            user_id: actor.id,
            exam_date: input.attrs.exam_date,
            observations: input.attrs.observations,
            order_number: input.attrs.order_number,
            total_cost: input.attrs.total_cost,
            deposit_paid: input.attrs.deposit_paid,
            expected_delivery_date: input.attrs.expected_delivery_date,
            status: input.attrs.status.unwrap_or_default(),
            distance_va_od: input.attrs.distance_va_od,
            distance_va_os: input.attrs.distance_va_os,
            near_va_od: input.attrs.near_va_od,
            near_va_os: input.attrs.near_va_os,
            eyes,
            lenses,
            frame: input.frame.map(frame_from_attrs),
            created_at: now,
            updated_at: now,
        };
        self.prescriptions.create(&prescription).await?;
        Ok(prescription)
    }
}

// ── ListPrescriptions ────────────────────────────────────────────────────────

pub struct ListPrescriptionsUseCase<P: PatientRepository, R: PrescriptionRepository> {
    pub patients: P,
    pub prescriptions: R,
}

impl<P: PatientRepository, R: PrescriptionRepository> ListPrescriptionsUseCase<P, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        patient_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Prescription>, PageMeta), ApiError> {
        owned_patient(&self.patients, actor, patient_id).await?;
        let page = page.clamped();
        let (prescriptions, total) = self
            .prescriptions
            .list_for_patient(patient_id, page)
            .await?;
        Ok((prescriptions, PageMeta::new(page, total)))
    }
}

// ── GetPrescription ──────────────────────────────────────────────────────────

pub struct GetPrescriptionUseCase<P: PatientRepository, R: PrescriptionRepository> {
    pub patients: P,
    pub prescriptions: R,
}

impl<P: PatientRepository, R: PrescriptionRepository> GetPrescriptionUseCase<P, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        prescription_id: Uuid,
    ) -> Result<Prescription, ApiError> {
        owned_prescription(&self.patients, &self.prescriptions, actor, prescription_id).await
    }
}

// ── UpdatePrescription ───────────────────────────────────────────────────────

pub struct UpdatePrescriptionInput {
    pub attrs: PrescriptionAttrs,
    pub eyes: Vec<NestedWrite<EyeAttrs>>,
    pub lenses: Vec<NestedWrite<LensAttrs>>,
    pub frame: Option<NestedWrite<FrameAttrs>>,
}

pub struct UpdatePrescriptionUseCase<P: PatientRepository, R: PrescriptionRepository> {
    pub patients: P,
    pub prescriptions: R,
}

impl<P: PatientRepository, R: PrescriptionRepository> UpdatePrescriptionUseCase<P, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        prescription_id: Uuid,
        input: UpdatePrescriptionInput,
    ) -> Result<Prescription, ApiError> {
        let mut prescription =
            owned_prescription(&self.patients, &self.prescriptions, actor, prescription_id).await?;

        let mut errors = input.attrs.validate();

        if let Some(next) = input.attrs.status {
            if !prescription.status.can_transition_to(next) {
                return Err(ApiError::InvalidStatusTransition);
            }
        }

        // Apply nested eye ops onto the loaded aggregate.
        let mut removed_eyes = Vec::new();
        for op in input.eyes {
            match op {
                NestedWrite::Create(attrs) => {
                    errors.extend(attrs.validate());
                    prescription.eyes.push(eye_from_attrs(attrs));
                }
                NestedWrite::Update(id, attrs) => {
                    errors.extend(attrs.validate());
                    match prescription.eyes.iter_mut().find(|e| e.id == id) {
                        Some(eye) => apply_eye_attrs(eye, attrs),
                        None => errors.push(FieldError::new("eyes", "unknown eye id")),
                    }
                }
                NestedWrite::Delete(id) => {
                    let before = prescription.eyes.len();
                    prescription.eyes.retain(|e| e.id != id);
                    if prescription.eyes.len() == before {
                        errors.push(FieldError::new("eyes", "unknown eye id"));
                    } else {
                        removed_eyes.push(id);
                    }
                }
            }
        }

        let mut removed_lenses = Vec::new();
        for op in input.lenses {
            match op {
                NestedWrite::Create(attrs) => prescription.lenses.push(lens_from_attrs(attrs)),
                NestedWrite::Update(id, attrs) => {
                    match prescription.lenses.iter_mut().find(|l| l.id == id) {
                        Some(lens) => apply_lens_attrs(lens, attrs),
                        None => errors.push(FieldError::new("lenses", "unknown lens id")),
                    }
                }
                NestedWrite::Delete(id) => {
                    let before = prescription.lenses.len();
                    prescription.lenses.retain(|l| l.id != id);
                    if prescription.lenses.len() == before {
                        errors.push(FieldError::new("lenses", "unknown lens id"));
                    } else {
                        removed_lenses.push(id);
                    }
                }
            }
        }

        let mut removed_frame = None;
        match input.frame {
            Some(NestedWrite::Create(attrs)) => {
                if prescription.frame.is_some() {
                    errors.push(FieldError::new("frame", "frame already present"));
                } else {
                    prescription.frame = Some(frame_from_attrs(attrs));
                }
            }
            Some(NestedWrite::Update(id, attrs)) => match prescription.frame.take() {
                Some(frame) if frame.id == id => {
                    let mut replacement = frame_from_attrs(attrs);
                    replacement.id = id;
                    prescription.frame = Some(replacement);
                }
                other => {
                    prescription.frame = other;
                    errors.push(FieldError::new("frame", "unknown frame id"));
                }
            },
            Some(NestedWrite::Delete(id)) => match prescription.frame.take() {
                Some(frame) if frame.id == id => removed_frame = Some(id),
                other => {
                    prescription.frame = other;
                    errors.push(FieldError::new("frame", "unknown frame id"));
                }
            },
            None => {}
        }

        // The invariants hold for the aggregate as it will be persisted.
        errors.extend(check_eye_set(&prescription.eyes));
        errors.extend(check_lens_set(&prescription.lenses));
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if let Some(ref order_number) = input.attrs.order_number {
            if prescription.order_number.as_deref() != Some(order_number)
                && self
                    .prescriptions
                    .order_number_exists(order_number, Some(prescription_id))
                    .await?
            {
                return Err(ApiError::OrderNumberTaken);
            }
        }

        apply_parent_attrs(&mut prescription, &input.attrs);
        prescription.updated_at = Utc::now();
        self.prescriptions
            .update(&prescription, &removed_eyes, &removed_lenses, removed_frame)
            .await?;
        Ok(prescription)
    }
}

// ── DeletePrescription ───────────────────────────────────────────────────────

pub struct DeletePrescriptionUseCase<P: PatientRepository, R: PrescriptionRepository> {
    pub patients: P,
    pub prescriptions: R,
}

impl<P: PatientRepository, R: PrescriptionRepository> DeletePrescriptionUseCase<P, R> {
    pub async fn execute(&self, actor: &Actor, prescription_id: Uuid) -> Result<(), ApiError> {
        owned_prescription(&self.patients, &self.prescriptions, actor, prescription_id).await?;
        self.prescriptions.delete(prescription_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EyeType, PatientListFilter, PatientSortBy, PrescriptionStatus};
    use optica_domain::role::Role;
    use std::sync::Mutex;

    struct MockPatientRepo {
        patient: Option<Patient>,
    }

    impl PatientRepository for MockPatientRepo {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Patient>, ApiError> {
            Ok(self.patient.clone())
        }
        async fn list(
            &self,
            _owner: Uuid,
            _filter: &PatientListFilter,
            _sort_by: PatientSortBy,
            _page: PageRequest,
        ) -> Result<(Vec<Patient>, u64), ApiError> {
            Ok((vec![], 0))
        }
        async fn national_id_exists(
            &self,
            _national_id: &str,
            _exclude: Option<Uuid>,
        ) -> Result<bool, ApiError> {
            Ok(false)
        }
        async fn create(&self, _patient: &Patient) -> Result<(), ApiError> {
            Ok(())
        }
        async fn update(&self, _patient: &Patient) -> Result<(), ApiError> {
            Ok(())
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, ApiError> {
            Ok(true)
        }
        async fn distinct_cities(&self, _owner: Uuid) -> Result<Vec<String>, ApiError> {
            Ok(vec![])
        }
        async fn distinct_states(&self, _owner: Uuid) -> Result<Vec<String>, ApiError> {
            Ok(vec![])
        }
    }

    struct MockPrescriptionRepo {
        prescription: Option<Prescription>,
        order_number_taken: bool,
        created: Mutex<Option<Prescription>>,
        updated: Mutex<Option<(Prescription, Vec<Uuid>, Vec<Uuid>, Option<Uuid>)>>,
        deleted: Mutex<bool>,
    }

    impl MockPrescriptionRepo {
        fn new(prescription: Option<Prescription>) -> Self {
            Self {
                prescription,
                order_number_taken: false,
                created: Mutex::new(None),
                updated: Mutex::new(None),
                deleted: Mutex::new(false),
            }
        }
    }

    impl PrescriptionRepository for MockPrescriptionRepo {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Prescription>, ApiError> {
            Ok(self.prescription.clone())
        }
        async fn list_for_patient(
            &self,
            _patient_id: Uuid,
            _page: PageRequest,
        ) -> Result<(Vec<Prescription>, u64), ApiError> {
            Ok((self.prescription.clone().into_iter().collect(), 1))
        }
        async fn order_number_exists(
            &self,
            _order_number: &str,
            _exclude: Option<Uuid>,
        ) -> Result<bool, ApiError> {
            Ok(self.order_number_taken)
        }
        async fn create(&self, prescription: &Prescription) -> Result<(), ApiError> {
            *self.created.lock().unwrap() = Some(prescription.clone());
            Ok(())
        }
        async fn update(
            &self,
            prescription: &Prescription,
            removed_eyes: &[Uuid],
            removed_lenses: &[Uuid],
            removed_frame: Option<Uuid>,
        ) -> Result<(), ApiError> {
            *self.updated.lock().unwrap() = Some((
                prescription.clone(),
                removed_eyes.to_vec(),
                removed_lenses.to_vec(),
                removed_frame,
            ));
            Ok(())
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, ApiError> {
            *self.deleted.lock().unwrap() = true;
            Ok(true)
        }
    }

    fn sales_actor() -> Actor {
        Actor {
            id: Uuid::now_v7(),
            role: Role::Sales,
        }
    }

    fn patient_owned_by(user_id: Uuid) -> Patient {
        Patient {
            id: Uuid::now_v7(),
            user_id,
            first_name: "Maria".into(),
            last_name: "Lopez".into(),
            national_id: "12345678".into(),
            email: None,
            phone: "555123456".into(),
            birth_date: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            emergency_contact: None,
            emergency_phone: None,
            insurance_provider: None,
            insurance_number: None,
            active: true,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn eye(eye_type: EyeType) -> EyeAttrs {
        EyeAttrs {
            eye_type,
            sphere: Some(-1.25),
            cylinder: None,
            axis: Some(90),
            add: None,
            prism: None,
            prism_base: None,
            dnp: None,
            npd: None,
            height: None,
            notes: None,
        }
    }

    fn lens(eye_type: LensEye) -> LensAttrs {
        LensAttrs {
            eye_type,
            lens_type: Some("single vision".into()),
            material: None,
            coatings: vec!["anti-reflective".into()],
            refractive_index: None,
            tint: None,
            photochromic: None,
            progressive: None,
            special_properties: None,
            notes: None,
        }
    }

    fn stored_prescription(patient: &Patient) -> Prescription {
        Prescription {
            id: Uuid::now_v7(),
            patient_id: patient.id,
            user_id: patient.user_id,
            exam_date: None,
            observations: None,
            order_number: Some("ORD-100".into()),
            total_cost: Some(300.0),
            deposit_paid: None,
            expected_delivery_date: None,
            status: PrescriptionStatus::Pending,
            distance_va_od: None,
            distance_va_os: None,
            near_va_od: None,
            near_va_os: None,
            eyes: vec![eye_from_attrs(eye(EyeType::Od))],
            lenses: vec![lens_from_attrs(lens(LensEye::Od))],
            frame: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn should_create_aggregate_for_owned_patient() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let usecase = CreatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(None),
        };
        let created = usecase
            .execute(
                &actor,
                patient.id,
                CreatePrescriptionInput {
                    attrs: PrescriptionAttrs {
                        order_number: Some("ORD-1".into()),
                        total_cost: Some(250.0),
                        ..Default::default()
                    },
                    eyes: vec![eye(EyeType::Od), eye(EyeType::Os)],
                    lenses: vec![lens(LensEye::Both)],
                    frame: Some(FrameAttrs {
                        brand: Some("Rayban".into()),
                        ..Default::default()
                    }),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.patient_id, patient.id);
        assert_eq!(created.user_id, actor.id);
        assert_eq!(created.status, PrescriptionStatus::Pending);
        assert_eq!(created.eyes.len(), 2);
        assert_eq!(created.lenses.len(), 1);
        assert!(created.frame.is_some());
        assert!(usecase.prescriptions.created.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn should_reject_duplicate_eye_types() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let usecase = CreatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(None),
        };
        let result = usecase
            .execute(
                &actor,
                patient.id,
                CreatePrescriptionInput {
                    attrs: PrescriptionAttrs::default(),
                    eyes: vec![eye(EyeType::Od), eye(EyeType::Od)],
                    lenses: vec![],
                    frame: None,
                },
            )
            .await;
        let Err(ApiError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "eyes");
    }

    #[tokio::test]
    async fn should_reject_both_lens_alongside_others() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let usecase = CreatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(None),
        };
        let result = usecase
            .execute(
                &actor,
                patient.id,
                CreatePrescriptionInput {
                    attrs: PrescriptionAttrs::default(),
                    eyes: vec![],
                    lenses: vec![lens(LensEye::Both), lens(LensEye::Od)],
                    frame: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn should_reject_taken_order_number() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let mut prescriptions = MockPrescriptionRepo::new(None);
        prescriptions.order_number_taken = true;
        let usecase = CreatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions,
        };
        let result = usecase
            .execute(
                &actor,
                patient.id,
                CreatePrescriptionInput {
                    attrs: PrescriptionAttrs {
                        order_number: Some("ORD-1".into()),
                        ..Default::default()
                    },
                    eyes: vec![],
                    lenses: vec![],
                    frame: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::OrderNumberTaken)));
    }

    #[tokio::test]
    async fn should_forbid_foreign_patient_prescription() {
        let usecase = CreatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient_owned_by(Uuid::now_v7())),
            },
            prescriptions: MockPrescriptionRepo::new(None),
        };
        let result = usecase
            .execute(
                &sales_actor(),
                Uuid::now_v7(),
                CreatePrescriptionInput {
                    attrs: PrescriptionAttrs::default(),
                    eyes: vec![],
                    lenses: vec![],
                    frame: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn should_apply_nested_writes_on_update() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let existing = stored_prescription(&patient);
        let existing_eye = existing.eyes[0].id;
        let existing_lens = existing.lenses[0].id;

        let usecase = UpdatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing.clone())),
        };
        let updated = usecase
            .execute(
                &actor,
                existing.id,
                UpdatePrescriptionInput {
                    attrs: PrescriptionAttrs {
                        deposit_paid: Some(100.0),
                        ..Default::default()
                    },
                    eyes: vec![
                        NestedWrite::Update(
                            existing_eye,
                            EyeAttrs {
                                sphere: Some(-2.0),
                                ..eye(EyeType::Od)
                            },
                        ),
                        NestedWrite::Create(eye(EyeType::Os)),
                    ],
                    lenses: vec![NestedWrite::Delete(existing_lens)],
                    frame: Some(NestedWrite::Create(FrameAttrs {
                        brand: Some("Persol".into()),
                        ..Default::default()
                    })),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.deposit_paid, Some(100.0));
        assert_eq!(updated.eyes.len(), 2);
        assert_eq!(updated.eyes[0].sphere, Some(-2.0));
        assert!(updated.lenses.is_empty());
        assert!(updated.frame.is_some());

        let (_, removed_eyes, removed_lenses, removed_frame) =
            usecase.prescriptions.updated.lock().unwrap().clone().unwrap();
        assert!(removed_eyes.is_empty());
        assert_eq!(removed_lenses, vec![existing_lens]);
        assert_eq!(removed_frame, None);
    }

    #[tokio::test]
    async fn should_reject_update_creating_duplicate_eye() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let existing = stored_prescription(&patient);

        let usecase = UpdatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing.clone())),
        };
        let result = usecase
            .execute(
                &actor,
                existing.id,
                UpdatePrescriptionInput {
                    attrs: PrescriptionAttrs::default(),
                    // Stored aggregate already has an OD eye.
                    eyes: vec![NestedWrite::Create(eye(EyeType::Od))],
                    lenses: vec![],
                    frame: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn should_reject_transition_out_of_cancelled() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let mut existing = stored_prescription(&patient);
        existing.status = PrescriptionStatus::Cancelled;

        let usecase = UpdatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing.clone())),
        };
        let result = usecase
            .execute(
                &actor,
                existing.id,
                UpdatePrescriptionInput {
                    attrs: PrescriptionAttrs {
                        status: Some(PrescriptionStatus::Pending),
                        ..Default::default()
                    },
                    eyes: vec![],
                    lenses: vec![],
                    frame: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::InvalidStatusTransition)));
    }

    #[tokio::test]
    async fn should_skip_order_number_check_when_unchanged() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let existing = stored_prescription(&patient);

        let mut prescriptions = MockPrescriptionRepo::new(Some(existing.clone()));
        prescriptions.order_number_taken = true;
        let usecase = UpdatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions,
        };
        let updated = usecase
            .execute(
                &actor,
                existing.id,
                UpdatePrescriptionInput {
                    attrs: PrescriptionAttrs {
                        order_number: Some("ORD-100".into()),
                        ..Default::default()
                    },
                    eyes: vec![],
                    lenses: vec![],
                    frame: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.order_number.as_deref(), Some("ORD-100"));
    }

    #[tokio::test]
    async fn should_reject_unknown_sub_record_ids() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let existing = stored_prescription(&patient);

        let usecase = UpdatePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing.clone())),
        };
        let result = usecase
            .execute(
                &actor,
                existing.id,
                UpdatePrescriptionInput {
                    attrs: PrescriptionAttrs::default(),
                    eyes: vec![NestedWrite::Delete(Uuid::now_v7())],
                    lenses: vec![],
                    frame: Some(NestedWrite::Delete(Uuid::now_v7())),
                },
            )
            .await;
        let Err(ApiError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"eyes"));
        assert!(fields.contains(&"frame"));
    }

    #[tokio::test]
    async fn should_delete_prescription_through_patient_ownership() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let existing = stored_prescription(&patient);

        let usecase = DeletePrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing.clone())),
        };
        usecase.execute(&actor, existing.id).await.unwrap();
        assert!(*usecase.prescriptions.deleted.lock().unwrap());
    }

    #[tokio::test]
    async fn should_forbid_foreign_prescription_access() {
        let patient = patient_owned_by(Uuid::now_v7());
        let existing = stored_prescription(&patient);
        let usecase = GetPrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing.clone())),
        };
        let result = usecase.execute(&sales_actor(), existing.id).await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn should_forbid_admin_on_foreign_prescription() {
        let admin = Actor {
            id: Uuid::now_v7(),
            role: Role::Admin,
        };
        let patient = patient_owned_by(Uuid::now_v7());
        let existing = stored_prescription(&patient);
        let usecase = GetPrescriptionUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing.clone())),
        };
        let result = usecase.execute(&admin, existing.id).await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn should_list_prescriptions_with_meta() {
        let actor = sales_actor();
        let patient = patient_owned_by(actor.id);
        let existing = stored_prescription(&patient);
        let usecase = ListPrescriptionsUseCase {
            patients: MockPatientRepo {
                patient: Some(patient.clone()),
            },
            prescriptions: MockPrescriptionRepo::new(Some(existing)),
        };
        let (items, meta) = usecase
            .execute(&actor, patient.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(meta.total_count, 1);
    }
}
