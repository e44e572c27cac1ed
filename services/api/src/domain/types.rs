use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

use optica_domain::pagination::Sort;
use optica_domain::role::Role;

use crate::error::FieldError;

// ── Users ────────────────────────────────────────────────────────────────────

/// Staff account. `jti` is the revocation marker; every issued token
/// embeds the value current at issue time.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub jti: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Patients ─────────────────────────────────────────────────────────────────

/// Patient record, owned by the staff user who created it.
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years at `today`. Computed, never stored.
    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        let birth = self.birth_date?;
        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        Some(age)
    }
}

/// Sort options for the patient list. Unknown or absent input falls back
/// to name ascending. "age" orders by birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientSortBy {
    Name(Sort),
    Email(Sort),
    Created(Sort),
    Age(Sort),
}

impl Default for PatientSortBy {
    fn default() -> Self {
        Self::Name(Sort::Asc)
    }
}

impl PatientSortBy {
    pub fn from_param(s: Option<&str>) -> Self {
        match s {
            Some("name_asc") => Self::Name(Sort::Asc),
            Some("name_desc") => Self::Name(Sort::Desc),
            Some("email_asc") => Self::Email(Sort::Asc),
            Some("email_desc") => Self::Email(Sort::Desc),
            Some("created_asc") => Self::Created(Sort::Asc),
            Some("created_desc") => Self::Created(Sort::Desc),
            Some("age_asc") => Self::Age(Sort::Asc),
            Some("age_desc") => Self::Age(Sort::Desc),
            _ => Self::default(),
        }
    }
}

/// Filters applied to the patient list. A blank `search` term matches
/// everything; it is not an error.
#[derive(Debug, Clone, Default)]
pub struct PatientListFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub active: Option<bool>,
}

/// Incoming patient fields for create.
#[derive(Debug, Clone, Default)]
pub struct PatientAttrs {
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

impl PatientAttrs {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !valid_name(&self.first_name) {
            errors.push(FieldError::new("first_name", "must be 2-50 characters"));
        }
        if !valid_name(&self.last_name) {
            errors.push(FieldError::new("last_name", "must be 2-50 characters"));
        }
        if !valid_national_id(&self.national_id) {
            errors.push(FieldError::new("national_id", "must be exactly 8 digits"));
        }
        if !valid_phone(&self.phone) {
            errors.push(FieldError::new("phone", "must be 9-15 characters"));
        }
        if let Some(ref email) = self.email {
            if !valid_email(email) {
                errors.push(FieldError::new("email", "is not a valid email address"));
            }
        }
        errors
    }
}

/// Incoming patient fields for update. `Some` means set; absent fields
/// are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PatientPatch {
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

impl PatientPatch {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(ref v) = self.first_name {
            if !valid_name(v) {
                errors.push(FieldError::new("first_name", "must be 2-50 characters"));
            }
        }
        if let Some(ref v) = self.last_name {
            if !valid_name(v) {
                errors.push(FieldError::new("last_name", "must be 2-50 characters"));
            }
        }
        if let Some(ref v) = self.national_id {
            if !valid_national_id(v) {
                errors.push(FieldError::new("national_id", "must be exactly 8 digits"));
            }
        }
        if let Some(ref v) = self.phone {
            if !valid_phone(v) {
                errors.push(FieldError::new("phone", "must be 9-15 characters"));
            }
        }
        if let Some(ref v) = self.email {
            if !valid_email(v) {
                errors.push(FieldError::new("email", "is not a valid email address"));
            }
        }
        errors
    }

    /// Apply the provided fields onto an existing patient.
    pub fn apply_to(&self, patient: &mut Patient) {
        if let Some(ref v) = self.first_name {
            patient.first_name = v.clone();
        }
        if let Some(ref v) = self.last_name {
            patient.last_name = v.clone();
        }
        if let Some(ref v) = self.national_id {
            patient.national_id = v.clone();
        }
        if let Some(ref v) = self.email {
            patient.email = Some(v.clone());
        }
        if let Some(ref v) = self.phone {
            patient.phone = v.clone();
        }
        if let Some(v) = self.birth_date {
            patient.birth_date = Some(v);
        }
        if let Some(ref v) = self.address {
            patient.address = Some(v.clone());
        }
        if let Some(ref v) = self.city {
            patient.city = Some(v.clone());
        }
        if let Some(ref v) = self.state {
            patient.state = Some(v.clone());
        }
        if let Some(ref v) = self.zip_code {
            patient.zip_code = Some(v.clone());
        }
        if let Some(ref v) = self.emergency_contact {
            patient.emergency_contact = Some(v.clone());
        }
        if let Some(ref v) = self.emergency_phone {
            patient.emergency_phone = Some(v.clone());
        }
        if let Some(ref v) = self.insurance_provider {
            patient.insurance_provider = Some(v.clone());
        }
        if let Some(ref v) = self.insurance_number {
            patient.insurance_number = Some(v.clone());
        }
        if let Some(v) = self.active {
            patient.active = v;
        }
        if let Some(ref v) = self.notes {
            patient.notes = Some(v.clone());
        }
    }
}

// ── Prescriptions ────────────────────────────────────────────────────────────

/// Eye side for measurement records: OD (right) / OS (left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeType {
    Od,
    Os,
}

impl EyeType {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "OD" => Some(Self::Od),
            "OS" => Some(Self::Os),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Od => "OD",
            Self::Os => "OS",
        }
    }
}

/// Eye side for lens records; `Both` covers a single lens for both eyes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensEye {
    Od,
    Os,
    Both,
}

impl LensEye {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "OD" => Some(Self::Od),
            "OS" => Some(Self::Os),
            "Both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Od => "OD",
            Self::Os => "OS",
            Self::Both => "Both",
        }
    }
}

/// Order status. `cancelled` is terminal — see [`PrescriptionStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrescriptionStatus {
    Pending,
    Completed,
    Delivered,
    Cancelled,
}

impl Default for PrescriptionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl PrescriptionStatus {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// A cancelled order stays cancelled; everything else may move freely.
    pub fn can_transition_to(self, next: Self) -> bool {
        self != Self::Cancelled || next == Self::Cancelled
    }
}

/// Per-eye measurement sub-record.
#[derive(Debug, Clone)]
pub struct PrescriptionEye {
    pub id: Uuid,
    pub eye_type: EyeType,
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

/// Lens specification sub-record. `coatings` is always a normalized list
/// in memory regardless of how it is stored.
#[derive(Debug, Clone)]
pub struct Lens {
    pub id: Uuid,
    pub eye_type: LensEye,
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

/// Frame sub-record, at most one per prescription.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: Uuid,
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

/// Full prescription aggregate: parent row plus all sub-records. Read
/// and written as one consistency unit.
#[derive(Debug, Clone)]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub user_id: Uuid,
    pub exam_date: Option<NaiveDate>,
    pub observations: Option<String>,
    pub order_number: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: PrescriptionStatus,
    pub distance_va_od: Option<f64>,
    pub distance_va_os: Option<f64>,
    pub near_va_od: Option<f64>,
    pub near_va_os: Option<f64>,
    pub eyes: Vec<PrescriptionEye>,
    pub lenses: Vec<Lens>,
    pub frame: Option<Frame>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prescription {
    /// Outstanding balance; missing amounts count as zero.
    pub fn total_balance(&self) -> f64 {
        self.total_cost.unwrap_or(0.0) - self.deposit_paid.unwrap_or(0.0)
    }

    /// True only when both amounts are present and the deposit covers the
    /// total.
    pub fn fully_paid(&self) -> bool {
        matches!(
            (self.total_cost, self.deposit_paid),
            (Some(total), Some(deposit)) if deposit >= total
        )
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.expected_delivery_date
            .is_some_and(|expected| expected < today)
            && self.status != PrescriptionStatus::Delivered
    }
}

/// Top-level prescription fields shared by create and update payloads.
/// On update, `Some` means set and absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionAttrs {
    pub exam_date: Option<NaiveDate>,
    pub observations: Option<String>,
    pub order_number: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: Option<PrescriptionStatus>,
    pub distance_va_od: Option<f64>,
    pub distance_va_os: Option<f64>,
    pub near_va_od: Option<f64>,
    pub near_va_os: Option<f64>,
}

impl PrescriptionAttrs {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.total_cost.is_some_and(|v| v < 0.0) {
            errors.push(FieldError::new("total_cost", "must not be negative"));
        }
        if self.deposit_paid.is_some_and(|v| v < 0.0) {
            errors.push(FieldError::new("deposit_paid", "must not be negative"));
        }
        errors
    }
}

/// Incoming eye-measurement fields.
#[derive(Debug, Clone)]
pub struct EyeAttrs {
    pub eye_type: EyeType,
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

impl EyeAttrs {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.axis.is_some_and(|v| !(0..=180).contains(&v)) {
            errors.push(FieldError::new("axis", "must be between 0 and 180"));
        }
        errors
    }
}

/// Incoming lens fields.
#[derive(Debug, Clone)]
pub struct LensAttrs {
    pub eye_type: LensEye,
    pub lens_type: Option<String>,
    pub material: Option<String>,
    pub coatings: Vec<String>,
    pub refractive_index: Option<f64>,
    pub tint: Option<String>,
    pub photochromic: Option<bool>,
    pub progressive: Option<bool>,
    pub special_properties: Option<String>,
    pub notes: Option<String>,
}

/// Incoming frame fields.
#[derive(Debug, Clone, Default)]
pub struct FrameAttrs {
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

/// One nested-write operation on a sub-record. Sub-records absent from an
/// update payload are left untouched.
#[derive(Debug, Clone)]
pub enum NestedWrite<T> {
    Create(T),
    Update(Uuid, T),
    Delete(Uuid),
}

// ── Field validation helpers ─────────────────────────────────────────────────

pub fn valid_name(s: &str) -> bool {
    let len = s.chars().count();
    (2..=50).contains(&len)
}

pub fn valid_phone(s: &str) -> bool {
    let len = s.chars().count();
    (9..=15).contains(&len)
}

pub fn valid_national_id(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Minimal structural email check: one `@`, non-empty local part, a dot
/// in the domain, no whitespace.
pub fn valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_patient() -> Patient {
        Patient {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            first_name: "Maria".into(),
            last_name: "Lopez".into(),
            national_id: "12345678".into(),
            email: Some("maria@example.com".into()),
            phone: "555123456".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 6, 15),
            address: None,
            city: Some("Lima".into()),
            state: Some("Lima".into()),
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

    fn test_prescription() -> Prescription {
        Prescription {
            id: Uuid::now_v7(),
            patient_id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            exam_date: None,
            observations: None,
            order_number: None,
            total_cost: None,
            deposit_paid: None,
            expected_delivery_date: None,
            status: PrescriptionStatus::Pending,
            distance_va_od: None,
            distance_va_os: None,
            near_va_od: None,
            near_va_os: None,
            eyes: vec![],
            lenses: vec![],
            frame: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn should_compute_full_name() {
        assert_eq!(test_patient().full_name(), "Maria Lopez");
    }

    #[test]
    fn should_compute_age_with_birthday_boundary() {
        let patient = test_patient();
        let before_birthday = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert_eq!(patient.age(before_birthday), Some(35));
        assert_eq!(patient.age(on_birthday), Some(36));
    }

    #[test]
    fn should_return_no_age_without_birth_date() {
        let mut patient = test_patient();
        patient.birth_date = None;
        assert_eq!(patient.age(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()), None);
    }

    #[test]
    fn should_parse_patient_sort_with_fallback() {
        use optica_domain::pagination::Sort;
        assert_eq!(
            PatientSortBy::from_param(Some("age_desc")),
            PatientSortBy::Age(Sort::Desc)
        );
        assert_eq!(
            PatientSortBy::from_param(Some("email_asc")),
            PatientSortBy::Email(Sort::Asc)
        );
        assert_eq!(
            PatientSortBy::from_param(Some("bogus")),
            PatientSortBy::Name(Sort::Asc)
        );
        assert_eq!(
            PatientSortBy::from_param(None),
            PatientSortBy::Name(Sort::Asc)
        );
    }

    #[test]
    fn should_validate_patient_attrs() {
        let attrs = PatientAttrs {
            first_name: "Maria".into(),
            last_name: "Lopez".into(),
            national_id: "12345678".into(),
            phone: "555123456".into(),
            email: Some("maria@example.com".into()),
            ..Default::default()
        };
        assert!(attrs.validate().is_empty());
    }

    #[test]
    fn should_collect_all_field_errors() {
        let attrs = PatientAttrs {
            first_name: "M".into(),
            last_name: String::new(),
            national_id: "1234".into(),
            phone: "123".into(),
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        let errors = attrs.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["first_name", "last_name", "national_id", "phone", "email"]
        );
    }

    #[test]
    fn should_validate_only_provided_patch_fields() {
        let patch = PatientPatch {
            phone: Some("123".into()),
            ..Default::default()
        };
        let errors = patch.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "phone");

        let empty = PatientPatch::default();
        assert!(empty.validate().is_empty());
    }

    #[test]
    fn should_apply_patch_fields_only() {
        let mut patient = test_patient();
        let patch = PatientPatch {
            phone: Some("999888777".into()),
            notes: Some("allergic to latex".into()),
            ..Default::default()
        };
        patch.apply_to(&mut patient);
        assert_eq!(patient.phone, "999888777");
        assert_eq!(patient.notes.as_deref(), Some("allergic to latex"));
        assert_eq!(patient.first_name, "Maria");
    }

    #[test]
    fn should_validate_national_id_as_eight_digits() {
        assert!(valid_national_id("12345678"));
        assert!(!valid_national_id("1234567"));
        assert!(!valid_national_id("123456789"));
        assert!(!valid_national_id("1234567a"));
    }

    #[test]
    fn should_validate_email_structure() {
        assert!(valid_email("a@b.co"));
        assert!(valid_email("maria.lopez@example.com"));
        assert!(!valid_email("no-at-sign"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("a@nodot"));
        assert!(!valid_email("a b@example.com"));
        assert!(!valid_email("a@.com"));
    }

    #[test]
    fn should_parse_eye_types() {
        assert_eq!(EyeType::from_str_opt("OD"), Some(EyeType::Od));
        assert_eq!(EyeType::from_str_opt("OS"), Some(EyeType::Os));
        assert_eq!(EyeType::from_str_opt("Both"), None);
        assert_eq!(LensEye::from_str_opt("Both"), Some(LensEye::Both));
        assert_eq!(LensEye::from_str_opt("OU"), None);
    }

    #[test]
    fn should_forbid_transitions_out_of_cancelled() {
        use PrescriptionStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Delivered.can_transition_to(Pending));
        assert!(Cancelled.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Delivered));
    }

    #[test]
    fn should_compute_balance_with_missing_amounts_as_zero() {
        let mut p = test_prescription();
        p.total_cost = Some(500.0);
        p.deposit_paid = Some(150.0);
        assert_eq!(p.total_balance(), 350.0);

        p.deposit_paid = None;
        assert_eq!(p.total_balance(), 500.0);

        p.total_cost = None;
        assert_eq!(p.total_balance(), 0.0);
    }

    #[test]
    fn should_report_fully_paid_only_when_both_present() {
        let mut p = test_prescription();
        assert!(!p.fully_paid());
        p.total_cost = Some(500.0);
        assert!(!p.fully_paid());
        p.deposit_paid = Some(500.0);
        assert!(p.fully_paid());
        p.deposit_paid = Some(499.0);
        assert!(!p.fully_paid());
    }

    #[test]
    fn should_report_overdue_unless_delivered() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let mut p = test_prescription();
        p.expected_delivery_date = NaiveDate::from_ymd_opt(2026, 8, 1);
        assert!(p.is_overdue(today));

        p.status = PrescriptionStatus::Delivered;
        assert!(!p.is_overdue(today));

        p.status = PrescriptionStatus::Pending;
        p.expected_delivery_date = NaiveDate::from_ymd_opt(2026, 9, 1);
        assert!(!p.is_overdue(today));

        p.expected_delivery_date = None;
        assert!(!p.is_overdue(today));
    }

    #[test]
    fn should_validate_axis_range() {
        let mut attrs = EyeAttrs {
            eye_type: EyeType::Od,
            sphere: None,
            cylinder: None,
            axis: Some(90),
            add: None,
            prism: None,
            prism_base: None,
            dnp: None,
            npd: None,
            height: None,
            notes: None,
        };
        assert!(attrs.validate().is_empty());
        attrs.axis = Some(181);
        assert_eq!(attrs.validate()[0].field, "axis");
        attrs.axis = Some(-1);
        assert_eq!(attrs.validate()[0].field, "axis");
        attrs.axis = Some(0);
        assert!(attrs.validate().is_empty());
    }

    #[test]
    fn should_reject_negative_amounts() {
        let attrs = PrescriptionAttrs {
            total_cost: Some(-1.0),
            deposit_paid: Some(-2.0),
            ..Default::default()
        };
        let errors = attrs.validate();
        assert_eq!(errors.len(), 2);
    }
}
