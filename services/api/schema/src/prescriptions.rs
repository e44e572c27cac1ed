use sea_orm::entity::prelude::*;

/// Prescription parent row. Eye, lens, and frame sub-records hang off
/// this and are written in the same transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "prescriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub user_id: Uuid,
    pub exam_date: Option<chrono::NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    pub observations: Option<String>,
    #[sea_orm(unique)]
    pub order_number: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub expected_delivery_date: Option<chrono::NaiveDate>,
    pub status: String,
    pub distance_va_od: Option<f64>,
    pub distance_va_os: Option<f64>,
    pub near_va_od: Option<f64>,
    pub near_va_os: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patients::Entity",
        from = "Column::PatientId",
        to = "super::patients::Column::Id"
    )]
    Patient,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::prescription_eyes::Entity")]
    PrescriptionEyes,
    #[sea_orm(has_many = "super::lenses::Entity")]
    Lenses,
    #[sea_orm(has_one = "super::frames::Entity")]
    Frame,
}

impl Related<super::patients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patient.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::prescription_eyes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrescriptionEyes.def()
    }
}

impl Related<super::lenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lenses.def()
    }
}

impl Related<super::frames::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frame.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
