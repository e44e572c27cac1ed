use sea_orm::entity::prelude::*;

/// Per-eye measurement record (OD or OS), at most one of each per
/// prescription.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "prescription_eyes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prescription_id: Uuid,
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
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prescriptions::Entity",
        from = "Column::PrescriptionId",
        to = "super::prescriptions::Column::Id"
    )]
    Prescription,
}

impl Related<super::prescriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prescription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
