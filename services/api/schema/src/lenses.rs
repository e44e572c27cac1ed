use sea_orm::entity::prelude::*;

/// Lens specification. `coatings` is stored as a JSON array string;
/// legacy rows may hold comma-delimited text — `infra/db.rs` normalizes
/// both on read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub eye_type: String,
    pub lens_type: Option<String>,
    pub material: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub coatings: Option<String>,
    pub refractive_index: Option<f64>,
    pub tint: Option<String>,
    pub photochromic: bool,
    pub progressive: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_properties: Option<String>,
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
