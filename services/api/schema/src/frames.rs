use sea_orm::entity::prelude::*;

/// Frame record, at most one per prescription (unique on
/// `prescription_id`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "frames")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub prescription_id: Uuid,
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
    #[sea_orm(column_type = "Text", nullable)]
    pub special_features: Option<String>,
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
