use sea_orm::entity::prelude::*;

/// Staff account. `jti` is the revocation marker embedded in issued
/// bearer tokens; rotating it invalidates every outstanding token.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: i16,
    #[sea_orm(unique)]
    pub jti: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::patients::Entity")]
    Patients,
    #[sea_orm(has_many = "super::prescriptions::Entity")]
    Prescriptions,
}

impl Related<super::patients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patients.def()
    }
}

impl Related<super::prescriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prescriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
