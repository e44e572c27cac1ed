use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lenses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Lenses::PrescriptionId).uuid().not_null())
                    .col(ColumnDef::new(Lenses::EyeType).string().not_null())
                    .col(ColumnDef::new(Lenses::LensType).string())
                    .col(ColumnDef::new(Lenses::Material).string())
                    .col(ColumnDef::new(Lenses::Coatings).text())
                    .col(ColumnDef::new(Lenses::RefractiveIndex).double())
                    .col(ColumnDef::new(Lenses::Tint).string())
                    .col(
                        ColumnDef::new(Lenses::Photochromic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Lenses::Progressive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Lenses::SpecialProperties).text())
                    .col(ColumnDef::new(Lenses::Notes).text())
                    .col(
                        ColumnDef::new(Lenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Lenses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lenses::Table, Lenses::PrescriptionId)
                            .to(Prescriptions::Table, Prescriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lenses_prescription_id_eye_type")
                    .table(Lenses::Table)
                    .col(Lenses::PrescriptionId)
                    .col(Lenses::EyeType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lenses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Lenses {
    Table,
    Id,
    PrescriptionId,
    EyeType,
    LensType,
    Material,
    Coatings,
    RefractiveIndex,
    Tint,
    Photochromic,
    Progressive,
    SpecialProperties,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Prescriptions {
    Table,
    Id,
}
