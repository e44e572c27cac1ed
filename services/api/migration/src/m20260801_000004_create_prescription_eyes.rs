use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PrescriptionEyes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrescriptionEyes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PrescriptionEyes::PrescriptionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PrescriptionEyes::EyeType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PrescriptionEyes::Sphere).double())
                    .col(ColumnDef::new(PrescriptionEyes::Cylinder).double())
                    .col(ColumnDef::new(PrescriptionEyes::Axis).integer())
                    .col(ColumnDef::new(PrescriptionEyes::Add).double())
                    .col(ColumnDef::new(PrescriptionEyes::Prism).double())
                    .col(ColumnDef::new(PrescriptionEyes::PrismBase).string())
                    .col(ColumnDef::new(PrescriptionEyes::Dnp).double())
                    .col(ColumnDef::new(PrescriptionEyes::Npd).double())
                    .col(ColumnDef::new(PrescriptionEyes::Height).double())
                    .col(ColumnDef::new(PrescriptionEyes::Notes).text())
                    .col(
                        ColumnDef::new(PrescriptionEyes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PrescriptionEyes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PrescriptionEyes::Table, PrescriptionEyes::PrescriptionId)
                            .to(Prescriptions::Table, Prescriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One OD and one OS record at most per prescription.
        manager
            .create_index(
                Index::create()
                    .name("idx_prescription_eyes_prescription_id_eye_type")
                    .table(PrescriptionEyes::Table)
                    .col(PrescriptionEyes::PrescriptionId)
                    .col(PrescriptionEyes::EyeType)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PrescriptionEyes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PrescriptionEyes {
    Table,
    Id,
    PrescriptionId,
    EyeType,
    Sphere,
    Cylinder,
    Axis,
    Add,
    Prism,
    PrismBase,
    Dnp,
    Npd,
    Height,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Prescriptions {
    Table,
    Id,
}
