use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Frames::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Frames::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Frames::PrescriptionId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Frames::Brand).string())
                    .col(ColumnDef::new(Frames::Model).string())
                    .col(ColumnDef::new(Frames::Material).string())
                    .col(ColumnDef::new(Frames::Color).string())
                    .col(ColumnDef::new(Frames::Style).string())
                    .col(ColumnDef::new(Frames::FrameWidth).double())
                    .col(ColumnDef::new(Frames::LensWidth).double())
                    .col(ColumnDef::new(Frames::BridgeSize).double())
                    .col(ColumnDef::new(Frames::TempleLength).double())
                    .col(ColumnDef::new(Frames::FrameCost).double())
                    .col(ColumnDef::new(Frames::SpecialFeatures).text())
                    .col(ColumnDef::new(Frames::Notes).text())
                    .col(
                        ColumnDef::new(Frames::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Frames::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Frames::Table, Frames::PrescriptionId)
                            .to(Prescriptions::Table, Prescriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Frames::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Frames {
    Table,
    Id,
    PrescriptionId,
    Brand,
    Model,
    Material,
    Color,
    Style,
    FrameWidth,
    LensWidth,
    BridgeSize,
    TempleLength,
    FrameCost,
    SpecialFeatures,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Prescriptions {
    Table,
    Id,
}
