use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prescriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prescriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prescriptions::PatientId).uuid().not_null())
                    .col(ColumnDef::new(Prescriptions::UserId).uuid().not_null())
                    .col(ColumnDef::new(Prescriptions::ExamDate).date())
                    .col(ColumnDef::new(Prescriptions::Observations).text())
                    .col(
                        ColumnDef::new(Prescriptions::OrderNumber)
                            .string()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Prescriptions::TotalCost).double())
                    .col(ColumnDef::new(Prescriptions::DepositPaid).double())
                    .col(ColumnDef::new(Prescriptions::ExpectedDeliveryDate).date())
                    .col(
                        ColumnDef::new(Prescriptions::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Prescriptions::DistanceVaOd).double())
                    .col(ColumnDef::new(Prescriptions::DistanceVaOs).double())
                    .col(ColumnDef::new(Prescriptions::NearVaOd).double())
                    .col(ColumnDef::new(Prescriptions::NearVaOs).double())
                    .col(
                        ColumnDef::new(Prescriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Prescriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Prescriptions::Table, Prescriptions::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Prescriptions::Table, Prescriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prescriptions_patient_id_exam_date")
                    .table(Prescriptions::Table)
                    .col(Prescriptions::PatientId)
                    .col(Prescriptions::ExamDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prescriptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Prescriptions {
    Table,
    Id,
    PatientId,
    UserId,
    ExamDate,
    Observations,
    OrderNumber,
    TotalCost,
    DepositPaid,
    ExpectedDeliveryDate,
    Status,
    DistanceVaOd,
    DistanceVaOs,
    NearVaOd,
    NearVaOs,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Patients {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
