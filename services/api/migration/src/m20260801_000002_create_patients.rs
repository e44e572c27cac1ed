use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Patients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Patients::UserId).uuid().not_null())
                    .col(ColumnDef::new(Patients::FirstName).string().not_null())
                    .col(ColumnDef::new(Patients::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Patients::NationalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Patients::Email).string())
                    .col(ColumnDef::new(Patients::Phone).string().not_null())
                    .col(ColumnDef::new(Patients::BirthDate).date())
                    .col(ColumnDef::new(Patients::Address).text())
                    .col(ColumnDef::new(Patients::City).string())
                    .col(ColumnDef::new(Patients::State).string())
                    .col(ColumnDef::new(Patients::ZipCode).string())
                    .col(ColumnDef::new(Patients::EmergencyContact).string())
                    .col(ColumnDef::new(Patients::EmergencyPhone).string())
                    .col(ColumnDef::new(Patients::InsuranceProvider).string())
                    .col(ColumnDef::new(Patients::InsuranceNumber).string())
                    .col(
                        ColumnDef::new(Patients::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Patients::Notes).text())
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Patients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Patients::Table, Patients::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patients_user_id")
                    .table(Patients::Table)
                    .col(Patients::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Patients {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    NationalId,
    Email,
    Phone,
    BirthDate,
    Address,
    City,
    State,
    ZipCode,
    EmergencyContact,
    EmergencyPhone,
    InsuranceProvider,
    InsuranceNumber,
    Active,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
