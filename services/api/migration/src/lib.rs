use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_patients;
mod m20260801_000003_create_prescriptions;
mod m20260801_000004_create_prescription_eyes;
mod m20260801_000005_create_lenses;
mod m20260801_000006_create_frames;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_patients::Migration),
            Box::new(m20260801_000003_create_prescriptions::Migration),
            Box::new(m20260801_000004_create_prescription_eyes::Migration),
            Box::new(m20260801_000005_create_lenses::Migration),
            Box::new(m20260801_000006_create_frames::Migration),
        ]
    }
}
