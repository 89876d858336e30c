//! Migration: Create consultation records and clinic locations.
//!
//! Each clinic has at most one location row. Consultations go away with
//! their pet but keep the clinic from being deleted.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts::Clinicas;
use super::m20240101_000003_create_pets_and_appointments::Pets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LocalizacoesClinica::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocalizacoesClinica::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LocalizacoesClinica::ClinicId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LocalizacoesClinica::Latitude).double().not_null())
                    .col(ColumnDef::new(LocalizacoesClinica::Longitude).double().not_null())
                    .col(ColumnDef::new(LocalizacoesClinica::Address).string().not_null())
                    .col(ColumnDef::new(LocalizacoesClinica::City).string().not_null())
                    .col(ColumnDef::new(LocalizacoesClinica::State).string_len(32).not_null())
                    .col(ColumnDef::new(LocalizacoesClinica::PostalCode).string_len(9).not_null())
                    .col(
                        ColumnDef::new(LocalizacoesClinica::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_localizacoes_clinica_clinic")
                            .from(LocalizacoesClinica::Table, LocalizacoesClinica::ClinicId)
                            .to(Clinicas::Table, Clinicas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Consultas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Consultas::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Consultas::PetId).integer().not_null())
                    .col(ColumnDef::new(Consultas::ClinicId).integer().not_null())
                    .col(ColumnDef::new(Consultas::HeldAt).timestamp().not_null())
                    .col(ColumnDef::new(Consultas::VetName).string().not_null())
                    .col(ColumnDef::new(Consultas::Diagnosis).text().not_null())
                    .col(ColumnDef::new(Consultas::Prescription).text().null())
                    .col(ColumnDef::new(Consultas::Notes).text().null())
                    .col(
                        ColumnDef::new(Consultas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_consultas_pet")
                            .from(Consultas::Table, Consultas::PetId)
                            .to(Pets::Table, Pets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_consultas_clinic")
                            .from(Consultas::Table, Consultas::ClinicId)
                            .to(Clinicas::Table, Clinicas::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_consultas_pet_held_at")
                    .table(Consultas::Table)
                    .col(Consultas::PetId)
                    .col(Consultas::HeldAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Consultas::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LocalizacoesClinica::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LocalizacoesClinica {
    Table,
    Id,
    ClinicId,
    Latitude,
    Longitude,
    Address,
    City,
    State,
    PostalCode,
    UpdatedAt,
}

#[derive(Iden)]
enum Consultas {
    Table,
    Id,
    PetId,
    ClinicId,
    HeldAt,
    VetName,
    Diagnosis,
    Prescription,
    Notes,
    CreatedAt,
}
