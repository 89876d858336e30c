//! Migration: Create pets and appointments.
//!
//! A partial unique index keeps at most one SCHEDULED appointment per
//! (clinic, date, slot); cancelled and completed rows do not hold the slot.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts::{Clinicas, Usuarios};
use super::m20240101_000002_create_catalog::TiposServico;

const SCHEDULED_SLOT_INDEX: &str = "uq_agendamentos_scheduled_slot";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pets::Name).string().not_null())
                    .col(ColumnDef::new(Pets::Species).string().not_null())
                    .col(ColumnDef::new(Pets::Breed).string().not_null())
                    .col(ColumnDef::new(Pets::Weight).double().null())
                    .col(ColumnDef::new(Pets::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Pets::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Pets::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_owner")
                            .from(Pets::Table, Pets::OwnerId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pets_owner_id")
                    .table(Pets::Table)
                    .col(Pets::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Agendamentos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Agendamentos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Agendamentos::Date).date().not_null())
                    .col(ColumnDef::new(Agendamentos::TimeSlot).time().not_null())
                    .col(ColumnDef::new(Agendamentos::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Agendamentos::PetId).integer().not_null())
                    .col(ColumnDef::new(Agendamentos::ServiceTypeId).integer().not_null())
                    .col(ColumnDef::new(Agendamentos::ClinicId).integer().not_null())
                    .col(ColumnDef::new(Agendamentos::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Agendamentos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Agendamentos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agendamentos_pet")
                            .from(Agendamentos::Table, Agendamentos::PetId)
                            .to(Pets::Table, Pets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agendamentos_service_type")
                            .from(Agendamentos::Table, Agendamentos::ServiceTypeId)
                            .to(TiposServico::Table, TiposServico::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agendamentos_clinic")
                            .from(Agendamentos::Table, Agendamentos::ClinicId)
                            .to(Clinicas::Table, Clinicas::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agendamentos_user")
                            .from(Agendamentos::Table, Agendamentos::UserId)
                            .to(Usuarios::Table, Usuarios::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_agendamentos_user_id")
                    .table(Agendamentos::Table)
                    .col(Agendamentos::UserId)
                    .to_owned(),
            )
            .await?;

        // Partial indexes are not expressible through the index builder
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON agendamentos (clinic_id, date, time_slot) \
                 WHERE status = 'SCHEDULED'",
                SCHEDULED_SLOT_INDEX
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS {}", SCHEDULED_SLOT_INDEX))
            .await?;

        manager
            .drop_table(Table::drop().table(Agendamentos::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Pets {
    Table,
    Id,
    Name,
    Species,
    Breed,
    Weight,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Agendamentos {
    Table,
    Id,
    Date,
    TimeSlot,
    Status,
    PetId,
    ServiceTypeId,
    ClinicId,
    UserId,
    CreatedAt,
    UpdatedAt,
}
