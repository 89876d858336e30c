//! Migration: Create service catalog, clinic offerings and opening hours.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts::Clinicas;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Servicos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Servicos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Servicos::Name).string().not_null())
                    .col(ColumnDef::new(Servicos::Description).text().not_null())
                    .col(ColumnDef::new(Servicos::Price).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TiposServico::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TiposServico::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TiposServico::Name).string().not_null())
                    .col(ColumnDef::new(TiposServico::ServiceId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tipos_servico_service")
                            .from(TiposServico::Table, TiposServico::ServiceId)
                            .to(Servicos::Table, Servicos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClinicaServicos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ClinicaServicos::ClinicId).integer().not_null())
                    .col(ColumnDef::new(ClinicaServicos::ServiceId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ClinicaServicos::ClinicId)
                            .col(ClinicaServicos::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clinica_servicos_clinic")
                            .from(ClinicaServicos::Table, ClinicaServicos::ClinicId)
                            .to(Clinicas::Table, Clinicas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clinica_servicos_service")
                            .from(ClinicaServicos::Table, ClinicaServicos::ServiceId)
                            .to(Servicos::Table, Servicos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HorariosFuncionamento::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HorariosFuncionamento::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HorariosFuncionamento::ClinicId).integer().not_null())
                    .col(ColumnDef::new(HorariosFuncionamento::Weekday).small_integer().not_null())
                    .col(ColumnDef::new(HorariosFuncionamento::OpensAt).time().not_null())
                    .col(ColumnDef::new(HorariosFuncionamento::ClosesAt).time().not_null())
                    .check(Expr::col(HorariosFuncionamento::Weekday).between(0, 6))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_horarios_clinic")
                            .from(HorariosFuncionamento::Table, HorariosFuncionamento::ClinicId)
                            .to(Clinicas::Table, Clinicas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HorariosFuncionamento::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClinicaServicos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TiposServico::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Servicos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Servicos {
    Table,
    Id,
    Name,
    Description,
    Price,
}

#[derive(Iden)]
pub(super) enum TiposServico {
    Table,
    Id,
    Name,
    ServiceId,
}

#[derive(Iden)]
enum ClinicaServicos {
    Table,
    ClinicId,
    ServiceId,
}

#[derive(Iden)]
enum HorariosFuncionamento {
    Table,
    Id,
    ClinicId,
    Weekday,
    OpensAt,
    ClosesAt,
}
