//! Migration: Create user and clinic account tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Usuarios::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Usuarios::Name).string().not_null())
                    .col(ColumnDef::new(Usuarios::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Usuarios::Cpf).string_len(14).not_null().unique_key())
                    .col(ColumnDef::new(Usuarios::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Usuarios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Usuarios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clinicas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clinicas::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clinicas::Name).string().not_null())
                    .col(ColumnDef::new(Clinicas::Cnpj).string_len(18).not_null().unique_key())
                    .col(ColumnDef::new(Clinicas::Phone).string().not_null())
                    .col(ColumnDef::new(Clinicas::PhotoUrl).string().null())
                    .col(ColumnDef::new(Clinicas::Rating).double().not_null().default(0.0))
                    .col(ColumnDef::new(Clinicas::RatingCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Clinicas::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Clinicas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clinicas::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clinicas::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Usuarios {
    Table,
    Id,
    Name,
    Email,
    Cpf,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Clinicas {
    Table,
    Id,
    Name,
    Cnpj,
    Phone,
    PhotoUrl,
    Rating,
    RatingCount,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
