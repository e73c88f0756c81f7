use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StaffUser::Table)
                    .if_not_exists()
                    .col(uuid(StaffUser::Id).primary_key())
                    .col(string(StaffUser::Username).unique_key())
                    .col(string(StaffUser::PasswordHash))
                    .col(ColumnDef::new(StaffUser::IsStaff).boolean().not_null().default(false))
                    .col(ColumnDef::new(StaffUser::IsActive).boolean().not_null().default(true))
                    .col(big_integer(StaffUser::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StaffSession::Table)
                    .if_not_exists()
                    .col(string(StaffSession::Token).primary_key())
                    .col(uuid(StaffSession::UserId))
                    .col(big_integer(StaffSession::ExpiresAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_session_user")
                            .from(StaffSession::Table, StaffSession::UserId)
                            .to(StaffUser::Table, StaffUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_staff_session_expires_at")
                    .table(StaffSession::Table)
                    .col(StaffSession::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StaffSession::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(StaffUser::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum StaffUser {
    Table,
    Id,
    Username,
    PasswordHash,
    IsStaff,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StaffSession {
    Table,
    Token,
    UserId,
    ExpiresAt,
}
