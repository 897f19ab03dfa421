use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TransactionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TransactionRecords::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(TransactionRecords::EventId).uuid().not_null())
                    .col(
                        ColumnDef::new(TransactionRecords::TotalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionRecords::Status)
                            .string()
                            .not_null()
                            .default("completed"),
                    )
                    .col(
                        ColumnDef::new(TransactionRecords::TransactionTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TransactionRecords::Table, TransactionRecords::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TransactionRecords::Table, TransactionRecords::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(TransactionRecords::Table)
                    .col(TransactionRecords::OwnerId)
                    .col(TransactionRecords::TransactionTime)
                    .name("idx_transaction_records_owner_id_time")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TransactionRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TransactionRecords {
    Table,
    Id,
    OwnerId,
    EventId,
    TotalAmount,
    Status,
    TransactionTime,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}
