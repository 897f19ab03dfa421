use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TicketCategories::EventId).uuid().not_null())
                    .col(ColumnDef::new(TicketCategories::Price).big_integer().not_null())
                    .col(ColumnDef::new(TicketCategories::Quota).integer().not_null())
                    .col(
                        ColumnDef::new(TicketCategories::Sold)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TicketCategories::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(TicketCategories::DateStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketCategories::DateEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TicketCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(TicketCategories::Price).gte(0))
                    .check(Expr::col(TicketCategories::Quota).gte(0))
                    .check(Expr::col(TicketCategories::Sold).gte(0))
                    .check(
                        Expr::col(TicketCategories::Sold)
                            .lte(Expr::col(TicketCategories::Quota)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TicketCategories::Table, TicketCategories::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(TicketCategories::Table)
                    .col(TicketCategories::EventId)
                    .name("idx_ticket_categories_event_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketCategories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TicketCategories {
    Table,
    Id,
    EventId,
    Price,
    Quota,
    Sold,
    Description,
    DateStart,
    DateEnd,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}
