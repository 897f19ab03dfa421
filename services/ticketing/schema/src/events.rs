use sea_orm::entity::prelude::*;

/// Event published by an organizer. `status` is `pending` until an admin
/// verifies it, then `approved`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub status: String,
    pub date_start: chrono::DateTime<chrono::Utc>,
    pub date_end: chrono::DateTime<chrono::Utc>,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    pub flyer: Option<String>,
    pub category: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::ticket_categories::Entity")]
    TicketCategories,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::ticket_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
