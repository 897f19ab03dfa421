use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, RuntimeErr, SqlErr,
    TransactionTrait,
    sea_query::{Alias, Expr, OnConflict},
};
use uuid::Uuid;

use loket_domain::event::EventStatus;
use loket_domain::ticket::TicketStatus;
use loket_domain::user::{RegisterStatus, UserRole};
use loket_ticketing_schema::{
    cart_lines, events, ticket_categories, tickets, transaction_records, users,
};

use crate::domain::repository::{
    CartRepository, EventRepository, InventoryStore, InventoryTx, TicketRepository,
    TransactionRepository, UserRepository,
};
use crate::domain::types::{
    CartLine, Event, Organization, Ticket, TicketCategory, TransactionRecord, User,
};
use crate::error::TicketingServiceError;

// ── Error classification ─────────────────────────────────────────────────────

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// PostgreSQL SQLSTATE carried by a driver error, if any.
fn sqlstate(err: &DbErr) -> Option<String> {
    let (DbErr::Exec(RuntimeErr::SqlxError(e))
    | DbErr::Query(RuntimeErr::SqlxError(e))
    | DbErr::Conn(RuntimeErr::SqlxError(e))) = err
    else {
        return None;
    };
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

/// Serialization failures, deadlocks and unique-key races. The transaction
/// is already aborted; the caller may restart it from scratch.
fn is_contention(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || sqlstate(err)
            .is_some_and(|code| code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED)
}

/// Map errors raised inside a unit of work.
fn tx_error(context: &'static str) -> impl FnOnce(DbErr) -> TicketingServiceError {
    move |err| {
        if is_contention(&err) {
            tracing::debug!(error = %err, context, "store contention");
            TicketingServiceError::Conflict
        } else {
            anyhow::Error::new(err).context(context).into()
        }
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, TicketingServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, TicketingServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), TicketingServiceError> {
        let organization = user.organization.clone().unwrap_or_default();
        let result = users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            profile_pic: Set(user.profile_pic.clone()),
            organization: Set(organization.name),
            organization_type: Set(organization.kind),
            organization_description: Set(organization.description),
            identity_number: Set(organization.identity_number),
            register_status: Set(user.register_status.as_str().to_owned()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(TicketingServiceError::UserAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        profile_pic: Option<&str>,
    ) -> Result<Option<User>, TicketingServiceError> {
        let mut update = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id));
        if let Some(name) = name {
            update = update.col_expr(users::Column::Name, Expr::value(name));
        }
        if let Some(profile_pic) = profile_pic {
            update = update.col_expr(users::Column::ProfilePic, Expr::value(profile_pic));
        }
        let result = update.exec(&self.db).await.context("update user profile")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<User>, TicketingServiceError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn set_register_status(
        &self,
        id: Uuid,
        status: RegisterStatus,
    ) -> Result<bool, TicketingServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::RegisterStatus, Expr::value(status.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set user register status")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, TicketingServiceError> {
    let organization = Organization {
        name: model.organization,
        kind: model.organization_type,
        description: model.organization_description,
        identity_number: model.identity_number,
    };
    Ok(User {
        id: model.id,
        username: model.username,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role: model.role.parse::<UserRole>().context("decode user role")?,
        profile_pic: model.profile_pic,
        organization: (organization != Organization::default()).then_some(organization),
        register_status: model
            .register_status
            .parse::<RegisterStatus>()
            .context("decode register status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Event repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEventRepository {
    pub db: DatabaseConnection,
}

impl EventRepository for DbEventRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, TicketingServiceError> {
        let model = events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find event by id")?;
        model.map(event_from_model).transpose()
    }

    async fn list_approved(&self) -> Result<Vec<Event>, TicketingServiceError> {
        let models = events::Entity::find()
            .filter(events::Column::Status.eq(EventStatus::Approved.as_str()))
            .order_by_asc(events::Column::DateStart)
            .all(&self.db)
            .await
            .context("list approved events")?;
        models.into_iter().map(event_from_model).collect()
    }

    async fn list_categories(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<TicketCategory>, TicketingServiceError> {
        let models = ticket_categories::Entity::find()
            .filter(ticket_categories::Column::EventId.eq(event_id))
            .order_by_asc(ticket_categories::Column::CreatedAt)
            .order_by_asc(ticket_categories::Column::Id)
            .all(&self.db)
            .await
            .context("list ticket categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_category(
        &self,
        id: Uuid,
    ) -> Result<Option<TicketCategory>, TicketingServiceError> {
        let model = ticket_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ticket category")?;
        Ok(model.map(category_from_model))
    }

    async fn create(
        &self,
        event: &Event,
        categories: &[TicketCategory],
    ) -> Result<(), TicketingServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let event = event.clone();
                let categories = categories.to_vec();
                Box::pin(async move {
                    event_to_active_model(&event).insert(txn).await?;
                    for category in &categories {
                        category_to_active_model(category).insert(txn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("create event")?;
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), TicketingServiceError> {
        event_to_active_model(event)
            .update(&self.db)
            .await
            .context("update event")?;
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: EventStatus,
    ) -> Result<bool, TicketingServiceError> {
        let result = events::Entity::update_many()
            .col_expr(events::Column::Status, Expr::value(status.as_str()))
            .col_expr(events::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(events::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set event status")?;
        Ok(result.rows_affected > 0)
    }

    async fn add_category(&self, category: &TicketCategory) -> Result<(), TicketingServiceError> {
        let result = category_to_active_model(category).insert(&self.db).await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                Err(TicketingServiceError::EventNotFound)
            }
            Err(e) => Err(anyhow::Error::new(e).context("add ticket category").into()),
        }
    }

    async fn delete_unsold(&self, id: Uuid) -> Result<bool, TicketingServiceError> {
        let txn = self.db.begin().await.context("begin delete event")?;
        // Lock first so a concurrent checkout cannot sell in between.
        let categories = ticket_categories::Entity::find()
            .filter(ticket_categories::Column::EventId.eq(id))
            .order_by_asc(ticket_categories::Column::Id)
            .lock_exclusive()
            .all(&txn)
            .await
            .context("lock event categories")?;
        if categories.iter().any(|c| c.sold > 0) {
            return Err(TicketingServiceError::EventHasSales);
        }
        let result = events::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete event")?;
        txn.commit().await.context("commit delete event")?;
        Ok(result.rows_affected > 0)
    }
}

fn event_from_model(model: events::Model) -> Result<Event, TicketingServiceError> {
    Ok(Event {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        status: model
            .status
            .parse::<EventStatus>()
            .context("decode event status")?,
        date_start: model.date_start,
        date_end: model.date_end,
        location: model.location,
        description: model.description,
        image: model.image,
        flyer: model.flyer,
        category: model.category,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn event_to_active_model(event: &Event) -> events::ActiveModel {
    events::ActiveModel {
        id: Set(event.id),
        owner_id: Set(event.owner_id),
        name: Set(event.name.clone()),
        status: Set(event.status.as_str().to_owned()),
        date_start: Set(event.date_start),
        date_end: Set(event.date_end),
        location: Set(event.location.clone()),
        description: Set(event.description.clone()),
        image: Set(event.image.clone()),
        flyer: Set(event.flyer.clone()),
        category: Set(event.category.clone()),
        created_at: Set(event.created_at),
        updated_at: Set(event.updated_at),
    }
}

fn category_from_model(model: ticket_categories::Model) -> TicketCategory {
    TicketCategory {
        id: model.id,
        event_id: model.event_id,
        price: model.price,
        quota: model.quota,
        sold: model.sold,
        description: model.description,
        date_start: model.date_start,
        date_end: model.date_end,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn category_to_active_model(category: &TicketCategory) -> ticket_categories::ActiveModel {
    ticket_categories::ActiveModel {
        id: Set(category.id),
        event_id: Set(category.event_id),
        price: Set(category.price),
        quota: Set(category.quota),
        sold: Set(category.sold),
        description: Set(category.description.clone()),
        date_start: Set(category.date_start),
        date_end: Set(category.date_end),
        created_at: Set(category.created_at),
        updated_at: Set(category.updated_at),
    }
}

// ── Cart repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn list(&self, owner: Uuid) -> Result<Vec<CartLine>, TicketingServiceError> {
        let models = cart_lines::Entity::find()
            .filter(cart_lines::Column::UserId.eq(owner))
            .order_by_asc(cart_lines::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list cart lines")?;
        Ok(models.into_iter().map(cart_line_from_model).collect())
    }

    async fn add(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<(), TicketingServiceError> {
        let now = Utc::now();
        let line = cart_lines::ActiveModel {
            user_id: Set(owner),
            ticket_category_id: Set(ticket_category_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = cart_lines::Entity::insert(line)
            .on_conflict(
                OnConflict::columns([
                    cart_lines::Column::UserId,
                    cart_lines::Column::TicketCategoryId,
                ])
                .value(
                    cart_lines::Column::Quantity,
                    Expr::col((cart_lines::Entity, cart_lines::Column::Quantity)).add(
                        Expr::col((Alias::new("excluded"), cart_lines::Column::Quantity)),
                    ),
                )
                .update_column(cart_lines::Column::UpdatedAt)
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;
        match result {
            Ok(_) => Ok(()),
            // The category vanished between the lookup and the insert.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                Err(TicketingServiceError::CategoryNotFound)
            }
            Err(e) if sqlstate(&e).as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) => {
                Err(TicketingServiceError::InvalidQuantity)
            }
            Err(e) => Err(anyhow::Error::new(e).context("upsert cart line").into()),
        }
    }

    async fn set_quantity(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<bool, TicketingServiceError> {
        let result = cart_lines::Entity::update_many()
            .col_expr(cart_lines::Column::Quantity, Expr::value(quantity))
            .col_expr(cart_lines::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(cart_lines::Column::UserId.eq(owner))
            .filter(cart_lines::Column::TicketCategoryId.eq(ticket_category_id))
            .exec(&self.db)
            .await
            .context("set cart line quantity")?;
        Ok(result.rows_affected > 0)
    }

    async fn remove(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
    ) -> Result<bool, TicketingServiceError> {
        let result = cart_lines::Entity::delete_many()
            .filter(cart_lines::Column::UserId.eq(owner))
            .filter(cart_lines::Column::TicketCategoryId.eq(ticket_category_id))
            .exec(&self.db)
            .await
            .context("delete cart line")?;
        Ok(result.rows_affected > 0)
    }
}

fn cart_line_from_model(model: cart_lines::Model) -> CartLine {
    CartLine {
        user_id: model.user_id,
        ticket_category_id: model.ticket_category_id,
        quantity: model.quantity,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Ticket repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTicketRepository {
    pub db: DatabaseConnection,
}

impl TicketRepository for DbTicketRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, TicketingServiceError> {
        let model = tickets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ticket by id")?;
        model.map(ticket_from_model).transpose()
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Ticket>, TicketingServiceError> {
        let models = tickets::Entity::find()
            .filter(tickets::Column::OwnerId.eq(owner))
            .order_by_desc(tickets::Column::CreatedAt)
            .order_by_asc(tickets::Column::Id)
            .all(&self.db)
            .await
            .context("list tickets by owner")?;
        models.into_iter().map(ticket_from_model).collect()
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, TicketingServiceError> {
        let result = tickets::Entity::update_many()
            .col_expr(tickets::Column::Status, Expr::value(TicketStatus::Used.as_str()))
            .col_expr(tickets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(tickets::Column::Id.eq(id))
            .filter(tickets::Column::Status.eq(TicketStatus::Active.as_str()))
            .exec(&self.db)
            .await
            .context("mark ticket used")?;
        Ok(result.rows_affected == 1)
    }
}

fn ticket_from_model(model: tickets::Model) -> Result<Ticket, TicketingServiceError> {
    Ok(Ticket {
        id: model.id,
        event_id: model.event_id,
        ticket_category_id: model.ticket_category_id,
        owner_id: model.owner_id,
        code: model.code,
        status: model
            .status
            .parse::<TicketStatus>()
            .context("decode ticket status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn ticket_to_active_model(ticket: &Ticket) -> tickets::ActiveModel {
    tickets::ActiveModel {
        id: Set(ticket.id),
        event_id: Set(ticket.event_id),
        ticket_category_id: Set(ticket.ticket_category_id),
        owner_id: Set(ticket.owner_id),
        code: Set(ticket.code.clone()),
        status: Set(ticket.status.as_str().to_owned()),
        created_at: Set(ticket.created_at),
        updated_at: Set(ticket.updated_at),
    }
}

// ── Transaction repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTransactionRepository {
    pub db: DatabaseConnection,
}

impl TransactionRepository for DbTransactionRepository {
    async fn list_by_owner(
        &self,
        owner: Uuid,
    ) -> Result<Vec<TransactionRecord>, TicketingServiceError> {
        let models = transaction_records::Entity::find()
            .filter(transaction_records::Column::OwnerId.eq(owner))
            .order_by_desc(transaction_records::Column::TransactionTime)
            .all(&self.db)
            .await
            .context("list transactions by owner")?;
        Ok(models
            .into_iter()
            .map(|model| TransactionRecord {
                id: model.id,
                owner_id: model.owner_id,
                event_id: model.event_id,
                total_amount: model.total_amount,
                status: model.status,
                transaction_time: model.transaction_time,
            })
            .collect())
    }
}

// ── Inventory store ──────────────────────────────────────────────────────────

/// Opens a database transaction per unit of work.
#[derive(Clone)]
pub struct DbInventoryStore {
    pub db: DatabaseConnection,
}

impl InventoryStore for DbInventoryStore {
    type Tx = DbInventoryTx;

    async fn begin(&self) -> Result<DbInventoryTx, TicketingServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(tx_error("begin inventory transaction"))?;
        Ok(DbInventoryTx { txn })
    }
}

/// Rolled back by sea-orm when dropped without [`InventoryTx::commit`].
pub struct DbInventoryTx {
    txn: DatabaseTransaction,
}

impl InventoryTx for DbInventoryTx {
    async fn cart_lines(&mut self, owner: Uuid) -> Result<Vec<CartLine>, TicketingServiceError> {
        // FOR UPDATE: a concurrent checkout of the same cart waits here and
        // then sees the lines already gone.
        let models = cart_lines::Entity::find()
            .filter(cart_lines::Column::UserId.eq(owner))
            .order_by_asc(cart_lines::Column::TicketCategoryId)
            .lock_exclusive()
            .all(&self.txn)
            .await
            .map_err(tx_error("load cart lines"))?;
        Ok(models.into_iter().map(cart_line_from_model).collect())
    }

    async fn lock_categories(
        &mut self,
        ids: &[Uuid],
    ) -> Result<Vec<TicketCategory>, TicketingServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // SELECT ... ORDER BY id FOR UPDATE: rows are locked in id order.
        let models = ticket_categories::Entity::find()
            .filter(ticket_categories::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(ticket_categories::Column::Id)
            .lock_exclusive()
            .all(&self.txn)
            .await
            .map_err(tx_error("lock ticket categories"))?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn insert_tickets(&mut self, batch: &[Ticket]) -> Result<(), TicketingServiceError> {
        if batch.is_empty() {
            return Ok(());
        }
        tickets::Entity::insert_many(batch.iter().map(ticket_to_active_model))
            .exec_without_returning(&self.txn)
            .await
            .map_err(tx_error("insert tickets"))?;
        Ok(())
    }

    async fn increment_sold(
        &mut self,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<bool, TicketingServiceError> {
        use ticket_categories::Column;

        let result = ticket_categories::Entity::update_many()
            .col_expr(Column::Sold, Expr::col(Column::Sold).add(quantity))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(ticket_category_id))
            .filter(
                Expr::expr(Expr::col(Column::Sold).add(quantity)).lte(Expr::col(Column::Quota)),
            )
            .exec(&self.txn)
            .await
            .map_err(tx_error("increment sold"))?;
        Ok(result.rows_affected == 1)
    }

    async fn record_transaction(
        &mut self,
        record: &TransactionRecord,
    ) -> Result<(), TicketingServiceError> {
        transaction_records::ActiveModel {
            id: Set(record.id),
            owner_id: Set(record.owner_id),
            event_id: Set(record.event_id),
            total_amount: Set(record.total_amount),
            status: Set(record.status.clone()),
            transaction_time: Set(record.transaction_time),
        }
        .insert(&self.txn)
        .await
        .map_err(tx_error("record transaction"))?;
        Ok(())
    }

    async fn clear_cart(
        &mut self,
        owner: Uuid,
        lines: &[CartLine],
    ) -> Result<(), TicketingServiceError> {
        if lines.is_empty() {
            return Ok(());
        }
        let result = cart_lines::Entity::delete_many()
            .filter(cart_lines::Column::UserId.eq(owner))
            .filter(
                cart_lines::Column::TicketCategoryId
                    .is_in(lines.iter().map(|line| line.ticket_category_id)),
            )
            .exec(&self.txn)
            .await
            .map_err(tx_error("clear cart"))?;
        if result.rows_affected != lines.len() as u64 {
            tracing::debug!(
                %owner,
                expected = lines.len(),
                deleted = result.rows_affected,
                "cart changed under checkout"
            );
            return Err(TicketingServiceError::Conflict);
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), TicketingServiceError> {
        self.txn
            .commit()
            .await
            .map_err(tx_error("commit inventory transaction"))
    }
}
