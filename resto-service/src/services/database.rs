//! PostgreSQL data access for the restaurant backend.
//!
//! One method per query; multi-row composites run inside a transaction.
//! Soft-deleted rows are excluded everywhere except the explicitly
//! any-state lookups used by restore/hard-delete paths.

use service_core::error::AppError;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::models::{
    Audit, DiningTable, Invoice, MenuItem, Order, OrderItem, OrderStatus, OrderWithItems, Payment,
    PaymentMethod, Preparation, Role, User,
};

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    // ==================== User Operations ====================

    /// Find an active user by ID.
    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1 AND deleted_at IS NULL")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Find a user by ID regardless of soft-delete state.
    pub async fn find_user_by_id_any(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Find an active user by e-mail, case-insensitively.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Whether any row (active or deleted) holds this e-mail.
    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email.trim())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(exists)
    }

    /// Insert a new user.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// List all active users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE deleted_at IS NULL ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Soft-delete a user. Returns the updated row, or None when no
    /// active row matched.
    pub async fn soft_delete_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET deleted_at = now(), updated_at = now()
            WHERE user_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Clear a user's deleted_at marker.
    pub async fn restore_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET deleted_at = NULL, updated_at = now()
            WHERE user_id = $1 AND deleted_at IS NOT NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Physically remove a user; owned profiles go with it via ON DELETE
    /// CASCADE. Irreversible.
    pub async fn hard_delete_user(&self, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== Role Profile Operations ====================

    /// Role set derived from the user's profile rows.
    pub async fn find_roles_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, AppError> {
        let (cashier, cook, waiter, admin): (bool, bool, bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM cashier_profiles WHERE user_id = $1),
                EXISTS(SELECT 1 FROM cook_profiles WHERE user_id = $1),
                EXISTS(SELECT 1 FROM waiter_profiles WHERE user_id = $1),
                EXISTS(SELECT 1 FROM admin_profiles WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        let mut roles = Vec::new();
        if cashier {
            roles.push(Role::Cashier);
        }
        if cook {
            roles.push(Role::Cook);
        }
        if waiter {
            roles.push(Role::Waiter);
        }
        if admin {
            roles.push(Role::Admin);
        }
        Ok(roles)
    }

    /// Whether the user already holds the given profile variant,
    /// regardless of soft-delete state.
    pub async fn has_role_profile(&self, user_id: Uuid, role: Role) -> Result<bool, AppError> {
        // profile_table() is a closed set of identifiers, not user input.
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = $1)",
            role.profile_table()
        );
        let (exists,): (bool,) = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(exists)
    }

    /// Whether the user holds the given profile variant AND is still an
    /// active (non-deleted) account. Soft-deleting a user keeps the
    /// profile rows, so referencing checks must join back to users.
    pub async fn has_active_role_profile(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} p \
             JOIN users u ON u.user_id = p.user_id \
             WHERE p.user_id = $1 AND u.deleted_at IS NULL)",
            role.profile_table()
        );
        let (exists,): (bool,) = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(exists)
    }

    /// Attach a profile variant to a user. The primary key makes a
    /// concurrent duplicate insert fail instead of silently no-opping.
    pub async fn insert_role_profile(&self, user_id: Uuid, role: Role) -> Result<(), AppError> {
        let sql = format!("INSERT INTO {} (user_id) VALUES ($1)", role.profile_table());
        sqlx::query(&sql)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Table Operations ====================

    /// Insert a new dining table.
    pub async fn insert_table(&self, table: &DiningTable) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO dining_tables
                (table_id, table_number, waiter_id, status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(table.table_id)
        .bind(table.table_number)
        .bind(table.waiter_id)
        .bind(&table.status)
        .bind(&table.notes)
        .bind(table.created_at)
        .bind(table.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Find an active table by ID.
    pub async fn find_table_by_id(&self, table_id: Uuid) -> Result<Option<DiningTable>, AppError> {
        sqlx::query_as::<_, DiningTable>(
            "SELECT * FROM dining_tables WHERE table_id = $1 AND deleted_at IS NULL",
        )
        .bind(table_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Whether an active table already uses this number.
    pub async fn table_number_taken(&self, number: i32) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM dining_tables WHERE table_number = $1 AND deleted_at IS NULL)",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(exists)
    }

    /// List all active tables.
    pub async fn list_tables(&self) -> Result<Vec<DiningTable>, AppError> {
        sqlx::query_as::<_, DiningTable>(
            "SELECT * FROM dining_tables WHERE deleted_at IS NULL ORDER BY table_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// List active tables assigned to a waiter.
    pub async fn list_tables_by_waiter(
        &self,
        waiter_id: Uuid,
    ) -> Result<Vec<DiningTable>, AppError> {
        sqlx::query_as::<_, DiningTable>(
            r#"
            SELECT * FROM dining_tables
            WHERE waiter_id = $1 AND deleted_at IS NULL
            ORDER BY table_number
            "#,
        )
        .bind(waiter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Apply an updated table row (number, waiter, status, notes).
    pub async fn update_table(&self, table: &DiningTable) -> Result<DiningTable, AppError> {
        sqlx::query_as::<_, DiningTable>(
            r#"
            UPDATE dining_tables
            SET table_number = $2, waiter_id = $3, status = $4, notes = $5, updated_at = now()
            WHERE table_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(table.table_id)
        .bind(table.table_number)
        .bind(table.waiter_id)
        .bind(&table.status)
        .bind(&table.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Soft-delete a table.
    pub async fn soft_delete_table(&self, table_id: Uuid) -> Result<Option<DiningTable>, AppError> {
        sqlx::query_as::<_, DiningTable>(
            r#"
            UPDATE dining_tables SET deleted_at = now(), updated_at = now()
            WHERE table_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(table_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Menu Operations ====================

    /// Insert a new menu item.
    pub async fn insert_menu_item(&self, item: &MenuItem) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO menu_items
                (menu_item_id, name, description, price, available, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(item.menu_item_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.available)
        .bind(&item.category)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Bulk-insert menu items in one transaction.
    pub async fn seed_menu_items(&self, items: &[MenuItem]) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO menu_items
                    (menu_item_id, name, description, price, available, category, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(item.menu_item_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(item.available)
            .bind(&item.category)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Find an active menu item by ID.
    pub async fn find_menu_item_by_id(
        &self,
        menu_item_id: Uuid,
    ) -> Result<Option<MenuItem>, AppError> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE menu_item_id = $1 AND deleted_at IS NULL",
        )
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Resolve a batch of menu item IDs among active rows.
    pub async fn find_menu_items_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MenuItem>, AppError> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE menu_item_id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// List all active menu items.
    pub async fn list_menu_items(&self) -> Result<Vec<MenuItem>, AppError> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Apply an updated menu item row.
    pub async fn update_menu_item(&self, item: &MenuItem) -> Result<MenuItem, AppError> {
        sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_items
            SET name = $2, description = $3, price = $4, available = $5, category = $6,
                updated_at = now()
            WHERE menu_item_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(item.menu_item_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.available)
        .bind(&item.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Soft-delete a menu item.
    pub async fn soft_delete_menu_item(
        &self,
        menu_item_id: Uuid,
    ) -> Result<Option<MenuItem>, AppError> {
        sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_items SET deleted_at = now(), updated_at = now()
            WHERE menu_item_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Soft-delete every active menu item. Returns the number of rows
    /// marked.
    pub async fn wipe_menu(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE menu_items SET deleted_at = now(), updated_at = now() WHERE deleted_at IS NULL",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(result.rows_affected())
    }

    // ==================== Order Operations ====================

    /// Insert an order together with its line items, atomically.
    pub async fn insert_order_with_items(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        sqlx::query(
            r#"
            INSERT INTO orders
                (order_id, table_id, waiter_id, status, total, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.order_id)
        .bind(order.table_id)
        .bind(order.waiter_id)
        .bind(&order.status)
        .bind(order.total)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items
                    (order_item_id, order_id, menu_item_id, quantity, unit_price, notes, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.order_item_id)
            .bind(item.order_id)
            .bind(item.menu_item_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(&item.notes)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Find an active order by ID.
    pub async fn find_order_by_id(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE order_id = $1 AND deleted_at IS NULL",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Line items of one order.
    pub async fn find_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Find an order item by ID.
    pub async fn find_order_item_by_id(
        &self,
        order_item_id: Uuid,
    ) -> Result<Option<OrderItem>, AppError> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_item_id = $1")
            .bind(order_item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// List all active orders with items eagerly loaded.
    pub async fn list_orders(&self) -> Result<Vec<OrderWithItems>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE deleted_at IS NULL ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        self.attach_items(orders).await
    }

    /// List active orders for one table with items eagerly loaded.
    pub async fn list_orders_by_table(
        &self,
        table_id: Uuid,
    ) -> Result<Vec<OrderWithItems>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE table_id = $1 AND deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(table_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        self.attach_items(orders).await
    }

    /// Eager-load items for a set of orders with one query.
    async fn attach_items(&self, orders: Vec<Order>) -> Result<Vec<OrderWithItems>, AppError> {
        let ids: Vec<Uuid> = orders.iter().map(|o| o.order_id).collect();
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY created_at",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        let mut by_order: std::collections::HashMap<Uuid, Vec<OrderItem>> =
            std::collections::HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.order_id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }

    /// Persist a status move that has already been validated against the
    /// state machine.
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, AppError> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET status = $2, updated_at = now()
            WHERE order_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(new_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Soft-delete an order. Items and payments stay addressable.
    pub async fn soft_delete_order(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET deleted_at = now(), updated_at = now()
            WHERE order_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Preparation Operations ====================

    /// Insert a new preparation record.
    pub async fn insert_preparation(&self, prep: &Preparation) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO preparations
                (prep_id, order_item_id, cook_id, status, cancelled, cancellation_reason,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(prep.prep_id)
        .bind(prep.order_item_id)
        .bind(prep.cook_id)
        .bind(&prep.status)
        .bind(prep.cancelled)
        .bind(&prep.cancellation_reason)
        .bind(prep.created_at)
        .bind(prep.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Find a preparation by ID.
    pub async fn find_preparation_by_id(
        &self,
        prep_id: Uuid,
    ) -> Result<Option<Preparation>, AppError> {
        sqlx::query_as::<_, Preparation>("SELECT * FROM preparations WHERE prep_id = $1")
            .bind(prep_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Preparations attached to one order item.
    pub async fn list_preparations_for_item(
        &self,
        order_item_id: Uuid,
    ) -> Result<Vec<Preparation>, AppError> {
        sqlx::query_as::<_, Preparation>(
            "SELECT * FROM preparations WHERE order_item_id = $1 ORDER BY created_at",
        )
        .bind(order_item_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Persist a validated preparation status move.
    pub async fn update_preparation_status(
        &self,
        prep_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Preparation, AppError> {
        sqlx::query_as::<_, Preparation>(
            r#"
            UPDATE preparations SET status = $2, updated_at = now()
            WHERE prep_id = $1
            RETURNING *
            "#,
        )
        .bind(prep_id)
        .bind(new_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Mark a preparation cancelled with its reason.
    pub async fn cancel_preparation(
        &self,
        prep_id: Uuid,
        reason: &str,
    ) -> Result<Preparation, AppError> {
        sqlx::query_as::<_, Preparation>(
            r#"
            UPDATE preparations
            SET cancelled = TRUE, cancellation_reason = $2, status = $3, updated_at = now()
            WHERE prep_id = $1
            RETURNING *
            "#,
        )
        .bind(prep_id)
        .bind(reason)
        .bind(OrderStatus::Canceled.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Payment & Invoice Operations ====================

    /// Insert a payment record.
    pub async fn insert_payment(&self, payment: &Payment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO payments
                (payment_id, order_id, cashier_id, method_id, amount, payment_time, notes,
                 discounts_applied, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(payment.payment_id)
        .bind(payment.order_id)
        .bind(payment.cashier_id)
        .bind(payment.method_id)
        .bind(payment.amount)
        .bind(payment.payment_time)
        .bind(&payment.notes)
        .bind(payment.discounts_applied)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Payments recorded against one order.
    pub async fn list_payments_by_order(&self, order_id: Uuid) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE order_id = $1 ORDER BY payment_time",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Find a payment method by ID.
    pub async fn find_payment_method(
        &self,
        method_id: Uuid,
    ) -> Result<Option<PaymentMethod>, AppError> {
        sqlx::query_as::<_, PaymentMethod>("SELECT * FROM payment_methods WHERE method_id = $1")
            .bind(method_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// List all payment methods.
    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError> {
        sqlx::query_as::<_, PaymentMethod>("SELECT * FROM payment_methods ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Insert an invoice.
    pub async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO invoices
                (invoice_id, order_id, issuer_id, invoice_number, issue_date, total_amount,
                 details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invoice.invoice_id)
        .bind(invoice.order_id)
        .bind(invoice.issuer_id)
        .bind(&invoice.invoice_number)
        .bind(invoice.issue_date)
        .bind(invoice.total_amount)
        .bind(&invoice.details)
        .bind(invoice.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Find the invoice linked to an order, if any.
    pub async fn find_invoice_by_order(&self, order_id: Uuid) -> Result<Option<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Audit Operations ====================

    /// Append an audit record.
    pub async fn insert_audit(&self, audit: &Audit) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audits
                (audit_id, admin_id, action, description, occurred_at, affected_entity,
                 entity_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(audit.audit_id)
        .bind(audit.admin_id)
        .bind(&audit.action)
        .bind(&audit.description)
        .bind(audit.occurred_at)
        .bind(&audit.affected_entity)
        .bind(audit.entity_id)
        .bind(audit.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// List active audit records, newest first.
    pub async fn list_audits(&self) -> Result<Vec<Audit>, AppError> {
        sqlx::query_as::<_, Audit>(
            "SELECT * FROM audits WHERE deleted_at IS NULL ORDER BY occurred_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Soft-delete an audit record.
    pub async fn soft_delete_audit(&self, audit_id: Uuid) -> Result<Option<Audit>, AppError> {
        sqlx::query_as::<_, Audit>(
            r#"
            UPDATE audits SET deleted_at = now()
            WHERE audit_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(audit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }
}
