//! # Basket Repository
//!
//! Database operations for baskets and their line items.
//!
//! Two things are deliberately NOT here:
//! - merge-or-insert logic (the facade decides whether an add becomes an
//!   increment or a new row; this layer only executes the outcome)
//! - transactions (each statement is atomic on its own; multi-step
//!   operations are sequenced by the caller)
//!
//! Basket deletion removes child items explicitly before the basket row,
//! so referential integrity holds even on a store without enforced
//! foreign keys.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::records::{BasketItemRow, BasketRow};
use basket_core::options::OptionMap;

/// Repository for basket database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BasketRepository::new(pool);
///
/// let basket = repo.create(None).await?;
/// let item = repo.insert_item(basket.id, "product", 7, 2, &options).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BasketRepository {
    pool: SqlitePool,
}

impl BasketRepository {
    /// Creates a new BasketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BasketRepository { pool }
    }

    // =========================================================================
    // Baskets
    // =========================================================================

    /// Gets a basket by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(BasketRow))` - Basket found
    /// * `Ok(None)` - Basket not found
    pub async fn find(&self, id: i64) -> DbResult<Option<BasketRow>> {
        let basket = sqlx::query_as::<_, BasketRow>(
            r#"
            SELECT id, user_id, created_at, updated_at
            FROM baskets
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(basket)
    }

    /// Gets the basket owned by the given user, if any.
    ///
    /// A user normally owns at most one basket; if older rows linger, the
    /// most recent one wins.
    pub async fn find_by_user(&self, user_id: i64) -> DbResult<Option<BasketRow>> {
        let basket = sqlx::query_as::<_, BasketRow>(
            r#"
            SELECT id, user_id, created_at, updated_at
            FROM baskets
            WHERE user_id = ?1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(basket)
    }

    /// Inserts a new basket row, optionally already owned by a user.
    pub async fn create(&self, user_id: Option<i64>) -> DbResult<BasketRow> {
        debug!(user_id = ?user_id, "Creating basket");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO baskets (user_id, created_at, updated_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(BasketRow {
            id: result.last_insert_rowid(),
            user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Assigns a basket to a user.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Basket doesn't exist
    pub async fn set_owner(&self, id: i64, user_id: i64) -> DbResult<()> {
        debug!(id = %id, user_id = %user_id, "Attaching basket to user");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE baskets
            SET user_id = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Basket", id));
        }

        Ok(())
    }

    /// Deletes a basket and all of its items.
    ///
    /// Items are removed first so the delete cascades even where the
    /// foreign key is not enforced. Deleting an absent basket is a no-op.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting basket");

        sqlx::query("DELETE FROM basket_items WHERE basket_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM baskets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes every basket owned by `user_id` except `keep_id`, items
    /// included. Returns the number of baskets removed.
    pub async fn delete_user_baskets_except(
        &self,
        user_id: i64,
        keep_id: i64,
    ) -> DbResult<u64> {
        debug!(user_id = %user_id, keep_id = %keep_id, "Deleting user's other baskets");

        sqlx::query(
            r#"
            DELETE FROM basket_items
            WHERE basket_id IN (
                SELECT id FROM baskets WHERE user_id = ?1 AND id <> ?2
            )
            "#,
        )
        .bind(user_id)
        .bind(keep_id)
        .execute(&self.pool)
        .await?;

        let result = sqlx::query("DELETE FROM baskets WHERE user_id = ?1 AND id <> ?2")
            .bind(user_id)
            .bind(keep_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Lists a basket's items in insertion order.
    pub async fn items(&self, basket_id: i64) -> DbResult<Vec<BasketItemRow>> {
        let items = sqlx::query_as::<_, BasketItemRow>(
            r#"
            SELECT id, basket_id, buyable_id, buyable_type, quantity, options,
                   created_at, updated_at
            FROM basket_items
            WHERE basket_id = ?1
            ORDER BY id
            "#,
        )
        .bind(basket_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new line item.
    pub async fn insert_item(
        &self,
        basket_id: i64,
        buyable_type: &str,
        buyable_id: i64,
        quantity: i64,
        options: &OptionMap,
    ) -> DbResult<BasketItemRow> {
        debug!(
            basket_id = %basket_id,
            buyable_type = %buyable_type,
            buyable_id = %buyable_id,
            quantity = %quantity,
            "Inserting basket item"
        );

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO basket_items
                (basket_id, buyable_id, buyable_type, quantity, options,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(basket_id)
        .bind(buyable_id)
        .bind(buyable_type)
        .bind(quantity)
        .bind(Json(options.clone()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(BasketItemRow {
            id: result.last_insert_rowid(),
            basket_id,
            buyable_id,
            buyable_type: buyable_type.to_string(),
            quantity,
            options: Json(options.clone()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Adds `by` to an item's quantity (the duplicate-add merge path).
    pub async fn increment_quantity(&self, item_id: i64, by: i64) -> DbResult<()> {
        debug!(item_id = %item_id, by = %by, "Incrementing item quantity");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE basket_items
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .bind(by)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("BasketItem", item_id));
        }

        Ok(())
    }

    /// Overwrites an item's quantity.
    pub async fn set_quantity(&self, item_id: i64, quantity: i64) -> DbResult<()> {
        debug!(item_id = %item_id, quantity = %quantity, "Updating item quantity");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE basket_items
            SET quantity = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("BasketItem", item_id));
        }

        Ok(())
    }

    /// Overwrites an item's option mapping.
    pub async fn set_options(&self, item_id: i64, options: &OptionMap) -> DbResult<()> {
        debug!(item_id = %item_id, "Updating item options");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE basket_items
            SET options = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .bind(Json(options.clone()))
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("BasketItem", item_id));
        }

        Ok(())
    }

    /// Deletes a line item. Deleting an absent item is a no-op.
    pub async fn delete_item(&self, item_id: i64) -> DbResult<()> {
        debug!(item_id = %item_id, "Deleting basket item");

        sqlx::query("DELETE FROM basket_items WHERE id = ?1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Counts the items in a basket (for diagnostics).
    pub async fn count_items(&self, basket_id: i64) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM basket_items WHERE basket_id = ?1")
                .bind(basket_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn size_m() -> OptionMap {
        let mut options = OptionMap::new();
        options.insert("size".to_string(), "M".into());
        options
    }

    #[tokio::test]
    async fn test_create_and_find_basket() {
        let db = test_db().await;
        let repo = db.baskets();

        let basket = repo.create(None).await.unwrap();
        assert!(basket.user_id.is_none());

        let found = repo.find(basket.id).await.unwrap().unwrap();
        assert_eq!(found.id, basket.id);

        assert!(repo.find(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let db = test_db().await;
        let repo = db.baskets();

        assert!(repo.find_by_user(42).await.unwrap().is_none());

        let basket = repo.create(Some(42)).await.unwrap();
        let found = repo.find_by_user(42).await.unwrap().unwrap();
        assert_eq!(found.id, basket.id);
        assert_eq!(found.user_id, Some(42));
    }

    #[tokio::test]
    async fn test_set_owner() {
        let db = test_db().await;
        let repo = db.baskets();

        let basket = repo.create(None).await.unwrap();
        repo.set_owner(basket.id, 7).await.unwrap();

        let found = repo.find(basket.id).await.unwrap().unwrap();
        assert_eq!(found.user_id, Some(7));

        assert!(matches!(
            repo.set_owner(9999, 7).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_and_list_items() {
        let db = test_db().await;
        let repo = db.baskets();

        let basket = repo.create(None).await.unwrap();
        let first = repo
            .insert_item(basket.id, "product", 1, 2, &size_m())
            .await
            .unwrap();
        let second = repo
            .insert_item(basket.id, "product", 2, 1, &OptionMap::new())
            .await
            .unwrap();

        let items = repo.items(basket.id).await.unwrap();
        assert_eq!(items.len(), 2);
        // Insertion order is preserved
        assert_eq!(items[0].id, first.id);
        assert_eq!(items[1].id, second.id);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_options_round_trip_through_json_column() {
        let db = test_db().await;
        let repo = db.baskets();

        let basket = repo.create(None).await.unwrap();
        let mut options = size_m();
        options.insert("gift-wrap".to_string(), true.into());
        options.insert("count".to_string(), 3i64.into());

        let item = repo
            .insert_item(basket.id, "product", 1, 1, &options)
            .await
            .unwrap();

        let items = repo.items(basket.id).await.unwrap();
        assert_eq!(items[0].id, item.id);
        assert_eq!(items[0].options.0, options);
    }

    #[tokio::test]
    async fn test_increment_and_set_quantity() {
        let db = test_db().await;
        let repo = db.baskets();

        let basket = repo.create(None).await.unwrap();
        let item = repo
            .insert_item(basket.id, "product", 1, 2, &OptionMap::new())
            .await
            .unwrap();

        repo.increment_quantity(item.id, 3).await.unwrap();
        assert_eq!(repo.items(basket.id).await.unwrap()[0].quantity, 5);

        repo.set_quantity(item.id, 1).await.unwrap();
        assert_eq!(repo.items(basket.id).await.unwrap()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_delete_basket_cascades_to_items() {
        let db = test_db().await;
        let repo = db.baskets();

        let basket = repo.create(None).await.unwrap();
        repo.insert_item(basket.id, "product", 1, 1, &OptionMap::new())
            .await
            .unwrap();
        repo.insert_item(basket.id, "product", 2, 1, &OptionMap::new())
            .await
            .unwrap();

        repo.delete(basket.id).await.unwrap();

        assert!(repo.find(basket.id).await.unwrap().is_none());
        assert_eq!(repo.count_items(basket.id).await.unwrap(), 0);

        // Deleting again is a no-op, not an error
        repo.delete(basket.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_user_baskets_except() {
        let db = test_db().await;
        let repo = db.baskets();

        let old_one = repo.create(Some(42)).await.unwrap();
        let old_two = repo.create(Some(42)).await.unwrap();
        repo.insert_item(old_one.id, "product", 1, 1, &OptionMap::new())
            .await
            .unwrap();
        let keep = repo.create(None).await.unwrap();

        let removed = repo.delete_user_baskets_except(42, keep.id).await.unwrap();
        assert_eq!(removed, 2);

        assert!(repo.find(old_one.id).await.unwrap().is_none());
        assert!(repo.find(old_two.id).await.unwrap().is_none());
        assert_eq!(repo.count_items(old_one.id).await.unwrap(), 0);
        assert!(repo.find(keep.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_item_is_idempotent() {
        let db = test_db().await;
        let repo = db.baskets();

        let basket = repo.create(None).await.unwrap();
        let item = repo
            .insert_item(basket.id, "product", 1, 1, &OptionMap::new())
            .await
            .unwrap();

        repo.delete_item(item.id).await.unwrap();
        repo.delete_item(item.id).await.unwrap();

        assert!(repo.items(basket.id).await.unwrap().is_empty());
    }
}
