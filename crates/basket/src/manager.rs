//! # Basket Manager
//!
//! The request-scoped service that owns "the current basket": an ordered
//! collection of lines, lazily persisted, bound to a session or a user.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     BasketManager Operations                        │
//! │                                                                     │
//! │  Storefront Action        Manager Call          Store Change        │
//! │  ─────────────────        ────────────          ────────────        │
//! │  Add to basket ─────────► add() ──────────────► merge or insert     │
//! │  Change quantity ───────► update() ───────────► overwrite row       │
//! │  Pick an option ────────► update_option() ────► merge options       │
//! │  Remove line ───────────► remove() ───────────► delete row          │
//! │  Empty basket ──────────► destroy() ──────────► delete basket       │
//! │  Log in ────────────────► load_user_basket() ─► rebind ownership    │
//! │                                                                     │
//! │  Every mutation ends in refresh(): reload rows, re-resolve          │
//! │  buyables, sync the session binding, drop cached totals.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One manager serves one request; operations take `&mut self` and run to
//! completion. Multi-step mutations are NOT wrapped in a transaction -
//! per-statement atomicity is all the store guarantees here, and
//! concurrent requests for the same basket are not coordinated.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use basket_core::buyable::Buyable;
use basket_core::error::CoreError;
use basket_core::identity::compute_identifier;
use basket_core::money::Money;
use basket_core::options::{validate_options, OptionMap, OptionValue};
use basket_core::tax::{line_tax, TaxConfig, TaxRate};
use basket_db::pool::Database;
use basket_db::repository::basket::BasketRepository;

use crate::catalog::BuyableSource;
use crate::config::BasketConfig;
use crate::error::{BasketError, BasketResult};
use crate::line::BasketLine;
use crate::session::SessionStore;
use crate::signing::SignedBasketRef;

// =============================================================================
// Basket Handle
// =============================================================================

/// The manager's view of the basket row.
///
/// `id` of `None` means the basket is transient: nothing is persisted and
/// no session binding exists. The first `add` turns it into a row.
#[derive(Debug, Clone, Copy, Default)]
struct BasketHandle {
    id: Option<i64>,
    user_id: Option<i64>,
}

// =============================================================================
// Totals Summary
// =============================================================================

/// Basket totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Basket Manager
// =============================================================================

/// The basket service.
///
/// Generic over the session store and the buyable source so hosts can
/// plug in their own; tests and the demo use the in-memory implementations.
pub struct BasketManager<S, C> {
    repo: BasketRepository,
    session: S,
    catalog: C,
    tax_config: TaxConfig,
    basket: BasketHandle,
    lines: Vec<BasketLine>,
    cached_subtotal: Option<Money>,
    cached_tax: Option<Money>,
}

impl<S, C> BasketManager<S, C>
where
    S: SessionStore,
    C: BuyableSource,
{
    // =========================================================================
    // Construction / Resolution
    // =========================================================================

    /// A manager over a fresh, empty, unsaved basket.
    pub async fn new(
        db: &Database,
        session: S,
        catalog: C,
        tax_config: TaxConfig,
    ) -> BasketResult<Self> {
        Self::build(db, session, catalog, tax_config, BasketHandle::default()).await
    }

    /// A manager over the basket with the given id, typically taken from
    /// the session binding. An unknown id yields a fresh unsaved basket.
    pub async fn from_basket_id(
        db: &Database,
        session: S,
        catalog: C,
        tax_config: TaxConfig,
        basket_id: i64,
    ) -> BasketResult<Self> {
        let handle = match db.baskets().find(basket_id).await? {
            Some(row) => BasketHandle {
                id: Some(row.id),
                user_id: row.user_id,
            },
            None => BasketHandle::default(),
        };

        Self::build(db, session, catalog, tax_config, handle).await
    }

    /// A manager over the basket owned by the given user. A user without a
    /// stored basket gets a fresh unsaved one that is already attributed to
    /// them, so the first `add` persists the ownership too.
    pub async fn from_user(
        db: &Database,
        session: S,
        catalog: C,
        tax_config: TaxConfig,
        user_id: i64,
    ) -> BasketResult<Self> {
        let handle = match db.baskets().find_by_user(user_id).await? {
            Some(row) => BasketHandle {
                id: Some(row.id),
                user_id: row.user_id,
            },
            None => BasketHandle {
                id: None,
                user_id: Some(user_id),
            },
        };

        Self::build(db, session, catalog, tax_config, handle).await
    }

    /// Resolves "the current basket" for a request.
    ///
    /// Resolution order:
    /// 1. the session binding, when present;
    /// 2. the authenticated user's stored basket;
    /// 3. a signed basket reference whose signature verifies;
    /// 4. a fresh, empty, unsaved basket.
    ///
    /// A missing or forged signed reference is not an error - it just
    /// falls through to the fresh basket.
    pub async fn resolve(
        db: &Database,
        session: S,
        catalog: C,
        config: &BasketConfig,
        user_id: Option<i64>,
        signed: Option<&SignedBasketRef>,
    ) -> BasketResult<Self> {
        if let Some(basket_id) = session.basket_id() {
            debug!(basket_id = %basket_id, "Resolving basket from session");
            return Self::from_basket_id(db, session, catalog, config.tax, basket_id).await;
        }

        if let Some(user_id) = user_id {
            debug!(user_id = %user_id, "Resolving basket from authenticated user");
            return Self::from_user(db, session, catalog, config.tax, user_id).await;
        }

        if let Some(reference) = signed {
            if reference.verify(&config.secret) {
                debug!(basket_id = %reference.id, "Resolving basket from signed reference");
                return Self::from_basket_id(db, session, catalog, config.tax, reference.id)
                    .await;
            }
        }

        debug!("Resolving to a fresh basket");
        Self::new(db, session, catalog, config.tax).await
    }

    async fn build(
        db: &Database,
        session: S,
        catalog: C,
        tax_config: TaxConfig,
        handle: BasketHandle,
    ) -> BasketResult<Self> {
        let mut manager = BasketManager {
            repo: db.baskets(),
            session,
            catalog,
            tax_config,
            basket: handle,
            lines: Vec::new(),
            cached_subtotal: None,
            cached_tax: None,
        };

        manager.refresh().await?;
        Ok(manager)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a buyable to the basket.
    ///
    /// Options are validated against the buyable's allow-list before
    /// anything else; invalid entries are dropped silently. If a line with
    /// the same identity fingerprint already exists, its quantity is
    /// incremented instead of inserting a second row. Otherwise the basket
    /// row is created on demand and the item appended.
    ///
    /// The buyable must be resolvable through this manager's catalog, since
    /// every mutation re-reads lines from the store.
    ///
    /// ## Errors
    /// * [`CoreError::InvalidQuantity`] when `quantity <= 0`
    pub async fn add(
        &mut self,
        buyable: &dyn Buyable,
        quantity: i64,
        options: OptionMap,
    ) -> BasketResult<()> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity { quantity }.into());
        }

        let validated = validate_options(&options, &buyable.allowed_options());
        let fingerprint =
            compute_identifier(buyable.buyable_type(), buyable.buyable_id(), &validated);

        // Duplicate add: bump the existing line instead of inserting.
        if let Some(line) = self
            .lines
            .iter()
            .find(|line| line.fingerprint() == fingerprint)
        {
            info!(
                item_id = %line.id(),
                quantity = %quantity,
                "Merging duplicate add into existing line"
            );
            let item_id = line.id();
            self.repo.increment_quantity(item_id, quantity).await?;
            return self.refresh().await;
        }

        let basket_id = match self.basket.id {
            Some(id) => id,
            None => {
                let row = self.repo.create(self.basket.user_id).await?;
                self.basket.id = Some(row.id);
                row.id
            }
        };

        self.repo
            .insert_item(
                basket_id,
                buyable.buyable_type(),
                buyable.buyable_id(),
                quantity,
                &validated,
            )
            .await?;

        self.refresh().await
    }

    /// Overwrites a line's quantity (no merge semantics).
    ///
    /// A non-positive quantity removes the line instead; an unknown item id
    /// is a silent no-op.
    pub async fn update(&mut self, item_id: i64, quantity: i64) -> BasketResult<()> {
        if quantity <= 0 {
            return self.remove(item_id).await;
        }

        if !self.lines.iter().any(|line| line.id() == item_id) {
            return Ok(());
        }

        self.repo.set_quantity(item_id, quantity).await?;
        self.refresh().await
    }

    /// Merges the given options into a line's existing options.
    ///
    /// Incoming entries are re-validated against the line's buyable and
    /// win over existing keys. The line's identity is not re-derived and no
    /// re-merge with a now-colliding line is attempted - each row keeps its
    /// own identity once created. Unknown item ids are a silent no-op.
    pub async fn update_options(
        &mut self,
        item_id: i64,
        options: OptionMap,
    ) -> BasketResult<()> {
        let Some(line) = self.lines.iter().find(|line| line.id() == item_id) else {
            return Ok(());
        };

        let validated = validate_options(&options, &line.buyable().allowed_options());
        let mut merged = line.options().clone();
        merged.extend(validated);

        self.repo.set_options(item_id, &merged).await?;
        self.refresh().await
    }

    /// Merges a single option into a line's existing options.
    pub async fn update_option(
        &mut self,
        item_id: i64,
        key: &str,
        value: impl Into<OptionValue>,
    ) -> BasketResult<()> {
        let mut options = OptionMap::new();
        options.insert(key.to_string(), value.into());
        self.update_options(item_id, options).await
    }

    /// Removes a line from the basket.
    ///
    /// Unknown item ids are a silent no-op. Removing the last line destroys
    /// the basket itself - an empty basket never persists.
    pub async fn remove(&mut self, item_id: i64) -> BasketResult<()> {
        if !self.lines.iter().any(|line| line.id() == item_id) {
            return Ok(());
        }

        self.repo.delete_item(item_id).await?;

        if self.lines.len() == 1 {
            return self.destroy().await;
        }

        self.refresh().await
    }

    /// Destroys the basket: deletes the row (items cascade), swaps in a
    /// fresh unsaved basket, clears cached totals and the session binding.
    pub async fn destroy(&mut self) -> BasketResult<()> {
        if let Some(id) = self.basket.id {
            info!(basket_id = %id, "Destroying basket");
            self.repo.delete(id).await?;
        }

        self.basket = BasketHandle::default();
        self.refresh().await
    }

    /// Reloads lines and their buyables from the store, syncs the session
    /// binding, and drops cached totals.
    pub async fn refresh(&mut self) -> BasketResult<()> {
        if let Some(basket_id) = self.basket.id {
            let rows = self.repo.items(basket_id).await?;

            let mut lines = Vec::with_capacity(rows.len());
            for row in rows {
                let buyable = self
                    .catalog
                    .find(&row.buyable_type, row.buyable_id)
                    .await
                    .ok_or_else(|| BasketError::BuyableNotFound {
                        buyable_type: row.buyable_type.clone(),
                        buyable_id: row.buyable_id,
                        item_id: row.id,
                    })?;
                lines.push(BasketLine::new(row, buyable));
            }

            self.lines = lines;
            self.session.remember_basket(basket_id);
        } else {
            self.lines.clear();
            self.session.forget_basket();
        }

        self.clear_cached();
        Ok(())
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Binds the current basket to a user at login time.
    ///
    /// * user has no stored basket → attach the current one and stop;
    /// * current basket is empty → discard it and load the stored one;
    /// * both have content → delete the user's other baskets and keep the
    ///   current one (overwrite; line items are not merged across baskets).
    pub async fn load_user_basket(&mut self, user_id: i64) -> BasketResult<()> {
        let Some(saved) = self.repo.find_by_user(user_id).await? else {
            return self.attach_to(user_id).await;
        };

        if self.lines.is_empty() {
            debug!(basket_id = %saved.id, user_id = %user_id, "Switching to the user's stored basket");
            self.basket = BasketHandle {
                id: Some(saved.id),
                user_id: saved.user_id,
            };
            return self.refresh().await;
        }

        // The current basket has items, so it is persisted; it wins over
        // whatever the user had stored.
        if let Some(keep_id) = self.basket.id {
            let removed = self
                .repo
                .delete_user_baskets_except(user_id, keep_id)
                .await?;
            info!(
                user_id = %user_id,
                removed = %removed,
                "Replaced stored baskets with the current one"
            );
        }

        self.attach_to(user_id).await
    }

    /// Marks the basket as owned by the given user.
    ///
    /// Persists the ownership only if the basket already exists - an empty
    /// transient basket is never force-created just to carry an owner.
    pub async fn attach_to(&mut self, user_id: i64) -> BasketResult<()> {
        self.basket.user_id = Some(user_id);

        if let Some(id) = self.basket.id {
            self.repo.set_owner(id, user_id).await?;
        }

        Ok(())
    }

    // =========================================================================
    // Queries & Totals
    // =========================================================================

    /// The basket contents.
    pub fn content(&self) -> &[BasketLine] {
        &self.lines
    }

    /// Total quantity across all lines.
    pub fn count(&self) -> i64 {
        self.lines.iter().map(BasketLine::quantity).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the basket holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The persisted basket id, if the basket has been saved.
    pub fn basket_id(&self) -> Option<i64> {
        self.basket.id
    }

    /// The owning user id, if the basket is attached to one.
    pub fn owner_id(&self) -> Option<i64> {
        self.basket.user_id
    }

    /// The session store this manager is bound to.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Sum of line subtotals. Memoized until the next mutation or refresh.
    pub fn subtotal(&mut self) -> Money {
        if let Some(cached) = self.cached_subtotal {
            return cached;
        }

        let subtotal: Money = self.lines.iter().map(BasketLine::subtotal).sum();
        self.cached_subtotal = Some(subtotal);
        subtotal
    }

    /// Sum of per-line tax. Memoized until the next mutation or refresh.
    ///
    /// `rate_override` takes precedence over both the configured flat rate
    /// and any buyable-declared rate when non-zero.
    pub fn tax(&mut self, rate_override: Option<TaxRate>) -> Money {
        if let Some(cached) = self.cached_tax {
            return cached;
        }

        let config = self.tax_config;
        let tax: Money = self
            .lines
            .iter()
            .map(|line| {
                line_tax(
                    &config,
                    rate_override,
                    line.subtotal(),
                    line.buyable().tax_rate(),
                )
            })
            .sum();
        self.cached_tax = Some(tax);
        tax
    }

    /// Totals summary (subtotal, tax at the configured rate, grand total).
    pub fn totals(&mut self) -> BasketTotals {
        let subtotal = self.subtotal();
        let tax = self.tax(None);

        BasketTotals {
            line_count: self.line_count(),
            total_quantity: self.count(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    fn clear_cached(&mut self) {
        self.cached_subtotal = None;
        self.cached_tax = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
