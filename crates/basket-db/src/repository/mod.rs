//! # Repository Module
//!
//! Database repository for baskets and their items.
//!
//! The repository pattern keeps all SQL in one place behind a typed API:
//! the facade's `BasketManager` never sees a query string, and the SQL
//! never sees a business rule (merge detection, tax, option validation all
//! happen above this layer).
//!
//! ## Available Repositories
//!
//! - [`basket::BasketRepository`] - basket and line-item persistence

pub mod basket;
