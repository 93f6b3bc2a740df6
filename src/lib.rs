//! Pawcart
//!
//! Pawcart is a shopping cart and checkout engine for pet shop catalogs: variant filtering,
//! a persistent cart with stock checks, service-charge pricing and order submission.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod filters;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod variants;
