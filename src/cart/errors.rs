//! Cart Errors

use thiserror::Error;

use crate::{checkout::OrderApiError, storage::StorageError};

/// Errors surfaced to the shopper by cart operations.
///
/// None of these are fatal: the cart is left as it was before the failing call.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is more than the variant has in stock.
    #[error("Only {available} of {product_name} in stock; {requested} requested")]
    Stock {
        /// Name of the product being added
        product_name: String,
        /// Quantity the cart row would end up with
        requested: u32,
        /// Units in stock
        available: u32,
    },

    /// Checkout was attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The order API could not be reached or answered with an error.
    #[error(transparent)]
    Order(#[from] OrderApiError),

    /// The order API refused the order.
    #[error("{0}")]
    OrderRejected(String),

    /// The cart could not be written to durable storage.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
