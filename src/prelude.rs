//! Pawcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CartError, CartLineItem, CartStore, CartVisibility, DEFAULT_CART_KEY,
        line_item::LineItemError, parse_quantity,
    },
    catalog::{Catalog, CatalogError},
    checkout::{
        Address, CheckoutOutcome, CheckoutRequest, CheckoutResponse, HttpOrderApi, OrderApi,
        OrderApiConfig, OrderApiError,
    },
    config::{CartConfig, ConfigError, LogFormat, LoggingConfig},
    filters::{FilterSet, FilterState},
    pricing::{CartTotals, SERVICE_CHARGE_RATE, calculate_totals},
    products::{Product, ProductError, ProductKey, ProductVariant},
    receipt::{Receipt, ReceiptError},
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
    variants::{Listing, Resolution, cheapest_variant, filter_catalog, resolve},
};
