//! Cart

pub mod errors;
pub mod line_item;
mod store;

pub use errors::CartError;
pub use line_item::CartLineItem;
pub use store::*;
