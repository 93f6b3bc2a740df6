//! Cart Store

use tracing::{debug, info, warn};

use crate::{
    cart::{errors::CartError, line_item::CartLineItem},
    checkout::{Address, CheckoutOutcome, CheckoutRequest, OrderApi},
    pricing::{CartTotals, calculate_totals},
    products::{Product, ProductVariant},
    storage::{CartStorage, StorageError},
};

/// Storage key the cart is kept under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Whether the cart drawer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartVisibility {
    /// Hidden
    #[default]
    Closed,

    /// Showing
    Open,
}

/// The shopper's cart for one session, mirrored to durable storage after every change.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    storage: S,
    key: String,
    items: Vec<CartLineItem>,
    visibility: CartVisibility,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart stored under [`DEFAULT_CART_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the storage backend cannot be read.
    pub fn load(storage: S) -> Result<Self, CartError> {
        Self::load_with_key(storage, DEFAULT_CART_KEY)
    }

    /// Load the cart stored under `key`.
    ///
    /// Stored rows that fail validation are dropped and rows sharing a (product, variant) key
    /// are merged. Unreadable contents start an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the storage backend cannot be read.
    #[tracing::instrument(
        skip(storage, key),
        fields(key = tracing::field::Empty, lines = tracing::field::Empty)
    )]
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Result<Self, CartError> {
        let key = key.into();
        tracing::Span::current().record("key", key.as_str());

        let items = match storage.read(&key)? {
            Some(raw) => sanitize(&raw),
            None => Vec::new(),
        };

        tracing::Span::current().record("lines", items.len());
        debug!("loaded cart");

        Ok(Self {
            storage,
            key,
            items,
            visibility: CartVisibility::Closed,
        })
    }

    /// Line items in the order they were added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across every line.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Subtotal, service charge and total of the current lines.
    pub fn totals(&self) -> CartTotals {
        calculate_totals(&self.items)
    }

    /// Current drawer state.
    pub fn visibility(&self) -> CartVisibility {
        self.visibility
    }

    /// Whether the drawer is showing.
    pub fn is_open(&self) -> bool {
        self.visibility == CartVisibility::Open
    }

    /// Show the drawer.
    pub fn open(&mut self) {
        self.visibility = CartVisibility::Open;
    }

    /// Hide the drawer.
    pub fn close(&mut self) {
        self.visibility = CartVisibility::Closed;
    }

    /// Flip the drawer between open and closed.
    pub fn toggle(&mut self) {
        self.visibility = match self.visibility {
            CartVisibility::Open => CartVisibility::Closed,
            CartVisibility::Closed => CartVisibility::Open,
        };
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add `quantity` units of `variant`, merging into an existing row for the same variant.
    ///
    /// A quantity of zero counts as one. On success the cart is persisted and opened.
    ///
    /// # Errors
    ///
    /// - [`CartError::Stock`]: the row would hold more units than the variant has in stock.
    /// - [`CartError::Storage`]: the cart could not be persisted; nothing changed.
    #[tracing::instrument(
        skip(self, product, variant),
        fields(product_id = %product.id, variant_id = %variant.variant_id())
    )]
    pub fn add(
        &mut self,
        product: &Product,
        variant: &ProductVariant,
        quantity: u32,
    ) -> Result<(), CartError> {
        let quantity = quantity.max(1);
        let key = (product.id.as_str(), variant.variant_id());
        let position = self.items.iter().position(|item| item.key() == key);

        let existing = position
            .and_then(|idx| self.items.get(idx))
            .map_or(0, CartLineItem::quantity);

        let requested = existing.saturating_add(quantity);

        if requested > variant.stock_quantity() {
            return Err(CartError::Stock {
                product_name: product.name.clone(),
                requested,
                available: variant.stock_quantity(),
            });
        }

        let previous = self.items.clone();

        match position.and_then(|idx| self.items.get_mut(idx)) {
            Some(item) => item.set_quantity(requested),
            None => self
                .items
                .push(CartLineItem::new(product, variant, quantity)),
        }

        self.commit(previous)?;
        self.open();

        debug!(quantity = requested, "added to cart");

        Ok(())
    }

    /// Set the quantity of the line at `index` from raw shopper input.
    ///
    /// Input is read as a leading integer; anything that does not give at least one is stored
    /// as one. An out-of-range index leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the cart could not be persisted; nothing changed.
    pub fn update_quantity(&mut self, index: usize, input: &str) -> Result<(), CartError> {
        self.set_quantity(index, parse_quantity(input))
    }

    /// Set the quantity of the line at `index`, raising zero to one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the cart could not be persisted; nothing changed.
    #[tracing::instrument(skip(self))]
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), CartError> {
        if index >= self.items.len() {
            debug!("quantity update for stale index ignored");
            return Ok(());
        }

        let previous = self.items.clone();

        if let Some(item) = self.items.get_mut(index) {
            item.set_quantity(quantity);
        }

        self.commit(previous)
    }

    /// Remove the line at `index`, returning it. An out-of-range index is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the cart could not be persisted; nothing changed.
    #[tracing::instrument(skip(self))]
    pub fn remove_item(&mut self, index: usize) -> Result<Option<CartLineItem>, CartError> {
        if index >= self.items.len() {
            debug!("removal of stale index ignored");
            return Ok(None);
        }

        let previous = self.items.clone();
        let removed = self.items.remove(index);

        self.commit(previous)?;

        Ok(Some(removed))
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the cart could not be persisted; nothing changed.
    pub fn clear(&mut self) -> Result<(), CartError> {
        let previous = std::mem::take(&mut self.items);

        self.commit(previous)
    }

    /// Submit the cart and `address` to the order API.
    ///
    /// On success the drawer is closed; the lines stay in the cart until the caller confirms the
    /// order and calls [`CartStore::clear`].
    ///
    /// # Errors
    ///
    /// - [`CartError::EmptyCart`]: there is nothing to order; the API is not called.
    /// - [`CartError::Order`]: the API could not be reached or failed.
    /// - [`CartError::OrderRejected`]: the API declined the order.
    pub async fn checkout<A>(
        &mut self,
        address: Address,
        order_api: &A,
    ) -> Result<CheckoutOutcome, CartError>
    where
        A: OrderApi + ?Sized,
    {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let request = CheckoutRequest {
            cart: self.items.clone(),
            selected_address: address,
        };

        info!(
            lines = request.cart.len(),
            total = %self.totals().total,
            "submitting order"
        );

        let response = order_api.submit_order(&request).await.inspect_err(|err| {
            warn!(%err, "order submission failed");
        })?;

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Checkout failed".to_string());

            warn!(%message, "order rejected");

            return Err(CartError::OrderRejected(message));
        }

        self.close();

        Ok(match response.redirect_url {
            Some(url) if !url.is_empty() => CheckoutOutcome::Redirect(url),
            _ => CheckoutOutcome::Placed {
                message: response.message,
            },
        })
    }

    /// Write the current lines; on failure put `previous` back.
    fn commit(&mut self, previous: Vec<CartLineItem>) -> Result<(), CartError> {
        let result = serde_json::to_string(&self.items)
            .map_err(StorageError::from)
            .and_then(|serialized| self.storage.write(&self.key, &serialized));

        if let Err(err) = result {
            warn!(%err, key = %self.key, "failed to persist cart; rolling back");
            self.items = previous;

            return Err(err.into());
        }

        Ok(())
    }
}

/// Read a quantity the way a browser integer parse would: optional sign, then leading digits.
///
/// Anything that does not give a whole number of at least one yields one.
pub fn parse_quantity(input: &str) -> u32 {
    let trimmed = input.trim_start();

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    let digits = unsigned.get(..end).unwrap_or_default();

    if negative || digits.is_empty() {
        return 1;
    }

    digits.parse::<u32>().unwrap_or(u32::MAX).max(1)
}

/// Parse stored cart contents, dropping invalid rows and merging duplicate keys.
fn sanitize(raw: &str) -> Vec<CartLineItem> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(%err, "discarding unreadable cart contents");
            return Vec::new();
        }
    };

    let mut items: Vec<CartLineItem> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let item = match serde_json::from_value::<CartLineItem>(entry) {
            Ok(item) => item,
            Err(err) => {
                warn!(index, %err, "dropping invalid cart line");
                continue;
            }
        };

        match items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(existing) => {
                let merged = existing.quantity().saturating_add(item.quantity());
                existing.set_quantity(merged);
            }
            None => items.push(item),
        }
    }

    items
}
