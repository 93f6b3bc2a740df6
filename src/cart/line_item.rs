//! Cart Line Items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::{Product, ProductVariant};

/// Reasons a stored line item is rejected when the cart is loaded.
#[derive(Debug, Error, PartialEq)]
pub enum LineItemError {
    /// The product or variant identifier was empty.
    #[error("line item is missing its {0} identifier")]
    MissingId(&'static str),

    /// The stored quantity was below one.
    #[error("line item quantity must be at least 1, got {0}")]
    NonPositiveQuantity(i64),

    /// The stored unit price was negative.
    #[error("line item price must not be negative, got {0}")]
    NegativePrice(Decimal),
}

/// (product id, variant id) pair identifying a cart row.
pub type LineItemKey<'a> = (&'a str, &'a str);

/// One row in the cart: a product variant and how many of it the shopper wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredLineItem")]
pub struct CartLineItem {
    product_id: String,
    variant_id: String,
    product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    size: String,
    color: String,
    quantity: u32,
}

impl CartLineItem {
    /// Build a line item for `variant` of `product`, priced at the variant's effective price.
    ///
    /// A quantity of zero is raised to one.
    pub fn new(product: &Product, variant: &ProductVariant, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            variant_id: variant.variant_id().to_string(),
            product_name: product.name.clone(),
            price: variant.effective_price(),
            size: variant.size().to_string(),
            color: variant.color().to_string(),
            quantity: quantity.max(1),
        }
    }

    /// Product identifier
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Variant identifier
    pub fn variant_id(&self) -> &str {
        &self.variant_id
    }

    /// Product name at the time the item was added
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Effective unit price at the time the item was added
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Variant size label
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Variant color label
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Number of units, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The uniqueness key of the row.
    pub fn key(&self) -> LineItemKey<'_> {
        (&self.product_id, &self.variant_id)
    }

    /// Unit price multiplied by quantity, saturating on overflow.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }
}

/// Identifiers arrive as strings or as bare numbers depending on which backend produced them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(serde_json::Number),
}

impl StoredId {
    fn into_string(self) -> String {
        match self {
            StoredId::Text(text) => text.trim().to_string(),
            StoredId::Number(number) => number.to_string(),
        }
    }
}

/// Line item shape as found in durable storage, before validation.
#[derive(Debug, Deserialize)]
struct StoredLineItem {
    product_id: StoredId,
    variant_id: StoredId,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
    quantity: i64,
}

impl TryFrom<StoredLineItem> for CartLineItem {
    type Error = LineItemError;

    fn try_from(stored: StoredLineItem) -> Result<Self, Self::Error> {
        let product_id = stored.product_id.into_string();
        let variant_id = stored.variant_id.into_string();

        if product_id.is_empty() {
            return Err(LineItemError::MissingId("product"));
        }

        if variant_id.is_empty() {
            return Err(LineItemError::MissingId("variant"));
        }

        if stored.price < Decimal::ZERO {
            return Err(LineItemError::NegativePrice(stored.price));
        }

        if stored.quantity < 1 {
            return Err(LineItemError::NonPositiveQuantity(stored.quantity));
        }

        let quantity = u32::try_from(stored.quantity).unwrap_or(u32::MAX);

        Ok(Self {
            product_id,
            variant_id,
            product_name: stored.product_name.unwrap_or_default(),
            price: stored.price,
            size: stored.size.unwrap_or_default(),
            color: stored.color.unwrap_or_default(),
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn kibble() -> Result<(Product, ProductVariant), crate::products::ProductError> {
        let variant = ProductVariant::new("5kg", Decimal::from(40))?
            .with_size("5kg")
            .with_color("n/a")
            .with_stock(10)
            .with_sale_price(Decimal::from(35))?;

        let product =
            Product::new("kibble", "Salmon Kibble", "Dog Food").with_variant(variant.clone());

        Ok((product, variant))
    }

    #[test]
    fn new_copies_product_and_effective_price() -> TestResult {
        let (product, variant) = kibble()?;

        let item = CartLineItem::new(&product, &variant, 2);

        assert_eq!(item.key(), ("kibble", "5kg"));
        assert_eq!(item.product_name(), "Salmon Kibble");
        assert_eq!(item.price(), Decimal::from(35));
        assert_eq!(item.size(), "5kg");
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.line_total(), Decimal::from(70));

        Ok(())
    }

    #[test]
    fn new_raises_zero_quantity_to_one() -> TestResult {
        let (product, variant) = kibble()?;

        assert_eq!(CartLineItem::new(&product, &variant, 0).quantity(), 1);

        Ok(())
    }

    #[test]
    fn serializes_price_as_number() -> TestResult {
        let (product, variant) = kibble()?;
        let item = CartLineItem::new(&product, &variant, 1);

        let value = serde_json::to_value(&item)?;

        assert_eq!(value["price"], json!(35.0));
        assert_eq!(value["product_id"], json!("kibble"));
        assert_eq!(value["quantity"], json!(1));

        Ok(())
    }

    #[test]
    fn deserializes_numeric_ids_and_missing_labels() -> TestResult {
        let item: CartLineItem = serde_json::from_value(json!({
            "product_id": 17,
            "variant_id": "  v2 ",
            "price": 12.5,
            "quantity": 3
        }))?;

        assert_eq!(item.key(), ("17", "v2"));
        assert_eq!(item.price(), Decimal::new(125, 1));
        assert_eq!(item.size(), "");
        assert_eq!(item.quantity(), 3);

        Ok(())
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let result = serde_json::from_value::<CartLineItem>(json!({
            "product_id": "p",
            "variant_id": "v",
            "price": 1,
            "quantity": 0
        }));

        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_price_and_blank_ids() {
        let negative = serde_json::from_value::<CartLineItem>(json!({
            "product_id": "p",
            "variant_id": "v",
            "price": -1,
            "quantity": 1
        }));
        let blank = serde_json::from_value::<CartLineItem>(json!({
            "product_id": "",
            "variant_id": "v",
            "price": 1,
            "quantity": 1
        }));

        assert!(negative.is_err());
        assert!(blank.is_err());
    }

    #[test]
    fn stored_conversion_reports_reason() {
        let stored = StoredLineItem {
            product_id: StoredId::Text("p".to_string()),
            variant_id: StoredId::Text("v".to_string()),
            product_name: None,
            price: Decimal::ONE,
            size: None,
            color: None,
            quantity: -3,
        };

        assert_eq!(
            CartLineItem::try_from(stored),
            Err(LineItemError::NonPositiveQuantity(-3))
        );
    }
}
