//! Products

use rust_decimal::Decimal;
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors raised when variant pricing is inconsistent.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// A price was below zero (variant id, price).
    #[error("Variant {0} has a negative price: {1}")]
    NegativePrice(String, Decimal),

    /// A sale price was above the regular price (variant id, sale price, regular price).
    #[error("Variant {0} has sale price {1} above its regular price {2}")]
    SalePriceAboveRegular(String, Decimal, Decimal),
}

/// A specific size/color/stock/price combination of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant {
    variant_id: String,
    size: String,
    color: String,
    regular_price: Decimal,
    sale_price: Option<Decimal>,
    stock_quantity: u32,
}

impl ProductVariant {
    /// Creates a variant with the given regular price and no size, color or stock.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NegativePrice`] if `regular_price` is below zero.
    pub fn new(
        variant_id: impl Into<String>,
        regular_price: Decimal,
    ) -> Result<Self, ProductError> {
        let variant_id = variant_id.into();

        if regular_price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(variant_id, regular_price));
        }

        Ok(Self {
            variant_id,
            size: String::new(),
            color: String::new(),
            regular_price,
            sale_price: None,
            stock_quantity: 0,
        })
    }

    /// Sets the variant size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Sets the variant color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the number of units available.
    #[must_use]
    pub fn with_stock(mut self, stock_quantity: u32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    /// Sets a sale price.
    ///
    /// # Errors
    ///
    /// Returns an error if the sale price is negative or above the regular price.
    pub fn with_sale_price(mut self, sale_price: Decimal) -> Result<Self, ProductError> {
        if sale_price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.variant_id, sale_price));
        }

        if sale_price > self.regular_price {
            return Err(ProductError::SalePriceAboveRegular(
                self.variant_id,
                sale_price,
                self.regular_price,
            ));
        }

        self.sale_price = Some(sale_price);

        Ok(self)
    }

    /// Variant identifier
    pub fn variant_id(&self) -> &str {
        &self.variant_id
    }

    /// Variant size label
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Variant color label
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Regular (list) price
    pub fn regular_price(&self) -> Decimal {
        self.regular_price
    }

    /// Sale price, if one is set
    pub fn sale_price(&self) -> Option<Decimal> {
        self.sale_price
    }

    /// Units available to add to a cart
    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    /// The price a customer pays: the sale price when set, otherwise the regular price.
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.regular_price)
    }

    /// Whether the variant is currently discounted.
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.regular_price)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Declared product type (e.g. "Dog Food", "Cat Toy")
    pub product_type: String,

    /// Variants in catalog order
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Creates a product with no variants.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            product_type: product_type.into(),
            variants: Vec::new(),
        }
    }

    /// Adds a variant, keeping insertion order.
    #[must_use]
    pub fn with_variant(mut self, variant: ProductVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Look up a variant by its identifier.
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|variant| variant.variant_id == variant_id)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn effective_price_prefers_sale_price() -> TestResult {
        let variant =
            ProductVariant::new("v1", Decimal::from(120))?.with_sale_price(Decimal::from(80))?;

        assert_eq!(variant.effective_price(), Decimal::from(80));
        assert!(variant.is_on_sale());

        Ok(())
    }

    #[test]
    fn effective_price_falls_back_to_regular_price() -> TestResult {
        let variant = ProductVariant::new("v1", Decimal::from(100))?;

        assert_eq!(variant.effective_price(), Decimal::from(100));
        assert!(!variant.is_on_sale());

        Ok(())
    }

    #[test]
    fn sale_price_equal_to_regular_is_allowed() -> TestResult {
        let variant =
            ProductVariant::new("v1", Decimal::from(50))?.with_sale_price(Decimal::from(50))?;

        assert_eq!(variant.effective_price(), Decimal::from(50));
        assert!(!variant.is_on_sale());

        Ok(())
    }

    #[test]
    fn sale_price_above_regular_is_rejected() -> TestResult {
        let result =
            ProductVariant::new("v1", Decimal::from(50))?.with_sale_price(Decimal::from(60));

        assert_eq!(
            result,
            Err(ProductError::SalePriceAboveRegular(
                "v1".to_string(),
                Decimal::from(60),
                Decimal::from(50)
            ))
        );

        Ok(())
    }

    #[test]
    fn negative_regular_price_is_rejected() {
        let result = ProductVariant::new("v1", Decimal::from(-1));

        assert!(matches!(result, Err(ProductError::NegativePrice(id, _)) if id == "v1"));
    }

    #[test]
    fn variant_lookup_by_id() -> TestResult {
        let product = Product::new("p1", "Chew Rope", "Dog Toy")
            .with_variant(ProductVariant::new("small", Decimal::from(5))?.with_size("S"))
            .with_variant(ProductVariant::new("large", Decimal::from(9))?.with_size("L"));

        assert_eq!(product.variant("large").map(ProductVariant::size), Some("L"));
        assert!(product.variant("medium").is_none());

        Ok(())
    }
}
