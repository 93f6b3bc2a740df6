//! Catalog
//!
//! Products and variants loaded from YAML catalog files.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    filters::FilterState,
    products::{Product, ProductError, ProductKey, ProductVariant},
    variants::{Listing, filter_catalog},
};

/// Catalog loading and lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Variant pricing rules were broken
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found on an existing product
    #[error("Variant {variant} not found on product {product}")]
    VariantNotFound {
        /// Product id that was found
        product: String,
        /// Variant id that was not
        variant: String,
    },
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,
    name: String,
    #[serde(rename = "type")]
    product_type: String,
    #[serde(default)]
    variants: Vec<VariantFixture>,
}

/// Variant Fixture
#[derive(Debug, Deserialize)]
struct VariantFixture {
    id: String,
    #[serde(default)]
    size: String,
    #[serde(default)]
    color: String,
    /// Regular price (e.g., "24.99")
    regular_price: String,
    /// Optional sale price (e.g., "19.99")
    #[serde(default)]
    sale_price: Option<String>,
    #[serde(default)]
    stock: u32,
}

impl TryFrom<VariantFixture> for ProductVariant {
    type Error = CatalogError;

    fn try_from(fixture: VariantFixture) -> Result<Self, Self::Error> {
        let mut variant = ProductVariant::new(fixture.id, parse_amount(&fixture.regular_price)?)?
            .with_size(fixture.size)
            .with_color(fixture.color)
            .with_stock(fixture.stock);

        if let Some(sale_price) = fixture.sale_price.as_deref() {
            variant = variant.with_sale_price(parse_amount(sale_price)?)?;
        }

        Ok(variant)
    }
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let variants = fixture
            .variants
            .into_iter()
            .map(ProductVariant::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            product_type: fixture.product_type,
            variants,
        })
    }
}

/// Parse a decimal amount string (e.g., "24.99")
///
/// # Errors
///
/// Returns [`CatalogError::InvalidPrice`] if the string is not a non-negative decimal number.
pub fn parse_amount(s: &str) -> Result<Decimal, CatalogError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount < Decimal::ZERO {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    Ok(amount)
}

/// An in-memory product catalog in file order.
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    order: Vec<ProductKey>,
    keys: FxHashMap<String, ProductKey>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid products.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Load a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or holds invalid or duplicate products.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;
        let mut catalog = Self::new();

        for product_fixture in fixture.products {
            catalog.insert(product_fixture.try_into()?)?;
        }

        Ok(catalog)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if a product with the same id exists.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.keys.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.keys.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Look up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Look up a product and one of its variants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] or [`CatalogError::VariantNotFound`].
    pub fn variant(
        &self,
        product_id: &str,
        variant_id: &str,
    ) -> Result<(&Product, &ProductVariant), CatalogError> {
        let product = self
            .product(product_id)
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;

        let variant = product
            .variant(variant_id)
            .ok_or_else(|| CatalogError::VariantNotFound {
                product: product_id.to_string(),
                variant: variant_id.to_string(),
            })?;

        Ok((product, variant))
    }

    /// Iterate over products in the order they were added.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Products visible under `filters`, each with its display variant.
    pub fn listings(&self, filters: &FilterState) -> Vec<Listing<'_>> {
        filter_catalog(self.products(), filters)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = r#"
products:
  - id: harness
    name: Cozy Harness
    type: Dog Accessories
    variants:
      - id: red-m
        size: M
        color: Red
        regular_price: "100"
        stock: 4
      - id: blue-l
        size: L
        color: Blue
        regular_price: "120"
        sale_price: "80"
        stock: 2
  - id: mouse
    name: Feather Mouse
    type: Cat Toy
    variants:
      - id: grey
        color: Grey
        regular_price: "4.50"
        stock: 30
"#;

    #[test]
    fn from_yaml_str_loads_products_in_order() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        let ids: Vec<&str> = catalog.products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["harness", "mouse"]);
        assert_eq!(catalog.len(), 2);

        let (_, variant) = catalog.variant("harness", "blue-l")?;
        assert_eq!(variant.effective_price(), Decimal::from(80));
        assert_eq!(variant.stock_quantity(), 2);

        Ok(())
    }

    #[test]
    fn listings_apply_filters() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        let listings = catalog.listings(&FilterState::new().with_product_types(&["cat"]));

        assert_eq!(listings.len(), 1);
        assert_eq!(
            listings.first().map(|l| l.variant.effective_price()),
            Some(Decimal::new(450, 2))
        );

        Ok(())
    }

    #[test]
    fn unknown_ids_are_reported() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        assert!(matches!(
            catalog.variant("leash", "x"),
            Err(CatalogError::ProductNotFound(id)) if id == "leash"
        ));
        assert!(matches!(
            catalog.variant("mouse", "white"),
            Err(CatalogError::VariantNotFound { variant, .. }) if variant == "white"
        ));

        Ok(())
    }

    #[test]
    fn sale_price_above_regular_fails_to_load() {
        let yaml = r#"
products:
  - id: bone
    name: Chew Bone
    type: Dog Toy
    variants:
      - id: one
        regular_price: "5"
        sale_price: "6"
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::Product(ProductError::SalePriceAboveRegular(..)))
        ));
    }

    #[test]
    fn duplicate_product_ids_are_rejected() {
        let yaml = r#"
products:
  - { id: bone, name: Chew Bone, type: Dog Toy }
  - { id: bone, name: Other Bone, type: Dog Toy }
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::DuplicateProduct(id)) if id == "bone"
        ));
    }

    #[test]
    fn parse_amount_rejects_invalid_values() {
        assert!(matches!(parse_amount("12,50"), Err(CatalogError::InvalidPrice(_))));
        assert!(matches!(parse_amount("-1"), Err(CatalogError::InvalidPrice(_))));
    }

    #[test]
    fn parse_amount_accepts_decimal_strings() -> TestResult {
        assert_eq!(parse_amount(" 24.99 ")?, Decimal::new(2499, 2));

        Ok(())
    }
}
