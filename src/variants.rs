//! Variant Resolution
//!
//! Decides which variant of a product to display for the active filters, and whether the
//! product is shown at all.

use crate::{
    filters::FilterState,
    products::{Product, ProductVariant},
};

/// The outcome of resolving a product against a [`FilterState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    /// Whether the product should be listed
    pub visible: bool,

    /// The variant to display, if any variant survived the color/size narrowing
    pub display_variant: Option<&'a ProductVariant>,
}

impl Resolution<'_> {
    fn hidden() -> Self {
        Resolution {
            visible: false,
            display_variant: None,
        }
    }
}

/// A visible product together with the variant it is listed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listing<'a> {
    /// The listed product
    pub product: &'a Product,

    /// The variant whose price and attributes are shown
    pub variant: &'a ProductVariant,
}

/// Returns the variant with the lowest effective price.
///
/// When several variants share the lowest price, the first one in iteration order wins.
pub fn cheapest_variant<'a>(
    variants: impl IntoIterator<Item = &'a ProductVariant>,
) -> Option<&'a ProductVariant> {
    variants
        .into_iter()
        .min_by_key(|variant| variant.effective_price())
}

/// Resolve the display variant and visibility of `product` under `filters`.
///
/// Variants are narrowed by color and then by size (case-insensitive substring matches against
/// the selected values; an empty selection skips that step). The cheapest survivor is displayed.
/// The product is visible when a variant survived, its declared type matches the selected types,
/// and the displayed variant's effective price does not exceed the price cap.
pub fn resolve<'a>(product: &'a Product, filters: &FilterState) -> Resolution<'a> {
    let eligible = product
        .variants
        .iter()
        .filter(|variant| filters.colors.is_empty() || filters.colors.matches(variant.color()))
        .filter(|variant| filters.sizes.is_empty() || filters.sizes.matches(variant.size()));

    let Some(display_variant) = cheapest_variant(eligible) else {
        return Resolution::hidden();
    };

    let type_matches =
        filters.product_types.is_empty() || filters.product_types.matches(&product.product_type);

    let within_budget = display_variant.effective_price() <= filters.max_price;

    Resolution {
        visible: type_matches && within_budget,
        display_variant: Some(display_variant),
    }
}

/// Resolve every product and keep the visible ones, in catalog order.
pub fn filter_catalog<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    filters: &FilterState,
) -> Vec<Listing<'a>> {
    products
        .into_iter()
        .filter_map(|product| match resolve(product, filters) {
            Resolution {
                visible: true,
                display_variant: Some(variant),
            } => Some(Listing { product, variant }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::products::ProductError;

    use super::*;

    fn harness() -> Result<Product, ProductError> {
        Ok(Product::new("p1", "Cozy Harness", "Dog Accessories")
            .with_variant(
                ProductVariant::new("red-m", Decimal::from(100))?
                    .with_color("Red")
                    .with_size("M"),
            )
            .with_variant(
                ProductVariant::new("blue-l", Decimal::from(120))?
                    .with_color("Blue")
                    .with_size("L")
                    .with_sale_price(Decimal::from(80))?,
            ))
    }

    #[test]
    fn color_filter_selects_matching_variant_at_sale_price() -> TestResult {
        let product = harness()?;
        let filters = FilterState::new().with_colors(&["Blue"]);

        let resolution = resolve(&product, &filters);

        assert!(resolution.visible);
        let variant = resolution.display_variant.ok_or("expected a display variant")?;
        assert_eq!(variant.variant_id(), "blue-l");
        assert_eq!(variant.effective_price(), Decimal::from(80));

        Ok(())
    }

    #[test]
    fn no_filters_selects_cheapest_variant() -> TestResult {
        let product = harness()?;

        let resolution = resolve(&product, &FilterState::new());

        assert!(resolution.visible);
        assert_eq!(
            resolution.display_variant.map(ProductVariant::variant_id),
            Some("blue-l")
        );

        Ok(())
    }

    #[test]
    fn color_match_is_case_insensitive_substring() -> TestResult {
        let product = Product::new("p2", "Collar", "Dog Accessories").with_variant(
            ProductVariant::new("navy", Decimal::from(15))?.with_color("Navy Blue"),
        );

        let resolution = resolve(&product, &FilterState::new().with_colors(&["BLUE"]));

        assert!(resolution.visible);

        Ok(())
    }

    #[test]
    fn size_filter_narrows_color_matches() -> TestResult {
        let product = harness()?;
        let filters = FilterState::new().with_colors(&["red", "blue"]).with_sizes(&["m"]);

        let resolution = resolve(&product, &filters);

        assert_eq!(
            resolution.display_variant.map(ProductVariant::variant_id),
            Some("red-m")
        );

        Ok(())
    }

    #[test]
    fn no_matching_variant_hides_product() -> TestResult {
        let product = harness()?;

        let resolution = resolve(&product, &FilterState::new().with_colors(&["green"]));

        assert_eq!(resolution, Resolution::hidden());

        Ok(())
    }

    #[test]
    fn product_without_variants_is_never_visible() {
        let product = Product::new("p3", "Mystery Box", "Cat Toy");

        assert!(!resolve(&product, &FilterState::new()).visible);
    }

    #[test]
    fn product_type_must_match_when_selected() -> TestResult {
        let product = harness()?;

        let dog = resolve(&product, &FilterState::new().with_product_types(&["dog"]));
        let cat = resolve(&product, &FilterState::new().with_product_types(&["cat"]));

        assert!(dog.visible);
        assert!(!cat.visible);
        assert!(cat.display_variant.is_some());

        Ok(())
    }

    #[test]
    fn price_cap_uses_effective_price_of_display_variant() -> TestResult {
        let product = harness()?;

        let at_cap = resolve(&product, &FilterState::new().with_max_price(Decimal::from(80)));
        let below_cap = resolve(&product, &FilterState::new().with_max_price(Decimal::from(79)));

        assert!(at_cap.visible);
        assert!(!below_cap.visible);

        Ok(())
    }

    #[test]
    fn cheapest_tie_goes_to_first_variant() -> TestResult {
        let first = ProductVariant::new("first", Decimal::from(10))?;
        let second = ProductVariant::new("second", Decimal::from(20))?
            .with_sale_price(Decimal::from(10))?;
        let variants = [second.clone(), first.clone()];

        assert_eq!(cheapest_variant([&first, &second]), Some(&first));
        assert_eq!(cheapest_variant(&variants), Some(&second));

        Ok(())
    }

    #[test]
    fn filter_catalog_keeps_catalog_order() -> TestResult {
        let bowl = Product::new("p4", "Steel Bowl", "Cat Accessories")
            .with_variant(ProductVariant::new("bowl", Decimal::from(12))?);
        let hidden = Product::new("p5", "Empty Listing", "Cat Accessories");
        let harness = harness()?;

        let listings = filter_catalog([&harness, &hidden, &bowl], &FilterState::new());

        let ids: Vec<&str> = listings.iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p4"]);

        Ok(())
    }
}
