//! Pricing
//!
//! Cart totals: the subtotal of all lines, the fixed service charge, and the grand total.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::cart::CartLineItem;

/// Service charge applied to every checkout, as a fraction of the subtotal (4%).
pub const SERVICE_CHARGE_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);

/// Totals derived from the cart's line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of unit price times quantity over every line
    pub subtotal: Decimal,

    /// Service charge on the subtotal
    pub charge: Decimal,

    /// Subtotal plus service charge
    pub total: Decimal,
}

impl CartTotals {
    /// The totals as money in `currency`, in (subtotal, charge, total) order.
    pub fn in_currency(
        &self,
        currency: &'static Currency,
    ) -> (
        Money<'static, Currency>,
        Money<'static, Currency>,
        Money<'static, Currency>,
    ) {
        (
            Money::from_decimal(self.subtotal, currency),
            Money::from_decimal(self.charge, currency),
            Money::from_decimal(self.total, currency),
        )
    }
}

/// Calculates the totals of a list of line items.
///
/// The result does not depend on line order, and an empty list yields zero for every field.
/// Arithmetic saturates instead of overflowing.
pub fn calculate_totals(items: &[CartLineItem]) -> CartTotals {
    let subtotal = items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()));

    let charge = service_charge(subtotal);

    CartTotals {
        subtotal,
        charge,
        total: subtotal.saturating_add(charge),
    }
}

/// The service charge due on `subtotal`.
pub fn service_charge(subtotal: Decimal) -> Decimal {
    subtotal.saturating_mul(SERVICE_CHARGE_RATE)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::products::{Product, ProductError, ProductVariant};

    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> Result<CartLineItem, ProductError> {
        let variant = ProductVariant::new(id, Decimal::from(price))?.with_stock(100);
        let product = Product::new(id, id, "Pet Supplies").with_variant(variant.clone());

        Ok(CartLineItem::new(&product, &variant, quantity))
    }

    #[test]
    fn service_charge_rate_is_four_percent() {
        assert_eq!(SERVICE_CHARGE_RATE, Decimal::new(4, 2));
    }

    #[test]
    fn totals_for_two_lines() -> TestResult {
        let items = [line("bed", 250, 2)?, line("bowl", 100, 1)?];

        let totals = calculate_totals(&items);

        assert_eq!(totals.subtotal, Decimal::from(600));
        assert_eq!(totals.charge, Decimal::from(24));
        assert_eq!(totals.total, Decimal::from(624));

        Ok(())
    }

    #[test]
    fn totals_for_empty_cart_are_zero() {
        assert_eq!(calculate_totals(&[]), CartTotals::default());
    }

    #[test]
    fn totals_are_order_independent() -> TestResult {
        let forward = [line("a", 3, 7)?, line("b", 11, 2)?, line("c", 5, 1)?];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(calculate_totals(&forward), calculate_totals(&reversed));

        Ok(())
    }

    #[test]
    fn total_is_subtotal_plus_charge() -> TestResult {
        let variant = ProductVariant::new("treats", Decimal::new(1999, 2))?.with_stock(9);
        let product =
            Product::new("treats", "Liver Treats", "Dog Food").with_variant(variant.clone());
        let items = [CartLineItem::new(&product, &variant, 3)];

        let totals = calculate_totals(&items);

        assert_eq!(totals.subtotal, Decimal::new(5997, 2));
        assert_eq!(totals.charge, totals.subtotal * Decimal::new(4, 2));
        assert_eq!(totals.total, totals.subtotal + totals.charge);

        Ok(())
    }

    #[test]
    fn in_currency_formats_money() -> TestResult {
        let totals = calculate_totals(&[line("bed", 250, 2)?, line("bowl", 100, 1)?]);

        let (subtotal, charge, total) = totals.in_currency(iso::USD);

        assert_eq!(subtotal, Money::from_decimal(Decimal::from(600), iso::USD));
        assert_eq!(charge, Money::from_decimal(Decimal::from(24), iso::USD));
        assert_eq!(total, Money::from_decimal(Decimal::from(624), iso::USD));

        Ok(())
    }
}
