//! Receipt
//!
//! Renders a cart as an order summary table followed by its totals.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartLineItem,
    pricing::{CartTotals, calculate_totals},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Order summary for a set of cart lines, priced in one currency.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    items: &'a [CartLineItem],
    totals: CartTotals,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for `items`, formatting amounts in `currency`.
    pub fn new(items: &'a [CartLineItem], currency: &'static Currency) -> Self {
        Self {
            items,
            totals: calculate_totals(items),
            currency,
        }
    }

    /// Totals shown at the foot of the receipt
    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    /// Currency used for all monetary values
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Write the line table and totals to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.items.is_empty() {
            writeln!(out, "Your cart is empty")?;
            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["#", "Product", "Variant", "Price", "Qty", "Amount"]);

        for (idx, item) in self.items.iter().enumerate() {
            builder.push_record([
                format!("{}", idx + 1),
                item.product_name().to_string(),
                variant_label(item),
                self.money(item.price()).to_string(),
                item.quantity().to_string(),
                self.money(item.line_total()).to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}")?;

        let (subtotal, charge, total) = self.totals.in_currency(self.currency);
        let rows = [
            ("Subtotal:", subtotal.to_string()),
            ("Service charge (4%):", charge.to_string()),
            ("Total:", total.to_string()),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:<label_width$} {value:>value_width$}")?;
        }

        Ok(())
    }

    fn money(&self, amount: Decimal) -> Money<'static, Currency> {
        Money::from_decimal(amount, self.currency)
    }
}

fn variant_label(item: &CartLineItem) -> String {
    match (item.size(), item.color()) {
        ("", "") => String::from("-"),
        (size, "") => size.to_string(),
        ("", color) => color.to_string(),
        (size, color) => format!("{size} / {color}"),
    }
}
