use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::line_item::LineItem;

/// Largest unit price accepted from text. Anything above coerces to 0, which
/// keeps `quantity * price` inside `Decimal` range for every `u32` quantity.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTotals {
    pub grand_total: Decimal,
    pub product_rows: usize,
    pub section_rows: usize,
}

/// Reprices every product line and sums the grand total. Section rows carry
/// no price fields and never contribute. Running it twice yields the same
/// values.
pub fn recompute(rows: &mut [LineItem]) -> TableTotals {
    let mut totals = TableTotals::default();

    for row in rows.iter_mut() {
        match row {
            LineItem::Product(product) => {
                totals.grand_total = totals.grand_total.saturating_add(product.reprice());
                totals.product_rows += 1;
            }
            LineItem::Section(_) => totals.section_rows += 1,
        }
    }

    totals
}

/// Grand total over already-priced rows.
pub fn grand_total(rows: &[LineItem]) -> Decimal {
    rows.iter()
        .filter_map(LineItem::as_product)
        .fold(Decimal::ZERO, |total, product| total.saturating_add(product.extended_price()))
}

/// Parses a unit price. Anything that is not a non-negative number no larger
/// than [`MAX_UNIT_PRICE`] becomes 0.
pub fn coerce_price(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    let parsed = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed));

    match parsed {
        Ok(value) if value > Decimal::ZERO && value <= MAX_UNIT_PRICE => value,
        _ => Decimal::ZERO,
    }
}

/// Parses a quantity. Fractions truncate toward zero; anything non-numeric,
/// negative or beyond `u32` becomes 0.
pub fn coerce_quantity(raw: &str) -> u32 {
    let price_like = coerce_price(raw);
    price_like.trunc().to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::line_item::{LineItem, ProductLine, SectionHeading};
    use crate::domain::product::CatalogEntry;

    use super::{coerce_price, coerce_quantity, grand_total, recompute, MAX_UNIT_PRICE};

    fn product(price: Decimal, quantity: u32) -> LineItem {
        let mut line = ProductLine::from_catalog(&CatalogEntry::new("Item", price));
        line.quantity = quantity;
        LineItem::Product(line)
    }

    #[test]
    fn extended_price_is_quantity_times_unit_price() {
        let mut rows = vec![product(Decimal::new(1050, 2), 4), product(Decimal::new(300, 2), 0)];
        let totals = recompute(&mut rows);

        let prices: Vec<Decimal> =
            rows.iter().filter_map(LineItem::as_product).map(|p| p.extended_price()).collect();
        assert_eq!(prices, vec![Decimal::new(4200, 2), Decimal::ZERO]);
        assert_eq!(totals.grand_total, Decimal::new(4200, 2));
        assert_eq!(totals.product_rows, 2);
    }

    #[test]
    fn sections_are_counted_but_never_priced() {
        let mut rows = vec![
            LineItem::Section(SectionHeading::from_label("Cables").expect("label")),
            product(Decimal::new(250, 2), 2),
            LineItem::Section(SectionHeading::from_label("Panels").expect("label")),
        ];
        let totals = recompute(&mut rows);

        assert_eq!(totals.section_rows, 2);
        assert_eq!(totals.grand_total, Decimal::new(500, 2));
        assert_eq!(grand_total(&rows), totals.grand_total);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut rows = vec![product(Decimal::new(333, 2), 3), product(Decimal::new(1, 0), 7)];
        let first = recompute(&mut rows);
        let snapshot = rows.clone();
        let second = recompute(&mut rows);

        assert_eq!(first, second);
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn unparseable_or_negative_input_coerces_to_zero() {
        assert_eq!(coerce_price("abc"), Decimal::ZERO);
        assert_eq!(coerce_price(""), Decimal::ZERO);
        assert_eq!(coerce_price("-4.5"), Decimal::ZERO);
        assert_eq!(coerce_price(" 12.75 "), Decimal::new(1275, 2));
        assert_eq!(coerce_price("1e2"), Decimal::new(100, 0));

        assert_eq!(coerce_quantity("three"), 0);
        assert_eq!(coerce_quantity("-2"), 0);
        assert_eq!(coerce_quantity("2.7"), 2);
        assert_eq!(coerce_quantity("5"), 5);
        assert_eq!(coerce_quantity("99999999999"), 0);
    }

    #[test]
    fn prices_beyond_the_ceiling_coerce_to_zero() {
        assert_eq!(MAX_UNIT_PRICE, Decimal::new(1_000_000_000_000_000, 0));
        assert_eq!(coerce_price("1000000000000000"), MAX_UNIT_PRICE);
        assert_eq!(coerce_price("1.0e+15"), MAX_UNIT_PRICE);
        assert_eq!(coerce_price("1000000000000000.01"), Decimal::ZERO);
        assert_eq!(coerce_price("79228162514264337593543950335"), Decimal::ZERO);
        assert_eq!(coerce_price("1.0e+30"), Decimal::ZERO);
    }

    #[test]
    fn overflowing_rows_never_panic() {
        let mut rows =
            vec![product(Decimal::MAX, 2), product(Decimal::MAX, 1), product(Decimal::MAX, 1)];
        let totals = recompute(&mut rows);

        let prices: Vec<Decimal> =
            rows.iter().filter_map(LineItem::as_product).map(|p| p.extended_price()).collect();
        assert_eq!(prices, vec![Decimal::ZERO, Decimal::MAX, Decimal::MAX]);
        assert_eq!(totals.grand_total, Decimal::MAX);
        assert_eq!(grand_total(&rows), Decimal::MAX);
    }
}
