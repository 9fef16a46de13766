use quotation_core::domain::line_item::LineItem;
use quotation_core::domain::quote::QuotationDetails;
use quotation_core::export::format_money;
use quotation_core::table::LineItemTable;
use quotation_core::{Notice, NoticeLevel};

const COLUMNS: [&str; 11] = [
    "Sr. No",
    "Type",
    "Description",
    "Ratings",
    "Cat No",
    "Make",
    "MaterialName",
    "Qty",
    "TotalQuantity",
    "ListPrice",
    "LP Gross Price",
];

pub fn grand_total_line(table: &LineItemTable, currency_symbol: &str) -> String {
    format!("Grand Total: {currency_symbol} {}", format_money(table.grand_total()))
}

pub fn notice_line(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warn",
    };
    format!("[{marker}] {}", notice.message)
}

pub fn details_lines(details: &QuotationDetails) -> Vec<String> {
    vec![
        format!("Customer: {}", details.customer_name),
        format!("Phone: {}", details.phone),
        format!("Shipping address: {}", details.shipping_address),
        format!("Quotation no: {}", details.quotation_number),
        format!(
            "Quotation date: {}  Delivery date: {}",
            details.quotation_date.format("%Y-%m-%d"),
            details.delivery_date.format("%Y-%m-%d")
        ),
    ]
}

/// Fixed-width rendering of the table with a 0-based `Sr. No` column,
/// followed by the grand total.
pub fn table_lines(table: &LineItemTable, currency_symbol: &str) -> Vec<String> {
    let cells: Vec<[String; 11]> =
        table.rows().iter().enumerate().map(|(index, row)| row_cells(index, row)).collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 3);
    lines.push(join_padded(COLUMNS.iter().copied(), &widths));
    lines.push(widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join("-+-"));
    for row in &cells {
        lines.push(join_padded(row.iter().map(String::as_str), &widths));
    }
    if cells.is_empty() {
        lines.push("(no line items)".to_string());
    }
    lines.push(grand_total_line(table, currency_symbol));
    lines
}

fn row_cells(index: usize, row: &LineItem) -> [String; 11] {
    match row {
        LineItem::Section(heading) => [
            index.to_string(),
            row.kind().to_string(),
            heading.description.clone(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ],
        LineItem::Product(line) => [
            index.to_string(),
            row.kind().to_string(),
            line.description.clone(),
            line.ratings.clone(),
            line.catalog_number.clone(),
            line.make.clone(),
            line.material_name.clone(),
            line.quantity.to_string(),
            line.available_stock().to_string(),
            format_money(line.unit_list_price),
            format_money(line.extended_price()),
        ],
    }
}

fn join_padded<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use quotation_core::domain::line_item::LineItemField;
    use quotation_core::domain::product::CatalogEntry;
    use quotation_core::table::LineItemTable;
    use rust_decimal::Decimal;

    use super::{grand_total_line, table_lines};

    #[test]
    fn total_line_uses_two_decimals_and_symbol() {
        let mut table = LineItemTable::new();
        table.add_product(&CatalogEntry::new("Bulb", Decimal::new(1000, 2)).with_stock(5));
        table.update_field(0, LineItemField::Quantity, "3").expect("edit");

        assert_eq!(grand_total_line(&table, "₹"), "Grand Total: ₹ 30.00");
        assert_eq!(grand_total_line(&LineItemTable::new(), "$"), "Grand Total: $ 0.00");
    }

    #[test]
    fn rows_are_numbered_from_zero() {
        let mut table = LineItemTable::new();
        table.add_section("Lighting").expect("section");
        table.add_product(&CatalogEntry::new("Bulb", Decimal::new(1000, 2)).with_stock(5));

        let lines = table_lines(&table, "₹");
        assert!(lines[0].starts_with("Sr. No | Type"));
        assert!(lines[2].starts_with("0      | SECTION | --- LIGHTING ---"));
        assert!(lines[3].starts_with("1      | PRODUCT | Bulb"));
        assert!(lines[3].contains("10.00"));
        assert_eq!(lines.last().map(String::as_str), Some("Grand Total: ₹ 10.00"));
    }

    #[test]
    fn empty_table_says_so() {
        let lines = table_lines(&LineItemTable::new(), "₹");
        assert!(lines.iter().any(|line| line == "(no line items)"));
    }
}
