use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

use crate::domain::line_item::LineItem;
use crate::domain::quote::QuotationDetails;
use crate::table::LineItemTable;

pub const CSV_HEADER: [&str; 10] = [
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

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output is not valid utf-8")]
    Encoding,
    #[error("could not write `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// A rendered quotation, ready to hand to the user or write to disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuotationExport {
    pub file_name: String,
    pub csv: String,
    pub grand_total: Decimal,
    pub details: QuotationDetails,
}

impl QuotationExport {
    pub fn build(table: &LineItemTable, details: &QuotationDetails) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: export_file_name(&details.quotation_number),
            csv: to_csv_string(table.rows())?,
            grand_total: table.grand_total(),
            details: details.clone(),
        })
    }

    /// Writes the CSV into `dir`, creating it if needed, and returns the
    /// full path of the written file.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)
            .map_err(|source| ExportError::Write { path: dir.to_path_buf(), source })?;

        let path = dir.join(&self.file_name);
        fs::write(&path, self.csv.as_bytes())
            .map_err(|source| ExportError::Write { path: path.clone(), source })?;
        Ok(path)
    }
}

/// `quotation_<number>.csv`, with path separators in the number replaced so
/// the name always stays a single file name.
pub fn export_file_name(quotation_number: &str) -> String {
    let safe: String = quotation_number
        .trim()
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '-' } else { ch })
        .collect();
    format!("quotation_{safe}.csv")
}

pub fn write_csv<W: io::Write>(rows: &[LineItem], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for row in rows {
        match row {
            LineItem::Section(section) => {
                csv_writer.write_record([
                    row.kind().as_str(),
                    section.description.as_str(),
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                ])?;
            }
            LineItem::Product(product) => {
                let quantity = product.quantity.to_string();
                let stock = product.available_stock().to_string();
                let unit_price = format_money(product.unit_list_price);
                let extended_price = format_money(product.extended_price());
                csv_writer.write_record([
                    row.kind().as_str(),
                    product.description.as_str(),
                    product.ratings.as_str(),
                    product.catalog_number.as_str(),
                    product.make.as_str(),
                    product.material_name.as_str(),
                    quantity.as_str(),
                    stock.as_str(),
                    unit_price.as_str(),
                    extended_price.as_str(),
                ])?;
            }
        }
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn to_csv_string(rows: &[LineItem]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|_| ExportError::Encoding)
}

pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
