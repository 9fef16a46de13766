use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of one inventory item, used to seed a product line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub description: String,
    pub ratings: String,
    pub catalog_number: String,
    pub make: String,
    pub material_name: String,
    pub available_stock: u32,
    pub unit_list_price: Decimal,
    /// Informational only; never copied onto a quotation line.
    pub discount_pct: Decimal,
}

impl CatalogEntry {
    pub fn new(description: impl Into<String>, unit_list_price: Decimal) -> Self {
        Self {
            description: description.into(),
            ratings: String::new(),
            catalog_number: String::new(),
            make: String::new(),
            material_name: String::new(),
            available_stock: 0,
            unit_list_price,
            discount_pct: Decimal::ZERO,
        }
    }

    pub fn with_stock(mut self, available_stock: u32) -> Self {
        self.available_stock = available_stock;
        self
    }
}

/// First entry whose description matches exactly, mirroring how the form
/// resolves a product picked from the inventory dropdown.
pub fn find_by_description<'a>(
    inventory: &'a [CatalogEntry],
    description: &str,
) -> Option<&'a CatalogEntry> {
    inventory.iter().find(|entry| entry.description == description)
}
