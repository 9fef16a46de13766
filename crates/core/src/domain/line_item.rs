use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::CatalogEntry;
use crate::errors::DomainError;

pub const SECTION_DELIMITER: &str = "---";

/// Identity assigned when a row is created. Deletion resolves positions to
/// these before removing anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItemId(pub Uuid);

impl LineItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItemKind {
    Section,
    Product,
}

impl LineItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "SECTION",
            Self::Product => "PRODUCT",
        }
    }
}

impl fmt::Display for LineItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionHeading {
    pub id: LineItemId,
    pub description: String,
}

impl SectionHeading {
    /// Builds a heading from raw user input. Blank labels are rejected.
    pub fn from_label(label: &str) -> Result<Self, DomainError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptySectionLabel);
        }

        Ok(Self { id: LineItemId::new(), description: decorate_heading(trimmed) })
    }
}

pub fn decorate_heading(label: &str) -> String {
    format!("{SECTION_DELIMITER} {} {SECTION_DELIMITER}", label.trim().to_uppercase())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductLine {
    pub id: LineItemId,
    pub description: String,
    pub ratings: String,
    pub catalog_number: String,
    pub make: String,
    pub material_name: String,
    pub quantity: u32,
    available_stock: u32,
    pub unit_list_price: Decimal,
    extended_price: Decimal,
}

impl ProductLine {
    pub fn from_catalog(entry: &CatalogEntry) -> Self {
        Self {
            id: LineItemId::new(),
            description: entry.description.clone(),
            ratings: entry.ratings.clone(),
            catalog_number: entry.catalog_number.clone(),
            make: entry.make.clone(),
            material_name: entry.material_name.clone(),
            quantity: 1,
            available_stock: entry.available_stock,
            unit_list_price: entry.unit_list_price,
            extended_price: entry.unit_list_price,
        }
    }

    pub fn available_stock(&self) -> u32 {
        self.available_stock
    }

    pub fn extended_price(&self) -> Decimal {
        self.extended_price
    }

    /// An extended price outside `Decimal` range coerces to 0, like any other
    /// unusable number.
    pub(crate) fn reprice(&mut self) -> Decimal {
        self.extended_price =
            Decimal::from(self.quantity).checked_mul(self.unit_list_price).unwrap_or(Decimal::ZERO);
        self.extended_price
    }
}

/// One row of the quotation table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItem {
    Section(SectionHeading),
    Product(ProductLine),
}

impl LineItem {
    pub fn id(&self) -> LineItemId {
        match self {
            Self::Section(section) => section.id,
            Self::Product(product) => product.id,
        }
    }

    pub fn kind(&self) -> LineItemKind {
        match self {
            Self::Section(_) => LineItemKind::Section,
            Self::Product(_) => LineItemKind::Product,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Section(section) => &section.description,
            Self::Product(product) => &product.description,
        }
    }

    pub fn as_product(&self) -> Option<&ProductLine> {
        match self {
            Self::Product(product) => Some(product),
            Self::Section(_) => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }
}

/// Editable and read-only columns of a product line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemField {
    Description,
    Ratings,
    CatalogNumber,
    Make,
    MaterialName,
    Quantity,
    AvailableStock,
    UnitListPrice,
    ExtendedPrice,
}

impl LineItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Ratings => "ratings",
            Self::CatalogNumber => "catalog_number",
            Self::Make => "make",
            Self::MaterialName => "material_name",
            Self::Quantity => "quantity",
            Self::AvailableStock => "available_stock",
            Self::UnitListPrice => "unit_list_price",
            Self::ExtendedPrice => "extended_price",
        }
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::AvailableStock | Self::ExtendedPrice)
    }
}

impl fmt::Display for LineItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineItemField {
    type Err = DomainError;

    // Accepts snake_case, camelCase and the form's column captions
    // ("Qty", "Cat No", "ListPrice", "LP Gross Price", ...).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "description" => Ok(Self::Description),
            "ratings" | "rating" => Ok(Self::Ratings),
            "catalognumber" | "catno" => Ok(Self::CatalogNumber),
            "make" => Ok(Self::Make),
            "materialname" | "material" => Ok(Self::MaterialName),
            "quantity" | "qty" => Ok(Self::Quantity),
            "availablestock" | "totalquantity" | "stock" => Ok(Self::AvailableStock),
            "unitlistprice" | "listprice" | "price" => Ok(Self::UnitListPrice),
            "extendedprice" | "lpgrossprice" => Ok(Self::ExtendedPrice),
            _ => Err(DomainError::UnknownField(value.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::CatalogEntry;
    use crate::errors::DomainError;

    use super::{decorate_heading, LineItemField, ProductLine, SectionHeading};

    #[test]
    fn heading_is_trimmed_uppercased_and_wrapped() {
        assert_eq!(decorate_heading("  Lighting "), "--- LIGHTING ---");
        let section = SectionHeading::from_label("control panels").expect("valid label");
        assert_eq!(section.description, "--- CONTROL PANELS ---");
    }

    #[test]
    fn blank_heading_is_rejected() {
        assert_eq!(SectionHeading::from_label("   "), Err(DomainError::EmptySectionLabel));
    }

    #[test]
    fn product_line_starts_at_quantity_one() {
        let entry = CatalogEntry::new("Bulb", Decimal::new(1250, 2)).with_stock(7);
        let line = ProductLine::from_catalog(&entry);

        assert_eq!(line.quantity, 1);
        assert_eq!(line.available_stock(), 7);
        assert_eq!(line.extended_price(), Decimal::new(1250, 2));
    }

    #[test]
    fn field_names_accept_form_captions() {
        assert_eq!("Qty".parse::<LineItemField>(), Ok(LineItemField::Quantity));
        assert_eq!("Cat No".parse::<LineItemField>(), Ok(LineItemField::CatalogNumber));
        assert_eq!("unitListPrice".parse::<LineItemField>(), Ok(LineItemField::UnitListPrice));
        assert_eq!("LP Gross Price".parse::<LineItemField>(), Ok(LineItemField::ExtendedPrice));
        assert!(matches!(
            "discount".parse::<LineItemField>(),
            Err(DomainError::UnknownField(ref name)) if name == "discount"
        ));
    }

    #[test]
    fn derived_and_catalog_sourced_fields_are_read_only() {
        assert!(!LineItemField::ExtendedPrice.is_editable());
        assert!(!LineItemField::AvailableStock.is_editable());
        assert!(LineItemField::Quantity.is_editable());
    }
}
