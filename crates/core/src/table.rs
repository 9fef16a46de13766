use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::line_item::{
    LineItem, LineItemField, LineItemId, LineItemKind, ProductLine, SectionHeading,
};
use crate::domain::product::CatalogEntry;
use crate::errors::DomainError;
use crate::pricing::{coerce_price, coerce_quantity, recompute, TableTotals};

/// Ordered quotation rows. Every mutation reprices the table before
/// returning, so `totals()` is always current.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LineItemTable {
    rows: Vec<LineItem>,
    totals: TableTotals,
}

impl LineItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn totals(&self) -> TableTotals {
        self.totals
    }

    pub fn grand_total(&self) -> Decimal {
        self.totals.grand_total
    }

    pub fn add_section(&mut self, label: &str) -> Result<LineItemId, DomainError> {
        let section = SectionHeading::from_label(label)?;
        let id = section.id;
        self.rows.push(LineItem::Section(section));
        self.recompute();
        Ok(id)
    }

    pub fn add_product(&mut self, entry: &CatalogEntry) -> LineItemId {
        let line = ProductLine::from_catalog(entry);
        let id = line.id;
        self.rows.push(LineItem::Product(line));
        self.recompute();
        id
    }

    /// Removes the section heading nearest the end of the table, if any.
    pub fn delete_last_section(&mut self) -> Option<LineItem> {
        let position = self.rows.iter().rposition(LineItem::is_section)?;
        let removed = self.rows.remove(position);
        self.recompute();
        Some(removed)
    }

    /// Deletes rows by their positions at call time. Positions are resolved
    /// to row identities first, so the order they arrive in never matters.
    /// Unknown positions are ignored.
    pub fn delete_rows<I>(&mut self, indices: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let ids: HashSet<LineItemId> = indices
            .into_iter()
            .filter_map(|index| self.rows.get(index).map(LineItem::id))
            .collect();

        self.delete_rows_by_id(&ids)
    }

    pub fn delete_rows_by_id(&mut self, ids: &HashSet<LineItemId>) -> usize {
        if ids.is_empty() {
            return 0;
        }

        let before = self.rows.len();
        self.rows.retain(|row| !ids.contains(&row.id()));
        let removed = before - self.rows.len();
        if removed > 0 {
            self.recompute();
        }
        removed
    }

    /// Applies a cell edit. Section rows reject every field; product rows
    /// reject the catalog-sourced stock and the derived extended price.
    pub fn update_field(
        &mut self,
        index: usize,
        field: LineItemField,
        raw_value: &str,
    ) -> Result<(), DomainError> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or(DomainError::RowOutOfRange { index, len })?;

        let product = match row {
            LineItem::Product(product) => product,
            LineItem::Section(_) => {
                return Err(DomainError::FieldNotEditable { field, kind: LineItemKind::Section })
            }
        };

        match field {
            LineItemField::Description => product.description = raw_value.to_string(),
            LineItemField::Ratings => product.ratings = raw_value.to_string(),
            LineItemField::CatalogNumber => product.catalog_number = raw_value.to_string(),
            LineItemField::Make => product.make = raw_value.to_string(),
            LineItemField::MaterialName => product.material_name = raw_value.to_string(),
            LineItemField::Quantity => product.quantity = coerce_quantity(raw_value),
            LineItemField::UnitListPrice => product.unit_list_price = coerce_price(raw_value),
            LineItemField::AvailableStock | LineItemField::ExtendedPrice => {
                return Err(DomainError::FieldNotEditable { field, kind: LineItemKind::Product })
            }
        }

        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.totals = recompute(&mut self.rows);
    }
}
