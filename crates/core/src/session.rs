use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::customer::CustomerDetails;
use crate::domain::line_item::LineItemField;
use crate::domain::product::{find_by_description, CatalogEntry};
use crate::domain::quote::QuotationDetails;
use crate::errors::DomainError;
use crate::export::{ExportError, QuotationExport};
use crate::pricing::TableTotals;
use crate::table::LineItemTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// User-facing outcome of a session action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn is_warning(&self) -> bool {
        self.level == NoticeLevel::Warning
    }
}

/// State of one quotation form from open to close. Nothing here outlives the
/// session or is shared with another one.
#[derive(Clone, Debug)]
pub struct QuoteSession {
    id: SessionId,
    table: LineItemTable,
    details: QuotationDetails,
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::with_details(QuotationDetails::default())
    }
}

impl QuoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_details(details: QuotationDetails) -> Self {
        let id = SessionId(Uuid::new_v4());
        info!(event_name = "session.started", correlation_id = %id.0, "quotation session started");
        Self { id, table: LineItemTable::new(), details }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn table(&self) -> &LineItemTable {
        &self.table
    }

    pub fn details(&self) -> &QuotationDetails {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut QuotationDetails {
        &mut self.details
    }

    pub fn totals(&self) -> TableTotals {
        self.table.totals()
    }

    pub fn add_section(&mut self, label: &str) -> Notice {
        match self.table.add_section(label) {
            Ok(_) => {
                info!(
                    event_name = "session.section.added",
                    correlation_id = %self.id.0,
                    rows = self.table.len(),
                    "section heading added"
                );
                Notice::success("Section heading added.")
            }
            Err(error) => {
                warn!(
                    event_name = "session.section.rejected",
                    correlation_id = %self.id.0,
                    error = %error,
                    "section heading rejected"
                );
                Notice::warning("Enter section name.")
            }
        }
    }

    pub fn delete_last_section(&mut self) -> Notice {
        match self.table.delete_last_section() {
            Some(removed) => {
                info!(
                    event_name = "session.section.removed",
                    correlation_id = %self.id.0,
                    heading = removed.description(),
                    "last section heading removed"
                );
                Notice::success(format!("Removed {}", removed.description()))
            }
            None => Notice::warning("No section heading to delete."),
        }
    }

    /// Adds the inventory item whose description matches `description`.
    pub fn add_product(&mut self, inventory: &[CatalogEntry], description: &str) -> Notice {
        if inventory.is_empty() {
            warn!(
                event_name = "session.product.inventory_empty",
                correlation_id = %self.id.0,
                "product requested while inventory is empty"
            );
            return Notice::warning("Inventory empty.");
        }

        let Some(entry) = find_by_description(inventory, description.trim()) else {
            return Notice::warning(format!("No inventory item named `{}`.", description.trim()));
        };

        self.table.add_product(entry);
        info!(
            event_name = "session.product.added",
            correlation_id = %self.id.0,
            catalog_number = entry.catalog_number.as_str(),
            grand_total = %self.table.grand_total(),
            "product row added"
        );
        Notice::success(format!("Added {}.", entry.description))
    }

    pub fn delete_selected(&mut self, indices: &[usize]) -> Notice {
        let removed = self.table.delete_rows(indices.iter().copied());
        if removed == 0 {
            return Notice::warning("No rows selected.");
        }

        info!(
            event_name = "session.rows.deleted",
            correlation_id = %self.id.0,
            removed,
            grand_total = %self.table.grand_total(),
            "selected rows deleted"
        );
        Notice::success("Selected rows deleted.")
    }

    /// Edits one cell. `field` may use either the field name or the form's
    /// column caption.
    pub fn edit_cell(&mut self, row: usize, field: &str, raw_value: &str) -> Notice {
        let result = field
            .parse::<LineItemField>()
            .and_then(|field| self.table.update_field(row, field, raw_value));

        match result {
            Ok(()) => {
                info!(
                    event_name = "session.cell.edited",
                    correlation_id = %self.id.0,
                    row,
                    field,
                    grand_total = %self.table.grand_total(),
                    "cell edited"
                );
                Notice::success(format!("Updated row {row}."))
            }
            Err(error) => {
                warn!(
                    event_name = "session.cell.rejected",
                    correlation_id = %self.id.0,
                    row,
                    field,
                    error = %error,
                    "cell edit rejected"
                );
                Notice::warning(edit_rejection_message(&error))
            }
        }
    }

    /// Applies the customer picked from the suggestions. With no record
    /// found the typed name is kept and the contact fields are cleared.
    pub fn select_customer(&mut self, typed_name: &str, found: Option<&CustomerDetails>) -> Notice {
        match found {
            Some(customer) => {
                self.details.apply_customer(customer);
                Notice::info(format!("Loaded details for {}.", customer.name))
            }
            None => {
                self.details.customer_name = typed_name.trim().to_string();
                self.details.phone.clear();
                self.details.shipping_address.clear();
                Notice::info(format!("No saved details for {}.", typed_name.trim()))
            }
        }
    }

    /// Renders the export. Missing metadata is reported but never blocks it.
    pub fn export(&self) -> Result<(QuotationExport, Vec<Notice>), ExportError> {
        let export = QuotationExport::build(&self.table, &self.details)?;
        let notices = self
            .details
            .missing_fields()
            .into_iter()
            .map(|field| Notice::warning(format!("The {} is empty.", field.label())))
            .collect();

        info!(
            event_name = "session.exported",
            correlation_id = %self.id.0,
            file_name = export.file_name.as_str(),
            rows = self.table.len(),
            grand_total = %export.grand_total,
            "quotation exported"
        );
        Ok((export, notices))
    }
}

fn edit_rejection_message(error: &DomainError) -> String {
    match error {
        DomainError::FieldNotEditable { .. } => format!("{error}."),
        DomainError::RowOutOfRange { index, .. } => format!("Row {index} does not exist."),
        DomainError::UnknownField(name) => format!("Unknown column `{name}`."),
        DomainError::EmptySectionLabel => "Enter section name.".to_string(),
    }
}
