pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod pricing;
pub mod session;
pub mod table;

pub use domain::customer::CustomerDetails;
pub use domain::line_item::{LineItem, LineItemField, LineItemId, LineItemKind, ProductLine};
pub use domain::product::CatalogEntry;
pub use domain::quote::QuotationDetails;
pub use errors::{ApplicationError, DomainError};
pub use export::{ExportError, QuotationExport};
pub use pricing::TableTotals;
pub use session::{Notice, NoticeLevel, QuoteSession};
pub use table::LineItemTable;
