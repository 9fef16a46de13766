//! Line-oriented quotation editor. One command per line; each command runs
//! to completion, lookups included, before the next line is read.

pub mod command;
pub mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tokio::runtime::Runtime;
use tracing::{debug, error};

use quotation_core::config::AppConfig;
use quotation_core::export::format_money;
use quotation_core::{ApplicationError, CatalogEntry, Notice, QuoteSession};
use quotation_db::repositories::{CustomerRepository, InventoryRepository};
use quotation_db::{CatalogLookup, LookupOutcome};

pub use command::{ParseError, ShellCommand, HELP};

#[derive(Clone, Debug)]
pub struct ShellOptions {
    pub currency_symbol: String,
    pub export_dir: PathBuf,
    /// Repeat each input line in the transcript, for script runs.
    pub echo_commands: bool,
}

impl ShellOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            currency_symbol: config.quotation.currency_symbol.clone(),
            export_dir: config.quotation.export_dir.clone(),
            echo_commands: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShellSummary {
    pub commands: usize,
    pub warnings: usize,
    pub exports: Vec<PathBuf>,
    /// Cleared again by a later successful export.
    pub export_error: Option<ApplicationError>,
}

pub struct Shell<'rt, I, C> {
    runtime: &'rt Runtime,
    lookup: CatalogLookup<I, C>,
    session: QuoteSession,
    options: ShellOptions,
    suggestions: Vec<String>,
    summary: ShellSummary,
}

impl<'rt, I, C> Shell<'rt, I, C>
where
    I: InventoryRepository,
    C: CustomerRepository,
{
    pub fn new(
        runtime: &'rt Runtime,
        lookup: CatalogLookup<I, C>,
        session: QuoteSession,
        options: ShellOptions,
    ) -> Self {
        Self {
            runtime,
            lookup,
            session,
            options,
            suggestions: Vec::new(),
            summary: ShellSummary::default(),
        }
    }

    pub fn session(&self) -> &QuoteSession {
        &self.session
    }

    pub fn summary(&self) -> &ShellSummary {
        &self.summary
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if self.options.echo_commands && !line.trim().is_empty() {
                writeln!(output, "> {}", line.trim())?;
            }

            let (lines, flow) = match ShellCommand::parse(&line) {
                Ok(Some(command)) => self.execute(command),
                Ok(None) => continue,
                Err(error) => {
                    self.summary.warnings += 1;
                    (vec![render::notice_line(&Notice::warning(error.to_string()))], Flow::Continue)
                }
            };

            for rendered in lines {
                writeln!(output, "{rendered}")?;
            }
            output.flush()?;

            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, command: ShellCommand) -> (Vec<String>, Flow) {
        self.summary.commands += 1;
        debug!(
            event_name = "shell.command.received",
            correlation_id = %self.session.id().0,
            command = ?command,
            "shell command received"
        );

        let mut lines = Vec::new();
        let mut show_total = true;

        match command {
            ShellCommand::Customer(typed) => self.suggest_customers(&typed, &mut lines),
            ShellCommand::Pick(index) => self.pick_customer(index, &mut lines),
            ShellCommand::Phone(phone) => {
                self.session.details_mut().phone = phone;
                self.push_notice(&mut lines, Notice::info("Phone number set."));
            }
            ShellCommand::Address(address) => {
                self.session.details_mut().shipping_address = address;
                self.push_notice(&mut lines, Notice::info("Shipping address set."));
            }
            ShellCommand::Number(number) => {
                self.session.details_mut().quotation_number = number;
                self.push_notice(&mut lines, Notice::info("Quotation number set."));
            }
            ShellCommand::Date(date) => {
                self.session.details_mut().quotation_date = date;
                self.push_notice(&mut lines, Notice::info(format!("Quotation date set to {date}.")));
            }
            ShellCommand::Delivery(date) => {
                self.session.details_mut().delivery_date = date;
                self.push_notice(&mut lines, Notice::info(format!("Delivery date set to {date}.")));
            }
            ShellCommand::Section(label) => {
                let notice = self.session.add_section(&label);
                self.push_notice(&mut lines, notice);
            }
            ShellCommand::DropSection => {
                let notice = self.session.delete_last_section();
                self.push_notice(&mut lines, notice);
            }
            ShellCommand::Product(description) => {
                let inventory = self.inventory(&mut lines);
                let notice = self.session.add_product(&inventory, &description);
                self.push_notice(&mut lines, notice);
            }
            ShellCommand::Quantity { row, value } => {
                let notice = self.session.edit_cell(row, "quantity", &value);
                self.push_notice(&mut lines, notice);
            }
            ShellCommand::Set { row, field, value } => {
                let notice = self.session.edit_cell(row, &field, &value);
                self.push_notice(&mut lines, notice);
            }
            ShellCommand::Delete(rows) => {
                let notice = self.session.delete_selected(&rows);
                self.push_notice(&mut lines, notice);
            }
            ShellCommand::Show => {
                lines.extend(render::details_lines(self.session.details()));
                lines.extend(render::table_lines(
                    self.session.table(),
                    &self.options.currency_symbol,
                ));
                show_total = false;
            }
            ShellCommand::Inventory => {
                let inventory = self.inventory(&mut lines);
                if inventory.is_empty() {
                    self.push_notice(&mut lines, Notice::warning("Inventory empty."));
                }
                for entry in &inventory {
                    lines.push(format!(
                        "  {} | {} | {} | stock {} | {}",
                        entry.description,
                        entry.catalog_number,
                        entry.make,
                        entry.available_stock,
                        format_money(entry.unit_list_price)
                    ));
                }
                show_total = false;
            }
            ShellCommand::Export => self.export(&mut lines),
            ShellCommand::Help => {
                lines.extend(HELP.lines().map(str::to_string));
                show_total = false;
            }
            ShellCommand::Quit => return (lines, Flow::Quit),
        }

        if show_total {
            lines.push(render::grand_total_line(
                self.session.table(),
                &self.options.currency_symbol,
            ));
        }
        (lines, Flow::Continue)
    }

    fn suggest_customers(&mut self, typed: &str, lines: &mut Vec<String>) {
        self.session.details_mut().customer_name = typed.trim().to_string();
        let outcome = self.runtime.block_on(self.lookup.find_customers_by_prefix(typed));
        self.surface_failure(&outcome, lines);

        self.suggestions = outcome.into_value();
        if self.suggestions.is_empty() {
            self.push_notice(lines, Notice::info("No matching customers."));
            return;
        }
        lines.extend(
            self.suggestions.iter().enumerate().map(|(index, name)| format!("  [{index}] {name}")),
        );
    }

    fn pick_customer(&mut self, index: usize, lines: &mut Vec<String>) {
        let Some(name) = self.suggestions.get(index).cloned() else {
            self.push_notice(lines, Notice::warning(format!("No suggestion {index}.")));
            return;
        };

        let outcome = self.runtime.block_on(self.lookup.customer_details(&name));
        self.surface_failure(&outcome, lines);

        let notice = self.session.select_customer(&name, outcome.value.as_ref());
        self.push_notice(lines, notice);
        lines.extend(render::details_lines(self.session.details()));
    }

    fn inventory(&mut self, lines: &mut Vec<String>) -> Vec<CatalogEntry> {
        let outcome = self.runtime.block_on(self.lookup.list_inventory());
        self.surface_failure(&outcome, lines);
        outcome.into_value()
    }

    fn export(&mut self, lines: &mut Vec<String>) {
        let (export, notices) = match self.session.export() {
            Ok(built) => built,
            Err(error) => return self.export_failed(error.into(), lines),
        };
        for notice in notices {
            self.push_notice(lines, notice);
        }

        match export.write_to_dir(&self.options.export_dir) {
            Ok(path) => {
                self.push_notice(lines, Notice::success(format!("Exported {}", path.display())));
                self.summary.exports.push(path);
                self.summary.export_error = None;
            }
            Err(error) => self.export_failed(error.into(), lines),
        }
    }

    fn export_failed(&mut self, failure: ApplicationError, lines: &mut Vec<String>) {
        error!(
            event_name = "shell.export.failed",
            correlation_id = %self.session.id().0,
            error = %failure,
            "quotation export failed"
        );
        self.push_notice(lines, Notice::warning(format!("Export failed: {failure}")));
        self.summary.export_error = Some(failure);
    }

    fn surface_failure<T>(&mut self, outcome: &LookupOutcome<T>, lines: &mut Vec<String>) {
        if let Some(failure) = &outcome.failure {
            self.push_notice(lines, Notice::warning(failure.clone()));
        }
    }

    fn push_notice(&mut self, lines: &mut Vec<String>, notice: Notice) {
        if notice.is_warning() {
            self.summary.warnings += 1;
        }
        lines.push(render::notice_line(&notice));
    }
}
