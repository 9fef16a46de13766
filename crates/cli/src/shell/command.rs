use chrono::NaiveDate;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  customer <name prefix>      suggest saved customers and set the customer name
  pick <n>                    use suggestion n and prefill phone and address
  phone <text>                set the phone number
  address <text>              set the shipping address
  number <text>               set the quotation number
  date <YYYY-MM-DD>           set the quotation date
  delivery <YYYY-MM-DD>       set the delivery date
  section <label>             add a section heading
  drop-section                delete the last section heading
  product <description>       add an inventory item
  qty <row> <value>           set the quantity of a product row
  set <row> <field> <value>   edit a cell (description, ratings, catno, make, material, qty, price)
  delete <row> [row ...]      delete the selected rows
  show                        print the line items
  inventory                   list inventory descriptions
  export                      write the quotation CSV
  help                        print this help
  quit                        close the session";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Customer(String),
    Pick(usize),
    Phone(String),
    Address(String),
    Number(String),
    Date(NaiveDate),
    Delivery(NaiveDate),
    Section(String),
    DropSection,
    Product(String),
    Quantity { row: usize, value: String },
    Set { row: usize, field: String, value: String },
    Delete(Vec<usize>),
    Show,
    Inventory,
    Export,
    Help,
    Quit,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command `{0}`. Type `help` for the command list.")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not a row number.")]
    InvalidRow(String),
    #[error("`{0}` is not a date; use YYYY-MM-DD.")]
    InvalidDate(String),
}

impl ShellCommand {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "customer" => Self::Customer(rest.to_string()),
            "pick" => Self::Pick(parse_row(required(rest, "pick <n>")?)?),
            "phone" => Self::Phone(rest.to_string()),
            "address" => Self::Address(rest.to_string()),
            "number" => Self::Number(rest.to_string()),
            "date" => Self::Date(parse_date(required(rest, "date <YYYY-MM-DD>")?)?),
            "delivery" => Self::Delivery(parse_date(required(rest, "delivery <YYYY-MM-DD>")?)?),
            // The label may be blank; the session rejects it with a warning.
            "section" => Self::Section(rest.to_string()),
            "drop-section" => Self::DropSection,
            "product" => Self::Product(required(rest, "product <description>")?.to_string()),
            "qty" => {
                let (row, value) = split_first(rest).ok_or(ParseError::Usage("qty <row> <value>"))?;
                Self::Quantity { row: parse_row(row)?, value: value.to_string() }
            }
            "set" => {
                let usage = ParseError::Usage("set <row> <field> <value>");
                let (row, rest) = split_first(rest).ok_or(usage.clone())?;
                let (field, value) = match split_first(rest) {
                    Some((field, value)) => (field, value),
                    None if !rest.is_empty() => (rest, ""),
                    None => return Err(usage),
                };
                Self::Set { row: parse_row(row)?, field: field.to_string(), value: value.to_string() }
            }
            "delete" => Self::Delete(
                rest.split(|ch: char| ch.is_whitespace() || ch == ',')
                    .filter(|token| !token.is_empty())
                    .map(parse_row)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            "show" => Self::Show,
            "inventory" => Self::Inventory,
            "export" => Self::Export,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(rest)
    }
}

fn split_first(rest: &str) -> Option<(&str, &str)> {
    rest.split_once(char::is_whitespace).map(|(head, tail)| (head, tail.trim()))
}

fn parse_row(raw: &str) -> Result<usize, ParseError> {
    raw.trim().parse::<usize>().map_err(|_| ParseError::InvalidRow(raw.trim().to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{ParseError, ShellCommand};

    fn parse(line: &str) -> ShellCommand {
        ShellCommand::parse(line).expect("parse").expect("command")
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(ShellCommand::parse("   "), Ok(None));
        assert_eq!(ShellCommand::parse("# lighting block"), Ok(None));
    }

    #[test]
    fn free_text_arguments_keep_inner_spaces() {
        assert_eq!(
            parse("product Copper Cable 2.5 sq mm"),
            ShellCommand::Product("Copper Cable 2.5 sq mm".to_string())
        );
        assert_eq!(
            parse("address 12 Foundry Lane, Pune"),
            ShellCommand::Address("12 Foundry Lane, Pune".to_string())
        );
        assert_eq!(parse("section"), ShellCommand::Section(String::new()));
    }

    #[test]
    fn cell_edits_split_row_field_and_value() {
        assert_eq!(parse("qty 1 3"), ShellCommand::Quantity { row: 1, value: "3".to_string() });
        assert_eq!(
            parse("set 2 description Warm White Bulb"),
            ShellCommand::Set {
                row: 2,
                field: "description".to_string(),
                value: "Warm White Bulb".to_string()
            }
        );
        assert_eq!(
            parse("set 2 ratings"),
            ShellCommand::Set { row: 2, field: "ratings".to_string(), value: String::new() }
        );
    }

    #[test]
    fn delete_accepts_spaces_or_commas() {
        assert_eq!(parse("delete 1, 3"), ShellCommand::Delete(vec![1, 3]));
        assert_eq!(parse("delete"), ShellCommand::Delete(Vec::new()));
        assert_eq!(
            ShellCommand::parse("delete one"),
            Err(ParseError::InvalidRow("one".to_string()))
        );
    }

    #[test]
    fn dates_use_iso_format() {
        assert_eq!(
            parse("delivery 2026-03-15"),
            ShellCommand::Delivery(NaiveDate::from_ymd_opt(2026, 3, 15).expect("date"))
        );
        assert_eq!(
            ShellCommand::parse("date 15/03/2026"),
            Err(ParseError::InvalidDate("15/03/2026".to_string()))
        );
    }

    #[test]
    fn unknown_verbs_and_missing_arguments_are_reported() {
        assert_eq!(
            ShellCommand::parse("discount 5"),
            Err(ParseError::UnknownCommand("discount".to_string()))
        );
        assert_eq!(ShellCommand::parse("qty 1"), Err(ParseError::Usage("qty <row> <value>")));
        assert_eq!(parse("QUIT"), ShellCommand::Quit);
    }
}
