use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerDetails;

/// Form metadata captured alongside the line-item table. It travels with the
/// export but is never part of the table itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationDetails {
    pub customer_name: String,
    pub phone: String,
    pub shipping_address: String,
    pub quotation_number: String,
    pub quotation_date: NaiveDate,
    pub delivery_date: NaiveDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsField {
    CustomerName,
    QuotationNumber,
}

impl DetailsField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CustomerName => "customer name",
            Self::QuotationNumber => "quotation number",
        }
    }
}

impl QuotationDetails {
    pub fn starting_on(today: NaiveDate) -> Self {
        Self {
            customer_name: String::new(),
            phone: String::new(),
            shipping_address: String::new(),
            quotation_number: String::new(),
            quotation_date: today,
            delivery_date: today,
        }
    }

    /// Prefills phone and shipping address from a customer record. The
    /// values remain freely editable afterwards.
    pub fn apply_customer(&mut self, customer: &CustomerDetails) {
        self.customer_name = customer.name.clone();
        self.phone = customer.phone.clone();
        self.shipping_address = customer.address.clone();
    }

    /// Presence is the only check metadata gets.
    pub fn missing_fields(&self) -> Vec<DetailsField> {
        let mut missing = Vec::new();
        if self.customer_name.trim().is_empty() {
            missing.push(DetailsField::CustomerName);
        }
        if self.quotation_number.trim().is_empty() {
            missing.push(DetailsField::QuotationNumber);
        }
        missing
    }
}

impl Default for QuotationDetails {
    fn default() -> Self {
        Self::starting_on(Local::now().date_naive())
    }
}
