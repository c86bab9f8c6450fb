//! Record parser: turns raw pipe-joined rows into [`ParsedRecord`]s.
//!
//! Lines with the wrong number of fields and lines whose quantity or unit
//! price is not numeric are discarded. Neither is an error for the caller;
//! both are counted in the returned [`ParseOutput`].

use crate::transaction::{Coerced, ParsedRecord, FIELD_COUNT};
use log::{debug, warn};

/// Parsed records plus counts of the lines that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    pub records: Vec<ParsedRecord>,

    /// Lines that did not split into exactly eight fields.
    pub malformed: usize,

    /// Lines whose quantity or unit price could not be coerced.
    pub non_numeric: usize,
}

impl ParseOutput {
    /// Total number of discarded lines.
    pub fn skipped(&self) -> usize {
        self.malformed + self.non_numeric
    }
}

/// Why a single line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// Wrong field count (the count found).
    FieldCount(usize),
    NonNumeric,
}

/// Parses every line, preserving input order.
pub fn parse_transactions<S: AsRef<str>>(lines: &[S]) -> ParseOutput {
    let mut output = ParseOutput::default();

    for (idx, line) in lines.iter().enumerate() {
        let row_num = idx + 2; // 1-indexed, accounting for header row

        match parse_line(line.as_ref()) {
            Ok(record) => output.records.push(record),
            Err(LineError::FieldCount(found)) => {
                warn!(
                    "Row {}: expected {} fields, found {}, skipping",
                    row_num, FIELD_COUNT, found
                );
                output.malformed += 1;
            }
            Err(LineError::NonNumeric) => {
                debug!("Row {}: non-numeric quantity or unit price, skipping", row_num);
                output.non_numeric += 1;
            }
        }
    }

    output
}

/// Parses one raw line.
pub fn parse_line(line: &str) -> Result<ParsedRecord, LineError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [transaction_id, date, product_id, product_name, quantity, unit_price, customer_id, region] =
        fields.as_slice()
    else {
        return Err(LineError::FieldCount(fields.len()));
    };

    let quantity = Coerced::integer(quantity);
    let unit_price = Coerced::money(unit_price);
    if quantity.value.is_none() || unit_price.value.is_none() {
        return Err(LineError::NonNumeric);
    }

    Ok(ParsedRecord {
        transaction_id: transaction_id.to_string(),
        date: date.to_string(),
        product_id: product_id.to_string(),
        product_name: product_name.replace(',', " ").trim().to_string(),
        quantity,
        unit_price,
        customer_id: customer_id.to_string(),
        region: region.to_string(),
    })
}
