//! Transaction models: the parsed (not yet validated) record and the
//! validated transaction.

use crate::error::SalesError;
use crate::money::Money;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of pipe-delimited fields in a data row.
pub const FIELD_COUNT: usize = 8;

/// Column names in file order.
pub const HEADER: [&str; FIELD_COUNT] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
];

/// A field as it appeared in the file together with its coerced value.
///
/// `value` is `None` when the text could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub raw: String,
    pub value: Option<T>,
}

impl<T> Coerced<T> {
    pub fn new(raw: impl Into<String>, value: Option<T>) -> Self {
        Coerced {
            raw: raw.into(),
            value,
        }
    }
}

impl Coerced<i64> {
    /// Coerces integer text, ignoring comma thousands separators.
    pub fn integer(raw: &str) -> Self {
        let cleaned = raw.replace(',', "");
        let value = cleaned.trim().parse::<i64>().ok();
        Coerced::new(raw, value)
    }
}

impl Coerced<Money> {
    /// Coerces decimal text, ignoring comma thousands separators.
    pub fn money(raw: &str) -> Self {
        Coerced::new(raw, Money::from_str(raw).ok())
    }
}

/// One data row split into its eight fields.
///
/// Text fields are trimmed; `product_name` has commas replaced by spaces.
/// Nothing about business validity is known yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: Coerced<i64>,
    pub unit_price: Coerced<Money>,
    pub customer_id: String,
    pub region: String,
}

impl ParsedRecord {
    /// Rejoins the raw field text with the pipe delimiter.
    pub fn to_line(&self) -> String {
        [
            self.transaction_id.as_str(),
            self.date.as_str(),
            self.product_id.as_str(),
            self.product_name.as_str(),
            self.quantity.raw.as_str(),
            self.unit_price.raw.as_str(),
            self.customer_id.as_str(),
            self.region.as_str(),
        ]
        .join("|")
    }
}

/// A transaction that passed every validation rule.
///
/// `quantity` and `unit_price` are strictly positive and the three IDs carry
/// their `T`/`P`/`C` prefixes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,

    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "ProductID")]
    pub product_id: String,

    #[serde(rename = "ProductName")]
    pub product_name: String,

    #[serde(rename = "Quantity")]
    pub quantity: i64,

    #[serde(rename = "UnitPrice")]
    pub unit_price: Money,

    #[serde(rename = "CustomerID")]
    pub customer_id: String,

    #[serde(rename = "Region")]
    pub region: String,
}

impl Transaction {
    /// Quantity × unit price, clamped to [`Money::MAX`].
    ///
    /// Transactions from the validator never clamp: records whose amount
    /// overflows are rejected there.
    pub fn amount(&self) -> Money {
        self.unit_price.saturating_times(self.quantity)
    }
}

/// The four sales regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    /// All regions in report order.
    pub const ALL: [Region; 4] = [Region::North, Region::South, Region::East, Region::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
        }
    }
}

impl FromStr for Region {
    type Err = SalesError;

    /// Case-insensitive, ignoring surrounding whitespace.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" => Ok(Region::North),
            "south" => Ok(Region::South),
            "east" => Ok(Region::East),
            "west" => Ok(Region::West),
            _ => Err(SalesError::UnknownRegion(s.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region bucket used by aggregation: one of the known regions, or `Other`
/// for any non-empty region name that is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKey {
    Known(Region),
    Other,
}

impl RegionKey {
    /// Classifies a region name. Returns `None` for an empty name.
    pub fn classify(name: &str) -> Option<Self> {
        if name.trim().is_empty() {
            return None;
        }
        Some(match Region::from_str(name) {
            Ok(region) => RegionKey::Known(region),
            Err(_) => RegionKey::Other,
        })
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKey::Known(region) => region.fmt(f),
            RegionKey::Other => f.write_str("Other"),
        }
    }
}
