use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

pub mod ledger;
pub mod registry;
pub mod summary;
pub mod trend;


/// Format of the `date` column, e.g. `01-05-25`.
pub const DATE_FORMAT: &str = "%d-%m-%y";
/// Format of the `day` column, e.g. `Thursday`.
pub const WEEKDAY_FORMAT: &str = "%A";
/// Estimated weight of one empty sack, in kg.
pub const TARE_PER_SACK_KG: Decimal = dec!(0.2);

#[derive(Debug, PartialEq, Error)]
pub enum HarvestError {
    #[error("Harvester '{0}' already exists.")]
    DuplicateHarvester(String),
    #[error("Harvester '{0}' not found, Add them first.")]
    HarvesterNotFound(String),
    #[error("Harvester name cannot be empty.")]
    EmptyName,
    #[error("Invalid quantity '{0}'. Please enter a non-negative number.")]
    InvalidQuantity(String),
    #[error("Invalid number of sacks '{0}'. Please enter a whole number.")]
    InvalidSacks(String),
    #[error("Please enter a number.")]
    NotANumber(String),
    #[error("Invalid choice.")]
    InvalidChoice(i64),
    #[error("No harvest record found.")]
    NoHarvestRecord,
    #[error("No harvest data available.")]
    NoHarvestData,
    #[error("Harvest file is empty.")]
    EmptyHarvestData,
    #[error("No harvest data for {0}.")]
    NoEntriesForDate(String),
    #[error("Error parsing dates: '{0}' does not match DD-MM-YY")]
    InvalidDate(String),
    #[error("Harvest total for {0} is too large to compute.")]
    QuantityOverflow(String),
}

/// Trims and title-cases a name: the first letter of every run of letters is
/// upper case, the rest lower case (`"o'NEIL  smith"` becomes `"O'Neil  Smith"`).
pub fn normalize_name(raw: &str) -> String {
    let mut previous_is_letter = false;
    let mut normalized = String::with_capacity(raw.len());

    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                normalized.extend(c.to_lowercase());
            } else {
                normalized.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            normalized.push(c);
            previous_is_letter = false;
        }
    }

    normalized
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(date: &str) -> Result<NaiveDate, HarvestError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| HarvestError::InvalidDate(date.to_string()))
}

/// A typed quantity in kg; must be a non-negative decimal.
pub fn parse_quantity(input: &str) -> Result<Decimal, HarvestError> {
    match input.trim().parse::<Decimal>() {
        Ok(quantity) if quantity >= Decimal::ZERO => Ok(quantity),
        _ => Err(HarvestError::InvalidQuantity(input.trim().to_string())),
    }
}

pub fn parse_sacks(input: &str) -> Result<u32, HarvestError> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| HarvestError::InvalidSacks(input.trim().to_string()))
}
