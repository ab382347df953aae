use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger::Ledger;
use super::{format_date, parse_date, HarvestError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
}

/// Total harvested kg per day, oldest first. A single unparseable date fails the whole series.
pub fn daily_totals(ledger: &Ledger) -> Result<Vec<DailyTotal>, HarvestError> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for entry in ledger.entries() {
        let date = parse_date(&entry.date)?;
        let total = totals.entry(date).or_default();
        *total = total
            .checked_add(entry.quantity_kg)
            .ok_or_else(|| HarvestError::QuantityOverflow(format_date(date)))?;
    }

    Ok(totals
        .into_iter()
        .map(|(date, quantity_kg)| DailyTotal { date, quantity_kg })
        .collect())
}
