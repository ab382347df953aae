use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::data::HarvestEntry;

use super::registry::Registry;
use super::{format_date, parse_date, HarvestError, WEEKDAY_FORMAT};

/// One delivery as typed in, before it is stamped with a date and a harvester id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub name: String,
    pub quantity_kg: Decimal,
    pub sacks: u32,
}

impl NewEntry {
    pub fn new(name: impl Into<String>, quantity_kg: Decimal, sacks: u32) -> NewEntry {
        NewEntry {
            name: name.into(),
            quantity_kg,
            sacks,
        }
    }
}

/// Append-only log of harvest entries.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<HarvestEntry>,
}

impl Ledger {
    pub fn new(entries: Vec<HarvestEntry>) -> Ledger {
        Ledger { entries }
    }

    /// Appends an entry for a registered harvester, stamped with `date` and its weekday.
    /// Unknown names leave the ledger untouched.
    pub fn record(
        &mut self,
        registry: &Registry,
        entry: &NewEntry,
        date: NaiveDate,
    ) -> Result<&HarvestEntry, HarvestError> {
        let harvester = registry
            .lookup(&entry.name)
            .ok_or_else(|| HarvestError::HarvesterNotFound(entry.name.clone()))?;

        self.entries.push(HarvestEntry {
            name: harvester.name.clone(),
            id: harvester.id,
            date: format_date(date),
            day: date.format(WEEKDAY_FORMAT).to_string(),
            quantity_kg: entry.quantity_kg,
            sacks: entry.sacks,
        });

        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[HarvestEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HarvestEntry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries_on<'a>(&'a self, date: &'a str) -> impl Iterator<Item = &'a HarvestEntry> + 'a {
        self.entries.iter().filter(move |e| e.date == date)
    }

    /// Every date present in the ledger, once, oldest first.
    /// Dates that don't parse as DD-MM-YY sort after the rest, alphabetically.
    pub fn distinct_dates(&self) -> Vec<String> {
        let dates: BTreeSet<(Option<NaiveDate>, &str)> = self
            .entries
            .iter()
            .map(|e| (parse_date(&e.date).ok(), e.date.as_str()))
            .collect();

        let (parsed, unparsed): (Vec<_>, Vec<_>) = dates.into_iter().partition(|(date, _)| date.is_some());

        parsed
            .into_iter()
            .chain(unparsed)
            .map(|(_, date)| date.to_string())
            .collect()
    }
}
