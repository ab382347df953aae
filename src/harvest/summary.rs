use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use getset::Getters;
use rust_decimal::Decimal;

use prettytable::{row, Table};

use crate::report::clean_table;

use super::ledger::Ledger;
use super::{format_date, HarvestError, TARE_PER_SACK_KG};

/// One harvester's share of a day.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct HarvesterTotals {
    id: u32,
    name: String,
    quantity_kg: Decimal,
    sacks: u64,
}

#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct DailySummary {
    date: String,
    total_sacks: u64,
    total_tare_weight: Decimal,
    total_net_weight_kg: Decimal,
    total_gross_weight_kg: Decimal,
    num_harvesters: usize,
    /// Sorted by `(id, name)`.
    breakdown: Vec<HarvesterTotals>,
}

impl DailySummary {
    pub fn for_date(ledger: &Ledger, date: &str) -> Result<DailySummary, HarvestError> {
        let mut total_sacks = 0u64;
        let mut total_net_weight_kg = Decimal::ZERO;
        let mut names = BTreeSet::new();
        let mut groups: BTreeMap<(u32, &str), (Decimal, u64)> = BTreeMap::new();

        let overflow = || HarvestError::QuantityOverflow(date.to_string());

        for entry in ledger.entries_on(date) {
            total_sacks += u64::from(entry.sacks);
            total_net_weight_kg = total_net_weight_kg.checked_add(entry.quantity_kg).ok_or_else(overflow)?;
            names.insert(entry.name.as_str());

            let group = groups.entry((entry.id, entry.name.as_str())).or_default();
            group.0 = group.0.checked_add(entry.quantity_kg).ok_or_else(overflow)?;
            group.1 += u64::from(entry.sacks);
        }

        if groups.is_empty() {
            return Err(HarvestError::NoEntriesForDate(date.to_string()));
        }

        let total_tare_weight = Decimal::from(total_sacks)
            .checked_mul(TARE_PER_SACK_KG)
            .ok_or_else(overflow)?;
        let total_gross_weight_kg = total_net_weight_kg.checked_add(total_tare_weight).ok_or_else(overflow)?;

        Ok(DailySummary {
            date: date.to_string(),
            total_sacks,
            total_tare_weight,
            total_net_weight_kg,
            total_gross_weight_kg,
            num_harvesters: names.len(),
            breakdown: groups
                .into_iter()
                .map(|((id, name), (quantity_kg, sacks))| HarvesterTotals {
                    id,
                    name: name.to_string(),
                    quantity_kg,
                    sacks,
                })
                .collect(),
        })
    }

    /// `summary_<date>.txt`, with any `/` in the date turned into `-`.
    pub fn report_file_name(&self) -> String {
        format!("summary_{}.txt", self.date).replace('/', "-")
    }

    /// The block printed to the console.
    pub fn render_console(&self) -> String {
        format!(
            "--- Summary for {} ---\n{}\n\nBreakdown by Harvester:\n{}\n",
            self.date,
            self.render_totals(),
            self.render_breakdown()
        )
    }

    /// Contents of the report file.
    pub fn render_report(&self) -> String {
        format!(
            "Rose Harvest Summary for {}\n{}\n\nBreakdown by Harvester:\n{}\n",
            self.date,
            self.render_totals(),
            self.render_breakdown()
        )
    }

    fn render_totals(&self) -> String {
        [
            format!("Total Sacks Count: {}", self.total_sacks),
            format!("Total Roses Gross Weight: {} kg", one_decimal(self.total_gross_weight_kg)),
            format!("Total Tare Weight: {}", one_decimal(self.total_tare_weight)),
            format!("Total Roses Net Weight: {} kg", one_decimal(self.total_net_weight_kg)),
            format!("Number of Harvesters: {}", self.num_harvesters),
        ]
        .join("\n")
    }

    fn render_breakdown(&self) -> String {
        let mut table: Table = clean_table();
        table.set_titles(row![r->"id", "name", r->"quantity_kg", r->"sacks"]);

        for totals in &self.breakdown {
            table.add_row(row![r->totals.id, totals.name, r->one_decimal(totals.quantity_kg), r->totals.sacks]);
        }

        table.to_string().trim_end().to_string()
    }
}

fn one_decimal(value: Decimal) -> String {
    format!("{:.1}", value.round_dp(1))
}

/// Resolves a summary menu answer: `0` is today, `1..=N` index into `dates`.
pub fn select_date(input: &str, dates: &[String], today: NaiveDate) -> Result<String, HarvestError> {
    let choice = input
        .trim()
        .parse::<i64>()
        .map_err(|_| HarvestError::NotANumber(input.trim().to_string()))?;

    match usize::try_from(choice) {
        Ok(0) => Ok(format_date(today)),
        Ok(n) if n <= dates.len() => Ok(dates[n - 1].clone()),
        _ => Err(HarvestError::InvalidChoice(choice)),
    }
}
