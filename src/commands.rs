use std::io;

use enum_dispatch::enum_dispatch;
use log::{info, warn};
use thiserror::Error;

use crate::chart::{ChartSink, LineChart};
use crate::clock::Clock;
use crate::config::Settings;
use crate::data::{HarvestEntry, Harvester, Store, StoreError};
use crate::harvest::ledger::{Ledger, NewEntry};
use crate::harvest::registry::Registry;
use crate::harvest::summary::DailySummary;
use crate::harvest::trend::daily_totals;
use crate::harvest::HarvestError;
use crate::report::{ledger_table, write_report};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Harvest(#[from] HarvestError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Everything a command may touch. Tables are reloaded on every execution.
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub store: Store,
    pub clock: &'a dyn Clock,
    pub chart: &'a mut dyn ChartSink,
}

impl<'a> Context<'a> {
    pub fn new(settings: &'a Settings, clock: &'a dyn Clock, chart: &'a mut dyn ChartSink) -> Context<'a> {
        Context {
            settings,
            store: Store::new(settings.tables_dir.clone()),
            clock,
            chart,
        }
    }
}

#[enum_dispatch]
pub trait Execute {
    /// Runs against the stored tables and returns the text to show the user.
    fn execute(&self, ctx: &mut Context<'_>) -> Result<String, CommandError>;
}

#[enum_dispatch(Execute)]
#[derive(Debug)]
pub enum Command {
    AddHarvester,
    RecordHarvest,
    ShowLedger,
    SummarizeDay,
    PlotTotalHarvest,
}

#[derive(Debug)]
pub struct AddHarvester {
    pub name: String,
}

impl Execute for AddHarvester {
    fn execute(&self, ctx: &mut Context<'_>) -> Result<String, CommandError> {
        let mut registry = Registry::new(ctx.store.load::<Harvester>()?);
        let harvester = registry.add(&self.name)?.clone();

        ctx.store.save(registry.harvesters())?;
        info!("harvester added, id={}, name={}", harvester.id, harvester.name);

        Ok(format!("Harvester '{}' added with ID {}.", harvester.name, harvester.id))
    }
}

/// Appends a batch of entries dated today. Entries naming unknown harvesters are skipped.
#[derive(Debug)]
pub struct RecordHarvest {
    pub entries: Vec<NewEntry>,
}

impl Execute for RecordHarvest {
    fn execute(&self, ctx: &mut Context<'_>) -> Result<String, CommandError> {
        let registry = Registry::new(ctx.store.load::<Harvester>()?);
        let mut ledger = Ledger::new(ctx.store.load::<HarvestEntry>()?);
        let today = ctx.clock.today();

        let mut lines = Vec::new();
        let mut recorded = 0;
        for entry in &self.entries {
            match ledger.record(&registry, entry, today) {
                Ok(_) => recorded += 1,
                Err(err) => {
                    warn!("skipping harvest entry, err={}", err);
                    lines.push(err.to_string());
                },
            }
        }

        ctx.store.save(ledger.entries())?;
        info!("harvest entries saved, recorded={}, skipped={}", recorded, lines.len());

        lines.push("All entries saved.".to_string());
        Ok(lines.join("\n"))
    }
}

#[derive(Debug)]
pub struct ShowLedger;

impl Execute for ShowLedger {
    fn execute(&self, ctx: &mut Context<'_>) -> Result<String, CommandError> {
        if !ctx.store.exists::<HarvestEntry>() {
            return Err(HarvestError::NoHarvestRecord.into());
        }

        let ledger = load_ledger(&ctx.store)?;
        Ok(ledger_table(ledger.entries()))
    }
}

/// Summarises one date and writes the report file.
#[derive(Debug)]
pub struct SummarizeDay {
    pub date: String,
}

impl Execute for SummarizeDay {
    fn execute(&self, ctx: &mut Context<'_>) -> Result<String, CommandError> {
        let ledger = load_ledger(&ctx.store)?;
        let summary = DailySummary::for_date(&ledger, &self.date)?;

        let path = write_report(&ctx.settings.reports_dir, &summary.report_file_name(), &summary.render_report())?;
        info!("daily summary, date={}, harvesters={}", summary.date(), summary.num_harvesters());

        Ok(format!("{}\nSummary saved to: {}", summary.render_console(), path.display()))
    }
}

#[derive(Debug)]
pub struct PlotTotalHarvest;

impl Execute for PlotTotalHarvest {
    fn execute(&self, ctx: &mut Context<'_>) -> Result<String, CommandError> {
        let ledger = load_ledger(&ctx.store)?;
        let totals = daily_totals(&ledger)?;

        ctx.chart.draw(&LineChart::harvest_over_time(&totals))?;
        info!("harvest trend drawn, days={}", totals.len());

        Ok(String::new())
    }
}

/// The dates the summary menu offers, oldest first.
pub fn available_dates(store: &Store) -> Result<Vec<String>, CommandError> {
    Ok(load_ledger(store)?.distinct_dates())
}

/// Loads the ledger, treating a missing or empty table as an error the user should see.
fn load_ledger(store: &Store) -> Result<Ledger, CommandError> {
    if !store.exists::<HarvestEntry>() {
        return Err(HarvestError::NoHarvestData.into());
    }

    let ledger = Ledger::new(store.load::<HarvestEntry>()?);
    if ledger.is_empty() {
        return Err(HarvestError::EmptyHarvestData.into());
    }

    Ok(ledger)
}
