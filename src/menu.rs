use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::commands::{
    available_dates, AddHarvester, Command, CommandError, Context, Execute, PlotTotalHarvest, RecordHarvest, ShowLedger,
    SummarizeDay,
};
use crate::data::Harvester;
use crate::harvest::ledger::NewEntry;
use crate::harvest::registry::Registry;
use crate::harvest::summary::select_date;
use crate::harvest::{normalize_name, parse_quantity, parse_sacks, HarvestError};

const MENU: &str = "\nRose Harvest Manager\n\
                    1. Add new harvester\n\
                    2. Add harvest data\n\
                    3. Show harvest table\n\
                    4. Daily summary\n\
                    5. Plot total harvest\n\
                    6. Exit";

/// Typing this at the name prompt ends the entry loop.
const STOP_KEYWORD: &str = "exit";

/// Line-oriented prompt over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Console<R, W> {
        Console { input, output }
    }

    /// Prints `prompt` and reads one trimmed line, `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Runs the main menu until the user picks "Exit" or input runs out.
/// Failed actions are reported and the menu keeps going.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, ctx: &mut Context<'_>) -> Result<()> {
    loop {
        console.say(MENU)?;
        let choice = match console.ask("Choose an option: ")? {
            Some(choice) => choice,
            None => break,
        };
        debug!("menu choice, choice={}", choice);

        let result = match choice.as_str() {
            "1" => add_harvester(console, ctx),
            "2" => add_harvest_data(console, ctx),
            "3" => Command::from(ShowLedger).execute(ctx),
            "4" => daily_summary(console, ctx),
            "5" => Command::from(PlotTotalHarvest).execute(ctx),
            "6" => break,
            _ => {
                console.say("Invalid choice. Try again.")?;
                continue;
            },
        };

        match result {
            Ok(text) if text.is_empty() => {},
            Ok(text) => console.say(&text)?,
            Err(err) => {
                warn!("menu action failed, err={}", err);
                console.say(&err.to_string())?;
            },
        }
    }

    console.say("Goodbye!")?;
    Ok(())
}

fn add_harvester<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    ctx: &mut Context<'_>,
) -> Result<String, CommandError> {
    match console.ask("Enter new harvester's name: ")? {
        Some(name) => Command::from(AddHarvester { name }).execute(ctx),
        None => Ok(String::new()),
    }
}

/// Collects entries until the stop keyword (or end of input) and saves them in one go.
/// A malformed number ends the loop early; what happens to the batch typed so far
/// depends on `Settings::keep_entries_on_input_error`.
fn add_harvest_data<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    ctx: &mut Context<'_>,
) -> Result<String, CommandError> {
    let registry = Registry::new(ctx.store.load::<Harvester>()?);
    let mut batch = Vec::new();

    loop {
        let name = match console.ask("Enter harvester's name (or 'exit' to stop): ")? {
            Some(name) => normalize_name(&name),
            None => break,
        };
        if name.eq_ignore_ascii_case(STOP_KEYWORD) {
            break;
        }

        if registry.lookup(&name).is_none() {
            console.say(&HarvestError::HarvesterNotFound(name).to_string())?;
            continue;
        }

        let amounts = match read_amounts(console)? {
            Some(amounts) => amounts,
            None => break,
        };

        match amounts {
            Ok((quantity_kg, sacks)) => {
                batch.push(NewEntry::new(name.clone(), quantity_kg, sacks));
                console.say(&format!("Harvest entry added for {}.\n", name))?;
            },
            Err(err) => return abandon_batch(ctx, batch, err),
        }
    }

    Command::from(RecordHarvest { entries: batch }).execute(ctx)
}

type Amounts = Result<(Decimal, u32), HarvestError>;

/// `None` when input ends mid-entry.
fn read_amounts<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<Option<Amounts>> {
    let quantity = match console.ask("Enter quantity harvested (kg): ")? {
        Some(quantity) => quantity,
        None => return Ok(None),
    };
    let quantity = match parse_quantity(&quantity) {
        Ok(quantity) => quantity,
        Err(err) => return Ok(Some(Err(err))),
    };

    let sacks = match console.ask("Enter number of sacks: ")? {
        Some(sacks) => sacks,
        None => return Ok(None),
    };

    Ok(Some(parse_sacks(&sacks).map(|sacks| (quantity, sacks))))
}

fn abandon_batch(ctx: &mut Context<'_>, batch: Vec<NewEntry>, err: HarvestError) -> Result<String, CommandError> {
    warn!("harvest entry loop aborted, pending={}, err={}", batch.len(), err);

    if ctx.settings.keep_entries_on_input_error && !batch.is_empty() {
        let saved = Command::from(RecordHarvest { entries: batch }).execute(ctx)?;
        return Ok(format!("{}\n{}", err, saved));
    }

    Ok(format!("{}\nNo entries were saved.", err))
}

fn daily_summary<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    ctx: &mut Context<'_>,
) -> Result<String, CommandError> {
    let dates = available_dates(&ctx.store)?;

    console.say("\nAvailable dates:\n0. Today")?;
    for (i, date) in dates.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, date))?;
    }

    let answer = match console.ask("\nSelect a date number (or 0 for today's summary): ")? {
        Some(answer) => answer,
        None => return Ok(String::new()),
    };
    let date = select_date(&answer, &dates, ctx.clock.today())?;

    Command::from(SummarizeDay { date }).execute(ctx)
}
