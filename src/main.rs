use std::io;

use anyhow::Result;

use rose_harvest::chart::TerminalChart;
use rose_harvest::clock::LocalClock;
use rose_harvest::commands::Context;
use rose_harvest::config::Settings;
use rose_harvest::menu::{self, Console};

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::default();
    let mut chart = TerminalChart::new(io::stdout());
    let mut ctx = Context::new(&settings, &LocalClock, &mut chart);

    let mut console = Console::new(io::stdin().lock(), io::stdout());
    menu::run(&mut console, &mut ctx)
}
