use std::fmt::Display;

use ansi_term::Colour;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    ledger::{goal::Goal, intake::IntakeLedger, store::LedgerStore, tips},
    utils::clock::Clock,
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct HistoryCommand {
    #[arg(
        long = "days",
        short,
        default_value_t = 7,
        help = "Number of days to display"
    )]
    days: u32,
    #[arg(
        long = "end",
        short,
        help = "Most recent day of the range. Examples are \"yesterday\", \"15/03/2025\", \"last friday\""
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `history`. Prints one line per day, newest first, with
/// a mark on days that met the streak minimum.
pub async fn process_history_command(
    store: &impl LedgerStore,
    HistoryCommand {
        days,
        end_date,
        date_style,
    }: HistoryCommand,
    clock: &dyn Clock,
) -> Result<()> {
    let end = match parse_end_date(end_date, date_style) {
        Ok(value) => value.unwrap_or_else(|| clock.today()),
        Err(value) => return Err(value),
    };

    let ledger = store.load().await?;

    for day in ledger.history(end, days) {
        let mark = if day.qualifies {
            Colour::Green.paint("✔").to_string()
        } else {
            String::new()
        };
        println!(
            "{}\t{} ml\t{}",
            day.date.format("%d/%m (%a)"),
            day.amount_ml,
            mark
        );
    }
    Ok(())
}

fn parse_end_date(end_date: Option<String>, date_style: DateStyle) -> Result<Option<NaiveDate>> {
    let Some(end_date) = end_date else {
        return Ok(None);
    };
    match parse_date_string(&end_date, Local::now(), date_style.into()) {
        Ok(v) => Ok(Some(v.date_naive())),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate end date {e}"),
            )
            .into()),
    }
}

/// The status screen: today's total against the goal, a fill bar, the
/// streak, the weekly average and a tip.
pub async fn print_status(store: &impl LedgerStore, clock: &dyn Clock) -> Result<()> {
    let ledger = store.load().await?;
    let goal = store.load_goal().await?;
    let today = clock.today();

    let percent = ledger.percent_of_goal(today, goal);

    println!(
        "Today: {} / {goal} ({percent}%)",
        ledger.total_for(today)
    );
    println!("{}", fill_bar(percent, 20));
    println!(
        "Streak: {} day(s)\tWeekly average: {} ml",
        ledger.streak(today),
        ledger.weekly_average(today)
    );
    println!();
    println!("Tip: {}", tips::random_tip());
    Ok(())
}

/// Single-line summary printed after a successful add.
pub fn print_today_line(ledger: &IntakeLedger, today: NaiveDate, goal: Goal) {
    println!(
        "Today: {} / {goal} ({}%)",
        ledger.total_for(today),
        ledger.percent_of_goal(today, goal)
    );
}

fn fill_bar(percent: u32, width: u32) -> String {
    let filled = (percent.min(100) * width / 100) as usize;
    let empty = width as usize - filled;
    format!(
        "[{}{}]",
        Colour::Blue.paint("█".repeat(filled)),
        "░".repeat(empty)
    )
}

#[cfg(test)]
mod tests {
    use super::fill_bar;

    #[test]
    fn fill_bar_spans_the_whole_width() {
        // The painted output carries color escapes, so count the block glyphs
        let full = fill_bar(100, 20);
        assert_eq!(full.matches('█').count(), 20);
        assert_eq!(full.matches('░').count(), 0);

        let empty = fill_bar(0, 20);
        assert_eq!(empty.matches('█').count(), 0);
        assert_eq!(empty.matches('░').count(), 20);
    }

    #[test]
    fn fill_bar_rounds_down_partial_cells() {
        let bar = fill_bar(63, 20);
        assert_eq!(bar.matches('█').count(), 12);
        assert_eq!(bar.matches('░').count(), 8);
    }
}
