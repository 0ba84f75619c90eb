pub mod process;
pub mod report;

use std::{env, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use process::{kill_previous_daemons, restart_daemon};
use report::HistoryCommand;
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::{start_daemon, DEFAULT_REMIND_INTERVAL},
    ledger::{
        goal::Goal,
        store::{JsonLedgerStore, LedgerStore},
    },
    prompt::{ConsolePrompt, UserPrompt},
    utils::{
        clock::{Clock, SystemClock},
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

/// Default offered by the interactive add, roughly a large glass.
const DEFAULT_CUSTOM_ML: u32 = 350;

#[derive(Parser, Debug)]
#[command(name = "Sipwatch", version, long_about = None)]
#[command(about = "Track daily water intake and get reminded to drink", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Log a drink. Asks for the amount when none is given")]
    Add {
        #[arg(help = "Amount in milliliters")]
        amount: Option<u32>,
    },
    #[command(about = "Show today's progress, the streak and the weekly average")]
    Status {},
    #[command(about = "Display a day-by-day history of water intake")]
    History {
        #[command(flatten)]
        command: HistoryCommand,
    },
    #[command(about = "Show or change the daily goal (1000 to 5000 ml)")]
    Goal {
        #[arg(help = "New goal in milliliters")]
        target: Option<Goal>,
    },
    #[command(about = "Delete today's records after a confirmation")]
    Reset {},
    #[command(about = "Starts the reminder daemon for the application")]
    Init {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(
        about = "Run the reminder daemon directly in current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let app_dir = create_application_default_path()?;
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Init { dir } => {
            restart_daemon(dir)?;
            Ok(())
        }
        Commands::Stop {} => {
            let process_name = env::current_exe().expect("Can't operate without an executable");
            kill_previous_daemons(&process_name);
            Ok(())
        }
        Commands::Serve { dir } => {
            start_daemon(dir.unwrap_or(app_dir), DEFAULT_REMIND_INTERVAL).await?;
            Ok(())
        }
        Commands::Add { amount } => {
            add_command(
                &JsonLedgerStore::new(app_dir)?,
                amount,
                &mut ConsolePrompt,
                &SystemClock,
            )
            .await
        }
        Commands::Status {} => {
            report::print_status(&JsonLedgerStore::new(app_dir)?, &SystemClock).await
        }
        Commands::History { command } => {
            report::process_history_command(&JsonLedgerStore::new(app_dir)?, command, &SystemClock)
                .await
        }
        Commands::Goal { target } => goal_command(&JsonLedgerStore::new(app_dir)?, target).await,
        Commands::Reset {} => {
            reset_command(&JsonLedgerStore::new(app_dir)?, &mut ConsolePrompt, &SystemClock).await
        }
    }
}

/// Logs a drink. Without an explicit amount the user is asked, and a
/// non-numeric or non-positive answer drops the add silently.
async fn add_command(
    store: &impl LedgerStore,
    amount: Option<u32>,
    prompt: &mut dyn UserPrompt,
    clock: &dyn Clock,
) -> Result<()> {
    let amount = match amount {
        Some(v) => Some(v),
        None => prompt.ask_number("How much did you drink? (ml)", DEFAULT_CUSTOM_ML)?,
    };
    let Some(amount) = amount.filter(|v| *v > 0) else {
        return Ok(());
    };

    let mut ledger = store.load().await?;
    let today = clock.today();
    ledger.add_volume(today, amount);
    store.save(&ledger).await?;

    let goal = store.load_goal().await?;
    report::print_today_line(&ledger, today, goal);
    Ok(())
}

async fn goal_command(store: &impl LedgerStore, target: Option<Goal>) -> Result<()> {
    match target {
        Some(goal) => {
            store.save_goal(goal).await?;
            println!("Daily goal set to {goal}");
        }
        None => {
            let goal = store.load_goal().await?;
            println!("Daily goal is {goal}");
        }
    }
    Ok(())
}

async fn reset_command(
    store: &impl LedgerStore,
    prompt: &mut dyn UserPrompt,
    clock: &dyn Clock,
) -> Result<()> {
    if !prompt.ask("Reset today's intake records?")? {
        return Ok(());
    }
    let mut ledger = store.load().await?;
    ledger.reset_day(clock.today());
    store.save(&ledger).await?;
    println!("Today's records were reset");
    Ok(())
}
