use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    ledger::{goal::Goal, store::LedgerStore, tips},
    prompt::{FocusProbe, UserPrompt},
    utils::clock::Clock,
};

/// Volume logged when the user answers a reminder with yes.
pub const DEFAULT_SIP_ML: u32 = 250;

/// A reminder only fires while today's total sits below this share of the
/// goal.
const REMIND_BELOW_GOAL_SHARE: f64 = 0.6;

/// Suppresses reminders landing too soon after the previous one, for
/// example right after the daemon restarts.
pub struct RearmGate {
    min_quiet: chrono::Duration,
}

impl RearmGate {
    pub fn from_seconds(quiet_s: i64) -> Self {
        Self {
            min_quiet: chrono::Duration::seconds(quiet_s),
        }
    }

    pub fn is_armed(&self, last_remind: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - last_remind > self.min_quiet
    }
}

/// The reminder scheduler. Sleeps between ticks, and on every tick checks
/// attention, the re-arm window and today's progress before bothering the
/// user. The prompt blocks the loop until it is answered, so a tick can
/// never overlap another one.
pub struct ReminderModule<S> {
    store: S,
    prompt: Box<dyn UserPrompt>,
    focus: Box<dyn FocusProbe>,
    shutdown: CancellationToken,
    rearm: RearmGate,
    tick_interval: Duration,
    time_provider: Box<dyn Clock>,
}

impl<S: LedgerStore> ReminderModule<S> {
    pub fn new(
        store: S,
        prompt: Box<dyn UserPrompt>,
        focus: Box<dyn FocusProbe>,
        shutdown: CancellationToken,
        rearm: RearmGate,
        tick_interval: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            store,
            prompt,
            focus,
            shutdown,
            rearm,
            tick_interval,
            time_provider,
        }
    }

    /// Executes the reminder event loop. The first tick comes a whole
    /// interval after startup, so a freshly started daemon doesn't greet the
    /// user immediately.
    pub async fn run(mut self) -> Result<()> {
        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.tick_interval;

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(tick_point) => ()
            }

            if let Err(e) = self.evaluate_tick().await {
                error!("Encountered an error during a reminder tick {:?}", e);
            }
        }
    }

    /// A single tick. The ledger is re-read here because the CLI may have
    /// logged drinks since the previous tick.
    async fn evaluate_tick(&mut self) -> Result<()> {
        if !self.focus.is_focused()? {
            debug!("Skipping reminder, nobody is watching");
            return Ok(());
        }

        let mut ledger = self.store.load().await?;
        let now = self.time_provider.time();
        if !self.rearm.is_armed(ledger.last_remind(), now) {
            debug!("Skipping reminder, the previous one was too recent");
            return Ok(());
        }

        let today = now.date_naive();
        let goal = self.store.load_goal().await?;
        if below_goal_share(ledger.total_for(today), goal) {
            let tip = tips::random_tip();
            let question = format!(
                "Time for some water!\n\nTip: {tip}\n\nLog a {DEFAULT_SIP_ML} ml glass now?"
            );
            if self.prompt.ask(&question)? {
                ledger.add_volume(today, DEFAULT_SIP_ML);
                info!("Reminder accepted, added {DEFAULT_SIP_ML} ml");
            }
        }

        // The remind timestamp moves whether or not the user said yes, and
        // whether or not the prompt fired at all. Dismissing a reminder must
        // not re-trigger it on the very next tick.
        ledger.set_last_remind(now);
        self.store.save(&ledger).await?;
        Ok(())
    }
}

fn below_goal_share(total_ml: u32, goal: Goal) -> bool {
    f64::from(total_ml) < f64::from(goal.ml()) * REMIND_BELOW_GOAL_SHARE
}
