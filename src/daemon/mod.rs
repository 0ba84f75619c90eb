use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use reminder::{RearmGate, ReminderModule};
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    ledger::store::{JsonLedgerStore, LedgerStore},
    prompt::{ConsolePrompt, FocusProbe, TerminalFocusProbe, UserPrompt},
    utils::clock::{Clock, SystemClock},
};

pub mod args;
pub mod reminder;
pub mod shutdown;

pub const DEFAULT_REMIND_INTERVAL: Duration = Duration::from_secs(45 * 60);

const MIN_REARM_INTERVAL_S: i64 = 10;

/// Represents the starting point for the daemon
pub async fn start_daemon(dir: PathBuf, remind_interval: Duration) -> Result<()> {
    let shutdown_token = CancellationToken::new();

    let reminder = create_reminder(
        JsonLedgerStore::new(dir)?,
        Box::new(ConsolePrompt),
        Box::new(TerminalFocusProbe),
        &shutdown_token,
        SystemClock,
        remind_interval,
    );

    let (_, reminder_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        reminder.run(),
    );

    if let Err(reminder_result) = reminder_result {
        error!("Reminder module got an error {:?}", reminder_result);
    }

    Ok(())
}

fn create_reminder<S: LedgerStore>(
    store: S,
    prompt: Box<dyn UserPrompt>,
    focus: Box<dyn FocusProbe>,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
    remind_interval: Duration,
) -> ReminderModule<S> {
    ReminderModule::new(
        store,
        prompt,
        focus,
        shutdown_token.clone(),
        RearmGate::from_seconds(MIN_REARM_INTERVAL_S),
        remind_interval,
        Box::new(clock),
    )
}

#[cfg(test)]
mod daemon_tests {
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::{
        daemon::{create_reminder, reminder::DEFAULT_SIP_ML},
        ledger::store::{JsonLedgerStore, LedgerStore},
        prompt::{MockFocusProbe, MockUserPrompt},
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(), NaiveTime::MIN);

    #[derive(Clone)]
    struct TestClock {
        start_time: DateTime<Utc>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Utc> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    /// Very simple smoke test to check that the loop ticks, prompts and
    /// persists. The 10 second re-arm gate makes exactly one prompt possible
    /// within the test's runtime no matter how many ticks fit in.
    #[tokio::test]
    async fn smoke_test_reminder_daemon() -> Result<()> {
        *TEST_LOGGING;
        let mut focus = MockFocusProbe::new();
        focus.expect_is_focused().returning(|| Ok(true));
        let mut prompt = MockUserPrompt::new();
        prompt.expect_ask().times(1).returning(|_| Ok(true));

        let shutdown_token = CancellationToken::new();
        let test_clock = TestClock {
            start_time: Utc.from_utc_datetime(&TEST_START_DATE),
            reference: Instant::now(),
        };

        let dir = tempdir()?;
        let reminder = create_reminder(
            JsonLedgerStore::new(dir.path().to_owned())?,
            Box::new(prompt),
            Box::new(focus),
            &shutdown_token,
            test_clock.clone(),
            Duration::from_millis(100),
        );

        let (_, reminder_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(350)).await;
                shutdown_token.cancel()
            },
            reminder.run(),
        );

        reminder_result?;

        let storage = JsonLedgerStore::new(dir.path().to_owned())?;
        let ledger = storage.load().await?;

        assert_eq!(ledger.total_for(TEST_START_DATE.date()), DEFAULT_SIP_ML);
        assert!(ledger.last_remind() > DateTime::UNIX_EPOCH);

        Ok(())
    }
}
