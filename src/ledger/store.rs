use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use super::{goal::Goal, intake::IntakeLedger};

pub const RECORDS_FILE: &str = "records.json";
pub const GOAL_FILE: &str = "goal.json";

/// Interface for abstracting persistence of the ledger and the goal.
/// The two are stored separately because their lifecycles differ: resetting
/// records must never touch the goal.
pub trait LedgerStore {
    /// Reads the persisted ledger. A missing file means nothing was saved
    /// yet and yields an empty ledger.
    fn load(&self) -> impl Future<Output = Result<IntakeLedger>> + Send;

    /// Writes the ledger wholesale. Called after every mutation.
    fn save(&self, ledger: &IntakeLedger) -> impl Future<Output = Result<()>> + Send;

    fn load_goal(&self) -> impl Future<Output = Result<Goal>> + Send;

    fn save_goal(&self, goal: Goal) -> impl Future<Output = Result<()>> + Send;
}

/// The main realization of [LedgerStore]. Keeps both files in one directory
/// and takes advisory locks around every read and write, since the CLI and
/// the daemon are separate processes mutating the same files.
pub struct JsonLedgerStore {
    data_dir: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(data_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&data_dir)?;

        Ok(Self { data_dir })
    }

    async fn read_locked(&self, name: &str) -> Result<Option<Vec<u8>>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<u8>, std::io::Error> {
            debug!("Reading {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let mut bytes = Vec::new();
            let result = file.read_to_end(&mut bytes).await;
            file.unlock_async().await?;
            result?;
            Ok(bytes)
        }

        match extract(&self.data_dir.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn write_locked(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.data_dir.join(name);
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;

        // Semi-safe acquire-release for a file. Truncation happens under the
        // lock so a concurrent reader never observes a half-written file.
        file.lock_exclusive()?;
        let result = Self::replace_contents(&mut file, bytes).await;
        file.unlock_async().await?;
        result
    }

    async fn replace_contents(file: &mut File, bytes: &[u8]) -> Result<()> {
        file.set_len(0).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    async fn load(&self) -> Result<IntakeLedger> {
        let Some(bytes) = self.read_locked(RECORDS_FILE).await? else {
            return Ok(IntakeLedger::default());
        };
        match serde_json::from_slice::<IntakeLedger>(&bytes) {
            Ok(ledger) => Ok(ledger),
            Err(e) => {
                // Might happen after shutdowns cutting off a write. Starting
                // over beats refusing to run.
                warn!("Persisted records were corrupted, falling back to an empty ledger: {e}");
                Ok(IntakeLedger::default())
            }
        }
    }

    async fn save(&self, ledger: &IntakeLedger) -> Result<()> {
        let bytes = serde_json::to_vec(ledger)?;
        self.write_locked(RECORDS_FILE, &bytes).await
    }

    async fn load_goal(&self) -> Result<Goal> {
        let Some(bytes) = self.read_locked(GOAL_FILE).await? else {
            return Ok(Goal::default());
        };
        let goal = serde_json::from_slice::<u32>(&bytes)
            .ok()
            .and_then(Goal::new_opt);
        Ok(goal.unwrap_or_else(|| {
            warn!("Persisted goal was invalid, keeping the default");
            Goal::default()
        }))
    }

    async fn save_goal(&self, goal: Goal) -> Result<()> {
        let bytes = serde_json::to_vec(&goal.ml())?;
        self.write_locked(GOAL_FILE, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::ledger::{goal::Goal, intake::IntakeLedger};

    use super::{JsonLedgerStore, LedgerStore, GOAL_FILE, RECORDS_FILE};

    const TEST_DAY: NaiveDate = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

    #[tokio::test]
    async fn load_of_missing_file_is_an_empty_ledger() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLedgerStore::new(dir.path().to_owned())?;

        assert_eq!(store.load().await?, IntakeLedger::default());
        Ok(())
    }

    #[tokio::test]
    async fn ledger_round_trips_exactly() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLedgerStore::new(dir.path().to_owned())?;

        let mut ledger = IntakeLedger::default();
        ledger.add_volume(TEST_DAY, 1250);
        ledger.add_volume(TEST_DAY.pred_opt().unwrap(), 500);
        ledger.set_last_remind(Utc.with_ymd_and_hms(2025, 3, 15, 9, 30, 0).unwrap());

        store.save(&ledger).await?;
        assert_eq!(store.load().await?, ledger);
        Ok(())
    }

    #[tokio::test]
    async fn wire_format_uses_iso_dates_and_epoch_millis() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLedgerStore::new(dir.path().to_owned())?;

        let mut ledger = IntakeLedger::default();
        ledger.add_volume(TEST_DAY, 1250);
        store.save(&ledger).await?;

        let raw = std::fs::read_to_string(dir.path().join(RECORDS_FILE))?;
        let value = serde_json::from_str::<serde_json::Value>(&raw)?;
        assert_eq!(value["records"]["2025-03-15"], 1250);
        assert_eq!(value["lastRemind"], 0);
        Ok(())
    }

    #[tokio::test]
    async fn corrupted_records_fall_back_to_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLedgerStore::new(dir.path().to_owned())?;
        std::fs::write(dir.path().join(RECORDS_FILE), b"{\"records\": {")?;

        assert_eq!(store.load().await?, IntakeLedger::default());
        Ok(())
    }

    #[tokio::test]
    async fn saving_shrinks_the_file_when_the_ledger_shrinks() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLedgerStore::new(dir.path().to_owned())?;

        let mut ledger = IntakeLedger::default();
        for offset in 0..30 {
            ledger.add_volume(TEST_DAY - chrono::Duration::days(offset), 1500);
        }
        store.save(&ledger).await?;

        let mut trimmed = IntakeLedger::default();
        trimmed.add_volume(TEST_DAY, 250);
        store.save(&trimmed).await?;

        assert_eq!(store.load().await?, trimmed);
        Ok(())
    }

    #[tokio::test]
    async fn goal_round_trips_as_a_bare_integer() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLedgerStore::new(dir.path().to_owned())?;

        assert_eq!(store.load_goal().await?, Goal::default());

        store.save_goal(Goal::new_opt(3200).unwrap()).await?;
        assert_eq!(store.load_goal().await?.ml(), 3200);

        let raw = std::fs::read_to_string(dir.path().join(GOAL_FILE))?;
        assert_eq!(raw.trim(), "3200");
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_persisted_goal_is_replaced_by_the_default() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLedgerStore::new(dir.path().to_owned())?;
        std::fs::write(dir.path().join(GOAL_FILE), b"120000")?;

        assert_eq!(store.load_goal().await?, Goal::default());
        Ok(())
    }
}
