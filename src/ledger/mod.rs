//! The daily intake ledger and everything persisted around it.
//!  The basic idea is:
//!   - Each calendar day maps to the amount of water drunk that day.
//!   - The whole mapping is saved wholesale after every mutation, so the CLI
//!     and the daemon always agree through the file on disk.
//!   - The daily goal lives in its own file with its own lifecycle.

pub mod goal;
pub mod intake;
pub mod store;
pub mod tips;
