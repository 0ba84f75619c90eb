use anyhow::Result;

/// The daemon only ever runs one cooperative loop, so a current-thread
/// runtime is enough.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
