use tokio::select;
use tokio_util::sync::CancellationToken;

/// Waits for a termination signal and cancels the reminder loop.
///
/// On Windows detached processes can't detect signals sent to them, so stopping the daemon there
/// relies on the cli killing the process instead.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
    };
}
