use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag raised on Ctrl-C. Discovery stops queueing new videos once it is set;
/// videos already queued still finish.
#[must_use]
pub fn setup_shutdown_signal() -> Arc<AtomicBool> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    if let Err(e) = ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        eprintln!("\nInterrupt received, finishing queued videos...");
    }) {
        warn!("Cannot install Ctrl-C handler: {e}");
    }

    shutdown_signal
}
