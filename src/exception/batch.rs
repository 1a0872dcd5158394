//! Fail-late batch execution

use super::{AdkException, Child};
use tracing::{debug, warn};

/// Run `op` for every target, collecting failures instead of stopping.
///
/// Returns one [`AdkException`] with `message` and a child per failure once
/// every target has been processed.
pub fn run_batch<T, I, F, E>(message: &str, targets: I, mut op: F) -> Result<(), AdkException>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Result<(), E>,
    E: Into<Child>,
{
    let mut aggregate = AdkException::new(message);
    let mut processed = 0usize;
    for target in targets {
        processed += 1;
        if let Err(err) = op(target) {
            let child = err.into();
            warn!(error = %child, "batch target failed");
            aggregate.add(child);
        }
    }
    debug!(processed, failed = aggregate.children().len(), "batch finished");
    if aggregate.has_children() {
        Err(aggregate)
    } else {
        Ok(())
    }
}
