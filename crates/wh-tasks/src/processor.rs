//! Order processor: moves work between the order store and the task queue.
//!
//! Each pass fills free stations with the oldest open orders, pushing their
//! unit keys onto the queue, then applies every key the allocator completed
//! since the last pass as a one-unit delivery.

use crate::error::TaskResult;
use crate::key::TaskKey;
use crate::orders::OrderStore;
use crate::queue::TaskQueue;

/// Counts from one [`process`] pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub orders_assigned: usize,
    pub keys_queued:     usize,
    pub deliveries:      usize,
    /// Deliveries that matched no active task.
    pub ignored:         usize,
}

/// Assign open orders to free stations until one side runs out.
pub fn fill_stations<S, Q>(store: &mut S, queue: &mut Q) -> TaskResult<(usize, usize)>
where
    S: OrderStore + ?Sized,
    Q: TaskQueue + ?Sized,
{
    let (mut orders, mut keys) = (0, 0);
    while let Some((_, new_keys)) = store.fill_available_station()? {
        orders += 1;
        keys += new_keys.len();
        for key in new_keys {
            queue.push(key);
        }
    }
    Ok((orders, keys))
}

/// Apply already-completed keys as single-unit deliveries.
pub fn apply_completed<S>(store: &mut S, keys: &[TaskKey], now: u64) -> TaskResult<(usize, usize)>
where
    S: OrderStore + ?Sized,
{
    let (mut applied, mut ignored) = (0, 0);
    for key in keys {
        match store.add_item_to_station(key.station, key.item, 1, now)? {
            Some(_) => applied += 1,
            None => ignored += 1,
        }
    }
    Ok((applied, ignored))
}

/// One processor pass: deliveries first so finished orders free their
/// stations before the fill.
pub fn process<S, Q>(store: &mut S, queue: &mut Q, now: u64) -> TaskResult<ProcessReport>
where
    S: OrderStore + ?Sized,
    Q: TaskQueue + ?Sized,
{
    let completed = queue.take_completed();
    let (deliveries, ignored) = apply_completed(store, &completed, now)?;
    let (orders_assigned, keys_queued) = fill_stations(store, queue)?;

    let report = ProcessReport { orders_assigned, keys_queued, deliveries, ignored };
    if report != ProcessReport::default() {
        tracing::debug!(?report, "order processor pass");
    }
    Ok(report)
}
