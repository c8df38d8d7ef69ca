//! Order / station / task records and the store that relates them.
//!
//! An order is a bag of `(item, quantity)` lines.  Assigning it to a free
//! station creates one [`Task`] per line and one [`TaskKey`] per unit; each
//! key is a single robot trip.  Dropping units at the station decrements the
//! matching task, and once the station's order has no incomplete task left
//! the order completes and the station frees up.

use std::collections::BTreeMap;

use wh_core::{ItemId, OrderId, StationId};

use crate::error::{TaskError, TaskResult};
use crate::key::TaskKey;
use crate::status::{OrderStatus, TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub id:          OrderId,
    pub created_by:  u32,
    /// Caller-supplied timestamp (simulation tick or unix seconds).
    pub created:     u64,
    pub finished:    Option<u64>,
    pub description: String,
    pub status:      OrderStatus,
    /// Sorted by item, one line per item.
    pub items:       Vec<(ItemId, u32)>,
}

impl Order {
    /// Units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|&(_, q)| q).sum()
    }
}

/// Input to [`OrderStore::add_order`].
#[derive(Clone, Debug, Default)]
pub struct NewOrder {
    pub created_by:  u32,
    pub created:     u64,
    pub description: String,
    pub items:       Vec<(ItemId, u32)>,
}

impl NewOrder {
    /// Merge duplicate items, drop zero quantities, sort by item.
    pub fn normalized_items(&self) -> Vec<(ItemId, u32)> {
        let mut merged: BTreeMap<ItemId, u32> = BTreeMap::new();
        for &(item, qty) in &self.items {
            if qty > 0 {
                *merged.entry(item).or_default() += qty;
            }
        }
        merged.into_iter().collect()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id:    StationId,
    pub order: Option<OrderId>,
}

impl Station {
    pub fn is_free(&self) -> bool {
        self.order.is_none()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub station:  StationId,
    pub order:    OrderId,
    pub item:     ItemId,
    /// Units still to deliver.  Negative after an over-delivery.
    pub quantity: i64,
    pub status:   TaskStatus,
}

/// One key per unit, `idx` counting units across the order's lines.
pub fn unit_keys(station: StationId, order: &Order) -> Vec<TaskKey> {
    order
        .items
        .iter()
        .flat_map(|&(item, qty)| std::iter::repeat(item).take(qty as usize))
        .enumerate()
        .map(|(idx, item)| TaskKey::new(station, order.id, item, idx as u32))
        .collect()
}

/// Relational store of orders, stations and tasks.
pub trait OrderStore {
    /// Register a new empty station.  Ids count up from 1.
    fn add_station(&mut self) -> TaskResult<StationId>;

    /// Store an `OPEN` order.  Ids count up from 1.
    fn add_order(&mut self, order: NewOrder) -> TaskResult<OrderId>;

    fn order(&self, id: OrderId) -> TaskResult<Option<Order>>;

    /// Orders oldest first, optionally filtered by status.
    fn orders(&self, status: Option<OrderStatus>) -> TaskResult<Vec<Order>>;

    fn station(&self, id: StationId) -> TaskResult<Option<Station>>;

    fn stations(&self) -> TaskResult<Vec<Station>>;

    /// Tasks of the order currently at `station`.  Empty for a free station.
    fn station_tasks(&self, station: StationId) -> TaskResult<Vec<Task>>;

    /// Put `order` on `station`, create its tasks, mark it `IN_PROGRESS` and
    /// return one key per unit.  Fails with `StationBusy` when the station
    /// already holds an order.
    fn assign_order_to_station(&mut self, order: OrderId, station: StationId) -> TaskResult<Vec<TaskKey>>;

    fn clear_station(&mut self, station: StationId) -> TaskResult<()>;

    /// Deliver `quantity` units of `item` to `station`.
    ///
    /// Returns the task's new status, or `None` when the station has no
    /// active task for that item.  A task that reaches zero completes, and
    /// when it was the station's last incomplete task the order is marked
    /// `COMPLETE` with `finished = now` and the station is cleared.
    fn add_item_to_station(
        &mut self,
        station: StationId,
        item: ItemId,
        quantity: u32,
        now: u64,
    ) -> TaskResult<Option<TaskStatus>>;

    /// Assign the oldest `OPEN` order to the first free station.
    fn fill_available_station(&mut self) -> TaskResult<Option<(StationId, Vec<TaskKey>)>> {
        let Some(station) = self.stations()?.into_iter().find(Station::is_free) else {
            return Ok(None);
        };
        let Some(order) = self.orders(Some(OrderStatus::Open))?.into_iter().next() else {
            return Ok(None);
        };
        let keys = self.assign_order_to_station(order.id, station.id)?;
        tracing::info!(station = %station.id, order = %order.id, tasks = keys.len(), "order assigned to station");
        Ok(Some((station.id, keys)))
    }
}

// ── In-memory store ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders:   BTreeMap<OrderId, Order>,
    stations: BTreeMap<StationId, Station>,
    tasks:    Vec<Task>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with `n` free stations.
    pub fn with_stations(n: u32) -> Self {
        let stations = (1..=n)
            .map(|i| (StationId(i), Station { id: StationId(i), order: None }))
            .collect();
        Self { stations, ..Self::default() }
    }

    fn station_mut(&mut self, id: StationId) -> TaskResult<&mut Station> {
        self.stations.get_mut(&id).ok_or(TaskError::StationNotFound(id))
    }

    fn order_mut(&mut self, id: OrderId) -> TaskResult<&mut Order> {
        self.orders.get_mut(&id).ok_or(TaskError::OrderNotFound(id))
    }

    /// Complete the station's order once every task for it is complete.
    fn settle_station(&mut self, station: StationId, now: u64) -> TaskResult<bool> {
        let Some(order) = self.station_mut(station)?.order else {
            return Ok(false);
        };
        let done = self
            .tasks
            .iter()
            .filter(|t| t.station == station && t.order == order)
            .all(|t| t.status == TaskStatus::Complete);
        if !done {
            return Ok(false);
        }
        let o = self.order_mut(order)?;
        o.status = OrderStatus::Complete;
        o.finished = Some(now);
        self.station_mut(station)?.order = None;
        tracing::info!(station = %station, order = %order, "order complete, station cleared");
        Ok(true)
    }
}

impl OrderStore for MemoryOrderStore {
    fn add_station(&mut self) -> TaskResult<StationId> {
        let id = StationId(self.stations.keys().next_back().map_or(1, |s| s.0 + 1));
        self.stations.insert(id, Station { id, order: None });
        Ok(id)
    }

    fn add_order(&mut self, new: NewOrder) -> TaskResult<OrderId> {
        let id = OrderId(self.orders.keys().next_back().map_or(1, |o| o.0 + 1));
        let items = new.normalized_items();
        self.orders.insert(id, Order {
            id,
            created_by: new.created_by,
            created: new.created,
            finished: None,
            description: new.description,
            status: OrderStatus::Open,
            items,
        });
        Ok(id)
    }

    fn order(&self, id: OrderId) -> TaskResult<Option<Order>> {
        Ok(self.orders.get(&id).cloned())
    }

    fn orders(&self, status: Option<OrderStatus>) -> TaskResult<Vec<Order>> {
        let mut out: Vec<Order> = self
            .orders
            .values()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        out.sort_by_key(|o| (o.created, o.id));
        Ok(out)
    }

    fn station(&self, id: StationId) -> TaskResult<Option<Station>> {
        Ok(self.stations.get(&id).copied())
    }

    fn stations(&self) -> TaskResult<Vec<Station>> {
        Ok(self.stations.values().copied().collect())
    }

    fn station_tasks(&self, station: StationId) -> TaskResult<Vec<Task>> {
        let Some(order) = self.stations.get(&station).and_then(|s| s.order) else {
            return Ok(Vec::new());
        };
        Ok(self.tasks.iter().filter(|t| t.station == station && t.order == order).copied().collect())
    }

    fn assign_order_to_station(&mut self, order: OrderId, station: StationId) -> TaskResult<Vec<TaskKey>> {
        if let Some(current) = self.station_mut(station)?.order {
            return Err(TaskError::StationBusy { station, order: current });
        }
        let o = self.order_mut(order)?;
        o.status = OrderStatus::InProgress;
        let snapshot = o.clone();

        self.tasks.extend(snapshot.items.iter().map(|&(item, qty)| Task {
            station,
            order,
            item,
            quantity: i64::from(qty),
            status: TaskStatus::Open,
        }));
        self.station_mut(station)?.order = Some(order);
        Ok(unit_keys(station, &snapshot))
    }

    fn clear_station(&mut self, station: StationId) -> TaskResult<()> {
        self.station_mut(station)?.order = None;
        Ok(())
    }

    fn add_item_to_station(
        &mut self,
        station: StationId,
        item: ItemId,
        quantity: u32,
        now: u64,
    ) -> TaskResult<Option<TaskStatus>> {
        let Some(order) = self.station_mut(station)?.order else {
            tracing::info!(station = %station, item = %item, "station has no order, ignoring delivery");
            return Ok(None);
        };
        let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.station == station && t.order == order && t.item == item && t.status.is_active())
        else {
            tracing::info!(station = %station, item = %item, "no active task for delivery, ignoring");
            return Ok(None);
        };

        task.quantity -= i64::from(quantity);
        task.status = TaskStatus::from_remaining(task.quantity);
        let status = task.status;
        if status == TaskStatus::Error {
            tracing::warn!(station = %station, item = %item, remaining = task.quantity, "too many items delivered");
        }
        if status == TaskStatus::Complete {
            self.settle_station(station, now)?;
        }
        Ok(Some(status))
    }
}
