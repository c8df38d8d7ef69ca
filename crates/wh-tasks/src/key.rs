//! Task-key wire format.
//!
//! ```text
//! task:station:<station_id>:order:<order_id>:<item_id>:<idx>   TaskKey
//! task:station:<station_id>:order:<order_id>                   TaskGroupKey
//! ```
//!
//! Keys travel through the queue as strings and are parsed into these types
//! as soon as they are read.  Nothing past the queue boundary handles the raw
//! string.

use std::fmt;
use std::str::FromStr;

use wh_core::{ItemId, OrderId, StationId};

use crate::error::{TaskError, TaskResult};

/// One unit of "move item X to station Y" work within an order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskKey {
    pub station: StationId,
    pub order:   OrderId,
    pub item:    ItemId,
    /// Unit index within the order.
    pub idx:     u32,
}

/// All task keys for one order at one station.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskGroupKey {
    pub station: StationId,
    pub order:   OrderId,
}

impl TaskKey {
    pub fn new(station: StationId, order: OrderId, item: ItemId, idx: u32) -> Self {
        Self { station, order, item, idx }
    }

    pub fn group(&self) -> TaskGroupKey {
        TaskGroupKey { station: self.station, order: self.order }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group(), self.item.0, self.idx)
    }
}

impl fmt::Display for TaskGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task:station:{}:order:{}", self.station.0, self.order.0)
    }
}

fn malformed(key: &str, reason: &'static str) -> TaskError {
    TaskError::MalformedKey { key: key.to_owned(), reason }
}

fn number(key: &str, field: &str) -> TaskResult<u32> {
    field.parse().map_err(|_| malformed(key, "non-numeric id field"))
}

/// Check the `task:station:<s>:order:<o>` prefix shared by both key forms.
fn parse_group(key: &str, parts: &[&str]) -> TaskResult<TaskGroupKey> {
    if parts[0] != "task" || parts[1] != "station" || parts[3] != "order" {
        return Err(malformed(key, "expected task:station:<id>:order:<id>"));
    }
    Ok(TaskGroupKey {
        station: StationId(number(key, parts[2])?),
        order:   OrderId(number(key, parts[4])?),
    })
}

impl FromStr for TaskKey {
    type Err = TaskError;

    fn from_str(s: &str) -> TaskResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 7 {
            return Err(malformed(s, "expected 7 colon-separated fields"));
        }
        let group = parse_group(s, &parts)?;
        Ok(TaskKey {
            station: group.station,
            order:   group.order,
            item:    ItemId(number(s, parts[5])?),
            idx:     number(s, parts[6])?,
        })
    }
}

impl FromStr for TaskGroupKey {
    type Err = TaskError;

    fn from_str(s: &str) -> TaskResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 5 {
            return Err(malformed(s, "expected 5 colon-separated fields"));
        }
        parse_group(s, &parts)
    }
}
