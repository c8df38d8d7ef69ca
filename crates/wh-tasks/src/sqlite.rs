//! SQLite order store (feature `sqlite`).
//!
//! Four tables: `"Order"`, `OrderItem`, `Station` and `Task`.  Statuses are
//! stored as their wire strings and parsed strictly on the way out, so a
//! hand-edited row with an unknown status surfaces as
//! [`TaskError::UnknownStatus`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use wh_core::{ItemId, OrderId, StationId};

use crate::error::{TaskError, TaskResult};
use crate::key::TaskKey;
use crate::orders::{NewOrder, Order, OrderStore, Station, Task, unit_keys};
use crate::status::{OrderStatus, TaskStatus};

const SCHEMA: &str = r#"
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    CREATE TABLE IF NOT EXISTS "Order" (
        order_id    INTEGER PRIMARY KEY,
        created_by  INTEGER NOT NULL,
        created     INTEGER NOT NULL,
        finished    INTEGER,
        description TEXT    NOT NULL DEFAULT '',
        status      TEXT    NOT NULL
    );
    CREATE TABLE IF NOT EXISTS OrderItem (
        order_id INTEGER NOT NULL REFERENCES "Order"(order_id),
        item_id  INTEGER NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1,
        PRIMARY KEY (order_id, item_id)
    );
    CREATE TABLE IF NOT EXISTS Station (
        station_id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id   INTEGER REFERENCES "Order"(order_id)
    );
    CREATE TABLE IF NOT EXISTS Task (
        task_id    INTEGER PRIMARY KEY AUTOINCREMENT,
        station_id INTEGER NOT NULL REFERENCES Station(station_id),
        order_id   INTEGER NOT NULL REFERENCES "Order"(order_id),
        item_id    INTEGER NOT NULL,
        quantity   INTEGER NOT NULL,
        status     TEXT    NOT NULL
    );
"#;

type OrderRow = (u32, u32, i64, Option<i64>, String, String);

/// [`OrderStore`] backed by an SQLite database.
pub struct SqliteOrderStore {
    conn: Connection,
}

impl SqliteOrderStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> TaskResult<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> TaskResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> TaskResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn items_for(&self, order: OrderId) -> TaskResult<Vec<(ItemId, u32)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT item_id, quantity FROM OrderItem WHERE order_id = ?1 ORDER BY item_id",
        )?;
        let rows = stmt.query_map(params![order.0], |r| Ok((ItemId(r.get(0)?), r.get::<_, u32>(1)?)))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn order_from_row(&self, row: OrderRow) -> TaskResult<Order> {
        let (id, created_by, created, finished, description, status) = row;
        let id = OrderId(id);
        Ok(Order {
            id,
            created_by,
            created: created as u64,
            finished: finished.map(|f| f as u64),
            description,
            status: status.parse()?,
            items: self.items_for(id)?,
        })
    }

    fn station_order(&self, station: StationId) -> TaskResult<Option<OrderId>> {
        let row: Option<Option<u32>> = self
            .conn
            .query_row("SELECT order_id FROM Station WHERE station_id = ?1", params![station.0], |r| r.get(0))
            .optional()?;
        match row {
            None => Err(TaskError::StationNotFound(station)),
            Some(order) => Ok(order.map(OrderId)),
        }
    }

    fn incomplete_tasks(&self, station: StationId, order: OrderId) -> TaskResult<u32> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM Task WHERE station_id = ?1 AND order_id = ?2 AND status != ?3",
            params![station.0, order.0, TaskStatus::Complete.as_str()],
            |r| r.get(0),
        )?)
    }
}

impl OrderStore for SqliteOrderStore {
    fn add_station(&mut self) -> TaskResult<StationId> {
        self.conn.execute("INSERT INTO Station DEFAULT VALUES", [])?;
        Ok(StationId(self.conn.last_insert_rowid() as u32))
    }

    fn add_order(&mut self, new: NewOrder) -> TaskResult<OrderId> {
        let items = new.normalized_items();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"INSERT INTO "Order" (created_by, created, description, status) VALUES (?1, ?2, ?3, ?4)"#,
            params![new.created_by, new.created as i64, new.description, OrderStatus::Open.as_str()],
        )?;
        let id = OrderId(tx.last_insert_rowid() as u32);
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO OrderItem (order_id, item_id, quantity) VALUES (?1, ?2, ?3)")?;
            for (item, qty) in &items {
                stmt.execute(params![id.0, item.0, qty])?;
            }
        }
        tx.commit()?;
        Ok(id)
    }

    fn order(&self, id: OrderId) -> TaskResult<Option<Order>> {
        let row: Option<OrderRow> = self
            .conn
            .query_row(
                r#"SELECT order_id, created_by, created, finished, description, status
                   FROM "Order" WHERE order_id = ?1"#,
                params![id.0],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?)),
            )
            .optional()?;
        row.map(|r| self.order_from_row(r)).transpose()
    }

    fn orders(&self, status: Option<OrderStatus>) -> TaskResult<Vec<Order>> {
        let mut stmt = self.conn.prepare_cached(
            r#"SELECT order_id, created_by, created, finished, description, status
               FROM "Order" WHERE ?1 IS NULL OR status = ?1
               ORDER BY created ASC, order_id ASC"#,
        )?;
        let rows: Vec<OrderRow> = stmt
            .query_map(params![status.map(OrderStatus::as_str)], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
            })?
            .collect::<Result<_, _>>()?;
        rows.into_iter().map(|r| self.order_from_row(r)).collect()
    }

    fn station(&self, id: StationId) -> TaskResult<Option<Station>> {
        match self.station_order(id) {
            Ok(order) => Ok(Some(Station { id, order })),
            Err(TaskError::StationNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn stations(&self) -> TaskResult<Vec<Station>> {
        let mut stmt = self.conn.prepare_cached("SELECT station_id, order_id FROM Station ORDER BY station_id")?;
        let rows = stmt.query_map([], |r| {
            Ok(Station { id: StationId(r.get(0)?), order: r.get::<_, Option<u32>>(1)?.map(OrderId) })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn station_tasks(&self, station: StationId) -> TaskResult<Vec<Task>> {
        let Some(order) = self.station_order(station)? else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare_cached(
            "SELECT item_id, quantity, status FROM Task
             WHERE station_id = ?1 AND order_id = ?2 ORDER BY task_id",
        )?;
        let rows: Vec<(u32, i64, String)> = stmt
            .query_map(params![station.0, order.0], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
            .collect::<Result<_, _>>()?;
        rows.into_iter()
            .map(|(item, quantity, status)| {
                Ok(Task { station, order, item: ItemId(item), quantity, status: status.parse()? })
            })
            .collect()
    }

    fn assign_order_to_station(&mut self, order: OrderId, station: StationId) -> TaskResult<Vec<TaskKey>> {
        if let Some(current) = self.station_order(station)? {
            return Err(TaskError::StationBusy { station, order: current });
        }
        let Some(record) = self.order(order)? else {
            return Err(TaskError::OrderNotFound(order));
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("UPDATE Station SET order_id = ?1 WHERE station_id = ?2", params![order.0, station.0])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO Task (station_id, order_id, item_id, quantity, status) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (item, qty) in &record.items {
                stmt.execute(params![station.0, order.0, item.0, qty, TaskStatus::Open.as_str()])?;
            }
        }
        tx.execute(
            r#"UPDATE "Order" SET status = ?1 WHERE order_id = ?2"#,
            params![OrderStatus::InProgress.as_str(), order.0],
        )?;
        tx.commit()?;
        Ok(unit_keys(station, &record))
    }

    fn clear_station(&mut self, station: StationId) -> TaskResult<()> {
        let n = self.conn.execute("UPDATE Station SET order_id = NULL WHERE station_id = ?1", params![station.0])?;
        if n == 0 {
            return Err(TaskError::StationNotFound(station));
        }
        Ok(())
    }

    fn add_item_to_station(
        &mut self,
        station: StationId,
        item: ItemId,
        quantity: u32,
        now: u64,
    ) -> TaskResult<Option<TaskStatus>> {
        let Some(order) = self.station_order(station)? else {
            tracing::info!(station = %station, item = %item, "station has no order, ignoring delivery");
            return Ok(None);
        };
        let task: Option<(i64, i64)> = self
            .conn
            .query_row(
                "SELECT task_id, quantity FROM Task
                 WHERE station_id = ?1 AND order_id = ?2 AND item_id = ?3 AND status IN (?4, ?5)
                 ORDER BY task_id LIMIT 1",
                params![
                    station.0,
                    order.0,
                    item.0,
                    TaskStatus::Open.as_str(),
                    TaskStatus::InProgress.as_str()
                ],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let Some((task_id, current)) = task else {
            tracing::info!(station = %station, item = %item, "no active task for delivery, ignoring");
            return Ok(None);
        };

        let remaining = current - i64::from(quantity);
        let status = TaskStatus::from_remaining(remaining);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE Task SET quantity = ?1, status = ?2 WHERE task_id = ?3",
            params![remaining, status.as_str(), task_id],
        )?;
        tx.commit()?;

        if status == TaskStatus::Error {
            tracing::warn!(station = %station, item = %item, remaining, "too many items delivered");
        }
        if status == TaskStatus::Complete && self.incomplete_tasks(station, order)? == 0 {
            let tx = self.conn.unchecked_transaction()?;
            tx.execute(
                r#"UPDATE "Order" SET status = ?1, finished = ?2 WHERE order_id = ?3"#,
                params![OrderStatus::Complete.as_str(), now as i64, order.0],
            )?;
            tx.execute("UPDATE Station SET order_id = NULL WHERE station_id = ?1", params![station.0])?;
            tx.commit()?;
            tracing::info!(station = %station, order = %order, "order complete, station cleared");
        }
        Ok(Some(status))
    }
}
