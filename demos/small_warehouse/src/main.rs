//! small_warehouse: end-to-end run of the warehouse robot allocator.
//!
//! Three robots serve two pick stations from five item shelves.  A seeded
//! generator files orders, the order processor puts them on stations and
//! queues one task key per unit, and the allocator drives the robots through
//! the simulated world until every order is complete or the tick limit runs
//! out.
//!
//! `RUST_LOG=info cargo run -p small_warehouse`; add `--features sqlite` to
//! keep orders in an in-memory SQLite database.

mod orders;

use std::time::Instant;

use anyhow::{Result, bail};
use tracing_subscriber::{EnvFilter, fmt};

use wh_alloc::{AllocatorObserver, RobotAllocator, leg_planner};
use wh_core::AllocatorConfig;
use wh_tasks::{Job, JobState, MemoryTaskQueue, OrderStatus, OrderStore, process};
use wh_world::{Layout, World};

use orders::OrderGenerator;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:        u64 = 1234;
const ORDER_COUNT: u32 = 6;
const MAX_LINES:   u32 = 3;
const MAX_TICKS:   u64 = 5_000;

const LAYOUT: &str = "
    #############
    #H.........S#
    #...I...I...#
    #H..........#
    #...I...I...#
    #H..........#
    #.......I..S#
    #############
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ProgressObserver {
    assigned:    usize,
    transitions: usize,
    completed:   usize,
    failed:      usize,
}

impl AllocatorObserver for ProgressObserver {
    fn on_job_assigned(&mut self, _job: &Job) {
        self.assigned += 1;
    }

    fn on_transition(&mut self, job: &Job, from: JobState) {
        self.transitions += 1;
        tracing::debug!(job = %job.id, robot = %job.robot, %from, to = %job.state(), "transition");
    }

    fn on_job_retired(&mut self, job: &Job) {
        match job.state() {
            JobState::Complete => self.completed += 1,
            _ => self.failed += 1,
        }
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn run<S: OrderStore>(mut store: S) -> Result<()> {
    let layout = Layout::parse_ascii(LAYOUT)?;
    println!(
        "Layout: {}x{}  |  robots {}  |  items {}  |  stations {}",
        layout.grid.rows(),
        layout.grid.cols(),
        layout.robot_homes.len(),
        layout.item_zones.len(),
        layout.station_zones.len(),
    );

    for _ in &layout.station_zones {
        store.add_station()?;
    }
    let mut generator = OrderGenerator::new(SEED, layout.item_zones.len(), MAX_LINES);
    for _ in 0..ORDER_COUNT {
        let Some(order) = generator.next_order(0) else {
            bail!("layout has no item zones");
        };
        let id = store.add_order(order)?;
        tracing::info!(order = %id, "order filed");
    }

    let config = AllocatorConfig { poll_interval_ms: 0, use_true_heuristic: true, ..Default::default() };
    let planner = leg_planner(&config, &layout);
    let world = World::from_layout(&layout)?;
    let mut allocator = RobotAllocator::new(config, layout, world, MemoryTaskQueue::new(), planner)?;
    let mut observer = ProgressObserver::default();

    let t0 = Instant::now();
    let mut collisions = 0usize;
    let mut failed_checks = 0usize;
    let mut finished_at = None;
    for tick in 0..MAX_TICKS {
        let processed = process(&mut store, allocator.queue_mut(), tick)?;
        if processed.orders_assigned > 0 || processed.deliveries > 0 {
            tracing::info!(
                tick,
                orders = processed.orders_assigned,
                keys = processed.keys_queued,
                deliveries = processed.deliveries,
                "order processor pass",
            );
        }

        let report = allocator.update(&mut observer)?;
        failed_checks += report.failed_checks;
        allocator.world_mut().step();
        if !allocator.world().is_valid() {
            collisions += 1;
        }

        if store.orders(Some(OrderStatus::Complete))?.len() == ORDER_COUNT as usize {
            finished_at = Some(tick);
            break;
        }
        if report.assigned.is_none() && report.transitions == 0 {
            std::thread::sleep(allocator.config().poll_interval());
        }
    }
    let elapsed = t0.elapsed();

    println!();
    match finished_at {
        Some(tick) => println!("All {ORDER_COUNT} orders complete at tick {tick} ({:.3} s)", elapsed.as_secs_f64()),
        None => println!("Tick limit {MAX_TICKS} reached ({:.3} s)", elapsed.as_secs_f64()),
    }
    println!(
        "Jobs: {} assigned, {} complete, {} failed, {} transitions",
        observer.assigned, observer.completed, observer.failed, observer.transitions,
    );
    println!("Ticks with a world collision: {collisions}");
    println!("Job checks that failed: {failed_checks}");
    println!();

    println!("{:<10} {:<12} {:<10} {:<8}", "Order", "Status", "Created", "Finished");
    println!("{}", "-".repeat(42));
    for order in store.orders(None)? {
        println!(
            "{:<10} {:<12} {:<10} {:<8}",
            order.id.0,
            order.status.as_str(),
            order.created,
            order.finished.map_or_else(|| "-".to_string(), |t| t.to_string()),
        );
    }
    println!();
    print!("{}", allocator.world().render_ascii());

    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    println!("=== small_warehouse: robot allocator demo ===");
    println!("Orders: {ORDER_COUNT}  |  Seed: {SEED}  |  Tick limit: {MAX_TICKS}");

    #[cfg(feature = "sqlite")]
    let store = wh_tasks::SqliteOrderStore::open_in_memory()?;
    #[cfg(not(feature = "sqlite"))]
    let store = wh_tasks::MemoryOrderStore::new();

    run(store)
}
