//! Unit tests for wh-world.

#[cfg(test)]
mod helpers {
    use wh_core::{Action, Position, RobotId};

    use crate::{Layout, Robot};

    pub const SMALL: &str = "
        #####
        #H.I#
        #H.S#
        #####
    ";

    pub fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    pub fn layout() -> Layout {
        Layout::parse_ascii(SMALL).unwrap()
    }

    /// A robot that just moved `from -> to`.
    pub fn moved(id: u32, from: Position, to: Position) -> Robot {
        let mut r = Robot::new(RobotId(id), to);
        r.last_pos = from;
        r.last_action = Action::between(from, to).unwrap();
        r
    }
}

// ── layout ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod layout {
    use std::io::Write;

    use super::helpers::*;
    use crate::{Layout, WorldError};
    use wh_core::{ItemId, RobotId, StationId};

    #[test]
    fn ascii_zones_are_row_major_and_free() {
        let l = layout();
        assert_eq!(l.robot_homes, vec![p(1, 1), p(2, 1)]);
        assert_eq!(l.item_zones, vec![p(1, 3)]);
        assert_eq!(l.station_zones, vec![p(2, 3)]);
        assert!(l.grid.is_free(p(1, 1)));
        assert!(l.grid.is_free(p(2, 3)));
        assert!(!l.grid.is_free(p(0, 0)));
        assert_eq!(l.all_zones().count(), 4);
    }

    #[test]
    fn zone_lookup_by_id() {
        let l = layout();
        assert_eq!(l.robot_home(RobotId(1)), Some(p(2, 1)));
        assert_eq!(l.item_zone(ItemId(0)), Some(p(1, 3)));
        assert_eq!(l.item_zone(ItemId(1)), None);
        // Stations are 1-based.
        assert_eq!(l.station_zone(StationId(1)), Some(p(2, 3)));
        assert_eq!(l.station_zone(StationId(0)), None);
        assert_eq!(l.station_zone(StationId(2)), None);
    }

    #[test]
    fn csv_file_matches_ascii() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("warehouse.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "1,1,1,1,1").unwrap();
        writeln!(f, "1,2,0,3,1").unwrap();
        writeln!(f, "1, 2, 0, 4, 1").unwrap();
        writeln!(f, "1,1,1,1,1").unwrap();
        drop(f);

        let from_csv = Layout::load_csv(&path).unwrap();
        let from_ascii = layout();
        assert_eq!(from_csv.grid, from_ascii.grid);
        assert_eq!(from_csv.robot_homes, from_ascii.robot_homes);
        assert_eq!(from_csv.item_zones, from_ascii.item_zones);
        assert_eq!(from_csv.station_zones, from_ascii.station_zones);
    }

    #[test]
    fn bad_codes_are_rejected() {
        assert!(matches!(Layout::from_csv_reader("0,7\n".as_bytes()), Err(WorldError::Layout(_))));
        assert!(matches!(Layout::from_csv_reader("0,x\n".as_bytes()), Err(WorldError::Layout(_))));
        assert!(matches!(Layout::parse_ascii("..Z"), Err(WorldError::Layout(_))));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(matches!(Layout::from_csv_reader("0,0,0\n0,0\n".as_bytes()), Err(WorldError::Csv(_))));
        assert!(matches!(Layout::parse_ascii("...\n..\n"), Err(WorldError::Core(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(matches!(Layout::load_csv(&dir.path().join("nope.csv")), Err(WorldError::Io(_))));
    }
}

// ── robot ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod robot {
    use super::helpers::*;
    use crate::Robot;
    use wh_core::{Action, ItemId, RobotId};

    #[test]
    fn holds_one_item_at_a_time() {
        let mut r = Robot::new(RobotId(0), p(0, 0));
        assert!(r.hold_item(ItemId(4)));
        assert!(!r.hold_item(ItemId(5)));
        assert_eq!(r.held_item, Some(ItemId(4)));
        assert_eq!(r.drop_item(), Some(ItemId(4)));
        assert_eq!(r.drop_item(), None);
    }

    #[test]
    fn advance_follows_path_then_waits() {
        let mut r = Robot::new(RobotId(0), p(0, 0));
        r.set_path(vec![p(0, 1), p(1, 1)]);
        assert_eq!(r.peek_next(), Some(p(0, 1)));

        assert!(r.advance());
        assert_eq!((r.pos, r.last_pos, r.last_action), (p(0, 1), p(0, 0), Action::Right));
        assert!(r.advance());
        assert_eq!(r.last_action, Action::Down);

        assert!(!r.advance());
        assert_eq!((r.pos, r.last_pos, r.last_action), (p(1, 1), p(1, 1), Action::Wait));
    }

    #[test]
    fn set_path_replaces_extend_appends() {
        let mut r = Robot::new(RobotId(0), p(0, 0));
        r.set_path(vec![p(0, 1)]);
        r.set_path(vec![p(1, 0)]);
        r.extend_path([p(2, 0)]);
        assert_eq!(r.future_path().iter().copied().collect::<Vec<_>>(), vec![p(1, 0), p(2, 0)]);
    }
}

// ── checker ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod checker {
    use super::helpers::*;
    use crate::{Robot, ViolationKind, check_world};
    use wh_core::{Grid, RobotId};

    fn open_grid() -> Grid {
        Grid::new(3, 3)
    }

    #[test]
    fn valid_state_has_no_collision() {
        let robots = vec![moved(0, p(0, 0), p(0, 1)), moved(1, p(2, 2), p(2, 1))];
        assert_eq!(check_world(&open_grid(), &robots), None);
    }

    #[test]
    fn robot_on_wall() {
        let grid = Grid::parse_ascii("...\n.#.\n...").unwrap();
        let robots = vec![moved(0, p(0, 1), p(1, 1))];
        let c = check_world(&grid, &robots).unwrap();
        assert_eq!(c.kind, ViolationKind::Wall);
        assert!(c.involves(RobotId(0)));
    }

    #[test]
    fn robot_off_grid_counts_as_wall() {
        let robots = vec![moved(0, p(0, 0), p(-1, 0))];
        assert_eq!(check_world(&open_grid(), &robots).unwrap().kind, ViolationKind::Wall);
    }

    #[test]
    fn two_robots_same_cell() {
        let robots = vec![moved(0, p(0, 0), p(0, 1)), moved(1, p(0, 2), p(0, 1))];
        let c = check_world(&open_grid(), &robots).unwrap();
        assert_eq!(c.kind, ViolationKind::Vertex);
        // Detection order: the second robot trips the check.
        assert_eq!(c.robots[0].robot, RobotId(1));
        assert_eq!(c.robots[1].robot, RobotId(0));
    }

    #[test]
    fn robots_swapping_cells() {
        let robots = vec![moved(0, p(0, 0), p(0, 1)), moved(1, p(0, 1), p(0, 0))];
        let c = check_world(&open_grid(), &robots).unwrap();
        assert_eq!(c.kind, ViolationKind::Edge);
        assert_eq!(c.robots[0].prev, p(0, 0));
        assert_eq!(c.robots[1].pos, p(0, 0));
        assert!(c.to_string().starts_with("Edge"));
    }

    #[test]
    fn following_is_not_a_swap() {
        let robots = vec![moved(0, p(0, 0), p(0, 1)), moved(1, p(0, 1), p(0, 2))];
        assert_eq!(check_world(&open_grid(), &robots), None);
    }

    #[test]
    fn waiting_robots_are_valid() {
        let robots = vec![Robot::new(RobotId(0), p(0, 0)), Robot::new(RobotId(1), p(0, 1))];
        assert_eq!(check_world(&open_grid(), &robots), None);
    }

    #[test]
    fn first_violation_wins() {
        let grid = Grid::parse_ascii("...\n..#\n...").unwrap();
        let robots = vec![
            moved(0, p(0, 0), p(0, 1)),
            moved(1, p(0, 2), p(0, 1)),
            moved(2, p(2, 2), p(1, 2)),
        ];
        assert_eq!(check_world(&grid, &robots).unwrap().kind, ViolationKind::Vertex);
    }
}

// ── world ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world {
    use super::helpers::*;
    use crate::{Robot, RobotStatus, ViolationKind, World, WorldError, WorldStore};
    use wh_core::{Grid, ItemId, RobotId};

    #[test]
    fn robots_start_at_home_zones() {
        let w = World::from_layout(&layout()).unwrap();
        let robots = w.robots();
        assert_eq!(robots.len(), 2);
        assert_eq!(robots[1].id, RobotId(1));
        assert_eq!(robots[1].pos, p(2, 1));
        assert!(robots.iter().all(|r| r.status == RobotStatus::Available));
    }

    #[test]
    fn step_moves_along_paths() {
        let mut w = World::from_layout(&layout()).unwrap();
        w.set_robot_path(RobotId(0), vec![p(1, 2), p(1, 3)]).unwrap();

        assert!(w.step());
        assert_eq!(w.robot_position(RobotId(0)).unwrap(), p(1, 2));
        assert!(w.step());
        assert!(!w.step());
        assert_eq!(w.robot_position(RobotId(0)).unwrap(), p(1, 3));
        assert_eq!(w.robot_position(RobotId(1)).unwrap(), p(2, 1));
        assert_eq!(w.tick(), 3);
        assert!(w.is_valid());
    }

    #[test]
    fn swap_is_flagged_then_cleared() {
        let robots = vec![Robot::new(RobotId(0), p(1, 1)), Robot::new(RobotId(1), p(1, 2))];
        let mut w = World::new(Grid::new(3, 4), robots).unwrap();
        w.set_robot_path(RobotId(0), vec![p(1, 2)]).unwrap();
        w.set_robot_path(RobotId(1), vec![p(1, 1)]).unwrap();

        w.step();
        assert_eq!(w.last_collision().unwrap().kind, ViolationKind::Edge);
        assert!(!w.is_valid());

        w.step();
        assert!(w.is_valid());
    }

    #[test]
    fn driving_into_a_wall_is_flagged() {
        let mut w = World::from_layout(&layout()).unwrap();
        w.set_robot_path(RobotId(0), vec![p(0, 1)]).unwrap();
        w.step();
        assert_eq!(w.last_collision().unwrap().kind, ViolationKind::Wall);
        assert!(w.render_ascii().starts_with("#X###"));
    }

    #[test]
    fn item_handling_through_the_store() {
        let mut w = World::from_layout(&layout()).unwrap();
        assert!(w.hold_item(RobotId(0), ItemId(0)).unwrap());
        assert!(!w.hold_item(RobotId(0), ItemId(1)).unwrap());
        assert_eq!(w.drop_item(RobotId(0)).unwrap(), Some(ItemId(0)));
        w.set_robot_status(RobotId(0), RobotStatus::InProgress).unwrap();
        assert_eq!(w.robot(RobotId(0)).unwrap().status, RobotStatus::InProgress);
    }

    #[test]
    fn unknown_and_duplicate_robots() {
        let mut w = World::from_layout(&layout()).unwrap();
        assert!(matches!(w.robot(RobotId(9)), Err(WorldError::RobotNotFound(RobotId(9)))));
        assert!(w.set_robot_path(RobotId(9), vec![]).is_err());

        let dup = vec![Robot::new(RobotId(0), p(0, 0)), Robot::new(RobotId(0), p(0, 1))];
        assert!(matches!(World::new(Grid::new(2, 2), dup), Err(WorldError::DuplicateRobot(_))));
    }

    #[test]
    fn render_marks_robots() {
        let w = World::from_layout(&layout()).unwrap();
        assert_eq!(w.render_ascii(), "#####\n#R..#\n#R..#\n#####\n");
    }
}
