//! Unit tests for wh-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ItemId, RobotId, StationId};

    #[test]
    fn index_and_display() {
        assert_eq!(RobotId(3).index(), 3);
        assert_eq!(StationId(2).to_string(), "StationId(2)");
        assert_eq!(ItemId::from(9), ItemId(9));
    }

    #[test]
    fn ordering() {
        assert!(RobotId(0) < RobotId(1));
    }
}

#[cfg(test)]
mod geom {
    use crate::{Action, Position, flip_path_xy};

    #[test]
    fn neighbors_fixed_order() {
        let p = Position::new(2, 2);
        assert_eq!(
            p.neighbors4(),
            [Position::new(1, 2), Position::new(3, 2), Position::new(2, 1), Position::new(2, 3)]
        );
    }

    #[test]
    fn action_between_adjacent_cells() {
        let p = Position::new(4, 4);
        assert_eq!(Action::between(p, p), Some(Action::Wait));
        assert_eq!(Action::between(p, Position::new(3, 4)), Some(Action::Up));
        assert_eq!(Action::between(p, Position::new(5, 4)), Some(Action::Down));
        assert_eq!(Action::between(p, Position::new(4, 3)), Some(Action::Left));
        assert_eq!(Action::between(p, Position::new(4, 5)), Some(Action::Right));
        assert_eq!(Action::between(p, Position::new(5, 5)), None);
    }

    #[test]
    fn apply_inverts_between() {
        let p = Position::new(1, 1);
        for a in Action::ALL {
            assert_eq!(Action::between(p, a.apply(p)), Some(a));
        }
    }

    #[test]
    fn opposing_pairs() {
        assert!(Action::Left.opposes(Action::Right));
        assert!(Action::Down.opposes(Action::Up));
        assert!(!Action::Left.opposes(Action::Up));
        assert!(!Action::Wait.opposes(Action::Wait));
    }

    #[test]
    fn char_codec() {
        for a in Action::ALL {
            assert_eq!(Action::from_char(a.as_char()), Some(a));
        }
        assert_eq!(Action::from_char('x'), None);
    }

    #[test]
    fn xy_boundary_flips() {
        let p = Position::from_xy(5, 2);
        assert_eq!(p, Position::new(2, 5));
        assert_eq!(p.to_xy(), (5, 2));
        assert_eq!(flip_path_xy(&[(0, 1), (1, 1)]), vec![Position::new(1, 0), Position::new(1, 1)]);
    }

    #[test]
    fn distances() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(a.manhattan(b), 7);
        assert!((a.euclidean(b) - 5.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod grid {
    use crate::{Cell, Grid, Position};

    const MAP: &str = "
        ####
        #..#
        ####
    ";

    #[test]
    fn parse_ascii() {
        let g = Grid::parse_ascii(MAP).unwrap();
        assert_eq!((g.rows(), g.cols()), (3, 4));
        assert!(g.is_free(Position::new(1, 1)));
        assert!(!g.is_free(Position::new(0, 0)));
        assert_eq!(g.cell(Position::new(-1, 0)), None);
        assert_eq!(g.free_cells().collect::<Vec<_>>(), vec![Position::new(1, 1), Position::new(1, 2)]);
    }

    #[test]
    fn parse_rejects_unknown_symbol() {
        assert!(Grid::parse_ascii("..\n.x").is_err());
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(Grid::from_rows(vec![vec![Cell::Free; 2], vec![Cell::Free; 3]]).is_err());
    }

    #[test]
    fn set_and_display() {
        let mut g = Grid::new(2, 2);
        g.set(Position::new(0, 1), Cell::Wall).unwrap();
        assert!(g.set(Position::new(2, 0), Cell::Wall).is_err());
        assert_eq!(g.to_string(), ".#\n..\n");
    }

    #[test]
    fn free_neighbors_skip_walls_and_edges() {
        let g = Grid::parse_ascii(MAP).unwrap();
        let n: Vec<_> = g.free_neighbors(Position::new(1, 1)).collect();
        assert_eq!(n, vec![Position::new(1, 2)]);
    }
}

#[cfg(test)]
mod config {
    use crate::{AllocatorConfig, PlannerConfig};

    #[test]
    fn defaults() {
        let p = PlannerConfig::default();
        assert_eq!(p.astar_max_expansions, 10_000);
        assert_eq!(p.st_max_time, 20);
        let a = AllocatorConfig::default();
        assert_eq!(a.poll_interval().as_millis(), 200);
        assert!(!a.use_true_heuristic);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<u32> = (0..10).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<u32> = (0..10).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut r = SimRng::new(1);
        let empty: [u8; 0] = [];
        assert!(r.choose(&empty).is_none());
    }

    #[test]
    fn random_grid_extremes() {
        let mut r = SimRng::new(3);
        let open = r.random_grid(4, 5, 0.0).unwrap();
        assert_eq!((open.rows(), open.cols()), (4, 5));
        assert_eq!(open.free_cells().count(), 20);
        let cell = r.free_cell(&open).unwrap();
        assert!(open.is_free(cell));

        let solid = r.random_grid(3, 3, 1.0).unwrap();
        assert_eq!(solid.free_cells().count(), 0);
        assert!(r.free_cell(&solid).is_none());
    }
}
