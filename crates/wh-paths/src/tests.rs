//! Unit tests for wh-paths.

#[cfg(test)]
mod helpers {
    use wh_core::{Grid, Position};

    /// Walled 6x6 map with a single corridor from (1,4) to (3,4).
    pub const WALL_RING: &str = "
        ######
        #....#
        #.####
        #.#..#
        #...##
        ######
    ";

    pub fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    pub fn grid(text: &str) -> Grid {
        Grid::parse_ascii(text).unwrap()
    }

    pub fn ring_path() -> Vec<Position> {
        vec![p(1, 4), p(1, 3), p(1, 2), p(1, 1), p(2, 1), p(3, 1), p(4, 1), p(4, 2), p(4, 3), p(3, 3), p(3, 4)]
    }

    pub fn assert_connected(path: &[Position]) {
        for w in path.windows(2) {
            assert!(w[0].is_adjacent_or_same(w[1]), "jump {} -> {}", w[0], w[1]);
        }
    }
}

// ── heuristics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod heuristic {
    use super::helpers::*;
    use crate::{Euclidean, Heuristic, Manhattan, TrueDistance};

    #[test]
    fn closed_forms() {
        assert!((Euclidean.estimate(p(0, 0), p(3, 4)) - 5.0).abs() < 1e-9);
        assert_eq!(Manhattan.estimate(p(0, 0), p(3, 4)), 7.0);
    }

    #[test]
    fn true_distance_follows_corridor() {
        let g = grid(WALL_RING);
        let td = TrueDistance::build(&g);
        assert_eq!(td.len(), g.free_cells().count());
        assert_eq!(td.distance(p(1, 4), p(3, 4)), Some(10));
        assert_eq!(td.distance(p(0, 0), p(3, 4)), None);
        assert_eq!(td.estimate(p(1, 4), p(3, 4)), 10.0);
    }

    #[test]
    fn for_goals_skips_walls_and_falls_back() {
        let g = grid(WALL_RING);
        let td = TrueDistance::for_goals(&g, [p(3, 4), p(0, 0), p(3, 4)]);
        assert_eq!(td.len(), 1);
        // No table for (1,1): Euclidean.
        assert!((td.estimate(p(1, 4), p(1, 1)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn unreachable_is_infinite() {
        let g = grid("..#..");
        let td = TrueDistance::for_goals(&g, [p(0, 4)]);
        assert_eq!(td.estimate(p(0, 0), p(0, 4)), f64::INFINITY);
        assert_eq!(td.estimate(p(0, 3), p(0, 4)), 1.0);
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use super::helpers::*;
    use crate::{Euclidean, PathError, TrueDistance, astar, astar_with_budget};
    use wh_core::SimRng;

    #[test]
    fn wall_ring_exact_path() {
        let g = grid(WALL_RING);
        assert_eq!(astar(&g, p(1, 4), p(3, 4), &Euclidean).unwrap(), ring_path());
    }

    #[test]
    fn start_equals_goal() {
        let g = grid(WALL_RING);
        assert_eq!(astar(&g, p(1, 1), p(1, 1), &Euclidean).unwrap(), vec![p(1, 1)]);
    }

    #[test]
    fn bad_endpoints_are_errors() {
        let g = grid(WALL_RING);
        assert_eq!(astar(&g, p(0, 0), p(3, 4), &Euclidean), Err(PathError::Blocked(p(0, 0))));
        assert_eq!(astar(&g, p(1, 1), p(9, 9), &Euclidean), Err(PathError::OutOfBounds(p(9, 9))));
    }

    #[test]
    fn unreachable_is_empty() {
        let g = grid("..#..");
        assert!(astar(&g, p(0, 0), p(0, 4), &Euclidean).unwrap().is_empty());
    }

    #[test]
    fn budget_exhaustion_is_empty() {
        let g = grid(WALL_RING);
        let out = astar_with_budget(&g, p(1, 4), p(3, 4), &Euclidean, 3).unwrap();
        assert!(out.path.is_empty());
        assert_eq!(out.expanded, 3);
    }

    #[test]
    fn true_distance_expands_fewer_nodes() {
        let g = grid(
            "
            .........
            ..#####..
            ......#..
            ..#####..
            .........
            ",
        );
        let (s, t) = (p(2, 5), p(2, 8));
        let td = TrueDistance::for_goals(&g, [t]);
        let euclid = astar_with_budget(&g, s, t, &Euclidean, 10_000).unwrap();
        let exact = astar_with_budget(&g, s, t, &td, 10_000).unwrap();
        assert_eq!(euclid.path.len(), 16);
        assert_eq!(exact.path.len(), 16);
        assert!(exact.expanded < euclid.expanded, "{} vs {}", exact.expanded, euclid.expanded);
    }

    #[test]
    fn random_grids_give_shortest_connected_paths() {
        let mut rng = SimRng::new(0x5eed);
        for _ in 0..40 {
            let g = rng.random_grid(12, 12, 0.25).unwrap();
            let (Some(s), Some(t)) = (rng.free_cell(&g), rng.free_cell(&g)) else { continue };
            let path = astar(&g, s, t, &Euclidean).unwrap();
            let exact = TrueDistance::for_goals(&g, [t]).distance(s, t);

            match exact {
                None => assert!(path.is_empty()),
                Some(d) => {
                    assert_eq!(path.first(), Some(&s));
                    assert_eq!(path.last(), Some(&t));
                    assert_eq!(path.len() as u32, d + 1);
                    assert_connected(&path);
                    assert!(path.iter().all(|c| g.is_free(*c)));
                }
            }
        }
    }
}

// ── Space-Time A* ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod st_astar {
    use super::helpers::*;
    use crate::{DynamicObstacles, PathError, SpaceTimeQuery, StaticObstacles, TrueDistance, space_time_astar};
    use crate::Euclidean;
    use wh_core::SimRng;

    #[test]
    fn end_fast_matches_astar() {
        let g = grid(WALL_RING);
        let path = SpaceTimeQuery::new(&g, p(1, 4), p(3, 4)).end_fast(true).run().unwrap();
        assert_eq!(path, ring_path());
    }

    #[test]
    fn pads_with_waits_to_horizon() {
        let g = grid(WALL_RING);
        let path = SpaceTimeQuery::new(&g, p(1, 4), p(3, 4)).max_time(12).run().unwrap();
        let mut expected = ring_path();
        expected.extend([p(3, 4), p(3, 4)]);
        assert_eq!(path, expected);
    }

    #[test]
    fn start_offset_does_not_change_end_fast_path() {
        let g = grid(WALL_RING);
        let path = SpaceTimeQuery::new(&g, p(1, 4), p(3, 4)).start_time(123).end_fast(true).run().unwrap();
        assert_eq!(path, ring_path());
    }

    #[test]
    fn waits_out_a_dynamic_obstacle() {
        let g = grid(".....");
        let mut dynamic = DynamicObstacles::default();
        dynamic.insert((p(0, 2), 2));
        let path = space_time_astar(&g, p(0, 0), p(0, 4), &dynamic, &StaticObstacles::default(), 20, 0, true, &Euclidean)
            .unwrap();
        assert_eq!(path, vec![p(0, 0), p(0, 1), p(0, 1), p(0, 2), p(0, 3), p(0, 4)]);
    }

    #[test]
    fn dodges_around_a_blocked_step() {
        let g = grid("...\n...\n...");
        let mut dynamic = DynamicObstacles::default();
        dynamic.insert((p(1, 1), 1));
        let path = SpaceTimeQuery::new(&g, p(1, 0), p(1, 2)).dynamic_obstacles(&dynamic).end_fast(true).run().unwrap();
        assert_eq!(path, vec![p(1, 0), p(1, 0), p(1, 1), p(1, 2)]);
    }

    #[test]
    fn static_obstacle_cuts_corridor() {
        let g = grid(".....");
        let mut statics = StaticObstacles::default();
        statics.insert(p(0, 2));
        let path = SpaceTimeQuery::new(&g, p(0, 0), p(0, 4)).static_obstacles(&statics).end_fast(true).run().unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn static_obstacle_on_endpoint() {
        let g = grid(".....");
        let mut statics = StaticObstacles::default();
        statics.insert(p(0, 0));
        let q = SpaceTimeQuery::new(&g, p(0, 0), p(0, 1)).static_obstacles(&statics).end_fast(true);
        assert!(q.run().unwrap().is_empty());
        assert_eq!(q.validate_ends(false).run().unwrap(), vec![p(0, 0), p(0, 1)]);
    }

    #[test]
    fn wall_endpoint_is_error() {
        let g = grid(WALL_RING);
        let err = SpaceTimeQuery::new(&g, p(1, 4), p(0, 4)).run().unwrap_err();
        assert_eq!(err, PathError::Blocked(p(0, 4)));
    }

    #[test]
    fn horizon_too_short_is_empty() {
        let g = grid(WALL_RING);
        assert!(SpaceTimeQuery::new(&g, p(1, 4), p(3, 4)).max_time(5).end_fast(true).run().unwrap().is_empty());
        // Start already past the absolute horizon.
        assert!(SpaceTimeQuery::new(&g, p(1, 4), p(1, 4)).start_time(30).run().unwrap().is_empty());
    }

    #[test]
    fn pop_budget_is_respected() {
        let g = grid(WALL_RING);
        let out = SpaceTimeQuery::new(&g, p(1, 4), p(3, 4)).max_iters(4).run_with_stats().unwrap();
        assert!(out.path.is_empty());
        assert_eq!(out.expanded, 4);
    }

    #[test]
    fn fixed_horizon_length_on_random_grids() {
        let mut rng = SimRng::new(42);
        let mut checked = 0;
        for _ in 0..40 {
            let g = rng.random_grid(10, 10, 0.2).unwrap();
            let (Some(s), Some(t)) = (rng.free_cell(&g), rng.free_cell(&g)) else { continue };
            let Some(d) = TrueDistance::for_goals(&g, [t]).distance(s, t) else { continue };

            let start_time = 3;
            let max_time = start_time + d + 2;
            let path = SpaceTimeQuery::new(&g, s, t)
                .start_time(start_time)
                .max_time(max_time)
                .max_iters(100_000)
                .run()
                .unwrap();
            assert_eq!(path.len() as u32, max_time - start_time + 1);
            assert_eq!(path.first(), Some(&s));
            assert_eq!(path.last(), Some(&t));
            assert_connected(&path);
            checked += 1;
        }
        assert!(checked > 10);
    }
}

// ── collisions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod collision {
    use super::helpers::*;
    use crate::{Collision, CollisionKind, find_all_collisions, find_collisions};

    #[test]
    fn single_vertex_collision() {
        let a = [p(0, 0), p(0, 1), p(0, 1), p(0, 2)];
        let b = [p(1, 0), p(1, 1), p(0, 1), p(0, 0)];
        assert_eq!(
            find_collisions(&a, &b, 1),
            vec![Collision { path: 1, pos: p(0, 1), time: 2, kind: CollisionKind::Vertex }]
        );
    }

    #[test]
    fn swap_is_edge_collision_on_second_path() {
        let a = [p(0, 0), p(0, 1)];
        let b = [p(0, 1), p(0, 0)];
        assert_eq!(
            find_collisions(&a, &b, 7),
            vec![Collision { path: 7, pos: p(0, 0), time: 1, kind: CollisionKind::Edge }]
        );
    }

    #[test]
    fn waiting_together_is_not_a_swap() {
        let a = [p(0, 0), p(0, 0)];
        let kinds: Vec<_> = find_collisions(&a, &a, 1).into_iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CollisionKind::Vertex, CollisionKind::Vertex]);
    }

    #[test]
    fn shorter_path_waits_at_its_end() {
        let a = [p(0, 0)];
        let b = [p(0, 2), p(0, 1), p(0, 0)];
        let c = find_collisions(&a, &b, 1);
        assert_eq!(c.len(), 1);
        assert_eq!((c[0].pos, c[0].time), (p(0, 0), 2));
    }

    #[test]
    fn empty_path_never_collides() {
        assert!(find_collisions(&[], &[p(0, 0)], 1).is_empty());
    }

    #[test]
    fn swapping_inputs_keeps_detection() {
        let a = [p(0, 0), p(0, 1), p(0, 2)];
        let b = [p(1, 1), p(0, 1), p(1, 1)];
        let ab: Vec<_> = find_collisions(&a, &b, 1).iter().map(|c| (c.pos, c.time)).collect();
        let ba: Vec<_> = find_collisions(&b, &a, 0).iter().map(|c| (c.pos, c.time)).collect();
        assert_eq!(ab, ba);
    }

    #[test]
    fn all_pairs_in_index_order() {
        let paths = vec![
            vec![p(0, 0), p(0, 1)],
            vec![p(0, 1), p(0, 1)],
            vec![p(1, 1), p(0, 1)],
        ];
        let got: Vec<_> = find_all_collisions(&paths).iter().map(|c| (c.path, c.time)).collect();
        // (0,1) at t=1, (0,2) at t=1, (1,2) at t=1
        assert_eq!(got, vec![(1, 1), (2, 1), (2, 1)]);
    }
}

// ── MAPF ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mapf {
    use super::helpers::*;
    use crate::{Collision, CollisionKind, Euclidean, PathError, find_all_collisions, mapf0, mapf1, resolve_collisions};
    use wh_core::PlannerConfig;

    const OPEN_5X5: &str = "
        .....
        .....
        .....
        .....
        .....
    ";

    #[test]
    fn mapf0_reports_crossing() {
        let g = grid(OPEN_5X5);
        let cfg = PlannerConfig::default();
        let paths = mapf0(&g, &[p(2, 0), p(0, 2)], &[p(2, 4), p(4, 2)], &Euclidean, &cfg).unwrap();
        assert_eq!(paths[0], vec![p(2, 0), p(2, 1), p(2, 2), p(2, 3), p(2, 4)]);
        assert_eq!(
            find_all_collisions(&paths),
            vec![Collision { path: 1, pos: p(2, 2), time: 2, kind: CollisionKind::Vertex }]
        );
    }

    #[test]
    fn mapf1_resolves_crossing_in_one_round() {
        let g = grid(OPEN_5X5);
        let cfg = PlannerConfig::default();
        let out = mapf1(&g, &[p(2, 0), p(0, 2)], &[p(2, 4), p(4, 2)], &Euclidean, &cfg).unwrap();

        assert!(out.is_collision_free());
        assert_eq!(out.iterations, 1);
        assert_eq!(out.paths[0], vec![p(2, 0), p(2, 1), p(2, 2), p(2, 3), p(2, 4)]);

        let replanned = &out.paths[1];
        assert_eq!(replanned.len(), cfg.st_max_time as usize + 1);
        assert_eq!(&replanned[..5], &[p(0, 2), p(1, 2), p(1, 2), p(2, 2), p(3, 2)]);
        assert!(replanned[5..].iter().all(|c| *c == p(4, 2)));
    }

    #[test]
    fn mapf1_resolves_head_on() {
        let g = grid("
            .....
            .....
            .....
        ");
        let starts = [p(1, 0), p(1, 4)];
        let goals = [p(1, 4), p(1, 0)];
        let out = mapf1(&g, &starts, &goals, &Euclidean, &PlannerConfig::default()).unwrap();
        assert!(out.is_collision_free());
        assert_eq!(out.iterations, 2);
        for (i, path) in out.paths.iter().enumerate() {
            assert_eq!(path.first(), Some(&starts[i]));
            assert_eq!(path.last(), Some(&goals[i]));
            assert_connected(path);
        }
    }

    #[test]
    fn already_free_paths_are_untouched() {
        let g = grid(OPEN_5X5);
        let cfg = PlannerConfig::default();
        let (starts, goals) = ([p(2, 0), p(0, 2)], [p(2, 4), p(4, 2)]);
        let first = mapf1(&g, &starts, &goals, &Euclidean, &cfg).unwrap();
        let again = resolve_collisions(&g, &starts, &goals, first.paths.clone(), &Euclidean, &cfg).unwrap();
        assert_eq!(again.iterations, 0);
        assert_eq!(again.paths, first.paths);
    }

    #[test]
    fn zero_budget_returns_colliding_paths() {
        let g = grid(OPEN_5X5);
        let cfg = PlannerConfig { mapf_max_iterations: 0, ..PlannerConfig::default() };
        let out = mapf1(&g, &[p(2, 0), p(0, 2)], &[p(2, 4), p(4, 2)], &Euclidean, &cfg).unwrap();
        assert_eq!(out.iterations, 0);
        assert_eq!(out.collisions.len(), 1);
    }

    #[test]
    fn mismatched_lengths() {
        let g = grid(OPEN_5X5);
        let err = mapf0(&g, &[p(0, 0)], &[], &Euclidean, &PlannerConfig::default()).unwrap_err();
        assert_eq!(err, PathError::LengthMismatch { starts: 1, goals: 0 });
    }
}

// ── planners ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use super::helpers::*;
    use crate::{AStarPlanner, Euclidean, PathPlanner, SpaceTimePlanner};
    use wh_core::PlannerConfig;

    #[test]
    fn astar_planner_matches_free_function() {
        let g = grid(WALL_RING);
        assert_eq!(AStarPlanner::<Euclidean>::default().plan(&g, p(1, 4), p(3, 4)).unwrap(), ring_path());
    }

    #[test]
    fn boxed_heuristic_planner() {
        let g = grid(WALL_RING);
        let planner = AStarPlanner::new(Box::new(Euclidean) as Box<dyn crate::Heuristic>, &PlannerConfig::default());
        assert_eq!(planner.plan(&g, p(1, 4), p(3, 4)).unwrap(), ring_path());
    }

    #[test]
    fn space_time_planner_avoids_reservations() {
        let g = grid(".....");
        let mut planner = SpaceTimePlanner::new(Euclidean, &PlannerConfig::default());
        planner.reserve_path(&[p(0, 2)], 2);
        assert_eq!(
            planner.plan(&g, p(0, 0), p(0, 4)).unwrap(),
            vec![p(0, 0), p(0, 1), p(0, 1), p(0, 2), p(0, 3), p(0, 4)]
        );
        planner.clear();
        assert_eq!(planner.plan(&g, p(0, 0), p(0, 4)).unwrap().len(), 5);
    }
}

// ── codecs ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod encode {
    use super::helpers::*;
    use crate::{PathError, decode_directions, encode_directions, path_to_actions};
    use wh_core::Action;

    #[test]
    fn direction_string() {
        let start = p(1, 1);
        let path = vec![p(1, 2), p(2, 2), p(2, 2), p(2, 1), p(1, 1)];
        let enc = encode_directions(start, &path).unwrap();
        assert_eq!(enc, "RDWLU");
        assert_eq!(decode_directions(start, &enc).unwrap(), path);
        assert_eq!(encode_directions(start, &[]).unwrap(), "");
        assert!(decode_directions(start, "").unwrap().is_empty());
    }

    #[test]
    fn bad_direction_letter() {
        assert_eq!(decode_directions(p(0, 0), "UX"), Err(PathError::InvalidDirection('X')));
    }

    #[test]
    fn actions_from_path() {
        let path = [p(0, 0), p(0, 1), p(0, 1), p(1, 1)];
        assert_eq!(path_to_actions(&path).unwrap(), vec![Action::Right, Action::Wait, Action::Down]);
        assert_eq!(
            path_to_actions(&[p(0, 0), p(2, 0)]),
            Err(PathError::InvalidStep { from: p(0, 0), to: p(2, 0) })
        );
    }
}
