//! Unit tests for tw-layout.

#[cfg(test)]
mod helpers {
    use tw_topology::Bounds;

    /// `-2..=2` on both axes.
    pub fn small() -> Bounds {
        Bounds::new(-2, 2, -2, 2)
    }

    /// `-5..=5` on both axes.
    pub fn medium() -> Bounds {
        Bounds::new(-5, 5, -5, 5)
    }

    pub fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }
}

// ── Graph view ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use crate::LayoutGraph;

    #[test]
    fn degrees_count_only_movable_ends() {
        let g = LayoutGraph::new(2, vec![(0, 1), (0, 2), (1, 3)]);
        assert_eq!(g.degrees(), vec![2, 2]);
    }

    #[test]
    fn anchors_in_first_seen_order() {
        let g = LayoutGraph::new(2, vec![(0, 3), (2, 1), (3, 4)]);
        assert_eq!(g.anchors(), vec![3, 2, 4]);
    }
}

// ── Spring ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spring {
    use tw_core::WorldRng;
    use tw_topology::Bounds3d;
    use super::helpers::{approx, small};
    use crate::{spring_2d, spring_3d, LayoutGraph, SpringParams};

    #[test]
    fn unlinked_pair_stays_finite_and_in_bounds() {
        let bounds = small();
        let graph = LayoutGraph::new(2, vec![]);
        let params = SpringParams::new(0.2, 1.0, 1.0);
        let mut rng = WorldRng::new(7);
        let mut pos = vec![[0.0, 0.0], [0.0, 0.0]];
        for _ in 0..500 {
            spring_2d(&mut pos, &graph, &params, &bounds, &mut rng);
            for p in &pos {
                assert!(p[0].is_finite() && p[1].is_finite());
                assert!((-2.0..=2.0).contains(&p[0]));
                assert!((-2.0..=2.0).contains(&p[1]));
            }
        }
        assert_ne!(pos[0], pos[1]);
    }

    #[test]
    fn near_coincident_pair_is_pushed_apart_without_nan() {
        // 1e-170 squared underflows to zero, so the inverse-square force
        // would be infinite.
        let bounds = small();
        let graph = LayoutGraph::new(2, vec![]);
        let params = SpringParams::new(0.2, 5.0, 1.0);
        let mut rng = WorldRng::new(42);
        let mut pos = vec![[0.0, 0.0], [0.0, 1e-170]];
        spring_2d(&mut pos, &graph, &params, &bounds, &mut rng);
        for p in &pos {
            assert!(p[0].is_finite() && p[1].is_finite(), "{p:?}");
        }
        assert_ne!(pos[0], pos[1]);
    }

    #[test]
    fn near_coincident_pair_in_3d_stays_finite() {
        let bounds = Bounds3d::centered(3, 3, 3);
        let graph = LayoutGraph::new(2, vec![]);
        let params = SpringParams::new(0.2, 5.0, 1.0);
        let mut rng = WorldRng::new(9);
        let mut pos = vec![[0.0, 0.0, 0.0], [1e-170, 0.0, 0.0]];
        spring_3d(&mut pos, &graph, &params, &bounds, &mut rng);
        assert!(pos.iter().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn stretched_link_contracts_by_the_step_limit() {
        // Width + height = 10, so no axis moves more than 0.2 per step.
        let bounds = small();
        let graph = LayoutGraph::new(2, vec![(0, 1)]);
        let params = SpringParams::new(1.0, 1.0, 0.0);
        let mut rng = WorldRng::new(1);
        let mut pos = vec![[-2.0, 0.0], [2.0, 0.0]];
        spring_2d(&mut pos, &graph, &params, &bounds, &mut rng);
        assert!(approx(pos[0][0], -1.8));
        assert!(approx(pos[0][1], 0.0));
        assert!(approx(pos[1][0], 1.8));
        assert!(approx(pos[1][1], 0.0));
    }

    #[test]
    fn fixed_endpoints_are_never_written() {
        let bounds = small();
        let graph = LayoutGraph::new(1, vec![(0, 1)]);
        let params = SpringParams::new(1.0, 0.5, 1.0);
        let mut rng = WorldRng::new(3);
        let mut pos = vec![[0.0, 0.0], [2.0, 1.0]];
        spring_2d(&mut pos, &graph, &params, &bounds, &mut rng);
        assert_eq!(pos[1], [2.0, 1.0]);
        assert!(pos[0][0] > 0.0);
    }

    #[test]
    fn same_seed_same_layout() {
        let bounds = small();
        let graph = LayoutGraph::new(4, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        let params = SpringParams::new(0.3, 1.0, 0.5);
        let run = |seed| {
            let mut rng = WorldRng::new(seed);
            let mut pos = vec![[0.0, 0.0]; 4];
            for _ in 0..50 {
                spring_2d(&mut pos, &graph, &params, &bounds, &mut rng);
            }
            pos
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn three_d_coincident_nodes_separate() {
        let bounds = Bounds3d::centered(3, 3, 3);
        let graph = LayoutGraph::new(3, vec![(0, 1)]);
        let params = SpringParams::new(0.2, 1.0, 1.0);
        let mut rng = WorldRng::new(5);
        let mut pos = vec![[0.0, 0.0, 0.0]; 3];
        for _ in 0..100 {
            spring_3d(&mut pos, &graph, &params, &bounds, &mut rng);
        }
        for p in &pos {
            assert!(p.iter().all(|c| c.is_finite() && (-3.0..=3.0).contains(c)));
        }
        assert_ne!(pos[0], pos[2]);
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let mut rng = WorldRng::new(0);
        let before = rng.clone().next_double();
        let mut pos: Vec<[f64; 2]> = vec![];
        spring_2d(&mut pos, &LayoutGraph::default(), &SpringParams::new(1.0, 1.0, 1.0), &small(), &mut rng);
        assert_eq!(rng.next_double(), before);
    }
}

// ── Circle + Tutte ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tutte {
    use tw_topology::Bounds;
    use super::helpers::{approx, medium, small};
    use crate::{circle, tutte, tutte_step, LayoutGraph, TUTTE_STEP_LIMIT};

    #[test]
    fn circle_of_four_hits_the_compass_points() {
        let ring = circle(4, 1.0, &small());
        let got: Vec<(f64, f64, f64)> = ring.iter().map(|p| (p.x, p.y, p.heading)).collect();
        assert_eq!(got, vec![
            (0.0, 1.0, 0.0),
            (1.0, 0.0, 90.0),
            (0.0, -1.0, 180.0),
            (-1.0, 0.0, 270.0),
        ]);
    }

    #[test]
    fn circle_headings_are_whole_degrees() {
        let ring = circle(7, 1.0, &small());
        let headings: Vec<f64> = ring.iter().map(|p| p.heading).collect();
        assert_eq!(headings, vec![0.0, 51.0, 102.0, 154.0, 205.0, 257.0, 308.0]);
    }

    #[test]
    fn circle_centre_rounds_toward_min_on_even_worlds() {
        // 0..=3 wide: the middle patch is 0 + 4/2 = 2.
        let ring = circle(1, 0.0, &Bounds::new(0, 3, 0, 3));
        assert_eq!((ring[0].x, ring[0].y), (2.0, 2.0));
    }

    #[test]
    fn node_moves_to_the_centroid_of_its_anchors() {
        let graph = LayoutGraph::new(1, vec![(0, 1), (2, 0)]);
        let mut pos = vec![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]];
        let moved = tutte_step(&mut pos, &graph, &medium());
        assert_eq!(pos[0], [1.0, 1.0]);
        assert!(approx(moved, 1.0));
        assert_eq!(pos[1], [2.0, 0.0]);
    }

    #[test]
    fn converges_and_reports_iterations() {
        let graph = LayoutGraph::new(1, vec![(0, 1), (2, 0)]);
        let mut pos = vec![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]];
        let report = tutte(&mut pos, &graph, &medium(), 10, 1e-9);
        assert!(report.converged);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.last_step, 0.0);
    }

    #[test]
    fn budget_stops_an_unconverged_run() {
        // Two movable nodes chained between two anchors approach the
        // barycentric solution geometrically, never exactly.
        let graph = LayoutGraph::new(2, vec![(2, 0), (0, 1), (1, 3)]);
        let mut pos = vec![[0.0, 0.0], [0.0, 0.0], [-3.0, 0.0], [3.0, 0.0]];
        let report = tutte(&mut pos, &graph, &medium(), 3, 0.0);
        assert!(!report.converged);
        assert_eq!(report.iterations, 3);
    }

    #[test]
    fn steps_are_limited_and_clamped() {
        let wide = Bounds::new(-500, 500, -10, 10);
        let graph = LayoutGraph::new(1, vec![(0, 1)]);
        let mut pos = vec![[0.0, 0.0], [300.0, 50.0]];
        tutte_step(&mut pos, &graph, &wide);
        assert_eq!(pos[0], [TUTTE_STEP_LIMIT, 10.0]);
    }

    #[test]
    fn isolated_node_stays_put() {
        let graph = LayoutGraph::new(2, vec![(0, 2)]);
        let mut pos = vec![[0.0, 0.0], [1.5, -1.5], [2.0, 2.0]];
        tutte_step(&mut pos, &graph, &medium());
        assert_eq!(pos[1], [1.5, -1.5]);
    }
}

// ── Radial ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod radial {
    use super::helpers::{approx, medium};
    use crate::radial;

    fn adjacency(edges: &[(usize, usize)], n: usize) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); n];
        for &(a, b) in edges {
            adj[a].push(b);
            adj[b].push(a);
        }
        adj
    }

    #[test]
    fn star_splits_the_circle_evenly() {
        let adj = adjacency(&[(0, 1), (0, 2)], 4);
        let out = radial(4, 0, |i| adj[i].clone(), &medium());
        let root = out[0].unwrap();
        assert_eq!((root.x, root.y, root.heading), (0.0, 0.0, 180.0));

        // One level deep: max depth 1.2, five patches to the edge.
        let gap = 5.0 / 1.2;
        let a = out[1].unwrap();
        assert!(approx(a.x, gap) && approx(a.y, 0.0));
        assert_eq!(a.heading, 90.0);
        let b = out[2].unwrap();
        assert!(approx(b.x, -gap) && approx(b.y, 0.0));
        assert_eq!(b.heading, 270.0);

        assert!(out[3].is_none());
    }

    #[test]
    fn heavier_subtrees_get_wider_sectors() {
        // 1 has two children, 2 has none: weights 3 and 1.
        let adj = adjacency(&[(0, 1), (0, 2), (1, 3), (1, 4)], 5);
        let out = radial(5, 0, |i| adj[i].clone(), &medium());
        assert_eq!(out[1].unwrap().heading, 135.0);
        assert_eq!(out[2].unwrap().heading, 315.0);
        assert_eq!(out[3].unwrap().heading, 67.5);
        assert_eq!(out[4].unwrap().heading, 202.5);
    }

    #[test]
    fn neighbours_outside_the_set_are_skipped() {
        let out = radial(2, 0, |i| if i == 0 { vec![5, 1] } else { vec![0] }, &medium());
        assert!(out.iter().all(Option::is_some));
    }

    #[test]
    fn root_outside_the_set_places_nothing() {
        let out = radial(2, 3, |_| vec![], &medium());
        assert!(out.iter().all(Option::is_none));
    }
}
