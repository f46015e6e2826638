//! Unit tests for tw-topology.

#[cfg(test)]
mod helpers {
    use crate::{Bounds, Topology, TopologyKind};

    /// 5×5 world with patch coordinates -2..=2 on both axes.
    pub fn five_by_five(kind: TopologyKind) -> Topology {
        Topology::new(kind, Bounds::new(-2, 2, -2, 2))
    }

    pub const ALL_KINDS: [TopologyKind; 4] = [
        TopologyKind::Torus,
        TopologyKind::VertCylinder,
        TopologyKind::HorizCylinder,
        TopologyKind::Box,
    ];
}

// ── Bounds ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bounds {
    use tw_core::{PatchId, WorldConfig};
    use crate::Bounds;

    #[test]
    fn row_major_from_top_left() {
        let b = Bounds::new(-2, 2, -2, 2);
        assert_eq!(b.patch_id(-2, 2), Some(PatchId(0)));
        assert_eq!(b.patch_id(2, 2), Some(PatchId(4)));
        assert_eq!(b.patch_id(-2, 1), Some(PatchId(5)));
        assert_eq!(b.patch_id(0, 0), Some(PatchId(12)));
        assert_eq!(b.patch_id(3, 0), None);
    }

    #[test]
    fn coords_invert_patch_id() {
        let b = Bounds::new(-3, 4, -1, 2);
        for id in b.patch_ids() {
            let (x, y) = b.coords(id);
            assert_eq!(b.patch_id(x, y), Some(id));
        }
        assert_eq!(b.patch_ids().count(), 32);
    }

    #[test]
    fn from_config_edges() {
        let b = Bounds::from_config(&WorldConfig::centered(16, 10));
        assert_eq!(b.width(), 33);
        assert_eq!(b.height(), 21);
        assert_eq!(b.min_x(), -16.5);
        assert_eq!(b.max_y(), 10.5);
    }
}

// ── Wrapping, distance, heading ───────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use tw_core::geom::euclidean;
    use tw_core::EngineError;
    use super::helpers::{five_by_five, ALL_KINDS};
    use crate::TopologyKind;

    #[test]
    fn five_by_five_torus_scenario() {
        let t = five_by_five(TopologyKind::Torus);
        assert_eq!(t.distance_wrap(0.0, 0.0, 2.0, 0.0), 2.0);
        assert_eq!(t.towards_wrap(0.0, 0.0, 2.0, 0.0).unwrap(), 90.0);
    }

    #[test]
    fn distance_takes_the_short_way_round() {
        let t = five_by_five(TopologyKind::Torus);
        assert_eq!(t.distance_wrap(-2.0, 0.0, 2.0, 0.0), 1.0);
        assert_eq!(t.distance_wrap(0.0, -2.0, 0.0, 2.0), 1.0);

        let b = five_by_five(TopologyKind::Box);
        assert_eq!(b.distance_wrap(-2.0, 0.0, 2.0, 0.0), 4.0);

        let v = five_by_five(TopologyKind::VertCylinder);
        assert_eq!(v.distance_wrap(-2.0, -2.0, 2.0, 2.0), (1.0f64 + 16.0).sqrt());
    }

    #[test]
    fn wrapped_distance_never_exceeds_euclidean() {
        let t = five_by_five(TopologyKind::Torus);
        let coords = [-2.4, -1.7, -0.5, 0.0, 0.3, 1.25, 2.0, 2.49];
        for &x1 in &coords {
            for &y1 in &coords {
                for &x2 in &coords {
                    for &y2 in &coords {
                        let w = t.distance_wrap(x1, y1, x2, y2);
                        let e = euclidean(x1, y1, x2, y2);
                        assert!(w <= e + 1e-12);
                        if (x2 - x1).abs() <= 2.5 && (y2 - y1).abs() <= 2.5 {
                            assert!((w - e).abs() < 1e-12);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn towards_uses_wrapped_delta() {
        let t = five_by_five(TopologyKind::Torus);
        assert_eq!(t.towards_wrap(2.0, 0.0, -2.0, 0.0).unwrap(), 90.0);
        let b = five_by_five(TopologyKind::Box);
        assert_eq!(b.towards_wrap(2.0, 0.0, -2.0, 0.0).unwrap(), 270.0);
        assert!((b.towards_wrap(0.0, 0.0, 1.0, 1.0).unwrap() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn towards_self_is_an_error() {
        let t = five_by_five(TopologyKind::Torus);
        assert!(matches!(t.towards_wrap(1.0, 1.0, 1.0, 1.0), Err(EngineError::NoHeading { .. })));
    }

    #[test]
    fn wrap_or_refuse_per_axis() {
        let t = five_by_five(TopologyKind::Torus);
        assert_eq!(t.wrap_x(2.5).unwrap(), -2.5);
        assert_eq!(t.wrap_y(-3.0).unwrap(), 2.0);

        let v = five_by_five(TopologyKind::VertCylinder);
        assert_eq!(v.wrap_x(3.0).unwrap(), -2.0);
        assert_eq!(v.wrap_y(2.5), Err(EngineError::BeyondEdge));

        let h = five_by_five(TopologyKind::HorizCylinder);
        assert_eq!(h.wrap_x(-2.6), Err(EngineError::BeyondEdge));
        assert_eq!(h.wrap_y(2.5).unwrap(), -2.5);

        for kind in ALL_KINDS {
            let t = five_by_five(kind);
            assert_eq!(t.wrap_x(1.25).unwrap(), 1.25);
            assert_eq!(t.wrap_y(-2.5).unwrap(), -2.5);
            assert!(matches!(t.wrap_x(f64::INFINITY), Err(EngineError::Domain(_))));
            assert!(matches!(t.wrap_y(f64::NAN), Err(EngineError::Domain(_))));
        }
    }

    #[test]
    fn shortest_path_picks_nearest_copy() {
        let t = five_by_five(TopologyKind::Torus);
        assert_eq!(t.shortest_path_x(2.0, -2.0), 3.0);
        assert_eq!(t.shortest_path_y(-2.0, 2.0), -3.0);
        assert_eq!(t.shortest_path_x(0.0, 1.0), 1.0);
        let b = five_by_five(TopologyKind::Box);
        assert_eq!(b.shortest_path_x(2.0, -2.0), -2.0);
    }

    #[test]
    fn kind_from_wrap_flags() {
        assert_eq!(TopologyKind::from_wrap(true, false), TopologyKind::VertCylinder);
        assert!(TopologyKind::VertCylinder.wraps_x());
        assert!(!TopologyKind::VertCylinder.wraps_y());
        assert!(TopologyKind::HorizCylinder.wraps_y());
    }
}

// ── Patch lookup ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod patch_lookup {
    use tw_core::PatchId;
    use super::helpers::five_by_five;
    use crate::{round_coord, TopologyKind};

    #[test]
    fn rounds_to_nearest_centre() {
        assert_eq!(round_coord(-0.5), 0);
        assert_eq!(round_coord(0.49), 0);
        assert_eq!(round_coord(0.5), 1);
        assert_eq!(round_coord(-1.7), -2);
    }

    #[test]
    fn patch_at_wraps_or_misses() {
        let t = five_by_five(TopologyKind::Torus);
        assert_eq!(t.patch_at(2.4, 0.0), Some(PatchId(14)));
        assert_eq!(t.patch_at(2.5, 0.0), Some(PatchId(10)));
        assert_eq!(t.patch_at_coords(3, 3), Some(PatchId(20)));

        let b = five_by_five(TopologyKind::Box);
        assert_eq!(b.patch_at(2.5, 0.0), None);
        assert_eq!(b.patch_at_coords(3, 0), None);
    }
}

// ── Neighborhoods ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod neighbors {
    use tw_core::PatchId;
    use super::helpers::five_by_five;
    use crate::{Bounds, NeighborCache, Topology, TopologyKind};

    #[test]
    fn order_is_n_e_s_w_then_diagonals() {
        let t = five_by_five(TopologyKind::Box);
        let b = t.bounds();
        let centre = b.patch_id(0, 0).unwrap();
        let expect: Vec<PatchId> = [(0, 1), (1, 0), (0, -1), (-1, 0), (1, 1), (1, -1), (-1, -1), (-1, 1)]
            .iter()
            .map(|&(x, y)| b.patch_id(x, y).unwrap())
            .collect();
        assert_eq!(t.neighbors8(centre), expect);
        assert_eq!(t.neighbors4(centre), expect[..4].to_vec());
    }

    #[test]
    fn edges_lose_neighbors_only_where_nothing_wraps() {
        let corner = |kind| {
            let t = five_by_five(kind);
            let p = t.bounds().patch_id(-2, 2).unwrap();
            (t.neighbors8(p).len(), t.neighbors4(p).len())
        };
        assert_eq!(corner(TopologyKind::Torus), (8, 4));
        assert_eq!(corner(TopologyKind::VertCylinder), (5, 3));
        assert_eq!(corner(TopologyKind::HorizCylinder), (5, 3));
        assert_eq!(corner(TopologyKind::Box), (3, 2));

        let t = five_by_five(TopologyKind::Box);
        let edge = t.bounds().patch_id(0, 2).unwrap();
        assert_eq!(t.neighbors8(edge).len(), 5);
    }

    #[test]
    fn thin_torus_special_cases() {
        let single = Topology::new(TopologyKind::Torus, Bounds::new(0, 0, 0, 0));
        assert!(single.neighbors8(PatchId(0)).is_empty());

        let column = Topology::new(TopologyKind::Torus, Bounds::new(0, 0, -2, 2));
        let p = column.bounds().patch_id(0, 0).unwrap();
        let n = column.neighbors8(p);
        assert_eq!(n, vec![
            column.bounds().patch_id(0, 1).unwrap(),
            column.bounds().patch_id(0, -1).unwrap(),
        ]);

        let row = Topology::new(TopologyKind::Torus, Bounds::new(-2, 2, 0, 0));
        let p = row.bounds().patch_id(0, 0).unwrap();
        assert_eq!(row.neighbors8(p), vec![
            row.bounds().patch_id(1, 0).unwrap(),
            row.bounds().patch_id(-1, 0).unwrap(),
        ]);
    }

    #[test]
    fn two_wide_torus_has_no_duplicates() {
        let t = Topology::new(TopologyKind::Torus, Bounds::new(0, 1, 0, 1));
        let n = t.neighbors8(PatchId(0));
        assert_eq!(n.len(), 3);
        assert!(!n.contains(&PatchId(0)));
    }

    #[test]
    fn cache_fills_lazily_and_invalidates() {
        let mut cache = NeighborCache::new(five_by_five(TopologyKind::Torus));
        assert_eq!(cache.cached(), 0);
        assert_eq!(cache.neighbors8(PatchId(0)).len(), 8);
        assert_eq!(cache.neighbors4(PatchId(0)).len(), 4);
        assert_eq!(cache.neighbors4(PatchId(3)).len(), 4);
        assert_eq!(cache.cached(), 2);

        cache.invalidate(five_by_five(TopologyKind::Box));
        assert_eq!(cache.cached(), 0);
        assert_eq!(cache.neighbors8(PatchId(0)).len(), 3);
        assert_eq!(cache.topology().kind(), TopologyKind::Box);
    }

    #[test]
    fn cache_out_of_range_is_empty() {
        let mut cache = NeighborCache::new(five_by_five(TopologyKind::Torus));
        assert!(cache.neighbors8(PatchId(99)).is_empty());
    }
}

// ── Diffusion ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod diffusion {
    use super::helpers::{five_by_five, ALL_KINDS};
    use crate::{diffuse4, diffuse8, Bounds, Topology, TopologyKind};

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i * 7 % 11) as f64 + 0.25 * i as f64).collect()
    }

    #[test]
    fn full_diffusion_conserves_total_everywhere() {
        for kind in ALL_KINDS {
            let t = five_by_five(kind);
            let v = ramp(25);
            let before: f64 = v.iter().sum();
            let after8: f64 = diffuse8(&t, &v, 1.0).iter().sum();
            let after4: f64 = diffuse4(&t, &v, 1.0).iter().sum();
            assert!((before - after8).abs() < 1e-9, "{kind:?}");
            assert!((before - after4).abs() < 1e-9, "{kind:?}");
        }
    }

    #[test]
    fn torus_spike_spreads_evenly() {
        let t = five_by_five(TopologyKind::Torus);
        let mut v = vec![0.0; 25];
        v[12] = 80.0;
        let out = diffuse8(&t, &v, 1.0);
        assert_eq!(out[12], 0.0);
        for n in t.neighbors8(tw_core::PatchId(12)) {
            assert_eq!(out[n.index()], 10.0);
        }
    }

    #[test]
    fn box_corner_keeps_undelivered_share() {
        let t = five_by_five(TopologyKind::Box);
        let mut v = vec![0.0; 25];
        v[0] = 80.0;
        let out = diffuse8(&t, &v, 0.5);
        assert_eq!(out[0], 65.0);
        for n in t.neighbors8(tw_core::PatchId(0)) {
            assert_eq!(out[n.index()], 5.0);
        }
        assert_eq!(out.iter().sum::<f64>(), 80.0);
    }

    #[test]
    fn diffuse4_splits_four_ways() {
        let t = five_by_five(TopologyKind::Torus);
        let mut v = vec![0.0; 25];
        v[12] = 8.0;
        let out = diffuse4(&t, &v, 0.5);
        assert_eq!(out[12], 4.0);
        assert_eq!(out[7], 1.0);
        assert_eq!(out[6], 0.0);
    }

    #[test]
    fn one_wide_torus_counts_repeated_positions() {
        let t = Topology::new(TopologyKind::Torus, Bounds::new(0, 0, -1, 1));
        let v = vec![0.0, 8.0, 0.0];
        let out = diffuse8(&t, &v, 1.0);
        assert_eq!(out, vec![3.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_amount_is_identity() {
        let t = five_by_five(TopologyKind::Box);
        let v = ramp(25);
        assert_eq!(diffuse8(&t, &v, 0.0), v);
    }
}

// ── 3D ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod space3d {
    use tw_core::{EngineError, PatchId};
    use crate::{diffuse26, diffuse6, Bounds3d, Topology3d};

    #[test]
    fn indexing_round_trips() {
        let b = Bounds3d::centered(2, 1, 1);
        assert_eq!(b.patch_count(), 45);
        assert_eq!(b.patch_id(-2, 1, 1), Some(PatchId(0)));
        for i in 0..45 {
            let (x, y, z) = b.coords(PatchId(i));
            assert_eq!(b.patch_id(x, y, z), Some(PatchId(i)));
        }
    }

    #[test]
    fn neighborhood_sizes() {
        let b = Bounds3d::centered(1, 1, 1);
        let centre = b.patch_id(0, 0, 0).unwrap();
        let corner = b.patch_id(1, 1, 1).unwrap();

        let torus = Topology3d::torus(b);
        assert_eq!(torus.neighbors26(centre).len(), 26);
        assert_eq!(torus.neighbors6(centre).len(), 6);

        let closed = Topology3d::new(b, false, false, false);
        assert_eq!(closed.neighbors26(corner).len(), 7);
        assert_eq!(closed.neighbors6(corner).len(), 3);
        assert_eq!(closed.neighbors6(centre)[4], b.patch_id(0, 0, 1).unwrap());
    }

    #[test]
    fn distance_and_wrap_z() {
        let b = Bounds3d::centered(1, 1, 1);
        let torus = Topology3d::torus(b);
        assert_eq!(torus.distance_wrap([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]), 1.0);
        assert_eq!(torus.wrap_z(1.5).unwrap(), -1.5);

        let slab = Topology3d::new(b, true, true, false);
        assert_eq!(slab.distance_wrap([0.0, 0.0, -1.0], [0.0, 0.0, 1.0]), 2.0);
        assert_eq!(slab.wrap_z(1.5), Err(EngineError::BeyondEdge));
        assert!(matches!(slab.wrap_x(f64::NAN), Err(EngineError::Domain(_))));
    }

    #[test]
    fn pitch_points_up() {
        let torus = Topology3d::torus(Bounds3d::centered(2, 2, 2));
        let p = torus.towards_pitch_wrap([0.0, 0.0, 0.0], [1.0, 0.0, 1.0]);
        assert!((p - 45.0).abs() < 1e-9);
    }

    #[test]
    fn diffusion_conserves_total() {
        let b = Bounds3d::centered(1, 2, 1);
        let v: Vec<f64> = (0..b.patch_count()).map(|i| (i % 5) as f64).collect();
        let total: f64 = v.iter().sum();
        for topo in [Topology3d::torus(b), Topology3d::new(b, false, true, false)] {
            assert!((diffuse26(&topo, &v, 1.0).iter().sum::<f64>() - total).abs() < 1e-9);
            assert!((diffuse6(&topo, &v, 0.7).iter().sum::<f64>() - total).abs() < 1e-9);
        }
    }
}
