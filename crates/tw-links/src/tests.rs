//! Unit tests for tw-links.

#[cfg(test)]
mod helpers {
    use tw_core::{BreedId, LinkId, TurtleId};
    use crate::{Edge, LinkManager};

    pub const FRIENDS: BreedId = BreedId(2);
    pub const ROADS: BreedId = BreedId(3);

    pub fn t(i: u32) -> TurtleId {
        TurtleId::new(i, 0)
    }

    /// Bless links `(end1, end2)` of `breed`, numbering link ids from
    /// `first`.
    pub fn bless_all(
        m:        &mut LinkManager,
        first:    u32,
        pairs:    &[(u32, u32)],
        breed:    BreedId,
        directed: bool,
    ) -> Vec<LinkId> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                let id = LinkId::new(first + i as u32, 0);
                m.bless(id, Edge::new(t(a), t(b), breed, directed)).unwrap();
                id
            })
            .collect()
    }

    /// Manager with a directed `FRIENDS` breed and an undirected `ROADS`
    /// breed declared.
    pub fn manager() -> LinkManager {
        let mut m = LinkManager::new();
        m.declare_breed(FRIENDS, true);
        m.declare_breed(ROADS, false);
        m
    }
}

// ── Adjacency ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use tw_agent::TieMode;
    use tw_core::{BreedId, EngineError, Severity};
    use super::helpers::{bless_all, manager, t, FRIENDS, ROADS};
    use crate::{Edge, LinkFilter};

    #[test]
    fn directed_lookup_is_one_way() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1)], FRIENDS, true);
        assert_eq!(m.find_link(t(0), t(1), FRIENDS, false), Some(ids[0]));
        assert_eq!(m.find_link(t(1), t(0), FRIENDS, false), None);
    }

    #[test]
    fn undirected_lookup_matches_either_order() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1)], ROADS, false);
        assert_eq!(m.find_link(t(0), t(1), ROADS, false), Some(ids[0]));
        assert_eq!(m.find_link(t(1), t(0), ROADS, false), Some(ids[0]));
    }

    #[test]
    fn unbreeded_query_can_search_all_breeds() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1)], ROADS, false);
        assert_eq!(m.find_link(t(0), t(1), BreedId::LINKS, false), None);
        assert_eq!(m.find_link(t(0), t(1), BreedId::LINKS, true), Some(ids[0]));
        assert_eq!(m.find_link(t(1), t(0), BreedId::LINKS, true), Some(ids[0]));
    }

    #[test]
    fn unbreeded_directedness_is_set_by_first_link_and_reset_by_last() {
        let mut m = manager();
        assert_eq!(m.is_directed(BreedId::LINKS), None);
        let ids = bless_all(&mut m, 0, &[(0, 1)], BreedId::LINKS, false);
        assert_eq!(m.is_directed(BreedId::LINKS), Some(false));

        let err = m
            .bless(tw_core::LinkId::new(9, 0), Edge::new(t(1), t(2), BreedId::LINKS, true))
            .unwrap_err();
        assert!(matches!(err, EngineError::MixedDirectedness { .. }));
        assert_eq!(err.severity(), Severity::Fatal);
        assert_eq!(m.len(), 1);

        m.cleanup_link(ids[0]);
        assert_eq!(m.is_directed(BreedId::LINKS), None);
        bless_all(&mut m, 1, &[(1, 2)], BreedId::LINKS, true);
        assert_eq!(m.is_directed(BreedId::LINKS), Some(true));
    }

    #[test]
    fn named_breed_directedness_is_fixed() {
        let m = manager();
        assert!(m.check_directedness(FRIENDS, true).is_ok());
        assert!(m.check_directedness(FRIENDS, false).is_err());
        assert!(m.check_directedness(ROADS, false).is_ok());
    }

    #[test]
    fn duplicate_link_is_rejected() {
        let mut m = manager();
        bless_all(&mut m, 0, &[(0, 1)], FRIENDS, true);
        let again = m.bless(tw_core::LinkId::new(5, 0), Edge::new(t(0), t(1), FRIENDS, true));
        assert!(again.is_err());
        // the reverse direction is a different directed link
        bless_all(&mut m, 6, &[(1, 0)], FRIENDS, true);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn neighbor_queries_follow_creation_order() {
        let mut m = manager();
        bless_all(&mut m, 0, &[(0, 3), (0, 1), (2, 0), (0, 2)], FRIENDS, true);
        let f = LinkFilter::Breed(FRIENDS);
        assert_eq!(m.linked_from(t(0), f), vec![t(3), t(1), t(2)]);
        assert_eq!(m.linked_to(t(0), f), vec![t(2)]);
        // incoming first, then outgoing, each neighbor once
        assert_eq!(m.linked_with(t(0), f), vec![t(2), t(3), t(1)]);
        assert!(m.linked_from(t(9), f).is_empty());
    }

    #[test]
    fn all_links_filter_splits_by_directedness_when_breeds_exist() {
        let mut m = manager();
        bless_all(&mut m, 0, &[(0, 1)], FRIENDS, true);
        bless_all(&mut m, 1, &[(0, 2)], ROADS, false);
        assert_eq!(m.linked_from(t(0), LinkFilter::All), vec![t(1)]);
        assert_eq!(m.linked_with(t(0), LinkFilter::All), vec![t(2)]);
        assert_eq!(m.linked_with(t(0), LinkFilter::Breed(FRIENDS)), vec![t(1)]);
    }

    #[test]
    fn all_links_filter_takes_everything_when_unbreeded() {
        let mut m = manager();
        bless_all(&mut m, 0, &[(0, 1), (2, 0)], BreedId::LINKS, true);
        assert_eq!(m.linked_with(t(0), LinkFilter::All), vec![t(2), t(1)]);
    }

    #[test]
    fn explicit_link_set_filter() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1), (0, 2)], ROADS, false);
        let only: rustc_hash::FxHashSet<_> = [ids[1]].into_iter().collect();
        assert_eq!(m.linked_with(t(0), LinkFilter::Only(&only)), vec![t(2)]);
    }

    #[test]
    fn link_set_queries_filter_by_breed() {
        let mut m = manager();
        let f = bless_all(&mut m, 0, &[(0, 1)], FRIENDS, true);
        let r = bless_all(&mut m, 1, &[(2, 0)], ROADS, false);
        assert_eq!(m.links_from(t(0), BreedId::LINKS), f);
        assert_eq!(m.links_to(t(0), ROADS), r);
        assert_eq!(m.links_with(t(0), BreedId::LINKS), vec![r[0], f[0]]);
        assert!(m.links_with(t(0), FRIENDS).contains(&f[0]));
        assert_eq!(m.edge(r[0]).unwrap().other_end(t(0)), Some(t(2)));
    }

    #[test]
    fn dying_turtle_releases_every_incident_link() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1), (2, 0), (1, 2)], FRIENDS, true);
        let incident = m.detach_turtle(t(0));
        assert_eq!(incident, vec![ids[0], ids[1]]);
        for id in incident {
            assert!(m.cleanup_link(id).is_some());
        }
        assert_eq!(m.len(), 1);
        assert_eq!(m.linked_with(t(1), LinkFilter::Breed(FRIENDS)), vec![t(2)]);
        assert!(m.linked_with(t(0), LinkFilter::Breed(FRIENDS)).is_empty());
        assert!(m.cleanup_link(ids[0]).is_none());
    }

    #[test]
    fn tie_count_tracks_modes() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1), (2, 0)], ROADS, false);
        assert!(!m.ties().any());
        assert!(m.tied_turtles(t(0)).is_empty());

        m.set_tie_mode(ids[0], TieMode::Fixed).unwrap();
        m.set_tie_mode(ids[1], TieMode::Free).unwrap();
        m.set_tie_mode(ids[1], TieMode::Fixed).unwrap();
        assert_eq!(m.ties().tie_count(), 2);
        assert_eq!(m.tied_turtles(t(0)), vec![(t(1), TieMode::Fixed), (t(2), TieMode::Fixed)]);

        m.cleanup_link(ids[0]);
        assert_eq!(m.ties().tie_count(), 1);
        m.set_tie_mode(ids[1], TieMode::None).unwrap();
        assert!(!m.ties().any());
    }

    #[test]
    fn directed_ties_only_pull_forward() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1)], FRIENDS, true);
        m.set_tie_mode(ids[0], TieMode::Free).unwrap();
        assert_eq!(m.tied_turtles(t(0)), vec![(t(1), TieMode::Free)]);
        assert!(m.tied_turtles(t(1)).is_empty());
    }

    #[test]
    fn reset_forgets_everything() {
        let mut m = manager();
        let ids = bless_all(&mut m, 0, &[(0, 1)], BreedId::LINKS, true);
        m.set_tie_mode(ids[0], TieMode::Free).unwrap();
        m.reset();
        assert!(m.is_empty());
        assert_eq!(m.is_directed(BreedId::LINKS), None);
        assert_eq!(m.ties().tie_count(), 0);
        assert_eq!(m.is_directed(FRIENDS), Some(true));
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics {
    use tw_core::{BreedId, WorldRng};
    use super::helpers::{bless_all, manager, t, FRIENDS, ROADS};
    use crate::metrics::{
        average_path_length, in_network_radius, network_distance, shortest_path_links,
        shortest_path_nodes,
    };
    use crate::{LinkFilter, LinkManager};

    fn chain(directed: bool) -> LinkManager {
        let mut m = manager();
        let breed = if directed { FRIENDS } else { ROADS };
        bless_all(&mut m, 0, &[(0, 1), (1, 2), (2, 3)], breed, directed);
        m
    }

    #[test]
    fn distance_along_a_chain() {
        let m = chain(false);
        let f = LinkFilter::Breed(ROADS);
        assert_eq!(network_distance(&m, t(0), t(0), f, false), Some(0));
        assert_eq!(network_distance(&m, t(0), t(3), f, false), Some(3));
        assert_eq!(network_distance(&m, t(3), t(0), f, false), Some(3));
        assert_eq!(network_distance(&m, t(0), t(7), f, false), None);
        assert_eq!(network_distance(&m, t(0), t(3), LinkFilter::Breed(FRIENDS), false), None);
    }

    #[test]
    fn directed_distance_is_forward_only() {
        let m = chain(true);
        let f = LinkFilter::Breed(FRIENDS);
        assert_eq!(network_distance(&m, t(0), t(3), f, true), Some(3));
        assert_eq!(network_distance(&m, t(3), t(0), f, true), None);
    }

    #[test]
    fn large_connected_graph_terminates() {
        let mut m = manager();
        let mut rng = WorldRng::new(11);
        let n = 1000u32;
        let mut pairs: Vec<(u32, u32)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        for _ in 0..500 {
            let a = rng.next_int(n as usize) as u32;
            let b = rng.next_int(n as usize) as u32;
            if a < b && b != a + 1 && !pairs.contains(&(a, b)) {
                pairs.push((a, b));
            }
        }
        bless_all(&mut m, 0, &pairs, BreedId::LINKS, false);
        let d = network_distance(&m, t(0), t(n - 1), LinkFilter::All, false);
        assert!(matches!(d, Some(k) if k >= 1 && k < n as usize));
    }

    #[test]
    fn shortest_path_runs_source_to_dest() {
        let mut m = manager();
        // two equal routes 0-1-3 and 0-2-3
        bless_all(&mut m, 0, &[(0, 1), (0, 2), (1, 3), (2, 3)], ROADS, false);
        let f = LinkFilter::Breed(ROADS);

        let mut rng = WorldRng::new(5);
        let path = shortest_path_nodes(&m, &mut rng, t(0), t(3), f, false).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], t(0));
        assert_eq!(path[2], t(3));

        let mut again = WorldRng::new(5);
        assert_eq!(shortest_path_nodes(&m, &mut again, t(0), t(3), f, false).unwrap(), path);

        assert_eq!(shortest_path_nodes(&m, &mut rng, t(2), t(2), f, false).unwrap(), vec![t(2)]);
        assert_eq!(shortest_path_nodes(&m, &mut rng, t(0), t(9), f, false), None);
    }

    #[test]
    fn shortest_path_links_join_consecutive_nodes() {
        let m = chain(true);
        let f = LinkFilter::Breed(FRIENDS);
        let mut rng = WorldRng::new(1);
        let links = shortest_path_links(&m, &mut rng, t(0), t(3), f, true).unwrap();
        assert_eq!(links.len(), 3);
        for (i, id) in links.iter().enumerate() {
            let e = m.edge(*id).unwrap();
            assert_eq!((e.end1, e.end2), (t(i as u32), t(i as u32 + 1)));
        }
        assert!(shortest_path_links(&m, &mut rng, t(1), t(1), f, true).unwrap().is_empty());
        assert_eq!(shortest_path_links(&m, &mut rng, t(3), t(0), f, true), None);
    }

    #[test]
    fn radius_collects_layers() {
        let m = chain(false);
        let f = LinkFilter::Breed(ROADS);
        assert_eq!(in_network_radius(&m, t(1), 0.0, f, |_| true), vec![t(1)]);
        assert_eq!(in_network_radius(&m, t(1), 1.0, f, |_| true), vec![t(1), t(0), t(2)]);
        assert_eq!(in_network_radius(&m, t(1), 1.5, f, |_| true).len(), 3);
        assert_eq!(in_network_radius(&m, t(1), 10.0, f, |_| true).len(), 4);
        assert_eq!(in_network_radius(&m, t(1), 10.0, f, |x| x != t(3)), vec![t(1), t(0), t(2)]);
    }

    #[test]
    fn average_path_length_over_ordered_pairs() {
        let m = chain(false);
        let f = LinkFilter::Breed(ROADS);
        let avg = average_path_length(&m, &[t(0), t(1), t(2)], f).unwrap();
        assert!((avg - 8.0 / 6.0).abs() < 1e-12);
        // paths may leave the subset
        let ends = average_path_length(&m, &[t(0), t(3)], f).unwrap();
        assert_eq!(ends, 3.0);
        assert_eq!(average_path_length(&m, &[t(0)], f), Some(0.0));
        assert_eq!(average_path_length(&m, &[], f), None);
        assert_eq!(average_path_length(&m, &[t(0), t(8)], f), None);
    }
}
