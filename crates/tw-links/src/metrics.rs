//! Breadth-first network metrics over a [`LinkManager`].
//!
//! Every function takes a [`LinkFilter`] choosing which links form the
//! network and a `directed` flag: directed networks are walked forward only
//! (`end1 → end2`), undirected ones in both directions.  The radius and
//! average-path-length queries always walk both directions.
//!
//! A disconnected pair is a normal outcome and is reported as `None`.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tw_core::{LinkId, TurtleId, WorldRng};

use crate::graph::{LinkFilter, LinkManager};

fn step(links: &LinkManager, t: TurtleId, filter: LinkFilter<'_>, directed: bool) -> Vec<TurtleId> {
    if directed {
        links.linked_from(t, filter)
    } else {
        links.linked_with(t, filter)
    }
}

/// Turtles within `radius` link hops of `source`, in breadth-first order,
/// keeping only those `keep` accepts.  `source` itself is at hop 0.
pub fn in_network_radius(
    links:  &LinkManager,
    source: TurtleId,
    radius: f64,
    filter: LinkFilter<'_>,
    keep:   impl Fn(TurtleId) -> bool,
) -> Vec<TurtleId> {
    let mut seen = FxHashSet::default();
    let mut visited = Vec::new();
    // `None` marks the end of a layer.
    let mut queue: VecDeque<Option<TurtleId>> = VecDeque::new();
    seen.insert(source);
    queue.push_back(Some(source));
    queue.push_back(None);

    let mut layer = 0usize;
    while layer as f64 <= radius {
        let Some(cur) = queue.pop_front() else { break };
        let Some(cur) = cur else {
            if queue.is_empty() {
                break;
            }
            layer += 1;
            queue.push_back(None);
            continue;
        };
        visited.push(cur);
        for n in links.linked_with(cur, filter) {
            if seen.insert(n) {
                queue.push_back(Some(n));
            }
        }
    }
    visited.retain(|t| keep(*t));
    visited
}

/// Hop count of a shortest path from `source` to `dest`.
pub fn network_distance(
    links:    &LinkManager,
    source:   TurtleId,
    dest:     TurtleId,
    filter:   LinkFilter<'_>,
    directed: bool,
) -> Option<usize> {
    let mut seen = FxHashSet::default();
    let mut queue: VecDeque<Option<TurtleId>> = VecDeque::new();
    seen.insert(source);
    queue.push_back(Some(source));
    queue.push_back(None);

    let mut layer = 0usize;
    while let Some(cur) = queue.pop_front() {
        let Some(cur) = cur else {
            if queue.is_empty() {
                break;
            }
            layer += 1;
            queue.push_back(None);
            continue;
        };
        if cur == dest {
            return Some(layer);
        }
        for n in step(links, cur, filter, directed) {
            if seen.insert(n) {
                queue.push_back(Some(n));
            }
        }
    }
    None
}

/// One shortest path from `source` to `dest`, both included, in travel
/// order.
///
/// Each node's neighbors are expanded in an order shuffled with `rng`, so
/// when several shortest paths exist one of them is picked at random.
/// The pick is not uniform over all shortest paths: paths through nodes
/// discovered early are favored.
pub fn shortest_path_nodes(
    links:    &LinkManager,
    rng:      &mut WorldRng,
    source:   TurtleId,
    dest:     TurtleId,
    filter:   LinkFilter<'_>,
    directed: bool,
) -> Option<Vec<TurtleId>> {
    if source == dest {
        return Some(vec![source]);
    }
    let mut parents: FxHashMap<TurtleId, Option<TurtleId>> = FxHashMap::default();
    let mut queue = VecDeque::new();
    parents.insert(source, None);
    queue.push_back(source);

    while let Some(cur) = queue.pop_front() {
        let mut neighbors = step(links, cur, filter, directed);
        rng.shuffle(&mut neighbors);
        for n in neighbors {
            if n == dest {
                let mut path = vec![dest];
                let mut at = Some(cur);
                while let Some(t) = at {
                    path.push(t);
                    at = parents.get(&t).copied().flatten();
                }
                path.reverse();
                trace!(hops = path.len() - 1, "shortest path found");
                return Some(path);
            }
            if !parents.contains_key(&n) {
                parents.insert(n, Some(cur));
                queue.push_back(n);
            }
        }
    }
    None
}

/// The links along [`shortest_path_nodes`].  A path from a node to itself
/// has no links.
pub fn shortest_path_links(
    links:    &LinkManager,
    rng:      &mut WorldRng,
    source:   TurtleId,
    dest:     TurtleId,
    filter:   LinkFilter<'_>,
    directed: bool,
) -> Option<Vec<LinkId>> {
    let nodes = shortest_path_nodes(links, rng, source, dest, filter, directed)?;
    nodes
        .windows(2)
        .map(|pair| links.link_between(pair[0], pair[1], filter, directed))
        .collect()
}

/// Mean shortest-path length over all ordered pairs of distinct `nodes`,
/// walking links in both directions.  Paths may pass through turtles
/// outside `nodes`.  A single node averages `0.0`.  `None` if any pair is
/// disconnected, and for an empty `nodes`, whose mean is undefined.
pub fn average_path_length(
    links:  &LinkManager,
    nodes:  &[TurtleId],
    filter: LinkFilter<'_>,
) -> Option<f64> {
    let mut members = FxHashSet::default();
    let roots: Vec<TurtleId> = nodes.iter().copied().filter(|t| members.insert(*t)).collect();
    let n = roots.len();
    match n {
        0 => return None,
        1 => return Some(0.0),
        _ => {}
    }
    let mut total: u64 = 0;
    let mut seen = FxHashSet::default();
    let mut queue: VecDeque<Option<TurtleId>> = VecDeque::new();

    for &root in &roots {
        seen.clear();
        queue.clear();
        seen.insert(root);
        queue.push_back(Some(root));
        queue.push_back(None);

        let mut reached = 0usize;
        let mut layer = 0u64;
        while let Some(cur) = queue.pop_front() {
            let Some(cur) = cur else {
                if queue.is_empty() {
                    break;
                }
                layer += 1;
                queue.push_back(None);
                continue;
            };
            if members.contains(&cur) {
                total += layer;
                reached += 1;
            }
            for next in links.linked_with(cur, filter) {
                if seen.insert(next) {
                    queue.push_back(Some(next));
                }
            }
        }
        if reached != n {
            return None;
        }
    }
    Some(total as f64 / (n * (n - 1)) as f64)
}
