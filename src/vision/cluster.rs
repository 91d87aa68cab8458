//! Single-linkage clustering of word positions into phrases.
//!
//! Words are compared by their top-left corners only. Vertical separation is
//! normalised by a much smaller threshold than horizontal separation, so
//! words on the same line merge far more readily than words stacked in a
//! column.

use log::debug;
use ndarray::Array2;
use std::collections::BTreeMap;

use crate::config::ClusterConfig;
use crate::vision::ocr::Word;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    /// Number of original observations under the new node.
    #[allow(dead_code)]
    pub size: usize,
}

/// Merge tree over `n` observations. Leaves are `0..n`, the node created by
/// `merges[i]` is `n + i`. Merges are in non-decreasing distance order.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    pub n: usize,
    pub merges: Vec<Merge>,
}

pub fn word_distance(a: (i32, i32), b: (i32, i32), config: &ClusterConfig) -> f64 {
    let dx = (a.0 - b.0).abs() as f64 / config.horizontal_threshold;
    let dy = (a.1 - b.1).abs() as f64 / config.vertical_threshold;
    dx.max(dy * 0.5)
}

pub fn distance_matrix(positions: &[(i32, i32)], config: &ClusterConfig) -> Array2<f64> {
    let n = positions.len();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            0.0
        } else {
            word_distance(positions[i], positions[j], config)
        }
    })
}

/// Single-linkage dendrogram built from the minimum spanning tree.
pub fn single_linkage(distances: &Array2<f64>) -> Dendrogram {
    let n = distances.nrows();
    let mut edges: Vec<(usize, usize, f64)> = Vec::with_capacity(n.saturating_sub(1));

    if n >= 2 {
        // Prim over the dense matrix
        let mut in_tree = vec![false; n];
        let mut best = vec![f64::INFINITY; n];
        let mut parent = vec![0usize; n];
        let mut current = 0;
        in_tree[0] = true;

        for _ in 1..n {
            let mut next = None;
            let mut next_dist = f64::INFINITY;
            for j in 0..n {
                if in_tree[j] {
                    continue;
                }
                let d = distances[[current, j]];
                if d < best[j] {
                    best[j] = d;
                    parent[j] = current;
                }
                if next.is_none() || best[j] < next_dist {
                    next = Some(j);
                    next_dist = best[j];
                }
            }
            if let Some(j) = next {
                in_tree[j] = true;
                edges.push((parent[j], j, next_dist));
                current = j;
            }
        }
    }

    edges.sort_by(|x, y| x.2.total_cmp(&y.2));

    let mut sets = DisjointSet::new(n);
    // Dendrogram node currently representing each union-find root.
    let mut node_of: Vec<usize> = (0..n).collect();
    let mut merges = Vec::with_capacity(edges.len());

    for (u, v, distance) in edges {
        let (ru, rv) = (sets.find(u), sets.find(v));
        let (a, b) = (node_of[ru], node_of[rv]);
        let size = sets.size[ru] + sets.size[rv];
        let root = sets.union(ru, rv);
        node_of[root] = n + merges.len();
        merges.push(Merge {
            a: a.min(b),
            b: a.max(b),
            distance,
            size,
        });
    }

    Dendrogram { n, merges }
}

/// Flat clusters whose cophenetic distance does not exceed `cutoff`.
/// Ids start at 1 and follow the first appearance of each cluster.
pub fn cut_tree(tree: &Dendrogram, cutoff: f64) -> Vec<usize> {
    let n = tree.n;
    let mut sets = DisjointSet::new(n);
    // Leaf that stands in for each dendrogram node.
    let mut leaf_of: Vec<usize> = (0..n).collect();

    for m in &tree.merges {
        let (la, lb) = (leaf_of[m.a], leaf_of[m.b]);
        leaf_of.push(la);
        if m.distance <= cutoff {
            sets.union(la, lb);
        }
    }

    let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
    (0..n)
        .map(|i| {
            let root = sets.find(i);
            let next = ids.len() + 1;
            *ids.entry(root).or_insert(next)
        })
        .collect()
}

fn flat_clusters(positions: &[(i32, i32)], config: &ClusterConfig, cutoff: f64) -> Vec<usize> {
    match positions.len() {
        0 => Vec::new(),
        1 => vec![1],
        _ => {
            let tree = single_linkage(&distance_matrix(positions, config));
            cut_tree(&tree, cutoff)
        }
    }
}

/// Assigns a cluster id to every word. Ids are neither contiguous nor
/// stable across calls; only the grouping is meaningful.
pub fn cluster_words(words: &[Word], config: &ClusterConfig) -> Vec<usize> {
    let positions: Vec<(i32, i32)> = words.iter().map(|w| (w.left, w.top)).collect();
    let mut clusters = flat_clusters(&positions, config, config.merge_cutoff);

    let mut initial: Vec<usize> = clusters.clone();
    initial.sort_unstable();
    initial.dedup();

    for cluster_id in initial {
        let members: Vec<usize> = (0..clusters.len())
            .filter(|&i| clusters[i] == cluster_id)
            .collect();
        if members.len() <= config.max_cluster_size {
            continue;
        }

        let sub_positions: Vec<(i32, i32)> = members.iter().map(|&i| positions[i]).collect();
        let sub_clusters = flat_clusters(&sub_positions, config, config.split_cutoff);
        let offset = clusters.iter().copied().max().unwrap_or(0);
        debug!(
            "Splitting cluster {} ({} words) into {} parts",
            cluster_id,
            members.len(),
            sub_clusters.iter().copied().max().unwrap_or(0)
        );
        for (&i, sub) in members.iter().zip(sub_clusters) {
            clusters[i] = sub + offset;
        }
    }

    clusters
}

struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Returns the surviving root.
    fn union(&mut self, a: usize, b: usize) -> usize {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return ra;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        ra
    }
}
