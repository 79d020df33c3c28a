//! Density-based clustering over a precomputed distance matrix.
//!
//! The implementation follows the classic HDBSCAN construction: core
//! distances, mutual-reachability graph, minimum spanning tree, single
//! linkage dendrogram, condensed tree, and stability-based cluster
//! extraction. Noise points receive the label -1; real clusters receive
//! dense labels starting at 0, assigned in condensed-tree order so that
//! repeated runs over the same matrix produce identical labels.

use serde::{Deserialize, Serialize};

use crate::error::{ComputationError, Result};

/// Weights at or below this are clamped before inverting into lambda
/// space, so duplicate points cannot produce infinite birth values.
const MIN_EDGE_WEIGHT: f64 = 1e-10;

// ============================================================
// Parameters
// ============================================================

/// How clusters are pulled out of the condensed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// Excess-of-mass: prefer the most stable cluster in each branch.
    Eom,
    /// Take every leaf of the condensed tree.
    Leaf,
}

impl Default for SelectionMethod {
    fn default() -> Self {
        SelectionMethod::Eom
    }
}

/// Density parameters for one clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Smallest group of points accepted as a cluster.
    pub min_cluster_size: usize,
    /// Neighborhood size used for core distances.
    pub min_samples: usize,
}

impl ClusterParams {
    pub fn new(min_cluster_size: usize, min_samples: usize) -> Self {
        Self {
            min_cluster_size,
            min_samples,
        }
    }

    /// Conservative parameters used when the grid search finds nothing
    /// scoreable.
    pub fn fallback() -> Self {
        Self {
            min_cluster_size: 10,
            min_samples: 5,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_cluster_size < 2 {
            return Err(ComputationError::clustering(format!(
                "min_cluster_size must be at least 2, got {}",
                self.min_cluster_size
            ))
            .into());
        }
        if self.min_samples < 1 {
            return Err(
                ComputationError::clustering("min_samples must be at least 1").into(),
            );
        }
        Ok(())
    }
}

// ============================================================
// Clusterer
// ============================================================

/// HDBSCAN over a precomputed, symmetric distance matrix.
pub struct HdbscanClusterer {
    params: ClusterParams,
    selection: SelectionMethod,
}

impl HdbscanClusterer {
    pub fn new(params: ClusterParams) -> Self {
        Self {
            params,
            selection: SelectionMethod::default(),
        }
    }

    pub fn with_selection(params: ClusterParams, selection: SelectionMethod) -> Self {
        Self { params, selection }
    }

    pub fn params(&self) -> ClusterParams {
        self.params
    }

    /// Cluster the points described by `distances` and return one label per
    /// row. Labels are -1 for noise and dense non-negative integers for
    /// clusters.
    pub fn fit_precomputed(&self, distances: &[Vec<f32>]) -> Result<Vec<i32>> {
        self.params.validate()?;
        let n = distances.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        validate_matrix(distances)?;

        if n < self.params.min_cluster_size {
            tracing::warn!(
                rows = n,
                min_cluster_size = self.params.min_cluster_size,
                "fewer rows than min_cluster_size, labelling everything noise"
            );
            return Ok(vec![-1; n]);
        }

        let core = core_distances(distances, self.params.min_samples);
        let edges = minimum_spanning_tree(distances, &core);
        let dendrogram = single_linkage(n, edges);
        let condensed = condense_tree(&dendrogram, n, self.params.min_cluster_size);
        let labels = condensed.extract_labels(n, self.selection);

        let clusters = labels.iter().copied().max().map_or(0, |m| (m + 1).max(0));
        tracing::debug!(
            rows = n,
            clusters,
            noise = labels.iter().filter(|&&l| l == -1).count(),
            "clustering complete"
        );
        Ok(labels)
    }
}

fn validate_matrix(distances: &[Vec<f32>]) -> Result<()> {
    let n = distances.len();
    for (i, row) in distances.iter().enumerate() {
        if row.len() != n {
            return Err(ComputationError::clustering(format!(
                "distance matrix is not square: row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            ))
            .into());
        }
        if row.iter().any(|d| !d.is_finite()) {
            return Err(ComputationError::clustering(format!(
                "distance matrix contains a non-finite value in row {i}"
            ))
            .into());
        }
    }
    Ok(())
}

/// Distance from each point to its `min_samples`-th nearest neighbor
/// (excluding itself). With fewer than `min_samples` other points the
/// farthest neighbor is used.
fn core_distances(distances: &[Vec<f32>], min_samples: usize) -> Vec<f64> {
    let n = distances.len();
    let mut core = Vec::with_capacity(n);
    for i in 0..n {
        let mut row: Vec<f64> = (0..n)
            .filter(|&j| j != i)
            .map(|j| distances[i][j] as f64)
            .collect();
        row.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idx = min_samples.min(row.len()).saturating_sub(1);
        core.push(row.get(idx).copied().unwrap_or(0.0));
    }
    core
}

/// Prim's algorithm over the implicit mutual-reachability graph,
/// `mr(i, j) = max(d(i, j), core(i), core(j))`. Returns edges sorted by
/// ascending weight.
fn minimum_spanning_tree(distances: &[Vec<f32>], core: &[f64]) -> Vec<(usize, usize, f64)> {
    let n = distances.len();
    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    let mut parent = vec![0usize; n];
    let mut edges = Vec::with_capacity(n.saturating_sub(1));

    in_tree[0] = true;
    for j in 1..n {
        best[j] = mutual_reachability(distances, core, 0, j);
        parent[j] = 0;
    }

    for _ in 1..n {
        let mut next = usize::MAX;
        let mut next_weight = f64::INFINITY;
        for j in 0..n {
            if !in_tree[j] && best[j] < next_weight {
                next = j;
                next_weight = best[j];
            }
        }
        if next == usize::MAX {
            break;
        }
        in_tree[next] = true;
        edges.push((parent[next], next, next_weight));
        for j in 0..n {
            if !in_tree[j] {
                let w = mutual_reachability(distances, core, next, j);
                if w < best[j] {
                    best[j] = w;
                    parent[j] = next;
                }
            }
        }
    }

    edges.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));
    edges
}

#[inline]
fn mutual_reachability(distances: &[Vec<f32>], core: &[f64], i: usize, j: usize) -> f64 {
    (distances[i][j] as f64).max(core[i]).max(core[j])
}

// ============================================================
// Single-linkage dendrogram
// ============================================================

/// One merge in the dendrogram. Node ids 0..n are the points themselves;
/// ids n.. are merges in creation order, the last one being the root.
struct DendroNode {
    left: usize,
    right: usize,
    weight: f64,
    size: usize,
}

struct Dendrogram {
    n_points: usize,
    merges: Vec<DendroNode>,
}

impl Dendrogram {
    fn size_of(&self, node: usize) -> usize {
        if node < self.n_points {
            1
        } else {
            self.merges[node - self.n_points].size
        }
    }

    /// Collect the point ids under `node`.
    fn leaves_of(&self, node: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(cur) = stack.pop() {
            if cur < self.n_points {
                out.push(cur);
            } else {
                let m = &self.merges[cur - self.n_points];
                stack.push(m.left);
                stack.push(m.right);
            }
        }
        out
    }
}

fn single_linkage(n: usize, edges: Vec<(usize, usize, f64)>) -> Dendrogram {
    let mut parent: Vec<usize> = (0..n).collect();
    let mut node_of: Vec<usize> = (0..n).collect();
    let mut merges: Vec<DendroNode> = Vec::with_capacity(n.saturating_sub(1));

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    for (a, b, weight) in edges {
        let ra = find(&mut parent, a);
        let rb = find(&mut parent, b);
        if ra == rb {
            continue;
        }
        let left = node_of[ra];
        let right = node_of[rb];
        let size = if left < n { 1 } else { merges[left - n].size }
            + if right < n { 1 } else { merges[right - n].size };
        let new_node = n + merges.len();
        merges.push(DendroNode {
            left,
            right,
            weight,
            size,
        });
        parent[rb] = ra;
        node_of[ra] = new_node;
    }

    Dendrogram {
        n_points: n,
        merges,
    }
}

// ============================================================
// Condensed tree
// ============================================================

/// A point leaving its cluster at a given density level.
struct PointEntry {
    parent: usize,
    point: usize,
    lambda: f64,
}

/// A cluster splitting off its parent at a given density level.
struct ClusterEntry {
    parent: usize,
    child: usize,
    lambda: f64,
    size: usize,
}

struct CondensedTree {
    points: Vec<PointEntry>,
    clusters: Vec<ClusterEntry>,
    /// Parent condensed-cluster id per condensed cluster (root maps to itself).
    parent_of: Vec<usize>,
    /// Lambda at which each condensed cluster was born.
    birth: Vec<f64>,
}

/// Walk the dendrogram top-down, keeping only splits where both sides
/// reach `min_cluster_size`. Smaller sides dissolve into individual point
/// entries against the surviving cluster.
fn condense_tree(dendro: &Dendrogram, n: usize, min_cluster_size: usize) -> CondensedTree {
    let mut tree = CondensedTree {
        points: Vec::new(),
        clusters: Vec::new(),
        parent_of: vec![0],
        birth: vec![0.0],
    };
    if dendro.merges.is_empty() {
        return tree;
    }

    let root = n + dendro.merges.len() - 1;
    // (dendrogram node, condensed parent id); nodes on the stack are
    // always internal merges.
    let mut stack = vec![(root, 0usize)];
    while let Some((node, cparent)) = stack.pop() {
        let merge = &dendro.merges[node - n];
        let lambda = 1.0 / merge.weight.max(MIN_EDGE_WEIGHT);
        let left_size = dendro.size_of(merge.left);
        let right_size = dendro.size_of(merge.right);
        let left_big = left_size >= min_cluster_size;
        let right_big = right_size >= min_cluster_size;

        match (left_big, right_big) {
            (true, true) => {
                for (child_node, child_size) in
                    [(merge.left, left_size), (merge.right, right_size)]
                {
                    let id = tree.parent_of.len();
                    tree.parent_of.push(cparent);
                    tree.birth.push(lambda);
                    tree.clusters.push(ClusterEntry {
                        parent: cparent,
                        child: id,
                        lambda,
                        size: child_size,
                    });
                    stack.push((child_node, id));
                }
            }
            (true, false) => {
                drop_points(&mut tree, dendro, merge.right, cparent, lambda);
                stack.push((merge.left, cparent));
            }
            (false, true) => {
                drop_points(&mut tree, dendro, merge.left, cparent, lambda);
                stack.push((merge.right, cparent));
            }
            (false, false) => {
                drop_points(&mut tree, dendro, merge.left, cparent, lambda);
                drop_points(&mut tree, dendro, merge.right, cparent, lambda);
            }
        }
    }
    tree
}

fn drop_points(
    tree: &mut CondensedTree,
    dendro: &Dendrogram,
    node: usize,
    cparent: usize,
    lambda: f64,
) {
    for point in dendro.leaves_of(node) {
        tree.points.push(PointEntry {
            parent: cparent,
            point,
            lambda,
        });
    }
}

impl CondensedTree {
    fn n_clusters(&self) -> usize {
        self.parent_of.len()
    }

    /// Total stability per condensed cluster: the mass of everything that
    /// leaves it, weighted by how far above its birth level the departure
    /// happens.
    fn stabilities(&self) -> Vec<f64> {
        let mut stability = vec![0.0f64; self.n_clusters()];
        for entry in &self.points {
            stability[entry.parent] += entry.lambda - self.birth[entry.parent];
        }
        for entry in &self.clusters {
            stability[entry.parent] +=
                (entry.lambda - self.birth[entry.parent]) * entry.size as f64;
        }
        stability
    }

    fn extract_labels(&self, n: usize, selection: SelectionMethod) -> Vec<i32> {
        let selected = match selection {
            SelectionMethod::Eom => self.select_eom(),
            SelectionMethod::Leaf => self.select_leaf(),
        };

        // Dense labels in ascending condensed-id order for determinism.
        let mut label_map = vec![-1i32; self.n_clusters()];
        let mut next = 0i32;
        for (id, &keep) in selected.iter().enumerate() {
            if keep {
                label_map[id] = next;
                next += 1;
            }
        }

        let mut labels = vec![-1i32; n];
        for entry in &self.points {
            let mut cursor = entry.parent;
            loop {
                if selected[cursor] {
                    labels[entry.point] = label_map[cursor];
                    break;
                }
                if cursor == 0 {
                    break;
                }
                cursor = self.parent_of[cursor];
            }
        }
        labels
    }

    /// Excess-of-mass selection. The root is never selectable, so a fully
    /// connected dataset with one split still yields two clusters.
    fn select_eom(&self) -> Vec<bool> {
        let count = self.n_clusters();
        let stability = self.stabilities();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
        for entry in &self.clusters {
            children[entry.parent].push(entry.child);
        }

        let mut selected = vec![false; count];
        let mut subtree_stability = stability.clone();
        // Children always carry higher ids than parents, so reverse id
        // order is a bottom-up traversal.
        for id in (0..count).rev() {
            if children[id].is_empty() {
                selected[id] = id != 0;
                continue;
            }
            let child_sum: f64 = children[id].iter().map(|&c| subtree_stability[c]).sum();
            if id != 0 && stability[id] > child_sum {
                selected[id] = true;
                self.deselect_descendants(id, &mut selected);
            } else {
                subtree_stability[id] = child_sum;
            }
        }
        selected
    }

    fn deselect_descendants(&self, ancestor: usize, selected: &mut [bool]) {
        for id in (ancestor + 1)..self.n_clusters() {
            let mut cursor = id;
            while cursor != 0 {
                cursor = self.parent_of[cursor];
                if cursor == ancestor {
                    selected[id] = false;
                    break;
                }
            }
        }
    }

    /// Leaf selection: every childless non-root cluster.
    fn select_leaf(&self) -> Vec<bool> {
        let count = self.n_clusters();
        let mut has_children = vec![false; count];
        for entry in &self.clusters {
            has_children[entry.parent] = true;
        }
        (0..count).map(|id| id != 0 && !has_children[id]).collect()
    }
}
