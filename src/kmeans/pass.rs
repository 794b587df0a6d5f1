use ordered_float::OrderedFloat;

use super::cluster::Cluster;
use crate::instance::Instance;
use crate::sparse::ClusterVector;

/// Provisional partition produced by one reassignment pass.
///
/// Nothing in the engine changes until the candidate is promoted, so a
/// rejected candidate can simply be dropped.
#[derive(Debug, Clone)]
pub struct CandidateState<V> {
    clusters: Vec<Cluster<V>>,
    num_reassigned: usize,
}

impl<V> CandidateState<V> {
    /// Candidate clusters, indexed like the current ones
    pub fn clusters(&self) -> &[Cluster<V>] {
        &self.clusters
    }

    /// Points whose nearest centroid differs from their current cluster
    pub fn num_reassigned(&self) -> usize {
        self.num_reassigned
    }

    /// Aggregate candidate quality
    pub fn quality(&self) -> f64 {
        self.clusters.iter().map(Cluster::quality).sum()
    }

    /// Index of the first candidate cluster left without members
    pub fn first_empty(&self) -> Option<usize> {
        self.clusters.iter().position(Cluster::is_empty)
    }

    pub(crate) fn into_clusters(self) -> Vec<Cluster<V>> {
        self.clusters
    }
}

/// Index of the centroid nearest to `vector`. Ties go to the lowest index.
pub(crate) fn nearest_centroid<V: ClusterVector>(
    clusters: &[Cluster<V>],
    vector: &V,
) -> Option<usize> {
    clusters
        .iter()
        .enumerate()
        .map(|(i, cluster)| (i, cluster.centroid().distance_euclidean(vector)))
        .min_by_key(|&(_, distance)| OrderedFloat(distance))
        .map(|(i, _)| i)
}

/// Destination of a member of cluster `current` at `baseline` distance from
/// its own centroid.
///
/// The point only leaves for a strictly closer centroid. Among other
/// clusters at the same smaller distance the lowest index wins.
fn reassignment_target<V: ClusterVector>(
    clusters: &[Cluster<V>],
    vector: &V,
    current: usize,
    baseline: f64,
) -> usize {
    let mut best = (current, OrderedFloat(baseline));
    for (i, cluster) in clusters.iter().enumerate() {
        if i == current {
            continue;
        }
        let distance = OrderedFloat(cluster.centroid().distance_euclidean(vector));
        if distance < best.1 {
            best = (i, distance);
        }
    }
    best.0
}

/// One batch pass: move every point to its nearest current centroid and
/// recompute centroids and qualities from the new membership.
///
/// Points are visited cluster by cluster in index order, members in their
/// current order, so candidate member order is deterministic.
pub(crate) fn reassign<V: ClusterVector>(current: &[Cluster<V>]) -> CandidateState<V> {
    let k = current.len();
    let mut members: Vec<Vec<Instance<V>>> = vec![Vec::new(); k];
    let mut sums: Vec<V> = (0..k).map(|_| V::zero()).collect();
    let mut num_reassigned = 0;

    for (c, cluster) in current.iter().enumerate() {
        for point in cluster.members() {
            let baseline = cluster.centroid().distance_euclidean(point.vector());
            let best = reassignment_target(current, point.vector(), c, baseline);

            if best != c {
                num_reassigned += 1;
            }

            sums[best].add_assign(point.vector());
            members[best].push(point.clone());
        }
    }

    let clusters = sums
        .into_iter()
        .zip(members)
        .map(|(sum, members)| Cluster::from_sum(sum, members))
        .collect();

    CandidateState {
        clusters,
        num_reassigned,
    }
}
