use crate::instance::Instance;
use crate::sparse::ClusterVector;

/// One cluster of a partition: its centroid, its members and its quality.
#[derive(Debug, Clone)]
pub struct Cluster<V> {
    centroid: V,
    members: Vec<Instance<V>>,
    quality: f64,
}

impl<V: ClusterVector> Cluster<V> {
    pub(crate) fn empty() -> Self {
        Self {
            centroid: V::zero(),
            members: Vec::new(),
            quality: 0.0,
        }
    }

    /// Build a cluster from its members, computing centroid and quality.
    pub(crate) fn from_members(members: Vec<Instance<V>>) -> Self {
        let mut sum = V::zero();
        for member in &members {
            sum.add_assign(member.vector());
        }
        Self::from_sum(sum, members)
    }

    /// Build a cluster whose member vectors have already been summed.
    ///
    /// An empty cluster keeps the zero vector as centroid and has quality 0.
    pub(crate) fn from_sum(mut sum: V, members: Vec<Instance<V>>) -> Self {
        if !members.is_empty() {
            sum.scale_divide(members.len() as f64);
        }
        let quality = dispersion(&members, &sum);
        Self {
            centroid: sum,
            members,
            quality,
        }
    }
}

impl<V> Cluster<V> {
    /// Mean of the member vectors
    pub fn centroid(&self) -> &V {
        &self.centroid
    }

    /// Members in assignment order
    pub fn members(&self) -> &[Instance<V>] {
        &self.members
    }

    /// Sum of member distances to the centroid
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check whether an instance with `id` belongs to this cluster
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id() == id)
    }
}

/// Sum of Euclidean distances from each member to `centroid`.
pub(crate) fn dispersion<V: ClusterVector>(members: &[Instance<V>], centroid: &V) -> f64 {
    members
        .iter()
        .map(|m| centroid.distance_euclidean(m.vector()))
        .sum()
}
