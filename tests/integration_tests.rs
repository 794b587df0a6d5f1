//! Integration Tests for sparse-kmeans
//!
//! End-to-end clustering runs over small, hand-checked inputs.

use sparse_kmeans::{
    BatchKMeans, ClusterVector, Instance, KMeansError, KMeansEvent,
    RecordingObserver, SparseVector, StopReason,
};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn scalar_points(values: &[f32]) -> Vec<Instance> {
    values
        .iter()
        .enumerate()
        .map(|(i, &x)| Instance::new(format!("p{}", i), SparseVector::new(vec![0], vec![x])))
        .collect()
}

fn doc(id: &str, terms: &[(u32, f32)]) -> Instance {
    let map: HashMap<u32, f32> = terms.iter().copied().collect();
    Instance::new(id, SparseVector::from_hashmap(&map))
}

fn member_ids<O>(kmeans: &BatchKMeans<SparseVector, O>) -> Vec<Vec<String>>
where
    O: sparse_kmeans::KMeansObserver,
{
    kmeans
        .clusters()
        .iter()
        .map(|c| c.members().iter().map(|m| m.id().to_string()).collect())
        .collect()
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_two_well_separated_pairs() {
    init_tracing();
    let recorder = Arc::new(RecordingObserver::new());
    let mut kmeans = BatchKMeans::new(2)
        .unwrap()
        .with_observer(Arc::clone(&recorder));

    let summary = kmeans.cluster(&scalar_points(&[0.0, 1.0, 10.0, 11.0])).unwrap();

    assert_eq!(member_ids(&kmeans), vec![vec!["p0", "p1"], vec!["p2", "p3"]]);
    assert_eq!(kmeans.centroids()[0].get(0), 0.5);
    assert_eq!(kmeans.centroids()[1].get(0), 10.5);
    assert_eq!(summary.reason, StopReason::Converged);

    let moves: Vec<usize> = recorder.passes().iter().map(|p| p.1).collect();
    assert_eq!(moves, vec![2, 0]);
}

#[test]
fn test_single_cluster_takes_global_mean() {
    init_tracing();
    let points = vec![
        doc("a", &[(0, 1.0), (4, 2.0)]),
        doc("b", &[(4, 4.0)]),
        doc("c", &[(0, 2.0), (9, 3.0)]),
    ];
    let recorder = Arc::new(RecordingObserver::new());
    let mut kmeans = BatchKMeans::new(1)
        .unwrap()
        .with_observer(Arc::clone(&recorder));

    let summary = kmeans.cluster(&points).unwrap();

    assert_eq!(summary.reason, StopReason::Converged);
    assert_eq!(summary.reassigned_total, 0);
    assert!(recorder.passes().iter().all(|&(_, moved, _)| moved == 0));

    let centroid = kmeans.centroids()[0];
    assert!((centroid.get(0) - 1.0).abs() < 1e-6);
    assert!((centroid.get(4) - 2.0).abs() < 1e-6);
    assert!((centroid.get(9) - 1.0).abs() < 1e-6);
    assert_eq!(kmeans.sizes(), vec![3]);
}

#[test]
fn test_one_cluster_per_point() {
    init_tracing();
    let points = scalar_points(&[3.0, -2.0, 8.0, 0.5]);
    let recorder = Arc::new(RecordingObserver::new());
    let mut kmeans = BatchKMeans::new(points.len())
        .unwrap()
        .with_observer(Arc::clone(&recorder));

    let summary = kmeans.cluster(&points).unwrap();

    assert_eq!(summary.passes, 1);
    assert_eq!(summary.reason, StopReason::Converged);
    assert_eq!(recorder.passes(), vec![(1, 0, 0.0)]);
    for (i, cluster) in kmeans.clusters().iter().enumerate() {
        assert_eq!(cluster.members()[0].id(), format!("p{}", i));
        assert_eq!(cluster.quality(), 0.0);
    }
}

#[test]
fn test_empty_input_is_an_error() {
    let mut kmeans = BatchKMeans::<SparseVector>::new(3).unwrap();
    let err = kmeans.cluster(&[]).unwrap_err();
    assert!(matches!(err, KMeansError::EmptyInput));
    assert!(!kmeans.is_fitted());
}

// ============================================================================
// Tie-Break and Observer Behavior
// ============================================================================

#[test]
fn test_identical_points_stay_in_their_own_clusters() {
    // a and b sit on the same spot, so each is as close to the other's
    // centroid as to its own and neither moves
    let points = vec![
        Instance::new("a", SparseVector::new(vec![0], vec![1.0])),
        Instance::new("b", SparseVector::new(vec![0], vec![1.0])),
        Instance::new("c", SparseVector::new(vec![0], vec![5.0])),
    ];
    let recorder = Arc::new(RecordingObserver::new());
    let mut kmeans = BatchKMeans::new(3)
        .unwrap()
        .with_observer(Arc::clone(&recorder));

    let summary = kmeans.cluster(&points).unwrap();

    assert_eq!(summary.reason, StopReason::Converged);
    assert_eq!(summary.passes, 1);
    assert_eq!(summary.reassigned_total, 0);
    assert_eq!(recorder.passes(), vec![(1, 0, 0.0)]);
    assert_eq!(member_ids(&kmeans), vec![vec!["a"], vec!["b"], vec!["c"]]);
}

#[test]
fn test_duplicate_documents_with_one_cluster_each() {
    let points = vec![
        doc("d0", &[(3, 1.0), (7, 2.0)]),
        doc("d1", &[(3, 1.0), (7, 2.0)]),
    ];
    let mut kmeans = BatchKMeans::<SparseVector>::new(2).unwrap();

    let summary = kmeans.cluster(&points).unwrap();

    assert_eq!(summary.reason, StopReason::Converged);
    assert_eq!(summary.passes, 1);
    assert_eq!(kmeans.sizes(), vec![1, 1]);
}

#[test]
fn test_event_stream_shape() {
    let points = vec![
        doc("sports-1", &[(1, 3.0), (2, 1.0)]),
        doc("tech-1", &[(10, 2.0), (11, 2.0)]),
        doc("sports-2", &[(1, 2.0), (3, 1.0)]),
        doc("tech-2", &[(10, 3.0), (12, 1.0)]),
        doc("tech-3", &[(10, 2.0), (11, 2.5)]),
        doc("sports-3", &[(1, 2.5), (2, 0.5)]),
    ];
    let recorder = Arc::new(RecordingObserver::new());
    let mut kmeans = BatchKMeans::new(2)
        .unwrap()
        .with_observer(Arc::clone(&recorder));

    let summary = kmeans.cluster(&points).unwrap();
    let events = recorder.events();

    // every pass reports k cluster updates followed by one pass summary
    let per_pass = 2 + 1;
    assert_eq!(events.len(), summary.passes * per_pass + 1);
    assert!(matches!(events[2], KMeansEvent::PassCompleted { pass: 1, .. }));
    match events.last() {
        Some(KMeansEvent::RunCompleted { passes, quality, reason }) => {
            assert_eq!(*passes, summary.passes);
            assert_eq!(*quality, summary.quality);
            assert_eq!(*reason, summary.reason);
        }
        other => panic!("expected RunCompleted, got {:?}", other),
    }

    let assignments = kmeans.assignments();
    for topic in ["sports", "tech"] {
        let clusters: Vec<usize> = assignments
            .iter()
            .filter(|(id, _)| id.starts_with(topic))
            .map(|(_, &c)| c)
            .collect();
        assert!(clusters.windows(2).all(|w| w[0] == w[1]), "{} split", topic);
    }
    assert_ne!(kmeans.cluster_of("sports-1"), kmeans.cluster_of("tech-1"));
}

#[test]
fn test_rerun_starts_from_fresh_partition() {
    let mut kmeans = BatchKMeans::<SparseVector>::new(2).unwrap();
    kmeans.cluster(&scalar_points(&[0.0, 1.0, 10.0, 11.0])).unwrap();

    let second = scalar_points(&[5.0, 100.0, 6.0, 101.0]);
    kmeans.cluster(&second).unwrap();

    assert_eq!(kmeans.assignments().len(), 4);
    assert_eq!(kmeans.cluster_of("p0"), kmeans.cluster_of("p2"));
    assert_eq!(kmeans.cluster_of("p1"), kmeans.cluster_of("p3"));
    assert_ne!(kmeans.cluster_of("p0"), kmeans.cluster_of("p1"));
}

#[test]
fn test_quality_matches_recomputed_distances() {
    let points = scalar_points(&[1.0, 20.0, 40.0, 3.0, 21.0, 38.0, 2.0]);
    let mut kmeans = BatchKMeans::<SparseVector>::new(3).unwrap();
    let summary = kmeans.cluster(&points).unwrap();

    let recomputed: f64 = kmeans
        .clusters()
        .iter()
        .map(|c| {
            c.members()
                .iter()
                .map(|m| c.centroid().distance_euclidean(m.vector()))
                .sum::<f64>()
        })
        .sum();

    assert!((summary.quality - recomputed).abs() < 1e-9);
    assert!((kmeans.partition_quality() - recomputed).abs() < 1e-9);
}
