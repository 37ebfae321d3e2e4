use agglo::cluster::{
    AgglomerativeClusterer, Clusterer, HierarchicalClustering, Linkage, NeighborClusterer,
};
use agglo::distance::squared_euclidean;
use agglo::matrix::SYMMETRY_TOLERANCE;
use agglo::DissimilarityMatrix;
use proptest::prelude::*;

const LINKAGES: [Linkage; 6] = [
    Linkage::Single,
    Linkage::Complete,
    Linkage::Average,
    Linkage::Median,
    Linkage::Centroid,
    Linkage::Ward,
];

fn half_squared(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b) / 2.0
}

fn points() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 2), 2..16)
}

proptest! {
    #[test]
    fn prop_full_run_merges_everything(
        data in points(),
        linkage_idx in 0usize..6,
    ) {
        let n = data.len();
        let matrix = DissimilarityMatrix::from_vectors(&data, half_squared).unwrap();
        let config = HierarchicalClustering::new(1).with_linkage(LINKAGES[linkage_idx]);
        let mut c = Clusterer::new(matrix, &config).unwrap();
        c.cluster().unwrap();

        let dendro = c.dendrogram();
        prop_assert_eq!(dendro.n_merges(), n - 1);
        let root = dendro.root().unwrap();
        prop_assert_eq!(&root.members, &(0..n).collect::<Vec<_>>());
    }

    #[test]
    fn prop_partial_run_stops_at_target(
        data in points(),
        k in 1usize..16,
    ) {
        let n = data.len();
        prop_assume!(k <= n);
        let matrix = DissimilarityMatrix::from_vectors(&data, half_squared).unwrap();
        let mut c = Clusterer::new(matrix, &HierarchicalClustering::new(k)).unwrap();
        c.cluster().unwrap();

        prop_assert_eq!(c.dendrogram().n_merges(), n - k);
        prop_assert_eq!(c.matrix().size(), k);
        let clusters = c.dendrogram().extract_clusters(k).unwrap();
        prop_assert_eq!(clusters.len(), k);
        prop_assert_eq!(clusters.iter().map(Vec::len).sum::<usize>(), n);
    }

    #[test]
    fn prop_update_keeps_symmetry_and_remove_copies(
        data in points(),
        linkage_idx in 0usize..6,
    ) {
        let linkage = LINKAGES[linkage_idx];
        let mut m = DissimilarityMatrix::from_vectors(&data, half_squared).unwrap();
        let mut sizes = vec![1; m.size()];
        while m.size() > 1 {
            let cell = m.minimum_cell().unwrap();
            linkage.update(&mut m, cell.row, cell.col, &sizes).unwrap();
            prop_assert!(m.is_symmetric(SYMMETRY_TOLERANCE));

            let before = m.clone();
            let next = m.remove(cell.col).unwrap();
            prop_assert_eq!(&m, &before);
            prop_assert_eq!(next.size(), m.size() - 1);

            sizes[cell.row] += sizes[cell.col];
            sizes.remove(cell.col);
            m = next;
        }
    }

    #[test]
    fn prop_runs_are_deterministic(
        data in points(),
        linkage_idx in 0usize..6,
    ) {
        let config = HierarchicalClustering::new(1).with_linkage(LINKAGES[linkage_idx]);
        let run = || {
            let matrix = DissimilarityMatrix::from_vectors(&data, half_squared).unwrap();
            let mut c = Clusterer::new(matrix, &config).unwrap();
            c.cluster().unwrap();
            c.dendrogram().clone()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn prop_ward_cumulative_heights_non_decreasing(data in points()) {
        let matrix = DissimilarityMatrix::from_vectors(&data, half_squared).unwrap();
        let config = HierarchicalClustering::new(1)
            .with_linkage(Linkage::Ward)
            .with_sum_ess(true);
        let mut c = Clusterer::new(matrix, &config).unwrap();
        c.cluster().unwrap();

        let heights = c.dendrogram().heights();
        for w in heights.windows(2) {
            prop_assert!(w[0] <= w[1] + 1e-9, "{:?}", heights);
        }
    }

    #[test]
    fn prop_neighbor_merges_are_adjacent(
        data in points(),
        linkage_idx in 0usize..6,
    ) {
        let matrix = DissimilarityMatrix::from_vectors(&data, half_squared).unwrap();
        let config = HierarchicalClustering::new(1)
            .with_linkage(LINKAGES[linkage_idx])
            .with_sum_ess(true);
        let mut c = NeighborClusterer::new(matrix, &config).unwrap();
        c.cluster().unwrap();

        prop_assert_eq!(c.dendrogram().n_merges(), data.len() - 1);
        for m in c.dendrogram().merges() {
            prop_assert_eq!(m.position_a.abs_diff(m.position_b), 1);
        }
    }
}
