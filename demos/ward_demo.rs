use agglo::cluster::{AgglomerativeClusterer, HierarchicalClustering, MergeOrder};
use agglo::distance::squared_euclidean;
use agglo::DissimilarityMatrix;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=trace shows every merge.
    env_logger::init();

    // Six points in 2D; half squared Euclidean makes Ward heights ESS increases.
    let vectors = vec![
        vec![2.0, 4.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
        vec![3.0, 2.0],
        vec![4.0, 0.0],
        vec![2.0, 2.0],
    ];
    let matrix = DissimilarityMatrix::from_vectors(&vectors, |a, b| squared_euclidean(a, b) / 2.0)?
        .with_labels(vec!["a", "b", "c", "d", "e", "f"])?;

    for order in [MergeOrder::Unconstrained, MergeOrder::Adjacent] {
        let config = HierarchicalClustering::new(1)
            .with_sum_ess(true)
            .with_order(order);
        let mut clusterer = config.build(matrix.clone())?;
        clusterer.cluster()?;

        println!("{config}");
        for (a, b, height, size) in clusterer.dendrogram().linkage_matrix() {
            println!("  {a:>2} + {b:>2} -> size {size}, height {height:.3}");
        }
        for k in 1..=3 {
            println!("  k={k}: {:?}", clusterer.dendrogram().extract_clusters(k)?);
        }
    }

    Ok(())
}
