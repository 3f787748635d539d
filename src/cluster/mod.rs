//! Partition-based clustering of feature vectors.

pub mod kmeans;

pub use kmeans::{KMeans, KMeansFit};
