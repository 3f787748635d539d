//! Lloyd's k-means with k-means++ seeding and multiple restarts.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ClusteringConfig;
use crate::error::{DomainMeshError, Result};

/// k-means parameters. The seed is explicit so identical input always
/// produces identical labels.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub n_clusters: usize,
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold, relative to the mean per-feature variance
    pub tolerance: f64,
    pub seed: u64,
}

/// Result of the best (lowest-inertia) restart
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each point to its centroid
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize, seed: u64) -> Self {
        let defaults = ClusteringConfig::default();
        Self {
            n_clusters,
            n_init: defaults.n_init,
            max_iter: defaults.max_iter,
            tolerance: defaults.tolerance,
            seed,
        }
    }

    pub fn from_config(config: &ClusteringConfig, n_clusters: usize) -> Self {
        Self {
            n_clusters,
            n_init: config.n_init.max(1),
            max_iter: config.max_iter.max(1),
            tolerance: config.tolerance,
            seed: config.seed,
        }
    }

    /// Cluster `points` and return the label of each point's nearest centroid.
    pub fn fit_predict(&self, points: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(points)?.labels)
    }

    /// Run `n_init` seeded restarts and keep the one with the lowest inertia
    /// (the earliest restart wins ties).
    pub fn fit(&self, points: &[Vec<f64>]) -> Result<KMeansFit> {
        if points.is_empty() {
            return Err(DomainMeshError::InvalidInput(
                "k-means requires at least one point".to_string(),
            ));
        }
        if self.n_clusters == 0 || self.n_clusters > points.len() {
            return Err(DomainMeshError::InvalidInput(format!(
                "n_clusters must be in 1..={}, got {}",
                points.len(),
                self.n_clusters
            )));
        }
        let dim = points[0].len();
        if points.iter().any(|p| p.len() != dim) {
            return Err(DomainMeshError::InvalidInput(
                "all points must have the same dimension".to_string(),
            ));
        }

        let tol = self.tolerance * mean_variance(points);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut best: Option<(usize, KMeansFit)> = None;

        for run in 0..self.n_init.max(1) {
            let centers = init_plus_plus(points, self.n_clusters, &mut rng);
            let fit = lloyd(points, centers, self.max_iter.max(1), tol);
            let better = match &best {
                Some((_, b)) => fit.inertia < b.inertia,
                None => true,
            };
            if better {
                best = Some((run, fit));
            }
        }

        let (run, fit) = best.ok_or_else(|| {
            DomainMeshError::InvalidInput("k-means produced no result".to_string())
        })?;
        log::debug!(
            "k-means: k={}, best restart {} of {} (inertia {:.6}, {} iterations)",
            self.n_clusters,
            run + 1,
            self.n_init,
            fit.inertia,
            fit.iterations
        );
        Ok(fit)
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn mean_variance(points: &[Vec<f64>]) -> f64 {
    let dim = points[0].len();
    if dim == 0 {
        return 0.0;
    }
    let n = points.len() as f64;
    let mut total = 0.0;
    for d in 0..dim {
        let mean = points.iter().map(|p| p[d]).sum::<f64>() / n;
        total += points.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / n;
    }
    total / dim as f64
}

/// Index and squared distance of the nearest center (lowest index on ties).
fn nearest(point: &[f64], centers: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, center) in centers.iter().enumerate() {
        let d = squared_distance(point, center);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

/// k-means++ seeding: each further center is drawn with probability
/// proportional to its squared distance from the chosen centers.
fn init_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut chosen = vec![false; n];
    let first = rng.gen_range(0..n);
    chosen[first] = true;
    let mut centers = vec![points[first].clone()];
    let mut dist: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &points[first]))
        .collect();

    while centers.len() < k {
        let total: f64 = dist.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = None;
            for (i, d) in dist.iter().enumerate() {
                if *d <= 0.0 {
                    continue;
                }
                cumulative += d;
                pick = Some(i);
                if cumulative > target {
                    break;
                }
            }
            // total > 0 guarantees at least one positive distance
            pick.unwrap_or(first)
        } else {
            // Only duplicates remain: pick uniformly among unused points
            let unused: Vec<usize> = (0..n).filter(|&i| !chosen[i]).collect();
            unused[rng.gen_range(0..unused.len())]
        };

        chosen[next] = true;
        centers.push(points[next].clone());
        for (i, p) in points.iter().enumerate() {
            let d = squared_distance(p, &points[next]);
            if d < dist[i] {
                dist[i] = d;
            }
        }
    }
    centers
}

fn lloyd(points: &[Vec<f64>], mut centers: Vec<Vec<f64>>, max_iter: usize, tol: f64) -> KMeansFit {
    let k = centers.len();
    let dim = points[0].len();
    let mut labels: Vec<usize> = points.iter().map(|p| nearest(p, &centers).0).collect();
    let mut iterations = 0;

    for _ in 0..max_iter {
        iterations += 1;

        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];
        for (p, &label) in points.iter().zip(labels.iter()) {
            counts[label] += 1;
            for (s, v) in sums[label].iter_mut().zip(p.iter()) {
                *s += v;
            }
        }

        let mut new_centers: Vec<Vec<f64>> = sums
            .into_iter()
            .zip(counts.iter())
            .zip(centers.iter())
            .map(|((sum, &count), old)| {
                if count == 0 {
                    old.clone()
                } else {
                    sum.into_iter().map(|s| s / count as f64).collect()
                }
            })
            .collect();

        relocate_empty_clusters(points, &labels, &mut counts, &mut new_centers);

        let shift: f64 = centers
            .iter()
            .zip(new_centers.iter())
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centers = new_centers;

        let new_labels: Vec<usize> = points.iter().map(|p| nearest(p, &centers).0).collect();
        let unchanged = new_labels == labels;
        labels = new_labels;
        // Keep iterating while a cluster is empty so relocation can refill it
        let has_empty = (0..k).any(|c| !labels.contains(&c));
        if (unchanged || shift <= tol) && !has_empty {
            break;
        }
    }

    let inertia = points
        .iter()
        .zip(labels.iter())
        .map(|(p, &l)| squared_distance(p, &centers[l]))
        .sum();

    KMeansFit {
        labels,
        centroids: centers,
        inertia,
        iterations,
    }
}

/// Move each empty cluster's center onto the point farthest from its own
/// center, taken from a cluster that can spare a member.
fn relocate_empty_clusters(
    points: &[Vec<f64>],
    labels: &[usize],
    counts: &mut [usize],
    centers: &mut [Vec<f64>],
) {
    let empty: Vec<usize> = (0..counts.len()).filter(|&c| counts[c] == 0).collect();
    if empty.is_empty() {
        return;
    }

    let mut candidates: Vec<(usize, f64)> = points
        .iter()
        .zip(labels.iter())
        .enumerate()
        .map(|(i, (p, &l))| (i, squared_distance(p, &centers[l])))
        .collect();
    // Farthest first; stable sort keeps input order among equal distances
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut used = vec![false; points.len()];
    for cluster in empty {
        let pick = candidates
            .iter()
            .find(|(i, _)| !used[*i] && counts[labels[*i]] > 1);
        if let Some(&(i, _)) = pick {
            used[i] = true;
            counts[labels[i]] -= 1;
            counts[cluster] += 1;
            centers[cluster] = points[i].clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ]
    }

    #[test]
    fn test_separates_two_blobs() {
        let labels = KMeans::new(2, 42).fit_predict(&blobs()).unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[3], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_inertia_of_blobs_is_small() {
        let fit = KMeans::new(2, 42).fit(&blobs()).unwrap();
        assert!(fit.inertia < 0.1, "inertia was {}", fit.inertia);
        assert_eq!(fit.centroids.len(), 2);
    }

    #[test]
    fn test_k_equals_n_gives_singletons() {
        let points = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0], vec![0.0, 0.0]];
        let mut labels = KMeans::new(4, 42).fit_predict(&points).unwrap();
        labels.sort();
        assert_eq!(labels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_same_seed_same_labels() {
        let points: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![(i % 7) as f64, (i % 3) as f64, (i / 5) as f64])
            .collect();
        let a = KMeans::new(5, 42).fit(&points).unwrap();
        let b = KMeans::new(5, 42).fit(&points).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn test_labels_in_range() {
        let points: Vec<Vec<f64>> = (0..12).map(|i| vec![(i * i % 11) as f64]).collect();
        let labels = KMeans::new(5, 7).fit_predict(&points).unwrap();
        assert_eq!(labels.len(), 12);
        assert!(labels.iter().all(|&l| l < 5));
    }

    #[test]
    fn test_duplicates_share_a_label() {
        let points = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let labels = KMeans::new(2, 42).fit_predict(&points).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_single_point() {
        let labels = KMeans::new(1, 42).fit_predict(&[vec![0.3, 0.4]]).unwrap();
        assert_eq!(labels, vec![0]);
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = KMeans::new(1, 42).fit_predict(&[]).unwrap_err();
        assert!(matches!(err, DomainMeshError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_too_many_clusters() {
        let err = KMeans::new(3, 42).fit_predict(&[vec![0.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, DomainMeshError::InvalidInput(_)));
    }
}
