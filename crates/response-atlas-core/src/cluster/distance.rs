//! Pairwise cosine distances over the 2-D coordinates.

/// Cosine distance between two 2-D points: `1 − cos(a, b)`.
///
/// Zero vectors have no direction; their distance to anything is defined
/// as 1.0 (maximal indifference, matching the convention downstream code
/// was tuned against).
pub fn cosine_distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let norm_a = (a[0] * a[0] + a[1] * a[1]).sqrt();
    let norm_b = (b[0] * b[0] + b[1] * b[1]).sqrt();
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// Build the symmetric N×N cosine-distance matrix with the diagonal forced
/// to exactly 0.
pub fn cosine_distance_matrix(coords: &[[f32; 2]]) -> Vec<Vec<f32>> {
    let n = coords.len();
    let mut matrix = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = cosine_distance(coords[i], coords[j]);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}
