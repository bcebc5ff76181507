use nalgebra::{Point3, Vector3};

/// Position of atom `i` in a flat coordinate buffer.
#[inline]
pub fn position(x: &[f64], i: usize) -> Point3<f64> {
    let k = 3 * i;
    Point3::new(x[k], x[k + 1], x[k + 2])
}

/// Separation vector `x_i - x_j` and its squared norm.
///
/// Squared distances are returned alongside the vector so that pair kernels
/// never need a `sqrt()`.
#[inline]
pub fn separation(x: &[f64], i: usize, j: usize) -> (Vector3<f64>, f64) {
    let (a, b) = (3 * i, 3 * j);
    let dr = Vector3::new(x[a] - x[b], x[a + 1] - x[b + 1], x[a + 2] - x[b + 2]);
    let r2 = dr.norm_squared();
    (dr, r2)
}

/// Largest squared separation over all atom pairs (0 for fewer than two atoms).
pub fn max_pair_distance_sq(x: &[f64]) -> f64 {
    let n = x.len() / 3;
    let mut max_r2: f64 = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let (_, r2) = separation(x, i, j);
            max_r2 = max_r2.max(r2);
        }
    }
    max_r2
}

/// Checks a configuration for hard overlaps.
/// Returns `true` if every pair is at least `min_distance` apart.
pub fn check_overlap(x: &[f64], min_distance: f64) -> bool {
    let n = x.len() / 3;
    let limit_sq = min_distance * min_distance;

    for i in 0..n {
        for j in (i + 1)..n {
            let (_, r2) = separation(x, i, j);
            if r2 < limit_sq {
                return false; // Collision detected
            }
        }
    }
    true
}

/// Center of geometry of a flat coordinate buffer.
pub fn centroid(x: &[f64]) -> Vector3<f64> {
    let n = x.len() / 3;
    if n == 0 {
        return Vector3::zeros();
    }
    let mut center = Vector3::zeros();
    for i in 0..n {
        center += position(x, i).coords;
    }
    center / n as f64
}

/// Translates the center of geometry to the origin.
///
/// **Invariant**: Modifies positions in-place. Does NOT reorder atoms.
pub fn center(x: &mut [f64]) {
    let c = centroid(x);
    for atom in x.chunks_exact_mut(3) {
        atom[0] -= c.x;
        atom[1] -= c.y;
        atom[2] -= c.z;
    }
}
