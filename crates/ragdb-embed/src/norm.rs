/// Scales `v` to unit length in place. Near-zero vectors are left as they
/// are instead of blowing up.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= 1e-6 {
        return;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
}

/// Dot product; equals cosine similarity for unit vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
