/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: [f32; 3], b: [f32; 3]) -> f32 {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs() + (a[2] - b[2]).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = [0.0, 0.0, 0.0];
        let b = [3.0, 4.0, 0.0];
        assert_eq!(euclidean(a, b), 5.0);
        assert_eq!(manhattan(a, b), 7.0);
        assert_eq!(manhattan(b, [3.0, 4.0, -2.0]), 2.0);
        assert_eq!(euclidean(b, b), 0.0);
    }
}
