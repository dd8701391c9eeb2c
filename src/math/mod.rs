pub mod vec3;

pub use vec3::Vec3;

/// `count` evenly spaced samples over the closed interval `[start, end]`.
///
/// A single sample yields `start`; zero samples yield an empty vector.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    // Pin the last sample so rounding never overshoots the bound.
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(-2.5, 2.5, 5);
        assert_eq!(xs, vec![-2.5, -1.25, 0.0, 1.25, 2.5]);
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
    }
}
