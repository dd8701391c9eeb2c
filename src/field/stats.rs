/// Summary of the lit region of a field.
///
/// Zero cells are treated as "nothing there" (outside the mask, or a ray that
/// missed the sphere) and are left out.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FieldStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub lit_cells: usize,
}

impl FieldStats {
    /// Statistics over strictly positive values; all zeros when there are none.
    pub fn of_positive(values: &[f64]) -> Self {
        let mut stats = FieldStats {
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            mean: 0.0,
            lit_cells: 0,
        };
        let mut sum = 0.0;

        for &v in values.iter().filter(|&&v| v > 0.0) {
            stats.max = stats.max.max(v);
            stats.min = stats.min.min(v);
            sum += v;
            stats.lit_cells += 1;
        }

        if stats.lit_cells == 0 {
            return FieldStats::default();
        }
        stats.mean = sum / stats.lit_cells as f64;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_are_ignored() {
        let stats = FieldStats::of_positive(&[0.0, 2.0, 0.0, 4.0, 6.0]);
        assert_eq!(stats.max, 6.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.lit_cells, 3);
    }

    #[test]
    fn test_dark_field() {
        assert_eq!(FieldStats::of_positive(&[0.0; 4]), FieldStats::default());
    }
}
