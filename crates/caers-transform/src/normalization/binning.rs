//! Assigning continuous values to half-open bins.

use caers_model::{BinLabel, Bins};

/// Classify `value` into `[b[i], b[i+1])`.
///
/// Values below the first boundary, at or above the last, NaN, or absent
/// are `Unbinned`. Boundaries were validated when `bins` was built.
pub fn classify(value: Option<f64>, bins: &Bins) -> BinLabel {
    let Some(value) = value.filter(|value| !value.is_nan()) else {
        return BinLabel::Unbinned;
    };
    let boundaries = bins.boundaries();
    // Number of boundaries <= value; interval i starts at boundaries[i].
    let upper = boundaries.partition_point(|boundary| *boundary <= value);
    if upper == 0 || upper == boundaries.len() {
        return BinLabel::Unbinned;
    }
    let index = upper - 1;
    match bins.label(index) {
        Some(label) => BinLabel::Bin {
            index,
            label: label.to_string(),
        },
        None => BinLabel::Unbinned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_bins() -> Bins {
        Bins::new(vec![0.0, 5.0, 12.0, 18.0]).unwrap()
    }

    #[test]
    fn boundary_belongs_to_interval_it_starts() {
        let bins = age_bins();
        assert_eq!(classify(Some(5.0), &bins).index(), Some(1));
        assert_eq!(classify(Some(0.0), &bins).index(), Some(0));
        assert_eq!(classify(Some(4.999), &bins).index(), Some(0));
        assert_eq!(classify(Some(5.0), &bins).to_string(), "[5, 12)");
    }

    #[test]
    fn outside_range_is_unbinned() {
        let bins = age_bins();
        assert_eq!(classify(Some(18.0), &bins), BinLabel::Unbinned);
        assert_eq!(classify(Some(90.0), &bins), BinLabel::Unbinned);
        assert_eq!(classify(Some(-0.1), &bins), BinLabel::Unbinned);
    }

    #[test]
    fn nan_and_absent_are_unbinned() {
        let bins = age_bins();
        assert_eq!(classify(Some(f64::NAN), &bins), BinLabel::Unbinned);
        assert_eq!(classify(None, &bins), BinLabel::Unbinned);
    }

    #[test]
    fn custom_labels() {
        let bins = Bins::with_labels(
            vec![0.0, 18.0, 65.0],
            vec!["minor".to_string(), "adult".to_string()],
        )
        .unwrap();
        assert_eq!(
            classify(Some(40.0), &bins),
            BinLabel::Bin {
                index: 1,
                label: "adult".to_string()
            }
        );
    }
}
