//! Constant-mode series.

use crate::types::{Field, SeriesTable, TimeRange, TIME_FIELD, VALUE_FIELD};
use sgraph_common::RefId;

/// Produces a flat line across the requested range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantSeriesGenerator;

impl ConstantSeriesGenerator {
    /// Two rows, `(range.from, constant)` and `(range.to, constant)`.
    pub fn generate(ref_id: RefId, range: &TimeRange, constant: f64) -> SeriesTable {
        let times = vec![range.from.timestamp_millis(), range.to.timestamp_millis()];
        let values = vec![constant, constant];
        SeriesTable::from_aligned(
            ref_id,
            vec![Field::time(TIME_FIELD, times), Field::number(VALUE_FIELD, values)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_rows_at_range_edges() {
        let range = TimeRange::from_millis(1_700_000_000_000, 1_700_003_600_000).unwrap();
        let table = ConstantSeriesGenerator::generate(RefId::from("A"), &range, 6.5);

        assert_eq!(table.ref_id(), &RefId::from("A"));
        assert_eq!(
            table.rows(VALUE_FIELD),
            vec![(1_700_000_000_000, 6.5), (1_700_003_600_000, 6.5)]
        );
    }

    #[test]
    fn test_zero_width_range() {
        let range = TimeRange::from_millis(5_000, 5_000).unwrap();
        let table = ConstantSeriesGenerator::generate(RefId::from("A"), &range, -1.0);
        assert_eq!(table.rows(VALUE_FIELD), vec![(5_000, -1.0), (5_000, -1.0)]);
    }

    proptest! {
        #[test]
        fn prop_constant_series_is_exactly_two_rows(
            from in 0i64..4_000_000_000_000,
            width in 0i64..1_000_000_000,
            constant in -1.0e9f64..1.0e9,
        ) {
            let range = TimeRange::from_millis(from, from + width).unwrap();
            let table = ConstantSeriesGenerator::generate(RefId::from("A"), &range, constant);
            prop_assert_eq!(table.rows(VALUE_FIELD), vec![(from, constant), (from + width, constant)]);
        }
    }
}
