//! Property-based tests for frame selection and sheet layout.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p spritebake-spec --test proptest_selection
//! ```

use proptest::prelude::*;

use spritebake_spec::{ConfigError, FrameRange, FrameSelection, SheetLayout};

// ============================================================================
// 1. Frame Selection
// ============================================================================

proptest! {
    /// Every valid request yields exactly `count` in-range, non-decreasing indices.
    #[test]
    fn selection_has_exact_count_within_range(
        start in -10_000i32..10_000,
        len in 0i32..5_000,
        count in 1u32..512,
    ) {
        let range = FrameRange::new(start, start + len).unwrap();
        let selection = FrameSelection::evenly_spaced(range, count).unwrap();
        let indices = selection.indices();

        prop_assert_eq!(indices.len(), count as usize);
        prop_assert!(indices.iter().all(|&f| range.contains(f)));
        prop_assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(indices[0], range.start());
        if count > 1 {
            prop_assert_eq!(indices[indices.len() - 1], range.end());
        }
    }

    /// Duplicates appear only when the range is shorter than the count.
    #[test]
    fn duplicates_only_for_short_ranges(
        start in -1_000i32..1_000,
        len in 0i32..200,
        count in 1u32..200,
    ) {
        let range = FrameRange::new(start, start + len).unwrap();
        let selection = FrameSelection::evenly_spaced(range, count).unwrap();
        let unique = selection.unique_indices();

        if range.len() >= u64::from(count) {
            prop_assert_eq!(unique.len(), count as usize);
            prop_assert!(!selection.is_collapsed());
        } else {
            prop_assert_eq!(unique.len() as u64, range.len());
        }
    }

    /// Extreme ranges never overflow.
    #[test]
    fn extreme_ranges_do_not_panic(count in 1u32..64) {
        let range = FrameRange::new(i32::MIN, i32::MAX).unwrap();
        let selection = FrameSelection::evenly_spaced(range, count).unwrap();
        prop_assert_eq!(selection.indices().len(), count as usize);
    }

    /// Reversed ranges are always rejected.
    #[test]
    fn reversed_ranges_rejected(start in -1_000i32..1_000, gap in 1i32..1_000) {
        prop_assert_eq!(
            FrameRange::new(start, start - gap),
            Err(ConfigError::InvalidFrameRange { start, end: start - gap })
        );
    }
}

// ============================================================================
// 2. Sheet Layout
// ============================================================================

proptest! {
    /// The grid fits every frame and never has a fully blank row.
    #[test]
    fn layout_fits_without_blank_rows(
        frame_count in 1u32..10_000,
        columns in proptest::option::of(1u32..200),
        cell_size in 1u32..512,
    ) {
        let layout = SheetLayout::compute(frame_count, columns, cell_size).unwrap();
        let cells = u64::from(layout.columns) * u64::from(layout.rows);

        prop_assert!(cells >= u64::from(frame_count));
        prop_assert!(cells - u64::from(frame_count) < u64::from(layout.columns));
        prop_assert_eq!(layout.width(), layout.columns * cell_size);
        prop_assert_eq!(layout.height(), layout.rows * cell_size);
    }

    /// Automatic columns form a near-square grid.
    #[test]
    fn auto_columns_are_ceil_sqrt(frame_count in 1u32..100_000) {
        let layout = SheetLayout::compute(frame_count, None, 1).unwrap();
        let c = u64::from(layout.columns);
        prop_assert!(c * c >= u64::from(frame_count));
        prop_assert!((c - 1) * (c - 1) < u64::from(frame_count));
        prop_assert!(layout.rows <= layout.columns);
    }
}
