//! Page arithmetic for the row browser. Pure functions, no I/O.

/// Rows fetched per window. Fixed for the whole session.
pub const PAGE_SIZE: usize = 25;

/// Clamp an offset to the start of the last non-empty page, rounded down
/// to a page multiple.
///
/// With no rows at all the only valid offset is 0.
pub fn clamp_offset(offset: usize, total_rows: usize, page_size: usize) -> usize {
    if total_rows == 0 {
        return 0;
    }
    let last_page_start = (total_rows - 1) / page_size * page_size;
    offset.min(last_page_start) / page_size * page_size
}

/// Total number of pages, never less than 1 (an empty result is one empty page).
pub fn page_count(total_rows: usize, page_size: usize) -> usize {
    if total_rows == 0 {
        1
    } else {
        (total_rows + page_size - 1) / page_size
    }
}

/// 1-based page number for display.
pub fn current_page(offset: usize, page_size: usize) -> usize {
    offset / page_size + 1
}

/// 1-based inclusive row range shown by the current window, `(0, 0)` when empty.
pub fn row_range(offset: usize, rows_in_window: usize, total_rows: usize) -> (usize, usize) {
    let start = if total_rows > 0 { offset + 1 } else { 0 };
    let end = (offset + rows_in_window).min(total_rows);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_offset_empty() {
        assert_eq!(clamp_offset(0, 0, PAGE_SIZE), 0);
        assert_eq!(clamp_offset(100, 0, PAGE_SIZE), 0);
    }

    #[test]
    fn test_clamp_offset_within_bounds() {
        assert_eq!(clamp_offset(0, 30, PAGE_SIZE), 0);
        assert_eq!(clamp_offset(25, 30, PAGE_SIZE), 25);
    }

    #[test]
    fn test_clamp_offset_rounds_down_misaligned_input() {
        // A misaligned offset (e.g. left over from an End on a shrunken
        // source) must come back on a page boundary.
        assert_eq!(clamp_offset(5, 26, PAGE_SIZE), 0);
        assert_eq!(clamp_offset(5, 30, PAGE_SIZE), 0);
        assert_eq!(clamp_offset(30, 60, PAGE_SIZE), 25);
    }

    #[test]
    fn test_clamp_offset_past_end() {
        // 30 rows -> last page starts at 25
        assert_eq!(clamp_offset(50, 30, PAGE_SIZE), 25);
        assert_eq!(clamp_offset(75, 30, PAGE_SIZE), 25);
        // exact multiple: 50 rows -> last page starts at 25, not 50
        assert_eq!(clamp_offset(50, 50, PAGE_SIZE), 25);
    }

    #[test]
    fn test_clamp_offset_result_is_page_aligned() {
        for total in [1usize, 24, 25, 26, 49, 50, 51, 1000] {
            for offset in [0usize, 5, 25, 30, 975, 10_000] {
                let clamped = clamp_offset(offset, total, PAGE_SIZE);
                assert_eq!(clamped % PAGE_SIZE, 0, "total={total} offset={offset}");
                assert!(clamped < total, "total={total} offset={offset}");
            }
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, PAGE_SIZE), 1);
        assert_eq!(page_count(1, PAGE_SIZE), 1);
        assert_eq!(page_count(25, PAGE_SIZE), 1);
        assert_eq!(page_count(26, PAGE_SIZE), 2);
        assert_eq!(page_count(30, PAGE_SIZE), 2);
        assert_eq!(page_count(50, PAGE_SIZE), 2);
        assert_eq!(page_count(51, PAGE_SIZE), 3);
    }

    #[test]
    fn test_current_page() {
        assert_eq!(current_page(0, PAGE_SIZE), 1);
        assert_eq!(current_page(25, PAGE_SIZE), 2);
        assert_eq!(current_page(50, PAGE_SIZE), 3);
    }

    #[test]
    fn test_row_range() {
        assert_eq!(row_range(0, 25, 30), (1, 25));
        assert_eq!(row_range(25, 5, 30), (26, 30));
        assert_eq!(row_range(0, 0, 0), (0, 0));
        // window shorter than page on the last page
        assert_eq!(row_range(25, 25, 30), (26, 30));
    }
}
