/// Number of page buttons shown in the pagination bar.
pub const WINDOW_SIZE: u32 = 9;

/// Contiguous page numbers to show as controls, centered on `current` and
/// clamped to `1..=total`.
pub fn page_window(current: u32, total: u32, size: u32) -> Vec<u32> {
    if total <= size {
        return (1..=total).collect();
    }

    let mut start = current.saturating_sub(size / 2).max(1);
    let mut end = start + size - 1;
    if end > total {
        end = total;
        start = total - size + 1;
    }
    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_catalog_shows_every_page() {
        for total in 1..=8 {
            let expected: Vec<u32> = (1..=total).collect();
            for current in 1..=total {
                assert_eq!(page_window(current, total, WINDOW_SIZE), expected);
            }
        }
    }

    #[test]
    fn test_window_edges() {
        assert_eq!(page_window(1, 20, 9), (1..=9).collect::<Vec<_>>());
        assert_eq!(page_window(20, 20, 9), (12..=20).collect::<Vec<_>>());
        assert_eq!(page_window(10, 20, 9), (6..=14).collect::<Vec<_>>());
    }

    #[test]
    fn test_near_edges() {
        assert_eq!(page_window(5, 20, 9), (1..=9).collect::<Vec<_>>());
        assert_eq!(page_window(6, 20, 9), (2..=10).collect::<Vec<_>>());
        assert_eq!(page_window(16, 20, 9), (12..=20).collect::<Vec<_>>());
        assert_eq!(page_window(15, 20, 9), (11..=19).collect::<Vec<_>>());
    }

    #[test]
    fn test_exactly_window_size() {
        assert_eq!(page_window(9, 9, 9), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(page_window(1, 0, 9).is_empty());
    }

    proptest! {
        #[test]
        fn window_is_contiguous_and_in_bounds(total in 1u32..500, current in 1u32..500) {
            let current = current.min(total);
            let window = page_window(current, total, WINDOW_SIZE);

            prop_assert_eq!(window.len() as u32, total.min(WINDOW_SIZE));
            prop_assert!(window.contains(&current));
            prop_assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
            prop_assert!(*window.first().unwrap() >= 1);
            prop_assert!(*window.last().unwrap() <= total);
        }

        #[test]
        fn window_is_centered_away_from_edges(total in 10u32..500, offset in 0u32..500) {
            let half = WINDOW_SIZE / 2;
            let current = half + 1 + offset % (total - 2 * half);
            let window = page_window(current, total, WINDOW_SIZE);
            prop_assert_eq!(window[half as usize], current);
        }
    }
}
