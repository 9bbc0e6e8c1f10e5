//! Slicing resolved records for the carousel and the paged grid.
//!
//! These are pure functions over the resolver's output. The carousel keeps
//! a start index and steps it around a ring; the grid grows its visible
//! count by a fixed step.

/// Up to `size` records starting at `start`, wrapping past the end.
///
/// `start` is taken modulo the record count and the window never repeats a
/// record, so fewer than `size` records yields all of them once.
pub fn featured_window<T: Clone>(records: &[T], start: usize, size: usize) -> Vec<T> {
    if records.is_empty() {
        return Vec::new();
    }
    let len = records.len();
    let start = start % len;
    (0..size.min(len))
        .map(|offset| records[(start + offset) % len].clone())
        .collect()
}

/// Move a carousel start index by `delta`, wrapping in both directions.
pub fn step_window(start: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    let start = (start as isize).rem_euclid(len);
    (start + delta).rem_euclid(len) as usize
}

/// Visible part of a paged grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowMore<'a, T> {
    pub visible: &'a [T],
    /// No further "show more" step would reveal anything
    pub all_visible: bool,
}

/// Reveal `step` more records after `visible` are already shown.
pub fn show_more<T>(records: &[T], visible: usize, step: usize) -> ShowMore<'_, T> {
    let count = visible.saturating_add(step).min(records.len());
    ShowMore {
        visible: &records[..count],
        all_visible: count == records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_wraps() {
        let records = [1, 2, 3, 4, 5];
        assert_eq!(featured_window(&records, 0, 3), vec![1, 2, 3]);
        assert_eq!(featured_window(&records, 3, 3), vec![4, 5, 1]);
        assert_eq!(featured_window(&records, 7, 2), vec![3, 4]);
    }

    #[test]
    fn test_window_smaller_than_size() {
        let records = ["a", "b"];
        assert_eq!(featured_window(&records, 1, 5), vec!["b", "a"]);
        assert!(featured_window::<u8>(&[], 3, 4).is_empty());
        assert!(featured_window(&records, 0, 0).is_empty());
    }

    #[test]
    fn test_step_window() {
        assert_eq!(step_window(0, 5, 1), 1);
        assert_eq!(step_window(4, 5, 1), 0);
        assert_eq!(step_window(0, 5, -1), 4);
        assert_eq!(step_window(2, 5, -7), 0);
        assert_eq!(step_window(3, 0, 1), 0);
    }

    #[test]
    fn test_show_more() {
        let records: Vec<u32> = (0..10).collect();

        let page = show_more(&records, 0, 4);
        assert_eq!(page.visible, &[0, 1, 2, 3]);
        assert!(!page.all_visible);

        let page = show_more(&records, 8, 4);
        assert_eq!(page.visible.len(), 10);
        assert!(page.all_visible);

        let page = show_more::<u32>(&[], 0, 4);
        assert!(page.visible.is_empty());
        assert!(page.all_visible);
    }
}
