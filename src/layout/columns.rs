//! Packing fixed-height items into a bounded number of columns.
//!
//! Contests are placed in reading order, so columns are always filled left to
//! right and an item can only go in the current column or the next empty one.
//! When everything fits, every such packing is enumerated and the most
//! balanced one wins. Ballots hold tens of contests, not thousands, so the
//! exhaustive search stays small; there is no cutoff.

/// Anything with a fixed height in points.
pub trait HasHeight {
    fn height(&self) -> f64;
}

/// Result of [`lay_out_in_columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout<T> {
    /// Exactly `num_columns` columns, empty ones included, even when there
    /// was nothing to place. A `num_columns` of zero counts as one.
    pub columns: Vec<Vec<T>>,
    /// Height of the tallest column.
    pub height: f64,
    /// Items that did not fit, in order, to be placed on a later page.
    pub leftover: Vec<T>,
}

/// Pack `elements` into at most `num_columns` columns no taller than
/// `max_column_height`, preserving order.
///
/// If not everything fits, as many items as possible are packed greedily and
/// the rest are returned in `leftover`. An item taller than
/// `max_column_height` never fits; it and everything after it are leftover.
///
/// If everything fits, the packing minimizes, in order: the tallest column,
/// the spread between tallest and shortest column, and the index of the first
/// empty column (using every column beats leaving one empty).
pub fn lay_out_in_columns<T: HasHeight>(
    elements: Vec<T>,
    num_columns: usize,
    max_column_height: f64,
) -> ColumnLayout<T> {
    let num_columns = num_columns.max(1);
    let heights: Vec<f64> = elements.iter().map(HasHeight::height).collect();

    // Greedy fill establishes feasibility and the leftover set.
    let mut greedy_counts = vec![0usize; num_columns];
    let mut column_height = 0.0;
    let mut column = 0;
    let mut placed = 0;
    while placed < heights.len() && column < num_columns {
        if column_height + heights[placed] > max_column_height {
            column += 1;
            column_height = 0.0;
        } else {
            column_height += heights[placed];
            greedy_counts[column] += 1;
            placed += 1;
        }
    }

    let counts = if placed < heights.len() {
        greedy_counts
    } else {
        Packings::new(&heights, num_columns, max_column_height)
            .map(|counts| {
                let score = score(&column_heights(&heights, &counts), &counts);
                (counts, score)
            })
            .min_by(|(_, a), (_, b)| a.compare(b))
            .map(|(counts, _)| counts)
            .unwrap_or(greedy_counts)
    };

    let heights_by_column = column_heights(&heights, &counts);
    let height = heights_by_column.iter().copied().fold(0.0, f64::max);

    let mut remaining = elements.into_iter();
    let columns = counts
        .iter()
        .map(|&count| remaining.by_ref().take(count).collect())
        .collect();
    ColumnLayout {
        columns,
        height,
        leftover: remaining.collect(),
    }
}

fn column_heights(heights: &[f64], counts: &[usize]) -> Vec<f64> {
    let mut start = 0;
    counts
        .iter()
        .map(|&count| {
            let sum = heights[start..start + count].iter().sum();
            start += count;
            sum
        })
        .collect()
}

/// Ordering key for a complete packing. Compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct Score {
    tallest: f64,
    spread: f64,
    /// `-1` when no column is empty.
    first_empty_column: i64,
}

impl Score {
    fn compare(&self, other: &Score) -> std::cmp::Ordering {
        self.partial_cmp(other).unwrap_or(std::cmp::Ordering::Equal)
    }
}

fn score(column_heights: &[f64], counts: &[usize]) -> Score {
    let tallest = column_heights.iter().copied().fold(f64::MIN, f64::max);
    let shortest = column_heights.iter().copied().fold(f64::MAX, f64::min);
    Score {
        tallest,
        spread: tallest - shortest,
        first_empty_column: counts
            .iter()
            .position(|&count| count == 0)
            .map_or(-1, |i| i as i64),
    }
}

/// Lazily enumerates every order-preserving packing that fits, as the number
/// of items in each column. Partial packings are pruned as soon as a column
/// overflows.
struct Packings<'a> {
    heights: &'a [f64],
    num_columns: usize,
    max_column_height: f64,
    stack: Vec<Partial>,
}

#[derive(Clone)]
struct Partial {
    /// Items per column; the non-empty columns always form a prefix.
    counts: Vec<usize>,
    /// Number of non-empty columns.
    used: usize,
    /// Height of the last non-empty column.
    current_height: f64,
    /// Next item to place.
    next: usize,
}

impl<'a> Packings<'a> {
    fn new(heights: &'a [f64], num_columns: usize, max_column_height: f64) -> Self {
        Self {
            heights,
            num_columns,
            max_column_height,
            stack: vec![Partial {
                counts: vec![0; num_columns],
                used: 0,
                current_height: 0.0,
                next: 0,
            }],
        }
    }
}

impl Iterator for Packings<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(partial) = self.stack.pop() {
            if partial.next == self.heights.len() {
                return Some(partial.counts);
            }
            let height = self.heights[partial.next];

            // Pushed in reverse so extending the current column is explored first.
            if partial.used < self.num_columns && height <= self.max_column_height {
                let mut new_column = partial.clone();
                new_column.counts[partial.used] = 1;
                new_column.used += 1;
                new_column.current_height = height;
                new_column.next += 1;
                self.stack.push(new_column);
            }
            if partial.used > 0 && partial.current_height + height <= self.max_column_height {
                let mut extended = partial;
                extended.counts[extended.used - 1] += 1;
                extended.current_height += height;
                extended.next += 1;
                self.stack.push(extended);
            }
        }
        None
    }
}
