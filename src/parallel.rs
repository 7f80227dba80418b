//! Chunking helpers for the rayon worker pool.
//!
//! The wiring kernel is data-parallel over ranges (fork-join, no
//! coroutines). These helpers produce the two range shapes it needs:
//! uniform worker slices for passes that walk the sorted order array, and
//! page-aligned subranges for passes that must be write-disjoint at the
//! granularity of the underlying storage pages, not just at the granularity
//! of logical offsets.

use std::ops::Range;

/// Offsets per storage page. Ranges split only at multiples of this never
/// let two workers touch the same page of a flat attribute array.
pub const PAGE_LEN: u64 = 1024;

/// Target slice length for splitting `len` items across the pool.
///
/// Aims for a few slices per worker so the scheduler can balance, with a
/// floor that keeps per-slice bookkeeping (splice buffers, lock grabs)
/// amortized.
pub fn chunk_len(len: usize) -> usize {
    let workers = rayon::current_num_threads().max(1);
    len.div_ceil(workers * 4).max(64)
}

/// Splits `[0, len)` into consecutive ranges of at most `chunk` items.
pub fn chunk_ranges(len: usize, chunk: usize) -> Vec<Range<usize>> {
    debug_assert!(chunk > 0);
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}

/// Splits the absolute offset range `[start, end)` at page boundaries.
///
/// Two logically disjoint offset ranges can still share a storage page at
/// their common boundary; iterating page-aligned subranges removes that
/// hazard entirely, so stage passes using this splitter need no locking.
pub fn page_chunks(start: u64, end: u64) -> Vec<Range<u64>> {
    if start >= end {
        return Vec::new();
    }
    let mut ranges = Vec::new();
    let mut at = start;
    while at < end {
        let page_end = ((at / PAGE_LEN) + 1) * PAGE_LEN;
        let stop = page_end.min(end);
        ranges.push(at..stop);
        at = stop;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ranges_cover_without_overlap() {
        let ranges = chunk_ranges(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..9, 9..10]);
    }

    #[test]
    fn page_chunks_split_at_page_boundaries() {
        let ranges = page_chunks(1000, 3000);
        assert_eq!(ranges, vec![1000..1024, 1024..2048, 2048..3000]);
        // contiguous cover
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn page_chunks_empty_range() {
        assert!(page_chunks(5, 5).is_empty());
        assert!(page_chunks(7, 3).is_empty());
    }

    #[test]
    fn page_chunks_within_one_page() {
        assert_eq!(page_chunks(10, 20), vec![10..20]);
    }
}
