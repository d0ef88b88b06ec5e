//! Bounded top-K selection.
//!
//! Keeps a min-heap of at most `k` entries while scanning, so selecting the
//! K largest out of N costs O(N log K) instead of a full sort. Ties keep
//! input order: among equal keys the earlier element ranks higher.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::directory::types::Employee;

/// The `k` items with the largest `key`, ordered by key descending.
///
/// Returns `min(k, items.len())` references into `items`.
pub fn top_k_by<T, K, F>(items: &[T], k: usize, key: F) -> Vec<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    if k == 0 {
        return Vec::new();
    }

    // Min-heap on (key, later-index-first): the root is the entry to evict.
    let mut heap: BinaryHeap<Reverse<(K, Reverse<usize>)>> = BinaryHeap::with_capacity(k + 1);
    for (index, item) in items.iter().enumerate() {
        heap.push(Reverse((key(item), Reverse(index))));
        if heap.len() > k {
            heap.pop();
        }
    }

    let mut selected: Vec<(K, usize)> = heap
        .into_iter()
        .map(|Reverse((key, Reverse(index)))| (key, index))
        .collect();
    selected.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    selected.into_iter().map(|(_, index)| &items[index]).collect()
}

/// The `k` highest-paid employees, salary descending, ties in snapshot order.
pub fn select_top_k(records: &[Employee], k: usize) -> Vec<Employee> {
    top_k_by(records, k, |e| e.salary).into_iter().cloned().collect()
}
