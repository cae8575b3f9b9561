use std::collections::HashSet;

use chrono::Utc;

/// Hands out stop ids that are not already in use on a trip.
///
/// `taken` holds every id present on the trip, including ids handed out
/// earlier in the same normalize pass.
pub trait StopIdAllocator {
    fn allocate(&mut self, taken: &HashSet<i64>) -> i64;
}

impl<F> StopIdAllocator for F
where
    F: FnMut(&HashSet<i64>) -> i64,
{
    fn allocate(&mut self, taken: &HashSet<i64>) -> i64 {
        self(taken)
    }
}

/// Epoch milliseconds, never repeating within this allocator and stepped
/// past any id already on the trip.
#[derive(Debug, Default)]
pub struct TimestampIdAllocator {
    last: i64,
}

impl StopIdAllocator for TimestampIdAllocator {
    fn allocate(&mut self, taken: &HashSet<i64>) -> i64 {
        let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
        while taken.contains(&candidate) {
            candidate += 1;
        }
        self.last = candidate;
        candidate
    }
}

/// One past the largest id on the trip, starting from 1. When the largest id
/// is `i64::MAX`, the smallest free positive id is used instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialIdAllocator;

impl StopIdAllocator for SequentialIdAllocator {
    fn allocate(&mut self, taken: &HashSet<i64>) -> i64 {
        match taken.iter().max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| (1..).find(|id| !taken.contains(id)).unwrap_or(1)),
        }
    }
}
