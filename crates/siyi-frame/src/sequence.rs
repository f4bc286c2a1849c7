use std::sync::atomic::{AtomicU16, Ordering};

/// Monotonic 16-bit frame sequence counter.
///
/// Each call to [`next`](Self::next) returns the current value and advances
/// the counter, wrapping from 65535 back to 0. Safe to share between threads;
/// concurrent callers each observe a distinct value until the counter wraps.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    next: AtomicU16,
}

impl SequenceCounter {
    /// Counter starting at 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Counter whose first value is `start`.
    pub fn starting_at(start: u16) -> Self {
        Self {
            next: AtomicU16::new(start),
        }
    }

    /// Take the current value and advance.
    pub fn next(&self) -> u16 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The value the next call to [`next`](Self::next) will return.
    pub fn peek(&self) -> u16 {
        self.next.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_at_zero_and_increments() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.peek(), 2);
    }

    #[test]
    fn wraps_exactly_once_over_full_cycle() {
        let counter = SequenceCounter::new();
        let mut previous = counter.next();
        let mut wraps = 0;
        for _ in 1..=u16::MAX as u32 + 1 {
            let current = counter.next();
            if current < previous {
                assert_eq!((previous, current), (u16::MAX, 0));
                wraps += 1;
            } else {
                assert_eq!(current, previous + 1);
            }
            previous = current;
        }
        assert_eq!(wraps, 1);
    }

    #[test]
    fn wraps_from_max_to_zero() {
        let counter = SequenceCounter::starting_at(u16::MAX);
        assert_eq!(counter.next(), u16::MAX);
        assert_eq!(counter.next(), 0);
    }

    #[test]
    fn concurrent_callers_get_distinct_values() {
        let counter = Arc::new(SequenceCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || (0..1000).map(|_| counter.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "duplicate sequence {value}");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
