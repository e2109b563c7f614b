//! Injectable randomness and clock used by the generator.

use chrono::{DateTime, Utc};
use rand::random_range;

/// Minimum randomness interface the generator needs.
pub trait NibbleSource {
    /// Returns a uniformly drawn value in `0..bound`. `bound` is at most 16.
    fn below(&mut self, bound: u8) -> u8;
}

/// Thread-local `rand` generator. The default source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNibbles;

impl NibbleSource for ThreadNibbles {
    #[inline]
    fn below(&mut self, bound: u8) -> u8 {
        random_range(0..bound)
    }
}

/// Adapter that implements [`NibbleSource`] for any [`rand::Rng`], e.g. a
/// seeded `StdRng` for reproducible output.
#[derive(Debug, Clone, Default)]
pub struct RngNibbles<R>(pub R);

impl<R: rand::Rng> NibbleSource for RngNibbles<R> {
    #[inline]
    fn below(&mut self, bound: u8) -> u8 {
        // Bounds used here are powers of two, so the modulo is unbiased.
        (self.0.next_u32() % u32::from(bound)) as u8
    }
}

impl<T: NibbleSource + ?Sized> NibbleSource for &mut T {
    #[inline]
    fn below(&mut self, bound: u8) -> u8 {
        (**self).below(bound)
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_thread_nibbles_in_range() {
        let mut src = ThreadNibbles;
        for _ in 0..256 {
            assert!(src.below(16) < 16);
            assert!(src.below(4) < 4);
        }
    }

    #[test]
    fn test_rng_adapter_is_deterministic() {
        let mut a = RngNibbles(StdRng::seed_from_u64(9));
        let mut b = RngNibbles(StdRng::seed_from_u64(9));
        let left: Vec<u8> = (0..64).map(|_| a.below(16)).collect();
        let right: Vec<u8> = (0..64).map(|_| b.below(16)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|n| *n < 16));
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn draw<S: NibbleSource>(mut src: S) -> u8 {
            src.below(4)
        }

        let mut inner = RngNibbles(StdRng::seed_from_u64(1));
        assert!(draw(&mut inner) < 4);
        assert!(draw(&mut inner) < 4);
    }

    #[test]
    fn test_fixed_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(FixedClock(at).now(), at);
        assert!(SystemClock.now() > at);
    }
}
