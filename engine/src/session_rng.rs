use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws the bots make.
///
/// Every strategy branch is driven through this trait so a session can be
/// replayed from its seed and tests can script exact outcomes.
pub trait RandomSource {
    /// Uniform value in `1..=10`.
    fn roll_d10(&mut self) -> u32;

    /// Fair coin flip.
    fn coin(&mut self) -> bool;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
}

#[derive(Debug, Clone)]
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SessionRng {
    fn roll_d10(&mut self) -> u32 {
        self.rng.random_range(1..=10)
    }

    fn coin(&mut self) -> bool {
        self.rng.random()
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn roll_d10(&mut self) -> u32 {
        (**self).roll_d10()
    }

    fn coin(&mut self) -> bool {
        (**self).coin()
    }

    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SessionRng::new(7);
        let mut b = SessionRng::new(7);

        let rolls_a: Vec<u32> = (0..32).map(|_| a.roll_d10()).collect();
        let rolls_b: Vec<u32> = (0..32).map(|_| b.roll_d10()).collect();

        assert_eq!(rolls_a, rolls_b);
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_roll_d10_stays_in_range() {
        let mut rng = SessionRng::new(12345);

        for _ in 0..1000 {
            let roll = rng.roll_d10();
            assert!((1..=10).contains(&roll));
        }
    }

    #[test]
    fn test_index_stays_below_len() {
        let mut rng = SessionRng::new(99);

        for len in 1..10 {
            for _ in 0..50 {
                assert!(rng.index(len) < len);
            }
        }
    }
}
