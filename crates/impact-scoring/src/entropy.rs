//! Injectable randomness for the real-time engine
//!
//! The real-time scorer adds uniform jitter so repeated refreshes do not
//! render a visually static dashboard. Randomness enters through this
//! seam only: production call sites pass [`SystemEntropy`], tests pin
//! [`FixedEntropy`] and assert exact scores. The CME simulation engine
//! takes no entropy at all.

use rand::Rng;

/// A source of uniform samples in [0, 1).
pub trait EntropySource {
    fn unit(&mut self) -> f64;
}

/// Thread-local OS-seeded RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn unit(&mut self) -> f64 {
        rand::thread_rng().gen()
    }
}

/// Always returns the wrapped value. Callers must keep it in [0, 1).
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub f64);

impl EntropySource for FixedEntropy {
    fn unit(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_entropy_in_unit_interval() {
        let mut entropy = SystemEntropy;
        for _ in 0..1000 {
            let sample = entropy.unit();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn test_fixed_entropy_is_constant() {
        let mut entropy = FixedEntropy(0.25);
        assert_eq!(entropy.unit(), 0.25);
        assert_eq!(entropy.unit(), 0.25);
    }
}
