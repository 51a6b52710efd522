//! Logical settlement clock
//!
//! Epochs advance only through explicit reset operations, never wall time.
//! The engine holds the single mutable reference; all other components read
//! the counter through it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochClock {
    epoch: u64,
}

impl EpochClock {
    /// Starts at epoch 1 so freshly minted profiles (last reset 0) can
    /// settle immediately.
    pub fn new() -> Self {
        Self { epoch: 1 }
    }

    pub fn current(&self) -> u64 {
        self.epoch
    }

    pub fn advance(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}

impl Default for EpochClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_advance() {
        let mut clock = EpochClock::new();
        assert_eq!(clock.current(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.current(), 2);
    }
}
