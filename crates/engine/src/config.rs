// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game configuration.
use std::time::Duration;

use tablestakes_core::poker::Chips;

use crate::error::EngineError;

/// The game configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The small blind.
    pub small_blind: Chips,
    /// The big blind.
    pub big_blind: Chips,
    /// The chips each bot starts with.
    pub starting_chips: Chips,
    /// The number of bots at the table.
    pub bots: usize,
    /// The pause before a bot acts.
    pub action_delay: Duration,
    /// Seed for reproducible shuffles, entropy when not set.
    pub seed: Option<u64>,
}

impl Config {
    /// The smallest buy-in a player can sit with.
    pub fn min_buy_in(&self) -> Chips {
        self.big_blind * 2
    }

    /// Checks the big blind is not zero and not below the small blind.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.big_blind == Chips::ZERO || self.small_blind > self.big_blind {
            return Err(EngineError::InvalidBlinds {
                small: self.small_blind,
                big: self.big_blind,
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            small_blind: Chips::new(10),
            big_blind: Chips::new(20),
            starting_chips: Chips::new(1_000),
            bots: 1,
            action_delay: Duration::from_millis(600),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blinds_validation() {
        assert!(Config::default().validate().is_ok());

        let config = Config {
            small_blind: Chips::new(20),
            big_blind: Chips::new(20),
            ..Config::default()
        };
        assert!(config.validate().is_ok());

        let config = Config {
            small_blind: Chips::new(30),
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(EngineError::InvalidBlinds {
                small: Chips::new(30),
                big: Chips::new(20)
            })
        );

        let config = Config {
            small_blind: Chips::ZERO,
            big_blind: Chips::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn min_buy_in_saturates() {
        let config = Config {
            big_blind: Chips::new(u32::MAX),
            ..Config::default()
        };
        assert_eq!(config.min_buy_in(), Chips::new(u32::MAX));
    }
}
