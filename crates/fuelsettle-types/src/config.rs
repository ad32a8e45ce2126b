//! Configuration types for the FuelSettle settlement engine.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Validation limits applied at order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLimits {
    /// Largest quantity accepted for a single order, in litres.
    pub max_quantity_litres: u64,
}

impl Default for OrderLimits {
    fn default() -> Self {
        Self {
            max_quantity_litres: constants::MAX_QUANTITY_LITRES,
        }
    }
}

/// Configuration for a settlement engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Settlement currency symbol (display only; amounts are denominated
    /// in this currency's smallest unit).
    pub currency: String,
    /// Order creation limits.
    pub limits: OrderLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: constants::DEFAULT_CURRENCY.to_string(),
            limits: OrderLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.currency, constants::DEFAULT_CURRENCY);
        assert_eq!(
            config.limits.max_quantity_litres,
            constants::MAX_QUANTITY_LITRES
        );
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.currency, config.currency);
        assert_eq!(
            back.limits.max_quantity_litres,
            config.limits.max_quantity_litres
        );
    }
}
