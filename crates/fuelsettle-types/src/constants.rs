//! System-wide constants for the FuelSettle settlement engine.

/// Default settlement currency symbol.
pub const DEFAULT_CURRENCY: &str = "CAM";

/// Largest quantity accepted for a single order, in litres.
pub const MAX_QUANTITY_LITRES: u64 = 10_000_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "FuelSettle";
