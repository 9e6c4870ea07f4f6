//! System-wide constants for the Dealvault escrow ledger.

/// Default minimum deal amount, in the asset's smallest unit.
///
/// One whole unit of a 6-decimal stablecoin.
pub const DEFAULT_MIN_AMOUNT: u128 = 1_000_000;

/// Settlement fee divisor: fee = amount / `DEFAULT_FEE_DIVISOR` (0.1%).
pub const DEFAULT_FEE_DIVISOR: u128 = 1_000;

/// Seconds after delivery before the seller may claim auto-release (72h).
pub const AUTO_RELEASE_WINDOW_SECS: u64 = 3 * 24 * 60 * 60;

/// Seconds after a dispute opens before the buyer may reclaim funds (30d).
pub const DISPUTE_TIMEOUT_SECS: u64 = 30 * 24 * 60 * 60;

/// Acceptance period offered by default to buyers (30d).
pub const DEFAULT_ACCEPTANCE_PERIOD_SECS: u64 = 30 * 24 * 60 * 60;

/// Delivery period offered by default to buyers (14d).
pub const DEFAULT_DELIVERY_PERIOD_SECS: u64 = 14 * 24 * 60 * 60;

/// Decimals of the native asset.
pub const NATIVE_DECIMALS: u32 = 18;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Dealvault";
