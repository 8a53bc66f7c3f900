use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Upper bound for the sum of planned percentages in one portfolio
pub const MAX_TOTAL_PERCENTAGE: Decimal = dec!(100);

/// Relative band (percent of planned amount) inside which a row counts as balanced
pub const DEFAULT_DEVIATION_THRESHOLD_PERCENT: Decimal = dec!(5);

/// Tolerance (percentage points) used when checking that planned percentages add up to 100
pub const DEFAULT_VALIDATION_TOLERANCE_PERCENT: Decimal = dec!(1);

/// Default base currency for new installs
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Maximum number of undo steps kept per portfolio
pub const MAX_HISTORY_ENTRIES: usize = 100;
