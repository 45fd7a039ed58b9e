/// Strategies known out of the box. More can be added through configuration.
pub const DEFAULT_STRATEGIES: [&str; 8] = [
    "spot",
    "futures",
    "holding",
    "staking",
    "ico",
    "liquidity-pool",
    "farming",
    "other",
];

/// Legacy spellings accepted on entry, mapped to their canonical strategy.
pub const STRATEGY_ALIASES: [(&str, &str); 3] = [
    ("futuros", "futures"),
    ("otros", "other"),
    ("pool de liquidez", "liquidity-pool"),
];
