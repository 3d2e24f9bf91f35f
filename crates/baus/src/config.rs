/// Square feet in one acre.
pub const SQFT_PER_ACRE: f64 = 43_560.0;

/// Serialized form of an unplaced agent's building reference.
pub const UNPLACED_SENTINEL: i64 = -1;

/// Alternatives drawn per chooser when sampling for estimation.
pub const DEFAULT_ESTIMATION_SAMPLE_SIZE: usize = 100;

/// Year built recorded when the year is unknown; never counts as historic.
pub const UNKNOWN_YEAR_BUILT: u32 = 0;
