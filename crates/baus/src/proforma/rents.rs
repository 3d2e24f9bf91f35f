//! Achievable rents supplied by the hedonic price models.

use std::collections::HashMap;

use crate::tables::{Parcel, ParcelId, Use, ZoneId};

/// A market quote for one use on one parcel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RentQuote {
    /// Yearly rent per square foot.
    Rent(f64),
    /// Sale price per square foot.
    Price(f64),
}

impl RentQuote {
    /// Yearly rent per square foot; prices are converted at `cap_rate`.
    pub fn yearly_rent(self, cap_rate: f64) -> f64 {
        match self {
            RentQuote::Rent(r) => r,
            RentQuote::Price(p) => p * cap_rate,
        }
    }
}

/// Source of achievable rents for the pro forma.
pub trait RentSource {
    fn quote(&self, parcel: &Parcel, use_: Use) -> Option<RentQuote>;
}

impl<F> RentSource for F
where
    F: Fn(&Parcel, Use) -> Option<RentQuote>,
{
    fn quote(&self, parcel: &Parcel, use_: Use) -> Option<RentQuote> {
        self(parcel, use_)
    }
}

/// Rents keyed by parcel, falling back to zone averages.
#[derive(Debug, Clone, Default)]
pub struct RentTable {
    by_parcel: HashMap<(ParcelId, Use), RentQuote>,
    by_zone: HashMap<(ZoneId, Use), RentQuote>,
}

impl RentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parcel(&mut self, parcel: ParcelId, use_: Use, quote: RentQuote) -> &mut Self {
        self.by_parcel.insert((parcel, use_), quote);
        self
    }

    pub fn set_zone(&mut self, zone: ZoneId, use_: Use, quote: RentQuote) -> &mut Self {
        self.by_zone.insert((zone, use_), quote);
        self
    }
}

impl RentSource for RentTable {
    fn quote(&self, parcel: &Parcel, use_: Use) -> Option<RentQuote> {
        self.by_parcel
            .get(&(parcel.id, use_))
            .or_else(|| self.by_zone.get(&(parcel.zone_id, use_)))
            .copied()
    }
}
