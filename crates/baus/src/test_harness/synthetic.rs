//! Randomly generated regions for scale tests and benches.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tables::{AllowedUses, BuildingType, Zoning};

use super::fixtures::{building, household, job};
use super::TestRegion;

const SECTORS: [&str; 4] = ["HEALTH", "RETAIL", "MWTEMPN", "OTHER"];

impl TestRegion {
    /// A region of `parcels` parcels over `zones` zones.
    ///
    /// About two thirds of parcels carry a base-year building. Agents fill
    /// most of the stock and unplaced in-movers push demand past it, so the
    /// developer has work every year.
    pub fn synthetic(parcels: u64, zones: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut region = TestRegion::new();
        let mut next_household = 0u64;
        let mut next_job = 0u64;

        for id in 0..parcels {
            let zone = (id % zones.max(1) as u64) as u32;
            let acres = rng.gen_range(0.05..3.0);
            let housing = rng.gen_bool(0.6);
            let zoning = Zoning {
                max_dua: Some(rng.gen_range(5.0..120.0)),
                max_far: Some(rng.gen_range(0.5..6.0)),
                max_height: rng.gen_bool(0.3).then(|| rng.gen_range(24.0..160.0)),
                allowed: if housing {
                    AllowedUses {
                        residential: true,
                        retail: rng.gen_bool(0.3),
                        ..AllowedUses::NONE
                    }
                } else {
                    AllowedUses {
                        office: true,
                        retail: true,
                        industrial: rng.gen_bool(0.5),
                        ..AllowedUses::NONE
                    }
                },
                nodev: rng.gen_bool(0.05),
            };
            region = region.with_parcel(id, acres, zone, zoning);

            if !rng.gen_bool(0.66) {
                continue;
            }
            let year = rng.gen_range(1900..2020);
            let b = if housing {
                let units = rng.gen_range(1..40);
                building(id, id, BuildingType::MultiFamily, units, 0.0, year)
            } else {
                let sqft = rng.gen_range(2_000.0..60_000.0);
                building(id, id, BuildingType::Office, 0, sqft, year)
            };

            // Occupied stock plus in-movers, about 1.2 agents per slot.
            if housing {
                let occupied = b.residential_units * 9 / 10;
                for i in 0..(b.residential_units * 12 / 10) {
                    let placed = (i < occupied).then_some(b.id.0);
                    let quartile = rng.gen_range(1..=4);
                    region = region.with_household(household(next_household, placed, quartile));
                    next_household += 1;
                }
            } else {
                let spaces = (b.non_residential_sqft / 355.0) as u32;
                let occupied = spaces * 8 / 10;
                for i in 0..(spaces * 12 / 10) {
                    let placed = (i < occupied).then_some(b.id.0);
                    let sector = SECTORS[rng.gen_range(0..SECTORS.len())];
                    region = region.with_job(job(next_job, placed, sector));
                    next_job += 1;
                }
            }
            region = region.with_building(b);
        }
        region
    }
}
