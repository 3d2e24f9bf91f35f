//! Identifier newtypes for the region tables.

use std::fmt;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            Encode,
            Decode,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Parcel identifier.
    ParcelId(u64)
);
id_type!(
    /// Building identifier. New buildings receive ids above the inventory maximum.
    BuildingId(u64)
);
id_type!(
    /// Geographic zone (TAZ or jurisdiction) used for partitioning.
    ZoneId(u32)
);
id_type!(
    /// Household or job identifier.
    AgentId(u64)
);

/// Serde adapter writing an unplaced building reference as `-1`.
pub mod building_ref {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::BuildingId;
    use crate::config::UNPLACED_SENTINEL;

    pub fn serialize<S: Serializer>(value: &Option<BuildingId>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => s.serialize_i64(id.0 as i64),
            None => s.serialize_i64(UNPLACED_SENTINEL),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BuildingId>, D::Error> {
        let raw = Option::<i64>::deserialize(d)?;
        Ok(match raw {
            Some(v) if v >= 0 => Some(BuildingId(v as u64)),
            _ => None,
        })
    }
}
