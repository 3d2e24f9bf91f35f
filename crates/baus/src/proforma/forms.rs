use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::tables::{BuildingType, Use};

/// Candidate building forms evaluated on every parcel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub enum BuildingForm {
    Residential,
    Office,
    Retail,
    Industrial,
    /// Apartments over ground-floor retail.
    MixedResidential,
    /// Office with a residential share.
    MixedOffice,
}

impl BuildingForm {
    pub const ALL: [BuildingForm; 6] = [
        BuildingForm::Residential,
        BuildingForm::Office,
        BuildingForm::Retail,
        BuildingForm::Industrial,
        BuildingForm::MixedResidential,
        BuildingForm::MixedOffice,
    ];

    /// Floor-area share of each use; shares sum to one.
    pub fn use_mix(self) -> &'static [(Use, f64)] {
        match self {
            BuildingForm::Residential => &[(Use::Residential, 1.0)],
            BuildingForm::Office => &[(Use::Office, 1.0)],
            BuildingForm::Retail => &[(Use::Retail, 1.0)],
            BuildingForm::Industrial => &[(Use::Industrial, 1.0)],
            BuildingForm::MixedResidential => &[(Use::Residential, 0.9), (Use::Retail, 0.1)],
            BuildingForm::MixedOffice => &[(Use::Office, 0.7), (Use::Residential, 0.3)],
        }
    }

    pub fn residential_share(self) -> f64 {
        self.use_mix()
            .iter()
            .filter(|(u, _)| u.is_residential())
            .map(|(_, s)| s)
            .sum()
    }

    /// Forms built to house households rather than jobs.
    pub fn is_residential(self) -> bool {
        matches!(
            self,
            BuildingForm::Residential | BuildingForm::MixedResidential
        )
    }

    pub fn building_type(self) -> BuildingType {
        match self {
            BuildingForm::Residential => BuildingType::MultiFamily,
            BuildingForm::Office => BuildingType::Office,
            BuildingForm::Retail => BuildingType::Retail,
            BuildingForm::Industrial => BuildingType::Industrial,
            BuildingForm::MixedResidential => BuildingType::MixedResidential,
            BuildingForm::MixedOffice => BuildingType::MixedOffice,
        }
    }
}
