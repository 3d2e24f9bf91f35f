use serde::Serialize;

use crate::tables::{BuildingId, ParcelId};

/// Which kind of space a developer run builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DemandKind {
    /// Residential units against households.
    Residential,
    /// Job spaces against jobs.
    NonResidential,
}

impl DemandKind {
    pub fn label(self) -> &'static str {
        match self {
            DemandKind::Residential => "residential",
            DemandKind::NonResidential => "non-residential",
        }
    }
}

/// What one developer run did to the building inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentOutcome {
    pub kind: DemandKind,
    pub year: u32,
    /// Units (or job spaces) the region needed to reach target vacancy.
    pub target: u64,
    /// Parcels with a positive-profit form that could have developed.
    pub candidates: usize,
    /// Developed parcels, in draw order.
    pub selected_parcels: Vec<ParcelId>,
    pub new_buildings: Vec<BuildingId>,
    /// Net new units (or job spaces) counted against the target.
    pub net_added: u64,
    pub residential_units_added: u64,
    pub job_spaces_added: u64,
    pub deed_restricted_units_added: u64,
}

impl DevelopmentOutcome {
    pub fn empty(kind: DemandKind, year: u32, target: u64) -> Self {
        Self {
            kind,
            year,
            target,
            candidates: 0,
            selected_parcels: Vec::new(),
            new_buildings: Vec::new(),
            net_added: 0,
            residential_units_added: 0,
            job_spaces_added: 0,
            deed_restricted_units_added: 0,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.new_buildings.is_empty()
    }
}
