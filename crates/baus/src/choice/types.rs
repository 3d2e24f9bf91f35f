use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ESTIMATION_SAMPLE_SIZE;
use crate::tables::{AgentKind, BuildingType};

// =============================================================================
// Segmentation
// =============================================================================

/// How choosers are split into segments sharing one coefficient vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Segmentation {
    /// Households by income quartile.
    IncomeQuartile,
    /// Jobs by sector code.
    Sector,
    #[default]
    None,
}

/// Segment a chooser belongs to under a [`Segmentation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SegmentKey {
    All,
    IncomeQuartile(u8),
    Sector(String),
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKey::All => write!(f, "all"),
            SegmentKey::IncomeQuartile(q) => write!(f, "income_quartile={q}"),
            SegmentKey::Sector(s) => write!(f, "sector={s}"),
        }
    }
}

// =============================================================================
// Features
// =============================================================================

/// Building or parcel attribute an alternative is described by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AlternativeAttribute {
    /// Always 1; pairs with an alternative-specific constant.
    Constant,
    ResidentialUnits,
    NonResidentialSqft,
    ResidentialPrice,
    NonResidentialRent,
    YearBuilt,
    ParcelAcres,
    /// 1 when the building was added by the developer model.
    IsNew,
    /// 1 when the building has the given type.
    IsType(BuildingType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transform {
    #[default]
    Identity,
    /// `ln(1 + max(x, 0))`
    Ln1p,
}

impl Transform {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Transform::Identity => x,
            Transform::Ln1p => x.max(0.0).ln_1p(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub attribute: AlternativeAttribute,
    #[serde(default)]
    pub transform: Transform,
}

impl Feature {
    pub fn new(attribute: AlternativeAttribute) -> Self {
        Self {
            attribute,
            transform: Transform::Identity,
        }
    }

    pub fn ln1p(attribute: AlternativeAttribute) -> Self {
        Self {
            attribute,
            transform: Transform::Ln1p,
        }
    }
}

// =============================================================================
// Model specification
// =============================================================================

/// Fitted coefficients for one segment, aligned with the model's features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCoefficients {
    pub segment: SegmentKey,
    pub beta: Vec<f64>,
}

fn default_sample_size() -> usize {
    DEFAULT_ESTIMATION_SAMPLE_SIZE
}

/// Configuration of one location choice model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationChoiceSpec {
    pub name: String,
    pub chooser: AgentKind,
    #[serde(default)]
    pub segmentation: Segmentation,
    pub features: Vec<Feature>,
    pub coefficients: Vec<SegmentCoefficients>,
    /// Alternatives drawn per chooser when sampling for estimation.
    #[serde(default = "default_sample_size")]
    pub estimation_sample_size: usize,
    /// Alternatives drawn at simulation time; `None` uses the full set.
    #[serde(default)]
    pub simulation_sample_size: Option<usize>,
}
