// ---------------------------------------------------------------------------
// BausError: configuration and input errors that abort a simulation step
// ---------------------------------------------------------------------------

use std::fmt;

use crate::tables::{BuildingId, BuildingType, ParcelId, Use};

/// Errors raised by the feasibility, capacity, development and allocation
/// components.
///
/// Only malformed input or configuration produces an error. Degenerate but
/// valid states (zero profit, no vacant slots, parcels without units) are
/// resolved to sentinels by the components themselves and never surface here.
#[derive(Debug, Clone, PartialEq)]
pub enum BausError {
    /// A parcel carries a negative or non-finite zoning limit.
    InvalidZoning { parcel: ParcelId, reason: String },
    /// Area per employee for a building type is zero, negative or not finite.
    InvalidAreaPerEmployee {
        building_type: BuildingType,
        value: f64,
    },
    /// Non-residential space exists for a building type with no area per employee.
    MissingAreaPerEmployee(BuildingType),
    /// A scalar parameter is outside its valid range.
    InvalidParameter { name: &'static str, value: f64 },
    /// Two rows of the same table share an identifier.
    DuplicateId { table: &'static str, id: u64 },
    /// A building references a parcel that is not in the parcel table.
    UnknownParcel {
        building: BuildingId,
        parcel: ParcelId,
    },
    /// A rent source quoted a negative or non-finite rent.
    InvalidRent { parcel: ParcelId, use_: Use, value: f64 },
    /// Building type code not recognised.
    UnknownBuildingType(String),
    /// Parallel input slices disagree in length.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A probability or weight is negative or not finite.
    InvalidProbability { index: usize, value: f64 },
    /// A location choice model has no coefficients for a segment.
    MissingCoefficients { model: String, segment: String },
    /// A coefficient vector does not match the model's feature count.
    CoefficientCount {
        model: String,
        expected: usize,
        found: usize,
    },
    /// Parameter JSON could not be parsed.
    Config(String),
    /// A binary snapshot could not be decoded.
    Decode(String),
}

impl fmt::Display for BausError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BausError::InvalidZoning { parcel, reason } => {
                write!(f, "Invalid zoning on parcel {parcel}: {reason}")
            }
            BausError::InvalidAreaPerEmployee {
                building_type,
                value,
            } => write!(
                f,
                "Area per employee for {} must be positive, got {value}",
                building_type.code()
            ),
            BausError::MissingAreaPerEmployee(building_type) => write!(
                f,
                "No area per employee configured for building type {}",
                building_type.code()
            ),
            BausError::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter {name}: {value}")
            }
            BausError::DuplicateId { table, id } => {
                write!(f, "Duplicate id {id} in {table} table")
            }
            BausError::UnknownParcel { building, parcel } => {
                write!(f, "Building {building} references unknown parcel {parcel}")
            }
            BausError::InvalidRent { parcel, use_, value } => {
                write!(f, "Invalid {use_:?} rent on parcel {parcel}: {value}")
            }
            BausError::UnknownBuildingType(code) => write!(f, "Unknown building type: {code}"),
            BausError::LengthMismatch {
                what,
                expected,
                found,
            } => write!(f, "Length mismatch for {what}: expected {expected}, found {found}"),
            BausError::InvalidProbability { index, value } => {
                write!(f, "Invalid probability at index {index}: {value}")
            }
            BausError::MissingCoefficients { model, segment } => {
                write!(f, "Model {model} has no coefficients for segment {segment}")
            }
            BausError::CoefficientCount {
                model,
                expected,
                found,
            } => write!(
                f,
                "Model {model} expects {expected} coefficients per segment, found {found}"
            ),
            BausError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BausError::Decode(msg) => write!(f, "Decoding error: {msg}"),
        }
    }
}

impl std::error::Error for BausError {}

impl From<serde_json::Error> for BausError {
    fn from(e: serde_json::Error) -> Self {
        BausError::Config(e.to_string())
    }
}

impl From<bitcode::Error> for BausError {
    fn from(e: bitcode::Error) -> Self {
        BausError::Decode(e.to_string())
    }
}
