//! Discrete location choice.
//!
//! A [`LocationChoiceModel`] scores buildings for a chooser segment with a
//! linear utility `beta . x` and turns utilities into multinomial logit
//! probabilities. Coefficients are fitted elsewhere; only simulation-time
//! prediction lives here. Models are configured by a [`LocationChoiceSpec`]
//! and the allocation engine consumes their probabilities as slot weights.

mod mnl;
mod types;


pub use mnl::{mnl_probabilities, LocationChoiceModel};
pub use types::{
    AlternativeAttribute, Feature, LocationChoiceSpec, SegmentCoefficients, SegmentKey,
    Segmentation, Transform,
};
