// src/longitudinal/mod.rs

pub mod cruise;
pub mod envelope;
pub mod follow;
pub mod profiles;

pub use cruise::{
    select_cruise_target, AdvisorToggles, CruiseArbitrationState, CruiseRequest,
    CruiseTargetArbiter,
};
pub use envelope::{select_envelope, AccelEnvelope, EnvelopeRequest};
pub use follow::{
    adapt_follow_values, base_tier, FollowContext, FollowGapAdapter, FollowGapState, FollowInputs,
    FollowUpdate, FollowValues,
};
pub use profiles::AccelCurve;
