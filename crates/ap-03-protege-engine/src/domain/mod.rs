//! Pure dual-track domain logic

pub mod benefits;
pub mod compute;

pub use benefits::{
    benefit_applies, benefit_value, CIAP_CREDIT_FACTOR, DIFAL_CREDIT_FACTOR,
};
pub use compute::{compute, track2_applies, LABEL_PROTEGE_15, LABEL_PROTEGE_2};
