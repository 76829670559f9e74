#![deny(warnings)]
pub mod color;
pub mod error;
pub mod exact;
pub mod random;
pub mod simulation;
pub mod urn;

pub use color::Color;
pub use error::UrnError;
pub use exact::{exact_match_probability, match_probability_after_discard};
pub use simulation::{Estimate, TrialPlan, estimate_match_probability};
pub use urn::{CountUrn, ListUrn, Urn};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "urn-match"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "urn-match");
        assert!(!AppInfo::version().is_empty());
    }
}
