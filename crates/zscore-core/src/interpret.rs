//! # Clinical Interpretation
//!
//! Report-facing categories for a deficit-normalised Z-score.
//!
//! Bounds are inclusive on the lower side (`z >= -0.5` is still normal),
//! unlike the display bands in [`crate::classify`].

use crate::primitives::{COLOR_CRITICAL, COLOR_HIGH, COLOR_LOW, COLOR_MINIMAL, COLOR_MODERATE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalCategory {
    Normal,
    Borderline,
    Mild,
    Moderate,
    Severe,
}

impl ClinicalCategory {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            ClinicalCategory::Normal => "Normal",
            ClinicalCategory::Borderline => "Limítrofe",
            ClinicalCategory::Mild => "Déficit Leve",
            ClinicalCategory::Moderate => "Déficit Moderado",
            ClinicalCategory::Severe => "Déficit Severo",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            ClinicalCategory::Normal => COLOR_MINIMAL,
            ClinicalCategory::Borderline => COLOR_LOW,
            ClinicalCategory::Mild => COLOR_MODERATE,
            ClinicalCategory::Moderate => COLOR_HIGH,
            ClinicalCategory::Severe => COLOR_CRITICAL,
        }
    }
}

/// Category for a normalised score. NaN is `Severe`.
#[must_use]
pub fn interpret(z_score: f64) -> ClinicalCategory {
    if z_score >= -0.5 {
        ClinicalCategory::Normal
    } else if z_score >= -1.0 {
        ClinicalCategory::Borderline
    } else if z_score >= -1.5 {
        ClinicalCategory::Mild
    } else if z_score >= -2.0 {
        ClinicalCategory::Moderate
    } else {
        ClinicalCategory::Severe
    }
}
