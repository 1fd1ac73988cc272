//! Goal targets and safety rules
//!
//! The same rules the AI instructions spell out, computed locally so the UI
//! can warn without waiting for a report.

use crate::health_metrics::DerivedMetrics;
use crate::profile::{Goal, Occupation, Profile};
use serde::{Deserialize, Serialize};

/// Calorie band (kcal either side of TDEE) treated as maintenance by the
/// AI instructions. Narrower than [`crate::health_metrics::ON_TARGET_BAND_KCAL`].
pub const MAINTENANCE_BAND_KCAL: f64 = 100.0;

pub const LOW_INTAKE_KCAL: f64 = 1200.0;
pub const HIGH_INTAKE_KCAL: f64 = 4500.0;
pub const PHYSICIAN_BMI: f64 = 35.0;
pub const MIN_RECOVERY_SLEEP_HOURS: f64 = 5.0;

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Goal {
    /// Calorie offset from TDEE recommended for this goal
    pub fn calorie_offset(&self) -> Band {
        match self {
            Goal::FatLoss => Band { min: -500.0, max: -300.0 },
            Goal::MuscleGain => Band { min: 200.0, max: 400.0 },
            Goal::Maintenance => Band {
                min: -MAINTENANCE_BAND_KCAL,
                max: MAINTENANCE_BAND_KCAL,
            },
            Goal::Performance => Band { min: 0.0, max: 200.0 },
        }
    }

    /// Protein target in g per kg of body weight
    pub fn protein_per_kg(&self) -> Band {
        match self {
            Goal::FatLoss => Band { min: 1.6, max: 2.2 },
            Goal::MuscleGain => Band { min: 1.8, max: 2.4 },
            Goal::Maintenance | Goal::Performance => Band { min: 1.2, max: 2.0 },
        }
    }
}

/// Absolute calorie target for a goal given TDEE
pub fn calorie_target(goal: Goal, tdee: f64) -> Band {
    let offset = goal.calorie_offset();
    Band {
        min: tdee + offset.min,
        max: tdee + offset.max,
    }
}

/// Absolute daily protein target in grams
pub fn protein_target_g(goal: Goal, weight_kg: f64) -> Band {
    let per_kg = goal.protein_per_kg();
    Band {
        min: (per_kg.min * weight_kg).round(),
        max: (per_kg.max * weight_kg).round(),
    }
}

/// Whether current intake lines up with the stated goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalAlignment {
    pub calories_aligned: bool,
    pub protein_aligned: bool,
    pub calorie_target: Band,
    pub protein_target_g: Band,
}

impl GoalAlignment {
    pub fn on_track(&self) -> bool {
        self.calories_aligned && self.protein_aligned
    }
}

pub fn goal_alignment(profile: &Profile, metrics: &DerivedMetrics) -> GoalAlignment {
    let calorie_band = calorie_target(profile.goal(), metrics.tdee);
    let protein_band = protein_target_g(profile.goal(), profile.weight_kg());
    GoalAlignment {
        calories_aligned: calorie_band.contains(profile.daily_calories()),
        protein_aligned: protein_band.contains(profile.protein_g()),
        calorie_target: calorie_band,
        protein_target_g: protein_band,
    }
}

/// A condition the UI should surface before anything else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SafetyFlag {
    /// BMI above 35: recommend seeing a doctor
    SeePhysician { bmi: f64 },
    LowIntake { calories: f64 },
    HighIntake { calories: f64 },
    /// Under five hours of sleep: recovery comes first
    PrioritizeRecovery { sleep_hours: f64 },
    /// Desk job: sitting risk, NEAT and a 7000-9000 step target
    SittingRisk { step_target: Band },
}

impl SafetyFlag {
    pub fn message(&self) -> String {
        match self {
            SafetyFlag::SeePhysician { bmi } => {
                format!("BMI {:.1} is above 35. Consult a doctor before starting a new program.", bmi)
            }
            SafetyFlag::LowIntake { calories } => {
                format!("{:.0} kcal/day is below 1200 kcal. This intake is a concern.", calories)
            }
            SafetyFlag::HighIntake { calories } => {
                format!("{:.0} kcal/day is above 4500 kcal. This intake is a concern.", calories)
            }
            SafetyFlag::PrioritizeRecovery { sleep_hours } => {
                format!("{:.1} hrs of sleep is under 5 hrs. Prioritize recovery.", sleep_hours)
            }
            SafetyFlag::SittingRisk { step_target } => format!(
                "Long sitting hours carry health risks. Aim for {:.0}-{:.0} steps per day.",
                step_target.min, step_target.max
            ),
        }
    }
}

/// Collect every safety flag that applies to this profile
pub fn safety_flags(profile: &Profile, metrics: &DerivedMetrics) -> Vec<SafetyFlag> {
    let mut flags = Vec::new();

    if metrics.bmi > PHYSICIAN_BMI {
        flags.push(SafetyFlag::SeePhysician { bmi: metrics.bmi });
    }

    let calories = profile.daily_calories();
    if calories < LOW_INTAKE_KCAL {
        flags.push(SafetyFlag::LowIntake { calories });
    } else if calories > HIGH_INTAKE_KCAL {
        flags.push(SafetyFlag::HighIntake { calories });
    }

    if profile.sleep_hours() < MIN_RECOVERY_SLEEP_HOURS {
        flags.push(SafetyFlag::PrioritizeRecovery {
            sleep_hours: profile.sleep_hours(),
        });
    }

    if profile.occupation() == Occupation::Desk {
        flags.push(SafetyFlag::SittingRisk {
            step_target: Band { min: 7000.0, max: 9000.0 },
        });
    }

    flags
}
