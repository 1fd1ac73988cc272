//! Health metrics calculations module
//!
//! Provides the closed-form formulas behind the dashboard and the AI report:
//! BMI, BMR, TDEE, ideal weight range, calorie status and macro energy.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Cheap**: O(1) arithmetic, safe to run on every keystroke
//! 3. **Caller validates**: Non-positive height or weight yields a
//!    meaningless value, not an error; see [`crate::validation`]

use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calorie gap (kcal) under which intake counts as on target
pub const ON_TARGET_BAND_KCAL: f64 = 150.0;

/// Energy per gram of protein (kcal)
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Energy per gram of carbohydrate (kcal)
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Energy per gram of fat (kcal)
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Macro sum vs stated calories difference (kcal) worth flagging
pub const MACRO_DISCREPANCY_KCAL: f64 = 200.0;

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Profile Enums Used By Formulas
// ============================================================================

/// Gender as used by the physiological formulas
///
/// Mifflin-St Jeor, Robinson and Devine only define these two branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Twice-daily training or physical job plus training
    Athlete,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::Athlete,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Athlete => 1.9,
        }
    }

    /// Parse a label, falling back to `Sedentary` for anything unknown
    pub fn parse_lossy(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Athlete => "athlete",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Hard exercise 6-7 days/week",
            ActivityLevel::Athlete => "Very hard training or physical job",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" => Ok(ActivityLevel::Moderate),
            "active" | "very_active" => Ok(ActivityLevel::Active),
            "athlete" | "extra_active" => Ok(ActivityLevel::Athlete),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// Display color associated with a BMI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Blue,
    Green,
    Yellow,
    Red,
}

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the BMI range for this category, upper bound exclusive
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            BmiCategory::Underweight => ColorTag::Blue,
            BmiCategory::Normal => ColorTag::Green,
            BmiCategory::Overweight => ColorTag::Yellow,
            BmiCategory::Obese => ColorTag::Red,
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calculate BMI from weight and height, rounded to one decimal
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round1(weight_kg / (height_m * height_m))
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Calculate Total Daily Energy Expenditure, rounded to whole kcal
///
/// TDEE = BMR × Activity Multiplier
pub fn tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    (bmr * activity_level.multiplier()).round()
}

// ============================================================================
// Ideal Weight Calculations
// ============================================================================

/// Ideal body weight range (kg) spanning the Robinson and Devine estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightRange {
    pub min: f64,
    pub max: f64,
}

impl IdealWeightRange {
    pub fn contains(&self, weight_kg: f64) -> bool {
        weight_kg >= self.min && weight_kg <= self.max
    }
}

/// Robinson (1983) estimate in kg
pub fn robinson_weight(height_cm: f64, gender: Gender) -> f64 {
    let over = inches_over_five_feet(height_cm);
    match gender {
        Gender::Male => 52.0 + 1.9 * over,
        Gender::Female => 49.0 + 1.7 * over,
    }
}

/// Devine (1974) estimate in kg
pub fn devine_weight(height_cm: f64, gender: Gender) -> f64 {
    let over = inches_over_five_feet(height_cm);
    match gender {
        Gender::Male => 50.0 + 2.3 * over,
        Gender::Female => 45.5 + 2.3 * over,
    }
}

fn inches_over_five_feet(height_cm: f64) -> f64 {
    (height_cm / 2.54 - 60.0).max(0.0)
}

/// Calculate the ideal weight range, each bound rounded to one decimal
pub fn ideal_weight_range(height_cm: f64, gender: Gender) -> IdealWeightRange {
    let robinson = robinson_weight(height_cm, gender);
    let devine = devine_weight(height_cm, gender);
    IdealWeightRange {
        min: round1(robinson.min(devine)),
        max: round1(robinson.max(devine)),
    }
}

/// Difference from the top of the ideal range (positive = above)
pub fn weight_difference_kg(weight_kg: f64, range: &IdealWeightRange) -> f64 {
    round1(weight_kg - range.max)
}

/// Describe a weight difference the way the dashboard shows it
pub fn describe_weight_difference(diff_kg: f64) -> String {
    if diff_kg > 0.0 {
        format!("{:.1}kg above ideal", diff_kg)
    } else if diff_kg < 0.0 {
        format!("{:.1}kg below ideal", diff_kg.abs())
    } else {
        "At ideal weight".to_string()
    }
}

// ============================================================================
// Calorie Status
// ============================================================================

/// Intake compared with TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalorieStatus {
    Deficit,
    Surplus,
    #[serde(rename = "On Target")]
    OnTarget,
}

impl CalorieStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CalorieStatus::Deficit => "Deficit",
            CalorieStatus::Surplus => "Surplus",
            CalorieStatus::OnTarget => "On Target",
        }
    }
}

impl fmt::Display for CalorieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calorie status with the signed gap (intake - TDEE)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieAssessment {
    pub status: CalorieStatus,
    pub gap: f64,
}

/// Compare daily intake against TDEE
pub fn calorie_status(intake_kcal: f64, tdee: f64) -> CalorieAssessment {
    let gap = intake_kcal - tdee;
    let status = if gap.abs() < ON_TARGET_BAND_KCAL {
        CalorieStatus::OnTarget
    } else if gap < 0.0 {
        CalorieStatus::Deficit
    } else {
        CalorieStatus::Surplus
    };
    CalorieAssessment { status, gap }
}

// ============================================================================
// Macro Energy
// ============================================================================

/// Energy contributed by each macronutrient (kcal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub protein_kcal: f64,
    pub carbs_kcal: f64,
    pub fats_kcal: f64,
}

impl MacroBreakdown {
    pub fn total_kcal(&self) -> f64 {
        self.protein_kcal + self.carbs_kcal + self.fats_kcal
    }

    /// Percentage split (protein, carbs, fats); zeros when there is no energy
    pub fn percentages(&self) -> (f64, f64, f64) {
        let total = self.total_kcal();
        if total <= 0.0 {
            return (0.0, 0.0, 0.0);
        }
        (
            round1(self.protein_kcal / total * 100.0),
            round1(self.carbs_kcal / total * 100.0),
            round1(self.fats_kcal / total * 100.0),
        )
    }
}

/// Convert macro grams to energy using 4/4/9 kcal per gram
pub fn macro_calories(protein_g: f64, carbs_g: f64, fats_g: f64) -> MacroBreakdown {
    MacroBreakdown {
        protein_kcal: protein_g * KCAL_PER_G_PROTEIN,
        carbs_kcal: carbs_g * KCAL_PER_G_CARBS,
        fats_kcal: fats_g * KCAL_PER_G_FAT,
    }
}

/// Absolute kcal mismatch between macros and stated calories, if above threshold
pub fn macro_discrepancy(breakdown: &MacroBreakdown, stated_kcal: f64) -> Option<f64> {
    let delta = (breakdown.total_kcal() - stated_kcal).abs();
    (delta > MACRO_DISCREPANCY_KCAL).then_some(delta)
}

// ============================================================================
// Derived Metrics
// ============================================================================

/// Everything the dashboard derives locally from a profile
///
/// Recomputed on every render; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmi_color: ColorTag,
    pub bmr: f64,
    pub tdee: f64,
    pub ideal_weight: IdealWeightRange,
    pub weight_difference_kg: f64,
    pub calories: CalorieAssessment,
    pub macros: MacroBreakdown,
}

impl DerivedMetrics {
    pub fn from_profile(profile: &Profile) -> Self {
        let bmi_value = bmi(profile.weight_kg(), profile.height_cm());
        let category = classify_bmi(bmi_value);
        let bmr_value = bmr(
            profile.weight_kg(),
            profile.height_cm(),
            profile.age(),
            profile.gender(),
        );
        let tdee_value = tdee(bmr_value, profile.activity_level());
        let ideal = ideal_weight_range(profile.height_cm(), profile.gender());

        Self {
            bmi: bmi_value,
            bmi_category: category,
            bmi_color: category.color(),
            bmr: bmr_value,
            tdee: tdee_value,
            ideal_weight: ideal,
            weight_difference_kg: weight_difference_kg(profile.weight_kg(), &ideal),
            calories: calorie_status(profile.daily_calories(), tdee_value),
            macros: macro_calories(profile.protein_g(), profile.carbs_g(), profile.fats_g()),
        }
    }
}
