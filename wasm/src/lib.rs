//! IronTrack WASM Module
//!
//! Browser bindings for the formula library so the dashboard and the
//! onboarding preview can compute figures without a round trip.

use irontrack_shared::health_metrics::{self, ActivityLevel, Gender};
use irontrack_shared::prompt::summarize_profile;
use irontrack_shared::Profile;
use wasm_bindgen::prelude::*;

fn gender(is_male: bool) -> Gender {
    if is_male {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// BMI from weight (kg) and height (cm), one decimal; 0 for a non-positive height
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    health_metrics::bmi(weight_kg, height_cm)
}

/// "Underweight", "Normal", "Overweight" or "Obese"
#[wasm_bindgen]
pub fn bmi_category(bmi: f64) -> String {
    health_metrics::classify_bmi(bmi).label().to_string()
}

/// Mifflin-St Jeor BMR
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, is_male: bool) -> f64 {
    health_metrics::bmr(weight_kg, height_cm, age_years, gender(is_male))
}

/// TDEE for an activity label; unknown labels count as sedentary
#[wasm_bindgen]
pub fn calculate_tdee(bmr: f64, activity_level: &str) -> f64 {
    health_metrics::tdee(bmr, ActivityLevel::parse_lossy(activity_level))
}

/// `[min, max]` ideal weight in kg
#[wasm_bindgen]
pub fn ideal_weight_range(height_cm: f64, is_male: bool) -> Vec<f64> {
    let range = health_metrics::ideal_weight_range(height_cm, gender(is_male));
    vec![range.min, range.max]
}

/// "Deficit", "Surplus" or "On Target"
#[wasm_bindgen]
pub fn calorie_status(intake_kcal: f64, tdee: f64) -> String {
    health_metrics::calorie_status(intake_kcal, tdee)
        .status
        .label()
        .to_string()
}

/// `[protein, carbs, fats, total]` in kcal
#[wasm_bindgen]
pub fn macro_calories(protein_g: f64, carbs_g: f64, fats_g: f64) -> Vec<f64> {
    let m = health_metrics::macro_calories(protein_g, carbs_g, fats_g);
    vec![m.protein_kcal, m.carbs_kcal, m.fats_kcal, m.total_kcal()]
}

fn summary_from_json(profile_json: &str) -> Result<String, String> {
    let profile: Profile = serde_json::from_str(profile_json).map_err(|e| e.to_string())?;
    Ok(summarize_profile(&profile))
}

/// Validate a profile given as JSON and return its prompt summary
#[wasm_bindgen]
pub fn profile_summary(profile_json: &str) -> Result<String, JsValue> {
    summary_from_json(profile_json).map_err(|e| JsValue::from_str(&e))
}
