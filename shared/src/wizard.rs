//! Onboarding wizard controller
//!
//! Five linear steps fill a [`ProfileDraft`]. Each step gates advancement on
//! its required fields and their ranges; the final step hands a validated
//! [`Profile`] to the caller. Nothing is persisted: dropping the wizard loses the input.

use crate::errors::ValidationError;
use crate::health_metrics::{
    bmi, classify_bmi, ideal_weight_range, macro_calories, macro_discrepancy,
    weight_difference_kg, BmiCategory, IdealWeightRange,
};
use crate::profile::{Profile, ProfileDraft};
use crate::validation::{
    digits_only, get_field_display_label, validate_age, validate_calories, validate_height_cm,
    validate_macro_grams, validate_percentage, validate_sleep_hours, validate_weight,
    validate_workout_days,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BodyStats,
    WorkLife,
    Training,
    Nutrition,
    Lifestyle,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::BodyStats,
        WizardStep::WorkLife,
        WizardStep::Training,
        WizardStep::Nutrition,
        WizardStep::Lifestyle,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::BodyStats => "Body Stats",
            WizardStep::WorkLife => "Work & Life",
            WizardStep::Training => "Training",
            WizardStep::Nutrition => "Nutrition",
            WizardStep::Lifestyle => "Lifestyle",
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    /// Fields that must be filled before leaving this step
    pub fn missing_fields(&self, draft: &ProfileDraft) -> Vec<&'static str> {
        let checks: Vec<(&str, bool)> = match self {
            WizardStep::BodyStats => vec![
                ("age", draft.age.is_some()),
                ("height", draft.height_cm.is_some()),
                ("weight", draft.weight_kg.is_some()),
            ],
            WizardStep::Training => vec![("workout_days", draft.workout_days_per_week.is_some())],
            WizardStep::Nutrition => vec![
                ("calories", draft.daily_calories.is_some()),
                ("protein", draft.protein_g.is_some()),
                ("carbs", draft.carbs_g.is_some()),
                ("fats", draft.fats_g.is_some()),
            ],
            WizardStep::WorkLife | WizardStep::Lifestyle => Vec::new(),
        };
        checks
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(field, _)| get_field_display_label(field))
            .collect()
    }

    /// Presence first, then the range of every value this step collects
    pub fn check(&self, draft: &ProfileDraft) -> Result<(), ValidationError> {
        if let Some(field) = self.missing_fields(draft).first() {
            return Err(ValidationError::missing(*field));
        }
        match self {
            WizardStep::BodyStats => {
                in_range(draft.age, "age", validate_age)?;
                in_range(draft.height_cm, "height", validate_height_cm)?;
                in_range(draft.weight_kg, "weight", validate_weight)?;
                in_range(draft.body_fat_pct, "body_fat", validate_percentage)?;
            }
            WizardStep::Training => {
                in_range(draft.workout_days_per_week, "workout_days", validate_workout_days)?;
            }
            WizardStep::Nutrition => {
                in_range(draft.daily_calories, "calories", validate_calories)?;
                in_range(draft.protein_g, "protein", validate_macro_grams)?;
                in_range(draft.carbs_g, "carbs", validate_macro_grams)?;
                in_range(draft.fats_g, "fats", validate_macro_grams)?;
            }
            WizardStep::Lifestyle => {
                in_range(draft.sleep_hours, "sleep", validate_sleep_hours)?;
            }
            WizardStep::WorkLife => {}
        }
        Ok(())
    }

    pub fn can_advance(&self, draft: &ProfileDraft) -> bool {
        self.check(draft).is_ok()
    }
}

fn in_range<T: Copy>(
    value: Option<T>,
    field: &str,
    validate: fn(T) -> Result<(), String>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => validate(v)
            .map_err(|msg| ValidationError::new(get_field_display_label(field), msg)),
        None => Ok(()),
    }
}

/// Numeric inputs typed as raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Age,
    Height,
    Weight,
    BodyFat,
    WorkoutDays,
    Calories,
    Protein,
    Carbs,
    Fats,
    Sleep,
}

/// Live numbers shown while the user is still typing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardPreview {
    pub bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
    pub ideal_weight: Option<IdealWeightRange>,
    pub weight_difference_kg: Option<f64>,
    pub macro_total_kcal: Option<f64>,
    pub macro_discrepancy_kcal: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: usize,
    draft: ProfileDraft,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing draft, e.g. to edit a profile
    pub fn with_draft(draft: ProfileDraft) -> Self {
        Self { step: 0, draft }
    }

    pub fn current_step(&self) -> WizardStep {
        WizardStep::ALL[self.step]
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    /// Progress through the flow, 20..=100
    pub fn progress_pct(&self) -> f64 {
        (self.step + 1) as f64 / WizardStep::ALL.len() as f64 * 100.0
    }

    pub fn can_advance(&self) -> bool {
        self.current_step().can_advance(&self.draft)
    }

    /// Move to the next step if the current one is complete and in range
    pub fn advance(&mut self) -> Result<WizardStep, ValidationError> {
        let step = self.current_step();
        step.check(&self.draft)?;
        let next = step
            .next()
            .ok_or_else(|| ValidationError::new("Step", "already on the final step"))?;
        self.step = next.index();
        Ok(next)
    }

    /// Go back one step; stays put on the first step
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(prev) = self.current_step().previous() {
            self.step = prev.index();
        }
        self.current_step()
    }

    /// Finish the flow from the final step
    pub fn complete(&self) -> Result<Profile, ValidationError> {
        if !self.current_step().is_last() {
            return Err(ValidationError::new(
                "Step",
                format!("{} is not the final step", self.current_step().label()),
            ));
        }
        self.draft.build()
    }

    /// Store raw text for a numeric field, keeping digits only
    ///
    /// Empty input clears the field.
    pub fn set_numeric(&mut self, field: NumericField, raw: &str) {
        let digits = digits_only(raw);
        let as_f64 = || digits.parse::<f64>().ok();
        match field {
            NumericField::Age => self.draft.age = digits.parse().ok(),
            NumericField::Height => self.draft.height_cm = as_f64(),
            NumericField::Weight => self.draft.weight_kg = as_f64(),
            NumericField::BodyFat => self.draft.body_fat_pct = as_f64(),
            NumericField::WorkoutDays => self.draft.workout_days_per_week = digits.parse().ok(),
            NumericField::Calories => self.draft.daily_calories = as_f64(),
            NumericField::Protein => self.draft.protein_g = as_f64(),
            NumericField::Carbs => self.draft.carbs_g = as_f64(),
            NumericField::Fats => self.draft.fats_g = as_f64(),
            NumericField::Sleep => self.draft.sleep_hours = as_f64(),
        }
    }

    pub fn preview(&self) -> WizardPreview {
        let d = &self.draft;
        let bmi_value = match (d.weight_kg, d.height_cm) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(bmi(w, h)),
            _ => None,
        };
        let ideal = d
            .height_cm
            .filter(|h| *h > 0.0)
            .map(|h| ideal_weight_range(h, d.gender));
        let weight_diff = match (d.weight_kg, ideal.as_ref()) {
            (Some(w), Some(range)) => Some(weight_difference_kg(w, range)),
            _ => None,
        };
        let macros = match (d.protein_g, d.carbs_g, d.fats_g) {
            (Some(p), Some(c), Some(f)) => Some(macro_calories(p, c, f)),
            _ => None,
        };
        let discrepancy = match (macros.as_ref(), d.daily_calories) {
            (Some(m), Some(kcal)) => macro_discrepancy(m, kcal),
            _ => None,
        };

        WizardPreview {
            bmi: bmi_value,
            bmi_category: bmi_value.map(classify_bmi),
            ideal_weight: ideal,
            weight_difference_kg: weight_diff,
            macro_total_kcal: macros.map(|m| m.total_kcal()),
            macro_discrepancy_kcal: discrepancy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Goal;

    fn fill_body(w: &mut Wizard) {
        w.set_numeric(NumericField::Age, "28");
        w.set_numeric(NumericField::Height, "178");
        w.set_numeric(NumericField::Weight, "82");
    }

    fn fill_nutrition(w: &mut Wizard) {
        w.set_numeric(NumericField::Calories, "2200");
        w.set_numeric(NumericField::Protein, "140");
        w.set_numeric(NumericField::Carbs, "240");
        w.set_numeric(NumericField::Fats, "65");
    }

    #[test]
    fn test_body_step_gates_on_required_fields() {
        let mut w = Wizard::new();
        assert_eq!(w.current_step(), WizardStep::BodyStats);
        assert!(!w.can_advance());

        let err = w.advance().unwrap_err();
        assert_eq!(err.field, "Age");
        assert_eq!(w.current_step(), WizardStep::BodyStats);

        fill_body(&mut w);
        assert_eq!(w.advance().unwrap(), WizardStep::WorkLife);
    }

    #[test]
    fn test_full_flow_completes() {
        let mut w = Wizard::new();
        fill_body(&mut w);
        w.advance().unwrap();
        w.advance().unwrap();
        w.draft_mut().goal = Goal::MuscleGain;
        assert!(!w.can_advance());
        w.set_numeric(NumericField::WorkoutDays, "4");
        w.advance().unwrap();
        fill_nutrition(&mut w);
        assert_eq!(w.advance().unwrap(), WizardStep::Lifestyle);
        assert_eq!(w.progress_pct(), 100.0);

        let profile = w.complete().unwrap();
        assert_eq!(profile.weight_kg(), 82.0);
        assert_eq!(profile.goal(), Goal::MuscleGain);
        assert_eq!(profile.sleep_hours(), 7.0);
    }

    #[test]
    fn test_out_of_range_values_block_their_own_step() {
        let mut w = Wizard::new();
        fill_body(&mut w);
        w.set_numeric(NumericField::Age, "0");
        let err = w.advance().unwrap_err();
        assert_eq!(err.field, "Age");
        assert_eq!(w.current_step(), WizardStep::BodyStats);

        w.set_numeric(NumericField::Age, "28");
        w.set_numeric(NumericField::Height, "5");
        let err = w.advance().unwrap_err();
        assert_eq!(err.field, "Height");
        assert!(!w.can_advance());

        w.set_numeric(NumericField::Height, "178");
        w.advance().unwrap();
        w.advance().unwrap();
        assert_eq!(w.current_step(), WizardStep::Training);

        w.set_numeric(NumericField::WorkoutDays, "9");
        let err = w.advance().unwrap_err();
        assert_eq!(err.field, "Workout Days Per Week");
        assert_eq!(w.current_step(), WizardStep::Training);

        w.set_numeric(NumericField::WorkoutDays, "4");
        assert_eq!(w.advance().unwrap(), WizardStep::Nutrition);
    }

    #[test]
    fn test_lifestyle_checks_sleep_range() {
        let mut draft = ProfileDraft::default();
        draft.sleep_hours = Some(0.0);
        assert_eq!(
            WizardStep::Lifestyle.check(&draft).unwrap_err().field,
            "Sleep Hours"
        );
        draft.sleep_hours = Some(7.0);
        assert!(WizardStep::Lifestyle.check(&draft).is_ok());
    }

    #[test]
    fn test_complete_only_from_final_step() {
        let mut w = Wizard::new();
        fill_body(&mut w);
        assert!(w.complete().is_err());
    }

    #[test]
    fn test_retreat_saturates_at_first_step() {
        let mut w = Wizard::new();
        assert_eq!(w.retreat(), WizardStep::BodyStats);
        fill_body(&mut w);
        w.advance().unwrap();
        assert_eq!(w.retreat(), WizardStep::BodyStats);
        // Input survives moving back
        assert_eq!(w.draft().age, Some(28));
    }

    #[test]
    fn test_nutrition_gate_needs_all_macros() {
        let mut draft = ProfileDraft::default();
        draft.daily_calories = Some(2200.0);
        draft.protein_g = Some(140.0);
        assert_eq!(
            WizardStep::Nutrition.missing_fields(&draft),
            vec!["Carbs", "Fats"]
        );
        assert!(WizardStep::WorkLife.can_advance(&draft));
    }

    #[test]
    fn test_numeric_input_keeps_digits() {
        let mut w = Wizard::new();
        w.set_numeric(NumericField::Height, "17a8cm");
        assert_eq!(w.draft().height_cm, Some(178.0));
        w.set_numeric(NumericField::Height, "");
        assert_eq!(w.draft().height_cm, None);
    }

    #[test]
    fn test_preview_tracks_partial_input() {
        let mut w = Wizard::new();
        assert_eq!(w.preview().bmi, None);
        fill_body(&mut w);
        let preview = w.preview();
        assert_eq!(preview.bmi, Some(25.9));
        assert_eq!(preview.bmi_category, Some(BmiCategory::Overweight));
        assert_eq!(preview.weight_difference_kg, Some(8.8));

        w.set_numeric(NumericField::Calories, "3000");
        w.set_numeric(NumericField::Protein, "140");
        w.set_numeric(NumericField::Carbs, "240");
        w.set_numeric(NumericField::Fats, "65");
        let preview = w.preview();
        assert_eq!(preview.macro_total_kcal, Some(2105.0));
        assert_eq!(preview.macro_discrepancy_kcal, Some(895.0));
    }
}
