//! Profile model
//!
//! A [`Profile`] is a complete, validated snapshot of what the user told the
//! onboarding wizard. It can only be obtained through [`ProfileDraft::build`]
//! (deserialization goes through the same path), so every report request
//! works from a whole profile, never a partial one.

use crate::errors::ValidationError;
use crate::health_metrics::{ActivityLevel, Gender};
use crate::validation::{
    get_field_display_label, validate_age, validate_calories, validate_height_cm,
    validate_macro_grams, validate_percentage, validate_sleep_hours, validate_weight,
    validate_workout_days,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker used when an optional field was left blank
pub const NOT_PROVIDED: &str = "Not provided";

macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| format!("Unknown {}: {}", stringify!($name), s))
            }
        }
    };
}

labeled_enum!(
    /// How much of the working day is spent sitting
    Occupation {
        Desk => "desk",
        Mixed => "mixed",
        Physical => "physical",
    }
);

labeled_enum!(
    /// Training history
    Experience {
        None => "none",
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
);

labeled_enum!(
    /// Primary goal
    Goal {
        FatLoss => "fat_loss",
        MuscleGain => "muscle_gain",
        Maintenance => "maintenance",
        Performance => "performance",
    }
);

labeled_enum!(
    /// Primary training style
    TrainingType {
        Strength => "strength",
        Cardio => "cardio",
        Mixed => "mixed",
        Calisthenics => "calisthenics",
        Yoga => "yoga",
    }
);

impl Default for Occupation {
    fn default() -> Self {
        Occupation::Desk
    }
}

impl Default for Experience {
    fn default() -> Self {
        Experience::Beginner
    }
}

impl Default for Goal {
    fn default() -> Self {
        Goal::FatLoss
    }
}

impl Default for TrainingType {
    fn default() -> Self {
        TrainingType::Strength
    }
}

/// Validated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileDraft", into = "ProfileDraft")]
pub struct Profile {
    age: u32,
    gender: Gender,
    height_cm: f64,
    weight_kg: f64,
    body_fat_pct: Option<f64>,
    occupation: Occupation,
    activity_level: ActivityLevel,
    sleep_hours: f64,
    experience: Experience,
    goal: Goal,
    workout_days_per_week: u8,
    training_type: TrainingType,
    daily_calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fats_g: f64,
    medical_notes: Option<String>,
}

impl Profile {
    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn body_fat_pct(&self) -> Option<f64> {
        self.body_fat_pct
    }

    pub fn occupation(&self) -> Occupation {
        self.occupation
    }

    pub fn activity_level(&self) -> ActivityLevel {
        self.activity_level
    }

    pub fn sleep_hours(&self) -> f64 {
        self.sleep_hours
    }

    pub fn experience(&self) -> Experience {
        self.experience
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn workout_days_per_week(&self) -> u8 {
        self.workout_days_per_week
    }

    pub fn training_type(&self) -> TrainingType {
        self.training_type
    }

    pub fn daily_calories(&self) -> f64 {
        self.daily_calories
    }

    pub fn protein_g(&self) -> f64 {
        self.protein_g
    }

    pub fn carbs_g(&self) -> f64 {
        self.carbs_g
    }

    pub fn fats_g(&self) -> f64 {
        self.fats_g
    }

    pub fn medical_notes(&self) -> Option<&str> {
        self.medical_notes.as_deref()
    }

    /// Reopen the profile as an editable draft
    pub fn to_draft(&self) -> ProfileDraft {
        self.clone().into()
    }
}

/// Partially filled profile, as collected step by step
///
/// Enum fields start at the wizard defaults; numeric fields start empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    pub age: Option<u32>,
    pub gender: Gender,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub occupation: Occupation,
    pub activity_level: ActivityLevel,
    pub sleep_hours: Option<f64>,
    pub experience: Experience,
    pub goal: Goal,
    pub workout_days_per_week: Option<u8>,
    pub training_type: TrainingType,
    pub daily_calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fats_g: Option<f64>,
    pub medical_notes: Option<String>,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            age: None,
            gender: Gender::Male,
            height_cm: None,
            weight_kg: None,
            body_fat_pct: None,
            occupation: Occupation::Desk,
            activity_level: ActivityLevel::Sedentary,
            sleep_hours: Some(7.0),
            experience: Experience::Beginner,
            goal: Goal::FatLoss,
            workout_days_per_week: None,
            training_type: TrainingType::Strength,
            daily_calories: None,
            protein_g: None,
            carbs_g: None,
            fats_g: None,
            medical_notes: None,
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(get_field_display_label(field)))
}

fn checked<T: Copy>(
    value: T,
    field: &str,
    check: impl Fn(T) -> Result<(), String>,
) -> Result<T, ValidationError> {
    check(value)
        .map(|_| value)
        .map_err(|msg| ValidationError::new(get_field_display_label(field), msg))
}

/// Blank notes and the explicit marker both mean "nothing to report"
fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case(NOT_PROVIDED))
}

impl ProfileDraft {
    /// Validate every field and freeze the draft into a [`Profile`]
    pub fn build(&self) -> Result<Profile, ValidationError> {
        let age = checked(required(self.age, "age")?, "age", validate_age)?;
        let height_cm = checked(required(self.height_cm, "height")?, "height", validate_height_cm)?;
        let weight_kg = checked(required(self.weight_kg, "weight")?, "weight", validate_weight)?;
        let body_fat_pct = self
            .body_fat_pct
            .map(|bf| checked(bf, "body_fat", validate_percentage))
            .transpose()?;
        let sleep_hours = checked(required(self.sleep_hours, "sleep")?, "sleep", validate_sleep_hours)?;
        let workout_days_per_week = checked(
            required(self.workout_days_per_week, "workout_days")?,
            "workout_days",
            validate_workout_days,
        )?;
        let daily_calories = checked(
            required(self.daily_calories, "calories")?,
            "calories",
            validate_calories,
        )?;
        let protein_g = checked(required(self.protein_g, "protein")?, "protein", validate_macro_grams)?;
        let carbs_g = checked(required(self.carbs_g, "carbs")?, "carbs", validate_macro_grams)?;
        let fats_g = checked(required(self.fats_g, "fats")?, "fats", validate_macro_grams)?;

        Ok(Profile {
            age,
            gender: self.gender,
            height_cm,
            weight_kg,
            body_fat_pct,
            occupation: self.occupation,
            activity_level: self.activity_level,
            sleep_hours,
            experience: self.experience,
            goal: self.goal,
            workout_days_per_week,
            training_type: self.training_type,
            daily_calories,
            protein_g,
            carbs_g,
            fats_g,
            medical_notes: normalize_notes(self.medical_notes.clone()),
        })
    }
}

impl TryFrom<ProfileDraft> for Profile {
    type Error = ValidationError;

    fn try_from(draft: ProfileDraft) -> Result<Self, Self::Error> {
        draft.build()
    }
}

impl From<Profile> for ProfileDraft {
    fn from(p: Profile) -> Self {
        Self {
            age: Some(p.age),
            gender: p.gender,
            height_cm: Some(p.height_cm),
            weight_kg: Some(p.weight_kg),
            body_fat_pct: p.body_fat_pct,
            occupation: p.occupation,
            activity_level: p.activity_level,
            sleep_hours: Some(p.sleep_hours),
            experience: p.experience,
            goal: p.goal,
            workout_days_per_week: Some(p.workout_days_per_week),
            training_type: p.training_type,
            daily_calories: Some(p.daily_calories),
            protein_g: Some(p.protein_g),
            carbs_g: Some(p.carbs_g),
            fats_g: Some(p.fats_g),
            medical_notes: p.medical_notes,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// 28yo male desk worker aiming for muscle gain
    pub(crate) fn alex_draft() -> ProfileDraft {
        ProfileDraft {
            age: Some(28),
            gender: Gender::Male,
            height_cm: Some(178.0),
            weight_kg: Some(82.0),
            body_fat_pct: Some(20.0),
            occupation: Occupation::Desk,
            activity_level: ActivityLevel::Moderate,
            sleep_hours: Some(7.0),
            experience: Experience::Intermediate,
            goal: Goal::MuscleGain,
            workout_days_per_week: Some(4),
            training_type: TrainingType::Strength,
            daily_calories: Some(2200.0),
            protein_g: Some(140.0),
            carbs_g: Some(240.0),
            fats_g: Some(65.0),
            medical_notes: None,
        }
    }

    pub(crate) fn alex() -> Profile {
        alex_draft().build().expect("fixture profile is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_build_valid_profile() {
        let profile = alex();
        assert_eq!(profile.age(), 28);
        assert_eq!(profile.goal(), Goal::MuscleGain);
        assert_eq!(profile.body_fat_pct(), Some(20.0));
        assert_eq!(profile.medical_notes(), None);
    }

    #[test]
    fn test_missing_required_field() {
        let mut draft = alex_draft();
        draft.weight_kg = None;
        let err = draft.build().unwrap_err();
        assert_eq!(err.field, "Weight");
        assert_eq!(err.message, "is required");
    }

    #[test]
    fn test_out_of_range_field() {
        let mut draft = alex_draft();
        draft.workout_days_per_week = Some(9);
        let err = draft.build().unwrap_err();
        assert_eq!(err.field, "Workout Days Per Week");
    }

    #[test]
    fn test_body_fat_is_optional_but_checked() {
        let mut draft = alex_draft();
        draft.body_fat_pct = None;
        assert!(draft.build().is_ok());
        draft.body_fat_pct = Some(120.0);
        assert_eq!(draft.build().unwrap_err().field, "Body Fat %");
    }

    #[test]
    fn test_medical_notes_normalized() {
        let mut draft = alex_draft();
        draft.medical_notes = Some("   ".to_string());
        assert_eq!(draft.build().unwrap().medical_notes(), None);
        draft.medical_notes = Some(" mild asthma ".to_string());
        assert_eq!(draft.build().unwrap().medical_notes(), Some("mild asthma"));
    }

    #[test]
    fn test_enum_labels_parse() {
        assert_eq!("fat_loss".parse::<Goal>().unwrap(), Goal::FatLoss);
        assert_eq!("DESK".parse::<Occupation>().unwrap(), Occupation::Desk);
        assert!("pilates".parse::<TrainingType>().is_err());
        assert_eq!(Experience::None.to_string(), "none");
    }

    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::to_string(&alex()).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alex());

        let bad = json.replace("\"height_cm\":178.0", "\"height_cm\":10.0");
        assert!(serde_json::from_str::<Profile>(&bad).is_err());
    }

    #[test]
    fn test_draft_defaults_match_wizard() {
        let draft = ProfileDraft::default();
        assert_eq!(draft.gender, Gender::Male);
        assert_eq!(draft.occupation, Occupation::Desk);
        assert_eq!(draft.activity_level, ActivityLevel::Sedentary);
        assert_eq!(draft.sleep_hours, Some(7.0));
        assert_eq!(draft.training_type, TrainingType::Strength);
    }
}
