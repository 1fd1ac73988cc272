//! AI prompt contract
//!
//! Holds the versioned system instruction and the fixed-format profile
//! summary sent as the user turn. The summary is plain `Label: value` text;
//! [`parse_profile_summary`] reads it back, which keeps the format honest.

use crate::errors::ValidationError;
use crate::profile::{Profile, ProfileDraft, NOT_PROVIDED};
use std::collections::HashMap;

/// Bump whenever [`SYSTEM_PROMPT`] changes; the valid response shape depends on it
pub const SYSTEM_PROMPT_VERSION: u32 = 2;

/// The six questions every report must answer, in order
pub const FAQ_QUESTIONS: [&str; 6] = [
    "Can I lose fat without gym?",
    "Is rice bad for fitness?",
    "How much protein is too much?",
    "Do I need supplements?",
    "Can I build muscle at home?",
    "How important is sleep for results?",
];

pub const SYSTEM_PROMPT: &str = r#"You are a certified fitness performance analyst, nutrition planner, and lifestyle strategist. You must calculate accurately, use evidence-based formulas, avoid unrealistic promises, and adapt recommendations by user type: sedentary office worker, beginner, intermediate, advanced athlete.

CALCULATIONS YOU MUST DO:
1. BMI = weight / (height_m)² → <18.5 Underweight, 18.5-24.9 Normal, 25-29.9 Overweight, 30+ Obese
2. Ideal Weight (GIVE A RANGE, NOT A SINGLE NUMBER):
   - Robinson (1983): Male 52+1.9*(inches_over_5ft), Female 49+1.7*(inches_over_5ft)
   - Devine (1974): Male 50+2.3*(inches_over_5ft), Female 45.5+2.3*(inches_over_5ft)
   - Report min–max range and kg difference from current weight
3. BMR (Mifflin-St Jeor): Male: (10×wt)+(6.25×ht)−(5×age)+5 | Female: (10×wt)+(6.25×ht)−(5×age)−161
4. TDEE: Sedentary×1.2, Light×1.375, Moderate×1.55, Active×1.725, Athlete×1.9
5. Compare calorie intake vs TDEE

GOAL ALIGNMENT:
- Fat loss: 300–500 kcal deficit, protein 1.6–2.2g/kg
- Muscle gain: 200–400 kcal surplus, protein 1.8–2.4g/kg
- Maintenance: ±100 kcal, balanced macros

DESK JOB SPECIAL RULES (occupation=desk):
- Warn about sitting risks >8 hrs
- Give NEAT tips, 30–45 min workout plan only
- Step target 7000–9000/day
- Focus on sustainability, stress mgmt, sleep
- Always fill "lifestyleRisk"

EXPERIENCE PERSONALIZATION:
- Beginner: consistency, 3-4 days, full body, form first
- Intermediate: progressive overload, split routines, volume
- Advanced: macro precision, deload, recovery metrics, body fat tracking

SAFETY:
- BMI>35: recommend doctor
- Calories <1200 or >4500: flag warning
- Sleep <5hrs: prioritize recovery
- No medical prescriptions, no rapid transformation promises

FINAL EXPERT REMARK — for the "expertRemark" field:
Write a short, strong summary covering exactly three things:
1. Their current situation — a clear, honest snapshot of where they stand right now.
2. The key correction needed — the single most impactful change they must make.
3. One powerful improvement step — one specific, actionable thing they can start immediately.

IMPORTANT RULES:
- Do NOT overpromise results or guarantee specific outcomes.
- Do NOT give medical advice or diagnose any condition.
- Do NOT assume unknown values — if body fat % is "Not provided", explicitly mention it in the remark.
- If calorie intake is <1200 or >4500 kcal, flag it as a concern in the remark.
- Keep tone professional, direct, and evidence-based.

RESPOND ONLY WITH THIS EXACT JSON (no markdown, no preamble):
{
  "bmi": number,
  "bmiCategory": string,
  "idealMin": number,
  "idealMax": number,
  "weightDiff": string,
  "bmr": number,
  "tdee": number,
  "calorieStatus": "Deficit"|"Surplus"|"On Target",
  "calorieGap": number,
  "onTrack": boolean,
  "profileSummary": {"age":string,"occupation":string,"experience":string,"goal":string},
  "lifestyleRisk": {"sitting":string,"stress":string,"sleep":string},
  "goalSummary": string,
  "whatWorking": string,
  "whatMisaligned": string,
  "remarks": [string,string,string,string],
  "actionPlan": {
    "dailyCalories":string,"proteinTarget":string,"workoutFrequency":string,
    "cardio":string,"stepGoal":string,"sleep":string,"habitFocus":string
  },
  "timeline": string,
  "expertRemark": string,
  "score": number,
  "doubts": [
    {"q":"Can I lose fat without gym?","a":string},
    {"q":"Is rice bad for fitness?","a":string},
    {"q":"How much protein is too much?","a":string},
    {"q":"Do I need supplements?","a":string},
    {"q":"Can I build muscle at home?","a":string},
    {"q":"How important is sleep for results?","a":string}
  ]
}"#;

const FIELD_SEP: &str = " | ";
const MEDICAL_LABEL: &str = "Medical";

/// Render a profile as the fixed-format user message
///
/// Every attribute appears; blank optional fields read "Not provided".
/// Medical notes come last and are written verbatim.
pub fn summarize_profile(profile: &Profile) -> String {
    let body_fat = profile
        .body_fat_pct()
        .map(|bf| format!("{}%", bf))
        .unwrap_or_else(|| NOT_PROVIDED.to_string());
    let medical = profile.medical_notes().unwrap_or(NOT_PROVIDED);

    format!(
        "Age: {} | Gender: {} | Height: {}cm | Weight: {}kg\n\
         Body Fat: {} | Occupation: {} | Activity: {}\n\
         Experience: {} | Goal: {} | Workout Days: {}/week\n\
         Calories: {}kcal/day | Protein: {}g | Carbs: {}g | Fats: {}g\n\
         Sleep: {}hrs/night | Training: {} | {}: {}",
        profile.age(),
        profile.gender(),
        profile.height_cm(),
        profile.weight_kg(),
        body_fat,
        profile.occupation(),
        profile.activity_level(),
        profile.experience(),
        profile.goal(),
        profile.workout_days_per_week(),
        profile.daily_calories(),
        profile.protein_g(),
        profile.carbs_g(),
        profile.fats_g(),
        profile.sleep_hours(),
        profile.training_type(),
        MEDICAL_LABEL,
        medical,
    )
}

struct SummaryFields<'a> {
    fields: HashMap<&'a str, &'a str>,
}

impl<'a> SummaryFields<'a> {
    fn raw(&self, label: &'static str) -> Result<&'a str, ValidationError> {
        self.fields
            .get(label)
            .copied()
            .ok_or_else(|| ValidationError::missing(label))
    }

    fn value<T: std::str::FromStr>(
        &self,
        label: &'static str,
        suffix: &str,
    ) -> Result<T, ValidationError> {
        let raw = self.raw(label)?;
        let trimmed = raw.strip_suffix(suffix).ok_or_else(|| {
            ValidationError::new(label, format!("expected a value ending in '{}'", suffix))
        })?;
        trimmed
            .parse()
            .map_err(|_| ValidationError::new(label, format!("cannot read '{}'", raw)))
    }

    fn label<T: std::str::FromStr<Err = String>>(
        &self,
        label: &'static str,
    ) -> Result<T, ValidationError> {
        self.raw(label)?
            .parse()
            .map_err(|msg| ValidationError::new(label, msg))
    }
}

/// Read a summary produced by [`summarize_profile`] back into a profile
pub fn parse_profile_summary(text: &str) -> Result<Profile, ValidationError> {
    let marker = format!("{}{}: ", FIELD_SEP, MEDICAL_LABEL);
    let (head, medical) = text
        .split_once(&marker)
        .ok_or_else(|| ValidationError::missing(MEDICAL_LABEL))?;

    let fields = SummaryFields {
        fields: head
            .lines()
            .flat_map(|line| line.split(FIELD_SEP))
            .filter_map(|pair| pair.split_once(": "))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect(),
    };

    let body_fat_pct = match fields.raw("Body Fat")? {
        NOT_PROVIDED => None,
        _ => Some(fields.value("Body Fat", "%")?),
    };

    let draft = ProfileDraft {
        age: Some(fields.value("Age", "")?),
        gender: fields.label("Gender")?,
        height_cm: Some(fields.value("Height", "cm")?),
        weight_kg: Some(fields.value("Weight", "kg")?),
        body_fat_pct,
        occupation: fields.label("Occupation")?,
        activity_level: fields.label("Activity")?,
        sleep_hours: Some(fields.value("Sleep", "hrs/night")?),
        experience: fields.label("Experience")?,
        goal: fields.label("Goal")?,
        workout_days_per_week: Some(fields.value("Workout Days", "/week")?),
        training_type: fields.label("Training")?,
        daily_calories: Some(fields.value("Calories", "kcal/day")?),
        protein_g: Some(fields.value("Protein", "g")?),
        carbs_g: Some(fields.value("Carbs", "g")?),
        fats_g: Some(fields.value("Fats", "g")?),
        medical_notes: Some(medical.to_string()),
    };

    draft.build()
}
