//! AI report schema and strict validation
//!
//! The AI service is an untrusted oracle. Its text goes through
//! [`parse_report`], which strips code fences, parses JSON into typed structs
//! and then checks the structural rules serde cannot express. Anything that
//! fails is rejected whole; there is no partial report.

use crate::errors::ReportFormatError;
use crate::health_metrics::{CalorieStatus, DerivedMetrics};
use crate::profile::{Occupation, Profile};
use crate::prompt::FAQ_QUESTIONS;
use serde::{Deserialize, Serialize};

pub const REMARK_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEcho {
    pub age: String,
    pub occupation: String,
    pub experience: String,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleRisk {
    pub sitting: String,
    pub stress: String,
    pub sleep: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub daily_calories: String,
    pub protein_target: String,
    pub workout_frequency: String,
    pub cardio: String,
    pub step_goal: String,
    pub sleep: String,
    pub habit_focus: String,
}

impl ActionPlan {
    /// (label, value) pairs in display order
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("dailyCalories", self.daily_calories.as_str()),
            ("proteinTarget", self.protein_target.as_str()),
            ("workoutFrequency", self.workout_frequency.as_str()),
            ("cardio", self.cardio.as_str()),
            ("stepGoal", self.step_goal.as_str()),
            ("sleep", self.sleep.as_str()),
            ("habitFocus", self.habit_focus.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doubt {
    pub q: String,
    pub a: String,
}

/// Validated AI fitness report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub bmi: f64,
    pub bmi_category: String,
    pub ideal_min: f64,
    pub ideal_max: f64,
    pub weight_diff: String,
    pub bmr: f64,
    pub tdee: f64,
    pub calorie_status: CalorieStatus,
    pub calorie_gap: f64,
    pub on_track: bool,
    pub profile_summary: ProfileEcho,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle_risk: Option<LifestyleRisk>,
    pub goal_summary: String,
    pub what_working: String,
    pub what_misaligned: String,
    pub remarks: Vec<String>,
    pub action_plan: ActionPlan,
    pub timeline: String,
    pub expert_remark: String,
    pub score: f64,
    pub doubts: Vec<Doubt>,
}

/// Remove markdown code fences the model sometimes wraps JSON in
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse and validate raw AI text against the report schema
pub fn parse_report(raw: &str, profile: &Profile) -> Result<Report, ReportFormatError> {
    let body = strip_code_fences(raw);
    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| ReportFormatError::Json(e.to_string()))?;
    let report: Report =
        serde_json::from_value(value).map_err(|e| ReportFormatError::Schema(e.to_string()))?;
    report.validate(profile)?;
    Ok(report)
}

fn schema(msg: impl Into<String>) -> ReportFormatError {
    ReportFormatError::Schema(msg.into())
}

fn non_empty(field: &str, value: &str) -> Result<(), ReportFormatError> {
    if value.trim().is_empty() {
        return Err(schema(format!("{} is empty", field)));
    }
    Ok(())
}

impl Report {
    /// Structural checks beyond what the serde types enforce
    pub fn validate(&self, profile: &Profile) -> Result<(), ReportFormatError> {
        let numbers = [
            ("bmi", self.bmi),
            ("idealMin", self.ideal_min),
            ("idealMax", self.ideal_max),
            ("bmr", self.bmr),
            ("tdee", self.tdee),
            ("calorieGap", self.calorie_gap),
            ("score", self.score),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(schema(format!("{} is not a finite number", field)));
            }
        }

        if !(0.0..=100.0).contains(&self.score) {
            return Err(schema(format!("score {} is outside 0-100", self.score)));
        }
        if self.ideal_min > self.ideal_max {
            return Err(schema("idealMin is greater than idealMax"));
        }

        let text_fields = [
            ("bmiCategory", &self.bmi_category),
            ("weightDiff", &self.weight_diff),
            ("profileSummary.age", &self.profile_summary.age),
            ("profileSummary.occupation", &self.profile_summary.occupation),
            ("profileSummary.experience", &self.profile_summary.experience),
            ("profileSummary.goal", &self.profile_summary.goal),
            ("goalSummary", &self.goal_summary),
            ("whatWorking", &self.what_working),
            ("whatMisaligned", &self.what_misaligned),
            ("timeline", &self.timeline),
            ("expertRemark", &self.expert_remark),
        ];
        for (field, value) in text_fields {
            non_empty(field, value)?;
        }
        if let Some(risk) = &self.lifestyle_risk {
            non_empty("lifestyleRisk.sitting", &risk.sitting)?;
            non_empty("lifestyleRisk.stress", &risk.stress)?;
            non_empty("lifestyleRisk.sleep", &risk.sleep)?;
        }

        if self.remarks.len() != REMARK_COUNT {
            return Err(schema(format!(
                "remarks has {} entries, expected {}",
                self.remarks.len(),
                REMARK_COUNT
            )));
        }
        for (i, remark) in self.remarks.iter().enumerate() {
            non_empty(&format!("remarks[{}]", i), remark)?;
        }

        for (field, value) in self.action_plan.entries() {
            non_empty(&format!("actionPlan.{}", field), value)?;
        }

        if self.doubts.len() != FAQ_QUESTIONS.len() {
            return Err(schema(format!(
                "doubts has {} entries, expected {}",
                self.doubts.len(),
                FAQ_QUESTIONS.len()
            )));
        }
        for (i, (doubt, expected)) in self.doubts.iter().zip(FAQ_QUESTIONS).enumerate() {
            if !doubt.q.trim().eq_ignore_ascii_case(expected) {
                return Err(schema(format!(
                    "doubts[{}] asks '{}', expected '{}'",
                    i, doubt.q, expected
                )));
            }
            non_empty(&format!("doubts[{}].a", i), &doubt.a)?;
        }

        if profile.occupation() == Occupation::Desk && self.lifestyle_risk.is_none() {
            return Err(schema("lifestyleRisk is required for desk occupations"));
        }

        Ok(())
    }

    /// AI figures that disagree with the local formulas
    pub fn divergences(&self, metrics: &DerivedMetrics) -> Vec<MetricDivergence> {
        let checks = [
            ("bmi", self.bmi, metrics.bmi, 0.2),
            ("bmr", self.bmr, metrics.bmr, 25.0),
            ("tdee", self.tdee, metrics.tdee, 25.0),
            ("idealMin", self.ideal_min, metrics.ideal_weight.min, 1.0),
            ("idealMax", self.ideal_max, metrics.ideal_weight.max, 1.0),
        ];
        let mut out: Vec<MetricDivergence> = checks
            .into_iter()
            .filter(|(_, reported, local, tolerance)| (reported - local).abs() > *tolerance)
            .map(|(field, reported, local, _)| MetricDivergence {
                field,
                reported,
                local,
            })
            .collect();

        if self.calorie_status != metrics.calories.status {
            out.push(MetricDivergence {
                field: "calorieStatus",
                reported: self.calorie_gap,
                local: metrics.calories.gap,
            });
        }
        out
    }
}

/// A reported figure outside tolerance of the locally computed one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDivergence {
    pub field: &'static str,
    pub reported: f64,
    pub local: f64,
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};

    /// A well-formed report for the desk-job fixture profile
    pub(crate) fn report_json() -> Value {
        json!({
            "bmi": 25.9,
            "bmiCategory": "Overweight",
            "idealMin": 71.1,
            "idealMax": 73.2,
            "weightDiff": "8.8kg above the ideal range",
            "bmr": 1797.5,
            "tdee": 2786,
            "calorieStatus": "Deficit",
            "calorieGap": -586,
            "onTrack": false,
            "profileSummary": {
                "age": "28", "occupation": "Desk job", "experience": "Intermediate", "goal": "Muscle gain"
            },
            "lifestyleRisk": {
                "sitting": "8+ hours seated", "stress": "Moderate", "sleep": "Adequate at 7 hrs"
            },
            "goalSummary": "Muscle gain needs a surplus; current intake is a deficit.",
            "whatWorking": "Four strength sessions per week.",
            "whatMisaligned": "Calories 586 kcal below TDEE.",
            "remarks": [
                "Raise intake by ~1000 kcal.",
                "Protein should reach 148-197 g.",
                "Body fat 20% is reasonable.",
                "Add daily walks."
            ],
            "actionPlan": {
                "dailyCalories": "3086-3286 kcal",
                "proteinTarget": "150-195 g",
                "workoutFrequency": "4 days/week",
                "cardio": "2x20 min",
                "stepGoal": "8000 steps",
                "sleep": "7-8 hrs",
                "habitFocus": "Hit protein at every meal"
            },
            "timeline": "Visible change in 8-12 weeks.",
            "expertRemark": "You train well but under-eat for your goal. Eat more. Start with a 300 kcal snack today.",
            "score": 62,
            "doubts": [
                {"q": "Can I lose fat without gym?", "a": "Yes, with a deficit."},
                {"q": "Is rice bad for fitness?", "a": "No."},
                {"q": "How much protein is too much?", "a": "Above ~3 g/kg adds little."},
                {"q": "Do I need supplements?", "a": "Not required."},
                {"q": "Can I build muscle at home?", "a": "Yes, with progressive overload."},
                {"q": "How important is sleep for results?", "a": "Very."}
            ]
        })
    }
}
