//! Input validation functions
//!
//! Range checks for profile fields and demo-account credentials. Each
//! validator returns a bare message; callers attach the field label from
//! [`get_field_display_label`].

use std::sync::OnceLock;

fn email_regex() -> &'static regex_lite::Regex {
    static EMAIL: OnceLock<regex_lite::Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

fn ensure_finite(value: f64, what: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", what));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate demo-account password length
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

// ============================================================================
// Profile Validation
// ============================================================================

/// Validate age in whole years
pub fn validate_age(age: u32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 120 {
        return Err("Age cannot exceed 120 years".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    ensure_finite(height_cm, "Height")?;
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    ensure_finite(weight_kg, "Weight")?;
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: f64) -> Result<(), String> {
    ensure_finite(value, "Percentage")?;
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

/// Validate average nightly sleep
pub fn validate_sleep_hours(hours: f64) -> Result<(), String> {
    ensure_finite(hours, "Sleep")?;
    if hours <= 0.0 {
        return Err("Sleep must be more than 0 hours".to_string());
    }
    if hours > 24.0 {
        return Err("Sleep cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Validate training days per week
pub fn validate_workout_days(days: u8) -> Result<(), String> {
    if !(1..=7).contains(&days) {
        return Err("Workout days must be between 1 and 7".to_string());
    }
    Ok(())
}

/// Validate daily calorie intake
pub fn validate_calories(calories: f64) -> Result<(), String> {
    ensure_finite(calories, "Calories")?;
    if calories <= 0.0 {
        return Err("Calories must be positive".to_string());
    }
    if calories > 50000.0 {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a daily macronutrient amount in grams
pub fn validate_macro_grams(grams: f64) -> Result<(), String> {
    ensure_finite(grams, "Amount")?;
    if grams <= 0.0 {
        return Err("Amount must be positive".to_string());
    }
    if grams > 5000.0 {
        return Err("Amount unreasonably high".to_string());
    }
    Ok(())
}

/// Keep only ASCII digits from raw numeric input
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &'static str {
    match field_name {
        "age" => "Age",
        "gender" => "Gender",
        "height" | "height_cm" => "Height",
        "weight" | "weight_kg" => "Weight",
        "body_fat" | "body_fat_pct" => "Body Fat %",
        "occupation" => "Occupation Type",
        "activity_level" => "Activity Level",
        "sleep" | "sleep_hours" => "Sleep Hours",
        "experience" => "Workout Experience",
        "goal" => "Primary Goal",
        "workout_days" => "Workout Days Per Week",
        "training_type" => "Training Type",
        "calories" | "daily_calories" => "Daily Calories",
        "protein" | "protein_g" => "Protein",
        "carbs" | "carbs_g" => "Carbs",
        "fats" | "fats_g" => "Fats",
        "medical" | "medical_notes" => "Medical Conditions",
        "email" => "Email Address",
        "password" => "Password",
        "name" => "Full Name",
        _ => "Field",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alex@irontrack.io", true)]
    #[case("demo@fit.com", true)]
    #[case("", false)]
    #[case("no-at-sign.com", false)]
    #[case("two words@fit.com", false)]
    #[case("user@nodot", false)]
    fn test_validate_email(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("demo123").is_ok());
        assert!(validate_password("abc12").is_err());
    }

    #[test]
    fn test_validate_height() {
        assert!(validate_height_cm(178.0).is_ok());
        assert!(validate_height_cm(49.9).is_err());
        assert!(validate_height_cm(301.0).is_err());
        assert!(validate_height_cm(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(82.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(7, true)]
    #[case(8, false)]
    fn test_validate_workout_days(#[case] days: u8, #[case] ok: bool) {
        assert_eq!(validate_workout_days(days).is_ok(), ok);
    }

    #[test]
    fn test_validate_nutrition() {
        assert!(validate_calories(2200.0).is_ok());
        assert!(validate_calories(0.0).is_err());
        assert!(validate_macro_grams(140.0).is_ok());
        assert!(validate_macro_grams(-5.0).is_err());
    }

    #[test]
    fn test_validate_sleep_and_body_fat() {
        assert!(validate_sleep_hours(7.0).is_ok());
        assert!(validate_sleep_hours(0.0).is_err());
        assert!(validate_percentage(20.0).is_ok());
        assert!(validate_percentage(100.5).is_err());
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("1a7-8 "), "178");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(get_field_display_label("height_cm"), "Height");
        assert_eq!(get_field_display_label("workout_days"), "Workout Days Per Week");
        assert_eq!(get_field_display_label("unknown"), "Field");
    }
}
