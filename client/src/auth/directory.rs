//! In-memory account directory
//!
//! Holds the demo accounts plus anything created through sign-up for the
//! lifetime of the process. Passwords are stored as argon2 hashes only.

use super::password::PasswordService;
use irontrack_shared::validation::{validate_email, validate_password};
use irontrack_shared::{
    ActivityLevel, AuthError, Experience, Gender, Goal, Occupation, Profile, ProfileDraft,
    TrainingType,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

/// A signed-in user as the session sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar: String,
    /// `None` until onboarding completes
    pub profile: Option<Profile>,
}

struct StoredAccount {
    account: Account,
    password_hash: String,
}

pub struct AccountDirectory {
    accounts: RwLock<HashMap<String, StoredAccount>>,
}

/// Initials from the first two words of a name, uppercased
pub fn avatar_initials(name: &str) -> String {
    name.trim()
        .split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

fn check_credentials_format(email: &str, password: &str) -> Result<(), AuthError> {
    validate_email(email).map_err(|_| AuthError::InvalidEmail)?;
    validate_password(password).map_err(|_| AuthError::PasswordTooShort)?;
    Ok(())
}

fn demo_profile(draft: ProfileDraft) -> anyhow::Result<Profile> {
    draft
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid demo profile: {}", e))
}

impl AccountDirectory {
    pub fn empty() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Directory seeded with the two demo accounts
    pub fn with_demo_accounts() -> anyhow::Result<Self> {
        let directory = Self::empty();

        let alex = demo_profile(ProfileDraft {
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
        })?;
        directory.insert("alex@irontrack.io", "Alex Carter", "alex123", Some(alex))?;

        let demo = demo_profile(ProfileDraft {
            age: Some(25),
            gender: Gender::Female,
            height_cm: Some(163.0),
            weight_kg: Some(62.0),
            body_fat_pct: Some(24.0),
            occupation: Occupation::Mixed,
            activity_level: ActivityLevel::Light,
            sleep_hours: Some(6.0),
            experience: Experience::Beginner,
            goal: Goal::FatLoss,
            workout_days_per_week: Some(3),
            training_type: TrainingType::Mixed,
            daily_calories: Some(1700.0),
            protein_g: Some(110.0),
            carbs_g: Some(190.0),
            fats_g: Some(55.0),
            medical_notes: None,
        })?;
        directory.insert("demo@fit.com", "Demo User", "demo123", Some(demo))?;

        Ok(directory)
    }

    fn insert(
        &self,
        email: &str,
        name: &str,
        password: &str,
        profile: Option<Profile>,
    ) -> anyhow::Result<()> {
        let password_hash = PasswordService::hash(password)?;
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            avatar: avatar_initials(name),
            profile,
        };
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                email.to_string(),
                StoredAccount {
                    account,
                    password_hash,
                },
            );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        check_credentials_format(email, password)?;

        let stored = {
            let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
            accounts
                .get(email)
                .map(|s| (s.account.clone(), s.password_hash.clone()))
        };
        let Some((account, hash)) = stored else {
            info!("Sign-in for unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        let verified = PasswordService::verify_async(password.to_string(), hash)
            .await
            .map_err(|e| {
                error!(error = %e, "Password verification failed");
                AuthError::Unavailable
            })?;
        if !verified {
            warn!(account_id = %account.id, "Sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(account_id = %account.id, has_profile = account.profile.is_some(), "Signed in");
        Ok(account)
    }

    /// Create an account without a profile; the caller moves on to onboarding
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        check_credentials_format(email, password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        if self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(email)
        {
            return Err(AuthError::AccountExists);
        }

        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AuthError::Unavailable
            })?;
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            avatar: avatar_initials(name),
            profile: None,
        };

        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check: another sign-up may have landed while hashing
        if accounts.contains_key(email) {
            return Err(AuthError::AccountExists);
        }
        accounts.insert(
            email.to_string(),
            StoredAccount {
                account: account.clone(),
                password_hash,
            },
        );

        info!(account_id = %account.id, "Account created");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    proptest! {
        #[test]
        fn avatar_is_at_most_two_uppercase_chars(name in "[a-zA-Z ]{0,40}") {
            let avatar = avatar_initials(&name);
            prop_assert!(avatar.chars().count() <= 2);
            prop_assert_eq!(avatar.clone(), avatar.to_uppercase());
        }
    }

    #[rstest]
    #[case("Alex Carter", "AC")]
    #[case("  jane  ", "J")]
    #[case("mary ann lee", "MA")]
    #[case("Ömer yıldız", "ÖY")]
    fn test_avatar_initials(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(avatar_initials(name), expected);
    }

    #[tokio::test]
    async fn test_demo_sign_in() {
        let directory = AccountDirectory::with_demo_accounts().unwrap();
        assert_eq!(directory.len(), 2);

        let account = directory.sign_in("alex@irontrack.io", "alex123").await.unwrap();
        assert_eq!(account.avatar, "AC");
        let profile = account.profile.unwrap();
        assert_eq!(profile.goal(), Goal::MuscleGain);
        assert_eq!(profile.occupation(), Occupation::Desk);

        let demo = directory.sign_in("demo@fit.com", "demo123").await.unwrap();
        assert_eq!(demo.profile.unwrap().gender(), Gender::Female);
    }

    #[rstest]
    #[case("alex@irontrack.io", "wrong-pass", AuthError::InvalidCredentials)]
    #[case("nobody@irontrack.io", "alex123", AuthError::InvalidCredentials)]
    #[case("not-an-email", "alex123", AuthError::InvalidEmail)]
    #[case("alex@irontrack.io", "abc", AuthError::PasswordTooShort)]
    #[tokio::test]
    async fn test_sign_in_failures(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: AuthError,
    ) {
        let directory = AccountDirectory::with_demo_accounts().unwrap();
        assert_eq!(directory.sign_in(email, password).await.unwrap_err(), expected);
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let directory = AccountDirectory::empty();
        let created = directory
            .sign_up(" Sam Rivera ", "sam@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(created.name, "Sam Rivera");
        assert_eq!(created.avatar, "SR");
        assert!(created.profile.is_none());

        let signed_in = directory.sign_in("sam@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.id, created.id);
    }

    #[tokio::test]
    async fn test_sign_up_rejections() {
        let directory = AccountDirectory::with_demo_accounts().unwrap();
        assert_eq!(
            directory.sign_up("Alex", "alex@irontrack.io", "alex123").await,
            Err(AuthError::AccountExists)
        );
        assert_eq!(
            directory.sign_up("   ", "new@fit.com", "secret1").await,
            Err(AuthError::MissingName)
        );
    }
}
