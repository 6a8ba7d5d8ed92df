//! Profile service

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Currency, UserProfile};
use crate::storage::Storage;

pub struct ProfileService<'a> {
    storage: &'a Storage,
}

/// Fields for creating or updating the profile
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub currency: Option<Currency>,
}

impl<'a> ProfileService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> TallyResult<Option<UserProfile>> {
        self.storage.profile.get()
    }

    pub fn require(&self) -> TallyResult<UserProfile> {
        self.get()?.ok_or_else(TallyError::profile_not_found)
    }

    /// Create the profile, or update the fields given in `input`
    pub fn save(&self, input: ProfileInput) -> TallyResult<UserProfile> {
        match self.storage.profile.get()? {
            Some(before) => {
                let mut profile = before.clone();
                if let Some(name) = &input.name {
                    profile.name = name.trim().to_string();
                }
                if let Some(email) = &input.email {
                    profile.email = email.trim().to_string();
                }
                if let Some(currency) = input.currency {
                    profile.currency = currency;
                }
                profile.validate()?;
                profile.touch();

                self.storage.profile.save(profile.clone())?;
                self.storage.log_update(
                    EntityType::Profile,
                    profile.id.to_string(),
                    Some(profile.name.clone()),
                    &before,
                    &profile,
                );
                Ok(profile)
            }
            None => {
                let profile = UserProfile::new(
                    input.name.as_deref().unwrap_or_default().trim(),
                    input.email.as_deref().unwrap_or_default().trim(),
                    input.currency.unwrap_or_default(),
                );
                profile.validate()?;

                self.storage.profile.save(profile.clone())?;
                self.storage.log_create(
                    EntityType::Profile,
                    profile.id.to_string(),
                    Some(profile.name.clone()),
                    &profile,
                );
                Ok(profile)
            }
        }
    }

    pub fn delete(&self) -> TallyResult<UserProfile> {
        let profile = self
            .storage
            .profile
            .clear()?
            .ok_or_else(TallyError::profile_not_found)?;

        self.storage.log_delete(
            EntityType::Profile,
            profile.id.to_string(),
            Some(profile.name.clone()),
            &profile,
        );
        Ok(profile)
    }
}
