//! In-memory identity store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::UserId;
use taskhub_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::store::UserStore;

/// Identity store keyed by id with a lowercased-email uniqueness index.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    by_id: DashMap<UserId, User>,
    by_email: DashMap<String, UserId>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.by_id.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.by_email.get(&email.to_lowercase()).map(|e| *e.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let email = data.email.to_lowercase();
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: data.name.clone(),
            email: email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            profile_image: data.profile_image.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.by_email.entry(email) {
            Entry::Occupied(_) => return Err(AppError::conflict("User already exists")),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_name(&self, id: UserId, name: &str) -> AppResult<Option<User>> {
        Ok(self.by_id.get_mut(&id).map(|mut user| {
            user.name = name.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_account(&self, id: UserId, changes: &UpdateUser) -> AppResult<Option<User>> {
        let Some(current_email) = self.by_id.get(&id).map(|u| u.email.clone()) else {
            return Ok(None);
        };
        let new_email = changes
            .email
            .as_deref()
            .map(str::to_lowercase)
            .filter(|e| *e != current_email);

        if let Some(email) = &new_email {
            match self.by_email.entry(email.clone()) {
                Entry::Occupied(_) => return Err(AppError::conflict("User already exists")),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }

        let updated = self.by_id.get_mut(&id).map(|mut user| {
            if let Some(name) = &changes.name {
                user.name = name.clone();
            }
            if let Some(email) = &new_email {
                user.email = email.clone();
            }
            if let Some(hash) = &changes.password_hash {
                user.password_hash = hash.clone();
            }
            if let Some(image) = &changes.profile_image {
                user.profile_image = Some(image.clone());
            }
            user.updated_at = Utc::now();
            user.clone()
        });

        if let Some(email) = &new_email {
            let released = if updated.is_some() { &current_email } else { email };
            self.by_email.remove_if(released, |_, owner| *owner == id);
        }
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let Some((_, user)) = self.by_id.remove(&id) else {
            return Ok(false);
        };
        self.by_email.remove_if(&user.email, |_, owner| *owner == id);
        Ok(true)
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .by_id
            .iter()
            .filter(|u| u.role == role)
            .map(|u| u.value().clone())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        Ok(self.by_id.iter().filter(|u| u.role == role).count() as u64)
    }
}
