/// Account lifecycle: sign-up, sign-in, profile updates and deletion
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::AuthUser;
use crate::models::{normalize_email, NewUser, Role, User, UserChanges, DEFAULT_AVATAR_URL};
use crate::sanitize::clean_text;
use crate::storage::{ImageFolder, ImageStorage, ImageUpload};
use crypto_core::jwt::{JwtKeys, TokenSubject};
use crypto_core::password::{hash_password, verify_password};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

const BAD_CREDENTIALS: &str = "Incorrect Email or Password";

#[derive(Debug, Clone, Validate)]
pub struct SignUpInput {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password should be at least 6 characters long"))]
    pub password: String,
}

impl SignUpInput {
    pub fn new(full_name: &str, email: &str, password: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            email: normalize_email(email),
            password: password.to_string(),
        }
    }
}

/// Profile changes; blank fields count as not supplied.
#[derive(Debug, Clone, Default, Validate)]
pub struct AccountUpdateInput {
    pub full_name: Option<String>,
    #[validate(length(min = 6, message = "Password should be at least 6 characters long"))]
    pub password: Option<String>,
}

impl AccountUpdateInput {
    pub fn new(full_name: Option<&str>, password: Option<&str>) -> Self {
        Self {
            full_name: full_name
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            password: password.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }
}

/// Issued session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStorage>,
    keys: JwtKeys,
    admin_emails: Arc<HashSet<String>>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStorage>,
        keys: JwtKeys,
        admin_emails: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            users,
            images,
            keys,
            admin_emails: Arc::new(
                admin_emails
                    .into_iter()
                    .map(|e| normalize_email(&e))
                    .collect(),
            ),
        }
    }

    /// Lifetime of issued session tokens
    pub fn token_ttl_secs(&self) -> i64 {
        self.keys.ttl_secs()
    }

    fn role_for(&self, email: &str) -> Role {
        if self.admin_emails.contains(email) {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Register a new account. Role is fixed here for the account's lifetime.
    pub async fn sign_up(&self, input: SignUpInput, avatar: Option<ImageUpload>) -> Result<User> {
        input.validate()?;
        if let Some(avatar) = &avatar {
            avatar.validate()?;
        }

        if self.users.find_user_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let avatar_url = match &avatar {
            Some(upload) => self.images.save(ImageFolder::Avatars, upload).await?,
            None => DEFAULT_AVATAR_URL.to_string(),
        };

        let role = self.role_for(&input.email);
        let created = self
            .users
            .create_user(NewUser {
                email: input.email,
                full_name: clean_text(&input.full_name),
                password_hash,
                avatar_url: avatar_url.clone(),
                role,
            })
            .await;

        match created {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "account created");
                Ok(user)
            }
            Err(err) => {
                if let Err(cleanup) = self.images.remove(&avatar_url).await {
                    tracing::warn!(error = %cleanup, url = %avatar_url, "failed to remove avatar after sign-up error");
                }
                Err(err)
            }
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email);

        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) if verify_password(password, &user.password_hash)? => user,
            _ => {
                metrics::record_sign_in(false);
                tracing::info!("sign-in rejected");
                return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
            }
        };

        let token = self.keys.issue(&TokenSubject {
            user_id: user.id,
            email: &user.email,
            name: &user.full_name,
            role: user.role.as_str(),
        })?;

        metrics::record_sign_in(true);
        tracing::info!(user_id = %user.id, "signed in");
        Ok(Session { token, user })
    }

    pub async fn profile(&self, actor: &AuthUser) -> Result<User> {
        self.users
            .find_user_by_id(actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Apply supplied changes. A new avatar replaces the old one, whose file
    /// is removed unless it is the shared default.
    pub async fn update_account(
        &self,
        actor: &AuthUser,
        input: AccountUpdateInput,
        avatar: Option<ImageUpload>,
    ) -> Result<User> {
        input.validate()?;
        if let Some(avatar) = &avatar {
            avatar.validate()?;
        }

        let current = self.profile(actor).await?;

        let mut changes = UserChanges {
            full_name: input.full_name.as_deref().map(clean_text),
            password_hash: input.password.as_deref().map(hash_password).transpose()?,
            avatar_url: None,
        };
        if let Some(upload) = &avatar {
            changes.avatar_url = Some(self.images.save(ImageFolder::Avatars, upload).await?);
        }

        if changes.is_empty() {
            return Ok(current);
        }

        let new_avatar = changes.avatar_url.clone();
        let updated = match self.users.update_user(actor.id, changes).await {
            Ok(user) => user,
            Err(err) => {
                if let Some(url) = new_avatar {
                    if let Err(cleanup) = self.images.remove(&url).await {
                        tracing::warn!(error = %cleanup, url = %url, "failed to remove avatar after update error");
                    }
                }
                return Err(err);
            }
        };

        if new_avatar.is_some() && current.avatar_url != updated.avatar_url {
            if let Err(err) = self.images.remove(&current.avatar_url).await {
                tracing::warn!(error = %err, url = %current.avatar_url, "failed to remove replaced avatar");
            }
        }

        tracing::info!(user_id = %actor.id, "account updated");
        Ok(updated)
    }

    /// Remove the avatar file (unless it is the default) and then the
    /// account. Posts and comments by the user are left in place.
    pub async fn delete_account(&self, actor: &AuthUser) -> Result<()> {
        let user = self.profile(actor).await?;

        self.images.remove(&user.avatar_url).await?;

        if !self.users.delete_user(user.id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = %user.id, "account deleted");
        Ok(())
    }
}
