use chrono::Utc;
use uuid::Uuid;

use optica_domain::pagination::{PageMeta, PageRequest};
use optica_domain::role::Role;

use crate::auth::password::{generate_temp_password, hash_password};
use crate::authz::{Actor, forbid_self_delete};
use crate::domain::repository::UserRepository;
use crate::domain::types::{User, valid_email};
use crate::error::{ApiError, FieldError};

fn validate_credentials(email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !valid_email(email) {
        errors.push(FieldError::new("email", "is not a valid email address"));
    }
    if password.chars().count() < 6 {
        errors.push(FieldError::new("password", "must be at least 6 characters"));
    }
    errors
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiError> {
        let errors = validate_credentials(&input.email, &input.password);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        if self.repo.email_exists(&input.email, None).await? {
            return Err(ApiError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash: hash_password(&input.password)?,
            role: input.role,
            jti: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── Signup ───────────────────────────────────────────────────────────────────

/// Open self-registration. Always creates a `sales` account; roles are
/// granted by an admin afterwards.
pub struct SignupUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SignupUseCase<R> {
    pub async fn execute(&self, email: String, password: String) -> Result<User, ApiError> {
        CreateUserUseCase { repo: &self.repo }
            .execute(CreateUserInput {
                email,
                password,
                role: Role::Sales,
            })
            .await
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<(Vec<User>, PageMeta), ApiError> {
        let page = page.clamped();
        let (users, total) = self.repo.list(page).await?;
        Ok((users, PageMeta::new(page, total)))
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, input: UpdateUserInput) -> Result<User, ApiError> {
        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let mut errors = Vec::new();
        if let Some(ref email) = input.email {
            if !valid_email(email) {
                errors.push(FieldError::new("email", "is not a valid email address"));
            }
        }
        if let Some(ref password) = input.password {
            if password.chars().count() < 6 {
                errors.push(FieldError::new("password", "must be at least 6 characters"));
            }
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if let Some(email) = input.email {
            if self.repo.email_exists(&email, Some(user_id)).await? {
                return Err(ApiError::EmailTaken);
            }
            user.email = email;
        }
        if let Some(password) = input.password {
            user.password_hash = hash_password(&password)?;
            // A password change invalidates every outstanding token.
            user.jti = Uuid::now_v7();
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        self.repo.update(&user).await?;
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, actor: &Actor, user_id: Uuid) -> Result<(), ApiError> {
        forbid_self_delete(actor, user_id)?;
        if !self.repo.delete(user_id).await? {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ResetPasswordOutput {
    /// Shown to the admin exactly once; only the hash is stored.
    pub temp_password: String,
}

pub struct ResetPasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ResetPasswordUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<ResetPasswordOutput, ApiError> {
        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let temp_password = generate_temp_password();
        user.password_hash = hash_password(&temp_password)?;
        user.jti = Uuid::now_v7();
        user.updated_at = Utc::now();
        self.repo.update(&user).await?;

        Ok(ResetPasswordOutput { temp_password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use std::sync::Mutex;

    struct MockUserRepo {
        user: Option<User>,
        email_taken: bool,
        created: Mutex<Option<User>>,
        updated: Mutex<Option<User>>,
        deleted: Mutex<bool>,
    }

    impl MockUserRepo {
        fn new(user: Option<User>) -> Self {
            Self {
                user,
                email_taken: false,
                created: Mutex::new(None),
                updated: Mutex::new(None),
                deleted: Mutex::new(false),
            }
        }
    }

    impl UserRepository for MockUserRepo {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, ApiError> {
            Ok(self.user.clone())
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, ApiError> {
            Ok(self.user.clone())
        }
        async fn email_exists(
            &self,
            _email: &str,
            _exclude: Option<Uuid>,
        ) -> Result<bool, ApiError> {
            Ok(self.email_taken)
        }
        async fn list(&self, _page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
            Ok((self.user.clone().into_iter().collect(), 23))
        }
        async fn create(&self, user: &User) -> Result<(), ApiError> {
            *self.created.lock().unwrap() = Some(user.clone());
            Ok(())
        }
        async fn update(&self, user: &User) -> Result<(), ApiError> {
            *self.updated.lock().unwrap() = Some(user.clone());
            Ok(())
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, ApiError> {
            *self.deleted.lock().unwrap() = true;
            Ok(self.user.is_some())
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::now_v7(),
            email: "ana@example.com".into(),
            password_hash: hash_password("old-password").unwrap(),
            role: Role::Sales,
            jti: Uuid::now_v7(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn should_create_user_with_hashed_password() {
        let usecase = CreateUserUseCase {
            repo: MockUserRepo::new(None),
        };
        let user = usecase
            .execute(CreateUserInput {
                email: "new@example.com".into(),
                password: "secret-enough".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_ne!(user.password_hash, "secret-enough");
        assert!(verify_password("secret-enough", &user.password_hash).unwrap());
        assert!(usecase.repo.created.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn should_reject_invalid_email_and_short_password() {
        let usecase = CreateUserUseCase {
            repo: MockUserRepo::new(None),
        };
        let result = usecase
            .execute(CreateUserInput {
                email: "bogus".into(),
                password: "short".into(),
                role: Role::Sales,
            })
            .await;
        let Err(ApiError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn should_reject_taken_email() {
        let mut repo = MockUserRepo::new(None);
        repo.email_taken = true;
        let usecase = CreateUserUseCase { repo };
        let result = usecase
            .execute(CreateUserInput {
                email: "dup@example.com".into(),
                password: "secret-enough".into(),
                role: Role::Sales,
            })
            .await;
        assert!(matches!(result, Err(ApiError::EmailTaken)));
    }

    #[tokio::test]
    async fn should_signup_as_sales_only() {
        let usecase = SignupUseCase {
            repo: MockUserRepo::new(None),
        };
        let user = usecase
            .execute("fresh@example.com".into(), "secret-enough".into())
            .await
            .unwrap();
        assert_eq!(user.role, Role::Sales);
    }

    #[tokio::test]
    async fn should_list_users_with_page_meta() {
        let usecase = ListUsersUseCase {
            repo: MockUserRepo::new(Some(test_user())),
        };
        let (users, meta) = usecase.execute(PageRequest::default()).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(meta.total_count, 23);
        assert_eq!(meta.total_pages, 3);
    }

    #[tokio::test]
    async fn should_rotate_jti_on_password_change_only() {
        let user = test_user();
        let old_jti = user.jti;

        let usecase = UpdateUserUseCase {
            repo: MockUserRepo::new(Some(user.clone())),
        };
        usecase
            .execute(
                user.id,
                UpdateUserInput {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = usecase.repo.updated.lock().unwrap().clone().unwrap();
        assert_eq!(updated.jti, old_jti);
        assert_eq!(updated.role, Role::Admin);

        let usecase = UpdateUserUseCase {
            repo: MockUserRepo::new(Some(user.clone())),
        };
        usecase
            .execute(
                user.id,
                UpdateUserInput {
                    password: Some("brand-new-pw".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = usecase.repo.updated.lock().unwrap().clone().unwrap();
        assert_ne!(updated.jti, old_jti);
        assert!(verify_password("brand-new-pw", &updated.password_hash).unwrap());
    }

    #[tokio::test]
    async fn should_forbid_deleting_own_account() {
        let user = test_user();
        let usecase = DeleteUserUseCase {
            repo: MockUserRepo::new(Some(user.clone())),
        };
        let actor = Actor {
            id: user.id,
            role: Role::Admin,
        };
        let result = usecase.execute(&actor, user.id).await;
        assert!(matches!(result, Err(ApiError::Forbidden)));
        assert!(!*usecase.repo.deleted.lock().unwrap());
    }

    #[tokio::test]
    async fn should_delete_other_user() {
        let user = test_user();
        let usecase = DeleteUserUseCase {
            repo: MockUserRepo::new(Some(user.clone())),
        };
        let actor = Actor {
            id: Uuid::now_v7(),
            role: Role::Admin,
        };
        usecase.execute(&actor, user.id).await.unwrap();
        assert!(*usecase.repo.deleted.lock().unwrap());
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_user() {
        let usecase = DeleteUserUseCase {
            repo: MockUserRepo::new(None),
        };
        let actor = Actor {
            id: Uuid::now_v7(),
            role: Role::Admin,
        };
        let result = usecase.execute(&actor, Uuid::now_v7()).await;
        assert!(matches!(result, Err(ApiError::UserNotFound)));
    }

    #[tokio::test]
    async fn should_reset_password_and_rotate_jti() {
        let user = test_user();
        let old_jti = user.jti;
        let usecase = ResetPasswordUseCase {
            repo: MockUserRepo::new(Some(user.clone())),
        };
        let output = usecase.execute(user.id).await.unwrap();

        assert_eq!(output.temp_password.len(), 16);
        let updated = usecase.repo.updated.lock().unwrap().clone().unwrap();
        assert_ne!(updated.jti, old_jti);
        assert!(verify_password(&output.temp_password, &updated.password_hash).unwrap());
    }
}
