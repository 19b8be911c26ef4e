use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::commands::{AuthenticatedAccount, LoginCommand, RegisterCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Account, Baby};
use crate::storage::JsonConnection;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_NAME_LENGTH: usize = 100;

/// Caregiver accounts and the babies they own.
///
/// Registration is gated by a deployment-wide invitation code; each account
/// creates and owns exactly one baby.
#[derive(Clone)]
pub struct AccountService {
    connection: JsonConnection,
    invitation_code: String,
}

impl AccountService {
    pub fn new(connection: JsonConnection, invitation_code: impl Into<String>) -> Self {
        Self {
            connection,
            invitation_code: invitation_code.into(),
        }
    }

    /// Create an account and its baby
    pub async fn register(&self, command: RegisterCommand) -> DomainResult<AuthenticatedAccount> {
        info!("Registering account: username={}", command.username.trim());

        if command.invitation_code.trim() != self.invitation_code {
            warn!("Registration rejected: invalid invitation code");
            return Err(DomainError::Forbidden("Invalid invitation code".to_string()));
        }
        self.validate_register_command(&command)?;

        let password_hash = hash_password(&command.password)?;
        let now = Utc::now();
        let baby = Baby {
            id: Uuid::new_v4().to_string(),
            name: command.baby_name.trim().to_string(),
            date_of_birth: command.date_of_birth,
            created_at: now,
        };
        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: command.username.trim().to_string(),
            password_hash,
            baby_id: baby.id.clone(),
            created_at: now,
        };

        let registered = self
            .connection
            .write(|db| -> DomainResult<AuthenticatedAccount> {
                if db.accounts.iter().any(|a| a.matches_username(&account.username)) {
                    return Err(DomainError::Conflict(format!(
                        "Username {} is already taken",
                        account.username
                    )));
                }
                db.babies.push(baby.clone());
                db.accounts.push(account.clone());
                Ok(AuthenticatedAccount { account, baby })
            })
            .await?;

        info!(
            "Registered account {} owning baby {}",
            registered.account.id, registered.baby.id
        );
        Ok(registered)
    }

    /// Verify credentials. Unknown users and wrong passwords are indistinguishable.
    pub async fn login(&self, command: LoginCommand) -> DomainResult<AuthenticatedAccount> {
        info!("Login attempt: username={}", command.username.trim());

        let found = self
            .connection
            .read(|db| {
                db.accounts
                    .iter()
                    .find(|a| a.matches_username(&command.username))
                    .map(|account| {
                        let baby = db.babies.iter().find(|b| b.id == account.baby_id).cloned();
                        (account.clone(), baby)
                    })
            })
            .await;

        let Some((account, baby)) = found else {
            warn!("Login failed: unknown username");
            return Err(DomainError::Unauthorized);
        };
        verify_password(&command.password, &account.password_hash)?;

        let baby = baby.ok_or_else(|| {
            warn!("Account {} references missing baby {}", account.id, account.baby_id);
            DomainError::not_found("Baby")
        })?;

        info!("Login succeeded for account {}", account.id);
        Ok(AuthenticatedAccount { account, baby })
    }

    /// Look up an account and its baby by account id
    pub async fn get(&self, account_id: &str) -> Option<AuthenticatedAccount> {
        self.connection
            .read(|db| {
                let account = db.accounts.iter().find(|a| a.id == account_id)?;
                let baby = db.babies.iter().find(|b| b.id == account.baby_id)?;
                Some(AuthenticatedAccount {
                    account: account.clone(),
                    baby: baby.clone(),
                })
            })
            .await
    }

    fn validate_register_command(&self, command: &RegisterCommand) -> DomainResult<()> {
        if command.username.trim().is_empty() {
            return Err(DomainError::validation("Username cannot be empty"));
        }
        if command.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if command.baby_name.trim().is_empty() {
            return Err(DomainError::validation("Baby name cannot be empty"));
        }
        if command.baby_name.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Baby name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        if command.date_of_birth > Utc::now().date_naive() {
            return Err(DomainError::validation("Date of birth cannot be in the future"));
        }
        Ok(())
    }
}

/// Hash a password with Argon2id and a random salt
fn hash_password(password: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> DomainResult<()> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Stored password hash is invalid: {e}"))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|e| {
            debug!("Password verification failed: {}", e);
            DomainError::Unauthorized
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn register_command(username: &str, invitation_code: &str) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            password: "correct horse".to_string(),
            baby_name: "Ada".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            invitation_code: invitation_code.to_string(),
        }
    }

    async fn service() -> (AccountService, tempfile::TempDir) {
        let (conn, dir) = JsonConnection::open_temp().await.unwrap();
        (AccountService::new(conn, "let-me-in"), dir)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _dir) = service().await;
        let registered = service.register(register_command("parent", "let-me-in")).await.unwrap();
        assert_eq!(registered.account.baby_id, registered.baby.id);
        assert!(registered.account.password_hash.starts_with("$argon2"));

        let logged_in = service
            .login(LoginCommand {
                username: "PARENT ".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.account.id, registered.account.id);
        assert_eq!(logged_in.baby.name, "Ada");
    }

    #[tokio::test]
    async fn test_wrong_invitation_code_creates_nothing() {
        let (service, _dir) = service().await;
        let err = service.register(register_command("parent", "guess")).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let counts = service
            .connection
            .read(|db| (db.accounts.len(), db.babies.len()))
            .await;
        assert_eq!(counts, (0, 0));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let (service, _dir) = service().await;
        service.register(register_command("parent", "let-me-in")).await.unwrap();
        let err = service.register(register_command("Parent", "let-me-in")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_unauthorized() {
        let (service, _dir) = service().await;
        service.register(register_command("parent", "let-me-in")).await.unwrap();

        let wrong_password = service
            .login(LoginCommand {
                username: "parent".to_string(),
                password: "incorrect".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = service
            .login(LoginCommand {
                username: "nobody".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, DomainError::Unauthorized));
        assert!(matches!(unknown, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let (service, _dir) = service().await;
        let mut command = register_command("parent", "let-me-in");
        command.password = "short".to_string();
        let err = service.register(command).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
