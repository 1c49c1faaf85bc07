use serde::Serialize;

use super::hashing::{
    constant_time_eq, generate_recovery_token, generate_user_id, hash_password, hash_text,
};
use super::store::{AuthStore, Document, RecoveryRecord, StoreError, UserRecord};
use crate::modules::utils::logging::log_auth_event;
use crate::modules::utils::time::current_timestamp;
use crate::RECOVERY_TOKEN_TTL_SECS;

/// Role assigned to every newly registered account. Wire value shared
/// with the rest of the application.
const DEFAULT_ROLE: &str = "cliente";

const FALLBACK_QUESTION: &str = "Security question";

/// Failure taxonomy for authentication operations. Every variant carries
/// the message shown to the user; none of these are ever panics.
#[derive(Debug)]
pub enum AuthError {
    Validation(String),
    Conflict(String),
    NotFound(String),
    Inactive(String),
    InvalidCredential(String),
    InvalidToken(String),
    ExpiredToken(String),
    WrongAnswer(String),
    Storage(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(error: StoreError) -> Self {
        AuthError::Storage(error)
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Validation(msg)
            | AuthError::Conflict(msg)
            | AuthError::NotFound(msg)
            | AuthError::Inactive(msg)
            | AuthError::InvalidCredential(msg)
            | AuthError::InvalidToken(msg)
            | AuthError::ExpiredToken(msg)
            | AuthError::WrongAnswer(msg) => write!(f, "{}", msg),
            AuthError::Storage(e) => write!(f, "Storage failure: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

/// User record with all hash/salt fields stripped, safe to hand to
/// non-auth code.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub security_question: String,
    pub created_at: u64,
    pub active: bool,
    pub roles: Vec<String>,
}

impl From<&UserRecord> for PublicUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            security_question: user.security_question.clone(),
            created_at: user.created_at,
            active: user.active,
            roles: user.roles.clone(),
        }
    }
}

/// Token plus security question handed back by `begin_recovery`.
#[derive(Debug, Clone)]
pub struct RecoveryChallenge {
    pub token: String,
    pub question: String,
}

/// User directory and credential lifecycle. Each operation performs a
/// full load-mutate-save cycle against the backing store; the tool is
/// single-process and single-user, so no locking is attempted.
pub struct AuthService {
    store: AuthStore,
}

impl AuthService {
    pub fn new(store: AuthStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    /// Username matches take priority over email matches; within each
    /// field, the first record in storage order wins.
    fn find_in<'a>(document: &'a Document, login: &str) -> Option<&'a UserRecord> {
        document
            .users
            .iter()
            .find(|u| u.username == login)
            .or_else(|| document.users.iter().find(|u| u.email == login))
    }

    pub fn find_user_by_login(&self, login: &str) -> Option<PublicUser> {
        let document = self.store.load();
        Self::find_in(&document, login).map(PublicUser::from)
    }

    pub fn list_users(&self) -> Vec<PublicUser> {
        self.store
            .load()
            .users
            .iter()
            .map(PublicUser::from)
            .collect()
    }

    /// Register a new account. Username and email must be unique across
    /// the directory; the username check runs first.
    pub fn create_user(
        &self,
        username: &str,
        full_name: &str,
        email: &str,
        password: &str,
        security_question: &str,
        security_answer: &str,
    ) -> Result<String, AuthError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Fill in username, e-mail and password.".to_string(),
            ));
        }

        let mut document = self.store.load();
        for user in &document.users {
            if user.username == username {
                return Err(AuthError::Conflict(
                    "A user with that username already exists.".to_string(),
                ));
            }
            if user.email == email {
                return Err(AuthError::Conflict(
                    "A user with that e-mail already exists.".to_string(),
                ));
            }
        }

        // Password and security answer get independent salts.
        let (password_hash, password_salt) = hash_password(password, None);
        let (answer_hash, answer_salt) = hash_password(security_answer, None);

        document.users.push(UserRecord {
            id: generate_user_id(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash,
            password_salt,
            security_question: security_question.to_string(),
            answer_hash,
            answer_salt,
            created_at: current_timestamp(),
            active: true,
            roles: vec![DEFAULT_ROLE.to_string()],
        });
        self.store.save(&document)?;

        log_auth_event("register", username, true, None);
        Ok("User created successfully.".to_string())
    }

    /// Check credentials and return a sanitized copy of the record. The
    /// caller treats the returned value as proof of authentication for
    /// the rest of the process lifetime; no session token is issued.
    pub fn validate_login(&self, login: &str, password: &str) -> Result<PublicUser, AuthError> {
        let document = self.store.load();
        let user = Self::find_in(&document, login)
            .ok_or_else(|| AuthError::NotFound("User not found.".to_string()))?;

        if !user.active {
            return Err(AuthError::Inactive("User is inactive.".to_string()));
        }

        let supplied = hash_text(password, &user.password_salt);
        if !constant_time_eq(&supplied, &user.password_hash) {
            return Err(AuthError::InvalidCredential("Invalid password.".to_string()));
        }

        Ok(PublicUser::from(user))
    }

    /// Start the password-recovery flow for a login, returning the token
    /// and the stored security question.
    pub fn begin_recovery(&self, login: &str) -> Result<RecoveryChallenge, AuthError> {
        let mut document = self.store.load();
        let user = Self::find_in(&document, login)
            .cloned()
            .ok_or_else(|| AuthError::NotFound("User not found.".to_string()))?;

        let token = generate_recovery_token();
        document.recoveries.insert(
            token.clone(),
            RecoveryRecord {
                user_id: user.id.clone(),
                expires_at: current_timestamp() + RECOVERY_TOKEN_TTL_SECS,
            },
        );
        self.store.save(&document)?;

        let question = if user.security_question.is_empty() {
            FALLBACK_QUESTION.to_string()
        } else {
            user.security_question
        };
        Ok(RecoveryChallenge { token, question })
    }

    /// Finish a recovery attempt. The token is single-use: any outcome
    /// past the token lookup removes it from the document, so a repeat
    /// call always fails with `InvalidToken`.
    pub fn conclude_recovery(
        &self,
        token: &str,
        answer: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let mut document = self.store.load();
        let recovery = match document.recoveries.get(token) {
            Some(recovery) => recovery.clone(),
            None => return Err(AuthError::InvalidToken("Invalid token.".to_string())),
        };

        if recovery.expires_at < current_timestamp() {
            document.recoveries.remove(token);
            self.store.save(&document)?;
            return Err(AuthError::ExpiredToken(
                "Token expired. Start again.".to_string(),
            ));
        }

        let index = match document.users.iter().position(|u| u.id == recovery.user_id) {
            Some(index) => index,
            None => {
                // Orphaned token: the owning record is gone.
                document.recoveries.remove(token);
                self.store.save(&document)?;
                return Err(AuthError::NotFound("User not found.".to_string()));
            }
        };

        let supplied = hash_text(answer, &document.users[index].answer_salt);
        if !constant_time_eq(&supplied, &document.users[index].answer_hash) {
            document.recoveries.remove(token);
            self.store.save(&document)?;
            log_auth_event("recovery", &document.users[index].username, false, None);
            return Err(AuthError::WrongAnswer("Incorrect answer.".to_string()));
        }

        let (password_hash, password_salt) = hash_password(new_password, None);
        document.users[index].password_hash = password_hash;
        document.users[index].password_salt = password_salt;
        document.recoveries.remove(token);
        self.store.save(&document)?;

        log_auth_event("recovery", &document.users[index].username, true, None);
        Ok("Password reset successfully.".to_string())
    }
}
