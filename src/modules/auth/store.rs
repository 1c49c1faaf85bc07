use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a single stored user with their authentication details.
/// Field names are pinned to the on-disk format shared with the rest of
/// the application.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(rename = "nome")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "senha_hash")]
    pub password_hash: String,
    #[serde(rename = "senha_salt")]
    pub password_salt: String,
    #[serde(rename = "pergunta")]
    pub security_question: String,
    #[serde(rename = "resposta_hash")]
    pub answer_hash: String,
    #[serde(rename = "resposta_salt")]
    pub answer_salt: String,
    #[serde(rename = "criado_em")]
    pub created_at: u64,
    #[serde(rename = "ativo")]
    pub active: bool,
    pub roles: Vec<String>,
}

/// Pending password-recovery grant, keyed in the document by its token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecoveryRecord {
    pub user_id: String,
    #[serde(rename = "expira_em")]
    pub expires_at: u64,
}

/// In-memory view of the backing document. The two managed collections
/// always exist; top-level keys owned by other parts of the application
/// are carried through load/save untouched.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub users: Vec<UserRecord>,
    pub recoveries: HashMap<String, RecoveryRecord>,
    pub extra: Map<String, Value>,
}

/// Custom error type for document persistence
#[derive(Debug)]
pub enum StoreError {
    Serialize(serde_json::Error),
    Io(io::Error),
}

impl From<io::Error> for StoreError {
    fn from(error: io::Error) -> Self {
        StoreError::Io(error)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialize(error)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Serialize(e) => write!(f, "Serialization error: {}", e),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

const USERS_KEY: &str = "usuarios";
const RECOVERIES_KEY: &str = "recuperacoes";

/// File-backed store for the user/recovery document.
pub struct AuthStore {
    path: PathBuf,
}

impl AuthStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the backing document. A missing or unreadable file and any
    /// malformed content degrade to an empty document, never an error.
    pub fn load(&self) -> Document {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Document::default(),
            Err(e) => {
                warn!("Could not read {}: {}", self.path.display(), e);
                return Document::default();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Backing document {} is not valid JSON, starting empty: {}",
                    self.path.display(),
                    e
                );
                return Document::default();
            }
        };

        Self::normalize(value, &self.path)
    }

    /// Persist the whole document, overwriting the previous contents.
    /// Unlike loading, persistence failures are surfaced to the caller.
    pub fn save(&self, document: &Document) -> Result<(), StoreError> {
        let mut object = document.extra.clone();
        object.insert(USERS_KEY.to_string(), serde_json::to_value(&document.users)?);
        object.insert(
            RECOVERIES_KEY.to_string(),
            serde_json::to_value(&document.recoveries)?,
        );

        // Pretty JSON with keys in stable order; serde_json leaves
        // non-ASCII characters unescaped.
        let text = serde_json::to_string_pretty(&Value::Object(object))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    /// Pull the two managed collections out of the raw value, replacing
    /// anything of the wrong shape with an empty collection. All other
    /// top-level keys are kept as-is.
    fn normalize(value: Value, path: &Path) -> Document {
        let mut object = match value {
            Value::Object(map) => map,
            _ => {
                warn!(
                    "Backing document {} is not an object, starting empty",
                    path.display()
                );
                return Document::default();
            }
        };

        let users = match object.remove(USERS_KEY) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("User list in {} is malformed, resetting: {}", path.display(), e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        let recoveries = match object.remove(RECOVERIES_KEY) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(
                    "Recovery map in {} is malformed, resetting: {}",
                    path.display(),
                    e
                );
                HashMap::new()
            }),
            None => HashMap::new(),
        };

        Document {
            users,
            recoveries,
            extra: object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> AuthStore {
        AuthStore::new(dir.path().join("db.json"))
    }

    fn sample_user() -> UserRecord {
        UserRecord {
            id: "0011223344556677".to_string(),
            username: "alice".to_string(),
            full_name: "Alice da Conceição".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "a".repeat(64),
            password_salt: "b".repeat(32),
            security_question: "Favourite colour?".to_string(),
            answer_hash: "c".repeat(64),
            answer_salt: "d".repeat(32),
            created_at: 1_700_000_000,
            active: true,
            roles: vec!["cliente".to_string()],
        }
    }

    #[test]
    fn test_missing_file_yields_empty_document() {
        let dir = tempdir().unwrap();
        let document = store_in(&dir).load();
        assert!(document.users.is_empty());
        assert!(document.recoveries.is_empty());
    }

    #[test]
    fn test_invalid_json_yields_empty_document() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json at all").unwrap();

        let document = store.load();
        assert!(document.users.is_empty());
        assert!(document.recoveries.is_empty());
    }

    #[test]
    fn test_non_object_top_level_yields_empty_document() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"["not", "a", "dict"]"#).unwrap();

        let document = store.load();
        assert!(document.users.is_empty());
        assert!(document.recoveries.is_empty());
    }

    #[test]
    fn test_wrong_shaped_managed_keys_are_reset() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"usuarios": {"oops": true}, "recuperacoes": [1, 2], "config": {"tema": "escuro"}}"#,
        )
        .unwrap();

        let document = store.load();
        assert!(document.users.is_empty());
        assert!(document.recoveries.is_empty());
        // Keys this store does not manage survive normalization.
        assert!(document.extra.contains_key("config"));
    }

    #[test]
    fn test_save_preserves_unmanaged_keys() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"usuarios": [], "config": {"tema": "escuro"}}"#,
        )
        .unwrap();

        let mut document = store.load();
        document.users.push(sample_user());
        store.save(&document).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.users.len(), 1);
        assert_eq!(
            reloaded.extra.get("config").and_then(|c| c.get("tema")),
            Some(&serde_json::json!("escuro"))
        );
    }

    #[test]
    fn test_save_load_round_trip_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let mut document = Document::default();
        document.users.push(sample_user());
        document.recoveries.insert(
            "tok-1".to_string(),
            RecoveryRecord {
                user_id: "0011223344556677".to_string(),
                expires_at: 1_700_000_900,
            },
        );
        store.save(&document).unwrap();

        let first = std::fs::read_to_string(store.path()).unwrap();
        store.save(&store.load()).unwrap();
        let second = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_ascii_is_stored_verbatim() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let mut document = Document::default();
        document.users.push(sample_user());
        store.save(&document).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("Alice da Conceição"));

        let reloaded = store.load();
        assert_eq!(reloaded.users[0].full_name, "Alice da Conceição");
    }

    #[test]
    fn test_user_record_wire_field_names() {
        let json = serde_json::to_value(sample_user()).unwrap();
        for key in [
            "id",
            "username",
            "nome",
            "email",
            "senha_hash",
            "senha_salt",
            "pergunta",
            "resposta_hash",
            "resposta_salt",
            "criado_em",
            "ativo",
            "roles",
        ] {
            assert!(json.get(key).is_some(), "missing wire field {}", key);
        }
    }

    #[test]
    fn test_save_into_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let store = AuthStore::new(dir.path().join("no-such-dir").join("db.json"));
        let result = store.save(&Document::default());
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
