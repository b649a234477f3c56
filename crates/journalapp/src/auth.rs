use crate::error::{JournalError, Result};
use crate::store::BlobStore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

/// Namespace of the credentials blob; empty means the store root.
const CREDENTIALS_NAMESPACE: &str = "";

/// Special characters the password rule accepts.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name shown in greetings; not the login name.
    pub name: String,
    pub salt: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub usernames: HashMap<String, UserRecord>,
}

/// Credential storage and verification over the blob store.
///
/// A plain service without hidden state: every operation takes the store it
/// should talk to. Passwords are stored as salted SHA-256 hashes; cookie and
/// session handling belong to the caller, not here.
pub struct CredentialStore {
    filename: String,
}

impl CredentialStore {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// Loads the credentials blob, defaulting to an empty user table when
    /// the file does not exist yet.
    pub fn load<B: BlobStore>(&self, store: &B) -> Result<Credentials> {
        match store.read(CREDENTIALS_NAMESPACE, &self.filename) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.is_not_found() => Ok(Credentials::default()),
            Err(err) => Err(err),
        }
    }

    pub fn save<B: BlobStore>(&self, store: &B, credentials: &Credentials) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(credentials)?;
        store.write(CREDENTIALS_NAMESPACE, &self.filename, &bytes)
    }

    pub fn register<B: BlobStore>(
        &self,
        store: &B,
        username: &str,
        display_name: &str,
        password: &str,
    ) -> Result<()> {
        validate_password(password).map_err(JournalError::Auth)?;

        let mut credentials = self.load(store)?;
        if credentials.usernames.contains_key(username) {
            return Err(JournalError::Auth(format!(
                "user '{}' already exists",
                username
            )));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            name: display_name.to_string(),
            password_hash: hash_password(&salt, password),
            salt,
        };
        credentials.usernames.insert(username.to_string(), record);
        self.save(store, &credentials)
    }

    /// Pure request/response check; unknown users and wrong passwords both
    /// come back as `false`.
    pub fn verify<B: BlobStore>(&self, store: &B, username: &str, password: &str) -> Result<bool> {
        let credentials = self.load(store)?;
        Ok(credentials
            .usernames
            .get(username)
            .map(|record| record.password_hash == hash_password(&record.salt, password))
            .unwrap_or(false))
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Registration password rule: 8-20 characters with at least one uppercase
/// letter, one digit and one special character.
pub fn validate_password(password: &str) -> std::result::Result<(), String> {
    let length = password.chars().count();
    if !(8..=20).contains(&length) {
        return Err("password must be 8-20 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("password must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("password must contain a digit".to_string());
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(format!(
            "password must contain one of {}",
            PASSWORD_SPECIALS
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemBlobStore;

    #[test]
    fn test_load_without_file_yields_empty_table() {
        let store = MemBlobStore::new();
        let credentials = CredentialStore::new("credentials.json")
            .load(&store)
            .unwrap();
        assert!(credentials.usernames.is_empty());
    }

    #[test]
    fn test_register_and_verify() {
        let store = MemBlobStore::new();
        let auth = CredentialStore::new("credentials.json");

        auth.register(&store, "melina", "Melina", "Sicher1!x").unwrap();

        assert!(auth.verify(&store, "melina", "Sicher1!x").unwrap());
        assert!(!auth.verify(&store, "melina", "falsch1!X").unwrap());
        assert!(!auth.verify(&store, "niemand", "Sicher1!x").unwrap());
    }

    #[test]
    fn test_register_rejects_duplicate_user() {
        let store = MemBlobStore::new();
        let auth = CredentialStore::new("credentials.json");

        auth.register(&store, "melina", "Melina", "Sicher1!x").unwrap();
        let err = auth
            .register(&store, "melina", "Melina", "Sicher1!x")
            .unwrap_err();
        assert!(matches!(err, JournalError::Auth(_)));
    }

    #[test]
    fn test_credentials_persist_across_instances() {
        let store = MemBlobStore::new();
        CredentialStore::new("credentials.json")
            .register(&store, "melina", "Melina", "Sicher1!x")
            .unwrap();

        let again = CredentialStore::new("credentials.json");
        assert!(again.verify(&store, "melina", "Sicher1!x").unwrap());
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let store = MemBlobStore::new();
        let auth = CredentialStore::new("credentials.json");
        auth.register(&store, "melina", "Melina", "Sicher1!x").unwrap();

        let raw = store.read("", "credentials.json").unwrap();
        let text = String::from_utf8(raw).unwrap();
        assert!(!text.contains("Sicher1!x"));
    }

    #[test]
    fn test_password_rule() {
        assert!(validate_password("Sicher1!x").is_ok());

        // Too short, no uppercase, no digit, no special character.
        assert!(validate_password("S1!a").is_err());
        assert!(validate_password("sicher1!x").is_err());
        assert!(validate_password("SicherX!y").is_err());
        assert!(validate_password("Sicher1xy").is_err());

        // Too long.
        assert!(validate_password("S1!aaaaaaaaaaaaaaaaaaaaaa").is_err());
    }
}
