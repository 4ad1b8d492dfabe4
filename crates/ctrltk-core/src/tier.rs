use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Ordered permission level attached to every configured user.
///
/// The derived `Ord` follows declaration order, so `Read < Write < Admin`
/// gives the gate its "at least" comparisons. `Read` is the floor: any
/// authenticated identity satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Read,
    Write,
    Admin,
}

impl Tier {
    /// Whether this tier grants everything `required` grants.
    pub fn satisfies(self, required: Tier) -> bool {
        self >= required
    }
}

/// Authenticated caller, valid for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub tier: Tier,
}

#[derive(Debug, Clone)]
struct CredentialRecord {
    secret_digest: [u8; 32],
    tier: Tier,
}

/// Errors raised while building a [`CredentialStore`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("duplicate user {0}")]
    DuplicateUser(String),
}

/// Immutable username-to-credential mapping, built once at startup.
///
/// Secrets are held and compared as SHA-256 digests, so verification cost
/// does not depend on how much of a supplied secret matches the stored one.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, CredentialRecord>,
}

impl CredentialStore {
    /// Build a store from `(username, secret, tier)` triples. Usernames must
    /// be unique.
    pub fn from_users<I>(users: I) -> Result<Self, CredentialError>
    where
        I: IntoIterator<Item = (String, String, Tier)>,
    {
        let mut map = HashMap::new();
        for (username, secret, tier) in users {
            let record = CredentialRecord {
                secret_digest: digest(&secret),
                tier,
            };
            match map.entry(username) {
                Entry::Occupied(entry) => {
                    return Err(CredentialError::DuplicateUser(entry.key().clone()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
        Ok(Self { users: map })
    }

    /// Check a supplied credential pair, yielding the caller's identity on an
    /// exact match and `None` for unknown users and wrong secrets alike.
    pub fn verify(&self, username: &str, secret: &str) -> Option<Identity> {
        let record = self.users.get(username)?;
        if record.secret_digest != digest(secret) {
            return None;
        }
        Some(Identity {
            username: username.to_owned(),
            tier: record.tier,
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn digest(secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}
