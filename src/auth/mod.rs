use crate::core::keyring::{KeyStore, KeyringAccessError};
use std::error::Error;
use std::fmt;

mod ui;

use self::ui::{prompt_api_key, prompt_confirmation, ConfirmationChoice};

/// Environment variables consulted, in order, when no key is stored.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

const QUICK_FIXES: &[&str] = &[
    "ispace auth                      # store a key in the system keyring",
    "export GEMINI_API_KEY=\"your-key\" # or provide it for this shell",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Keyring,
    Env(&'static str),
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Keyring => write!(f, "keyring"),
            KeySource::Env(var) => write!(f, "${var}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub key: String,
    pub source: KeySource,
}

#[derive(Debug)]
pub struct CredentialError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl CredentialError {
    pub fn missing_key() -> Self {
        Self::new(
            "❌ No Gemini API key configured and neither GEMINI_API_KEY nor GOOGLE_API_KEY is set",
        )
    }

    pub fn keyring_unavailable(err: &KeyringAccessError) -> Self {
        Self::new(format!(
            "❌ Could not read the API key from the system keyring ({err}) and no GEMINI_API_KEY or GOOGLE_API_KEY is set"
        ))
    }

    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            quick_fixes: QUICK_FIXES,
            exit_code: 2,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CredentialError {}

/// Keyring first, then the environment.
pub fn resolve_api_key(store: &KeyStore) -> Result<ResolvedKey, CredentialError> {
    resolve_api_key_with(store, |var| std::env::var(var).ok())
}

pub fn resolve_api_key_with<F>(store: &KeyStore, env: F) -> Result<ResolvedKey, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    let keyring_error = match store.get() {
        Ok(Some(key)) => {
            return Ok(ResolvedKey {
                key,
                source: KeySource::Keyring,
            })
        }
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(recoverable = err.is_recoverable(), error = %err, "keyring lookup failed");
            Some(err)
        }
    };

    for &var in API_KEY_ENV_VARS {
        if let Some(key) = env(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            tracing::debug!(source = var, "using api key from environment");
            return Ok(ResolvedKey {
                key,
                source: KeySource::Env(var),
            });
        }
    }

    Err(match keyring_error {
        Some(err) => CredentialError::keyring_unavailable(&err),
        None => CredentialError::missing_key(),
    })
}

pub fn interactive_auth(store: &KeyStore) -> Result<(), Box<dyn Error>> {
    if store.get()?.is_some()
        && prompt_confirmation("A Gemini API key is already stored. Replace it?")?
            != ConfirmationChoice::Yes
    {
        println!("Cancelled.");
        return Ok(());
    }

    let key = prompt_api_key()?;
    store.store(&key)?;

    println!();
    println!("✅ API key stored securely in the system keyring.");
    println!("You can now use ISpace without setting environment variables.");
    Ok(())
}

pub fn interactive_deauth(store: &KeyStore) -> Result<(), Box<dyn Error>> {
    if store.get()?.is_none() {
        return Err("No Gemini API key is stored in the keyring.".into());
    }
    if prompt_confirmation("Remove the stored Gemini API key?")? != ConfirmationChoice::Yes {
        println!("Cancelled.");
        return Ok(());
    }
    store.remove()?;
    println!("✅ Authentication removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn gemini_key_wins_over_google_key() {
        let resolved = resolve_api_key_with(
            &KeyStore::disabled(),
            env_of(&[("GEMINI_API_KEY", "gem"), ("GOOGLE_API_KEY", "goog")]),
        )
        .unwrap();
        assert_eq!(resolved.key, "gem");
        assert_eq!(resolved.source, KeySource::Env("GEMINI_API_KEY"));
    }

    #[test]
    fn falls_back_to_google_key_and_skips_blank_values() {
        let resolved = resolve_api_key_with(
            &KeyStore::disabled(),
            env_of(&[("GEMINI_API_KEY", "  "), ("GOOGLE_API_KEY", "goog")]),
        )
        .unwrap();
        assert_eq!(resolved.key, "goog");
        assert_eq!(resolved.source.to_string(), "$GOOGLE_API_KEY");
    }

    #[test]
    fn missing_key_reports_quick_fixes() {
        let err = resolve_api_key_with(&KeyStore::disabled(), env_of(&[])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(err.quick_fixes().iter().any(|fix| fix.contains("ispace auth")));
    }
}
