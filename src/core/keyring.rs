use std::error::Error;
use std::fmt;

pub const KEYRING_SERVICE: &str = "ispace";
pub const KEYRING_USER: &str = "gemini";

/// Describes failures when attempting to access the system keyring.
///
/// Recoverable errors indicate that the credential backend was
/// temporarily unavailable (for example when the keychain service is
/// locked). Permanent errors surface the underlying cause directly.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

/// The single Gemini API key slot in the platform keyring.
pub struct KeyStore {
    enabled: bool,
}

impl KeyStore {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// A store that never touches the platform keyring.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    fn entry() -> Result<keyring::Entry, KeyringAccessError> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
    }

    pub fn get(&self) -> Result<Option<String>, KeyringAccessError> {
        if !self.enabled {
            return Ok(None);
        }
        match Self::entry()?.get_password() {
            Ok(key) => {
                tracing::debug!(service = KEYRING_SERVICE, "api key found in keyring");
                Ok(Some(key))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn store(&self, key: &str) -> Result<(), KeyringAccessError> {
        if !self.enabled {
            return Ok(());
        }
        Self::entry()?.set_password(key)?;
        Ok(())
    }

    /// Returns whether a stored key was actually removed.
    pub fn remove(&self) -> Result<bool, KeyringAccessError> {
        if !self.enabled {
            return Ok(false);
        }
        match Self::entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_failures_are_recoverable() {
        let err = KeyringAccessError::from(keyring::Error::PlatformFailure("locked".into()));
        assert!(err.is_recoverable());

        let err = KeyringAccessError::from(keyring::Error::TooLong("user".into(), 255));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn disabled_store_is_inert() {
        let store = KeyStore::disabled();
        assert_eq!(store.get().unwrap(), None);
        store.store("secret").unwrap();
        assert!(!store.remove().unwrap());
    }
}
