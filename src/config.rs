//! Generator configuration
//!
//! Holds the two inputs every generator needs besides the profile:
//! - `Salt`: 32 bytes, persisted in `.hcs_salt`
//! - `SecretKey`: 32 or 64 bytes, hex encoded in `HCS_SECRET_KEY`

use crate::error::HcsError;
use rand::RngCore;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable carrying the hex-encoded secret key
pub const SECRET_KEY_ENV: &str = "HCS_SECRET_KEY";

/// Environment variable overriding the salt directory
pub const SALT_DIR_ENV: &str = "HCS_SALT_DIR";

/// File name of the persisted salt
pub const SALT_FILE_NAME: &str = ".hcs_salt";

pub const SALT_LEN: usize = 32;

/// Signing secret. `Debug` never prints the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wrap raw key bytes; only 32 and 64 byte keys are accepted
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, HcsError> {
        match bytes.len() {
            32 | 64 => Ok(Self(bytes)),
            n => Err(HcsError::Configuration(format!(
                "{SECRET_KEY_ENV} must be 32 or 64 bytes, got {n} bytes"
            ))),
        }
    }

    pub fn from_hex(value: &str) -> Result<Self, HcsError> {
        let bytes = hex::decode(value.trim()).map_err(|e| {
            HcsError::Configuration(format!("invalid {SECRET_KEY_ENV} hex encoding: {e}"))
        })?;
        Self::from_bytes(bytes)
    }

    /// Read the key from `HCS_SECRET_KEY`
    pub fn from_env() -> Result<Self, HcsError> {
        match std::env::var(SECRET_KEY_ENV) {
            Ok(value) if !value.is_empty() => Self::from_hex(&value),
            _ => Err(HcsError::Configuration(format!("{SECRET_KEY_ENV} is not set"))),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED; {}])", self.0.len())
    }
}

/// Per-installation salt mixed into every fingerprint and signature
#[derive(Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HcsError> {
        let salt: [u8; SALT_LEN] = bytes.try_into().map_err(|_| {
            HcsError::Configuration(format!(
                "salt must be {SALT_LEN} bytes, got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(Self(salt))
    }

    /// Fresh random salt
    pub fn generate() -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self(salt)
    }

    /// Read `.hcs_salt` from `dir`, creating it when missing.
    ///
    /// A salt file of the wrong length is replaced with a new salt.
    pub fn load_or_create(dir: &Path) -> Result<Self, HcsError> {
        let path = dir.join(SALT_FILE_NAME);

        match fs::read(&path) {
            Ok(bytes) if bytes.len() == SALT_LEN => {
                debug!(path = %path.display(), "loaded salt");
                return Self::from_slice(&bytes);
            }
            Ok(bytes) => {
                warn!(
                    path = %path.display(),
                    len = bytes.len(),
                    "salt file has wrong length, regenerating"
                );
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(HcsError::Io(e)),
        }

        let salt = Self::generate();
        write_private(&path, salt.as_bytes())?;
        debug!(path = %path.display(), "created salt");
        Ok(salt)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt([REDACTED])")
    }
}

/// Write a file readable only by its owner
fn write_private(path: &Path, data: &[u8]) -> Result<(), HcsError> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    Ok(())
}

/// Salt and secret for a generator
#[derive(Debug, Clone)]
pub struct HcsConfig {
    pub salt: Salt,
    pub secret: SecretKey,
}

impl HcsConfig {
    pub fn new(salt: Salt, secret: SecretKey) -> Self {
        Self { salt, secret }
    }

    /// Load the salt from `salt_dir` (or `HCS_SALT_DIR`, or the working
    /// directory) and the secret from `HCS_SECRET_KEY`
    pub fn from_env(salt_dir: Option<&Path>) -> Result<Self, HcsError> {
        let dir = salt_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(SALT_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let salt = Salt::load_or_create(&dir)?;
        let secret = SecretKey::from_env()?;
        Ok(Self { salt, secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_lengths() {
        assert!(SecretKey::from_hex(&"ab".repeat(32)).is_ok());
        assert!(SecretKey::from_hex(&"ab".repeat(64)).is_ok());

        let err = SecretKey::from_hex(&"ab".repeat(16)).unwrap_err();
        assert!(matches!(err, HcsError::Configuration(_)));
        assert!(err.to_string().contains("got 16 bytes"));

        let err = SecretKey::from_hex("not-hex").unwrap_err();
        assert!(matches!(err, HcsError::Configuration(_)));
    }

    #[test]
    fn test_secret_key_debug_is_redacted() {
        let key = SecretKey::from_hex(&"ab".repeat(32)).unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("ab"));
        assert!(!debug.contains("171"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_salt_from_slice() {
        assert!(Salt::from_slice(&[7u8; 32]).is_ok());
        assert!(matches!(
            Salt::from_slice(&[7u8; 31]),
            Err(HcsError::Configuration(_))
        ));
    }

    #[test]
    fn test_load_or_create_persists_salt() {
        let dir = tempfile::tempdir().unwrap();

        let first = Salt::load_or_create(dir.path()).unwrap();
        let second = Salt::load_or_create(dir.path()).unwrap();
        assert_eq!(first, second);

        let on_disk = fs::read(dir.path().join(SALT_FILE_NAME)).unwrap();
        assert_eq!(on_disk, first.as_bytes());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(dir.path().join(SALT_FILE_NAME))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_load_or_create_replaces_short_salt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SALT_FILE_NAME);
        fs::write(&path, b"short").unwrap();

        let salt = Salt::load_or_create(dir.path()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), salt.as_bytes());
    }

    #[test]
    fn test_removed_salt_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let first = Salt::load_or_create(dir.path()).unwrap();
        fs::remove_file(dir.path().join(SALT_FILE_NAME)).unwrap();
        let second = Salt::load_or_create(dir.path()).unwrap();
        assert_ne!(first, second);
    }
}
