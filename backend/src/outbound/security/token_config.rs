//! Token signing secret configuration.
//!
//! The secret is read from a file so it can be mounted as a container
//! secret. Release builds insist on a real secret; debug builds fall back to
//! a random per-process secret so local runs need no setup.

use std::path::PathBuf;

use mockable::{DefaultEnv, Env};
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

const TOKEN_SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
/// Minimum secret length accepted in release builds.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret file.
    Debug,
    /// Release builds require a readable secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use travel_backend::outbound::security::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated token signing settings.
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    ephemeral: bool,
}

impl TokenSettings {
    /// Wrap an explicit secret, e.g. one provisioned by a test harness.
    pub fn from_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            ephemeral: false,
        }
    }

    /// HMAC signing secret.
    pub fn secret(&self) -> &[u8] {
        self.secret.as_slice()
    }

    /// Whether the secret was generated for this process only.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    fn ephemeral() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; TOKEN_SECRET_MIN_LEN]);
        rand::thread_rng().fill_bytes(bytes.as_mut_slice());
        Self {
            secret: bytes,
            ephemeral: true,
        }
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// Errors raised while loading the token secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not sign with a throwaway secret.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Load token settings from the environment and the secret file.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use travel_backend::outbound::security::{BuildMode, token_settings_from_env};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let secret_path = std::env::temp_dir().join("token_secret_example");
/// std::fs::write(&secret_path, vec![b's'; 32])?;
///
/// let secret_path = secret_path.to_string_lossy().to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "TOKEN_SECRET_FILE" => Some(secret_path.clone()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.secret().len(), 32);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TokenConfigError`] when a release build has no usable secret.
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| TOKEN_SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if length == 0 || (mode == BuildMode::Release && length < TOKEN_SECRET_MIN_LEN) {
                if mode.is_debug() {
                    warn!(
                        path = %path.display(),
                        "token secret empty; using temporary secret (dev only)"
                    );
                    return Ok(TokenSettings::ephemeral());
                }
                return Err(TokenConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: TOKEN_SECRET_MIN_LEN,
                });
            }
            if length < TOKEN_SECRET_MIN_LEN {
                warn!(
                    path = %path.display(),
                    length,
                    "token secret shorter than recommended"
                );
            }
            Ok(TokenSettings {
                secret: bytes,
                ephemeral: false,
            })
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary token secret (dev only)"
                );
                Ok(TokenSettings::ephemeral())
            } else {
                Err(TokenConfigError::SecretRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

/// [`token_settings_from_env`] over the real process environment.
///
/// # Errors
///
/// Same as [`token_settings_from_env`].
pub fn token_settings_from_process_env(mode: BuildMode) -> Result<TokenSettings, TokenConfigError> {
    token_settings_from_env(&DefaultEnv::new(), mode)
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if !mode.is_debug() => Err(TokenConfigError::EphemeralNotAllowed),
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for token secret loading.

    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;
    use uuid::Uuid;

    #[derive(Debug)]
    struct TempSecretFile {
        path: PathBuf,
    }

    impl TempSecretFile {
        fn new(len: usize) -> std::io::Result<Self> {
            let path = std::env::temp_dir().join(format!("token-secret-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![b's'; len])?;
            Ok(Self { path })
        }

        fn path_str(&self) -> String {
            self.path.to_string_lossy().to_string()
        }
    }

    impl Drop for TempSecretFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn missing_path() -> String {
        std::env::temp_dir()
            .join(format!("token-secret-missing-{}", Uuid::new_v4()))
            .to_string_lossy()
            .to_string()
    }

    #[rstest]
    fn release_reads_the_secret_file() {
        let file = TempSecretFile::new(TOKEN_SECRET_MIN_LEN).expect("secret file");
        let env = mock_env(HashMap::from([(SECRET_FILE_ENV, file.path_str())]));

        let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");
        assert_eq!(settings.secret(), vec![b's'; TOKEN_SECRET_MIN_LEN].as_slice());
        assert!(!settings.is_ephemeral());
    }

    #[rstest]
    fn release_rejects_short_secrets() {
        let file = TempSecretFile::new(TOKEN_SECRET_MIN_LEN - 1).expect("secret file");
        let env = mock_env(HashMap::from([(SECRET_FILE_ENV, file.path_str())]));

        let err = token_settings_from_env(&env, BuildMode::Release).expect_err("short secret");
        assert!(matches!(
            err,
            TokenConfigError::SecretTooShort { length, .. } if length == TOKEN_SECRET_MIN_LEN - 1
        ));
    }

    #[rstest]
    fn release_requires_a_readable_file() {
        let env = mock_env(HashMap::from([(SECRET_FILE_ENV, missing_path())]));

        let err = token_settings_from_env(&env, BuildMode::Release).expect_err("missing file");
        assert!(matches!(err, TokenConfigError::SecretRead { .. }));
    }

    #[rstest]
    #[case("1")]
    #[case("yes")]
    fn release_refuses_ephemeral_secrets(#[case] flag: &str) {
        let env = mock_env(HashMap::from([(ALLOW_EPHEMERAL_ENV, flag.to_owned())]));

        let err = token_settings_from_env(&env, BuildMode::Release).expect_err("ephemeral");
        assert!(matches!(err, TokenConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_rejects_unparseable_flags() {
        let env = mock_env(HashMap::from([(ALLOW_EPHEMERAL_ENV, "maybe".to_owned())]));

        let err = token_settings_from_env(&env, BuildMode::Release).expect_err("bad flag");
        assert!(matches!(
            err,
            TokenConfigError::InvalidEnv {
                name: ALLOW_EPHEMERAL_ENV,
                ..
            }
        ));
    }

    #[rstest]
    fn debug_falls_back_to_an_ephemeral_secret() {
        let env = mock_env(HashMap::from([(SECRET_FILE_ENV, missing_path())]));

        let settings = token_settings_from_env(&env, BuildMode::Debug).expect("settings");
        assert!(settings.is_ephemeral());
        assert_eq!(settings.secret().len(), TOKEN_SECRET_MIN_LEN);
    }

    #[rstest]
    fn process_environment_names_the_secret_file() {
        let file = TempSecretFile::new(TOKEN_SECRET_MIN_LEN).expect("secret file");
        let path = file.path_str();
        let _guard = env_lock::lock_env([
            (SECRET_FILE_ENV, Some(path.as_str())),
            (ALLOW_EPHEMERAL_ENV, None),
        ]);

        let settings = token_settings_from_process_env(BuildMode::Release).expect("settings");
        assert!(!settings.is_ephemeral());
        assert_eq!(settings.secret().len(), TOKEN_SECRET_MIN_LEN);
    }

    #[rstest]
    fn debug_output_redacts_the_secret() {
        let settings = TokenSettings::from_secret(b"super-secret-value".to_vec());
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-secret-value"));
    }
}
