//! Port for one-way password hashing.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing or checking a password.
    pub enum CredentialHasherError {
        /// The hasher could not produce a digest.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Hash and verify passwords. Implementations are CPU bound and synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted digest for `password`.
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError>;

    /// Check `password` against a stored digest.
    fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError>;
}
