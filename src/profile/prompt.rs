//! Password prompt abstraction.
//!
//! Terminal or UI prompting lives outside this crate. Callers hand the vault
//! a [`PasswordPrompt`] that returns whatever the user typed. How many times
//! to re-prompt after a wrong password is the caller's decision; the vault
//! asks exactly once per operation.

use super::error::ProfileError;

/// Prompt shown before sealing a new secret.
pub const ENCRYPT_PROMPT: &str = "Enter password to encrypt private key: ";

/// Prompt shown to confirm the sealing password.
pub const CONFIRM_PROMPT: &str = "Confirm password: ";

/// Prompt shown before unsealing a stored secret.
pub const DECRYPT_PROMPT: &str = "Enter password to decrypt private key: ";

/// Source of passwords.
///
/// # Example
///
/// ```ignore
/// use nostr_vault_core::profile::{PasswordPrompt, ProfileError};
///
/// struct TerminalPrompt;
///
/// impl PasswordPrompt for TerminalPrompt {
///     fn prompt(&self, message: &str) -> Result<String, ProfileError> {
///         rpassword::prompt_password(message).map_err(|e| ProfileError::Prompt(e.to_string()))
///     }
/// }
/// ```
pub trait PasswordPrompt: Send + Sync {
    /// Shows `message` and returns the entered password.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Prompt`] if no password could be read.
    fn prompt(&self, message: &str) -> Result<String, ProfileError>;
}
