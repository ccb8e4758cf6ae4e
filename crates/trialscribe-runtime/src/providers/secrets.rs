//! Secure credential handling for generation providers.
//!
//! API keys are wrapped the moment they enter the process:
//!
//! - `Debug` output shows `[REDACTED]`, never the value
//! - memory is zeroed on drop via the `secrecy` crate
//! - the value is only reachable through an explicit `.expose()` call
//! - the load source is tracked for debugging configuration problems

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::GenerationError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a credential value. After this point it cannot be logged by
    /// accident.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load a credential from an environment variable.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, GenerationError> {
        std::env::var(env_var)
            .map(|value| Self::new(value, CredentialSource::Environment, name))
            .map_err(|_| {
                GenerationError::Unavailable(format!(
                    "{name} not set: configure the {env_var} environment variable"
                ))
            })
    }

    /// Expose the credential value at the point of use.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("value", &"[REDACTED]")
            .finish()
    }
}
