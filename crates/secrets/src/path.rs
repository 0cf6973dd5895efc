//! Location of a secret bundle inside a store

use std::fmt;

/// Mount point of the KV v2 engine holding every bundle
const MOUNT: &str = "secret";

/// Identifies one bundle: a mount point plus project, environment and
/// application segments.
///
/// The relative path is `data/{project}/{environment}/{application}/`. The
/// leading `data/` belongs to the logical path, so on a KV v2 engine the HTTP
/// request goes to `{mount}/data/data/...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretPath {
    mount: String,
    project: String,
    environment: String,
    application: String,
}

impl SecretPath {
    /// Create a path under the `secret` mount
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        environment: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        Self {
            mount: MOUNT.to_string(),
            project: project.into(),
            environment: environment.into(),
            application: application.into(),
        }
    }

    /// Mount point of the secrets engine
    #[must_use]
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Path relative to the mount point
    #[must_use]
    pub fn relative(&self) -> String {
        format!(
            "data/{}/{}/{}/",
            self.project, self.environment, self.application
        )
    }
}

impl fmt::Display for SecretPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mount, self.relative())
    }
}
