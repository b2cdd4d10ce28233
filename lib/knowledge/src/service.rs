//! Service entries.

use crate::access::AccessMethod;
use serde::Serialize;

/// Descriptive metadata for one supported AWS service.
///
/// Serializes with the field names the chat API exposes as `service_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    /// Short service identifier (e.g. `ec2`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Console navigation steps.
    pub console: &'static str,
    /// Example CLI invocation.
    pub cli: &'static str,
    /// Example SDK call.
    pub sdk: &'static str,
    /// Ordered troubleshooting checklist.
    #[serde(rename = "troubleshoot")]
    pub troubleshooting: &'static [&'static str],
    /// Ordered subtopics, used for topic detection and suggestions.
    pub subtopics: &'static [&'static str],
}

impl ServiceEntry {
    /// Returns the instructions for a specific access method.
    #[must_use]
    pub fn instructions(&self, method: AccessMethod) -> &'static str {
        match method {
            AccessMethod::Console => self.console,
            AccessMethod::Cli => self.cli,
            AccessMethod::Sdk => self.sdk,
        }
    }

    /// Returns the listing view of this entry.
    #[must_use]
    pub fn summary(&self) -> ServiceSummary {
        ServiceSummary {
            id: self.id,
            name: self.name,
            description: self.description,
            subtopics: self.subtopics,
        }
    }
}

/// The listing view of a service, as returned by `GET /api/services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    /// Service identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Ordered subtopics.
    pub subtopics: &'static [&'static str],
}
