//! Ways a user can reach an AWS service.

use serde::Serialize;

/// How the user wants to interact with a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMethod {
    /// AWS Management Console.
    Console,
    /// AWS CLI.
    Cli,
    /// Programmatic access through an SDK.
    Sdk,
}

impl AccessMethod {
    /// All methods, in detection priority order.
    pub const ALL: [AccessMethod; 3] = [Self::Console, Self::Cli, Self::Sdk];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Cli => "cli",
            Self::Sdk => "sdk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(AccessMethod::Cli).expect("json"),
            serde_json::json!("cli")
        );
        assert_eq!(AccessMethod::Sdk.as_str(), "sdk");
    }

    #[test]
    fn detection_order_is_console_cli_sdk() {
        assert_eq!(
            AccessMethod::ALL,
            [AccessMethod::Console, AccessMethod::Cli, AccessMethod::Sdk]
        );
    }
}
