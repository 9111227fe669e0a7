use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum HostPoolStatus {
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "offline")]
    Offline,
}

/// Lifecycle of a session. `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "idle")]
    Idle,
    #[sea_orm(string_value = "disconnected")]
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    #[sea_orm(string_value = "critical")]
    Critical,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "info")]
    Info,
}

macro_rules! display_as_db_value {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.to_value())
                }
            }
        )*
    };
}

display_as_db_value!(UserStatus, HostPoolStatus, SessionStatus, AlertSeverity);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_stored_value() {
        assert_eq!(SessionStatus::Disconnected.to_string(), "disconnected");
        assert_eq!(HostPoolStatus::Online.to_string(), "online");
        assert_eq!(AlertSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&UserStatus::Inactive).unwrap();
        assert_eq!(json, "\"inactive\"");

        let parsed: SessionStatus = serde_json::from_str("\"idle\"").unwrap();
        assert_eq!(parsed, SessionStatus::Idle);
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        assert!(AlertSeverity::try_from_value(&"fatal".to_string()).is_err());
        assert_eq!(
            AlertSeverity::try_from_value(&"warning".to_string()).unwrap(),
            AlertSeverity::Warning
        );
    }
}
