use serde::{Deserialize, Serialize};
use sqlx::Type;

/// The only severity values the dashboard knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "severity", rename_all = "lowercase")]
pub(crate) enum Severity {
    Minor,
    Major,
    Dangerous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "alerttype", rename_all = "snake_case")]
pub(crate) enum AlertType {
    RealTimeRisk,
    AreaWarning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Dangerous).unwrap(), "\"dangerous\"");
        let parsed: Severity = serde_json::from_str("\"minor\"").unwrap();
        assert_eq!(parsed, Severity::Minor);
    }

    #[test]
    fn severity_rejects_unknown_values() {
        assert!(serde_json::from_str::<Severity>("\"catastrophic\"").is_err());
    }
}
