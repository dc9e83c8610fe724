use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of credit role categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Production,
    Engineering,
    Writing,
    Performance,
    Instrumentation,
    Sample,
    Other,
}

impl RoleCategory {
    pub const ALL: [Self; 7] = [
        Self::Production,
        Self::Engineering,
        Self::Writing,
        Self::Performance,
        Self::Instrumentation,
        Self::Sample,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Engineering => "engineering",
            Self::Writing => "writing",
            Self::Performance => "performance",
            Self::Instrumentation => "instrumentation",
            Self::Sample => "sample",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&RoleCategory::Instrumentation).unwrap();
        assert_eq!(json, "\"instrumentation\"");
        let parsed: RoleCategory = serde_json::from_str("\"sample\"").unwrap();
        assert_eq!(parsed, RoleCategory::Sample);
    }

    #[test]
    fn test_display_matches_serde_name() {
        for category in RoleCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json.trim_matches('"'), category.to_string());
        }
    }
}
