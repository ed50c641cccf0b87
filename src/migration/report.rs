//! `migration-report.json`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the report inside the output directory
pub const REPORT_FILE_NAME: &str = "migration-report.json";

/// Follow-up actions listed in every report
pub const NEXT_STEPS: &[&str] = &[
    "Review the migrated configuration file",
    "Move extracted secrets into your secret store or deployment environment",
    "Add the generated .env file to .gitignore",
    "Validate the configuration with `mcp-config validate-config`",
    "Check server connectivity with `mcp-config status`",
    "Remove the legacy configuration file once the migration is verified",
];

/// Summary written next to the migrated configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub migration_date: DateTime<Utc>,
    pub secrets_extracted: usize,
    pub warnings: Vec<String>,
    pub next_steps: Vec<String>,
}

impl MigrationReport {
    pub fn new(secrets_extracted: usize, warnings: Vec<String>) -> Self {
        Self {
            migration_date: Utc::now(),
            secrets_extracted,
            warnings,
            next_steps: NEXT_STEPS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let report = MigrationReport::new(2, vec!["w".to_string()]);
        let value = serde_json::to_value(&report).unwrap();

        assert!(value["migrationDate"].is_string());
        assert_eq!(value["secretsExtracted"], 2);
        assert_eq!(value["warnings"][0], "w");
        assert_eq!(
            value["nextSteps"].as_array().unwrap().len(),
            NEXT_STEPS.len()
        );
    }
}
