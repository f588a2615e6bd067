use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DrafterError, Result};

/// A release as listed by the REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target_commitish: String,
    #[serde(default)]
    pub body: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub upload_url: String,
}

/// Whether a published release becomes the repository's latest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MakeLatest {
    #[default]
    True,
    False,
    Legacy,
}

impl MakeLatest {
    pub fn as_str(&self) -> &'static str {
        match self {
            MakeLatest::True => "true",
            MakeLatest::False => "false",
            MakeLatest::Legacy => "legacy",
        }
    }
}

impl fmt::Display for MakeLatest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MakeLatest {
    type Err = DrafterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "true" => Ok(MakeLatest::True),
            "false" => Ok(MakeLatest::False),
            "legacy" => Ok(MakeLatest::Legacy),
            other => Err(DrafterError::config(format!(
                "latest must be one of true, false, legacy (got '{}')",
                other
            ))),
        }
    }
}

/// Parts of the version chosen for the release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    pub version: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Everything needed to create or update the draft
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePayload {
    pub name: String,
    pub tag: String,
    pub body: String,
    pub target_commitish: String,
    pub prerelease: bool,
    pub draft: bool,
    pub make_latest: MakeLatest,
    pub resolved_version: Option<ResolvedVersion>,
}
