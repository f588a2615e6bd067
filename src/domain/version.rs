use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};

use crate::error::{DrafterError, Result};

static COERCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d])(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:$|[^\d])")
        .expect("coerce pattern is valid")
});

/// Version bump type decision, ordered by priority (major wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    #[default]
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to move from one version to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    /// Bump the prerelease counter, or start a prerelease on the next patch
    PreRelease,
}

impl Increment {
    pub fn release(bump: VersionBump) -> Self {
        match bump {
            VersionBump::Major => Increment::Major,
            VersionBump::Minor => Increment::Minor,
            VersionBump::Patch => Increment::Patch,
        }
    }

    pub fn pre(bump: VersionBump) -> Self {
        match bump {
            VersionBump::Major => Increment::PreMajor,
            VersionBump::Minor => Increment::PreMinor,
            VersionBump::Patch => Increment::PrePatch,
        }
    }

    pub fn is_pre(&self) -> bool {
        matches!(
            self,
            Increment::PreMajor | Increment::PreMinor | Increment::PrePatch | Increment::PreRelease
        )
    }

    /// Apply this increment to `version`.
    ///
    /// Follows semver increment rules:
    /// - **Major**: major += 1, minor = 0, patch = 0 (a `X.0.0-pre` just drops the prerelease)
    /// - **Minor**: minor += 1, patch = 0 (a `X.Y.0-pre` just drops the prerelease)
    /// - **Patch**: patch += 1 (a `X.Y.Z-pre` just drops the prerelease)
    /// - **Pre\***: the plain bump, then a fresh `<identifier>.0` prerelease
    /// - **PreRelease**: increments the trailing prerelease number
    ///
    /// # Errors
    /// Returns a configuration error if `identifier` is not a valid prerelease identifier,
    /// and a version error if a bumped number would overflow.
    pub fn apply(&self, version: &Version, identifier: Option<&str>) -> Result<Version> {
        let has_pre = !version.pre.is_empty();
        let (major, minor, patch) = (version.major, version.minor, version.patch);

        let next = match self {
            Increment::Major if has_pre && minor == 0 && patch == 0 => (major, 0, 0, None),
            Increment::Major => (next_part(major, version)?, 0, 0, None),
            Increment::Minor if has_pre && patch == 0 => (major, minor, 0, None),
            Increment::Minor => (major, next_part(minor, version)?, 0, None),
            Increment::Patch if has_pre => (major, minor, patch, None),
            Increment::Patch => (major, minor, next_part(patch, version)?, None),
            Increment::PreMajor => (
                next_part(major, version)?,
                0,
                0,
                Some(start_prerelease(identifier)),
            ),
            Increment::PreMinor => (
                major,
                next_part(minor, version)?,
                0,
                Some(start_prerelease(identifier)),
            ),
            Increment::PrePatch => (
                major,
                minor,
                next_part(patch, version)?,
                Some(start_prerelease(identifier)),
            ),
            Increment::PreRelease if !has_pre => (
                major,
                minor,
                next_part(patch, version)?,
                Some(start_prerelease(identifier)),
            ),
            Increment::PreRelease => (
                major,
                minor,
                patch,
                Some(bump_prerelease(version, identifier)?),
            ),
        };

        let (major, minor, patch, pre) = next;
        let pre = match pre {
            Some(pre) => Prerelease::new(&pre).map_err(|e| {
                DrafterError::config(format!("Invalid prerelease identifier '{}': {}", pre, e))
            })?,
            None => Prerelease::EMPTY,
        };

        Ok(Version {
            major,
            minor,
            patch,
            pre,
            build: BuildMetadata::EMPTY,
        })
    }
}

fn next_part(part: u64, version: &Version) -> Result<u64> {
    part.checked_add(1).ok_or_else(|| {
        DrafterError::version(format!("Cannot increment {}: number too large", version))
    })
}

fn start_prerelease(identifier: Option<&str>) -> String {
    match identifier {
        Some(id) if !id.is_empty() => format!("{}.0", id),
        _ => "0".to_string(),
    }
}

fn bump_prerelease(version: &Version, identifier: Option<&str>) -> Result<String> {
    let mut parts: Vec<String> = version.pre.as_str().split('.').map(str::to_string).collect();

    if let Some(id) = identifier.filter(|id| !id.is_empty()) {
        if parts.first().map(String::as_str) != Some(id) {
            return Ok(format!("{}.0", id));
        }
    }

    match parts.iter().rposition(|p| p.parse::<u64>().is_ok()) {
        Some(index) => {
            let n = parts[index].parse::<u64>().unwrap_or(0);
            parts[index] = next_part(n, version)?.to_string();
        }
        None => parts.push("0".to_string()),
    }
    Ok(parts.join("."))
}

/// Parse a version out of a tag or release name.
///
/// `tag_prefix` is removed first when present. Strict semver is tried, then a loose
/// form with a leading `v`/`=`, then the first `N[.N[.N]]` run of digits with the
/// missing parts filled by zero. Returns `None` when nothing looks like a version.
///
/// # Example
/// ```ignore
/// assert_eq!(coerce_version("v1.2.3", "").unwrap(), Version::new(1, 2, 3));
/// assert_eq!(coerce_version("app-v2.1", "app-").unwrap(), Version::new(2, 1, 0));
/// assert_eq!(coerce_version("latest", ""), None);
/// ```
pub fn coerce_version(input: &str, tag_prefix: &str) -> Option<Version> {
    let stripped = if !tag_prefix.is_empty() {
        input.strip_prefix(tag_prefix).unwrap_or(input)
    } else {
        input
    };
    let trimmed = stripped.trim();

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }
    if let Ok(version) = Version::parse(trimmed.trim_start_matches(['v', 'V', '='])) {
        return Some(version);
    }

    let captures = COERCE.captures(trimmed)?;
    let part = |i: usize| -> Option<u64> {
        match captures.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Numeric parts of a computed version, fixed once derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Dot-separated prerelease, empty for a plain release
    pub prerelease: String,
    pub raw_version: String,
}

impl VersionDescriptor {
    /// `-<prerelease>` or an empty string
    pub fn prerelease_suffix(&self) -> String {
        if self.prerelease.is_empty() {
            String::new()
        } else {
            format!("-{}", self.prerelease)
        }
    }
}

impl From<&Version> for VersionDescriptor {
    fn from(version: &Version) -> Self {
        VersionDescriptor {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            prerelease: version.pre.to_string(),
            raw_version: version.to_string(),
        }
    }
}

impl fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_version)
    }
}
