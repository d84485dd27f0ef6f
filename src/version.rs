use regex::Regex;
use std::cmp::Ordering;

/// Sortable form of a parsed release tag.
///
/// Fields compare in declaration order, so a release candidate
/// (`is_release == false`) sorts before the release with the same
/// major/minor/patch numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseKey {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub is_release: bool,
    /// rc number for candidates, legacy fourth component for v2.x
    /// releases. Compared as text: "9" sorts after "10".
    pub suffix: String,
}

/// Sort key derived from a tag name.
///
/// Tags that match neither recognised layout map to [VersionKey::Unparsed],
/// which sorts before every parsed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKey {
    Unparsed,
    Parsed(ReleaseKey),
}

impl VersionKey {
    pub fn is_parsed(&self) -> bool {
        matches!(self, VersionKey::Parsed(_))
    }

    /// The parsed key, if the tag was recognised
    pub fn release(&self) -> Option<&ReleaseKey> {
        match self {
            VersionKey::Parsed(key) => Some(key),
            VersionKey::Unparsed => None,
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionKey::Unparsed, VersionKey::Unparsed) => Ordering::Equal,
            (VersionKey::Unparsed, VersionKey::Parsed(_)) => Ordering::Less,
            (VersionKey::Parsed(_), VersionKey::Unparsed) => Ordering::Greater,
            (VersionKey::Parsed(a), VersionKey::Parsed(b)) => a.cmp(b),
        }
    }
}

/// Derives the sort key of a release tag.
///
/// Two layouts are recognised, both matched from the start of the tag:
/// - legacy `v2.<minor>.<patch>` optionally followed by `.<n>` or `-rc<n>`
/// - `v<major>.<minor>` optionally followed by `.<patch>` or `-rc<n>`
///
/// # Example
/// ```ignore
/// assert!(key_version("v1.2-rc1") < key_version("v1.2.0"));
/// assert_eq!(key_version("not-a-tag"), VersionKey::Unparsed);
/// ```
pub fn key_version(tag: &str) -> VersionKey {
    if let Ok(re) = Regex::new(r"^v2\.([0-9]+)\.([0-9]+)(?:\.([0-9]+)|-rc([0-9]+))?") {
        if let Some(caps) = re.captures(tag) {
            let minor = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
            let patch = caps.get(2).and_then(|m| m.as_str().parse::<u64>().ok());
            let (Some(minor), Some(patch)) = (minor, patch) else {
                return VersionKey::Unparsed;
            };

            let (is_release, suffix) = match caps.get(4) {
                Some(rc) => (false, rc.as_str()),
                None => (true, caps.get(3).map_or("", |m| m.as_str())),
            };

            return VersionKey::Parsed(ReleaseKey {
                major: 2,
                minor,
                patch,
                is_release,
                suffix: suffix.to_string(),
            });
        }
    }

    if let Ok(re) = Regex::new(r"^v([0-9]+)\.([0-9]+)(?:\.([0-9]+)|-rc([0-9]+))?") {
        if let Some(caps) = re.captures(tag) {
            let major = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
            let minor = caps.get(2).and_then(|m| m.as_str().parse::<u64>().ok());
            let (Some(major), Some(minor)) = (major, minor) else {
                return VersionKey::Unparsed;
            };

            if let Some(rc) = caps.get(4) {
                return VersionKey::Parsed(ReleaseKey {
                    major,
                    minor,
                    patch: 0,
                    is_release: false,
                    suffix: rc.as_str().to_string(),
                });
            }

            let patch = match caps.get(3) {
                Some(m) => match m.as_str().parse::<u64>() {
                    Ok(patch) => patch,
                    Err(_) => return VersionKey::Unparsed,
                },
                None => 0,
            };

            return VersionKey::Parsed(ReleaseKey {
                major,
                minor,
                patch,
                is_release: true,
                suffix: String::new(),
            });
        }
    }

    VersionKey::Unparsed
}

/// Sorts tags oldest-first by [key_version].
///
/// The sort is stable: tags with equal keys, including unrecognised tags,
/// keep their input order. Unrecognised tags come first.
pub fn sort_tags(tags: &mut [String]) {
    tags.sort_by_cached_key(|tag| key_version(tag));
}
