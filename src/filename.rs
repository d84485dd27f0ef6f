use regex::Regex;

/// Substitutions turning a patch subject into a file name, applied in order.
/// Each rule sees the output of the previous one.
const RULES: &[(&str, &str)] = &[
    (r"\[PATCH[^\]]*\]", ""),
    (r"\[.*[^\]]*\]", ""),
    (r"^ *", ""),
    (r"[\[\]()]", ""),
    (r"\|", "_"),
    (r"[^_A-Z0-9a-z/ ]", "-"),
    (r"[ /]", "-"),
    (r"--*", "-"),
    (r"-_", "-"),
    (r"-$", ""),
    (r"^-*", ""),
    (r"^staging-", ""),
];

/// Builds a lowercase, filesystem-safe slug from a commit subject.
///
/// Bracketed tags such as `[PATCH 1/3]` are dropped, `|` becomes `_`, and
/// every other run of unsafe characters collapses to a single `-`.
/// A leading `staging-` prefix is removed. `None` passes through.
///
/// # Example
/// ```ignore
/// assert_eq!(
///     safe_filename(Some("[PATCH 1/3] Fix foo|bar (urgent)")).as_deref(),
///     Some("fix-foo_bar-urgent")
/// );
/// ```
pub fn safe_filename(name: Option<&str>) -> Option<String> {
    let mut name = name?.to_string();

    for (pattern, replacement) in RULES {
        if let Ok(re) = Regex::new(pattern) {
            name = re.replace_all(&name, *replacement).into_owned();
        }
    }

    Some(name.to_lowercase())
}

/// File stem for an exported patch.
///
/// Prefers the slug of the patch subject, then the slug of the commit
/// argument, then `patch`. Never returns an empty string or one containing
/// a path separator.
pub fn patch_file_stem(subject: Option<&str>, commit: &str) -> String {
    safe_filename(subject)
        .filter(|slug| !slug.is_empty())
        .or_else(|| safe_filename(Some(commit)).filter(|slug| !slug.is_empty()))
        .unwrap_or_else(|| "patch".to_string())
}
