//! Chrome Web Store readiness rules

use crate::error::{BuildError, BuildResult};
use crate::models::{RunAt, UserScriptMetadata, ALL_URLS, DEFAULT_NAME};
use crate::report::Reporter;
use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_DESCRIPTION_CHARS: usize = 132;
pub const MAX_NAME_CHARS: usize = 75;

lazy_static! {
    static ref VERSION_PATTERN: Regex = Regex::new(r"^\d+(\.\d+){0,3}$").unwrap();
}

/// Fatal rules raise [`BuildError::Validation`]; advisory rules only warn.
pub fn validate_store_readiness(
    metadata: &UserScriptMetadata,
    reporter: &dyn Reporter,
) -> BuildResult<()> {
    check_description(&metadata.description)?;
    check_name(&metadata.name)?;

    warn_on_all_urls(metadata, reporter);
    warn_on_version(&metadata.version, reporter);
    warn_on_run_at(metadata, reporter);

    Ok(())
}

fn check_description(description: &str) -> BuildResult<()> {
    if description.trim().is_empty() || description == DEFAULT_NAME {
        return Err(BuildError::Validation(
            "Description is required for Chrome Web Store. \
             Add @description to your userscript."
                .to_string(),
        ));
    }

    let length = description.chars().count();
    if length > MAX_DESCRIPTION_CHARS {
        return Err(BuildError::Validation(format!(
            "Description exceeds {} characters (current: {}). \
             Please shorten @description in the userscript.",
            MAX_DESCRIPTION_CHARS, length
        )));
    }

    Ok(())
}

fn check_name(name: &str) -> BuildResult<()> {
    if name.trim().is_empty() {
        return Err(BuildError::Validation(
            "Extension name is empty. Add @name to your userscript.".to_string(),
        ));
    }

    let length = name.chars().count();
    if length > MAX_NAME_CHARS {
        return Err(BuildError::Validation(format!(
            "Extension name exceeds {} characters (current: {}).",
            MAX_NAME_CHARS, length
        )));
    }
    Ok(())
}

fn warn_on_all_urls(metadata: &UserScriptMetadata, reporter: &dyn Reporter) {
    if metadata.match_patterns.iter().any(|m| m == ALL_URLS) {
        reporter.warn(
            "Chrome Web Store may reject extensions matching '<all_urls>'. \
             Use specific @match patterns if possible.",
        );
    }
}

fn warn_on_version(version: &str, reporter: &dyn Reporter) {
    if !VERSION_PATTERN.is_match(version.trim_start_matches(&['v', 'V'][..])) {
        reporter.warn(&format!(
            "Version '{}' may not follow Chrome Web Store format. \
             Recommended format: x.y.z (e.g., 1.0.0)",
            version
        ));
    }
}

fn warn_on_run_at(metadata: &UserScriptMetadata, reporter: &dyn Reporter) {
    let raw = metadata
        .raw_value("run-at")
        .or_else(|| metadata.raw_value("runAt"));
    if let Some(raw) = raw {
        if raw.parse::<RunAt>().is_err() {
            reporter.warn(&format!(
                "Unsupported run-at value '{}', using {}",
                raw,
                RunAt::default()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_metadata;
    use crate::report::MemoryReporter;

    fn metadata(directives: &str) -> UserScriptMetadata {
        parse_metadata(&format!(
            "// ==UserScript==\n{}// ==/UserScript==\n",
            directives
        ))
        .unwrap()
    }

    fn validate(directives: &str) -> (BuildResult<()>, MemoryReporter) {
        let reporter = MemoryReporter::new();
        let result = validate_store_readiness(&metadata(directives), &reporter);
        (result, reporter)
    }

    #[test]
    fn test_valid_script_passes_quietly() {
        let (result, reporter) = validate(
            "// @name Foo\n// @version 1.0.0\n// @description Bar\n// @match https://example.com/*\n",
        );
        assert!(result.is_ok());
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_empty_description_fails() {
        let (result, _) = validate("// @name Foo\n");
        let err = result.unwrap_err();
        assert!(matches!(err, BuildError::Validation(_)));
        assert!(err.to_string().contains("Description is required"));
    }

    #[test]
    fn test_empty_description_fails_even_with_long_name() {
        let long_name = "n".repeat(MAX_NAME_CHARS + 10);
        let (result, _) = validate(&format!("// @name {}\n// @description\n", long_name));
        assert!(result.unwrap_err().to_string().contains("Description is required"));
    }

    #[test]
    fn test_placeholder_description_fails() {
        let (result, _) = validate("// @description Unnamed Script\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_description_at_ceiling_passes() {
        let description = "d".repeat(MAX_DESCRIPTION_CHARS);
        let (result, _) = validate(&format!("// @description {}\n", description));
        assert!(result.is_ok());
    }

    #[test]
    fn test_description_over_ceiling_fails() {
        let description = "d".repeat(MAX_DESCRIPTION_CHARS + 1);
        let (result, _) = validate(&format!("// @description {}\n", description));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Description exceeds 132 characters (current: 133)"));
    }

    #[test]
    fn test_description_counts_characters_not_bytes() {
        let description = "é".repeat(MAX_DESCRIPTION_CHARS);
        let (result, _) = validate(&format!("// @description {}\n", description));
        assert!(result.is_ok());
    }

    #[test]
    fn test_name_over_ceiling_fails() {
        let name = "n".repeat(MAX_NAME_CHARS + 1);
        let (result, _) = validate(&format!("// @name {}\n// @description ok\n", name));
        assert!(result.unwrap_err().to_string().contains("name exceeds 75"));
    }

    #[test]
    fn test_bare_name_and_version_use_defaults() {
        let (result, _) = validate("// @name\n// @version\n// @description ok\n");
        assert!(result.is_ok());
    }

    #[test]
    fn test_blank_name_fails() {
        let mut metadata = metadata("// @description ok\n");
        metadata.name = "  ".to_string();
        let err = validate_store_readiness(&metadata, &MemoryReporter::new()).unwrap_err();
        assert!(err.to_string().contains("name is empty"));
    }

    #[test]
    fn test_all_urls_match_only_warns() {
        let (result, reporter) = validate("// @description ok\n// @match <all_urls>\n");
        assert!(result.is_ok());
        assert_eq!(reporter.warnings().len(), 1);
        assert!(reporter.warnings()[0].contains("<all_urls>"));
    }

    #[test]
    fn test_odd_version_only_warns() {
        let (result, reporter) = validate("// @description ok\n// @version 1.0-beta\n");
        assert!(result.is_ok());
        assert!(reporter.warnings()[0].contains("1.0-beta"));

        let (_, reporter) = validate("// @description ok\n// @version v2.1\n");
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_unknown_run_at_only_warns() {
        let (result, reporter) = validate("// @description ok\n// @run-at context-menu\n");
        assert!(result.is_ok());
        assert!(reporter.warnings()[0].contains("context-menu"));
    }
}
