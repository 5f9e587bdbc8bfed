//! Changelog rewriting for a release cycle.
//!
//! The releasable block is delimited by a heading line matching
//! `^#+ Unreleased$`; it runs until the next heading of the same or a
//! higher level. Updating for a release dates that heading and prepends a
//! fresh placeholder section, so the changelog always has an unreleased
//! section ready for the next cycle.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::version::Version;

pub const UNRELEASED_PLACEHOLDER: &str = "[no unreleased changes yet]";

static UNRELEASED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#+) Unreleased$").expect("hardcoded pattern"));

/// Rewrite changelog contents for the release of `version` on `date`.
///
/// The first `Unreleased` heading becomes `## v<version> (<date>)` at its
/// original heading level, and a fresh empty `## Unreleased` section is
/// prepended above everything. Contents with no `Unreleased` heading still
/// get the fresh section prepended.
pub fn rewrite_for_release(contents: &str, version: &Version, date: NaiveDate) -> String {
    let dated = UNRELEASED_HEADING.replace(contents, |caps: &regex::Captures| {
        format!("{} v{} ({})", &caps[1], version, date.format("%Y-%m-%d"))
    });

    format!(
        "## Unreleased\n{}\n\n{}\n",
        UNRELEASED_PLACEHOLDER,
        dated.trim_end()
    )
}

/// Extract the unreleased block (heading included) for display.
///
/// Returns `None` when the contents have no `Unreleased` heading.
pub fn unreleased_section(contents: &str) -> Option<String> {
    let matched = UNRELEASED_HEADING.captures(contents)?;
    let level = matched[1].len();
    let start = matched.get(0)?.start();

    let mut lines = contents[start..].lines();
    let mut section = vec![lines.next()?];
    for line in lines {
        let hashes = line.chars().take_while(|c| *c == '#').count();
        if hashes > 0 && hashes <= level && line[hashes..].starts_with(' ') {
            break;
        }
        section.push(line);
    }

    Some(section.join("\n").trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn test_rewrite_dates_heading_and_prepends_placeholder() {
        let contents = "## Unreleased\n[no unreleased changes yet]\n\n## v1.0.0 (2024-01-01)\n- initial release\n";
        let rewritten = rewrite_for_release(contents, &Version::new(1, 1, 0), date());
        assert_eq!(
            rewritten,
            "## Unreleased\n[no unreleased changes yet]\n\n\
             ## v1.1.0 (2024-05-17)\n[no unreleased changes yet]\n\n\
             ## v1.0.0 (2024-01-01)\n- initial release\n"
        );
    }

    #[test]
    fn test_rewrite_keeps_unreleased_notes_under_dated_heading() {
        let contents = "## Unreleased\n- added a flag\n\n## v0.1.0 (2023-11-02)\n- initial\n";
        let rewritten = rewrite_for_release(contents, &Version::new(0, 2, 0), date());
        assert!(rewritten.starts_with("## Unreleased\n[no unreleased changes yet]\n\n"));
        assert!(rewritten.contains("## v0.2.0 (2024-05-17)\n- added a flag\n"));
    }

    #[test]
    fn test_rewrite_without_unreleased_heading_still_prepends_placeholder() {
        let contents = "## v1.0.0 (2024-01-01)\n- initial release\n";
        let rewritten = rewrite_for_release(contents, &Version::new(1, 0, 1), date());
        assert!(rewritten.starts_with("## Unreleased\n[no unreleased changes yet]\n\n## v1.0.0"));
    }

    #[test]
    fn test_rewrite_twice_never_loses_or_duplicates_placeholder() {
        let contents = "## Unreleased\n- first cycle\n\n## v1.0.0 (2024-01-01)\n- initial\n";
        let once = rewrite_for_release(contents, &Version::new(1, 1, 0), date());
        let twice = rewrite_for_release(&once, &Version::new(1, 2, 0), date());

        assert_eq!(twice.matches("## Unreleased").count(), 1);
        assert!(twice.starts_with("## Unreleased\n[no unreleased changes yet]\n\n## v1.2.0"));
        assert!(twice.contains("## v1.1.0 (2024-05-17)\n- first cycle"));
    }

    #[test]
    fn test_rewrite_respects_heading_level() {
        let contents = "### Unreleased\n- change\n\n### v1.0.0\n- initial\n";
        let rewritten = rewrite_for_release(contents, &Version::new(1, 1, 0), date());
        assert!(rewritten.contains("### v1.1.0 (2024-05-17)"));
    }

    #[test]
    fn test_unreleased_section_extraction() {
        let contents = "## Unreleased\n- a change\n- another\n\n## v1.0.0 (2024-01-01)\n- initial\n";
        assert_eq!(
            unreleased_section(contents).unwrap(),
            "## Unreleased\n- a change\n- another"
        );
    }

    #[test]
    fn test_unreleased_section_stops_at_same_level_heading_only() {
        let contents = "## Unreleased\n### Fixed\n- a bug\n\n## v1.0.0\n- initial\n";
        assert_eq!(
            unreleased_section(contents).unwrap(),
            "## Unreleased\n### Fixed\n- a bug"
        );
    }

    #[test]
    fn test_unreleased_section_runs_to_end_without_later_heading() {
        let contents = "## Unreleased\n- only entry\n";
        assert_eq!(unreleased_section(contents).unwrap(), "## Unreleased\n- only entry");
    }

    #[test]
    fn test_unreleased_section_missing() {
        assert_eq!(unreleased_section("## v1.0.0\n- initial\n"), None);
    }
}
