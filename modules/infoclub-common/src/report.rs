/// Heading text of the keyword section in generated weekly reports.
pub const HOT_SECTION_MARKER: &str = "HOT 키워드";

/// Shorter marker matched against the upper-cased line.
const HOT_FALLBACK_MARKER: &str = "HOT";

/// Any line starting with this ends extraction.
const HEADING_PREFIX: &str = "##";

/// Callers only ever use the first ten keywords.
pub const MAX_HOT_KEYWORDS: usize = 10;

fn is_hot_heading(line: &str) -> bool {
    line.contains(HOT_SECTION_MARKER) || line.to_uppercase().contains(HOT_FALLBACK_MARKER)
}

fn is_list_marker(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | ')' | ' ')
}

/// Pull the itemized entries out of the "HOT 키워드" section of a report.
///
/// The heading check runs on every line, so a line mentioning "hot" inside the
/// section is skipped like a heading. The first `##` line after the section
/// starts ends the scan, whatever its level or title.
pub fn extract_hot_keywords(report: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut in_hot_section = false;

    for line in report.split('\n') {
        if is_hot_heading(line) {
            in_hot_section = true;
            continue;
        }
        if !in_hot_section {
            continue;
        }
        if line.starts_with(HEADING_PREFIX) {
            break;
        }

        let cleaned = line.trim().trim_start_matches(is_list_marker).trim();
        if cleaned.chars().count() <= 1 {
            continue;
        }

        let cleaned = cleaned.replace("**", "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }

        keywords.push(cleaned.to_string());
        if keywords.len() == MAX_HOT_KEYWORDS {
            break;
        }
    }

    keywords
}
