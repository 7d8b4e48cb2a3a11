use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("valid regex"));
static POST_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"comments/([^/]+)/").expect("valid regex"));

/// Reddit appends "submitted by /u/..." and link/comment anchors to every entry.
const REDDIT_FOOTER: &str = "submitted by";
const REDDIT_ARTIFACTS: &[&str] = &["[link]", "[comments]"];

/// Turn the HTML body of a feed entry into plain text.
///
/// Entities are decoded first, so escaped markup (`&lt;p&gt;`) is stripped
/// along with literal tags.
pub fn clean_html(raw_html: &str) -> String {
    if raw_html.is_empty() {
        return String::new();
    }

    let content = html_escape::decode_html_entities(raw_html);

    let mut content = match content.find(REDDIT_FOOTER) {
        Some(idx) => content[..idx].to_string(),
        None => content.into_owned(),
    };

    for artifact in REDDIT_ARTIFACTS {
        content = content.replace(artifact, "");
    }

    TAG_RE.replace_all(&content, "").trim().to_string()
}

/// Extract the Reddit post id from a permalink, falling back to the input.
pub fn parse_post_id(link: &str) -> String {
    POST_ID_RE
        .captures(link)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        let raw = "<div class=\"md\"><p>Tips &amp; tricks&#32;for editing</p></div>";
        assert_eq!(clean_html(raw), "Tips & tricks for editing");
    }

    #[test]
    fn removes_escaped_markup() {
        let raw = "&lt;p&gt;Hello&lt;/p&gt;";
        assert_eq!(clean_html(raw), "Hello");
    }

    #[test]
    fn cuts_reddit_footer() {
        let raw = "<p>Actual question here</p> submitted by <a href=\"/u/x\">/u/x</a> <a>[link]</a> <a>[comments]</a>";
        assert_eq!(clean_html(raw), "Actual question here");
    }

    #[test]
    fn removes_link_artifacts_without_footer() {
        assert_eq!(clean_html("Body [link] text [comments]"), "Body  text");
    }

    #[test]
    fn tags_spanning_lines_survive() {
        // `.` does not cross newlines, so a tag split across lines is left in place.
        let raw = "<a\nhref=\"x\">text</a>";
        assert_eq!(clean_html(raw), "<a\nhref=\"x\">text");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn parses_post_id_from_permalink() {
        let link = "https://www.reddit.com/r/NewTubers/comments/1abcxyz/my_first_1000_subs/";
        assert_eq!(parse_post_id(link), "1abcxyz");
    }

    #[test]
    fn falls_back_to_input_without_comments_segment() {
        assert_eq!(parse_post_id("t3_1abcxyz"), "t3_1abcxyz");
        assert_eq!(parse_post_id(""), "");
    }
}
