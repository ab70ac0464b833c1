//! Plain text and Markdown parsing.
//!
//! Decodes bytes as UTF-8 (lossily), counts lines, words and characters, and
//! for Markdown picks the first heading outside fenced code as the title.
//!
//! # Example
//!
//! ```rust
//! use docsift::extraction::text::parse_text;
//!
//! let result = parse_text(b"# Hello\n\nSome words here.", true);
//! assert_eq!(result.line_count, 3);
//! assert_eq!(result.word_count, 5);
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextParseResult {
    pub content: String,
    pub line_count: usize,
    pub word_count: usize,
    pub character_count: usize,
    /// First Markdown heading, if any.
    pub title: Option<String>,
}

pub fn parse_text(text_bytes: &[u8], is_markdown: bool) -> TextParseResult {
    let text = String::from_utf8_lossy(text_bytes);
    let text = text.trim_start_matches('\u{feff}');
    let content = text.trim_end_matches(['\n', '\r']).to_string();

    let mut line_count = 0;
    let mut word_count = 0;
    let mut title = None;
    let mut in_code_block = false;

    for line in content.lines() {
        line_count += 1;
        word_count += line.split_whitespace().count();

        if !is_markdown || title.is_some() {
            continue;
        }

        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_code_block = !in_code_block;
            continue;
        }
        if !in_code_block {
            title = markdown_heading(trimmed);
        }
    }

    TextParseResult {
        character_count: content.chars().count(),
        content,
        line_count,
        word_count,
        title,
    }
}

fn markdown_heading(line: &str) -> Option<String> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = &line[level..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let heading = rest.trim().trim_end_matches('#').trim();
    (!heading.is_empty()).then(|| heading.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_basic() {
        let result = parse_text(b"Hello world\nThis is a test\nThird line here\n", false);
        assert_eq!(result.line_count, 3);
        assert_eq!(result.word_count, 9);
        assert_eq!(result.content, "Hello world\nThis is a test\nThird line here");
        assert!(result.title.is_none());
    }

    #[test]
    fn test_plain_text_empty() {
        let result = parse_text(b"", false);
        assert_eq!(result.line_count, 0);
        assert_eq!(result.word_count, 0);
        assert_eq!(result.character_count, 0);
    }

    #[test]
    fn test_crlf_and_bom() {
        let result = parse_text(b"\xef\xbb\xbfone\r\ntwo\r\n", false);
        assert_eq!(result.content, "one\r\ntwo");
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let result = parse_text(b"caf\xe9 time", false);
        assert!(result.content.contains('\u{fffd}'));
        assert_eq!(result.word_count, 2);
    }

    #[test]
    fn test_character_count_uses_chars() {
        let result = parse_text("na\u{ef}ve".as_bytes(), false);
        assert_eq!(result.character_count, 5);
    }

    #[test]
    fn test_markdown_title() {
        let result = parse_text(b"Intro line\n## Section One ##\n# Later", true);
        assert_eq!(result.title.as_deref(), Some("Section One"));
    }

    #[test]
    fn test_markdown_title_skips_code_blocks() {
        let md = b"```bash\n# not a heading\n```\n# Real Title\n";
        let result = parse_text(md, true);
        assert_eq!(result.title.as_deref(), Some("Real Title"));
    }

    #[test]
    fn test_markdown_hashtag_is_not_heading() {
        let result = parse_text(b"#rustlang is fun", true);
        assert!(result.title.is_none());
    }
}
