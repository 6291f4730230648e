//! Chapter splitting - heading-pattern partitioning of the full text.
//!
//! Independent of the extraction pipeline; operates on the raw document.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::chapter::ChapterMetadata;

/// A heading is a numeral (digit or CJK numeral word) followed by a unit
/// word, optionally prefixed with an ordinal marker, then at most a short
/// run of same-line title characters.
const HEADING_PATTERN: &str =
    "(?m)^[ \\t\u{3000}]*第?[0-9０-９零一二三四五六七八九十百千万两]+[章节卷回集部篇][^\\n]{0,24}";

/// Content lines shorter than this cannot serve as anchors.
const ANCHOR_MIN_CHARS: usize = 8;

/// Anchor excerpts are truncated to this many characters.
const ANCHOR_MAX_CHARS: usize = 60;

/// Summaries preview this many characters of chapter body.
const SUMMARY_MAX_CHARS: usize = 60;

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HEADING_PATTERN).expect("heading pattern is valid"))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Pick the anchor line for a chapter span: the first content line longer
/// than the minimum that is not the heading title itself; the truncated
/// title when none qualifies.
fn anchor_line(span: &str, title: &str) -> String {
    span.lines()
        .map(str::trim)
        .find(|line| line.chars().count() > ANCHOR_MIN_CHARS && *line != title)
        .map(|line| truncate_chars(line, ANCHOR_MAX_CHARS))
        .unwrap_or_else(|| truncate_chars(title, ANCHOR_MAX_CHARS))
}

/// Short body preview used as the chapter summary.
fn summarize_span(span: &str, title: &str) -> String {
    let body: String = span
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != title)
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&body, SUMMARY_MAX_CHARS)
}

/// Partition `text` into chapters by heading recognition.
///
/// All heading matches are located in a single left-to-right scan;
/// consecutive matches delimit spans - chapter `k` runs from its heading's
/// start offset to the next heading's start offset, the last chapter to
/// the end of text. Zero matches yield exactly one chapter spanning the
/// whole text with a fallback title.
pub fn split_chapters(text: &str) -> Vec<ChapterMetadata> {
    let matches: Vec<(usize, String)> = heading_regex()
        .find_iter(text)
        .map(|m| (m.start(), m.as_str().trim().to_string()))
        .collect();

    if matches.is_empty() {
        return vec![ChapterMetadata {
            title: "全文".to_string(),
            summary: "未检测到章节标题".to_string(),
            anchor_line: anchor_line(text, ""),
        }];
    }

    matches
        .iter()
        .enumerate()
        .map(|(i, (start, title))| {
            let end = matches.get(i + 1).map(|(s, _)| *s).unwrap_or(text.len());
            let span = &text[*start..end];
            // Skip the heading's own line when looking for body text.
            let body = span
                .split_once('\n')
                .map(|(_, rest)| rest)
                .unwrap_or("");

            ChapterMetadata {
                title: title.clone(),
                summary: summarize_span(body, title),
                anchor_line: anchor_line(body, title),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_headings_single_full_span_chapter() {
        let text = "这是一段没有任何章节标记的文字。\n后面还有更多内容,依旧没有标题。";
        let chapters = split_chapters(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "全文");
        assert!(chapters[0].summary.contains("未检测到"));
    }

    #[test]
    fn test_two_chapters_with_titles_and_spans() {
        let text = "第一章 开篇\n唐僧自长安出发,踏上西行之路,一路风餐露宿。\n第二章 风起\n行至两界山,忽闻山下雷鸣般的呼喊之声。";
        let chapters = split_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "第一章 开篇");
        assert_eq!(chapters[1].title, "第二章 风起");
        // First chapter's content ends before the second heading.
        assert!(chapters[0].anchor_line.contains("唐僧自长安出发"));
        assert!(!chapters[0].anchor_line.contains("两界山"));
        assert!(chapters[1].anchor_line.contains("两界山"));
    }

    #[test]
    fn test_digit_and_cjk_numerals_both_match() {
        let text = "第1章 起点\n正文第一段,长度足够作为定位行使用。\n第十二章 转折\n另一段足够长的正文内容,用于定位。";
        let chapters = split_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "第1章 起点");
        assert_eq!(chapters[1].title, "第十二章 转折");
    }

    #[test]
    fn test_anchor_skips_short_lines() {
        let text = "第一章 启程\n短句。\n这一行足够长,可以用来在原文中重新定位章节起点。";
        let chapters = split_chapters(text);

        assert!(chapters[0].anchor_line.starts_with("这一行足够长"));
    }

    #[test]
    fn test_anchor_falls_back_to_title() {
        let text = "第一章 孤行\n短。";
        let chapters = split_chapters(text);

        assert_eq!(chapters[0].anchor_line, "第一章 孤行");
    }

    #[test]
    fn test_anchor_truncated() {
        let long_line = "长".repeat(200);
        let text = format!("第一章 漫长\n{}", long_line);
        let chapters = split_chapters(&text);

        assert_eq!(chapters[0].anchor_line.chars().count(), ANCHOR_MAX_CHARS);
    }

    #[test]
    fn test_volume_and_section_units_recognized() {
        let text = "第一卷 山雨\n卷首的正文内容,足够长以便定位。\n第二回 相逢\n回目之下的正文内容,同样足够长。";
        let chapters = split_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert!(chapters[0].title.starts_with("第一卷"));
        assert!(chapters[1].title.starts_with("第二回"));
    }
}
