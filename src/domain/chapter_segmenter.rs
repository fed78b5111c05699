//! 章节分割器
//!
//! 将一整段上传文本按章节标记（`Chương N` / `Chapter N`）切分为有序章节
//!
//! 规则:
//! 1. 标记必须位于行首（允许前导空白），后接空白、正整数和可选标题
//! 2. 标记行之后直到下一个标记行（或文本末尾）为该章正文
//! 3. 没有任何标记时，整段文本作为第 1 章
//!
//! 输入先做 NFC 规范化，分解形式（NFD）的 `Chương` 同样能识别。

use std::borrow::Cow;

use regex::Regex;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

use super::novel::{ChapterNumber, NovelError};

/// 默认章节标记
pub const DEFAULT_MARKERS: &[&str] = &["Chương", "Chapter"];

/// 章节分割配置
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// 章节标记词（大小写不敏感）
    pub markers: Vec<String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// 分割出的单个章节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedChapter {
    pub number: ChapterNumber,
    pub title: String,
    pub content: String,
}

/// 章节分割器
#[derive(Debug, Clone)]
pub struct ChapterSegmenter {
    pattern: Regex,
}

impl ChapterSegmenter {
    pub fn new(config: &SegmenterConfig) -> Result<Self, NovelError> {
        if config.markers.is_empty() {
            return Err(NovelError::SegmentationError(
                "at least one chapter marker is required".to_string(),
            ));
        }

        let markers = config
            .markers
            .iter()
            .map(|m| regex::escape(&to_nfc(m.trim())))
            .collect::<Vec<_>>()
            .join("|");

        // 1: 章节号  2: 标题（可能为空）
        let pattern = format!(
            r"(?mi)^[ \t]*(?:{markers})[ \t]+(\d+)\b[ \t]*(?:[:：.\-–—][ \t]*)?([^\r\n]*?)[ \t]*\r?$"
        );

        let pattern = Regex::new(&pattern)
            .map_err(|e| NovelError::SegmentationError(e.to_string()))?;

        Ok(Self { pattern })
    }

    /// 使用默认标记（`Chương` / `Chapter`）
    pub fn with_default_markers() -> Result<Self, NovelError> {
        Self::new(&SegmenterConfig::default())
    }

    /// 对文本进行章节分割
    pub fn segment(&self, text: &str) -> Vec<SegmentedChapter> {
        let text = to_nfc(text);
        let text = text.as_ref();

        let markers: Vec<Marker> = self
            .pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                // 0 或溢出的编号不算标记，留在正文中
                let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
                let number = ChapterNumber::new(number).ok()?;
                let title = caps
                    .get(2)
                    .map(|m| m.as_str().trim())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string);

                Some(Marker {
                    start: whole.start(),
                    end: whole.end(),
                    number,
                    title,
                })
            })
            .collect();

        if markers.is_empty() {
            let number = ChapterNumber::FIRST;
            return vec![SegmentedChapter {
                number,
                title: number.default_title(),
                content: text.trim().to_string(),
            }];
        }

        if !text[..markers[0].start].trim().is_empty() {
            tracing::debug!(
                preface_len = markers[0].start,
                "Text before the first chapter marker is not part of any chapter"
            );
        }

        markers
            .iter()
            .enumerate()
            .map(|(i, marker)| {
                let body_end = markers.get(i + 1).map(|m| m.start).unwrap_or(text.len());
                SegmentedChapter {
                    number: marker.number,
                    title: marker
                        .title
                        .clone()
                        .unwrap_or_else(|| marker.number.default_title()),
                    content: text[marker.end..body_end].trim().to_string(),
                }
            })
            .collect()
    }
}

fn to_nfc(text: &str) -> Cow<'_, str> {
    match is_nfc_quick(text.chars()) {
        IsNormalized::Yes => Cow::Borrowed(text),
        _ => Cow::Owned(text.nfc().collect()),
    }
}

struct Marker {
    start: usize,
    end: usize,
    number: ChapterNumber,
    title: Option<String>,
}

/// 返回重复出现的章节号（按首次重复的顺序）
pub fn duplicate_numbers(chapters: &[SegmentedChapter]) -> Vec<u32> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates = Vec::new();
    for chapter in chapters {
        let n = chapter.number.get();
        if !seen.insert(n) && !duplicates.contains(&n) {
            duplicates.push(n);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_chapters(text: &str) -> Vec<SegmentedChapter> {
        ChapterSegmenter::with_default_markers().unwrap().segment(text)
    }

    fn numbers(chapters: &[SegmentedChapter]) -> Vec<u32> {
        chapters.iter().map(|c| c.number.get()).collect()
    }

    #[test]
    fn test_vietnamese_markers_with_and_without_title() {
        let text = "Chương 1: Mở đầu\nNội dung A\nChương 2\nNội dung B";
        let chapters = segment_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number.get(), 1);
        assert_eq!(chapters[0].title, "Mở đầu");
        assert_eq!(chapters[0].content, "Nội dung A");
        assert_eq!(chapters[1].number.get(), 2);
        assert_eq!(chapters[1].title, "Chapter 2");
        assert_eq!(chapters[1].content, "Nội dung B");
    }

    #[test]
    fn test_no_marker_falls_back_to_single_chapter() {
        let chapters = segment_chapters("  Just some text.\n");

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number.get(), 1);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, "Just some text.");
    }

    #[test]
    fn test_english_markers_and_separators() {
        let text = "Chapter 3 - The Road\nfirst\n\nsecond\nchapter 4. Night\nthird\nCHAPTER 5 Dawn\nfourth";
        let chapters = segment_chapters(text);

        assert_eq!(numbers(&chapters), vec![3, 4, 5]);
        assert_eq!(chapters[0].title, "The Road");
        assert_eq!(chapters[0].content, "first\n\nsecond");
        assert_eq!(chapters[1].title, "Night");
        assert_eq!(chapters[2].title, "Dawn");
        assert_eq!(chapters[2].content, "fourth");
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Chương 1: Một\r\nA\r\nChương 2: Hai\r\nB\r\n";
        let chapters = segment_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Một");
        assert_eq!(chapters[0].content, "A");
        assert_eq!(chapters[1].title, "Hai");
        assert_eq!(chapters[1].content, "B");
    }

    #[test]
    fn test_decomposed_markers_are_recognised() {
        // 分解形式：u + U+031B、o + U+031B
        let text = "Chu\u{031B}o\u{031B}ng 1: Mở đầu\nA\nChu\u{031B}o\u{031B}ng 2\nB";
        let chapters = segment_chapters(text);

        assert_eq!(numbers(&chapters), vec![1, 2]);
        assert_eq!(chapters[0].title, "Mở đầu");
        assert_eq!(chapters[0].content, "A");
        assert_eq!(chapters[1].title, "Chapter 2");
        assert_eq!(chapters[1].content, "B");
    }

    #[test]
    fn test_marker_must_start_a_line() {
        let text = "Chương 1\nHe read Chapter 2 aloud.\nChương 2\nEnd";
        let chapters = segment_chapters(text);

        assert_eq!(numbers(&chapters), vec![1, 2]);
        assert_eq!(chapters[0].content, "He read Chapter 2 aloud.");
    }

    #[test]
    fn test_zero_and_glued_numbers_are_not_markers() {
        let text = "Chapter 1\nbody\nChapter 0\nstill body\nChapter 2nd thoughts\nmore";
        let chapters = segment_chapters(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(
            chapters[0].content,
            "body\nChapter 0\nstill body\nChapter 2nd thoughts\nmore"
        );
    }

    #[test]
    fn test_preface_is_not_part_of_any_chapter() {
        let text = "Lời tựa\n\nChương 1\nA";
        let chapters = segment_chapters(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].content, "A");
    }

    #[test]
    fn test_k_markers_yield_k_chapters() {
        let text: String = (1..=12)
            .map(|n| format!("Chương {}\nNội dung {}\n", n, n))
            .collect();
        let chapters = segment_chapters(&text);

        assert_eq!(chapters.len(), 12);
        for (i, chapter) in chapters.iter().enumerate() {
            assert_eq!(chapter.number.get() as usize, i + 1);
            assert_eq!(chapter.content, format!("Nội dung {}", i + 1));
        }
    }

    #[test]
    fn test_adjacent_markers_give_empty_body() {
        let chapters = segment_chapters("Chương 1\nChương 2\nB");

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].content, "");
        assert_eq!(chapters[1].content, "B");
    }

    #[test]
    fn test_custom_markers() {
        let config = SegmenterConfig {
            markers: vec!["Hồi".to_string()],
        };
        let segmenter = ChapterSegmenter::new(&config).unwrap();
        let chapters = segmenter.segment("Hồi 1\nA\nChương 2\nB");

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].content, "A\nChương 2\nB");
    }

    #[test]
    fn test_empty_marker_list_rejected() {
        let config = SegmenterConfig { markers: vec![] };
        assert!(ChapterSegmenter::new(&config).is_err());
    }

    #[test]
    fn test_duplicate_numbers_detected() {
        let chapters = segment_chapters("Chương 1\nA\nChương 2\nB\nChương 1\nC\nChương 1\nD");
        assert_eq!(duplicate_numbers(&chapters), vec![1]);

        let unique = segment_chapters("Chương 1\nA\nChương 2\nB");
        assert!(duplicate_numbers(&unique).is_empty());
    }
}
