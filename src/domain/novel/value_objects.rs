//! Novel Context - Value Objects

use serde::{Deserialize, Serialize};

use super::NovelError;

/// 标题最大字符数
pub const MAX_TITLE_CHARS: usize = 200;
/// 作者名最大字符数
pub const MAX_AUTHOR_CHARS: usize = 100;
/// 简介最大字符数
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
/// 单个类型名最大字符数
pub const MAX_GENRE_CHARS: usize = 50;

fn bounded_text(
    value: String,
    max_chars: usize,
    allow_empty: bool,
    field: &str,
) -> Result<String, String> {
    let value = value.trim().to_string();
    if !allow_empty && value.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if value.chars().count() > max_chars {
        return Err(format!("{} cannot exceed {} characters", field, max_chars));
    }
    Ok(value)
}

/// 小说标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, NovelError> {
        bounded_text(title.into(), MAX_TITLE_CHARS, false, "title")
            .map(Self)
            .map_err(NovelError::InvalidTitle)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 作者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author(String);

impl Author {
    pub fn new(author: impl Into<String>) -> Result<Self, NovelError> {
        bounded_text(author.into(), MAX_AUTHOR_CHARS, false, "author")
            .map(Self)
            .map_err(NovelError::InvalidAuthor)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 简介（允许为空）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(description: impl Into<String>) -> Result<Self, NovelError> {
        bounded_text(description.into(), MAX_DESCRIPTION_CHARS, true, "description")
            .map(Self)
            .map_err(NovelError::InvalidDescription)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 类型集合
///
/// 不变量:
/// - 至少一个类型
/// - 去重（忽略大小写），保留首次出现的顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genres(Vec<String>);

impl Genres {
    pub fn new(genres: Vec<String>) -> Result<Self, NovelError> {
        let mut result: Vec<String> = Vec::with_capacity(genres.len());

        for genre in genres {
            let genre = bounded_text(genre, MAX_GENRE_CHARS, false, "genre")
                .map_err(NovelError::InvalidGenres)?;
            if !result.iter().any(|g| g.to_lowercase() == genre.to_lowercase()) {
                result.push(genre);
            }
        }

        if result.is_empty() {
            return Err(NovelError::InvalidGenres(
                "at least one genre is required".to_string(),
            ));
        }

        Ok(Self(result))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// 连载状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelStatus {
    /// 连载中
    #[default]
    Ongoing,
    /// 已完结
    Completed,
    /// 暂停更新
    Hiatus,
}

impl NovelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Ongoing => "ongoing",
            NovelStatus::Completed => "completed",
            NovelStatus::Hiatus => "hiatus",
        }
    }

    pub fn parse(s: &str) -> Result<Self, NovelError> {
        match s {
            "ongoing" => Ok(NovelStatus::Ongoing),
            "completed" => Ok(NovelStatus::Completed),
            "hiatus" => Ok(NovelStatus::Hiatus),
            other => Err(NovelError::InvalidStatus(other.to_string())),
        }
    }
}

/// 章节号（正整数，在小说内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterNumber(u32);

impl ChapterNumber {
    pub const FIRST: ChapterNumber = ChapterNumber(1);

    pub fn new(number: u32) -> Result<Self, NovelError> {
        if number == 0 {
            return Err(NovelError::InvalidChapterNumber(
                "chapter number must be positive".to_string(),
            ));
        }
        Ok(Self(number))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// 缺省章节标题
    pub fn default_title(&self) -> String {
        format!("Chapter {}", self.0)
    }
}

impl std::fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节标题，缺省为 "Chapter N"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterTitle(String);

impl ChapterTitle {
    pub fn new(title: Option<String>, number: ChapterNumber) -> Result<Self, NovelError> {
        match title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(title) => Title::new(title).map(|t| Self(t.into_inner())),
            None => Ok(Self(number.default_title())),
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimmed_and_bounded() {
        assert_eq!(Title::new("  Mở đầu ").unwrap().as_str(), "Mở đầu");
        assert!(Title::new("   ").is_err());
        // 按字符而非字节计数
        assert!(Title::new("ệ".repeat(MAX_TITLE_CHARS)).is_ok());
        assert!(Title::new("ệ".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_genres_deduplicated_case_insensitive() {
        let genres = Genres::new(vec![
            "Tiên Hiệp".to_string(),
            "tiên hiệp".to_string(),
            " Huyền Huyễn ".to_string(),
        ])
        .unwrap();
        assert_eq!(genres.as_slice(), &["Tiên Hiệp", "Huyền Huyễn"]);
    }

    #[test]
    fn test_genres_must_not_be_empty() {
        assert!(Genres::new(vec![]).is_err());
        assert!(Genres::new(vec!["  ".to_string()]).is_err());
    }

    #[test]
    fn test_status_roundtrip_and_unknown() {
        assert_eq!(NovelStatus::parse("hiatus").unwrap(), NovelStatus::Hiatus);
        assert_eq!(NovelStatus::default().as_str(), "ongoing");
        assert!(NovelStatus::parse("dropped").is_err());
    }

    #[test]
    fn test_chapter_number_positive() {
        assert!(ChapterNumber::new(0).is_err());
        assert_eq!(ChapterNumber::new(7).unwrap().default_title(), "Chapter 7");
    }

    #[test]
    fn test_chapter_title_defaults() {
        let number = ChapterNumber::new(3).unwrap();
        assert_eq!(ChapterTitle::new(None, number).unwrap().into_inner(), "Chapter 3");
        assert_eq!(
            ChapterTitle::new(Some("  ".to_string()), number).unwrap().into_inner(),
            "Chapter 3"
        );
        assert_eq!(
            ChapterTitle::new(Some("Hồi kết".to_string()), number).unwrap().into_inner(),
            "Hồi kết"
        );
    }
}
