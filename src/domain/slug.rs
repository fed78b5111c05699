//! Slug 生成
//!
//! 小说 URL 标识：小写 ASCII、数字和单个连字符
//! 越南语声调/变音符号折叠为基本字母（đ → d）

/// Slug 最大长度
pub const MAX_SLUG_LEN: usize = 80;

/// 标题全部被过滤掉时使用的 slug
const FALLBACK_SLUG: &str = "truyen";

/// 越南语带符号字母 → 基本字母
fn fold_vietnamese(ch: char) -> Option<char> {
    const TABLE: &[(char, &str)] = &[
        ('a', "àáạảãâầấậẩẫăằắặẳẵ"),
        ('e', "èéẹẻẽêềếệểễ"),
        ('i', "ìíịỉĩ"),
        ('o', "òóọỏõôồốộổỗơờớợởỡ"),
        ('u', "ùúụủũưừứựửữ"),
        ('y', "ỳýỵỷỹ"),
        ('d', "đ"),
    ];

    TABLE
        .iter()
        .find(|(_, variants)| variants.contains(ch))
        .map(|(base, _)| *base)
}

/// 组合附加符号（NFD 输入）
#[inline]
fn is_combining_mark(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036F}')
}

/// 从标题生成 slug
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        if is_combining_mark(ch) {
            continue;
        }

        let ch = fold_vietnamese(ch).unwrap_or(ch);

        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }

        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// 冲突时的候选 slug: base, base-2, base-3, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}
