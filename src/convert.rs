// ============================================
// src/convert.rs
// 単一パターン変換（表示用の綴りを1つだけ作る）
// ============================================

use serde::Serialize;

use crate::group::{UnitKind, group};
use crate::table::VariantTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub romaji: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn ok(romaji: String) -> Self {
        Self {
            romaji,
            success: true,
            error: None,
        }
    }
}

/// 子音の取り出し方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// 表示用の綴りだけを扱う
    Single,
    /// 登録されている全ての綴りを扱う
    Multi,
}

/// 先頭の文字がそのまま子音にならない綴り
const SINGLE_CLUSTERS: &[(&str, &str)] = &[("ch", "t"), ("ts", "t"), ("sh", "s"), ("f", "f")];

const MULTI_CLUSTERS: &[(&str, &str)] = &[
    ("ch", "t"),
    ("ts", "t"),
    ("sh", "s"),
    ("f", "f"),
    ("th", "t"),
    ("dh", "d"),
    ("ty", "t"),
    ("dy", "d"),
    ("sy", "s"),
    ("jy", "j"),
    ("zy", "z"),
];

/// 促音で重ねる子音を返す。
///
/// "chi" → "t", "shi" → "s", "ka" → "k", "a" → ""。
pub fn consonant_prefix(spelling: &str, mode: PatternMode) -> &str {
    let clusters = match mode {
        PatternMode::Single => SINGLE_CLUSTERS,
        PatternMode::Multi => MULTI_CLUSTERS,
    };
    if let Some((_, consonant)) = clusters
        .iter()
        .find(|(cluster, _)| spelling.starts_with(cluster))
    {
        return *consonant;
    }

    match spelling.chars().next() {
        Some(first) if is_consonant(first) => &spelling[..first.len_utf8()],
        _ => "",
    }
}

fn is_consonant(c: char) -> bool {
    matches!(
        c.to_ascii_lowercase(),
        'b' | 'c'
            | 'd'
            | 'f'
            | 'g'
            | 'h'
            | 'j'
            | 'k'
            | 'l'
            | 'm'
            | 'n'
            | 'p'
            | 'q'
            | 'r'
            | 's'
            | 't'
            | 'v'
            | 'w'
            | 'x'
            | 'y'
            | 'z'
    )
}

/// ひらがな文字列を表示用のローマ字1通りに変換する。
///
/// 表にない文字はそのまま残す。
pub fn convert_canonical(text: &str, table: &VariantTable) -> String {
    let units = group(text, table);
    let mut romaji = String::with_capacity(text.len());

    for (idx, unit) in units.iter().enumerate() {
        match unit.kind {
            UnitKind::Geminate => {
                let follower = units
                    .get(idx + 1)
                    .and_then(|next| table.canonical(next.text));
                match follower {
                    Some(next) => romaji.push_str(consonant_prefix(next, PatternMode::Single)),
                    None => romaji.push_str(table.geminate_display_fallback()),
                }
            }
            UnitKind::Digraph | UnitKind::Simple => {
                romaji.push_str(table.canonical(unit.text).unwrap_or(unit.text));
            }
        }
    }
    romaji
}
