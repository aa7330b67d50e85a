// ============================================
// src/group.rs
// かな文字列を「入力単位」に区切る
// ============================================

use serde::Serialize;
use tracing::debug;

use crate::roman_mapping::GEMINATE;
use crate::table::VariantTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// 促音「っ」
    Geminate,
    /// 拗音など2文字で1音の単位（「きゃ」）
    Digraph,
    /// それ以外（記号や表にない文字も含む）
    Simple,
}

/// 入力単位。元の文字列を借用する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KanaUnit<'a> {
    pub kind: UnitKind,
    #[serde(rename = "unit_text")]
    pub text: &'a str,
    /// 元の文字列での位置（文字単位）
    pub source_index: usize,
}

/// 左から順に区切る。2文字の組み合わせを1文字より優先する。
pub fn group<'a>(text: &'a str, table: &VariantTable) -> Vec<KanaUnit<'a>> {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    let mut units = Vec::new();
    let mut idx = 0;
    while idx < char_count {
        // 2文字チェック
        if idx + 2 <= char_count {
            let pair = &text[bounds[idx]..bounds[idx + 2]];
            if table.is_digraph(pair) {
                units.push(KanaUnit {
                    kind: UnitKind::Digraph,
                    text: pair,
                    source_index: idx,
                });
                idx += 2;
                continue;
            }
        }

        let single = &text[bounds[idx]..bounds[idx + 1]];
        let kind = if single.starts_with(GEMINATE) {
            UnitKind::Geminate
        } else {
            UnitKind::Simple
        };
        units.push(KanaUnit {
            kind,
            text: single,
            source_index: idx,
        });
        idx += 1;
    }

    debug!(chars = char_count, units = units.len(), "grouped");
    units
}

/// タイピング画面で1つずつ打たせる区切り。
///
/// 「っ」は次の単位とくっつける（「っこ」で "kko"）。最後の「っ」だけは単独。
pub fn typing_segments(text: &str, table: &VariantTable) -> Vec<String> {
    let units = group(text, table);
    let mut segments = Vec::with_capacity(units.len());
    let mut iter = units.iter().peekable();
    while let Some(unit) = iter.next() {
        let fused = match unit.kind {
            UnitKind::Geminate => iter.next_if(|next| next.kind != UnitKind::Geminate),
            UnitKind::Digraph | UnitKind::Simple => None,
        };
        match fused {
            Some(next) => segments.push(format!("{}{}", unit.text, next.text)),
            None => segments.push(unit.text.to_string()),
        }
    }
    segments
}
