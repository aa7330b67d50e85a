// ============================================
// src/expand.rs
// 複数パターン展開
//
// 単位ごとの綴り候補を左から順に掛け合わせ、打ち方の全組み合わせを作る。
// 「か」(ka, ca) × 「ちゃ」(cha, tya) なら 4 通り。「っ」は次の単位の
// 各候補に子音を重ねた形で 1 ステップとして扱う。
// ============================================

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::convert::{PatternMode, consonant_prefix};
use crate::engine::EngineError;
use crate::group::{KanaUnit, UnitKind, group};
use crate::table::VariantTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpansionResult {
    pub variants: Vec<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 単位の綴り候補。表にない単位はその文字自体が唯一の候補。
fn unit_variants<'a>(unit: &KanaUnit<'a>, table: &'a VariantTable) -> Vec<&'a str> {
    match unit.kind {
        UnitKind::Geminate => table
            .geminate_fallbacks()
            .iter()
            .map(String::as_str)
            .collect(),
        UnitKind::Digraph | UnitKind::Simple => match table.variants(unit.text) {
            Some(patterns) => patterns.iter().map(String::as_str).collect(),
            None => vec![unit.text],
        },
    }
}

/// 途中までの綴り × 次の単位の候補
fn product<S: AsRef<str>>(
    acc: &[String],
    step: &[S],
    max_variants: usize,
) -> Result<Vec<String>, EngineError> {
    let count = acc.len().saturating_mul(step.len());
    if count > max_variants {
        warn!(count, max_variants, "variant expansion exceeds limit");
        return Err(EngineError::TooManyVariants {
            limit: max_variants,
        });
    }

    let mut seen = HashSet::with_capacity(count);
    let mut next = Vec::with_capacity(count);
    for prefix in acc {
        for suffix in step {
            let joined = format!("{prefix}{}", suffix.as_ref());
            if seen.insert(joined.clone()) {
                next.push(joined);
            }
        }
    }
    Ok(next)
}

/// 打ち方を全て列挙する。空文字列なら `[""]`。
pub fn expand(
    text: &str,
    table: &VariantTable,
    max_variants: usize,
) -> Result<Vec<String>, EngineError> {
    let _span = debug_span!("expand", chars = text.chars().count()).entered();
    let units = group(text, table);

    let mut acc = vec![String::new()];
    let mut idx = 0;
    while idx < units.len() {
        let unit = &units[idx];
        acc = match (unit.kind, units.get(idx + 1)) {
            // 「っっ」の前の「っ」は末尾と同じく単体の綴り
            (UnitKind::Geminate, Some(next)) if next.kind != UnitKind::Geminate => {
                // 次の単位を消費し、子音を重ねた綴りをまとめて足す
                idx += 1;
                let doubled: Vec<String> = unit_variants(next, table)
                    .into_iter()
                    .map(|v| format!("{}{v}", consonant_prefix(v, PatternMode::Multi)))
                    .collect();
                product(&acc, &doubled, max_variants)?
            }
            _ => product(&acc, &unit_variants(unit, table), max_variants)?,
        };
        idx += 1;
    }

    debug!(variants = acc.len());
    Ok(acc)
}
