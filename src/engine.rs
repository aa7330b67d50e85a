// ============================================
// src/engine.rs
// 変換・展開・検証をまとめた窓口
//
// どの呼び出しも入力だけで結果が決まり、状態を持たない。内部のエラーは
// 結果の `success` / `is_valid` と `error` に畳み込み、呼び出し側には返さない。
// ============================================

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::convert::{ConversionResult, convert_canonical};
use crate::expand::{ExpansionResult, expand};
use crate::group::{KanaUnit, group, typing_segments};
use crate::table::VariantTable;
use crate::validate::{MultiValidationResult, ValidationResult, match_canonical, match_variants};

/// 展開する綴りの上限（既定）
pub const DEFAULT_MAX_VARIANTS: usize = 1 << 16;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("too many spelling variants (limit {limit})")]
    TooManyVariants { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_variants: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_variants: DEFAULT_MAX_VARIANTS,
        }
    }
}

/// 変換表と設定の組
#[derive(Debug, Clone, Copy)]
pub struct Transliterator<'t> {
    table: &'t VariantTable,
    config: EngineConfig,
}

impl Transliterator<'static> {
    /// 共有の変換表と既定の設定
    pub fn global() -> Self {
        Self::new(VariantTable::global(), EngineConfig::default())
    }
}

impl<'t> Transliterator<'t> {
    pub fn new(table: &'t VariantTable, config: EngineConfig) -> Self {
        Self { table, config }
    }

    pub fn with_max_variants(mut self, max_variants: usize) -> Self {
        self.config.max_variants = max_variants;
        self
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn group<'s>(&self, text: &'s str) -> Vec<KanaUnit<'s>> {
        group(text, self.table)
    }

    pub fn segments(&self, text: &str) -> Vec<String> {
        typing_segments(text, self.table)
    }

    pub fn convert(&self, text: &str) -> ConversionResult {
        ConversionResult::ok(convert_canonical(text, self.table))
    }

    pub fn expand_variants(&self, text: &str) -> ExpansionResult {
        match expand(text, self.table, self.config.max_variants) {
            Ok(variants) => ExpansionResult {
                variants,
                success: true,
                error: None,
            },
            Err(e) => ExpansionResult {
                variants: Vec::new(),
                success: false,
                error: Some(e.to_string()),
            },
        }
    }

    /// 表示用の綴りだけで検証する
    pub fn validate_single(&self, target: &str, typed: &str) -> ValidationResult {
        let canonical = convert_canonical(target, self.table);
        match_canonical(&canonical, typed)
    }

    /// 全ての綴りで検証する
    pub fn validate_multi(&self, target: &str, typed: &str) -> MultiValidationResult {
        match expand(target, self.table, self.config.max_variants) {
            Ok(variants) => {
                let result = match_variants(target, &variants, typed);
                debug!(
                    unit = target,
                    typed,
                    is_valid = result.is_valid,
                    matching = result.matching_variants.len()
                );
                result
            }
            Err(e) => MultiValidationResult::invalid(e.to_string()),
        }
    }

    pub fn supported_units(&self) -> BTreeSet<&'t str> {
        self.table.supported_units()
    }

    pub fn variant_table(&self) -> BTreeMap<&'t str, &'t [String]> {
        self.table.entries()
    }
}
