// ============================================
// src/lib.rs
// ひらがな → ローマ字 変換エンジン
// ============================================

//! ひらがなを入力単位に区切り、表示用のローマ字と、打ち方の全候補を作る。
//! タイピング画面はキー入力のたびに [`validate_multi`] などで入力を検証する。
//!
//! ここにある関数は共有の変換表 ([`VariantTable::global`]) と既定の設定を使う。
//! 表や上限を変えたいときは [`Transliterator`] を直接作る。

use std::collections::{BTreeMap, BTreeSet};

pub mod convert;
pub mod engine;
pub mod expand;
pub mod group;
pub mod questions;
pub mod roman_mapping;
pub mod save_data;
pub mod session;
pub mod stats;
pub mod table;
pub mod validate;

pub use convert::{ConversionResult, PatternMode, consonant_prefix};
pub use engine::{DEFAULT_MAX_VARIANTS, EngineConfig, EngineError, Transliterator};
pub use expand::ExpansionResult;
pub use group::{KanaUnit, UnitKind};
pub use table::{TableError, VariantTable};
pub use validate::{MultiValidationResult, ValidationResult};

/// 入力単位に区切る
pub fn group(text: &str) -> Vec<KanaUnit<'_>> {
    Transliterator::global().group(text)
}

/// タイピング画面で1つずつ打たせる区切り（「っ」は次の単位とまとめる）
pub fn typing_segments(text: &str) -> Vec<String> {
    Transliterator::global().segments(text)
}

/// 表示用のローマ字に変換する
pub fn convert(text: &str) -> ConversionResult {
    Transliterator::global().convert(text)
}

/// 打ち方を全て列挙する
pub fn expand_variants(text: &str) -> ExpansionResult {
    Transliterator::global().expand_variants(text)
}

/// 表示用の綴りだけで入力を検証する
pub fn validate_single(target: &str, typed: &str) -> ValidationResult {
    Transliterator::global().validate_single(target, typed)
}

/// 全ての綴りで入力を検証する
pub fn validate_multi(target: &str, typed: &str) -> MultiValidationResult {
    Transliterator::global().validate_multi(target, typed)
}

pub fn list_supported_units() -> BTreeSet<&'static str> {
    Transliterator::global().supported_units()
}

pub fn list_variant_table() -> BTreeMap<&'static str, &'static [String]> {
    Transliterator::global().variant_table()
}
