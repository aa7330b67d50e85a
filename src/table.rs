// ============================================
// src/table.rs
// かな → 綴り候補 の変換表
//
// 組み込みの表（`create_roman_mapping`）から作り、必要ならユーザーの JSON で
// 上書きする。作成時に検証し、その後は読み取り専用でプロセス全体から共有する。
// ============================================

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use tracing::debug;

use crate::roman_mapping::{
    GEMINATE, GEMINATE_DISPLAY_FALLBACK, GEMINATE_FALLBACKS, create_roman_mapping,
};

static INSTALLED: OnceLock<VariantTable> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("JSON parse error: {0}")]
    Parse(String),
    #[error("unit must be one or two characters: {0:?}")]
    BadUnitLength(String),
    #[error("no spellings for unit: {0}")]
    NoVariants(String),
    #[error("empty spelling for unit: {0}")]
    EmptyVariant(String),
    #[error("geminate marker cannot start a two-character unit: {0}")]
    GeminateDigraph(String),
    #[error("variant table already initialized")]
    AlreadyInitialized,
}

/// かな単位ごとの綴り候補
#[derive(Debug, Clone)]
pub struct VariantTable {
    units: HashMap<String, Vec<String>>,
    geminate_fallbacks: Vec<String>,
}

impl VariantTable {
    /// 組み込みの表
    pub fn builtin() -> Self {
        let units = create_roman_mapping()
            .into_iter()
            .map(|(kana, patterns)| {
                let patterns = patterns.into_iter().map(str::to_string).collect();
                (kana.to_string(), patterns)
            })
            .collect();
        Self {
            units,
            geminate_fallbacks: GEMINATE_FALLBACKS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 組み込みの表に JSON オブジェクト（`{"か": ["ka", "ca"]}`）を重ねる。
    ///
    /// キー「っ」は単体で打つときの綴りを置き換える。
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let overrides: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|e| TableError::Parse(e.to_string()))?;

        let mut table = Self::builtin();
        for (unit, patterns) in overrides {
            validate_entry(&unit, &patterns)?;
            if is_geminate(&unit) {
                table.geminate_fallbacks = patterns;
            } else {
                table.units.insert(unit, patterns);
            }
        }
        debug!(units = table.units.len(), "custom variant table built");
        Ok(table)
    }

    /// 最初の `global()` 呼び出しより前に、独自の表を設定する
    pub fn install(table: VariantTable) -> Result<(), TableError> {
        INSTALLED
            .set(table)
            .map_err(|_| TableError::AlreadyInitialized)
    }

    /// プロセス全体で共有する表。未設定なら組み込みの表で初期化する。
    pub fn global() -> &'static VariantTable {
        INSTALLED.get_or_init(Self::builtin)
    }

    /// 単位の綴り候補。表にない単位は `None`。
    pub fn variants(&self, unit: &str) -> Option<&[String]> {
        self.units.get(unit).map(Vec::as_slice)
    }

    /// 表示用の綴り（候補の先頭）
    pub fn canonical(&self, unit: &str) -> Option<&str> {
        self.variants(unit)
            .and_then(|patterns| patterns.first())
            .map(String::as_str)
    }

    pub fn is_digraph(&self, pair: &str) -> bool {
        pair.chars().count() == 2 && self.units.contains_key(pair)
    }

    pub fn geminate_fallbacks(&self) -> &[String] {
        &self.geminate_fallbacks
    }

    /// 単一パターンモードで、後ろに何もない「っ」の綴り
    pub fn geminate_display_fallback(&self) -> &str {
        GEMINATE_DISPLAY_FALLBACK
    }

    /// 対応しているかな単位の一覧（「っ」を含む）
    pub fn supported_units(&self) -> BTreeSet<&str> {
        let mut units: BTreeSet<&str> = self.units.keys().map(String::as_str).collect();
        units.insert(GEMINATE_STR);
        units
    }

    /// 表全体（「っ」は単体で打つときの綴り）
    pub fn entries(&self) -> BTreeMap<&str, &[String]> {
        let mut entries: BTreeMap<&str, &[String]> = self
            .units
            .iter()
            .map(|(unit, patterns)| (unit.as_str(), patterns.as_slice()))
            .collect();
        entries.insert(GEMINATE_STR, &self.geminate_fallbacks);
        entries
    }
}

impl Default for VariantTable {
    fn default() -> Self {
        Self::builtin()
    }
}

const GEMINATE_STR: &str = "っ";

fn is_geminate(unit: &str) -> bool {
    let mut chars = unit.chars();
    chars.next() == Some(GEMINATE) && chars.next().is_none()
}

fn validate_entry(unit: &str, patterns: &[String]) -> Result<(), TableError> {
    let len = unit.chars().count();
    if !(1..=2).contains(&len) {
        return Err(TableError::BadUnitLength(unit.to_string()));
    }
    if len == 2 && unit.starts_with(GEMINATE) {
        return Err(TableError::GeminateDigraph(unit.to_string()));
    }
    if patterns.is_empty() {
        return Err(TableError::NoVariants(unit.to_string()));
    }
    if patterns.iter().any(String::is_empty) {
        return Err(TableError::EmptyVariant(unit.to_string()));
    }
    Ok(())
}
