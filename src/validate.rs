// ============================================
// src/validate.rs
// 入力途中のローマ字を検証する
// ============================================

use serde::Serialize;

/// 単一パターン（表示用の綴りのみ）の検証結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// 次に打つべき文字。完全一致なら `None`。
    pub expected_next: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 複数パターンの検証結果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MultiValidationResult {
    pub is_valid: bool,
    /// 入力と一致する、または入力で始まる綴り
    pub matching_variants: Vec<String>,
    /// まだ打ち終わっていない綴りの次の文字（重複なし）
    pub expected_next_chars: Vec<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MultiValidationResult {
    pub fn invalid(error: String) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
            ..Default::default()
        }
    }

    /// 入力と完全に一致する綴りがあるか
    pub fn has_exact(&self, typed: &str) -> bool {
        self.matching_variants.iter().any(|v| v == typed)
    }

    /// 完全一致した上で、続きを打てる綴りが残っていないか
    pub fn is_complete(&self, typed: &str) -> bool {
        self.has_exact(typed) && self.expected_next_chars.is_empty()
    }
}

/// 展開済みの綴り候補に対して入力を照合する。
///
/// キー入力のたびに呼ばれるので、展開はやり直さない。
pub fn match_variants<S: AsRef<str>>(
    target: &str,
    variants: &[S],
    typed: &str,
) -> MultiValidationResult {
    let mut matching_variants = Vec::new();
    let mut expected_next_chars = Vec::new();

    for variant in variants {
        let variant = variant.as_ref();
        let Some(rest) = variant.strip_prefix(typed) else {
            continue;
        };
        matching_variants.push(variant.to_string());
        if let Some(next) = rest.chars().next() {
            if !expected_next_chars.contains(&next) {
                expected_next_chars.push(next);
            }
        }
    }

    if matching_variants.is_empty() {
        return MultiValidationResult::invalid(format!(
            "\"{typed}\" does not match any spelling of \"{target}\""
        ));
    }

    MultiValidationResult {
        is_valid: true,
        matching_variants,
        expected_next_chars,
        error: None,
    }
}

/// 表示用の綴り1つに対して入力を照合する。
///
/// 間違っている場合は、最初に食い違った位置で期待していた文字を返す。
pub fn match_canonical(canonical: &str, typed: &str) -> ValidationResult {
    if let Some(rest) = canonical.strip_prefix(typed) {
        return ValidationResult {
            is_valid: true,
            expected_next: rest.chars().next(),
            error: None,
        };
    }

    let mut expected = canonical.chars();
    let mut actual = typed.chars();
    loop {
        match (expected.next(), actual.next()) {
            (Some(e), Some(a)) if e == a => continue,
            (expected_char, actual_char) => {
                let expected_text = expected_char
                    .map_or_else(|| "end of input".to_string(), |c| format!("\"{c}\""));
                let actual_text = actual_char.map_or_else(String::new, String::from);
                return ValidationResult {
                    is_valid: false,
                    expected_next: expected_char,
                    error: Some(format!("Expected {expected_text} but got \"{actual_text}\"")),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_has_no_next_char() {
        let result = match_variants("か", &["ka", "ca"], "ka");
        assert!(result.is_valid);
        assert_eq!(result.matching_variants, ["ka"]);
        assert!(result.expected_next_chars.is_empty());
        assert!(result.is_complete("ka"));
    }

    #[test]
    fn prefix_match_reports_next_char() {
        let result = match_variants("ちゃ", &["cha", "tya"], "t");
        assert!(result.is_valid);
        assert_eq!(result.matching_variants, ["tya"]);
        assert_eq!(result.expected_next_chars, ['y']);
    }

    #[test]
    fn empty_input_matches_everything() {
        let result = match_variants("し", &["shi", "si"], "");
        assert_eq!(result.matching_variants, ["shi", "si"]);
        assert_eq!(result.expected_next_chars, ['s']);
    }

    #[test]
    fn exact_and_open_at_once() {
        let result = match_variants("ん", &["n", "nn"], "n");
        assert!(result.is_valid);
        assert_eq!(result.matching_variants, ["n", "nn"]);
        assert_eq!(result.expected_next_chars, ['n']);
        assert!(result.has_exact("n"));
        assert!(!result.is_complete("n"));
    }

    #[test]
    fn mismatch_is_reported() {
        let result = match_variants("か", &["ka", "ca"], "x");
        assert!(!result.is_valid);
        assert!(result.matching_variants.is_empty());
        let error = result.error.unwrap();
        assert!(error.contains("\"x\""));
        assert!(error.contains("か"));
    }

    #[test]
    fn canonical_prefix_and_exact() {
        assert_eq!(
            match_canonical("ka", "k"),
            ValidationResult {
                is_valid: true,
                expected_next: Some('a'),
                error: None
            }
        );
        assert_eq!(match_canonical("ka", "ka").expected_next, None);
        assert!(match_canonical("", "").is_valid);
    }

    #[test]
    fn canonical_mismatch_names_divergent_char() {
        let result = match_canonical("ka", "x");
        assert!(!result.is_valid);
        assert_eq!(result.expected_next, Some('k'));
        assert!(result.error.unwrap().contains("Expected \"k\""));

        let result = match_canonical("kya", "ki");
        assert_eq!(result.expected_next, Some('y'));
        assert_eq!(result.error.unwrap(), "Expected \"y\" but got \"i\"");
    }

    #[test]
    fn canonical_overtyped() {
        let result = match_canonical("a", "ab");
        assert!(!result.is_valid);
        assert_eq!(result.expected_next, None);
        assert_eq!(result.error.unwrap(), "Expected end of input but got \"b\"");

        assert!(!match_canonical("", "a").is_valid);
    }
}
