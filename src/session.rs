// ============================================
// src/session.rs
// 1問分のタイピング状態
// ============================================

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::engine::Transliterator;
use crate::stats::TypingStats;
use crate::validate::{MultiValidationResult, match_variants};

/// 「タイピング単位」（例：「し」「きゃ」「っこ」）の状態を管理する
#[derive(Debug, Clone)]
pub struct Segment {
    kana: String,
    /// 打ち方の候補。問題を読み込むときに一度だけ展開する。
    variants: Vec<String>,
    /// この単位で入力済みの文字
    typed: String,
}

impl Segment {
    fn new(kana: String, engine: &Transliterator<'_>) -> Self {
        let expansion = engine.expand_variants(&kana);
        let variants = if expansion.success {
            expansion.variants
        } else {
            warn!(kana = %kana, error = ?expansion.error, "falling back to canonical spelling");
            vec![engine.convert(&kana).romaji]
        };
        Self {
            kana,
            variants,
            typed: String::new(),
        }
    }

    pub fn kana(&self) -> &str {
        &self.kana
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// 今の入力に合うローマ字パターン（表示用）
    pub fn current_pattern(&self) -> &str {
        self.variants
            .iter()
            .find(|v| v.starts_with(self.typed.as_str()))
            .or_else(|| self.variants.first())
            .map_or("", String::as_str)
    }

    /// 現在のパターンで、まだタイプしていない残りの部分
    pub fn remaining(&self) -> &str {
        let pattern = self.current_pattern();
        pattern.strip_prefix(self.typed.as_str()).unwrap_or(pattern)
    }

    fn check(&self, typed: &str) -> MultiValidationResult {
        match_variants(&self.kana, &self.variants, typed)
    }

    /// 入力済みの文字がどれかの綴りと完全に一致しているか
    fn has_exact(&self) -> bool {
        !self.typed.is_empty() && self.variants.iter().any(|v| *v == self.typed)
    }
}

/// 1キーごとの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// 受け付けた（単位はまだ途中）
    Accepted,
    /// 単位を打ち終わった
    SegmentDone,
    /// 問題を全て打ち終わった
    Finished,
    /// ミスタイプ。入力は捨てる。
    Mistake { expected: Vec<char> },
}

/// 描画用の単位の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    Done,
    Current,
    Pending,
}

#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    pub kana: &'a str,
    pub typed: &'a str,
    pub remaining: &'a str,
    pub state: SegmentState,
}

/// 1問分の入力状態
#[derive(Debug, Clone)]
pub struct TypingSession {
    segments: Vec<Segment>,
    /// 現在タイプ中の単位のインデックス
    current: usize,
    is_error: bool,
    misses: u32,
    started_at: Option<Instant>,
}

impl TypingSession {
    pub fn new(hiragana: &str) -> Self {
        Self::with_engine(hiragana, &Transliterator::global())
    }

    pub fn with_engine(hiragana: &str, engine: &Transliterator<'_>) -> Self {
        let segments: Vec<Segment> = engine
            .segments(hiragana)
            .into_iter()
            .map(|kana| Segment::new(kana, engine))
            .collect();
        debug!(segments = segments.len(), "session loaded");
        Self {
            segments,
            current: 0,
            is_error: false,
            misses: 0,
            started_at: None,
        }
    }

    /// キー入力の処理
    pub fn input(&mut self, c: char) -> KeyOutcome {
        // タイマー開始
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        if self.is_finished() {
            return KeyOutcome::Finished;
        }

        let is_last = self.current + 1 == self.segments.len();
        let segment = &mut self.segments[self.current];
        let candidate = format!("{}{c}", segment.typed);
        let result = segment.check(&candidate);

        if result.is_valid {
            segment.typed = candidate;
            self.is_error = false;
            // 「ん」の "n" のように続きがある場合は、最後の単位以外は次のキーを待つ
            if result.is_complete(&segment.typed)
                || (is_last && result.has_exact(&segment.typed))
            {
                return self.advance();
            }
            return KeyOutcome::Accepted;
        }

        // 打ち終わっている単位なら、次の単位の1文字目として試す
        if segment.has_exact() {
            self.advance();
            return self.input(c);
        }

        self.is_error = true;
        self.misses += 1;
        KeyOutcome::Mistake {
            expected: segment.check(&segment.typed).expected_next_chars,
        }
    }

    fn advance(&mut self) -> KeyOutcome {
        self.current += 1;
        if self.is_finished() {
            KeyOutcome::Finished
        } else {
            KeyOutcome::SegmentDone
        }
    }

    /// Backspace の処理
    pub fn backspace(&mut self) {
        // 既に完了している場合は最後の単位に戻る
        if self.is_finished() && self.current > 0 {
            self.current -= 1;
        }

        if let Some(segment) = self.segments.get_mut(self.current) {
            if segment.typed.pop().is_none() && self.current > 0 {
                // 前の単位に戻り、最後の1文字を削る
                self.current -= 1;
                self.segments[self.current].typed.pop();
            }
        }
        self.is_error = false; // Backspaceでエラーはリセット
    }

    /// 最初からやり直す
    pub fn reset(&mut self) {
        for segment in &mut self.segments {
            segment.typed.clear();
        }
        self.current = 0;
        self.is_error = false;
        self.misses = 0;
        self.started_at = None;
    }

    /// お題をすべて打ち終わったか
    pub fn is_finished(&self) -> bool {
        self.current >= self.segments.len()
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// 次に打てる文字
    pub fn expected_next(&self) -> Vec<char> {
        self.segments
            .get(self.current)
            .map(|s| s.check(&s.typed).expected_next_chars)
            .unwrap_or_default()
    }

    /// 実際にタイプしたローマ字の総数
    pub fn typed_chars(&self) -> u32 {
        self.segments
            .iter()
            .map(|s| s.typed.chars().count() as u32)
            .sum()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn stats(&self) -> TypingStats {
        TypingStats::compute(self.typed_chars(), self.misses, self.elapsed())
    }

    /// 描画用に、全ての単位の状態を返す
    pub fn views(&self) -> Vec<SegmentView<'_>> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| SegmentView {
                kana: s.kana(),
                typed: s.typed(),
                remaining: s.remaining(),
                state: match i.cmp(&self.current) {
                    std::cmp::Ordering::Less => SegmentState::Done,
                    std::cmp::Ordering::Equal => SegmentState::Current,
                    std::cmp::Ordering::Greater => SegmentState::Pending,
                },
            })
            .collect()
    }
}
