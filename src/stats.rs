// ============================================
// src/stats.rs
// スコア・速度・正確さの計算
// ============================================

use std::time::Duration;

use serde::Serialize;

use crate::save_data::TypeRecord;

/// 1問分の成績
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypingStats {
    pub total_chars: u32,
    pub misses: u32,
    pub duration_sec: f64,
    /// 1秒あたりの打鍵数
    pub cps: f64,
    /// 1分あたりの単語数（5文字 = 1単語）
    pub wpm: f64,
    /// 正確さ (%)
    pub accuracy: f64,
    pub score: f64,
    pub xp: u32,
}

impl TypingStats {
    pub fn compute(total_chars: u32, misses: u32, elapsed: Duration) -> Self {
        let duration_sec = elapsed.as_secs_f64();
        let chars = total_chars as f64;

        let accuracy = accuracy_percent(total_chars, misses);

        let mut cps = 0.0;
        if duration_sec > 0.0 {
            cps = chars / duration_sec; // CPS = 総文字数 / 秒
        }
        let wpm = words_per_minute(total_chars, duration_sec);

        let accuracy_mod = (accuracy / 100.0).powi(3); // ミスが少ないほどボーナス
        let score = (cps * 100.0) * accuracy_mod * chars;

        let skill_bonus = 1.0 + (cps / 10.0); // CPSが高いほどボーナス
        let xp = (chars * skill_bonus * accuracy_mod).round() as u32;

        Self {
            total_chars,
            misses,
            duration_sec,
            cps,
            wpm,
            accuracy,
            score,
            xp,
        }
    }
}

/// 正確さ (%)。1文字も打っていなければ 100。
pub fn accuracy_percent(total_chars: u32, misses: u32) -> f64 {
    let total_attempts = (total_chars + misses) as f64;
    if total_attempts > 0.0 {
        (total_chars as f64 / total_attempts) * 100.0
    } else {
        100.0
    }
}

/// WPM（5文字 = 1単語）
pub fn words_per_minute(total_chars: u32, duration_sec: f64) -> f64 {
    if duration_sec > 0.0 {
        (total_chars as f64 / 5.0) * 60.0 / duration_sec
    } else {
        0.0
    }
}

/// 履歴全体の集計
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HistorySummary {
    pub total_sessions: usize,
    pub average_wpm: f64,
    pub average_accuracy: f64,
    pub best_wpm: f64,
}

impl HistorySummary {
    pub fn from_records(records: &[TypeRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let n = records.len() as f64;
        Self {
            total_sessions: records.len(),
            average_wpm: records.iter().map(|r| r.wpm).sum::<f64>() / n,
            average_accuracy: records.iter().map(|r| r.accuracy).sum::<f64>() / n,
            best_wpm: records.iter().map(|r| r.wpm).fold(0.0, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(wpm: f64, accuracy: f64) -> TypeRecord {
        TypeRecord {
            timestamp: Utc::now(),
            question_japanese: "猫".into(),
            question_hiragana: "ねこ".into(),
            total_chars: 4,
            duration_sec: 1.0,
            misses: 0,
            cps: 4.0,
            wpm,
            accuracy,
            score: 0.0,
            xp_gained: 0,
        }
    }

    #[test]
    fn perfect_run() {
        let stats = TypingStats::compute(10, 0, Duration::from_secs(2));
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.cps, 5.0);
        assert_eq!(stats.wpm, 60.0);
        assert_eq!(stats.score, 5000.0);
        assert_eq!(stats.xp, 15);
    }

    #[test]
    fn misses_lower_accuracy() {
        let stats = TypingStats::compute(9, 1, Duration::from_secs(3));
        assert!((stats.accuracy - 90.0).abs() < 1e-9);
        assert!(stats.score < 9.0 * 300.0);
    }

    #[test]
    fn zero_duration_does_not_divide() {
        let stats = TypingStats::compute(5, 0, Duration::ZERO);
        assert_eq!(stats.cps, 0.0);
        assert_eq!(stats.wpm, 0.0);
        assert_eq!(stats.accuracy, 100.0);
    }

    #[test]
    fn nothing_typed() {
        let stats = TypingStats::compute(0, 0, Duration::ZERO);
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.xp, 0);
    }

    #[test]
    fn summary_of_history() {
        let summary = HistorySummary::from_records(&[record(40.0, 90.0), record(60.0, 100.0)]);
        assert_eq!(summary.total_sessions, 2);
        assert_eq!(summary.average_wpm, 50.0);
        assert_eq!(summary.average_accuracy, 95.0);
        assert_eq!(summary.best_wpm, 60.0);
        assert_eq!(HistorySummary::from_records(&[]), HistorySummary::default());
    }
}
