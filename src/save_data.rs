// ============================================
// src/save_data.rs
// セーブデータの構造と読み書きロジック
// ============================================

use bincode::config::standard;
use bincode::{Decode, Encode};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::questions::Question;
use crate::stats::{TypingStats, accuracy_percent, words_per_minute};

const SAVE_FILE_BIN: &str = "player_data.bin";
const SAVE_FILE_JSON: &str = "save_data.json"; // デバッグ・移行用
/// 0.1 系が書いていたバイナリ (wpm / accuracy なし)
const LEGACY_SAVE_FILE_BIN: &str = "save_data.bin";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 1回ごとのお題の記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub timestamp: DateTime<Utc>,
    pub question_japanese: String,
    pub question_hiragana: String,
    pub total_chars: u32,
    pub duration_sec: f64,
    pub misses: u32,
    pub cps: f64,
    #[serde(default)]
    pub wpm: f64,
    #[serde(default)]
    pub accuracy: f64,
    pub score: f64,
    pub xp_gained: u32,
}

impl TypeRecord {
    pub fn new(question: &Question, stats: &TypingStats) -> Self {
        Self {
            timestamp: Utc::now(),
            question_japanese: question.japanese.to_string(),
            question_hiragana: question.hiragana.to_string(),
            total_chars: stats.total_chars,
            duration_sec: stats.duration_sec,
            misses: stats.misses,
            cps: stats.cps,
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            score: stats.score,
            xp_gained: stats.xp,
        }
    }
}

/// bincode用の内部表現（DateTimeをi64に変換）
#[derive(Encode, Decode)]
struct TypeRecordBin {
    timestamp_secs: i64,
    question_japanese: String,
    question_hiragana: String,
    total_chars: u32,
    duration_sec: f64,
    misses: u32,
    cps: f64,
    wpm: f64,
    accuracy: f64,
    score: f64,
    xp_gained: u32,
}

impl From<&TypeRecord> for TypeRecordBin {
    fn from(record: &TypeRecord) -> Self {
        Self {
            timestamp_secs: record.timestamp.timestamp(),
            question_japanese: record.question_japanese.clone(),
            question_hiragana: record.question_hiragana.clone(),
            total_chars: record.total_chars,
            duration_sec: record.duration_sec,
            misses: record.misses,
            cps: record.cps,
            wpm: record.wpm,
            accuracy: record.accuracy,
            score: record.score,
            xp_gained: record.xp_gained,
        }
    }
}

impl From<TypeRecordBin> for TypeRecord {
    fn from(bin: TypeRecordBin) -> Self {
        Self {
            timestamp: DateTime::from_timestamp(bin.timestamp_secs, 0).unwrap_or_default(),
            question_japanese: bin.question_japanese,
            question_hiragana: bin.question_hiragana,
            total_chars: bin.total_chars,
            duration_sec: bin.duration_sec,
            misses: bin.misses,
            cps: bin.cps,
            wpm: bin.wpm,
            accuracy: bin.accuracy,
            score: bin.score,
            xp_gained: bin.xp_gained,
        }
    }
}

/// 0.1 系の bincode 形式
#[derive(Encode, Decode)]
struct LegacyTypeRecordBin {
    timestamp_secs: i64,
    question_japanese: String,
    question_hiragana: String,
    total_chars: u32,
    duration_sec: f64,
    misses: u32,
    cps: f64,
    score: f64,
    xp_gained: u32,
}

impl From<LegacyTypeRecordBin> for TypeRecord {
    fn from(bin: LegacyTypeRecordBin) -> Self {
        Self {
            timestamp: DateTime::from_timestamp(bin.timestamp_secs, 0).unwrap_or_default(),
            // 保存されていない値は記録から計算し直す
            wpm: words_per_minute(bin.total_chars, bin.duration_sec),
            accuracy: accuracy_percent(bin.total_chars, bin.misses),
            question_japanese: bin.question_japanese,
            question_hiragana: bin.question_hiragana,
            total_chars: bin.total_chars,
            duration_sec: bin.duration_sec,
            misses: bin.misses,
            cps: bin.cps,
            score: bin.score,
            xp_gained: bin.xp_gained,
        }
    }
}

/// プレイヤーの進行状況データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub level: u32,
    pub current_xp: u32,
    pub total_typed_chars: u32,
    pub total_misses: u32,
    /// 過去のタイピング記録
    pub history: Vec<TypeRecord>,
}

/// bincode用の内部表現
#[derive(Encode, Decode)]
struct PlayerDataBin {
    level: u32,
    current_xp: u32,
    total_typed_chars: u32,
    total_misses: u32,
    history: Vec<TypeRecordBin>,
}

impl From<&PlayerData> for PlayerDataBin {
    fn from(data: &PlayerData) -> Self {
        Self {
            level: data.level,
            current_xp: data.current_xp,
            total_typed_chars: data.total_typed_chars,
            total_misses: data.total_misses,
            history: data.history.iter().map(TypeRecordBin::from).collect(),
        }
    }
}

impl From<PlayerDataBin> for PlayerData {
    fn from(bin: PlayerDataBin) -> Self {
        Self {
            level: bin.level,
            current_xp: bin.current_xp,
            total_typed_chars: bin.total_typed_chars,
            total_misses: bin.total_misses,
            history: bin.history.into_iter().map(TypeRecord::from).collect(),
        }
    }
}

#[derive(Encode, Decode)]
struct LegacyPlayerDataBin {
    level: u32,
    current_xp: u32,
    total_typed_chars: u32,
    total_misses: u32,
    history: Vec<LegacyTypeRecordBin>,
}

impl From<LegacyPlayerDataBin> for PlayerData {
    fn from(bin: LegacyPlayerDataBin) -> Self {
        Self {
            level: bin.level,
            current_xp: bin.current_xp,
            total_typed_chars: bin.total_typed_chars,
            total_misses: bin.total_misses,
            history: bin.history.into_iter().map(TypeRecord::from).collect(),
        }
    }
}

impl Default for PlayerData {
    /// プレイヤーデータの初期値
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            total_typed_chars: 0,
            total_misses: 0,
            history: Vec::new(),
        }
    }
}

/// MARK:データ保存用ディレクトリ
///
/// OSごとのデータ保存用ディレクトリ。取得できなければカレントディレクトリ。
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("jp", "Fukumoto0141", "TYPE_WIZ")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl PlayerData {
    /// 次のレベルまでに必要な経験値を計算する
    pub fn required_xp_for_next_level(&self) -> u32 {
        ((self.level as f64).powf(1.1) * 10.0).round() as u32
    }

    /// 経験値を加算し、レベルアップ判定を行う
    // `xp_to_add` (獲得XP) と `chars_typed` (タイプ文字数) を別々に受け取る
    pub fn add_xp(&mut self, xp_to_add: u32, chars_typed: u32) -> bool {
        self.current_xp += xp_to_add;
        self.total_typed_chars += chars_typed; // 累計タイプ数も加算

        let mut leveled_up = false;
        // 必要経験値を超えている間、レベルを上げ続ける
        while self.current_xp >= self.required_xp_for_next_level() {
            self.current_xp -= self.required_xp_for_next_level();
            self.level += 1;
            leveled_up = true;
        }
        leveled_up
    }

    /// 1問分の成績を反映する。レベルが上がったら `true`。
    pub fn record(&mut self, question: &Question, stats: &TypingStats) -> bool {
        self.total_misses += stats.misses;
        self.history.push(TypeRecord::new(question, stats));
        self.add_xp(stats.xp, stats.total_chars)
    }

    /// MARK:データをファイルに保存する (バイナリ + JSON)
    pub fn save(&self) -> Result<(), SaveError> {
        self.save_to(&data_dir())
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), SaveError> {
        fs::create_dir_all(dir)?;

        // --- 1. バイナリ形式で保存 (本番用) ---
        let encoded = bincode::encode_to_vec(PlayerDataBin::from(self), standard())?;
        let mut writer = BufWriter::new(File::create(dir.join(SAVE_FILE_BIN))?);
        writer.write_all(&encoded)?;
        writer.flush()?;

        // --- 2. JSON形式で保存 (デバッグ用) ---
        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SAVE_FILE_JSON), json)?;

        info!(dir = %dir.display(), records = self.history.len(), "player data saved");
        Ok(())
    }

    /// MARK:ファイルからデータを読み込む (バイナリ優先、JSONフォールバック)
    pub fn load() -> Self {
        Self::try_load_from(&data_dir())
            .or_else(|| {
                // 0.1 系は JSON をカレントディレクトリに書いていた
                Self::read_json(Path::new(SAVE_FILE_JSON))
                    .inspect_err(|e| warn!("JSON save data in working directory: {e}"))
                    .ok()
            })
            .unwrap_or_default()
    }

    /// 読めるセーブデータがなければデフォルト
    pub fn load_from(dir: &Path) -> Self {
        Self::try_load_from(dir).unwrap_or_default()
    }

    fn try_load_from(dir: &Path) -> Option<Self> {
        // 1. 現行のバイナリ
        match Self::read_bin(&dir.join(SAVE_FILE_BIN)) {
            Ok(data) => return Some(data),
            Err(e) => warn!("binary save data unavailable: {e}"),
        }

        // 2. 0.1 系のバイナリ。次の保存で現行の形式に書き直される
        match Self::read_legacy_bin(&dir.join(LEGACY_SAVE_FILE_BIN)) {
            Ok(data) => {
                info!(
                    level = data.level,
                    records = data.history.len(),
                    "migrated legacy save data"
                );
                return Some(data);
            }
            Err(e) => warn!("legacy binary save data unavailable: {e}"),
        }

        // 3. JSON (デバッグ用の書き出し)
        match Self::read_json(&dir.join(SAVE_FILE_JSON)) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("JSON save data unavailable: {e}");
                None
            }
        }
    }

    fn read_bin(path: &Path) -> Result<Self, SaveError> {
        let buffer = fs::read(path)?;
        let (bin_data, _) = bincode::decode_from_slice::<PlayerDataBin, _>(&buffer, standard())?;
        Ok(PlayerData::from(bin_data))
    }

    fn read_legacy_bin(path: &Path) -> Result<Self, SaveError> {
        let buffer = fs::read(path)?;
        let (bin_data, _) =
            bincode::decode_from_slice::<LegacyPlayerDataBin, _>(&buffer, standard())?;
        Ok(PlayerData::from(bin_data))
    }

    fn read_json(path: &Path) -> Result<Self, SaveError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const QUESTION: Question = Question {
        japanese: "猫",
        hiragana: "ねこ",
    };

    #[test]
    fn level_up_carries_over_xp() {
        let mut data = PlayerData::default();
        assert_eq!(data.required_xp_for_next_level(), 10);
        assert!(data.add_xp(25, 10));
        assert_eq!(data.level, 2);
        assert_eq!(data.current_xp, 15);
        assert_eq!(data.total_typed_chars, 10);
    }

    #[test]
    fn record_appends_history() {
        let mut data = PlayerData::default();
        let stats = TypingStats::compute(4, 1, Duration::from_secs(2));
        data.record(&QUESTION, &stats);
        assert_eq!(data.history.len(), 1);
        assert_eq!(data.total_misses, 1);
        assert_eq!(data.history[0].question_hiragana, "ねこ");
        assert_eq!(data.history[0].wpm, stats.wpm);
    }

    #[test]
    fn round_trip_through_binary() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = PlayerData::default();
        data.record(&QUESTION, &TypingStats::compute(4, 0, Duration::from_secs(1)));
        data.save_to(dir.path()).unwrap();

        let loaded = PlayerData::load_from(dir.path());
        assert_eq!(loaded.level, data.level);
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.history[0].question_japanese, "猫");
        assert_eq!(
            loaded.history[0].timestamp.timestamp(),
            data.history[0].timestamp.timestamp()
        );
    }

    #[test]
    fn falls_back_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = PlayerData::default();
        data.add_xp(3, 3);
        fs::write(
            dir.path().join(SAVE_FILE_JSON),
            serde_json::to_string(&data).unwrap(),
        )
        .unwrap();
        assert_eq!(PlayerData::load_from(dir.path()), data);
    }

    fn legacy_save(level: u32) -> Vec<u8> {
        let legacy = LegacyPlayerDataBin {
            level,
            current_xp: 4,
            total_typed_chars: 10,
            total_misses: 1,
            history: vec![LegacyTypeRecordBin {
                timestamp_secs: 1_700_000_000,
                question_japanese: "猫".into(),
                question_hiragana: "ねこ".into(),
                total_chars: 10,
                duration_sec: 2.0,
                misses: 0,
                cps: 5.0,
                score: 5000.0,
                xp_gained: 15,
            }],
        };
        bincode::encode_to_vec(legacy, standard()).unwrap()
    }

    #[test]
    fn loads_legacy_binary_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_SAVE_FILE_BIN), legacy_save(7)).unwrap();

        let loaded = PlayerData::load_from(dir.path());
        assert_eq!(loaded.level, 7);
        assert_eq!(loaded.current_xp, 4);
        assert_eq!(loaded.total_misses, 1);
        assert_eq!(loaded.history.len(), 1);
        let record = &loaded.history[0];
        assert_eq!(record.question_hiragana, "ねこ");
        assert_eq!(record.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(record.wpm, 60.0);
        assert_eq!(record.accuracy, 100.0);
        assert_eq!(record.xp_gained, 15);
    }

    #[test]
    fn migrated_data_is_saved_in_current_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEGACY_SAVE_FILE_BIN), legacy_save(7)).unwrap();

        let mut data = PlayerData::load_from(dir.path());
        data.record(&QUESTION, &TypingStats::compute(4, 0, Duration::from_secs(1)));
        data.save_to(dir.path()).unwrap();

        let reloaded = PlayerData::load_from(dir.path());
        assert_eq!(reloaded.level, data.level);
        assert_eq!(reloaded.history.len(), 2);
        assert_eq!(reloaded.history[0], data.history[0]);
    }

    #[test]
    fn missing_files_give_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(PlayerData::load_from(dir.path()), PlayerData::default());
    }
}
