// ============================================
// src/roman_mapping.rs
// ひらがな → ローマ字 の対応表
// ============================================

use std::collections::HashMap;

/// 促音「っ」
pub const GEMINATE: char = 'っ';

/// 後ろに文字がない「っ」を単体で打つときの綴り（複数パターンモード）
pub const GEMINATE_FALLBACKS: &[&str] = &["ltu", "xtu", "ltsu"];

/// 後ろに文字がない「っ」の表示用の綴り（単一パターンモード）
pub const GEMINATE_DISPLAY_FALLBACK: &str = "tsu";

/// 1文字のかな（先頭が表示用の綴り）
#[rustfmt::skip]
const SIMPLE_KANA: &[(&str, &[&str])] = &[
    // あ行
    ("あ", &["a"]), ("い", &["i"]), ("う", &["u", "wu"]), ("え", &["e"]), ("お", &["o"]),
    // か行
    ("か", &["ka", "ca"]), ("き", &["ki"]), ("く", &["ku", "cu", "qu"]), ("け", &["ke"]), ("こ", &["ko", "co"]),
    ("が", &["ga"]), ("ぎ", &["gi"]), ("ぐ", &["gu"]), ("げ", &["ge"]), ("ご", &["go"]),
    // さ行
    ("さ", &["sa"]), ("し", &["shi", "si"]), ("す", &["su"]), ("せ", &["se", "ce"]), ("そ", &["so"]),
    ("ざ", &["za"]), ("じ", &["ji", "zi"]), ("ず", &["zu"]), ("ぜ", &["ze"]), ("ぞ", &["zo"]),
    // た行
    ("た", &["ta"]), ("ち", &["chi", "ti"]), ("つ", &["tsu", "tu"]), ("て", &["te"]), ("と", &["to"]),
    ("だ", &["da"]), ("ぢ", &["di"]), ("づ", &["du"]), ("で", &["de"]), ("ど", &["do"]),
    // な行
    ("な", &["na"]), ("に", &["ni"]), ("ぬ", &["nu"]), ("ね", &["ne"]), ("の", &["no"]),
    // は行
    ("は", &["ha"]), ("ひ", &["hi"]), ("ふ", &["fu", "hu"]), ("へ", &["he"]), ("ほ", &["ho"]),
    ("ば", &["ba"]), ("び", &["bi"]), ("ぶ", &["bu"]), ("べ", &["be"]), ("ぼ", &["bo"]),
    ("ぱ", &["pa"]), ("ぴ", &["pi"]), ("ぷ", &["pu"]), ("ぺ", &["pe"]), ("ぽ", &["po"]),
    // ま行
    ("ま", &["ma"]), ("み", &["mi"]), ("む", &["mu"]), ("め", &["me"]), ("も", &["mo"]),
    // や行
    ("や", &["ya"]), ("ゆ", &["yu"]), ("よ", &["yo"]),
    // ら行
    ("ら", &["ra"]), ("り", &["ri"]), ("る", &["ru"]), ("れ", &["re"]), ("ろ", &["ro"]),
    // わ行
    ("わ", &["wa"]), ("ゐ", &["wi"]), ("ゑ", &["we"]), ("を", &["wo", "o"]), ("ん", &["n", "nn"]),
    // 小文字（単体で出てきたとき）
    ("ゃ", &["ya", "lya", "xya"]), ("ゅ", &["yu", "lyu", "xyu"]), ("ょ", &["yo", "lyo", "xyo"]),
    ("ぁ", &["a", "la", "xa"]), ("ぃ", &["i", "li", "xi"]), ("ぅ", &["u", "lu", "xu"]),
    ("ぇ", &["e", "le", "xe"]), ("ぉ", &["o", "lo", "xo"]),
    // 記号
    ("ー", &["-"]), ("。", &["."]), ("、", &[","]), ("？", &["?"]), ("！", &["!"]),
    ("　", &[" "]), (" ", &[" "]),
];

/// 拗音など2文字で1音になる組み合わせ
#[rustfmt::skip]
const DIGRAPH_KANA: &[(&str, &[&str])] = &[
    // か行
    ("きゃ", &["kya"]), ("きゅ", &["kyu"]), ("きょ", &["kyo"]),
    ("ぎゃ", &["gya"]), ("ぎゅ", &["gyu"]), ("ぎょ", &["gyo"]),
    // さ行
    ("しゃ", &["sha", "sya"]), ("しゅ", &["shu", "syu"]), ("しょ", &["sho", "syo"]),
    ("しぇ", &["she", "sye"]),
    ("じゃ", &["ja", "jya", "zya"]), ("じゅ", &["ju", "jyu", "zyu"]), ("じょ", &["jo", "jyo", "zyo"]),
    ("じぇ", &["je", "jye", "zye"]),
    // た行
    ("ちゃ", &["cha", "tya"]), ("ちゅ", &["chu", "tyu"]), ("ちょ", &["cho", "tyo"]),
    ("ちぇ", &["che", "tye"]),
    ("ぢゃ", &["dya"]), ("ぢゅ", &["dyu"]), ("ぢょ", &["dyo"]),
    ("てぃ", &["thi"]), ("でぃ", &["dhi"]),
    // な行
    ("にゃ", &["nya"]), ("にゅ", &["nyu"]), ("にょ", &["nyo"]),
    // は行
    ("ひゃ", &["hya"]), ("ひゅ", &["hyu"]), ("ひょ", &["hyo"]),
    ("びゃ", &["bya"]), ("びゅ", &["byu"]), ("びょ", &["byo"]),
    ("ぴゃ", &["pya"]), ("ぴゅ", &["pyu"]), ("ぴょ", &["pyo"]),
    ("ふぁ", &["fa"]), ("ふぃ", &["fi"]), ("ふぇ", &["fe"]), ("ふぉ", &["fo"]),
    ("ふゃ", &["fya"]), ("ふゅ", &["fyu"]), ("ふょ", &["fyo"]),
    // ま行
    ("みゃ", &["mya"]), ("みゅ", &["myu"]), ("みょ", &["myo"]),
    // ら行
    ("りゃ", &["rya"]), ("りゅ", &["ryu"]), ("りょ", &["ryo"]),
    // わ行
    ("うぃ", &["wi"]), ("うぇ", &["we"]), ("うぉ", &["wo"]),
];

/// ローマ字辞書を作成する
///
/// キーはかな（1文字または拗音の2文字）、値は打ち方の候補。
/// 先頭の候補が表示用（正規）の綴りになる。
/// 「っ」は後ろの文字によって綴りが変わるため、ここには含めない。
pub fn create_roman_mapping() -> HashMap<&'static str, Vec<&'static str>> {
    SIMPLE_KANA
        .iter()
        .chain(DIGRAPH_KANA.iter())
        .map(|(kana, patterns)| (*kana, patterns.to_vec()))
        .collect()
}
