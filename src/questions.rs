/*
 * src/questions.rs
 * お題データを管理するモジュール
 */

use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Question {
    pub japanese: &'static str, // 表示用 (漢字混じり)
    pub hiragana: &'static str, // タイピング用 (ひらがな)
}

/// 問題リスト (ひらがなの文字数昇順)
pub const QUESTIONS_LIST: &[Question] = &[
    // 2文字
    Question { japanese: "猫", hiragana: "ねこ" },
    Question { japanese: "犬", hiragana: "いぬ" },
    Question { japanese: "空", hiragana: "そら" },
    Question { japanese: "茶", hiragana: "ちゃ" },

    // 3文字
    Question { japanese: "海", hiragana: "うみ" },
    Question { japanese: "山", hiragana: "やま" },
    Question { japanese: "川", hiragana: "かわ" },
    Question { japanese: "車", hiragana: "くるま" },
    Question { japanese: "切符", hiragana: "きっぷ" },
    Question { japanese: "写真", hiragana: "しゃしん" },

    // 4文字
    Question { japanese: "リンゴ", hiragana: "りんご" },
    Question { japanese: "ミカン", hiragana: "みかん" },
    Question { japanese: "電話", hiragana: "でんわ" },
    Question { japanese: "時計", hiragana: "とけい" },
    Question { japanese: "学校", hiragana: "がっこう" },
    Question { japanese: "石鹸", hiragana: "せっけん" },

    // 5文字
    Question { japanese: "こんにちは", hiragana: "こんにちは" },
    Question { japanese: "ありがとう", hiragana: "ありがとう" },
    Question { japanese: "さようなら", hiragana: "さようなら" },
    Question { japanese: "飛行機", hiragana: "ひこうき" },
    Question { japanese: "病院", hiragana: "びょういん" },

    // 6文字
    Question { japanese: "図書館", hiragana: "としょかん" },
    Question { japanese: "新幹線", hiragana: "しんかんせん" },
    Question { japanese: "動物園", hiragana: "どうぶつえん" },
    Question { japanese: "ちょっと待って", hiragana: "ちょっとまって" },

    // 7文字
    Question { japanese: "水族館", hiragana: "すいぞくかん" },
    Question { japanese: "遊園地", hiragana: "ゆうえんち" },
    Question { japanese: "中学校", hiragana: "ちゅうがっこう" },

    // 8文字
    Question { japanese: "駐車場", hiragana: "ちゅうしゃじょう" },
    Question { japanese: "高速道路", hiragana: "こうそくどうろ" },
];

/// 出題順。`shuffle` ならランダムに並べ替える。
pub fn question_order<R: Rng + ?Sized>(shuffle: bool, rng: &mut R) -> Vec<Question> {
    let mut questions = QUESTIONS_LIST.to_vec();
    if shuffle {
        questions.shuffle(rng);
    }
    questions
}
