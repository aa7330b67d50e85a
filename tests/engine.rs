use std::collections::HashSet;
use std::thread;

use typewiz::{
    UnitKind, convert, expand_variants, group, list_supported_units, list_variant_table,
    typing_segments, validate_multi, validate_single,
};

#[test]
fn grouping_prefers_digraphs() {
    let units = group("きゃ");
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "きゃ");
    assert_eq!(units[0].kind, UnitKind::Digraph);
    assert!(group("").is_empty());
}

#[test]
fn typing_segments_fuse_geminates() {
    assert_eq!(typing_segments("きっぷ"), ["き", "っぷ"]);
    assert_eq!(typing_segments("っっか"), ["っ", "っか"]);
    assert!(typing_segments("").is_empty());
}

#[test]
fn repeated_geminate() {
    assert_eq!(convert("っっか").romaji, "tsukka");
    let result = validate_multi("っっか", "ltuk");
    assert!(result.is_valid);
    assert_eq!(result.matching_variants, ["ltukka"]);
    assert_eq!(result.expected_next_chars, ['k']);
    assert!(!validate_multi("っっか", "llt").is_valid);
}

#[test]
fn geminate_conversion() {
    assert_eq!(convert("っか").romaji, "kka");
    assert_eq!(convert("っち").romaji, "tchi");
    assert_eq!(convert("っし").romaji, "sshi");
    assert_eq!(convert("あっ").romaji, "atsu");
}

#[test]
fn conversion_of_words() {
    for (kana, romaji) in [
        ("ありがとう", "arigatou"),
        ("おはよう", "ohayou"),
        ("きょう", "kyou"),
        ("びょういん", "byouin"),
        ("ちゅうがっこう", "chuugakkou"),
    ] {
        let result = convert(kana);
        assert!(result.success);
        assert_eq!(result.romaji, romaji);
        assert_eq!(result.error, None);
    }
}

#[test]
fn empty_expansion() {
    let result = expand_variants("");
    assert!(result.success);
    assert_eq!(result.variants, [""]);
}

#[test]
fn variant_counts() {
    assert_eq!(expand_variants("か").variants, ["ka", "ca"]);
    assert_eq!(expand_variants("しゃ").variants, ["sha", "sya"]);
    assert_eq!(expand_variants("じゃ").variants, ["ja", "jya", "zya"]);

    let ka: HashSet<String> = expand_variants("か").variants.into_iter().collect();
    let cha: HashSet<String> = expand_variants("ちゃ").variants.into_iter().collect();
    let combined = expand_variants("かちゃ").variants;
    assert_eq!(combined.len(), 4);
    for variant in &combined {
        assert!(
            ka.iter()
                .any(|k| variant.strip_prefix(k.as_str()).is_some_and(|rest| cha.contains(rest))),
            "{variant}"
        );
    }
}

#[test]
fn single_validation_mismatch_names_expected_char() {
    let result = validate_single("か", "x");
    assert!(!result.is_valid);
    assert_eq!(result.expected_next, Some('k'));
    assert!(result.error.unwrap().contains("Expected \"k\""));
}

#[test]
fn single_validation_progress() {
    let result = validate_single("こんにちは", "kon");
    assert!(result.is_valid);
    assert_eq!(result.expected_next, Some('n'));

    let result = validate_single("がっこう", "gak");
    assert!(result.is_valid);
    assert_eq!(result.expected_next, Some('k'));

    assert!(!validate_single("きゃ", "ki").is_valid);
    assert!(!validate_single("しゃ", "si").is_valid);
    assert!(validate_single("", "").is_valid);
    assert!(!validate_single("", "a").is_valid);
}

#[test]
fn multi_validation_step_by_step() {
    let result = validate_multi("しかし", "s");
    assert!(result.is_valid);
    assert!(result.expected_next_chars.contains(&'h'));
    assert!(result.expected_next_chars.contains(&'i'));

    let result = validate_multi("しかし", "sh");
    assert_eq!(result.expected_next_chars, ['i']);

    let result = validate_multi("しかし", "si");
    assert!(result.expected_next_chars.contains(&'k'));
    assert!(result.expected_next_chars.contains(&'c'));
}

#[test]
fn multi_validation_context() {
    let result = validate_multi("ちゃっと", "t");
    assert!(result.is_valid);
    assert_eq!(result.matching_variants, ["tyatto"]);

    let result = validate_multi("ちゃっと", "c");
    assert_eq!(result.matching_variants, ["chatto"]);
}

#[test]
fn multi_validation_rejects() {
    let result = validate_multi("か", "x");
    assert!(!result.is_valid);
    assert!(result.matching_variants.is_empty());
    assert!(result.expected_next_chars.is_empty());
    assert!(result.error.unwrap().contains("\"x\""));
}

#[test]
fn multi_validation_of_empty_target() {
    let result = validate_multi("", "");
    assert!(result.is_valid);
    assert_eq!(result.matching_variants, [""]);
    assert!(result.expected_next_chars.is_empty());
}

#[test]
fn introspection() {
    let units = list_supported_units();
    for unit in ["あ", "か", "さ", "っ", "ん"] {
        assert!(units.contains(unit));
    }
    assert!(units.len() > 50);

    let table = list_variant_table();
    assert_eq!(table["を"], ["wo", "o"]);
    assert_eq!(table["っ"], ["ltu", "xtu", "ltsu"]);
    assert_eq!(table.len(), units.len());
}

#[test]
fn parallel_calls_agree() {
    let inputs = ["しかし", "ちゅうしゃじょう", "がっこう", "こんにちは", "ちゃっと"];
    let expected: Vec<_> = inputs
        .iter()
        .map(|text| (expand_variants(text), validate_multi(text, "c"), convert(text)))
        .collect();

    let inputs = &inputs;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                scope.spawn(move || {
                    let mut results = Vec::new();
                    for _ in 0..50 {
                        for text in inputs {
                            results.push((
                                expand_variants(text),
                                validate_multi(text, "c"),
                                convert(text),
                            ));
                        }
                    }
                    results
                })
            })
            .collect();

        for handle in handles {
            let results = handle.join().unwrap();
            assert_eq!(results.len(), 50 * inputs.len());
            for chunk in results.chunks(inputs.len()) {
                assert_eq!(chunk, expected.as_slice());
            }
        }
    });
}
