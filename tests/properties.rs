use proptest::prelude::*;
use proptest::sample::select;

use typewiz::{convert, expand_variants, list_supported_units, list_variant_table, validate_multi};

/// 「っ」以外の単位（「っ」は単体の表示用綴りが候補と別扱い）
fn units() -> Vec<&'static str> {
    list_supported_units()
        .into_iter()
        .filter(|unit| *unit != "っ")
        .collect()
}

fn words() -> impl Strategy<Value = String> {
    prop::collection::vec(select(units()), 1..5).prop_map(|units| units.concat())
}

proptest! {
    #[test]
    fn canonical_spelling_is_a_variant(unit in select(units())) {
        let canonical = convert(unit).romaji;
        let variants = expand_variants(unit).variants;
        prop_assert!(variants.contains(&canonical), "{} -> {}", unit, canonical);

        let result = validate_multi(unit, &canonical);
        prop_assert!(result.is_valid);
        prop_assert!(result.matching_variants.contains(&canonical));
    }

    #[test]
    fn complete_single_variant_expects_nothing(unit in select(units())) {
        let table = list_variant_table();
        let canonical = convert(unit).romaji;
        let others_extend = table[unit]
            .iter()
            .any(|v| *v != canonical && v.starts_with(canonical.as_str()));
        let result = validate_multi(unit, &canonical);
        prop_assert_eq!(result.expected_next_chars.is_empty(), !others_extend);
    }

    #[test]
    fn every_prefix_is_valid(word in words()) {
        for variant in expand_variants(&word).variants {
            for (end, next) in variant.char_indices().skip(1) {
                let prefix = &variant[..end];
                let result = validate_multi(&word, prefix);
                prop_assert!(result.is_valid, "{} / {}", word, prefix);
                prop_assert!(result.matching_variants.contains(&variant));
                prop_assert!(result.expected_next_chars.contains(&next));
            }
        }
    }

    #[test]
    fn matching_variants_extend_input(word in words(), typed in "[a-z]{0,4}") {
        let result = validate_multi(&word, &typed);
        for variant in &result.matching_variants {
            prop_assert!(variant.starts_with(typed.as_str()));
        }
        prop_assert_eq!(result.is_valid, !result.matching_variants.is_empty());
    }
}
