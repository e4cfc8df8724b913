//! Property-based tests for qsift using proptest.

use proptest::prelude::*;
use qsift::{
    coerce, parse_comparison, split_list, translate, type_token, BracketCodec, ComparisonOperator,
    Condition, Config, FlatCodec, Operand, OperatorMap, Pattern, QueryCodec, RawQuery, TypedValue,
};

// ============================================================================
// Test helpers
// ============================================================================

/// Reads the offset parameter back out of a generated link.
fn offset_of(link: &str) -> u64 {
    let (_, query) = link.split_once('?').expect("link has a query");
    FlatCodec
        .parse(query)
        .get("offset")
        .and_then(|v| v.as_single())
        .and_then(|s| s.parse().ok())
        .expect("link has a numeric offset")
}

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        (0i64..10_000).prop_map(|n| n.to_string()),
        Just("true".to_string()),
        "'[a-z ,]{0,6}'",
        "/[a-z.,]{0,6}/i?",
        "/[a-z]{1,4}/[a-z]{1,4}",
        "'[a-z]{1,3}'[a-z]{1,3}",
        "!?[a-z]{1,4}(,[a-z]{1,4}){0,2}",
    ]
}

fn flat_query_strategy() -> impl Strategy<Value = RawQuery> {
    prop::collection::vec(("[a-z]{1,4}[<>!]?", token_strategy()), 0..8).prop_map(|pairs| {
        let mut q = RawQuery::new();
        for (k, v) in pairs {
            q.append(k, v);
        }
        q
    })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Translation accepts any input without panicking.
    #[test]
    fn translate_is_total(input in "\\PC{0,64}") {
        let _ = translate(input.as_str(), Config::default());
        let config = Config::builder().parser(BracketCodec::default()).build().unwrap();
        let _ = translate(input.as_str(), config);
    }

    /// A single-quoted token is the string between the quotes.
    #[test]
    fn quoted_tokens_are_strings(inner in "[a-z0-9 ,.:-]{0,12}") {
        prop_assert_eq!(coerce(&format!("'{inner}'")), TypedValue::String(inner.clone()));
        prop_assert_eq!(coerce(&format!("\"{inner}\"")), TypedValue::String(inner));
    }

    /// Regex literals type as regexes, and `!=` on one is `not`.
    #[test]
    fn regex_tokens_negate_to_not(source in "[a-z.*+,]{0,10}", insensitive in any::<bool>()) {
        let token = format!("/{source}/{}", if insensitive { "i" } else { "" });
        let pattern = Pattern::new(source, insensitive);

        prop_assert_eq!(type_token(&token).value, TypedValue::Regex(pattern.clone()));

        let (field, condition) = parse_comparison("field!", &token).unwrap();
        prop_assert_eq!(field, "field");
        prop_assert_eq!(
            condition,
            Condition::Operators(OperatorMap::single(ComparisonOperator::Not, TypedValue::Regex(pattern)))
        );
    }

    /// Without a comma there is nothing to split: the whole input is one
    /// token, even when it opens with a quote or slash it never closes
    /// where the input ends.
    #[test]
    fn comma_free_input_is_one_token(input in "!?['\"/]?[^,]{1,12}") {
        prop_assert_eq!(split_list(&input).collect::<Vec<_>>(), vec![input.as_str()]);
    }

    /// Delimited runs glued to trailing text stay whole.
    #[test]
    fn glued_literals_are_one_token(inner in "[a-z]{0,6}", tail in "[a-z/.]{1,6}") {
        for token in [format!("/{inner}/{tail}x"), format!("'{inner}'{tail}"), format!("\"{inner}\"{tail}")] {
            prop_assert_eq!(split_list(&token).collect::<Vec<_>>(), vec![token.as_str()]);
        }
    }

    /// A bare four-digit year reads as a number, not a date.
    #[test]
    fn years_are_numbers(year in 1000u32..=9999) {
        prop_assert_eq!(coerce(&year.to_string()), TypedValue::Number(f64::from(year)));
    }

    /// Lower and upper bounds on one field combine into one operator map.
    #[test]
    fn ranges_compose(lo in -1000i64..1000, hi in -1000i64..1000) {
        let t = translate(format!("f>={lo}&f<={hi}"), Config::default());
        let ops = t.criteria().get("f").and_then(Condition::as_operators).unwrap();
        prop_assert_eq!(ops.len(), 2);
        prop_assert_eq!(
            ops.get(&ComparisonOperator::GreaterOrEqual),
            Some(&Operand::Single(TypedValue::from(lo)))
        );
        prop_assert_eq!(
            ops.get(&ComparisonOperator::LessOrEqual),
            Some(&Operand::Single(TypedValue::from(hi)))
        );
    }

    /// Page links always stay inside the collection and step by the limit.
    #[test]
    fn pagination_invariants(offset in 0u64..300, limit in 1u64..60, total in 1u64..500) {
        let t = translate(format!("offset={offset}&limit={limit}"), Config::default());
        let links = t.links("http://x", total).unwrap();
        let step = limit.min(total);

        prop_assert_eq!(links.first.is_some(), offset > 0);
        prop_assert_eq!(links.prev.is_some(), offset > 0);
        prop_assert_eq!(links.next.is_some(), offset + step < total);
        prop_assert_eq!(links.last.is_some(), offset + step < total);

        if let Some(first) = &links.first {
            prop_assert_eq!(offset_of(first), 0);
        }
        if let Some(prev) = &links.prev {
            prop_assert_eq!(offset_of(prev), offset.saturating_sub(step));
        }
        if let (Some(next), Some(last)) = (&links.next, &links.last) {
            let (next, last) = (offset_of(next), offset_of(last));
            prop_assert!(next > offset);
            prop_assert!(next <= last);
            prop_assert!(last < total);
            prop_assert_eq!(last % step, 0);
        }
    }

    /// Re-encoding a query and translating it again gives the same criteria.
    #[test]
    fn reencoding_preserves_criteria(q in flat_query_strategy()) {
        let first = translate(q, Config::default());
        let encoded = first.config().parser().stringify(first.query());
        let second = translate(encoded, Config::default());
        prop_assert_eq!(first.criteria(), second.criteria());
        prop_assert_eq!(first.options(), second.options());
    }
}
