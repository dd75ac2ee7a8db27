/// Property-based roundtrip tests.
///
/// Generates records with arbitrary text (biased toward the bytes the grammar
/// cares about: quotes, backslashes, commas, parentheses, whitespace) and
/// checks that `decode(encode(record)) == record`, including when the record
/// is nested inside another composite.
///
/// Known limitation excluded from testing:
/// - A record whose only field is NULL encodes as `()`, which decodes as zero
///   elements and so leaves the field at its pre-decode value. Decoding into
///   a default record still roundtrips, which is what these tests do.
mod common;

use common::*;
use composite_core::tokenizer::split;
use composite_core::{decode, encode, CompositeCodec, QuoteLevel};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        prop::string::string_regex("[a-z,()\"\\\\ \t]{0,20}").unwrap(),
        Just(String::new()),
        Just("\"".to_string()),
        Just("\\".to_string()),
        Just("()".to_string()),
        Just(",".to_string()),
        any::<String>(),
    ]
}

fn arb_address() -> impl Strategy<Value = Address> {
    (arb_text(), proptest::option::of(any::<i32>()))
        .prop_map(|(street, zip)| Address { street, zip })
}

fn arb_person() -> impl Strategy<Value = Person> {
    (
        any::<i64>(),
        arb_text(),
        proptest::option::of(arb_text()),
        any::<bool>(),
        arb_address(),
        proptest::option::of(arb_address()),
    )
        .prop_map(|(id, name, email, active, home, work)| Person {
            id,
            name,
            email,
            active,
            home,
            work,
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn text_roundtrips(text in arb_text()) {
        let note = Note { text: Some(text) };
        let literal = encode(&note).unwrap();
        let back: Note = decode(&literal).unwrap();
        prop_assert_eq!(back, note);
    }

    #[test]
    fn text_survives_the_tokenizer_exactly(text in arb_text()) {
        let pair = Pair { a: 1, b: text.clone() };
        let literal = encode(&pair).unwrap();
        let elems = split(&literal).unwrap();
        prop_assert_eq!(elems.len(), 2);
        prop_assert_eq!(elems[1].as_deref(), Some(text.as_bytes()));
    }

    #[test]
    fn person_roundtrips(person in arb_person()) {
        let literal = encode(&person).unwrap();
        let back: Person = decode(&literal).unwrap();
        prop_assert_eq!(back, person);
    }

    #[test]
    fn envelope_roundtrips(seq in any::<i32>(), person in arb_person()) {
        let envelope = Envelope { seq, person };
        let literal = encode(&envelope).unwrap();
        let back: Envelope = decode(&literal).unwrap();
        prop_assert_eq!(back, envelope);
    }

    #[test]
    fn deeper_levels_unwrap_one_step_at_a_time(person in arb_person(), depth in 1u32..4) {
        let codec = CompositeCodec::<Person>::new();
        let mut deep = Vec::new();
        codec.encode(&mut deep, &person, QuoteLevel::new(depth)).unwrap();
        let mut shallower = Vec::new();
        codec.encode(&mut shallower, &person, QuoteLevel::new(depth - 1)).unwrap();

        let mut wrapped = b"(\"".to_vec();
        wrapped.extend_from_slice(&deep);
        wrapped.extend_from_slice(b"\")");
        let elems = split(&wrapped).unwrap();
        prop_assert_eq!(elems.len(), 1);
        prop_assert_eq!(elems[0].as_deref(), Some(&shallower[..]));
    }

    #[test]
    fn tokenizer_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = split(&bytes);
        let _ = decode::<Person>(&bytes);
    }
}
