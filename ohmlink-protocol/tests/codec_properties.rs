use ohmlink_protocol::{decode, encode, Band, Reading};
use proptest::prelude::*;

fn band() -> impl Strategy<Value = Band> {
    prop::sample::select(Band::ALL.to_vec())
}

fn reading() -> impl Strategy<Value = Reading> {
    (-1.0e6f32..1.0e6f32, [band(), band(), band(), band()])
        .prop_map(|(value, bands)| Reading::new(value, bands))
}

proptest! {
    #[test]
    fn decode_reproduces_encoded_reading(r in reading()) {
        let line = encode(&r).unwrap();
        let decoded = decode(&line).unwrap();

        prop_assert_eq!(decoded.bands(), r.bands());
        let tolerance = 0.05 + r.value().abs() * f32::EPSILON;
        prop_assert!((decoded.value() - r.value()).abs() <= tolerance);

        // Once quantised to one decimal the wire form is stable
        let again = decode(&encode(&decoded).unwrap()).unwrap();
        prop_assert_eq!(again, decoded);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn wrong_field_count_is_rejected(value in -1.0e4f32..1.0e4f32, extra in 1usize..6) {
        let mut line = format!("R:{value:.1}");
        for _ in 0..(4 + extra) {
            line.push_str(",red");
        }
        prop_assert!(decode(line.as_bytes()).is_err());
    }

    #[test]
    fn unknown_band_is_rejected(token in "[a-z]{1,8}") {
        prop_assume!(Band::from_token(&token).is_none());
        let line = format!("R:100.0,brown,black,{token},gold\n");
        prop_assert!(decode(line.as_bytes()).is_err());
    }
}
