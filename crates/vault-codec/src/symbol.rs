//! ticker symbol folding
//!
//! packs up to six characters of a ticker into one integer small enough to
//! be encrypted as a 32-bit value. each character contributes its code unit
//! as a base-100 "digit", so only code units below 100 survive the trip back:
//!
//! ```text
//! "AAPL" -> 65 65 80 76 -> 65_658_076
//! ```
//!
//! the fold is clamped at [`SYMBOL_CLAMP`]. any symbol of five or more
//! printable characters hits the clamp, after which nothing can be recovered.
//! decoding a clamped value yields the truncation marker.

/// significant characters (utf-16 code units) folded into the value
pub const SYMBOL_MAX_CHARS: usize = 6;

/// base used by the fold
pub const SYMBOL_RADIX: u64 = 100;

/// upper bound of an encoded symbol. deliberately not `u32::MAX`: the
/// contract side decodes symbols against this same bound.
pub const SYMBOL_CLAMP: u32 = 2_000_000_000;

/// appended to a decoded symbol whose encoding was clamped
pub const TRUNCATION_MARKER: &str = "...";

/// returned when nothing printable can be recovered
pub const UNKNOWN_SYMBOL: &str = "Unknown";

const PRINTABLE: std::ops::RangeInclusive<u64> = 32..=126;

/// fold the first six code units of `symbol` into a clamped integer
pub fn encode_symbol(symbol: &str) -> u32 {
    let folded = symbol
        .encode_utf16()
        .take(SYMBOL_MAX_CHARS)
        .fold(0u64, |acc, unit| {
            acc.saturating_mul(SYMBOL_RADIX)
                .saturating_add(u64::from(unit))
        });

    folded.min(u64::from(SYMBOL_CLAMP)) as u32
}

/// best-effort inverse of [`encode_symbol`]
///
/// base-100 digits outside the printable ascii range are skipped. a value at
/// the clamp gets [`TRUNCATION_MARKER`] appended, and a value with nothing
/// recoverable (including 0) decodes to [`UNKNOWN_SYMBOL`].
pub fn decode_symbol(value: u64) -> String {
    let mut recovered = Vec::with_capacity(SYMBOL_MAX_CHARS);
    let mut acc = value;

    while acc > 0 && recovered.len() < SYMBOL_MAX_CHARS {
        let code = acc % SYMBOL_RADIX;
        if PRINTABLE.contains(&code) {
            recovered.push(code as u8 as char);
        }
        acc /= SYMBOL_RADIX;
    }

    let mut symbol: String = recovered.into_iter().rev().collect();

    if is_clamped(value) {
        symbol.push_str(TRUNCATION_MARKER);
        symbol
    } else if symbol.is_empty() {
        UNKNOWN_SYMBOL.to_string()
    } else {
        symbol
    }
}

/// whether `value` sits at the clamp, i.e. the encoded symbol was cut
pub fn is_clamped(value: u64) -> bool {
    value >= u64::from(SYMBOL_CLAMP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_symbols() {
        assert_eq!(encode_symbol("AAPL"), 65_65_80_76);
        assert_eq!(encode_symbol("A"), 65);
        assert_eq!(encode_symbol("BTC"), 66_84_67);
    }

    #[test]
    fn test_empty_and_zero() {
        assert_eq!(encode_symbol(""), 0);
        assert_eq!(decode_symbol(0), UNKNOWN_SYMBOL);
    }

    #[test]
    fn test_roundtrip_short_symbol() {
        assert_eq!(decode_symbol(encode_symbol("AAPL").into()), "AAPL");
        assert_eq!(decode_symbol(encode_symbol("F").into()), "F");
        assert_eq!(decode_symbol(encode_symbol("BRK.").into()), "BRK.");
    }

    #[test]
    fn test_long_symbol_clamps() {
        // 5 printable characters already exceed 32 * 100^4
        assert_eq!(encode_symbol("GOOGL"), SYMBOL_CLAMP);
        assert_eq!(encode_symbol("NVIDIA-EXTRA"), SYMBOL_CLAMP);

        let decoded = decode_symbol(SYMBOL_CLAMP.into());
        assert!(decoded.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_only_first_six_units_count() {
        assert_eq!(encode_symbol("!!!!!!X"), encode_symbol("!!!!!!"));
    }

    #[test]
    fn test_lowercase_is_lossy() {
        // 'd' is 100, which folds into the next digit
        assert_eq!(encode_symbol("d"), 100);
        assert_eq!(decode_symbol(100), UNKNOWN_SYMBOL);
    }

    #[test]
    fn test_unprintable_digits_skipped() {
        // 65, 05, 66 -> the 05 is dropped
        assert_eq!(decode_symbol(65_05_66), "AB");
    }

    #[test]
    fn test_decode_caps_at_six_characters() {
        // seven printable digits, only the low six are read
        assert_eq!(decode_symbol(65_66_67_68_69_70_71), "BCDEFG...");
    }

    proptest! {
        #[test]
        fn prop_low_codepoint_symbols_roundtrip(symbol in "[ -c]{1,6}") {
            let encoded = encode_symbol(&symbol);
            prop_assume!(!is_clamped(encoded.into()));

            let decoded = decode_symbol(encoded.into());
            prop_assert_eq!(decoded, symbol);
        }

        #[test]
        fn prop_clamped_symbols_carry_marker(symbol in "[ -~]{5,10}") {
            let encoded = encode_symbol(&symbol);
            prop_assert_eq!(encoded, SYMBOL_CLAMP);

            let decoded = decode_symbol(encoded.into());
            prop_assert!(decoded.ends_with(TRUNCATION_MARKER));

            let prefix = decoded.trim_end_matches(TRUNCATION_MARKER);
            prop_assert!(symbol.starts_with(prefix));
        }

        #[test]
        fn prop_encoded_never_exceeds_clamp(symbol in ".{0,12}") {
            prop_assert!(encode_symbol(&symbol) <= SYMBOL_CLAMP);
        }
    }
}
