//! Currency detection from symbols and keywords

use famledger_core::Currency;

/// Substrings that mark a dirham amount (checked case-insensitively)
const AED_INDICATORS: &[&str] = &[
    "aed",
    "dh",
    "dirham",
    "dirhams",
    "درهم",
    "درهماً",
    "درهم إماراتي",
];

/// Classify a fragment (a currency token or a whole line).
///
/// Priority: dirham indicators, then `$`/`usd`, then `€`/`eur`, else `default`.
/// Never fails.
pub fn detect_currency(fragment: &str, default: Currency) -> Currency {
    let lower = fragment.to_lowercase();
    if AED_INDICATORS.iter().any(|ind| lower.contains(ind)) {
        return Currency::Aed;
    }
    if lower.contains('$') || lower.contains("usd") {
        return Currency::Usd;
    }
    if lower.contains('€') || lower.contains("eur") {
        return Currency::Eur;
    }
    default
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Alex paid 200 AED for groceries", Currency::Aed)]
    #[case("Alex paid 200 dirhams", Currency::Aed)]
    #[case("200 Dh", Currency::Aed)]
    #[case("دفعت ٢٠٠ درهم", Currency::Aed)]
    #[case("Alex paid $200 for groceries", Currency::Usd)]
    #[case("200 usd", Currency::Usd)]
    #[case("€15 parking", Currency::Eur)]
    #[case("15 EUR", Currency::Eur)]
    fn test_detect_currency(#[case] text: &str, #[case] expected: Currency) {
        assert_eq!(detect_currency(text, Currency::Aed), expected);
    }

    #[test]
    fn test_falls_back_to_default() {
        assert_eq!(detect_currency("Alex paid 200 for groceries", Currency::Aed), Currency::Aed);
        assert_eq!(detect_currency("Alex paid 200 for groceries", Currency::Usd), Currency::Usd);
        assert_eq!(detect_currency("", Currency::Eur), Currency::Eur);
    }

    #[test]
    fn test_dirham_beats_dollar() {
        assert_eq!(detect_currency("$ or AED", Currency::Eur), Currency::Aed);
    }
}
