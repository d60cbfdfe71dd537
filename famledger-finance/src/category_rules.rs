//! Deterministic category rules mapping a note line to an expense Category.
//!
//! English and Arabic keywords per category, checked in a fixed priority order;
//! the first category with a hit wins.

use famledger_core::Category;

/// One category's keywords
struct CategoryRule {
    category: Category,
    /// Matched anywhere in the lowercased line
    substrings: &'static [&'static str],
    /// Matched only as whole words (short brand names like "du")
    words: &'static [&'static str],
}

/// Priority order: rent before groceries before school fees, and so on.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Rent,
        substrings: &["rent", "apartment", "إيجار", "ايجار", "سكن"],
        words: &[],
    },
    CategoryRule {
        category: Category::Groceries,
        substrings: &["grocery", "groceries", "supermarket", "بقالة", "سوبرماركت"],
        words: &[],
    },
    CategoryRule {
        category: Category::SchoolFees,
        substrings: &["school", "tuition", "education", "مدرسة", "رسوم دراسية"],
        words: &[],
    },
    CategoryRule {
        category: Category::Toll,
        substrings: &["salik", "toll", "سالك", "سالِك"],
        words: &[],
    },
    CategoryRule {
        category: Category::Parking,
        substrings: &["parking", "موقف", "مواقف"],
        words: &[],
    },
    CategoryRule {
        category: Category::Electricity,
        substrings: &["electric", "dewa", "كهرباء"],
        words: &[],
    },
    CategoryRule {
        category: Category::Water,
        substrings: &["water", "مياه", "ماء"],
        words: &[],
    },
    CategoryRule {
        category: Category::Telecom,
        substrings: &["etisalat", "internet", "اتصالات", "إنترنت", "انترنت"],
        words: &["du"],
    },
    CategoryRule {
        category: Category::Loan,
        substrings: &["loan", "قرض", "سلفة"],
        words: &[],
    },
];

/// Categorize a note line. Lines matching nothing are `Uncategorized`.
pub fn categorize(line: &str) -> Category {
    let lower = line.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CATEGORY_RULES
        .iter()
        .find(|rule| {
            rule.substrings.iter().any(|kw| lower.contains(kw))
                || rule.words.iter().any(|kw| words.contains(kw))
        })
        .map(|rule| rule.category)
        .unwrap_or(Category::Uncategorized)
}
