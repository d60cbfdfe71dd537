use famledger_core::{Analysis, Category, Currency, round2};
use famledger_finance::FinanceAgent;
use rstest::rstest;
use std::collections::BTreeMap;

fn family() -> FinanceAgent {
    FinanceAgent::new(["Alex", "Jamie", "Sam", "Omar"], Currency::Aed).unwrap()
}

fn trio() -> FinanceAgent {
    FinanceAgent::new(["Alex", "Jamie", "Sam"], Currency::Aed).unwrap()
}

/// Settlement totals per member must match the summary within a cent, and no
/// member may both owe and be owed.
fn assert_settlements_conserve(analysis: &Analysis) {
    let mut paid_out: BTreeMap<&str, f64> = BTreeMap::new();
    let mut received: BTreeMap<&str, f64> = BTreeMap::new();
    for s in &analysis.summary.settlements {
        *paid_out.entry(s.from.as_str()).or_default() += s.amount;
        *received.entry(s.to.as_str()).or_default() += s.amount;
    }
    for (member, row) in &analysis.summary.members {
        let name = member.as_str();
        let out = paid_out.get(name).copied().unwrap_or(0.0);
        let inn = received.get(name).copied().unwrap_or(0.0);
        assert!((out - row.owes).abs() <= 0.01, "{name}: paid out {out}, owes {}", row.owes);
        assert!((inn - row.due).abs() <= 0.01, "{name}: received {inn}, due {}", row.due);
        assert!(row.owes == 0.0 || row.due == 0.0, "{name} both owes and is due");
    }
}

#[test]
fn test_even_split_between_named_members() {
    let analysis = family().analyze("Alex paid $90 for Jamie and Sam");
    let summary = &analysis.summary;
    assert_eq!(summary.member("Alex").unwrap().due, 90.0);
    assert_eq!(summary.member("Jamie").unwrap().owes, 45.0);
    assert_eq!(summary.member("Sam").unwrap().owes, 45.0);
    assert!(summary.member("Omar").unwrap().is_settled());

    let tx = &analysis.transactions[0];
    assert_eq!(tx.category, Category::Uncategorized);
    assert!((tx.shares_total() - tx.amount).abs() <= 0.01 * tx.beneficiaries.len() as f64);
    assert_eq!(analysis.currency, "USD");
    assert_settlements_conserve(&analysis);
}

#[test]
fn test_currency_defaults_and_detection() {
    let agent = family();
    assert_eq!(
        agent.analyze("Alex paid 200 for groceries for Jamie and Sam").currency,
        "AED"
    );
    assert_eq!(agent.analyze("Alex paid $200 for groceries").currency, "USD");
    assert_eq!(agent.analyze("Alex paid 200 AED for groceries").currency, "AED");
    assert_eq!(agent.analyze("Alex paid €40 for parking").currency, "EUR");
}

#[test]
fn test_configured_default_currency() {
    let agent = FinanceAgent::new(["Alex", "Jamie"], Currency::Eur).unwrap();
    assert_eq!(agent.analyze("Alex paid 30 for Jamie").currency, "EUR");
    assert_eq!(agent.analyze("").currency, "EUR");
}

#[test]
fn test_loan_monthly_obligation() {
    let analysis = family()
        .analyze("Omar took a car loan of 100,000 AED and will pay 5,000 AED monthly.");
    assert_eq!(analysis.loans.len(), 1);
    let loan = &analysis.loans[0];
    assert_eq!(loan.borrower.as_str(), "Omar");
    assert_eq!(loan.lender.as_str(), "Bank");
    assert_eq!(loan.principal, 100000.0);
    assert_eq!(loan.monthly_payment, Some(5000.0));
    assert_eq!(loan.estimated_term_months(), Some(20));
    assert_eq!(analysis.summary.member("Omar").unwrap().monthly_obligations, 5000.0);
    assert!(analysis.transactions.is_empty());
}

#[test]
fn test_arabic_loan_with_installment_is_not_a_payment() {
    let agent = FinanceAgent::new(["أحمد", "مريم"], Currency::Aed).unwrap();
    let analysis = agent.analyze("أحمد أخذ قرض سيارة ١٠٠٬٠٠٠ درهم ويدفع ٥٬٠٠٠ شهرياً");
    assert!(analysis.transactions.is_empty());
    assert_eq!(analysis.loans.len(), 1);
    let loan = &analysis.loans[0];
    assert_eq!(loan.borrower.as_str(), "أحمد");
    assert_eq!(loan.principal, 100000.0);
    assert_eq!(loan.monthly_payment, Some(5000.0));
    assert_eq!(analysis.summary.member("أحمد").unwrap().monthly_obligations, 5000.0);
    assert!(analysis.summary.settlements.is_empty());
}

#[test]
fn test_sentinel_name_cannot_join_roster() {
    assert!(FinanceAgent::new(["Alex", "unknown"], Currency::Aed).is_err());
    assert!(FinanceAgent::new(["Unknown"], Currency::Aed).is_err());
}

#[test]
fn test_summary_rows_follow_roster_order() {
    let agent = FinanceAgent::new(["Sam", "Alex", "Jamie"], Currency::Aed).unwrap();
    let analysis = agent.analyze("Alex paid 30 for Sam and Jamie\nJamie owes the landlord 10");
    let names: Vec<_> = analysis.summary.members.keys().map(|m| m.as_str()).collect();
    assert_eq!(names, vec!["Sam", "Alex", "Jamie", "Unknown"]);
}

#[test]
fn test_multi_line_month_settles() {
    let notes = "\
Alex paid 120 for groceries for Jamie and Sam
Jamie paid 45 for parking for everyone
Sam owes Alex 20
Jamie reimbursed Alex 30
Alex bought flowers";
    let analysis = trio().analyze(notes);

    assert_eq!(analysis.transactions.len(), 2);
    assert_eq!(analysis.debts.len(), 1);
    assert_eq!(analysis.reimbursements.len(), 1);
    assert_eq!(analysis.reimbursements[0].applied, 30.0);
    assert_eq!(analysis.dropped_lines, 1);

    let summary = &analysis.summary;
    assert_eq!(summary.member("Alex").unwrap().due, 95.0);
    assert!(summary.member("Jamie").unwrap().is_settled());
    assert_eq!(summary.member("Sam").unwrap().owes, 95.0);

    assert_eq!(summary.settlements.len(), 1);
    assert_eq!(summary.settlements[0].from.as_str(), "Sam");
    assert_eq!(summary.settlements[0].to.as_str(), "Alex");
    assert_eq!(summary.settlements[0].amount, 95.0);
    assert_settlements_conserve(&analysis);

    let paid: Vec<_> = analysis.paid_members().into_iter().map(|m| m.as_str()).collect();
    assert_eq!(paid, vec!["Alex"]);
    let unpaid: Vec<_> = analysis.unpaid_members().into_iter().map(|m| m.as_str()).collect();
    assert_eq!(unpaid, vec!["Sam"]);
}

/// Summary cents per member: positive for due, negative for owes
fn summary_cents(analysis: &Analysis) -> BTreeMap<&str, i64> {
    analysis
        .summary
        .members
        .iter()
        .map(|(m, row)| (m.as_str(), ((row.due - row.owes) * 100.0).round() as i64))
        .collect()
}

/// Net cents each member moves through the suggested transfers
fn settlement_cents(analysis: &Analysis) -> BTreeMap<&str, i64> {
    let mut moved: BTreeMap<&str, i64> = BTreeMap::new();
    for s in &analysis.summary.settlements {
        let cents = (s.amount * 100.0).round() as i64;
        *moved.entry(s.from.as_str()).or_default() -= cents;
        *moved.entry(s.to.as_str()).or_default() += cents;
    }
    moved
}

#[rstest]
#[case(&["Alex", "Bob", "Cy", "Dan", "Eve", "Fay", "Gus"])]
#[case(&["Alex", "Bob", "Cy", "Dan", "Eve", "Fay", "Gus", "Hal"])]
fn test_uneven_split_settles_to_the_cent(#[case] members: &[&str]) {
    let agent = FinanceAgent::new(members.iter().copied(), Currency::Aed).unwrap();
    let analysis = agent.analyze("Alex paid 100 for groceries");

    let summary = summary_cents(&analysis);
    assert_eq!(summary.values().sum::<i64>(), 0);
    assert_eq!(summary["Alex"], 10000);

    let moved = settlement_cents(&analysis);
    for (name, cents) in &summary {
        assert_eq!(moved.get(name).copied().unwrap_or(0), *cents, "{name}");
    }
    assert_eq!(analysis.summary.settlements.len(), members.len() - 1);
    assert_settlements_conserve(&analysis);
}

#[test]
fn test_many_uneven_splits_settle_to_the_cent() {
    let agent = FinanceAgent::new(["Alex", "Bob", "Cy", "Dan", "Eve", "Fay"], Currency::Aed).unwrap();
    let notes = "\
Alex paid 100 for groceries
Bob paid 70 for all
Cy paid 10 for Dan and Eve and Fay
Eve paid 33.33 for Alex and Bob and Fay";
    let analysis = agent.analyze(notes);
    let summary = summary_cents(&analysis);
    assert_eq!(summary.values().sum::<i64>(), 0);
    let moved = settlement_cents(&analysis);
    for (name, cents) in &summary {
        assert_eq!(moved.get(name).copied().unwrap_or(0), *cents, "{name}");
    }
}

#[test]
fn test_reimbursement_beyond_debt_is_clamped() {
    let notes = "Alex paid 90 for Jamie and Sam\nJamie paid back Alex 100";
    let analysis = family().analyze(notes);
    let reimbursement = &analysis.reimbursements[0];
    assert_eq!(reimbursement.requested, 100.0);
    assert_eq!(reimbursement.applied, 45.0);
    assert!(analysis.summary.member("Jamie").unwrap().is_settled());
    assert_eq!(analysis.summary.member("Alex").unwrap().due, 45.0);
    assert_settlements_conserve(&analysis);
}

#[test]
fn test_rounding_is_idempotent() {
    let notes = "Alex paid 100 for everyone\nJamie paid 10 for Sam and Omar and Alex";
    let analysis = family().analyze(notes);
    for row in analysis.summary.members.values() {
        for value in [row.paid, row.consumed, row.net, row.owes, row.due, row.monthly_obligations] {
            assert_eq!(round2(value), value);
        }
    }
    for tx in &analysis.transactions {
        for share in tx.shares.values() {
            assert_eq!(round2(*share), *share);
        }
    }
    assert_settlements_conserve(&analysis);
}

#[test]
fn test_category_tags() {
    let sara = FinanceAgent::new(["Sara"], Currency::Aed).unwrap();

    let rent = sara.analyze("Sara paid 3000 for apartment rent");
    assert_eq!(rent.transactions[0].category.tag(), "rent");

    let telecom = sara.analyze("سارة دفعت فاتورة اتصالات 200 درهم");
    assert_eq!(telecom.transactions.len(), 1);
    let tx = &telecom.transactions[0];
    assert_eq!(tx.category.tag(), "telecom");
    assert!(tx.payer.is_unknown());
    assert_eq!(tx.amount, 200.0);
    assert_eq!(telecom.currency, "AED");
}

#[test]
fn test_arabic_notes() {
    let agent = FinanceAgent::new(["مريم", "أحمد"], Currency::Aed).unwrap();
    let notes = "مريم دفعت ٣٥٠٠ درهم إيجار للعائلة\nأحمد مديون لـ مريم ٣٠٠ درهم";
    let analysis = agent.analyze(notes);

    assert_eq!(analysis.transactions[0].amount, 3500.0);
    assert_eq!(analysis.transactions[0].category, Category::Rent);
    assert_eq!(analysis.summary.member("مريم").unwrap().due, 2050.0);
    assert_eq!(analysis.summary.member("أحمد").unwrap().owes, 2050.0);
    assert_settlements_conserve(&analysis);
}

#[test]
fn test_mixed_currencies_are_flagged() {
    let notes = "Alex paid $90 for Jamie and Sam\nJamie paid 200 AED for groceries for everyone";
    let analysis = family().analyze(notes);
    assert!(analysis.currency.is_mixed());
    assert_eq!(analysis.currency, "mixed");
}

#[test]
fn test_analysis_serializes_to_json() {
    let analysis = family().analyze("Alex paid 300 rent for Jamie");
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["currency"], "AED");
    assert_eq!(json["transactions"][0]["category"], "rent");
    assert_eq!(json["transactions"][0]["payer"], "Alex");
    assert_eq!(json["summary"]["members"]["Jamie"]["owes"], 300.0);

    let back: Analysis = serde_json::from_value(json).unwrap();
    assert_eq!(back, analysis);
}

#[test]
fn test_nonsense_input_never_fails() {
    let analysis = family().analyze("???\n12345\nowes owes owes\n\u{200f}\n$$$");
    assert!(analysis.transactions.is_empty());
    assert!(analysis.summary.settlements.is_empty());
}
