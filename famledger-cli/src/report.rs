//! Plain-text renderings of an [`Analysis`] for the terminal and the session loop.

use famledger_core::{Analysis, Loan};

pub fn format_summary(analysis: &Analysis) -> String {
    let currency = analysis.currency;
    let mut lines = vec![
        "Family Finance Summary".to_string(),
        "----------------------".to_string(),
        format!("Currency: {currency}"),
    ];

    for (member, row) in &analysis.summary.members {
        lines.push(format!(
            "{member}: owes {:.2} {currency}, due {:.2} {currency}, net {:.2} {currency}",
            row.owes, row.due, row.net
        ));
        lines.push(format!(
            "{member}: monthly obligations {:.2} {currency}",
            row.monthly_obligations
        ));
    }

    if !analysis.summary.settlements.is_empty() {
        lines.push("\nSettlement Suggestions".to_string());
        for t in &analysis.summary.settlements {
            lines.push(format!("- {} pays {}: {:.2} {currency}", t.from, t.to, t.amount));
        }
    }

    if !analysis.loans.is_empty() {
        lines.push("\nLoans".to_string());
        for loan in &analysis.loans {
            let monthly = loan
                .monthly_payment
                .map(|m| format!(", monthly {m:.2} {}", loan.currency))
                .unwrap_or_default();
            lines.push(format!(
                "- {} borrowed {:.2} {} from {}{monthly}",
                loan.borrower, loan.principal, loan.currency, loan.lender
            ));
        }
    }

    if analysis.dropped_lines > 0 {
        lines.push(format!("\n({} line(s) not understood)", analysis.dropped_lines));
    }
    lines.join("\n")
}

/// Short Arabic explanation: balances per member plus suggested transfers.
pub fn explain_ar(analysis: &Analysis) -> String {
    let currency = analysis.currency;
    let mut lines = vec!["ملخص العائلة المالي:".to_string()];
    for (member, row) in &analysis.summary.members {
        lines.push(format!(
            "- {member}: مدفوع له {:.2} {currency}، مديون {:.2} {currency}، صافي {:.2} {currency}، الالتزامات الشهرية {:.2} {currency}.",
            row.due, row.owes, row.net, row.monthly_obligations
        ));
    }
    if !analysis.summary.settlements.is_empty() {
        lines.push("التسويات المقترحة:".to_string());
        for t in &analysis.summary.settlements {
            lines.push(format!("- {} يدفع لـ {}: {:.2} {currency}.", t.from, t.to, t.amount));
        }
    }
    lines.join("\n")
}

/// Arabic summary for one period, as the session's `/summary` replies.
pub fn format_summary_ar(analysis: &Analysis, period_label: &str) -> String {
    let currency = analysis.currency;
    let mut lines = vec![period_label.to_string(), "تفصيل الأفراد:".to_string()];
    for (member, row) in &analysis.summary.members {
        lines.push(format!(
            "- {member}: المبلغ المدفوع {:.2} {currency}، المبلغ المستفاد {:.2} {currency}، صافي الرصيد {:.2} {currency}.",
            row.paid, row.consumed, row.net
        ));
    }

    if !analysis.summary.outstanding.is_empty() {
        lines.push("المديونيات:".to_string());
        for d in &analysis.summary.outstanding {
            lines.push(format!("- {} مَدين لـ {}: {:.2} {currency}.", d.from, d.to, d.amount));
        }
    }
    if !analysis.summary.settlements.is_empty() {
        lines.push("طريقة التسوية المقترحة:".to_string());
        for t in &analysis.summary.settlements {
            lines.push(format!("- {} يدفع لـ {}: {:.2} {currency}.", t.from, t.to, t.amount));
        }
    }

    let obligations: Vec<_> = analysis
        .summary
        .members
        .iter()
        .filter(|(_, row)| row.monthly_obligations > 0.0)
        .collect();
    if !analysis.loans.is_empty() || !obligations.is_empty() {
        lines.push("القروض والالتزامات الشهرية:".to_string());
        lines.extend(analysis.loans.iter().map(loan_line_ar));
        for (member, row) in obligations {
            lines.push(format!(
                "- التزام شهري لـ {member}: {:.2} {currency}.",
                row.monthly_obligations
            ));
        }
    }
    lines.join("\n")
}

/// `/loans` reply; `None` when nothing was borrowed.
pub fn format_loans_ar(analysis: &Analysis) -> Option<String> {
    if analysis.loans.is_empty() {
        return None;
    }
    let mut lines = vec!["القروض المسجلة:".to_string()];
    lines.extend(analysis.loans.iter().map(loan_line_ar));
    Some(lines.join("\n"))
}

fn loan_line_ar(loan: &Loan) -> String {
    let currency = loan.currency.arabic_name();
    let monthly = loan
        .monthly_payment
        .map(|m| format!("، قسط شهري {m:.2} {currency}"))
        .unwrap_or_default();
    let term = loan
        .estimated_term_months()
        .map(|n| format!("، المدة التقديرية {n} شهراً"))
        .unwrap_or_default();
    format!(
        "- {}: قرض قدره {:.2} {currency}{monthly}{term}",
        loan.borrower, loan.principal
    )
}
