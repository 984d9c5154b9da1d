//! Terminal rendering of reports

use aurum_market::analysis::{CorrelationResult, DebtSnapshot, MacroSignal};
use aurum_market::sentiment::SentimentResult;
use aurum_market::{Action, MarketReport, SentimentLabel};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn action_color(action: Action) -> Color {
    match action {
        Action::StrongBuy | Action::ConsiderBuy => Color::Green,
        Action::Hold => Color::Yellow,
        Action::ConsiderSell | Action::StrongSell => Color::Red,
    }
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.2}%"))
}

fn correlation(result: &CorrelationResult) -> String {
    match (result.coefficient, result.p_value, result.strength()) {
        (Some(r), Some(p), Some(strength)) => {
            format!("r = {r:.3} (p = {p:.3}, {strength}, n = {})", result.sample_size)
        }
        _ => format!("undefined (n = {})", result.sample_size),
    }
}

/// Ranking table, best first, limited to `top` rows
pub fn recommendations(report: &MarketReport, top: usize) -> Table {
    let mut table = table();
    table.set_header(vec![
        "#", "Asset", "Score", "Action", "Risk", "Price", "5d", "20d", "Vol",
    ]);

    for (rank, rec) in report.recommendations.iter().take(top).enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&rec.asset_name),
            Cell::new(format!("{:.0}", rec.score)),
            Cell::new(rec.action).fg(action_color(rec.action)),
            Cell::new(rec.risk_level),
            Cell::new(format!("{:.2}", rec.latest_price)),
            Cell::new(pct(Some(rec.pct_change_5d))),
            Cell::new(pct(rec.pct_change_20d)),
            Cell::new(format!("{:.2}%", rec.volatility)),
        ]);
    }
    table
}

/// Full human-readable report
pub fn report(report: &MarketReport, top: usize) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str(&format!(
        "Records: {}  mean {:+.3}  median {:+.3}  std {:.3}\n",
        summary.total, summary.mean, summary.median, summary.std_dev
    ));
    for label in [SentimentLabel::Positive, SentimentLabel::Neutral, SentimentLabel::Negative] {
        let stat = summary.label(label);
        let share = stat
            .percentage
            .map_or_else(|| "n/a".to_string(), |p| format!("{p:.1}%"));
        out.push_str(&format!("  {label}: {} ({share})\n", stat.count));
    }

    out.push_str(&format!(
        "Sentiment vs reference: {}\n",
        correlation(&report.sentiment_correlation)
    ));
    for asset in &report.cross_asset {
        out.push_str(&format!("  {} vs reference: {}\n", asset.asset, correlation(&asset.result)));
    }

    if let Some(signal) = &report.macro_signal {
        out.push_str(&format!("Macro score: {:.0}\n", signal.score));
    }

    out.push_str(&format!("\n{}\n", recommendations(report, top)));

    if let Some(best) = report.recommendations.first() {
        out.push_str(&format!("\nTop pick: {} ({})\n", best.asset_name, best.action));
        for reason in &best.reasons {
            out.push_str(&format!("  - {reason}\n"));
        }
    }

    let assessment = &report.assessment;
    out.push_str(&format!(
        "Profile: {}  confidence {:.0}%  market volatility {:.2}%\n",
        assessment.profile, assessment.confidence, assessment.market_volatility
    ));

    if let Some(forecast) = &report.forecast {
        out.push_str(&format!(
            "Forecast {}: {:.2} -> {:.2} ({:+.2}%), band {:.2} .. {:.2}\n",
            forecast.asset,
            forecast.latest_price,
            forecast.predicted_price,
            forecast.expected_change_pct(),
            forecast.lower_bound,
            forecast.upper_bound
        ));
    }

    if !report.skipped_assets.is_empty() {
        out.push_str(&format!("Skipped: {}\n", report.skipped_assets.join(", ")));
    }

    out
}

pub fn score_table(result: &SentimentResult) -> Table {
    let mut table = table();
    table.set_header(vec!["Measure", "Value"]);
    table.add_row(vec![Cell::new("Score"), Cell::new(format!("{:+.4}", result.score))]);
    table.add_row(vec![Cell::new("Label"), Cell::new(result.label)]);
    table.add_row(vec![
        Cell::new("VADER compound"),
        Cell::new(format!("{:+.4}", result.social.compound)),
    ]);
    table.add_row(vec![
        Cell::new("VADER pos/neu/neg"),
        Cell::new(format!(
            "{:.3} / {:.3} / {:.3}",
            result.social.positive, result.social.neutral, result.social.negative
        )),
    ]);
    table.add_row(vec![
        Cell::new("Pattern polarity"),
        Cell::new(format!("{:+.4}", result.formal.polarity)),
    ]);
    table.add_row(vec![
        Cell::new("Pattern subjectivity"),
        Cell::new(format!("{:.4}", result.formal.subjectivity)),
    ]);
    table
}

pub fn macro_table(snapshot: &DebtSnapshot, signal: &MacroSignal) -> Table {
    let mut table = table();
    table.set_header(vec!["Measure", "Value"]);
    if let Some(year) = snapshot.year {
        table.add_row(vec![Cell::new("Year"), Cell::new(year)]);
    }
    table.add_row(vec![
        Cell::new("Global debt"),
        Cell::new(format!("${:.1}T", snapshot.debt_usd / 1e12)),
    ]);
    table.add_row(vec![
        Cell::new("Debt/GDP"),
        Cell::new(format!("{:.1}%", snapshot.ratio_pct)),
    ]);
    table.add_row(vec![
        Cell::new("Debt growth"),
        Cell::new(format!("{:+.1}%", snapshot.growth_pct)),
    ]);
    table.add_row(vec![Cell::new("Risk level"), Cell::new(snapshot.risk_level())]);
    table.add_row(vec![Cell::new("Macro score"), Cell::new(format!("{:.0}", signal.score))]);
    table.add_row(vec![
        Cell::new("Price impact"),
        Cell::new(format!("{:+.1}%", signal.price_impact * 100.0)),
    ]);
    for reason in &signal.reasons {
        table.add_row(vec![Cell::new(""), Cell::new(reason)]);
    }
    table
}
