use hypewatch_core::Relationship;

use crate::types::IntelligenceReport;

pub(crate) const NO_DATA_INSIGHT: &str = "no data loaded";

/// One-line observations over a finished report, most important first.
pub(crate) fn derive_insights(report: &IntelligenceReport) -> Vec<String> {
    if !report.has_data {
        return vec![NO_DATA_INSIGHT.to_string()];
    }

    let mut insights = Vec::new();

    // `brands` is already ordered by mentions, so the first mentioned entry leads.
    match report.brands.first().filter(|b| b.mentions > 0) {
        Some(leader) => insights.push(format!(
            "{} leads share of voice at {:.1}% ({} mentions)",
            leader.brand_name, leader.share_of_voice, leader.mentions
        )),
        None => insights.push("no configured brand was mentioned".to_string()),
    }

    if let Some((rank, own)) = report
        .brands
        .iter()
        .enumerate()
        .find(|(_, b)| b.relationship == Relationship::Own)
    {
        if own.mentions == 0 {
            insights.push(format!("{} had no mentions in this dataset", own.brand_name));
        } else {
            insights.push(format!(
                "{} ranks #{} of {} brands by mentions",
                own.brand_name,
                rank + 1,
                report.brands.len()
            ));
        }
    }

    let sentiment = &report.sentiment;
    let total = sentiment.total();
    if total > 0 {
        let labels = [
            ("positive", sentiment.positive),
            ("neutral", sentiment.neutral),
            ("negative", sentiment.negative),
        ];
        let top = labels.iter().map(|&(_, count)| count).max().unwrap_or(0);
        let leaders: Vec<&str> = labels
            .iter()
            .filter(|&&(_, count)| count == top)
            .map(|&(label, _)| label)
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let pct = top as f64 * 100.0 / total as f64;
        match leaders.as_slice() {
            [label] => {
                insights.push(format!("sentiment is mostly {label} ({pct:.0}% of posts)"));
            }
            tied => insights.push(format!(
                "sentiment is split between {} ({pct:.0}% of posts each)",
                join_labels(tied)
            )),
        }
    }

    if let Some(tag) = report.top_hashtags.first() {
        insights.push(format!("#{} is the top hashtag ({} uses)", tag.tag, tag.count));
    }

    if let Some(best) = report
        .brands
        .iter()
        .filter(|b| b.mentions > 0)
        // Reversed `min_by` keeps the first brand on ties.
        .min_by(|a, b| b.avg_engagement.total_cmp(&a.avg_engagement))
    {
        insights.push(format!(
            "{} has the highest average engagement per mention ({:.0})",
            best.brand_name, best.avg_engagement
        ));
    }

    if report.dataset.skipped_records > 0 {
        insights.push(format!(
            "{} malformed records were skipped",
            report.dataset.skipped_records
        ));
    }

    insights
}

fn join_labels(labels: &[&str]) -> String {
    match labels {
        [] => String::new(),
        [only] => (*only).to_string(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}
