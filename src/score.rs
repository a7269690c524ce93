//! Overall score and risk classification.

use crate::finding::{RiskTier, ScoreCard};
use crate::rules::{round2, RuleContext};

/// Arithmetic mean of the category scores, rounded to two decimals.
///
/// Returns `0.0` for an empty score card.
///
/// # Examples
///
/// ```
/// use oxidized_agents::finding::{Category, ScoreCard};
/// use oxidized_agents::score::overall_score;
///
/// let mut card = ScoreCard::default();
/// for (category, score) in Category::SCORED.into_iter().zip([5.0, 4.0, 3.7, 2.0, 4.5]) {
///     card.insert(category, score);
/// }
/// assert_eq!(overall_score(&card), 3.84);
/// ```
pub fn overall_score(card: &ScoreCard) -> f64 {
    if card.is_empty() {
        return 0.0;
    }
    let total: f64 = card.iter().map(|(_, s)| s).sum();
    round2(total / card.len() as f64)
}

/// Classifies a document by what it can do and how well that is fenced.
///
/// Evaluated top to bottom, first match wins:
///
/// 1. run-command enabled: `MEDIUM` when its pattern map has a `deny` entry
///    and a `"*": ask` default, otherwise `HIGH`.
/// 2. write or edit enabled: `MEDIUM`.
/// 3. otherwise `LOW`.
pub fn assess_risk(ctx: &RuleContext<'_>) -> RiskTier {
    if ctx.run_command_enabled() {
        let has_deny = ctx.run_command_deny_count() > 0;
        let asks_by_default = ctx.run_command_default() == Some("ask");
        return if has_deny && asks_by_default {
            RiskTier::Medium
        } else {
            RiskTier::High
        };
    }
    if ctx.is_enabled("write") || ctx.is_enabled("edit") {
        return RiskTier::Medium;
    }
    RiskTier::Low
}
