use std::fmt::Write as _;

use crate::pricing::{format_amount, CostBreakdown, PlanQuote, UserProfile};

/// Inputs for one advisory request. Built from an already computed quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryRequest {
    pub device_description: String,
    pub plan_description: String,
    pub total_cost_of_ownership: u64,
    pub initial_outlay: u64,
    pub avg_monthly_cost: u64,
    pub profile: UserProfile,
}

impl AdvisoryRequest {
    pub fn new(
        device_description: impl Into<String>,
        plan_description: impl Into<String>,
        breakdown: &CostBreakdown,
        profile: UserProfile,
    ) -> Self {
        Self {
            device_description: device_description.into(),
            plan_description: plan_description.into(),
            total_cost_of_ownership: breakdown.total_cost_of_ownership,
            initial_outlay: breakdown.initial_outlay,
            avg_monthly_cost: breakdown.avg_monthly_cost,
            profile,
        }
    }

    pub fn from_quote(quote: &PlanQuote, profile: UserProfile) -> Self {
        Self::new(
            quote.device_description.clone(),
            quote.plan_description.clone(),
            &quote.breakdown,
            profile,
        )
    }

    pub fn prompt(&self) -> String {
        let mut prompt = String::new();

        writeln!(
            &mut prompt,
            "You are an experienced consultant on Taiwan's mobile telecom market."
        )
        .expect("write role");
        writeln!(&mut prompt, "Review this iPhone purchase plan:").expect("write intro");
        writeln!(&mut prompt, "- Device: {}", self.device_description).expect("write device");
        writeln!(&mut prompt, "- Plan: {}", self.plan_description).expect("write plan");
        writeln!(
            &mut prompt,
            "- Total cost of ownership: NT$ {}",
            format_amount(self.total_cost_of_ownership)
        )
        .expect("write tco");
        writeln!(
            &mut prompt,
            "- Upfront payment: NT$ {}",
            format_amount(self.initial_outlay)
        )
        .expect("write outlay");
        writeln!(
            &mut prompt,
            "- Average monthly cost: NT$ {}",
            format_amount(self.avg_monthly_cost)
        )
        .expect("write average");
        writeln!(
            &mut prompt,
            "- Customer profile: {} data usage, {} budget priority.",
            self.profile.data_usage.label(),
            self.profile.budget.label()
        )
        .expect("write profile");
        prompt.push('\n');
        writeln!(
            &mut prompt,
            "Answer concisely in Traditional Chinese (zh-TW), formatted as Markdown, covering:"
        )
        .expect("write instructions");
        writeln!(
            &mut prompt,
            "1. Whether the plan suits this customer profile."
        )
        .expect("write point 1");
        writeln!(
            &mut prompt,
            "2. How the contract compares with buying the phone outright."
        )
        .expect("write point 2");
        writeln!(&mut prompt, "3. A closing value score from 1 to 10.").expect("write point 3");

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{BudgetTier, ReferenceCatalog, UsageTier};

    #[test]
    fn prompt_includes_headline_figures_and_profile() {
        let catalog = ReferenceCatalog::standard();
        let selection = catalog.default_selection().expect("default selection");
        let quote = PlanQuote::build(catalog, &selection).expect("quote builds");
        let profile = UserProfile {
            data_usage: UsageTier::Low,
            budget: BudgetTier::High,
        };

        let prompt = AdvisoryRequest::from_quote(&quote, profile).prompt();

        assert!(prompt.contains("- Device: iPhone 16 Pro 128GB"));
        assert!(prompt.contains("- Plan: 中華電信 1399/月 (36個月)"));
        assert!(prompt.contains("NT$ 76,464"));
        assert!(prompt.contains("NT$ 37,292"));
        assert!(prompt.contains("NT$ 2,124"));
        assert!(prompt.contains("low data usage, high budget priority"));
        assert!(prompt.contains("zh-TW"));
    }
}
