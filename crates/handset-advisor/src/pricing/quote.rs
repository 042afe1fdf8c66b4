use serde::Serialize;
use tracing::debug;

use super::catalog::ReferenceCatalog;
use super::domain::{PlanSelection, SelectionError};
use super::engine::{compute, CostBreakdown};
use super::projection::{project, ProjectionPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Charge,
    Discount,
    Total,
}

/// One row of the cost-structure table shown alongside the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostLineItem {
    pub label: String,
    pub amount: u64,
    pub kind: LineItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Everything the presentation layer needs for one plan selection.
/// Rebuilt in full whenever the selection changes.
#[derive(Debug, Clone, Serialize)]
pub struct PlanQuote {
    pub selection: PlanSelection,
    pub device_description: String,
    pub plan_description: String,
    pub breakdown: CostBreakdown,
    pub projection: Vec<ProjectionPoint>,
}

impl PlanQuote {
    pub fn build(
        catalog: &ReferenceCatalog,
        selection: &PlanSelection,
    ) -> Result<Self, SelectionError> {
        let model = catalog.model(selection.model_id())?;
        let carrier = catalog.carrier(selection.carrier_id())?;
        let retail_price = catalog.retail_price(selection.model_id(), selection.storage())?;

        let fee = selection.monthly_fee();
        let term = selection.term();
        let breakdown = compute(retail_price, fee, term, selection.loyalty());
        let projection = project(&breakdown, fee, term, retail_price);

        debug!(
            model = model.id,
            storage = selection.storage(),
            carrier = carrier.id,
            fee = fee.get(),
            term = term.months(),
            loyalty = selection.loyalty(),
            tco = breakdown.total_cost_of_ownership,
            "plan quote computed"
        );

        Ok(Self {
            selection: selection.clone(),
            device_description: format!("{} {}", model.name, selection.storage()),
            plan_description: format!("{} {}/月 ({}個月)", carrier.name, fee, term),
            breakdown,
            projection,
        })
    }

    pub fn line_items(&self) -> Vec<CostLineItem> {
        let breakdown = &self.breakdown;
        let fee = self.selection.monthly_fee();
        let term = self.selection.term();

        vec![
            CostLineItem {
                label: "Retail price".to_string(),
                amount: breakdown.retail_price,
                kind: LineItemKind::Charge,
                note: None,
            },
            CostLineItem {
                label: "Plan subsidy".to_string(),
                amount: breakdown.subsidy,
                kind: LineItemKind::Discount,
                note: None,
            },
            CostLineItem {
                label: "Contract device price".to_string(),
                amount: breakdown.contract_price,
                kind: LineItemKind::Charge,
                note: None,
            },
            CostLineItem {
                label: "Prepayment at signing".to_string(),
                amount: breakdown.prepayment,
                kind: LineItemKind::Charge,
                note: Some(format!(
                    "{} months of fees credited back",
                    breakdown.prepayment_months
                )),
            },
            CostLineItem {
                label: format!("Plan fees ({fee} x {term} months)"),
                amount: breakdown.total_plan_cost,
                kind: LineItemKind::Charge,
                note: None,
            },
            CostLineItem {
                label: "Total cost of ownership".to_string(),
                amount: breakdown.total_cost_of_ownership,
                kind: LineItemKind::Total,
                note: Some("contract device price + total plan fees".to_string()),
            },
        ]
    }
}

/// Render an NT$ amount with thousands separators, e.g. `76,464`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}
