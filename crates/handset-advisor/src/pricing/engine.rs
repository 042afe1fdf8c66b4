use serde::Serialize;

use super::domain::{ContractTerm, MonthlyFee};

/// Cheapest conceivable plan; subsidy grows with the fee above this floor.
pub const SUBSIDY_FEE_FLOOR: i64 = 399;
/// Subsidy per NT$ of fee above the floor, per ten months of contract.
pub const SUBSIDY_RATE: i64 = 3;
pub const LOYALTY_BONUS: u64 = 2000;
/// Plans above this fee collect the larger prepayment at signing.
pub const PREPAYMENT_FEE_THRESHOLD: u32 = 999;
pub const STANDARD_PREPAYMENT_MONTHS: u32 = 5;
pub const PREMIUM_PREPAYMENT_MONTHS: u32 = 8;

/// Cost of a subsidized contract, all amounts in NT$.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    pub retail_price: u64,
    pub subsidy: u64,
    pub contract_price: u64,
    pub prepayment_months: u32,
    pub prepayment: u64,
    pub initial_outlay: u64,
    pub total_plan_cost: u64,
    pub total_cost_of_ownership: u64,
    pub avg_monthly_cost: u64,
}

/// Vendor subsidy before the loyalty bonus and retail cap:
/// `floor((fee - 399) * (term / 10) * 3)`, evaluated exactly in integers.
/// Negative for fees under the floor. Saturates for fee and term pairs far
/// outside any catalog.
pub fn base_subsidy(monthly_fee: MonthlyFee, term: ContractTerm) -> i64 {
    let fee_above_floor = i64::from(monthly_fee.get()) - SUBSIDY_FEE_FLOOR;
    fee_above_floor
        .saturating_mul(i64::from(term.months()))
        .saturating_mul(SUBSIDY_RATE)
        .div_euclid(10)
}

pub const fn prepayment_months(monthly_fee: MonthlyFee) -> u32 {
    if monthly_fee.get() > PREPAYMENT_FEE_THRESHOLD {
        PREMIUM_PREPAYMENT_MONTHS
    } else {
        STANDARD_PREPAYMENT_MONTHS
    }
}

pub fn compute(
    retail_price: u32,
    monthly_fee: MonthlyFee,
    term: ContractTerm,
    loyalty: bool,
) -> CostBreakdown {
    let retail_price = u64::from(retail_price);
    let fee = u64::from(monthly_fee.get());
    let months = u64::from(term.months());

    // A below-floor fee earns no subsidy rather than a surcharge.
    let base = u64::try_from(base_subsidy(monthly_fee, term)).unwrap_or(0);
    let bonus = if loyalty { LOYALTY_BONUS } else { 0 };
    let subsidy = retail_price.min(base.saturating_add(bonus));
    let contract_price = retail_price.saturating_sub(subsidy);

    let prepayment_months = prepayment_months(monthly_fee);
    let prepayment = fee * u64::from(prepayment_months);
    let initial_outlay = contract_price + prepayment;
    let total_plan_cost = fee * months;
    let total_cost_of_ownership = total_plan_cost + contract_price;
    let avg_monthly_cost = total_cost_of_ownership / months;

    CostBreakdown {
        retail_price,
        subsidy,
        contract_price,
        prepayment_months,
        prepayment,
        initial_outlay,
        total_plan_cost,
        total_cost_of_ownership,
        avg_monthly_cost,
    }
}
