use serde::Serialize;
use std::io::Write;

use super::domain::{ContractTerm, MonthlyFee};
use super::engine::CostBreakdown;

/// The buy-outright baseline assumes a SIM-only plan at 80% of the contract fee.
const SIM_ONLY_FEE_NUMERATOR: u64 = 4;
const SIM_ONLY_FEE_DENOMINATOR: u64 = 5;

/// Cumulative spend after `month` elapsed months under each option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub contract_cumulative: u64,
    pub retail_cumulative: f64,
}

/// Month-by-month comparison of the contract against buying the device retail.
/// Returns `term + 1` points covering months `0..=term`.
pub fn project(
    breakdown: &CostBreakdown,
    monthly_fee: MonthlyFee,
    term: ContractTerm,
    retail_price: u32,
) -> Vec<ProjectionPoint> {
    let fee = u64::from(monthly_fee.get());
    let retail_price = retail_price as f64;

    (0..=term.months())
        .map(|month| {
            let elapsed = u64::from(month);
            // fee * elapsed always fits in u64; the 4/5 scaling happens in f64.
            let sim_only_spend = (fee * elapsed) as f64 * SIM_ONLY_FEE_NUMERATOR as f64
                / SIM_ONLY_FEE_DENOMINATOR as f64;
            ProjectionPoint {
                month,
                contract_cumulative: breakdown.contract_price + fee * elapsed,
                retail_cumulative: retail_price + sim_only_spend,
            }
        })
        .collect()
}

/// Write the projection as CSV with a header row, for spreadsheet charting.
pub fn write_projection_csv<W: Write>(
    points: &[ProjectionPoint],
    writer: W,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}
