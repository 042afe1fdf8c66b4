use crate::infra::{parse_budget_tier, parse_usage_tier, InMemoryAdvisoryStore};
use clap::Args;
use handset_advisor::advisory::{AdvisoryOutcome, AdvisoryRequest, AdvisoryService, GeminiClient};
use handset_advisor::config::AppConfig;
use handset_advisor::error::AppError;
use handset_advisor::pricing::{
    format_amount, write_projection_csv, BudgetTier, LineItemKind, PlanInput, PlanQuote,
    PlanSelection, ReferenceCatalog, UsageTier, UserProfile,
};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

/// Months between rows of the printed cumulative-spend table.
const PROJECTION_STRIDE: usize = 6;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Device model id (see `catalog`). Defaults to the first catalog model.
    #[arg(long)]
    pub(crate) model: Option<String>,
    /// Storage tier label, e.g. 256GB. Defaults to the model's smallest tier.
    #[arg(long)]
    pub(crate) storage: Option<String>,
    /// Carrier id (CHT, TWM, FET)
    #[arg(long)]
    pub(crate) carrier: Option<String>,
    /// Monthly plan fee in NT$
    #[arg(long)]
    pub(crate) fee: Option<u32>,
    /// Contract term in months
    #[arg(long)]
    pub(crate) term: Option<u32>,
    /// Apply the returning-customer loyalty bonus
    #[arg(long)]
    pub(crate) loyalty: bool,
    /// Data usage tier for the advisory (low, medium, high)
    #[arg(long, value_parser = parse_usage_tier)]
    pub(crate) data_usage: Option<UsageTier>,
    /// Budget priority tier for the advisory (low, medium, high)
    #[arg(long, value_parser = parse_budget_tier)]
    pub(crate) budget: Option<BudgetTier>,
    /// Write the full month-by-month projection as CSV
    #[arg(long)]
    pub(crate) projection_csv: Option<PathBuf>,
    /// Request an advisory summary from the configured text generator
    #[arg(long)]
    pub(crate) advise: bool,
}

pub(crate) async fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        model,
        storage,
        carrier,
        fee,
        term,
        loyalty,
        data_usage,
        budget,
        projection_csv,
        advise,
    } = args;

    let catalog = ReferenceCatalog::standard();
    let selection = resolve_selection(catalog, model, storage, carrier, fee, term, loyalty)?;
    let quote = PlanQuote::build(catalog, &selection)?;

    render_quote(&quote);

    if let Some(path) = projection_csv {
        let file = File::create(&path)?;
        write_projection_csv(&quote.projection, file)?;
        println!("\nProjection written to {}", path.display());
    }

    if advise {
        let profile = UserProfile {
            data_usage: data_usage.unwrap_or_default(),
            budget: budget.unwrap_or_default(),
        };
        let config = AppConfig::load()?;
        let gateway = Arc::new(GeminiClient::new(&config.advisory)?);
        let service = AdvisoryService::new(gateway, Arc::new(InMemoryAdvisoryStore::default()));

        let outcome = service
            .advise(&AdvisoryRequest::from_quote(&quote, profile))
            .await;
        render_advisory(&outcome);
    }

    Ok(())
}

pub(crate) fn run_catalog() {
    let catalog = ReferenceCatalog::standard();

    println!("Devices");
    for model in catalog.models {
        let tiers: Vec<String> = model
            .tiers
            .iter()
            .map(|tier| format!("{} NT$ {}", tier.label, format_amount(tier.retail_price.into())))
            .collect();
        println!("- {} ({}): {}", model.name, model.id, tiers.join(" | "));
    }

    println!("\nCarriers");
    for carrier in catalog.carriers {
        println!("- {} ({})", carrier.name, carrier.id);
    }

    let fees: Vec<String> = catalog.monthly_fees.iter().map(u32::to_string).collect();
    let terms: Vec<String> = catalog.contract_terms.iter().map(u32::to_string).collect();
    println!("\nMonthly fees: {}", fees.join(", "));
    println!("Contract terms (months): {}", terms.join(", "));
}

/// Start from the catalog default and apply each override in turn, the same
/// way an interactive form would.
fn resolve_selection(
    catalog: &ReferenceCatalog,
    model: Option<String>,
    storage: Option<String>,
    carrier: Option<String>,
    fee: Option<u32>,
    term: Option<u32>,
    loyalty: bool,
) -> Result<PlanSelection, AppError> {
    let Some(mut selection) = catalog.default_selection() else {
        let input = PlanInput {
            model_id: model.unwrap_or_default(),
            storage: storage.unwrap_or_default(),
            carrier_id: carrier.unwrap_or_default(),
            monthly_fee: fee.unwrap_or_default(),
            term_months: term.unwrap_or_default(),
            loyalty,
        };
        return Ok(PlanSelection::from_input(catalog, input)?);
    };

    if let Some(model) = model {
        selection = selection.with_model(catalog, &model)?;
    }
    if let Some(storage) = storage {
        selection = selection.with_storage(catalog, &storage)?;
    }
    if let Some(carrier) = carrier {
        selection = selection.with_carrier(catalog, &carrier)?;
    }
    if let Some(fee) = fee {
        selection = selection.with_monthly_fee(catalog, fee)?;
    }
    if let Some(term) = term {
        selection = selection.with_term(catalog, term)?;
    }

    Ok(selection.with_loyalty(loyalty))
}

fn render_quote(quote: &PlanQuote) {
    let breakdown = &quote.breakdown;

    println!("Handset contract quote");
    println!("Device: {}", quote.device_description);
    println!("Plan: {}", quote.plan_description);
    if quote.selection.loyalty() {
        println!("Loyalty bonus applied");
    }

    println!("\nHeadline");
    println!(
        "- Total cost of ownership: NT$ {}",
        format_amount(breakdown.total_cost_of_ownership)
    );
    println!(
        "- Upfront payment: NT$ {} (device + prepayment)",
        format_amount(breakdown.initial_outlay)
    );
    println!(
        "- Average monthly cost: NT$ {}",
        format_amount(breakdown.avg_monthly_cost)
    );

    println!("\nCost structure");
    for item in quote.line_items() {
        let sign = match item.kind {
            LineItemKind::Discount => "-",
            LineItemKind::Charge | LineItemKind::Total => " ",
        };
        let note = item
            .note
            .map(|note| format!(" ({note})"))
            .unwrap_or_default();
        println!(
            "- {:<32}{}NT$ {:>8}{}",
            item.label,
            sign,
            format_amount(item.amount),
            note
        );
    }

    println!("\nCumulative spend (contract vs. retail + SIM-only plan)");
    let last = quote.projection.len().saturating_sub(1);
    for (index, point) in quote.projection.iter().enumerate() {
        if index % PROJECTION_STRIDE != 0 && index != last {
            continue;
        }
        println!(
            "- month {:>2}: contract NT$ {:>8} | retail NT$ {:>10.1}",
            point.month,
            format_amount(point.contract_cumulative),
            point.retail_cumulative
        );
    }
}

fn render_advisory(outcome: &AdvisoryOutcome) {
    println!("\nAdvisory");
    match outcome {
        AdvisoryOutcome::Pending => println!("(still pending)"),
        AdvisoryOutcome::Succeeded(text) => println!("{text}"),
        AdvisoryOutcome::Failed(fallback) => println!("{fallback}"),
    }
}
