use handset_advisor::pricing::{
    compute, project, ContractTerm, MonthlyFee, PlanInput, PlanQuote, PlanSelection,
    ReferenceCatalog, SelectionError,
};

fn fee(amount: u32) -> MonthlyFee {
    MonthlyFee::new(amount).expect("non-zero fee")
}

fn term(months: u32) -> ContractTerm {
    ContractTerm::new(months).expect("non-zero term")
}

fn plan_input(model_id: &str, storage: &str, monthly_fee: u32, term_months: u32) -> PlanInput {
    PlanInput {
        model_id: model_id.to_string(),
        storage: storage.to_string(),
        carrier_id: "TWM".to_string(),
        monthly_fee,
        term_months,
        loyalty: false,
    }
}

#[test]
fn premium_plan_without_loyalty() {
    let breakdown = compute(36900, fee(1399), term(36), false);

    assert_eq!(breakdown.retail_price, 36900);
    assert_eq!(breakdown.subsidy, 10800);
    assert_eq!(breakdown.contract_price, 26100);
    assert_eq!(breakdown.prepayment_months, 8);
    assert_eq!(breakdown.prepayment, 11192);
    assert_eq!(breakdown.initial_outlay, 37292);
    assert_eq!(breakdown.total_plan_cost, 50364);
    assert_eq!(breakdown.total_cost_of_ownership, 76464);
    assert_eq!(breakdown.avg_monthly_cost, 2124);
}

#[test]
fn loyalty_bonus_shifts_downstream_totals() {
    let breakdown = compute(36900, fee(1399), term(36), true);

    assert_eq!(breakdown.subsidy, 12800);
    assert_eq!(breakdown.contract_price, 24100);
    assert_eq!(breakdown.initial_outlay, 35292);
    assert_eq!(breakdown.total_plan_cost, 50364);
    assert_eq!(breakdown.total_cost_of_ownership, 74464);
    assert_eq!(breakdown.avg_monthly_cost, 2068);
}

#[test]
fn entry_plan_near_fee_floor() {
    let breakdown = compute(36900, fee(599), term(36), false);

    // (599 - 399) * 3.6 * 3
    assert_eq!(breakdown.subsidy, 2160);
    assert_eq!(breakdown.contract_price, 34740);
    assert_eq!(breakdown.prepayment_months, 5);
    assert_eq!(breakdown.prepayment, 2995);
    assert_eq!(breakdown.initial_outlay, 37735);
    assert_eq!(breakdown.total_plan_cost, 21564);
    assert_eq!(breakdown.total_cost_of_ownership, 56304);
    assert_eq!(breakdown.avg_monthly_cost, 1564);
}

#[test]
fn every_catalog_combination_respects_invariants() {
    let catalog = ReferenceCatalog::standard();

    for model in catalog.models {
        for tier in model.tiers {
            for &amount in catalog.monthly_fees {
                for &months in catalog.contract_terms {
                    for loyalty in [false, true] {
                        let breakdown =
                            compute(tier.retail_price, fee(amount), term(months), loyalty);
                        assert!(breakdown.subsidy <= breakdown.retail_price);
                        assert_eq!(
                            breakdown.total_cost_of_ownership,
                            breakdown.total_plan_cost + breakdown.contract_price
                        );

                        let points =
                            project(&breakdown, fee(amount), term(months), tier.retail_price);
                        assert_eq!(points.len(), months as usize + 1);
                    }
                }
            }
        }
    }
}

#[test]
fn selection_changes_produce_new_values() {
    let catalog = ReferenceCatalog::standard();
    let original = PlanSelection::from_input(catalog, plan_input("iphone16pro", "1TB", 1399, 36))
        .expect("valid selection");

    let switched = original
        .with_model(catalog, "iphonese3")
        .expect("model exists");
    assert_eq!(switched.model_id(), "iphonese3");
    assert_eq!(switched.storage(), "64GB");
    assert_eq!(original.storage(), "1TB");

    let cheaper = switched
        .with_monthly_fee(catalog, 799)
        .and_then(|selection| selection.with_term(catalog, 24))
        .and_then(|selection| selection.with_carrier(catalog, "FET"))
        .map(|selection| selection.with_loyalty(true))
        .expect("offered plan");
    assert_eq!(cheaper.monthly_fee().get(), 799);
    assert_eq!(cheaper.term().months(), 24);
    assert_eq!(cheaper.carrier_id(), "FET");
    assert!(cheaper.loyalty());
    assert_eq!(switched.monthly_fee().get(), 1399);

    assert_eq!(
        cheaper.with_storage(catalog, "1TB").unwrap_err(),
        SelectionError::UnknownStorage {
            model_id: "iphonese3".to_string(),
            storage: "1TB".to_string(),
        }
    );
}

#[test]
fn boundary_validation_rejects_untrusted_input() {
    let catalog = ReferenceCatalog::standard();

    let zero_term = PlanSelection::from_input(catalog, plan_input("iphone16", "128GB", 999, 0));
    assert_eq!(zero_term.unwrap_err(), SelectionError::UnsupportedTerm(0));

    let odd_fee = PlanSelection::from_input(catalog, plan_input("iphone16", "128GB", 1000, 24));
    assert_eq!(odd_fee.unwrap_err(), SelectionError::UnsupportedFee(1000));

    let unknown = PlanSelection::from_input(catalog, plan_input("galaxy", "128GB", 999, 24));
    assert_eq!(
        unknown.unwrap_err(),
        SelectionError::UnknownModel("galaxy".to_string())
    );
}

#[test]
fn quote_recomputes_from_selection() {
    let catalog = ReferenceCatalog::standard();
    let selection =
        PlanSelection::from_input(catalog, plan_input("iphone15", "256GB", 2699, 48))
            .expect("valid selection");

    let first = PlanQuote::build(catalog, &selection).expect("quote builds");
    let loyal = PlanQuote::build(catalog, &selection.with_loyalty(true)).expect("quote builds");

    assert_eq!(first.device_description, "iPhone 15 256GB");
    assert_eq!(first.plan_description, "台灣大哥大 2699/月 (48個月)");
    // 2300 * 4.8 * 3 = 33120 exceeds the 28400 retail price.
    assert_eq!(first.breakdown.subsidy, 28400);
    assert_eq!(first.breakdown.contract_price, 0);
    assert_eq!(loyal.breakdown, first.breakdown);
    assert_eq!(first.projection.len(), 49);
    assert_eq!(first.projection[0].contract_cumulative, 0);
}
