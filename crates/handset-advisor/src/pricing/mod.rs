//! Handset contract pricing: reference data, the subsidy engine, and the
//! cumulative-spend projection comparing a contract against buying outright.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod projection;
mod quote;

pub use catalog::{Carrier, DeviceCatalogEntry, ReferenceCatalog, StorageTier};
pub use domain::{
    BudgetTier, ContractTerm, MonthlyFee, PlanInput, PlanSelection, SelectionError, UsageTier,
    UserProfile,
};
pub use engine::{compute, CostBreakdown};
pub use projection::{project, write_projection_csv, ProjectionPoint};
pub use quote::{format_amount, CostLineItem, LineItemKind, PlanQuote};
