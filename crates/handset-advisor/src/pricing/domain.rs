use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::ReferenceCatalog;

/// Monthly plan fee in NT$. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MonthlyFee(u32);

impl MonthlyFee {
    pub const fn new(amount: u32) -> Option<Self> {
        if amount == 0 {
            None
        } else {
            Some(Self(amount))
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MonthlyFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract length in months. Never zero, so per-month averages are always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContractTerm(u32);

impl ContractTerm {
    pub const fn new(months: u32) -> Option<Self> {
        if months == 0 {
            None
        } else {
            Some(Self(months))
        }
    }

    pub const fn months(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContractTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageTier {
    Low,
    Medium,
    #[default]
    High,
}

impl UsageTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Low,
    #[default]
    Medium,
    High,
}

impl BudgetTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Consumer profile passed to the advisory generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub data_usage: UsageTier,
    #[serde(default)]
    pub budget: BudgetTier,
}

/// Raw, unvalidated plan configuration as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInput {
    pub model_id: String,
    pub storage: String,
    pub carrier_id: String,
    pub monthly_fee: u32,
    pub term_months: u32,
    #[serde(default)]
    pub loyalty: bool,
}

/// A validated plan configuration.
///
/// Values are immutable: each `with_*` method checks the new value against the
/// catalog and returns a fresh selection, leaving the original untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSelection {
    model_id: String,
    storage: String,
    carrier_id: String,
    monthly_fee: MonthlyFee,
    term: ContractTerm,
    loyalty: bool,
}

impl PlanSelection {
    pub fn from_input(
        catalog: &ReferenceCatalog,
        input: PlanInput,
    ) -> Result<Self, SelectionError> {
        let PlanInput {
            model_id,
            storage,
            carrier_id,
            monthly_fee,
            term_months,
            loyalty,
        } = input;

        catalog.retail_price(&model_id, &storage)?;
        catalog.carrier(&carrier_id)?;
        let monthly_fee = catalog.monthly_fee(monthly_fee)?;
        let term = catalog.contract_term(term_months)?;

        Ok(Self {
            model_id,
            storage,
            carrier_id,
            monthly_fee,
            term,
            loyalty,
        })
    }

    pub(crate) fn from_parts(
        model_id: &str,
        storage: &str,
        carrier_id: &str,
        monthly_fee: MonthlyFee,
        term: ContractTerm,
    ) -> Self {
        Self {
            model_id: model_id.to_string(),
            storage: storage.to_string(),
            carrier_id: carrier_id.to_string(),
            monthly_fee,
            term,
            loyalty: false,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn storage(&self) -> &str {
        &self.storage
    }

    pub fn carrier_id(&self) -> &str {
        &self.carrier_id
    }

    pub fn monthly_fee(&self) -> MonthlyFee {
        self.monthly_fee
    }

    pub fn term(&self) -> ContractTerm {
        self.term
    }

    pub fn loyalty(&self) -> bool {
        self.loyalty
    }

    /// Switch to another model. Storage falls back to the model's first tier,
    /// since tiers differ between models.
    pub fn with_model(
        &self,
        catalog: &ReferenceCatalog,
        model_id: &str,
    ) -> Result<Self, SelectionError> {
        let entry = catalog.model(model_id)?;
        let storage = entry
            .default_tier()
            .ok_or_else(|| SelectionError::UnknownModel(model_id.to_string()))?;

        Ok(Self {
            model_id: entry.id.to_string(),
            storage: storage.label.to_string(),
            ..self.clone()
        })
    }

    pub fn with_storage(
        &self,
        catalog: &ReferenceCatalog,
        storage: &str,
    ) -> Result<Self, SelectionError> {
        catalog.retail_price(&self.model_id, storage)?;
        Ok(Self {
            storage: storage.to_string(),
            ..self.clone()
        })
    }

    pub fn with_carrier(
        &self,
        catalog: &ReferenceCatalog,
        carrier_id: &str,
    ) -> Result<Self, SelectionError> {
        let carrier = catalog.carrier(carrier_id)?;
        Ok(Self {
            carrier_id: carrier.id.to_string(),
            ..self.clone()
        })
    }

    pub fn with_monthly_fee(
        &self,
        catalog: &ReferenceCatalog,
        amount: u32,
    ) -> Result<Self, SelectionError> {
        Ok(Self {
            monthly_fee: catalog.monthly_fee(amount)?,
            ..self.clone()
        })
    }

    pub fn with_term(
        &self,
        catalog: &ReferenceCatalog,
        months: u32,
    ) -> Result<Self, SelectionError> {
        Ok(Self {
            term: catalog.contract_term(months)?,
            ..self.clone()
        })
    }

    pub fn with_loyalty(&self, loyalty: bool) -> Self {
        Self {
            loyalty,
            ..self.clone()
        }
    }
}

/// Raised when user input falls outside the reference enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown device model '{0}'")]
    UnknownModel(String),
    #[error("model '{model_id}' has no '{storage}' storage tier")]
    UnknownStorage { model_id: String, storage: String },
    #[error("unknown carrier '{0}'")]
    UnknownCarrier(String),
    #[error("monthly fee {0} is not an offered plan")]
    UnsupportedFee(u32),
    #[error("contract term of {0} months is not offered")]
    UnsupportedTerm(u32),
}
