use serde::Serialize;

use super::domain::{ContractTerm, MonthlyFee, PlanSelection, SelectionError};

/// One storage option for a device and its recommended retail price in NT$.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorageTier {
    pub label: &'static str,
    pub retail_price: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceCatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub tiers: &'static [StorageTier],
}

impl DeviceCatalogEntry {
    pub fn tier(&self, label: &str) -> Option<&StorageTier> {
        self.tiers.iter().find(|tier| tier.label == label)
    }

    pub fn default_tier(&self) -> Option<&StorageTier> {
        self.tiers.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Carrier {
    pub id: &'static str,
    pub name: &'static str,
    pub brand_color: &'static str,
}

/// Fixed reference data the pricing engine's callers validate input against.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceCatalog {
    pub models: &'static [DeviceCatalogEntry],
    pub carriers: &'static [Carrier],
    pub monthly_fees: &'static [u32],
    pub contract_terms: &'static [u32],
}

pub const DEFAULT_MONTHLY_FEE: u32 = 1399;
pub const DEFAULT_TERM_MONTHS: u32 = 36;

const fn tier(label: &'static str, retail_price: u32) -> StorageTier {
    StorageTier {
        label,
        retail_price,
    }
}

static STANDARD_MODELS: [DeviceCatalogEntry; 7] = [
    DeviceCatalogEntry {
        id: "iphone16pro",
        name: "iPhone 16 Pro",
        tiers: &[
            tier("128GB", 36900),
            tier("256GB", 40400),
            tier("512GB", 47400),
            tier("1TB", 54400),
        ],
    },
    DeviceCatalogEntry {
        id: "iphone16promax",
        name: "iPhone 16 Pro Max",
        tiers: &[
            tier("256GB", 44900),
            tier("512GB", 51900),
            tier("1TB", 58900),
        ],
    },
    DeviceCatalogEntry {
        id: "iphone16",
        name: "iPhone 16",
        tiers: &[
            tier("128GB", 29900),
            tier("256GB", 33400),
            tier("512GB", 40400),
        ],
    },
    DeviceCatalogEntry {
        id: "iphone16plus",
        name: "iPhone 16 Plus",
        tiers: &[
            tier("128GB", 32900),
            tier("256GB", 36400),
            tier("512GB", 43400),
        ],
    },
    DeviceCatalogEntry {
        id: "iphone15",
        name: "iPhone 15",
        tiers: &[
            tier("128GB", 24900),
            tier("256GB", 28400),
            tier("512GB", 35400),
        ],
    },
    DeviceCatalogEntry {
        id: "iphone15plus",
        name: "iPhone 15 Plus",
        tiers: &[
            tier("128GB", 27900),
            tier("256GB", 31400),
            tier("512GB", 38400),
        ],
    },
    DeviceCatalogEntry {
        id: "iphonese3",
        name: "iPhone SE (第 3 代)",
        tiers: &[
            tier("64GB", 14900),
            tier("128GB", 16500),
            tier("256GB", 20000),
        ],
    },
];

static STANDARD_CARRIERS: [Carrier; 3] = [
    Carrier {
        id: "CHT",
        name: "中華電信",
        brand_color: "#0067b8",
    },
    Carrier {
        id: "TWM",
        name: "台灣大哥大",
        brand_color: "#ff6600",
    },
    Carrier {
        id: "FET",
        name: "遠傳電信",
        brand_color: "#e60012",
    },
];

static STANDARD_CATALOG: ReferenceCatalog = ReferenceCatalog {
    models: &STANDARD_MODELS,
    carriers: &STANDARD_CARRIERS,
    monthly_fees: &[599, 799, 999, 1199, 1399, 1599, 1799, 2699],
    contract_terms: &[24, 30, 36, 48],
};

impl ReferenceCatalog {
    /// Taiwan market catalog: current iPhone line-up and the three major carriers.
    pub fn standard() -> &'static ReferenceCatalog {
        &STANDARD_CATALOG
    }

    pub fn model(&self, model_id: &str) -> Result<&DeviceCatalogEntry, SelectionError> {
        self.models
            .iter()
            .find(|entry| entry.id == model_id)
            .ok_or_else(|| SelectionError::UnknownModel(model_id.to_string()))
    }

    pub fn carrier(&self, carrier_id: &str) -> Result<&Carrier, SelectionError> {
        self.carriers
            .iter()
            .find(|carrier| carrier.id == carrier_id)
            .ok_or_else(|| SelectionError::UnknownCarrier(carrier_id.to_string()))
    }

    pub fn retail_price(&self, model_id: &str, storage: &str) -> Result<u32, SelectionError> {
        let entry = self.model(model_id)?;
        entry
            .tier(storage)
            .map(|tier| tier.retail_price)
            .ok_or_else(|| SelectionError::UnknownStorage {
                model_id: model_id.to_string(),
                storage: storage.to_string(),
            })
    }

    pub fn monthly_fee(&self, amount: u32) -> Result<MonthlyFee, SelectionError> {
        if !self.monthly_fees.contains(&amount) {
            return Err(SelectionError::UnsupportedFee(amount));
        }
        MonthlyFee::new(amount).ok_or(SelectionError::UnsupportedFee(amount))
    }

    pub fn contract_term(&self, months: u32) -> Result<ContractTerm, SelectionError> {
        if !self.contract_terms.contains(&months) {
            return Err(SelectionError::UnsupportedTerm(months));
        }
        ContractTerm::new(months).ok_or(SelectionError::UnsupportedTerm(months))
    }

    /// Starting configuration: first model and tier, first carrier, and the
    /// 1399 / 36 month plan when offered. `None` for an empty catalog.
    pub fn default_selection(&self) -> Option<PlanSelection> {
        let model = self.models.first()?;
        let tier = model.default_tier()?;
        let carrier = self.carriers.first()?;

        let fee = self
            .monthly_fee(DEFAULT_MONTHLY_FEE)
            .ok()
            .or_else(|| self.monthly_fees.first().copied().and_then(MonthlyFee::new))?;
        let term = self
            .contract_term(DEFAULT_TERM_MONTHS)
            .ok()
            .or_else(|| {
                self.contract_terms
                    .first()
                    .copied()
                    .and_then(ContractTerm::new)
            })?;

        Some(PlanSelection::from_parts(
            model.id, tier.label, carrier.id, fee, term,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_prices_every_tier() {
        let catalog = ReferenceCatalog::standard();
        assert_eq!(catalog.models.len(), 7);
        assert!(catalog
            .models
            .iter()
            .all(|entry| !entry.tiers.is_empty() && entry.tiers.iter().all(|t| t.retail_price > 0)));
        assert_eq!(catalog.retail_price("iphone16pro", "128GB"), Ok(36900));
        assert_eq!(catalog.retail_price("iphonese3", "64GB"), Ok(14900));
    }

    #[test]
    fn rejects_values_outside_enumerations() {
        let catalog = ReferenceCatalog::standard();
        assert_eq!(
            catalog.model("pixel9").unwrap_err(),
            SelectionError::UnknownModel("pixel9".to_string())
        );
        assert!(matches!(
            catalog.retail_price("iphone16promax", "128GB"),
            Err(SelectionError::UnknownStorage { .. })
        ));
        assert_eq!(
            catalog.carrier("APT").unwrap_err(),
            SelectionError::UnknownCarrier("APT".to_string())
        );
        assert_eq!(
            catalog.monthly_fee(1000).unwrap_err(),
            SelectionError::UnsupportedFee(1000)
        );
        assert_eq!(
            catalog.contract_term(0).unwrap_err(),
            SelectionError::UnsupportedTerm(0)
        );
        assert_eq!(
            catalog.contract_term(12).unwrap_err(),
            SelectionError::UnsupportedTerm(12)
        );
    }

    #[test]
    fn default_selection_matches_first_entries() {
        let selection = ReferenceCatalog::standard()
            .default_selection()
            .expect("standard catalog has a default");
        assert_eq!(selection.model_id(), "iphone16pro");
        assert_eq!(selection.storage(), "128GB");
        assert_eq!(selection.carrier_id(), "CHT");
        assert_eq!(selection.monthly_fee().get(), 1399);
        assert_eq!(selection.term().months(), 36);
        assert!(!selection.loyalty());
    }
}
