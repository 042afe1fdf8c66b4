//! Natural-language plan advisories from an external text generator.
//!
//! The pricing engine never waits on this module: a request is built from an
//! already computed quote, and generator failures degrade to fixed fallback
//! messages instead of errors.

pub mod gateway;
pub mod prompt;
pub mod router;
pub mod service;
pub mod store;

pub use gateway::{AdvisoryError, AdvisoryGateway, GeminiClient};
pub use prompt::AdvisoryRequest;
pub use router::{advisory_router, AdvisoryPayload};
pub use service::{
    AdvisoryService, AdvisoryServiceError, EMPTY_RESPONSE_FALLBACK, UNAVAILABLE_FALLBACK,
};
pub use store::{
    AdvisoryId, AdvisoryOutcome, AdvisoryRecord, AdvisoryStatusView, AdvisoryStore,
    AdvisoryStoreError,
};
