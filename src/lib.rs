//! Real-Estate Query Agent
//!
//! Routes free-text questions about real-estate listings to the right data
//! source and renders a natural-language answer:
//! - Classifies user intent into a closed label set
//! - Extracts entities (property name, place type) with deterministic fallbacks
//! - Dispatches to the property catalog or places lookup
//! - Composes the final reply via the language-model gateway
//!
//! PIPELINE:
//! TEXT IN → CLASSIFY → EXTRACT → LOOKUP → COMPOSE → TEXT OUT

pub mod api;
pub mod classifier;
pub mod composer;
pub mod error;
pub mod extractor;
pub mod gemini;
pub mod prompts;
pub mod router;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{GatewayError, Result, TemplateError};

// Re-export common types
pub use classifier::Intent;
pub use gemini::{GeminiClient, TextGateway};
pub use router::RealEstateAgent;
pub use store::{MockPlacesLookup, MockPropertyStore, PlacesLookup, PropertyRecord, PropertyStore};
