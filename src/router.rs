//! Query router
//!
//! One-shot dispatch from classified intent to data lookup to composed
//! reply. Every branch terminates in a user-facing string: whatever the
//! extraction or lookup outcome, `handle_query` is total and never fails.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::classifier::{self, Intent};
use crate::composer;
use crate::extractor;
use crate::gemini::TextGateway;
use crate::prompts::{DEGRADED_REPLY, GREETING_REPLY, THANK_YOU_REPLY, UNKNOWN_REPLY};
use crate::store::{PlacesLookup, PropertyStore};

/// Asked when a catalog question names no resolvable property.
pub const CLARIFY_PROPERTY_REPLY: &str =
    "I couldn't identify a specific property in your question. Please mention one of our available properties.";

/// Asked when a nearby question names no resolvable property.
pub const CLARIFY_NEARBY_REPLY: &str =
    "Please specify which property you're asking about for nearby places.";

/// The query-understanding pipeline, front to back.
///
/// Holds its collaborators by handle: the gateway and the stores are
/// constructed once at process start and shared read-only across turns, so
/// concurrent turns need no locking.
pub struct RealEstateAgent {
    gateway: Arc<dyn TextGateway>,
    store: Arc<dyn PropertyStore>,
    places: Arc<dyn PlacesLookup>,
}

impl RealEstateAgent {
    pub fn new(
        gateway: Arc<dyn TextGateway>,
        store: Arc<dyn PropertyStore>,
        places: Arc<dyn PlacesLookup>,
    ) -> Self {
        Self {
            gateway,
            store,
            places,
        }
    }

    /// Whether the gateway credential warm-up has completed.
    pub fn gateway_ready(&self) -> bool {
        self.gateway.is_ready()
    }

    /// Answer one user query. Each turn is classified independently; there
    /// is no cross-turn state.
    pub async fn handle_query(&self, user_text: &str) -> String {
        if !self.gateway.is_ready() {
            // Missing credential or failed warm-up degrades every reply to
            // the fixed service message; the host process never crashes.
            return DEGRADED_REPLY.to_string();
        }

        let property_names = self.store.all_names();
        let intent = classifier::classify(self.gateway.as_ref(), user_text, &property_names).await;
        info!("Query: '{}', intent: {}", user_text, intent.as_label());

        match intent {
            Intent::Greeting => GREETING_REPLY.to_string(),
            Intent::ThankYou => THANK_YOU_REPLY.to_string(),

            Intent::PriceQuery | Intent::LocationQuery | Intent::DetailsQuery => {
                self.handle_catalog_query(intent, user_text, &property_names)
                    .await
            }

            Intent::NearbyQuery => self.handle_nearby_query(user_text, &property_names).await,

            Intent::GeneralQuery => {
                composer::compose_general_reply(self.gateway.as_ref(), user_text).await
            }

            Intent::Unknown => UNKNOWN_REPLY.to_string(),
        }
    }

    async fn handle_catalog_query(
        &self,
        intent: Intent,
        user_text: &str,
        property_names: &[String],
    ) -> String {
        let Some(property_name) =
            extractor::extract_property(self.gateway.as_ref(), user_text, property_names).await
        else {
            return CLARIFY_PROPERTY_REPLY.to_string();
        };

        let Some(record) = self.store.by_name(&property_name) else {
            return format!("Sorry, I don't have information about '{}'.", property_name);
        };

        // Narrow the record to the asked-for detail before formatting.
        let record_data: Value = match intent {
            Intent::PriceQuery => json!({ "price": record.price }),
            Intent::LocationQuery => json!({ "location": record.location }),
            _ => json!({
                "price": record.price,
                "location": record.location,
                "description": record.description,
                "type": record.property_type,
            }),
        };

        composer::compose_record_reply(
            self.gateway.as_ref(),
            user_text,
            &property_name,
            &record_data,
        )
        .await
    }

    async fn handle_nearby_query(&self, user_text: &str, property_names: &[String]) -> String {
        let (property, place_type) =
            extractor::extract_nearby(self.gateway.as_ref(), user_text, property_names).await;

        let Some(property_name) = property else {
            return CLARIFY_NEARBY_REPLY.to_string();
        };

        let Some(coords) = self.store.location(&property_name) else {
            return format!(
                "Sorry, I couldn't find location details for '{}' to search for nearby {}.",
                property_name, place_type
            );
        };

        let nearby_places = self
            .places
            .nearby(coords.latitude, coords.longitude, &place_type);
        info!(
            "Found {} nearby {} result(s) for {}",
            nearby_places.len(),
            place_type,
            property_name
        );

        composer::compose_nearby_reply(
            self.gateway.as_ref(),
            user_text,
            &property_name,
            &place_type,
            &nearby_places,
        )
        .await
    }
}
