//! Response composer
//!
//! Turns retrieved structured data (or its absence) into the final
//! natural-language reply via the gateway. Gateway failure here never
//! surfaces as an error: the caller always gets a user-safe string.

use serde_json::Value;
use tracing::{error, warn};

use crate::gemini::TextGateway;
use crate::prompts::{self, TemplateId, DEGRADED_REPLY};

async fn compose(gateway: &dyn TextGateway, template: TemplateId, args: &[(&str, &str)]) -> String {
    let prompt = match prompts::render(template, args) {
        Ok(prompt) => prompt,
        Err(e) => {
            // Should be unreachable after startup template validation.
            error!("Response template failed to render: {}", e);
            return DEGRADED_REPLY.to_string();
        }
    };

    match gateway.generate(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Response composition gateway call failed: {}", e);
            DEGRADED_REPLY.to_string()
        }
    }
}

/// Phrase a (possibly narrowed) property record as a conversational answer.
pub async fn compose_record_reply(
    gateway: &dyn TextGateway,
    user_text: &str,
    property_name: &str,
    record_data: &Value,
) -> String {
    compose(
        gateway,
        TemplateId::FormatRecordReply,
        &[
            ("user_query", user_text),
            ("property_name", property_name),
            ("record_data", &record_data.to_string()),
        ],
    )
    .await
}

/// Phrase a nearby-places result list as a conversational answer.
pub async fn compose_nearby_reply(
    gateway: &dyn TextGateway,
    user_text: &str,
    property_name: &str,
    place_type: &str,
    nearby_places: &[String],
) -> String {
    compose(
        gateway,
        TemplateId::FormatNearbyReply,
        &[
            ("user_query", user_text),
            ("property_name", property_name),
            ("place_type", place_type),
            ("nearby_places", &format!("{:?}", nearby_places)),
        ],
    )
    .await
}

/// Answer a general real-estate question from the raw user text alone.
pub async fn compose_general_reply(gateway: &dyn TextGateway, user_text: &str) -> String {
    compose(
        gateway,
        TemplateId::GeneralKnowledge,
        &[("user_query", user_text)],
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{EchoGateway, FailingGateway};
    use serde_json::json;

    #[tokio::test]
    async fn test_record_reply_carries_data() {
        let gateway = EchoGateway;
        let reply = compose_record_reply(
            &gateway,
            "Where is Lotus Villa?",
            "Lotus Villa",
            &json!({"location": "Kondapur, Hyderabad"}),
        )
        .await;
        assert!(reply.contains("Kondapur"));
        assert!(reply.contains("Lotus Villa"));
    }

    #[tokio::test]
    async fn test_nearby_reply_carries_places() {
        let gateway = EchoGateway;
        let reply = compose_nearby_reply(
            &gateway,
            "What schools are near Pearl Heights?",
            "Pearl Heights",
            "school",
            &["Phoenix Greens International School".to_string()],
        )
        .await;
        assert!(reply.contains("Phoenix Greens"));
        assert!(reply.contains("school"));
    }

    #[tokio::test]
    async fn test_empty_places_still_compose() {
        let gateway = EchoGateway;
        let reply = compose_nearby_reply(&gateway, "schools?", "Lotus Villa", "school", &[]).await;
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_yields_degraded_reply() {
        let gateway = FailingGateway;
        let reply = compose_general_reply(&gateway, "Is Kondapur a good place to live?").await;
        assert_eq!(reply, DEGRADED_REPLY);
    }
}
