//! Intent classifier
//!
//! Maps free-text user queries onto a closed set of intent labels via the
//! language-model gateway. The fallback to `Unknown` is total: whatever the
//! gateway returns (or fails with), the caller always receives a member of
//! the closed set.

use tracing::{debug, warn};

use crate::gemini::TextGateway;
use crate::prompts::{self, TemplateId};

/// What kind of answer a user query needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PriceQuery,
    LocationQuery,
    DetailsQuery,
    NearbyQuery,
    GeneralQuery,
    Greeting,
    ThankYou,
    Unknown,
}

impl Intent {
    /// Exact-match parse of a classification label. Anything outside the
    /// closed set is `None`; the classifier turns that into `Unknown`.
    pub fn from_label(label: &str) -> Option<Intent> {
        match label {
            "PRICE_QUERY" => Some(Intent::PriceQuery),
            "LOCATION_QUERY" => Some(Intent::LocationQuery),
            "DETAILS_QUERY" => Some(Intent::DetailsQuery),
            "NEARBY_QUERY" => Some(Intent::NearbyQuery),
            "GENERAL_QUERY" => Some(Intent::GeneralQuery),
            "GREETING" => Some(Intent::Greeting),
            "THANK_YOU" => Some(Intent::ThankYou),
            "UNKNOWN" => Some(Intent::Unknown),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Intent::PriceQuery => "PRICE_QUERY",
            Intent::LocationQuery => "LOCATION_QUERY",
            Intent::DetailsQuery => "DETAILS_QUERY",
            Intent::NearbyQuery => "NEARBY_QUERY",
            Intent::GeneralQuery => "GENERAL_QUERY",
            Intent::Greeting => "GREETING",
            Intent::ThankYou => "THANK_YOU",
            Intent::Unknown => "UNKNOWN",
        }
    }
}

/// Classify a user query against the known property list.
///
/// Never fails: gateway errors, template errors, and unrecognized labels all
/// collapse to `Intent::Unknown`.
pub async fn classify(
    gateway: &dyn TextGateway,
    user_text: &str,
    property_names: &[String],
) -> Intent {
    let prompt = match prompts::render(
        TemplateId::IntentClassification,
        &[
            ("property_names", &prompts::format_property_list(property_names)),
            ("user_query", user_text),
        ],
    ) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!("Classification prompt failed to render: {}", e);
            return Intent::Unknown;
        }
    };

    match gateway.generate(&prompt).await {
        Ok(label) => match Intent::from_label(label.trim()) {
            Some(intent) => {
                debug!("Classified '{}' as {}", user_text, intent.as_label());
                intent
            }
            None => {
                warn!(
                    "Gateway returned unexpected intent label '{}', defaulting to UNKNOWN",
                    label.trim()
                );
                Intent::Unknown
            }
        },
        Err(e) => {
            warn!("Intent classification gateway call failed: {}", e);
            Intent::Unknown
        }
    }
}
