//! Entity extraction
//!
//! Pulls a property name (and, for proximity questions, a place type) out of
//! free text. The language model is the primary path; a deterministic
//! whole-word scan over the known property list is the fallback, so
//! extraction always terminates in a valid shape even when the backend is
//! degraded or absent.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::gemini::TextGateway;
use crate::prompts::{self, TemplateId};

/// Sentinel the extraction prompts use for "no known property mentioned".
const UNKNOWN_SENTINEL: &str = "Unknown";

/// Place type used when the query does not name one.
pub const DEFAULT_PLACE_TYPE: &str = "amenity";

lazy_static! {
    static ref PLACE_KEYWORD_RE: Regex = Regex::new(
        r"(?i)\b(schools?|hospitals?|parks?|restaurants?|shops?|stores?|malls?|amenit(?:y|ies)|facilit(?:y|ies))\b"
    )
    .expect("valid regex");
}

/// Case-insensitive whole-word scan over the known names, in their given
/// order. First match wins, even when a later name would be a longer match;
/// that precedence is deliberate and covered by tests.
fn scan_known_names(user_text: &str, property_names: &[String]) -> Option<String> {
    for name in property_names {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(name));
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if re.is_match(user_text) {
            return Some(name.clone());
        }
    }
    None
}

/// Reduce a matched place keyword to its singular lowercase form, so both
/// extraction paths report the same place type for the same query.
fn normalize_place_keyword(keyword: &str) -> String {
    let lowered = keyword.to_lowercase();
    if let Some(stem) = lowered.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    lowered.strip_suffix('s').map(str::to_string).unwrap_or(lowered)
}

fn scan_place_type(user_text: &str) -> String {
    PLACE_KEYWORD_RE
        .captures(user_text)
        .map(|caps| normalize_place_keyword(&caps[1]))
        .unwrap_or_else(|| DEFAULT_PLACE_TYPE.to_string())
}

/// Resolve the property a query refers to.
///
/// Returns `Some(name)` only when `name` is an exact member of
/// `property_names`; gateway output is re-checked against the list rather
/// than trusted.
pub async fn extract_property(
    gateway: &dyn TextGateway,
    user_text: &str,
    property_names: &[String],
) -> Option<String> {
    let prompt = prompts::render(
        TemplateId::PropertyExtraction,
        &[
            ("property_names", &prompts::format_property_list(property_names)),
            ("user_query", user_text),
        ],
    );

    if let Ok(prompt) = prompt {
        match gateway.generate(&prompt).await {
            Ok(entity) => {
                let entity = entity.trim();
                if !entity.is_empty() && entity != UNKNOWN_SENTINEL {
                    if let Some(name) = property_names.iter().find(|name| *name == entity) {
                        return Some(name.clone());
                    }
                    warn!(
                        "Gateway extracted '{}' which is not a known property, using fallback",
                        entity
                    );
                }
            }
            Err(e) => warn!("Property extraction gateway call failed: {}", e),
        }
    }

    scan_known_names(user_text, property_names)
}

/// Resolve (property, place type) for a nearby-places query.
///
/// The gateway answers in `"PROPERTY|PLACE_TYPE"` form; each side falls back
/// independently, and a failed call falls back wholly to the deterministic
/// scans. The place type is never empty.
pub async fn extract_nearby(
    gateway: &dyn TextGateway,
    user_text: &str,
    property_names: &[String],
) -> (Option<String>, String) {
    let prompt = prompts::render(
        TemplateId::NearbyExtraction,
        &[
            ("property_names", &prompts::format_property_list(property_names)),
            ("user_query", user_text),
        ],
    );

    if let Ok(prompt) = prompt {
        match gateway.generate(&prompt).await {
            Ok(response) if response.contains('|') => {
                let (property_side, place_side) =
                    response.split_once('|').unwrap_or((UNKNOWN_SENTINEL, ""));

                let property_side = property_side.trim();
                let property = if property_side.is_empty() || property_side == UNKNOWN_SENTINEL {
                    scan_known_names(user_text, property_names)
                } else {
                    property_names
                        .iter()
                        .find(|name| *name == property_side)
                        .cloned()
                        .or_else(|| scan_known_names(user_text, property_names))
                };

                let place_side = place_side.trim();
                let place_type = if place_side.is_empty() {
                    DEFAULT_PLACE_TYPE.to_string()
                } else {
                    place_side.to_string()
                };

                debug!(
                    "Nearby extraction resolved property={:?} place_type={}",
                    property, place_type
                );
                return (property, place_type);
            }
            Ok(response) => {
                warn!(
                    "Nearby extraction returned unparseable '{}', using fallback",
                    response.trim()
                );
            }
            Err(e) => warn!("Nearby extraction gateway call failed: {}", e),
        }
    }

    (
        scan_known_names(user_text, property_names),
        scan_place_type(user_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FailingGateway, StaticGateway};

    fn names() -> Vec<String> {
        vec!["Lotus Villa".to_string(), "Pearl Heights".to_string()]
    }

    #[tokio::test]
    async fn test_extract_property_llm_path() {
        let gateway = StaticGateway::new("Lotus Villa");
        let result =
            extract_property(&gateway, "What's the price of Lotus Villa?", &names()).await;
        assert_eq!(result, Some("Lotus Villa".to_string()));
    }

    #[tokio::test]
    async fn test_extract_property_fallback_path() {
        let gateway = FailingGateway;
        let result =
            extract_property(&gateway, "What's the price of Lotus Villa?", &names()).await;
        assert_eq!(result, Some("Lotus Villa".to_string()));
    }

    #[tokio::test]
    async fn test_extract_property_unknown_sentinel_uses_fallback() {
        let gateway = StaticGateway::new("Unknown");
        let result = extract_property(&gateway, "price of pearl heights please", &names()).await;
        assert_eq!(result, Some("Pearl Heights".to_string()));
    }

    #[tokio::test]
    async fn test_extract_property_rejects_unlisted_name() {
        // Gateway hallucinates a name outside the list; nothing in the text
        // matches either, so the result is None.
        let gateway = StaticGateway::new("Emerald Towers");
        let result = extract_property(&gateway, "tell me about it", &names()).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_extract_property_no_match_anywhere() {
        let gateway = FailingGateway;
        let result = extract_property(&gateway, "what about Unknown Place?", &names()).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_fallback_requires_whole_words() {
        let gateway = FailingGateway;
        // "Villas" should not match "Lotus Villa" mid-word, but the full
        // phrase should, case-insensitively.
        let result = extract_property(&gateway, "any lotus villa updates?", &names()).await;
        assert_eq!(result, Some("Lotus Villa".to_string()));
    }

    #[tokio::test]
    async fn fallback_prefers_first_listed() {
        let gateway = FailingGateway;
        let names = vec!["Pearl".to_string(), "Pearl Heights".to_string()];
        let result = extract_property(&gateway, "tell me about Pearl Heights", &names).await;
        // First match in list order wins even though the later name is the
        // longer match.
        assert_eq!(result, Some("Pearl".to_string()));
    }

    #[tokio::test]
    async fn test_extract_nearby_llm_path() {
        let gateway = StaticGateway::new("Pearl Heights|school");
        let (property, place_type) =
            extract_nearby(&gateway, "What schools are near Pearl Heights?", &names()).await;
        assert_eq!(property, Some("Pearl Heights".to_string()));
        assert_eq!(place_type, "school");
    }

    #[tokio::test]
    async fn test_extract_nearby_fallback_path() {
        let gateway = FailingGateway;
        let (property, place_type) =
            extract_nearby(&gateway, "What schools are near Pearl Heights?", &names()).await;
        assert_eq!(property, Some("Pearl Heights".to_string()));
        assert_eq!(place_type, "school");
    }

    #[tokio::test]
    async fn test_extract_nearby_unknown_property_with_place() {
        let gateway = StaticGateway::new("Unknown|hospital");
        let (property, place_type) =
            extract_nearby(&gateway, "hospitals near Lotus Villa?", &names()).await;
        assert_eq!(property, Some("Lotus Villa".to_string()));
        assert_eq!(place_type, "hospital");
    }

    #[tokio::test]
    async fn test_extract_nearby_empty_place_defaults_to_amenity() {
        let gateway = StaticGateway::new("Pearl Heights|");
        let (property, place_type) =
            extract_nearby(&gateway, "what's around Pearl Heights?", &names()).await;
        assert_eq!(property, Some("Pearl Heights".to_string()));
        assert_eq!(place_type, "amenity");
    }

    #[tokio::test]
    async fn test_extract_nearby_unparseable_reply_uses_fallback() {
        let gateway = StaticGateway::new("I could not determine that");
        let (property, place_type) =
            extract_nearby(&gateway, "parks near Lotus Villa", &names()).await;
        assert_eq!(property, Some("Lotus Villa".to_string()));
        assert_eq!(place_type, "park");
    }

    #[tokio::test]
    async fn test_extract_nearby_no_keyword_defaults_to_amenity() {
        let gateway = FailingGateway;
        let (property, place_type) =
            extract_nearby(&gateway, "what is close to Lotus Villa?", &names()).await;
        assert_eq!(property, Some("Lotus Villa".to_string()));
        assert_eq!(place_type, "amenity");
    }

    #[test]
    fn test_place_keyword_normalization() {
        assert_eq!(normalize_place_keyword("Schools"), "school");
        assert_eq!(normalize_place_keyword("amenities"), "amenity");
        assert_eq!(normalize_place_keyword("facilities"), "facility");
        assert_eq!(normalize_place_keyword("mall"), "mall");
        assert_eq!(normalize_place_keyword("shops"), "shop");
    }
}
