//! Prompt templates and fixed replies
//!
//! Every prompt the pipeline sends is built here from a closed template set,
//! so classifier/extractor behavior is reproducible given identical inputs.
//! Rendering is pure string substitution with no side effects.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::TemplateError;

// =============================
// Fixed replies (no LLM call)
// =============================

pub const GREETING_REPLY: &str =
    "Hello! I'm your real estate assistant. How can I help you find information about our properties today?";

pub const THANK_YOU_REPLY: &str =
    "You're welcome! Let me know if there's anything else I can help you with.";

pub const UNKNOWN_REPLY: &str =
    "I'm sorry, I didn't quite understand that. Could you please rephrase your question? I can help with property prices, locations, details, and nearby amenities.";

/// Returned whenever the language-model backend is degraded or unreachable.
pub const DEGRADED_REPLY: &str =
    "Sorry, I'm having trouble connecting to my brain right now. Please try again later.";

// =============================
// Template set
// =============================

/// Closed set of prompt templates. Dispatch is by enum, never by string key,
/// so a new template is a compile-time-checked addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    IntentClassification,
    PropertyExtraction,
    NearbyExtraction,
    FormatRecordReply,
    FormatNearbyReply,
    GeneralKnowledge,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        TemplateId::IntentClassification,
        TemplateId::PropertyExtraction,
        TemplateId::NearbyExtraction,
        TemplateId::FormatRecordReply,
        TemplateId::FormatNearbyReply,
        TemplateId::GeneralKnowledge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateId::IntentClassification => "intent_classification",
            TemplateId::PropertyExtraction => "property_extraction",
            TemplateId::NearbyExtraction => "nearby_extraction",
            TemplateId::FormatRecordReply => "format_record_reply",
            TemplateId::FormatNearbyReply => "format_nearby_reply",
            TemplateId::GeneralKnowledge => "general_knowledge",
        }
    }

    fn text(self) -> &'static str {
        match self {
            TemplateId::IntentClassification => INTENT_CLASSIFICATION_TEMPLATE,
            TemplateId::PropertyExtraction => PROPERTY_EXTRACTION_TEMPLATE,
            TemplateId::NearbyExtraction => NEARBY_EXTRACTION_TEMPLATE,
            TemplateId::FormatRecordReply => FORMAT_RECORD_REPLY_TEMPLATE,
            TemplateId::FormatNearbyReply => FORMAT_NEARBY_REPLY_TEMPLATE,
            TemplateId::GeneralKnowledge => GENERAL_KNOWLEDGE_TEMPLATE,
        }
    }

    /// Placeholders each template documents. `validate_templates` renders
    /// every template against exactly this set at startup.
    pub fn required_args(self) -> &'static [&'static str] {
        match self {
            TemplateId::IntentClassification
            | TemplateId::PropertyExtraction
            | TemplateId::NearbyExtraction => &["property_names", "user_query"],
            TemplateId::FormatRecordReply => &["user_query", "property_name", "record_data"],
            TemplateId::FormatNearbyReply => {
                &["user_query", "property_name", "place_type", "nearby_places"]
            }
            TemplateId::GeneralKnowledge => &["user_query"],
        }
    }
}

const INTENT_CLASSIFICATION_TEMPLATE: &str = r#"You are a real estate chatbot assistant. Classify the user's query into exactly one of the following categories:
1. PRICE_QUERY: User is asking for the price of a specific property.
2. LOCATION_QUERY: User is asking for the location of a specific property.
3. DETAILS_QUERY: User is asking for general details, description, or type of a specific property.
4. NEARBY_QUERY: User is asking about nearby places (schools, hospitals, parks, etc.) for a specific property.
5. GENERAL_QUERY: User is asking a general real estate question, an opinion, or something not covered above.
6. GREETING: User is greeting the chatbot.
7. THANK_YOU: User is thanking the chatbot.
8. UNKNOWN: User query is unclear or not related to real estate.

Available properties: {property_names}

Analyze the user's query: "{user_query}"

Respond with only the category name (e.g., PRICE_QUERY, NEARBY_QUERY, GENERAL_QUERY).
If the query mentions a property not in the list, still classify by the kind of information requested (e.g. a price question about an unlisted property is PRICE_QUERY).
If the query is about a listed property but the requested information type (price, location, details) is unclear, prefer DETAILS_QUERY."#;

const PROPERTY_EXTRACTION_TEMPLATE: &str = r#"You are a helpful assistant. Extract the primary real estate property name mentioned in the user's query.
Available properties: {property_names}
User query: "{user_query}"

If a property from the list is mentioned, respond with only the property name exactly as listed (e.g., "Lotus Villa").
If multiple properties from the list are mentioned, respond with the first one.
If no property from the list is mentioned, or the mentioned property is not in the list, respond with "Unknown"."#;

const NEARBY_EXTRACTION_TEMPLATE: &str = r#"You are a helpful assistant. From the user's query, extract:
1. The primary real estate property name mentioned.
2. The type of place the user is asking about (e.g., school, hospital, park, restaurant, shop, mall).

Available properties: {property_names}
User query: "{user_query}"

Respond in the format: "PROPERTY_NAME|PLACE_TYPE"
Example: "Pearl Heights|school"

If a property from the list is mentioned, use its exact name. If multiple are mentioned, use the first one.
If no property from the list is mentioned, or the mentioned property is not in the list, use "Unknown" for PROPERTY_NAME.
If no specific place type is mentioned, use "amenity" for PLACE_TYPE."#;

const FORMAT_RECORD_REPLY_TEMPLATE: &str = r#"You are a helpful real estate assistant.
The user asked: "{user_query}"
The database returned the following information for "{property_name}": {record_data}

Rephrase this information into a friendly, natural conversational response.
If the data contains a price, mention it. If it contains a location, mention it.
If it contains a description, include it or a short summary.
If only one detail was asked for, focus on that detail.
If the data is empty or a value is missing, politely tell the user that the detail is not available rather than leaving it out silently."#;

const FORMAT_NEARBY_REPLY_TEMPLATE: &str = r#"You are a helpful real estate assistant.
The user asked: "{user_query}"
Regarding the property "{property_name}", we found the following nearby {place_type}(s): {nearby_places}

Present this information in a friendly, natural conversational response.
If the list is empty or only contains a 'no data' style message, politely tell the user that no such places were found nearby or the information is not available.
List a few examples if many are available."#;

const GENERAL_KNOWLEDGE_TEMPLATE: &str = r#"You are a helpful and knowledgeable real estate assistant.
The user asked: "{user_query}"
Provide a concise, informative, and neutral response to this general real estate question.
If the question asks for an opinion (e.g., "Is this a good area?"), give a balanced view covering common factors such as development, connectivity, and amenities.
If the question is too broad or subjective, you may say so.
Keep the response focused on real estate."#;

// =============================
// Rendering
// =============================

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{([a-z_]+)\}").expect("valid regex");
}

/// Render the known-property list for embedding in a prompt: stable given
/// order, each name double-quoted, comma-separated.
pub fn format_property_list(names: &[String]) -> String {
    if names.is_empty() {
        return "No properties available.".to_string();
    }
    names
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Substitute every `{placeholder}` in the template from `args`.
///
/// Fails with `MissingArgument` when the template references a placeholder
/// that no argument covers; extra arguments are ignored. A single pass over
/// the template text, so braces inside argument values (user text, JSON
/// data) are never re-interpreted as placeholders.
pub fn render(template: TemplateId, args: &[(&str, &str)]) -> Result<String, TemplateError> {
    let text = template.text();
    let mut rendered = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let whole = caps.get(0).expect("capture 0 always present");
        let key = &caps[1];
        let value = args
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
            .ok_or_else(|| TemplateError::MissingArgument {
                template: template.name(),
                argument: key.to_string(),
            })?;
        rendered.push_str(&text[last..whole.start()]);
        rendered.push_str(value);
        last = whole.end();
    }
    rendered.push_str(&text[last..]);

    Ok(rendered)
}

/// Fail-fast startup check: every template renders cleanly against its
/// documented argument set.
pub fn validate_templates() -> Result<(), TemplateError> {
    for template in TemplateId::ALL {
        let args: Vec<(&str, &str)> = template
            .required_args()
            .iter()
            .map(|name| (*name, "sample"))
            .collect();
        render(template, &args)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_list_rendering() {
        let names = vec!["Lotus Villa".to_string(), "Pearl Heights".to_string()];
        assert_eq!(
            format_property_list(&names),
            r#""Lotus Villa", "Pearl Heights""#
        );
        assert_eq!(format_property_list(&[]), "No properties available.");
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let rendered = render(
            TemplateId::GeneralKnowledge,
            &[("user_query", "Is Kondapur a good place to live?")],
        )
        .unwrap();
        assert!(rendered.contains("Is Kondapur a good place to live?"));
        assert!(!rendered.contains('{'));
    }

    #[test]
    fn test_render_missing_argument() {
        let err = render(TemplateId::FormatRecordReply, &[("user_query", "q")]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingArgument {
                template: "format_record_reply",
                argument: "property_name".to_string(),
            }
        );
    }

    #[test]
    fn test_all_templates_validate() {
        assert!(validate_templates().is_ok());
    }

    #[test]
    fn test_classification_prompt_lists_all_intents() {
        let rendered = render(
            TemplateId::IntentClassification,
            &[("property_names", "\"Lotus Villa\""), ("user_query", "hi")],
        )
        .unwrap();
        for label in [
            "PRICE_QUERY",
            "LOCATION_QUERY",
            "DETAILS_QUERY",
            "NEARBY_QUERY",
            "GENERAL_QUERY",
            "GREETING",
            "THANK_YOU",
            "UNKNOWN",
        ] {
            assert!(rendered.contains(label), "missing label {}", label);
        }
    }
}
