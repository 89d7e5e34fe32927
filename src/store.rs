//! External collaborators: property catalog and places lookup
//!
//! The pipeline only ever sees these narrow traits; the bundled mock
//! implementations carry the seeded demo listings so the CLI, the API
//! server, and the tests all run without external services.

use serde::{Deserialize, Serialize};

/// A property's coordinates, for nearby-place searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One catalog entry. `coordinates` is optional: a listing without them can
/// still answer price/location/details questions but not nearby searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub price: String,
    pub location: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub coordinates: Option<Coordinates>,
}

/// Read-only property catalog.
pub trait PropertyStore: Send + Sync {
    /// All known property names, in a stable order.
    fn all_names(&self) -> Vec<String>;

    /// Full record for an exact property name.
    fn by_name(&self, name: &str) -> Option<PropertyRecord>;

    /// Coordinates for an exact property name, if the listing has them.
    fn location(&self, name: &str) -> Option<Coordinates>;
}

/// Nearby-places search. Never errors: an empty or sentinel-bearing list
/// means nothing was found.
pub trait PlacesLookup: Send + Sync {
    fn nearby(&self, latitude: f64, longitude: f64, place_type: &str) -> Vec<String>;
}

// =============================
// Mock property catalog
// =============================

/// In-memory catalog seeded with the demo listings.
pub struct MockPropertyStore {
    entries: Vec<(String, PropertyRecord)>,
}

impl MockPropertyStore {
    pub fn new() -> Self {
        let entries = vec![
            (
                "Lotus Villa".to_string(),
                PropertyRecord {
                    price: "₹75 Lakhs".to_string(),
                    location: "Kondapur, Hyderabad".to_string(),
                    description: "A beautiful villa with modern amenities and a serene environment."
                        .to_string(),
                    property_type: "villa".to_string(),
                    coordinates: Some(Coordinates {
                        latitude: 17.4748,
                        longitude: 78.3918,
                    }),
                },
            ),
            (
                "Green Valley Apartments".to_string(),
                PropertyRecord {
                    price: "₹55 Lakhs".to_string(),
                    location: "Miyapur, Hyderabad".to_string(),
                    description: "Spacious apartments with great connectivity and nearby parks."
                        .to_string(),
                    property_type: "apartment".to_string(),
                    coordinates: Some(Coordinates {
                        latitude: 17.5079,
                        longitude: 78.3920,
                    }),
                },
            ),
            (
                "Pearl Heights".to_string(),
                PropertyRecord {
                    price: "₹1.2 Crores".to_string(),
                    location: "Gachibowli, Hyderabad".to_string(),
                    description:
                        "Luxury apartments in the heart of the IT corridor, offering premium facilities."
                            .to_string(),
                    property_type: "apartment".to_string(),
                    coordinates: Some(Coordinates {
                        latitude: 17.4401,
                        longitude: 78.3489,
                    }),
                },
            ),
            (
                "Sunset Bungalow".to_string(),
                PropertyRecord {
                    price: "₹90 Lakhs".to_string(),
                    location: "Jubilee Hills, Hyderabad".to_string(),
                    description:
                        "An independent bungalow with a private garden and classic architecture."
                            .to_string(),
                    property_type: "bungalow".to_string(),
                    coordinates: Some(Coordinates {
                        latitude: 17.4315,
                        longitude: 78.3999,
                    }),
                },
            ),
        ];

        Self { entries }
    }
}

impl Default for MockPropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyStore for MockPropertyStore {
    fn all_names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn by_name(&self, name: &str) -> Option<PropertyRecord> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, record)| record.clone())
    }

    fn location(&self, name: &str) -> Option<Coordinates> {
        self.by_name(name).and_then(|record| record.coordinates)
    }
}

// =============================
// Mock places lookup
// =============================

/// Coordinate-keyed mock nearby data, standing in for a places API.
pub struct MockPlacesLookup {
    data: Vec<((f64, f64), Vec<(&'static str, Vec<&'static str>)>)>,
}

impl MockPlacesLookup {
    pub fn new() -> Self {
        let data = vec![
            (
                // Lotus Villa
                (17.4748, 78.3918),
                vec![
                    (
                        "school",
                        vec![
                            "Oakridge International School (Kondapur)",
                            "Chirec International School (Kondapur Branch)",
                        ],
                    ),
                    (
                        "hospital",
                        vec!["Apollo Spectra Hospitals (Kondapur)", "KIMS Hospitals (Kondapur)"],
                    ),
                    ("park", vec!["Botanical Garden", "Kondapur Park"]),
                ],
            ),
            (
                // Green Valley Apartments
                (17.5079, 78.3920),
                vec![
                    (
                        "school",
                        vec![
                            "Delhi Public School (Miyapur)",
                            "Vikas The Concept School (Miyapur)",
                        ],
                    ),
                    (
                        "hospital",
                        vec!["Srikara Hospitals (Miyapur)", "Healix Hospital"],
                    ),
                    ("park", vec!["Miyapur Park", "Nehru Zoological Park"]),
                ],
            ),
            (
                // Pearl Heights
                (17.4401, 78.3489),
                vec![
                    (
                        "school",
                        vec![
                            "Phoenix Greens International School (Gachibowli)",
                            "Indus International School (Hyderabad)",
                        ],
                    ),
                    (
                        "hospital",
                        vec!["Continental Hospitals (Gachibowli)", "AIG Hospitals"],
                    ),
                    ("park", vec!["Gachibowli Park", "Bio Diversity Park"]),
                ],
            ),
            (
                // Sunset Bungalow
                (17.4315, 78.3999),
                vec![
                    (
                        "school",
                        vec![
                            "Jubilee Hills Public School",
                            "Bhartiya Vidya Bhavan's Public School",
                        ],
                    ),
                    (
                        "hospital",
                        vec![
                            "Apollo Hospitals (Jubilee Hills)",
                            "Basavatarakam Indo American Cancer Hospital",
                        ],
                    ),
                    ("park", vec!["KBR National Park", "Lotus Pond"]),
                ],
            ),
        ];

        Self { data }
    }
}

impl Default for MockPlacesLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacesLookup for MockPlacesLookup {
    fn nearby(&self, latitude: f64, longitude: f64, place_type: &str) -> Vec<String> {
        let wanted = place_type.to_lowercase();

        if let Some((_, categories)) = self
            .data
            .iter()
            .find(|((lat, lon), _)| *lat == latitude && *lon == longitude)
        {
            return categories
                .iter()
                .find(|(category, _)| *category == wanted)
                .map(|(_, places)| places.iter().map(|p| p.to_string()).collect())
                .unwrap_or_default();
        }

        // Unknown coordinates still get a plausible mock answer.
        match wanted.as_str() {
            "school" => vec!["Generic School".to_string(), "Another Local School".to_string()],
            "hospital" => vec!["General Hospital".to_string(), "Community Clinic".to_string()],
            "park" => vec!["Local Park".to_string()],
            _ => vec![format!(
                "No data for {} near the given coordinates.",
                wanted
            )],
        }
    }
}
