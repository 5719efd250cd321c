//! Static descriptors for every listing type the marketplace serves.
//!
//! One profile describes one store: its stable source name, backing
//! collection, identifier prefix, and the policies the generic adapter
//! applies. The builtin table enumerates intent x category x sub-type;
//! nothing else in the crate is written per listing type.

use serde::{Deserialize, Serialize};

/// What the owner wants to do with the property.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Sell,
    Rent,
    Lease,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::Sell, Intent::Rent, Intent::Lease];

    /// Two-letter code used in identifier prefixes.
    fn prefix_code(&self) -> &'static str {
        match self {
            Intent::Sell => "SE",
            Intent::Rent => "RE",
            Intent::Lease => "LE",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Sell => write!(f, "sell"),
            Intent::Rent => write!(f, "rent"),
            Intent::Lease => write!(f, "lease"),
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "sell" => Ok(Intent::Sell),
            "rent" => Ok(Intent::Rent),
            "lease" => Ok(Intent::Lease),
            _ => Err(anyhow::anyhow!("Invalid intent: {}", s)),
        }
    }
}

/// Broad market segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Commercial,
    Residential,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Commercial, Category::Residential];

    /// Three-letter code used in identifier prefixes.
    fn prefix_code(&self) -> &'static str {
        match self {
            Category::Commercial => "COM",
            Category::Residential => "RES",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Commercial => write!(f, "commercial"),
            Category::Residential => write!(f, "residential"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "commercial" => Ok(Category::Commercial),
            "residential" => Ok(Category::Residential),
            _ => Err(anyhow::anyhow!("Invalid category: {}", s)),
        }
    }
}

/// Concrete property sub-type within a category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SubType {
    // Commercial
    OfficeSpace,
    Shop,
    Showroom,
    Warehouse,
    IndustrialBuilding,
    // Residential
    Apartment,
    Villa,
    IndependentHouse,
    Plot,
    Farmhouse,
}

impl SubType {
    pub fn of_category(category: Category) -> &'static [SubType] {
        match category {
            Category::Commercial => &[
                SubType::OfficeSpace,
                SubType::Shop,
                SubType::Showroom,
                SubType::Warehouse,
                SubType::IndustrialBuilding,
            ],
            Category::Residential => &[
                SubType::Apartment,
                SubType::Villa,
                SubType::IndependentHouse,
                SubType::Plot,
                SubType::Farmhouse,
            ],
        }
    }

    /// Two-letter code used in identifier prefixes.
    fn prefix_code(&self) -> &'static str {
        match self {
            SubType::OfficeSpace => "OS",
            SubType::Shop => "SH",
            SubType::Showroom => "SR",
            SubType::Warehouse => "WH",
            SubType::IndustrialBuilding => "IB",
            SubType::Apartment => "AP",
            SubType::Villa => "VI",
            SubType::IndependentHouse => "IH",
            SubType::Plot => "PL",
            SubType::Farmhouse => "FH",
        }
    }
}

impl std::fmt::Display for SubType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubType::OfficeSpace => write!(f, "office-space"),
            SubType::Shop => write!(f, "shop"),
            SubType::Showroom => write!(f, "showroom"),
            SubType::Warehouse => write!(f, "warehouse"),
            SubType::IndustrialBuilding => write!(f, "industrial-building"),
            SubType::Apartment => write!(f, "apartment"),
            SubType::Villa => write!(f, "villa"),
            SubType::IndependentHouse => write!(f, "independent-house"),
            SubType::Plot => write!(f, "plot"),
            SubType::Farmhouse => write!(f, "farmhouse"),
        }
    }
}

/// Descriptor of one listing-type store.
#[derive(Debug, Clone)]
pub struct ListingProfile {
    pub intent: Intent,
    pub category: Category,
    pub subtype: SubType,

    /// Stable identifier: URL segment, normalization dispatch key, and the
    /// key under which per-source federation errors are reported.
    pub source_name: String,

    /// Backing collection in the document store.
    pub collection: String,

    /// Prefix for allocated property identifiers, e.g. `RA-COMSEOS`.
    pub id_prefix: String,

    /// Fields that must be present and non-empty on create/update.
    pub required_fields: Vec<String>,

    /// Whether mutations require the caller to match the record's creator.
    pub enforce_creator_match: bool,
}

impl ListingProfile {
    pub fn new(intent: Intent, category: Category, subtype: SubType) -> Self {
        Self {
            intent,
            category,
            subtype,
            source_name: format!("{intent}-{category}-{subtype}"),
            collection: format!("{intent}_{category}_{subtype}").replace('-', "_"),
            id_prefix: format!(
                "RA-{}{}{}",
                category.prefix_code(),
                intent.prefix_code(),
                subtype.prefix_code()
            ),
            required_fields: vec!["title".to_string()],
            enforce_creator_match: true,
        }
    }
}

/// The full marketplace: every intent x category x sub-type combination.
pub fn builtin_profiles() -> Vec<ListingProfile> {
    let mut profiles = Vec::new();
    for intent in Intent::ALL {
        for category in Category::ALL {
            for subtype in SubType::of_category(category) {
                profiles.push(ListingProfile::new(intent, category, *subtype));
            }
        }
    }
    profiles
}
