//! Master data: the reference lists shown across the network.

use crate::{rules, MasterDataId};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// The three reference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasterList {
    Locations,
    Services,
    Specialties,
}

impl MasterList {
    /// Returns the list name used in cache keys and URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Services => "services",
            Self::Specialties => "specialties",
        }
    }

    /// Returns the backing table.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Services => "services_list",
            Self::Specialties => "specialties_list",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Locations, Self::Services, Self::Specialties]
    }

    /// Parses a list name.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "locations" => Some(Self::Locations),
            "services" => Some(Self::Services),
            "specialties" => Some(Self::Specialties),
            _ => None,
        }
    }
}

impl fmt::Display for MasterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An element of one of the master lists.
pub trait MasterRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Which list this record belongs to.
    const KIND: MasterList;

    fn id(&self) -> MasterDataId;
}

/// A city/state pair hospitals are filed under. Ordered by city, then state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: MasterDataId,
    pub city: String,
    pub state: String,
}

/// A hospital service offering. Ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: MasterDataId,
    pub name: String,
    pub description: Option<String>,
}

/// A medical specialty. Ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: MasterDataId,
    pub name: String,
    pub description: Option<String>,
}

impl MasterRecord for Location {
    const KIND: MasterList = MasterList::Locations;

    fn id(&self) -> MasterDataId {
        self.id
    }
}

impl MasterRecord for Service {
    const KIND: MasterList = MasterList::Services;

    fn id(&self) -> MasterDataId {
        self.id
    }
}

impl MasterRecord for Specialty {
    const KIND: MasterList = MasterList::Specialties;

    fn id(&self) -> MasterDataId {
        self.id
    }
}

/// Input for creating or updating a location.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationInput {
    #[validate(length(max = 100), custom(function = "rules::not_blank"))]
    pub city: String,

    #[validate(length(max = 100), custom(function = "rules::not_blank"))]
    pub state: String,
}

/// Input for creating or updating a service or specialty.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NamedEntryInput {
    #[validate(length(max = 120), custom(function = "rules::not_blank"))]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_names_and_tables() {
        assert_eq!(MasterList::Locations.as_str(), "locations");
        assert_eq!(MasterList::Services.table(), "services_list");
        assert_eq!(MasterList::Specialties.table(), "specialties_list");
        assert_eq!(MasterList::from_str("Services"), Some(MasterList::Services));
        assert_eq!(MasterList::from_str("wards"), None);
    }

    #[test]
    fn test_record_kinds() {
        assert_eq!(Location::KIND, MasterList::Locations);
        assert_eq!(Service::KIND, MasterList::Services);
        assert_eq!(Specialty::KIND, MasterList::Specialties);
    }

    #[test]
    fn test_location_input_rejects_blank_city() {
        let input = LocationInput {
            city: "   ".to_string(),
            state: "Kerala".to_string(),
        };
        assert!(input.validate().is_err());

        let input = LocationInput {
            city: "Kochi".to_string(),
            state: "Kerala".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_named_entry_input_limits() {
        let input = NamedEntryInput {
            name: "x".repeat(121),
            description: None,
        };
        assert!(input.validate().is_err());
    }
}
