use serde::{Deserialize, Serialize};

/// A named attendee of the meeting, listed either as a primary contact or in
/// the supporting cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    pub role: String,
}

/// One line of the agenda table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub time: String,
    pub owner: String,
    pub topic: String,
    pub description: String,
}

/// The structured input describing one meeting.
///
/// Top-level fields are all optional on the wire: a missing scalar becomes
/// an empty string and a missing list an empty list. Entries inside the lists
/// must carry every field, otherwise deserialization fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaRecord {
    pub customer: String,
    pub date: String,
    pub title: String,
    pub summary: String,
    /// Path, bare filename or URL hinting at the logo to embed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Remote logo picked explicitly by the caller. Wins over `logo`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub primaries: Vec<Attendee>,
    pub supporting: Vec<Attendee>,
    pub agenda_items: Vec<AgendaItem>,
}

impl AgendaRecord {
    /// Parses a record from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parses a record from raw JSON bytes (e.g. a request body).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// The logo hint to resolve, if the record carries one.
    ///
    /// `logo_url` takes precedence over `logo`; blank strings count as absent.
    pub fn logo_hint(&self) -> Option<&str> {
        [self.logo_url.as_deref(), self.logo.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|hint| !hint.is_empty())
    }
}
