use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Counters reported for a single project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    pub view_count: u64,
    pub unique_visitors: u64,
}

/// One row of the server-side analytics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub project_id: String,
    pub view_count: u64,
    pub unique_visitors: u64,
    pub last_updated: String,
}

impl AnalyticsRecord {
    pub fn counts(&self) -> ViewCounts {
        ViewCounts {
            view_count: self.view_count,
            unique_visitors: self.unique_visitors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Helpful,
    Insightful,
    Love,
    Wow,
}

impl ReactionType {
    pub const ALL: [ReactionType; 5] = [
        ReactionType::Like,
        ReactionType::Helpful,
        ReactionType::Insightful,
        ReactionType::Love,
        ReactionType::Wow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Like => "like",
            ReactionType::Helpful => "helpful",
            ReactionType::Insightful => "insightful",
            ReactionType::Love => "love",
            ReactionType::Wow => "wow",
        }
    }

    pub fn valid_types() -> Vec<&'static str> {
        Self::ALL.iter().map(ReactionType::as_str).collect()
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidReactionType(pub String);

impl fmt::Display for InvalidReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reaction type {}", self.0)
    }
}

impl std::error::Error for InvalidReactionType {}

impl FromStr for ReactionType {
    type Err = InvalidReactionType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|reaction| reaction.as_str() == value)
            .ok_or_else(|| InvalidReactionType(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionTally {
    pub project_id: String,
    pub reaction_type: ReactionType,
    pub count: u64,
}

/// Reaction counts for one project, keyed by reaction type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReactions {
    pub project_id: String,
    pub reactions: BTreeMap<String, u64>,
    pub total: u64,
}

impl ProjectReactions {
    pub fn from_tallies(project_id: &str, tallies: &[ReactionTally]) -> Self {
        let mut reactions = BTreeMap::new();
        let mut total = 0u64;
        for tally in tallies.iter().filter(|tally| tally.project_id == project_id) {
            reactions.insert(tally.reaction_type.to_string(), tally.count);
            total += tally.count;
        }
        Self {
            project_id: project_id.to_string(),
            reactions,
            total,
        }
    }
}

/// One-way hash of a client identifier. The raw identifier is never stored.
pub fn hash_client_identifier(salt: &str, identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(identifier.as_bytes());
    hex_digest(&hasher.finalize())
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

/// Project ids are URL path segments; reject anything empty or oversized.
pub fn is_valid_project_id(project_id: &str) -> bool {
    !project_id.is_empty()
        && project_id.len() <= 128
        && project_id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}
