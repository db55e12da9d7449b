use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The two mirrored entity kinds. Each one is stored in its own index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "jobs")]
    Job,
    #[serde(rename = "candidates")]
    Candidate,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Job, EntityKind::Candidate];

    /// Wire tag of the kind, as accepted in requests
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Job => "jobs",
            EntityKind::Candidate => "candidates",
        }
    }

    /// The kind searched when matching against this one
    pub const fn opposite(self) -> Self {
        match self {
            EntityKind::Job => EntityKind::Candidate,
            EntityKind::Candidate => EntityKind::Job,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of a stored job that take part in matching
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub salary_expectation: Option<f64>,
    #[serde(default)]
    pub top_skills: Option<Vec<String>>,
    #[serde(default)]
    pub seniority: Option<String>,
}

impl JobRecord {
    /// Helper to get top skills as a slice, empty when missing
    pub fn skills(&self) -> &[String] {
        self.top_skills.as_deref().unwrap_or(&[])
    }
}

/// Attributes of a stored candidate that take part in matching
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default)]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub top_skills: Option<Vec<String>>,
    #[serde(default)]
    pub seniorities: Option<Vec<String>>,
}

impl CandidateRecord {
    /// Helper to get top skills as a slice, empty when missing
    pub fn skills(&self) -> &[String] {
        self.top_skills.as_deref().unwrap_or(&[])
    }

    /// Helper to get seniorities as a slice, empty when missing
    pub fn seniority_levels(&self) -> &[String] {
        self.seniorities.as_deref().unwrap_or(&[])
    }
}

/// A source entity decoded from its stored document
///
/// Attribute names differ between the two kinds (`salary_expectation` vs
/// `max_salary`, `seniority` vs `seniorities`), so each kind keeps its own
/// record type instead of sharing an untyped attribute bag.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRecord {
    Job(JobRecord),
    Candidate(CandidateRecord),
}

impl EntityRecord {
    /// Decode the `_source` of a stored document as a record of `kind`.
    /// Unknown attributes are ignored.
    pub fn from_source(kind: EntityKind, source: &Value) -> Result<Self, serde_json::Error> {
        match kind {
            EntityKind::Job => JobRecord::deserialize(source).map(EntityRecord::Job),
            EntityKind::Candidate => {
                CandidateRecord::deserialize(source).map(EntityRecord::Candidate)
            }
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRecord::Job(_) => EntityKind::Job,
            EntityRecord::Candidate(_) => EntityKind::Candidate,
        }
    }

    pub fn skills(&self) -> &[String] {
        match self {
            EntityRecord::Job(job) => job.skills(),
            EntityRecord::Candidate(candidate) => candidate.skills(),
        }
    }
}

/// Which match criteria are enabled for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCriteria {
    #[serde(default)]
    pub salary_match: bool,
    #[serde(default)]
    pub top_skill_match: bool,
    #[serde(default)]
    pub seniority_match: bool,
    /// How many of the produced clauses a document has to satisfy
    #[serde(default = "default_minimum_should_match")]
    pub minimum_should_match: i64,
}

fn default_minimum_should_match() -> i64 { 1 }

impl Default for MatchCriteria {
    fn default() -> Self {
        Self {
            salary_match: false,
            top_skill_match: false,
            seniority_match: false,
            minimum_should_match: default_minimum_should_match(),
        }
    }
}

impl MatchCriteria {
    /// All three criteria enabled with the given threshold
    pub fn all(minimum_should_match: i64) -> Self {
        Self {
            salary_match: true,
            top_skill_match: true,
            seniority_match: true,
            minimum_should_match,
        }
    }
}

/// A document as returned by a point lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub source: Value,
}

/// One ranked match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEntity {
    pub id: String,
    pub relevance_score: f64,
}

/// One page of ranked matches plus the unbounded match count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub total_results: u64,
    pub results: Vec<MatchedEntity>,
}
