use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use crate::models::{EntityRecord, MatchCriteria};

/// Indexed field names used by match clauses
pub mod fields {
    pub const SALARY_EXPECTATION: &str = "salary_expectation";
    pub const MAX_SALARY: &str = "max_salary";
    pub const TOP_SKILLS: &str = "top_skills";
    pub const SENIORITY: &str = "seniority";
    pub const SENIORITIES: &str = "seniorities";
}

/// Upper bound on the number of shared skills a skill clause requires
pub const MAX_REQUIRED_SKILLS: usize = 2;

/// The three independent match criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Salary,
    TopSkills,
    Seniority,
}

impl Criterion {
    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Salary => "salary",
            Criterion::TopSkills => "top_skills",
            Criterion::Seniority => "seniority",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-sided numeric bound of a range clause
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeBound {
    AtMost(f64),
    AtLeast(f64),
}

/// A typed sub-clause of the match query
#[derive(Debug, Clone, PartialEq)]
pub enum MatchClause {
    /// Target salary field must fall on one side of the source's salary
    SalaryRange { field: &'static str, bound: RangeBound },
    /// Target must share at least `required` of `terms`
    SkillOverlap { terms: Vec<String>, required: usize },
    /// Target seniority field must contain one of `values`
    SeniorityOverlap { field: &'static str, values: Vec<String> },
}

impl MatchClause {
    pub fn criterion(&self) -> Criterion {
        match self {
            MatchClause::SalaryRange { .. } => Criterion::Salary,
            MatchClause::SkillOverlap { .. } => Criterion::TopSkills,
            MatchClause::SeniorityOverlap { .. } => Criterion::Seniority,
        }
    }

    /// Render the clause in the search engine's query DSL
    pub fn render(&self) -> Value {
        match self {
            MatchClause::SalaryRange { field, bound } => {
                let bound = match bound {
                    RangeBound::AtMost(value) => json!({ "lte": value }),
                    RangeBound::AtLeast(value) => json!({ "gte": value }),
                };
                json!({ "range": { *field: bound } })
            }
            MatchClause::SkillOverlap { terms, required } => json!({
                "terms_set": {
                    (fields::TOP_SKILLS): {
                        "terms": terms,
                        "minimum_should_match_script": {
                            "source": "params.min_skills",
                            "params": { "min_skills": required }
                        }
                    }
                }
            }),
            MatchClause::SeniorityOverlap { field, values } => {
                json!({ "terms": { *field: values } })
            }
        }
    }
}

/// Salary clause, directed by the source kind.
///
/// A job source bounds the candidates' `max_salary` from above by its
/// `salary_expectation`; a candidate source bounds the jobs'
/// `salary_expectation` from below by its `max_salary`.
pub fn salary_clause(record: &EntityRecord) -> Option<MatchClause> {
    match record {
        EntityRecord::Job(job) => job.salary_expectation.map(|salary| MatchClause::SalaryRange {
            field: fields::MAX_SALARY,
            bound: RangeBound::AtMost(salary),
        }),
        EntityRecord::Candidate(candidate) => {
            candidate.max_salary.map(|salary| MatchClause::SalaryRange {
                field: fields::SALARY_EXPECTATION,
                bound: RangeBound::AtLeast(salary),
            })
        }
    }
}

/// Skill overlap clause requiring `min(|skills|, 2)` shared skills.
/// None when the source lists no skills.
pub fn skill_clause(record: &EntityRecord) -> Option<MatchClause> {
    let skills = record.skills();
    if skills.is_empty() {
        return None;
    }

    Some(MatchClause::SkillOverlap {
        terms: skills.to_vec(),
        required: skills.len().min(MAX_REQUIRED_SKILLS),
    })
}

/// Seniority clause mapping the singular job field onto the plural
/// candidate field and back. None when the source has no seniority data.
pub fn seniority_clause(record: &EntityRecord) -> Option<MatchClause> {
    match record {
        EntityRecord::Job(job) => job
            .seniority
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|seniority| MatchClause::SeniorityOverlap {
                field: fields::SENIORITIES,
                values: vec![seniority.clone()],
            }),
        EntityRecord::Candidate(candidate) => {
            let levels = candidate.seniority_levels();
            if levels.is_empty() {
                return None;
            }
            Some(MatchClause::SeniorityOverlap {
                field: fields::SENIORITY,
                values: levels.to_vec(),
            })
        }
    }
}

/// Accumulates the clauses of a match query
#[derive(Debug, Default)]
pub struct QueryBuilder {
    clauses: Vec<MatchClause>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the clause of an enabled criterion. A criterion without source
    /// data contributes nothing.
    pub fn add(&mut self, criterion: Criterion, clause: Option<MatchClause>) -> &mut Self {
        match clause {
            Some(clause) => self.clauses.push(clause),
            None => tracing::debug!(%criterion, "Criterion enabled but source has no data, skipping"),
        }
        self
    }

    pub fn build(self, minimum_should_match: i64) -> MatchQuery {
        MatchQuery {
            clauses: self.clauses,
            minimum_should_match,
        }
    }
}

/// The typed outcome of query synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub clauses: Vec<MatchClause>,
    pub minimum_should_match: i64,
}

impl MatchQuery {
    /// True when no clause restricts the search
    pub fn is_unrestricted(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn criteria(&self) -> Vec<Criterion> {
        self.clauses.iter().map(MatchClause::criterion).collect()
    }

    /// Find the clause produced for `criterion`, if any
    pub fn clause(&self, criterion: Criterion) -> Option<&MatchClause> {
        self.clauses.iter().find(|c| c.criterion() == criterion)
    }

    pub fn render(&self) -> QueryBody {
        render(self)
    }
}

/// Query body sent to the search engine, before pagination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryBody {
    pub query: Value,
    pub sort: Value,
}

/// Build the match query for `record` from the enabled criteria
pub fn synthesize(record: &EntityRecord, criteria: &MatchCriteria) -> MatchQuery {
    let mut builder = QueryBuilder::new();

    if criteria.salary_match {
        builder.add(Criterion::Salary, salary_clause(record));
    }
    if criteria.top_skill_match {
        builder.add(Criterion::TopSkills, skill_clause(record));
    }
    if criteria.seniority_match {
        builder.add(Criterion::Seniority, seniority_clause(record));
    }

    let query = builder.build(criteria.minimum_should_match);

    tracing::debug!(
        source_kind = %record.kind(),
        clauses = ?query.criteria(),
        minimum_should_match = query.minimum_should_match,
        "Synthesized match query"
    );

    query
}

/// Render a match query into its query body.
///
/// No clauses means no filtering was requested, so the body matches every
/// document. Results are always sorted by relevance, highest first.
pub fn render(query: &MatchQuery) -> QueryBody {
    let query_dsl = if query.is_unrestricted() {
        json!({ "match_all": {} })
    } else {
        let should: Vec<Value> = query.clauses.iter().map(MatchClause::render).collect();
        json!({
            "bool": {
                "should": should,
                "minimum_should_match": query.minimum_should_match
            }
        })
    };

    QueryBody {
        query: query_dsl,
        sort: json!([{ "_score": { "order": "desc" } }]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateRecord, JobRecord};

    fn job(skills: &[&str]) -> EntityRecord {
        EntityRecord::Job(JobRecord {
            salary_expectation: Some(100.0),
            top_skills: Some(skills.iter().map(|s| s.to_string()).collect()),
            seniority: Some("senior".to_string()),
        })
    }

    fn candidate() -> EntityRecord {
        EntityRecord::Candidate(CandidateRecord {
            max_salary: Some(80.0),
            top_skills: Some(vec!["rust".to_string()]),
            seniorities: Some(vec!["mid".to_string(), "senior".to_string()]),
        })
    }

    #[test]
    fn test_required_skills_capped_at_two() {
        for (skills, expected) in [
            (vec![], None),
            (vec!["rust"], Some(1)),
            (vec!["rust", "go"], Some(2)),
            (vec!["rust", "go", "sql", "k8s"], Some(2)),
        ] {
            let required = match skill_clause(&job(&skills)) {
                Some(MatchClause::SkillOverlap { required, .. }) => Some(required),
                Some(other) => panic!("unexpected clause {:?}", other),
                None => None,
            };
            assert_eq!(required, expected, "skills: {:?}", skills);
        }
    }

    #[test]
    fn test_job_salary_bounds_candidate_ceiling() {
        let clause = salary_clause(&job(&["rust"])).unwrap();
        assert_eq!(
            clause,
            MatchClause::SalaryRange {
                field: fields::MAX_SALARY,
                bound: RangeBound::AtMost(100.0),
            }
        );
        assert_eq!(clause.render(), json!({ "range": { "max_salary": { "lte": 100.0 } } }));
    }

    #[test]
    fn test_candidate_salary_bounds_job_expectation() {
        let clause = salary_clause(&candidate()).unwrap();
        assert_eq!(
            clause.render(),
            json!({ "range": { "salary_expectation": { "gte": 80.0 } } })
        );
    }

    #[test]
    fn test_missing_salary_skips_clause() {
        let record = EntityRecord::Job(JobRecord::default());
        assert!(salary_clause(&record).is_none());

        let query = synthesize(&record, &MatchCriteria::all(1));
        assert!(query.is_unrestricted());
    }

    #[test]
    fn test_seniority_field_mapping() {
        let from_job = seniority_clause(&job(&[])).unwrap();
        assert_eq!(from_job.render(), json!({ "terms": { "seniorities": ["senior"] } }));

        let from_candidate = seniority_clause(&candidate()).unwrap();
        assert_eq!(
            from_candidate.render(),
            json!({ "terms": { "seniority": ["mid", "senior"] } })
        );
    }

    #[test]
    fn test_empty_seniority_skips_clause() {
        let record = EntityRecord::Job(JobRecord {
            seniority: Some(String::new()),
            ..JobRecord::default()
        });
        assert!(seniority_clause(&record).is_none());

        let record = EntityRecord::Candidate(CandidateRecord {
            seniorities: Some(vec![]),
            ..CandidateRecord::default()
        });
        assert!(seniority_clause(&record).is_none());
    }

    #[test]
    fn test_skill_clause_render() {
        let clause = skill_clause(&job(&["rust", "go", "sql"])).unwrap();
        assert_eq!(
            clause.render(),
            json!({
                "terms_set": {
                    "top_skills": {
                        "terms": ["rust", "go", "sql"],
                        "minimum_should_match_script": {
                            "source": "params.min_skills",
                            "params": { "min_skills": 2 }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_all_toggles_off_matches_everything() {
        let criteria = MatchCriteria {
            minimum_should_match: 3,
            ..MatchCriteria::default()
        };
        let body = synthesize(&job(&["rust"]), &criteria).render();

        assert_eq!(body.query, json!({ "match_all": {} }));
        assert_eq!(body.sort, json!([{ "_score": { "order": "desc" } }]));
    }

    #[test]
    fn test_should_group_with_threshold() {
        let body = synthesize(&candidate(), &MatchCriteria::all(2)).render();

        let bool_query = &body.query["bool"];
        assert_eq!(bool_query["minimum_should_match"], json!(2));
        assert_eq!(bool_query["should"].as_array().unwrap().len(), 3);
        assert_eq!(body.sort, json!([{ "_score": { "order": "desc" } }]));
    }

    #[test]
    fn test_builder_ignores_missing_clauses() {
        let mut builder = QueryBuilder::new();
        builder
            .add(Criterion::Salary, None)
            .add(Criterion::TopSkills, skill_clause(&job(&["rust"])));
        let query = builder.build(1);

        assert_eq!(query.criteria(), vec![Criterion::TopSkills]);
        assert!(query.clause(Criterion::Salary).is_none());
    }
}
