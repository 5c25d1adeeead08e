/// Sentinel written to `exclusion_criteria` and `decision` when a reply did not follow the template.
pub const NOT_FORMATTED: &str = "Not formatted";
/// Sentinel written to `evidence` when there is no parsed justification.
pub const NO_EVIDENCE: &str = "None";

pub const TITLE_COLUMN: &str = "title";
pub const AUTHOR_COLUMN: &str = "author";
pub const YEAR_COLUMN: &str = "year";
pub const ABSTRACT_COLUMN: &str = "abstract";
pub const REQUIRED_COLUMNS: [&str; 4] = [TITLE_COLUMN, AUTHOR_COLUMN, YEAR_COLUMN, ABSTRACT_COLUMN];

pub const EXCLUSION_CRITERIA_COLUMN: &str = "exclusion_criteria";
pub const DECISION_COLUMN: &str = "decision";
pub const EVIDENCE_COLUMN: &str = "evidence";
pub const RESULT_COLUMNS: [&str; 3] = [EXCLUSION_CRITERIA_COLUMN, DECISION_COLUMN, EVIDENCE_COLUMN];

/// One candidate article, as read from the source table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub author: String,
    /// Kept as written in the source cell.
    pub year: String,
    /// May be empty.
    pub abstract_text: String,
}

impl ArticleRecord {
    pub fn new<T, A, Y, B>(title: T, author: A, year: Y, abstract_text: B) -> Self
    where
        T: Into<String>,
        A: Into<String>,
        Y: Into<String>,
        B: Into<String>,
    {
        Self {
            title: title.into(),
            author: author.into(),
            year: year.into(),
            abstract_text: abstract_text.into(),
        }
    }

    pub fn has_abstract(&self) -> bool {
        !self.abstract_text.trim().is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreeningDecision {
    Include,
    Exclude,
    NotFormatted,
}

impl ScreeningDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningDecision::Include => "Include",
            ScreeningDecision::Exclude => "Exclude",
            ScreeningDecision::NotFormatted => NOT_FORMATTED,
        }
    }

    /// Parses the exact labels used in the reply template.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Include" => Some(ScreeningDecision::Include),
            "Exclude" => Some(ScreeningDecision::Exclude),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScreeningDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parsed outcome for one [`ArticleRecord`]. Created once per row and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// `None`, one or more of `1`..`6`, or [`NOT_FORMATTED`].
    pub exclusion_criteria: String,
    pub decision: ScreeningDecision,
    /// Excerpt justifying the decision, or [`NO_EVIDENCE`].
    pub evidence: String,
}

impl Classification {
    pub fn new<C, E>(exclusion_criteria: C, decision: ScreeningDecision, evidence: E) -> Self
    where
        C: Into<String>,
        E: Into<String>,
    {
        Self {
            exclusion_criteria: exclusion_criteria.into(),
            decision,
            evidence: evidence.into(),
        }
    }

    pub fn not_formatted() -> Self {
        Self::new(NOT_FORMATTED, ScreeningDecision::NotFormatted, NO_EVIDENCE)
    }

    pub fn is_formatted(&self) -> bool {
        self.decision != ScreeningDecision::NotFormatted
    }

    /// Cell values in [`RESULT_COLUMNS`] order.
    pub fn columns(&self) -> [&str; 3] {
        [
            self.exclusion_criteria.as_str(),
            self.decision.as_str(),
            self.evidence.as_str(),
        ]
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (criteria: {}, evidence: {:?})",
            self.decision, self.exclusion_criteria, self.evidence
        )
    }
}
