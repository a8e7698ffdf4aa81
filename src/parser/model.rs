use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::error::Warning;

/// Half-open `[start, end)` byte range into a document region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub session: u32,
    pub electoral_period: Option<u32>,
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicKind {
    Main,
    Supplementary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaTopic {
    pub kind: TopicKind,
    /// Textual variant as printed, e.g. "Zusatztagesordnungspunkt".
    pub label: String,
    pub id: String,
    pub summary: String,
    /// Debate-body range of the discussion; `None` until located.
    pub range: Option<Span>,
}

impl AgendaTopic {
    /// Offsets with `(-1, -1)` standing in for an unresolved topic.
    pub fn offsets(&self) -> (i64, i64) {
        match self.range {
            Some(r) => (r.start as i64, r.end as i64),
            None => (-1, -1),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.range.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIdentity {
    pub uuid: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Speaker {
    pub role: Option<String>,
    pub titles: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub party: Option<String>,
    pub electorate: Option<String>,
    pub position: Option<String>,
    pub identity: Option<PersonIdentity>,
}

impl Speaker {
    pub fn display_name(&self) -> String {
        match &self.titles {
            Some(t) => format!("{} {} {}", t, self.first_name, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub speaker: Speaker,
    pub text: String,
    /// Announcement line through the end of the turn.
    pub range: Span,
    /// The spoken text only; always ends at `range.end`.
    pub speech: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absentee {
    pub last_name: String,
    pub first_name: String,
    pub titles: Option<String>,
    pub electorate: Option<String>,
    pub party: String,
    pub reason_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceReason {
    pub marker: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DebateItem {
    Topic(AgendaTopic),
    Contribution(Contribution),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedSession {
    pub metadata: SessionMetadata,
    pub agenda: Vec<AgendaTopic>,
    pub debate: Vec<DebateItem>,
    pub absentees: Vec<Absentee>,
    pub reasons: Vec<AbsenceReason>,
    pub warnings: Vec<Warning>,
}

impl ParsedSession {
    pub fn contributions(&self) -> impl Iterator<Item = &Contribution> {
        self.debate.iter().filter_map(|item| match item {
            DebateItem::Contribution(c) => Some(c),
            DebateItem::Topic(_) => None,
        })
    }

    pub fn unresolved_topics(&self) -> impl Iterator<Item = &AgendaTopic> {
        self.agenda.iter().filter(|t| !t.is_resolved())
    }

    pub fn reason_for(&self, absentee: &Absentee) -> Option<&AbsenceReason> {
        let marker = absentee.reason_marker.as_deref()?;
        self.reasons.iter().find(|r| r.marker == marker)
    }
}
