use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::error::{Diagnostics, Warning};
use super::model::{AgendaTopic, Span, TopicKind};

const KIND: &str = r"((?:Zusatz|Zusatztagesordnungs|Tagesordnungs)punkt(?:en|e)?)";
const ID: &str = r"\d+(?: [a-z]\b)?";

/// One announcement found in the debate body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub label: String,
    pub ids: Vec<String>,
    pub start: usize,
    pub end: usize,
}

/// A phrasing of "we now move to topic N" plus how to read its ids.
pub struct Strategy {
    pub name: &'static str,
    regex: Regex,
    ids: fn(&Captures<'_>) -> Vec<String>,
}

impl Strategy {
    fn new(name: &'static str, pattern: String, ids: fn(&Captures<'_>) -> Vec<String>) -> Self {
        Strategy {
            name,
            regex: Regex::new(&pattern).unwrap(),
            ids,
        }
    }

    pub fn find_all(&self, debate: &str) -> Vec<Announcement> {
        self.regex
            .captures_iter(debate)
            .map(|caps| {
                let m = caps.get(0).unwrap();
                Announcement {
                    label: caps[1].to_string(),
                    ids: (self.ids)(&caps),
                    start: m.start(),
                    end: m.end(),
                }
            })
            .collect()
    }
}

/// Most specific phrasing first.
pub static STRATEGIES: LazyLock<Vec<Strategy>> = LazyLock::new(|| {
    vec![
        Strategy::new(
            "call_up",
            format!(r"(?:rufe|jetzt) (?:\w+ ){{0,3}}?{KIND} ({ID})(?: (und|bis) ({ID}))? auf\b"),
            pair_ids,
        ),
        Strategy::new(
            "move_to",
            format!(r"(?mR)komm(?:en|e) (?:\w+ ){{0,2}}?(?:zum|zu den|zu) {KIND} ({ID})(?::|\.|[ \t]*$)"),
            single_id,
        ),
        Strategy::new(
            "call_up_infinitive",
            format!(r"\b{KIND} ({ID}) aufrufen\b"),
            single_id,
        ),
        Strategy::new(
            "begin_with",
            format!(r"beginnen mit (?:dem |den )?{KIND} ({ID}(?:, {ID})*(?: sowie {ID})?)"),
            list_ids,
        ),
        Strategy::new(
            "bare_line",
            format!(r"(?mR)^[ \t]*{KIND} ({ID})[.:][ \t]*$"),
            single_id,
        ),
    ]
});

fn single_id(caps: &Captures<'_>) -> Vec<String> {
    vec![caps[2].to_string()]
}

fn pair_ids(caps: &Captures<'_>) -> Vec<String> {
    match (caps.get(3).map(|m| m.as_str()), caps.get(4)) {
        (Some("bis"), Some(to)) => expand_range(&caps[2], to.as_str()),
        (Some(_), Some(other)) => vec![caps[2].to_string(), other.as_str().to_string()],
        _ => vec![caps[2].to_string()],
    }
}

fn list_ids(caps: &Captures<'_>) -> Vec<String> {
    caps[2]
        .split(", ")
        .flat_map(|part| part.split(" sowie "))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// "28 a" bis "28 c" -> a, b, c; "1" bis "3" -> 1, 2, 3. Anything else keeps
/// just the two ends.
pub fn expand_range(from: &str, to: &str) -> Vec<String> {
    let split = |id: &str| -> (Option<u32>, Option<char>) {
        let mut parts = id.split(' ');
        let num = parts.next().and_then(|n| n.parse().ok());
        let letter = parts.next().and_then(|l| l.chars().next());
        (num, letter)
    };
    match (split(from), split(to)) {
        ((Some(a), Some(x)), (Some(b), Some(y))) if a == b && x <= y => {
            (x..=y).map(|c| format!("{} {}", a, c)).collect()
        }
        ((Some(a), None), (Some(b), None)) if a <= b && b - a < 100 => {
            (a..=b).map(|n| n.to_string()).collect()
        }
        _ => vec![from.to_string(), to.to_string()],
    }
}

/// Resolve each topic to the debate range its announcement opens.
///
/// A hit runs until the next hit of the same strategy. Earlier strategies and
/// earlier hits win; later ones never overwrite a resolved topic.
pub fn locate_agenda_discussions(
    debate: &str,
    mut topics: Vec<AgendaTopic>,
    diagnostics: &mut Diagnostics,
) -> Vec<AgendaTopic> {
    for strategy in STRATEGIES.iter() {
        let hits = strategy.find_all(debate);
        for (i, hit) in hits.iter().enumerate() {
            let end = hits.get(i + 1).map_or(debate.len(), |next| next.start);
            let range = Span::new(hit.end, end);
            debug!(strategy = strategy.name, label = %hit.label, ids = ?hit.ids, start = hit.start, "agenda announcement");

            let Some(kind) = TopicKind::normalize(&hit.label) else {
                continue;
            };
            for id in &hit.ids {
                match topics.iter_mut().find(|t| t.kind == kind && &t.id == id) {
                    Some(topic) if topic.range.is_none() => topic.range = Some(range),
                    Some(_) => {}
                    None => diagnostics.push(Warning::UnmatchedAgendaAnnouncement {
                        label: hit.label.clone(),
                        id: id.clone(),
                        offset: hit.start,
                    }),
                }
            }
        }
    }

    for topic in topics.iter().filter(|t| t.range.is_none()) {
        diagnostics.push(Warning::UnresolvedAgendaTopic {
            label: topic.label.clone(),
            id: topic.id.clone(),
        });
    }
    topics
}

// ── Tests ──
