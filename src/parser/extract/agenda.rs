use std::sync::LazyLock;

use regex::Regex;

use crate::parser::model::{AgendaTopic, TopicKind};

const TOPIC_START: &str =
    r"\r?\n(Zusatztagesordnungspunkt|Tagesordnungspunkt)[ \t]*(\d+(?: [a-z]\b)?):?[ \t]*\r?\n";

static TOPIC_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TOPIC_START).unwrap());
static TOPIC_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    let ends = [
        TOPIC_START,
        r"\r?\nAnlage[ \t]*\d*[ \t]*\r?\n",
        r"\r?\n\d+\.\sSitzung[ \t]*\r?\n",
        r"\r?\nAmtliche Mitteilungen[ \t]*\r?\n",
        r"\r?\n[ \t]*Beginn:",
    ];
    Regex::new(&ends.join("|")).unwrap()
});
static STENO_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\s*\d{5}\s[ABCD]\s*(?:\n|$)").unwrap());

const MAIN_LABELS: &[&str] = &[
    "tagesordnungspunkt",
    "tagesordnungspunkte",
    "tagesordnungspunkten",
    "tagesordnung",
    "top",
];
const SUPPLEMENTARY_LABELS: &[&str] = &[
    "zusatzpunkt",
    "zusatzpunkte",
    "zusatzpunkten",
    "zusatztagesordnungspunkt",
    "zusatztagesordnungspunkte",
    "zp",
];

impl TopicKind {
    /// Map any printed variant ("Tagesordnungspunkte", "ZP", ...) to its kind.
    pub fn normalize(label: &str) -> Option<TopicKind> {
        let lower = label.trim().to_lowercase();
        if MAIN_LABELS.contains(&lower.as_str()) {
            Some(TopicKind::Main)
        } else if SUPPLEMENTARY_LABELS.contains(&lower.as_str()) {
            Some(TopicKind::Supplementary)
        } else {
            None
        }
    }
}

pub fn is_same_type(a: &str, b: &str) -> bool {
    match (TopicKind::normalize(a), TopicKind::normalize(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Agenda table of contents, in order, all topics unresolved.
pub fn extract(preamble: &str) -> Vec<AgendaTopic> {
    let mut topics = Vec::new();
    let mut pos = 0;

    while let Some(caps) = TOPIC_START_RE.captures_at(preamble, pos) {
        let marker = caps.get(0).unwrap();
        let body_start = marker.end();
        // The marker's trailing newline may open the next terminator.
        let next = TOPIC_END_RE
            .find_at(preamble, body_start - 1)
            .map_or(preamble.len(), |m| m.start());
        let body_end = next.max(body_start);
        pos = next;

        let label = caps[1].to_string();
        let Some(kind) = TopicKind::normalize(&label) else {
            continue;
        };
        let summary = STENO_REF_RE
            .replace_all(&preamble[body_start..body_end], "\n")
            .trim()
            .to_string();

        topics.push(AgendaTopic {
            kind,
            label,
            id: caps[2].to_string(),
            summary,
            range: None,
        });
    }

    topics
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::segments::RawDocument;

    fn fixture_topics() -> Vec<AgendaTopic> {
        let md = std::fs::read_to_string("tests/fixtures/sitzung_228.txt").unwrap();
        let doc = RawDocument::segment(md).unwrap();
        extract(doc.preamble())
    }

    #[test]
    fn kind_normalization_is_symmetric() {
        for a in MAIN_LABELS {
            for b in MAIN_LABELS {
                assert!(is_same_type(a, b) && is_same_type(b, a), "{} / {}", a, b);
            }
            for z in SUPPLEMENTARY_LABELS {
                assert!(!is_same_type(a, z) && !is_same_type(z, a), "{} / {}", a, z);
            }
        }
        for a in SUPPLEMENTARY_LABELS {
            for b in SUPPLEMENTARY_LABELS {
                assert!(is_same_type(a, b));
            }
        }
    }

    #[test]
    fn normalization_ignores_case() {
        assert_eq!(TopicKind::normalize("Tagesordnungspunkte"), Some(TopicKind::Main));
        assert_eq!(TopicKind::normalize("ZP"), Some(TopicKind::Supplementary));
        assert_eq!(
            TopicKind::normalize("Zusatztagesordnungspunkt"),
            Some(TopicKind::Supplementary)
        );
        assert_eq!(TopicKind::normalize("Drucksache"), None);
        assert!(!is_same_type("Drucksache", "Drucksache"));
    }

    #[test]
    fn fixture_agenda_order() {
        let topics = fixture_topics();
        let ids: Vec<(TopicKind, &str)> = topics.iter().map(|t| (t.kind, t.id.as_str())).collect();
        assert_eq!(
            ids,
            vec![
                (TopicKind::Main, "28 a"),
                (TopicKind::Main, "28 b"),
                (TopicKind::Main, "29"),
                (TopicKind::Supplementary, "3"),
                (TopicKind::Main, "30"),
            ]
        );
        assert!(topics.iter().all(|t| t.range.is_none()));
        assert_eq!(topics[3].label, "Zusatztagesordnungspunkt");
    }

    #[test]
    fn steno_references_stripped() {
        let topics = fixture_topics();
        assert_eq!(
            topics[0].summary,
            "Beratung des Antrags der Abgeordneten Jutta Krellmann und der Fraktion DIE LINKE\nGute Arbeit in der Pflege\nDrucksache 18/11145"
        );
        assert!(topics.iter().all(|t| !t.summary.contains("22925")));
    }

    #[test]
    fn summary_stops_at_appendix_marker() {
        let topics = fixture_topics();
        let last = topics.last().unwrap();
        assert_eq!(
            last.summary,
            "Erste Beratung des Entwurfs eines Gesetzes zur Änderung des Sportfördergesetzes"
        );
    }

    #[test]
    fn adjacent_markers_give_empty_summary() {
        let text = "\nTagesordnungspunkt 1:\nTagesordnungspunkt 2:\nZweiter Punkt\n";
        let topics = extract(text);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].summary, "");
        assert_eq!(topics[1].id, "2");
        assert_eq!(topics[1].summary, "Zweiter Punkt");
    }

    #[test]
    fn summary_stops_at_session_start() {
        let text = "\n228. Sitzung\n\nTagesordnungspunkt 1:\nErste Beratung\n\nBeginn: 9.00 Uhr";
        let topics = extract(text);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].summary, "Erste Beratung");
    }

    #[test]
    fn crlf_agenda_matches_lf() {
        let md = std::fs::read_to_string("tests/fixtures/sitzung_228.txt").unwrap();
        let doc = RawDocument::segment(md.replace('\n', "\r\n")).unwrap();
        let crlf = extract(doc.preamble());
        let lf = fixture_topics();
        assert_eq!(crlf.len(), lf.len());
        for (c, l) in crlf.iter().zip(&lf) {
            assert_eq!((c.kind, &c.id), (l.kind, &l.id));
            assert_eq!(c.summary.replace("\r\n", "\n"), l.summary);
        }
    }

    #[test]
    fn summary_stops_at_session_marker() {
        let text = "\nTagesordnungspunkt 4\nLetzter Punkt\n229. Sitzung\nnicht dabei\n";
        let topics = extract(text);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].summary, "Letzter Punkt");
    }
}
