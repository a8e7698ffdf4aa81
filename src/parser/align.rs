use super::error::{Diagnostics, Warning};
use super::model::{AgendaTopic, Contribution, DebateItem, Span};

/// Cut a contribution at `at`, which must lie inside its range.
fn split_at(c: &Contribution, at: usize) -> (Contribution, Contribution) {
    let cut = at.clamp(c.speech.start, c.range.end) - c.speech.start;
    let before = Contribution {
        speaker: c.speaker.clone(),
        text: c.text[..cut].to_string(),
        range: Span::new(c.range.start, at),
        speech: Span::new(c.speech.start.min(at), at),
    };
    let after = Contribution {
        speaker: c.speaker.clone(),
        text: c.text[cut..].to_string(),
        range: Span::new(at, c.range.end),
        speech: Span::new(c.speech.start.max(at), c.range.end),
    };
    (before, after)
}

/// Merge located topics into the contribution sequence.
///
/// Topics are applied in ascending start order (stable for equal starts)
/// against the latest split state, so several topics inside one contribution
/// split it in document order.
pub fn align(
    contributions: Vec<Contribution>,
    topics: &[AgendaTopic],
    diagnostics: &mut Diagnostics,
) -> Vec<DebateItem> {
    let mut pending: Vec<(usize, &AgendaTopic)> = topics
        .iter()
        .filter_map(|t| t.range.map(|r| (r.start, t)))
        .collect();
    pending.sort_by_key(|(start, _)| *start);
    let mut pending = pending.into_iter().peekable();

    let mut merged = Vec::with_capacity(contributions.len() + topics.len());
    for contribution in contributions {
        // Topics before this contribution have no home.
        while let Some((start, topic)) = pending.next_if(|(s, _)| *s < contribution.range.start) {
            unmatched(topic, start, diagnostics);
        }

        let mut current = contribution;
        while let Some((start, topic)) = pending.next_if(|(s, _)| current.range.contains(*s)) {
            if start > current.range.start {
                let (before, after) = split_at(&current, start);
                merged.push(DebateItem::Contribution(before));
                current = after;
            }
            merged.push(DebateItem::Topic(topic.clone()));
        }
        merged.push(DebateItem::Contribution(current));
    }

    for (start, topic) in pending {
        unmatched(topic, start, diagnostics);
    }
    merged
}

fn unmatched(topic: &AgendaTopic, offset: usize, diagnostics: &mut Diagnostics) {
    diagnostics.push(Warning::UnmatchedAgendaSplit {
        label: topic.label.clone(),
        id: topic.id.clone(),
        offset,
    });
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract;
    use crate::parser::locate::locate_agenda_discussions;
    use crate::parser::model::{Speaker, TopicKind};
    use crate::parser::segments::RawDocument;

    fn speaker(last: &str) -> Speaker {
        Speaker {
            first_name: "Anna".into(),
            last_name: last.into(),
            ..Speaker::default()
        }
    }

    fn topic(id: &str, start: Option<usize>) -> AgendaTopic {
        AgendaTopic {
            kind: TopicKind::Main,
            label: "Tagesordnungspunkt".into(),
            id: id.into(),
            summary: String::new(),
            range: start.map(|s| Span::new(s, s + 1)),
        }
    }

    /// Announcement "X:\n" (3 bytes) then speech.
    fn contribution(debate: &str, last: &str, start: usize, end: usize) -> Contribution {
        Contribution {
            speaker: speaker(last),
            text: debate[start + 3..end].to_string(),
            range: Span::new(start, end),
            speech: Span::new(start + 3, end),
        }
    }

    fn shape(items: &[DebateItem]) -> Vec<String> {
        items
            .iter()
            .map(|i| match i {
                DebateItem::Topic(t) => format!("T{}", t.id),
                DebateItem::Contribution(c) => c.speaker.last_name.clone(),
            })
            .collect()
    }

    #[test]
    fn splits_containing_contribution() {
        let debate = "A:\nabcdefB:\nghij";
        let contribs = vec![
            contribution(debate, "A", 0, 9),
            contribution(debate, "B", 9, debate.len()),
        ];
        let mut diagnostics = Diagnostics::default();
        let merged = align(contribs, &[topic("1", Some(6))], &mut diagnostics);
        assert_eq!(shape(&merged), vec!["A", "T1", "A", "B"]);
        let DebateItem::Contribution(before) = &merged[0] else { panic!() };
        let DebateItem::Contribution(after) = &merged[2] else { panic!() };
        assert_eq!(before.text, "abc");
        assert_eq!(before.range, Span::new(0, 6));
        assert_eq!(after.text, "def");
        assert_eq!(after.range, Span::new(6, 9));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn two_topics_in_one_contribution_split_in_order() {
        let debate = "A:\nabcdefghij";
        let contribs = vec![contribution(debate, "A", 0, debate.len())];
        let topics = [topic("2", Some(9)), topic("1", Some(5))];
        let mut diagnostics = Diagnostics::default();
        let merged = align(contribs, &topics, &mut diagnostics);
        assert_eq!(shape(&merged), vec!["A", "T1", "A", "T2", "A"]);
        let texts: Vec<&str> = merged
            .iter()
            .filter_map(|i| match i {
                DebateItem::Contribution(c) => Some(c.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["ab", "cdef", "ghij"]);
    }

    #[test]
    fn equal_starts_keep_agenda_order_without_empty_halves() {
        let debate = "A:\nabcdef";
        let contribs = vec![contribution(debate, "A", 0, debate.len())];
        let topics = [topic("28 a", Some(5)), topic("28 b", Some(5))];
        let mut diagnostics = Diagnostics::default();
        let merged = align(contribs, &topics, &mut diagnostics);
        assert_eq!(shape(&merged), vec!["A", "T28 a", "T28 b", "A"]);
    }

    #[test]
    fn topic_outside_contributions_is_skipped() {
        let debate = "Vorspann A:\nabc";
        let contribs = vec![contribution(&debate[9..], "A", 0, 6)]
            .into_iter()
            .map(|mut c| {
                c.range = Span::new(9, debate.len());
                c.speech = Span::new(12, debate.len());
                c
            })
            .collect();
        let topics = [topic("1", Some(2)), topic("2", None)];
        let mut diagnostics = Diagnostics::default();
        let merged = align(contribs, &topics, &mut diagnostics);
        assert_eq!(shape(&merged), vec!["A"]);
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::UnmatchedAgendaSplit {
                label: "Tagesordnungspunkt".into(),
                id: "1".into(),
                offset: 2,
            }]
        );
    }

    #[test]
    fn no_contributions_reports_every_topic() {
        let mut diagnostics = Diagnostics::default();
        let merged = align(Vec::new(), &[topic("1", Some(0)), topic("2", Some(4))], &mut diagnostics);
        assert!(merged.is_empty());
        assert_eq!(diagnostics.warnings().len(), 2);
    }

    #[test]
    fn fixture_alignment() {
        let md = std::fs::read_to_string("tests/fixtures/sitzung_228.txt").unwrap();
        let doc = RawDocument::segment(md).unwrap();
        let mut diagnostics = Diagnostics::default();
        let topics = locate_agenda_discussions(
            doc.debate(),
            extract::agenda::extract(doc.preamble()),
            &mut diagnostics,
        );
        let contribs = extract::speakers::extract(doc.debate());
        let merged = align(contribs, &topics, &mut diagnostics);
        assert_eq!(
            shape(&merged),
            vec![
                "Lammert", "T28 a", "T28 b", "Lammert", "Sawade", "Behrens", "Lammert", "T29",
                "Lammert", "Hofreiter", "Bulmahn", "T3", "Bulmahn", "Beckmeyer", "Petzold", "Bulmahn",
            ]
        );
        // Unresolved topic 30 adds nothing.
        assert!(!shape(&merged).contains(&"T30".to_string()));

        // Halves still tile the debate body.
        let mut rebuilt = String::new();
        let mut first = None;
        for item in &merged {
            if let DebateItem::Contribution(c) = item {
                first.get_or_insert(c.range.start);
                rebuilt.push_str(&doc.debate()[c.range.start..c.speech.start]);
                rebuilt.push_str(&c.text);
            }
        }
        assert_eq!(rebuilt, doc.debate()[first.unwrap()..]);
    }
}
