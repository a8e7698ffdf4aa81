use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::parser::model::{Contribution, Span, Speaker};
use crate::parser::text::group;

static SPEAKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?mR)^[ \t]*",
        r"(?:(?P<role>(?:Alters|Vize)?[Pp]räsident(?:in)?) )?",
        r"(?P<titles>(?:\w{1,2}\. )*)",
        r"(?P<first_name>[\w-]+) (?P<last_name>[\w-]+) ?",
        r"(?:\((?P<electorate>[^()\r\n]+)\) )?",
        r"(?:\((?P<party>[^()\r\n]*)\))?",
        r"(?:,(?P<position>[\w ,./-]+))?",
        r":[ \t]*$",
    ))
    .unwrap()
});

/// Parse one announcement line, ignoring the validity filter.
pub fn parse_speaker(line: &str) -> Option<Speaker> {
    SPEAKER_RE.captures(line).map(|c| speaker_from(&c))
}

fn speaker_from(caps: &Captures<'_>) -> Speaker {
    Speaker {
        role: group(caps, "role"),
        titles: group(caps, "titles"),
        first_name: caps["first_name"].to_string(),
        last_name: caps["last_name"].to_string(),
        party: group(caps, "party"),
        electorate: group(caps, "electorate"),
        position: group(caps, "position"),
        identity: None,
    }
}

/// Quoted dialogue and stray "Word word:" lines look like announcements too.
pub fn is_valid(speaker: &Speaker) -> bool {
    let ok = |name: &str| {
        name.chars().count() >= 2 && name.chars().next().is_some_and(char::is_uppercase)
    };
    ok(&speaker.first_name) && ok(&speaker.last_name)
}

/// Slice the debate body into speaker turns, in document order.
pub fn extract(debate: &str) -> Vec<Contribution> {
    let announcements: Vec<(usize, usize, Speaker)> = SPEAKER_RE
        .captures_iter(debate)
        .filter_map(|caps| {
            let m = caps.get(0).unwrap();
            let speaker = speaker_from(&caps);
            if is_valid(&speaker) {
                Some((m.start(), m.end(), speaker))
            } else {
                debug!(line = m.as_str().trim(), "discarding invalid speaker candidate");
                None
            }
        })
        .collect();

    let mut contributions = Vec::with_capacity(announcements.len());
    for (i, (start, speech_start, speaker)) in announcements.iter().enumerate() {
        let end = announcements
            .get(i + 1)
            .map_or(debate.len(), |(next, _, _)| *next);
        contributions.push(Contribution {
            speaker: speaker.clone(),
            text: debate[*speech_start..end].to_string(),
            range: Span::new(*start, end),
            speech: Span::new(*speech_start, end),
        });
    }
    contributions
}

// ── Tests ──
