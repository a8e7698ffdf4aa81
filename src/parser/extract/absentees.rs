use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::parser::model::{AbsenceReason, Absentee};
use crate::parser::text::group;

static LIST_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r?\nAnlage\s\d+\s*\r?\n\s*Liste der entschuldigten Abgeordneten").unwrap()
});
static LIST_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r?\nAnlage\s\d+|\s*\d+\s+Deutscher Bundestag –").unwrap()
});
static ABSENTEE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?mR)^(?P<last_name>[\w-]+)(?: \((?P<electorate>[^()\r\n]+)\))?, ",
        r"(?P<titles>(?:\w{1,2}\. )+)?(?P<first_name>[\w-]+)[ \t]*(?P<marker>\*+)?[ \t]*\r?\n",
        r"(?P<party>[\w/ ]+?)[ \t]*$",
    ))
    .unwrap()
});
static REASON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^(\*+)[ \t]*([\w ]+)").unwrap());

/// Locate the excused-members table; the table of contents may name it too,
/// so the last heading wins.
fn list_slice(postamble: &str) -> Option<&str> {
    let start = LIST_START_RE.find_iter(postamble).last()?.end();
    let rest = &postamble[start..];
    let end = LIST_END_RE.find(rest).map_or(rest.len(), |m| m.start());
    Some(&rest[..end])
}

pub fn extract(postamble: &str) -> (Vec<Absentee>, Vec<AbsenceReason>) {
    let Some(slice) = list_slice(postamble) else {
        warn!("no list of excused members found");
        return (Vec::new(), Vec::new());
    };

    let absentees = ABSENTEE_RE
        .captures_iter(slice)
        .map(|c| Absentee {
            last_name: c["last_name"].to_string(),
            first_name: c["first_name"].to_string(),
            titles: group(&c, "titles"),
            electorate: group(&c, "electorate"),
            party: c["party"].trim().to_string(),
            reason_marker: group(&c, "marker"),
        })
        .collect();

    let reasons = REASON_RE
        .captures_iter(slice)
        .map(|c| AbsenceReason {
            marker: c[1].to_string(),
            reason: c[2].trim().to_string(),
        })
        .collect();

    (absentees, reasons)
}

// ── Tests ──
