pub mod align;
pub mod error;
pub mod extract;
pub mod locate;
pub mod model;
pub mod segments;
pub mod text;

use tracing::{debug, info};

use crate::directory::PersonDirectory;
pub use error::{Diagnostics, ParseError, Warning};
pub use model::*;
use segments::RawDocument;

#[derive(Debug, Default, Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Replaces whatever the transcript header says.
    pub electoral_period: Option<u32>,
    pub directory: Option<&'a PersonDirectory>,
}

/// Pipeline: sanitize → segment → metadata → agenda → locate → contributions
/// → align → absentees.
pub fn parse_transcript(raw: &str, options: &ParseOptions<'_>) -> Result<ParsedSession, ParseError> {
    let doc = RawDocument::segment(text::sanitize(raw))?;
    let mut metadata = extract::metadata::extract(doc.preamble(), doc.postamble())?;
    if let Some(ep) = options.electoral_period {
        metadata.electoral_period = Some(ep);
    }

    let mut diagnostics = Diagnostics::default();
    let summaries = extract::agenda::extract(doc.preamble());
    let agenda = locate::locate_agenda_discussions(doc.debate(), summaries, &mut diagnostics);

    let mut contributions = extract::speakers::extract(doc.debate());
    if let Some(directory) = options.directory {
        let resolved = directory.resolve_all(&mut contributions);
        debug!(resolved, total = contributions.len(), "speaker identities");
    }
    let debate = align::align(contributions, &agenda, &mut diagnostics);
    let (absentees, reasons) = extract::absentees::extract(doc.postamble());

    info!(
        session = metadata.session,
        topics = agenda.len(),
        items = debate.len(),
        absentees = absentees.len(),
        warnings = diagnostics.warnings().len(),
        "parsed transcript"
    );

    Ok(ParsedSession {
        metadata,
        agenda,
        debate,
        absentees,
        reasons,
        warnings: diagnostics.into_warnings(),
    })
}

// ── Tests ──
