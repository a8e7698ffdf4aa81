use std::sync::LazyLock;

use regex::{Match, Regex};

use super::error::ParseError;
use super::model::Span;

pub(crate) static BEGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^[ \t]*Beginn:[ \t]*(\d{1,2})[.:](\d{2})[^\r\n]*?Uhr[ \t]*$").unwrap()
});
pub(crate) static END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^[ \t]*\(Schluss:[ \t]*(\d{1,2})[.:](\d{2})[^\r\n]*?Uhr\)\.?[ \t]*$").unwrap()
});

/// A sanitized transcript split into preamble, debate and postamble.
///
/// The `Beginn` line closes the preamble and the `Schluss` line opens the
/// postamble, so the three spans cover the text without gaps.
#[derive(Debug, Clone)]
pub struct RawDocument {
    text: String,
    preamble: Span,
    debate: Span,
    postamble: Span,
}

impl RawDocument {
    pub fn segment(text: String) -> Result<Self, ParseError> {
        let begin = single_anchor(&BEGIN_RE, &text, "session start (Beginn)")?;
        let end = single_anchor(&END_RE, &text, "session end (Schluss)")?;
        if end.start() < begin.end() {
            return Err(ParseError::MalformedDocument(
                "session end precedes session start".into(),
            ));
        }

        let preamble = Span::new(0, begin.end());
        let debate = Span::new(begin.end(), end.start());
        let postamble = Span::new(end.start(), text.len());
        Ok(RawDocument {
            text,
            preamble,
            debate,
            postamble,
        })
    }

    pub fn spans(&self) -> (Span, Span, Span) {
        (self.preamble, self.debate, self.postamble)
    }

    pub fn preamble(&self) -> &str {
        &self.text[self.preamble.start..self.preamble.end]
    }

    pub fn debate(&self) -> &str {
        &self.text[self.debate.start..self.debate.end]
    }

    pub fn postamble(&self) -> &str {
        &self.text[self.postamble.start..self.postamble.end]
    }
}

/// Split a transcript into `(preamble, debate, postamble)`.
pub fn segment(text: &str) -> Result<(String, String, String), ParseError> {
    let doc = RawDocument::segment(text.to_string())?;
    Ok((
        doc.preamble().to_string(),
        doc.debate().to_string(),
        doc.postamble().to_string(),
    ))
}

fn single_anchor<'t>(re: &Regex, text: &'t str, what: &str) -> Result<Match<'t>, ParseError> {
    let mut hits = re.find_iter(text);
    let first = hits
        .next()
        .ok_or_else(|| ParseError::MalformedDocument(format!("missing {} line", what)))?;
    if hits.next().is_some() {
        return Err(ParseError::MalformedDocument(format!(
            "{} line occurs more than once",
            what
        )));
    }
    Ok(first)
}

// ── Tests ──
