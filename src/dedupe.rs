//! # Display Titles
//!
//! Turns the history into render-ready entries whose titles are unique.
//!
//! ## Algorithm
//!
//! Records are walked in submission order. A title not seen yet is used as
//! is. A repeated title gets the smallest `n >= 1` such that `title(n)` is
//! still free, so `["Map", "Map(1)", "Map"]` becomes
//! `["Map", "Map(1)", "Map(2)"]`.
//!
//! Because every output title is unique, running the pass again over its
//! own output changes nothing.
//!
//! Display titles are computed per render and never written back to the
//! history.

use serde::Serialize;
use std::collections::HashSet;

use crate::history::{JobId, PrintJobRecord};
use crate::options::OutputFormat;

/// Filename extension for an output format. Unknown formats fall back to `pdf`.
pub fn file_extension(format: &OutputFormat) -> &'static str {
    match format {
        OutputFormat::Pdf => "pdf",
        OutputFormat::Png32 | OutputFormat::Png8 => "png",
        OutputFormat::Jpg => "jpg",
        OutputFormat::Gif => "gif",
        OutputFormat::Eps => "eps",
        OutputFormat::Svg => "svg",
        OutputFormat::Svgz => "svgz",
        OutputFormat::Aix => "aix",
        OutputFormat::Other(_) => "pdf",
    }
}

/// Make every title unique, preserving order.
pub fn dedupe_titles<'a, I>(titles: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for title in titles {
        let assigned = if used.contains(title) {
            let mut n = 1usize;
            loop {
                let candidate = format!("{}({})", title, n);
                if !used.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            }
        } else {
            title.to_string()
        };
        used.insert(assigned.clone());
        out.push(assigned);
    }

    out
}

/// Which indicator a result entry shows. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultIndicator {
    InProgress,
    Error,
    OpenLink,
}

impl ResultIndicator {
    /// An error wins over everything else, even with no URL.
    pub fn for_record(record: &PrintJobRecord) -> Self {
        if record.error {
            ResultIndicator::Error
        } else if record.url.is_empty() {
            ResultIndicator::InProgress
        } else {
            ResultIndicator::OpenLink
        }
    }
}

/// A history record paired with its display title.
#[derive(Debug, Clone, Copy)]
pub struct DisplayEntry<'a> {
    pub record: &'a PrintJobRecord,
    display_title: &'a str,
}

impl<'a> DisplayEntry<'a> {
    pub fn display_title(&self) -> &'a str {
        self.display_title
    }

    pub fn indicator(&self) -> ResultIndicator {
        ResultIndicator::for_record(self.record)
    }

    /// `"{display_title}.{ext}"`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.display_title(), file_extension(&self.record.format))
    }

    pub fn to_result(&self) -> ResultEntry {
        ResultEntry {
            id: self.record.id,
            display_title: self.display_title().to_string(),
            file_name: self.file_name(),
            url: self.record.url.clone(),
            indicator: self.indicator(),
        }
    }
}

/// Owned, serializable form of a [`DisplayEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub id: JobId,
    pub display_title: String,
    pub file_name: String,
    pub url: String,
    pub indicator: ResultIndicator,
}

/// Display titles for a sequence of records, stored alongside them.
///
/// Kept separate from the entries so the titles can be borrowed.
#[derive(Debug)]
pub struct Deduped<'a> {
    records: &'a [PrintJobRecord],
    titles: Vec<String>,
}

impl Deduped<'_> {
    pub fn entries(&self) -> impl Iterator<Item = DisplayEntry<'_>> {
        self.records
            .iter()
            .zip(self.titles.iter())
            .map(|(record, title)| DisplayEntry {
                record,
                display_title: title,
            })
    }
}

/// Pair each record with a unique display title.
pub fn dedupe(records: &[PrintJobRecord]) -> Deduped<'_> {
    let titles = dedupe_titles(records.iter().map(|r| r.title.as_str()));
    Deduped { records, titles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::JobOutcome;
    use crate::history::PrintHistory;
    use pretty_assertions::assert_eq;

    fn titles(input: &[&str]) -> Vec<String> {
        dedupe_titles(input.iter().copied())
    }

    #[test]
    fn test_repeated_titles() {
        assert_eq!(titles(&["Map", "Map", "Map"]), vec!["Map", "Map(1)", "Map(2)"]);
    }

    #[test]
    fn test_skips_already_used_suffix() {
        assert_eq!(titles(&["Map", "Map(1)", "Map"]), vec!["Map", "Map(1)", "Map(2)"]);
    }

    #[test]
    fn test_unique_titles_unchanged() {
        assert_eq!(titles(&["A", "B", "C"]), vec!["A", "B", "C"]);
        assert!(titles(&[]).is_empty());
    }

    #[test]
    fn test_empty_title_repeats() {
        assert_eq!(titles(&["", ""]), vec!["", "(1)"]);
    }

    #[test]
    fn test_output_unique_and_idempotent() {
        let cases: &[&[&str]] = &[
            &["Map", "Map", "Map(1)", "Map", "Map(1)"],
            &["a", "a(1)", "a(1)", "a", "a(2)", "a"],
            &["x(1)", "x", "x", "x(1)"],
        ];
        for case in cases {
            let once = titles(case);
            let unique: HashSet<&String> = once.iter().collect();
            assert_eq!(unique.len(), once.len(), "duplicates in {:?}", once);

            let twice = dedupe_titles(once.iter().map(String::as_str));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_extensions() {
        assert_eq!(file_extension(&OutputFormat::Pdf), "pdf");
        assert_eq!(file_extension(&OutputFormat::Png32), "png");
        assert_eq!(file_extension(&OutputFormat::Png8), "png");
        assert_eq!(file_extension(&OutputFormat::Jpg), "jpg");
        assert_eq!(file_extension(&OutputFormat::Gif), "gif");
        assert_eq!(file_extension(&OutputFormat::Eps), "eps");
        assert_eq!(file_extension(&OutputFormat::Svg), "svg");
        assert_eq!(file_extension(&OutputFormat::Svgz), "svgz");
        assert_eq!(file_extension(&OutputFormat::Aix), "aix");
        assert_eq!(file_extension(&OutputFormat::parse("aix")), "aix");
        assert_eq!(file_extension(&OutputFormat::parse("TIFF")), "pdf");
    }

    #[test]
    fn test_indicator_states() {
        let mut history = PrintHistory::new();
        let pending = history.append(OutputFormat::Pdf, "p");
        let ok = history.append(OutputFormat::Pdf, "ok");
        let failed = history.append(OutputFormat::Pdf, "err");
        history.resolve(
            ok,
            &JobOutcome::Success {
                url: "https://x/ok.pdf".to_string(),
            },
        );
        history.resolve(
            failed,
            &JobOutcome::Failure {
                cause: "boom".to_string(),
            },
        );

        let indicator = |id| ResultIndicator::for_record(history.get(id).unwrap());
        assert_eq!(indicator(pending), ResultIndicator::InProgress);
        assert_eq!(indicator(ok), ResultIndicator::OpenLink);
        assert_eq!(indicator(failed), ResultIndicator::Error);
    }

    #[test]
    fn test_dedupe_records_does_not_touch_history() {
        let mut history = PrintHistory::new();
        history.append(OutputFormat::Png8, "Map");
        history.append(OutputFormat::Jpg, "Map");

        let deduped = dedupe(history.records());
        let names: Vec<String> = deduped.entries().map(|e| e.file_name()).collect();
        assert_eq!(names, vec!["Map.png", "Map(1).jpg"]);

        // Raw titles stay as requested.
        assert_eq!(history.records()[1].title, "Map");
    }
}
