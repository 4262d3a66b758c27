//! Output formatting for substring results, threads and relationships

use crate::relationship::{CommRelationship, Relationship};
use crate::search::{CommonSubstrings, SupermaximalRepeat};
use crate::thread::{Thread, ThreadSet};
use crate::utils::TimeInterval;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Colored stdout, or plain when `color` is off
pub fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print each input with its first occurrence of every common substring
/// highlighted, followed by the substrings themselves
pub fn print_common_substrings<W: WriteColor>(
    out: &mut W,
    inputs: &[String],
    result: &CommonSubstrings,
) -> io::Result<()> {
    for input in inputs {
        match result.substrings.iter().find_map(|s| find_nonempty(input, s)) {
            Some((start, end)) => print_highlighted(out, input, start, end)?,
            None => writeln!(out, "{}", input)?,
        }
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{}", result.length)?;
    out.reset()?;
    writeln!(out, " chars, {} substring(s)", result.substrings.len())?;

    for substring in &result.substrings {
        writeln!(out, "{:?}", substring)?;
    }
    Ok(())
}

fn find_nonempty(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    haystack.find(needle).map(|start| (start, start + needle.len()))
}

/// Print a line with the byte range `start..end` highlighted
fn print_highlighted<W: WriteColor>(
    out: &mut W,
    content: &str,
    start: usize,
    end: usize,
) -> io::Result<()> {
    write!(out, "{}", &content[..start])?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "{}", &content[start..end])?;
    out.reset()?;
    writeln!(out, "{}", &content[end..])
}

pub fn print_repeats<W: WriteColor>(out: &mut W, repeats: &[SupermaximalRepeat]) -> io::Result<()> {
    for repeat in repeats {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}..={}", repeat.ranks.start(), repeat.ranks.end())?;
        out.reset()?;
        write!(out, " x{} in {} source(s): ", repeat.occurrences(), repeat.source_count)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        writeln!(out, "{:?}", repeat.text)?;
        out.reset()?;
    }
    Ok(())
}

/// Print threads of at least `min_size` messages, one block per thread
pub fn print_threads<W: WriteColor>(
    out: &mut W,
    threads: &ThreadSet<'_>,
    min_size: usize,
) -> io::Result<()> {
    let mut shown = 0;
    for thread in threads.with_min_size(min_size) {
        if shown > 0 {
            writeln!(out)?;
        }
        print_thread(out, thread)?;
        shown += 1;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    writeln!(
        out,
        "{} thread(s) shown, {} total, {} threaded message(s)",
        shown,
        threads.len(),
        threads.threaded_count()
    )?;
    out.reset()
}

fn print_thread<W: WriteColor>(out: &mut W, thread: &Thread<'_>) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(out, "thread of {} message(s)", thread.len())?;
    out.reset()?;

    for msg in thread.messages() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        match msg.timestamp {
            Some(t) => write!(out, "{}", t.to_rfc3339())?,
            None => write!(out, "-")?,
        }
        out.reset()?;
        write!(out, " {} ", msg.id)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "{}", msg.sender)?;
        out.reset()?;
        writeln!(out, " -> {}: {}", msg.to.join(", "), msg.subject)?;
    }
    Ok(())
}

/// Machine-readable view of one thread
#[derive(Debug, Serialize)]
pub struct ThreadSummary<'a> {
    pub message_ids: Vec<&'a str>,
    pub senders: BTreeMap<&'a str, usize>,
}

impl<'a> From<&Thread<'a>> for ThreadSummary<'a> {
    fn from(thread: &Thread<'a>) -> Self {
        Self {
            message_ids: thread.message_ids(),
            senders: thread.count_by_sender().into_iter().collect(),
        }
    }
}

pub fn thread_summaries<'a>(threads: &ThreadSet<'a>, min_size: usize) -> Vec<ThreadSummary<'a>> {
    threads.with_min_size(min_size).map(ThreadSummary::from).collect()
}

/// Write `value` as pretty JSON followed by a newline
pub fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Counts of one relationship, overall and per participant
///
/// `threaded` holds the threaded message count of each participant in
/// [`Relationship::participants`] order.
pub fn print_relationship<W: WriteColor>(
    out: &mut W,
    relationship: &Relationship,
    threaded: [usize; 2],
    interval: Option<&TimeInterval>,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(out, "{}", relationship)?;
    out.reset()?;
    writeln!(
        out,
        "{} message(s), {} direct, {} indirect",
        relationship.message_count(interval),
        relationship.direct_count(interval),
        relationship.indirect_count(interval)
    )?;

    let (a, b) = relationship.participants();
    for (sender, threaded) in [a, b].into_iter().zip(threaded) {
        let Ok(side) = relationship.outbound(sender) else { continue };
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "  {}", sender)?;
        out.reset()?;
        writeln!(
            out,
            ": sent {}, direct {}, indirect {}, threaded {}",
            side.message_count(interval),
            side.direct_count(interval),
            side.indirect_count(interval),
            threaded
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{longest_common_substrings, supermaximal_repeats};
    use termcolor::NoColor;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>,
    {
        let mut out = NoColor::new(Vec::new());
        f(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_print_common_substrings() {
        let inputs = vec!["banana".to_string(), "ananas".to_string()];
        let result = longest_common_substrings(&inputs);
        let text = render(|out| print_common_substrings(out, &inputs, &result));

        assert_eq!(text, "banana\nananas\n5 chars, 1 substring(s)\n\"anana\"\n");
    }

    #[test]
    fn test_print_repeats() {
        let repeats = supermaximal_repeats(&["banana"]);
        let text = render(|out| print_repeats(out, &repeats));
        assert!(text.contains("x2 in 1 source(s): \"ana\""));
    }

    #[test]
    fn test_print_json() {
        let mut out = Vec::new();
        print_json(&mut out, &vec!["a", "b"]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\n  \"a\",\n  \"b\"\n]\n");
    }
}
