use anyhow::{bail, Context, Result};
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};
use timebook::domain::{phases_for_project, BookingDraft, Project};
use timebook::duration::{format_duration, format_hours, parse_duration, validate_booking_minutes};
use timebook::matcher::highlight_positions;
use timebook::{AcceptKey, Candidate, DurationError, KeyOutcome, SearchSelect};

use crate::cli::SearchKind;
use crate::config::Catalog;

/// One line per input; `Ok` only if every input is bookable.
pub fn parse_report(inputs: &[String]) -> (String, bool) {
    let mut lines = Vec::with_capacity(inputs.len());
    let mut all_bookable = true;

    for input in inputs {
        let parsed = parse_duration(input);
        let line = match validate_booking_minutes(parsed) {
            Ok(minutes) => format!(
                "{input:?} -> {minutes} min ({}, {})",
                format_duration(minutes),
                format_hours(minutes)
            ),
            Err(err @ DurationError::BelowMinimum(minutes)) => {
                all_bookable = false;
                format!("{input:?} -> {minutes} min, not bookable: {err}")
            }
            Err(DurationError::Unparsable) => {
                all_bookable = false;
                format!("{input:?} -> unparsable")
            }
        };
        lines.push(line);
    }

    (terminated(lines), all_bookable)
}

pub fn search_report(
    catalog: &Catalog,
    kind: SearchKind,
    query: &str,
    project: Option<&str>,
) -> Result<String> {
    match kind {
        SearchKind::Projects => Ok(render_matches(catalog.projects.clone(), query)),
        SearchKind::Phases => {
            let phases = match project {
                Some(project_query) => {
                    let project = resolve(catalog.projects.clone(), project_query, "project")?;
                    phases_for_project(&catalog.phases, &project.id)
                }
                None => catalog.phases.clone(),
            };
            Ok(render_matches(phases, query))
        }
    }
}

pub fn book_report(
    catalog: &Catalog,
    project_query: &str,
    phase_query: &str,
    duration: &str,
    date: Date,
    json: bool,
) -> Result<String> {
    let project: Project = resolve(catalog.projects.clone(), project_query, "project")?;
    let phases = phases_for_project(&catalog.phases, &project.id);
    let phase = resolve(phases, phase_query, "phase")
        .with_context(|| format!("Looking up phase of {}", project.name))?;

    let draft = BookingDraft {
        date,
        project: Some(project),
        phase: Some(phase),
        duration_text: duration.to_string(),
    };
    let booking = draft.validate()?;

    if json {
        return Ok(serde_json::to_string_pretty(&booking)?);
    }
    Ok(format!(
        "Booked {} ({}) on {}: {} / {}",
        format_duration(booking.minutes()),
        format_hours(booking.minutes()),
        booking.date(),
        booking.project().name,
        booking.phase().name
    ))
}

/// Parse `YYYY-MM-DD`, or today's local date when absent.
pub fn booking_date(date: Option<&str>) -> Result<Date> {
    match date {
        Some(text) => Date::parse(text, format_description!("[year]-[month]-[day]"))
            .with_context(|| format!("Invalid date '{text}', expected YYYY-MM-DD")),
        None => {
            let now = OffsetDateTime::now_utc();
            let local = match UtcOffset::current_local_offset() {
                Ok(offset) => now.to_offset(offset),
                Err(_) => now,
            };
            Ok(local.date())
        }
    }
}

/// Pick a candidate the way a user would: exact id, otherwise type the query
/// into a select and press Enter.
fn resolve<C>(candidates: Vec<C>, query: &str, what: &str) -> Result<C>
where
    C: Candidate + Clone,
    C::Id: AsRef<str>,
{
    if let Some(exact) = candidates.iter().find(|c| c.id().as_ref() == query) {
        return Ok(exact.clone());
    }

    let mut select = SearchSelect::new(candidates);
    select.open();
    select.set_query(query);
    match select.accept(AcceptKey::Enter) {
        KeyOutcome::Consumed => select
            .selected()
            .cloned()
            .with_context(|| format!("No {what} selected for '{query}'")),
        KeyOutcome::PassThrough => bail!("No {what} matches '{query}'"),
    }
}

fn render_matches<C>(candidates: Vec<C>, query: &str) -> String
where
    C: Candidate,
    C::Id: AsRef<str>,
{
    let mut select = SearchSelect::new(candidates);
    select.open();
    select.set_query(query);

    let suggestion_id = select.suggestion().map(|c| c.id().as_ref().to_string());
    let mut lines = vec![format!(
        "{} of {} match {query:?}",
        select.match_count(),
        select.candidates().len()
    )];
    for candidate in select.matches() {
        let id = candidate.id().as_ref();
        let marker = if suggestion_id.as_deref() == Some(id) {
            ">"
        } else {
            " "
        };
        let label = highlight(
            candidate.label(),
            &highlight_positions(candidate.label(), query).unwrap_or_default(),
        );
        lines.push(format!("{marker} {label}  ({id})"));
    }
    if let Some(ghost) = select.inline_completion() {
        lines.push(format!("completion: {query}|{ghost}"));
    }
    terminated(lines)
}

/// Join report lines, each ending in a newline.
fn terminated(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// Wrap runs of highlighted chars in brackets: `[Str]ipe`.
fn highlight(label: &str, positions: &[usize]) -> String {
    let mut out = String::with_capacity(label.len() + 2 * positions.len());
    let mut open = false;
    for (index, c) in label.chars().enumerate() {
        let hit = positions.contains(&index);
        if hit && !open {
            out.push('[');
        } else if !hit && open {
            out.push(']');
        }
        open = hit;
        out.push(c);
    }
    if open {
        out.push(']');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimebookConfig;
    use time::macros::date;

    fn catalog() -> Catalog {
        TimebookConfig::default().catalog().unwrap()
    }

    fn strings(inputs: &[&str]) -> Vec<String> {
        inputs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_report_lists_each_input() {
        let (out, ok) = parse_report(&strings(&["1.5h", "2:30"]));
        assert!(ok);
        assert_eq!(
            out,
            "\"1.5h\" -> 90 min (1:30, 1.5h)\n\"2:30\" -> 150 min (2:30, 2.5h)\n"
        );
    }

    #[test]
    fn parse_report_flags_unusable_inputs() {
        let (out, ok) = parse_report(&strings(&["7", "abc", "30"]));
        assert!(!ok);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines[0],
            "\"7\" -> 0 min, not bookable: 0 minutes is below the 15 minute minimum"
        );
        assert_eq!(lines[1], "\"abc\" -> unparsable");
        assert_eq!(lines[2], "\"30\" -> 30 min (0:30, 0.5h)");
    }

    #[test]
    fn search_marks_suggestion_and_completion() {
        let out = search_report(&catalog(), SearchKind::Projects, "str", None).unwrap();
        assert_eq!(
            out,
            "1 of 5 match \"str\"\n> [Str]ipe  (stripe)\ncompletion: str|ipe\n"
        );
    }

    #[test]
    fn search_without_prefix_has_no_completion() {
        let out = search_report(&catalog(), SearchKind::Projects, "rcl", None).unwrap();
        assert!(out.contains("> Ve[rc]e[l]  (vercel)"));
        assert!(!out.contains("completion:"));
    }

    #[test]
    fn empty_search_lists_everything_without_suggestion() {
        let out = search_report(&catalog(), SearchKind::Projects, "", None).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "5 of 5 match \"\"");
        assert_eq!(lines[1], "  Anthropic  (anthropic)");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn phase_search_scoped_to_project() {
        let out = search_report(&catalog(), SearchKind::Phases, "d", Some("fig")).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "2 of 2 match \"d\"");
        assert_eq!(lines[1], "> [D]esign  (figma-design)");
        assert_eq!(lines[2], "  Han[d]off  (figma-handoff)");
    }

    #[test]
    fn phase_search_with_unknown_project_fails() {
        let err = search_report(&catalog(), SearchKind::Phases, "", Some("zzz")).unwrap_err();
        assert_eq!(err.to_string(), "No project matches 'zzz'");
    }

    #[test]
    fn book_resolves_by_query_and_id() {
        let catalog = catalog();
        let out =
            book_report(&catalog, "anth", "disc", "1.5", date!(2024 - 03 - 11), false).unwrap();
        assert_eq!(out, "Booked 1:30 (1.5h) on 2024-03-11: Anthropic / Discovery");

        let out = book_report(
            &catalog,
            "vercel",
            "vercel-build",
            "45m",
            date!(2024 - 03 - 11),
            false,
        )
        .unwrap();
        assert_eq!(out, "Booked 0:45 (0.75h) on 2024-03-11: Vercel / Build");
    }

    #[test]
    fn book_as_json() {
        let out = book_report(&catalog(), "str", "rev", "2h", date!(2024 - 03 - 12), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["minutes"], 120);
        assert_eq!(value["date"], "2024-03-12");
        assert_eq!(value["phase"]["id"], "stripe-review");
    }

    #[test]
    fn book_rejects_phase_of_other_project() {
        let err = book_report(&catalog(), "stripe", "disc", "1h", date!(2024 - 03 - 11), false)
            .unwrap_err();
        assert_eq!(err.to_string(), "Looking up phase of Stripe");
    }

    #[test]
    fn book_rejects_short_duration() {
        let err = book_report(&catalog(), "linear", "plan", "5m", date!(2024 - 03 - 11), false)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid duration: 0 minutes is below the 15 minute minimum"
        );
    }

    #[test]
    fn booking_date_parsing() {
        assert_eq!(booking_date(Some("2024-02-29")).unwrap(), date!(2024 - 02 - 29));
        assert!(booking_date(Some("29/02/2024")).is_err());
        assert!(booking_date(None).is_ok());
    }

    #[test]
    fn reports_end_every_line_with_newline() {
        assert_eq!(terminated(vec![]), "");
        assert_eq!(terminated(strings(&["a", "b"])), "a\nb\n");

        let (out, _) = parse_report(&strings(&["30"]));
        assert_eq!(out, "\"30\" -> 30 min (0:30, 0.5h)\n");
    }

    #[test]
    fn highlight_wraps_runs() {
        assert_eq!(highlight("Stripe", &[0, 1, 2]), "[Str]ipe");
        assert_eq!(highlight("Stripe", &[0, 5]), "[S]trip[e]");
        assert_eq!(highlight("Stripe", &[]), "Stripe");
    }
}
