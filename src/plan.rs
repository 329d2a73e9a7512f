//! Turns the free-form plan text returned by `POST /ai/plan` into day blocks.

use crate::models::PlanDay;
use regex::Regex;
use std::sync::OnceLock;

fn block_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid block separator"))
}

fn day_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"(?i)^day\s+([0-9]+)").expect("valid day header"))
}

/// Splits `text` into blank-line separated blocks. A block whose first line
/// reads `Day N` opens day `N`; any other block continues the open day, or
/// opens the next sequential day when none is open yet.
///
/// Day numbers are kept exactly as written, duplicates and gaps included.
pub fn parse_plan(text: &str) -> Vec<PlanDay> {
    let mut days: Vec<PlanDay> = Vec::new();

    for block in block_separator().split(text) {
        let lines: Vec<String> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let Some(first) = lines.first() else {
            continue;
        };

        if let Some(day) = header_day(first) {
            days.push(PlanDay {
                day,
                items: lines[1..].to_vec(),
            });
            continue;
        }

        match days.last_mut() {
            Some(open) => open.items.extend(lines),
            None => days.push(PlanDay {
                day: 1,
                items: lines,
            }),
        }
    }

    days
}

/// Day numbers too large for `u32` saturate, so a header always opens a day.
fn header_day(line: &str) -> Option<u32> {
    let digits = day_header().captures(line)?.get(1)?.as_str();
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// Inverse of [`parse_plan`] for display, copy and download.
pub fn render_plan(days: &[PlanDay]) -> String {
    days.iter()
        .map(|day| {
            std::iter::once(format!("Day {}", day.day))
                .chain(day.items.iter().cloned())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Closing lines phrased as a question are shown as a reflection prompt.
pub fn is_reflection(day: &PlanDay, index: usize) -> bool {
    if index + 1 != day.items.len() {
        return false;
    }
    let line = day.items[index].as_str();
    let lower = line.to_ascii_lowercase();
    line.ends_with('?') || lower.starts_with("what") || lower.starts_with("how")
}
