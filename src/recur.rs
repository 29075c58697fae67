//! Recurrence rules: turning a card's `recurs` tag into a new due date.
//!
//! A tag is a unit letter followed by a count, taken from a label such as
//! `rrd7` (every 7 days), `rrm3` (every 3 months) or `rry1` (yearly).

use std::fmt;

use chrono::{Days, Months, NaiveDateTime};

use crate::error::TrelloError;
use crate::model::board::Card;
use crate::providers::{BoardApi, RawResponse};

/// Trello's due date format. Parsing and formatting round-trip exactly.
pub const DUE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Days,
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub unit: Unit,
    pub count: u32,
}

impl Interval {
    /// Parse a tag like `d7`. Returns `None` for unknown units or counts.
    pub fn parse(tag: &str) -> Option<Self> {
        let mut chars = tag.chars();
        let unit = match chars.next()? {
            'd' => Unit::Days,
            'm' => Unit::Months,
            'y' => Unit::Years,
            _ => return None,
        };
        let count = chars.as_str();
        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            unit,
            count: count.parse().ok()?,
        })
    }

    /// Add this interval to `from`. Months and years clamp to the end of
    /// the target month, so Jan 31 + 1 month lands on the last day of February.
    pub fn advance(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            Unit::Days => from.checked_add_days(Days::new(u64::from(self.count))),
            Unit::Months => from.checked_add_months(Months::new(self.count)),
            Unit::Years => from.checked_add_months(Months::new(self.count.checked_mul(12)?)),
        }
    }
}

pub fn parse_due(due: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(due, DUE_FORMAT).ok()
}

pub fn format_due(due: NaiveDateTime) -> String {
    due.format(DUE_FORMAT).to_string()
}

/// Why a card was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoRecurringLabel,
    NoDueDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoRecurringLabel => f.write_str("had no known recurring label"),
            SkipReason::NoDueDate => f.write_str("has no due date and cannot recur"),
        }
    }
}

/// What a card's next due date would be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextDue {
    Due(String),
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Updated { due: String, response: RawResponse },
    Skipped(SkipReason),
}

/// Compute the next due date for `card`, or the reason it has none.
pub fn next_due(card: &Card) -> Result<NextDue, TrelloError> {
    let Some(tag) = card.recurs.as_deref() else {
        return Ok(NextDue::Skip(SkipReason::NoRecurringLabel));
    };
    let Some(due) = card.due.as_deref() else {
        return Ok(NextDue::Skip(SkipReason::NoDueDate));
    };
    let Some(interval) = Interval::parse(tag) else {
        return Ok(NextDue::Skip(SkipReason::NoRecurringLabel));
    };
    let parsed = parse_due(due).ok_or_else(|| TrelloError::InvalidDueDate {
        card: card.name.clone(),
        due: due.to_string(),
    })?;
    let advanced = interval
        .advance(parsed)
        .ok_or_else(|| TrelloError::DueDateOutOfRange {
            card: card.name.clone(),
            due: due.to_string(),
        })?;
    Ok(NextDue::Due(format_due(advanced)))
}

/// Push the card's due date forward by its recurrence interval.
pub async fn tick_recurring_card<A: BoardApi + ?Sized>(
    api: &A,
    card: &Card,
) -> Result<TickOutcome, TrelloError> {
    match next_due(card)? {
        NextDue::Due(due) => {
            tracing::info!(card = %card.name, %due, "advancing due date");
            let response = api.update_card_attribute(card, "due", &due).await?;
            Ok(TickOutcome::Updated { due, response })
        }
        NextDue::Skip(reason) => {
            tracing::warn!("card |{}| {}", card.name, reason);
            Ok(TickOutcome::Skipped(reason))
        }
    }
}
