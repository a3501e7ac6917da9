//! Session pairing and daily summaries: the algorithmic core.
//!
//! A day's events per identity are walked chronologically holding at most
//! one open checkin. Historical data edited outside the gate may contain
//! double check-ins (the later one wins as session start) and dangling
//! checkouts (ignored); the walk tolerates both. Whatever is still open at
//! the end of the walk is closed by the requested rule.
//!
//! The engine is pure: it never touches the database. Synthetic checkouts
//! demanded by a write-back policy are returned to the caller, which appends
//! them through the ledger.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::day_summary::DailySummary;
use crate::models::event::Event;
use crate::models::event_kind::EventKind;
use crate::models::identity::Identity;
use crate::models::policy::ClosePolicy;
use crate::models::session::Session;
use crate::utils::time::{end_of_day, hour_on, hours_2dp, start_of_day};

/// How to treat a session still open at the end of the day's events.
pub enum CloseRule {
    /// Apply an auto-close policy (None / CapAt / WriteAt / Hybrid).
    /// With `write_back: false` the policy instant is still computed but the
    /// session stays an estimate and no synthetic event is produced — the
    /// pure "preview" reading of a summary.
    Policy {
        policy: ClosePolicy,
        write_back: bool,
    },
    /// Virtual close at the given instant (clamped to the day), nothing
    /// written. The "hours worked so far" variant.
    LiveAt(NaiveDateTime),
}

/// Result of summarizing one day.
pub struct DayOutcome {
    pub summaries: Vec<DailySummary>,
    /// Synthetic checkouts a write-back policy fabricated. The caller must
    /// append these to the ledger for the summary to stay truthful.
    pub synthetic: Vec<Event>,
}

/// What the close rule did to a trailing open session.
struct Closed {
    session: Session,
    write_back: Option<NaiveDateTime>,
    estimated: bool,
}

/// Pair one identity's day of events into sessions, leaving at most one
/// trailing open session. Events must already be day-filtered; they are
/// re-sorted by (at, id) defensively.
pub fn pair_events(events: &[Event]) -> Vec<Session> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| (e.at, e.id));

    let mut sessions: Vec<Session> = Vec::new();
    let mut open: Option<NaiveDateTime> = None;

    for ev in sorted {
        match ev.kind {
            EventKind::Checkin => {
                // a second checkin replaces the marker: the latest one is
                // the session start
                open = Some(ev.at);
            }
            EventKind::Checkout => {
                if let Some(in_at) = open.take() {
                    sessions.push(Session::spanning(in_at, ev.at, true, ev.synthetic));
                }
                // dangling checkout: no open marker, nothing to close
            }
        }
    }

    if let Some(in_at) = open {
        sessions.push(Session::open(in_at));
    }

    sessions
}

fn close_open_session(in_at: NaiveDateTime, date: NaiveDate, rule: &CloseRule) -> Closed {
    match rule {
        CloseRule::LiveAt(now) => {
            let virtual_out = (*now).clamp(start_of_day(date), end_of_day(date));
            Closed {
                session: Session::spanning(in_at, virtual_out, false, false),
                write_back: None,
                // a live close is a point-in-time reading, not a policy
                estimated: false,
            }
        }
        CloseRule::Policy { policy, write_back } => {
            let instant = match *policy {
                ClosePolicy::None => None,
                ClosePolicy::CapAt { hour } | ClosePolicy::WriteAt { hour } => {
                    Some(hour_on(date, hour).max(in_at))
                }
                ClosePolicy::Hybrid {
                    cutoff_hour,
                    eod_hour,
                    eod_minute,
                    after_minutes,
                } => {
                    let cutoff = hour_on(date, cutoff_hour);
                    let eod = date
                        .and_hms_opt(eod_hour, eod_minute, 0)
                        .unwrap_or_else(|| end_of_day(date));

                    // forgot to check out: assume they left at closing time.
                    // A checkin near or past the cutoff gets a short grace
                    // window instead, capped to the end of the day.
                    let grace = in_at + chrono::Duration::minutes(after_minutes);
                    let out = cutoff.max(grace).min(eod);
                    Some(out.max(in_at))
                }
            };

            match instant {
                None => Closed {
                    session: Session::open(in_at),
                    write_back: None,
                    estimated: false,
                },
                Some(out) if *write_back && policy.writes_back() => Closed {
                    session: Session::spanning(in_at, out, true, true),
                    write_back: Some(out),
                    estimated: true,
                },
                Some(out) => Closed {
                    // read-time estimate only
                    session: Session::spanning(in_at, out, false, false),
                    write_back: None,
                    estimated: true,
                },
            }
        }
    }
}

/// Build per-identity summaries for one day.
///
/// - `events` — that day's ledger slice (any identities);
/// - `roster` — active identities; members with zero events that day get an
///   `absent` summary;
/// - `rule` — what happens to sessions left open.
///
/// Display names on summaries come from the day's event snapshots (reports
/// must show the name as it was), falling back to the roster for absentees.
pub fn summarize_day(
    events: &[Event],
    roster: &[Identity],
    date: NaiveDate,
    rule: &CloseRule,
) -> DayOutcome {
    // group by identity, preserving ledger order within each group
    let mut by_identity: BTreeMap<&str, Vec<&Event>> = BTreeMap::new();
    for ev in events {
        by_identity
            .entry(ev.identity_id.as_str())
            .or_default()
            .push(ev);
    }

    let mut summaries = Vec::new();
    let mut synthetic = Vec::new();

    for (identity_id, evs) in &by_identity {
        let owned: Vec<Event> = evs.iter().map(|e| (*e).clone()).collect();
        let mut sessions = pair_events(&owned);
        let mut autoclosed = false;

        if let Some(last) = sessions.last() {
            if !last.closed && last.out_at.is_none() {
                let in_at = last.in_at;
                let closed = close_open_session(in_at, date, rule);
                autoclosed = closed.estimated;

                if let Some(out) = closed.write_back {
                    let name = snapshot_name(&owned);
                    synthetic.push(Event::synthetic_checkout(identity_id, &name, out));
                }

                let n = sessions.len();
                sessions[n - 1] = closed.session;
            }
        }

        // sessions already closed by a persisted synthetic checkout count
        // too: the flag reports the presence of auto-closes, not whether
        // this particular query produced them
        autoclosed = autoclosed || sessions.iter().any(|s| s.synthetic_out);

        let total_minutes: i64 = sessions
            .iter()
            .filter(|s| s.out_at.is_some())
            .map(Session::minutes)
            .sum();

        summaries.push(DailySummary {
            identity_id: identity_id.to_string(),
            display_name: snapshot_name(&owned),
            sessions,
            total_minutes,
            total_hours: hours_2dp(total_minutes),
            autoclosed,
            absent: false,
        });
    }

    // roster members with no events that day: absence is a first-class state
    for identity in roster {
        if !by_identity.contains_key(identity.id.as_str()) {
            summaries.push(DailySummary::absent(&identity.id, &identity.display_name));
        }
    }

    summaries.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    DayOutcome {
        summaries,
        synthetic,
    }
}

/// Name as it was that day: snapshot from the last event carrying one.
fn snapshot_name(events: &[Event]) -> String {
    events
        .iter()
        .rev()
        .map(|e| e.display_name.clone())
        .find(|n| !n.is_empty())
        .unwrap_or_default()
}
