//! Gap-based session segmentation
//!
//! Events are sorted by actor then time; a new session starts whenever the gap
//! since the previous event of the same actor exceeds the threshold, or there
//! is no previous event. A gap exactly equal to the threshold stays in the
//! same session.

use crate::types::Session;
use chrono::{DateTime, Duration, Utc};

/// Segment timestamped events into sessions per actor.
///
/// `events` are (actor, timestamp) pairs in any order; anonymous events
/// (actor `None`) form their own session stream. Empty input yields no
/// sessions.
pub fn segment_sessions(
    events: &[(Option<i64>, DateTime<Utc>)],
    gap: Duration,
) -> Vec<Session> {
    let mut ordered: Vec<&(Option<i64>, DateTime<Utc>)> = events.iter().collect();
    ordered.sort_by_key(|(user_id, time)| (*user_id, *time));

    let mut sessions: Vec<Session> = Vec::new();
    let mut current: Option<Session> = None;

    for &&(user_id, time) in &ordered {
        match current.as_mut() {
            Some(session)
                if session.user_id == user_id && time.signed_duration_since(session.end) <= gap =>
            {
                session.end = time;
                session.changes += 1;
            }
            _ => {
                if let Some(finished) = current.take() {
                    sessions.push(finished);
                }
                current = Some(Session {
                    user_id,
                    start: time,
                    end: time,
                    changes: 1,
                    duration_minutes: 0,
                });
            }
        }
    }

    if let Some(finished) = current.take() {
        sessions.push(finished);
    }

    for session in &mut sessions {
        session.duration_minutes = session.end.signed_duration_since(session.start).num_minutes();
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_minute(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
    }

    #[test]
    fn test_gap_splits_sessions() {
        // Events at t=0, t=29, t=61 with a 30-minute gap: two sessions,
        // {0, 29} and {61} (29 -> 61 is a 32-minute gap).
        let events = vec![
            (Some(1), at_minute(0)),
            (Some(1), at_minute(29)),
            (Some(1), at_minute(61)),
        ];
        let sessions = segment_sessions(&events, Duration::minutes(30));

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].changes, 2);
        assert_eq!(sessions[0].duration_minutes, 29);
        assert_eq!(sessions[1].changes, 1);
        assert_eq!(sessions[1].duration_minutes, 0);
    }

    #[test]
    fn test_gap_exactly_at_threshold_stays_in_session() {
        let events = vec![(Some(1), at_minute(0)), (Some(1), at_minute(30))];
        let sessions = segment_sessions(&events, Duration::minutes(30));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].changes, 2);
    }

    #[test]
    fn test_actor_change_starts_new_session() {
        let events = vec![
            (Some(1), at_minute(0)),
            (Some(2), at_minute(1)),
            (Some(1), at_minute(2)),
        ];
        let sessions = segment_sessions(&events, Duration::minutes(30));
        assert_eq!(sessions.len(), 2);
        // Sorted by actor: user 1 gets {0, 2}, user 2 gets {1}
        assert_eq!(sessions[0].user_id, Some(1));
        assert_eq!(sessions[0].changes, 2);
        assert_eq!(sessions[1].user_id, Some(2));
    }

    #[test]
    fn test_unsorted_input_handled() {
        let events = vec![(Some(1), at_minute(29)), (Some(1), at_minute(0))];
        let sessions = segment_sessions(&events, Duration::minutes(30));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start, at_minute(0));
        assert_eq!(sessions[0].end, at_minute(29));
    }

    #[test]
    fn test_anonymous_events_form_own_stream() {
        let events = vec![(None, at_minute(0)), (Some(1), at_minute(0))];
        let sessions = segment_sessions(&events, Duration::minutes(30));
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].user_id, None);
        assert_eq!(sessions[1].user_id, Some(1));
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_sessions(&[], Duration::minutes(30)).is_empty());
    }
}
