//! The per-child hysteretic state machine.
//!
//! [`transition`] is the whole thing: a free function over the current
//! state and the three thresholds, returning the new state only when it
//! actually changes. No change means no event, which is what makes a
//! child oscillating between `idle == slow` and `idle == slow + 1` quiet
//! instead of noisy: the row for each state only fires at a strict
//! inequality, never at the boundary itself.

use serde::{Deserialize, Serialize};

/// A child's health, from its parent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CState {
    Ok,
    Slow,
    Fail,
}

impl Default for CState {
    fn default() -> Self {
        CState::Ok
    }
}

/// Applies one heartbeat tick's `idle` reading to `state` and returns
/// the new state if (and only if) it changed. `slow` and `max_idle` are
/// thresholds in epochs; `slow < max_idle` is assumed but not enforced
/// here (an inverted configuration just makes `SLOW` unreachable, which
/// is a configuration error upstream, not this function's problem).
pub fn transition(state: CState, idle: i64, slow: i64, max_idle: i64) -> Option<CState> {
    let next = match state {
        CState::Ok => {
            if idle > max_idle {
                CState::Fail
            } else if idle > slow {
                CState::Slow
            } else {
                CState::Ok
            }
        }
        CState::Slow => {
            if idle <= slow {
                CState::Ok
            } else if idle > max_idle {
                CState::Fail
            } else {
                CState::Slow
            }
        }
        CState::Fail => {
            if idle <= slow {
                CState::Ok
            } else if idle <= max_idle {
                CState::Slow
            } else {
                CState::Fail
            }
        }
    };
    if next == state {
        None
    } else {
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_change_emits_nothing() {
        assert_eq!(transition(CState::Ok, 1, 3, 5), None);
        assert_eq!(transition(CState::Slow, 4, 3, 5), None);
        assert_eq!(transition(CState::Fail, 6, 3, 5), None);
    }

    #[test]
    fn hysteresis_at_the_slow_boundary_is_quiet() {
        // Oscillating between idle == slow and idle == slow + 1 must not
        // produce a transition once already in SLOW.
        assert_eq!(transition(CState::Slow, 3, 3, 5), None);
        assert_eq!(transition(CState::Slow, 4, 3, 5), None);
    }

    /// slow=3, max_idle=5, idle sequence [1,4,6,2,7] for a single child
    /// starting OK.
    #[test]
    fn scenario_idle_sequence_produces_four_events_in_order() {
        let (slow, max_idle) = (3, 5);
        let mut state = CState::Ok;
        let mut events = Vec::new();
        for idle in [1, 4, 6, 2, 7] {
            if let Some(next) = transition(state, idle, slow, max_idle) {
                events.push((state, next, idle));
                state = next;
            }
        }
        assert_eq!(
            events,
            vec![
                (CState::Ok, CState::Slow, 4),
                (CState::Slow, CState::Fail, 6),
                (CState::Fail, CState::Ok, 2),
                (CState::Ok, CState::Fail, 7),
            ]
        );
    }

    #[test]
    fn every_reachable_transition_is_covered() {
        assert_eq!(transition(CState::Ok, 10, 3, 5), Some(CState::Fail));
        assert_eq!(transition(CState::Ok, 4, 3, 5), Some(CState::Slow));
        assert_eq!(transition(CState::Slow, 0, 3, 5), Some(CState::Ok));
        assert_eq!(transition(CState::Slow, 10, 3, 5), Some(CState::Fail));
        assert_eq!(transition(CState::Fail, 0, 3, 5), Some(CState::Ok));
        assert_eq!(transition(CState::Fail, 4, 3, 5), Some(CState::Slow));
    }
}
