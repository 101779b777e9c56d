use super::{now, AppState, ExamState};
use crate::types::*;

impl ExamState {
    /// Count one violation against a user. Callers must hold the state lock.
    pub(crate) fn record_violation(
        &mut self,
        username: &str,
        kind: &ViolationKind,
    ) -> ProctorSignal {
        let label = kind.to_string();
        let record = self
            .violations
            .entry(username.to_string())
            .and_modify(|r| r.count += 1)
            .or_insert_with(|| ViolationRecord {
                count: 1,
                last_kind: String::new(),
                updated_at: String::new(),
            });
        record.last_kind = label.clone();
        record.updated_at = now();

        if record.count >= MAX_VIOLATIONS {
            tracing::warn!(
                username,
                kind = %label,
                count = record.count,
                "Violation limit reached"
            );
            ProctorSignal::MaxViolations
        } else {
            tracing::info!(username, kind = %label, count = record.count, "Violation recorded");
            ProctorSignal::Violation {
                kind: label,
                count: record.count,
            }
        }
    }
}

impl AppState {
    /// Record a violation and return the signal for the client
    pub async fn record_violation(&self, username: &str, kind: ViolationKind) -> ProctorSignal {
        self.exam.lock().await.record_violation(username, &kind)
    }

    pub async fn violation_record(&self, username: &str) -> Option<ViolationRecord> {
        self.exam.lock().await.violations.get(username).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn test_first_violation_creates_record() {
        let state = test_state();
        assert!(state.violation_record("alice").await.is_none());

        let signal = state.record_violation("alice", ViolationKind::TabChange).await;

        assert_eq!(
            signal,
            ProctorSignal::Violation {
                kind: "TAB_CHANGE_VIOLATION".to_string(),
                count: 1
            }
        );
        let record = state.violation_record("alice").await.unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.last_kind, "TAB_CHANGE_VIOLATION");
    }

    #[tokio::test]
    async fn test_tenth_violation_is_terminal() {
        let state = test_state();

        for expected in 1..MAX_VIOLATIONS {
            let signal = state
                .record_violation("alice", ViolationKind::FullscreenExit)
                .await;
            assert_eq!(
                signal,
                ProctorSignal::Violation {
                    kind: "FULLSCREEN_VIOLATION".to_string(),
                    count: expected
                }
            );
        }

        let signal = state
            .record_violation("alice", ViolationKind::FullscreenExit)
            .await;
        assert_eq!(signal, ProctorSignal::MaxViolations);
        assert_eq!(state.violation_record("alice").await.unwrap().count, 10);
    }

    #[tokio::test]
    async fn test_terminal_is_sticky_and_count_keeps_growing() {
        let state = test_state();
        for _ in 0..MAX_VIOLATIONS {
            state.record_violation("alice", ViolationKind::WindowChange).await;
        }

        let signal = state
            .record_violation("alice", ViolationKind::Reported("GAZE_VIOLATION".into()))
            .await;

        assert_eq!(signal, ProctorSignal::MaxViolations);
        assert_eq!(state.violation_record("alice").await.unwrap().count, 11);
    }

    #[tokio::test]
    async fn test_kinds_share_one_counter() {
        let state = test_state();
        state.record_violation("alice", ViolationKind::TabChange).await;
        state.record_violation("alice", ViolationKind::FullscreenExit).await;

        let signal = state
            .record_violation("alice", ViolationKind::Reported("NOISE_VIOLATION".into()))
            .await;

        assert_eq!(
            signal,
            ProctorSignal::Violation {
                kind: "NOISE_VIOLATION".to_string(),
                count: 3
            }
        );
        assert!(state.violation_record("bob").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_violations_are_not_lost() {
        let state = test_state();
        let k = 50;

        let handles: Vec<_> = (0..k)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    state.record_violation("alice", ViolationKind::TabChange).await
                })
            })
            .collect();

        let mut terminal = 0;
        for handle in futures::future::join_all(handles).await {
            if handle.unwrap() == ProctorSignal::MaxViolations {
                terminal += 1;
            }
        }

        assert_eq!(state.violation_record("alice").await.unwrap().count, k);
        // Calls 10 through 50 all see the terminal signal
        assert_eq!(terminal, k - MAX_VIOLATIONS + 1);
    }
}
