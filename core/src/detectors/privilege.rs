use std::collections::BTreeSet;

use crate::model::{AccountState, PrivilegeChange, RiskSignal, SignalKind};

/// Escalation + drift detector over an account's append-only privilege
/// history. Stateless itself — all state lives on `AccountState`.
#[derive(Debug, Clone, Copy)]
pub struct PrivilegeMonitor {
    drift_threshold: usize,
}

impl PrivilegeMonitor {
    pub fn new(drift_threshold: usize) -> Self {
        Self { drift_threshold }
    }

    /// May return zero, one, or two signals (escalation, then drift).
    pub fn assess(
        &self,
        account: &mut AccountState,
        change: Option<&PrivilegeChange>,
    ) -> Vec<RiskSignal> {
        let mut signals = Vec::new();

        if let Some(change) = change {
            let escalated: BTreeSet<&String> = change
                .new_privileges
                .difference(&change.previous_privileges)
                .collect();
            if !escalated.is_empty() {
                signals.push(RiskSignal::new(
                    SignalKind::PrivilegeEscalation,
                    35.0,
                    format!("Privileges added: {:?}", sorted_strs(&escalated)),
                ));
            }
            account.privilege_history.push(change.clone());
        }

        if account.privilege_history.len() >= self.drift_threshold {
            let recent = &account.privilege_history
                [account.privilege_history.len() - self.drift_threshold..];
            let mut union_prev = BTreeSet::new();
            let mut union_new = BTreeSet::new();
            for item in recent {
                union_prev.extend(item.previous_privileges.iter().cloned());
                union_new.extend(item.new_privileges.iter().cloned());
            }
            let drifted: BTreeSet<&String> = union_new.difference(&union_prev).collect();
            if !drifted.is_empty() {
                signals.push(RiskSignal::new(
                    SignalKind::PrivilegeDrift,
                    20.0,
                    format!("Privileges drifted upward: {:?}", sorted_strs(&drifted)),
                ));
            }
        }

        signals
    }
}

fn sorted_strs(set: &BTreeSet<&String>) -> Vec<&String> {
    set.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn change(prev_priv: &[&str], new_priv: &[&str]) -> PrivilegeChange {
        PrivilegeChange {
            previous_roles: BTreeSet::new(),
            new_roles: BTreeSet::new(),
            previous_privileges: prev_priv.iter().map(|s| s.to_string()).collect(),
            new_privileges: new_priv.iter().map(|s| s.to_string()).collect(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn escalation_alone_emits_single_signal() {
        let monitor = PrivilegeMonitor::new(3);
        let mut account = AccountState::new("u");
        let signals = monitor.assess(&mut account, Some(&change(&["read"], &["read", "write"])));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].name, SignalKind::PrivilegeEscalation);
        assert_eq!(signals[0].score, 35.0);
    }

    #[test]
    fn no_signal_when_privileges_only_shrink() {
        let monitor = PrivilegeMonitor::new(3);
        let mut account = AccountState::new("u");
        let signals = monitor.assess(&mut account, Some(&change(&["read", "write"], &["read"])));
        assert!(signals.is_empty());
    }

    #[test]
    fn drift_fires_once_history_reaches_threshold() {
        let monitor = PrivilegeMonitor::new(3);
        let mut account = AccountState::new("u");
        monitor.assess(&mut account, Some(&change(&["read"], &["read"])));
        monitor.assess(&mut account, Some(&change(&["read"], &["read"])));
        let signals = monitor.assess(&mut account, Some(&change(&["read"], &["read", "export"])));
        let names: Vec<_> = signals.iter().map(|s| s.name).collect();
        assert!(names.contains(&SignalKind::PrivilegeDrift));
    }

    #[test]
    fn drift_can_fire_without_a_new_change_this_call() {
        let monitor = PrivilegeMonitor::new(2);
        let mut account = AccountState::new("u");
        monitor.assess(&mut account, Some(&change(&["read"], &["read"])));
        monitor.assess(&mut account, Some(&change(&["read"], &["read", "export"])));
        // Third call supplies no change but history already satisfies the
        // trailing window, so drift can still be evaluated.
        let signals = monitor.assess(&mut account, None);
        assert!(signals.iter().any(|s| s.name == SignalKind::PrivilegeDrift));
    }
}
