use std::collections::{HashMap, HashSet};

use crate::model::{RiskSignal, SignalKind};

/// User↔IP, user↔device, and IP↔user set tracker. Detects IP
/// sharing across many accounts and device sprawl on one account.
#[derive(Debug, Default)]
pub struct GraphModel {
    user_to_ips: HashMap<String, HashSet<String>>,
    user_to_devices: HashMap<String, HashSet<String>>,
    ip_to_users: HashMap<String, HashSet<String>>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// At most one signal: a newly-seen shared IP takes precedence over a
    /// newly-seen sprawling device.
    pub fn assess(&mut self, user_id: &str, ip: &str, device_id: &str) -> Option<RiskSignal> {
        let seen_ip = self
            .user_to_ips
            .get(user_id)
            .is_some_and(|ips| ips.contains(ip));
        let seen_device = self
            .user_to_devices
            .get(user_id)
            .is_some_and(|devices| devices.contains(device_id));

        self.user_to_ips
            .entry(user_id.to_string())
            .or_default()
            .insert(ip.to_string());
        self.user_to_devices
            .entry(user_id.to_string())
            .or_default()
            .insert(device_id.to_string());
        let users_on_ip = self
            .ip_to_users
            .entry(ip.to_string())
            .or_default();
        users_on_ip.insert(user_id.to_string());

        if !seen_ip && users_on_ip.len() > 3 {
            return Some(RiskSignal::new(
                SignalKind::SharedIpRisk,
                22.0,
                format!("IP {ip} shared across {} accounts", users_on_ip.len()),
            ));
        }

        let devices_for_user = self.user_to_devices.get(user_id).unwrap();
        if !seen_device && devices_for_user.len() > 4 {
            return Some(RiskSignal::new(
                SignalKind::DeviceSprawl,
                16.0,
                format!(
                    "User {user_id} is now active on {} devices",
                    devices_for_user.len()
                ),
            ));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_ip_signal_fires_on_fifth_distinct_user() {
        let mut graph = GraphModel::new();
        for i in 0..3 {
            assert!(
                graph
                    .assess(&format!("user-{i}"), "1.2.3.4", &format!("device-{i}"))
                    .is_none()
            );
        }
        let signal = graph.assess("user-3", "1.2.3.4", "device-3");
        assert_eq!(signal.unwrap().name, SignalKind::SharedIpRisk);
    }

    #[test]
    fn device_sprawl_signal_fires_on_fifth_distinct_device() {
        let mut graph = GraphModel::new();
        for i in 0..4 {
            assert!(
                graph
                    .assess("user-1", &format!("10.0.0.{i}"), &format!("device-{i}"))
                    .is_none()
            );
        }
        let signal = graph.assess("user-1", "10.0.0.9", "device-4");
        assert_eq!(signal.unwrap().name, SignalKind::DeviceSprawl);
    }

    #[test]
    fn revisiting_known_ip_and_device_emits_nothing() {
        let mut graph = GraphModel::new();
        graph.assess("user-1", "1.1.1.1", "device-1");
        assert!(graph.assess("user-1", "1.1.1.1", "device-1").is_none());
    }
}
