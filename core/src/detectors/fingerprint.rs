use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::model::{IdentityContext, RiskSignal, SignalKind};

/// Stable identity hash and multi-actor-within-window detector.
#[derive(Debug, Default)]
pub struct IdentityFingerprinter {
    recent: HashMap<String, (String, DateTime<Utc>)>,
}

impl IdentityFingerprinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `SHA-256(device_id | ip | geo | user_agent | user_id)`, lowercase
    /// hex. The `|` separator and field order are byte-exact load-bearing
    /// constants — any change breaks compatibility with persisted
    /// fingerprints a real deployment would have recorded.
    pub fn fingerprint(identity: &IdentityContext) -> String {
        let payload = [
            identity.device_id.as_str(),
            identity.ip.as_str(),
            identity.geo.as_str(),
            identity.user_agent.as_str(),
            identity.user_id.as_str(),
        ]
        .join("|");
        let digest = Sha256::digest(payload.as_bytes());
        hex::encode(digest)
    }

    pub fn detect_multi_actor(
        &mut self,
        identity: &IdentityContext,
        multi_actor_window: Duration,
    ) -> Option<RiskSignal> {
        let fingerprint = Self::fingerprint(identity);
        let previous = self
            .recent
            .insert(identity.user_id.clone(), (fingerprint.clone(), identity.timestamp));

        let (previous_fingerprint, previous_ts) = previous?;
        if previous_fingerprint != fingerprint
            && identity.timestamp - previous_ts <= multi_actor_window
        {
            Some(RiskSignal::new(
                SignalKind::MultiActorDetection,
                25.0,
                "Account used from multiple distinct fingerprints within a short window",
            ))
        } else {
            None
        }
    }
}
