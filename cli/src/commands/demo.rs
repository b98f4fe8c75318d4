use std::collections::BTreeSet;

use aegis_core::{ActivityEvent, Engine, EngineConfig, IdentityContext, PrivilegeChange};
use chrono::{DateTime, Duration, Utc};

fn roles(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn event(
    ts: DateTime<Utc>,
    endpoint: &str,
    method: &str,
    bytes_out: u64,
    service: &str,
    trace_id: &str,
) -> ActivityEvent {
    ActivityEvent {
        timestamp: ts,
        endpoint: endpoint.to_string(),
        method: method.to_string(),
        status_code: 200,
        latency_ms: 130.0,
        bytes_in: 200,
        bytes_out,
        service: service.to_string(),
        trace_id: trace_id.to_string(),
        metadata: Default::default(),
    }
}

/// Runs a scripted scenario against a fresh in-process engine: a benign
/// baseline bootstraps the attack predictor, then one event stacks a
/// privilege escalation on top of an endpoint/device/IP change, printing
/// the resulting assessment.
pub fn run() -> i32 {
    let now = Utc::now();
    let engine = Engine::new(EngineConfig::default());

    let benign_sequence = vec![
        event(now - Duration::minutes(10), "/profile", "GET", 400, "profile", "trace-1"),
        event(now - Duration::minutes(8), "/orders", "GET", 1024, "orders", "trace-2"),
        event(now - Duration::minutes(6), "/orders", "GET", 2048, "orders", "trace-2"),
    ];
    engine.bootstrap_model(std::slice::from_ref(&benign_sequence));

    let privilege_change = PrivilegeChange {
        previous_roles: roles(&["user"]),
        new_roles: roles(&["user", "admin"]),
        previous_privileges: roles(&["read"]),
        new_privileges: roles(&["read", "write", "export"]),
        timestamp: now,
    };

    let risky_event = event(now, "/admin/export", "POST", 5_000_000, "reporting", "trace-attack");
    let identity = IdentityContext {
        user_id: "alice".to_string(),
        device_id: "device-x".to_string(),
        ip: "10.0.0.10".to_string(),
        geo: "US".to_string(),
        user_agent: "Mozilla/5.0".to_string(),
        session_id: Some("s-1".to_string()),
        roles: roles(&["user"]),
        privileges: roles(&["read"]),
        timestamp: now,
    };

    let assessment = engine.assess_event(&identity, &risky_event, Some(&privilege_change));

    println!("Total risk score: {}", assessment.total_score);
    for signal in &assessment.signals {
        println!("- {}: {:.2} :: {}", signal.name, signal.score, signal.detail);
    }
    println!("Proposed action: {}", assessment.action.as_str());
    println!("Account frozen: {}", assessment.account_frozen);
    println!("Session invalidated: {}", assessment.session_invalidated);

    0
}
