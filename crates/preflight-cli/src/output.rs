//! Formatted output helpers for CLI commands.
//!
//! Static reference tables and closing hints printed after a scan.

use std::fmt::Write as _;

use preflight_common::constants::PORT_ALLOCATION;

/// Hints printed when a conflict was found.
pub const CONFLICT_TIPS: &[&str] = &[
    "Assign unique ports to each service",
    "Use environment variables to make ports configurable",
    "Consider using Traefik routing instead of exposed ports",
];

/// Hints printed after a clean scan.
pub const GENERAL_TIPS: &[&str] = &[
    "Use 'docker ps' to see actual port bindings",
    "Check 'netstat -tlnp' to see what's already listening",
    "Consider using Traefik labels instead of exposed ports where possible",
];

/// Renders the conventional port allocation of the deployment.
#[must_use]
pub fn port_allocation_table() -> String {
    let mut out = String::from("\n\u{1f4ca} Port Allocation Summary:\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    for (port, service) in PORT_ALLOCATION {
        let _ = writeln!(out, "{port:<6}\u{2192} {service}");
    }
    out
}

/// Renders a titled bullet list of hints.
#[must_use]
pub fn tips(title: &str, items: &[&str]) -> String {
    let mut out = format!("\n\u{1f4a1} {title}\n");
    for item in items {
        let _ = writeln!(out, "\u{2022} {item}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_table_aligns_ports() {
        let table = port_allocation_table();
        assert!(table.contains("\n80    \u{2192} Traefik (HTTP)\n"));
        assert!(table.contains("\n9898  \u{2192} Backrest\n"));
        assert_eq!(table.lines().count(), 3 + PORT_ALLOCATION.len());
    }

    #[test]
    fn tips_render_bullets() {
        let rendered = tips("Tips:", &["one", "two"]);
        assert_eq!(rendered, "\n\u{1f4a1} Tips:\n\u{2022} one\n\u{2022} two\n");
    }
}
