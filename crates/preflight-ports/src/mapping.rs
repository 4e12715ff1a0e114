//! Port mappings declared in Compose `ports` entries.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// Short-syntax `HOST:CONTAINER` entry where the host side is either a
/// literal port or a `${VAR}` reference.
#[allow(clippy::expect_used)]
static PORT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\$\{?([A-Z_]+)\}?|(\d+)):(\d+)$").expect("port entry pattern is valid")
});

/// Host side of a port mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostBinding {
    /// A literal host port.
    Fixed(String),
    /// A host port taken from an environment variable.
    Variable(String),
}

impl fmt::Display for HostBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(port) => write!(f, "{port}"),
            Self::Variable(name) => write!(f, "${{{name}}}"),
        }
    }
}

/// A port mapping extracted from a Compose service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    /// Host side of the mapping.
    pub host: HostBinding,
    /// Port the service listens on inside its container.
    pub container_port: String,
    /// Service declaring the mapping.
    pub service: String,
    /// Compose file declaring the mapping.
    pub source: PathBuf,
}

impl PortMapping {
    /// The literal host port, if the mapping has one.
    #[must_use]
    pub fn host_port(&self) -> Option<&str> {
        match &self.host {
            HostBinding::Fixed(port) => Some(port),
            HostBinding::Variable(_) => None,
        }
    }

    /// The host port variable name, if the mapping uses one.
    #[must_use]
    pub fn variable(&self) -> Option<&str> {
        match &self.host {
            HostBinding::Variable(name) => Some(name),
            HostBinding::Fixed(_) => None,
        }
    }
}

/// Parses a short-syntax port entry into its host binding and container port.
///
/// Returns `None` for anything the scanner does not track: IP-bound entries,
/// ranges, protocol suffixes, lowercase variables and container-only ports.
#[must_use]
pub fn parse_port_entry(entry: &str) -> Option<(HostBinding, String)> {
    let caps = PORT_ENTRY.captures(entry)?;
    let container = caps.get(4)?.as_str().to_string();
    let host = match caps.get(2) {
        Some(var) => HostBinding::Variable(var.as_str().to_string()),
        None => HostBinding::Fixed(caps.get(3)?.as_str().to_string()),
    };
    Some((host, container))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_entry_is_fixed() {
        assert_eq!(
            parse_port_entry("8080:80"),
            Some((HostBinding::Fixed("8080".into()), "80".into()))
        );
    }

    #[test]
    fn braced_variable_entry_is_variable() {
        assert_eq!(
            parse_port_entry("${DOZZLE_PORT}:8080"),
            Some((HostBinding::Variable("DOZZLE_PORT".into()), "8080".into()))
        );
    }

    #[test]
    fn bare_variable_entry_is_variable() {
        assert_eq!(
            parse_port_entry("$PORT:3000"),
            Some((HostBinding::Variable("PORT".into()), "3000".into()))
        );
    }

    #[test]
    fn unsupported_entries_are_ignored() {
        for entry in [
            "80",
            "127.0.0.1:8080:80",
            "8080:80/udp",
            "${lower_case}:80",
            "${PORT:-3000}:3000",
            "9000-9010:9000-9010",
            "",
        ] {
            assert_eq!(parse_port_entry(entry), None, "entry: {entry}");
        }
    }

    #[test]
    fn accessors_follow_binding_kind() {
        let mapping = PortMapping {
            host: HostBinding::Variable("METRICS_PORT".into()),
            container_port: "8083".into(),
            service: "traefik".into(),
            source: PathBuf::from("compose/traefik.yml"),
        };
        assert_eq!(mapping.variable(), Some("METRICS_PORT"));
        assert_eq!(mapping.host_port(), None);
        assert_eq!(mapping.host.to_string(), "${METRICS_PORT}");
    }
}
