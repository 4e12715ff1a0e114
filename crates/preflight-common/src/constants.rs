//! Well-known file locations, defaults and reference tables.

/// Resource file checked by the validator when no path is given.
pub const DEFAULT_RESOURCE_FILE: &str = "komodo-resources.toml";

/// Placeholder `server_id` shipped in the resource template.
pub const PLACEHOLDER_SERVER_ID: &str = "your-server-id";

/// Maximum number of characters of a `pre_deploy` command shown in reports.
pub const COMMAND_PREVIEW_CHARS: usize = 50;

/// Optional stack config fields and the default Komodo applies when unset.
pub const OPTIONAL_CONFIG_FIELDS: &[(&str, &str)] = &[
    ("git_provider", "github"),
    ("branch", "main"),
    ("file_paths", "[\"docker-compose.yml\"]"),
    ("environment", "configured"),
];

/// Production compose file at the deployment root.
pub const PROD_COMPOSE_FILE: &str = "docker-compose-prod.yml";

/// Directory holding per-service compose files.
pub const COMPOSE_DIR: &str = "compose";

/// Extensions recognized as compose files inside [`COMPOSE_DIR`].
pub const COMPOSE_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Primary env file.
pub const ENV_FILE: &str = ".env";

/// Fallback env file, only fills keys missing from [`ENV_FILE`].
pub const EXAMPLE_ENV_FILE: &str = "example.env";

/// Resource file synced to Komodo; its stack `environment` blocks fill the
/// remaining keys.
pub const SYNC_RESOURCE_FILE: &str = "komodo-sync-resources.toml";

/// Port variables every deployment is expected to define.
pub const EXPECTED_PORT_VARIABLES: &[&str] = &[
    "DOZZLE_PORT",
    "NGINX_EXPOSE_PORT",
    "TRAEFIK_HTTP_PORT",
    "TRAEFIK_HTTPS_PORT",
    "TRAEFIK_DASHBOARD_PORT",
    "METRICS_PORT",
    // Flowise
    "PORT",
];

/// Conventional host port allocation of the deployment.
pub const PORT_ALLOCATION: &[(u16, &str)] = &[
    (80, "Traefik (HTTP)"),
    (443, "Traefik (HTTPS)"),
    (3000, "Arcane"),
    (3003, "Hoarder"),
    (3100, "Flowise"),
    (5432, "Windmill PostgreSQL"),
    (8080, "Traefik Dashboard (internal)"),
    (8083, "Traefik Metrics (optional)"),
    (8084, "Dozzle"),
    (8085, "Windmill Caddy"),
    (8086, "Zammad Nginx"),
    (8090, "Beszel Hub"),
    (9001, "Portainer Agent"),
    (9200, "Shuffle OpenSearch (if enabled)"),
    (9898, "Backrest"),
];

/// Binary name for the CLI.
pub const BIN_NAME: &str = "preflight";
