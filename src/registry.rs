//! Static MCP add-on registry
//!
//! One immutable descriptor per add-on the wizard can configure. The table is
//! defined at process start and never mutated; iteration order is declaration
//! order and drives the selection menu.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;

/// Immutable description of one configurable add-on
#[derive(Debug, Clone, Copy)]
pub struct AddOnDescriptor {
    /// Unique key, used as the entry name in the written configuration
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Launcher command, copied verbatim into the configuration
    pub command: &'static str,
    pub args: &'static [&'static str],
    /// Credential names this add-on needs at launch time
    pub env_vars: &'static [&'static str],
    /// Where the user can create the credential
    pub setup_url: Option<&'static str>,
    /// npm package installed globally for this add-on (None = built locally)
    pub package: Option<&'static str>,
    /// Usable without any credentials configured
    pub always_enabled: bool,
    /// Resolved from a locally built artifact when one is present
    pub local_server: bool,
}

/// All add-ons the wizard knows about, in menu order
pub static ADD_ONS: &[AddOnDescriptor] = &[
    AddOnDescriptor {
        id: "github",
        name: "GitHub",
        description: "GitHub API integration for repositories, issues, PRs",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-github"],
        env_vars: &["GITHUB_PERSONAL_ACCESS_TOKEN"],
        setup_url: Some("https://github.com/settings/tokens"),
        package: Some("@modelcontextprotocol/server-github"),
        always_enabled: false,
        local_server: false,
    },
    AddOnDescriptor {
        id: "filesystem",
        name: "File System",
        description: "Advanced file operations beyond standard container access",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-filesystem"],
        env_vars: &[],
        setup_url: None,
        package: None,
        always_enabled: true,
        local_server: true,
    },
    AddOnDescriptor {
        id: "sequential-thinking",
        name: "Sequential Thinking",
        description: "Enhanced reasoning and problem-solving capabilities",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-sequential-thinking"],
        env_vars: &[],
        setup_url: None,
        package: Some("@modelcontextprotocol/server-sequential-thinking"),
        always_enabled: true,
        local_server: false,
    },
    AddOnDescriptor {
        id: "puppeteer",
        name: "Puppeteer",
        description: "Web automation, scraping, and browser control",
        command: "npx",
        args: &["-y", "puppeteer-mcp-server"],
        env_vars: &[],
        setup_url: None,
        package: Some("puppeteer-mcp-server"),
        always_enabled: true,
        local_server: false,
    },
    AddOnDescriptor {
        id: "postgres",
        name: "PostgreSQL",
        description: "Direct PostgreSQL database interactions",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-postgres"],
        env_vars: &["POSTGRES_CONNECTION_STRING"],
        setup_url: None,
        package: Some("@modelcontextprotocol/server-postgres"),
        always_enabled: false,
        local_server: false,
    },
    AddOnDescriptor {
        id: "memory",
        name: "Memory Bank",
        description: "Persistent memory across conversations",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-memory"],
        env_vars: &[],
        setup_url: None,
        package: Some("@modelcontextprotocol/server-memory"),
        always_enabled: true,
        local_server: false,
    },
    AddOnDescriptor {
        id: "context7",
        name: "Context7",
        description: "Vector database for semantic search and contextual retrieval",
        command: "npx",
        args: &["-y", "@upstash/context7"],
        env_vars: &["UPSTASH_VECTOR_REST_URL", "UPSTASH_VECTOR_REST_TOKEN"],
        setup_url: Some("https://console.upstash.com"),
        package: Some("@upstash/context7"),
        always_enabled: false,
        local_server: false,
    },
    AddOnDescriptor {
        id: "notion",
        name: "Notion",
        description: "Notion workspace integration via Composio",
        command: "npx",
        args: &["@composio/mcp@latest", "run", "notion"],
        env_vars: &["COMPOSIO_API_KEY"],
        setup_url: Some("https://app.composio.dev"),
        package: Some("@composio/mcp"),
        always_enabled: false,
        local_server: false,
    },
    AddOnDescriptor {
        id: "figma",
        name: "Figma",
        description: "Figma design integration via Composio",
        command: "npx",
        args: &["@composio/mcp@latest", "run", "figma"],
        env_vars: &["COMPOSIO_API_KEY"],
        setup_url: Some("https://app.composio.dev"),
        package: Some("@composio/mcp"),
        always_enabled: false,
        local_server: false,
    },
    AddOnDescriptor {
        id: "zapier",
        name: "Zapier",
        description: "Cross-app automation via Composio",
        command: "npx",
        args: &["@composio/mcp@latest", "run", "zapier"],
        env_vars: &["COMPOSIO_API_KEY"],
        setup_url: Some("https://app.composio.dev"),
        package: Some("@composio/mcp"),
        always_enabled: false,
        local_server: false,
    },
    AddOnDescriptor {
        id: "apidog",
        name: "Apidog",
        description: "API documentation and testing",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-http"],
        env_vars: &["APIDOG_API_KEY"],
        setup_url: Some("https://apidog.com"),
        package: Some("@modelcontextprotocol/server-http"),
        always_enabled: false,
        local_server: false,
    },
];

static INDEX: Lazy<HashMap<&'static str, &'static AddOnDescriptor>> =
    Lazy::new(|| ADD_ONS.iter().map(|d| (d.id, d)).collect());

/// Look up a descriptor by id
pub fn get(id: &str) -> Option<&'static AddOnDescriptor> {
    INDEX.get(id).copied()
}

/// Deterministic stand-in written when a credential was not supplied
pub fn placeholder(env_var: &str) -> String {
    format!("YOUR_{env_var}_HERE")
}

/// Bespoke environment for the apidog add-on.
///
/// Apidog does not get the table-driven env map: its launcher is a generic
/// HTTP server that needs a base URL, a pre-rendered header blob, and a
/// timeout instead of the raw credential. Kept next to the table so the
/// divergence from table-driven behavior stays visible.
///
/// The credential is embedded into the header string verbatim, with no
/// escaping. A key containing `"` produces a malformed header — that matches
/// the shipped behavior and is pinned by a test rather than fixed here.
pub fn apidog_env(credentials: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let key = credentials
        .get("APIDOG_API_KEY")
        .cloned()
        .unwrap_or_else(|| placeholder("APIDOG_API_KEY"));

    BTreeMap::from([
        (
            "HTTP_BASE_URL".to_string(),
            "https://api.apidog.com".to_string(),
        ),
        (
            "HTTP_HEADERS".to_string(),
            format!(
                "{{\"Authorization\": \"Bearer {key}\", \"Content-Type\": \"application/json\"}}"
            ),
        ),
        ("HTTP_TIMEOUT".to_string(), "30000".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for descriptor in ADD_ONS {
            assert!(seen.insert(descriptor.id), "duplicate id {}", descriptor.id);
        }
    }

    #[test]
    fn lookup_matches_table() {
        for descriptor in ADD_ONS {
            let found = get(descriptor.id).expect("descriptor missing from index");
            assert_eq!(found.name, descriptor.name);
        }
        assert!(get("nonexistent").is_none());
    }

    #[test]
    fn composio_add_ons_share_one_credential() {
        for id in ["notion", "figma", "zapier"] {
            let descriptor = get(id).expect("composio add-on missing");
            assert_eq!(descriptor.env_vars, ["COMPOSIO_API_KEY"]);
            assert_eq!(descriptor.package, Some("@composio/mcp"));
        }
    }

    #[test]
    fn credential_free_add_ons_are_always_enabled() {
        for id in ["filesystem", "sequential-thinking", "puppeteer", "memory"] {
            let descriptor = get(id).expect("add-on missing");
            assert!(descriptor.always_enabled);
            assert!(descriptor.env_vars.is_empty());
        }
    }

    #[test]
    fn placeholder_format() {
        assert_eq!(
            placeholder("GITHUB_PERSONAL_ACCESS_TOKEN"),
            "YOUR_GITHUB_PERSONAL_ACCESS_TOKEN_HERE"
        );
    }

    #[test]
    fn apidog_env_with_key() {
        let credentials =
            BTreeMap::from([("APIDOG_API_KEY".to_string(), "k".to_string())]);
        let env = apidog_env(&credentials);

        assert_eq!(env.len(), 3);
        assert_eq!(env["HTTP_BASE_URL"], "https://api.apidog.com");
        assert_eq!(env["HTTP_TIMEOUT"], "30000");
        assert_eq!(
            env["HTTP_HEADERS"],
            "{\"Authorization\": \"Bearer k\", \"Content-Type\": \"application/json\"}"
        );
    }

    #[test]
    fn apidog_env_without_key_uses_placeholder() {
        let env = apidog_env(&BTreeMap::new());
        assert!(env["HTTP_HEADERS"].contains("Bearer YOUR_APIDOG_API_KEY_HERE"));
    }

    // Pins the shipped behavior: the credential is spliced into the header
    // blob without escaping, so a quote in the key corrupts the JSON string.
    #[test]
    fn apidog_env_does_not_escape_quotes() {
        let credentials = BTreeMap::from([(
            "APIDOG_API_KEY".to_string(),
            "k\"broken".to_string(),
        )]);
        let env = apidog_env(&credentials);

        assert!(env["HTTP_HEADERS"].contains("Bearer k\"broken"));
        assert!(serde_json::from_str::<serde_json::Value>(&env["HTTP_HEADERS"]).is_err());
    }
}
