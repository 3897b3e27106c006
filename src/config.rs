//! Desktop client configuration document and its synthesizer
//!
//! `synthesize` is the one pure transform in the wizard: a selected subset of
//! registry ids plus collected credentials become the JSON document the
//! desktop client reads to launch add-on processes. It performs no I/O; the
//! filesystem probe for the locally built server happens in
//! `SynthesisContext::detect` and persistence in `write_config`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry;

/// Relative location of the locally built filesystem server artifact
const LOCAL_FILESYSTEM_SERVER: &str = ".devcontainer/mcp-servers/src/filesystem/dist/index.js";

/// One resolved add-on invocation in the written configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub command: String,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

/// The persisted configuration document, overwritten in full on every run.
///
/// `mcp_servers` keeps insertion order (serde_json's `preserve_order`), so
/// entries serialize in the order the add-ons were selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: Map<String, Value>,
    #[serde(rename = "alwaysAllowReadOnly")]
    pub always_allow_read_only: bool,
}

/// Pre-resolved facts the synthesizer needs so it can stay free of I/O
#[derive(Debug, Clone)]
pub struct SynthesisContext {
    /// Workspace the filesystem add-on is granted access to
    pub workspace_dir: PathBuf,
    /// Locally built filesystem server, when present on disk
    pub local_filesystem_server: Option<PathBuf>,
}

impl SynthesisContext {
    /// Probe the filesystem once, ahead of synthesis
    pub fn detect(template_root: &Path, workspace_dir: PathBuf) -> Self {
        let artifact = template_root.join(LOCAL_FILESYSTEM_SERVER);
        Self {
            workspace_dir,
            local_filesystem_server: artifact.exists().then_some(artifact),
        }
    }
}

/// Merge selected add-ons and collected credentials into a configuration
/// document.
///
/// Every id in `selected` must exist in the registry; an unknown id is a bug
/// in the caller and panics. Output is deterministic: identical inputs yield
/// an identical document (and identical serialized bytes), with entries in
/// the iteration order of `selected`.
pub fn synthesize(
    selected: &[&str],
    credentials: &BTreeMap<String, String>,
    ctx: &SynthesisContext,
) -> ConfigDocument {
    let mut mcp_servers = Map::new();

    for id in selected {
        let descriptor = registry::get(id)
            .unwrap_or_else(|| panic!("add-on '{id}' is not in the registry"));

        let mut entry = ServerEntry {
            command: descriptor.command.to_string(),
            args: descriptor.args.iter().map(|a| a.to_string()).collect(),
            env: None,
        };

        if descriptor.local_server {
            let workspace = ctx.workspace_dir.display().to_string();
            match &ctx.local_filesystem_server {
                Some(artifact) => {
                    // Locally built server takes precedence over the fetched one
                    entry.command = "node".to_string();
                    entry.args = vec![artifact.display().to_string(), workspace];
                }
                None => entry.args.push(workspace),
            }
        }

        if descriptor.id == "apidog" {
            // Hard-coded override, see registry::apidog_env
            entry.env = Some(registry::apidog_env(credentials));
        } else if !descriptor.env_vars.is_empty() {
            let env = descriptor
                .env_vars
                .iter()
                .map(|var| {
                    let value = credentials
                        .get(*var)
                        .cloned()
                        .unwrap_or_else(|| registry::placeholder(var));
                    (var.to_string(), value)
                })
                .collect();
            entry.env = Some(env);
        }

        let value = serde_json::to_value(entry)
            .expect("server entry is a plain struct and always serializes");
        mcp_servers.insert(id.to_string(), value);
    }

    ConfigDocument {
        mcp_servers,
        always_allow_read_only: true,
    }
}

/// Conventional per-OS location of the desktop client configuration file
pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    #[cfg(target_os = "linux")]
    let dir = base.join("claude");

    #[cfg(not(target_os = "linux"))]
    let dir = base.join("Claude");

    Ok(dir.join("claude_desktop_config.json"))
}

/// Serialize the document to the exact bytes written to disk
pub fn render(document: &ConfigDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize configuration")
}

/// Write the document, creating parent directories and replacing any prior
/// file in full (no merge with previous content)
pub fn write_config(document: &ConfigDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    fs::write(path, render(document)?)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    log::info!("Configuration written to {}", path.display());
    Ok(())
}

/// Credential names that remain placeholders in the document, per add-on.
/// Used for the post-write "still needs keys" report.
pub fn unresolved_credentials(
    selected: &[&'static registry::AddOnDescriptor],
    credentials: &BTreeMap<String, String>,
) -> Vec<(&'static str, Vec<&'static str>)> {
    selected
        .iter()
        .filter_map(|descriptor| {
            let missing: Vec<&'static str> = descriptor
                .env_vars
                .iter()
                .copied()
                .filter(|var| !credentials.contains_key(*var))
                .collect();
            (!missing.is_empty()).then_some((descriptor.name, missing))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_ctx() -> SynthesisContext {
        SynthesisContext {
            workspace_dir: PathBuf::from("/workspace/project"),
            local_filesystem_server: None,
        }
    }

    fn entry(document: &ConfigDocument, id: &str) -> ServerEntry {
        serde_json::from_value(document.mcp_servers[id].clone())
            .expect("entry deserializes back into a server entry")
    }

    #[test]
    fn keys_are_exactly_the_selection() {
        let selected = ["github", "memory", "postgres"];
        let document = synthesize(&selected, &BTreeMap::new(), &bare_ctx());

        let keys: Vec<&str> = document.mcp_servers.keys().map(String::as_str).collect();
        assert_eq!(keys, ["github", "memory", "postgres"]);
        assert!(document.always_allow_read_only);
    }

    #[test]
    fn entries_follow_selection_order() {
        // Deliberately non-alphabetical selection
        let selected = ["zapier", "apidog", "github"];
        let document = synthesize(&selected, &BTreeMap::new(), &bare_ctx());

        let keys: Vec<&str> = document.mcp_servers.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zapier", "apidog", "github"]);

        let rendered = render(&document).unwrap();
        let positions: Vec<usize> = selected
            .iter()
            .map(|id| rendered.find(&format!("\"{id}\"")).unwrap())
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    }

    #[test]
    fn empty_selection_yields_empty_map() {
        let document = synthesize(&[], &BTreeMap::new(), &bare_ctx());
        assert!(document.mcp_servers.is_empty());
    }

    #[test]
    #[should_panic(expected = "not in the registry")]
    fn unknown_id_is_a_contract_violation() {
        synthesize(&["not-an-add-on"], &BTreeMap::new(), &bare_ctx());
    }

    #[test]
    fn memory_gets_no_env_map() {
        let document = synthesize(&["memory"], &BTreeMap::new(), &bare_ctx());

        assert_eq!(document.mcp_servers.len(), 1);
        let entry = entry(&document, "memory");
        assert_eq!(entry.command, "npx");
        assert_eq!(entry.args, ["-y", "@modelcontextprotocol/server-memory"]);
        assert!(entry.env.is_none());
        // The env key is omitted entirely, not written as null
        assert!(!document.mcp_servers["memory"]
            .as_object()
            .unwrap()
            .contains_key("env"));
    }

    #[test]
    fn missing_github_token_becomes_placeholder() {
        let document = synthesize(&["github"], &BTreeMap::new(), &bare_ctx());

        let env = entry(&document, "github").env.unwrap();
        assert_eq!(
            env["GITHUB_PERSONAL_ACCESS_TOKEN"],
            "YOUR_GITHUB_PERSONAL_ACCESS_TOKEN_HERE"
        );
    }

    #[test]
    fn supplied_github_token_is_copied() {
        let credentials = BTreeMap::from([(
            "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
            "ghp_abc123".to_string(),
        )]);
        let document = synthesize(&["github"], &credentials, &bare_ctx());

        let env = entry(&document, "github").env.unwrap();
        assert_eq!(env["GITHUB_PERSONAL_ACCESS_TOKEN"], "ghp_abc123");
    }

    #[test]
    fn every_required_credential_resolves() {
        let selected: Vec<&str> = registry::ADD_ONS.iter().map(|d| d.id).collect();
        let document = synthesize(&selected, &BTreeMap::new(), &bare_ctx());

        for descriptor in registry::ADD_ONS {
            if descriptor.id == "apidog" || descriptor.env_vars.is_empty() {
                continue;
            }
            let env = entry(&document, descriptor.id).env.unwrap();
            for var in descriptor.env_vars {
                assert_eq!(env[*var], registry::placeholder(var));
            }
        }
    }

    #[test]
    fn apidog_gets_the_bespoke_env_only() {
        let credentials =
            BTreeMap::from([("APIDOG_API_KEY".to_string(), "k".to_string())]);
        let document = synthesize(&["apidog"], &credentials, &bare_ctx());

        let env = entry(&document, "apidog").env.unwrap();
        let keys: Vec<&str> = env.keys().map(String::as_str).collect();
        assert_eq!(keys, ["HTTP_BASE_URL", "HTTP_HEADERS", "HTTP_TIMEOUT"]);
        assert!(!env.contains_key("APIDOG_API_KEY"));
        assert!(env["HTTP_HEADERS"].contains("Bearer k"));
    }

    #[test]
    fn synthesis_is_deterministic() {
        let selected = ["zapier", "github", "filesystem"];
        let credentials = BTreeMap::from([(
            "COMPOSIO_API_KEY".to_string(),
            "cmp_123".to_string(),
        )]);

        let first = render(&synthesize(&selected, &credentials, &bare_ctx())).unwrap();
        let second = render(&synthesize(&selected, &credentials, &bare_ctx())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn filesystem_falls_back_to_fetched_server() {
        let document = synthesize(&["filesystem"], &BTreeMap::new(), &bare_ctx());

        let entry = entry(&document, "filesystem");
        assert_eq!(entry.command, "npx");
        assert_eq!(
            entry.args,
            [
                "-y",
                "@modelcontextprotocol/server-filesystem",
                "/workspace/project"
            ]
        );
        assert!(entry.env.is_none());
    }

    #[test]
    fn filesystem_prefers_local_artifact() {
        let ctx = SynthesisContext {
            workspace_dir: PathBuf::from("/workspace/project"),
            local_filesystem_server: Some(PathBuf::from("/opt/forge/fs/index.js")),
        };
        let document = synthesize(&["filesystem"], &BTreeMap::new(), &ctx);

        let entry = entry(&document, "filesystem");
        assert_eq!(entry.command, "node");
        assert_eq!(entry.args, ["/opt/forge/fs/index.js", "/workspace/project"]);
    }

    #[test]
    fn detect_probes_for_the_local_artifact() {
        let tmp = tempfile::tempdir().unwrap();

        let ctx = SynthesisContext::detect(tmp.path(), PathBuf::from("/w"));
        assert!(ctx.local_filesystem_server.is_none());

        let artifact = tmp.path().join(LOCAL_FILESYSTEM_SERVER);
        fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        fs::write(&artifact, "// built server").unwrap();

        let ctx = SynthesisContext::detect(tmp.path(), PathBuf::from("/w"));
        assert_eq!(ctx.local_filesystem_server, Some(artifact));
    }

    #[test]
    fn write_config_overwrites_in_full() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("client").join("config.json");

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"stale\": true}").unwrap();

        let document = synthesize(&["memory"], &BTreeMap::new(), &bare_ctx());
        write_config(&document, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        let reread: ConfigDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, document);
    }

    #[test]
    fn config_path_points_at_desktop_client_file() {
        let path = config_path().unwrap();
        assert!(path.ends_with(
            Path::new(if cfg!(target_os = "linux") { "claude" } else { "Claude" })
                .join("claude_desktop_config.json")
        ));
    }

    #[test]
    fn unresolved_credentials_reports_placeholdered_add_ons() {
        let selected = vec![
            registry::get("github").unwrap(),
            registry::get("memory").unwrap(),
            registry::get("context7").unwrap(),
        ];
        let credentials = BTreeMap::from([(
            "UPSTASH_VECTOR_REST_URL".to_string(),
            "https://x.upstash.io".to_string(),
        )]);

        let report = unresolved_credentials(&selected, &credentials);
        assert_eq!(
            report,
            vec![
                ("GitHub", vec!["GITHUB_PERSONAL_ACCESS_TOKEN"]),
                ("Context7", vec!["UPSTASH_VECTOR_REST_TOKEN"]),
            ]
        );
    }
}
