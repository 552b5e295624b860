use std::path::Path;

use serde::Deserialize;

use crate::base::error::{Error, Result};

pub const DEFAULT_PROGRAM: &str = "maestro";
pub const DEFAULT_CLIENT_NAME: &str = "vitechteam-maestro-client";
pub const DEFAULT_CLIENT_VERSION: &str = "0.0.1";

/// Executable plus fixed arguments used to start the tool's MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `<program> mcp`
    pub fn maestro(program: impl Into<String>) -> Self {
        Self::new(program, ["mcp"])
    }
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self::maestro(DEFAULT_PROGRAM)
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: ToolCommand,
    pub device_id: Option<String>,
    pub client_name: String,
    pub client_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: ToolCommand::default(),
            device_id: None,
            client_name: DEFAULT_CLIENT_NAME.into(),
            client_version: DEFAULT_CLIENT_VERSION.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    maestro: MaestroSection,
    #[serde(default)]
    client: ClientSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaestroSection {
    bin: Option<String>,
    device_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientSection {
    name: Option<String>,
    version: Option<String>,
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Defaults, then the TOML file named by `MAESTRO_CLIENT_CONFIG`, then env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match non_blank_env("MAESTRO_CLIENT_CONFIG") {
            Some(path) => Self::from_toml_file(Path::new(&path))?,
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    /// Defaults plus env overrides only.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        let mut cfg = Self::default();
        if let Some(bin) = file.maestro.bin {
            cfg.command = ToolCommand::maestro(bin);
        }
        cfg.device_id = file.maestro.device_id;
        if let Some(name) = file.client.name {
            cfg.client_name = name;
        }
        if let Some(version) = file.client.version {
            cfg.client_version = version;
        }
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Some(bin) = non_blank_env("MAESTRO_BIN") {
            self.command = ToolCommand::maestro(bin);
        }
        if let Some(device) = non_blank_env("MAESTRO_DEVICE_ID") {
            self.device_id = Some(device);
        }
    }

    pub fn with_device(mut self, device_id: Option<&str>) -> Self {
        if let Some(id) = device_id {
            self.device_id = Some(id.to_owned());
        }
        self
    }
}
