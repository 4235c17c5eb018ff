use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: String,
    pub runs_dir: PathBuf,
    /// Effective options of the command, as recorded in `config.json`.
    pub options: serde_json::Value,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub command: String,
    pub dataset_version: String,
    pub options: serde_json::Value,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Files of one invocation's registry entry.
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// `<runs_dir>/<timestamp>__run_<uuid>`.
    pub run_dir: PathBuf,
    pub config_json: PathBuf,
    pub logs_ndjson: PathBuf,
}

/// Create the registry entry for `ctx` and record the command's options.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let run_dir = ctx
        .runs_dir
        .join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&run_dir)?;

    let config_json = run_dir.join("config.json");
    let logs_ndjson = run_dir.join("logs.ndjson");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        command: ctx.command.clone(),
        dataset_version: shopforge_core::DATASET_VERSION.to_string(),
        options: ctx.options.clone(),
        git: collect_git_info(),
    };

    write_json(&config_json, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_ndjson)?;

    Ok(RunPaths {
        run_dir,
        config_json,
        logs_ndjson,
    })
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_run_writes_config_and_log_file() {
        let runs_dir =
            std::env::temp_dir().join(format!("shopforge_runs_{}", uuid::Uuid::new_v4()));
        let ctx = RunContext {
            run_id: "abc".to_string(),
            started_at: Utc::now(),
            command: "generate".to_string(),
            runs_dir: runs_dir.clone(),
            options: serde_json::json!({ "seed": 3 }),
        };

        let paths = start_run(&ctx).expect("start run");
        assert!(paths.run_dir.starts_with(&runs_dir));
        assert!(paths.run_dir.to_string_lossy().ends_with("__run_abc"));
        assert!(paths.logs_ndjson.exists());

        let config: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(&paths.config_json).expect("read config.json"),
        )
        .expect("parse config.json");
        assert_eq!(config["command"], "generate");
        assert_eq!(config["options"]["seed"], 3);
    }
}
