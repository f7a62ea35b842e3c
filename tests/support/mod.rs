use anyhow::{Context, Result, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Temporary repository with a `технологии/` tree.
pub struct FixtureRepo {
    pub dir: TempDir,
}

impl FixtureRepo {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("allocating fixture repo")?;
        fs::create_dir_all(dir.path().join("технологии"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `text` to `технологии/<folder>/<file>`.
    pub fn write_doc(&self, folder: &str, file: &str, text: &str) -> Result<PathBuf> {
        let dir = self.root().join("технологии").join(folder);
        fs::create_dir_all(&dir)?;
        let path = dir.join(file);
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

pub fn catalog_schema() -> Result<Value> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/catalog.schema.json");
    let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn assert_matches_schema(instance: &Value) -> Result<()> {
    let schema_value = catalog_schema()?;
    let compiled = match JSONSchema::compile(&schema_value) {
        Ok(compiled) => compiled,
        Err(err) => bail!("catalog schema failed to compile: {err}"),
    };
    if let Err(errors) = compiled.validate(instance) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("catalog failed schema validation:\n{details}");
    }
    Ok(())
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
