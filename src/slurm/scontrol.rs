use std::collections::HashMap;
use std::fmt;
use std::process::Command;
use std::str::FromStr;
use std::time::SystemTime;

use color_eyre::eyre::{bail, eyre, Context};
use color_eyre::Result;
use tracing::debug;

use super::{Controller, Node, Partition, Snapshot, Update};

/// Key/value pairs of a single `scontrol --oneline` record
#[derive(Debug, Default)]
pub struct Fields {
    values: HashMap<String, String>,
}

impl Fields {
    /// Splits a line of `Key=Value` pairs; words without a key (e.g. in a `Reason`
    /// containing spaces) are appended to the preceding value
    pub fn from_line(line: &str) -> Self {
        let mut values: HashMap<String, String> = HashMap::new();
        let mut last: Option<String> = None;

        for token in line.split_ascii_whitespace() {
            match token.split_once('=') {
                Some((key, value)) if is_key(key) => {
                    values.insert(key.to_string(), value.to_string());
                    last = Some(key.to_string());
                }
                _ => {
                    if let Some(value) = last.as_ref().and_then(|key| values.get_mut(key)) {
                        value.push(' ');
                        value.push_str(token);
                    }
                }
            }
        }

        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value for `key`, treating `(null)` and empty values as missing
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty() && *v != "(null)")
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| eyre!("{} not found", key))
    }

    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.require(key)?;
        value
            .parse()
            .map_err(|err| eyre!("invalid {}: {:?}: {}", key, value, err))
    }

    /// Parses a `YES`/`NO` value; missing values are treated as `NO`
    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Some("YES") => Ok(true),
            Some("NO") | None => Ok(false),
            Some(value) => bail!("invalid {}: {:?}", key, value),
        }
    }
}

fn is_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Splits `scontrol --oneline` output into one set of fields per record
pub fn parse_records(output: &str) -> Vec<Fields> {
    output
        .lines()
        .map(Fields::from_line)
        .filter(|fields| !fields.is_empty())
        .collect()
}

/// Queries the controller via the `scontrol` executable
#[derive(Clone, Debug)]
pub struct Scontrol {
    exe: String,
}

impl Scontrol {
    pub fn new<S: Into<String>>(exe: S) -> Self {
        Self { exe: exe.into() }
    }

    fn show(&self, entity: &str) -> Result<Vec<Fields>> {
        let output = Command::new(&self.exe)
            .args(["--oneline", "show", entity])
            .output()
            .wrap_err_with(|| format!("failed to execute {:?}", self.exe))?;

        if !output.status.success() {
            bail!(
                "`{} show {}` failed: {}",
                self.exe,
                entity,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let records = parse_records(&String::from_utf8_lossy(&output.stdout));
        debug!(entity, records = records.len(), "scontrol query completed");
        Ok(records)
    }
}

// scontrol has no way to ask for changes since a given time, so every query
// transfers the full state and is reported as changed
impl Controller for Scontrol {
    fn load_partitions(&self, _since: Option<SystemTime>) -> Result<Update<Partition>> {
        let records = self
            .show("partition")?
            .iter()
            .map(Partition::from_scontrol)
            .collect::<Result<Vec<_>>>()?;

        Ok(Update::Changed(Snapshot::new(records)))
    }

    fn load_nodes(&self, _since: Option<SystemTime>) -> Result<Update<Node>> {
        let mut records = Vec::new();
        for fields in self.show("node")? {
            records.extend(Node::from_scontrol(&fields)?);
        }

        Ok(Update::Changed(Snapshot::new(records)))
    }
}
