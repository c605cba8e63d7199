use std::fmt;
use std::str::FromStr;

use color_eyre::eyre::{bail, eyre, Context};
use color_eyre::Result;
use serde::de::{self, IntoDeserializer};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::misc::or_empty;
use super::scontrol::Fields;

/// Base scheduling state of a node, without the "not responding" modifier
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlurmState {
    Allocated,
    Completing,
    Down,
    Drained,
    Draining,
    Fail,
    Failing,
    Future,
    Idle,
    #[serde(rename = "maint")]
    Maintenance,
    Mixed,
    Perfctrs,
    PowerDown,
    PowerUp,
    Reserved,
    Unknown,
}

impl SlurmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlurmState::Allocated => "allocated",
            SlurmState::Completing => "completing",
            SlurmState::Down => "down",
            SlurmState::Drained => "drained",
            SlurmState::Draining => "draining",
            SlurmState::Fail => "fail",
            SlurmState::Failing => "failing",
            SlurmState::Future => "future",
            SlurmState::Idle => "idle",
            SlurmState::Maintenance => "maint",
            SlurmState::Mixed => "mixed",
            SlurmState::Perfctrs => "perfctrs",
            SlurmState::PowerDown => "power_down",
            SlurmState::PowerUp => "power_up",
            SlurmState::Reserved => "reserved",
            SlurmState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SlurmState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling state of a node, optionally flagged as not responding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeState {
    pub state: SlurmState,
    pub responds: bool,
}

impl NodeState {
    pub const ALLOCATED: NodeState = NodeState::new(SlurmState::Allocated);
    pub const IDLE: NodeState = NodeState::new(SlurmState::Idle);

    pub const fn new(state: SlurmState) -> Self {
        Self {
            state,
            responds: true,
        }
    }

    pub const fn not_responding(self) -> Self {
        Self {
            state: self.state,
            responds: false,
        }
    }

    /// Returns the state with the "not responding" modifier masked off
    pub const fn responding(self) -> Self {
        Self::new(self.state)
    }

    /// Deserializes states written as in `sinfo` output, e.g. `idle` or `down*`
    pub fn deserialize_str<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: &str = Deserialize::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }

    /// Parses the `State=` field of `scontrol show node`, e.g. `IDLE+DRAIN` or `DOWN*`
    pub fn from_scontrol(value: &str) -> Result<Self> {
        let mut parts = value.split('+').map(|v| v.trim_end_matches('*'));
        let base = parts.next().unwrap_or_default();

        if base.is_empty() {
            bail!("empty node state");
        }

        let mut state = match base.parse::<NodeState>() {
            Ok(state) => state,
            Err(err) => {
                warn!(state = value, %err, "unrecognized node state");
                NodeState::new(SlurmState::Unknown)
            }
        };
        state.responds = !value.contains('*');

        for flag in parts {
            state.state = match (flag, state.state) {
                ("DRAIN", SlurmState::Idle | SlurmState::Drained) => SlurmState::Drained,
                ("DRAIN", _) => SlurmState::Draining,
                ("FAIL", SlurmState::Allocated | SlurmState::Mixed) => SlurmState::Failing,
                ("FAIL", _) => SlurmState::Fail,
                ("MAINT", _) => SlurmState::Maintenance,
                ("COMPLETING", _) => SlurmState::Completing,
                ("POWERED_DOWN" | "POWER_DOWN", _) => SlurmState::PowerDown,
                ("POWERING_UP" | "POWER_UP", _) => SlurmState::PowerUp,
                ("NOT_RESPONDING", current) => {
                    state.responds = false;
                    current
                }
                (_, current) => current,
            };
        }

        Ok(state)
    }
}

impl FromStr for NodeState {
    type Err = de::value::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let state = value.trim_end_matches('*').to_ascii_lowercase();
        let deserializer: de::value::StrDeserializer<'_, Self::Err> =
            state.as_str().into_deserializer();

        Ok(NodeState {
            state: SlurmState::deserialize(deserializer)?,
            responds: !value.ends_with('*'),
        })
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.responds {
            fmt::Display::fmt(&self.state, f)
        } else {
            write!(f, "{}*", self.state)
        }
    }
}

/// A single node as reported by the controller; nodes belonging to more than
/// one partition are reported once per partition
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Node {
    #[serde(rename = "NODELIST")]
    pub name: String,
    #[serde(rename = "PARTITION")]
    pub partition: Option<String>,
    #[serde(rename = "STATE", deserialize_with = "NodeState::deserialize_str")]
    pub state: NodeState,

    #[serde(rename = "CPUS")]
    pub cpus: u32,
    /// Memory in MB
    #[serde(rename = "MEMORY")]
    pub real_memory: u64,
    /// Size of temporary disk space in MB
    #[serde(rename = "TMP_DISK")]
    pub tmp_disk: u64,
    #[serde(rename = "WEIGHT")]
    pub weight: u32,
    #[serde(rename = "FEATURES")]
    pub features: Option<String>,
}

impl Node {
    /// Name of the partition, with missing names treated as empty
    pub fn partition_name(&self) -> &str {
        or_empty(self.partition.as_deref())
    }

    /// Parses `|` delimited records with a header row, e.g. a `nodes.csv` snapshot
    pub fn parse<R>(reader: R) -> Result<Vec<Node>>
    where
        R: std::io::Read,
    {
        let mut nodes = Vec::new();
        for node in csv::ReaderBuilder::new()
            .delimiter(b'|')
            .trim(csv::Trim::All)
            .from_reader(reader)
            .deserialize::<Node>()
        {
            nodes.push(node.wrap_err("error while parsing node records")?);
        }

        Ok(nodes)
    }

    /// Builds one record per partition listed for a `scontrol show node` entry
    pub fn from_scontrol(fields: &Fields) -> Result<Vec<Node>> {
        let name = fields
            .get("NodeName")
            .ok_or_else(|| eyre!("node entry without NodeName"))?;

        let node = Node {
            name: name.to_string(),
            partition: None,
            state: NodeState::from_scontrol(fields.require("State")?)?,
            cpus: fields.parse("CPUTot")?,
            real_memory: fields.parse("RealMemory")?,
            tmp_disk: fields.parse("TmpDisk")?,
            weight: fields.parse("Weight")?,
            features: fields
                .get("AvailableFeatures")
                .or_else(|| fields.get("Features"))
                .map(str::to_string),
        };

        let partitions = fields
            .get("Partitions")
            .map(|v| v.split(',').filter(|v| !v.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();

        if partitions.is_empty() {
            return Ok(vec![node]);
        }

        Ok(partitions
            .into_iter()
            .map(|partition| Node {
                partition: Some(partition.to_string()),
                ..node.clone()
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) fn node(name: &str, partition: &str, state: NodeState, cpus: u32) -> Node {
    Node {
        name: name.to_string(),
        partition: Some(partition.to_string()),
        state,
        cpus,
        real_memory: 1024,
        tmp_disk: 0,
        weight: 1,
        features: None,
    }
}
