use std::fmt;
use std::str::FromStr;

use color_eyre::eyre::{bail, eyre, Context};
use color_eyre::Result;
use serde::{de, Deserialize, Deserializer};

use super::scontrol::Fields;

/// An upper bound that may be unlimited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
    Infinite,
    Finite(u32),
}

impl Limit {
    fn is_infinite(value: &str) -> bool {
        value.eq_ignore_ascii_case("infinite") || value.eq_ignore_ascii_case("unlimited")
    }
}

impl FromStr for Limit {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if Limit::is_infinite(value) {
            Ok(Limit::Infinite)
        } else {
            value.parse().map(Limit::Finite)
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Limit::Infinite => f.write_str("infinite"),
            Limit::Finite(value) => write!(f, "{}", value),
        }
    }
}

/// Maximum run time of jobs in a partition, in minutes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeLimit {
    Infinite,
    Minutes(u32),
}

impl TimeLimit {
    fn parse_component(value: &str, time: &str) -> Result<u32> {
        value
            .parse::<u32>()
            .wrap_err_with(|| format!("invalid value in time limit {:?}", time))
    }
}

/// Parses time limits as written by Slurm: `minutes`, `minutes:seconds`,
/// `hours:minutes:seconds`, `days-hours[:minutes[:seconds]]`, or `UNLIMITED`
impl FromStr for TimeLimit {
    type Err = color_eyre::Report;

    fn from_str(time: &str) -> Result<Self> {
        if Limit::is_infinite(time) {
            return Ok(TimeLimit::Infinite);
        }

        let (days, value) = match time.split_once('-') {
            Some((days, rest)) => (Some(TimeLimit::parse_component(days, time)?), rest),
            None => (None, time),
        };

        let fields = value.split(':').collect::<Vec<_>>();
        let parse = |idx: usize| TimeLimit::parse_component(fields[idx], time);
        let (hours, minutes, seconds) = match (days.is_some(), fields.len()) {
            // With days present the first field is always hours
            (true, 1) => (parse(0)?, 0, 0),
            (true, 2) => (parse(0)?, parse(1)?, 0),
            (false, 1) => (0, parse(0)?, 0),
            (false, 2) => (0, parse(0)?, parse(1)?),
            (_, 3) => (parse(0)?, parse(1)?, parse(2)?),
            _ => bail!("invalid time limit {:?}", time),
        };

        // Partial minutes count as a full minute
        days.unwrap_or(0)
            .checked_mul(24)
            .and_then(|v| v.checked_add(hours))
            .and_then(|v| v.checked_mul(60))
            .and_then(|v| v.checked_add(minutes))
            .and_then(|v| v.checked_add(seconds.div_ceil(60)))
            .map(TimeLimit::Minutes)
            .ok_or_else(|| eyre!("time limit {:?} out of range", time))
    }
}

/// Formats the time limit to match sinfo output, e.g. `1-00:00:00` or `30:00`
impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = match self {
            TimeLimit::Infinite => return f.write_str("infinite"),
            TimeLimit::Minutes(minutes) => *minutes,
        };

        let days = minutes / (24 * 60);
        let hours = (minutes / 60) % 24;
        let minutes = minutes % 60;

        if days > 0 {
            write!(f, "{}-{:02}:", days, hours)?
        } else if hours > 0 {
            write!(f, "{}:", hours)?
        }

        write!(f, "{:02}:00", minutes)
    }
}

/// Node sharing policy of a partition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shared {
    No,
    Yes,
    Force,
    Exclusive,
}

impl FromStr for Shared {
    type Err = color_eyre::Report;

    /// Accepts both `sinfo` (`yes`) and `scontrol` (`YES:4`) forms
    fn from_str(value: &str) -> Result<Self> {
        let (policy, _) = value.split_once(':').unwrap_or((value, ""));
        match policy.to_ascii_lowercase().as_str() {
            "no" => Ok(Shared::No),
            "yes" => Ok(Shared::Yes),
            "force" => Ok(Shared::Force),
            "exclusive" => Ok(Shared::Exclusive),
            _ => bail!("invalid sharing policy {:?}", value),
        }
    }
}

impl fmt::Display for Shared {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Shared::No => "no",
            Shared::Yes => "yes",
            Shared::Force => "force",
            Shared::Exclusive => "exclusive",
        })
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Partition {
    #[serde(rename = "NAME")]
    pub name: String,
    /// Indicates the default partition
    #[serde(rename = "DEFAULT", deserialize_with = "parse_yes_no", default)]
    pub default: bool,
    /// Partition is available for scheduling
    #[serde(rename = "AVAIL", deserialize_with = "parse_avail")]
    pub state_up: bool,
    #[serde(rename = "GROUPS")]
    pub allow_groups: Option<String>,
    #[serde(rename = "MIN_NODES")]
    pub min_nodes: u32,
    #[serde(rename = "MAX_NODES", deserialize_with = "parse_from_str")]
    pub max_nodes: Limit,
    #[serde(rename = "TIMELIMIT", deserialize_with = "parse_from_str")]
    pub max_time: TimeLimit,
    #[serde(rename = "ROOT", deserialize_with = "parse_yes_no")]
    pub root_only: bool,
    #[serde(rename = "SHARE", deserialize_with = "parse_from_str")]
    pub shared: Shared,
}

impl Partition {
    /// Parses `|` delimited records with a header row, e.g. a `partitions.csv` snapshot
    pub fn parse<R>(reader: R) -> Result<Vec<Partition>>
    where
        R: std::io::Read,
    {
        let mut partitions = Vec::new();
        for partition in csv::ReaderBuilder::new()
            .delimiter(b'|')
            .trim(csv::Trim::All)
            .from_reader(reader)
            .deserialize::<Partition>()
        {
            partitions.push(partition.wrap_err("error while parsing partition records")?);
        }

        Ok(partitions)
    }

    /// Builds a partition from a `scontrol show partition` entry
    pub fn from_scontrol(fields: &Fields) -> Result<Partition> {
        let name = fields.require("PartitionName")?;
        Partition::from_fields(name, fields)
            .wrap_err_with(|| format!("invalid partition {:?}", name))
    }

    fn from_fields(name: &str, fields: &Fields) -> Result<Partition> {
        let shared = match fields.get("OverSubscribe").or_else(|| fields.get("Shared")) {
            Some(value) => value.parse()?,
            None => Shared::No,
        };

        Ok(Partition {
            name: name.to_string(),
            default: fields.flag("Default")?,
            state_up: fields.get("State") == Some("UP"),
            allow_groups: fields.get("AllowGroups").map(str::to_string),
            min_nodes: fields.get("MinNodes").map_or(Ok(0), |_| fields.parse("MinNodes"))?,
            max_nodes: fields.parse("MaxNodes")?,
            max_time: fields.parse("MaxTime")?,
            root_only: fields.flag("RootOnly")?,
            shared,
        })
    }

    pub fn avail(&self) -> &'static str {
        if self.state_up {
            "up"
        } else {
            "down"
        }
    }
}

/// Displays the name, marking the default partition with a trailing '*'
impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.default {
            write!(f, "{}*", self.name)
        } else {
            fmt::Display::fmt(&self.name, f)
        }
    }
}

fn parse_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value: &str = Deserialize::deserialize(deserializer)?;
    value.parse().map_err(de::Error::custom)
}

fn parse_yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: &str = Deserialize::deserialize(deserializer)?;
    match value.to_ascii_lowercase().as_str() {
        "yes" => Ok(true),
        "no" | "" => Ok(false),
        _ => Err(de::Error::custom(format!("expected yes/no, found {:?}", value))),
    }
}

fn parse_avail<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: &str = Deserialize::deserialize(deserializer)?;
    match value.to_ascii_lowercase().as_str() {
        "up" => Ok(true),
        "down" | "drain" | "inactive" => Ok(false),
        _ => Err(de::Error::custom(format!("invalid AVAIL: {:?}", value))),
    }
}

#[cfg(test)]
pub(crate) fn partition(name: &str) -> Partition {
    Partition {
        name: name.to_string(),
        default: false,
        state_up: true,
        allow_groups: None,
        min_nodes: 1,
        max_nodes: Limit::Infinite,
        max_time: TimeLimit::Infinite,
        root_only: false,
        shared: Shared::No,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_limit() {
        let minutes = |v: &str| v.parse::<TimeLimit>().unwrap();

        assert_eq!(minutes("UNLIMITED"), TimeLimit::Infinite);
        assert_eq!(minutes("infinite"), TimeLimit::Infinite);
        assert_eq!(minutes("30"), TimeLimit::Minutes(30));
        assert_eq!(minutes("30:00"), TimeLimit::Minutes(30));
        assert_eq!(minutes("30:01"), TimeLimit::Minutes(31));
        assert_eq!(minutes("2:30:00"), TimeLimit::Minutes(150));
        assert_eq!(minutes("1-00:00:00"), TimeLimit::Minutes(1440));
        assert_eq!(minutes("2-12"), TimeLimit::Minutes(3600));
        assert_eq!(minutes("1-01:30"), TimeLimit::Minutes(1530));

        assert!("".parse::<TimeLimit>().is_err());
        assert!("1:2:3:4".parse::<TimeLimit>().is_err());
        assert!("abc".parse::<TimeLimit>().is_err());
    }

    #[test]
    fn test_time_limit_out_of_range() {
        assert!("4000000-00:00:00".parse::<TimeLimit>().is_err());
        assert!("71582789:00:00".parse::<TimeLimit>().is_err());
        assert!("4294967295:59".parse::<TimeLimit>().is_err());
        assert_eq!(
            "2982616-00:00:00".parse::<TimeLimit>().unwrap(),
            TimeLimit::Minutes(2982616 * 1440)
        );
    }

    #[test]
    fn test_display_time_limit() {
        assert_eq!(TimeLimit::Infinite.to_string(), "infinite");
        assert_eq!(TimeLimit::Minutes(30).to_string(), "30:00");
        assert_eq!(TimeLimit::Minutes(150).to_string(), "2:30:00");
        assert_eq!(TimeLimit::Minutes(1440).to_string(), "1-00:00:00");
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!("UNLIMITED".parse::<Limit>().unwrap(), Limit::Infinite);
        assert_eq!("16".parse::<Limit>().unwrap(), Limit::Finite(16));
        assert!("-1".parse::<Limit>().is_err());
    }

    #[test]
    fn test_parse_shared() {
        assert_eq!("NO".parse::<Shared>().unwrap(), Shared::No);
        assert_eq!("FORCE:4".parse::<Shared>().unwrap(), Shared::Force);
        assert_eq!("exclusive".parse::<Shared>().unwrap(), Shared::Exclusive);
        assert!("sometimes".parse::<Shared>().is_err());
    }

    #[test]
    fn test_parse_partitions() {
        let data = "\
NAME|DEFAULT|AVAIL|GROUPS|MIN_NODES|MAX_NODES|TIMELIMIT|ROOT|SHARE
batch|yes|up||1|infinite|1-00:00:00|no|no
gpu|no|down|gpuusers|2|8|30:00|yes|force
";
        let partitions = Partition::parse(data.as_bytes()).unwrap();
        assert_eq!(partitions.len(), 2);

        assert_eq!(partitions[0].to_string(), "batch*");
        assert!(partitions[0].state_up);
        assert_eq!(partitions[0].allow_groups, None);
        assert_eq!(partitions[0].max_nodes, Limit::Infinite);
        assert_eq!(partitions[0].max_time, TimeLimit::Minutes(1440));

        assert_eq!(partitions[1].to_string(), "gpu");
        assert_eq!(partitions[1].avail(), "down");
        assert_eq!(partitions[1].allow_groups.as_deref(), Some("gpuusers"));
        assert_eq!(partitions[1].max_nodes, Limit::Finite(8));
        assert!(partitions[1].root_only);
        assert_eq!(partitions[1].shared, Shared::Force);
    }

    #[test]
    fn test_from_scontrol() {
        let fields = Fields::from_line(
            "PartitionName=debug AllowGroups=ALL Default=YES MinNodes=0 MaxNodes=UNLIMITED \
             MaxTime=02:00:00 RootOnly=NO OverSubscribe=EXCLUSIVE State=UP TotalCPUs=64",
        );

        let partition = Partition::from_scontrol(&fields).unwrap();
        assert_eq!(partition.name, "debug");
        assert!(partition.default);
        assert!(partition.state_up);
        assert_eq!(partition.allow_groups.as_deref(), Some("ALL"));
        assert_eq!(partition.min_nodes, 0);
        assert_eq!(partition.max_nodes, Limit::Infinite);
        assert_eq!(partition.max_time, TimeLimit::Minutes(120));
        assert_eq!(partition.shared, Shared::Exclusive);
    }

    #[test]
    fn test_from_scontrol_invalid() {
        let fields = Fields::from_line("PartitionName=broken MaxNodes=many MaxTime=1");
        assert!(Partition::from_scontrol(&fields).is_err());
    }
}
