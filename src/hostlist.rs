//! Host list expressions such as `node[01-04,07],login`
use std::collections::BTreeMap;
use std::fmt;

use color_eyre::eyre::{bail, eyre, Context};
use color_eyre::Result;

/// Largest number of hosts a single expression may expand to
pub const MAX_HOSTS: u64 = 65536;

/// Expands a host list expression into individual host names, e.g.
/// `n[1-3]` into `n1`, `n2`, and `n3`. Zero-padding of range bounds is
/// preserved and multiple bracketed ranges are expanded as a product.
pub fn expand(expr: &str) -> Result<Vec<String>> {
    let mut hosts = Vec::new();
    for item in split_top_level(expr)? {
        if !item.is_empty() {
            expand_item(item, &mut hosts)
                .wrap_err_with(|| format!("invalid host list {:?}", expr))?;
        }
    }

    Ok(hosts)
}

/// Splits on commas that are not enclosed in brackets
fn split_top_level(expr: &str) -> Result<Vec<&str>> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in expr.char_indices() {
        match c {
            '[' if depth > 0 => bail!("nested brackets in host list {:?}", expr),
            '[' => depth += 1,
            ']' if depth == 0 => bail!("unbalanced ']' in host list {:?}", expr),
            ']' => depth -= 1,
            ',' if depth == 0 => {
                items.push(&expr[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth > 0 {
        bail!("unbalanced '[' in host list {:?}", expr);
    }

    items.push(&expr[start..]);
    Ok(items)
}

fn expand_item(item: &str, hosts: &mut Vec<String>) -> Result<()> {
    let Some((prefix, rest)) = item.split_once('[') else {
        hosts.push(item.to_string());
        return Ok(());
    };

    let (ranges, suffix) = rest
        .split_once(']')
        .ok_or_else(|| eyre!("missing ']' in {:?}", item))?;

    for range in ranges.split(',') {
        let (lo, hi) = range.split_once('-').unwrap_or((range, range));
        let width = lo.len();
        let lo = parse_bound(lo)?;
        let hi = parse_bound(hi)?;
        if lo > hi {
            bail!("decreasing range {:?}", range);
        }
        if (hosts.len() as u64).saturating_add(hi - lo) >= MAX_HOSTS {
            bail!("range {:?} exceeds {} hosts", range, MAX_HOSTS);
        }

        for value in lo..=hi {
            expand_item(&format!("{}{:0width$}{}", prefix, value, suffix), hosts)?;
        }
    }

    Ok(())
}

fn parse_bound(value: &str) -> Result<u64> {
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("invalid range bound {:?}", value);
    }

    value
        .parse()
        .wrap_err_with(|| format!("invalid range bound {:?}", value))
}

/// Splits a host name into a prefix and a trailing number, if any
fn split_numeric_suffix(name: &str) -> (&str, Option<&str>) {
    let digits = name.bytes().rev().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        (name, None)
    } else {
        let (prefix, suffix) = name.split_at(name.len() - digits);
        (prefix, Some(suffix))
    }
}

/// Set of host names belonging to a summary row. Names are kept as pushed;
/// the compressed range form is produced on display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostList {
    hosts: Vec<String>,
}

impl HostList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, host: S) {
        self.hosts.push(host.into());
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    #[cfg(test)]
    fn contains(&self, host: &str) -> bool {
        self.hosts.iter().any(|v| v == host)
    }
}

/// Writes the sorted, de-duplicated hosts in ranged form, e.g. `n[1-3,7],login`.
/// Numbers are only collapsed into a range when their zero-padded widths match.
impl fmt::Display for HostList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // (prefix, width) -> numbers; hosts without a numeric suffix are kept as-is
        let mut numbered: BTreeMap<(&str, usize), Vec<u64>> = BTreeMap::new();
        let mut plain: Vec<&str> = Vec::new();

        for host in &self.hosts {
            match split_numeric_suffix(host) {
                (prefix, Some(digits)) => match digits.parse::<u64>() {
                    Ok(value) => numbered
                        .entry((prefix, digits.len()))
                        .or_default()
                        .push(value),
                    Err(_) => plain.push(host),
                },
                (_, None) => plain.push(host),
            }
        }

        // Sorted by prefix, then by value, so that e.g. `n9` precedes `n10`
        let mut entries: Vec<((&str, u64, usize), String)> = plain
            .into_iter()
            .map(|host| ((host, 0, 0), host.to_string()))
            .collect();

        for ((prefix, width), mut values) in numbered {
            values.sort_unstable();
            values.dedup();

            let mut ranges = Vec::new();
            let mut start = values[0];
            let mut end = values[0];
            for &value in &values[1..] {
                if value == end + 1 {
                    end = value;
                } else {
                    ranges.push((start, end));
                    start = value;
                    end = value;
                }
            }
            ranges.push((start, end));

            let text = if values.len() == 1 {
                format!("{}{:0width$}", prefix, values[0])
            } else {
                let ranges = ranges
                    .iter()
                    .map(|&(lo, hi)| {
                        if lo == hi {
                            format!("{:0width$}", lo)
                        } else {
                            format!("{:0width$}-{:0width$}", lo, hi)
                        }
                    })
                    .collect::<Vec<_>>();

                format!("{}[{}]", prefix, ranges.join(","))
            };

            entries.push(((prefix, values[0], width), text));
        }

        entries.sort();
        entries.dedup();

        let text = entries
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(",");

        f.write_str(&text)
    }
}
