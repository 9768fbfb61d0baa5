use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

lazy_static! {
    // `<name> <port>/<protocol>`, anything after it (aliases, comments) is ignored.
    static ref SERVICE_REGEX: Regex =
        Regex::new(r"^(?P<name>[^\s#]+)\s+(?P<port>\d+)/(?P<proto>\w+)").unwrap();
}

/// Port and protocol to service name, as found in `/etc/services`.
#[derive(Debug, Default, Clone)]
pub struct ServiceTable {
    by_port: HashMap<u16, HashMap<String, String>>,
    names: HashSet<String>,
}

impl ServiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from service database lines.
    ///
    /// Lines that are not service entries (comments, blanks, ports that do not
    /// fit in 16 bits) are skipped. A later entry for the same port and
    /// protocol replaces an earlier one.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = ServiceTable::new();
        for line in lines {
            let Some(caps) = SERVICE_REGEX.captures(line.as_ref()) else {
                continue;
            };
            let Ok(port) = caps["port"].parse::<u16>() else {
                continue;
            };
            table.insert(port, &caps["proto"], &caps["name"]);
        }
        table
    }

    /// Reads the service database at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read service database {}", path.display()))?;
        Ok(Self::from_lines(contents.lines()))
    }

    /// Like [`ServiceTable::from_file`], but falls back to an empty table so
    /// flows are still counted, just without a service label.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::from_file(path) {
            Ok(table) => {
                debug!(
                    "Loaded {} service entries ({} names)",
                    table.len(),
                    table.names.len()
                );
                table
            }
            Err(e) => {
                warn!("{:?}; services will not be classified", e);
                ServiceTable::new()
            }
        }
    }

    pub fn insert(&mut self, port: u16, protocol: &str, name: &str) {
        self.by_port
            .entry(port)
            .or_default()
            .insert(protocol.to_lowercase(), name.to_string());
        self.names.insert(name.to_string());
    }

    pub fn lookup(&self, port: u16, protocol: &str) -> Option<&str> {
        self.by_port
            .get(&port)
            .and_then(|protocols| protocols.get(protocol))
            .map(String::as_str)
    }

    /// Whether `token` is the name of any registered service.
    pub fn is_known_name(&self, token: &str) -> bool {
        self.names.contains(token)
    }

    /// Number of (port, protocol) entries.
    pub fn len(&self) -> usize {
        self.by_port.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_port.is_empty()
    }
}
