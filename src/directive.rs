// SPDX-License-Identifier:  MIT

use crate::error::IfcfgError;

/// Fields after this many commas are dropped without notice.
pub const MAX_FIELDS: usize = 10;

static RFC2132_OPTION: &str = "rfc2132";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dhcp {
    pub v4: bool,
    pub v6: bool,
    /// Send the MAC address as DHCPv4 client identifier.
    pub rfc2132: bool,
}

/// Manually assigned addressing, lists keep the order they were given in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAddressing {
    pub addresses: Vec<String>,
    pub gateways: Vec<String>,
    pub nameservers: Vec<String>,
    pub search_domains: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Dhcp(Dhcp),
    Static(StaticAddressing),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSpec {
    /// Interface name, shell glob or MAC address.
    pub interface: String,
    pub mode: Mode,
}

impl InterfaceSpec {
    /// Parses `<interface>=<config>`.
    ///
    /// Returns `Ok(None)` when the config part carries no fields at all, nothing is to be
    /// generated for such a directive.
    pub fn parse(directive: &str) -> Result<Option<InterfaceSpec>, IfcfgError> {
        let (interface, body) = directive
            .split_once('=')
            .ok_or_else(|| IfcfgError::MalformedDirective(directive.to_string()))?;

        let fields = split_fields(body);
        let mode = match fields.first() {
            Some(first) if first.starts_with("dhcp") => Mode::Dhcp(Dhcp::from_fields(&fields)),
            Some(_) => Mode::Static(StaticAddressing::from_fields(&fields)),
            None => return Ok(None),
        };

        Ok(Some(InterfaceSpec {
            interface: interface.to_string(),
            mode,
        }))
    }

    pub fn is_mac(&self) -> bool {
        self.interface.contains(':')
    }
}

impl Dhcp {
    fn from_fields(fields: &[&str]) -> Self {
        // Unknown dhcp* suffixes behave like plain "dhcp"
        let (v4, v6) = match fields[0] {
            "dhcp4" => (true, false),
            "dhcp6" => (false, true),
            _ => (true, true),
        };

        Dhcp {
            v4,
            v6,
            rfc2132: fields[1..].iter().any(|f| *f == RFC2132_OPTION),
        }
    }
}

impl StaticAddressing {
    // addresses,gateways,nameservers,search domains
    fn from_fields(fields: &[&str]) -> Self {
        let list = |i: usize| fields.get(i).map(|f| split_list(f)).unwrap_or_default();

        StaticAddressing {
            addresses: list(0),
            gateways: list(1),
            nameservers: list(2),
            search_domains: fields
                .get(3)
                .filter(|d| !d.is_empty())
                .map(|d| d.to_string()),
        }
    }
}

/// Splits the config body on commas into at most [`MAX_FIELDS`] trimmed fields.
///
/// A body consisting only of whitespace has no fields.
pub fn split_fields(body: &str) -> Vec<&str> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    body.split(',').take(MAX_FIELDS).map(str::trim).collect()
}

fn split_list(field: &str) -> Vec<String> {
    field
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}
