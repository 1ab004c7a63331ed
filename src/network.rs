// SPDX-License-Identifier:  MIT

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

use crate::directive::{Dhcp, InterfaceSpec, Mode, StaticAddressing};
use crate::error::IfcfgError;
use crate::util::hwaddr_valid;

pub static NETWORK_CONF_DIR: &str = "/run/systemd/network";
pub static NETWORK_FILE_PREFIX: &str = "60-ifcfg-";

const OUTPUT_DIR_MODE: libc::mode_t =
    libc::S_IRWXU | libc::S_IRGRP | libc::S_IXGRP | libc::S_IROTH | libc::S_IXOTH;

/// Replaces every character other than ASCII alphanumerics, `-` and `.` with `_`.
///
/// Multi-byte characters turn into one `_` per UTF-8 byte, the byte length is kept.
pub fn sanitize_name(interface: &str) -> String {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"[^[:alnum:].-]").unwrap();
    }

    RE.replace_all(interface, |caps: &Captures| "_".repeat(caps[0].len()))
        .into_owned()
}

pub fn network_file_name(interface: &str) -> String {
    NETWORK_FILE_PREFIX.to_string() + &sanitize_name(interface) + ".network"
}

/// Output directory, guaranteed to exist once constructed.
#[derive(Debug)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<OutputDir, IfcfgError> {
        let path = path.as_ref().to_path_buf();

        if !path.is_dir() {
            fs::DirBuilder::new()
                .recursive(true)
                .mode(OUTPUT_DIR_MODE as u32)
                .create(&path)
                .map_err(|source| IfcfgError::DirectoryCreation {
                    path: path.clone(),
                    source,
                })?;
        }

        Ok(OutputDir { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn network_file_path(&self, spec: &InterfaceSpec) -> PathBuf {
        self.path.join(network_file_name(&spec.interface))
    }

    /// Writes the .network file for `spec`, replacing any previous one, and returns its path.
    pub fn write_network_file(&self, spec: &InterfaceSpec) -> Result<PathBuf, IfcfgError> {
        let path = self.network_file_path(spec);
        let write_error = |source| IfcfgError::FileWrite {
            path: path.clone(),
            interface: spec.interface.clone(),
            source,
        };

        let mut network_file = fs::File::create(&path).map_err(write_error)?;
        network_file
            .write_all(render(spec).as_bytes())
            .map_err(write_error)?;

        Ok(path)
    }
}

/// Renders the systemd-networkd .network file contents for one interface.
pub fn render(spec: &InterfaceSpec) -> String {
    let mut out = String::new();

    render_match(&mut out, spec);

    out.push_str("\n[Network]\n");
    match &spec.mode {
        Mode::Dhcp(dhcp) => render_dhcp(&mut out, dhcp),
        Mode::Static(addressing) => render_static(&mut out, addressing),
    }

    out
}

fn render_match(out: &mut String, spec: &InterfaceSpec) {
    out.push_str("[Match]\n");

    if spec.is_mac() {
        if !hwaddr_valid(&spec.interface) {
            warn!(
                "Interface '{}' contains ':' but is not a MAC address, matching it as one anyway",
                spec.interface
            );
        }
        let _ = write!(out, "Name=*\nMACAddress={}\n", spec.interface);
    } else {
        let _ = writeln!(out, "Name={}", spec.interface);
    }
}

fn render_dhcp(out: &mut String, dhcp: &Dhcp) {
    match (dhcp.v4, dhcp.v6) {
        (true, true) => out.push_str("DHCP=yes\n"),
        (true, false) => out.push_str("DHCP=ipv4\n"),
        (false, true) => out.push_str("DHCP=ipv6\n"),
        (false, false) => {}
    }

    if dhcp.v4 {
        out.push_str("\n[DHCPv4]\nUseHostname=false\nUseDNS=true\nUseNTP=true\n");
        if dhcp.rfc2132 {
            out.push_str("ClientIdentifier=mac\n");
        }
    }

    if dhcp.v6 {
        out.push_str("\n[DHCPv6]\nUseHostname=false\nUseDNS=true\nUseNTP=true\n");
    }
}

fn render_static(out: &mut String, addressing: &StaticAddressing) {
    let keyed = [
        ("Address", &addressing.addresses),
        ("Gateway", &addressing.gateways),
        ("DNS", &addressing.nameservers),
    ];

    for (key, values) in keyed {
        for v in values {
            let _ = writeln!(out, "{}={}", key, v);
        }
    }

    if let Some(domains) = &addressing.search_domains {
        let _ = writeln!(out, "Domains={}", domains);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ini::Ini;

    fn spec(directive: &str) -> InterfaceSpec {
        InterfaceSpec::parse(directive).unwrap().unwrap()
    }

    #[test]
    fn sanitize_identity() {
        assert_eq!(sanitize_name("eth0"), "eth0");
        assert_eq!(sanitize_name("enp0s3.100"), "enp0s3.100");
        assert_eq!(sanitize_name("br-lan"), "br-lan");
    }

    #[test]
    fn sanitize_replaces_one_for_one() {
        assert_eq!(sanitize_name("00:11:22:33:44:55"), "00_11_22_33_44_55");
        assert_eq!(sanitize_name("eth*"), "eth_");
        assert_eq!(sanitize_name("a/b c"), "a_b_c");
        assert_eq!(sanitize_name("**"), "__");
        assert_eq!(sanitize_name("wlän0"), "wl__n0");
        assert_eq!(sanitize_name("wlän0").len(), "wlän0".len());
    }

    #[test]
    fn file_name_for_mac() {
        assert_eq!(
            network_file_name("00:11:22:33:44:55"),
            "60-ifcfg-00_11_22_33_44_55.network"
        );
    }

    #[test]
    fn render_dhcp_both() {
        assert_eq!(
            render(&spec("eth0=dhcp")),
            "[Match]\nName=eth0\n\n[Network]\nDHCP=yes\n\n[DHCPv4]\nUseHostname=false\nUseDNS=true\nUseNTP=true\n\n[DHCPv6]\nUseHostname=false\nUseDNS=true\nUseNTP=true\n"
        );
    }

    #[test]
    fn render_dhcp_rfc2132() {
        let out = render(&spec("eth0=dhcp,rfc2132"));
        assert!(out.contains(
            "\n[DHCPv4]\nUseHostname=false\nUseDNS=true\nUseNTP=true\nClientIdentifier=mac\n"
        ));
        assert!(out.contains("DHCP=yes\n"));

        assert!(!render(&spec("eth0=dhcp")).contains("ClientIdentifier"));
    }

    #[test]
    fn render_dhcp4_rfc2132() {
        assert_eq!(
            render(&spec("eth*=dhcp4,rfc2132")),
            "[Match]\nName=eth*\n\n[Network]\nDHCP=ipv4\n\n[DHCPv4]\nUseHostname=false\nUseDNS=true\nUseNTP=true\nClientIdentifier=mac\n"
        );
    }

    #[test]
    fn render_dhcp6_ignores_rfc2132() {
        let out = render(&spec("eth0=dhcp6,rfc2132"));
        assert!(out.contains("DHCP=ipv6\n"));
        assert!(!out.contains("[DHCPv4]"));
        assert!(!out.contains("ClientIdentifier"));
    }

    #[test]
    fn render_mac_match() {
        let out = render(&spec("00:11:22:33:44:55=dhcp6"));
        assert_eq!(
            out,
            "[Match]\nName=*\nMACAddress=00:11:22:33:44:55\n\n[Network]\nDHCP=ipv6\n\n[DHCPv6]\nUseHostname=false\nUseDNS=true\nUseNTP=true\n"
        );
        assert!(!out.contains("Name=00:11"));
    }

    #[test]
    fn render_static_full() {
        assert_eq!(
            render(&spec("eth1=192.168.1.10,192.168.1.1,8.8.8.8,example.com")),
            "[Match]\nName=eth1\n\n[Network]\nAddress=192.168.1.10\nGateway=192.168.1.1\nDNS=8.8.8.8\nDomains=example.com\n"
        );
    }

    #[test]
    fn render_static_lists_keep_order() {
        let out = render(&spec(
            "eth1=10.0.0.3/24 10.0.0.2/24 10.0.0.3/24,,9.9.9.9 1.1.1.1,a.example b.example",
        ));
        assert_eq!(
            out,
            "[Match]\nName=eth1\n\n[Network]\nAddress=10.0.0.3/24\nAddress=10.0.0.2/24\nAddress=10.0.0.3/24\nDNS=9.9.9.9\nDNS=1.1.1.1\nDomains=a.example b.example\n"
        );
    }

    #[test]
    fn render_static_address_only() {
        let out = render(&spec("eth1=10.0.0.2/24"));
        assert_eq!(out, "[Match]\nName=eth1\n\n[Network]\nAddress=10.0.0.2/24\n");
        assert!(!out.contains("DHCP"));
    }

    #[test]
    fn render_is_deterministic() {
        let s = spec("eth1=10.0.0.2/24,10.0.0.1,10.0.0.53,example.com");
        assert_eq!(render(&s), render(&s));
    }

    #[test]
    fn output_dir_created_and_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("run/systemd/network");

        let out = OutputDir::create(&dir).unwrap();
        assert!(out.path().is_dir());
        assert!(OutputDir::create(&dir).is_ok());
    }

    #[test]
    fn output_dir_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("network");
        OutputDir::create(&dir).unwrap();

        let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        // umask may only take permissions away
        assert_eq!(mode & !0o755, 0);
    }

    #[test]
    fn output_dir_not_creatable() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, "").unwrap();

        let r = OutputDir::create(file.join("network"));
        assert!(matches!(r, Err(IfcfgError::DirectoryCreation { .. })));
    }

    #[test]
    fn write_network_file_sections() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::create(tmp.path()).unwrap();

        let path = out
            .write_network_file(&spec("eth1=10.0.0.2/24 10.0.0.3/24,10.0.0.1,10.0.0.53"))
            .unwrap();
        assert_eq!(path, tmp.path().join("60-ifcfg-eth1.network"));

        let conf = Ini::load_from_file(&path).unwrap();
        let match_section = conf.section(Some("Match")).unwrap();
        let network_section = conf.section(Some("Network")).unwrap();

        assert_eq!(match_section.get("Name"), Some("eth1"));
        assert_eq!(
            network_section.get_all("Address").collect::<Vec<&str>>(),
            vec!["10.0.0.2/24", "10.0.0.3/24"]
        );
        assert_eq!(network_section.get("Gateway"), Some("10.0.0.1"));
        assert_eq!(network_section.get("DNS"), Some("10.0.0.53"));
        assert_eq!(network_section.get("Domains"), None);
        assert!(conf.section(Some("DHCPv4")).is_none());
    }

    #[test]
    fn write_network_file_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::create(tmp.path()).unwrap();

        out.write_network_file(&spec("eth0=dhcp,rfc2132")).unwrap();
        let path = out.write_network_file(&spec("eth0=dhcp6")).unwrap();

        let conf = Ini::load_from_file(&path).unwrap();
        assert!(conf.section(Some("DHCPv4")).is_none());
        assert_eq!(conf.section(Some("Network")).unwrap().get("DHCP"), Some("ipv6"));
    }

    #[test]
    fn write_network_file_open_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::create(tmp.path()).unwrap();
        let s = spec("eth0=dhcp");

        // a directory in place of the file makes the open fail
        fs::create_dir(out.network_file_path(&s)).unwrap();

        match out.write_network_file(&s) {
            Err(IfcfgError::FileWrite { interface, .. }) => assert_eq!(interface, "eth0"),
            r => panic!("unexpected result {:?}", r),
        }
    }
}
