//! Local network address discovery.
//!
//! Determines the LAN-facing IPv4 address of this machine so it can be
//! embedded in the certificate and printed in the startup banner. Discovery
//! never fails: each strategy is tried once, in order, and the literal
//! `"localhost"` is the final fallback.

use std::net::{Ipv4Addr, UdpSocket};
use std::process::Command;

/// Resolves the host's LAN-facing IPv4 address as a dotted-quad string.
///
/// Strategy order:
/// 1. Routing-table probe: connect a UDP socket to a non-routable address
///    (no packets are sent) and read back the locally bound address.
/// 2. Parse the output of a platform interface-inspection command
///    (`ifconfig` on macOS, `hostname -I` on Linux).
/// 3. Fall back to `"localhost"`.
pub fn resolve_local_address() -> String {
    if let Some(addr) = routing_table_probe() {
        return addr;
    }
    if let Some(addr) = interface_command_probe() {
        return addr;
    }
    "localhost".to_string()
}

/// Asks the OS which local address it would route from, without sending
/// anything. Connecting a UDP socket only selects a route; `10.254.254.254:1`
/// is an arbitrary non-routable destination on a closed port.
fn routing_table_probe() -> Option<String> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(10, 254, 254, 254), 1)).ok()?;
    let addr = socket.local_addr().ok()?;
    match addr.ip() {
        std::net::IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip.to_string()),
        _ => None,
    }
}

/// Runs the platform's interface-inspection command and parses the first
/// non-loopback IPv4 address from its output.
fn interface_command_probe() -> Option<String> {
    let output = if cfg!(target_os = "macos") {
        Command::new("ifconfig").output().ok()?
    } else {
        Command::new("hostname").arg("-I").output().ok()?
    };
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if cfg!(target_os = "macos") {
        parse_ifconfig(&stdout)
    } else {
        parse_hostname_output(&stdout)
    }
}

/// Extracts the first non-loopback `inet` address from `ifconfig` output.
fn parse_ifconfig(output: &str) -> Option<String> {
    for line in output.lines() {
        if !line.contains("inet ") || line.contains("127.0.0.1") {
            continue;
        }
        let mut parts = line.split_whitespace();
        while let Some(part) = parts.next() {
            if part == "inet" {
                if let Some(addr) = parts.next() {
                    if addr.parse::<Ipv4Addr>().is_ok() {
                        return Some(addr.to_string());
                    }
                }
                break;
            }
        }
    }
    None
}

/// Extracts the first IPv4 address from `hostname -I` output, which is a
/// whitespace-separated list of the host's addresses.
fn parse_hostname_output(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .find(|addr| addr.parse::<Ipv4Addr>().is_ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_address_is_usable() {
        // Whatever the environment, the resolver must hand back either a
        // dotted-quad or the localhost fallback.
        let addr = resolve_local_address();
        assert!(addr == "localhost" || addr.parse::<Ipv4Addr>().is_ok());
    }

    #[test]
    fn routing_probe_yields_dotted_quad() {
        // The probe may fail on hosts without a route, but on success the
        // result must parse as IPv4.
        if let Some(addr) = routing_table_probe() {
            assert!(addr.parse::<Ipv4Addr>().is_ok());
        }
    }

    #[test]
    fn parse_ifconfig_skips_loopback() {
        let output = "\
lo0: flags=8049<UP,LOOPBACK,RUNNING,MULTICAST> mtu 16384
\tinet 127.0.0.1 netmask 0xff000000
en0: flags=8863<UP,BROADCAST,SMART,RUNNING,SIMPLEX,MULTICAST> mtu 1500
\tinet 192.168.1.42 netmask 0xffffff00 broadcast 192.168.1.255
";
        assert_eq!(parse_ifconfig(output), Some("192.168.1.42".to_string()));
    }

    #[test]
    fn parse_ifconfig_ignores_inet6() {
        let output = "\ten0:\n\tinet6 fe80::1%en0 prefixlen 64\n";
        assert_eq!(parse_ifconfig(output), None);
    }

    #[test]
    fn parse_hostname_output_takes_first_ipv4() {
        assert_eq!(
            parse_hostname_output("10.0.0.5 172.17.0.1 \n"),
            Some("10.0.0.5".to_string())
        );
        assert_eq!(parse_hostname_output("fe80::1 \n"), None);
        assert_eq!(parse_hostname_output(""), None);
    }
}
