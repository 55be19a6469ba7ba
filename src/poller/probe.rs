//! Reachability probes.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Port assumed when a target names only a host.
pub const DEFAULT_PORT: u16 = 80;

/// One lightweight reachability check against a target.
pub trait Probe: Send + Sync {
    fn probe(&self, target: &str) -> bool;
}

impl<F> Probe for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn probe(&self, target: &str) -> bool {
        self(target)
    }
}

/// Succeeds once the target host name resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsProbe;

impl Probe for DnsProbe {
    fn probe(&self, target: &str) -> bool {
        match resolve(target) {
            Ok(addrs) => !addrs.is_empty(),
            Err(e) => {
                log::debug!("DNS probe failed for {}: {}", target, e);
                false
            }
        }
    }
}

/// Succeeds once a TCP connection to `host:port` (or a bare host on
/// [`DEFAULT_PORT`]) can be opened.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    pub connect_timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl Probe for TcpProbe {
    fn probe(&self, target: &str) -> bool {
        let addrs = match resolve(target) {
            Ok(addrs) => addrs,
            Err(e) => {
                log::debug!("TCP probe could not resolve {}: {}", target, e);
                return false;
            }
        };
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(_) => return true,
                Err(e) => log::debug!("TCP probe failed for {}: {}", addr, e),
            }
        }
        false
    }
}

/// Resolve `host:port`, or a bare host on [`DEFAULT_PORT`].
fn resolve(target: &str) -> io::Result<Vec<SocketAddr>> {
    match target.to_socket_addrs() {
        Ok(addrs) => Ok(addrs.collect()),
        Err(_) => Ok((target, DEFAULT_PORT).to_socket_addrs()?.collect()),
    }
}

/// Host part of a URL, or the input itself if it is not a URL.
pub fn host_of(target: &str) -> Option<String> {
    match reqwest::Url::parse(target) {
        Ok(url) => url.host_str().map(str::to_string),
        Err(_) => bare(target),
    }
}

/// `host:port` of a URL, with the scheme's default port when none is given.
/// Input that is not a URL is returned as is.
pub fn address_of(target: &str) -> Option<String> {
    match reqwest::Url::parse(target) {
        Ok(url) => {
            let host = url.host_str()?;
            let port = url.port_or_known_default().unwrap_or(DEFAULT_PORT);
            Some(format!("{}:{}", host, port))
        }
        Err(_) => bare(target),
    }
}

fn bare(target: &str) -> Option<String> {
    let trimmed = target.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_closure_probe() {
        let probe = |target: &str| target == "up";
        assert!(probe.probe("up"));
        assert!(!probe.probe("down"));
    }

    #[test]
    fn test_dns_probe_localhost() {
        assert!(DnsProbe.probe("localhost"));
    }

    #[test]
    fn test_tcp_probe_open_and_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(TcpProbe::default().probe(&addr.to_string()));
        drop(listener);
        assert!(!TcpProbe::default().probe("not a host name:0"));
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("http://springeap6-foobarz.rhcloud.com/").as_deref(),
            Some("springeap6-foobarz.rhcloud.com")
        );
        assert_eq!(host_of("example.com").as_deref(), Some("example.com"));
        assert_eq!(host_of("  "), None);
    }

    #[test]
    fn test_address_of_keeps_port() {
        assert_eq!(
            address_of("http://springeap6-foobarz.rhcloud.com/").as_deref(),
            Some("springeap6-foobarz.rhcloud.com:80")
        );
        assert_eq!(address_of("https://example.com/app").as_deref(), Some("example.com:443"));
        assert_eq!(address_of("http://127.0.0.1:8080/").as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(address_of("example.com").as_deref(), Some("example.com"));
    }

    #[test]
    fn test_bare_host_resolves_on_default_port() {
        let addrs = resolve("localhost").unwrap();
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.port() == DEFAULT_PORT));
        assert!(resolve("localhost:8080").unwrap().iter().all(|a| a.port() == 8080));
    }
}
