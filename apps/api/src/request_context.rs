use std::net::{IpAddr, SocketAddr};

use auditrail_domain::RequestContext;
use axum::http::{HeaderMap, HeaderName};
use ipnet::IpNet;

/// Derives the caller address and correlation id from an inbound request.
///
/// `x-forwarded-for` is only honored when the TCP peer is a trusted proxy.
#[derive(Debug, Clone)]
pub struct RequestContextResolver {
    request_id_header: HeaderName,
    trusted_proxies: Vec<IpNet>,
}

impl RequestContextResolver {
    pub fn new(request_id_header: HeaderName, trusted_proxies: Vec<IpNet>) -> Self {
        Self {
            request_id_header,
            trusted_proxies,
        }
    }

    pub fn resolve(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> RequestContext {
        RequestContext {
            source_ip: self.source_ip(headers, peer.map(|address| address.ip())),
            request_id: header_text(headers, &self.request_id_header),
        }
    }

    fn source_ip(&self, headers: &HeaderMap, peer: Option<IpAddr>) -> Option<String> {
        let peer = peer?;
        if !self.trusted_proxies.iter().any(|network| network.contains(&peer)) {
            return Some(peer.to_string());
        }

        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);

        forwarded.or_else(|| Some(peer.to_string()))
    }
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
