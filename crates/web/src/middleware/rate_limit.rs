//! Rate limiting for the staff login endpoint using governor and
//! `tower_governor`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor for the client address.
///
/// By default only the peer address is used, since any client can send
/// forwarding headers. With `trust_proxy` set, the address appended by the
/// reverse proxy (the last `X-Forwarded-For` hop, then `X-Real-IP`) wins.
///
/// The peer address is only available when the server is started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Clone, Copy, Default)]
pub struct ClientIpKeyExtractor {
    trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy: bool) -> Self {
        Self { trust_proxy }
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy
            && let Some(ip) = proxy_client_ip(req.headers())
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Client address as reported by a trusted reverse proxy.
///
/// Earlier `X-Forwarded-For` hops come from the client and are ignored.
fn proxy_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(','))
        .last()
        .and_then(|s| s.trim().parse::<IpAddr>().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    })
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create the rate limiter for staff login: ~10 requests per minute per IP.
///
/// One token is replenished every 6 seconds with a burst of 10, which covers
/// loading the form and a few attempts.
///
/// Returns `None` only if the builder rejects the quota.
#[must_use]
pub fn login_rate_limiter(trust_proxy: bool) -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy))
        .per_second(6)
        .burst_size(10)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}
