//! Request URL templates.

use super::region::Region;

/// Default API host; regional requests prefix it with the region name.
pub const DEFAULT_HOST: &str = "api.pvp.net";

/// Location segment used for static data instead of a region.
const GLOBAL_LOCATION: &str = "global";

/// The class of a request, which selects its URL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Regional game data, counted against the rate limits
    Regional,
    /// Static metadata lookups, exempt from rate accounting
    StaticData,
    /// Live game (observer) data, counted against the rate limits
    Observer,
}

impl RequestKind {
    /// Whether requests of this kind count against the rate limits.
    pub fn is_metered(&self) -> bool {
        !matches!(self, RequestKind::StaticData)
    }
}

/// Builds request URLs for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    /// Scheme, normally `https`
    scheme: String,
    /// API host without any region prefix
    host: String,
    /// Region the URLs are built for
    region: Region,
}

impl UrlBuilder {
    /// Create a builder for the default host.
    pub fn new(region: Region) -> Self {
        Self::with_host(region, DEFAULT_HOST)
    }

    /// Create a builder for a custom host.
    pub fn with_host(region: Region, host: &str) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.trim_matches('/').to_string(),
            region,
        }
    }

    /// Get the region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Build the URL for an endpoint path.
    pub fn build(&self, kind: RequestKind, endpoint_path: &str) -> String {
        let path = endpoint_path.trim_start_matches('/');
        let region = self.region.as_str();

        match kind {
            RequestKind::Regional => format!(
                "{}://{}.{}/api/lol/{}/{}",
                self.scheme, region, self.host, region, path
            ),
            RequestKind::StaticData => format!(
                "{}://{}.{}/api/lol/static-data/{}/{}",
                self.scheme, GLOBAL_LOCATION, self.host, region, path
            ),
            RequestKind::Observer => format!(
                "{}://{}.{}/observer-mode/rest/{}",
                self.scheme, region, self.host, path
            ),
        }
    }
}
