//! Rate-aware client for the game statistics API.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::lookup::Lookup;
use super::realm::Realm;
use super::region::Region;
use super::transport::{HttpTransport, ReqwestTransport};
use super::url::{RequestKind, UrlBuilder};
use crate::config::RiftwatchConfig;
use crate::error::{ApiError, ErrorKind, Result};
use crate::ratelimit::{RateLimitRule, RateLimiter};

/// Name of the query parameter carrying the API key.
const API_KEY_PARAM: &str = "api_key";

/// Endpoint versions.
const SUMMONER_BY_NAME_PATH: &str = "v1.4/summoner/by-name";
const MATCH_PATH: &str = "v2.2/match";
const SPECTATOR_PATH: &str = "consumer/getSpectatorGameInfo";
const CHAMPION_LIST_PATH: &str = "v1.2/champion";
const REALM_PATH: &str = "v1.2/realm";

/// Bytes escaped in a path segment. Commas separate names in a batch
/// lookup, so a comma inside a name is escaped too.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b',')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Optional parameters of a champion list lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChampionListQuery {
    /// Extra data to include per champion (e.g. `image`, `all`)
    pub champ_data: Option<String>,
    /// Key the result map by numeric id instead of champion key
    pub data_by_id: Option<bool>,
    /// Locale of the returned strings
    pub locale: Option<String>,
    /// Static data version to query
    pub version: Option<String>,
}

/// Client for the game statistics API.
///
/// Every metered request is recorded on each configured rate limit tier.
/// The client never refuses a request on its own: callers check
/// [`ApiClient::available`] or await [`ApiClient::wait_for_capacity`]
/// first. Static data lookups are not counted.
pub struct ApiClient<T: HttpTransport = ReqwestTransport> {
    /// URL templates for the configured region
    urls: UrlBuilder,
    /// API key attached to every request
    api_key: String,
    /// One window per rate limit tier
    limiter: RateLimiter,
    /// Transport used to reach the API
    transport: T,
    /// Last successfully fetched realm metadata
    realm: Option<Realm>,
    /// When `realm` was last replaced
    realm_refreshed_at: Option<DateTime<Utc>>,
}

impl ApiClient<ReqwestTransport> {
    /// Create a client backed by reqwest from a loaded configuration.
    pub async fn from_config(config: &RiftwatchConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::with_timeout(config.client.timeout())?;
        let urls = UrlBuilder::with_host(config.client.region, &config.client.host);
        Self::connect_with_urls(urls, &config.client.api_key, &config.rate_limits, transport).await
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create a client for `region` and fetch the initial realm metadata.
    ///
    /// A failed realm fetch leaves the realm unset; it can be retried with
    /// [`ApiClient::refresh_realm_metadata`].
    pub async fn connect(
        region: Region,
        api_key: &str,
        tiers: &[RateLimitRule],
        transport: T,
    ) -> Result<Self> {
        Self::connect_with_urls(UrlBuilder::new(region), api_key, tiers, transport).await
    }

    /// Like [`ApiClient::connect`], with custom URL templates.
    pub async fn connect_with_urls(
        urls: UrlBuilder,
        api_key: &str,
        tiers: &[RateLimitRule],
        transport: T,
    ) -> Result<Self> {
        let mut client = Self {
            urls,
            api_key: api_key.to_string(),
            limiter: RateLimiter::new(tiers)?,
            transport,
            realm: None,
            realm_refreshed_at: None,
        };

        info!(
            region = %client.region(),
            tiers = tiers.len(),
            "API client created"
        );

        client.refresh_realm_metadata().await;
        Ok(client)
    }

    /// Get the region this client queries.
    pub fn region(&self) -> Region {
        self.urls.region()
    }

    /// Get the cached realm metadata, if any fetch has succeeded.
    pub fn realm(&self) -> Option<&Realm> {
        self.realm.as_ref()
    }

    /// When the cached realm metadata was last replaced.
    pub fn realm_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.realm_refreshed_at
    }

    /// Get the rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Record one outbound request on every tier.
    pub fn record_request(&mut self) {
        self.limiter.record();
    }

    /// Whether every tier currently permits another request.
    pub fn available(&mut self) -> bool {
        self.limiter.available()
    }

    /// How long until every tier permits another request.
    pub fn wait_time(&mut self) -> Duration {
        self.limiter.wait_time()
    }

    /// [`ApiClient::wait_time`] in seconds.
    pub fn wait_time_seconds(&mut self) -> f64 {
        self.wait_time().as_secs_f64()
    }

    /// Sleep until every tier permits another request.
    pub async fn wait_for_capacity(&mut self) {
        loop {
            let wait = self.wait_time();
            if wait.is_zero() {
                return;
            }
            debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate limit capacity");
            tokio::time::sleep(wait).await;
        }
    }

    /// Perform a GET against an endpoint and parse the JSON body.
    ///
    /// The API key and every parameter with a value are sent as query
    /// parameters; parameters set to `None` are left out. Metered kinds
    /// are recorded once the transport returns, whatever the outcome.
    pub async fn request(
        &mut self,
        kind: RequestKind,
        endpoint_path: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<Value> {
        let url = self.urls.build(kind, endpoint_path);

        let mut query = Vec::with_capacity(params.len() + 1);
        query.push((API_KEY_PARAM.to_string(), self.api_key.clone()));
        query.extend(
            params
                .iter()
                .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone()))),
        );

        debug!(url = %url, kind = ?kind, params = query.len() - 1, "Sending request");

        let result = self.transport.get(&url, &query).await;
        if kind.is_metered() {
            self.record_request();
        }
        let response = result?;

        if !response.status.is_success() {
            let err = ApiError::new(response.status, response.headers);
            debug!(url = %url, status = err.status().as_u16(), error = %err, "Request failed");
            return Err(err.into());
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Look up players by name. Names are escaped for use in the path.
    pub async fn lookup_players_by_name(&mut self, names: &[&str]) -> Result<Value> {
        let names = names
            .iter()
            .map(|name| utf8_percent_encode(name, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("{}/{}", SUMMONER_BY_NAME_PATH, names);
        self.request(RequestKind::Regional, &path, &[]).await
    }

    /// Look up a finished match. A missing match is [`Lookup::NotFound`].
    pub async fn lookup_match(
        &mut self,
        match_id: u64,
        include_timeline: bool,
    ) -> Result<Lookup<Value>> {
        let path = format!("{}/{}", MATCH_PATH, match_id);
        let params = [("includeTimeline", Some(include_timeline.to_string()))];
        soft_miss(self.request(RequestKind::Regional, &path, &params).await)
    }

    /// Look up the game a player is currently in. A player not in game is
    /// [`Lookup::NotFound`].
    pub async fn lookup_current_game(&mut self, summoner_id: u64) -> Result<Lookup<Value>> {
        let path = format!(
            "{}/{}/{}",
            SPECTATOR_PATH,
            self.region().platform_id(),
            summoner_id
        );
        soft_miss(self.request(RequestKind::Observer, &path, &[]).await)
    }

    /// Look up the champion list from static data.
    pub async fn lookup_champion_list(&mut self, query: &ChampionListQuery) -> Result<Value> {
        let params = [
            ("champData", query.champ_data.clone()),
            ("dataById", query.data_by_id.map(|b| b.to_string())),
            ("locale", query.locale.clone()),
            ("version", query.version.clone()),
        ];
        self.request(RequestKind::StaticData, CHAMPION_LIST_PATH, &params).await
    }

    /// Re-fetch the realm metadata.
    ///
    /// On failure the previously cached realm is kept. Returns whether the
    /// cache was replaced.
    pub async fn refresh_realm_metadata(&mut self) -> bool {
        let fetched = self
            .request(RequestKind::StaticData, REALM_PATH, &[])
            .await
            .and_then(|body| Ok(serde_json::from_value::<Realm>(body)?));

        match fetched {
            Ok(realm) => {
                debug!(version = %realm.v, cdn = %realm.cdn, "Realm metadata refreshed");
                self.realm = Some(realm);
                self.realm_refreshed_at = Some(Utc::now());
                true
            }
            Err(e) => {
                warn!(
                    error = %e,
                    cached = self.realm.is_some(),
                    "Realm metadata refresh failed"
                );
                false
            }
        }
    }

    /// URL of a champion's icon, once realm metadata is available.
    pub fn champion_icon_url(&self, champion_key: &str) -> Option<String> {
        self.realm
            .as_ref()
            .map(|realm| realm.champion_icon_url(champion_key))
    }

    /// URL of a profile icon, once realm metadata is available.
    pub fn profile_icon_url(&self, icon_id: u32) -> Option<String> {
        self.realm.as_ref().map(|realm| realm.profile_icon_url(icon_id))
    }
}

/// Turn a "Data not found" error into [`Lookup::NotFound`].
fn soft_miss(result: Result<Value>) -> Result<Lookup<Value>> {
    match result {
        Ok(body) => Ok(Lookup::Found(body)),
        Err(e) if e.api_kind() == Some(ErrorKind::NotFound) => Ok(Lookup::NotFound),
        Err(e) => Err(e),
    }
}
