//! Client for the game statistics web API.

mod client;
mod lookup;
mod realm;
mod region;
mod transport;
mod url;

pub use client::{ApiClient, ChampionListQuery};
pub use lookup::Lookup;
pub use realm::Realm;
pub use region::Region;
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
pub use url::{RequestKind, UrlBuilder, DEFAULT_HOST};
