//! Minimal HTTP client for the NATS monitoring endpoints.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::sort::SortKey;
use crate::types::{ConnectionList, ServerVitals};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not get /{endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not get /{endpoint}: HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("could not decode /{endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid url for /{endpoint}: {source}")]
    Url {
        endpoint: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Where snapshots come from. Both calls may be slow or fail; the sampler
/// treats every error as non-fatal.
pub trait MetricsSource: Send + Sync + 'static {
    fn fetch_vitals(&self) -> impl Future<Output = Result<ServerVitals, FetchError>> + Send;

    fn fetch_connections(
        &self,
        limit: u32,
        sort: SortKey,
    ) -> impl Future<Output = Result<ConnectionList, FetchError>> + Send;
}

pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn varz_url(&self) -> Result<Url, FetchError> {
        self.base
            .join("varz")
            .map_err(|source| FetchError::Url {
                endpoint: "varz",
                source,
            })
    }

    pub fn connz_url(&self, limit: u32, sort: SortKey) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join("connz")
            .map_err(|source| FetchError::Url {
                endpoint: "connz",
                source,
            })?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("sort", sort.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
    ) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        let body = resp
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

impl MetricsSource for HttpSource {
    fn fetch_vitals(&self) -> impl Future<Output = Result<ServerVitals, FetchError>> + Send {
        async move {
            let url = self.varz_url()?;
            self.get_json("varz", url).await
        }
    }

    fn fetch_connections(
        &self,
        limit: u32,
        sort: SortKey,
    ) -> impl Future<Output = Result<ConnectionList, FetchError>> + Send {
        async move {
            let url = self.connz_url(limit, sort)?;
            self.get_json("connz", url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> HttpSource {
        HttpSource::new(Url::parse("http://127.0.0.1:8222/").unwrap()).unwrap()
    }

    #[test]
    fn varz_url_joins_base() {
        assert_eq!(source().varz_url().unwrap().as_str(), "http://127.0.0.1:8222/varz");
    }

    #[test]
    fn connz_url_carries_limit_and_sort() {
        let url = source().connz_url(250, SortKey::OutBytes).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8222/connz?limit=250&sort=bytes_to"
        );
    }

    #[test]
    fn status_error_names_endpoint() {
        let e = FetchError::Status {
            endpoint: "connz",
            status: 503,
        };
        assert_eq!(e.to_string(), "could not get /connz: HTTP 503");
    }
}
