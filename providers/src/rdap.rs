//! RDAP domain registration lookup.
//!
//! A registry answers `GET {base}/domain/{name}` with `200` and the domain
//! object when the name is registered, and `404` when it is not.

use async_trait::async_trait;
use dominsp_core::NameRegistrar;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use url::Url;

use crate::{LookupError, join_segments, parse_base_url, request_error};

/// Verisign's RDAP service for `.com`.
pub const VERISIGN_COM_RDAP_URL: &str = "https://rdap.verisign.com/com/v1";

const PROVIDER: &str = "rdap";
const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

#[derive(Debug, Clone)]
pub struct RdapRegistrar {
    client: reqwest::Client,
    base_url: Url,
}

impl RdapRegistrar {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, LookupError> {
        Ok(Self {
            client,
            base_url: parse_base_url(PROVIDER, base_url)?,
        })
    }
}

#[async_trait]
impl NameRegistrar for RdapRegistrar {
    async fn is_registered(&self, name: &str) -> Result<bool, LookupError> {
        let url = join_segments(&self.base_url, &["domain", name]);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, RDAP_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, &e))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => {
                tracing::warn!(name, status = other.as_u16(), "Unexpected RDAP status");
                Err(LookupError::Status {
                    provider: PROVIDER,
                    status: other.as_u16(),
                })
            }
        }
    }
}
