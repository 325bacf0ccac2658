//! HTTP client for the Cosmos DB administrative REST endpoint.

use async_trait::async_trait;
use chrono::Utc;
use portamongo_core::config::MongoConfig;
use portamongo_core::connection::management_endpoint;
use portamongo_core::provisioning::{
    AdminClient, CollectionResource, DatabaseResource, Offer, ProvisioningError, Result,
};
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::auth::{authorization_token, rfc1123_date, MasterKey};
use super::error::{map_status_error, map_transport_error};

const API_VERSION: &str = "2018-12-31";
const CONTINUATION_HEADER: &str = "x-ms-continuation";
const THROUGHPUT_HEADER: &str = "x-ms-offer-throughput";

#[derive(Debug, Deserialize)]
struct CollectionFeed {
    #[serde(rename = "DocumentCollections", default)]
    collections: Vec<CollectionResource>,
}

#[derive(Debug, Deserialize)]
struct OfferFeed {
    #[serde(rename = "Offers", default)]
    offers: Vec<Offer>,
}

/// Signed request target: where to send it and what to sign.
struct Target<'a> {
    method: Method,
    path: String,
    resource_type: &'a str,
    resource_link: String,
    operation: &'static str,
}

/// Administrative client for one Cosmos DB account.
///
/// Opened per operation by the connection factory and dropped afterwards.
#[derive(Debug)]
pub struct CosmosAdminClient {
    client: reqwest::Client,
    base_url: String,
    key: MasterKey,
    database: String,
}

impl CosmosAdminClient {
    /// Create a client for `base_url`, signing with the base64 `key`.
    ///
    /// `database` is only used to give errors context.
    pub fn new(
        base_url: impl Into<String>,
        key: &str,
        database: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key: MasterKey::from_base64(key)?,
            database: database.into(),
        })
    }

    /// Create from a configuration.
    ///
    /// The endpoint is the primary host of the connection string on the
    /// management port and the key is the connection string password.
    pub fn from_config(config: &MongoConfig) -> Result<Self> {
        let info = config.connection_info()?;
        let host = info.primary_host().ok_or_else(|| {
            ProvisioningError::Configuration(
                "Connection string has no TCP host to reach the management endpoint on"
                    .to_string(),
            )
        })?;
        let key = info.password().ok_or_else(|| {
            ProvisioningError::Configuration(
                "Connection string has no password to use as the management key".to_string(),
            )
        })?;

        Self::new(
            management_endpoint(host, config.management_port()),
            key,
            config.database_name(),
        )
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, target: &Target<'_>) -> Result<RequestBuilder> {
        let date = rfc1123_date(Utc::now());
        let token = authorization_token(
            &self.key,
            target.method.as_str(),
            target.resource_type,
            &target.resource_link,
            &date,
        )?;

        Ok(self
            .client
            .request(target.method.clone(), self.url(&target.path))
            .header(header::AUTHORIZATION, token)
            .header(header::ACCEPT, "application/json")
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION))
    }

    async fn send(&self, target: &Target<'_>, request: RequestBuilder) -> Result<Response> {
        tracing::debug!(
            method = %target.method,
            path = %target.path,
            operation = target.operation,
            "Sending management request"
        );
        request
            .send()
            .await
            .map_err(|e| map_transport_error(e, target.operation, &self.database))
    }

    async fn reject(&self, target: &Target<'_>, response: Response) -> ProvisioningError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        map_status_error(status, &body, target.operation, &self.database)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        target: &Target<'_>,
        response: Response,
    ) -> Result<T> {
        response.json().await.map_err(|e| ProvisioningError::Request {
            operation: target.operation,
            database: self.database.clone(),
            message: format!("invalid response body: {e}"),
        })
    }

    /// Reads every page of a feed, following continuation tokens.
    ///
    /// Returns `None` when the first page is a 404.
    async fn read_feed<P, T>(
        &self,
        target: &Target<'_>,
        items: impl Fn(P) -> Vec<T>,
    ) -> Result<Option<Vec<T>>>
    where
        P: DeserializeOwned,
    {
        let mut collected = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self.request(target)?;
            if let Some(token) = &continuation {
                request = request.header(CONTINUATION_HEADER, token.as_str());
            }

            let response = self.send(target, request).await?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND && continuation.is_none() {
                return Ok(None);
            }
            if !status.is_success() {
                return Err(self.reject(target, response).await);
            }

            let next = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            let page: P = self.decode(target, response).await?;
            collected.extend(items(page));

            match next {
                Some(token) => continuation = Some(token),
                None => return Ok(Some(collected)),
            }
        }
    }
}

#[async_trait]
impl AdminClient for CosmosAdminClient {
    async fn create_database_if_not_exists(
        &self,
        database_id: &str,
        throughput: u32,
    ) -> Result<()> {
        let target = Target {
            method: Method::POST,
            path: "dbs".to_string(),
            resource_type: "dbs",
            resource_link: String::new(),
            operation: "create_database",
        };
        let request = self
            .request(&target)?
            .header(THROUGHPUT_HEADER, throughput.to_string())
            .json(&serde_json::json!({ "id": database_id }));

        let response = self.send(&target, request).await?;
        match response.status() {
            StatusCode::CONFLICT => {
                tracing::debug!(database = %database_id, "Database already exists");
                Ok(())
            }
            status if status.is_success() => {
                tracing::info!(database = %database_id, throughput, "Created database");
                Ok(())
            }
            _ => Err(self.reject(&target, response).await),
        }
    }

    async fn find_database(&self, database_id: &str) -> Result<Option<DatabaseResource>> {
        let target = Target {
            method: Method::GET,
            path: format!("dbs/{}", urlencoding::encode(database_id)),
            resource_type: "dbs",
            resource_link: format!("dbs/{database_id}"),
            operation: "find_database",
        };
        let response = self.send(&target, self.request(&target)?).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => self.decode(&target, response).await.map(Some),
            _ => Err(self.reject(&target, response).await),
        }
    }

    async fn list_collections(
        &self,
        database: &DatabaseResource,
    ) -> Result<Option<Vec<CollectionResource>>> {
        let target = Target {
            method: Method::GET,
            path: format!("dbs/{}/colls", urlencoding::encode(&database.id)),
            resource_type: "colls",
            resource_link: format!("dbs/{}", database.id),
            operation: "list_collections",
        };

        self.read_feed(&target, |feed: CollectionFeed| feed.collections)
            .await
    }

    async fn find_offer(&self, resource_link: &str) -> Result<Option<Offer>> {
        let target = Target {
            method: Method::GET,
            path: "offers".to_string(),
            resource_type: "offers",
            resource_link: String::new(),
            operation: "find_offer",
        };

        let offers = self
            .read_feed(&target, |feed: OfferFeed| feed.offers)
            .await?
            .unwrap_or_default();

        Ok(offers
            .into_iter()
            .find(|offer| offer.resource == resource_link))
    }

    async fn replace_offer(&self, offer: &Offer, throughput: u32) -> Result<Offer> {
        let target = Target {
            method: Method::PUT,
            path: format!("offers/{}", offer.rid),
            resource_type: "offers",
            resource_link: offer.rid.to_lowercase(),
            operation: "replace_offer",
        };
        let request = self.request(&target)?.json(&offer.with_throughput(throughput));

        let response = self.send(&target, request).await?;
        if response.status().is_success() {
            self.decode(&target, response).await
        } else {
            Err(self.reject(&target, response).await)
        }
    }
}
