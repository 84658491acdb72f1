use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{OccurrenceRecord, SpeciesName},
    protocol::OccurrenceResults,
};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

const SPECIES_NAMES_PATH: &str = "analytics/species-names/";
const OCCURRENCES_PATH: &str = "analytics/species/";
const SPECIES_QUERY_KEY: &str = "scientific_name";

/// Read-only view of the occurrence backend.
#[async_trait]
pub trait OccurrenceApi: Send + Sync {
    async fn species_names(&self) -> Result<Vec<SpeciesName>, FetchError>;
    async fn occurrences(&self, species: &SpeciesName)
        -> Result<Vec<OccurrenceRecord>, FetchError>;
}

pub struct MissingOccurrenceApi;

#[async_trait]
impl OccurrenceApi for MissingOccurrenceApi {
    async fn species_names(&self) -> Result<Vec<SpeciesName>, FetchError> {
        Err(FetchError::Unavailable)
    }

    async fn occurrences(
        &self,
        _species: &SpeciesName,
    ) -> Result<Vec<OccurrenceRecord>, FetchError> {
        Err(FetchError::Unavailable)
    }
}

pub struct HttpOccurrenceApi {
    http: Client,
    base_url: Url,
}

impl HttpOccurrenceApi {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, mut base_url: Url) -> Self {
        // `Url::join` drops the last segment unless the base ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|err| FetchError::Request(format!("invalid endpoint {path}: {err}")))
    }

    async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|err| FetchError::from_reqwest(url.as_str(), err))
    }
}

#[async_trait]
impl OccurrenceApi for HttpOccurrenceApi {
    async fn species_names(&self) -> Result<Vec<SpeciesName>, FetchError> {
        let url = self.endpoint(SPECIES_NAMES_PATH)?;
        debug!(%url, "fetching species names");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| FetchError::from_reqwest(url.as_str(), err))?;
        Self::decode(&url, response).await
    }

    async fn occurrences(
        &self,
        species: &SpeciesName,
    ) -> Result<Vec<OccurrenceRecord>, FetchError> {
        let url = self.endpoint(OCCURRENCES_PATH)?;
        debug!(%url, species = %species, "fetching occurrence records");
        let response = self
            .http
            .get(url.clone())
            .query(&[(SPECIES_QUERY_KEY, species.as_str())])
            .send()
            .await
            .map_err(|err| FetchError::from_reqwest(url.as_str(), err))?;
        let body: OccurrenceResults = Self::decode(&url, response).await?;
        Ok(body.into_records())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
