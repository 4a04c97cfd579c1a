use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use retitle_core::{MetadataSource, MovieMetadata, SeasonMetadata, ShowMetadata};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{RemoteError, Result};
use crate::models::{MovieDetail, SeasonDetail, TmdbErrorBody, TvSeriesDetail};

const BASE_URL: &str = "https://api.tmdb.org/3";

/// Language requested when none is configured.
pub const DEFAULT_LANGUAGE: &str = "zh-CN";

/// Blocking TMDB client authenticated with a v4 read access token.
pub struct TmdbClient {
    client: Client,
    api_key: String,
    language: String,
    base_url: String,
}

impl TmdbClient {
    /// Creates a client for `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MissingCredential` for an empty key, or
    /// `RemoteError::Http` if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RemoteError::MissingCredential("TMDB_API_KEY"));
        }
        let client = Client::builder()
            .user_agent(concat!("retitle/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            language: DEFAULT_LANGUAGE.to_string(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Sets the response language (`en-US`, `ja-JP`, ...).
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Points the client at another API root, e.g. a proxy.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "tmdb request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .query(&[("language", self.language.as_str())])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        check_status(status.as_u16(), &body)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the details of a TV show by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a TMDB error status, or an
    /// unexpected body.
    pub fn tv_details(&self, series_id: u64) -> Result<TvSeriesDetail> {
        self.get(&format!("/tv/{series_id}"))
    }

    /// Get the details of a TV season by series ID and season number.
    ///
    /// # Errors
    ///
    /// Same as [`TmdbClient::tv_details`].
    pub fn season_details(&self, series_id: u64, season_number: u32) -> Result<SeasonDetail> {
        self.get(&format!("/tv/{series_id}/season/{season_number}"))
    }

    /// Get the details of a movie by its ID.
    ///
    /// # Errors
    ///
    /// Same as [`TmdbClient::tv_details`].
    pub fn movie_details(&self, movie_id: u64) -> Result<MovieDetail> {
        self.get(&format!("/movie/{movie_id}"))
    }

    /// Fetches a show and the episode list of every season.
    ///
    /// A season whose details cannot be fetched is kept with no episodes, so
    /// the compiler reports it as a skipped season instead of failing the show.
    ///
    /// # Errors
    ///
    /// Returns an error only if the show itself cannot be fetched.
    pub fn fetch_show(&self, series_id: u64) -> Result<ShowMetadata> {
        let detail = self.tv_details(series_id)?;

        let seasons = detail
            .seasons
            .iter()
            .map(|summary| {
                match self.season_details(series_id, summary.season_number) {
                    Ok(season) => SeasonMetadata::from(season),
                    Err(e) => {
                        warn!(
                            series_id,
                            season = summary.season_number,
                            error = %e,
                            "failed to fetch season details"
                        );
                        SeasonMetadata::new(summary.season_number, Vec::new())
                    }
                }
            })
            .collect();

        Ok(detail.into_show(seasons))
    }
}

impl MetadataSource for TmdbClient {
    fn show(&self, id: u64) -> retitle_core::Result<ShowMetadata> {
        self.fetch_show(id).map_err(RemoteError::into_metadata)
    }

    fn movie(&self, id: u64) -> retitle_core::Result<MovieMetadata> {
        self.movie_details(id)
            .map(MovieMetadata::from)
            .map_err(RemoteError::into_metadata)
    }
}

/// Maps a non-200 response to the most specific error available.
pub(crate) fn check_status(status: u16, body: &str) -> Result<()> {
    if status == 200 {
        return Ok(());
    }
    match serde_json::from_str::<TmdbErrorBody>(body) {
        Ok(err) if !err.status_message.is_empty() => Err(RemoteError::Tmdb {
            code: err.status_code,
            message: err.status_message,
        }),
        _ => Err(RemoteError::Status {
            status,
            message: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            TmdbClient::new("  "),
            Err(RemoteError::MissingCredential("TMDB_API_KEY"))
        ));
    }

    #[test]
    fn builder_options() {
        let client = TmdbClient::new("token")
            .unwrap()
            .with_language("en-US")
            .with_base_url("http://localhost:8080/3/");

        assert_eq!(client.language(), "en-US");
        assert_eq!(client.url("/tv/1"), "http://localhost:8080/3/tv/1");
    }

    #[test]
    fn default_language_and_base() {
        let client = TmdbClient::new("token").unwrap();
        assert_eq!(client.language(), "zh-CN");
        assert_eq!(client.url("/movie/603"), "https://api.tmdb.org/3/movie/603");
    }

    #[test]
    fn status_ok_passes() {
        assert!(check_status(200, "{}").is_ok());
    }

    #[test]
    fn status_with_tmdb_body() {
        let body = r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#;
        match check_status(404, body) {
            Err(RemoteError::Tmdb { code, message }) => {
                assert_eq!(code, 34);
                assert!(message.contains("could not be found"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn status_with_plain_body() {
        match check_status(502, "<html>Bad Gateway</html>") {
            Err(RemoteError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
