//! Implements the `Sheet` trait against the Google Sheets v4 REST API. Reads go through
//! `sheets::Client`, the batch update is posted with `reqwest`.

use crate::api::{BatchUpdateRequest, Sheet, SHEETS_API_URL};
use crate::error::SyncError;
use crate::model::RawTable;
use anyhow::anyhow;
use sheets::types::{DateTimeRenderOption, Dimension, ValueRenderOption};
use sheets::ClientError;
use tracing::{debug, trace, warn};
use url::Url;

/// A Google spreadsheet reached over HTTPS with a bearer token.
pub struct GoogleSheet {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
}

impl GoogleSheet {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self::with_base_url(spreadsheet_id, SHEETS_API_URL)
    }

    /// Creates a `GoogleSheet` that sends its requests to `base_url` instead of Google.
    pub fn with_base_url(spreadsheet_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// A `sheets::Client` that sends `token` as is. It never refreshes the token, a rejected token
    /// surfaces as 401.
    fn sheets_client(&self, token: &str) -> sheets::Client {
        let mut client = sheets::Client::new(
            String::new(), // client_id
            String::new(), // client_secret
            String::new(), // redirect_uri
            token,
            String::new(), // refresh_token
        );
        client.with_host_override(self.base_url.trim_end_matches('/'));
        client
    }

    /// `{base}/v4/spreadsheets/{id}:batchUpdate`
    fn batch_update_url(&self) -> Result<Url, SyncError> {
        let target = format!("{}:batchUpdate", self.spreadsheet_id);
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SyncError::Transport(anyhow!("Invalid API URL '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| {
                SyncError::Transport(anyhow!("The API URL '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", &target]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn get(&mut self, token: &str, range: &str) -> Result<RawTable, SyncError> {
        debug!("Fetching range {range}");
        let response = self
            .sheets_client(token)
            .spreadsheets()
            .values_get(
                &self.spreadsheet_id,
                range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(|e| map_client_error(e, range))?;
        let values = response.body.values;
        debug!("Fetched {} rows", values.len());
        Ok(values)
    }

    async fn batch_update(
        &mut self,
        token: &str,
        request: &BatchUpdateRequest,
    ) -> Result<(), SyncError> {
        let url = self.batch_update_url()?;
        debug!(
            "Sending a batch update of {} requests",
            request.requests.len()
        );
        trace!("POST {url}");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!("Batch update failed with status {status}: {body}");
            return Err(SyncError::WriteFailed(status.as_u16()));
        }
        Ok(())
    }
}

/// 401 asks for a new login, any other status is a failed read. Errors without a status are
/// transport failures.
fn map_client_error(e: ClientError, range: &str) -> SyncError {
    match e {
        ClientError::HttpError { status, error, .. } if status.as_u16() == 401 => {
            warn!("The access token was rejected while fetching {range}: {error}");
            SyncError::ReauthRequired
        }
        ClientError::HttpError { status, error, .. } => {
            warn!("Fetching {range} failed with status {status}: {error}");
            SyncError::FetchFailed(status.as_u16())
        }
        other => {
            warn!("Fetching {range} failed: {other}");
            SyncError::Transport(anyhow::Error::new(other))
        }
    }
}
