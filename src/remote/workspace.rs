//! HTTP client for the conversation workspace API.

use reqwest::Url;
use reqwest::blocking::Client;
use tracing::{debug, info};

use super::{
    Timeouts, WorkspaceApi, WorkspaceCredentials, build_http_client, expect_status, join_segments,
    parse_base_url,
};
use crate::core::document::WorkspaceDocument;
use crate::error::SyncResult;

const SERVICE: &str = "workspace API";

pub struct WorkspaceClient {
    client: Client,
    base_url: Url,
    credentials: WorkspaceCredentials,
}

impl WorkspaceClient {
    pub fn new(base_url: &str, credentials: WorkspaceCredentials, timeouts: Timeouts) -> SyncResult<Self> {
        Ok(Self {
            client: build_http_client(SERVICE, timeouts)?,
            base_url: parse_base_url(SERVICE, base_url)?,
            credentials,
        })
    }

    fn workspace_url(&self, workspace_id: Option<&str>, query: &[(&str, &str)]) -> SyncResult<Url> {
        let mut segments = vec!["workspaces"];
        segments.extend(workspace_id);
        let mut url = join_segments(SERVICE, &self.base_url, &segments)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }
}

impl WorkspaceApi for WorkspaceClient {
    fn fetch(&self, workspace_id: &str, version: &str) -> SyncResult<WorkspaceDocument> {
        let url = self.workspace_url(Some(workspace_id), &[("version", version), ("export", "true")])?;
        let operation = format!("fetch workspace {}", workspace_id);
        debug!(%url, "fetching workspace");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send();
        let body = expect_status(SERVICE, &operation, response, &[200])?;
        WorkspaceDocument::from_json(&body)
    }

    fn store(&self, workspace_id: Option<&str>, version: &str, document: &WorkspaceDocument) -> SyncResult<()> {
        let url = self.workspace_url(workspace_id, &[("version", version)])?;
        // Creation answers 201, update answers 200.
        let (operation, expected) = match workspace_id {
            Some(id) => (format!("update workspace {}", id), 200),
            None => ("create workspace".to_string(), 201),
        };
        debug!(%url, "storing workspace");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .json(&document.as_value())
            .send();
        expect_status(SERVICE, &operation, response, &[expected])?;
        info!(operation = %operation, "workspace stored");
        Ok(())
    }
}
