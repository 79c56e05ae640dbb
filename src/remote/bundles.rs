//! HTTP client for the bundle store.
//!
//! Endpoints, relative to `{url}/{instanceId}/v2/bundles`:
//!
//! | Operation | Method | Path            |
//! |-----------|--------|-----------------|
//! | list      | GET    | (base)          |
//! | info      | GET    | `/{id}`         |
//! | create    | PUT    | `/{id}`         |
//! | update    | POST   | `/{id}`         |
//! | delete    | DELETE | `/{id}`         |
//! | strings   | GET    | `/{id}/{lang}`  |
//! | upload    | PUT    | `/{id}/{lang}`  |

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use super::{
    BundleChanges, BundleCredentials, BundleInfo, BundleStore, Timeouts, build_http_client,
    expect_status, join_segments, parse_base_url, parse_body,
};
use crate::core::Entries;
use crate::error::SyncResult;

const SERVICE: &str = "bundle store";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleListResponse {
    #[serde(default)]
    bundle_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BundleInfoResponse {
    bundle: BundleInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceStringsResponse {
    #[serde(default)]
    resource_strings: Entries,
}

pub struct BundleClient {
    client: Client,
    bundles_url: Url,
    credentials: BundleCredentials,
}

impl BundleClient {
    pub fn new(credentials: BundleCredentials, timeouts: Timeouts) -> SyncResult<Self> {
        let base = parse_base_url(SERVICE, &credentials.url)?;
        let bundles_url = join_segments(SERVICE, &base, &[credentials.instance_id.as_str(), "v2", "bundles"])?;
        Ok(Self {
            client: build_http_client(SERVICE, timeouts)?,
            bundles_url,
            credentials,
        })
    }

    fn bundle_url(&self, name: &str) -> SyncResult<Url> {
        join_segments(SERVICE, &self.bundles_url, &[name])
    }

    fn strings_url(&self, name: &str, language: &str) -> SyncResult<Url> {
        join_segments(SERVICE, &self.bundles_url, &[name, language])
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.credentials.user_id, Some(&self.credentials.password))
    }
}

impl BundleStore for BundleClient {
    fn list_bundle_ids(&self) -> SyncResult<Vec<String>> {
        let operation = "list bundles";
        let response = self.authed(self.client.get(self.bundles_url.clone())).send();
        let body = expect_status(SERVICE, operation, response, &[200])?;
        let list: BundleListResponse = parse_body(SERVICE, operation, &body)?;
        debug!(count = list.bundle_ids.len(), "listed bundles");
        Ok(list.bundle_ids)
    }

    fn bundle_info(&self, name: &str) -> SyncResult<BundleInfo> {
        let operation = format!("read bundle {}", name);
        let response = self.authed(self.client.get(self.bundle_url(name)?)).send();
        let body = expect_status(SERVICE, &operation, response, &[200])?;
        let info: BundleInfoResponse = parse_body(SERVICE, &operation, &body)?;
        Ok(info.bundle)
    }

    fn resource_strings(&self, name: &str, language: &str) -> SyncResult<Entries> {
        let operation = format!("read {} strings of bundle {}", language, name);
        let response = self
            .authed(self.client.get(self.strings_url(name, language)?))
            .send();
        let body = expect_status(SERVICE, &operation, response, &[200])?;
        let strings: ResourceStringsResponse = parse_body(SERVICE, &operation, &body)?;
        Ok(strings.resource_strings)
    }

    fn create_bundle(&self, name: &str, info: &BundleInfo) -> SyncResult<()> {
        let operation = format!("create bundle {}", name);
        let response = self
            .authed(self.client.put(self.bundle_url(name)?))
            .json(info)
            .send();
        expect_status(SERVICE, &operation, response, &[200, 201])?;
        Ok(())
    }

    fn update_bundle(&self, name: &str, changes: &BundleChanges) -> SyncResult<()> {
        let operation = format!("update bundle {}", name);
        let response = self
            .authed(self.client.post(self.bundle_url(name)?))
            .json(changes)
            .send();
        expect_status(SERVICE, &operation, response, &[200])?;
        Ok(())
    }

    fn delete_bundle(&self, name: &str) -> SyncResult<()> {
        let operation = format!("delete bundle {}", name);
        let response = self.authed(self.client.delete(self.bundle_url(name)?)).send();
        expect_status(SERVICE, &operation, response, &[200, 204])?;
        Ok(())
    }

    fn upload_resource_strings(&self, name: &str, language: &str, entries: &Entries) -> SyncResult<()> {
        let operation = format!("upload {} strings to bundle {}", language, name);
        let response = self
            .authed(self.client.put(self.strings_url(name, language)?))
            .json(entries)
            .send();
        expect_status(SERVICE, &operation, response, &[200])?;
        Ok(())
    }
}
