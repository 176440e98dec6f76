//! HTTP adapter for [`BackendRpc`].
//!
//! Each call is a `POST {base_url}/{call}`. Calls with input carry it as a
//! JSON body; calls with output answer with JSON. Any non-2xx answer is a
//! rejection whose body is the backend's message.

use crate::error::RpcError;
use crate::model::{CertConfig, Config, Liveness};
use crate::rpc::{BackendRpc, RpcCall};

use std::time::Duration;

use log::{debug, trace};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

const CONNECT_TIMEOUT_DURATION: Duration = Duration::from_secs(5);
const REQUEST_ID_HEADER_KEY: &str = "x-request-id";

#[derive(Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url_str: &str) -> Result<Self, RpcError> {
        let mut base_url = Url::parse(base_url_str)?;

        // Call names are joined under the base path, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT_DURATION)
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn prepare_request(&self, call: RpcCall) -> Result<RequestBuilder, RpcError> {
        let url = self.base_url.join(call.as_str())?;
        let request_id = Uuid::new_v4();
        trace!("{call} -> {url} (request {request_id})");

        Ok(self
            .client
            .post(url)
            .header(REQUEST_ID_HEADER_KEY, request_id.to_string()))
    }

    async fn send(&self, call: RpcCall, request: RequestBuilder) -> Result<Response, RpcError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!("{call} rejected: HTTP {} - {message}", status.as_u16());
            return Err(RpcError::backend(status.as_u16(), message));
        }

        Ok(response)
    }

    async fn invoke(&self, call: RpcCall) -> Result<(), RpcError> {
        let request = self.prepare_request(call)?;
        self.send(call, request).await?;
        Ok(())
    }

    async fn invoke_with<B: Serialize + ?Sized>(
        &self,
        call: RpcCall,
        body: &B,
    ) -> Result<(), RpcError> {
        let request = self.prepare_request(call)?.json(body);
        self.send(call, request).await?;
        Ok(())
    }

    async fn query<T: DeserializeOwned>(&self, call: RpcCall) -> Result<T, RpcError> {
        let request = self.prepare_request(call)?;
        let response = self.send(call, request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl BackendRpc for HttpBackend {
    async fn get_config(&self) -> Result<Config, RpcError> {
        self.query(RpcCall::GetConfig).await
    }

    async fn update_config(&self, config: &Config) -> Result<(), RpcError> {
        self.invoke_with(RpcCall::UpdateConfig, config).await
    }

    async fn import_tls_or_cert_from_path(&self, cert: &CertConfig) -> Result<(), RpcError> {
        self.invoke_with(RpcCall::ImportTlsOrCertFromPath, cert)
            .await
    }

    async fn start_server(&self) -> Result<(), RpcError> {
        self.invoke(RpcCall::StartServer).await
    }

    async fn stop_server(&self) -> Result<(), RpcError> {
        self.invoke(RpcCall::StopServer).await
    }

    async fn check_server_status(&self) -> Result<Liveness, RpcError> {
        self.query(RpcCall::CheckServerStatus).await
    }
}
