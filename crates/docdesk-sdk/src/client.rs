//! HTTP client

use std::sync::Arc;

use reqwest::{header, multipart, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::services::{DirectoryService, DocTypesService, DocumentsService, SessionService};
use crate::{Result, VERSION};

/// DocDesk API client
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,
    base_url: Url,
    auth: AuthContext,
    http: reqwest::Client,
}

/// Multipart file part
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Client {
    /// Client backed by the process-wide auth context
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthContext::global())
    }

    pub fn with_auth(config: ClientConfig, auth: AuthContext) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!("docdesk-rust/{}", VERSION))
                .map_err(|e| Error::Config(e.to_string()))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner { config, base_url, auth, http }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    /// Get the document types service
    pub fn doc_types(&self) -> DocTypesService {
        DocTypesService::new(self.clone())
    }

    /// Get the documents service
    pub fn documents(&self) -> DocumentsService {
        DocumentsService::new(self.clone())
    }

    /// Get the companies, contacts, roles and users service
    pub fn directory(&self) -> DirectoryService {
        DirectoryService::new(self.clone())
    }

    /// Get the session service
    pub fn session(&self) -> SessionService {
        SessionService::new(self.clone())
    }

    /// Make a GET request
    pub(crate) async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let mut url = self.url(path)?;
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        let request = self.inner.http.request(Method::GET, url);
        self.execute(Method::GET, path, request, cancel).await?.require()
    }

    /// Make a JSON request
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<Body> {
        let request = self.inner.http.request(method.clone(), self.url(path)?).json(body);
        self.execute(method, path, request, cancel).await
    }

    /// Make a multipart request with an optional `file` part and a JSON `data` part
    pub(crate) async fn send_multipart<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        file: Option<FilePart>,
        data: &B,
        cancel: &CancellationToken,
    ) -> Result<Body> {
        let mut form = multipart::Form::new().text("data", serde_json::to_string(data)?);
        if let Some(file) = file {
            let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = file.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            form = form.part("file", part);
        }

        let request = self.inner.http.request(method.clone(), self.url(path)?).multipart(form);
        self.execute(method, path, request, cancel).await
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        mut request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Body> {
        if let Some(token) = self.inner.auth.token() {
            request = request.bearer_auth(token);
        }

        tracing::debug!("{} {}", method, path);

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, Error>((status, bytes))
        };

        let (status, bytes) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = exchange => result?,
        };

        if status.is_success() {
            return Body::parse(&bytes);
        }

        tracing::warn!("{} {} failed with status {}", method, path, status);
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthenticated);
        }
        Err(Error::Api { status: status.as_u16(), message: error_message(status, &bytes) })
    }
}

/// Successful response body with the `data` envelope removed
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Body {
    Empty,
    Json(Value),
}

impl Body {
    fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Empty);
        }
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::MalformedBody(format!("invalid JSON: {}", e)))?;
        Ok(Self::Json(unwrap_envelope(value)))
    }

    /// The JSON value; an empty body is an error
    pub(crate) fn require(self) -> Result<Value> {
        match self {
            Self::Json(Value::Null) | Self::Empty => {
                Err(Error::MalformedBody("empty response body".into()))
            }
            Self::Json(value) => Ok(value),
        }
    }
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn error_message(status: StatusCode, bytes: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        for key in ["message", "error", "msg", "detail"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(bytes).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer, auth: AuthContext) -> Client {
        Client::with_auth(ClientConfig::for_url(server.uri()), auth).unwrap()
    }

    #[test]
    fn test_envelope() {
        assert_eq!(unwrap_envelope(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({"data": null, "id": 1})), json!({"data": null, "id": 1}));
        assert_eq!(unwrap_envelope(json!([{"data": 1}])), json!([{"data": 1}]));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, br#"{"message":"bad name"}"#),
            "bad name"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b"upstream down"), "upstream down");
        assert_eq!(error_message(StatusCode::NOT_FOUND, b""), "Not Found");
    }

    #[tokio::test]
    async fn test_get_sends_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/getDocTypeFull"))
            .and(query_param("id", "7"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 7}})))
            .mount(&server)
            .await;

        let auth = AuthContext::new();
        auth.init("secret");
        let client = client_for(&server, auth).await;
        let value = client
            .get("documents/getDocTypeFull", &[("id", "7")], &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value, json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_non_success_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
            .mount(&server)
            .await;

        let client = client_for(&server, AuthContext::new()).await;
        let err = client
            .get("documents/getRoles", &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, ref message } if message == "db down"));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server, AuthContext::new()).await;
        let err = client
            .get("documents/getUser", &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[tokio::test]
    async fn test_empty_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server, AuthContext::new()).await;
        let err = client
            .get("documents/getDocType", &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, AuthContext::new()).await;
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = client.get("documents/getDocType", &[], &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_multipart_carries_file_and_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents/createDocument"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "d1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, AuthContext::new()).await;
        let file = FilePart {
            file_name: "a.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: b"%PDF".to_vec(),
        };
        let body = client
            .send_multipart(
                Method::POST,
                "documents/createDocument",
                Some(file),
                &json!({"docTypeId": "1"}),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(body, Body::Json(json!({"id": "d1"})));

        let requests = server.received_requests().await.unwrap();
        let raw = String::from_utf8_lossy(&requests[0].body).to_string();
        assert!(raw.contains("name=\"file\""));
        assert!(raw.contains("filename=\"a.pdf\""));
        assert!(raw.contains("name=\"data\""));
        assert!(raw.contains(r#"{"docTypeId":"1"}"#));
    }
}
