//! Blocking HTTP client for the Codeup repository API

use crate::api::RepositoryApi;
use crate::errors::HttpError;
use crate::types::{ApiResponse, FileBlob, GetFileBlobsRequest, ListRepositoryTreeRequest, TreeEntry};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sluice_config::{ClientCredentials, HttpConfig};
use tracing::{debug, info};
use url::Url;

const ACCESS_KEY_HEADER: &str = "x-acs-accesskey-id";

/// Repository API over HTTPS
///
/// Request signing is left to the gateway in front of the endpoint; the
/// client forwards the access key id and relies on the `accessToken`
/// query parameter for repository access.
#[derive(Debug, Clone)]
pub struct HttpRepositoryClient {
    client: Client,
    base_url: Url,
}

impl HttpRepositoryClient {
    pub fn new(credentials: &ClientCredentials, config: &HttpConfig) -> Result<Self, HttpError> {
        let base_url = endpoint_url(&credentials.endpoint)?;

        let mut headers = HeaderMap::new();
        if !credentials.access_key_id.is_empty() {
            let value = HeaderValue::from_str(&credentials.access_key_id)
                .map_err(|_| HttpError::InvalidHeaderValue(ACCESS_KEY_HEADER.to_string()))?;
            headers.insert(ACCESS_KEY_HEADER, value);
        }

        debug!(
            "Creating repository client for {} with {}s timeout",
            base_url,
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn repository_url(&self, project_id: &str, resource: &str) -> Result<Url, HttpError> {
        let path = format!(
            "repository/{}/files/{}",
            urlencoding::encode(project_id),
            resource
        );
        self.base_url
            .join(&path)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn get<Q, T>(&self, url: Url, query: &Q) -> Result<ApiResponse<T>, HttpError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        info!("Making HTTP request to: {}", url);

        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        let body = response.text()?;

        debug!("HTTP response received: {} ({} bytes)", status, body.len());

        // Refusals arrive as JSON envelopes with any status; anything else is a
        // gateway or transport failure.
        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(HttpError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(HttpError::InvalidJson(e)),
        }
    }
}

impl RepositoryApi for HttpRepositoryClient {
    fn list_repository_tree(
        &self,
        project_id: &str,
        request: &ListRepositoryTreeRequest,
    ) -> Result<ApiResponse<Vec<TreeEntry>>, HttpError> {
        let url = self.repository_url(project_id, "tree")?;
        self.get(url, request)
    }

    fn get_file_blobs(
        &self,
        project_id: &str,
        request: &GetFileBlobsRequest,
    ) -> Result<ApiResponse<FileBlob>, HttpError> {
        let url = self.repository_url(project_id, "blobs")?;
        self.get(url, request)
    }
}

/// Endpoints without a scheme are reached over HTTPS
fn endpoint_url(endpoint: &str) -> Result<Url, HttpError> {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(HttpError::ConfigError("endpoint cannot be empty".to_string()));
    }

    let raw = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        format!("{}/", endpoint)
    } else {
        format!("https://{}/", endpoint)
    };

    Url::parse(&raw).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(endpoint: &str) -> ClientCredentials {
        ClientCredentials {
            endpoint: endpoint.to_string(),
            access_key_id: "LTAI-test".to_string(),
            access_key_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_endpoint_url_defaults_to_https() {
        assert_eq!(
            endpoint_url("devops.cn-hangzhou.aliyuncs.com").unwrap().as_str(),
            "https://devops.cn-hangzhou.aliyuncs.com/"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:8080/").unwrap().as_str(),
            "http://127.0.0.1:8080/"
        );
        assert!(matches!(endpoint_url(""), Err(HttpError::ConfigError(_))));
    }

    #[test]
    fn test_repository_url_encodes_project_id() {
        let client =
            HttpRepositoryClient::new(&credentials("devops.example.com"), &HttpConfig::default())
                .unwrap();

        let url = client.repository_url("group/repo", "tree").unwrap();
        assert_eq!(
            url.as_str(),
            "https://devops.example.com/repository/group%2Frepo/files/tree"
        );
    }

    #[tokio::test]
    async fn test_list_repository_tree_sends_query_and_decodes_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repository/42/files/tree"))
            .and(query_param("organizationId", "org"))
            .and(query_param("accessToken", "pt"))
            .and(query_param("path", "/db"))
            .and(header("x-acs-accesskey-id", "LTAI-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "result": [{"name": "1_init.up.sql", "type": "blob"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = server.uri();
        let response = tokio::task::spawn_blocking(move || {
            let client =
                HttpRepositoryClient::new(&credentials(&endpoint), &HttpConfig::default())?;
            client.list_repository_tree(
                "42",
                &ListRepositoryTreeRequest {
                    organization_id: Some("org".to_string()),
                    access_token: Some("pt".to_string()),
                    path: Some("/db".to_string()),
                    ..Default::default()
                },
            )
        })
        .await
        .unwrap()
        .unwrap();

        assert!(response.success);
        assert_eq!(response.result.unwrap(), vec![TreeEntry::blob("1_init.up.sql")]);
    }

    #[tokio::test]
    async fn test_denied_envelope_is_returned_even_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repository/42/files/blobs"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "success": false,
                "errorCode": "Forbidden",
                "errorMessage": "permission denied"
            })))
            .mount(&server)
            .await;

        let endpoint = server.uri();
        let response = tokio::task::spawn_blocking(move || {
            let client =
                HttpRepositoryClient::new(&credentials(&endpoint), &HttpConfig::default())?;
            client.get_file_blobs("42", &GetFileBlobsRequest::default())
        })
        .await
        .unwrap()
        .unwrap();

        assert!(!response.success);
        assert_eq!(response.error_message.as_deref(), Some("permission denied"));
    }

    #[tokio::test]
    async fn test_gateway_error_is_a_transport_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let endpoint = server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let client =
                HttpRepositoryClient::new(&credentials(&endpoint), &HttpConfig::default())?;
            client.get_file_blobs("42", &GetFileBlobsRequest::default())
        })
        .await
        .unwrap();

        match result {
            Err(HttpError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
