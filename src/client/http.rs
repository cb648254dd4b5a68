//! Platform API client implementation

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client as HttpClient, StatusCode, Url};

use super::api::{PropertyApi, SessionApi};
use super::cookies::SessionCookies;
use super::models::{Credentials, Envelope, PropertySummary, UserInfo};
use super::request::{ApiRequest, ApiResponse, RequestBody};
use super::scope::PropertyScope;
use crate::config::{DEFAULT_PLACEHOLDER, Endpoints};
use crate::error::{ApiError, Result};

/// Callback run when a 401 cannot be recovered by a session refresh
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

/// Platform API client.
///
/// Sends cookie-authenticated requests, substitutes the active property id
/// into templated paths, and refreshes the session once when a request
/// comes back 401.
pub struct PgClient {
    http: HttpClient,
    base_url: String,
    cookies: Arc<SessionCookies>,
    scope: PropertyScope,
    placeholder: String,
    endpoints: Endpoints,
    unauthorized_handlers: RwLock<Vec<UnauthorizedHandler>>,
}

impl PgClient {
    /// Create a client for `base_url` that reads the active property from `scope`
    pub fn new(base_url: &str, scope: PropertyScope) -> Result<Self> {
        let cookies = Arc::new(SessionCookies::new());
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .cookie_provider(cookies.clone())
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookies,
            scope,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            endpoints: Endpoints::default(),
            unauthorized_handlers: RwLock::new(Vec::new()),
        })
    }

    /// Use custom session/property endpoint paths
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Use a custom property placeholder token
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// API base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the property id substituted into templated paths
    #[allow(dead_code)]
    pub fn set_active_property_id(&self, id: Option<&str>) {
        self.scope.set(id);
    }

    /// Property id currently substituted into templated paths
    pub fn active_property_id(&self) -> Option<String> {
        self.scope.get()
    }

    /// Register a callback for unrecoverable 401s.
    ///
    /// Every registered handler runs once per failed request.
    pub fn on_unauthorized(&self, handler: UnauthorizedHandler) {
        let mut handlers = match self.unauthorized_handlers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        handlers.push(handler);
    }

    /// Every live cookie in the jar as JSON, with its domain, path and expiry.
    ///
    /// `None` when the jar holds nothing.
    pub fn export_cookies(&self) -> Result<Option<String>> {
        self.cookies.to_json()
    }

    /// Replace the jar with cookies returned by [`export_cookies`](Self::export_cookies)
    pub fn import_cookies(&self, json: &str) -> Result<()> {
        self.cookies.load_json(json)
    }

    /// Send a request through the session interceptor.
    ///
    /// The URL is resolved once, with the property id active at call time,
    /// and reused if the request is resubmitted after a refresh. A 401 on
    /// anything but the refresh endpoint triggers at most one refresh;
    /// every other failure is returned untouched.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let url = self.resolve_url(&request.path)?;
        let is_refresh = self.is_refresh_url(&url);

        loop {
            let response = self.dispatch(&request, &url).await?;

            if response.status != StatusCode::UNAUTHORIZED {
                return response.error_for_status();
            }

            if is_refresh || request.is_retry() {
                debug!("{} {} still unauthorized", request.method, url);
                self.notify_unauthorized();
                return Err(ApiError::Unauthorized {
                    body: response.text(),
                }
                .into());
            }

            debug!("{} {} returned 401, refreshing session", request.method, url);
            if let Err(err) = self.refresh().await {
                debug!("Session refresh failed: {}", err);
                self.notify_unauthorized();
                return Err(err);
            }

            request.retried = true;
        }
    }

    fn resolve_url(&self, path: &str) -> Result<Url> {
        let resolved = self.scope.resolve(path, &self.placeholder);
        if !self.placeholder.is_empty() && resolved.contains(&self.placeholder) {
            warn!(
                "No active property; sending {} with unresolved placeholder",
                resolved
            );
        }

        let full = if resolved.starts_with("http://") || resolved.starts_with("https://") {
            resolved
        } else if resolved.starts_with('/') {
            format!("{}{}", self.base_url, resolved)
        } else {
            format!("{}/{}", self.base_url, resolved)
        };

        Url::parse(&full)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", full, e)).into())
    }

    /// Whether `url` points at the session refresh endpoint, however the
    /// caller spelled the path
    fn is_refresh_url(&self, url: &Url) -> bool {
        match self.resolve_url(&self.endpoints.refresh) {
            Ok(refresh) => refresh.origin() == url.origin() && refresh.path() == url.path(),
            Err(_) => false,
        }
    }

    /// Perform one HTTP exchange, no status handling
    async fn dispatch(&self, request: &ApiRequest, url: &Url) -> Result<ApiResponse> {
        debug!("{} {}", request.method, url);

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Raw {
                content_type,
                bytes,
            }) => builder
                .header(reqwest::header::CONTENT_TYPE, content_type.as_str())
                .body(bytes.clone()),
        };

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }

    /// Call the refresh endpoint directly, bypassing the interceptor
    async fn refresh(&self) -> Result<()> {
        let request = ApiRequest::post(self.endpoints.refresh.clone());
        let url = self.resolve_url(&request.path)?;
        let response = self.dispatch(&request, &url).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized {
                body: response.text(),
            }
            .into());
        }

        response.error_for_status().map(|_| ())
    }

    fn notify_unauthorized(&self) {
        let handlers: Vec<UnauthorizedHandler> = match self.unauthorized_handlers.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        for handler in handlers {
            handler();
        }
    }
}

#[async_trait]
impl SessionApi for PgClient {
    async fn current_user(&self) -> Result<UserInfo> {
        let response = self
            .send(ApiRequest::get(self.endpoints.current_user.clone()))
            .await?;
        Ok(response.json::<Envelope<UserInfo>>()?.into_inner())
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserInfo> {
        // Login is not session-bearing, so a 401 here means bad credentials
        // and must not go through the refresh interceptor.
        let request = ApiRequest::post(self.endpoints.login.clone())
            .json(serde_json::to_value(credentials)?);
        let url = self.resolve_url(&request.path)?;
        let response = self.dispatch(&request, &url).await?.error_for_status()?;

        Ok(response.json::<Envelope<UserInfo>>()?.into_inner())
    }

    async fn logout(&self) -> Result<()> {
        self.send(ApiRequest::post(self.endpoints.logout.clone()))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl PropertyApi for PgClient {
    async fn list_properties(&self) -> Result<Vec<PropertySummary>> {
        let response = self
            .send(ApiRequest::get(self.endpoints.properties.clone()))
            .await?;
        Ok(response.json::<Envelope<Vec<PropertySummary>>>()?.into_inner())
    }
}
