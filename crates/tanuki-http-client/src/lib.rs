//!
//! Opinionated HTTP client for federation traffic
//!
//! Thin wrapper around a `hyper` client with redirect following, request
//! timeouts, response size limits and HTTP signature support. Test suites can
//! swap the transport for a `tower::service_fn` double via
//! [`ClientBuilder::service`].
//!

use self::util::BoxCloneService;
use bytes::Bytes;
use http::{
    header::{HeaderName, USER_AGENT},
    HeaderMap, HeaderValue, Method, Request, Response as HttpResponse, StatusCode, Uri,
};
use http_body::Body as HttpBody;
use http_body_util::{BodyExt, Limited};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client as HyperClient},
    rt::TokioExecutor,
};
use serde::de::DeserializeOwned;
use std::{error::Error as StdError, fmt, time::Duration};
use tower::{timeout::TimeoutLayer, BoxError, Service, ServiceBuilder, ServiceExt};
use tower_http::{
    follow_redirect::FollowRedirectLayer, map_response_body::MapResponseBodyLayer,
};

mod body;
mod util;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, BoxError>;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Default body limit of 1MB
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Default request timeout of 30s
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub use self::body::Body;

/// Client error type
pub struct Error {
    inner: BoxError,
}

impl Error {
    #[inline]
    fn new<E>(inner: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: inner.into(),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl StdError for Error {}

/// Builder for the HTTP client
pub struct ClientBuilder {
    content_length_limit: usize,
    default_headers: HeaderMap,
    timeout: Duration,
}

impl ClientBuilder {
    /// Set the content length limit
    ///
    /// This is enforced at the body level, regardless of any `Content-Length` header.
    ///
    /// Defaults to 1MB
    #[must_use]
    pub fn content_length_limit(self, content_length_limit: usize) -> Self {
        Self {
            content_length_limit,
            ..self
        }
    }

    /// Set a default header
    ///
    /// These headers are added to every HTTP request that is sent via this client
    ///
    /// # Errors
    ///
    /// - The header name or value failed to convert
    pub fn default_header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: TryInto<HeaderName>,
        K::Error: Into<BoxError>,
        V: TryInto<HeaderValue>,
        V::Error: Into<BoxError>,
    {
        self.default_headers.insert(
            key.try_into().map_err(Error::new)?,
            value.try_into().map_err(Error::new)?,
        );

        Ok(self)
    }

    /// Set the User-Agent header
    ///
    /// # Errors
    ///
    /// - The header value failed to convert
    pub fn user_agent<V>(self, value: V) -> Result<Self>
    where
        V: TryInto<HeaderValue>,
        V::Error: Into<BoxError>,
    {
        self.default_header(USER_AGENT, value)
    }

    /// Set the request timeout
    ///
    /// Defaults to 30 seconds
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Build the HTTP client
    #[must_use]
    pub fn build(self) -> Client {
        let mut http_connector = HttpConnector::new();
        http_connector.enforce_http(false);

        let connector = HttpsConnectorBuilder::new()
            .with_native_roots()
            .expect("Failed to fetch native certificates")
            .https_or_http()
            .enable_http1()
            .wrap_connector(http_connector);

        let client = HyperClient::builder(TokioExecutor::new()).build(connector);

        self.service(client)
    }

    /// Build the HTTP client by wrapping another HTTP client service
    #[must_use]
    pub fn service<S, B>(self, client: S) -> Client
    where
        S: Service<Request<Body>, Response = HttpResponse<B>> + Clone + Send + Sync + 'static,
        S::Error: Into<BoxError>,
        S::Future: Send,
        B: HttpBody<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BoxError>,
    {
        let content_length_limit = self.content_length_limit;
        let map_response_body = MapResponseBodyLayer::new(move |body: B| {
            BoxBody::new(Limited::new(body, content_length_limit).map_err(BoxError::from))
        });

        let service = ServiceBuilder::new()
            .layer(map_response_body)
            .layer(FollowRedirectLayer::new())
            .layer(TimeoutLayer::new(self.timeout))
            .service(client);

        Client {
            default_headers: self.default_headers,
            inner: BoxCloneService::new(service),
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        let builder = ClientBuilder {
            content_length_limit: DEFAULT_BODY_LIMIT,
            default_headers: HeaderMap::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        };

        builder
            .user_agent(tanuki_core::consts::USER_AGENT)
            .unwrap()
    }
}

/// An opinionated HTTP client
#[derive(Clone)]
pub struct Client {
    default_headers: HeaderMap,
    inner: BoxCloneService<Request<Body>, HttpResponse<BoxBody>, BoxError>,
}

impl Client {
    /// Build a new client
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn prepare_request(&self, mut req: Request<Body>) -> Request<Body> {
        req.headers_mut().extend(self.default_headers.clone());
        req
    }

    /// Execute an HTTP request
    ///
    /// # Errors
    ///
    /// - The request failed
    pub async fn execute(&self, req: Request<Body>) -> Result<Response> {
        let req = self.prepare_request(req);

        let ready_svc = self.inner.clone();
        let response = ready_svc.oneshot(req).await.map_err(Error::new)?;

        Ok(Response { inner: response })
    }

    /// Sign an HTTP request via HTTP signatures and execute it
    ///
    /// POST requests need to carry a `Digest` header, otherwise signing errors out.
    ///
    /// # Errors
    ///
    /// - Signing the request failed
    /// - Executing the request failed
    pub async fn execute_signed(
        &self,
        req: Request<Body>,
        key_id: &str,
        private_key_pem: &str,
    ) -> Result<Response> {
        let req = tanuki_http_signatures::cavage::easy::sign(
            self.prepare_request(req),
            key_id,
            private_key_pem,
        )
        .await
        .map_err(Error::new)?;

        self.execute(req).await
    }

    /// Shorthand for creating a GET request
    ///
    /// # Errors
    ///
    /// - Creating the request with the provided URL failed
    /// - Request execution failed
    pub async fn get<U>(&self, uri: U) -> Result<Response>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .map_err(Error::new)?;

        self.execute(req).await
    }
}

impl Default for Client {
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

/// HTTP response
#[derive(Debug)]
pub struct Response {
    inner: HttpResponse<BoxBody>,
}

impl Response {
    /// Convert the response into its inner representation
    #[must_use]
    pub fn into_inner(self) -> HttpResponse<BoxBody> {
        self.inner
    }

    /// Read the body into a `Bytes`
    ///
    /// # Errors
    ///
    /// - Reading the body from the remote failed
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.inner.collect().await.map_err(Error::new)?.to_bytes())
    }

    /// Get a reference to the headers
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Read the body and attempt to interpret it as a UTF-8 encoded string
    ///
    /// # Errors
    ///
    /// - Reading the body from the remote failed
    /// - The body isn't a UTF-8 encoded string
    pub async fn text(self) -> Result<String> {
        let body = self.bytes().await?;
        String::from_utf8(body.to_vec()).map_err(Error::new)
    }

    /// Read the body and deserialise it as JSON into a `serde` enabled structure
    ///
    /// # Errors
    ///
    /// - Reading the body from the remote failed
    /// - Deserialising the body into the structure failed
    pub async fn json<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Error::new)
    }

    /// Get the status of the response
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }
}
