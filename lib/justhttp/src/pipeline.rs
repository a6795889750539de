//! The JSON request pipeline.
//!
//! A [`JsonRequest`] drives one call through fixed stages and stops at the
//! first failure:
//!
//! 1. serialize the payload to JSON ([`Error::Encoding`])
//! 2. parse the URL and start the optional deadline ([`Error::InvalidUrl`])
//! 3. add basic auth and query parameters
//! 4. dispatch through the transport ([`Error::Timeout`], [`Error::Transport`])
//! 5. reject `401 Unauthorized` without reading the body ([`Error::Auth`])
//! 6. read at most `size_limit` bytes and decode them
//!    ([`Error::SizeLimit`], [`Error::Decode`])
//!
//! The deadline covers stages 4 to 6. The response body is dropped, and its
//! connection released, before [`JsonRequest::process`] returns.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{Instrument, Level, debug, span, warn};

use crate::{
    Body, Error, HttpClient, Method, Policy, Request, RequestArguments, RequestBuilder, Response,
    Result, from_json, parse_url, resolve, to_json,
};

/// Deadline of one call, started when the request is constructed.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    limit: Duration,
}

impl Deadline {
    /// `None` when `limit` is too large to be represented as an instant.
    fn start(limit: Duration) -> Option<Self> {
        Instant::now()
            .checked_add(limit)
            .map(|at| Self { at, limit })
    }

    async fn guard<T>(deadline: Option<Self>, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match deadline {
            Some(Self { at, limit }) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| Error::Timeout { limit })?,
            None => fut.await,
        }
    }
}

/// One JSON call: request intent plus its resolved policy.
///
/// # Example
///
/// ```ignore
/// use justhttp::{HyperClient, JsonRequest, Method, RequestArguments};
///
/// let client = HyperClient::new();
/// let args = [RequestArguments::new().timeout_ms(500)];
/// let created: User = JsonRequest::new(&client, Method::Post, "https://api.example.com/users", Some(&new_user), &args)
///     .process()
///     .await?;
/// ```
#[derive(Debug)]
pub struct JsonRequest<'a, C, D: ?Sized> {
    client: &'a C,
    method: Method,
    url: &'a str,
    payload: Option<&'a D>,
    policy: Policy,
}

impl<'a, C, D> JsonRequest<'a, C, D>
where
    C: HttpClient,
    D: Serialize + ?Sized,
{
    /// Create a request, resolving `args` against the default policy.
    #[must_use]
    pub fn new(
        client: &'a C,
        method: Method,
        url: &'a str,
        payload: Option<&'a D>,
        args: &[RequestArguments],
    ) -> Self {
        Self {
            client,
            method,
            url,
            payload,
            policy: resolve(args),
        }
    }

    /// Effective policy of this call.
    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Send the request and decode the response as `R`.
    pub async fn process<R: DeserializeOwned>(self) -> Result<R> {
        let span = span!(
            Level::DEBUG,
            "json_request",
            method = %self.method,
            url = %self.url
        );
        self.run().instrument(span).await
    }

    async fn run<R: DeserializeOwned>(self) -> Result<R> {
        let body = self.encode_payload()?;
        let (builder, deadline) = self.create_request(body)?;
        let request = self.decorate(builder);

        let response = self.send(request, deadline).await?;
        Self::check_status(&response)?;

        self.decode_response(response, deadline).await
    }

    fn encode_payload(&self) -> Result<Option<Bytes>> {
        let payload = self.payload.filter(|_| self.method.has_payload());
        let body = payload.map(to_json).transpose().inspect_err(|err| {
            warn!(error = %err, "payload serialization failed");
        })?;
        debug!(body_len = body.as_ref().map_or(0, Bytes::len), "payload encoded");
        Ok(body)
    }

    fn create_request(&self, body: Option<Bytes>) -> Result<(RequestBuilder, Option<Deadline>)> {
        let url = parse_url(self.url)?;

        let mut builder = Request::builder(self.method, url).header("Accept", "application/json");
        if let Some(body) = body {
            builder = builder.json_bytes(body);
        }

        let deadline = self.policy.timeout.and_then(Deadline::start);
        Ok((builder, deadline))
    }

    fn decorate(&self, mut builder: RequestBuilder) -> Request {
        if let Some(credentials) = &self.policy.basic_auth {
            builder = builder.basic_auth(credentials);
        }

        builder
            .query_pairs(
                self.policy
                    .query_params
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            )
            .build()
    }

    async fn send(&self, request: Request, deadline: Option<Deadline>) -> Result<Response<Body>> {
        debug!(url = %request.url(), "dispatching request");
        Deadline::guard(deadline, self.client.execute(request))
            .await
            .inspect_err(|err| warn!(error = %err, "dispatch failed"))
    }

    fn check_status(response: &Response<Body>) -> Result<()> {
        if response.is_unauthorized() {
            warn!(status = response.status(), "request unauthorized");
            return Err(Error::Auth {
                status: response.status(),
            });
        }
        Ok(())
    }

    async fn decode_response<R: DeserializeOwned>(
        &self,
        response: Response<Body>,
        deadline: Option<Deadline>,
    ) -> Result<R> {
        let limit = self.policy.size_limit;
        let status = response.status();

        if response.content_length().is_some_and(|len| len > limit) {
            warn!(limit, "declared content length exceeds size limit");
            return Err(Error::SizeLimit { limit });
        }

        let bytes = Deadline::guard(deadline, response.into_body().read_limited(limit))
            .await
            .inspect_err(|err| warn!(error = %err, "reading response body failed"))?;
        debug!(status, body_len = bytes.len(), "response body read");

        from_json(&bytes).inspect_err(|err| warn!(status, error = %err, "decoding response failed"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Sample {
        #[serde(rename = "Cluster_name")]
        cluster_name: String,
        #[serde(rename = "Pings")]
        pings: u32,
    }

    /// Transport that records the last request and answers with a canned response.
    #[derive(Default)]
    struct Recorder {
        status: u16,
        body: &'static str,
        seen: Mutex<Option<Request>>,
    }

    impl Recorder {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(None),
            }
        }

        fn seen(&self) -> Option<Request> {
            self.seen.lock().expect("lock").clone()
        }
    }

    impl HttpClient for Recorder {
        async fn execute(&self, request: Request) -> Result<Response<Body>> {
            *self.seen.lock().expect("lock") = Some(request);
            Ok(Response::new(self.status, HashMap::new(), Body::from(self.body)))
        }
    }

    const SAMPLE: &str = r#"{"Cluster_name": "cl1", "Pings": 2}"#;

    #[tokio::test]
    async fn decodes_response_with_default_policy() {
        let client = Recorder::new(200, SAMPLE);
        let sample: Sample = JsonRequest::new(&client, Method::Get, "http://x/valid-url", None::<&()>, &[])
            .process()
            .await
            .expect("decoded");

        assert_eq!(
            sample,
            Sample {
                cluster_name: "cl1".to_string(),
                pings: 2
            }
        );

        let request = client.seen().expect("request sent");
        assert!(request.body().is_none());
        assert_eq!(request.header("Content-Type"), None);
        assert_eq!(request.header("Accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn sends_json_payload() {
        let client = Recorder::new(200, SAMPLE);
        let payload = serde_json::json!({"Cluster_name": "Hello server", "Pings": 1});
        let _: Sample = JsonRequest::new(&client, Method::Post, "http://x/post", Some(&payload), &[])
            .process()
            .await
            .expect("decoded");

        let request = client.seen().expect("request sent");
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        let sent: serde_json::Value =
            serde_json::from_slice(request.body().expect("body")).expect("json body");
        assert_eq!(sent, payload);
    }

    #[tokio::test]
    async fn get_never_sends_a_payload() {
        let client = Recorder::new(200, SAMPLE);
        let payload = serde_json::json!({"Cluster_name": "ignored", "Pings": 9});
        let _: Sample = JsonRequest::new(&client, Method::Get, "http://x/get", Some(&payload), &[])
            .process()
            .await
            .expect("decoded");

        let request = client.seen().expect("request sent");
        assert_eq!(request.method(), Method::Get);
        assert!(request.body().is_none());
        assert_eq!(request.header("Content-Type"), None);
    }

    #[tokio::test]
    async fn invalid_url_fails_before_dispatch() {
        let client = Recorder::new(200, SAMPLE);
        let err = JsonRequest::new(&client, Method::Get, "ht%$://invalid-url", None::<&()>, &[])
            .process::<Sample>()
            .await
            .expect_err("invalid url");

        assert!(matches!(err, Error::InvalidUrl { .. }));
        assert!(client.seen().is_none());
    }

    #[tokio::test]
    async fn encoding_failure_fails_before_dispatch() {
        let client = Recorder::new(200, SAMPLE);
        let mut payload = HashMap::new();
        payload.insert((1, 2), "tuple keys are not JSON");

        let err = JsonRequest::new(&client, Method::Post, "http://x/post", Some(&payload), &[])
            .process::<Sample>()
            .await
            .expect_err("encoding");

        assert!(matches!(err, Error::Encoding(_)));
        assert!(client.seen().is_none());
    }

    #[tokio::test]
    async fn decorates_auth_and_query() {
        let client = Recorder::new(200, SAMPLE);
        let args = [RequestArguments::new()
            .basic_auth("test-user", "test-pass")
            .query_param("page", "2")
            .query_param("q", "a b")];

        let _: Sample = JsonRequest::new(&client, Method::Get, "http://x/search?page=1", None::<&()>, &args)
            .process()
            .await
            .expect("decoded");

        let request = client.seen().expect("request sent");
        assert_eq!(request.url().as_str(), "http://x/search?page=1&page=2&q=a+b");
        assert_eq!(
            request.header("Authorization"),
            Some("Basic dGVzdC11c2VyOnRlc3QtcGFzcw==")
        );
    }

    #[tokio::test]
    async fn unauthorized_short_circuits() {
        let client = Recorder::new(401, "not json at all");
        let err = JsonRequest::new(&client, Method::Get, "http://x/basic-auth", None::<&()>, &[])
            .process::<Sample>()
            .await
            .expect_err("unauthorized");

        assert!(matches!(err, Error::Auth { status: 401 }));
    }

    #[tokio::test]
    async fn other_error_statuses_fall_through_to_decode() {
        let client = Recorder::new(500, r#"{"message": "Some Error Occurred"}"#);
        let err = JsonRequest::new(&client, Method::Get, "http://x/internal-server-error", None::<&()>, &[])
            .process::<Sample>()
            .await
            .expect_err("shape mismatch");
        assert!(err.is_decode());

        let client = Recorder::new(500, SAMPLE);
        let sample: Sample = JsonRequest::new(&client, Method::Get, "http://x/internal-server-error", None::<&()>, &[])
            .process()
            .await
            .expect("decoded despite status");
        assert_eq!(sample.pings, 2);
    }

    #[tokio::test]
    async fn oversized_body_is_a_size_limit_error() {
        let client = Recorder::new(200, SAMPLE);
        let args = [RequestArguments::new().size_limit(20)];
        let err = JsonRequest::new(&client, Method::Get, "http://x/valid-url", None::<&()>, &args)
            .process::<Sample>()
            .await
            .expect_err("too large");

        assert!(matches!(err, Error::SizeLimit { limit: 20 }));
    }

    #[tokio::test]
    async fn oversized_malformed_body_is_still_a_size_limit_error() {
        let client = Recorder::new(200, "{{{{{{{{{{");
        let args = [RequestArguments::new().size_limit(5)];
        let err = JsonRequest::new(&client, Method::Get, "http://x/garbage", None::<&()>, &args)
            .process::<Sample>()
            .await
            .expect_err("too large");

        assert!(matches!(err, Error::SizeLimit { limit: 5 }), "got: {err}");
    }

    #[tokio::test]
    async fn decodes_first_json_value_of_body() {
        let client = Recorder::new(
            200,
            "{\"Cluster_name\": \"cl1\", \"Pings\": 2}\n{\"Cluster_name\": \"cl2\", \"Pings\": 3}\n",
        );
        let sample: Sample = JsonRequest::new(&client, Method::Get, "http://x/stream", None::<&()>, &[])
            .process()
            .await
            .expect("first value decoded");

        assert_eq!(sample.pings, 2);
    }

    #[tokio::test]
    async fn declared_content_length_over_limit_fails_early() {
        struct Declared;

        impl HttpClient for Declared {
            async fn execute(&self, _request: Request) -> Result<Response<Body>> {
                let mut headers = HashMap::new();
                headers.insert("content-length".to_string(), "4096".to_string());
                Ok(Response::new(200, headers, Body::from(SAMPLE)))
            }
        }

        let args = [RequestArguments::new().size_limit(1024)];
        let err = JsonRequest::new(&Declared, Method::Get, "http://x/big", None::<&()>, &args)
            .process::<Sample>()
            .await
            .expect_err("too large");
        assert!(matches!(err, Error::SizeLimit { limit: 1024 }));
    }

    #[tokio::test]
    async fn truncated_body_within_limit_is_a_decode_error() {
        let client = Recorder::new(200, r#"{"Cluster_name": "cl1""#);
        let err = JsonRequest::new(&client, Method::Get, "http://x/valid-url", None::<&()>, &[])
            .process::<Sample>()
            .await
            .expect_err("premature end");

        assert!(err.is_decode());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_elapsed_while_dispatching() {
        struct Slow;

        impl HttpClient for Slow {
            async fn execute(&self, _request: Request) -> Result<Response<Body>> {
                tokio::time::sleep(Duration::from_millis(1000)).await;
                Ok(Response::new(200, HashMap::new(), Body::from(SAMPLE)))
            }
        }

        let args = [RequestArguments::new().timeout_ms(500)];
        let err = JsonRequest::new(&Slow, Method::Post, "http://x/valid-post-url", Some(&()), &args)
            .process::<Sample>()
            .await
            .expect_err("deadline");
        assert!(matches!(err, Error::Timeout { limit } if limit == Duration::from_millis(500)));

        let args = [RequestArguments::new().timeout_ms(1500)];
        let sample: Sample = JsonRequest::new(&Slow, Method::Post, "http://x/valid-post-url", Some(&()), &args)
            .process()
            .await
            .expect("within deadline");
        assert_eq!(sample.pings, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_covers_body_read() {
        struct SlowBody;

        impl HttpClient for SlowBody {
            async fn execute(&self, _request: Request) -> Result<Response<Body>> {
                let body = futures_util::stream::once(async {
                    tokio::time::sleep(Duration::from_millis(1000)).await;
                    Ok(Bytes::from_static(SAMPLE.as_bytes()))
                });
                Ok(Response::new(200, HashMap::new(), Body::new(body)))
            }
        }

        let args = [RequestArguments::new().timeout_ms(500)];
        let err = JsonRequest::new(&SlowBody, Method::Get, "http://x/slow-body", None::<&()>, &args)
            .process::<Sample>()
            .await
            .expect_err("deadline");
        assert!(err.is_timeout());
    }

    #[test]
    fn policy_is_resolved_at_construction() {
        let client = Recorder::default();
        let args = [
            RequestArguments::new().timeout_ms(1500),
            RequestArguments::new().size_limit(20),
        ];
        let request = JsonRequest::new(&client, Method::Get, "http://x/", None::<&()>, &args);

        assert_eq!(request.policy().timeout, Some(Duration::from_millis(1500)));
        assert_eq!(request.policy().size_limit, 20);
    }
}
