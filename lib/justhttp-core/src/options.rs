//! Per-call request policy.
//!
//! [`RequestArguments`] is a partial override where every field is optional.
//! [`resolve`] folds a sequence of overrides over [`Policy::default`] into the
//! effective [`Policy`] of one call: a field set in a later override wins, a
//! field left unset never erases an earlier value.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use justhttp_core::{RequestArguments, resolve, DEFAULT_SIZE_LIMIT};
//!
//! let policy = resolve(&[
//!     RequestArguments::new().timeout_ms(1500).query_param("page", "1"),
//!     RequestArguments::new().size_limit(20),
//! ]);
//!
//! assert_eq!(policy.timeout, Some(Duration::from_millis(1500)));
//! assert_eq!(policy.size_limit, 20);
//! assert_eq!(policy.query_params.get("page").map(String::as_str), Some("1"));
//! assert_ne!(policy.size_limit, DEFAULT_SIZE_LIMIT);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use base64::Engine;

/// Default response size limit: 1 MiB.
pub const DEFAULT_SIZE_LIMIT: u64 = 1 << 20;

/// Credentials sent as an `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BasicAuthCredentials {
    /// User name.
    pub user: String,
    /// Password.
    pub pass: String,
}

impl BasicAuthCredentials {
    /// Create credentials from a user name and password.
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Value of the `Authorization` header: `Basic <base64(user:pass)>`.
    #[must_use]
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.user, self.pass);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

/// Effective options of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Deadline for the whole call, `None` for no deadline.
    pub timeout: Option<Duration>,
    /// Maximum number of response bytes read before decoding.
    pub size_limit: u64,
    /// Credentials sent as `Authorization: Basic`.
    pub basic_auth: Option<BasicAuthCredentials>,
    /// Parameters appended to the URL query string.
    pub query_params: BTreeMap<String, String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            timeout: None,
            size_limit: DEFAULT_SIZE_LIMIT,
            basic_auth: None,
            query_params: BTreeMap::new(),
        }
    }
}

/// Partial per-call override of the [`Policy`].
///
/// Zero values (`timeout_ms(0)`, `size_limit(0)`, no query parameter) leave
/// the field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestArguments {
    timeout: Option<Duration>,
    size_limit: Option<u64>,
    basic_auth: Option<BasicAuthCredentials>,
    query_params: Option<BTreeMap<String, String>>,
}

impl RequestArguments {
    /// Create an override with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the call deadline. A zero duration leaves it unset.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Set the call deadline in milliseconds. Zero leaves it unset.
    #[must_use]
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// Set the maximum response size in bytes. Zero leaves it unset.
    #[must_use]
    pub fn size_limit(mut self, bytes: u64) -> Self {
        self.size_limit = (bytes > 0).then_some(bytes);
        self
    }

    /// Send basic auth credentials.
    #[must_use]
    pub fn basic_auth(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuthCredentials::new(user, pass));
        self
    }

    /// Add one query parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add several query parameters.
    #[must_use]
    pub fn query_params<K, V>(self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        params
            .into_iter()
            .fold(self, |args, (name, value)| args.query_param(name, value))
    }

    /// Merge `later` on top of `self`: fields set in `later` win, unset
    /// fields keep the value from `self`.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            timeout: later.timeout.or(self.timeout),
            size_limit: later.size_limit.or(self.size_limit),
            basic_auth: later.basic_auth.or(self.basic_auth),
            query_params: later.query_params.or(self.query_params),
        }
    }

    /// Fill the unset fields from [`Policy::default`].
    #[must_use]
    pub fn resolve(self) -> Policy {
        let defaults = Policy::default();
        Policy {
            timeout: self.timeout.or(defaults.timeout),
            size_limit: self.size_limit.unwrap_or(defaults.size_limit),
            basic_auth: self.basic_auth.or(defaults.basic_auth),
            query_params: self.query_params.unwrap_or(defaults.query_params),
        }
    }
}

impl From<Policy> for RequestArguments {
    fn from(policy: Policy) -> Self {
        let mut args = Self::new()
            .size_limit(policy.size_limit)
            .query_params(policy.query_params);
        if let Some(timeout) = policy.timeout {
            args = args.timeout(timeout);
        }
        args.basic_auth = policy.basic_auth;
        args
    }
}

/// Resolve the effective policy of a call from its overrides, in call order.
#[must_use]
pub fn resolve(overrides: &[RequestArguments]) -> Policy {
    overrides
        .iter()
        .cloned()
        .fold(RequestArguments::new(), RequestArguments::merge)
        .resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fully_set() -> RequestArguments {
        RequestArguments::new()
            .timeout_ms(250)
            .size_limit(64)
            .basic_auth("test-user", "test-pass")
            .query_param("MyTestParams", "TestValue")
    }

    #[test]
    fn no_overrides_yield_default() {
        let policy = resolve(&[]);
        assert_eq!(policy, Policy::default());
        assert_eq!(policy.size_limit, 1024 * 1024);
        assert_eq!(policy.timeout, None);
        assert!(policy.basic_auth.is_none());
        assert!(policy.query_params.is_empty());
    }

    #[test]
    fn fully_set_override_ignores_default() {
        let defaults = RequestArguments::from(Policy::default());
        assert_eq!(resolve(&[fully_set()]), resolve(&[defaults, fully_set()]));
    }

    #[test]
    fn later_override_wins_when_set() {
        let policy = resolve(&[
            RequestArguments::new().timeout_ms(1500).size_limit(10),
            RequestArguments::new().timeout_ms(500),
        ]);
        assert_eq!(policy.timeout, Some(Duration::from_millis(500)));
        assert_eq!(policy.size_limit, 10);
    }

    #[test]
    fn unset_fields_do_not_erase() {
        let policy = resolve(&[fully_set(), RequestArguments::new(), RequestArguments::new()]);
        assert_eq!(policy, fully_set().resolve());
    }

    #[test]
    fn zero_values_mean_unset() {
        let policy = resolve(&[
            RequestArguments::new().timeout_ms(1500).size_limit(20),
            RequestArguments::new().timeout_ms(0).size_limit(0),
        ]);
        assert_eq!(policy.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(policy.size_limit, 20);
    }

    #[test]
    fn query_params_are_replaced_per_field() {
        let policy = resolve(&[
            RequestArguments::new().query_param("a", "1").query_param("b", "2"),
            RequestArguments::new().query_param("c", "3"),
        ]);
        let keys: Vec<_> = policy.query_params.keys().map(String::as_str).collect();
        assert_eq!(keys, ["c"]);
    }

    #[test]
    fn query_params_accumulate_within_one_override() {
        let args = RequestArguments::new().query_params([("q", "rust"), ("page", "1")]);
        let policy = args.resolve();
        assert_eq!(policy.query_params.len(), 2);
        assert_eq!(policy.query_params.get("q").map(String::as_str), Some("rust"));
    }

    #[test]
    fn basic_auth_header_value() {
        let credentials = BasicAuthCredentials::new("user", "pass");
        assert_eq!(credentials.header_value(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn basic_auth_debug_hides_password() {
        let credentials = BasicAuthCredentials::new("user", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }
}
