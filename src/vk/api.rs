use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{
    Res, config,
    error::Error,
    types::{AudioList, AudioQuery, AuthSession},
};

/// Client for the VK method endpoint (`https://api.vk.com/method/<name>`).
///
/// Every request carries the session's access token and the API version.
/// The session is never refreshed: once the token expires, calls fail with
/// the error the platform reports.
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: AuthSession,
    version: String,
}

impl ApiClient {
    /// Creates a client for the configured API base URL (`VK_API_URL`).
    pub fn new(session: AuthSession) -> Res<Self> {
        Self::with_base_url(session, &config::vk_api_url())
    }

    pub fn with_base_url(session: AuthSession, base_url: &str) -> Res<Self> {
        // a base without trailing slash would lose its last segment on join
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| Error::Config(format!("invalid API URL {:?}: {}", base_url, e)))?;

        Ok(Self {
            client: Client::new(),
            base_url,
            session,
            version: config::API_VERSION.to_string(),
        })
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Calls an API method such as `audio.get` and returns the value of the
    /// `response` key.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] if the request cannot be sent or the body not read
    /// - [`Error::Api`] if the platform answers with an `error` object, the
    ///   body is not JSON, or it holds neither `response` nor `error`
    pub async fn call(&self, method: &str, params: &[(&str, &str)]) -> Res<Value> {
        let url = self
            .base_url
            .join(method)
            .map_err(|e| Error::api(format!("invalid method name {:?}: {}", method, e)))?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("v", self.version.as_str()),
                ("access_token", self.session.access_token.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let payload = response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                Error::api(format!("{} returned invalid JSON: {}", method, e))
            } else {
                Error::Http(e)
            }
        })?;

        unwrap_response(payload)
    }

    /// Returns a handle that prefixes method names with `name.`.
    pub fn namespace<'a>(&'a self, name: &'a str) -> Namespace<'a> {
        Namespace { client: self, name }
    }

    pub fn audio(&self) -> AudioMethods<'_> {
        AudioMethods {
            ns: self.namespace("audio"),
        }
    }
}

/// Extracts `response` from an API payload, or turns `error` into an
/// [`Error::Api`].
pub fn unwrap_response(payload: Value) -> Res<Value> {
    let Value::Object(mut map) = payload else {
        return Err(Error::api("unrecognized response: not a JSON object"));
    };

    if let Some(response) = map.remove("response") {
        return Ok(response);
    }

    if let Some(error) = map.remove("error") {
        let message = error["error_msg"]
            .as_str()
            .unwrap_or("unknown error")
            .to_string();
        return Err(Error::Api {
            code: error["error_code"].as_i64(),
            message,
        });
    }

    Err(Error::api("unrecognized response: neither response nor error"))
}

/// Group of API methods sharing a prefix, e.g. `audio`.
pub struct Namespace<'a> {
    client: &'a ApiClient,
    name: &'a str,
}

impl Namespace<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub async fn call(&self, method: &str, params: &[(&str, &str)]) -> Res<Value> {
        self.client
            .call(&format!("{}.{}", self.name, method), params)
            .await
    }
}

pub struct AudioMethods<'a> {
    ns: Namespace<'a>,
}

impl AudioMethods<'_> {
    /// `audio.get`: lists the tracks of `owner_id`, defaulting to the
    /// logged-in user.
    pub async fn get(&self, query: &AudioQuery) -> Res<AudioList> {
        let owner_id = query
            .owner_id
            .clone()
            .unwrap_or_else(|| self.ns.client.session().user_id.clone());
        let count = query.count.map(|c| c.to_string());
        let offset = query.offset.map(|o| o.to_string());

        let mut params: Vec<(&str, &str)> = vec![("owner_id", owner_id.as_str())];
        if let Some(count) = &count {
            params.push(("count", count.as_str()));
        }
        if let Some(offset) = &offset {
            params.push(("offset", offset.as_str()));
        }

        let response = self.ns.call("get", &params).await?;
        serde_json::from_value(response)
            .map_err(|e| Error::api(format!("unexpected audio.get payload: {}", e)))
    }
}
