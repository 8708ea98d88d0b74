use std::collections::HashMap;

use chrono::Local;
use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect::Policy};
use url::Url;

use crate::{
    Res, config,
    error::{AuthStage, Error},
    types::{AuthSession, Credentials},
    vk::form::scrape_form,
};

const MAX_REDIRECTS: usize = 10;

/// Parameters of the authorization request.
///
/// Defaults to the VK production endpoint; [`AuthConfig::from_env`] honours the
/// `VK_CLIENT_ID` and `VK_OAUTH_URL` overrides.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub display: String,
    pub api_version: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            authorize_url: config::DEFAULT_OAUTH_URL.to_string(),
            client_id: config::DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: config::OAUTH_REDIRECT_URI.to_string(),
            scope: "audio".to_string(),
            display: "mobile".to_string(),
            api_version: config::OAUTH_API_VERSION.to_string(),
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            authorize_url: config::vk_oauth_url(),
            client_id: config::vk_client_id(),
            ..Self::default()
        }
    }

    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }
}

/// Where a chain of redirects ended up.
enum Landing {
    /// A regular page, no further redirect.
    Page(Response),
    /// The token redirect target. Fragments never reach the server, so the
    /// target is not requested.
    Fragment(Url),
}

/// Logs into VK through the implicit OAuth flow of the mobile login page.
///
/// The flow:
/// 1. Fetch the authorization page for the configured application
/// 2. Scrape the login form target and its hidden fields
/// 3. Add `email` and `pass` to the fields and post the form
/// 4. Follow the redirects until one carries
///    `#access_token=...&expires_in=...&user_id=...`
///
/// One authenticator is built per run; its cookie store keeps the login
/// session across the redirect chain.
pub struct Authenticator {
    client: Client,
    config: AuthConfig,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Res<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client, config })
    }

    /// Runs the full login flow and returns the session it yields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] naming the failing stage when the
    /// authorization page cannot be fetched, holds no login form, the form
    /// post fails, or the final redirect lacks any of the token fields. The
    /// usual causes are wrong credentials, a CAPTCHA challenge or a changed
    /// login page.
    pub async fn authorize(&self, credentials: &Credentials) -> Res<AuthSession> {
        let page = self
            .client
            .get(&self.config.authorize_url)
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("scope", self.config.scope.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("display", self.config.display.as_str()),
                ("v", self.config.api_version.as_str()),
                ("response_type", "token"),
            ])
            .send()
            .await
            .map_err(|e| Error::auth(AuthStage::AuthorizationPage, e.to_string()))?;

        let page = match self.follow(page, AuthStage::AuthorizationPage, None).await? {
            Landing::Page(page) => page,
            // the application is already authorized for this browser session
            Landing::Fragment(url) => return session_from_url(&url),
        };

        if !page.status().is_success() {
            return Err(Error::auth(
                AuthStage::AuthorizationPage,
                format!("server answered {}", page.status()),
            ));
        }

        let page_url = page.url().clone();
        let html = page
            .text()
            .await
            .map_err(|e| Error::auth(AuthStage::AuthorizationPage, e.to_string()))?;

        let form = scrape_form(&html);
        let action = form.submit_url.ok_or_else(|| {
            Error::auth(AuthStage::FormScraping, "no login form found on the page")
        })?;
        let submit_url = page_url.join(&action).map_err(|e| {
            Error::auth(
                AuthStage::FormScraping,
                format!("invalid form action {:?}: {}", action, e),
            )
        })?;

        let mut fields: HashMap<String, String> = form.hidden_fields;
        fields.insert("email".to_string(), credentials.login.clone());
        fields.insert("pass".to_string(), credentials.password.clone());

        let response = self
            .client
            .post(submit_url)
            .form(&fields)
            .send()
            .await
            .map_err(|e| Error::auth(AuthStage::FormSubmission, e.to_string()))?;

        match self.follow(response, AuthStage::FormSubmission, Some(&fields)).await? {
            Landing::Fragment(url) => session_from_url(&url),
            Landing::Page(page) => session_from_url(page.url()),
        }
    }

    /// Follows redirects from `response` until a regular page or the token
    /// landing is reached.
    ///
    /// 307 and 308 keep the method, so `form` is posted again for them; any
    /// other redirect continues with a GET.
    async fn follow(
        &self,
        mut response: Response,
        stage: AuthStage,
        mut form: Option<&HashMap<String, String>>,
    ) -> Res<Landing> {
        for _ in 0..MAX_REDIRECTS {
            let status = response.status();
            if !status.is_redirection() {
                return Ok(Landing::Page(response));
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| Error::auth(stage, "redirect without a Location header"))?;
            let next = response.url().join(location).map_err(|e| {
                Error::auth(stage, format!("invalid redirect target {:?}: {}", location, e))
            })?;

            if self.is_token_landing(&next) {
                return Ok(Landing::Fragment(next));
            }

            if !matches!(
                status,
                StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
            ) {
                form = None;
            }
            let request = match form {
                Some(fields) => self.client.post(next).form(fields),
                None => self.client.get(next),
            };
            response = request
                .send()
                .await
                .map_err(|e| Error::auth(stage, e.to_string()))?;
        }

        Err(Error::auth(stage, "too many redirects"))
    }

    /// The redirect target is where the token is handed out: the configured
    /// `redirect_uri`, or any URL whose fragment carries `access_token` or
    /// `error`. Other fragments (`/login#captcha`) are ordinary pages.
    fn is_token_landing(&self, url: &Url) -> bool {
        let Some(fragment) = url.fragment() else {
            return false;
        };

        let mut target = url.clone();
        target.set_fragment(None);
        target.as_str() == self.config.redirect_uri
            || url::form_urlencoded::parse(fragment.as_bytes())
                .any(|(key, _)| key == "access_token" || key == "error")
    }
}

/// Builds a session from the fragment of the final redirect URL, e.g.
/// `https://oauth.vk.com/blank.html#access_token=T&expires_in=86400&user_id=7`.
///
/// The fragment is parsed as a query string; for repeated keys the first
/// value is used.
pub fn session_from_url(url: &Url) -> Res<AuthSession> {
    let fragment = url.fragment().unwrap_or_default();
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        params.entry(key.into_owned()).or_insert(value.into_owned());
    }

    if let Some(error) = params.get("error") {
        let description = params
            .get("error_description")
            .map(String::as_str)
            .unwrap_or("no description");
        return Err(Error::auth(
            AuthStage::TokenExtraction,
            format!("login rejected ({}): {}", error, description),
        ));
    }

    let field = |name: &str| {
        params.get(name).cloned().ok_or_else(|| {
            Error::auth(
                AuthStage::TokenExtraction,
                format!(
                    "{} missing from redirect URL (wrong credentials, CAPTCHA or changed login page?)",
                    name
                ),
            )
        })
    };

    let access_token = field("access_token")?;
    let expires_in = field("expires_in")?;
    let user_id = field("user_id")?;

    let expires_in = expires_in.parse::<u64>().map_err(|_| {
        Error::auth(
            AuthStage::TokenExtraction,
            format!("expires_in is not a number: {:?}", expires_in),
        )
    })?;

    Ok(AuthSession {
        access_token,
        expires_in,
        user_id,
        obtained_at: Local::now(),
    })
}
