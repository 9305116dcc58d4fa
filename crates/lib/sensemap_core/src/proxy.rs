//! openSenseMap proxy.
//!
//! Each operation issues exactly one upstream request:
//!
//! | Operation                | Upstream                 | Auth   |
//! |--------------------------|--------------------------|--------|
//! | [`SenseMapProxy::register_user`]       | `POST users/register` | –      |
//! | [`SenseMapProxy::login_user`]          | `POST users/sign-in`  | –      |
//! | [`SenseMapProxy::create_sense_box`]    | `POST boxes`          | Bearer |
//! | [`SenseMapProxy::get_sense_box_by_id`] | `GET boxes/{id}`      | –      |
//! | [`SenseMapProxy::logout`]              | `POST users/sign-out` | Bearer |
//!
//! Nothing is retried or cached.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::models::{
    LoginRequest, LoginResult, SenseBox, SenseBoxCreated, SenseBoxSpec, SensorSpec,
    UserCredentials,
};

const REGISTER_PATH: &str = "users/register";
const SIGN_IN_PATH: &str = "users/sign-in";
const SIGN_OUT_PATH: &str = "users/sign-out";
const BOXES_PATH: &str = "boxes";

const REGISTRATION_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";
const CREATE_FAILED: &str = "SenseBox creation failed";
const RETRIEVE_FAILED: &str = "Failed to retrieve SenseBox";
const LOGOUT_FAILED: &str = "Logout failed";

// ---------------------------------------------------------------------------
// Upstream wire shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct NewBoxBody<'a> {
    name: &'a str,
    exposure: &'a str,
    model: &'a str,
    location: NewBoxLocation,
    sensors: &'a [SensorSpec],
}

#[derive(Serialize)]
struct NewBoxLocation {
    lat: f64,
    lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
}

impl<'a> From<&'a SenseBoxSpec> for NewBoxBody<'a> {
    fn from(spec: &'a SenseBoxSpec) -> Self {
        Self {
            name: &spec.name,
            exposure: &spec.exposure,
            model: &spec.model,
            location: NewBoxLocation {
                lat: spec.location.latitude,
                lng: spec.location.longitude,
                height: spec.location.height,
            },
            sensors: &spec.sensors,
        }
    }
}

/// Sign-in answer. Upstream nests `user` under `data`; a top-level `user`
/// wins when both are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInBody {
    token: Option<String>,
    user: Option<Value>,
    refresh_token: Option<String>,
    data: Option<SignInData>,
}

#[derive(Deserialize)]
struct SignInData {
    user: Option<Value>,
}

/// Box-creation answer. The id is looked up as `id`, `_id`, `data._id`,
/// then `data.id`; the first one present wins.
#[derive(Deserialize)]
struct CreatedBody {
    id: Option<String>,
    #[serde(rename = "_id")]
    object_id: Option<String>,
    message: String,
    data: Option<CreatedData>,
}

#[derive(Deserialize)]
struct CreatedData {
    #[serde(rename = "_id")]
    object_id: Option<String>,
    id: Option<String>,
}

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

/// Forwards local requests to openSenseMap.
///
/// Cheap to clone: the `reqwest::Client` is reference-counted internally and
/// the base URL is never mutated after construction.
#[derive(Debug, Clone)]
pub struct SenseMapProxy {
    client: Client,
    base_url: Url,
}

impl SenseMapProxy {
    /// Binds `client` to the configured upstream root.
    pub fn new(client: Client, config: ProxyConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
        }
    }

    /// `POST users/register` — returns the upstream body verbatim on success.
    pub async fn register_user(&self, credentials: &UserCredentials) -> ProxyResult<String> {
        let url = self.endpoint(REGISTER_PATH)?;
        debug!(%url, "forwarding registration");

        let (status, body) = send(self.client.post(url).json(credentials)).await?;
        if !status.is_success() {
            warn!(%status, "upstream rejected registration");
            return Err(ProxyError::Upstream {
                context: REGISTRATION_FAILED,
                status,
                body,
            });
        }

        Ok(body)
    }

    /// `POST users/sign-in` — returns the bearer token and the opaque user.
    pub async fn login_user(&self, request: &LoginRequest) -> ProxyResult<LoginResult> {
        let url = self.endpoint(SIGN_IN_PATH)?;
        debug!(%url, "forwarding sign-in");

        let (status, body) = send(self.client.post(url).json(request)).await?;
        if !status.is_success() {
            warn!(%status, "upstream rejected sign-in");
            return Err(ProxyError::Authentication {
                context: LOGIN_FAILED,
                status,
                body,
            });
        }

        parse_login(status, body)
    }

    /// `POST boxes` with `Authorization: Bearer <token>`.
    pub async fn create_sense_box(
        &self,
        spec: &SenseBoxSpec,
        token: &str,
    ) -> ProxyResult<SenseBoxCreated> {
        let url = self.endpoint(BOXES_PATH)?;
        debug!(%url, name = %spec.name, sensors = spec.sensors.len(), "forwarding box creation");

        let request = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&NewBoxBody::from(spec));
        let (status, body) = send(request).await?;
        if !status.is_success() {
            warn!(%status, "upstream rejected box creation");
            return Err(ProxyError::Upstream {
                context: CREATE_FAILED,
                status,
                body,
            });
        }

        parse_created(status, body)
    }

    /// `GET boxes/{id}`. Field names in the answer are matched
    /// case-insensitively. A 404 is reported like any other upstream failure.
    pub async fn get_sense_box_by_id(&self, id: &str) -> ProxyResult<SenseBox> {
        let url = self.box_url(id)?;
        debug!(%url, box_id = id, "fetching box");

        let (status, body) = send(self.client.get(url)).await?;
        if !status.is_success() {
            warn!(%status, box_id = id, "upstream box lookup failed");
            return Err(ProxyError::Upstream {
                context: RETRIEVE_FAILED,
                status,
                body,
            });
        }

        parse_sense_box(status, body)
    }

    /// `POST users/sign-out` with an empty body.
    ///
    /// Only ever returns `Ok(true)`; a rejected sign-out is an error.
    pub async fn logout(&self, token: &str) -> ProxyResult<bool> {
        let url = self.endpoint(SIGN_OUT_PATH)?;
        debug!(%url, "forwarding sign-out");

        let (status, body) = send(self.client.post(url).bearer_auth(token)).await?;
        if !status.is_success() {
            warn!(%status, "upstream rejected sign-out");
            return Err(ProxyError::Authentication {
                context: LOGOUT_FAILED,
                status,
                body,
            });
        }

        Ok(true)
    }

    fn endpoint(&self, path: &str) -> ProxyResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// `boxes/{id}` with `id` percent-encoded as a single path segment.
    ///
    /// `""`, `"."` and `".."` are rejected: the URL path normalizer would
    /// drop them and the request would hit the box listing instead.
    fn box_url(&self, id: &str) -> ProxyResult<Url> {
        if matches!(id, "" | "." | "..") {
            return Err(ProxyError::InvalidBoxId(id.to_string()));
        }
        let mut url = self.endpoint(BOXES_PATH)?;
        url.path_segments_mut()
            .map_err(|()| ProxyError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .push(id);
        Ok(url)
    }
}

/// Sends the request and reads the whole body as text, whatever the status.
async fn send(request: RequestBuilder) -> ProxyResult<(StatusCode, String)> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

fn malformed(
    context: &'static str,
    status: StatusCode,
    body: String,
    reason: impl ToString,
) -> ProxyError {
    ProxyError::MalformedResponse {
        context,
        status,
        body,
        reason: reason.to_string(),
    }
}

fn parse_login(status: StatusCode, body: String) -> ProxyResult<LoginResult> {
    let parsed: SignInBody = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => return Err(malformed(LOGIN_FAILED, status, body, e)),
    };

    let Some(token) = parsed.token else {
        return Err(malformed(LOGIN_FAILED, status, body, "missing field `token`"));
    };
    let Some(user) = parsed.user.or_else(|| parsed.data.and_then(|d| d.user)) else {
        return Err(malformed(LOGIN_FAILED, status, body, "missing field `user`"));
    };

    Ok(LoginResult {
        token,
        user,
        refresh_token: parsed.refresh_token,
    })
}

fn parse_created(status: StatusCode, body: String) -> ProxyResult<SenseBoxCreated> {
    let parsed: CreatedBody = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => return Err(malformed(CREATE_FAILED, status, body, e)),
    };

    let nested = parsed.data.and_then(|d| d.object_id.or(d.id));
    let Some(id) = parsed.id.or(parsed.object_id).or(nested) else {
        return Err(malformed(CREATE_FAILED, status, body, "missing field `id`"));
    };

    Ok(SenseBoxCreated {
        id,
        message: parsed.message,
    })
}

fn parse_sense_box(status: StatusCode, body: String) -> ProxyResult<SenseBox> {
    let value = match serde_json::from_str::<Value>(&body) {
        Ok(value) => value,
        Err(e) => return Err(malformed(RETRIEVE_FAILED, status, body, e)),
    };
    let folded = match lowercase_keys(value) {
        Ok(folded) => folded,
        Err(reason) => return Err(malformed(RETRIEVE_FAILED, status, body, reason)),
    };
    serde_json::from_value(folded).map_err(|e| malformed(RETRIEVE_FAILED, status, body, e))
}

/// Lowercases every object key, recursively.
///
/// Fails when two keys of one object differ only by case (`Name` and
/// `name`), since neither can be picked over the other.
fn lowercase_keys(value: Value) -> Result<Value, String> {
    match value {
        Value::Object(map) => {
            let mut folded = Map::with_capacity(map.len());
            for (key, v) in map {
                let lower = key.to_lowercase();
                if folded.contains_key(&lower) {
                    return Err(format!("duplicate field `{lower}` ignoring case"));
                }
                folded.insert(lower, lowercase_keys(v)?);
            }
            Ok(Value::Object(folded))
        }
        Value::Array(items) => items
            .into_iter()
            .map(lowercase_keys)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other),
    }
}
