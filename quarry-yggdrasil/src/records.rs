use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

///
/// The game (and game version) on whose behalf an authentication request is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    ///
    /// The agent's name; `"Minecraft"` for the game this library concerns itself with.
    pub name: String,

    ///
    /// The agent's version. Currently `1`.
    pub version: u32,
}

impl Agent {
    ///
    /// Creates an `Agent` from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

///
/// A game profile attached to an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    ///
    /// The profile's identifier. Usually a UUID in undashed hexadecimal form.
    pub id: String,

    ///
    /// The player name.
    pub name: String,

    ///
    /// Whether the account has not been migrated to a Mojang account.
    pub legacy: bool,
}

impl Profile {
    ///
    /// Creates a `Profile` from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, legacy: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            legacy,
        }
    }
}

///
/// Account-level user information, only reported when a request asks for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    ///
    /// The user's identifier.
    pub id: String,

    ///
    /// Free-form user properties. On the wire this is an array of `{name, value}` objects;
    /// duplicate names are rejected.
    pub properties: BTreeMap<String, String>,
}

impl User {
    ///
    /// Creates a `User` from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, properties: BTreeMap<String, String>) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }
}

///
/// A request to log a user in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticateRequest {
    ///
    /// The [`Agent`] submitting the request.
    pub agent: Option<Agent>,

    ///
    /// The username to log in with.
    pub username: String,

    ///
    /// The password to log in with.
    pub password: String,

    ///
    /// If present, a randomly generated identifier which must be the same for each request.
    pub client_token: Option<String>,

    ///
    /// If `true`, adds a [`User`] object to the response.
    pub request_user: bool,
}

impl AuthenticateRequest {
    ///
    /// Creates a minimal request: no agent, no client token, no user object requested.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            agent: None,
            username: username.into(),
            password: password.into(),
            client_token: None,
            request_user: false,
        }
    }
}

///
/// The response to an [`AuthenticateRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticateResponse {
    ///
    /// The access token. Usually hexadecimal.
    pub access_token: String,

    ///
    /// Identical to the token sent in the request, or freshly generated if none was sent.
    pub client_token: String,

    ///
    /// Only present if the request carried an [`Agent`].
    pub available_profiles: Option<Vec<Profile>>,

    ///
    /// Only present if the request carried an [`Agent`].
    pub selected_profile: Option<Profile>,

    ///
    /// Only present if the request set [`AuthenticateRequest::request_user`].
    pub user: Option<User>,
}

impl AuthenticateResponse {
    ///
    /// Creates a minimal response with only the two tokens.
    #[must_use]
    pub fn new(access_token: impl Into<String>, client_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client_token: client_token.into(),
            available_profiles: None,
            selected_profile: None,
            user: None,
        }
    }
}

///
/// A request to exchange a (possibly stale) access token for a fresh one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshRequest {
    ///
    /// The access token to refresh.
    pub access_token: String,

    ///
    /// The client token the access token was obtained with.
    pub client_token: String,

    ///
    /// The profile to select.
    pub selected_profile: Option<Profile>,

    ///
    /// If `true`, adds a [`User`] object to the response.
    pub request_user: bool,
}

impl RefreshRequest {
    ///
    /// Creates a minimal request from the two tokens.
    #[must_use]
    pub fn new(access_token: impl Into<String>, client_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client_token: client_token.into(),
            selected_profile: None,
            request_user: false,
        }
    }
}

///
/// The response to a [`RefreshRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshResponse {
    ///
    /// The fresh access token.
    pub access_token: String,

    ///
    /// Identical to the token sent in the request.
    pub client_token: String,

    ///
    /// The selected profile, if any.
    pub selected_profile: Option<Profile>,

    ///
    /// Only present if the request set [`RefreshRequest::request_user`].
    pub user: Option<User>,
}

impl RefreshResponse {
    ///
    /// Creates a minimal response with only the two tokens.
    #[must_use]
    pub fn new(access_token: impl Into<String>, client_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client_token: client_token.into(),
            selected_profile: None,
            user: None,
        }
    }
}

///
/// A request to check whether an access token is usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidateRequest {
    ///
    /// The access token to check.
    pub access_token: String,

    ///
    /// The client token the access token was obtained with, if the server should verify the
    /// pairing.
    pub client_token: Option<String>,
}

impl ValidateRequest {
    ///
    /// Creates a request without a client token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client_token: None,
        }
    }
}

///
/// A request to invalidate every access token of an account, using its credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignoutRequest {
    ///
    /// The account's username.
    pub username: String,

    ///
    /// The account's password.
    pub password: String,
}

impl SignoutRequest {
    ///
    /// Creates a `SignoutRequest` from credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

///
/// A request to invalidate one access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidateRequest {
    ///
    /// The access token to invalidate.
    pub access_token: String,

    ///
    /// The client token the access token was obtained with.
    pub client_token: String,
}

impl InvalidateRequest {
    ///
    /// Creates an `InvalidateRequest` from the two tokens.
    #[must_use]
    pub fn new(access_token: impl Into<String>, client_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client_token: client_token.into(),
        }
    }
}

///
/// An error reported by the Yggdrasil API itself, parsed from a non-success response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    ///
    /// A short description of the error.
    pub error: String,

    ///
    /// A longer description which can be shown to a user.
    pub error_message: String,

    ///
    /// The underlying cause, if the server named one.
    pub cause: Option<String>,
}

impl ApiError {
    ///
    /// Creates an `ApiError` without a cause.
    #[must_use]
    pub fn new(error: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_message: error_message.into(),
            cause: None,
        }
    }
}
