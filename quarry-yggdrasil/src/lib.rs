//!
//! A typed client for Mojang's Yggdrasil authentication service.
//!
//! The service speaks JSON over HTTPS. This crate provides the request and response records
//! ([`records`]), a strict JSON codec for them ([`json`]), and an asynchronous HTTP/1.1
//! submission routine ([`http`], behind the `tokio` feature) that works over any caller-supplied
//! byte stream -- the caller owns connection establishment, TLS, and cancellation.
//!
//! The JSON codec is deliberately strict: unknown keys, duplicated keys, type mismatches, and
//! missing required keys are all distinct, typed failures. See [`json::JsonError`].
//!
//! # Features
//!
//! * `std` (default): Currently nothing on its own; implied by `tokio`.
//! * `tokio`: Enables the [`http`] module, whose I/O is expressed against
//!   `tokio::io::{AsyncRead, AsyncWrite}`.

#![no_std]

pub(crate) extern crate alloc;

#[cfg(feature = "std")]
pub(crate) extern crate std;

///
/// The request and response records of the Yggdrasil API.
pub mod records;

///
/// Strict JSON encoding and decoding for the records.
pub mod json;

#[cfg(feature = "tokio")]
///
/// Submitting requests over an async byte stream.
pub mod http;

pub use json::{from_json, to_json, FromJson, JsonError, ToJson};
pub use records::{
    Agent, ApiError, AuthenticateRequest, AuthenticateResponse, InvalidateRequest, Profile,
    RefreshRequest, RefreshResponse, SignoutRequest, User, ValidateRequest,
};

#[cfg(feature = "tokio")]
pub use http::{submit, ApiRequest, YggdrasilError};
