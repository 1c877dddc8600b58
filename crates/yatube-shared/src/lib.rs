//! # Yatube Shared
//!
//! Request payloads exchanged between browsers and the server.

pub mod dto;

pub use dto::{LoginRequest, NextQuery, PageQuery, PostFormData, SignupRequest};
