//! Montage Core
//!
//! Core types shared by the Montage upload client and its callers.
//!
//! This crate contains:
//! - Domain types: uploads, processing jobs, owner keys and stored videos
//! - DTOs: request/response bodies exchanged with the gateway

pub mod domain;
pub mod dto;
