//! # physics-rag
//!
//! A thin HTTP backend for physics learning: question answering, practice
//! problems and answer grading, served from a hosted retrieval/completion
//! API or from static placeholder data.
//!
//! ## Request flow
//!
//! ```text
//!   HTTP request
//!        │
//!        ▼
//!  ┌────────────┐      ┌──────────────────────┐      ┌──────────────┐
//!  │  api::*    │ ───▶ │  RetrievalService    │ ───▶ │  RagClient   │ ───▶ vendor API
//!  │  handlers  │      │  live | placeholder  │      │ (degrading)  │
//!  └────────────┘      └──────────────────────┘      └──────────────┘
//!        │
//!        ▼
//!  JSON response (service errors → 500 {"detail": ...})
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration; the vendor API key is required
//! - [`error`] - Typed config / vendor errors and the HTTP error response
//! - [`models`] - Topics, difficulties, request and response types
//! - [`vendor`] - Vendor RPC client and its degrade-on-failure wrapper
//! - [`retrieval`] - The `RetrievalService` trait with live and placeholder backends
//! - [`api`] - Axum handlers and router (with CORS)
//! - [`state`] - Shared application state holding config and the injected service

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod retrieval;
pub mod state;
pub mod vendor;
