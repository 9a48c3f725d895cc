//! Ride Compare API Library
//!
//! This library provides the core functionality for the ride price
//! comparison backend: normalization of heterogeneous provider quote
//! payloads into a unified list of ride options, fleet-type
//! classification, the synthetic fallback set, and the HTTP surface
//! plus external service clients wrapped around them.
//!
//! # Modules
//!
//! - `categories`: Fleet-type category table and classification.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `fallback`: Fixed synthetic ride options served when live data is unavailable.
//! - `handlers`: HTTP request handlers and shared application state.
//! - `models`: Core data models.
//! - `normalizer`: Provider response normalization.
//! - `quotes`: Ride comparison workflow (fetch, normalize, fallback policy).
//! - `services`: External service clients (quote aggregator, Nominatim, OSRM).

pub mod categories;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod quotes;
pub mod services;
