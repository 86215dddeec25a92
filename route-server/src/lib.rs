//! Truck fuel-route planning server.
//!
//! Given free-form start and end locations, the planner geocodes both,
//! fetches a driving route, finds fuel stations within a corridor around
//! the route and computes where to buy fuel and how much, minimizing
//! total cost under the vehicle's range constraint.

pub mod cache;
pub mod domain;
pub mod geo;
pub mod ingest;
pub mod mapbox;
pub mod plan;
pub mod planner;
pub mod stations;
pub mod web;
