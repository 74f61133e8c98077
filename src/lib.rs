// Trendwatch: keyword trend monitoring for X (Twitter).
//
// This is the library root. Each module corresponds to one piece of the
// dashboard pipeline: the proxy server that shields the API credential, the
// search client that aggregates trend counts, and the pure transforms that
// feed the presentation layer.

pub mod config;
pub mod model;
pub mod output;
pub mod search;
pub mod topics;
pub mod trends;
pub mod web;
pub mod xapi;
