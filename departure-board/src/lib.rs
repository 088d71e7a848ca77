//! Live departures between two UK stations.
//!
//! Polls the TransportAPI live boards on a fixed interval, joins each
//! departure with its arrival at the destination, and publishes a bounded
//! list of trains to a small web dashboard.

pub mod board;
pub mod config;
pub mod domain;
pub mod poller;
pub mod transport;
pub mod web;
