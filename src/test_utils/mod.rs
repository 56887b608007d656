//! Shared test fixtures for the Oomi to InfluxDB2 forwarder.

#![cfg(test)]

pub mod config;
pub mod fixtures;
