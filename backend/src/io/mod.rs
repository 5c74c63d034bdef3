//! # IO Module
//!
//! Interface layer exposing the domain services to the UI.

pub mod rest;
