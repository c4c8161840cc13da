//! Library crate for lucky-draw, exposing the minigame service, its HTTP client and
//! the player/admin view state for binaries and integration tests.

pub mod client;
pub mod clock;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
