//! # Grok Weather Agent
//!
//! A small tool-calling agent that answers weather questions through xAI's
//! OpenAI-compatible Grok API.
//!
//! This library provides:
//! - Environment/`.env` configuration
//! - An OpenAI-compatible chat-completions client
//! - A tool-based agent loop with per-thread checkpointing
//! - The weather assistant built on top of them
//!
//! ## Example
//!
//! ```rust,ignore
//! use grok_weather_agent::{config::Config, weather::WeatherAgent};
//!
//! let config = Config::from_env()?;
//! let agent = WeatherAgent::new(&config)?;
//! let run = agent.query_weather("Auckland", "1", "User").await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod tools;
pub mod weather;

pub use config::Config;
