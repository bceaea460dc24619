//! Boss behavior for a small arena: a chase / flee / throw state machine with
//! distance hysteresis, a resumable throw sequence, and a headless ECS host
//! (hecs) that runs it against a scripted player.

pub mod agent;
pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod logging;
pub mod math;
pub mod scene;
pub mod systems;
