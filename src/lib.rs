// Library exports for the robot arena
// This allows the server, the replay tool and the fight tool to share the engine

#[macro_use]
extern crate rocket;

pub mod arena;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod orchestrator;
pub mod participant;
pub mod registry;
pub mod replay;
pub mod round_logger;
pub mod store;
pub mod types;
pub mod wire;
