// src/core/mod.rs — Interview core: session aggregate, flow state machine, façade

pub mod audio;
pub mod budget;
pub mod flow;
pub mod orchestrator;
pub mod prompts;
pub mod reply;
pub mod session;
pub mod types;
