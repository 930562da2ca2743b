mod config;
mod frame_scheduler;
mod interaction_controller;
mod invalidation;
mod json_contract;
mod render_coordinator;
mod roulette;
mod tickline;
mod validation;

pub use config::{RouletteConfig, TicklineConfig};
pub use invalidation::{InvalidationTopic, InvalidationTopics};
pub use json_contract::{TICKLINE_CONFIG_JSON_SCHEMA_V1, TicklineConfigJsonContractV1};
pub use roulette::{Roulette, RouletteState, Selection};
pub use tickline::{Tickline, TicklineEvent};
