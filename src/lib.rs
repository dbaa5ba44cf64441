pub mod api;
pub mod citations;
pub mod confidence;
pub mod config;
pub mod context;
pub mod conversation;
pub mod data_models;
pub mod error;
pub mod followups;
pub mod llm;
pub mod pipeline;
pub mod search;
