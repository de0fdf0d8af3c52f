//! Advisor Mesh - Conversational Financial Advisory Service
//!
//! A roster of specialist advisor personas answers user messages through a
//! language model, hands the conversation between personas as topics
//! emerge, and tracks a weighted financial-readiness index (MAPAL) across
//! the conversation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
