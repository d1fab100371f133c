//! Idea Intake - Conversational Specification Elicitation
//!
//! Turns a rough project idea into a complete, validated project
//! specification through a guided conversation with a language model.
//! Each turn extracts structured data from the model's reply, validates
//! it, merges what is sound into a running draft and asks about what is
//! still missing.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
