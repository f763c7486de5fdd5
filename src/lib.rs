pub mod aggregator;
pub mod api;
pub mod blob_store;
pub mod config;
pub mod data_models;
pub mod db;
pub mod error;
pub mod extractor;
pub mod llm;
pub mod pdf_converter;
pub mod pdf_tool;
pub mod prompts;
pub mod search_index;
pub mod search_tool;
pub mod summarizer;
