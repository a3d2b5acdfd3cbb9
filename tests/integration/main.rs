//! Integration tests: library pipeline, HTTP API and CLI binary.

mod cli;
mod http_api;
mod pipeline;
