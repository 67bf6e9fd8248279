//! Logger module
//!
//! Ad hoc console diagnostics for the feed server: lifecycle banners,
//! access lines, data-source messages, and error reporting. Info goes to
//! stdout, errors and warnings to stderr.

use crate::config::Config;
use crate::data::ServedRecord;
use hyper::{Method, Uri};
use std::net::SocketAddr;

fn write_info(message: &str) {
    println!("{message}");
}

fn write_error(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Sensor feed server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info("Using Tokio runtime for concurrency");
    write_info("======================================\n");
}

pub fn log_dataset_loaded(count: usize, path: &str) {
    write_info(&format!("[Data] Loaded {count} rows from {path}"));
}

pub fn log_dataset_unavailable(path: &str, reason: &impl std::fmt::Display) {
    write_error(&format!("[Data] Could not load {path}: {reason}"));
    write_error("[Data] Feed endpoints will return errors until the server is restarted with a readable file");
}

pub fn log_request(method: &Method, uri: &Uri) {
    write_info(&format!("[Request] {method} {uri}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

/// Log the full record sent by the single-record endpoint.
pub fn log_served_record(record: &ServedRecord) {
    if let Ok(json) = serde_json::to_string(record) {
        write_info(&format!("[Feed] Sending data: {json}"));
    }
}

pub fn log_bulk_served(count: usize) {
    write_info(&format!("[Feed] Sending bulk data: {count} points"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("[Shutdown] Stopped accepting connections; in-flight requests will finish");
}
