//! Feed endpoint handlers
//!
//! The two data-serving endpoints: the next record in rotation, and a small
//! random batch of records.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::http;
use crate::logger;

const NO_DATA_MSG: &str = "No data loaded from CSV. Please check server logs and CSV file.";
const EMPTY_SERVING_MSG: &str =
    "Failed to retrieve data point, data source might be empty or an issue occurred.";
const EMPTY_BATCH_MSG: &str =
    "Failed to retrieve bulk data points, data source might be empty or an issue occurred.";

/// GET /data
///
/// Serves the record under the cursor and advances it. 500 with an error
/// payload when no dataset is loaded, or when no record could be produced
/// despite one being loaded.
pub fn serve_data(state: &AppState) -> Response<Full<Bytes>> {
    if !state.feed.is_loaded() {
        return http::error_response(StatusCode::INTERNAL_SERVER_ERROR, NO_DATA_MSG);
    }

    match state.feed.next_record() {
        Some(record) => {
            logger::log_served_record(&record);
            http::json_response(StatusCode::OK, &record)
        }
        None => http::error_response(StatusCode::INTERNAL_SERVER_ERROR, EMPTY_SERVING_MSG),
    }
}

/// GET /bulk-data
///
/// Serves a batch of records; the size is drawn from the configured range
/// and clamped to the dataset length. A partial batch is still a success;
/// an empty one despite a loaded dataset is an error.
pub fn serve_bulk_data(state: &AppState) -> Response<Full<Bytes>> {
    if !state.feed.is_loaded() {
        return http::error_response(StatusCode::INTERNAL_SERVER_ERROR, NO_DATA_MSG);
    }

    let batch = state.feed.next_batch();
    if batch.is_empty() {
        return http::error_response(StatusCode::INTERNAL_SERVER_ERROR, EMPTY_BATCH_MSG);
    }

    logger::log_bulk_served(batch.len());
    http::json_response(StatusCode::OK, &batch)
}
