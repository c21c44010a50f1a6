use std::sync::{Arc, Mutex};

use fetcher::mocks::transport::{MockResponse, MockTransport};
use fetcher::{Fetcher, FormDataFactory, NativeHost};
use log::Level;
use logtest::Logger;
use serial_test::serial;

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Logger> = Mutex::new(Logger::start());
}

const URL: &str = "http://logging.test/";

fn clear_logs() {
    let mut logger = LOGGER.lock().unwrap();
    while logger.pop().is_some() {}
}

// (level, message) of every record mentioning the test url
fn collect_records() -> Vec<(Level, String)> {
    let mut logger = LOGGER.lock().unwrap();
    let mut records = Vec::new();
    while let Some(record) = logger.pop() {
        let message = record.args().to_string();
        if message.contains(URL) {
            records.push((record.level(), message));
        }
    }
    records
}

fn fetcher_for(transport: MockTransport) -> Fetcher {
    Fetcher::new(Arc::new(transport), Arc::new(NativeHost), Arc::new(FormDataFactory))
}

#[tokio::test]
#[serial]
async fn test_error_status_is_logged_as_error() {
    clear_logs();
    let _ = fetcher_for(MockTransport::new(MockResponse::new(404, "missing"))).get(URL).await;

    let records = collect_records();
    assert!(
        records.contains(&(Level::Error, format!("GET {} returned 404.", URL))),
        "unexpected records: {:?}", records
    );
}

#[tokio::test]
#[serial]
async fn test_transport_failure_is_logged_as_error() {
    clear_logs();
    let _ = fetcher_for(MockTransport::failing("refused")).post(URL).await;

    let records = collect_records();
    assert!(
        records.contains(&(Level::Error, format!("POST {} failed: transport error: refused.", URL))),
        "unexpected records: {:?}", records
    );
}

#[tokio::test]
#[serial]
async fn test_success_is_logged_at_debug() {
    clear_logs();
    let _ = fetcher_for(MockTransport::new(MockResponse::new(200, "ok"))).get(URL).await;

    let records = collect_records();
    assert!(records.iter().all(|(level, _)| *level == Level::Debug), "unexpected records: {:?}", records);
    assert!(records.contains(&(Level::Debug, format!("GET {} completed with 200.", URL))));
}
