//! Fake Notion service: zip fixtures and mounted task API responses

use serde_json::json;
use std::io::{Cursor, Write};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notion_export::{ClientConfig, Credentials, ExportConfig, NotionExporter};

/// Task id the fake service hands out
pub const TASK_ID: &str = "T";

/// Build zip bytes from `(name, content)` pairs
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Exporter pointed at `server` with a short poll interval
pub fn exporter_for(server: &MockServer) -> NotionExporter {
    exporter_at(&server.uri())
}

/// Exporter pointed at the API under `origin`
pub fn exporter_at(origin: &str) -> NotionExporter {
    let client = ClientConfig::new(Credentials::new("token-v2", "file-token"))
        .with_base_url(format!("{}/api/v3", origin));
    let config = ExportConfig {
        poll_interval: Duration::from_millis(10),
        max_wait: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    NotionExporter::with_client_config(&client, config).unwrap()
}

/// Serve enqueue → one `in_progress` poll → success → archive of `files`
pub async fn mount_export(server: &MockServer, files: &[(&str, &[u8])]) {
    Mock::given(method("POST"))
        .and(path("/api/v3/enqueueTask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": TASK_ID })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v3/getTasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": TASK_ID, "state": "in_progress", "status": {} }]
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v3/getTasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": TASK_ID,
                "state": "success",
                "status": { "exportURL": format!("{}/export/{}.zip", server.uri(), TASK_ID) }
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/export/{}.zip", TASK_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(zip_bytes(files)))
        .mount(server)
        .await;
}
