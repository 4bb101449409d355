use scrape_monitor_rs::{MonitorClient, MonitorClientOptions, MonitorHandlers};
use std::time::Duration;

/// Streams live task events from a running scraper endpoint.
///
/// Usage: MONITOR_URL=ws://localhost:8000/ws/monitor cargo run --example dashboard_feed <task-id>
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let url =
        std::env::var("MONITOR_URL").unwrap_or_else(|_| "ws://localhost:8000/ws/monitor".into());
    let task_id = std::env::args().nth(1).unwrap_or_else(|| "task-1".into());

    println!("Connecting to {}", url);

    let handlers = MonitorHandlers {
        on_connect: Some(Box::new(|| println!("connected"))),
        on_disconnect: Some(Box::new(|| println!("disconnected"))),
        on_progress_update: Some(Box::new(|task_id, data| {
            println!("[{}] progress: {}", task_id, data);
        })),
        on_item_scraped: Some(Box::new(|task_id, data| {
            println!("[{}] item: {}", task_id, data);
        })),
        on_task_status_change: Some(Box::new(|status, _| {
            println!("status -> {}", status);
        })),
        on_error: Some(Box::new(|detail| {
            eprintln!("error ({:?}): {}", detail.kind, detail.reason);
        })),
        ..Default::default()
    };

    let client = MonitorClient::new(&url, MonitorClientOptions::default(), handlers)?;

    client.connect().await?;
    client.subscribe_to_task(&task_id).await;
    println!("Subscribed to {}, streaming events (Ctrl-C to quit)", task_id);

    loop {
        tokio::time::sleep(Duration::from_secs(5)).await;
        println!("state: {}", client.state().await);
    }
}
