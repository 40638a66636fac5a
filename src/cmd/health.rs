//! `formrelay health` — check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use std::time::Duration;

use crate::cli::HealthArgs;
use crate::error::FormRelayError;
use crate::health::HealthResponse;

pub async fn execute(args: HealthArgs) -> Result<(), FormRelayError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(FormRelayError::HttpClient)?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(FormRelayError::HttpRequest)?;

    let status = response.status();
    let body = response.text().await.map_err(FormRelayError::HttpRequest)?;

    if !status.is_success() {
        return Err(FormRelayError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{body}");
        return Ok(());
    }

    match serde_json::from_str::<HealthResponse>(&body) {
        Ok(health) => {
            let uptime = format_uptime(health.uptime_seconds);
            println!("\u{2713} formrelay is healthy ({})", args.url);
            println!("  version:        {} ({})", health.version, health.git);
            println!("  uptime:         {uptime}");
            println!("  upstream:       {}", health.upstream);
            println!(
                "  submissions:    {} forwarded, {} upstream errors, {} rejected, {} failed",
                health.stats.submissions_forwarded,
                health.stats.submissions_upstream_errors,
                health.stats.submissions_rejected,
                health.stats.submissions_failed
            );
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{body}");
        }
    }

    Ok(())
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
