use std::time::Duration;

use tracing::{info, warn};

use crate::api::dashboard::DashboardClient;
use crate::utils::DashboardError;

/// Server-side dataset state reported by /load_data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStatus {
    Ready,
    UpdateRequired,
    Other(String),
}

impl From<&str> for DataStatus {
    fn from(status: &str) -> Self {
        match status {
            "ready" | "completed" => DataStatus::Ready,
            "update_required" => DataStatus::UpdateRequired,
            other => DataStatus::Other(other.to_string()),
        }
    }
}

/// Make sure the backend dataset is current before showing content
///
/// Asks /load_data and, when an update is required, triggers /update_data and
/// waits up to `update_timeout` for it to finish.
pub async fn ensure_data_ready(
    client: &DashboardClient,
    update_timeout: Duration,
) -> Result<DataStatus, DashboardError> {
    let status = DataStatus::from(client.load_data().await?.status.as_str());

    match status {
        DataStatus::UpdateRequired => {
            info!("🔄 Backend data is stale, requesting update...");
            let updated = DataStatus::from(client.update_data(update_timeout).await?.status.as_str());
            if updated == DataStatus::Ready {
                info!("Backend data updated");
            } else {
                warn!("Unexpected update status: {:?}", updated);
            }
            Ok(updated)
        }
        DataStatus::Other(other) => {
            warn!("Unexpected data status '{}'", other);
            Ok(DataStatus::Other(other))
        }
        DataStatus::Ready => Ok(DataStatus::Ready),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_triggered_when_stale() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/load_data")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "update_required"}"#)
            .create_async()
            .await;
        let update = server
            .mock("POST", "/update_data")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "completed"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = DashboardClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert_eq!(ensure_data_ready(&client, Duration::from_secs(5)).await.unwrap(), DataStatus::Ready);
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_update_when_ready() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/load_data")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "ready"}"#)
            .create_async()
            .await;
        let update = server
            .mock("POST", "/update_data")
            .expect(0)
            .create_async()
            .await;

        let client = DashboardClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert_eq!(ensure_data_ready(&client, Duration::from_secs(5)).await.unwrap(), DataStatus::Ready);
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_slow_update_outlives_request_timeout() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/load_data")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "update_required"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/update_data")
            .with_header("content-type", "application/json")
            .with_body_from_request(|_| {
                std::thread::sleep(Duration::from_secs(2));
                br#"{"status": "completed"}"#.to_vec()
            })
            .create_async()
            .await;

        let client = DashboardClient::new(&server.url(), Duration::from_secs(1)).unwrap();
        let status = ensure_data_ready(&client, Duration::from_secs(10)).await.unwrap();
        assert_eq!(status, DataStatus::Ready);
    }
}
