//! Batch restock submission: duplicates collapsed, one PATCH per venue.

use std::collections::HashSet;
use std::fmt;

use tracing::{error, info};

use crate::config::VenueConfig;
use crate::filter::{IdKind, SoldOutItem};
use crate::pos::{ItemUpdate, ItemsUpdate, PosApiError, PosClient};

/// Outcome of one venue's batch update, rendered into its result slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestockOutcome {
    /// No sold-out items survived filtering; nothing was sent.
    NoAction,
    /// The batch was accepted; carries the deduplicated item count.
    Restocked(usize),
    /// The service refused the batch; carries the upstream status and body.
    Rejected { status: u16, body: String },
    /// The request never completed (connection failure, timeout).
    RequestFailed(String),
}

impl RestockOutcome {
    /// Whether the venue ended the run in a good state.
    pub fn is_success(&self) -> bool {
        matches!(self, RestockOutcome::NoAction | RestockOutcome::Restocked(_))
    }
}

impl fmt::Display for RestockOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestockOutcome::NoAction => write!(f, "No updates needed."),
            RestockOutcome::Restocked(count) => write!(f, "Restocked {count} items."),
            RestockOutcome::Rejected { status, .. } => write!(f, "Update failed: {status}"),
            RestockOutcome::RequestFailed(detail) => write!(f, "Update failed: {detail}"),
        }
    }
}

/// Collapse duplicate (kind, id) pairs, keeping the first occurrence.
pub fn dedupe(items: &[SoldOutItem]) -> Vec<SoldOutItem> {
    let mut seen: HashSet<(IdKind, &str)> = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert((item.kind, item.id.as_str())))
        .cloned()
        .collect()
}

/// Mark the surviving items back in stock through the batch endpoint.
///
/// An empty candidate list short-circuits without touching the network.
/// Failures are folded into the returned [`RestockOutcome`] so the caller
/// can keep processing other venues.
pub async fn submit_restock(
    client: &PosClient,
    venue: &VenueConfig,
    items: &[SoldOutItem],
) -> RestockOutcome {
    if items.is_empty() {
        info!(venue_id = %venue.venue_id, "no sold-out items to restock");
        return RestockOutcome::NoAction;
    }

    let unique = dedupe(items);
    let ids = unique
        .iter()
        .map(|item| item.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    info!(
        venue_id = %venue.venue_id,
        count = unique.len(),
        ids = %ids,
        "restocking items"
    );

    let update = ItemsUpdate {
        data: unique
            .iter()
            .map(|item| match item.kind {
                IdKind::Gtin => ItemUpdate::gtin(item.id.clone()),
                IdKind::Sku => ItemUpdate::sku(item.id.clone()),
            })
            .collect(),
    };

    match client.update_items(venue, &update).await {
        Ok(()) => {
            info!(venue_id = %venue.venue_id, count = unique.len(), "items marked in stock");
            RestockOutcome::Restocked(unique.len())
        }
        Err(PosApiError::UnexpectedStatus { status, body }) => {
            error!(venue_id = %venue.venue_id, status, body = %body, "batch update rejected");
            RestockOutcome::Rejected { status, body }
        }
        Err(err) => {
            error!(venue_id = %venue.venue_id, error = %err, "batch update never completed");
            RestockOutcome::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn venue() -> VenueConfig {
        VenueConfig {
            venue_id: "venue-1".to_string(),
            api_username: "user".to_string(),
            api_password: "pass".to_string(),
            excluded_gtins: Vec::new(),
            excluded_skus: Vec::new(),
            included_gtins: Vec::new(),
            included_skus: Vec::new(),
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let items = vec![
            SoldOutItem::gtin("111"),
            SoldOutItem::gtin("111"),
            SoldOutItem::sku("S-1"),
            SoldOutItem::gtin("111"),
        ];
        assert_eq!(
            dedupe(&items),
            vec![SoldOutItem::gtin("111"), SoldOutItem::sku("S-1")]
        );
    }

    #[test]
    fn same_id_under_different_kinds_is_not_a_duplicate() {
        let items = vec![SoldOutItem::gtin("111"), SoldOutItem::sku("111")];
        assert_eq!(dedupe(&items).len(), 2);
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(RestockOutcome::NoAction.to_string(), "No updates needed.");
        assert_eq!(
            RestockOutcome::Restocked(3).to_string(),
            "Restocked 3 items."
        );
        assert_eq!(
            RestockOutcome::Rejected {
                status: 500,
                body: "oops".to_string()
            }
            .to_string(),
            "Update failed: 500"
        );
        assert_eq!(
            RestockOutcome::RequestFailed("timeout".to_string()).to_string(),
            "Update failed: timeout"
        );
    }

    #[test]
    fn outcome_success_classification() {
        assert!(RestockOutcome::NoAction.is_success());
        assert!(RestockOutcome::Restocked(1).is_success());
        assert!(!RestockOutcome::Rejected {
            status: 500,
            body: String::new()
        }
        .is_success());
        assert!(!RestockOutcome::RequestFailed(String::new()).is_success());
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/venues/venue-1/items"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let client = PosClient::with_base_url(server.uri());
        let outcome = submit_restock(&client, &venue(), &[]).await;
        assert_eq!(outcome, RestockOutcome::NoAction);
        // Dropping the server verifies the zero-call expectation.
    }

    #[tokio::test]
    async fn accepted_batch_reports_deduplicated_count() {
        let server = MockServer::start().await;
        let expected = json!({
            "data": [
                {"gtin": "111", "in_stock": true},
                {"sku": "S-1", "in_stock": true}
            ]
        });
        Mock::given(method("PATCH"))
            .and(path("/venues/venue-1/items"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = PosClient::with_base_url(server.uri());
        let items = vec![
            SoldOutItem::gtin("111"),
            SoldOutItem::gtin("111"),
            SoldOutItem::sku("S-1"),
        ];
        let outcome = submit_restock(&client, &venue(), &items).await;
        assert_eq!(outcome, RestockOutcome::Restocked(2));
        assert_eq!(outcome.to_string(), "Restocked 2 items.");
    }

    #[tokio::test]
    async fn rejected_batch_carries_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/venues/venue-1/items"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server sad"))
            .mount(&server)
            .await;

        let client = PosClient::with_base_url(server.uri());
        let outcome = submit_restock(&client, &venue(), &[SoldOutItem::gtin("111")]).await;
        assert_eq!(
            outcome,
            RestockOutcome::Rejected {
                status: 500,
                body: "server sad".to_string()
            }
        );
        assert_eq!(outcome.to_string(), "Update failed: 500");
    }

    #[tokio::test]
    async fn connection_failure_is_not_a_panic() {
        // Bind a port, then free it so the connection is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PosClient::with_base_url(format!("http://{addr}"));
        let outcome = submit_restock(&client, &venue(), &[SoldOutItem::gtin("111")]).await;
        assert!(matches!(outcome, RestockOutcome::RequestFailed(_)));
        assert!(!outcome.is_success());
    }
}
