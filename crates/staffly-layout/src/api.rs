//! Remote dashboard layout endpoint

use crate::card::CardId;
use crate::error::LayoutError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use staffly_access::RestaurantId;

/// JSON body of the layout endpoint, both directions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPayload {
    /// Card ids in display order; `null` reads as empty
    #[serde(default)]
    pub layout: Option<Vec<CardId>>,
}

impl LayoutPayload {
    /// Wrap an order for sending
    #[inline]
    #[must_use]
    pub fn new(layout: Vec<CardId>) -> Self {
        Self {
            layout: Some(layout),
        }
    }

    /// Card ids, treating a missing list as empty
    #[inline]
    #[must_use]
    pub fn into_ids(self) -> Vec<CardId> {
        self.layout.unwrap_or_default()
    }
}

/// Remote storage of the per-restaurant dashboard order
#[async_trait]
pub trait LayoutApi: Send + Sync {
    /// Fetch the stored order (`GET`)
    async fn fetch_layout(&self, restaurant: &RestaurantId) -> Result<Vec<CardId>, LayoutError>;

    /// Store an order (`PUT`); returns the server's canonical stored value
    async fn save_layout(
        &self,
        restaurant: &RestaurantId,
        layout: &[CardId],
    ) -> Result<Vec<CardId>, LayoutError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_layout_reads_as_empty() {
        let payload: LayoutPayload = serde_json::from_str(r#"{"layout":null}"#).unwrap();
        assert!(payload.into_ids().is_empty());

        let payload: LayoutPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.into_ids().is_empty());
    }

    #[test]
    fn payload_shape() {
        let payload = LayoutPayload::new(vec!["schedule".into(), "tasks".into()]);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"layout":["schedule","tasks"]}"#);
    }
}
