//! Selection of the sold-out items a venue wants put back on sale.
//!
//! Pure logic: a menu snapshot plus the venue's include/exclude lists in,
//! an ordered list of restockable identifiers out. Only items the merchant
//! forced out of stock are candidates. Duplicate identifiers are kept here
//! on purpose; collapsing them is the submitter's job.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::pos::MenuSnapshot;

/// Inventory mode the upstream sets when a merchant manually pulls an item.
pub const FORCED_OUT_OF_STOCK: &str = "FORCED_OUT_OF_STOCK";

/// Which identifier namespace a sold-out item is addressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    Gtin,
    Sku,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Gtin => write!(f, "gtin"),
            IdKind::Sku => write!(f, "sku"),
        }
    }
}

/// A restockable item addressed by exactly one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldOutItem {
    #[serde(rename = "type")]
    pub kind: IdKind,
    pub id: String,
}

impl SoldOutItem {
    pub fn gtin(id: impl Into<String>) -> Self {
        Self {
            kind: IdKind::Gtin,
            id: id.into(),
        }
    }

    pub fn sku(id: impl Into<String>) -> Self {
        Self {
            kind: IdKind::Sku,
            id: id.into(),
        }
    }
}

/// Per-venue include/exclude lists applied to forced-out candidates.
///
/// Exclusion always wins and is checked first, against both identifiers.
/// Inclusion only activates when at least one inclusion list is non-empty;
/// it is then checked against the identifier the item is addressed by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    excluded_gtins: HashSet<String>,
    excluded_skus: HashSet<String>,
    included_gtins: HashSet<String>,
    included_skus: HashSet<String>,
}

impl FilterPolicy {
    pub fn new(
        excluded_gtins: Vec<String>,
        excluded_skus: Vec<String>,
        included_gtins: Vec<String>,
        included_skus: Vec<String>,
    ) -> Self {
        Self {
            excluded_gtins: excluded_gtins.into_iter().collect(),
            excluded_skus: excluded_skus.into_iter().collect(),
            included_gtins: included_gtins.into_iter().collect(),
            included_skus: included_skus.into_iter().collect(),
        }
    }

    fn admits(&self, item: &SoldOutItem) -> bool {
        if self.included_gtins.is_empty() && self.included_skus.is_empty() {
            return true;
        }
        match item.kind {
            IdKind::Gtin => self.included_gtins.contains(&item.id),
            IdKind::Sku => self.included_skus.contains(&item.id),
        }
    }
}

/// Extract the restockable items from a menu snapshot, in menu order.
///
/// An item qualifies when its inventory mode is [`FORCED_OUT_OF_STOCK`].
/// It is then addressed by gtin when present, sku otherwise; items with
/// neither identifier are skipped with a warning so the menu data can be
/// fixed upstream.
pub fn sold_out_items(snapshot: &MenuSnapshot, policy: &FilterPolicy) -> Vec<SoldOutItem> {
    let mut selected = Vec::new();
    let mut skipped_gtins: Vec<&str> = Vec::new();
    let mut skipped_skus: Vec<&str> = Vec::new();

    for item in &snapshot.items {
        if item.inventory_mode.as_deref() != Some(FORCED_OUT_OF_STOCK) {
            continue;
        }

        let gtin = item.product.as_ref().and_then(|p| p.gtin.as_deref());
        let sku = item.product.as_ref().and_then(|p| p.sku.as_deref());

        if let Some(gtin) = gtin
            && policy.excluded_gtins.contains(gtin)
        {
            skipped_gtins.push(gtin);
            continue;
        }
        if let Some(sku) = sku
            && policy.excluded_skus.contains(sku)
        {
            skipped_skus.push(sku);
            continue;
        }

        let candidate = match (gtin, sku) {
            (Some(gtin), _) => SoldOutItem::gtin(gtin),
            (None, Some(sku)) => SoldOutItem::sku(sku),
            (None, None) => {
                warn!(
                    venue_id = %snapshot.venue_id,
                    item_id = item.id.as_deref().unwrap_or("unknown"),
                    "skipping sold-out item with no gtin or sku"
                );
                continue;
            }
        };

        if policy.admits(&candidate) {
            selected.push(candidate);
        }
    }

    if !skipped_gtins.is_empty() {
        debug!(
            venue_id = %snapshot.venue_id,
            gtins = %skipped_gtins.join(", "),
            "excluded gtins left sold out"
        );
    }
    if !skipped_skus.is_empty() {
        debug!(
            venue_id = %snapshot.venue_id,
            skus = %skipped_skus.join(", "),
            "excluded skus left sold out"
        );
    }

    selected
}
