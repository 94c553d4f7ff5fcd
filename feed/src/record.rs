//! # Block Record
//!
//! The unit every feed source trades in: one produced block, reduced to the
//! fields the feed actually displays and orders by. This is a *view* type,
//! not a consensus type — there is no hash verification here, no parent
//! linkage, no signature. The serving node already validated the chain;
//! the feed's only job is to keep the records it is given in order.
//!
//! ## Wire Shape
//!
//! ```text
//! {
//!   "blockID":    string,   // opaque content identifier, unique per block
//!   "producerID": string,   // opaque identifier of the producing node
//!   "height":     integer,  // non-negative; 0 is the origin block
//!   "txids":      [string]  // ordered, possibly empty, display-only
//! }
//! ```
//!
//! Both the paginated endpoint (JSON array of records) and the live push
//! stream (one record per message) use this exact shape.

use serde::{Deserialize, Serialize};

use crate::config::ORIGIN_HEIGHT;
use crate::error::DecodeError;

/// One produced block, as exchanged between all three feed sources.
///
/// `block_id` and `producer_id` are opaque strings: the feed never parses
/// them, only displays them and (by contract) never holds two records with
/// the same `block_id`. Ordering is entirely by `height`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Opaque content identifier, unique per block.
    #[serde(rename = "blockID")]
    pub block_id: String,

    /// Opaque identifier of the node that produced the block.
    #[serde(rename = "producerID")]
    pub producer_id: String,

    /// Block height. Strictly increasing with block order; height 0 is the
    /// origin block and has no predecessor.
    pub height: u64,

    /// Ordered transaction identifiers included in the block. May be empty.
    /// The order is inclusion order and is display-only; the feed does not
    /// enforce anything about it.
    #[serde(default)]
    pub txids: Vec<String>,
}

impl BlockRecord {
    /// Whether this is the origin block, the terminal condition for
    /// pagination: nothing exists below it.
    pub fn is_origin(&self) -> bool {
        self.height == ORIGIN_HEIGHT
    }

    /// Decode a single record from its JSON wire form.
    ///
    /// Missing `blockID`, `producerID`, or `height` fields are rejected, as
    /// is a negative or overflowing height. A missing `txids` decodes as an
    /// empty list.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Shortened block identifier for log lines and compact display.
    pub fn short_id(&self) -> String {
        if self.block_id.len() > 10 {
            format!("{}...", &self.block_id[..10])
        } else {
            self.block_id.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- 1. wire_decoding ---------------------------------------------------

    #[test]
    fn decodes_full_wire_record() {
        let json = r#"{
            "blockID": "9cc3d50110b00cf51ea9afc64514c506d890367976d00276e1a7f01289601000",
            "producerID": "12D3KooWN2RRWUokkcCjrf8zypvHwGv2u6rUepFAXheambSst000",
            "height": 1,
            "txids": ["ef72632c296f60665dfc8a2ac74804f27f39eaf9882139fafcd2c70389140000"]
        }"#;

        let record = BlockRecord::decode(json).unwrap();
        assert_eq!(record.height, 1);
        assert_eq!(record.txids.len(), 1);
        assert!(record.block_id.starts_with("9cc3d501"));
        assert!(!record.is_origin());
    }

    // -- 2. txids_default_to_empty ------------------------------------------

    #[test]
    fn missing_txids_decodes_as_empty() {
        let json = r#"{"blockID": "b1", "producerID": "p1", "height": 4}"#;
        let record = BlockRecord::decode(json).unwrap();
        assert!(record.txids.is_empty());
    }

    // -- 3. required_fields_rejected ----------------------------------------

    #[test]
    fn missing_required_fields_are_rejected() {
        // No blockID.
        assert!(BlockRecord::decode(r#"{"producerID": "p", "height": 1}"#).is_err());
        // No producerID.
        assert!(BlockRecord::decode(r#"{"blockID": "b", "height": 1}"#).is_err());
        // No height.
        assert!(BlockRecord::decode(r#"{"blockID": "b", "producerID": "p"}"#).is_err());
    }

    // -- 4. negative_height_rejected ----------------------------------------

    #[test]
    fn negative_height_is_rejected() {
        let json = r#"{"blockID": "b", "producerID": "p", "height": -3}"#;
        assert!(BlockRecord::decode(json).is_err());
    }

    // -- 5. malformed_json_rejected -----------------------------------------

    #[test]
    fn malformed_json_is_rejected() {
        assert!(BlockRecord::decode("not a block").is_err());
        assert!(BlockRecord::decode("{\"blockID\":").is_err());
    }

    // -- 6. origin_detection ------------------------------------------------

    #[test]
    fn origin_block_is_detected() {
        let json = r#"{"blockID": "origin", "producerID": "p", "height": 0, "txids": []}"#;
        let record = BlockRecord::decode(json).unwrap();
        assert!(record.is_origin());
    }

    // -- 7. short_id --------------------------------------------------------

    #[test]
    fn short_id_truncates_long_ids_only() {
        let long = BlockRecord {
            block_id: "abcdef0123456789".into(),
            producer_id: "p".into(),
            height: 1,
            txids: vec![],
        };
        assert_eq!(long.short_id(), "abcdef0123...");

        let short = BlockRecord {
            block_id: "tiny".into(),
            ..long
        };
        assert_eq!(short.short_id(), "tiny");
    }
}
