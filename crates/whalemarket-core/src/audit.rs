//! Append-only audit trail.
//!
//! Every committed market operation appends one [`Receipt`]. Each receipt
//! hashes the previous one, so altering, dropping or reordering any entry
//! breaks [`verify_chain`] from that point on.
//!
//! A trail restored from a snapshot starts from the snapshot's head instead
//! of the genesis hash; it verifies the receipts issued since.

use whalemarket_types::{MarketError, MarketEvent, MarketId, Receipt, Result};

/// Hash-chained log of committed events for one market.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    market_id: MarketId,
    /// Sequence number of the first receipt held in `receipts`.
    anchor_sequence: u64,
    /// Hash the first held receipt must chain from.
    anchor_hash: [u8; 32],
    receipts: Vec<Receipt>,
    next_sequence: u64,
    head: [u8; 32],
}

impl AuditTrail {
    /// Start a fresh chain from the market's genesis hash.
    #[must_use]
    pub fn new(market_id: MarketId) -> Self {
        Self::resume(market_id, 0, Receipt::genesis_hash(market_id))
    }

    /// Continue a chain whose earlier receipts live elsewhere.
    #[must_use]
    pub fn resume(market_id: MarketId, next_sequence: u64, head: [u8; 32]) -> Self {
        Self {
            market_id,
            anchor_sequence: next_sequence,
            anchor_hash: head,
            receipts: Vec::new(),
            next_sequence,
            head,
        }
    }

    /// Append a receipt for `event`, returning its sequence number.
    pub fn record(&mut self, event: MarketEvent) -> u64 {
        let sequence = self.next_sequence;
        let receipt = Receipt::issue(self.market_id, sequence, self.head, event);
        tracing::trace!(
            sequence,
            event = event.label(),
            hash = %receipt.hash_hex(),
            "Receipt appended"
        );
        self.head = receipt.hash;
        self.receipts.push(receipt);
        self.next_sequence += 1;
        sequence
    }

    /// Receipts held by this trail, oldest first.
    #[must_use]
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Hash of the most recent receipt (the anchor if none were issued).
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.head
    }

    #[must_use]
    pub fn head_hex(&self) -> String {
        hex::encode(self.head)
    }

    /// Sequence number the next receipt will carry.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Recompute the chain held by this trail.
    ///
    /// # Errors
    /// Returns `LedgerInconsistent` naming the first broken receipt.
    pub fn verify(&self) -> Result<()> {
        verify_chain(
            self.market_id,
            self.anchor_sequence,
            self.anchor_hash,
            &self.receipts,
        )
    }
}

#[cfg(test)]
impl AuditTrail {
    fn receipts_mut(&mut self) -> &mut [Receipt] {
        &mut self.receipts
    }
}

/// Check that `receipts` form an unbroken chain starting at
/// (`start_sequence`, `start_hash`) for `market_id`.
///
/// # Errors
/// Returns `LedgerInconsistent` naming the first receipt that fails.
pub fn verify_chain(
    market_id: MarketId,
    start_sequence: u64,
    start_hash: [u8; 32],
    receipts: &[Receipt],
) -> Result<()> {
    let mut expected_sequence = start_sequence;
    let mut expected_prev = start_hash;

    for receipt in receipts {
        let broken = |what: &str| MarketError::LedgerInconsistent {
            reason: format!("audit receipt {}: {what}", receipt.sequence),
        };
        if receipt.market_id != market_id {
            return Err(broken("issued by another market"));
        }
        if receipt.sequence != expected_sequence {
            return Err(broken(&format!("expected sequence {expected_sequence}")));
        }
        if receipt.prev_hash != expected_prev {
            return Err(broken("does not chain from its predecessor"));
        }
        if !receipt.is_intact() {
            return Err(broken("hash does not match contents"));
        }
        expected_prev = receipt.hash;
        expected_sequence += 1;
    }
    Ok(())
}
