use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Outcome of one successful orchestration. Never produced on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub owner: Address,
    pub input_asset: Address,
    pub amount_in: U256,
    /// Native amount available for distribution
    pub total_proceeds: U256,
    pub amount_to_owner: U256,
    pub amount_to_maintainer: U256,
    pub amount_to_treasury: U256,
    /// Caller-supplied passthrough, not interpreted
    pub metadata: Bytes,
    pub maintainer: Address,
}

impl CompletionRecord {
    /// Shares must account for every unit of proceeds
    pub fn is_balanced(&self) -> bool {
        self.amount_to_owner
            .checked_add(self.amount_to_maintainer)
            .and_then(|sum| sum.checked_add(self.amount_to_treasury))
            == Some(self.total_proceeds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum EngineEvent {
    SwapCompleted(CompletionRecord),
    MaintainerUpdated {
        maintainer: Address,
        enabled: bool,
    },
    FeesUpdated {
        maintainer_fee: U256,
        treasury_fee: U256,
    },
    TreasuryWithdrawn {
        recipient: Address,
        amount: U256,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::SwapCompleted(_) => "swap_completed",
            EngineEvent::MaintainerUpdated { .. } => "maintainer_updated",
            EngineEvent::FeesUpdated { .. } => "fees_updated",
            EngineEvent::TreasuryWithdrawn { .. } => "treasury_withdrawn",
            EngineEvent::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }
}

/// Receives events after the state change that produced them has committed
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &EngineEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CompletionRecord {
        CompletionRecord {
            owner: Address::repeat_byte(1),
            input_asset: Address::repeat_byte(2),
            amount_in: U256::from(100u64),
            total_proceeds: U256::from(100u64),
            amount_to_owner: U256::from(98u64),
            amount_to_maintainer: U256::from(1u64),
            amount_to_treasury: U256::from(1u64),
            metadata: Bytes::from_static(b"order-7"),
            maintainer: Address::repeat_byte(3),
        }
    }

    #[test]
    fn test_balanced_record() {
        assert!(record().is_balanced());

        let mut skewed = record();
        skewed.amount_to_owner = U256::from(99u64);
        assert!(!skewed.is_balanced());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = EngineEvent::MaintainerUpdated {
            maintainer: Address::repeat_byte(9),
            enabled: true,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "maintainer_updated");
        assert_eq!(json["enabled"], true);
        assert_eq!(event.name(), "maintainer_updated");
    }
}
