use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Basis-point denominator for proportional fees
pub const BPS_DENOMINATOR: u64 = 10_000;

/// One native unit (18 decimals)
pub const NATIVE_UNIT: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeeError {
    #[error("{which} fee {fee} exceeds maximum {max}")]
    ExceedsMaximum {
        which: &'static str,
        fee: U256,
        max: U256,
    },

    #[error("proceeds {proceeds} do not cover fees {required}")]
    InsufficientProceeds { proceeds: U256, required: U256 },

    #[error("invalid fee schedule: {0}")]
    InvalidSchedule(String),

    #[error("fee arithmetic overflow")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    /// Fees are basis points of proceeds
    Proportional,
    /// Fees are absolute native amounts
    Fixed,
}

/// Maintainer and treasury fees plus the cap both are held under.
///
/// The mode and cap are fixed when the schedule is created; only the two
/// fees change afterwards, through [`FeeSchedule::with_fees`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    mode: FeeMode,
    maintainer_fee: U256,
    treasury_fee: U256,
    max_fee: U256,
}

/// How proceeds were divided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub owner: U256,
    pub maintainer: U256,
    pub treasury: U256,
}

impl FeeSplit {
    pub fn total(&self) -> U256 {
        self.owner + self.maintainer + self.treasury
    }
}

impl FeeSchedule {
    pub fn new(
        mode: FeeMode,
        maintainer_fee: U256,
        treasury_fee: U256,
        max_fee: U256,
    ) -> Result<Self, FeeError> {
        if mode == FeeMode::Proportional && max_fee > U256::from(BPS_DENOMINATOR) {
            return Err(FeeError::InvalidSchedule(format!(
                "proportional cap {max_fee} exceeds {BPS_DENOMINATOR} bps"
            )));
        }

        let schedule = Self {
            mode,
            maintainer_fee: U256::ZERO,
            treasury_fee: U256::ZERO,
            max_fee,
        };
        schedule.with_fees(maintainer_fee, treasury_fee)
    }

    pub fn proportional(maintainer_bps: u64, treasury_bps: u64, max_bps: u64) -> Result<Self, FeeError> {
        Self::new(
            FeeMode::Proportional,
            U256::from(maintainer_bps),
            U256::from(treasury_bps),
            U256::from(max_bps),
        )
    }

    pub fn fixed(maintainer: U256, treasury: U256, max: U256) -> Result<Self, FeeError> {
        Self::new(FeeMode::Fixed, maintainer, treasury, max)
    }

    /// Same mode and cap, new fees. Bounds are checked here and nowhere else.
    pub fn with_fees(&self, maintainer_fee: U256, treasury_fee: U256) -> Result<Self, FeeError> {
        if maintainer_fee > self.max_fee {
            return Err(FeeError::ExceedsMaximum {
                which: "maintainer",
                fee: maintainer_fee,
                max: self.max_fee,
            });
        }
        if treasury_fee > self.max_fee {
            return Err(FeeError::ExceedsMaximum {
                which: "treasury",
                fee: treasury_fee,
                max: self.max_fee,
            });
        }

        if self.mode == FeeMode::Proportional
            && maintainer_fee + treasury_fee > U256::from(BPS_DENOMINATOR)
        {
            return Err(FeeError::InvalidSchedule(format!(
                "proportional fees {maintainer_fee} + {treasury_fee} exceed {BPS_DENOMINATOR} bps"
            )));
        }

        Ok(Self {
            mode: self.mode,
            maintainer_fee,
            treasury_fee,
            max_fee: self.max_fee,
        })
    }

    pub fn mode(&self) -> FeeMode {
        self.mode
    }

    pub fn maintainer_fee(&self) -> U256 {
        self.maintainer_fee
    }

    pub fn treasury_fee(&self) -> U256 {
        self.treasury_fee
    }

    pub fn max_fee(&self) -> U256 {
        self.max_fee
    }

    /// Divide `proceeds` so that the three shares sum to it exactly
    pub fn split(&self, proceeds: U256) -> Result<FeeSplit, FeeError> {
        let (maintainer, treasury) = match self.mode {
            FeeMode::Proportional => {
                let denominator = U256::from(BPS_DENOMINATOR);
                let maintainer = proceeds
                    .checked_mul(self.maintainer_fee)
                    .ok_or(FeeError::Overflow)?
                    / denominator;
                let treasury = proceeds
                    .checked_mul(self.treasury_fee)
                    .ok_or(FeeError::Overflow)?
                    / denominator;
                (maintainer, treasury)
            }
            FeeMode::Fixed => (self.maintainer_fee, self.treasury_fee),
        };

        let required = maintainer.checked_add(treasury).ok_or(FeeError::Overflow)?;
        let owner = proceeds
            .checked_sub(required)
            .ok_or(FeeError::InsufficientProceeds { proceeds, required })?;

        Ok(FeeSplit {
            owner,
            maintainer,
            treasury,
        })
    }
}

impl Default for FeeSchedule {
    /// Fixed 0.01 native to each side, capped at 0.1
    fn default() -> Self {
        let hundredth = U256::from(NATIVE_UNIT / 100);
        Self {
            mode: FeeMode::Fixed,
            maintainer_fee: hundredth,
            treasury_fee: hundredth,
            max_fee: U256::from(NATIVE_UNIT / 10),
        }
    }
}
