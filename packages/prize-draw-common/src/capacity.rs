use cosmwasm_schema::cw_serde;

use crate::error::DrawError;
use crate::types::Tier;

/// Target number of winners per tier.
#[cw_serde]
#[derive(Default, Copy, Eq)]
pub struct CapacityModel {
    pub special: u32,
    pub first: u32,
    pub second: u32,
    pub lucky: u32,
}

impl CapacityModel {
    pub fn new(special: u32, first: u32, second: u32, lucky: u32) -> Self {
        Self {
            special,
            first,
            second,
            lucky,
        }
    }

    pub fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Special => self.special,
            Tier::First => self.first,
            Tier::Second => self.second,
            Tier::Lucky => self.lucky,
        }
    }

    /// Set a tier's target. Negative or out-of-range counts are rejected and
    /// leave the model untouched.
    pub fn set(&mut self, tier: Tier, count: i64) -> Result<(), DrawError> {
        if count < 0 {
            return Err(DrawError::InvalidCapacity {
                raw: count.to_string(),
                reason: "count must not be negative".to_string(),
            });
        }
        let count = u32::try_from(count).map_err(|_| DrawError::InvalidCapacity {
            raw: count.to_string(),
            reason: format!("count must be at most {}", u32::MAX),
        })?;

        let slot = match tier {
            Tier::Special => &mut self.special,
            Tier::First => &mut self.first,
            Tier::Second => &mut self.second,
            Tier::Lucky => &mut self.lucky,
        };
        *slot = count;
        Ok(())
    }

    /// Every tier with its target, in rank order.
    pub fn all(&self) -> Vec<(Tier, u32)> {
        Tier::ALL.iter().map(|&t| (t, self.get(t))).collect()
    }

    pub fn total(&self) -> u64 {
        Tier::ALL.iter().map(|&t| u64::from(self.get(t))).sum()
    }
}

/// Parse a capacity typed into the configuration editor.
pub fn parse_capacity(raw: &str) -> Result<u32, DrawError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| DrawError::InvalidCapacity {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("count is empty"));
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| invalid("count must be a whole number"))?;
    if value < 0 {
        return Err(invalid("count must not be negative"));
    }
    u32::try_from(value).map_err(|_| invalid("count is too large"))
}
