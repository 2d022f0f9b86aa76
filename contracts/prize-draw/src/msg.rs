use cosmwasm_schema::{cw_serde, QueryResponses};
use prize_draw_common::{
    CapacityModel, FillReport, ParticipantRecord, RawRecord, Tier, Winner,
};

use crate::state::DrawConfig;

#[cw_serde]
pub struct InstantiateMsg {
    /// Account allowed to advance the reveal besides the admin.
    pub presenter: Option<String>,
    /// Initial per-tier targets. Left unconfigured when omitted.
    pub capacity: Option<CapacityModel>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Set one tier's target. `count` is the raw editor value and must be a
    /// non-negative whole number. Admin only.
    UpdateCapacity { tier: Tier, count: String },
    /// Replace the roster with an uploaded batch. Rows use the file's own
    /// column names; the batch is rejected as a whole if any tier is over
    /// capacity. Admin only.
    ImportRoster { records: Vec<RawRecord> },
    /// Append a single row. Admin only.
    AddRecord { record: RawRecord },
    /// Remove the first record with this id. Admin only.
    RemoveRecord { external_id: String },
    /// Randomly fill open prize slots without revealing anything. Admin only.
    FillGaps { entropy: Option<String> },
    /// Fill open slots, then show the next reveal stage. Admin or presenter.
    Advance { entropy: Option<String> },
    /// Wipe the roster and its assignments. Admin only.
    ClearRoster {},
    /// Wipe the saved winner list. Admin only.
    ClearWinners {},
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        presenter: Option<String>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(DrawConfig)]
    Config {},
    #[returns(CapacityResponse)]
    Capacity {},
    #[returns(RosterResponse)]
    Roster {},
    #[returns(TierSummaryResponse)]
    TierSummary {},
    #[returns(RevealStateResponse)]
    RevealState {},
    #[returns(Vec<Winner>)]
    Winners {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct CapacityResponse {
    /// False until a capacity has been saved; `capacity` is then all zeros.
    pub configured: bool,
    pub capacity: CapacityModel,
}

#[cw_serde]
pub struct RosterResponse {
    /// Records in display order.
    pub records: Vec<ParticipantRecord>,
}

#[cw_serde]
pub struct TierStatus {
    pub tier: Tier,
    pub target: u32,
    pub assigned: u32,
}

#[cw_serde]
pub struct TierSummaryResponse {
    pub tiers: Vec<TierStatus>,
    pub unassigned: u32,
}

#[cw_serde]
pub struct RevealStateResponse {
    pub stage: u8,
    pub winners: Vec<Winner>,
}

/// Data attached to an `Advance` response.
#[cw_serde]
pub struct AdvanceResponse {
    pub stage: u8,
    pub winners: Vec<Winner>,
    pub fill: FillReport,
}
