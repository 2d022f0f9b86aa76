use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, Storage};
use cw_storage_plus::Item;
use prize_draw_common::{CapacityModel, ParticipantRecord, RevealCursor, Winner};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const CONFIG: Item<DrawConfig> = Item::new("config");
pub const CAPACITY: Item<CapacityModel> = Item::new("capacity");
pub const ROSTER: Item<Vec<ParticipantRecord>> = Item::new("roster");
/// Winners shown by the most recent reveal.
pub const WINNERS: Item<Vec<Winner>> = Item::new("winners");
pub const REVEAL_CURSOR: Item<RevealCursor> = Item::new("reveal_cursor");
/// Bumped on every draw so that two draws in one block get different seeds.
pub const DRAW_NONCE: Item<u64> = Item::new("draw_nonce");

#[cw_serde]
pub struct DrawConfig {
    pub admin: Addr,
    /// Optional account allowed to advance the reveal besides the admin.
    pub presenter: Option<Addr>,
}

/// Load an item, treating an unreadable value like a missing one.
pub fn load_lenient<T>(storage: &dyn Storage, api: &dyn Api, item: &Item<T>, key: &str) -> Option<T>
where
    T: Serialize + DeserializeOwned,
{
    match item.may_load(storage) {
        Ok(value) => value,
        Err(err) => {
            api.debug(&format!("prize-draw: discarding unreadable '{key}': {err}"));
            None
        }
    }
}

pub fn load_capacity(storage: &dyn Storage, api: &dyn Api) -> Option<CapacityModel> {
    load_lenient(storage, api, &CAPACITY, "capacity")
}

pub fn load_roster(storage: &dyn Storage, api: &dyn Api) -> Option<Vec<ParticipantRecord>> {
    load_lenient(storage, api, &ROSTER, "roster")
}

pub fn load_winners(storage: &dyn Storage, api: &dyn Api) -> Option<Vec<Winner>> {
    load_lenient(storage, api, &WINNERS, "winners")
}

pub fn load_cursor(storage: &dyn Storage, api: &dyn Api) -> Option<RevealCursor> {
    load_lenient(storage, api, &REVEAL_CURSOR, "reveal_cursor")
}
