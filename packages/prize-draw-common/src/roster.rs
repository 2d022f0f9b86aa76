use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::capacity::CapacityModel;
use crate::error::DrawError;
use crate::types::{ParticipantRecord, Tier};

/// One cell of an uploaded roster file. Spreadsheet exports keep numeric
/// cells (typically ids) as numbers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(text) => f.write_str(text),
            RawValue::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

impl From<String> for RawValue {
    fn from(text: String) -> Self {
        RawValue::Text(text)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

/// A loosely-typed row from an uploaded roster file.
pub type RawRecord = BTreeMap<String, RawValue>;

const TIER_KEYS: [&str; 2] = ["奖项", "prize"];
const ID_KEYS: [&str; 2] = ["UID", "uid"];
const NAME_KEYS: [&str; 2] = ["姓名", "name"];
const CONTACT_KEYS: [&str; 2] = ["邮箱", "email"];

/// First non-empty value among the key spellings, trimmed.
fn field(raw: &RawRecord, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .map(|value| value.to_string().trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

pub fn normalize_record(raw: &RawRecord) -> ParticipantRecord {
    ParticipantRecord {
        external_id: field(raw, &ID_KEYS),
        display_name: field(raw, &NAME_KEYS),
        contact: field(raw, &CONTACT_KEYS),
        tier: Tier::from_label(&field(raw, &TIER_KEYS)),
    }
}

pub fn normalize_batch(raw: &[RawRecord]) -> Vec<ParticipantRecord> {
    raw.iter().map(normalize_record).collect()
}

/// Assigned count per tier, in rank order.
pub fn tier_counts(records: &[ParticipantRecord]) -> [(Tier, u32); Tier::COUNT] {
    let mut counts = Tier::ALL.map(|tier| (tier, 0u32));
    for tier in records.iter().filter_map(|r| r.tier) {
        counts[tier.rank()].1 += 1;
    }
    counts
}

pub fn unassigned_count(records: &[ParticipantRecord]) -> u32 {
    records.iter().filter(|r| r.is_unassigned()).map(|_| 1u32).sum()
}

pub fn capacity_violations(records: &[ParticipantRecord], capacity: &CapacityModel) -> Vec<String> {
    tier_counts(records)
        .iter()
        .filter(|(tier, actual)| *actual > capacity.get(*tier))
        .map(|(tier, actual)| violation(*tier, *actual, capacity.get(*tier)))
        .collect()
}

fn violation(tier: Tier, actual: u32, target: u32) -> String {
    format!("{tier} count ({actual}) exceeds configured count ({target})")
}

/// Accept or reject a candidate roster as a whole.
pub fn validate_batch(
    records: &[ParticipantRecord],
    capacity: &CapacityModel,
) -> Result<(), DrawError> {
    let violations = capacity_violations(records, capacity);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(DrawError::CapacityExceeded { violations })
    }
}

/// Append one record. Only the tier the record carries is checked: it must
/// have room for one more. Unassigned records are always accepted, even when
/// a lowered capacity has left some other tier over its target.
pub fn add_record(
    roster: &mut Vec<ParticipantRecord>,
    record: ParticipantRecord,
    capacity: &CapacityModel,
) -> Result<(), DrawError> {
    if let Some(tier) = record.tier {
        let grown = tier_counts(roster)[tier.rank()].1 + 1;
        let target = capacity.get(tier);
        if grown > target {
            return Err(DrawError::CapacityExceeded {
                violations: vec![violation(tier, grown, target)],
            });
        }
    }
    roster.push(record);
    Ok(())
}

/// Storage index of the first record with this id.
pub fn position_of(roster: &[ParticipantRecord], external_id: &str) -> Option<usize> {
    roster.iter().position(|r| r.external_id == external_id)
}

pub fn remove_record(
    roster: &mut Vec<ParticipantRecord>,
    external_id: &str,
) -> Result<ParticipantRecord, DrawError> {
    let index = position_of(roster, external_id).ok_or_else(|| DrawError::RecordNotFound {
        external_id: external_id.to_string(),
    })?;
    Ok(roster.remove(index))
}

fn display_rank(record: &ParticipantRecord) -> usize {
    record.tier.map_or(Tier::COUNT, Tier::rank)
}

/// Display order: tier rank ascending with unassigned last, ties broken by
/// external id. Storage order is not affected.
pub fn display_order(roster: &[ParticipantRecord]) -> Vec<&ParticipantRecord> {
    let mut sorted: Vec<&ParticipantRecord> = roster.iter().collect();
    sorted.sort_by(|a, b| match display_rank(a).cmp(&display_rank(b)) {
        Ordering::Equal => a.external_id.cmp(&b.external_id),
        other => other,
    });
    sorted
}
