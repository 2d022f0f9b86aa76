//! Integration tests for the prize draw contract.
//!
//! These tests drive a whole event through the contract entry points
//! (`instantiate` / `execute` / `query`) using `cosmwasm_std::testing`
//! mocks: capacity setup, roster import and edits, gap filling and the
//! staged reveal.
//!
//! Run:
//! ```bash
//! cargo test -p prize-draw-integration-tests
//! ```

use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Env, MemoryStorage, OwnedDeps, Response};
use prize_draw::msg::{
    AdvanceResponse, ExecuteMsg, InstantiateMsg, QueryMsg, RevealStateResponse, RosterResponse,
    TierSummaryResponse,
};
use prize_draw::ContractError;
use prize_draw_common::{CapacityModel, DrawError, FillReport, RawRecord, Tier, Winner};

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn setup(capacity: Option<CapacityModel>) -> TestDeps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    let msg = InstantiateMsg {
        presenter: Some(deps.api.addr_make("presenter").to_string()),
        capacity,
    };
    prize_draw::contract::instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg)
        .unwrap();
    deps
}

fn row(uid: &str, name: &str, prize: &str) -> RawRecord {
    let mut raw = BTreeMap::new();
    raw.insert("UID".to_string(), uid.into());
    raw.insert("姓名".to_string(), name.into());
    raw.insert("奖项".to_string(), prize.into());
    raw
}

fn unassigned_rows(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| row(&format!("P{i:02}"), &format!("Guest {i}"), ""))
        .collect()
}

fn admin_exec_with(
    deps: &mut TestDeps,
    env: Env,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let admin = deps.api.addr_make("admin");
    prize_draw::contract::execute(deps.as_mut(), env, message_info(&admin, &[]), msg)
}

fn admin_exec(deps: &mut TestDeps, msg: ExecuteMsg) -> Result<Response, ContractError> {
    admin_exec_with(deps, mock_env(), msg)
}

fn presenter_advance(deps: &mut TestDeps, entropy: Option<&str>) -> AdvanceResponse {
    let presenter = deps.api.addr_make("presenter");
    let res = prize_draw::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&presenter, &[]),
        ExecuteMsg::Advance {
            entropy: entropy.map(str::to_string),
        },
    )
    .unwrap();
    from_json(res.data.unwrap()).unwrap()
}

fn query_summary(deps: &TestDeps) -> TierSummaryResponse {
    let bin =
        prize_draw::contract::query(deps.as_ref(), mock_env(), QueryMsg::TierSummary {}).unwrap();
    from_json(bin).unwrap()
}

fn query_roster(deps: &TestDeps) -> RosterResponse {
    let bin = prize_draw::contract::query(deps.as_ref(), mock_env(), QueryMsg::Roster {}).unwrap();
    from_json(bin).unwrap()
}

fn assigned(summary: &TierSummaryResponse) -> Vec<u32> {
    summary.tiers.iter().map(|t| t.assigned).collect()
}

fn winner_ids(winners: &[Winner]) -> BTreeSet<String> {
    winners.iter().map(|w| w.external_id.clone()).collect()
}

// ─── Full event ───

#[test]
fn test_full_event_reveals_every_tier_in_turn() {
    let mut deps = setup(Some(CapacityModel::new(1, 1, 2, 3)));
    admin_exec(
        &mut deps,
        ExecuteMsg::ImportRoster {
            records: unassigned_rows(10),
        },
    )
    .unwrap();

    let mut previous: BTreeSet<String> = BTreeSet::new();
    let mut tiers_by_stage = vec![];
    for expected_stage in 1..=4u8 {
        let step = presenter_advance(&mut deps, Some("gala-2026"));
        assert_eq!(step.stage, expected_stage);

        let current = winner_ids(&step.winners);
        assert!(previous.is_subset(&current), "reveal must only grow");
        tiers_by_stage.push(
            step.winners
                .iter()
                .filter(|w| !previous.contains(&w.external_id))
                .map(|w| w.tier)
                .collect::<BTreeSet<_>>(),
        );
        previous = current;
    }

    assert_eq!(
        tiers_by_stage,
        vec![
            BTreeSet::from([Tier::Lucky]),
            BTreeSet::from([Tier::Second]),
            BTreeSet::from([Tier::First]),
            BTreeSet::from([Tier::Special]),
        ]
    );
    assert_eq!(previous.len(), 7);

    let summary = query_summary(&deps);
    assert_eq!(assigned(&summary), vec![1, 1, 2, 3]);
    assert_eq!(summary.unassigned, 3);

    // one more press starts the reveal over without drawing again
    let again = presenter_advance(&mut deps, None);
    assert_eq!(again.stage, 1);
    assert_eq!(again.winners.len(), 3);
    assert!(!again.fill.changed);
    assert_eq!(assigned(&query_summary(&deps)), vec![1, 1, 2, 3]);
}

#[test]
fn test_preassigned_winners_are_kept() {
    let mut deps = setup(Some(CapacityModel::new(1, 2, 0, 0)));
    let mut records = vec![row("VIP", "Guest of honour", "特等奖"), row("F1", "Fixed", "一等奖")];
    records.extend(unassigned_rows(5));
    admin_exec(&mut deps, ExecuteMsg::ImportRoster { records }).unwrap();

    for _ in 0..4 {
        presenter_advance(&mut deps, None);
    }

    let roster = query_roster(&deps);
    let tier_of = |id: &str| {
        roster
            .records
            .iter()
            .find(|r| r.external_id == id)
            .and_then(|r| r.tier)
    };
    assert_eq!(tier_of("VIP"), Some(Tier::Special));
    assert_eq!(tier_of("F1"), Some(Tier::First));
    assert_eq!(assigned(&query_summary(&deps)), vec![1, 2, 0, 0]);

    // display order: special, first, ..., unassigned last
    assert_eq!(roster.records[0].external_id, "VIP");
    assert!(roster.records.last().unwrap().tier.is_none());
}

#[test]
fn test_small_pool_fills_most_valuable_tiers_first() {
    let mut deps = setup(Some(CapacityModel::new(1, 2, 3, 4)));
    admin_exec(
        &mut deps,
        ExecuteMsg::ImportRoster {
            records: unassigned_rows(4),
        },
    )
    .unwrap();

    let res = admin_exec(&mut deps, ExecuteMsg::FillGaps { entropy: None }).unwrap();
    let report: FillReport = from_json(res.data.unwrap()).unwrap();
    assert!(report.partial());
    assert_eq!(report.promoted(), 4);
    assert_eq!(report.unassigned_remaining, 0);

    let shortfalls: Vec<u32> = report.tiers.iter().map(|t| t.shortfall()).collect();
    assert_eq!(shortfalls, vec![0, 0, 2, 4]);
    assert_eq!(assigned(&query_summary(&deps)), vec![1, 2, 1, 0]);
}

// ─── Roster edits ───

#[test]
fn test_rejected_import_keeps_current_roster() {
    let mut deps = setup(Some(CapacityModel::new(1, 0, 0, 0)));
    admin_exec(
        &mut deps,
        ExecuteMsg::ImportRoster {
            records: unassigned_rows(3),
        },
    )
    .unwrap();

    let err = admin_exec(
        &mut deps,
        ExecuteMsg::ImportRoster {
            records: vec![row("A", "Ann", "特等奖"), row("B", "Bob", "特等奖")],
        },
    )
    .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("(2)"), "{message}");
    assert!(message.contains("(1)"), "{message}");

    assert_eq!(query_roster(&deps).records.len(), 3);
}

#[test]
fn test_edits_between_stages_are_refilled() {
    let mut deps = setup(Some(CapacityModel::new(0, 0, 0, 2)));
    admin_exec(
        &mut deps,
        ExecuteMsg::ImportRoster {
            records: unassigned_rows(3),
        },
    )
    .unwrap();

    let first = presenter_advance(&mut deps, Some("round-1"));
    assert_eq!(first.winners.len(), 2);

    // a winner left the venue
    let absent = first.winners[0].external_id.clone();
    admin_exec(
        &mut deps,
        ExecuteMsg::RemoveRecord {
            external_id: absent.clone(),
        },
    )
    .unwrap();

    let second = presenter_advance(&mut deps, Some("round-2"));
    assert_eq!(second.stage, 2);
    assert!(second.fill.changed);
    assert_eq!(second.winners.len(), 2);
    assert!(!winner_ids(&second.winners).contains(&absent));
    assert_eq!(query_summary(&deps).unassigned, 0);
}

#[test]
fn test_clearing_winners_restarts_reveal() {
    let mut deps = setup(Some(CapacityModel::new(1, 0, 0, 1)));
    admin_exec(
        &mut deps,
        ExecuteMsg::ImportRoster {
            records: unassigned_rows(2),
        },
    )
    .unwrap();
    presenter_advance(&mut deps, None);
    presenter_advance(&mut deps, None);

    admin_exec(&mut deps, ExecuteMsg::ClearWinners {}).unwrap();
    let bin =
        prize_draw::contract::query(deps.as_ref(), mock_env(), QueryMsg::RevealState {}).unwrap();
    let state: RevealStateResponse = from_json(bin).unwrap();
    // both tiers are populated, so the inferred stage is the special one
    assert_eq!(state.stage, 4);
    assert_eq!(state.winners.len(), 2);

    let next = presenter_advance(&mut deps, None);
    assert_eq!(next.stage, 1);
}

// ─── Guards ───

#[test]
fn test_advance_requires_roster_and_capacity() {
    let mut deps = setup(None);
    admin_exec(
        &mut deps,
        ExecuteMsg::ImportRoster {
            records: unassigned_rows(2),
        },
    )
    .unwrap();

    let err = admin_exec(&mut deps, ExecuteMsg::Advance { entropy: None }).unwrap_err();
    assert!(matches!(
        err,
        ContractError::Draw(DrawError::NotConfigured { .. })
    ));

    let bin =
        prize_draw::contract::query(deps.as_ref(), mock_env(), QueryMsg::Winners {}).unwrap();
    let winners: Vec<Winner> = from_json(bin).unwrap();
    assert!(winners.is_empty());
}

#[test]
fn test_only_admin_edits_roster() {
    let mut deps = setup(Some(CapacityModel::new(0, 0, 0, 1)));
    let presenter = deps.api.addr_make("presenter");
    let err = prize_draw::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&presenter, &[]),
        ExecuteMsg::ImportRoster {
            records: unassigned_rows(1),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::Unauthorized { .. }));
}

// ─── Randomness ───

#[test]
fn test_same_block_and_entropy_give_same_draw() {
    let draw = || {
        let mut deps = setup(Some(CapacityModel::new(1, 1, 1, 1)));
        admin_exec(
            &mut deps,
            ExecuteMsg::ImportRoster {
                records: unassigned_rows(8),
            },
        )
        .unwrap();
        admin_exec(
            &mut deps,
            ExecuteMsg::FillGaps {
                entropy: Some("seed".to_string()),
            },
        )
        .unwrap();
        query_roster(&deps)
    };
    assert_eq!(draw(), draw());
}

#[test]
fn test_every_candidate_can_win() {
    let mut winners = BTreeSet::new();
    for round in 0..200u64 {
        let mut deps = setup(Some(CapacityModel::new(1, 0, 0, 0)));
        admin_exec(
            &mut deps,
            ExecuteMsg::ImportRoster {
                records: unassigned_rows(4),
            },
        )
        .unwrap();

        let mut env = mock_env();
        env.block.height += round;
        admin_exec_with(&mut deps, env, ExecuteMsg::FillGaps { entropy: None }).unwrap();

        let roster = query_roster(&deps);
        winners.insert(roster.records[0].external_id.clone());
    }
    assert_eq!(winners.len(), 4);
}
