//! Integration tests for the Tools draw contracts.
//!
//! These tests drive the contract entry points directly using
//! `cosmwasm_std::testing` mocks, simulating the block clock by rewriting
//! `env.block.time` between calls.
//!
//! Run:
//! ```bash
//! cargo test -p tools-draws-integration-tests
//! ```

use std::collections::BTreeMap;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Env, MemoryStorage, OwnedDeps, Response, Timestamp, Uint128};
use tools_draws_common::{credit_key_hex, DrawStatus, EntrySource, PaymentMetadata, Prize};
use tools_major_draws::msg::{DrawTotalsResponse, DrawsResponse};
use tools_major_draws::state::MajorDraw;

// ─── Constants ───

const NOW: u64 = 1_700_000_000;
const HOUR: u64 = 3_600;
const DAY: u64 = 24 * HOUR;

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn env_at(seconds: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(seconds);
    env
}

fn attr(res: &Response, key: &str) -> String {
    res.attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap_or_default()
}

fn prize() -> Prize {
    Prize {
        name: "DeWalt 18V combo".to_string(),
        description: "Six tool kit with batteries".to_string(),
        value: Uint128::from(199_900u128),
    }
}

/// Status order; terminal statuses share the top rank.
fn rank(status: DrawStatus) -> u8 {
    match status {
        DrawStatus::Queued => 0,
        DrawStatus::Active => 1,
        DrawStatus::Frozen => 2,
        DrawStatus::Completed | DrawStatus::Cancelled => 3,
    }
}

// ─── Major draw helpers ───

fn setup_major() -> TestDeps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    let operator = deps.api.addr_make("operator");
    tools_major_draws::contract::instantiate(
        deps.as_mut(),
        env_at(NOW),
        message_info(&admin, &[]),
        tools_major_draws::msg::InstantiateMsg {
            operator: operator.to_string(),
            schedule: None,
        },
    )
    .unwrap();
    deps
}

fn major_create(deps: &mut TestDeps, at: u64, activation: Option<u64>, draw_date: u64) {
    let admin = deps.api.addr_make("admin");
    tools_major_draws::contract::execute(
        deps.as_mut(),
        env_at(at),
        message_info(&admin, &[]),
        tools_major_draws::msg::ExecuteMsg::CreateDraw {
            name: "Monthly Giveaway".to_string(),
            description: "Major prize draw".to_string(),
            prize: prize(),
            draw_date: Timestamp::from_seconds(draw_date),
            activation_date: activation.map(Timestamp::from_seconds),
        },
    )
    .unwrap();
}

fn major_tick(deps: &mut TestDeps, at: u64) -> Response {
    let keeper = deps.api.addr_make("keeper");
    tools_major_draws::contract::execute(
        deps.as_mut(),
        env_at(at),
        message_info(&keeper, &[]),
        tools_major_draws::msg::ExecuteMsg::Tick {},
    )
    .unwrap()
}

fn major_credit(
    deps: &mut TestDeps,
    at: u64,
    payment_id: &str,
    user_id: &str,
    entries: u64,
    created: Option<u64>,
) -> Result<Response, tools_major_draws::ContractError> {
    let operator = deps.api.addr_make("operator");
    tools_major_draws::contract::execute(
        deps.as_mut(),
        env_at(at),
        message_info(&operator, &[]),
        tools_major_draws::msg::ExecuteMsg::CreditEntries {
            payment_id: payment_id.to_string(),
            user_id: user_id.to_string(),
            entries,
            source: EntrySource::OneTimePackage,
            payment: created.map(|created| PaymentMetadata {
                created,
                payment_type: Some("one-time".to_string()),
                package_type: Some("booster".to_string()),
            }),
        },
    )
}

fn major_draws(deps: &TestDeps) -> Vec<MajorDraw> {
    let res: DrawsResponse = from_json(
        tools_major_draws::contract::query(
            deps.as_ref(),
            env_at(NOW),
            tools_major_draws::msg::QueryMsg::Draws {
                status: None,
                start_after: None,
                limit: Some(100),
            },
        )
        .unwrap(),
    )
    .unwrap();
    res.draws
}

fn major_totals(deps: &TestDeps, draw_id: u64) -> DrawTotalsResponse {
    from_json(
        tools_major_draws::contract::query(
            deps.as_ref(),
            env_at(NOW),
            tools_major_draws::msg::QueryMsg::DrawTotals { draw_id },
        )
        .unwrap(),
    )
    .unwrap()
}

// ─── Major draw cycle ───

#[test]
fn test_multi_month_cycle() {
    let mut deps = setup_major();
    major_create(&mut deps, NOW, None, NOW + 20 * DAY);

    let mut last_rank: BTreeMap<u64, u8> = BTreeMap::new();
    let mut credited: BTreeMap<u64, u64> = BTreeMap::new();

    for step in 0..400u64 {
        let t = NOW + step * 6 * HOUR;
        major_tick(&mut deps, t);

        let draws = major_draws(&deps);
        let current = draws.iter().filter(|d| d.status.is_current()).count();
        assert!(current <= 1, "step {step}: {current} current draws");

        for draw in &draws {
            let r = rank(draw.status);
            let prev = last_rank.insert(draw.id, r).unwrap_or(0);
            assert!(r >= prev, "draw {} moved backwards at step {step}", draw.id);
        }

        let entries = step % 7 + 1;
        let res = major_credit(
            &mut deps,
            t,
            &format!("pi_{step}"),
            &format!("user-{}", step % 5),
            entries,
            Some(t - 60),
        )
        .unwrap();
        let draw_id: u64 = attr(&res, "draw_id").parse().unwrap();
        *credited.entry(draw_id).or_default() += entries;

        // a second sweep at the same instant has nothing left to do
        let res = major_tick(&mut deps, t);
        assert_eq!(attr(&res, "transitions"), "0");
        assert_eq!(attr(&res, "successor_created"), "false");
    }

    let draws = major_draws(&deps);
    let statuses: Vec<_> = draws.iter().map(|d| d.status).collect();
    assert_eq!(
        statuses,
        vec![
            DrawStatus::Completed,
            DrawStatus::Completed,
            DrawStatus::Completed,
            DrawStatus::Active,
        ]
    );

    for pair in draws.windows(2) {
        assert_eq!(pair[1].predecessor, Some(pair[0].id));
        assert_eq!(pair[1].activation_date, pair[0].draw_date);
        assert_eq!(
            pair[1].draw_date.seconds() - pair[0].draw_date.seconds(),
            30 * DAY
        );
    }

    for draw in &draws {
        let totals = major_totals(&deps, draw.id);
        assert_eq!(totals.total_entries, totals.summed_entries);
        assert_eq!(totals.entrant_count, totals.counted_entrants);
        assert_eq!(
            totals.total_entries,
            credited.get(&draw.id).copied().unwrap_or(0)
        );
    }
}

#[test]
fn test_freeze_boundary_routes_late_payments() {
    let mut deps = setup_major();
    let draw_date = NOW + 20 * DAY;
    major_create(&mut deps, NOW, None, draw_date);
    major_tick(&mut deps, NOW);
    // materialises the successor
    major_tick(&mut deps, draw_date - 2 * DAY);

    // authorised 40 minutes out, processed 5 minutes out, before any sweep
    let res = major_credit(
        &mut deps,
        draw_date - 300,
        "pi_early",
        "user-1",
        5,
        Some(draw_date - 2400),
    )
    .unwrap();
    assert_eq!(attr(&res, "draw_id"), "0");

    // authorised 10 minutes out
    let res = major_credit(
        &mut deps,
        draw_date - 300,
        "pi_late",
        "user-1",
        5,
        Some(draw_date - 600),
    )
    .unwrap();
    assert_eq!(attr(&res, "draw_id"), "1");

    major_tick(&mut deps, draw_date - 200);
    let draws = major_draws(&deps);
    assert_eq!(draws[0].status, DrawStatus::Frozen);
    assert_eq!(draws[0].total_entries, 5);
    assert_eq!(draws[1].status, DrawStatus::Queued);
    assert_eq!(draws[1].total_entries, 5);

    // replayed webhook after the freeze keeps its original target
    let res = major_credit(
        &mut deps,
        draw_date - 100,
        "pi_early",
        "user-1",
        5,
        Some(draw_date - 2400),
    )
    .unwrap();
    assert_eq!(attr(&res, "duplicate"), "true");
    assert_eq!(attr(&res, "draw_id"), "0");
    assert_eq!(major_totals(&deps, 0).total_entries, 5);
}

// ─── Mini draws ───

#[test]
fn test_mini_draw_is_independent_of_major_draws() {
    let mut major = setup_major();
    major_create(&mut major, NOW, None, NOW + 20 * DAY);
    major_tick(&mut major, NOW);

    let mut mini = mock_dependencies();
    let admin = mini.api.addr_make("admin");
    let operator = mini.api.addr_make("operator");
    tools_mini_draws::contract::instantiate(
        mini.as_mut(),
        env_at(NOW),
        message_info(&admin, &[]),
        tools_mini_draws::msg::InstantiateMsg {
            operator: operator.to_string(),
        },
    )
    .unwrap();
    tools_mini_draws::contract::execute(
        mini.as_mut(),
        env_at(NOW),
        message_info(&admin, &[]),
        tools_mini_draws::msg::ExecuteMsg::CreateMiniDraw {
            name: "Impact driver".to_string(),
            description: String::new(),
            prize: prize(),
            min_entries: 10,
        },
    )
    .unwrap();

    // same payment id lands in both systems without interfering
    major_credit(&mut major, NOW + HOUR, "pi_1", "user-1", 3, None).unwrap();
    let res = tools_mini_draws::contract::execute(
        mini.as_mut(),
        env_at(NOW + HOUR),
        message_info(&operator, &[]),
        tools_mini_draws::msg::ExecuteMsg::CreditMiniDrawEntries {
            mini_draw_id: 0,
            payment_id: "pi_1".to_string(),
            user_id: "user-1".to_string(),
            entries: 10,
        },
    )
    .unwrap();
    assert_eq!(attr(&res, "completed"), "true");

    assert_eq!(major_totals(&major, 0).total_entries, 3);
    let mini_draw: tools_mini_draws::state::MiniDraw = from_json(
        tools_mini_draws::contract::query(
            mini.as_ref(),
            env_at(NOW),
            tools_mini_draws::msg::QueryMsg::MiniDraw { mini_draw_id: 0 },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(mini_draw.total_entries, 10);
}

// ─── Wire format ───

#[test]
fn test_credit_message_wire_format() {
    let msg: tools_major_draws::msg::ExecuteMsg = serde_json::from_str(
        r#"{"credit_entries":{
            "payment_id":"pi_3Nx",
            "user_id":"64f1c2",
            "entries":100,
            "source":"membership",
            "payment":{"created":1700000000,"type":"subscription","package_type":null}
        }}"#,
    )
    .unwrap();

    match msg {
        tools_major_draws::msg::ExecuteMsg::CreditEntries {
            entries,
            source,
            payment,
            ..
        } => {
            assert_eq!(entries, 100);
            assert_eq!(source, EntrySource::Membership);
            let payment = payment.unwrap();
            assert_eq!(payment.created, 1_700_000_000);
            assert_eq!(payment.payment_type.as_deref(), Some("subscription"));
        }
        other => panic!("unexpected message: {other:?}"),
    }

    let tick = serde_json::to_string(&tools_major_draws::msg::ExecuteMsg::Tick {}).unwrap();
    assert_eq!(tick, r#"{"tick":{}}"#);

    let source = serde_json::to_string(&EntrySource::CancellationUpsell).unwrap();
    assert_eq!(source, r#""cancellation_upsell""#);
}

#[test]
fn test_credit_key_separates_fields() {
    assert_ne!(credit_key_hex("ab", "c"), credit_key_hex("a", "bc"));
    assert_eq!(credit_key_hex("pi_1", "user-1").len(), 64);
}
