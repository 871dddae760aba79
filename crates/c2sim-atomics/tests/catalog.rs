use c2sim_atomics::{resolve, Atomic, CompileError, Resolved, UnitType};
use c2sim_core::{
    Action, AgentInfo, Context, EnvInfo, ObservationBuf, ObservationLayout, Side, Status, Terrain,
};
use c2sim_lang::{parse, SyntaxNode};

const ALLIES: usize = 2;
const ENEMIES: usize = 3;

fn agent() -> AgentInfo {
    AgentInfo {
        agent_id: 0,
        side: Side::Ally,
        velocity: 3.15,
        sight_range: 9.0,
        attack_range: 5.0,
    }
}

fn env() -> EnvInfo {
    EnvInfo::new(ALLIES, ENEMIES, Terrain::open(32, 32))
}

/// Row 0 is the teammate, rows 1..4 the foes.
fn observation() -> ObservationBuf {
    let mut buf = ObservationBuf::new(ObservationLayout::smax(ALLIES, ENEMIES));
    buf.set_self(0.8, (0.5, 0.5), 0.0)
        .set_self_type(UnitType::Marine.index());
    buf
}

fn resolve_text(text: &str) -> Result<Resolved, CompileError> {
    let tree = parse(&format!("C({text})")).unwrap();
    let SyntaxNode::Condition { call, span } = &tree.root else {
        unreachable!();
    };
    resolve(call, *span)
}

fn leaf(text: &str) -> Atomic {
    match resolve_text(text).unwrap() {
        Resolved::Leaf(atomic) => atomic,
        other => panic!("`{text}` resolved to {other:?}"),
    }
}

fn eval_in(env: &EnvInfo, buf: &ObservationBuf, text: &str) -> (Status, Action) {
    let ctx = Context::new(env, agent()).unwrap();
    let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();
    leaf(text).evaluate(&obs, &ctx)
}

fn eval(buf: &ObservationBuf, text: &str) -> (Status, Action) {
    eval_in(&env(), buf, text)
}

#[test]
fn attack_picks_target_by_qualifier() {
    let mut buf = observation();
    buf.set_row(1, 0.5, (0.4, 0.0), 0.0)
        .set_row(2, 0.9, (0.0, 0.3), 0.0);

    assert_eq!(eval(&buf, "attack closest"), (Status::Success, Action::attack(1).unwrap()));
    assert_eq!(eval(&buf, "attack furthest"), (Status::Success, Action::attack(0).unwrap()));
    assert_eq!(eval(&buf, "attack weakest"), (Status::Success, Action::attack(0).unwrap()));
    assert_eq!(eval(&buf, "attack strongest"), (Status::Success, Action::attack(1).unwrap()));
    assert_eq!(Action::attack(1).unwrap().code(), 6);
}

#[test]
fn attack_ignores_friends_and_dead_foes() {
    let mut buf = observation();
    buf.set_row(0, 1.0, (0.1, 0.0), 0.0)
        .set_row(3, 0.7, (0.2, 0.2), 0.0);
    assert_eq!(eval(&buf, "attack closest"), (Status::Success, Action::attack(2).unwrap()));

    buf.clear_row(3);
    assert_eq!(eval(&buf, "attack closest"), (Status::Failure, Action::STAND));
}

#[test]
fn attack_needs_reach_and_cooldown() {
    let mut buf = observation();
    // reach is 5 / 9
    buf.set_row(1, 0.5, (0.6, 0.0), 0.0);
    assert_eq!(eval(&buf, "attack closest"), (Status::Failure, Action::STAND));

    buf.set_row(1, 0.5, (0.5, 0.0), 0.0);
    assert_eq!(eval(&buf, "attack closest"), (Status::Success, Action::attack(0).unwrap()));

    buf.set_self(0.8, (0.5, 0.5), 0.25);
    assert_eq!(eval(&buf, "attack closest"), (Status::Failure, Action::STAND));
}

#[test]
fn attack_ties_go_to_lowest_slot() {
    let mut buf = observation();
    buf.set_row(1, 0.5, (0.3, 0.0), 0.0)
        .set_row(2, 0.5, (0.0, 0.3), 0.0)
        .set_row(3, 0.5, (-0.3, 0.0), 0.0);
    assert_eq!(eval(&buf, "attack closest"), (Status::Success, Action::attack(0).unwrap()));
    assert_eq!(eval(&buf, "attack weakest"), (Status::Success, Action::attack(0).unwrap()));
}

#[test]
fn attack_applies_unit_filter() {
    let mut buf = observation();
    buf.set_row(1, 0.5, (0.1, 0.0), 0.0)
        .set_row_type(1, UnitType::Zealot.index())
        .set_row(2, 0.5, (0.3, 0.0), 0.0)
        .set_row_type(2, UnitType::Marine.index());

    assert_eq!(eval(&buf, "attack closest marine"), (Status::Success, Action::attack(1).unwrap()));
    assert_eq!(eval(&buf, "attack closest any"), (Status::Success, Action::attack(0).unwrap()));
    assert_eq!(eval(&buf, "attack closest stalker"), (Status::Failure, Action::STAND));
}

#[test]
fn attack_named_slot() {
    let mut buf = observation();
    buf.set_row(2, 0.5, (0.3, 0.0), 0.0);
    assert_eq!(eval(&buf, "attack enemy_1"), (Status::Success, Action::attack(1).unwrap()));
    assert_eq!(eval(&buf, "attack enemy_0"), (Status::Failure, Action::STAND));
    assert_eq!(eval(&buf, "attack enemy_9"), (Status::Failure, Action::STAND));
    assert_eq!(eval(&buf, "attack enemy_4294967290"), (Status::Failure, Action::STAND));
}

#[test]
fn move_relative_buckets_by_diagonal_quadrant() {
    let mut buf = observation();
    buf.set_row(1, 0.5, (0.3, 0.1), 0.0);
    assert_eq!(eval(&buf, "move toward closest foe"), (Status::Success, Action::EAST));
    assert_eq!(eval(&buf, "move away_from closest foe"), (Status::Success, Action::WEST));

    buf.set_row(1, 0.5, (0.1, -0.3), 0.0);
    assert_eq!(eval(&buf, "move toward closest foe"), (Status::Success, Action::SOUTH));
    assert_eq!(eval(&buf, "move away_from closest foe"), (Status::Success, Action::NORTH));

    buf.set_row(0, 0.5, (-0.2, 0.1), 0.0);
    assert_eq!(eval(&buf, "move toward closest friend"), (Status::Success, Action::WEST));
}

#[test]
fn move_relative_without_target_fails() {
    let buf = observation();
    assert_eq!(eval(&buf, "move toward weakest friend"), (Status::Failure, Action::STAND));
    assert_eq!(eval(&buf, "move away_from closest foe marine"), (Status::Failure, Action::STAND));
}

#[test]
fn move_center_steps_back_along_the_longer_axis() {
    let mut buf = observation();
    buf.set_self(0.8, (0.9, 0.5), 0.0);
    assert_eq!(eval(&buf, "move center"), (Status::Success, Action::WEST));

    buf.set_self(0.8, (0.5, 0.1), 0.0);
    assert_eq!(eval(&buf, "move center"), (Status::Success, Action::NORTH));

    buf.set_self(0.8, (0.45, 0.9), 0.0);
    assert_eq!(eval(&buf, "move center"), (Status::Success, Action::SOUTH));

    // tie goes to x
    buf.set_self(0.8, (0.5, 0.5), 0.0);
    assert_eq!(eval(&buf, "move center"), (Status::Success, Action::EAST));
}

fn walled_env() -> EnvInfo {
    let mut terrain = Terrain::open(32, 32);
    terrain.set_blocked(16, 17, true);
    EnvInfo::new(ALLIES, ENEMIES, terrain)
}

#[test]
fn move_into_obstacle_fails_but_keeps_direction() {
    let env = walled_env();
    let mut buf = observation();
    buf.set_self(0.8, (16.5 / 32.0, 16.5 / 32.0), 0.0);

    assert_eq!(eval_in(&env, &buf, "move north"), (Status::Failure, Action::NORTH));
    assert_eq!(eval_in(&env, &buf, "move south"), (Status::Success, Action::SOUTH));
    assert_eq!(eval_in(&env, &buf, "move east"), (Status::Success, Action::EAST));

    assert_eq!(eval_in(&env, &buf, "has_obstacle north"), (Status::Success, Action::STAND));
    assert_eq!(eval_in(&env, &buf, "has_obstacle west"), (Status::Failure, Action::STAND));
}

#[test]
fn map_edge_blocks_movement() {
    let mut buf = observation();
    buf.set_self(0.8, (0.5, 31.5 / 32.0), 0.0);
    assert_eq!(eval(&buf, "move north"), (Status::Failure, Action::NORTH));
    assert_eq!(eval(&buf, "move south"), (Status::Success, Action::SOUTH));
}

#[test]
fn stand_always_succeeds() {
    assert_eq!(eval(&observation(), "stand"), (Status::Success, Action::STAND));
}

#[test]
fn is_dying_compares_health_to_level() {
    let mut buf = observation();
    buf.set_self(0.2, (0.5, 0.5), 0.0);
    assert_eq!(eval(&buf, "is_dying self \"low\"").0, Status::Success);
    assert_eq!(eval(&buf, "is_dying self low").0, Status::Success);

    buf.set_self(0.3, (0.5, 0.5), 0.0);
    assert_eq!(eval(&buf, "is_dying self low").0, Status::Failure);
    assert_eq!(eval(&buf, "is_dying self middle").0, Status::Success);

    // dead foes do not count as dying
    assert_eq!(eval(&buf, "is_dying foe high").0, Status::Failure);
    buf.set_row(2, 0.6, (0.2, 0.2), 0.0);
    assert_eq!(eval(&buf, "is_dying foe high").0, Status::Success);
    assert_eq!(eval(&buf, "is_dying foe middle").0, Status::Failure);
}

#[test]
fn is_armed_reads_cooldowns() {
    let mut buf = observation();
    assert_eq!(eval(&buf, "is_armed self").0, Status::Success);
    // vacuously armed with nobody in sight
    assert_eq!(eval(&buf, "is_armed foe").0, Status::Success);

    buf.set_row(1, 0.5, (0.2, 0.2), 0.0)
        .set_row(3, 0.5, (0.2, 0.2), 0.4);
    assert_eq!(eval(&buf, "is_armed foe").0, Status::Failure);

    buf.set_self(0.8, (0.5, 0.5), 0.1);
    assert_eq!(eval(&buf, "is_armed self").0, Status::Failure);
}

#[test]
fn in_region_splits_map_in_thirds() {
    let mut buf = observation();
    buf.set_self(0.8, (0.9, 0.9), 0.0);
    assert_eq!(eval(&buf, "in_region north east").0, Status::Success);
    assert_eq!(eval(&buf, "in_region north").0, Status::Failure);
    assert_eq!(eval(&buf, "in_region center").0, Status::Failure);

    buf.set_self(0.8, (0.5, 0.9), 0.0);
    assert_eq!(eval(&buf, "in_region north").0, Status::Success);

    buf.set_self(0.8, (0.1, 0.5), 0.0);
    assert_eq!(eval(&buf, "in_region west west").0, Status::Success);

    buf.set_self(0.8, (0.5, 0.5), 0.0);
    assert_eq!(eval(&buf, "in_region center").0, Status::Success);
}

#[test]
fn in_sight_and_in_reach() {
    let mut buf = observation();
    assert_eq!(eval(&buf, "in_sight foe").0, Status::Failure);

    buf.set_row(2, 0.5, (0.8, 0.0), 0.0)
        .set_row_type(2, UnitType::Stalker.index());
    assert_eq!(eval(&buf, "in_sight foe").0, Status::Success);
    assert_eq!(eval(&buf, "in_sight foe stalker").0, Status::Success);
    assert_eq!(eval(&buf, "in_sight foe zergling").0, Status::Failure);
    assert_eq!(eval(&buf, "in_sight friend").0, Status::Failure);
    assert_eq!(eval(&buf, "in_reach foe").0, Status::Failure);

    buf.set_row(2, 0.5, (0.3, 0.0), 0.0);
    assert_eq!(eval(&buf, "in_reach foe").0, Status::Success);
    assert_eq!(eval(&buf, "in_reach foe any").0, Status::Success);
}

#[test]
fn is_type_reads_own_one_hot() {
    let buf = observation();
    assert_eq!(eval(&buf, "is_type a marine").0, Status::Success);
    assert_eq!(eval(&buf, "is_type not_a marine").0, Status::Failure);
    assert_eq!(eval(&buf, "is_type a hydralisk").0, Status::Failure);
    assert_eq!(eval(&buf, "is_type not_a hydralisk").0, Status::Success);
}

#[test]
fn is_flock_center_needs_all_four_quadrants() {
    let env = EnvInfo::new(5, 1, Terrain::open(32, 32));
    let mut buf = ObservationBuf::new(ObservationLayout::smax(5, 1));
    buf.set_self(1.0, (0.5, 0.5), 0.0)
        .set_row(0, 1.0, (0.0, 0.5), 0.0)
        .set_row(1, 1.0, (0.5, 0.0), 0.0)
        .set_row(2, 1.0, (0.0, -0.5), 0.0)
        .set_row(3, 1.0, (-0.5, 0.0), 0.0);
    assert_eq!(eval_in(&env, &buf, "is_flock friend center").0, Status::Success);
    assert_eq!(eval_in(&env, &buf, "is_flock foe center").0, Status::Failure);

    buf.clear_row(3);
    assert_eq!(eval_in(&env, &buf, "is_flock friend center").0, Status::Failure);
}

#[test]
fn is_flock_direction_uses_mean_offset() {
    let env = EnvInfo::new(5, 1, Terrain::open(32, 32));
    let mut buf = ObservationBuf::new(ObservationLayout::smax(5, 1));
    buf.set_self(1.0, (0.5, 0.5), 0.0)
        .set_row(0, 1.0, (0.0, 0.5), 0.0)
        .set_row(1, 1.0, (0.2, 0.1), 0.0);
    assert_eq!(eval_in(&env, &buf, "is_flock friend north").0, Status::Success);
    assert_eq!(eval_in(&env, &buf, "is_flock friend east").0, Status::Failure);
    assert_eq!(eval_in(&env, &buf, "is_flock foe north").0, Status::Failure);
}

#[test]
fn explore_is_running_and_deterministic() {
    let env = env();
    let buf = observation();
    let base = Context::new(&env, agent()).unwrap();
    let explore = leaf("explore");

    let mut seen = std::collections::BTreeSet::new();
    for tick in 0..64 {
        let ctx = base.at_tick(tick, 7);
        let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();
        let (status, action) = explore.evaluate(&obs, &ctx);
        assert_eq!(status, Status::Running);
        assert!(action.code() <= Action::STAND.code());
        assert_eq!(explore.evaluate(&obs, &ctx), (status, action));
        seen.insert(action.code());
    }
    assert!(seen.len() > 1);
}
