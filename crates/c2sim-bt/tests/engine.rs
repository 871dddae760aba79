use c2sim_bt::{compile_str, tick, tick_exhaustive, tick_traced, Decision, NodeId};
use c2sim_core::{
    Action, AgentInfo, Context, EnvInfo, ObservationBuf, ObservationLayout, Side, Status, Terrain,
};
use c2sim_tools::{TraceEvent, TraceKind, TraceLog};

fn agent() -> AgentInfo {
    AgentInfo {
        agent_id: 1,
        side: Side::Ally,
        velocity: 3.15,
        sight_range: 9.0,
        attack_range: 5.0,
    }
}

fn env() -> EnvInfo {
    EnvInfo::new(2, 3, Terrain::open(32, 32))
}

fn observation() -> ObservationBuf {
    let mut buf = ObservationBuf::new(ObservationLayout::smax(2, 3));
    buf.set_self(0.8, (0.5, 0.5), 0.0);
    buf
}

/// Scalar result, checked against the exhaustive engine.
fn run_in(env: &EnvInfo, buf: &ObservationBuf, program: &str) -> Decision {
    let graph = compile_str(program).unwrap();
    let ctx = Context::new(env, agent()).unwrap();
    let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();
    let decision = tick(&graph, &obs, &ctx);
    assert_eq!(tick_exhaustive(&graph, &obs, &ctx), decision, "{program}");
    decision
}

fn run(buf: &ObservationBuf, program: &str) -> Decision {
    run_in(&env(), buf, program)
}

const ATTACK_OR_STAND: &str = "F(A(attack closest) :: A(stand))";

#[test]
fn attacks_foe_in_range() {
    let mut buf = observation();
    buf.set_row(2, 0.6, (0.2, 0.1), 0.0);

    let decision = run(&buf, ATTACK_OR_STAND);
    assert_eq!(decision.status, Status::Success);
    assert_eq!(decision.action, Action::attack(1).unwrap());
    assert_eq!(decision.node, NodeId(1));
}

#[test]
fn stands_when_nobody_is_in_range() {
    let mut buf = observation();
    buf.set_row(2, 0.6, (0.9, 0.1), 0.0);

    let decision = run(&buf, ATTACK_OR_STAND);
    assert_eq!(
        decision,
        Decision::new(Status::Success, Action::STAND, NodeId(2))
    );
}

#[test]
fn blocked_move_reports_direction() {
    let mut terrain = Terrain::open(32, 32);
    terrain.set_blocked(16, 17, true);
    let env = EnvInfo::new(2, 3, terrain);
    let mut buf = observation();
    buf.set_self(0.8, (16.5 / 32.0, 16.5 / 32.0), 0.0);

    let decision = run_in(&env, &buf, "A(move north)");
    assert_eq!(decision.status, Status::Failure);
    assert_eq!(decision.action, Action::NORTH);
}

#[test]
fn dying_below_low_threshold() {
    let mut buf = observation();
    buf.set_self(0.2, (0.5, 0.5), 0.0);
    assert_eq!(run(&buf, "C(is_dying self \"low\")").status, Status::Success);
}

#[test]
fn sequence_carries_last_action_when_all_succeed() {
    let mut buf = observation();
    buf.set_row(1, 0.6, (0.1, 0.1), 0.0);

    let decision = run(&buf, "S(C(in_sight foe) :: A(attack closest))");
    assert_eq!(
        decision,
        Decision::new(Status::Success, Action::attack(0).unwrap(), NodeId(2))
    );
}

#[test]
fn sequence_stops_at_first_non_success() {
    let buf = observation();
    let decision = run(&buf, "S(A(stand) :: C(in_sight foe) :: A(move north))");
    assert_eq!(
        decision,
        Decision::new(Status::Failure, Action::STAND, NodeId(2))
    );

    let decision = run(&buf, "S(A(explore) :: A(stand))");
    assert_eq!(decision.status, Status::Running);
    assert_eq!(decision.node, NodeId(1));
}

#[test]
fn fallback_stops_at_running() {
    let buf = observation();
    let decision = run(&buf, "F(C(in_sight friend) :: A(explore) :: A(stand))");
    assert_eq!(decision.status, Status::Running);
    assert_eq!(decision.node, NodeId(2));
}

#[test]
fn empty_composites() {
    let buf = observation();
    assert_eq!(
        run(&buf, "S()"),
        Decision::new(Status::Success, Action::STAND, NodeId(0))
    );
    assert_eq!(
        run(&buf, "F()"),
        Decision::new(Status::Failure, Action::STAND, NodeId(0))
    );
    assert_eq!(
        run(&buf, "F(C(in_sight foe) :: C(in_sight friend))"),
        Decision::new(Status::Failure, Action::STAND, NodeId(0))
    );
}

#[test]
fn decorators_rewrite_child_status() {
    let buf = observation();
    assert_eq!(
        run(&buf, "D(invert C(in_sight foe))"),
        Decision::new(Status::Success, Action::STAND, NodeId(0))
    );
    assert_eq!(
        run(&buf, "D(force_failure A(move east))"),
        Decision::new(Status::Failure, Action::EAST, NodeId(0))
    );
    assert_eq!(
        run(&buf, "F(D(force_success C(in_sight foe)) :: A(move west))"),
        Decision::new(Status::Success, Action::STAND, NodeId(1))
    );
}

#[test]
fn repeated_ticks_are_identical() {
    let env = env();
    let mut buf = observation();
    buf.set_row(3, 0.4, (0.3, -0.2), 0.0);
    let graph = compile_str("F(S(C(is_armed self) :: A(attack weakest)) :: A(explore))").unwrap();
    let ctx = Context::new(&env, agent()).unwrap().at_tick(12, 99);
    let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();

    let first = tick(&graph, &obs, &ctx);
    for _ in 0..8 {
        assert_eq!(tick(&graph, &obs, &ctx), first);
    }
}

#[test]
fn traced_tick_reports_evaluated_leaves_and_deciding_node() {
    let env = env();
    let graph = compile_str(ATTACK_OR_STAND).unwrap();
    let ctx = Context::new(&env, agent()).unwrap().at_tick(7, 0);

    let buf = observation();
    let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();
    let mut log = TraceLog::default();
    let decision = tick_traced(&graph, &obs, &ctx, &mut log);
    assert_eq!(decision, tick(&graph, &obs, &ctx));

    let leaves: Vec<(u32, u32)> = log.of_kind(TraceKind::Leaf).map(|e| (e.node, e.value)).collect();
    assert_eq!(leaves, [(1, 4), (2, 4)]);
    assert_eq!(log.fired().collect::<Vec<_>>(), [(7, 2)]);
    assert!(log.events.iter().all(|e| e.tick == 7));

    // short-circuit: the stand leaf is never reached
    let mut buf = observation();
    buf.set_row(1, 0.6, (0.2, 0.0), 0.0);
    let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();
    let mut events: Vec<TraceEvent> = Vec::new();
    tick_traced(&graph, &obs, &ctx, &mut events);
    let log = TraceLog::from(events);
    assert_eq!(log.of_kind(TraceKind::Leaf).count(), 1);
    assert_eq!(
        log.of_kind(TraceKind::Fired).map(|e| e.value).collect::<Vec<_>>(),
        [5]
    );
}

#[test]
fn traced_decorator_reports_rewritten_status() {
    let env = env();
    let graph = compile_str("D(invert C(in_sight foe))").unwrap();
    let ctx = Context::new(&env, agent()).unwrap();
    let buf = observation();
    let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();

    let mut log = TraceLog::default();
    tick_traced(&graph, &obs, &ctx, &mut log);
    let rewrites: Vec<(u32, u32)> = log
        .of_kind(TraceKind::Decorator)
        .map(|e| (e.node, e.value))
        .collect();
    // status code 0 = success
    assert_eq!(rewrites, [(0, 0)]);
}

#[test]
#[should_panic(expected = "observation splits its rows into 1 friends and 3 foes")]
fn view_observed_under_other_team_sizes_is_refused() {
    let graph = compile_str(ATTACK_OR_STAND).unwrap();
    let buf = observation();
    let env = env();
    let observed_by = Context::new(&env, agent()).unwrap();
    let obs = observed_by.observe(buf.as_slice(), buf.layout()).unwrap();

    // Same row count, split the other way round.
    let swapped = EnvInfo::new(3, 2, Terrain::open(32, 32));
    let ctx = Context::new(&swapped, agent()).unwrap();
    tick(&graph, &obs, &ctx);
}
