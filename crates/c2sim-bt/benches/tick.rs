use c2sim_bt::{compile_str, tick, tick_exhaustive, BatchMember, TreeBank};
use c2sim_core::{AgentInfo, Context, EnvInfo, ObservationBuf, ObservationLayout, Side, Terrain};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const PROGRAM: &str = "F(S(C(is_dying self low) :: A(move away_from closest foe)) :: \
                       S(C(in_reach foe) :: A(attack weakest)) :: \
                       S(C(in_sight foe) :: A(move toward closest foe)) :: A(move center))";

fn agent(agent_id: u64) -> AgentInfo {
    AgentInfo {
        agent_id,
        side: Side::Ally,
        velocity: 3.15,
        sight_range: 9.0,
        attack_range: 5.0,
    }
}

fn observation(allies: usize, enemies: usize) -> ObservationBuf {
    let mut buf = ObservationBuf::new(ObservationLayout::smax(allies, enemies));
    buf.set_self(0.9, (0.3, 0.7), 0.0);
    for i in 0..(allies + enemies - 1) {
        let t = i as f32 / 10.0;
        buf.set_row(i, 0.5 + t / 4.0, (0.8 - t, t - 0.4), 0.0);
    }
    buf
}

fn bench_scalar(c: &mut Criterion) {
    let env = EnvInfo::new(10, 10, Terrain::open(32, 32));
    let buf = observation(10, 10);
    let graph = compile_str(PROGRAM).unwrap();
    let ctx = Context::new(&env, agent(0)).unwrap();
    let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();

    c.bench_function("c2sim-bt/tick(agents=20)", |b| {
        b.iter(|| black_box(tick(&graph, &obs, &ctx)))
    });
    c.bench_function("c2sim-bt/tick_exhaustive(agents=20)", |b| {
        b.iter(|| black_box(tick_exhaustive(&graph, &obs, &ctx)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let env = EnvInfo::new(10, 10, Terrain::open(32, 32));
    let buf = observation(10, 10);
    let mut bank = TreeBank::new();
    for (i, program) in [PROGRAM, "F(A(attack closest) :: A(stand))", "A(explore)", "A(move center)"]
        .iter()
        .enumerate()
    {
        bank.push(format!("tree_{i}"), compile_str(program).unwrap());
    }

    let members: Vec<BatchMember<'_>> = (0..256)
        .map(|i| {
            let ctx = Context::new(&env, agent(i)).unwrap();
            let obs = ctx.observe(buf.as_slice(), buf.layout()).unwrap();
            BatchMember {
                index: i as usize % bank.len(),
                obs,
                ctx,
            }
        })
        .collect();

    c.bench_function("c2sim-bt/tick_batch(members=256,trees=4)", |b| {
        b.iter(|| black_box(bank.tick_batch(&members).unwrap()))
    });
}

criterion_group!(benches, bench_scalar, bench_batch);
criterion_main!(benches);
