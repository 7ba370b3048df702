use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rl::{ReinforceAgent, TrainerConfig};

fn filled_agent(config: &TrainerConfig) -> ReinforceAgent {
    let mut agent = ReinforceAgent::new(config.clone()).expect("valid config");
    let mut rng = ml::seeded(9);
    let mut state = vec![0.0f32; config.state_size];
    while !agent.should_train() {
        state.iter_mut().for_each(|x| *x = rng.f32() * 2.0 - 1.0);
        let sample = agent.act(&state).expect("act");
        let reward = if sample.action == 0 { 1.0 } else { 0.0 };
        agent
            .observe(&state, sample.action, reward, rng.bool(), sample.log_prob)
            .expect("observe");
    }
    agent
}

fn bench_train_step(c: &mut Criterion) {
    let config = TrainerConfig::default();
    c.bench_function("reinforce_train_128x16x64x6", |b| {
        b.iter_batched(|| filled_agent(&config), |mut agent| agent.train(), BatchSize::SmallInput);
    });
}

fn bench_act(c: &mut Criterion) {
    let config = TrainerConfig::default();
    let mut agent = ReinforceAgent::new(config.clone()).expect("valid config");
    let state = vec![0.5f32; config.state_size];
    c.bench_function("reinforce_act_16x64x6", |b| b.iter(|| agent.act(&state).expect("act")));
}

criterion_group!(benches, bench_train_step, bench_act);
criterion_main!(benches);
