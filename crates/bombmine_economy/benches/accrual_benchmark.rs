//! Benchmark for the accrual hot path and whole-action cost.
//!
//! Run with: cargo bench --package bombmine_economy --bench accrual_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bombmine_chain::{Address, MemoryLedger, U256};
use bombmine_economy::{
    AccrualEngine, BombGame, Call, FacilitySpec, GameConfig, HeroSpec, STARTER_FACILITY_PRICE,
};

const T0: u64 = 1_700_000_000;

fn player(i: u32) -> Address {
    let mut bytes = [0u8; 20];
    bytes[16..].copy_from_slice(&(i + 1).to_be_bytes());
    Address::from(bytes)
}

fn benchmark_checkpoint(c: &mut Criterion) {
    let mut engine = AccrualEngine::new();
    for i in 0..10_000 {
        engine.checkpoint(player(i), 100, T0).unwrap();
    }

    c.bench_function("checkpoint_10k_players", |b| {
        let mut i = 0u32;
        let mut now = T0;
        b.iter(|| {
            i = (i + 1) % 10_000;
            now += 1;
            black_box(engine.checkpoint(player(i), 120, now))
        });
    });
}

fn benchmark_pending(c: &mut Criterion) {
    let mut engine = AccrualEngine::new();
    for i in 0..10_000 {
        engine.checkpoint(player(i), 100, T0).unwrap();
    }

    c.bench_function("pending_rewards_projection", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = (i + 1) % 10_000;
            black_box(engine.pending(player(i), T0 + 3600))
        });
    });
}

/// A game with one player owning 16 miners on a 5x4 grid.
fn populated_game() -> (BombGame<MemoryLedger>, Address) {
    let admin = Address::repeat_byte(0xAD);
    let mut config = GameConfig::new(admin, Address::repeat_byte(0x99))
        .with_treasury(Address::repeat_byte(0x7E))
        .with_bombcoin(Address::repeat_byte(0xBC));
    config.starter_facility = FacilitySpec {
        grid_width: 5,
        max_miners: 16,
        ..FacilitySpec::default()
    };
    config.heroes.push(HeroSpec {
        power_per_second: 120,
        tier: 2,
        cost: U256::ZERO,
        in_production: true,
    });

    let mut ledger = MemoryLedger::new();
    let owner = player(0);
    ledger.fund_native(owner, STARTER_FACILITY_PRICE).unwrap();

    let mut game = BombGame::new(&config, ledger).unwrap();
    game.purchase_initial_facility(
        Call::new(owner, T0).with_value(STARTER_FACILITY_PRICE),
        Address::ZERO,
    )
    .unwrap();
    for x in 0..4 {
        for y in 0..4 {
            game.buy_hero(Call::new(owner, T0), 2, x, y).unwrap();
        }
    }
    game.take_events();
    (game, owner)
}

fn benchmark_relocate_action(c: &mut Criterion) {
    let (mut game, owner) = populated_game();
    let first = game.get_player_heroes_paginated(owner, 0, 1)[0].id;

    c.bench_function("relocate_miner_full_transaction", |b| {
        let mut now = T0;
        let mut flip = false;
        b.iter(|| {
            now += 1;
            flip = !flip;
            // Column 4 is the free one
            let x = if flip { 4 } else { 0 };
            let result = black_box(game.relocate_miner(Call::new(owner, now), first, x, 0));
            game.take_events();
            result
        });
    });
}

fn benchmark_claim_action(c: &mut Criterion) {
    let (mut game, owner) = populated_game();

    c.bench_function("claim_rewards_full_transaction", |b| {
        let mut now = T0;
        b.iter(|| {
            now += 60;
            let result = black_box(game.claim_rewards(Call::new(owner, now)));
            game.take_events();
            result
        });
    });
}

criterion_group!(
    benches,
    benchmark_checkpoint,
    benchmark_pending,
    benchmark_relocate_action,
    benchmark_claim_action,
);
criterion_main!(benches);
