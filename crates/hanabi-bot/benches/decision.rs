use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hanabi_bot::{BayesianPlayer, BotParams};
use hanabi_core::game::{Game, Player, PrivateView, Silent};
use hanabi_core::model::deck::Deck;

fn bench_bayesian_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("bayesian_decision");

    let cases: &[(u64, usize, usize)] = &[(42, 2, 0), (12345, 3, 6), (8675309, 5, 12)];

    for (seed, players, warmup_turns) in cases.iter().copied() {
        group.bench_function(
            format!("decide_seed{seed}_players{players}_turn{warmup_turns}"),
            |b| {
                b.iter_batched(
                    || {
                        let mut game = Game::new(players, Deck::shuffled_with_seed(seed)).unwrap();
                        for _ in 0..warmup_turns {
                            if game.discard(0, &mut Silent).is_err() {
                                break;
                            }
                        }
                        let seat = game.current_player();
                        let player = BayesianPlayer::attached(
                            &PrivateView::new(seat, &game),
                            BotParams::default().with_seed(seed),
                        );
                        (game, player)
                    },
                    |(mut game, mut player)| {
                        let seat = player.seat();
                        let mut view = PrivateView::new(seat, &mut game);
                        let _ = player.take_turn(&mut view);
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_bayesian_decision);
criterion_main!(benches);
