use hanabi_bot::bot::{choose_move, estimate_moves};
use hanabi_bot::{BayesianPlayer, BotParams};
use hanabi_core::game::{Game, Player, PrivateView, Table};
use hanabi_core::model::card::CardFace;
use hanabi_core::model::color::Color;
use hanabi_core::model::deck::Deck;
use hanabi_core::model::moves::Move;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

use Color::{Blue, Green, Red, White, Yellow};

fn scripted_game(players: usize) -> Game {
    let prefix = [
        (Red, 1), (Green, 3), (Blue, 1), (Blue, 2), (Yellow, 1),
        (Yellow, 5), (Yellow, 2), (Red, 4), (White, 4), (Red, 5),
        (Green, 1), (Red, 1), (White, 2), (White, 5), (Blue, 3),
        (White, 1),
    ]
    .map(|(color, number)| CardFace::new(color, number));
    Game::new(players, Deck::stacked(&prefix).unwrap()).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn depth_zero_evaluation_follows_the_game() {
    let mut game = scripted_game(3);
    let params = BotParams {
        lives_weight: 1.0,
        tokens_weight: 0.5,
        ..BotParams::default()
    };
    let mut agent = BayesianPlayer::attached(&PrivateView::new(0, &game), params);
    let value = |agent: &BayesianPlayer, game: &Game| agent.evaluate(&PrivateView::new(0, game));

    assert_close(value(&agent, &game), 7.0);
    // seat 0 tells seat 2 about their two ones
    game.tell_number(2, 1, &mut agent).unwrap();
    assert_close(value(&agent, &game), 6.5);
    game.tell_color(0, Blue, &mut agent).unwrap();
    assert_close(value(&agent, &game), 6.0);
    // seat 2 plays its red one
    assert!(game.play_card(1, &mut agent).unwrap());
    assert_close(value(&agent, &game), 7.0);
    // seat 0 plays another red one, which has nowhere to go
    assert!(!game.play_card(0, &mut agent).unwrap());
    assert_close(value(&agent, &game), 6.0);
    // seat 1 throws away the only yellow five
    game.discard(0, &mut agent).unwrap();
    assert!(value(&agent, &game) < 0.0);
}

#[test]
fn a_fully_known_playable_card_gets_played() {
    let mut game = scripted_game(2);
    let params = BotParams {
        tokens_weight: 0.5,
        samples: 20,
        ..BotParams::default()
    };
    let mut agent = BayesianPlayer::attached(&PrivateView::new(0, &game), params);

    game.tell_color(1, Yellow, &mut agent).unwrap();
    game.tell_color(0, Red, &mut agent).unwrap();
    game.tell_number(1, 4, &mut agent).unwrap();
    game.tell_number(0, 1, &mut agent).unwrap();

    // slot 0 can only be the red one
    let slot0 = &agent.hand_trackers()[0];
    assert_eq!(slot0.iter().count(), 1);
    assert_eq!(slot0.get(CardFace::new(Red, 1)), 3);

    let mut view = PrivateView::new(0, &mut game);
    let chosen = agent.take_turn(&mut view).unwrap();
    assert_eq!(chosen, Move::Play { slot: 0 });
}

#[test]
fn estimates_cover_every_move_in_enumeration_order() {
    let game = scripted_game(2);
    let view = PrivateView::new(0, &game);
    let agent = BayesianPlayer::attached(&view, BotParams::default().with_samples(5));
    let beliefs = agent.beliefs().unwrap();
    let mut rng = StdRng::seed_from_u64(123);

    let estimates = estimate_moves(&view, beliefs, agent.params(), &mut rng);
    let moves: Vec<Move> = estimates.iter().map(|estimate| estimate.mv).collect();
    assert_eq!(moves, view.available_moves());
    assert!(estimates.iter().all(|estimate| estimate.evaluated == 5));

    // giving a hint always costs exactly one token and nothing else
    let hint = estimates.iter().find(|estimate| estimate.mv.is_tell()).unwrap();
    assert_close(hint.expected, 3.0 + 7.0);
}

#[test]
fn choice_is_reproducible_for_a_seed() {
    let game = Game::new(3, Deck::shuffled_with_seed(99)).unwrap();
    let view = PrivateView::new(0, &game);
    let agent = BayesianPlayer::attached(&view, BotParams::default().with_samples(10));
    let beliefs = agent.beliefs().unwrap();

    let first = choose_move(&view, beliefs, agent.params(), &mut StdRng::seed_from_u64(5)).unwrap();
    let second = choose_move(&view, beliefs, agent.params(), &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn bots_finish_a_game_at_the_table() {
    for players in [2, 4] {
        let game = Game::new(players, Deck::shuffled_with_seed(2024)).unwrap();
        let mut table = Table::new(game);
        for seat in 0..players {
            let params = BotParams::default().with_samples(8).with_seed(seat as u64);
            table
                .register(Box::new(BayesianPlayer::new(seat, params)))
                .unwrap();
        }

        let summary = table.run(Some(400), VecDeque::new()).unwrap();
        assert!(summary.outcome.is_some(), "{players}-player game did not end");
        assert!(summary.score <= 25);
        assert_eq!(summary.score, table.score());
    }
}
