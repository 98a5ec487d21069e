use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use snakeboard::score::high_score_key;
use snakeboard::{
    Coordinates, GameDifficulty, GameState, Geometry, HighScoreStore, MemoryStore, OverReason,
    ScoreTracker, Session, SnakeDirection, StepOutcome,
};

fn body(session: &Session) -> Vec<Coordinates> {
    session.snake().iter().copied().collect()
}

#[test]
fn wrap_mode_moves_and_wraps() {
    let mut rng = StdRng::seed_from_u64(1);
    let grid = Geometry::new(20, 10, 10);

    let mut session = Session::from_parts(
        grid,
        vec![Coordinates::new(5, 5)],
        SnakeDirection::Right,
        Coordinates::new(0, 0),
        [],
        false,
    );
    session.step(&mut rng);
    assert_eq!(body(&session), vec![Coordinates::new(6, 5)]);

    let mut session = Session::from_parts(
        grid,
        vec![Coordinates::new(9, 5)],
        SnakeDirection::Right,
        Coordinates::new(0, 0),
        [],
        false,
    );
    assert_eq!(session.step(&mut rng), StepOutcome::Moved);
    assert_eq!(body(&session), vec![Coordinates::new(0, 5)]);
    assert_eq!(session.state(), GameState::Running);
}

#[test]
fn bounded_mode_wall_hit() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = Session::from_parts(
        Geometry::new(20, 10, 10),
        vec![Coordinates::new(0, 5)],
        SnakeDirection::Left,
        Coordinates::new(3, 3),
        [],
        true,
    );
    assert_eq!(session.step(&mut rng), StepOutcome::GameOver(OverReason::Wall));
    assert_eq!(session.state(), GameState::Over(OverReason::Wall));
    assert_eq!(body(&session), vec![Coordinates::new(0, 5)]);
}

#[test]
fn food_consumption_grows_and_replaces_food() {
    let obstacles = [Coordinates::new(7, 5), Coordinates::new(2, 2)];
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Session::from_parts(
            Geometry::new(20, 10, 10),
            vec![Coordinates::new(5, 5)],
            SnakeDirection::Right,
            Coordinates::new(6, 5),
            obstacles,
            false,
        );
        assert_eq!(session.step(&mut rng), StepOutcome::Ate);
        assert_eq!(
            body(&session),
            vec![Coordinates::new(6, 5), Coordinates::new(5, 5)]
        );
        assert_eq!(session.score(), 1);

        let mut taken: HashSet<Coordinates> = obstacles.into_iter().collect();
        taken.extend(body(&session));
        assert!(!taken.contains(&session.food()));
    }
}

#[test]
fn repeated_steps_after_game_over_change_nothing() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = Session::from_parts(
        Geometry::new(20, 10, 10),
        vec![Coordinates::new(4, 4), Coordinates::new(3, 4)],
        SnakeDirection::Right,
        Coordinates::new(0, 0),
        [Coordinates::new(5, 4)],
        false,
    );
    let outcomes: Vec<_> = (0..4).map(|_| session.step(&mut rng)).collect();
    assert_eq!(
        outcomes,
        vec![
            StepOutcome::GameOver(OverReason::Obstacle),
            StepOutcome::Idle,
            StepOutcome::Idle,
            StepOutcome::Idle,
        ]
    );
    assert_eq!(
        body(&session),
        vec![Coordinates::new(4, 4), Coordinates::new(3, 4)]
    );
    assert_eq!(session.score(), 0);
}

#[test]
fn high_score_update() {
    let mut store = MemoryStore::new();
    let key = high_score_key(2, GameDifficulty::Hard);
    store.set(&key, 7).unwrap();

    let mut tracker = ScoreTracker::load(&store, 2, GameDifficulty::Hard);
    let report = tracker.on_game_over(&mut store, 10).unwrap();

    assert_eq!(store.get(&key), Some(10));
    assert!(report.is_new_record);
    assert_eq!(report.final_score, 10);
    assert_eq!(report.previous_best, 7);
}
