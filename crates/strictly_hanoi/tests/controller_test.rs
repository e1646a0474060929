//! Tests for the game state machine.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use strictly_hanoi::invariants::{InvariantSet, TowerInvariants};
use strictly_hanoi::{
    DiskCount, GameController, GameEvent, GamePhase, HighScoreRecord, HighScoreStore,
    MemoryHighScores, Peg, SolutionMoves, TowerState, legal_moves,
};
use tokio::sync::mpsc;

const OPTIMAL_THREE: [(usize, usize); 7] = [(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)];

/// The optimal sequence with the first move split in two: 8 moves.
const EIGHT_MOVES: [(usize, usize); 8] = [
    (0, 1),
    (1, 2),
    (0, 1),
    (2, 1),
    (0, 2),
    (1, 0),
    (1, 2),
    (0, 2),
];

fn three() -> DiskCount {
    DiskCount::new(3).expect("valid disk count")
}

fn peg(index: usize) -> Peg {
    Peg::from_index(index).expect("valid peg")
}

fn play(game: &mut GameController, moves: &[(usize, usize)]) {
    for &(from, to) in moves {
        assert!(game.request_move(peg(from), peg(to)), "{from} -> {to} rejected");
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_three_disk_game_end_to_end() {
    let store = MemoryHighScores::new();
    let mut game = GameController::new(Box::new(store.clone()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    game.add_observer(Box::new(tx));

    assert!(game.start(three()));
    assert_eq!(game.tower().to_sizes(), [vec![3, 2, 1], vec![], vec![]]);

    play(&mut game, &OPTIMAL_THREE);

    assert_eq!(game.tower().to_sizes(), [vec![], vec![], vec![3, 2, 1]]);
    assert_eq!(game.move_count(), 7);
    assert_eq!(game.move_count(), game.min_moves());
    assert_eq!(game.phase(), GamePhase::Completed);

    let events = drain(&mut rx);
    assert_eq!(events[0], GameEvent::GameStarted { disk_count: three() });
    let applied = events
        .iter()
        .filter(|e| matches!(e, GameEvent::MoveApplied { .. }))
        .count();
    assert_eq!(applied, 7);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::GameCompleted {
            moves: 7,
            min_moves: 7,
            score: 1000,
            ..
        }
    )));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::NewHighScore { .. }))
    );
    assert_eq!(
        store.load_best(three()).expect("load").map(|r| r.moves()),
        Some(7)
    );
}

#[test]
fn test_completed_is_terminal_until_reset() {
    let mut game = GameController::new(Box::new(MemoryHighScores::new()));
    game.start(three());
    play(&mut game, &OPTIMAL_THREE);

    assert!(!game.request_move(Peg::Right, Peg::Left));
    assert!(!game.start(three()));
    assert!(!game.pause());

    game.reset();
    assert_eq!(game.phase(), GamePhase::Idle);
    assert!(game.start(three()));
}

#[tokio::test(start_paused = true)]
async fn test_high_score_keeps_fewer_moves() {
    let store = MemoryHighScores::new();
    let mut game = GameController::new(Box::new(store.clone()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    game.add_observer(Box::new(tx));

    game.start(three());
    tokio::time::advance(Duration::from_secs(45)).await;
    play(&mut game, &OPTIMAL_THREE);
    assert_eq!(
        store.load_best(three()).expect("load"),
        Some(HighScoreRecord::new(7, 45))
    );
    drain(&mut rx);

    game.reset();
    game.start(three());
    tokio::time::advance(Duration::from_secs(30)).await;
    play(&mut game, &EIGHT_MOVES);
    assert_eq!(game.phase(), GamePhase::Completed);

    assert_eq!(
        store.load_best(three()).expect("load"),
        Some(HighScoreRecord::new(7, 45))
    );
    let events = drain(&mut rx);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, GameEvent::NewHighScore { .. }))
    );
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::GameCompleted {
            moves: 8,
            score: 990,
            ..
        }
    )));
}

#[tokio::test(start_paused = true)]
async fn test_faster_equal_moves_replaces_record() {
    let store = MemoryHighScores::new();
    store
        .save_best(three(), HighScoreRecord::new(7, 45))
        .expect("save");
    let mut game = GameController::new(Box::new(store.clone()));

    game.start(three());
    tokio::time::advance(Duration::from_secs(20)).await;
    play(&mut game, &OPTIMAL_THREE);

    assert_eq!(
        game.best_record(three()),
        Some(HighScoreRecord::new(7, 20))
    );
}

#[tokio::test(start_paused = true)]
async fn test_paused_time_not_scored() {
    let mut game = GameController::new(Box::new(MemoryHighScores::new()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    game.add_observer(Box::new(tx));

    game.start(three());
    tokio::time::advance(Duration::from_secs(20)).await;
    assert!(game.pause());
    tokio::time::advance(Duration::from_secs(600)).await;
    assert!(game.resume());
    tokio::time::advance(Duration::from_secs(50)).await;
    play(&mut game, &OPTIMAL_THREE);

    let completed = drain(&mut rx)
        .into_iter()
        .find_map(|e| match e {
            GameEvent::GameCompleted { elapsed, score, .. } => Some((elapsed, score)),
            _ => None,
        })
        .expect("completion event");
    assert_eq!(completed, (Duration::from_secs(70), 950));
}

#[test]
fn test_replaying_solver_moves_completes_any_size() {
    for disk_count in DiskCount::all().take(5) {
        let mut game = GameController::new(Box::new(MemoryHighScores::new()));
        game.start(disk_count);
        for action in SolutionMoves::for_game(disk_count) {
            assert!(game.request_move(action.from, action.to));
        }
        assert_eq!(game.phase(), GamePhase::Completed);
        assert_eq!(game.move_count(), disk_count.min_moves());
    }
}

/// Walks every position reachable by legal moves and checks the tower
/// invariants at each one.
fn explore(disk_count: DiskCount) -> usize {
    let start = TowerState::new(disk_count);
    let mut seen = HashSet::from([start.to_sizes()]);
    let mut queue = VecDeque::from([start]);

    while let Some(tower) = queue.pop_front() {
        assert!(
            TowerInvariants::check_all(&tower).is_ok(),
            "invariant broken at {tower}"
        );
        for action in legal_moves(&tower) {
            let mut next = tower.clone();
            let disk = next.remove(action.from).expect("legal move has a source disk");
            next.place(action.to, disk);
            if seen.insert(next.to_sizes()) {
                queue.push_back(next);
            }
        }
    }
    seen.len()
}

#[test]
fn test_every_reachable_position_is_valid() {
    // Every arrangement of n ordered disks over 3 pegs is reachable: 3^n.
    assert_eq!(explore(three()), 27);
    assert_eq!(explore(DiskCount::new(5).expect("valid")), 243);
}
