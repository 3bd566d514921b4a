/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use kingside::{Board, Color, Coordinate, Game, Piece, Search, SearchConfig};

fn sq(square: &str) -> Coordinate {
    square.parse().unwrap()
}

fn config(depth: usize, threads: usize) -> SearchConfig {
    SearchConfig {
        depth,
        threads,
        ..Default::default()
    }
}

#[test]
fn test_takes_hanging_queen() {
    let mut board = Board::empty();
    board.set(sq("a1"), Piece::WhiteKing);
    board.set(sq("h8"), Piece::BlackKing);
    board.set(sq("c3"), Piece::WhiteKnight);
    board.set(sq("d5"), Piece::BlackQueen);
    board.set(sq("a7"), Piece::BlackPawn);

    let before = board;
    let res = Search::new(&mut board, Color::White, config(2, 1)).select_best_move();
    let mv = res.bestmove.unwrap();

    assert_eq!((mv.from, mv.to), (sq("c3"), sq("d5")));
    assert_eq!(res.score, 2);
    assert_eq!(board, before, "search left the board changed");
}

#[test]
fn test_self_play_stays_legal() {
    let mut game = Game::default();

    for _ in 0..8 {
        let mover = game.side_to_move();
        let res = game.play_engine_move(config(2, 1)).unwrap();
        assert!(res.bestmove.is_some());
        assert!(res.nodes > 0);

        // The side that just moved is never left in check.
        assert!(!kingside::is_in_check(mover, game.board()));
        assert_eq!(game.side_to_move(), mover.opponent());
    }
}

#[test]
fn test_threads_do_not_change_the_result() {
    let mut game = Game::default();
    for (from, to) in [("e2", "e4"), ("d7", "d5")] {
        game.play(sq(from), sq(to), &mut kingside::Promote::default())
            .unwrap();
    }

    let sequential = game.search(config(3, 1));
    for threads in [2, 3, 8] {
        let parallel = game.search(config(3, threads));
        assert_eq!(parallel.bestmove, sequential.bestmove);
        assert_eq!(parallel.score, sequential.score);
    }
}

#[test]
fn test_repeated_searches_agree() {
    let game = Game::default();
    let first = game.search(config(3, 1));
    let second = game.search(config(3, 1));
    assert_eq!(first, second);
}
