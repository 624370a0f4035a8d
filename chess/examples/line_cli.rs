// Simple command-line application to enter an opening line move by move

use openline::{board::PrettyStyle, moves::san::Style, Color, GameState};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    let mut game = GameState::new();

    // Optional starting line, e.g. `line_cli "1. e4 c5 2. Nf3"`
    let line = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if let Err(e) = game.push_san_line(&line) {
        println!("Bad line: {}", e);
    }

    let mut stdin = io::stdin().lock();
    loop {
        println!("{}", game.board().pretty(PrettyStyle::Ascii));
        let side = match game.side() {
            Color::White => "White",
            Color::Black => "Black",
        };
        print!("{} move ({}): ", side, game.board().move_number());
        io::stdout().flush()?;

        let mut s = String::new();
        if stdin.read_line(&mut s)? == 0 {
            break;
        }
        let s = s.trim();
        if s.is_empty() {
            break;
        }

        // `GameState::push_san()` would do both steps, but we want to show the resolved move.
        let uci = match game.try_parse(s) {
            Ok(uci) => uci,
            Err(e) => {
                println!("Bad move: {}", e);
                println!();
                continue;
            }
        };
        match game.push_uci(&uci.to_string()) {
            Ok(mv) => println!("{} ({})", mv.styled(Style::Utf8), uci),
            Err(e) => println!("Cannot apply: {}", e),
        }
        println!();
    }

    println!("Notation:");
    let mut notation = String::new();
    for (i, mv) in game.history().iter().enumerate() {
        if i % 2 == 0 {
            notation += &format!("{}. ", i / 2 + 1);
        }
        notation += &format!("{} ", mv);
    }
    println!("{}", notation.trim_end());
    Ok(())
}
