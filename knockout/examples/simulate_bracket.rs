//! Bracket Simulation Example
//!
//! Builds a bracket from a roster with an odd number of entrants and plays
//! it out with random results.

use knockout::{Bracket, Shuffler, parse_roster};
use rand::Rng;

fn main() {
    println!("=== Single-Elimination Bracket Example ===\n");

    let raw = "Ann\nBob\nCid\n\nDee\nEve\nFay\nGus\n";
    let players = Shuffler::with_seed(2024).shuffle_sequence(&parse_roster(raw));
    println!("Seeded order: {}\n", players.join(", "));

    let mut bracket = Bracket::new(&players).expect("roster has no reserved names");
    let mut rng = rand::rng();

    while let Some(m) = bracket.matches().iter().find(|m| m.is_playable()).cloned() {
        let winner = if rng.random_bool(0.5) {
            &m.player1
        } else {
            &m.player2
        };
        let winner = winner.to_string();
        bracket
            .declare_winner(&m.id, &winner)
            .expect("playable match accepts either participant");
    }

    for round in bracket.rounds() {
        println!("{}:", round.label);
        for m in round.matches {
            let result = m.winner.as_deref().unwrap_or("?");
            println!("  {:<18} {} vs {} -> {}", m.id, m.player1, m.player2, result);
        }
    }

    for event in bracket.drain_events() {
        println!("  * {event}");
    }

    println!(
        "\nChampion: {}",
        bracket.champion().unwrap_or("(undecided)")
    );
}
