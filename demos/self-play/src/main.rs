//! Plays whole games of The Resistance between random bots.
//!
//! Usage: `self-play [--players N] [--seed S] [--games G]`
//!
//! Defaults to one 5-player game with a random seed. Log verbosity follows
//! `RUST_LOG` (default `info`). The final snapshot of every game is printed
//! as JSON.

use std::collections::HashSet;

use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use resistance::prelude::*;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(about = "Play The Resistance between random bots")]
struct Args {
    /// Players per game.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(5..=10))]
    players: u64,

    /// Seed for roles and bot choices. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to play.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    games: u64,
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

/// What the bots collectively know: which seats were told they are spies.
struct Table {
    rng: StdRng,
    spies: HashSet<PlayerId>,
}

impl Table {
    fn learn_roles(&mut self, events: &Events) {
        for (to, event) in events {
            if let (Recipient::Player(p), GameEvent::RoleAssigned { role: Role::Spy, .. }) =
                (to, event)
            {
                self.spies.insert(*p);
            }
        }
    }

    fn pick_party(&mut self, players: &[PlayerId], size: usize) -> Vec<PlayerId> {
        let mut party = players.to_vec();
        party.shuffle(&mut self.rng);
        party.truncate(size);
        party
    }

    fn approves(&mut self) -> bool {
        self.rng.random_bool(0.6)
    }

    /// Resistance always plays red; a spy sabotages half the time.
    fn plays_red(&mut self, player: PlayerId) -> bool {
        !self.spies.contains(&player) || self.rng.random_bool(0.5)
    }
}

fn log_events(events: &Events) {
    for (to, event) in events {
        match to {
            Recipient::All => tracing::info!(?event, "public"),
            Recipient::Player(p) => tracing::debug!(player_id = %p, ?event, "private"),
        }
    }
}

// ---------------------------------------------------------------------------
// Game loop
// ---------------------------------------------------------------------------

async fn play(
    registry: &mut SessionRegistry,
    chat: ChatId,
    players: u64,
    seed: u64,
) -> Result<GameSnapshot, ResistanceError> {
    let creator = PlayerId(1);
    let mut table = Table {
        rng: StdRng::seed_from_u64(seed),
        spies: HashSet::new(),
    };

    registry.create_with_selector(chat, creator, SeededSpies::new(seed))?;
    for id in 1..=players {
        registry.dispatch(chat, PlayerId(id), Command::Register).await?;
    }
    let events = registry.dispatch(chat, creator, Command::Start).await?;
    table.learn_roles(&events);
    log_events(&events);

    loop {
        let snap = registry.handle(chat)?.snapshot().await?;
        match snap.phase {
            GamePhase::ProposalPending => {
                let (Some(leader), Some(size)) = (snap.leader, snap.party_size) else {
                    break;
                };
                let party = table.pick_party(&snap.players, size);
                let events = registry
                    .dispatch(chat, leader, Command::ProposeParty { party })
                    .await?;
                log_events(&events);
            }
            GamePhase::PartyVoteInProgress => {
                for &voter in &snap.players {
                    let approve = table.approves();
                    let events = registry
                        .dispatch(chat, voter, Command::VoteParty { approve })
                        .await?;
                    log_events(&events);
                }
            }
            GamePhase::MissionVoteInProgress => {
                for member in snap.party.unwrap_or_default() {
                    let red = table.plays_red(member);
                    let events = registry
                        .dispatch(chat, member, Command::VoteMission { red })
                        .await?;
                    log_events(&events);
                }
            }
            _ => break,
        }
    }

    let snap = registry.handle(chat)?.snapshot().await?;
    registry.cancel(chat, creator).await?;
    Ok(snap)
}

#[tokio::main]
async fn main() -> Result<(), ResistanceError> {
    init_tracing();
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(players = args.players, seed, games = args.games, "self-play");

    // Finished games stay registered so their final state can be read.
    let mut registry = SessionRegistry::new(SessionConfig {
        remove_finished: false,
        ..SessionConfig::default()
    });

    let mut resistance_wins = 0;
    for game in 0..args.games {
        let chat = ChatId(-(game as i64) - 1);
        let snap = play(&mut registry, chat, args.players, seed.wrapping_add(game)).await?;
        if snap.outcome == Some(true) {
            resistance_wins += 1;
        }
        match serde_json::to_string_pretty(&snap) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize snapshot"),
        }
    }

    tracing::info!(
        games = args.games,
        resistance_wins,
        spy_wins = args.games - resistance_wins,
        "done"
    );
    Ok(())
}
