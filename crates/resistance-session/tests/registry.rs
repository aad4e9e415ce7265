//! Integration tests for the session registry and game actors.

use resistance_engine::{GameError, GamePhase, SpySelector};
use resistance_protocol::{ChatId, Command, GameEvent, PlayerId, Recipient, Role};
use resistance_session::{Events, SessionConfig, SessionError, SessionRegistry};

// =========================================================================
// Helpers
// =========================================================================

const CHAT: ChatId = ChatId(-1001);

/// Deals a fixed set of spies.
struct KnownSpies(Vec<PlayerId>);

impl SpySelector for KnownSpies {
    fn select(&mut self, _players: &[PlayerId], count: usize) -> Vec<PlayerId> {
        assert_eq!(count, self.0.len(), "test dealt the wrong number of spies");
        self.0.clone()
    }
}

/// Names a player who isn't in the game.
struct BadSpies;

impl SpySelector for BadSpies {
    fn select(&mut self, _players: &[PlayerId], count: usize) -> Vec<PlayerId> {
        vec![PlayerId(99); count]
    }
}

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn pids(ids: &[u64]) -> Vec<PlayerId> {
    ids.iter().copied().map(pid).collect()
}

/// Creates a 5-player game in `chat` with spies 2 and 4, registers
/// players 1..=5 and starts it. Player 1 is the creator.
async fn start_five(registry: &mut SessionRegistry, chat: ChatId) -> Events {
    registry
        .create_with_selector(chat, pid(1), KnownSpies(pids(&[2, 4])))
        .unwrap();
    for id in 1..=5 {
        registry.dispatch(chat, pid(id), Command::Register).await.unwrap();
    }
    registry.dispatch(chat, pid(1), Command::Start).await.unwrap()
}

async fn current_leader(registry: &SessionRegistry, chat: ChatId) -> PlayerId {
    let snap = registry.handle(chat).unwrap().snapshot().await.unwrap();
    snap.leader.unwrap()
}

/// Every player votes `approve`; returns the events of the closing ballot.
async fn vote_all(registry: &mut SessionRegistry, chat: ChatId, approve: bool) -> Events {
    let mut last = Vec::new();
    for id in 1..=5 {
        last = registry
            .dispatch(chat, pid(id), Command::VoteParty { approve })
            .await
            .unwrap();
    }
    last
}

/// Proposes `party`, approves it, and has every member in `black` play
/// black. Returns the events of the final mission ballot.
async fn play_mission(
    registry: &mut SessionRegistry,
    chat: ChatId,
    party: &[u64],
    black: &[u64],
) -> Events {
    let leader = current_leader(registry, chat).await;
    registry
        .dispatch(chat, leader, Command::ProposeParty { party: pids(party) })
        .await
        .unwrap();
    vote_all(registry, chat, true).await;

    let mut last = Vec::new();
    for &id in party {
        let red = !black.contains(&id);
        last = registry
            .dispatch(chat, pid(id), Command::VoteMission { red })
            .await
            .unwrap();
    }
    last
}

async fn reject_once(registry: &mut SessionRegistry, chat: ChatId) -> Events {
    let leader = current_leader(registry, chat).await;
    registry
        .dispatch(chat, leader, Command::ProposeParty { party: pids(&[1, 3]) })
        .await
        .unwrap();
    vote_all(registry, chat, false).await
}

fn public(events: &Events) -> Vec<&GameEvent> {
    events
        .iter()
        .filter(|(to, _)| *to == Recipient::All)
        .map(|(_, event)| event)
        .collect()
}

// =========================================================================
// Registry lifecycle
// =========================================================================

#[tokio::test]
async fn test_create_twice_in_same_chat_fails() {
    let mut registry = SessionRegistry::default();
    registry.create(CHAT, pid(1)).unwrap();

    let err = registry.create(CHAT, pid(2)).unwrap_err();
    assert!(matches!(err, SessionError::AlreadyExists(c) if c == CHAT));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.chat_ids(), vec![CHAT]);
}

#[tokio::test]
async fn test_dispatch_without_game_is_not_found() {
    let mut registry = SessionRegistry::default();
    assert!(registry.is_empty());

    let err = registry
        .dispatch(CHAT, pid(1), Command::Register)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound(c) if c == CHAT));
}

#[tokio::test]
async fn test_register_reports_player_count() {
    let mut registry = SessionRegistry::default();
    registry.create(CHAT, pid(1)).unwrap();

    let events = registry.dispatch(CHAT, pid(7), Command::Register).await.unwrap();
    assert_eq!(
        events,
        vec![(
            Recipient::All,
            GameEvent::PlayerRegistered { player: pid(7), player_count: 1 }
        )]
    );

    let err = registry.dispatch(CHAT, pid(7), Command::Register).await.unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::AlreadyRegistered(p)) if p == pid(7)));
}

// =========================================================================
// Starting
// =========================================================================

#[tokio::test]
async fn test_start_by_non_creator_is_refused() {
    let mut registry = SessionRegistry::default();
    registry.create(CHAT, pid(1)).unwrap();
    for id in 1..=5 {
        registry.dispatch(CHAT, pid(id), Command::Register).await.unwrap();
    }

    let err = registry.dispatch(CHAT, pid(2), Command::Start).await.unwrap_err();
    assert!(matches!(err, SessionError::NotCreator(p) if p == pid(2)));

    let err = registry.dispatch(CHAT, pid(9), Command::Start).await.unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::NotRegistered(p)) if p == pid(9)));

    let snap = registry.handle(CHAT).unwrap().snapshot().await.unwrap();
    assert_eq!(snap.phase, GamePhase::NotStarted);
}

#[tokio::test]
async fn test_start_with_too_few_players_is_refused() {
    let mut registry = SessionRegistry::default();
    let handle = registry.create(CHAT, pid(1)).unwrap();
    for id in 1..=4 {
        handle.register(pid(id)).await.unwrap();
    }

    let err = handle.start(pid(1)).await.unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::InvalidPlayerCount(4))));
}

#[tokio::test]
async fn test_start_deals_roles_privately_and_opens_round_one() {
    let mut registry = SessionRegistry::default();
    let events = start_five(&mut registry, CHAT).await;

    assert_eq!(
        events[0],
        (
            Recipient::All,
            GameEvent::GameStarted { players: pids(&[1, 2, 3, 4, 5]), spy_count: 2 }
        )
    );

    let private: Vec<_> = events
        .iter()
        .filter_map(|(to, event)| match (to, event) {
            (Recipient::Player(p), GameEvent::RoleAssigned { role, fellow_spies }) => {
                Some((*p, *role, fellow_spies.clone()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(private.len(), 5);
    assert!(private.contains(&(pid(2), Role::Spy, pids(&[4]))));
    assert!(private.contains(&(pid(4), Role::Spy, pids(&[2]))));
    assert!(private.contains(&(pid(3), Role::Resistance, Vec::new())));

    assert_eq!(
        public(&events)[1..],
        [
            &GameEvent::RoundStarted { round: 1, party_size: 2, required_fails: 1 },
            &GameEvent::ProposalRequested { leader: pid(5), party_size: 2, attempt: 1 },
        ]
    );
}

#[tokio::test]
async fn test_start_twice_is_refused() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;

    let err = registry.dispatch(CHAT, pid(1), Command::Start).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Game(GameError::InvalidTransition(GamePhase::ProposalPending))
    ));
}

#[tokio::test]
async fn test_start_with_bad_spy_selection_is_refused() {
    let mut registry = SessionRegistry::default();
    let handle = registry
        .create_with_selector(CHAT, pid(1), BadSpies)
        .unwrap();
    for id in 1..=5 {
        handle.register(pid(id)).await.unwrap();
    }

    let err = handle.start(pid(1)).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Game(GameError::InvalidSpySelection { expected: 2 })
    ));
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, GamePhase::NotStarted);
}

// =========================================================================
// Role queries
// =========================================================================

#[tokio::test]
async fn test_get_role_before_start_is_refused() {
    let mut registry = SessionRegistry::default();
    registry.create(CHAT, pid(1)).unwrap();
    registry.dispatch(CHAT, pid(1), Command::Register).await.unwrap();

    let err = registry.dispatch(CHAT, pid(1), Command::GetRole).await.unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::NotStarted)));
    assert_eq!(err.to_string(), "game is not started yet");
}

#[tokio::test]
async fn test_get_role_answers_privately() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;

    let events = registry.dispatch(CHAT, pid(4), Command::GetRole).await.unwrap();
    assert_eq!(
        events,
        vec![(
            Recipient::Player(pid(4)),
            GameEvent::RoleAssigned { role: Role::Spy, fellow_spies: pids(&[2]) }
        )]
    );

    let handle = registry.handle(CHAT).unwrap();
    let events = handle.get_role(pid(3)).await.unwrap();
    assert_eq!(
        events,
        vec![(
            Recipient::Player(pid(3)),
            GameEvent::RoleAssigned { role: Role::Resistance, fellow_spies: Vec::new() }
        )]
    );

    let err = handle.get_role(pid(9)).await.unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::NotRegistered(p)) if p == pid(9)));
}

// =========================================================================
// Automatic transitions
// =========================================================================

#[tokio::test]
async fn test_approved_party_goes_straight_to_mission() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;

    registry
        .dispatch(CHAT, pid(5), Command::ProposeParty { party: pids(&[2, 3]) })
        .await
        .unwrap();
    let events = vote_all(&mut registry, CHAT, true).await;

    let public = public(&events);
    assert!(matches!(
        public[0],
        GameEvent::PartyBallotCast { voter, cast: 5, total: 5 } if *voter == pid(5)
    ));
    assert!(matches!(public[1], GameEvent::PartyVoteClosed { approved: true, ballots } if ballots.len() == 5));
    assert_eq!(public[2], &GameEvent::MissionRequested { party: pids(&[2, 3]) });

    let snap = registry.handle(CHAT).unwrap().snapshot().await.unwrap();
    assert_eq!(snap.phase, GamePhase::MissionVoteInProgress);
}

#[tokio::test]
async fn test_rejected_party_passes_leadership() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;

    let events = reject_once(&mut registry, CHAT).await;
    let public = public(&events);
    assert!(matches!(public[1], GameEvent::PartyVoteClosed { approved: false, .. }));
    assert_eq!(
        public[2],
        &GameEvent::ProposalRequested { leader: pid(1), party_size: 2, attempt: 2 }
    );
}

#[tokio::test]
async fn test_fifth_rejection_forfeits_round() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;

    for _ in 0..4 {
        reject_once(&mut registry, CHAT).await;
    }
    let events = reject_once(&mut registry, CHAT).await;
    assert_eq!(
        public(&events)[2..],
        [
            &GameEvent::RoundForfeited { round: 1 },
            &GameEvent::RoundStarted { round: 2, party_size: 3, required_fails: 1 },
            &GameEvent::ProposalRequested { leader: pid(5), party_size: 3, attempt: 1 },
        ]
    );

    let snap = registry.handle(CHAT).unwrap().snapshot().await.unwrap();
    assert_eq!(snap.score.spies, 1);
}

#[tokio::test]
async fn test_mission_close_reveals_shuffled_cards_and_opens_next_round() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;

    let events = play_mission(&mut registry, CHAT, &[2, 3], &[2]).await;
    let public = public(&events);

    let GameEvent::MissionClosed { resistance_won, ballots } = public[1] else {
        panic!("expected mission results, got {:?}", public[1]);
    };
    assert!(!resistance_won);
    let mut sorted = ballots.clone();
    sorted.sort();
    assert_eq!(sorted, vec![false, true]);

    assert_eq!(
        public[2..],
        [
            &GameEvent::RoundStarted { round: 2, party_size: 3, required_fails: 1 },
            &GameEvent::ProposalRequested { leader: pid(1), party_size: 3, attempt: 1 },
        ]
    );
}

#[tokio::test]
async fn test_resistance_member_cannot_play_black_through_registry() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;
    registry
        .dispatch(CHAT, pid(5), Command::ProposeParty { party: pids(&[1, 3]) })
        .await
        .unwrap();
    vote_all(&mut registry, CHAT, true).await;

    let err = registry
        .dispatch(CHAT, pid(3), Command::VoteMission { red: false })
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::ResistanceCannotPlayBlack)));
}

// =========================================================================
// Game over
// =========================================================================

#[tokio::test]
async fn test_finished_game_is_removed() {
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;

    play_mission(&mut registry, CHAT, &[1, 3], &[]).await;
    play_mission(&mut registry, CHAT, &[1, 3, 5], &[]).await;
    let events = play_mission(&mut registry, CHAT, &[1, 5], &[]).await;

    assert_eq!(
        events.last(),
        Some(&(
            Recipient::All,
            GameEvent::GameOver { resistance_won: true, spies: pids(&[2, 4]) }
        ))
    );
    assert!(registry.is_empty());
    let err = registry.dispatch(CHAT, pid(1), Command::Register).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));
}

#[tokio::test]
async fn test_finished_game_kept_when_configured() {
    let mut registry = SessionRegistry::new(SessionConfig {
        remove_finished: false,
        ..SessionConfig::default()
    });
    start_five(&mut registry, CHAT).await;

    play_mission(&mut registry, CHAT, &[2, 3], &[2]).await;
    play_mission(&mut registry, CHAT, &[2, 3, 4], &[4]).await;
    play_mission(&mut registry, CHAT, &[2, 4], &[2, 4]).await;

    let snap = registry.handle(CHAT).unwrap().snapshot().await.unwrap();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.outcome, Some(false));
    assert_eq!(snap.spies, Some(pids(&[2, 4])));

    let err = registry
        .dispatch(CHAT, pid(1), Command::VoteParty { approve: true })
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::VoteNotInProgress)));
}

// =========================================================================
// Cancel and isolation
// =========================================================================

#[tokio::test]
async fn test_cancel_is_creator_only() {
    let mut registry = SessionRegistry::default();
    let handle = registry.create(CHAT, pid(1)).unwrap();

    let err = registry.cancel(CHAT, pid(2)).await.unwrap_err();
    assert!(matches!(err, SessionError::NotCreator(p) if p == pid(2)));
    assert_eq!(registry.len(), 1);

    registry.cancel(CHAT, pid(1)).await.unwrap();
    assert!(registry.is_empty());

    // The actor is gone, so a stale handle can no longer reach it.
    let err = handle.register(pid(3)).await.unwrap_err();
    assert!(matches!(err, SessionError::Unavailable(c) if c == CHAT));
}

#[tokio::test]
async fn test_chats_are_independent() {
    let other = ChatId(-2002);
    let mut registry = SessionRegistry::default();
    start_five(&mut registry, CHAT).await;
    registry.create(other, pid(7)).unwrap();
    registry.dispatch(other, pid(7), Command::Register).await.unwrap();

    reject_once(&mut registry, CHAT).await;

    let first = registry.handle(CHAT).unwrap().snapshot().await.unwrap();
    let second = registry.handle(other).unwrap().snapshot().await.unwrap();
    assert_eq!(first.attempt, 1);
    assert_eq!(first.leader, Some(pid(1)));
    assert_eq!(second.phase, GamePhase::NotStarted);
    assert_eq!(second.players, pids(&[7]));

    let mut chats = registry.chat_ids();
    chats.sort_by_key(|c| c.0);
    assert_eq!(chats, vec![other, CHAT]);
}
