use std::time::Duration;

use rand::rngs::StdRng;
use tracing::debug;

use brain_core::Clock;
use brain_core::generator;
use brain_core::model::{
    GameKind, GameOutcome, GameResult, GameSettings, PatternRound, Phase, Score,
};

use super::{GameSession, RoundView, SessionSnapshot, Transition, session_rng};
use crate::error::InputError;

/// Pick the term that continues a three-term series. One miss ends the game.
pub struct PatternSession {
    points: u32,
    clock: Clock,
    rng: StdRng,
    phase: Phase,
    round: Option<PatternRound>,
    score: u32,
    level: u32,
}

impl PatternSession {
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            points: settings.pattern_points(),
            clock: Clock::system(),
            rng: session_rng(None),
            phase: Phase::Idle,
            round: None,
            score: 0,
            level: 1,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn round(&self) -> Option<&PatternRound> {
        self.round.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }
}

impl GameSession for PatternSession {
    fn kind(&self) -> GameKind {
        GameKind::PatternMatch
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self) {
        self.score = 0;
        self.level = 1;
        self.round = Some(generator::pattern_round(&mut self.rng));
        self.phase = Phase::Active;
        debug!("pattern match started");
    }

    fn submit(&mut self, input: Option<i64>) -> Result<Transition, InputError> {
        if self.phase != Phase::Active {
            return Err(InputError::NotAccepting { phase: self.phase });
        }
        let value = input.ok_or(InputError::Empty)?;
        let Some(round) = self.round.as_ref() else {
            return Err(InputError::NotAccepting { phase: self.phase });
        };
        if !round.offers(value) {
            return Err(InputError::NotOffered { value });
        }

        if value == round.answer() {
            self.score = self.score.saturating_add(self.points);
            self.level = self.level.saturating_add(1);
            self.round = Some(generator::pattern_round(&mut self.rng));
            return Ok(Transition::Advanced);
        }

        self.phase = Phase::Terminal;
        Ok(Transition::Ended(GameResult {
            game: GameKind::PatternMatch,
            outcome: GameOutcome::Lost,
            score: Score::Points(self.score),
            finished_at: self.clock.now(),
        }))
    }

    fn tick_interval(&self) -> Option<Duration> {
        None
    }

    fn tick(&mut self) -> Transition {
        Transition::Unchanged
    }

    fn snapshot(&self) -> SessionSnapshot {
        let round = match &self.round {
            Some(round) => RoundView::Pattern {
                rule: round.rule(),
                shown: round.shown(),
                options: round.options(),
            },
            None => RoundView::Empty,
        };
        let mut snapshot = SessionSnapshot::new(GameKind::PatternMatch, self.phase, round);
        snapshot.score = self.score;
        snapshot.level = self.level;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::time::{fixed_clock, fixed_now};
    use rand::SeedableRng;

    fn started() -> PatternSession {
        let mut s = PatternSession::new(&GameSettings::default())
            .with_clock(fixed_clock())
            .with_rng(StdRng::seed_from_u64(5));
        s.start();
        s
    }

    fn wrong_option(s: &PatternSession) -> i64 {
        let round = s.round().unwrap();
        round
            .options()
            .into_iter()
            .find(|v| *v != round.answer())
            .unwrap()
    }

    #[test]
    fn correct_answers_add_points_and_levels() {
        let mut s = started();
        for n in 1..=4u32 {
            let answer = s.round().unwrap().answer();
            assert_eq!(s.submit(Some(answer)), Ok(Transition::Advanced));
            assert_eq!(s.score(), 10 * n);
            assert_eq!(s.level(), 1 + n);
        }
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn wrong_option_ends_the_game_with_the_score() {
        let mut s = started();
        let answer = s.round().unwrap().answer();
        s.submit(Some(answer)).unwrap();

        let wrong = wrong_option(&s);
        match s.submit(Some(wrong)).unwrap() {
            Transition::Ended(result) => {
                assert_eq!(result.outcome, GameOutcome::Lost);
                assert_eq!(result.score, Score::Points(10));
            }
            other => panic!("expected loss, got {other:?}"),
        }
        assert_eq!(s.phase(), Phase::Terminal);
        assert!(s.submit(Some(answer)).is_err());
    }

    #[test]
    fn values_not_offered_are_ignored() {
        let mut s = started();
        let round = s.round().unwrap().clone();
        let outside = (1..).find(|v| !round.offers(*v)).unwrap();
        assert_eq!(
            s.submit(Some(outside)),
            Err(InputError::NotOffered { value: outside })
        );
        assert_eq!(s.submit(None), Err(InputError::Empty));
        assert_eq!(s.round(), Some(&round));
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn restart_resets_score_and_level() {
        let mut s = started();
        let answer = s.round().unwrap().answer();
        s.submit(Some(answer)).unwrap();
        s.start();
        s.start();
        assert_eq!(s.score(), 0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn pattern_has_no_timer() {
        let s = started();
        assert_eq!(s.tick_interval(), None);
    }

    #[test]
    fn custom_points_per_answer() {
        let settings = brain_core::model::GameSettingsDraft {
            pattern_points: 25,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut s = PatternSession::new(&settings).with_rng(StdRng::seed_from_u64(9));
        s.start();
        let answer = s.round().unwrap().answer();
        s.submit(Some(answer)).unwrap();
        assert_eq!(s.score(), 25);
    }

    #[test]
    fn loss_is_stamped_by_the_session_clock() {
        let at = fixed_now() + chrono::Duration::minutes(5);
        let mut s = PatternSession::new(&GameSettings::default())
            .with_clock(Clock::fixed(at))
            .with_rng(StdRng::seed_from_u64(5));
        s.start();
        let wrong = wrong_option(&s);
        match s.submit(Some(wrong)).unwrap() {
            Transition::Ended(result) => assert_eq!(result.finished_at, at),
            other => panic!("expected loss, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_hides_the_answer() {
        let s = started();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["round"]["kind"], "pattern");
        assert!(json["round"].get("answer").is_none());
        assert_eq!(json["round"]["options"].as_array().unwrap().len(), 4);
    }
}
