//! Round controller for one game.
//!
//! A `Trainer` owns the card store, the history and the round in progress,
//! and talks to the storage collaborator. Storage failures never stop a
//! round: they are logged, kept as warnings and the trainer carries on with
//! what it holds in memory.

use crate::error::{EngineError, Result, StorageError};
use crate::features::{base_cards, closure, Feature, FeatureChange, FeatureSet, BASE_SOURCE};
use crate::history::{GameResult, History};
use crate::matching;
use crate::progress;
use crate::round::{AnswerRecord, Round};
use crate::scoring;
use crate::selector;
use crate::stats::{card_stats, history_stats, Stats};
use crate::storage::{load_as, save_as, Storage};
use crate::store::CardStore;
use crate::timer::{Countdown, Tick, TimerToken};
use crate::types::{
    AnswerMode, Card, CardId, GameConfig, GameKind, Prompt, Response, Seconds, Settings, Topic,
    WordEntry,
};
use chrono::{DateTime, Local, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Source name of the vocabulary word list.
pub const VOCABULARY_SOURCE: &str = "vocabulary";

/// Datasets a trainer keeps in storage, one key each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Dataset {
    Cards,
    Features,
    History,
    Config,
    Session,
}

impl Dataset {
    fn name(self) -> &'static str {
        match self {
            Self::Cards => "cards",
            Self::Features => "features",
            Self::History => "history",
            Self::Config => "config",
            Self::Session => "session",
        }
    }
}

/// A storage problem the trainer worked around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub key: String,
    pub message: String,
}

/// The round as the learner sees it.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    pub id: Uuid,
    pub cards: Vec<Card>,
    pub answered: usize,
    pub current: Option<CardId>,
    pub timer: Option<TimerToken>,
    /// Seconds left on the countdown.
    pub seconds: f64,
}

/// What happened to one answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub card_id: CardId,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
    pub near_miss: bool,
    pub timed_out: bool,
    pub points: u32,
    pub expected: String,
    /// The card after its progress update.
    pub card: Card,
    /// Next card awaiting an answer, `None` once the round is exhausted.
    pub next: Option<CardId>,
    /// Countdown for the next card.
    pub timer: Option<TimerToken>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickOutcome {
    Running { remaining: f64 },
    /// Time ran out and the current card was answered as a timeout.
    Expired { outcome: AnswerOutcome },
    /// The tick belongs to a countdown that is no longer running.
    Stale,
}

pub struct Trainer {
    kind: GameKind,
    settings: Settings,
    storage: Box<dyn Storage>,
    source: &'static str,
    seed: Vec<Card>,
    store: CardStore,
    features: FeatureSet,
    history: History,
    last_config: Option<GameConfig>,
    round: Option<Round>,
    countdown: Countdown,
    rng: StdRng,
    warnings: Vec<Warning>,
    /// Datasets that failed to load. They are never saved, so the stored
    /// copy outlives the in-memory fallback.
    unreadable: BTreeSet<Dataset>,
}

impl Trainer {
    /// Open the multiplication game, loading saved progress or seeding the
    /// base set.
    pub fn times(storage: Box<dyn Storage>, settings: Settings) -> Self {
        Self::open(GameKind::Times, storage, settings, BASE_SOURCE, base_cards())
    }

    /// Open the vocabulary game. Words missing from the saved store are
    /// added as fresh cards.
    pub fn vocabulary(storage: Box<dyn Storage>, settings: Settings, words: Vec<WordEntry>) -> Self {
        let seed = words.into_iter().map(|w| Card::new(Prompt::word(w))).collect();
        Self::open(GameKind::Vocab, storage, settings, VOCABULARY_SOURCE, seed)
    }

    fn open(
        kind: GameKind,
        storage: Box<dyn Storage>,
        settings: Settings,
        source: &'static str,
        seed: Vec<Card>,
    ) -> Self {
        let mut trainer = Self {
            kind,
            settings,
            storage,
            source,
            seed,
            store: CardStore::new(),
            features: FeatureSet::new(),
            history: History::new(),
            last_config: None,
            round: None,
            countdown: Countdown::new(),
            rng: StdRng::from_os_rng(),
            warnings: Vec::new(),
            unreadable: BTreeSet::new(),
        };
        trainer.load();
        trainer.seed_store();
        trainer.resume_round();
        tracing::info!(
            game = %kind,
            cards = trainer.store.len(),
            rounds = trainer.history.len(),
            "trainer ready"
        );
        trainer
    }

    /// Replace the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Give back the storage collaborator.
    pub fn into_storage(self) -> Box<dyn Storage> {
        self.storage
    }

    fn load(&mut self) {
        if let Some(store) = self.restore(Dataset::Cards) {
            self.store = store;
        }
        if let Some(features) = self.restore(Dataset::Features) {
            self.features = features;
        }
        if let Some(history) = self.restore(Dataset::History) {
            self.history = history;
        }
        self.last_config = self.restore::<Option<GameConfig>>(Dataset::Config).flatten();
        self.round = self.restore::<Option<Round>>(Dataset::Session).flatten();
    }

    fn seed_store(&mut self) {
        let seed = self.seed.clone();
        let mut written = if self.store.is_initialized(self.source) {
            self.store.add_cards(self.source, seed)
        } else {
            self.store.initialize(self.source, seed, false)
        };
        let active: Vec<Feature> = self.features.iter().collect();
        for feature in active {
            written += self.store.add_cards(feature.as_str(), feature.cards());
        }
        if written > 0 {
            self.persist(Dataset::Cards);
        }
    }

    fn resume_round(&mut self) {
        if let Some(round) = &self.round {
            tracing::info!(round = %round.id, answered = round.answers.len(), "resuming round");
        }
        self.prune_round();
        self.restart_countdown();
    }

    /// Drop unanswered round cards that left the store. A round left with
    /// no cards at all is discarded.
    fn prune_round(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let before = round.current().cloned();
        let store = &self.store;
        let removed = round.retain_pending(|id| store.contains(id));
        let emptied = round.cards.is_empty();
        let moved = before != round.current().cloned();

        if emptied {
            tracing::info!(round = %round.id, "no cards left, discarding round");
            self.round = None;
            self.countdown.cancel();
        } else if moved {
            self.restart_countdown();
        }
        if removed > 0 || emptied {
            self.persist(Dataset::Session);
        }
    }

    fn restore<T: DeserializeOwned>(&mut self, dataset: Dataset) -> Option<T> {
        let key = self.kind.key(dataset.name());
        match load_as(self.storage.as_ref(), &key) {
            Ok(value) => value,
            Err(err) => {
                self.unreadable.insert(dataset);
                self.warn(key, err);
                None
            }
        }
    }

    fn persist(&mut self, dataset: Dataset) {
        let key = self.kind.key(dataset.name());
        if self.unreadable.contains(&dataset) {
            tracing::warn!(key = %key, "not saving over data that failed to load");
            self.warnings.push(Warning {
                key,
                message: "not saved: the stored value could not be loaded".to_string(),
            });
            return;
        }
        let sink = self.storage.as_mut();
        let result = match dataset {
            Dataset::Cards => save_as(sink, &key, &self.store),
            Dataset::Features => save_as(sink, &key, &self.features),
            Dataset::History => save_as(sink, &key, &self.history),
            Dataset::Config => save_as(sink, &key, &self.last_config),
            Dataset::Session => save_as(sink, &key, &self.round),
        };
        if let Err(err) = result {
            self.warn(key, err);
        }
    }

    fn warn(&mut self, key: String, err: StorageError) {
        tracing::warn!(key = %key, error = %err, "storage failed, continuing in memory");
        self.warnings.push(Warning {
            key,
            message: err.to_string(),
        });
    }

    fn restart_countdown(&mut self) -> Option<TimerToken> {
        self.countdown.cancel();
        match &self.round {
            Some(round) if !round.is_complete() => {
                Some(self.countdown.start(self.settings.round_seconds))
            }
            _ => None,
        }
    }

    /// Draw the cards for a new round and start the first countdown.
    pub fn start_round(&mut self, config: GameConfig) -> Result<RoundView> {
        if self.round.is_some() {
            return Err(EngineError::RoundInProgress);
        }
        if config.size == 0 {
            return Err(EngineError::InvalidConfig(
                "round size must be at least 1".to_string(),
            ));
        }
        if self.kind == GameKind::Times && config.mode == AnswerMode::Flip {
            return Err(EngineError::InvalidConfig(
                "multiplication rounds only take typed answers".to_string(),
            ));
        }

        let picked: Vec<CardId> = selector::select(
            self.store.iter(),
            &config.selection,
            config.focus,
            config.mode,
            config.size,
            &mut self.rng,
        )
        .into_iter()
        .map(|card| card.id.clone())
        .collect();
        if picked.is_empty() {
            return Err(EngineError::EmptySelection);
        }

        tracing::info!(
            game = %self.kind,
            cards = picked.len(),
            focus = ?config.focus,
            "round started"
        );
        self.last_config = Some(config.clone());
        self.round = Some(Round::new(config, picked));
        self.restart_countdown();
        self.persist(Dataset::Config);
        self.persist(Dataset::Session);

        self.round_view().ok_or(EngineError::NoActiveRound)
    }

    /// Answer the card currently awaiting a response.
    ///
    /// Each card of a round takes exactly one answer; resubmitting a card
    /// that was already answered fails with `NotCurrentCard`.
    pub fn submit_answer(
        &mut self,
        card_id: &CardId,
        response: Response,
        elapsed: f64,
    ) -> Result<AnswerOutcome> {
        let current = self
            .round
            .as_ref()
            .ok_or(EngineError::NoActiveRound)?
            .current()
            .cloned()
            .ok_or(EngineError::RoundComplete)?;
        if &current != card_id {
            return Err(EngineError::NotCurrentCard(card_id.clone()));
        }
        self.answer_current(response, Seconds::new(elapsed))
    }

    fn answer_current(&mut self, response: Response, elapsed: Seconds) -> Result<AnswerOutcome> {
        let round = self.round.as_mut().ok_or(EngineError::NoActiveRound)?;
        let card_id = round.current().cloned().ok_or(EngineError::RoundComplete)?;
        let card = self
            .store
            .get(&card_id)
            .cloned()
            .ok_or_else(|| EngineError::CardMissing(card_id.clone()))?;
        let mode = round.config.mode;

        let evaluation = matching::evaluate_with(&card, &response, self.settings.typo_threshold);
        let timed_out = matches!(response, Response::Timeout);
        let points = scoring::score_answer(
            &card,
            evaluation.correct,
            card.level,
            card.time_for(mode),
            elapsed,
        );
        let updated = progress::apply(&card, evaluation.correct, elapsed, mode);
        self.store.replace(updated.clone());

        round.answers.push(AnswerRecord {
            card_id: card_id.clone(),
            correct: evaluation.correct,
            distance: evaluation.distance,
            elapsed,
            points,
            timed_out,
        });
        let next = round.current().cloned();
        let timer = self.restart_countdown();

        self.persist(Dataset::Cards);
        self.persist(Dataset::Session);
        tracing::debug!(
            card = %card_id,
            correct = evaluation.correct,
            points,
            timed_out,
            "answer recorded"
        );

        Ok(AnswerOutcome {
            card_id,
            correct: evaluation.correct,
            distance: evaluation.distance,
            near_miss: evaluation.near_miss(),
            timed_out,
            points,
            expected: card.prompt.expected_answer(),
            card: updated,
            next,
            timer,
        })
    }

    /// Advance the countdown. When it runs out the current card is answered
    /// as a timeout.
    pub fn tick(&mut self, token: TimerToken, elapsed: f64) -> Result<TickOutcome> {
        match self.countdown.tick(token, elapsed) {
            Tick::Running { remaining } => Ok(TickOutcome::Running { remaining }),
            Tick::Stale => Ok(TickOutcome::Stale),
            Tick::Expired => {
                let limit = Seconds::new(self.settings.round_seconds);
                let outcome = self.answer_current(Response::Timeout, limit)?;
                Ok(TickOutcome::Expired { outcome })
            }
        }
    }

    /// Close the round, record it in the history and grant the daily bonus.
    pub fn finish_round(&mut self) -> Result<GameResult> {
        self.finish_round_at(&Local::now())
    }

    /// Like [`Trainer::finish_round`] with an explicit clock reading.
    pub fn finish_round_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<GameResult> {
        match &self.round {
            None => return Err(EngineError::NoActiveRound),
            Some(round) if round.answers.is_empty() => return Err(EngineError::NothingAnswered),
            Some(_) => {}
        }
        let Some(round) = self.round.take() else {
            return Err(EngineError::NoActiveRound);
        };
        self.countdown.cancel();

        let result = GameResult {
            id: round.id,
            played_at: now.with_timezone(&Utc),
            points: scoring::score_round(&round.answers),
            bonus: scoring::daily_bonus(&self.history, now),
            correct: round.correct_count(),
            attempted: round.answers.len(),
            config: round.config,
        };
        self.history.append(result.clone());
        self.persist(Dataset::History);
        self.persist(Dataset::Session);

        tracing::info!(
            game = %self.kind,
            points = result.points,
            bonus = result.bonus,
            correct = result.correct,
            attempted = result.attempted,
            "round finished"
        );
        Ok(result)
    }

    /// Drop the round in progress without recording it. Returns whether
    /// there was one.
    pub fn abandon_round(&mut self) -> bool {
        self.countdown.cancel();
        let abandoned = self.round.take().is_some();
        if abandoned {
            self.persist(Dataset::Session);
            tracing::info!(game = %self.kind, "round abandoned");
        }
        abandoned
    }

    /// Switch an optional feature on or off.
    ///
    /// Turning a feature off deletes its cards and progress along with those
    /// of every feature depending on it, so the caller must pass
    /// `confirmed = true`. Turning off a feature that is already off does
    /// nothing.
    pub fn toggle_feature(
        &mut self,
        feature: Feature,
        active: bool,
        confirmed: bool,
    ) -> Result<FeatureChange> {
        if self.kind != GameKind::Times {
            return Err(EngineError::FeaturesUnsupported(self.kind));
        }

        let change = if active {
            self.features.activate(&mut self.store, feature)
        } else {
            let affected = closure(feature, |f| f.dependents())
                .into_iter()
                .any(|f| self.features.is_active(f));
            if !affected {
                return Ok(FeatureChange::default());
            }
            if !confirmed {
                return Err(EngineError::ConfirmationRequired(feature));
            }
            self.features.deactivate(&mut self.store, feature)
        };

        if change.cards_removed > 0 {
            self.prune_round();
        }

        if change != FeatureChange::default() {
            self.persist(Dataset::Features);
            self.persist(Dataset::Cards);
            tracing::info!(
                activated = ?change.activated,
                deactivated = ?change.deactivated,
                added = change.cards_added,
                removed = change.cards_removed,
                "features changed"
            );
        }
        Ok(change)
    }

    /// Reset every card in the store to level 1 and the slowest time.
    /// Returns the number of cards in the store.
    pub fn reset_progress(&mut self, confirmed: bool) -> Result<usize> {
        if !confirmed {
            return Err(EngineError::ResetNotConfirmed);
        }
        if self.round.is_some() {
            return Err(EngineError::RoundInProgress);
        }
        self.store.initialize(self.source, self.seed.clone(), true);
        let active: Vec<Feature> = self.features.iter().collect();
        for feature in active {
            self.store.initialize(feature.as_str(), feature.cards(), true);
        }
        // Cards no longer in any seed, e.g. words dropped from the list.
        let leftovers: Vec<Card> = self
            .store
            .iter()
            .filter_map(|card| {
                let fresh = Card::new(card.prompt.clone());
                (fresh != *card).then_some(fresh)
            })
            .collect();
        for card in leftovers {
            self.store.replace(card);
        }
        let reset = self.store.len();
        self.persist(Dataset::Cards);
        tracing::info!(game = %self.kind, cards = reset, "progress reset");
        Ok(reset)
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.store.iter()
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.store.get(id)
    }

    pub fn active_features(&self) -> Vec<Feature> {
        self.features.iter().collect()
    }

    /// Topics a selection can name for the cards in the store.
    pub fn topics(&self) -> BTreeSet<Topic> {
        self.store
            .iter()
            .flat_map(|card| match &card.prompt {
                Prompt::Product { x, y } => vec![Topic::Factor(*x), Topic::Factor(*y)],
                Prompt::Word { unit, .. } => vec![Topic::Unit(unit.clone())],
            })
            .collect()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last_config(&self) -> Option<&GameConfig> {
        self.last_config.as_ref()
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn round_view(&self) -> Option<RoundView> {
        let round = self.round.as_ref()?;
        Some(RoundView {
            id: round.id,
            cards: round
                .cards
                .iter()
                .filter_map(|id| self.store.get(id).cloned())
                .collect(),
            answered: round.answers.len(),
            current: round.current().cloned(),
            timer: self.countdown.current(),
            seconds: self.countdown.remaining().unwrap_or(0.0),
        })
    }

    pub fn stats(&self) -> Stats {
        self.stats_at(&Local::now())
    }

    pub fn stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Stats {
        Stats {
            cards: card_stats(self.store.iter()),
            history: history_stats(&self.history, now),
        }
    }

    /// Storage warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}
