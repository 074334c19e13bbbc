//! The state machine and the contract every state implements.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use bevy::log::debug;

use super::error::StateMachineError;
use super::event::AnimationEvent;
use super::timer::StateCore;

/// Identity of a state inside one machine. Usually a fieldless enum.
pub trait StateKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> StateKey for T where T: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Lifecycle phase a [`Scope`] was handed out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Update,
    Exit,
    AnimationEvent,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Enter => "enter",
            Phase::Update => "update",
            Phase::Exit => "exit",
            Phase::AnimationEvent => "animation event",
        };
        f.write_str(name)
    }
}

/// What the machine does when asked to enter a key its state set lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTargetPolicy {
    /// Abort. Leaving a stale current state behind is never acceptable.
    Panic,
    /// Enter the neutral state instead and report the error.
    FallbackToNeutral,
}

impl Default for InvalidTargetPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            InvalidTargetPolicy::Panic
        } else {
            InvalidTargetPolicy::FallbackToNeutral
        }
    }
}

/// Handle given to a state for the duration of one lifecycle call.
///
/// Exposes the state's own [`StateCore`] and the transition requester.
/// `change_state` is honoured only from `update`; from any other phase the
/// request is rejected and reported. `defer` queues a transition for the next
/// tick boundary and is allowed everywhere.
pub struct Scope<'a, K> {
    key: K,
    core: &'a mut StateCore,
    phase: Phase,
    requested: Option<K>,
    deferred: Option<K>,
    rejected: Option<K>,
}

struct Requests<K> {
    requested: Option<K>,
    deferred: Option<K>,
    rejected: Option<K>,
}

impl<'a, K: StateKey> Scope<'a, K> {
    fn new(key: K, core: &'a mut StateCore, phase: Phase) -> Self {
        Self {
            key,
            core,
            phase,
            requested: None,
            deferred: None,
            rejected: None,
        }
    }

    fn finish(self) -> Requests<K> {
        Requests {
            requested: self.requested,
            deferred: self.deferred,
            rejected: self.rejected,
        }
    }

    /// Key of the state this scope belongs to.
    pub fn key(&self) -> K {
        self.key
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn core(&self) -> &StateCore {
        &*self.core
    }

    pub fn core_mut(&mut self) -> &mut StateCore {
        &mut *self.core
    }

    pub fn timer(&self) -> f32 {
        self.core.timer()
    }

    pub fn set_timer(&mut self, seconds: f32) {
        self.core.set_timer(seconds);
    }

    pub fn timer_elapsed(&self) -> bool {
        self.core.is_elapsed()
    }

    pub fn trigger_called(&self) -> bool {
        self.core.trigger_called()
    }

    /// Request a transition once the current `update` returns.
    ///
    /// The first request of a call wins.
    pub fn change_state(&mut self, next: K) {
        if self.phase == Phase::Update {
            if self.requested.is_none() {
                self.requested = Some(next);
            }
        } else {
            self.rejected.get_or_insert(next);
        }
    }

    /// Request a transition at the start of the next tick.
    pub fn defer(&mut self, next: K) {
        self.deferred = Some(next);
    }

    /// Whether this call already requested a transition.
    pub fn is_leaving(&self) -> bool {
        self.requested.is_some()
    }
}

/// Contract implemented by every concrete state.
///
/// `C` is the actor's per-tick context: its body, intent, tuning and the
/// world queries it may run.
pub trait State<K: StateKey, C> {
    /// One-time setup for an activation.
    fn enter(&mut self, _scope: &mut Scope<'_, K>, _ctx: &mut C) {}

    /// Called once per tick while current, after the timer has advanced.
    fn update(&mut self, scope: &mut Scope<'_, K>, ctx: &mut C);

    /// Release everything `enter` acquired. May run before the state's own
    /// end condition.
    fn exit(&mut self, _scope: &mut Scope<'_, K>, _ctx: &mut C) {}

    /// Side effects for animation markers. The trigger latch for
    /// [`AnimationEvent::Finished`] is already set when this runs.
    fn on_animation_event(&mut self, _event: AnimationEvent, _scope: &mut Scope<'_, K>, _ctx: &mut C) {}
}

/// Lookup from key to state object.
///
/// Implementations match exhaustively on the key enum so a new key cannot be
/// added without a state behind it.
pub trait StateSet<K: StateKey, C> {
    /// The state object for `key`, or `None` when this set leaves it out.
    fn state_mut(&mut self, key: K) -> Option<&mut dyn State<K, C>>;

    /// Terminal states are never exited.
    fn is_terminal(&self, _key: K) -> bool {
        false
    }
}

/// Holds exactly one current state and performs exit-before-enter
/// transitions between the states of `S`.
#[derive(Debug)]
pub struct StateMachine<K: StateKey, S> {
    states: S,
    cores: HashMap<K, StateCore>,
    current: Option<K>,
    previous: Option<K>,
    neutral: Option<K>,
    deferred: Option<K>,
    terminal: bool,
    policy: InvalidTargetPolicy,
    activations: u64,
}

fn label<K: fmt::Debug>(key: K) -> String {
    format!("{key:?}")
}

impl<K: StateKey, S> StateMachine<K, S> {
    pub fn new(states: S) -> Self {
        Self {
            states,
            cores: HashMap::new(),
            current: None,
            previous: None,
            neutral: None,
            deferred: None,
            terminal: false,
            policy: InvalidTargetPolicy::default(),
            activations: 0,
        }
    }

    /// State entered when a transition names a key the set does not have.
    pub fn with_neutral(mut self, neutral: K) -> Self {
        self.neutral = Some(neutral);
        self
    }

    pub fn with_policy(mut self, policy: InvalidTargetPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn previous(&self) -> Option<K> {
        self.previous
    }

    pub fn is_in(&self, key: K) -> bool {
        self.current == Some(key)
    }

    /// True once a terminal state has been entered.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Number of `enter` calls so far. Changes on every activation, including
    /// re-entering the same key.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    pub fn pending(&self) -> Option<K> {
        self.deferred
    }

    pub fn states(&self) -> &S {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut S {
        &mut self.states
    }

    pub fn core(&self, key: K) -> Option<&StateCore> {
        self.cores.get(&key)
    }

    pub fn current_core(&self) -> Option<&StateCore> {
        self.current.and_then(|key| self.cores.get(&key))
    }

    /// Enter `initial`. Must happen once, before any tick.
    pub fn initialize<C>(&mut self, initial: K, ctx: &mut C) -> Result<(), StateMachineError>
    where
        S: StateSet<K, C>,
    {
        if let Some(current) = self.current {
            return Err(StateMachineError::AlreadyInitialized {
                current: label(current),
            });
        }
        if self.states.state_mut(initial).is_none() {
            return Err(StateMachineError::InvalidTarget {
                requested: label(initial),
                fallback: None,
            });
        }
        debug!("state machine initialized in {:?}", initial);
        self.enter(initial, ctx)
    }

    /// Exit the current state, then enter `next`.
    pub fn change_state<C>(&mut self, next: K, ctx: &mut C) -> Result<(), StateMachineError>
    where
        S: StateSet<K, C>,
    {
        self.transition(next, ctx)
    }

    /// Advance the current state's timer by `dt` and run its `update`.
    ///
    /// A transition deferred during the previous tick is applied first.
    pub fn tick<C>(&mut self, dt: f32, ctx: &mut C) -> Result<(), StateMachineError>
    where
        S: StateSet<K, C>,
    {
        if self.current.is_none() {
            return Err(StateMachineError::NotInitialized);
        }

        let mut outcome = Ok(());
        if let Some(next) = self.deferred.take() {
            outcome = self.transition(next, ctx);
        }

        let Some(current) = self.current else {
            return Err(StateMachineError::NotInitialized);
        };

        let core = self.cores.entry(current).or_default();
        core.advance(dt);
        let mut scope = Scope::new(current, core, Phase::Update);
        if let Some(state) = self.states.state_mut(current) {
            state.update(&mut scope, ctx);
        }
        let requests = scope.finish();

        if let Some(next) = requests.deferred {
            self.deferred = Some(next);
        }
        if let Some(next) = requests.requested {
            let result = self.transition(next, ctx);
            if outcome.is_ok() {
                outcome = result;
            }
        }
        outcome
    }

    /// Deliver an animation marker to whichever state is current.
    pub fn on_animation_event<C>(
        &mut self,
        event: AnimationEvent,
        ctx: &mut C,
    ) -> Result<(), StateMachineError>
    where
        S: StateSet<K, C>,
    {
        let Some(current) = self.current else {
            return Err(StateMachineError::NotInitialized);
        };

        let core = self.cores.entry(current).or_default();
        if event.is_finished() {
            core.trigger();
        }
        let mut scope = Scope::new(current, core, Phase::AnimationEvent);
        if let Some(state) = self.states.state_mut(current) {
            state.on_animation_event(event, &mut scope, ctx);
        }
        let requests = scope.finish();

        if let Some(next) = requests.deferred {
            self.deferred = Some(next);
        }
        match requests.rejected {
            Some(next) => Err(StateMachineError::ReentrantTransition {
                phase: Phase::AnimationEvent,
                requested: label(next),
            }),
            None => Ok(()),
        }
    }

    fn transition<C>(&mut self, next: K, ctx: &mut C) -> Result<(), StateMachineError>
    where
        S: StateSet<K, C>,
    {
        let Some(current) = self.current else {
            return Err(StateMachineError::NotInitialized);
        };
        if self.terminal {
            return Err(StateMachineError::Terminal {
                current: label(current),
                requested: label(next),
            });
        }

        let mut fallback = None;
        let target = if self.states.state_mut(next).is_some() {
            next
        } else {
            match self.policy {
                InvalidTargetPolicy::Panic => {
                    panic!("state machine has no state {next:?} (current {current:?})")
                }
                InvalidTargetPolicy::FallbackToNeutral => {
                    let neutral = self
                        .neutral
                        .filter(|&key| key != current && self.states.state_mut(key).is_some());
                    match neutral {
                        Some(key) => {
                            fallback = Some(key);
                            key
                        }
                        None => {
                            return Err(StateMachineError::InvalidTarget {
                                requested: label(next),
                                fallback: None,
                            })
                        }
                    }
                }
            }
        };

        // A deferred request belonged to the activation being replaced.
        self.deferred = None;

        let exited = self.exit(current, ctx);
        self.previous = Some(current);
        let entered = self.enter(target, ctx);
        debug!("{:?} -> {:?}", current, target);

        if let Some(key) = fallback {
            return Err(StateMachineError::InvalidTarget {
                requested: label(next),
                fallback: Some(label(key)),
            });
        }
        exited.and(entered)
    }

    fn enter<C>(&mut self, key: K, ctx: &mut C) -> Result<(), StateMachineError>
    where
        S: StateSet<K, C>,
    {
        self.current = Some(key);
        self.terminal = self.states.is_terminal(key);
        self.activations += 1;

        let core = self.cores.entry(key).or_default();
        core.begin();
        let mut scope = Scope::new(key, core, Phase::Enter);
        if let Some(state) = self.states.state_mut(key) {
            state.enter(&mut scope, ctx);
        }
        let requests = scope.finish();

        if let Some(next) = requests.deferred {
            self.deferred = Some(next);
        }
        match requests.rejected {
            Some(next) => Err(StateMachineError::ReentrantTransition {
                phase: Phase::Enter,
                requested: label(next),
            }),
            None => Ok(()),
        }
    }

    fn exit<C>(&mut self, key: K, ctx: &mut C) -> Result<(), StateMachineError>
    where
        S: StateSet<K, C>,
    {
        let core = self.cores.entry(key).or_default();
        let mut scope = Scope::new(key, &mut *core, Phase::Exit);
        if let Some(state) = self.states.state_mut(key) {
            state.exit(&mut scope, ctx);
        }
        let requests = scope.finish();
        core.clear_trigger();

        // The entered state may still replace this with its own deferral.
        if let Some(next) = requests.deferred {
            self.deferred = Some(next);
        }
        match requests.rejected {
            Some(next) => Err(StateMachineError::ReentrantTransition {
                phase: Phase::Exit,
                requested: label(next),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        A,
        B,
        Done,
        Missing,
    }

    /// Records lifecycle calls and the "resource" each state holds.
    #[derive(Default)]
    struct Log {
        calls: Vec<String>,
        held: Vec<Key>,
        go_to: Option<Key>,
        request_from_enter: Option<Key>,
        defer_from_enter: Option<Key>,
    }

    struct Probe(Key);

    impl State<Key, Log> for Probe {
        fn enter(&mut self, scope: &mut Scope<'_, Key>, log: &mut Log) {
            // Exit of the previous state must already have released its hold.
            assert!(log.held.is_empty(), "entered while {:?} still held", log.held);
            log.held.push(self.0);
            log.calls.push(format!("enter {:?}", self.0));
            scope.set_timer(1.0);
            if let Some(next) = log.request_from_enter.take() {
                scope.change_state(next);
            }
            if let Some(next) = log.defer_from_enter.take() {
                scope.defer(next);
            }
        }

        fn update(&mut self, scope: &mut Scope<'_, Key>, log: &mut Log) {
            log.calls.push(format!("update {:?}", self.0));
            if let Some(next) = log.go_to.take() {
                scope.change_state(next);
            }
        }

        fn exit(&mut self, _scope: &mut Scope<'_, Key>, log: &mut Log) {
            log.held.retain(|k| *k != self.0);
            log.calls.push(format!("exit {:?}", self.0));
        }
    }

    struct Probes {
        a: Probe,
        b: Probe,
        done: Probe,
    }

    impl StateSet<Key, Log> for Probes {
        fn state_mut(&mut self, key: Key) -> Option<&mut dyn State<Key, Log>> {
            match key {
                Key::A => Some(&mut self.a),
                Key::B => Some(&mut self.b),
                Key::Done => Some(&mut self.done),
                Key::Missing => None,
            }
        }

        fn is_terminal(&self, key: Key) -> bool {
            key == Key::Done
        }
    }

    fn machine() -> StateMachine<Key, Probes> {
        StateMachine::new(Probes {
            a: Probe(Key::A),
            b: Probe(Key::B),
            done: Probe(Key::Done),
        })
        .with_neutral(Key::A)
    }

    #[test]
    fn exit_runs_before_enter() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        fsm.change_state(Key::B, &mut log).unwrap();

        assert_eq!(log.calls, vec!["enter A", "exit A", "enter B"]);
        assert_eq!(log.held, vec![Key::B]);
        assert_eq!(fsm.current(), Some(Key::B));
        assert_eq!(fsm.previous(), Some(Key::A));
    }

    #[test]
    fn tick_before_initialize_fails() {
        let mut log = Log::default();
        let mut fsm = machine();
        assert_eq!(fsm.tick(0.1, &mut log), Err(StateMachineError::NotInitialized));
    }

    #[test]
    fn initialize_twice_fails() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        assert!(matches!(
            fsm.initialize(Key::B, &mut log),
            Err(StateMachineError::AlreadyInitialized { .. })
        ));
        assert_eq!(fsm.current(), Some(Key::A));
    }

    #[test]
    fn update_request_applies_after_update() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        log.go_to = Some(Key::B);
        fsm.tick(0.016, &mut log).unwrap();

        assert_eq!(
            log.calls,
            vec!["enter A", "update A", "exit A", "enter B"]
        );
    }

    #[test]
    fn change_state_from_enter_is_rejected() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        log.request_from_enter = Some(Key::A);

        let result = fsm.change_state(Key::B, &mut log);
        assert!(matches!(
            result,
            Err(StateMachineError::ReentrantTransition { phase: Phase::Enter, .. })
        ));
        // The outer transition still completed and nothing else ran.
        assert_eq!(fsm.current(), Some(Key::B));
        assert_eq!(log.calls, vec!["enter A", "exit A", "enter B"]);
    }

    #[test]
    fn deferred_request_lands_on_next_tick() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        log.defer_from_enter = Some(Key::A);
        fsm.change_state(Key::B, &mut log).unwrap();
        assert_eq!(fsm.current(), Some(Key::B));
        assert_eq!(fsm.pending(), Some(Key::A));

        fsm.tick(0.016, &mut log).unwrap();
        assert_eq!(fsm.current(), Some(Key::A));
        assert_eq!(log.calls.last().map(String::as_str), Some("update A"));
    }

    #[test]
    fn terminal_state_refuses_transitions() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        fsm.change_state(Key::Done, &mut log).unwrap();
        assert!(fsm.is_terminal());

        for key in [Key::A, Key::B, Key::Done] {
            assert!(matches!(
                fsm.change_state(key, &mut log),
                Err(StateMachineError::Terminal { .. })
            ));
        }
        assert_eq!(fsm.current(), Some(Key::Done));
        assert_eq!(log.held, vec![Key::Done]);
    }

    #[test]
    fn missing_target_falls_back_to_neutral() {
        let mut log = Log::default();
        let mut fsm = machine().with_policy(InvalidTargetPolicy::FallbackToNeutral);
        fsm.initialize(Key::B, &mut log).unwrap();

        let result = fsm.change_state(Key::Missing, &mut log);
        assert_eq!(
            result,
            Err(StateMachineError::InvalidTarget {
                requested: "Missing".to_string(),
                fallback: Some("A".to_string()),
            })
        );
        assert_eq!(fsm.current(), Some(Key::A));
        assert_eq!(log.held, vec![Key::A]);
    }

    #[test]
    #[should_panic(expected = "no state Missing")]
    fn missing_target_panics_under_panic_policy() {
        let mut log = Log::default();
        let mut fsm = machine().with_policy(InvalidTargetPolicy::Panic);
        fsm.initialize(Key::A, &mut log).unwrap();
        let _ = fsm.change_state(Key::Missing, &mut log);
    }

    #[test]
    fn trigger_latch_does_not_survive_exit() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        fsm.on_animation_event(AnimationEvent::Finished, &mut log).unwrap();
        assert!(fsm.current_core().unwrap().trigger_called());

        fsm.change_state(Key::B, &mut log).unwrap();
        fsm.change_state(Key::A, &mut log).unwrap();
        assert!(!fsm.current_core().unwrap().trigger_called());
    }

    #[test]
    fn activations_count_reentry_of_same_key() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        fsm.change_state(Key::A, &mut log).unwrap();
        assert_eq!(fsm.activations(), 2);
        assert_eq!(log.calls, vec!["enter A", "exit A", "enter A"]);
    }

    #[test]
    fn timer_counts_down_per_tick() {
        let mut log = Log::default();
        let mut fsm = machine();
        fsm.initialize(Key::A, &mut log).unwrap();
        for _ in 0..3 {
            fsm.tick(0.5, &mut log).unwrap();
        }
        let core = fsm.current_core().unwrap();
        assert!(core.is_elapsed());
        assert!((core.timer() + 0.5).abs() < 1e-6);
        assert!((core.elapsed() - 1.5).abs() < 1e-6);
    }
}
