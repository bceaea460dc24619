/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually a fieldless enum). The machine tracks the
/// current state, the previous state, how long it has been in the current
/// state and how many transitions have fired. Transition rules live with
/// whoever drives the machine (see `systems/boss.rs`), not here.
///
/// # Usage
/// ```
/// use snailboss::fsm::StateMachine;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Light { Red, Green }
///
/// let mut fsm = StateMachine::new(Light::Red);
/// assert!(fsm.go(Light::Green));
/// fsm.tick(0.5);
/// assert_eq!(fsm.previous, Light::Red);
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine<S: Copy + PartialEq> {
    pub state: S,
    pub previous: S,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
    transitions: u32,
    entered_this_tick: bool,
}

impl<S: Copy + PartialEq> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    /// `just_entered()` returns `true` until the first `tick`.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            previous: initial,
            elapsed: 0.0,
            transitions: 0,
            entered_this_tick: true,
        }
    }

    /// Transition to `next` if it differs from the current state.
    /// Returns `true` when a transition fired.
    pub fn go(&mut self, next: S) -> bool {
        if self.state == next {
            return false;
        }
        self.force_go(next);
        true
    }

    /// Always transitions, even into the same state. Restarts the timer.
    pub fn force_go(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.transitions += 1;
        self.entered_this_tick = true;
    }

    /// Advance the time-in-state and clear the `just_entered` flag.
    /// Call once per tick **after** transitions are processed.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_tick = false;
    }

    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }

    /// Number of transitions since construction.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn is(&self, state: S) -> bool {
        self.state == state
    }
}
