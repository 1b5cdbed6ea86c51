use crate::environment::Environment;
use std::fmt;
use std::rc::Rc;

type Listener = Box<dyn FnMut()>;

/// The robot: a current state inside an environment.
///
/// Listeners are called, in registration order, right after every change of
/// state and never for a move that leaves the state as it was.
pub struct RobotAgent<E: Environment> {
    environment: Rc<E>,
    current: E::State,
    listeners: Vec<Listener>,
}

impl<E: Environment> RobotAgent<E> {
    /// an agent at the environment's initial state
    pub fn new(environment: Rc<E>) -> Self {
        let current = environment.initial_state();
        RobotAgent {
            environment,
            current,
            listeners: Vec::new(),
        }
    }

    /// Applies `action` to the current state. Returns whether the state
    /// changed; listeners have already run by the time this returns.
    pub fn apply_action(&mut self, action: &E::Action) -> bool {
        let next = self.environment.apply_action(&self.current, action);
        self.commit(next)
    }

    /// back to the environment's initial state
    pub fn reset(&mut self) -> bool {
        let initial = self.environment.initial_state();
        self.commit(initial)
    }

    fn commit(&mut self, next: E::State) -> bool {
        if next == self.current {
            return false;
        }

        self.current = next;
        self.notify_listeners();
        true
    }

    fn notify_listeners(&mut self) {
        for listener in &mut self.listeners {
            listener();
        }
    }

    pub fn add_listener(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn current_state(&self) -> &E::State {
        &self.current
    }

    pub fn environment(&self) -> &Rc<E> {
        &self.environment
    }

    pub fn is_at_goal(&self) -> bool {
        self.environment.is_goal(&self.current)
    }
}

impl<E: Environment> fmt::Debug for RobotAgent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotAgent")
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
