//! Fluent builder for constructing a [`World`].

use lift_core::SimConfig;

use crate::{SimResult, World, WorldObserver, WorldSnapshot};

/// Fluent builder for [`World`].
///
/// # Example
///
/// ```rust,ignore
/// let output = Rc::new(RefCell::new(SimOutputObserver::new(writer, 20)));
/// let mut world = WorldBuilder::new(config)
///     .observer(Rc::clone(&output))
///     .build()?;
/// world.run_steps(1_000);
/// ```
pub struct WorldBuilder {
    config:    SimConfig,
    observers: Vec<Box<dyn WorldObserver>>,
    snapshot:  Option<WorldSnapshot>,
}

impl WorldBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, observers: Vec::new(), snapshot: None }
    }

    /// Register an observer from the very first step.
    pub fn observer<O: WorldObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Resume from a saved snapshot instead of starting fresh.
    pub fn resume_from(mut self, snapshot: WorldSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Validate the configuration and return a ready-to-run [`World`].
    pub fn build(self) -> SimResult<World> {
        self.config.validate()?;
        let mut world = match self.snapshot {
            Some(snapshot) => World::restore(self.config, snapshot),
            None => World::fresh(self.config),
        };
        world.observers = self.observers;
        Ok(world)
    }
}
