//! Ordered event dispatch chain
//!
//! Events pass through the registered consumers in order: the application's
//! internal stage first, then the engine stage, then the simulation stage.
//! A stage that returns `Consumed` stops the chain; the last stage is
//! terminal by position, so its verdict never gates anything.

use crate::event::Event;

/// Whether an event continues down the chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventFlow {
    /// Fully handled; later stages never see the event
    Consumed,
    /// Not handled here; pass to the next stage
    Pass,
}

/// A stage in the dispatch chain
pub trait EventConsumer {
    /// Handle one event. Returning `Consumed` stops the chain.
    fn process_event(&mut self, event: &Event) -> EventFlow;

    /// Human-readable name for this stage
    fn name(&self) -> &str;
}

/// Result of dispatching one event
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchOutcome {
    /// Name of the stage that consumed the event, if any
    pub consumed_by: Option<String>,
}

/// Ordered chain of event consumers
#[derive(Default)]
pub struct DispatchChain {
    stages: Vec<Box<dyn EventConsumer>>,
}

impl DispatchChain {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage. Stages run in registration order.
    pub fn push(&mut self, stage: Box<dyn EventConsumer>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Deliver an event to each stage in order, stopping at the first
    /// `Consumed`.
    pub fn dispatch(&mut self, event: &Event) -> DispatchOutcome {
        for stage in &mut self.stages {
            if stage.process_event(event) == EventFlow::Consumed {
                return DispatchOutcome {
                    consumed_by: Some(stage.name().to_string()),
                };
            }
        }
        DispatchOutcome { consumed_by: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Recorder {
        name: String,
        seen: Arc<AtomicUsize>,
        consume: bool,
    }

    impl EventConsumer for Recorder {
        fn process_event(&mut self, _event: &Event) -> EventFlow {
            self.seen.fetch_add(1, Ordering::SeqCst);
            if self.consume {
                EventFlow::Consumed
            } else {
                EventFlow::Pass
            }
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn recorder(name: &str, consume: bool) -> (Box<Recorder>, Arc<AtomicUsize>) {
        let seen = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Recorder {
                name: name.to_string(),
                seen: seen.clone(),
                consume,
            }),
            seen,
        )
    }

    #[test]
    fn pass_through_reaches_all_stages() {
        let mut chain = DispatchChain::new();
        let (app, app_seen) = recorder("app", false);
        let (engine, engine_seen) = recorder("engine", false);
        let (sim, sim_seen) = recorder("sim", false);
        chain.push(app);
        chain.push(engine);
        chain.push(sim);

        let outcome = chain.dispatch(&Event::new(EventKind::Quit));
        assert_eq!(outcome.consumed_by, None);
        assert_eq!(app_seen.load(Ordering::SeqCst), 1);
        assert_eq!(engine_seen.load(Ordering::SeqCst), 1);
        assert_eq!(sim_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn consumed_stops_the_chain() {
        let mut chain = DispatchChain::new();
        let (app, app_seen) = recorder("app", false);
        let (engine, engine_seen) = recorder("engine", true);
        let (sim, sim_seen) = recorder("sim", false);
        chain.push(app);
        chain.push(engine);
        chain.push(sim);

        let outcome = chain.dispatch(&Event::new(EventKind::FocusLost));
        assert_eq!(outcome.consumed_by.as_deref(), Some("engine"));
        assert_eq!(app_seen.load(Ordering::SeqCst), 1);
        assert_eq!(engine_seen.load(Ordering::SeqCst), 1);
        assert_eq!(sim_seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn first_consumer_wins() {
        let mut chain = DispatchChain::new();
        let (app, _) = recorder("app", true);
        let (engine, engine_seen) = recorder("engine", true);
        chain.push(app);
        chain.push(engine);

        let outcome = chain.dispatch(&Event::new(EventKind::CloseRequested));
        assert_eq!(outcome.consumed_by.as_deref(), Some("app"));
        assert_eq!(engine_seen.load(Ordering::SeqCst), 0);
    }
}
