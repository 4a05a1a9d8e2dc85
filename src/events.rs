//! Generation events for observers of the pipeline.
//!
//! The pipeline pushes events as stages complete; the caller drains them
//! after each tick. Debug drawing, logging front-ends and tests can react
//! without being wired into the stages themselves.

use crate::pipeline::Stage;

/// Events the generator emits while advancing
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// The pipeline moved to a new stage
    StageEntered { stage: Stage },
    /// Initial rooms were created
    RoomsSpawned { count: usize },
    /// No room overlaps any other
    RoomsSettled { iterations: u32 },
    /// Main rooms were chosen and the rest destroyed
    MainRoomsSelected { kept: usize, destroyed: usize },
    /// Every pair of main rooms is at least the minimum distance apart
    DistancesSettled { iterations: u32 },
    /// A settling stage hit its iteration cap and was abandoned
    DidNotConverge { stage: Stage, iterations: u32 },
    Triangulated { points: usize, triangles: usize },
    /// Room centers were too few or collinear to triangulate
    DegenerateGeometry { points: usize },
    /// `edges` tree edges plus `extra` reintroduced cycle edges
    SpanningTreeBuilt { edges: usize, extra: usize, cost: f32 },
    HallwaysBuilt { count: usize },
}

/// Simple event queue - events are pushed during a tick, drained by the caller
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GenerationEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GenerationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_in_push_order() {
        let mut queue = EventQueue::new();
        queue.push(GenerationEvent::RoomsSpawned { count: 3 });
        queue.push(GenerationEvent::HallwaysBuilt { count: 2 });
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                GenerationEvent::RoomsSpawned { count: 3 },
                GenerationEvent::HallwaysBuilt { count: 2 },
            ]
        );
        assert!(queue.is_empty());
    }
}
