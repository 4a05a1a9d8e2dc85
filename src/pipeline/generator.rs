//! The generator: owns the host, the RNG and the pipeline state, and advances
//! one stage per tick.

use rand::Rng;

use super::state::{Connection, PipelineState, Stage};
use crate::config::{Connectivity, GenerationConfig};
use crate::constants::{HALLWAY_LINE_COLOR, TREE_LINE_COLOR, TRIANGLE_LINE_COLOR};
use crate::delaunay;
use crate::error::Result;
use crate::events::{EventQueue, GenerationEvent};
use crate::geometry::{Point2D, Segment};
use crate::hallways;
use crate::host::{RoomHandle, RoomHost, SegmentSink};
use crate::layout::DungeonLayout;
use crate::mst::{Edge, MinSpanTree};
use crate::selection::{self, SelectionPolicy};
use crate::separation;
use crate::spawning;

pub struct DungeonGenerator<H: RoomHost, R: Rng> {
    config: GenerationConfig,
    host: H,
    rng: R,
    state: PipelineState,
    tree: MinSpanTree,
    events: EventQueue,
    running: bool,
}

impl<H: RoomHost, R: Rng> DungeonGenerator<H, R> {
    /// Build a stopped generator. Fails if `config` is inconsistent.
    pub fn new(config: GenerationConfig, host: H, rng: R) -> Result<Self> {
        if let Err(err) = config.validate() {
            log::error!("rejected generation config: {err}");
            return Err(err);
        }
        let tree = MinSpanTree::new(config.edge_order);
        Ok(Self {
            config,
            host,
            rng,
            state: PipelineState::new(),
            tree,
            events: EventQueue::new(),
            running: false,
        })
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pause; ticks do nothing until `start` is called again
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Drain everything emitted since the last call
    pub fn events(&mut self) -> impl Iterator<Item = GenerationEvent> + '_ {
        self.events.drain()
    }

    /// Snapshot of the rooms and connectivity produced so far
    pub fn layout(&self) -> Result<DungeonLayout> {
        DungeonLayout::capture(&self.host, &self.state)
    }

    /// Destroy every room this run created and go back to `SpawnRooms`.
    /// The running flag is left as it was.
    pub fn restart(&mut self) {
        puffin::profile_function!();

        let mut destroyed = 0;
        for room in std::mem::take(&mut self.state.rooms) {
            match self.host.destroy_room(room) {
                Ok(()) => destroyed += 1,
                Err(err) => log::warn!("restart could not destroy {room:?}: {err}"),
            }
        }
        log::info!("restarting generation, destroyed {destroyed} rooms");

        self.state.reset();
        self.tree.reset();
        self.events
            .push(GenerationEvent::StageEntered { stage: Stage::SpawnRooms });
    }

    /// Advance the pipeline by one step and return the stage it is in afterwards.
    ///
    /// Does nothing while stopped or once finished. A failure while spawning
    /// halts the machine at `Stage::None` and is returned.
    pub fn tick(&mut self, dt: f32, sink: &mut dyn SegmentSink) -> Result<Stage> {
        puffin::profile_function!();

        if !self.running || self.state.is_finished() {
            return Ok(self.state.stage);
        }
        self.state.ticks += 1;

        match self.state.stage {
            Stage::SpawnRooms => self.spawn_rooms()?,
            Stage::SeparateRooms => self.separate_rooms()?,
            Stage::HighlightMainRooms => self.highlight_main_rooms()?,
            Stage::DistantiateRooms => self.distantiate_rooms()?,
            Stage::DrawDelTriangles => self.draw_triangles(sink)?,
            Stage::DrawMinSpanTree => self.draw_min_span_tree(sink),
            Stage::DrawHallWays => self.draw_hallways(sink),
            Stage::Waiting => self.wait(dt),
            Stage::None => {}
        }

        Ok(self.state.stage)
    }

    /// Start and tick until finished or `max_ticks` ticks have run.
    /// Returns the number of ticks used.
    pub fn run_to_completion(
        &mut self,
        dt: f32,
        sink: &mut dyn SegmentSink,
        max_ticks: u64,
    ) -> Result<u64> {
        self.start();
        let mut ticks = 0;
        while !self.state.is_finished() && ticks < max_ticks {
            self.tick(dt, sink)?;
            ticks += 1;
        }
        if !self.state.is_finished() {
            log::warn!(
                "generation still in {} after {max_ticks} ticks",
                self.state.stage
            );
        }
        Ok(ticks)
    }

    fn enter(&mut self, stage: Stage) {
        log::info!("{} -> {}", self.state.stage, stage);
        self.state.stage = stage;
        self.events.push(GenerationEvent::StageEntered { stage });
    }

    /// Pause for `wait_duration`, then continue at `next`
    fn wait_then(&mut self, next: Stage) {
        self.state.resume_stage = Some(next);
        self.state.wait_elapsed = 0.0;
        self.enter(Stage::Waiting);
    }

    fn wait(&mut self, dt: f32) {
        self.state.wait_elapsed += dt;
        if self.state.wait_elapsed >= self.config.wait_duration {
            self.state.wait_elapsed = 0.0;
            let next = self.state.resume_stage.take().unwrap_or(Stage::None);
            self.enter(next);
        }
    }

    fn settle_cap_reached(&self) -> bool {
        self.config
            .max_settle_iterations
            .is_some_and(|max| self.state.settle_iterations >= max)
    }

    fn set_moving(&mut self, rooms: &[RoomHandle], moving: bool) -> Result<()> {
        for &room in rooms {
            self.host.update_flags(room, |flags| flags.to_move = moving)?;
        }
        Ok(())
    }

    fn spawn_rooms(&mut self) -> Result<()> {
        puffin::profile_function!();

        match spawning::spawn_rooms(&mut self.host, &mut self.rng, &self.config) {
            Ok(rooms) => {
                log::info!("spawned {} rooms", rooms.len());
                self.events
                    .push(GenerationEvent::RoomsSpawned { count: rooms.len() });
                self.state.rooms = rooms;
                self.state.settle_iterations = 0;
                self.enter(Stage::SeparateRooms);
                Ok(())
            }
            Err(err) => {
                log::error!("generation halted while spawning rooms: {err}");
                self.enter(Stage::None);
                self.stop();
                Err(err)
            }
        }
    }

    fn separate_rooms(&mut self) -> Result<()> {
        puffin::profile_function!();

        let anchor = self.config.spawn_center;
        let step = self.config.separation_step;
        let mut settled = true;
        for &room in &self.state.rooms {
            if !self.host.flags(room)?.to_move {
                continue;
            }
            settled &= separation::separate_once(&mut self.host, room, anchor, step)?;
        }
        self.state.settle_iterations += 1;

        let iterations = self.state.settle_iterations;
        if settled {
            log::debug!("rooms separated after {iterations} iterations");
            self.events.push(GenerationEvent::RoomsSettled { iterations });
        } else if self.settle_cap_reached() {
            log::warn!("rooms still overlap after {iterations} iterations, moving on");
            self.events.push(GenerationEvent::DidNotConverge {
                stage: Stage::SeparateRooms,
                iterations,
            });
        } else {
            return Ok(());
        }

        let rooms = self.state.rooms.clone();
        self.set_moving(&rooms, false)?;
        self.enter(Stage::HighlightMainRooms);
        Ok(())
    }

    fn highlight_main_rooms(&mut self) -> Result<()> {
        puffin::profile_function!();

        let policy = SelectionPolicy::from_config(&self.config);
        let outcome =
            selection::select_main_rooms(&mut self.host, &self.state.rooms, &mut self.rng, &policy)?;
        self.events.push(GenerationEvent::MainRoomsSelected {
            kept: outcome.main_rooms.len(),
            destroyed: outcome.destroyed,
        });

        // Everything that survived is a main room
        self.state.rooms = outcome.main_rooms.clone();
        self.state.main_rooms = outcome.main_rooms;
        let main_rooms = self.state.main_rooms.clone();
        self.set_moving(&main_rooms, true)?;

        self.state.settle_iterations = 0;
        self.enter(Stage::DistantiateRooms);
        Ok(())
    }

    fn distantiate_rooms(&mut self) -> Result<()> {
        puffin::profile_function!();

        let settled = separation::enforce_min_distance(
            &mut self.host,
            &self.state.main_rooms,
            self.config.min_distance,
            self.config.distance_step,
        )?;
        self.state.settle_iterations += 1;

        let iterations = self.state.settle_iterations;
        if settled {
            log::debug!("main rooms spread out after {iterations} iterations");
            self.events.push(GenerationEvent::DistancesSettled { iterations });
        } else if self.settle_cap_reached() {
            log::warn!("main rooms still too close after {iterations} iterations, moving on");
            self.events.push(GenerationEvent::DidNotConverge {
                stage: Stage::DistantiateRooms,
                iterations,
            });
        } else {
            return Ok(());
        }

        let main_rooms = self.state.main_rooms.clone();
        self.set_moving(&main_rooms, false)?;
        self.enter(Stage::DrawDelTriangles);
        Ok(())
    }

    fn draw_triangles(&mut self, sink: &mut dyn SegmentSink) -> Result<()> {
        puffin::profile_function!();

        self.state.room_locations.clear();
        self.state.points.clear();
        for &room in &self.state.main_rooms {
            let location = Point2D::from_world(self.host.get_position(room)?);
            self.state.room_locations.insert(location, room);
            self.state.points.push(location.to_vec2());
        }

        self.state.triangles = delaunay::triangulate(&self.state.points);
        let points = self.state.points.len();
        if self.state.triangles.is_empty() {
            log::warn!("cannot triangulate {points} room centers, no connections will be drawn");
            self.events
                .push(GenerationEvent::DegenerateGeometry { points });
        } else {
            log::info!(
                "triangulated {points} rooms into {} triangles",
                self.state.triangles.len()
            );
            self.events.push(GenerationEvent::Triangulated {
                points,
                triangles: self.state.triangles.len(),
            });
        }

        let height = self.config.plane_height;
        let duration = self.config.wait_duration;
        for triangle in &self.state.triangles {
            for (i, j) in triangle.edges() {
                let segment = Segment::new(self.state.points[i], self.state.points[j]);
                let (p0, p1) = segment.to_world(height);
                sink.draw_segment(p0, p1, TRIANGLE_LINE_COLOR, false, duration);
            }
        }

        self.wait_then(Stage::DrawMinSpanTree);
        Ok(())
    }

    fn draw_min_span_tree(&mut self, sink: &mut dyn SegmentSink) {
        puffin::profile_function!();

        self.tree.reset();
        self.tree.set_order(self.config.edge_order);
        for triangle in &self.state.triangles {
            let [a, b, c] = triangle
                .vertices()
                .map(|i| Point2D::from(self.state.points[i]));
            self.tree.add_triangle(a, b, c);
        }

        let edges = match self.config.connectivity {
            Connectivity::Minimal => self.tree.min_cost_pairs(),
            Connectivity::Natural => self
                .tree
                .natural_cost_pairs(&mut self.rng, self.config.reintroduce_chance),
        };

        let tree_edges = self.tree.tree_edge_count();
        let extra = edges.len().saturating_sub(tree_edges);
        log::info!(
            "spanning tree: {tree_edges} edges, {extra} reintroduced, cost {:.1}",
            self.tree.cost()
        );
        self.events.push(GenerationEvent::SpanningTreeBuilt {
            edges: tree_edges,
            extra,
            cost: self.tree.cost(),
        });

        self.state.connections = edges
            .iter()
            .filter_map(|edge| self.connect(edge))
            .collect();

        let height = self.config.plane_height;
        let duration = self.config.wait_duration;
        for connection in &self.state.connections {
            let segment = Segment::new(connection.edge.a.to_vec2(), connection.edge.b.to_vec2());
            let (p0, p1) = segment.to_world(height);
            sink.draw_segment(p0, p1, TREE_LINE_COLOR, false, duration);
        }

        self.wait_then(Stage::DrawHallWays);
    }

    fn connect(&self, edge: &Edge) -> Option<Connection> {
        match (self.state.room_at(edge.a), self.state.room_at(edge.b)) {
            (Some(from), Some(to)) => Some(Connection {
                from,
                to,
                edge: *edge,
            }),
            _ => {
                log::warn!("no room recorded at an end of {edge:?}");
                None
            }
        }
    }

    fn draw_hallways(&mut self, sink: &mut dyn SegmentSink) {
        puffin::profile_function!();

        let edges: Vec<Edge> = self.state.connections.iter().map(|c| c.edge).collect();
        self.state.hallways = hallways::synthesize_all(&edges);
        hallways::draw_hallways(
            sink,
            &self.state.hallways,
            self.config.plane_height,
            HALLWAY_LINE_COLOR,
        );

        let total: f32 = self.state.hallways.iter().map(|h| h.length()).sum();
        log::info!(
            "built {} hallways, {total:.1} units of corridor",
            self.state.hallways.len()
        );
        self.events.push(GenerationEvent::HallwaysBuilt {
            count: self.state.hallways.len(),
        });
        self.enter(Stage::None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::RoomArena;
    use crate::debug_draw::DebugLines;
    use crate::host::NullSink;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator(config: GenerationConfig, seed: u64) -> DungeonGenerator<RoomArena, StdRng> {
        let arena = RoomArena::new(config.footprint_unit);
        DungeonGenerator::new(config, arena, StdRng::seed_from_u64(seed)).unwrap()
    }

    fn small_config() -> GenerationConfig {
        GenerationConfig {
            room_count: 8,
            spawn_radius: 100.0,
            min_distance: 40.0,
            wait_duration: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_stopped_generator_does_nothing() {
        let mut dungeon = generator(small_config(), 1);
        assert_eq!(dungeon.tick(0.1, &mut NullSink).unwrap(), Stage::SpawnRooms);
        assert!(dungeon.host().is_empty());
        assert_eq!(dungeon.state().ticks, 0);
    }

    #[test]
    fn test_first_tick_spawns_rooms() {
        let mut dungeon = generator(small_config(), 1);
        dungeon.start();
        assert_eq!(dungeon.tick(0.1, &mut NullSink).unwrap(), Stage::SeparateRooms);
        assert_eq!(dungeon.host().len(), 8);
        assert_eq!(dungeon.state().rooms.len(), 8);

        let events: Vec<_> = dungeon.events().collect();
        assert!(events.contains(&GenerationEvent::RoomsSpawned { count: 8 }));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GenerationConfig {
            footprint_min: 9,
            footprint_max: 3,
            ..Default::default()
        };
        let arena = RoomArena::new(config.footprint_unit);
        let err = DungeonGenerator::new(config, arena, StdRng::seed_from_u64(0))
            .err()
            .unwrap();
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn test_waiting_resumes_after_wait_duration() {
        let mut dungeon = generator(small_config(), 3);
        dungeon.start();
        dungeon.state.stage = Stage::Waiting;
        dungeon.state.resume_stage = Some(Stage::DrawHallWays);

        assert_eq!(dungeon.tick(0.2, &mut NullSink).unwrap(), Stage::Waiting);
        assert_eq!(dungeon.tick(0.2, &mut NullSink).unwrap(), Stage::Waiting);
        assert_eq!(dungeon.tick(0.2, &mut NullSink).unwrap(), Stage::DrawHallWays);
        assert_eq!(dungeon.state().wait_elapsed, 0.0);
        assert!(dungeon.state().resume_stage.is_none());
    }

    #[test]
    fn test_settle_cap_moves_on() {
        let config = GenerationConfig {
            max_settle_iterations: Some(1),
            ..small_config()
        };
        let mut dungeon = generator(config, 0);
        dungeon.start();
        dungeon.state.stage = Stage::SeparateRooms;
        // Two rooms stacked on top of each other cannot separate in one step
        let a = dungeon
            .host_mut()
            .create_room(Vec3::ZERO, crate::components::Footprint::new(12, 12, 0))
            .unwrap();
        let b = dungeon
            .host_mut()
            .create_room(Vec3::ZERO, crate::components::Footprint::new(12, 12, 0))
            .unwrap();
        dungeon.set_moving(&[a, b], true).unwrap();
        dungeon.state.rooms = vec![a, b];

        assert_eq!(dungeon.tick(0.1, &mut NullSink).unwrap(), Stage::HighlightMainRooms);
        let events: Vec<_> = dungeon.events().collect();
        assert!(events.contains(&GenerationEvent::DidNotConverge {
            stage: Stage::SeparateRooms,
            iterations: 1,
        }));
        assert!(!dungeon.host().flags(a).unwrap().to_move);
    }

    #[test]
    fn test_full_run_draws_and_finishes() {
        let mut dungeon = generator(small_config(), 11);
        let mut lines = DebugLines::new();
        let ticks = dungeon.run_to_completion(0.1, &mut lines, 100_000).unwrap();

        assert!(dungeon.is_finished());
        assert!(ticks > 0);
        let hallways = dungeon.state().hallways.len();
        assert_eq!(hallways, dungeon.state().connections.len());
        assert_eq!(lines.iter().filter(|l| l.persistent).count(), hallways * 2);
    }

    fn spanning_tree_event(dungeon: &mut DungeonGenerator<RoomArena, StdRng>) -> (usize, usize) {
        dungeon
            .events()
            .find_map(|e| match e {
                GenerationEvent::SpanningTreeBuilt { edges, extra, .. } => Some((edges, extra)),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_spanning_tree_event_counts_tree_and_extra_edges() {
        let keep_all = GenerationConfig {
            main_room_chance: 1.0,
            discard_chance: 0.0,
            ..small_config()
        };

        let minimal = GenerationConfig {
            connectivity: Connectivity::Minimal,
            ..keep_all.clone()
        };
        let mut dungeon = generator(minimal, 21);
        dungeon.run_to_completion(0.1, &mut NullSink, 100_000).unwrap();
        let used = delaunay::used_vertices(&dungeon.state().triangles).len();
        assert!(used >= 3);
        let (edges, extra) = spanning_tree_event(&mut dungeon);
        assert_eq!((edges, extra), (used - 1, 0));

        let loopy = GenerationConfig {
            connectivity: Connectivity::Natural,
            reintroduce_chance: 1.0,
            ..keep_all
        };
        let mut dungeon = generator(loopy, 21);
        dungeon.run_to_completion(0.1, &mut NullSink, 100_000).unwrap();
        let (edges, extra) = spanning_tree_event(&mut dungeon);
        assert_eq!(edges + extra, dungeon.state().connections.len());
        // Every shared triangle side comes back as a cycle edge
        assert_eq!(
            edges + extra,
            delaunay::vertex_incidence(&dungeon.state().triangles)
        );
    }

    #[test]
    fn test_restart_destroys_rooms() {
        let mut dungeon = generator(small_config(), 4);
        dungeon.start();
        dungeon.tick(0.1, &mut NullSink).unwrap();
        assert!(!dungeon.host().is_empty());

        dungeon.restart();
        assert!(dungeon.host().is_empty());
        assert_eq!(dungeon.stage(), Stage::SpawnRooms);
        assert!(dungeon.is_running());
        assert_eq!(dungeon.tick(0.1, &mut NullSink).unwrap(), Stage::SeparateRooms);
    }
}
