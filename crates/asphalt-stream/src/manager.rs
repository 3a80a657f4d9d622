//! Chunk manager: the resident set and its load/unload policy.
//!
//! Per-chunk lifecycle is one-way: `Absent → Requested → Resident →
//! Absent`. A resident chunk is never re-requested, and an outstanding
//! request is never dispatched twice. Loading uses a square (Chebyshev)
//! neighborhood of `load_radius` around the observer; unloading uses a
//! circular (Euclidean) boundary at `load_radius + 1`. The band between
//! the two keeps a chunk from being evicted and immediately re-requested
//! when the observer oscillates near a boundary.

use ahash::{AHashMap, AHashSet};
use asphalt_common::{
    AsphaltResult, ChunkCoord, ColliderHandle, DrawableHandle, MaterializeError, WorldError,
    CHUNK_SIZE,
};
use asphalt_worldgen::{ChunkData, GenerationParams};
use glam::{Vec2, Vec3};
use tracing::{debug, info, warn};

use crate::materialize::{DrawableDesc, PhysicsWorld, Renderer};
use crate::worker::{GenerationRequest, GeneratorPool, DEFAULT_WORKER_COUNT};

/// Default load radius in chunks.
pub const DEFAULT_LOAD_RADIUS: i32 = 3;

/// Configuration for the streaming system.
///
/// Fixed at construction; not re-read at runtime.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Chunk edge length in world units.
    pub chunk_size: f32,
    /// Chebyshev radius (in chunks) around the observer to keep loaded.
    pub load_radius: i32,
    /// Number of generation worker threads.
    pub worker_count: usize,
    /// Chunk generation parameters.
    pub gen_params: GenerationParams,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            load_radius: DEFAULT_LOAD_RADIUS,
            worker_count: DEFAULT_WORKER_COUNT,
            gen_params: GenerationParams::default(),
        }
    }
}

impl StreamConfig {
    /// Creates a config with a custom load radius.
    #[must_use]
    pub fn with_radius(load_radius: i32) -> Self {
        assert!(load_radius > 0, "load radius must be positive");
        Self {
            load_radius,
            ..Self::default()
        }
    }

    /// Euclidean unload boundary in chunks (exclusive).
    #[must_use]
    pub const fn unload_radius(&self) -> i32 {
        self.load_radius + 1
    }
}

/// Streaming state of one chunk key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Not requested and not materialized
    Absent,
    /// Generation request dispatched, result not yet consumed
    Requested,
    /// Materialized with live renderer/physics resources
    Resident,
}

/// A materialized chunk: its generated data plus the resource handles the
/// manager obtained from the collaborators.
///
/// The manager exclusively owns the handles; they are released exactly
/// once, together, when the chunk is evicted.
#[derive(Debug)]
pub struct LoadedChunk {
    /// The generated chunk content
    pub data: ChunkData,
    drawables: Vec<DrawableHandle>,
    colliders: Vec<ColliderHandle>,
}

impl LoadedChunk {
    /// Drawable handles owned by this chunk (read-only).
    #[must_use]
    pub fn drawables(&self) -> &[DrawableHandle] {
        &self.drawables
    }

    /// Collider handles owned by this chunk (read-only).
    #[must_use]
    pub fn colliders(&self) -> &[ColliderHandle] {
        &self.colliders
    }
}

/// Owns the resident chunk set and keeps it converging on the observer.
pub struct ChunkManager {
    config: StreamConfig,
    world_seed: u32,
    pool: GeneratorPool,
    requested: AHashSet<ChunkCoord>,
    resident: AHashMap<ChunkCoord, LoadedChunk>,
    observer_chunk: ChunkCoord,
    dispatched_total: usize,
}

impl ChunkManager {
    /// Creates a manager for the given world seed and spawns its worker
    /// pool.
    pub fn new(world_seed: u32, config: StreamConfig) -> AsphaltResult<Self> {
        let pool = GeneratorPool::new(config.worker_count, config.gen_params.clone())?;
        info!(
            world_seed,
            load_radius = config.load_radius,
            "chunk manager created"
        );
        Ok(Self {
            config,
            world_seed,
            pool,
            requested: AHashSet::new(),
            resident: AHashMap::new(),
            observer_chunk: ChunkCoord::new(0, 0),
            dispatched_total: 0,
        })
    }

    /// The world seed this manager generates from.
    #[must_use]
    pub const fn world_seed(&self) -> u32 {
        self.world_seed
    }

    /// Per-tick update: drain finished generations, request missing chunks
    /// around the observer, evict chunks that drifted out of range.
    ///
    /// Never blocks; generation results not yet finished are picked up by a
    /// later tick.
    pub fn update<R: Renderer, P: PhysicsWorld>(
        &mut self,
        observer: Vec3,
        renderer: &mut R,
        physics: &mut P,
    ) {
        let results: Vec<ChunkData> = self.pool.try_results().collect();
        for data in results {
            self.on_generation_result(data, renderer, physics);
        }

        let center = ChunkCoord::from_world(observer, self.config.chunk_size);
        self.observer_chunk = center;

        // Request missing chunks, center-out so nearby ones finish first.
        for coord in spiral(center, self.config.load_radius) {
            if self.resident.contains_key(&coord) || self.requested.contains(&coord) {
                continue;
            }
            match self.pool.request(GenerationRequest {
                coord,
                world_seed: self.world_seed,
            }) {
                Ok(()) => {
                    self.requested.insert(coord);
                    self.dispatched_total += 1;
                }
                Err(err) => {
                    warn!(chunk = %coord, error = %err, "generation request dropped");
                }
            }
        }

        let unload_sq = i64::from(self.config.unload_radius()).pow(2);
        let to_evict: Vec<ChunkCoord> = self
            .resident
            .keys()
            .filter(|coord| coord.distance_squared(center) > unload_sq)
            .copied()
            .collect();
        for coord in to_evict {
            self.evict(coord, renderer, physics);
        }

        // Advisory cancellation: abandoned requests are not interrupted,
        // their eventual results are discarded as stale.
        self.requested.retain(|coord| {
            let keep = coord.distance_squared(center) <= unload_sq;
            if !keep {
                debug!(chunk = %coord, "in-flight request abandoned");
            }
            keep
        });
    }

    /// Consumes one generation result.
    ///
    /// Materializes the chunk if it is still wanted; discards the result
    /// otherwise. A result for an already-resident or never-requested chunk
    /// is a protocol anomaly: logged and dropped, never fatal.
    pub fn on_generation_result<R: Renderer, P: PhysicsWorld>(
        &mut self,
        data: ChunkData,
        renderer: &mut R,
        physics: &mut P,
    ) {
        let coord = data.coord;
        if self.resident.contains_key(&coord) {
            debug!(chunk = %coord, "result for resident chunk discarded");
            return;
        }
        if !self.requested.remove(&coord) {
            debug!(chunk = %coord, "stale result discarded");
            return;
        }

        match materialize(&data, self.config.chunk_size, renderer, physics) {
            Ok((drawables, colliders)) => {
                debug!(
                    chunk = %coord,
                    drawables = drawables.len(),
                    colliders = colliders.len(),
                    "chunk resident"
                );
                self.resident.insert(
                    coord,
                    LoadedChunk {
                        data,
                        drawables,
                        colliders,
                    },
                );
            }
            Err(err) => {
                // Per-chunk failure: the chunk stays absent and will be
                // re-requested while it is still desired.
                warn!(chunk = %coord, error = %err, "materialization failed");
            }
        }
    }

    /// Evicts a resident chunk, releasing all of its resource handles.
    ///
    /// No-op when the chunk is not resident.
    pub fn evict<R: Renderer, P: PhysicsWorld>(
        &mut self,
        coord: ChunkCoord,
        renderer: &mut R,
        physics: &mut P,
    ) {
        let Some(chunk) = self.resident.remove(&coord) else {
            return;
        };
        for handle in chunk.drawables {
            renderer.remove_drawable(handle);
        }
        for handle in chunk.colliders {
            physics.remove_collider(handle);
        }
        debug!(chunk = %coord, "chunk evicted");
    }

    /// Tears the streaming system down: evicts every resident chunk and
    /// shuts the worker pool down. Used on world teardown (seed change).
    pub fn dispose<R: Renderer, P: PhysicsWorld>(&mut self, renderer: &mut R, physics: &mut P) {
        let coords: Vec<ChunkCoord> = self.resident.keys().copied().collect();
        for coord in coords {
            self.evict(coord, renderer, physics);
        }
        self.requested.clear();
        self.pool.shutdown();
        info!("chunk manager disposed");
    }

    /// Read-only view of the resident set.
    pub fn resident(&self) -> impl Iterator<Item = (&ChunkCoord, &LoadedChunk)> {
        self.resident.iter()
    }

    /// Looks up one resident chunk.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&LoadedChunk> {
        self.resident.get(&coord)
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    /// Number of requests currently outstanding.
    #[must_use]
    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    /// Total number of generation requests dispatched so far.
    #[must_use]
    pub const fn dispatched_total(&self) -> usize {
        self.dispatched_total
    }

    /// Streaming state of one chunk key.
    #[must_use]
    pub fn chunk_state(&self, coord: ChunkCoord) -> ChunkState {
        if self.resident.contains_key(&coord) {
            ChunkState::Resident
        } else if self.requested.contains(&coord) {
            ChunkState::Requested
        } else {
            ChunkState::Absent
        }
    }

    /// The chunk the observer was in at the last update.
    #[must_use]
    pub const fn observer_chunk(&self) -> ChunkCoord {
        self.observer_chunk
    }

    /// Whether a world-space position lies on a road, answered from the
    /// resident set only.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ChunkNotResident`] when the chunk containing
    /// the position is not materialized.
    pub fn is_on_road(&self, pos: Vec3) -> Result<bool, WorldError> {
        let coord = ChunkCoord::from_world(pos, self.config.chunk_size);
        let chunk = self
            .resident
            .get(&coord)
            .ok_or(WorldError::ChunkNotResident {
                x: coord.x,
                y: coord.y,
            })?;

        let p = Vec2::new(pos.x, pos.z);
        let half_width = self.config.gen_params.road_width / 2.0;
        Ok(chunk.data.roads.iter().any(|road| {
            road.points
                .windows(2)
                .any(|seg| point_segment_distance(p, seg[0], seg[1]) <= half_width)
        }))
    }
}

impl std::fmt::Debug for ChunkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkManager")
            .field("world_seed", &self.world_seed)
            .field("load_radius", &self.config.load_radius)
            .field("resident", &self.resident.len())
            .field("requested", &self.requested.len())
            .field("observer_chunk", &self.observer_chunk)
            .finish_non_exhaustive()
    }
}

/// Creates every resource for one chunk, rolling back on failure so a
/// failed materialization leaks nothing.
fn materialize<R: Renderer, P: PhysicsWorld>(
    data: &ChunkData,
    chunk_size: f32,
    renderer: &mut R,
    physics: &mut P,
) -> Result<(Vec<DrawableHandle>, Vec<ColliderHandle>), MaterializeError> {
    let mut drawables = Vec::with_capacity(1 + data.roads.len() + data.buildings.len());
    let mut colliders = Vec::with_capacity(data.collision.len());

    let result = (|| {
        drawables.push(renderer.create_drawable(&DrawableDesc::Ground {
            origin: data.coord.world_origin(chunk_size),
            size: chunk_size,
        })?);
        for road in &data.roads {
            drawables.push(renderer.create_drawable(&DrawableDesc::Road(road))?);
        }
        for building in &data.buildings {
            drawables.push(renderer.create_drawable(&DrawableDesc::Building(building))?);
        }
        for primitive in &data.collision {
            colliders.push(physics.create_static_collider(primitive)?);
        }
        Ok(())
    })();

    match result {
        Ok(()) => Ok((drawables, colliders)),
        Err(err) => {
            for handle in drawables {
                renderer.remove_drawable(handle);
            }
            for handle in colliders {
                physics.remove_collider(handle);
            }
            Err(err)
        }
    }
}

/// Chunks within `radius` of `center`, ring by ring from the center out.
fn spiral(center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
    let mut result = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
    result.push(center);

    // Each edge walks 2*ring cells so every corner lands exactly once:
    // the top edge owns the top-left corner, the right edge the top-right,
    // the bottom edge the bottom-right, the left edge the bottom-left.
    for ring in 1..=radius {
        for x in -ring..ring {
            result.push(ChunkCoord::new(center.x + x, center.y + ring));
        }
        for y in ((-ring + 1)..=ring).rev() {
            result.push(ChunkCoord::new(center.x + ring, center.y + y));
        }
        for x in ((-ring + 1)..=ring).rev() {
            result.push(ChunkCoord::new(center.x + x, center.y - ring));
        }
        for y in -ring..ring {
            result.push(ChunkCoord::new(center.x - ring, center.y + y));
        }
    }

    result
}

/// Distance from a point to a line segment, all in the XZ plane.
fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asphalt_common::MaterializeError;
    use asphalt_worldgen::generate;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    /// Recording renderer double. Tracks live handles so tests can assert
    /// that creates and removes stay symmetric.
    #[derive(Default)]
    struct MockRenderer {
        next: u64,
        live: HashSet<u64>,
        created: usize,
        removed: usize,
        fail_after: Option<usize>,
    }

    impl Renderer for MockRenderer {
        fn create_drawable(
            &mut self,
            _desc: &DrawableDesc<'_>,
        ) -> Result<DrawableHandle, MaterializeError> {
            if self.fail_after == Some(self.created) {
                return Err(MaterializeError::Drawable("gpu out of memory".into()));
            }
            self.created += 1;
            self.next += 1;
            self.live.insert(self.next);
            Ok(DrawableHandle(self.next))
        }

        fn remove_drawable(&mut self, handle: DrawableHandle) {
            assert!(self.live.remove(&handle.0), "double free of {handle}");
            self.removed += 1;
        }
    }

    #[derive(Default)]
    struct MockPhysics {
        next: u64,
        live: HashSet<u64>,
        created: usize,
        removed: usize,
    }

    impl PhysicsWorld for MockPhysics {
        fn create_static_collider(
            &mut self,
            _primitive: &asphalt_worldgen::CollisionPrimitive,
        ) -> Result<ColliderHandle, MaterializeError> {
            self.created += 1;
            self.next += 1;
            self.live.insert(self.next);
            Ok(ColliderHandle(self.next))
        }

        fn remove_collider(&mut self, handle: ColliderHandle) {
            assert!(self.live.remove(&handle.0), "double free of {handle}");
            self.removed += 1;
        }
    }

    /// Manager with no worker threads: requests queue up unanswered, so
    /// tests control exactly which results arrive and when.
    fn offline_manager(load_radius: i32) -> ChunkManager {
        let config = StreamConfig {
            worker_count: 0,
            load_radius,
            ..StreamConfig::default()
        };
        ChunkManager::new(12345, config).expect("manager")
    }

    fn chunk_center(x: i32, y: i32) -> Vec3 {
        Vec3::new(
            (x as f32 + 0.5) * CHUNK_SIZE,
            0.0,
            (y as f32 + 0.5) * CHUNK_SIZE,
        )
    }

    fn result_for(manager: &ChunkManager, x: i32, y: i32) -> ChunkData {
        generate(
            ChunkCoord::new(x, y),
            manager.world_seed(),
            &GenerationParams::default(),
        )
    }

    #[test]
    fn test_first_update_requests_49_chunks() {
        let mut manager = offline_manager(3);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);

        assert_eq!(manager.requested_count() + manager.resident_count(), 49);
        for x in -3..=3 {
            for y in -3..=3 {
                assert_eq!(
                    manager.chunk_state(ChunkCoord::new(x, y)),
                    ChunkState::Requested
                );
            }
        }
        assert_eq!(manager.chunk_state(ChunkCoord::new(4, 0)), ChunkState::Absent);
        assert_eq!(renderer.created, 0);
    }

    #[test]
    fn test_no_duplicate_dispatch_across_updates() {
        let mut manager = offline_manager(3);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        manager.update(Vec3::new(1.0, 0.0, 1.0), &mut renderer, &mut physics);

        assert_eq!(manager.dispatched_total(), 49);
    }

    #[test]
    fn test_result_materializes_resident_chunk() {
        let mut manager = offline_manager(3);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());
        manager.update(Vec3::ZERO, &mut renderer, &mut physics);

        let data = result_for(&manager, 0, 0);
        let expected_drawables = 1 + data.roads.len() + data.buildings.len();
        let expected_colliders = data.collision.len();
        manager.on_generation_result(data, &mut renderer, &mut physics);

        assert_eq!(manager.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Resident);
        assert_eq!(renderer.created, expected_drawables);
        assert_eq!(physics.created, expected_colliders);

        let loaded = manager.get(ChunkCoord::new(0, 0)).expect("resident");
        assert_eq!(loaded.drawables().len(), expected_drawables);
        assert_eq!(loaded.colliders().len(), expected_colliders);
    }

    #[test]
    fn test_duplicate_result_discarded() {
        let mut manager = offline_manager(3);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());
        manager.update(Vec3::ZERO, &mut renderer, &mut physics);

        manager.on_generation_result(result_for(&manager, 0, 0), &mut renderer, &mut physics);
        let created = renderer.created;
        manager.on_generation_result(result_for(&manager, 0, 0), &mut renderer, &mut physics);

        assert_eq!(renderer.created, created, "duplicate must create nothing");
        assert_eq!(manager.resident_count(), 1);
    }

    #[test]
    fn test_stale_result_discarded_without_leak() {
        let mut manager = offline_manager(1);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        assert_eq!(manager.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Requested);

        // Observer leaves before the result arrives.
        manager.update(chunk_center(100, 100), &mut renderer, &mut physics);
        assert_eq!(manager.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Absent);

        manager.on_generation_result(result_for(&manager, 0, 0), &mut renderer, &mut physics);

        assert_eq!(manager.resident_count(), 0);
        assert_eq!(renderer.created, 0);
        assert_eq!(physics.created, 0);
    }

    #[test]
    fn test_never_requested_result_discarded() {
        let mut manager = offline_manager(1);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.on_generation_result(result_for(&manager, 50, 50), &mut renderer, &mut physics);

        assert_eq!(manager.resident_count(), 0);
        assert_eq!(renderer.created, 0);
    }

    #[test]
    fn test_unload_hysteresis_boundary() {
        let mut manager = offline_manager(3);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        // From chunk (2,0), both (4,0) and (5,0) fall in the load square.
        manager.update(chunk_center(2, 0), &mut renderer, &mut physics);
        manager.on_generation_result(result_for(&manager, 4, 0), &mut renderer, &mut physics);
        manager.on_generation_result(result_for(&manager, 5, 0), &mut renderer, &mut physics);
        assert_eq!(manager.resident_count(), 2);

        // Back at the origin: (4,0) sits exactly on the unload boundary and
        // must survive; (5,0) is beyond it and must go.
        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        assert_eq!(manager.chunk_state(ChunkCoord::new(4, 0)), ChunkState::Resident);
        assert_eq!(manager.chunk_state(ChunkCoord::new(5, 0)), ChunkState::Absent);
    }

    #[test]
    fn test_resource_symmetry_on_evict() {
        let mut manager = offline_manager(2);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        for (x, y) in [(0, 0), (1, 1), (-2, 0)] {
            manager.on_generation_result(result_for(&manager, x, y), &mut renderer, &mut physics);
        }
        assert_eq!(manager.resident_count(), 3);

        // Move far away; everything resident gets evicted.
        manager.update(chunk_center(100, 100), &mut renderer, &mut physics);
        assert_eq!(manager.resident_count(), 0);
        assert_eq!(renderer.created, renderer.removed);
        assert_eq!(physics.created, physics.removed);
        assert!(renderer.live.is_empty());
        assert!(physics.live.is_empty());
    }

    #[test]
    fn test_evict_non_resident_is_noop() {
        let mut manager = offline_manager(2);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.evict(ChunkCoord::new(9, 9), &mut renderer, &mut physics);
        assert_eq!(renderer.removed, 0);
        assert_eq!(physics.removed, 0);
    }

    #[test]
    fn test_materialization_failure_rolls_back_and_retries() {
        let mut manager = offline_manager(3);
        let mut renderer = MockRenderer {
            fail_after: Some(5),
            ..MockRenderer::default()
        };
        let mut physics = MockPhysics::default();

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        manager.on_generation_result(result_for(&manager, 0, 0), &mut renderer, &mut physics);

        // Failed chunk stays absent, nothing leaks.
        assert_eq!(manager.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Absent);
        assert!(renderer.live.is_empty());
        assert!(physics.live.is_empty());

        // Still desired, so the next update re-requests it.
        renderer.fail_after = None;
        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        assert_eq!(manager.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Requested);

        manager.on_generation_result(result_for(&manager, 0, 0), &mut renderer, &mut physics);
        assert_eq!(manager.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Resident);
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut manager = offline_manager(2);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        manager.on_generation_result(result_for(&manager, 0, 0), &mut renderer, &mut physics);
        manager.on_generation_result(result_for(&manager, 1, 0), &mut renderer, &mut physics);

        manager.dispose(&mut renderer, &mut physics);

        assert_eq!(manager.resident_count(), 0);
        assert_eq!(manager.requested_count(), 0);
        assert!(renderer.live.is_empty());
        assert!(physics.live.is_empty());
        // Post-dispose updates must not panic; requests just get dropped.
        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        assert_eq!(manager.requested_count(), 0);
    }

    #[test]
    fn test_resident_view_and_keys() {
        let mut manager = offline_manager(2);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        manager.on_generation_result(result_for(&manager, -1, 2), &mut renderer, &mut physics);

        let keys: Vec<String> = manager.resident().map(|(c, _)| c.key()).collect();
        assert_eq!(keys, vec!["-1,2".to_string()]);
        assert!(manager.get(ChunkCoord::new(-1, 2)).is_some());
        assert!(manager.get(ChunkCoord::new(0, 0)).is_none());
    }

    #[test]
    fn test_is_on_road() {
        let mut manager = offline_manager(2);
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        manager.update(Vec3::ZERO, &mut renderer, &mut physics);
        manager.on_generation_result(result_for(&manager, 0, 0), &mut renderer, &mut physics);

        // On the grid line z = 0.
        assert_eq!(manager.is_on_road(Vec3::new(10.0, 0.0, 0.0)), Ok(true));
        // Center of a block, far from every grid line.
        assert_eq!(manager.is_on_road(Vec3::new(32.0, 0.0, 32.0)), Ok(false));
        // Not resident: answered with an error, not a guess.
        assert!(matches!(
            manager.is_on_road(chunk_center(50, 50)),
            Err(WorldError::ChunkNotResident { x: 50, y: 50 })
        ));
    }

    #[test]
    fn test_spiral_layout() {
        let center = ChunkCoord::new(0, 0);
        assert_eq!(spiral(center, 1).len(), 9);
        assert_eq!(spiral(center, 3).len(), 49);
        assert_eq!(spiral(center, 3)[0], center);

        let set: HashSet<ChunkCoord> = spiral(center, 3).into_iter().collect();
        assert_eq!(set.len(), 49);
        for coord in &set {
            assert!(coord.chebyshev_distance(center) <= 3);
        }
    }

    #[test]
    fn test_spiral_includes_every_ring_corner() {
        // The positive-diagonal corner of each ring is the easiest cell to
        // lose to an off-by-one in the edge walks.
        let set: HashSet<ChunkCoord> = spiral(ChunkCoord::new(0, 0), 3).into_iter().collect();
        for ring in 1..=3 {
            for (x, y) in [(ring, ring), (-ring, ring), (ring, -ring), (-ring, -ring)] {
                assert!(
                    set.contains(&ChunkCoord::new(x, y)),
                    "corner ({x},{y}) missing from spiral"
                );
            }
        }
        assert!(set.contains(&ChunkCoord::new(1, 1)));
    }

    proptest! {
        #[test]
        fn prop_spiral_covers_square(
            radius in 1i32..8,
            cx in -1000i32..1000,
            cy in -1000i32..1000,
        ) {
            let center = ChunkCoord::new(cx, cy);
            let cells = spiral(center, radius);
            let expected = ((2 * radius + 1) * (2 * radius + 1)) as usize;
            prop_assert_eq!(cells.len(), expected, "spiral visits a cell twice or not at all");

            let set: HashSet<ChunkCoord> = cells.into_iter().collect();
            prop_assert_eq!(set.len(), expected);
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    prop_assert!(set.contains(&ChunkCoord::new(cx + dx, cy + dy)));
                }
            }
        }
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(point_segment_distance(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_segment_distance(Vec2::new(-4.0, 0.0), a, b), 4.0);
        assert_eq!(point_segment_distance(Vec2::new(2.0, 0.0), a, a), 2.0);
    }

    #[test]
    fn test_streaming_end_to_end() {
        let mut manager = ChunkManager::new(12345, StreamConfig::with_radius(2)).expect("manager");
        let (mut renderer, mut physics) = (MockRenderer::default(), MockPhysics::default());

        // Tick until the neighborhood of the origin is fully resident.
        let deadline = Instant::now() + Duration::from_secs(10);
        while manager.resident_count() < 25 {
            assert!(Instant::now() < deadline, "streaming did not converge");
            manager.update(Vec3::ZERO, &mut renderer, &mut physics);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(manager.resident_count(), 25);

        // Drive away; the old neighborhood must be fully released.
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            manager.update(chunk_center(40, 40), &mut renderer, &mut physics);
            if manager.get(ChunkCoord::new(0, 0)).is_none() && manager.resident_count() == 25 {
                break;
            }
            assert!(Instant::now() < deadline, "relocation did not converge");
            std::thread::sleep(Duration::from_millis(5));
        }

        manager.dispose(&mut renderer, &mut physics);
        assert_eq!(renderer.created, renderer.removed);
        assert_eq!(physics.created, physics.removed);
    }
}
