//! Procedural chunk generation.
//!
//! [`generate`] turns a chunk coordinate and the world seed into a
//! [`ChunkData`] value: an axis-aligned road grid, city blocks carved out
//! between the roads, and 1–3 buildings per block with matching collision
//! boxes. The function is pure and total — it never fails, never touches
//! shared state, and is safe to run in parallel across chunks. Each call
//! seeds its own [`ChunkRng`] from [`chunk_hash`], so output depends only
//! on `(world_seed, coord)`.
//!
//! The RNG draw order per block is fixed and part of the format: building
//! count first, then per building `(scale_x, scale_y, jitter_x, jitter_y,
//! height)`. Reordering draws silently changes every existing world.

use asphalt_common::{ChunkCoord, CHUNK_SIZE};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::chunk::{
    Building, BuildingArchetype, ChunkData, CollisionPrimitive, Intersection, RoadClass,
    RoadSegment,
};
use crate::hash::{block_noise, chunk_hash};
use crate::rng::ChunkRng;

/// Default road grid spacing in world units (sub-multiple of `CHUNK_SIZE`).
pub const DEFAULT_BLOCK_SIZE: f32 = 64.0;

/// Default road width in world units.
pub const DEFAULT_ROAD_WIDTH: f32 = 8.0;

/// Parameters controlling chunk generation.
///
/// Fixed at construction of the streaming system; not re-read at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Chunk edge length in world units.
    pub chunk_size: f32,
    /// Road grid spacing in world units.
    pub block_size: f32,
    /// Road width; city blocks shrink by this much on each side.
    pub road_width: f32,
    /// Upper bound (inclusive) on buildings per block.
    pub max_buildings_per_block: i32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
            road_width: DEFAULT_ROAD_WIDTH,
            max_buildings_per_block: 3,
        }
    }
}

/// Noise threshold below which a block is residential.
const RESIDENTIAL_THRESHOLD: f64 = 0.4;
/// Noise threshold below which a block is office (above residential).
const OFFICE_THRESHOLD: f64 = 0.7;

/// Generates the full content of one chunk.
///
/// Deterministic: two calls with the same arguments return bit-identical
/// [`ChunkData`], including element order.
#[must_use]
pub fn generate(coord: ChunkCoord, world_seed: u32, params: &GenerationParams) -> ChunkData {
    let seed = chunk_hash(world_seed, coord.x, coord.y);
    let mut rng = ChunkRng::new(seed);
    let origin = coord.world_origin(params.chunk_size);

    let lines = (params.chunk_size / params.block_size).ceil() as i32 + 1;

    let roads = layout_roads(origin, lines, params);
    let intersections = layout_intersections(origin, lines, params);

    let mut buildings = Vec::new();
    let mut collision = Vec::new();
    for by in 0..lines - 1 {
        for bx in 0..lines - 1 {
            let block_origin = origin
                + Vec2::new(
                    bx as f32 * params.block_size,
                    by as f32 * params.block_size,
                );
            fill_block(
                block_origin,
                seed,
                params,
                &mut rng,
                &mut buildings,
                &mut collision,
            );
        }
    }

    ChunkData {
        coord,
        roads,
        intersections,
        buildings,
        collision,
    }
}

/// Lays out the axis-aligned road grid: `lines` horizontal and `lines`
/// vertical full-span segments, classified by grid-line parity.
fn layout_roads(origin: Vec2, lines: i32, params: &GenerationParams) -> Vec<RoadSegment> {
    let span = params.chunk_size;
    let mut roads = Vec::with_capacity(2 * lines as usize);

    for i in 0..lines {
        let off = i as f32 * params.block_size;
        let class = if i % 2 == 0 {
            RoadClass::Primary
        } else {
            RoadClass::Secondary
        };
        roads.push(RoadSegment {
            points: vec![
                Vec2::new(origin.x, origin.y + off),
                Vec2::new(origin.x + span, origin.y + off),
            ],
            class,
        });
    }
    for i in 0..lines {
        let off = i as f32 * params.block_size;
        let class = if i % 2 == 0 {
            RoadClass::Primary
        } else {
            RoadClass::Secondary
        };
        roads.push(RoadSegment {
            points: vec![
                Vec2::new(origin.x + off, origin.y),
                Vec2::new(origin.x + off, origin.y + span),
            ],
            class,
        });
    }
    roads
}

/// One intersection per grid-line crossing, row-major ids.
fn layout_intersections(
    origin: Vec2,
    lines: i32,
    params: &GenerationParams,
) -> Vec<Intersection> {
    let mut out = Vec::with_capacity((lines * lines) as usize);
    for iy in 0..lines {
        for ix in 0..lines {
            out.push(Intersection {
                id: (iy * lines + ix) as u32,
                position: origin
                    + Vec2::new(
                        ix as f32 * params.block_size,
                        iy as f32 * params.block_size,
                    ),
            });
        }
    }
    out
}

/// Fills one city block with buildings and their collision boxes.
fn fill_block(
    block_origin: Vec2,
    seed: u32,
    params: &GenerationParams,
    rng: &mut ChunkRng,
    buildings: &mut Vec<Building>,
    collision: &mut Vec<CollisionPrimitive>,
) {
    // Shrink the block interior by the road width on each side.
    let inner_origin = block_origin + Vec2::splat(params.road_width);
    let inner_w = params.block_size - 2.0 * params.road_width;
    let inner_d = params.block_size - 2.0 * params.road_width;
    if inner_w <= 0.0 || inner_d <= 0.0 {
        return;
    }

    // Archetype comes from position noise, not the RNG stream, so it stays
    // stable under changes to how many draws earlier blocks consumed.
    let noise = block_noise(seed, f64::from(block_origin.x), f64::from(block_origin.y));
    let archetype = if noise < RESIDENTIAL_THRESHOLD {
        BuildingArchetype::Residential
    } else if noise < OFFICE_THRESHOLD {
        BuildingArchetype::Office
    } else {
        BuildingArchetype::Industrial
    };

    let count = rng.next_int(1, params.max_buildings_per_block + 1);
    let side = f64::from(count).sqrt().ceil() as i32;
    let cell_w = inner_w / side as f32;
    let cell_d = inner_d / side as f32;
    let (height_min, height_max) = archetype.height_range();

    let mut placed = 0;
    'cells: for sy in 0..side {
        for sx in 0..side {
            if placed == count {
                break 'cells;
            }
            let sub_origin =
                inner_origin + Vec2::new(sx as f32 * cell_w, sy as f32 * cell_d);

            let w = cell_w * rng.next_float(0.70, 0.95) as f32;
            let d = cell_d * rng.next_float(0.70, 0.95) as f32;
            let jx = rng.next_float(0.0, f64::from(cell_w - w)) as f32;
            let jy = rng.next_float(0.0, f64::from(cell_d - d)) as f32;
            let height = rng.next_float(height_min, height_max) as f32;

            let min = sub_origin + Vec2::new(jx, jy);
            buildings.push(Building {
                footprint: vec![
                    min,
                    Vec2::new(min.x + w, min.y),
                    Vec2::new(min.x + w, min.y + d),
                    Vec2::new(min.x, min.y + d),
                ],
                height,
                archetype,
            });
            collision.push(CollisionPrimitive::Box {
                center: Vec3::new(min.x + w / 2.0, height / 2.0, min.y + d / 2.0),
                half_extents: Vec3::new(w / 2.0, height / 2.0, d / 2.0),
                yaw: 0.0,
            });
            placed += 1;
        }
    }
}
