//! Dungeon maps and the canonical dungeon record.
//!
//! Maps are either generated from a seed (rooms, corridors, doors, chests,
//! portals) or authored by hand for small fixed layouts.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::DungeonId;
use crate::value_objects::{BoundedVec, DungeonPoint, Mulberry32};

pub const TILE_FLOOR: u8 = 0;
pub const TILE_WALL: u8 = 1;

pub const MAX_ROOMS: usize = 40;
pub const MAX_DOORS: usize = 64;
pub const MAX_CHESTS: usize = 64;
pub const MAX_PORTALS: usize = 8;

/// Generated maps are clamped to this range on both axes.
pub const MIN_GENERATED_SIDE: u16 = 8;
pub const MAX_GENERATED_SIDE: u16 = 128;

const CHEST_CHANCE: f32 = 0.55;
const EXTRA_PORTAL_CHANCE: f32 = 0.25;

/// Rectangular room carved out of the wall grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Room {
    pub fn center(&self) -> DungeonPoint {
        DungeonPoint::new(
            self.x + self.w.saturating_sub(1) / 2,
            self.y + self.h.saturating_sub(1) / 2,
        )
    }

    pub fn contains(&self, point: DungeonPoint) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

    fn sample_interior(&self, rng: &mut Mulberry32) -> Option<DungeonPoint> {
        if self.w < 3 || self.h < 3 {
            return None;
        }
        let x = self.x + 1 + (rng.next_u32() % u32::from(self.w - 2)) as u16;
        let y = self.y + 1 + (rng.next_u32() % u32::from(self.h - 2)) as u16;
        Some(DungeonPoint::new(x, y))
    }
}

/// Lifecycle of a canonical dungeon record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DungeonStatus {
    Pending,
    Ready,
}

/// Canonical dungeon record. Sessions copy their map from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonRecord {
    pub id: DungeonId,
    pub status: DungeonStatus,
    /// Zero means the seed has not been initialized yet.
    pub seed: u32,
    pub width: u16,
    pub height: u16,
    /// Hand-authored layout; when absent the map is generated from `seed`.
    #[serde(default)]
    pub layout: Option<DungeonMap>,
}

impl DungeonRecord {
    /// Ready with an initialized seed, or the reason it is not.
    pub fn ensure_playable(&self) -> Result<(), DomainError> {
        if self.status != DungeonStatus::Ready {
            return Err(DomainError::DungeonNotReady);
        }
        if self.seed == 0 {
            return Err(DomainError::DungeonSeedMissing);
        }
        Ok(())
    }

    pub fn build_map(&self) -> Result<DungeonMap, DomainError> {
        self.ensure_playable()?;
        match &self.layout {
            Some(layout) => Ok(layout.clone()),
            None => DungeonMap::generate(self.seed, self.width, self.height),
        }
    }
}

/// Tile grid plus the interactive features placed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonMap {
    width: u16,
    height: u16,
    /// Row-major tiles.
    grid: Vec<u8>,
    rooms: BoundedVec<Room, MAX_ROOMS>,
    doors: BoundedVec<DungeonPoint, MAX_DOORS>,
    chests: BoundedVec<DungeonPoint, MAX_CHESTS>,
    portals: BoundedVec<DungeonPoint, MAX_PORTALS>,
    entrance: DungeonPoint,
}

impl DungeonMap {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Procedurally generate a map. The same seed and size always yield the same map.
    pub fn generate(seed: u32, width: u16, height: u16) -> Result<Self, DomainError> {
        if !(MIN_GENERATED_SIDE..=MAX_GENERATED_SIDE).contains(&width)
            || !(MIN_GENERATED_SIDE..=MAX_GENERATED_SIDE).contains(&height)
        {
            return Err(DomainError::invalid_layout(format!(
                "generated maps must be between {MIN_GENERATED_SIDE} and {MAX_GENERATED_SIDE} tiles per side"
            )));
        }

        let mut rng = Mulberry32::new(seed);
        let mut grid = vec![TILE_WALL; usize::from(width) * usize::from(height)];
        let mut rooms: Vec<Room> = Vec::with_capacity(MAX_ROOMS);

        for _ in 0..MAX_ROOMS {
            let rw = rng.next_range(4, 12);
            let rh = rng.next_range(4, 10);
            if rw + 2 >= width || rh + 2 >= height {
                continue;
            }
            let rx = 1 + (rng.next_f32() * f32::from(width - rw - 2)) as u16;
            let ry = 1 + (rng.next_f32() * f32::from(height - rh - 2)) as u16;
            let room = Room {
                x: rx,
                y: ry,
                w: rw,
                h: rh,
            };
            carve_room(&mut grid, width, &room);
            rooms.push(room);
        }

        if rooms.is_empty() {
            let rw = width.saturating_sub(4).max(4);
            let rh = height.saturating_sub(4).max(4);
            let room = Room {
                x: width.saturating_sub(rw) / 2,
                y: height.saturating_sub(rh) / 2,
                w: rw,
                h: rh,
            };
            carve_room(&mut grid, width, &room);
            rooms.push(room);
        }

        rooms.sort_by_key(|r| (r.x, r.y));

        let mut doors = Vec::with_capacity(MAX_DOORS);
        for pair in rooms.windows(2) {
            let from = pair[0].center();
            let to = pair[1].center();
            carve_horizontal(&mut grid, width, from.x, to.x, from.y);
            carve_vertical(&mut grid, width, from.y, to.y, to.x);
            push_unique(&mut doors, from, MAX_DOORS);
            push_unique(&mut doors, to, MAX_DOORS);
        }

        let mut chests = Vec::with_capacity(MAX_CHESTS);
        for room in &rooms {
            if rng.next_f32() < CHEST_CHANCE {
                if let Some(point) = room.sample_interior(&mut rng) {
                    push_unique(&mut chests, point, MAX_CHESTS);
                }
            }
        }

        // The last room always gets a portal; a single-room map gets one at its centre.
        let mut portals = Vec::with_capacity(MAX_PORTALS);
        if let Some(last) = rooms.last() {
            push_unique(&mut portals, last.center(), MAX_PORTALS);
        }
        for room in rooms.iter().skip(1) {
            if rng.next_f32() < EXTRA_PORTAL_CHANCE {
                push_unique(&mut portals, room.center(), MAX_PORTALS);
            }
        }

        let entrance = rooms[0].center();
        let mut placed = Vec::with_capacity(chests.len());
        for chest in chests {
            let point = if rooms.iter().any(|r| r.contains(chest)) {
                chest
            } else {
                entrance
            };
            push_unique(&mut placed, point, MAX_CHESTS);
        }

        Ok(Self {
            width,
            height,
            grid,
            rooms: BoundedVec::try_from_vec(rooms, "rooms")?,
            doors: BoundedVec::try_from_vec(doors, "doors")?,
            chests: BoundedVec::try_from_vec(placed, "chests")?,
            portals: BoundedVec::try_from_vec(portals, "portals")?,
            entrance,
        })
    }

    /// Hand-authored map. Every feature and the entrance must sit on floor tiles.
    pub fn from_layout(
        width: u16,
        height: u16,
        grid: Vec<u8>,
        entrance: DungeonPoint,
        chests: Vec<DungeonPoint>,
        portals: Vec<DungeonPoint>,
        doors: Vec<DungeonPoint>,
    ) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::invalid_layout("map must not be empty"));
        }
        if grid.len() != usize::from(width) * usize::from(height) {
            return Err(DomainError::invalid_layout(format!(
                "grid has {} tiles, expected {}",
                grid.len(),
                usize::from(width) * usize::from(height)
            )));
        }
        let map = Self {
            width,
            height,
            grid,
            rooms: BoundedVec::new(),
            doors: BoundedVec::try_from_vec(doors, "doors")?,
            chests: BoundedVec::try_from_vec(chests, "chests")?,
            portals: BoundedVec::try_from_vec(portals, "portals")?,
            entrance,
        };
        let features = map
            .doors
            .iter()
            .chain(map.chests.iter())
            .chain(map.portals.iter())
            .chain(std::iter::once(&map.entrance));
        for point in features {
            if !map.is_traversable(*point) {
                return Err(DomainError::invalid_layout(format!(
                    "feature at ({}, {}) is not on a floor tile",
                    point.x, point.y
                )));
            }
        }
        Ok(map)
    }

    /// All-floor rectangle with the entrance at the origin.
    pub fn open_floor(width: u16, height: u16) -> Result<Self, DomainError> {
        let tiles = vec![TILE_FLOOR; usize::from(width) * usize::from(height)];
        Self::from_layout(
            width,
            height,
            tiles,
            DungeonPoint::new(0, 0),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn grid(&self) -> &[u8] {
        &self.grid
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn doors(&self) -> &[DungeonPoint] {
        &self.doors
    }

    pub fn chests(&self) -> &[DungeonPoint] {
        &self.chests
    }

    pub fn portals(&self) -> &[DungeonPoint] {
        &self.portals
    }

    #[inline]
    pub fn entrance(&self) -> DungeonPoint {
        self.entrance
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tile(&self, point: DungeonPoint) -> Option<u8> {
        if point.x >= self.width || point.y >= self.height {
            return None;
        }
        self.grid
            .get(usize::from(point.y) * usize::from(self.width) + usize::from(point.x))
            .copied()
    }

    pub fn is_traversable(&self, point: DungeonPoint) -> bool {
        self.tile(point) == Some(TILE_FLOOR)
    }

    pub fn chest_at(&self, point: DungeonPoint) -> Option<usize> {
        self.chests.iter().position(|c| *c == point)
    }

    pub fn portal_at(&self, point: DungeonPoint) -> Option<usize> {
        self.portals.iter().position(|p| *p == point)
    }

    pub fn is_door(&self, point: DungeonPoint) -> bool {
        self.doors.contains(&point)
    }
}

fn push_unique(points: &mut Vec<DungeonPoint>, point: DungeonPoint, max: usize) {
    if points.len() < max && !points.contains(&point) {
        points.push(point);
    }
}

fn carve_room(grid: &mut [u8], width: u16, room: &Room) {
    for y in room.y..room.y + room.h {
        for x in room.x..room.x + room.w {
            set_floor(grid, width, x, y);
        }
    }
}

fn carve_horizontal(grid: &mut [u8], width: u16, x1: u16, x2: u16, y: u16) {
    for x in x1.min(x2)..=x1.max(x2) {
        set_floor(grid, width, x, y);
    }
}

fn carve_vertical(grid: &mut [u8], width: u16, y1: u16, y2: u16, x: u16) {
    for y in y1.min(y2)..=y1.max(y2) {
        set_floor(grid, width, x, y);
    }
}

fn set_floor(grid: &mut [u8], width: u16, x: u16, y: u16) {
    let idx = usize::from(y) * usize::from(width) + usize::from(x);
    if let Some(tile) = grid.get_mut(idx) {
        *tile = TILE_FLOOR;
    }
}
