//! # Floor Generator
//!
//! Composes a floor template and rotated room templates into one floor and
//! infers doors from the walls rooms share with each other and with hallways.

use super::{segment_interior, Generator, Room, Side, SideKind, Template};
use crate::game::{GameState, Position};
use crate::{ShambleError, ShambleResult};
use std::collections::BTreeMap;

/// Marker family for room slot origins.
pub const ROOM_PLACEHOLDER: &str = "room";
/// Marker family for door candidates.
pub const DOOR_PLACEHOLDER: &str = "door";

/// Normalized identity of a wall segment: its end points in ascending order.
pub type EdgeKey = (Position, Position);

/// A wall segment shared by the rooms registered against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEdge {
    pub key: EdgeKey,
    /// Room ids with the side kind each one saw beyond this wall
    pub rooms: Vec<(usize, SideKind)>,
    pub door: Option<Position>,
}

impl RoomEdge {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            key: Self::key_for(start, end),
            rooms: Vec::new(),
            door: None,
        }
    }

    pub fn key_for(start: Position, end: Position) -> EdgeKey {
        if start <= end {
            (start, end)
        } else {
            (end, start)
        }
    }

    /// Door markers needed on a cell before a door may go there.
    pub fn required_candidates(&self) -> usize {
        if self.rooms.iter().any(|(_, kind)| *kind == SideKind::Hallway) {
            1
        } else {
            2
        }
    }

    /// Cells between the corners.
    pub fn interior(&self) -> Vec<Position> {
        segment_interior(self.key.0, self.key.1)
    }
}

/// What the floor generator built.
#[derive(Debug, Clone, Default)]
pub struct FloorLayout {
    pub width: usize,
    pub height: usize,
    pub rooms: Vec<Room>,
    pub edges: Vec<RoomEdge>,
    pub doors: Vec<Position>,
}

impl FloorLayout {
    pub fn edge(&self, key: EdgeKey) -> Option<&RoomEdge> {
        self.edges.iter().find(|edge| edge.key == key)
    }
}

/// Builds a floor from a floor template and a set of room templates.
#[derive(Debug, Clone)]
pub struct FloorGenerator {
    pub floor: Template,
    /// Placed exactly once each
    pub required_rooms: Vec<Template>,
    /// Sampled to fill the remaining slots
    pub room_pool: Vec<Template>,
}

impl FloorGenerator {
    pub fn new(floor: Template, required_rooms: Vec<Template>, room_pool: Vec<Template>) -> Self {
        Self {
            floor,
            required_rooms,
            room_pool,
        }
    }

    fn room_slots(state: &GameState) -> Vec<Position> {
        let mut slots: Vec<Position> = state
            .markers
            .iter()
            .filter(|marker| marker.placeholder == ROOM_PLACEHOLDER)
            .map(|marker| marker.position)
            .collect();
        slots.sort();
        slots.dedup();
        slots
    }

    fn choose_rooms(&self, state: &mut GameState, slots: usize) -> ShambleResult<Vec<&Template>> {
        if self.required_rooms.len() > slots {
            return Err(ShambleError::InvalidConfiguration(format!(
                "{} required rooms do not fit in {} room slots",
                self.required_rooms.len(),
                slots
            )));
        }
        let mut chosen: Vec<&Template> = self.required_rooms.iter().collect();
        while chosen.len() < slots {
            let template = state.random.sample(&self.room_pool).ok_or_else(|| {
                ShambleError::InvalidConfiguration(
                    "Room pool is empty but slots remain".to_string(),
                )
            })?;
            chosen.push(template);
        }
        state.random.shuffle(&mut chosen);
        Ok(chosen)
    }

    fn place_rooms(
        &self,
        state: &mut GameState,
        slots: &[Position],
        templates: &[&Template],
    ) -> ShambleResult<Vec<Room>> {
        let mut rooms = Vec::with_capacity(slots.len());
        for (id, (&origin, template)) in slots.iter().zip(templates).enumerate() {
            let rotations = template.allowed_rotations();
            let rotation = state.random.sample(rotations).copied().unwrap_or(0);
            template.load(state, origin, rotation, false)?;

            let grid = template.grid(rotation);
            let mut random_doors = [false; 4];
            for side in Side::all() {
                random_doors[side.rotated(rotation).index()] = template.random_doors[side.index()];
            }
            rooms.push(Room {
                id,
                template: template.name.clone(),
                origin,
                rotation,
                width: grid.width() as u32,
                height: grid.height() as u32,
                sides: [SideKind::None; 4],
                random_doors,
            });
        }
        Ok(rooms)
    }

    fn classify_sides(state: &GameState, rooms: &mut [Room]) {
        let footprints: Vec<Room> = rooms.to_vec();
        for room in rooms.iter_mut() {
            for side in Side::all() {
                let probe = room.side_probe(side);
                let kind = if !state.in_bounds(probe) {
                    SideKind::MapEdge
                } else if footprints
                    .iter()
                    .any(|other| other.id != room.id && other.contains(probe))
                {
                    SideKind::Room
                } else if state.tile(probe).map_or(false, |tile| tile.passable) {
                    SideKind::Hallway
                } else {
                    SideKind::None
                };
                room.sides[side.index()] = kind;
            }
        }
    }

    fn collect_edges(rooms: &[Room]) -> Vec<RoomEdge> {
        let mut edges: BTreeMap<EdgeKey, RoomEdge> = BTreeMap::new();
        for room in rooms {
            for side in Side::all() {
                let kind = room.side_kind(side);
                if !room.random_doors[side.index()]
                    || !matches!(kind, SideKind::Room | SideKind::Hallway)
                {
                    continue;
                }
                let (start, end) = room.side_segment(side);
                edges
                    .entry(RoomEdge::key_for(start, end))
                    .or_insert_with(|| RoomEdge::new(start, end))
                    .rooms
                    .push((room.id, kind));
            }
        }
        edges.into_values().collect()
    }

    fn door_candidates(state: &GameState, pos: Position) -> Vec<String> {
        state
            .markers
            .at(pos)
            .filter(|marker| marker.placeholder == DOOR_PLACEHOLDER)
            .map(|marker| marker.value.clone())
            .collect()
    }

    fn place_door(state: &mut GameState, edge: &mut RoomEdge) -> ShambleResult<()> {
        let required = edge.required_candidates();
        let valid: Vec<Position> = edge
            .interior()
            .into_iter()
            .filter(|&pos| Self::door_candidates(state, pos).len() >= required)
            .collect();

        let pos = match state.random.sample(&valid).copied() {
            Some(pos) => pos,
            None => {
                log::warn!(
                    "No valid door tile on edge {} - {}; leaving it closed off",
                    edge.key.0,
                    edge.key.1
                );
                return Ok(());
            }
        };

        let door_type = Self::door_candidates(state, pos)
            .into_iter()
            .next()
            .ok_or_else(|| ShambleError::GenerationFailed(format!("Door marker vanished at {}", pos)))?;

        let floor = state.registry.floor_tile_type()?.clone();
        if let Some(tile) = state.tiles.get_mut(pos) {
            tile.retype(&floor);
        }
        let blocking: Vec<_> = state
            .furniture
            .at(pos)
            .filter(|f| f.is_wall || !f.passable)
            .map(|f| f.id)
            .collect();
        for id in blocking {
            state.furniture.remove(id);
        }
        state.spawn_furniture(&door_type, pos)?;
        edge.door = Some(pos);
        log::debug!("Placed {} at {}", door_type, pos);
        Ok(())
    }

    fn strip_placeholders(state: &mut GameState) -> ShambleResult<()> {
        for id in state.markers.ids() {
            state.markers.remove(id);
        }
        let floor = state.registry.floor_tile_type()?.clone();
        for pos in state.tiles.positions().collect::<Vec<_>>() {
            if let Some(tile) = state.tiles.get_mut(pos) {
                if tile.room_placeholder {
                    tile.retype(&floor);
                }
            }
        }
        Ok(())
    }
}

impl Generator<FloorLayout> for FloorGenerator {
    fn generate(&self, state: &mut GameState) -> ShambleResult<FloorLayout> {
        let base = self.floor.grid(0);
        let (width, height) = (base.width(), base.height());
        state.set_size(width, height);
        self.floor.load(state, Position::new(0, 0), 0, true)?;

        let mut layout = FloorLayout {
            width,
            height,
            ..FloorLayout::default()
        };

        let slots = Self::room_slots(state);
        if slots.is_empty() {
            log::warn!("Floor template '{}' has no room slots", self.floor.name);
            return Ok(layout);
        }

        let templates = self.choose_rooms(state, slots.len())?;
        let mut rooms = self.place_rooms(state, &slots, &templates)?;
        Self::classify_sides(state, &mut rooms);

        let mut edges = Self::collect_edges(&rooms);
        for edge in edges.iter_mut() {
            Self::place_door(state, edge)?;
        }
        layout.doors = edges.iter().filter_map(|edge| edge.door).collect();

        if !state.config.keep_placeholders {
            Self::strip_placeholders(state)?;
        }

        log::info!(
            "Generated {}x{} floor with {} rooms and {} doors",
            width,
            height,
            rooms.len(),
            layout.doors.len()
        );
        layout.rooms = rooms;
        layout.edges = edges;
        Ok(layout)
    }

    fn validate(&self, layout: &FloorLayout, state: &GameState) -> ShambleResult<()> {
        if state.player_id.is_none() {
            return Err(ShambleError::GenerationFailed(
                "Floor has no player start".to_string(),
            ));
        }
        for &door in &layout.doors {
            let terrain_ok = state.tile(door).map_or(false, |tile| tile.passable);
            let blocked = state
                .furniture
                .first_at(door, |f| f.door.is_none() && !f.passable)
                .is_some();
            if !terrain_ok || blocked {
                return Err(ShambleError::GenerationFailed(format!(
                    "Door at {} is blocked",
                    door
                )));
            }
        }
        for required in &self.required_rooms {
            if !layout.rooms.iter().any(|room| room.template == required.name) {
                return Err(ShambleError::GenerationFailed(format!(
                    "Required room '{}' was not placed",
                    required.name
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "FloorGenerator"
    }
}
