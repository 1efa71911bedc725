//! # Game State Module
//!
//! Central game state shared by every system on a floor.
//!
//! [`GameState`] owns the tile grid, the object managers, the transient effect
//! layers, the random service and the external collaborators (field of view and
//! pathfinder). Nothing is global: action handlers, the AI and the generators
//! all receive the state explicitly.

use crate::{
    AStarPathfinder, AllVisible, Array2d, Capabilities, EffectLayers, Entity, FieldOfView,
    Furniture, GameConfig, GameEvent, GenerationMarker, Item, ObjectId, ObjectManager, ObjectRef,
    Pathfinder, Position, RandomService, ShambleError, ShambleResult, Tile, TypeRegistry,
};
use std::sync::Arc;

/// How the current floor is going for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// The player reached the exit
    Escaped,
    /// The player died; the player entity stays readable
    Dead,
}

/// Everything on one floor.
pub struct GameState {
    pub config: GameConfig,
    pub registry: Arc<TypeRegistry>,
    pub tiles: Array2d<Tile>,
    pub furniture: ObjectManager<Furniture>,
    pub items: ObjectManager<Item>,
    /// Single occupant per cell
    pub entities: ObjectManager<Entity>,
    /// Generation-only markers, empty during play unless placeholders are kept
    pub markers: ObjectManager<GenerationMarker>,
    pub layers: EffectLayers,
    pub random: RandomService,
    pub player_id: Option<ObjectId>,
    /// Entities removed from the grid by death, kept for the UI
    pub dead_entities: Vec<Entity>,
    pub status: GameStatus,
    pub turn_number: u64,
    fov: Box<dyn FieldOfView>,
    pathfinder: Box<dyn Pathfinder>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Creates an empty floor. Call [`GameState::set_size`] before loading.
    pub fn new(config: GameConfig, registry: Arc<TypeRegistry>) -> Self {
        let random = RandomService::from_seed(config.seed);
        Self {
            config,
            registry,
            tiles: Array2d::new(0, 0, Tile::void()),
            furniture: ObjectManager::new(0, 0),
            items: ObjectManager::new(0, 0),
            entities: ObjectManager::exclusive(0, 0),
            markers: ObjectManager::new(0, 0),
            layers: EffectLayers::new(0, 0),
            random,
            player_id: None,
            dead_entities: Vec::new(),
            status: GameStatus::Playing,
            turn_number: 0,
            fov: Box::new(AllVisible),
            pathfinder: Box::new(AStarPathfinder::new(0, 0)),
            events: Vec::new(),
        }
    }

    /// Resizes every grid and drops all content.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.tiles.set_size(width, height, Tile::void());
        self.furniture.set_size(width, height);
        self.items.set_size(width, height);
        self.entities.set_size(width, height);
        self.markers.set_size(width, height);
        self.layers.set_size(width, height);
        self.pathfinder = Box::new(AStarPathfinder::new(width, height));
        self.player_id = None;
        self.dead_entities.clear();
        self.events.clear();
        self.status = GameStatus::Playing;
        self.turn_number = 0;
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.tiles.in_bounds(pos)
    }

    /// Installs the player's field of view for this turn.
    pub fn set_fov(&mut self, fov: Box<dyn FieldOfView>) {
        self.fov = fov;
    }

    pub fn fov(&self) -> &dyn FieldOfView {
        self.fov.as_ref()
    }

    pub fn set_pathfinder(&mut self, pathfinder: Box<dyn Pathfinder>) {
        self.pathfinder = pathfinder;
    }

    pub fn pathfinder(&self) -> &dyn Pathfinder {
        self.pathfinder.as_ref()
    }

    // --- events -----------------------------------------------------------

    pub fn push_event(&mut self, event: GameEvent) {
        log::info!("{}", event);
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hands every pending event to the caller.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- spawning ---------------------------------------------------------

    pub fn spawn_entity(&mut self, type_name: &str, pos: Position) -> ShambleResult<ObjectId> {
        let entity = self.registry.make_entity(type_name, pos)?;
        self.entities.add(entity)
    }

    pub fn spawn_furniture(&mut self, type_name: &str, pos: Position) -> ShambleResult<ObjectId> {
        let furniture = self.registry.make_furniture(type_name, pos)?;
        self.furniture.add(furniture)
    }

    pub fn spawn_item(&mut self, type_name: &str, pos: Position) -> ShambleResult<ObjectId> {
        let item = self.registry.make_item(type_name, pos)?;
        self.items.add(item)
    }

    /// Places the player entity and names it from the configuration.
    pub fn spawn_player(&mut self, type_name: &str, pos: Position) -> ShambleResult<ObjectId> {
        let mut player = self.registry.make_entity(type_name, pos)?;
        if !player.is_player() {
            return Err(ShambleError::InvalidConfiguration(format!(
                "'{}' is not a player type",
                type_name
            )));
        }
        player.name = self.config.player_name.clone();
        let id = self.entities.add(player)?;
        self.player_id = Some(id);
        Ok(id)
    }

    // --- lookups ----------------------------------------------------------

    pub fn player(&self) -> Option<&Entity> {
        let id = self.player_id?;
        self.entities
            .get(id)
            .or_else(|| self.dead_entities.iter().find(|entity| entity.id == id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player_id?;
        self.entities.get_mut(id)
    }

    pub fn player_ref(&self) -> Option<ObjectRef> {
        self.player_id.map(ObjectRef::Entity)
    }

    pub fn entity_at(&self, pos: Position) -> Option<&Entity> {
        self.entities.first_at(pos, |_| true)
    }

    /// Grid position of any live object.
    pub fn object_position(&self, object: ObjectRef) -> Option<Position> {
        match object {
            ObjectRef::Entity(id) => self.entities.get(id).map(|e| e.position),
            ObjectRef::Furniture(id) => self.furniture.get(id).map(|f| f.position),
            ObjectRef::Item(id) => self.items.get(id).map(|i| i.position),
        }
    }

    /// Whether the object is still on the grid.
    pub fn object_exists(&self, object: ObjectRef) -> bool {
        self.object_position(object).is_some()
    }

    pub fn capabilities(&self, object: ObjectRef) -> Option<&Capabilities> {
        match object {
            ObjectRef::Entity(id) => self.entities.get(id).map(|e| &e.capabilities),
            ObjectRef::Furniture(id) => self.furniture.get(id).map(|f| &f.capabilities),
            ObjectRef::Item(id) => self.items.get(id).map(|i| &i.capabilities),
        }
    }

    pub fn capabilities_mut(&mut self, object: ObjectRef) -> Option<&mut Capabilities> {
        match object {
            ObjectRef::Entity(id) => self.entities.get_mut(id).map(|e| &mut e.capabilities),
            ObjectRef::Furniture(id) => self.furniture.get_mut(id).map(|f| &mut f.capabilities),
            ObjectRef::Item(id) => self.items.get_mut(id).map(|i| &mut i.capabilities),
        }
    }

    /// Display name for messages.
    pub fn object_name(&self, object: ObjectRef) -> String {
        let name = match object {
            ObjectRef::Entity(id) => self
                .entities
                .get(id)
                .or_else(|| self.dead_entities.iter().find(|entity| entity.id == id))
                .map(|e| e.name.clone()),
            ObjectRef::Furniture(id) => self.furniture.get(id).map(|f| f.name.clone()),
            ObjectRef::Item(id) => self.items.get(id).map(|i| i.name.clone()),
        };
        name.unwrap_or_else(|| "something".to_string())
    }

    /// Every live object stacked on a cell: entity first, then furniture, then items.
    pub fn objects_at(&self, pos: Position) -> Vec<ObjectRef> {
        let mut objects: Vec<ObjectRef> = self
            .entities
            .ids_at(pos)
            .iter()
            .map(|&id| ObjectRef::Entity(id))
            .collect();
        objects.extend(self.furniture.ids_at(pos).iter().map(|&id| ObjectRef::Furniture(id)));
        objects.extend(self.items.ids_at(pos).iter().map(|&id| ObjectRef::Item(id)));
        objects
    }

    // --- terrain queries --------------------------------------------------

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(pos)
    }

    /// Terrain and furniture allow standing here; entities are not considered.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tiles.get(pos).map_or(false, |tile| tile.passable)
            && self.furniture.first_at(pos, |f| !f.passable).is_none()
    }

    /// Walkable and not occupied by an entity.
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_walkable(pos) && self.entities.is_empty_at(pos)
    }

    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.tiles.get(pos).map_or(true, |tile| tile.blocks_los)
            || self.furniture.first_at(pos, |f| f.blocks_los).is_some()
    }

    /// Adds blood to a tile, clamped at the configured maximum.
    pub fn splatter(&mut self, pos: Position, amount: u32) {
        let max = self.config.blood_max;
        if let Some(tile) = self.tiles.get_mut(pos) {
            tile.splatter(amount, max);
        }
    }

    /// Flags every tile visible in the current field of view as explored.
    pub fn mark_explored(&mut self) {
        let visible: Vec<Position> = self
            .tiles
            .positions()
            .filter(|&pos| self.fov.is_visible(pos))
            .collect();
        for pos in visible {
            if let Some(tile) = self.tiles.get_mut(pos) {
                tile.explored = true;
            }
        }
    }

    // --- movement ---------------------------------------------------------

    /// Moves an entity to a free cell. Returns false when the move is blocked.
    pub fn move_entity(&mut self, id: ObjectId, to: Position) -> bool {
        if !self.is_free(to) || self.entities.move_to(id, to).is_err() {
            return false;
        }
        if Some(id) == self.player_id && self.tiles.get(to).map_or(false, |tile| tile.exit) {
            let name = self.object_name(ObjectRef::Entity(id));
            self.status = GameStatus::Escaped;
            self.push_event(GameEvent::ExitReached { name });
        }
        true
    }

    /// Moves any object kind, honouring the entity single-occupancy rule.
    pub fn move_object(&mut self, object: ObjectRef, to: Position) -> bool {
        match object {
            ObjectRef::Entity(id) => self.move_entity(id, to),
            ObjectRef::Furniture(id) => self.is_walkable(to) && self.furniture.move_to(id, to).is_ok(),
            ObjectRef::Item(id) => self.is_walkable(to) && self.items.move_to(id, to).is_ok(),
        }
    }

    /// Takes a dead entity off the grid and records it.
    pub(crate) fn bury_entity(&mut self, id: ObjectId) {
        if let Some(mut entity) = self.entities.remove(id) {
            entity.dead = true;
            if Some(id) == self.player_id {
                self.status = GameStatus::Dead;
            }
            self.dead_entities.push(entity);
        }
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }
}
