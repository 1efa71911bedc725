//! Transient presentation layers written during a turn and cleared at the
//! start of the next player input cycle.

use super::{Array2d, Position};

/// Per-turn marks for the renderer.
#[derive(Debug, Clone)]
pub struct EffectLayers {
    pub smash: Array2d<bool>,
    pub damage: Array2d<bool>,
    pub sound: Array2d<bool>,
    /// Trails of knocked back objects as (from, to) segments
    pub knock_back: Vec<(Position, Position)>,
}

impl EffectLayers {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            smash: Array2d::new(width, height, false),
            damage: Array2d::new(width, height, false),
            sound: Array2d::new(width, height, false),
            knock_back: Vec::new(),
        }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.smash.set_size(width, height, false);
        self.damage.set_size(width, height, false);
        self.sound.set_size(width, height, false);
        self.knock_back.clear();
    }

    pub fn clear(&mut self) {
        self.smash.reset(false);
        self.damage.reset(false);
        self.sound.reset(false);
        self.knock_back.clear();
    }

    // Marks outside the grid are dropped.
    pub fn mark_smash(&mut self, pos: Position) {
        let _ = self.smash.set(pos, true);
    }

    pub fn mark_damage(&mut self, pos: Position) {
        let _ = self.damage.set(pos, true);
    }

    pub fn mark_sound(&mut self, pos: Position) {
        let _ = self.sound.set(pos, true);
    }

    pub fn push_knock_back(&mut self, from: Position, to: Position) {
        self.knock_back.push((from, to));
    }

    /// True when nothing has been written since the last clear.
    pub fn is_clear(&self) -> bool {
        self.knock_back.is_empty()
            && [&self.smash, &self.damage, &self.sound]
                .iter()
                .all(|layer| layer.iter().all(|(_, &marked)| !marked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_and_clear() {
        let mut layers = EffectLayers::new(4, 4);
        assert!(layers.is_clear());

        layers.mark_damage(Position::new(1, 2));
        layers.mark_sound(Position::new(9, 9));
        layers.push_knock_back(Position::new(0, 0), Position::new(2, 0));
        assert_eq!(layers.damage.get(Position::new(1, 2)), Some(&true));
        assert!(!layers.is_clear());

        layers.clear();
        assert!(layers.is_clear());
    }
}
