//! Incremental grid embedding of a mission graph.

use std::collections::BTreeMap;

use crate::mission::{MissionNode, NodeId, NodeType};
use crate::rng::GenRng;

use super::cell::{Cell, CellType, Direction, DoorType, GridPos};
use super::grid::CellGrid;

/// Candidate empty slot next to an already placed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenNode {
    pub pos: GridPos,
    pub parent: GridPos,
}

/// Placed cells by coordinate, plus open slots keyed by
/// `(parent node id, access level)`.
///
/// Cells are only ever added. A failed embedding is dropped as a whole.
#[derive(Clone, Debug, Default)]
pub struct Map {
    cells: BTreeMap<GridPos, Cell>,
    node_cells: BTreeMap<NodeId, GridPos>,
    open_slots: BTreeMap<(NodeId, i32), Vec<OpenNode>>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn cell_of(&self, id: NodeId) -> Option<&Cell> {
        self.node_cells.get(&id).and_then(|pos| self.cells.get(pos))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Places the root room at the origin with one open side in a random
    /// direction.
    pub fn initialize_cell(&mut self, root: &MissionNode, rng: &mut GenRng) {
        self.place(Cell::room(GridPos::ORIGIN, root));
        let direction = Direction::ALL[rng.below(Direction::ALL.len())];
        self.open_slots.entry((root.id, root.access_level)).or_default().push(OpenNode {
            pos: GridPos::ORIGIN.step(direction),
            parent: GridPos::ORIGIN,
        });
    }

    /// Places `node` in a free slot registered under `parent_id`.
    ///
    /// Locks take a slot one level below their own and hide a key door;
    /// puzzles open the next level to their children; levers never offer
    /// slots of their own. Returns `false` when no slot is free.
    pub fn add_cell(&mut self, node: &MissionNode, parent_id: NodeId, rng: &mut GenRng) -> bool {
        let slot_level = match node.node_type {
            NodeType::Lock => node.access_level - 1,
            _ => node.access_level,
        };
        let Some(slot) = self.working_location(parent_id, slot_level, rng) else {
            return false;
        };

        let door = match node.node_type {
            NodeType::Lock => DoorType::KeyLock,
            NodeType::Puzzle | NodeType::Lever => DoorType::Open,
            _ => match self.cell(slot.parent).map(Cell::node_type) {
                Some(NodeType::Puzzle) => DoorType::PuzzleLock,
                Some(NodeType::Lever) => DoorType::LeverLock,
                _ => DoorType::Open,
            },
        };

        let mut cell = Cell::room(slot.pos, node);
        cell.parent = Some(slot.parent);
        self.place(cell);
        self.connect_cells(slot.pos, slot.parent, door);

        match node.node_type {
            NodeType::Lock => self.register_open_slots(slot.pos, (node.id, node.access_level)),
            NodeType::Puzzle => {
                self.register_open_slots(slot.pos, (node.id, node.access_level + 1))
            }
            NodeType::Lever => {}
            _ if node.children.is_empty() => {}
            _ => self.register_open_slots(slot.pos, (parent_id, node.access_level)),
        }
        true
    }

    /// Opens a door from `this` towards `other` and sets `door` on the side
    /// of `other` facing back. Both cells must exist and be adjacent.
    pub fn connect_cells(&mut self, this: GridPos, other: GridPos, door: DoorType) -> bool {
        let Some(direction) = this.direction_to(other) else {
            return false;
        };
        if !self.is_occupied(this) || !self.is_occupied(other) {
            return false;
        }
        if let Some(cell) = self.cells.get_mut(&this) {
            cell.set_door(direction, DoorType::Open);
        }
        if let Some(cell) = self.cells.get_mut(&other) {
            cell.set_door(direction.opposite(), door);
        }
        true
    }

    /// Wires the room of `from` to the room of `to` with corridor cells.
    ///
    /// Steps out of a lever room get a lever lock, every other step a
    /// one-way door. Sides that already have a door are left alone.
    pub fn make_connection(&mut self, from: NodeId, to: NodeId, max_iterations: usize) -> bool {
        let (Some(from_cell), Some(to_cell)) = (self.cell_of(from), self.cell_of(to)) else {
            return false;
        };
        let Some(points) = self.connection_points(from_cell.pos, to_cell.pos, max_iterations)
        else {
            return false;
        };

        for &pos in &points {
            if !self.is_occupied(pos) {
                self.place(Cell::connection(pos));
            }
        }
        for pair in points.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let door = match self.cell(previous) {
                Some(cell) if cell.is_room_of(NodeType::Lever) => DoorType::LeverLock,
                _ => DoorType::OneWay,
            };
            let has_door = match (current.direction_to(previous), self.cell(current)) {
                (Some(direction), Some(cell)) => cell.door(direction).is_some(),
                _ => true,
            };
            if !has_door {
                self.connect_cells(current, previous, door);
            }
        }
        true
    }

    /// Dense copy with coordinates shifted so the smallest are zero.
    pub fn to_grid(&self) -> CellGrid {
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (0, 0, 0, 0);
        for pos in self.cells.keys() {
            min_x = min_x.min(pos.x);
            max_x = max_x.max(pos.x);
            min_y = min_y.min(pos.y);
            max_y = max_y.max(pos.y);
        }
        let width = (max_x - min_x + 1) as usize;
        let height = (max_y - min_y + 1) as usize;
        let shift = |pos: GridPos| GridPos::new(pos.x - min_x, pos.y - min_y);

        let mut cells = vec![None; width * height];
        for cell in self.cells.values() {
            let mut moved = cell.clone();
            moved.pos = shift(cell.pos);
            moved.parent = cell.parent.map(shift);
            let index = moved.pos.y as usize * width + moved.pos.x as usize;
            cells[index] = Some(moved);
        }
        CellGrid::from_cells(width, height, cells)
    }

    pub(crate) fn place(&mut self, cell: Cell) {
        if cell.cell_type == CellType::Normal
            && let Some(id) = cell.node_id()
        {
            self.node_cells.insert(id, cell.pos);
        }
        self.cells.insert(cell.pos, cell);
    }

    /// A random free slot among those registered under the key, if any.
    fn working_location(
        &mut self,
        parent_id: NodeId,
        access_level: i32,
        rng: &mut GenRng,
    ) -> Option<OpenNode> {
        let slots = self.open_slots.get_mut(&(parent_id, access_level))?;
        rng.shuffle(slots);
        slots.iter().copied().find(|slot| !self.cells.contains_key(&slot.pos))
    }

    fn register_open_slots(&mut self, pos: GridPos, key: (NodeId, i32)) {
        let free: Vec<OpenNode> = pos
            .neighbors()
            .into_iter()
            .filter(|neighbor| !self.is_occupied(*neighbor))
            .map(|neighbor| OpenNode { pos: neighbor, parent: pos })
            .collect();
        self.open_slots.entry(key).or_default().extend(free);
    }
}
