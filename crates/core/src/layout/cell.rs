//! Grid coordinates, doors and placed rooms.

use std::fmt;

use serde::Serialize;

use crate::mission::{MissionNode, NodeId, NodeType};

/// Grid coordinate. Ordering is row-major; `y` grows southwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridPos {
    pub y: i32,
    pub x: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { y: 0, x: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn neighbors(self) -> [GridPos; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }

    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction from `self` to an orthogonally adjacent `other`.
    pub fn direction_to(self, other: GridPos) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&direction| self.step(direction) == other)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Direction {
    West,
    East,
    North,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::West, Direction::East, Direction::North, Direction::South];

    pub fn index(self) -> usize {
        match self {
            Direction::West => 0,
            Direction::East => 1,
            Direction::North => 2,
            Direction::South => 3,
        }
    }

    /// `(dx, dy)` step.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DoorType {
    Open,
    KeyLock,
    LeverLock,
    PuzzleLock,
    Start,
    Exit,
    OneWay,
}

impl DoorType {
    pub const ALL: [DoorType; 7] = [
        DoorType::Open,
        DoorType::KeyLock,
        DoorType::LeverLock,
        DoorType::PuzzleLock,
        DoorType::Start,
        DoorType::Exit,
        DoorType::OneWay,
    ];

    pub fn symbol(self) -> char {
        match self {
            DoorType::Open => ' ',
            DoorType::KeyLock => 'x',
            DoorType::LeverLock => 'v',
            DoorType::PuzzleLock => 'z',
            DoorType::Start => 's',
            DoorType::Exit => 'e',
            DoorType::OneWay => 'o',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        DoorType::ALL.into_iter().find(|door| door.symbol() == symbol)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CellType {
    /// Room that hosts a mission node.
    Normal,
    /// Corridor added to wire a lever to its target.
    Connection,
}

/// Snapshot of the mission node a room hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CellNode {
    pub id: NodeId,
    pub node_type: NodeType,
    pub access_level: i32,
}

impl From<&MissionNode> for CellNode {
    fn from(node: &MissionNode) -> Self {
        Self { id: node.id, node_type: node.node_type, access_level: node.access_level }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub pos: GridPos,
    pub cell_type: CellType,
    pub node: Option<CellNode>,
    /// Door on each side, indexed by [`Direction::index`]. `None` is a wall.
    pub doors: [Option<DoorType>; 4],
    /// Cell this one was grown from.
    pub parent: Option<GridPos>,
}

impl Cell {
    pub fn room(pos: GridPos, node: &MissionNode) -> Self {
        Self {
            pos,
            cell_type: CellType::Normal,
            node: Some(CellNode::from(node)),
            doors: [None; 4],
            parent: None,
        }
    }

    pub fn connection(pos: GridPos) -> Self {
        Self { pos, cell_type: CellType::Connection, node: None, doors: [None; 4], parent: None }
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node.map(|node| node.id)
    }

    /// Room type; corridors report [`NodeType::Connection`].
    pub fn node_type(&self) -> NodeType {
        match (self.cell_type, self.node) {
            (CellType::Normal, Some(node)) => node.node_type,
            (CellType::Normal, None) => NodeType::None,
            (CellType::Connection, _) => NodeType::Connection,
        }
    }

    pub fn access_level(&self) -> Option<i32> {
        self.node.map(|node| node.access_level)
    }

    pub fn is_room_of(&self, node_type: NodeType) -> bool {
        self.cell_type == CellType::Normal && self.node_type() == node_type
    }

    pub fn door(&self, direction: Direction) -> Option<DoorType> {
        self.doors[direction.index()]
    }

    pub fn set_door(&mut self, direction: Direction, door: DoorType) {
        self.doors[direction.index()] = Some(door);
    }

    /// 5x5 text tile; locked doors show their symbol, walls are drawn.
    pub fn render_tile(&self) -> [String; 5] {
        let side = |direction: Direction, wall: char| match self.door(direction) {
            Some(door) => door.symbol(),
            None => wall,
        };
        let north = side(Direction::North, '-');
        let south = side(Direction::South, '-');
        let west = side(Direction::West, '|');
        let east = side(Direction::East, '|');
        [
            format!("+-{north}-+"),
            "|   |".to_string(),
            format!("{west} {} {east}", self.node_type().symbol()),
            "|   |".to_string(),
            format!("+-{south}-+"),
        ]
    }
}
