use std::fmt::Display;

/// Value of the density flag which marks a scintillator tile module
pub const SCINTILLATOR_DENSITY: i32 = 2;

/// ModuleID is the geometric address of a detector module: (layer, u, v).
///
/// It is the key used to join the hardware mapping against the trigger cell load table,
/// so it is hashable and ordered (layer first, then u, then v).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ModuleID {
    pub layer: i32,
    pub u: i32,
    pub v: i32,
}

impl ModuleID {
    /// Construct a new module ID
    pub fn new(layer: i32, u: i32, v: i32) -> Self {
        ModuleID { layer, u, v }
    }
}

impl Display for ModuleID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.layer, self.u, self.v)
    }
}

/// Which of the two possible lpGBTs of a module a link occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSlot {
    First,
    Second,
}

impl LinkSlot {
    pub const ALL: [LinkSlot; 2] = [LinkSlot::First, LinkSlot::Second];
}
