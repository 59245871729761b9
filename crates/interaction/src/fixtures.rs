//! Stock fixtures: hinged furniture and the image poster.
//!
//! Fixtures track their logical state only; animating the door leaf or the
//! drawer slide is left to whatever renders the scene.

use roomkit_scene::SceneWorld;
use tracing::{debug, info};

use crate::interactable::{Actor, Interactable};

/// Kind of hinged fixture, which decides its prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HingeKind {
    /// Room door.
    Door,
    /// Sliding drawer.
    Drawer,
    /// Cupboard door.
    Cupboard,
    /// Toilet seat lid.
    ToiletSeat,
}

impl HingeKind {
    fn prompts(self) -> (&'static str, &'static str) {
        match self {
            HingeKind::Door => ("Open Door", "Close Door"),
            HingeKind::Drawer => ("Press I to Open Drawer", "Press I to Close Drawer"),
            HingeKind::Cupboard => ("Press I to Open Cupboard", "Press I to Close Cupboard"),
            HingeKind::ToiletSeat => ("Open Toilet", "Close Toilet"),
        }
    }
}

/// Two-state open/closed fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hinge {
    kind: HingeKind,
    open: bool,
    locked: bool,
}

impl Hinge {
    /// Closed, unlocked fixture.
    pub fn new(kind: HingeKind) -> Self {
        Self {
            kind,
            open: false,
            locked: false,
        }
    }

    /// Fixture kind.
    pub fn kind(&self) -> HingeKind {
        self.kind
    }

    /// Whether the fixture is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Lock or unlock. A locked fixture keeps its prompt but ignores interaction.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

impl Interactable for Hinge {
    fn on_interact(&mut self, _actor: &Actor, _world: &mut dyn SceneWorld) {
        self.open = !self.open;
        debug!(kind = ?self.kind, open = self.open, "hinge toggled");
    }

    fn can_interact(&self, _actor: &Actor) -> bool {
        !self.locked
    }

    fn prompt(&self, _actor: &Actor) -> String {
        let (open, close) = self.kind.prompts();
        let text = if self.open { close } else { open };
        text.to_string()
    }
}

/// Wall poster whose picture the player can replace.
///
/// Interacting records an upload request; picking the file is up to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Poster {
    upload_requests: u32,
}

impl Poster {
    /// Poster with no pending requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many uploads have been requested.
    pub fn upload_requests(&self) -> u32 {
        self.upload_requests
    }
}

impl Interactable for Poster {
    fn on_interact(&mut self, _actor: &Actor, _world: &mut dyn SceneWorld) {
        self.upload_requests += 1;
        info!(requests = self.upload_requests, "poster image upload requested");
    }

    fn can_interact(&self, _actor: &Actor) -> bool {
        true
    }

    fn prompt(&self, _actor: &Actor) -> String {
        "Press I to upload image".to_string()
    }
}
