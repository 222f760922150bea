use std::fmt;

/// What the host offers to draw into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    /// A sized region the composer may fill; the only valid kind.
    Container,
    /// A surface some other renderer already owns.
    Canvas,
    /// Inline text content with no drawable area.
    Inline,
}

impl fmt::Display for MountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Container => "container",
            Self::Canvas => "canvas",
            Self::Inline => "inline",
        })
    }
}

/// Host element the composer attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub label: String,
    pub kind: MountKind,
    pub width: u32,
    pub height: u32,
}

impl Mount {
    pub fn container(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            kind: MountKind::Container,
            width,
            height,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind == MountKind::Container
    }

    /// Width over height; a zero height is treated as one.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
