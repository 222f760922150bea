/// Answers whether the environment can run hardware-accelerated rendering.
pub trait GraphicsProbe {
    fn is_supported(&self) -> bool;

    /// Short human-readable description of what was found.
    fn describe(&self) -> String {
        if self.is_supported() {
            "supported".to_string()
        } else {
            "unsupported".to_string()
        }
    }
}

/// Probe for headless renderers that need no graphics device.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSupported;

impl GraphicsProbe for AlwaysSupported {
    fn is_supported(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        "headless".to_string()
    }
}

/// Probe that always fails, for environments known to lack acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl GraphicsProbe for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_probes() {
        assert!(AlwaysSupported.is_supported());
        assert_eq!(AlwaysSupported.describe(), "headless");
        assert!(!Unsupported.is_supported());
        assert_eq!(Unsupported.describe(), "unsupported");
    }
}
