use lego_render::GraphicsProbe;

/// Graphics probe backed by a wgpu adapter request.
#[derive(Debug, Clone, Default)]
pub struct WgpuProbe {
    adapter: Option<wgpu::AdapterInfo>,
}

impl WgpuProbe {
    /// Probe result for an adapter the host already requested.
    pub fn from_adapter(adapter: Option<&wgpu::Adapter>) -> Self {
        Self {
            adapter: adapter.map(|a| a.get_info()),
        }
    }

    /// Ask wgpu for any adapter on any backend.
    pub fn detect() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            },
        ));
        let probe = Self::from_adapter(adapter.as_ref());
        tracing::debug!(result = %probe.describe(), "graphics probe");
        probe
    }

    pub fn adapter_info(&self) -> Option<&wgpu::AdapterInfo> {
        self.adapter.as_ref()
    }
}

impl GraphicsProbe for WgpuProbe {
    fn is_supported(&self) -> bool {
        self.adapter.is_some()
    }

    fn describe(&self) -> String {
        match &self.adapter {
            Some(info) => format!(
                "{} ({}, {:?})",
                info.name,
                info.backend.to_str(),
                info.device_type
            ),
            None => "no adapter".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_adapter_is_unsupported() {
        let probe = WgpuProbe::from_adapter(None);
        assert!(!probe.is_supported());
        assert_eq!(probe.describe(), "no adapter");
        assert!(probe.adapter_info().is_none());
    }
}
