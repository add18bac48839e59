use crate::RenderError;

use super::DeviceInit;

/// Owns the wgpu core objects.
///
/// This type is the low-level device context:
/// - enumerates adapters and selects one per the preferred-substring policy
/// - creates and stores the Device/Queue
/// - provides the blocking wait used as the compute finish barrier
pub struct Gpu {
    /// wgpu instance used to enumerate adapters.
    instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a device context.
    ///
    /// Adapter preference: the first adapter whose name contains
    /// `init.preferred_adapter` (case-insensitive) wins; otherwise the first
    /// enumerated adapter is used. No multi-device load balancing.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: &DeviceInit) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = select_adapter(&instance, init.preferred_adapter.as_deref()).await?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("prism-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::DeviceUnavailable {
                reason: format!("failed to create wgpu device/queue: {e}"),
            })?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Blocking variant of [`Gpu::new`] for hosts without an async runtime.
    pub fn new_blocking(init: &DeviceInit) -> Result<Self, RenderError> {
        pollster::block_on(Self::new(init))
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the selected adapter's name.
    pub fn adapter_name(&self) -> String {
        self.adapter.get_info().name
    }

    /// Blocks until all submitted device work has completed.
    ///
    /// This is the synchronization barrier the compute pass issues before
    /// treating readback memory as valid.
    pub fn wait(&self) -> Result<(), RenderError> {
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::device(format!("device poll failed: {e}")))?;
        Ok(())
    }
}

async fn select_adapter(
    instance: &wgpu::Instance,
    preferred: Option<&str>,
) -> Result<wgpu::Adapter, RenderError> {
    let adapters = instance.enumerate_adapters(wgpu::Backends::all()).await;
    if adapters.is_empty() {
        return Err(RenderError::DeviceUnavailable {
            reason: "no adapters enumerated".to_string(),
        });
    }

    for adapter in &adapters {
        log::debug!("available adapter: {}", adapter.get_info().name);
    }

    let chosen = preferred.and_then(|needle| {
        let needle = needle.to_ascii_lowercase();
        adapters
            .iter()
            .position(|a| a.get_info().name.to_ascii_lowercase().contains(&needle))
    });

    let index = match chosen {
        Some(i) => i,
        None => {
            if let Some(needle) = preferred {
                log::warn!("no adapter matches '{needle}', falling back to the first");
            }
            0
        }
    };

    let mut adapters = adapters;
    Ok(adapters.swap_remove(index))
}
