/// GPU buffer that is re-created only when an upload outgrows it.
///
/// Writes always start at offset 0 and cover exactly the bytes given.
pub(super) struct GpuBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    min_bytes: u64,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
}

impl GpuBuffer {
    pub(super) fn new(label: &'static str, usage: wgpu::BufferUsages, min_bytes: u64) -> Self {
        Self {
            label,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            min_bytes,
            buffer: None,
            capacity: 0,
        }
    }

    pub(super) fn get(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    pub(super) fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let needed = bytes.len() as u64;
        self.ensure_capacity(device, needed);
        if let Some(buffer) = self.buffer.as_ref() {
            queue.write_buffer(buffer, 0, bytes);
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, needed: u64) {
        let Some(new_cap) = next_capacity(self.capacity, needed, self.min_bytes) else {
            return;
        };
        log::debug!("{}: {} -> {} bytes", self.label, self.capacity, new_cap);

        self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size: new_cap,
            usage: self.usage,
            mapped_at_creation: false,
        }));
        self.capacity = new_cap;
    }
}

/// Size to re-create the buffer at, or `None` when `needed` already fits.
///
/// Growth goes to the next power of two, never below `min`.
fn next_capacity(current: u64, needed: u64, min: u64) -> Option<u64> {
    (needed > current).then(|| needed.next_power_of_two().max(min))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: u64 = 256 * 32;

    #[test]
    fn fitting_upload_keeps_buffer() {
        assert_eq!(next_capacity(MIN, MIN, MIN), None);
        assert_eq!(next_capacity(MIN, 32, MIN), None);
        assert_eq!(next_capacity(16384, 8224, MIN), None);
    }

    #[test]
    fn first_upload_is_floored_at_minimum() {
        assert_eq!(next_capacity(0, 32, MIN), Some(MIN));
        assert_eq!(next_capacity(0, 4, 256 * 4), Some(1024));
    }

    #[test]
    fn outgrown_buffer_rounds_up_to_power_of_two() {
        assert_eq!(next_capacity(MIN, MIN + 32, MIN), Some(16384));
        assert_eq!(next_capacity(16384, 16385, MIN), Some(32768));
        assert_eq!(next_capacity(MIN, 65536, MIN), Some(65536));
    }
}
