/*!
# Galaxy 3D Frame - Simulated Device Backend

Software simulation of the console GPU behind the Galaxy 3D frame layer.

This crate implements the galaxy_3d_frame device traits with real threads:
a command queue worker that executes entries in order with a configurable
latency, a vblank ticker raising both screens' interrupts at the refresh
rate, a two-bank VRAM allocator and wall-clock tick counters. It lets the
frame protocol run end to end without hardware.

# Example

```no_run
use galaxy_3d_frame::galaxy3d::RenderQueueConfig;
use galaxy_3d_frame_device_sim::galaxy3d::{SimDeviceConfig, SimGpu};

let gpu = SimGpu::new(SimDeviceConfig::default())?;
let (mut rq, handle) = gpu.into_render_queue(RenderQueueConfig::default());
rq.frame_sync()?;
println!("{:?}", handle.stats());
# Ok::<(), galaxy_3d_frame::galaxy3d::Error>(())
```
*/

mod config;
mod debug;
mod sim_command_queue;
mod sim_device;
mod sim_gpu;
mod sim_tick_counter;
mod sim_vram;

pub use config::SimDeviceConfig;
pub use debug::{print_sim_stats_report, SimStats};
pub use sim_command_queue::SimCommandQueue;
pub use sim_device::{SimGraphicsDevice, COMMAND_BUFFER_BASE, COMMAND_BUFFER_WORDS};
pub use sim_gpu::{SimGpu, SimGpuHandle};
pub use sim_tick_counter::SimTickCounter;
pub use sim_vram::{SimVramAllocator, VRAM_ALIGNMENT, VRAM_BANK_SIZE, VRAM_BASE};

// Main galaxy3d namespace module
pub mod galaxy3d {
    pub use crate::{
        print_sim_stats_report, SimCommandQueue, SimDeviceConfig, SimGpu, SimGpuHandle,
        SimGraphicsDevice, SimStats, SimTickCounter, SimVramAllocator,
    };
}
