/// Execution statistics of the simulated GPU, with a colored report
///
/// Counters are atomics shared by the queue worker, the vblank ticker and
/// the device, so they can be read from the test thread at any time.

use colored::*;
use std::sync::atomic::{AtomicU64, Ordering};
use galaxy_3d_frame::galaxy3d::device::Screen;

/// Snapshot of the simulated GPU counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub command_lists: u64,
    pub command_words: u64,
    pub display_transfers: u64,
    pub texture_copies: u64,
    pub memory_fills: u64,
    /// Queue runs whose last entry completed
    pub queue_runs: u64,
    pub linear_heap_flushes: u64,
    /// Vblank interrupts delivered to a registered sink, per screen
    pub vblanks: [u64; 2],
    /// Buffer swaps, per screen
    pub swaps: [u64; 2],
    /// Top screen swaps presented in stereo
    pub stereo_swaps: u64,
}

impl SimStats {
    /// Transfer engine operations of any kind
    pub fn transfers(&self) -> u64 {
        self.display_transfers + self.texture_copies + self.memory_fills
    }
}

/// Thread-safe statistics tracker
#[derive(Debug, Default)]
pub(crate) struct SimStatsTracker {
    command_lists: AtomicU64,
    command_words: AtomicU64,
    display_transfers: AtomicU64,
    texture_copies: AtomicU64,
    memory_fills: AtomicU64,
    queue_runs: AtomicU64,
    linear_heap_flushes: AtomicU64,
    vblanks: [AtomicU64; 2],
    swaps: [AtomicU64; 2],
    stereo_swaps: AtomicU64,
}

impl SimStatsTracker {
    pub(crate) fn increment_command_list(&self, words: u32) {
        self.command_lists.fetch_add(1, Ordering::Relaxed);
        self.command_words.fetch_add(words as u64, Ordering::Relaxed);
    }

    pub(crate) fn increment_display_transfer(&self) {
        self.display_transfers.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_texture_copy(&self) {
        self.texture_copies.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_memory_fill(&self) {
        self.memory_fills.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_queue_run(&self) {
        self.queue_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_linear_heap_flush(&self) {
        self.linear_heap_flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_vblank(&self, screen: Screen) {
        self.vblanks[screen.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_swap(&self, screen: Screen, stereo: bool) {
        self.swaps[screen.index()].fetch_add(1, Ordering::Relaxed);
        if stereo {
            self.stereo_swaps.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn get_stats(&self) -> SimStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        SimStats {
            command_lists: load(&self.command_lists),
            command_words: load(&self.command_words),
            display_transfers: load(&self.display_transfers),
            texture_copies: load(&self.texture_copies),
            memory_fills: load(&self.memory_fills),
            queue_runs: load(&self.queue_runs),
            linear_heap_flushes: load(&self.linear_heap_flushes),
            vblanks: [load(&self.vblanks[0]), load(&self.vblanks[1])],
            swaps: [load(&self.swaps[0]), load(&self.swaps[1])],
            stereo_swaps: load(&self.stereo_swaps),
        }
    }
}

/// Print a statistics report
pub fn print_sim_stats_report(stats: &SimStats) {
    println!("\n{}", "=== Simulated GPU Report ===".bright_blue().bold());

    if stats.queue_runs == 0 && stats.transfers() == 0 {
        println!("  {}", "No GPU work executed".bright_black());
    }

    println!("  {} {} ({} words)", "Command lists:".white().bold(), stats.command_lists, stats.command_words);
    println!("  {} {}", "Queue runs:".white().bold(), stats.queue_runs);
    if stats.display_transfers > 0 {
        println!("  {} {}", "Display transfers:".cyan(), stats.display_transfers);
    }
    if stats.texture_copies > 0 {
        println!("  {} {}", "Texture copies:".cyan(), stats.texture_copies);
    }
    if stats.memory_fills > 0 {
        println!("  {} {}", "Memory fills:".cyan(), stats.memory_fills);
    }
    println!("  {} {}", "Linear heap flushes:".white(), stats.linear_heap_flushes);

    for screen in [Screen::Top, Screen::Bottom] {
        let i = screen.index();
        println!("  {} vblanks {}, swaps {}",
            format!("{:?}:", screen).green().bold(),
            stats.vblanks[i],
            stats.swaps[i]
        );
    }
    if stats.stereo_swaps > 0 {
        println!("  {} {}", "Stereo swaps:".yellow(), stats.stereo_swaps);
    }

    println!("{}\n", "============================".bright_blue().bold());
}
