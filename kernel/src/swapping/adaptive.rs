//! Feedback control of the swapper.
//!
//! Every pass that fires lowers the free-frame watermark by `beta` percent and
//! grows the batch size by `alpha` percent, so repeated memory pressure makes
//! the swapper kick in later but evict more at a time.

use super::page_replacement::{find_victim_process, ClockReplacement, PageReplacementPolicy};
use super::swap_out::swap_out;
use crate::system::SystemState;
use crate::threading::process::Pid;
use pageswap_shared::println;

pub const INITIAL_THRESHOLD: usize = 100;
pub const INITIAL_PAGES_PER_PASS: usize = 4;
pub const PAGES_PER_PASS_LIMIT: usize = 100;

/// Growth of the batch size per pass, in percent. Set with `SWAP_ALPHA`.
pub const SWAP_ALPHA: usize = parse_percent(env!("PAGESWAP_SWAP_ALPHA"));
/// Decay of the watermark per pass, in percent. Set with `SWAP_BETA`.
pub const SWAP_BETA: usize = parse_percent(env!("PAGESWAP_SWAP_BETA"));

const fn parse_percent(s: &str) -> usize {
    let bytes = s.as_bytes();
    assert!(!bytes.is_empty(), "empty percentage");
    let mut value = 0;
    let mut i = 0;
    while i < bytes.len() {
        assert!(bytes[i].is_ascii_digit(), "percentage is not a number");
        value = value * 10 + (bytes[i] - b'0') as usize;
        i += 1;
    }
    value
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapConfig {
    pub initial_threshold: usize,
    pub initial_pages_per_pass: usize,
    pub alpha: usize,
    pub beta: usize,
    pub limit: usize,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            initial_threshold: INITIAL_THRESHOLD,
            initial_pages_per_pass: INITIAL_PAGES_PER_PASS,
            alpha: SWAP_ALPHA,
            beta: SWAP_BETA,
            limit: PAGES_PER_PASS_LIMIT,
        }
    }
}

#[derive(Debug)]
pub struct AdaptiveController {
    threshold: usize,
    pages_per_pass: usize,
    alpha: usize,
    beta: usize,
    limit: usize,
}

impl AdaptiveController {
    pub fn new(config: SwapConfig) -> Self {
        assert!(config.beta <= 100, "beta must be a percentage");
        Self {
            threshold: config.initial_threshold.max(1),
            pages_per_pass: config.initial_pages_per_pass.min(config.limit),
            alpha: config.alpha,
            beta: config.beta,
            limit: config.limit,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn pages_per_pass(&self) -> usize {
        self.pages_per_pass
    }

    pub fn should_swap(&self, free_frames: usize) -> bool {
        free_frames <= self.threshold
    }

    /// Moves both knobs one step after a pass has run.
    pub fn adapt(&mut self) {
        self.threshold = (self.threshold * (100 - self.beta) / 100).max(1);
        self.pages_per_pass = (self.pages_per_pass * (100 + self.alpha) / 100).min(self.limit);
    }
}

/// Outcome of one eviction pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassReport {
    pub victim: Option<Pid>,
    pub swapped: usize,
    pub attempts: usize,
}

/// Runs an eviction pass if free frames are at or below the watermark, then
/// adapts the controller. Returns `None` if no pass was due.
///
/// Must not be called with a process lock held.
pub fn maybe_swap(system: &SystemState) -> Option<PassReport> {
    let mut controller = system.swap.controller.lock();
    let free = system.frames.lock().free_frames();
    if !controller.should_swap(free) {
        return None;
    }

    println!(
        "Current Threshold = {}, Swapping {} pages",
        controller.threshold(),
        controller.pages_per_pass()
    );

    let report = evict_pages(system, controller.pages_per_pass());
    controller.adapt();
    system.swap.record_pass();
    Some(report)
}

/// Evicts up to `quota` pages from the largest process, giving up after
/// `2 * quota` attempts.
fn evict_pages(system: &SystemState, quota: usize) -> PassReport {
    let mut report = PassReport {
        victim: None,
        swapped: 0,
        attempts: 0,
    };

    let victim = find_victim_process(&system.process.table.lock());
    let Some(victim) = victim else {
        swap_trace!("no victim process found");
        return report;
    };

    let mut pcb = victim.lock();
    report.victim = Some(pcb.pid);
    let policy = ClockReplacement;

    while report.swapped < quota && report.attempts < 2 * quota {
        let Some(page) = policy.select_victim(&mut pcb.page_manager) else {
            break;
        };
        match swap_out(system, &mut pcb.page_manager, page.va, page.frame) {
            Ok(()) => {
                pcb.rss = pcb.rss.saturating_sub(1);
                system.frames.lock().free_frame(page.frame);
                report.swapped += 1;
            }
            Err(err) => swap_trace!("swap-out of {:#x} failed: {}", page.va, err),
        }
        report.attempts += 1;
    }

    swap_trace!(
        "pid {}: swapped {} pages in {} attempts",
        pcb.pid,
        report.swapped,
        report.attempts
    );
    report
}
