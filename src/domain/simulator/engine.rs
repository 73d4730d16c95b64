use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::simulator::sim_time::SimTime;
use crate::error::Result;

/// A wake-up that can be queued by the [`SimulationEngine`].
pub trait Wakeable: std::fmt::Debug {
    /// Lower classes resume first among wake-ups scheduled for the same instant.
    fn priority(&self) -> u8;
}

/// Owner of the process state. The engine hands every due wake-up to the host,
/// which runs the process until its next suspension point.
pub trait ProcessHost<W: Wakeable> {
    fn resume(&mut self, wakeup: W, engine: &mut SimulationEngine<W>) -> Result<()>;
}

#[derive(Debug)]
struct ScheduledWakeup<W> {
    at: SimTime,
    priority: u8,
    seq: u64,
    wakeup: W,
}

impl<W> ScheduledWakeup<W> {
    fn key(&self) -> (SimTime, u8, u64) {
        (self.at, self.priority, self.seq)
    }
}

impl<W> PartialEq for ScheduledWakeup<W> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<W> Eq for ScheduledWakeup<W> {}

impl<W> PartialOrd for ScheduledWakeup<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W> Ord for ScheduledWakeup<W> {
    // BinaryHeap is a max-heap; the earliest key must compare greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Cooperative single-threaded scheduler over virtual time.
///
/// Wake-ups are ordered by `(time, priority, insertion sequence)`, so the
/// order inside one instant is deterministic. Wake-ups at or beyond the
/// horizon never resume.
#[derive(Debug)]
pub struct SimulationEngine<W> {
    now: SimTime,
    horizon: SimTime,
    next_seq: u64,
    resumed: u64,
    queue: BinaryHeap<ScheduledWakeup<W>>,
}

impl<W: Wakeable> SimulationEngine<W> {
    pub fn new(horizon: SimTime) -> Self {
        SimulationEngine { now: SimTime::ZERO, horizon, next_seq: 0, resumed: 0, queue: BinaryHeap::new() }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    /// Number of wake-ups waiting in the queue.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of wake-ups resumed so far.
    pub fn resumed(&self) -> u64 {
        self.resumed
    }

    pub fn next_wakeup_time(&self) -> Option<SimTime> {
        self.queue.peek().map(|item| item.at)
    }

    /// Schedules `wakeup` at the absolute time `at`. Times in the past are moved to `now`.
    pub fn schedule_at(&mut self, at: SimTime, wakeup: W) {
        let at = if at < self.now {
            log::warn!("Wake-up {:?} scheduled in the past ({} < {}), resuming it now.", wakeup, at, self.now);
            self.now
        } else {
            at
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        let priority = wakeup.priority();
        self.queue.push(ScheduledWakeup { at, priority, seq, wakeup });
    }

    pub fn schedule_in(&mut self, delay: f64, wakeup: W) {
        let at = self.now.after(delay);
        self.schedule_at(at, wakeup);
    }

    /// Resumes the next wake-up if it is due before both `until` and the horizon.
    ///
    /// # Returns
    /// `true` if a wake-up was resumed.
    pub fn step<H: ProcessHost<W>>(&mut self, host: &mut H, until: SimTime) -> Result<bool> {
        let limit = until.min(self.horizon);

        match self.queue.peek() {
            Some(next) if next.at < limit => {}
            _ => return Ok(false),
        }

        let Some(item) = self.queue.pop() else {
            return Ok(false);
        };

        self.now = item.at;
        self.resumed += 1;
        host.resume(item.wakeup, self)?;

        Ok(true)
    }

    /// Runs every wake-up due before `until` (capped at the horizon) and
    /// leaves `now` at that bound.
    pub fn run_until<H: ProcessHost<W>>(&mut self, host: &mut H, until: SimTime) -> Result<()> {
        while self.step(host, until)? {}

        let limit = until.min(self.horizon);
        if limit > self.now {
            self.now = limit;
        }

        Ok(())
    }

    /// Runs until the horizon. Wake-ups still pending afterwards are dropped.
    pub fn run<H: ProcessHost<W>>(&mut self, host: &mut H) -> Result<()> {
        log::info!("Running simulation until t={}.", self.horizon);

        let horizon = self.horizon;
        self.run_until(host, horizon)?;

        log::info!("Simulation ended at t={} after {} wake-ups ({} pending wake-ups discarded).", self.now, self.resumed, self.queue.len());
        self.queue.clear();

        Ok(())
    }
}
