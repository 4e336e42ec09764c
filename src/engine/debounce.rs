//! Trailing-edge debounce, modelled explicitly.
//!
//! "Run the task `quiet_ms` after the last trigger." Each trigger supersedes
//! the previous one and hands out a new [`Ticket`]; the host schedules a
//! wakeup for it (cancelling the previous wakeup if it can). A wakeup carrying
//! a superseded ticket does nothing, so a host that cannot cancel timers is
//! still correct.

/// Identifies one scheduled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A request to call back after `delay_ms` with `ticket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    pub ticket: Ticket,
    pub delay_ms: u32,
}

#[derive(Debug, Clone)]
pub struct Debounce {
    quiet_ms: u32,
    issued: u64,
    pending: Option<(Ticket, f64)>,
}

impl Debounce {
    pub fn new(quiet_ms: u32) -> Self {
        Self {
            quiet_ms,
            issued: 0,
            pending: None,
        }
    }

    /// Schedule (or reschedule) the task. Returns the wakeup to arm.
    pub fn trigger(&mut self, now_ms: f64) -> Wakeup {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some((ticket, now_ms + f64::from(self.quiet_ms)));
        Wakeup {
            ticket,
            delay_ms: self.quiet_ms,
        }
    }

    /// A scheduled wakeup arrived. True if it is still the current one, in
    /// which case the task is consumed and must run now.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        match self.pending {
            Some((current, _)) if current == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Timer-less hosts: true once the quiet period has elapsed since the
    /// last trigger. Consumes the task.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.pending {
            Some((_, deadline)) if now_ms >= deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending task, if any.
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.pending.take().map(|(ticket, _)| ticket)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
