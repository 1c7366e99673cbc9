//! Like and collect buttons: optimistic flips that reconcile with the
//! server once every request has answered.

/// Displayed state of one like or collect button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggle {
    active: bool,
    count: u64,
    latest: u64,
    in_flight: u32,
    /// Newest token the server accepted, and the state it left behind.
    confirmed: (u64, bool),
}

/// Ticket for one request started by [`Toggle::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub token: u64,
    /// State the request asks the server for.
    pub target: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The display already agrees with what the server holds.
    Kept,
    /// The display went back to the confirmed state.
    Reverted,
    /// Other requests are still out; nothing was reconciled yet.
    Waiting,
}

impl Toggle {
    pub fn new(active: bool, count: u64) -> Self {
        Self {
            active,
            count,
            latest: 0,
            in_flight: 0,
            confirmed: (0, active),
        }
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn show(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        self.active = active;
        self.count = if active {
            self.count.saturating_add(1)
        } else {
            self.count.saturating_sub(1)
        };
    }

    /// Flips the display and the count. The caller sends the request.
    pub fn begin(&mut self) -> PendingToggle {
        self.show(!self.active);
        self.latest += 1;
        self.in_flight += 1;
        PendingToggle {
            token: self.latest,
            target: self.active,
        }
    }

    /// Records the answer to `pending`. A success only counts when no newer
    /// request has succeeded before it. Once the last outstanding request
    /// answers, the display is brought back to the confirmed state if it
    /// drifted.
    pub fn settle(&mut self, pending: PendingToggle, ok: bool) -> Settled {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ok && pending.token > self.confirmed.0 {
            self.confirmed = (pending.token, pending.target);
        }
        if self.in_flight > 0 {
            return Settled::Waiting;
        }
        if self.active == self.confirmed.1 {
            Settled::Kept
        } else {
            self.show(self.confirmed.1);
            Settled::Reverted
        }
    }
}
