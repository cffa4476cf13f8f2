//! Scheduling policies.

/// How a schedule call maps onto the timer map.
///
/// `delay` is interpreted per policy: the one-shot slot offset for
/// `Delayed`, the recurrence interval for the recurring policies, unused
/// for `Immediate` and `Always`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Fire once, on the next tick.
    Immediate,
    /// Fire once, `delay` units from now.
    Delayed,
    /// Fire on the next tick, then every `delay` units.
    RecurringImmediate,
    /// Fire `delay` units from now, then every `delay` units.
    RecurringDelayed,
    /// Fire on every tick.
    Always,
}

impl SchedulePolicy {
    /// Whether events scheduled under this policy reinsert after firing.
    #[must_use]
    pub fn is_recurring(self) -> bool {
        matches!(
            self,
            Self::RecurringImmediate | Self::RecurringDelayed | Self::Always
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurring_classification() {
        assert!(!SchedulePolicy::Immediate.is_recurring());
        assert!(!SchedulePolicy::Delayed.is_recurring());
        assert!(SchedulePolicy::RecurringImmediate.is_recurring());
        assert!(SchedulePolicy::RecurringDelayed.is_recurring());
        assert!(SchedulePolicy::Always.is_recurring());
    }
}
