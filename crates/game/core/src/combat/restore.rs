//! Capped refills for health and armor.

/// Refill `current` by `amount`, never exceeding `max`.
///
/// Returns `None` when the pool is already full, which callers report as
/// "nothing to do" rather than as an error.
pub fn restore(current: u32, max: u32, amount: u32) -> Option<u32> {
    if current >= max {
        return None;
    }
    Some(current.saturating_add(amount).min(max))
}
