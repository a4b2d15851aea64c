//! Armor mitigation and damage application.

/// Result of filtering one hit through armor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mitigation {
    /// Armor left after the hit.
    pub armor_after: u32,
    /// Damage that reaches health.
    pub health_damage: u32,
    /// Overflow beyond the armor pool when this hit broke the armor.
    ///
    /// `None` when armor held (or there was no armor to break).
    pub broken_overflow: Option<u32>,
}

/// Filter incoming damage through armor.
///
/// # Formula
///
/// ```text
/// armor == 0:
///     health_damage = damage
///
/// damage <= armor:
///     armor        -= damage
///     health_damage = damage / divisor
///
/// damage > armor:
///     health_damage = armor / divisor + (damage - armor)
///     armor         = 0                       (armor broken)
/// ```
///
/// Divisions round toward zero. `divisor` must be at least 1; entity
/// construction enforces this.
///
/// A hit that exactly empties the armor pool takes the first branch and does
/// not count as breaking it.
pub fn mitigate(armor: u32, damage: u32, divisor: u32) -> Mitigation {
    debug_assert!(divisor >= 1, "armor divisor must be at least 1");
    let divisor = divisor.max(1);

    if armor == 0 {
        return Mitigation {
            armor_after: 0,
            health_damage: damage,
            broken_overflow: None,
        };
    }

    if damage <= armor {
        Mitigation {
            armor_after: armor - damage,
            health_damage: damage / divisor,
            broken_overflow: None,
        }
    } else {
        let reduced = armor / divisor;
        let overflow = damage - armor;
        Mitigation {
            armor_after: 0,
            health_damage: reduced + overflow,
            broken_overflow: Some(overflow),
        }
    }
}

/// Apply damage to current health.
///
/// # Returns
///
/// New health value (clamped to 0)
pub fn apply_damage(current_health: u32, damage: u32) -> u32 {
    current_health.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_armor_passes_damage_through() {
        let m = mitigate(0, 7, 2);
        assert_eq!(m.health_damage, 7);
        assert_eq!(m.armor_after, 0);
        assert_eq!(m.broken_overflow, None);
    }

    #[test]
    fn damage_within_armor_is_divided() {
        let m = mitigate(10, 7, 2);
        assert_eq!(m.armor_after, 3);
        assert_eq!(m.health_damage, 3);
        assert_eq!(m.broken_overflow, None);
    }

    #[test]
    fn damage_exactly_matching_armor_does_not_break_it() {
        let m = mitigate(10, 10, 2);
        assert_eq!(m.armor_after, 0);
        assert_eq!(m.health_damage, 5);
        assert_eq!(m.broken_overflow, None);
    }

    #[test]
    fn damage_beyond_armor_breaks_it() {
        // armor 10, divisor 2, damage 15 -> 10/2 + 5 = 10
        let m = mitigate(10, 15, 2);
        assert_eq!(m.armor_after, 0);
        assert_eq!(m.health_damage, 10);
        assert_eq!(m.broken_overflow, Some(5));
    }

    #[test]
    fn small_hits_round_down_to_nothing() {
        let m = mitigate(20, 1, 2);
        assert_eq!(m.armor_after, 19);
        assert_eq!(m.health_damage, 0);
    }

    #[test]
    fn divisor_of_one_only_costs_armor() {
        let m = mitigate(5, 9, 1);
        assert_eq!(m.health_damage, 9);
        assert_eq!(m.broken_overflow, Some(4));
    }

    #[test]
    fn health_damage_never_exceeds_raw_damage() {
        for armor in 0..=30 {
            for damage in 0..=40 {
                for divisor in 1..=4 {
                    let m = mitigate(armor, damage, divisor);
                    assert!(m.health_damage <= damage);
                    assert!(m.armor_after <= armor);
                }
            }
        }
    }

    #[test]
    fn apply_damage_clamps_at_zero() {
        assert_eq!(apply_damage(5, 3), 2);
        assert_eq!(apply_damage(5, 50), 0);
    }
}
