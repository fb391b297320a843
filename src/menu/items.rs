//! The catalog of editable settings.
//!
//! One [`SettingDescriptor`] per [`FireSettings`] field, in the order
//! the menu walks them.  Numeric fields carry their edit ranges here so
//! the menu clamps at the same bounds the settings store validates.

use crate::config::FireSettings;

/// Identity of one menu entry.  Doubles as the cursor index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum SettingId {
    Dwell = 0,
    ShotDelay,
    BurstDelay,
    TriggerDebounce,
    BurstSize,
    ShotLimit,
    ForceReload,
    FullAutoBurst,
    BinaryTrigger,
    MuzzleFlash,
    InvertSelector,
}

impl SettingId {
    pub const COUNT: usize = 11;

    pub const ALL: [SettingId; Self::COUNT] = [
        SettingId::Dwell,
        SettingId::ShotDelay,
        SettingId::BurstDelay,
        SettingId::TriggerDebounce,
        SettingId::BurstSize,
        SettingId::ShotLimit,
        SettingId::ForceReload,
        SettingId::FullAutoBurst,
        SettingId::BinaryTrigger,
        SettingId::MuzzleFlash,
        SettingId::InvertSelector,
    ];

    pub fn descriptor(self) -> &'static SettingDescriptor {
        &ITEMS[self as usize]
    }

    /// Current value of this field, widened to `u16` (toggles read 0/1).
    pub fn read(self, settings: &FireSettings) -> u16 {
        match self {
            Self::Dwell => settings.dwell_ms,
            Self::ShotDelay => settings.shot_delay_ms,
            Self::BurstDelay => settings.burst_delay_ms,
            Self::TriggerDebounce => settings.trigger_debounce_ms,
            Self::BurstSize => u16::from(settings.burst_size),
            Self::ShotLimit => settings.shot_limit,
            Self::ForceReload => u16::from(settings.force_reload),
            Self::FullAutoBurst => u16::from(settings.full_auto_burst),
            Self::BinaryTrigger => u16::from(settings.binary_trigger),
            Self::MuzzleFlash => u16::from(settings.muzzle_flash),
            Self::InvertSelector => u16::from(settings.invert_selector),
        }
    }

    /// Write a value produced by [`read`](Self::read) arithmetic back.
    /// The menu keeps `value` inside the descriptor bounds.
    pub fn write(self, settings: &mut FireSettings, value: u16) {
        match self {
            Self::Dwell => settings.dwell_ms = value,
            Self::ShotDelay => settings.shot_delay_ms = value,
            Self::BurstDelay => settings.burst_delay_ms = value,
            Self::TriggerDebounce => settings.trigger_debounce_ms = value,
            Self::BurstSize => settings.burst_size = value.min(255) as u8,
            Self::ShotLimit => settings.shot_limit = value,
            Self::ForceReload => settings.force_reload = value != 0,
            Self::FullAutoBurst => settings.full_auto_burst = value != 0,
            Self::BinaryTrigger => settings.binary_trigger = value != 0,
            Self::MuzzleFlash => settings.muzzle_flash = value != 0,
            Self::InvertSelector => settings.invert_selector = value != 0,
        }
    }
}

/// How a menu entry edits.
#[derive(Debug, Clone, Copy)]
pub enum SettingKind {
    /// On/off flag; either value key flips it.
    Toggle,
    /// Numeric field.  `step` per key press, `fast_step` per repeat
    /// while the key is held.  Edits saturate at the bounds.
    Bounded { min: u16, max: u16, step: u16, fast_step: u16 },
}

/// Static description of one menu entry.
pub struct SettingDescriptor {
    pub id: SettingId,
    pub label: &'static str,
    pub unit: &'static str,
    pub kind: SettingKind,
}

/// Menu rows, in display order.  Index == `SettingId as usize`.
pub const ITEMS: [SettingDescriptor; SettingId::COUNT] = [
    SettingDescriptor {
        id: SettingId::Dwell,
        label: "Dwell",
        unit: "ms",
        kind: SettingKind::Bounded { min: 1, max: 200, step: 1, fast_step: 5 },
    },
    SettingDescriptor {
        id: SettingId::ShotDelay,
        label: "Shot delay",
        unit: "ms",
        kind: SettingKind::Bounded { min: 0, max: 1_000, step: 5, fast_step: 25 },
    },
    SettingDescriptor {
        id: SettingId::BurstDelay,
        label: "Burst delay",
        unit: "ms",
        kind: SettingKind::Bounded { min: 0, max: 5_000, step: 10, fast_step: 100 },
    },
    SettingDescriptor {
        id: SettingId::TriggerDebounce,
        label: "Trigger quiet",
        unit: "ms",
        kind: SettingKind::Bounded { min: 0, max: 500, step: 5, fast_step: 25 },
    },
    SettingDescriptor {
        id: SettingId::BurstSize,
        label: "Burst size",
        unit: "rds",
        kind: SettingKind::Bounded { min: 1, max: 10, step: 1, fast_step: 1 },
    },
    SettingDescriptor {
        id: SettingId::ShotLimit,
        label: "Mag capacity",
        unit: "rds",
        kind: SettingKind::Bounded { min: 1, max: 10_000, step: 1, fast_step: 10 },
    },
    SettingDescriptor {
        id: SettingId::ForceReload,
        label: "Force reload",
        unit: "",
        kind: SettingKind::Toggle,
    },
    SettingDescriptor {
        id: SettingId::FullAutoBurst,
        label: "Burst chain",
        unit: "",
        kind: SettingKind::Toggle,
    },
    SettingDescriptor {
        id: SettingId::BinaryTrigger,
        label: "Binary trigger",
        unit: "",
        kind: SettingKind::Toggle,
    },
    SettingDescriptor {
        id: SettingId::MuzzleFlash,
        label: "Muzzle flash",
        unit: "",
        kind: SettingKind::Toggle,
    },
    SettingDescriptor {
        id: SettingId::InvertSelector,
        label: "Invert selector",
        unit: "",
        kind: SettingKind::Toggle,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_ids() {
        for (idx, item) in ITEMS.iter().enumerate() {
            assert_eq!(item.id as usize, idx, "row {idx} out of place");
        }
    }

    #[test]
    fn read_write_roundtrip_every_field() {
        let mut settings = FireSettings::default();
        for id in SettingId::ALL {
            let sample = match id.descriptor().kind {
                SettingKind::Toggle => 1,
                SettingKind::Bounded { max, .. } => max,
            };
            id.write(&mut settings, sample);
            assert_eq!(id.read(&settings), sample, "{:?} did not round-trip", id);
        }
    }

    #[test]
    fn toggles_read_back_as_zero_or_one() {
        let mut settings = FireSettings::default();
        assert_eq!(SettingId::ForceReload.read(&settings), 0);
        settings.force_reload = true;
        assert_eq!(SettingId::ForceReload.read(&settings), 1);
    }

    #[test]
    fn bounds_cover_the_defaults() {
        let defaults = FireSettings::default();
        for id in SettingId::ALL {
            if let SettingKind::Bounded { min, max, .. } = id.descriptor().kind {
                let value = id.read(&defaults);
                assert!(
                    (min..=max).contains(&value),
                    "{:?} default {} outside {}..={}",
                    id,
                    value,
                    min,
                    max
                );
            }
        }
    }
}
