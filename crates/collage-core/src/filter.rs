//! Per-image filter slots.
//!
//! Every image carries exactly six slots at fixed positions. A slot is
//! either empty or holds one filter value; the renderer applies the active
//! slots in slot order.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// The six fixed filter positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSlot {
    Grayscale = 0,
    Sepia = 1,
    Blur = 2,
    Brightness = 3,
    Contrast = 4,
    Saturation = 5,
}

/// How the host widget for a slot behaves.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotControl {
    /// Checkbox: on or off.
    Toggle,
    /// Range slider clamped to `range`; `0.0` is neutral.
    Slider { range: RangeInclusive<f32> },
}

impl FilterSlot {
    pub const ALL: [FilterSlot; 6] = [
        FilterSlot::Grayscale,
        FilterSlot::Sepia,
        FilterSlot::Blur,
        FilterSlot::Brightness,
        FilterSlot::Contrast,
        FilterSlot::Saturation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a host control name (`grayscale`, `blur-filter`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_suffix("-filter").unwrap_or(name);
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterSlot::Grayscale => "grayscale",
            FilterSlot::Sepia => "sepia",
            FilterSlot::Blur => "blur",
            FilterSlot::Brightness => "brightness",
            FilterSlot::Contrast => "contrast",
            FilterSlot::Saturation => "saturation",
        }
    }

    pub fn control(self) -> SlotControl {
        match self {
            FilterSlot::Grayscale | FilterSlot::Sepia => SlotControl::Toggle,
            FilterSlot::Blur => SlotControl::Slider { range: 0.0..=1.0 },
            FilterSlot::Brightness | FilterSlot::Contrast | FilterSlot::Saturation => {
                SlotControl::Slider { range: -1.0..=1.0 }
            }
        }
    }
}

/// A filter value occupying one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    Grayscale,
    Sepia,
    /// Blur radius as a fraction of the image's larger side, `[0, 1]`.
    Blur { blur: f32 },
    /// Additive brightness, `[-1, 1]` of full scale.
    Brightness { brightness: f32 },
    Contrast { contrast: f32 },
    Saturation { saturation: f32 },
}

impl Filter {
    pub fn slot(&self) -> FilterSlot {
        match self {
            Filter::Grayscale => FilterSlot::Grayscale,
            Filter::Sepia => FilterSlot::Sepia,
            Filter::Blur { .. } => FilterSlot::Blur,
            Filter::Brightness { .. } => FilterSlot::Brightness,
            Filter::Contrast { .. } => FilterSlot::Contrast,
            Filter::Saturation { .. } => FilterSlot::Saturation,
        }
    }

    /// The slider value, or `None` for toggle filters.
    pub fn value(&self) -> Option<f32> {
        match *self {
            Filter::Grayscale | Filter::Sepia => None,
            Filter::Blur { blur } => Some(blur),
            Filter::Brightness { brightness } => Some(brightness),
            Filter::Contrast { contrast } => Some(contrast),
            Filter::Saturation { saturation } => Some(saturation),
        }
    }
}

/// Input from a filter widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterInput {
    Checked(bool),
    Value(f32),
}

/// Widget values the host should display for the current stack.
/// All-default after a reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterWidgets {
    pub grayscale: bool,
    pub sepia: bool,
    pub blur: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

/// The six slots of one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterStack {
    slots: [Option<Filter>; 6],
}

impl FilterStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: FilterSlot) -> Option<Filter> {
        self.slots[slot.index()]
    }

    /// Apply a widget input to `slot`. Returns `true` if the slot changed.
    ///
    /// Toggles set or clear the slot. Slider values are clamped to the
    /// slot's range and the neutral value clears it. An input that does
    /// not match the slot's control kind is ignored.
    pub fn apply(&mut self, slot: FilterSlot, input: FilterInput) -> bool {
        let next = match (slot.control(), input) {
            (SlotControl::Toggle, FilterInput::Checked(on)) => on.then(|| toggle_filter(slot)),
            (SlotControl::Slider { range }, FilterInput::Value(v)) => {
                let v = if v.is_nan() {
                    0.0
                } else {
                    v.clamp(*range.start(), *range.end())
                };
                (v != 0.0).then(|| slider_filter(slot, v))
            }
            _ => {
                log::warn!("ignoring {input:?} for {} slot", slot.name());
                return false;
            }
        };
        let current = &mut self.slots[slot.index()];
        if *current == next {
            return false;
        }
        *current = next;
        true
    }

    pub fn clear(&mut self, slot: FilterSlot) -> bool {
        self.slots[slot.index()].take().is_some()
    }

    /// Clear all six slots. Returns `true` if anything was active.
    pub fn reset(&mut self) -> bool {
        let had_any = !self.is_empty();
        self.slots = Default::default();
        had_any
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Active filters in slot order.
    pub fn active(&self) -> impl Iterator<Item = Filter> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn widgets(&self) -> FilterWidgets {
        let value = |slot| self.get(slot).and_then(|f| f.value()).unwrap_or(0.0);
        FilterWidgets {
            grayscale: self.get(FilterSlot::Grayscale).is_some(),
            sepia: self.get(FilterSlot::Sepia).is_some(),
            blur: value(FilterSlot::Blur),
            brightness: value(FilterSlot::Brightness),
            contrast: value(FilterSlot::Contrast),
            saturation: value(FilterSlot::Saturation),
        }
    }
}

fn toggle_filter(slot: FilterSlot) -> Filter {
    match slot {
        FilterSlot::Sepia => Filter::Sepia,
        _ => Filter::Grayscale,
    }
}

fn slider_filter(slot: FilterSlot, v: f32) -> Filter {
    match slot {
        FilterSlot::Blur => Filter::Blur { blur: v },
        FilterSlot::Brightness => Filter::Brightness { brightness: v },
        FilterSlot::Contrast => Filter::Contrast { contrast: v },
        _ => Filter::Saturation { saturation: v },
    }
}
