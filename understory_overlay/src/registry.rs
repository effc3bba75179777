// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay registry: ownership of overlay surfaces, their flags and interaction state.

use alloc::vec::Vec;
use kurbo::{Size, Vec2};
use understory_pointer::ActiveArea;

use crate::command::Interaction;
use crate::machine::InteractionState;
use crate::surface::OverlaySurface;

/// Identifier for an overlay in an [`OverlayRegistry`].
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; every `OverlayId` that pointed to it is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a distinct id.
///
/// Stale ids never alias a different live overlay because the generation must match.
/// Use [`OverlayRegistry::is_alive`] to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct OverlayId(u32, u32);

impl OverlayId {
    const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of the overlay.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of the slot when this id was issued.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Overlay flags controlling visibility and pointer interaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OverlayFlags: u8 {
        /// Overlay is shown.
        const VISIBLE      = 0b0000_0001;
        /// Overlay receives pointer interactions while visible.
        const INTERACTIVE  = 0b0000_0010;
        /// Overlay follows the show/hide binding.
        const SHOW_HIDE    = 0b0000_0100;
        /// Visibility to restore when the show/hide binding shows overlays again.
        const WANT_VISIBLE = 0b0000_1000;
    }
}

impl Default for OverlayFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::INTERACTIVE | Self::SHOW_HIDE | Self::WANT_VISIBLE
    }
}

/// Static configuration of an overlay.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Texture dimensions in pixels.
    pub texture_size: Size,
    /// Non-interactive border on each side, in texture pixels.
    pub margin: Vec2,
    /// Initial flags.
    pub flags: OverlayFlags,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            texture_size: Size::new(1.0, 1.0),
            margin: Vec2::ZERO,
            flags: OverlayFlags::default(),
        }
    }
}

#[derive(Debug)]
struct Entry<S> {
    generation: u32,
    surface: S,
    config: OverlayConfig,
    area: ActiveArea,
    state: InteractionState<OverlayId>,
}

/// Owned set of overlays.
///
/// Constructed by the application and handed to the
/// [arbitration pass](crate::Arbiter::collect) by reference; there is no global instance.
pub struct OverlayRegistry<S> {
    slots: Vec<Option<Entry<S>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    shown: bool,
}

impl<S> core::fmt::Debug for OverlayRegistry<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlayRegistry")
            .field("slots_total", &self.slots.len())
            .field("overlays_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

impl<S> Default for OverlayRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> OverlayRegistry<S> {
    /// Create an empty registry. Overlays bound to show/hide start shown.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            shown: true,
        }
    }

    /// Add an overlay and return its id.
    pub fn insert(&mut self, surface: S, config: OverlayConfig) -> OverlayId {
        let area = ActiveArea::from_margin(config.texture_size, config.margin);
        let make = |generation| Entry {
            generation,
            surface,
            config,
            area,
            state: InteractionState::new(),
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(make(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(make(generation)));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "OverlayId uses 32-bit indices by design."
        )]
        let id = OverlayId(idx as u32, generation);
        tracing::debug!(?id, flags = ?config.flags, "overlay inserted");
        id
    }

    /// Remove an overlay and return its surface.
    ///
    /// Pointers on the overlay are forgotten without callbacks; the arbitration pass treats the
    /// stale id as "no previous owner".
    pub fn remove(&mut self, id: OverlayId) -> Option<S> {
        if !self.is_alive(id) {
            return None;
        }
        let entry = self.slots[id.idx()].take()?;
        self.free_list.push(id.idx());
        tracing::debug!(?id, "overlay removed");
        Some(entry.surface)
    }

    /// Remove every overlay, dropping their surfaces.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.shown = true;
    }

    /// Returns true if `id` refers to a live overlay.
    pub fn is_alive(&self, id: OverlayId) -> bool {
        self.entry(id).is_some()
    }

    /// Number of live overlays.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if no overlay is live.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Surface of a live overlay.
    pub fn get(&self, id: OverlayId) -> Option<&S> {
        self.entry(id).map(|e| &e.surface)
    }

    /// Mutable surface of a live overlay.
    pub fn surface_mut(&mut self, id: OverlayId) -> Option<&mut S> {
        self.entry_mut(id).map(|e| &mut e.surface)
    }

    /// Live overlays in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (OverlayId, &S)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let e = slot.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "OverlayId uses 32-bit indices by design."
            )]
            let id = OverlayId(idx as u32, e.generation);
            Some((id, &e.surface))
        })
    }

    /// Current configuration of a live overlay, flags included.
    pub fn config(&self, id: OverlayId) -> Option<&OverlayConfig> {
        self.entry(id).map(|e| &e.config)
    }

    /// Current flags of a live overlay.
    pub fn flags(&self, id: OverlayId) -> Option<OverlayFlags> {
        self.entry(id).map(|e| e.config.flags)
    }

    /// Interactive area derived from the overlay's texture size and margin.
    pub fn active_area(&self, id: OverlayId) -> Option<ActiveArea> {
        self.entry(id).map(|e| e.area)
    }

    /// Interaction state of a live overlay.
    pub fn state(&self, id: OverlayId) -> Option<&InteractionState<OverlayId>> {
        self.entry(id).map(|e| &e.state)
    }

    pub(crate) fn state_mut(&mut self, id: OverlayId) -> Option<&mut InteractionState<OverlayId>> {
        self.entry_mut(id).map(|e| &mut e.state)
    }

    /// Returns true when the overlay is live, visible and interactive.
    pub fn accepts_pointer(&self, id: OverlayId) -> bool {
        self.flags(id).is_some_and(|f| {
            f.contains(OverlayFlags::VISIBLE | OverlayFlags::INTERACTIVE)
        })
    }

    /// Returns true when the overlay is live and interactive.
    pub fn is_interactive(&self, id: OverlayId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(OverlayFlags::INTERACTIVE))
    }

    /// Show or hide an overlay. Also records the visibility the show/hide binding restores.
    pub fn set_visible(&mut self, id: OverlayId, visible: bool) {
        if let Some(e) = self.entry_mut(id) {
            e.config
                .flags
                .set(OverlayFlags::VISIBLE | OverlayFlags::WANT_VISIBLE, visible);
        }
    }

    /// Enable or disable pointer interaction.
    ///
    /// Disabling keeps the current state so the next arbitration pass can release holds
    /// through the leave path. Enabling a disabled overlay starts from a fresh state.
    pub fn set_interactive(&mut self, id: OverlayId, interactive: bool) {
        if let Some(e) = self.entry_mut(id) {
            let was = e.config.flags.contains(OverlayFlags::INTERACTIVE);
            e.config.flags.set(OverlayFlags::INTERACTIVE, interactive);
            if interactive && !was {
                e.state.reset();
            }
        }
    }

    /// Change the texture size and re-derive the active area.
    pub fn set_texture_size(&mut self, id: OverlayId, size: Size) {
        if let Some(e) = self.entry_mut(id) {
            e.config.texture_size = size;
            e.area = ActiveArea::from_margin(size, e.config.margin);
        }
    }

    /// Change the dead-zone margin and re-derive the active area.
    pub fn set_margin(&mut self, id: OverlayId, margin: Vec2) {
        if let Some(e) = self.entry_mut(id) {
            e.config.margin = margin;
            e.area = ActiveArea::from_margin(e.config.texture_size, margin);
        }
    }

    /// Whether overlays bound to show/hide are currently shown.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Flip the show/hide binding.
    ///
    /// Hiding hides every [`SHOW_HIDE`](OverlayFlags::SHOW_HIDE) overlay. Showing restores
    /// only those that want to be visible.
    pub fn toggle_show_hide(&mut self) {
        self.shown = !self.shown;
        let shown = self.shown;
        for e in self.slots.iter_mut().flatten() {
            let flags = &mut e.config.flags;
            if flags.contains(OverlayFlags::SHOW_HIDE)
                && (!shown || flags.contains(OverlayFlags::WANT_VISIBLE))
            {
                flags.set(OverlayFlags::VISIBLE, shown);
            }
        }
        tracing::debug!(shown, "show/hide toggled");
    }

    fn entry(&self, id: OverlayId) -> Option<&Entry<S>> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|e| e.generation == id.1)
    }

    fn entry_mut(&mut self, id: OverlayId) -> Option<&mut Entry<S>> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|e| e.generation == id.1)
    }
}

impl<S: OverlaySurface<OverlayId>> OverlayRegistry<S> {
    /// Deliver commands to their surfaces in order and return how many were delivered.
    ///
    /// Commands addressed to overlays removed in the meantime are skipped.
    pub fn dispatch(&mut self, commands: &[Interaction<OverlayId>]) -> usize {
        let mut delivered = 0;
        for cmd in commands {
            let id = cmd.overlay();
            match self.surface_mut(id) {
                Some(surface) => {
                    cmd.deliver(surface);
                    delivered += 1;
                }
                None => tracing::debug!(?id, "skipping interaction for removed overlay"),
            }
        }
        delivered
    }
}
