use core_graphics::display::{CGDisplayBounds, CGGetActiveDisplayList, CGMainDisplayID};

pub type DisplayId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// Get active display IDs using Core Graphics directly.
/// Unlike NSScreen::screens(), this doesn't depend on NSApplication's event loop.
pub fn get_active_display_ids() -> Vec<DisplayId> {
    const MAX_DISPLAYS: u32 = 16;
    let mut display_ids: [u32; 16] = [0; 16];
    let mut display_count: u32 = 0;

    let result = unsafe {
        CGGetActiveDisplayList(MAX_DISPLAYS, display_ids.as_mut_ptr(), &mut display_count)
    };

    if result != 0 {
        tracing::debug!("CGGetActiveDisplayList failed: {}", result);
        return Vec::new();
    }

    display_ids[..display_count as usize].to_vec()
}

/// Get the display size using CGDisplayBounds.
pub fn get_display_bounds(display_id: DisplayId) -> Bounds {
    let rect = unsafe { CGDisplayBounds(display_id) };
    Bounds {
        width: rect.size.width,
        height: rect.size.height,
    }
}

/// Full bounds of the display holding the menu bar, or None when no display is active.
pub fn get_main_display_bounds() -> Option<Bounds> {
    let active = get_active_display_ids();
    if active.is_empty() {
        return None;
    }

    let main_id = unsafe { CGMainDisplayID() };
    if !active.contains(&main_id) {
        tracing::debug!("Main display {} is not in the active list", main_id);
        return None;
    }

    let bounds = get_display_bounds(main_id);
    if bounds.width < 1.0 || bounds.height < 1.0 {
        return None;
    }
    Some(bounds)
}
