use crate::tiles::source::MapStyle;

/// Buttons stacked in the map's top-right corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapControl {
    Locate,
    ZoomIn,
    ZoomOut,
    Reset,
    ToggleStyle,
}

impl MapControl {
    /// Display order, top to bottom
    pub const ALL: [MapControl; 5] = [
        MapControl::Locate,
        MapControl::ZoomIn,
        MapControl::ZoomOut,
        MapControl::Reset,
        MapControl::ToggleStyle,
    ];

    /// Short button text. The style toggle names the style it switches to.
    pub fn label(self, style: MapStyle) -> &'static str {
        match self {
            MapControl::Locate => "◎",
            MapControl::ZoomIn => "+",
            MapControl::ZoomOut => "−",
            MapControl::Reset => "⟲",
            MapControl::ToggleStyle => style.toggle_label(),
        }
    }

    /// Hover text
    pub fn tooltip(self) -> &'static str {
        match self {
            MapControl::Locate => "Find my location",
            MapControl::ZoomIn => "Zoom in",
            MapControl::ZoomOut => "Zoom out",
            MapControl::Reset => "Reset view",
            MapControl::ToggleStyle => "Toggle map style",
        }
    }
}

/// A control as the host should draw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub control: MapControl,
    pub label: &'static str,
    pub enabled: bool,
}

/// Current state of every control. Locate is disabled while a request is
/// outstanding.
pub fn control_states(style: MapStyle, locating: bool) -> Vec<ControlState> {
    MapControl::ALL
        .iter()
        .map(|&control| ControlState {
            control,
            label: control.label(style),
            enabled: !(control == MapControl::Locate && locating),
        })
        .collect()
}

/// "Zoom: 12 • 4 babysitters shown • Location enabled"
pub fn status_line(zoom: u8, markers_shown: usize, location_enabled: bool) -> String {
    let mut line = format!("Zoom: {} • {} babysitters shown", zoom, markers_shown);
    if location_enabled {
        line.push_str(" • Location enabled");
    }
    line
}
