use std::path::PathBuf;

/// Pointer buttons the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keyboard actions, already decoupled from physical key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Next,
    Previous,
    First,
    Last,
    ToggleSlideshow,
    ResetView,
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
    OpenDirectory,
    Quit,
}

/// Work the shell has to carry out on behalf of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decode the image at `path` (playlist position `index`) and bind it as
    /// the incoming texture.
    Load { index: usize, path: PathBuf },
    /// Ask the user for a new directory.
    ChooseDirectory,
    ToggleFullscreen,
    Quit,
}
