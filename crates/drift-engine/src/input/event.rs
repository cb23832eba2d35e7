/// Page events the backdrop reacts to.
/// The web bridge translates DOM events into these; headless hosts build them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The cursor moved to surface coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A click landed at surface coordinates (x, y).
    Click { x: f32, y: f32 },
    /// The surface changed size.
    Resize { width: f32, height: f32 },
    /// The page went to the background (`hidden = true`) or came back.
    VisibilityChange { hidden: bool },
    /// The theme toggle announced a new theme by name ("light", "dark").
    ThemeChanged { theme: String },
    /// The page is being torn down.
    Teardown,
}
