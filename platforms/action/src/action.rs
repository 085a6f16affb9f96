use keymap::KeyMap;

#[derive(KeyMap, Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Quit the application
    #[key("q")]
    Quit,
    /// Reset the machine to its initial tape
    #[key("r")]
    Reset,
    /// Advance the machine by one step
    #[key("space")]
    Step,
    /// Pause or resume auto-run
    #[key("p")]
    ToggleAutoPlay,
    /// Toggle help display
    #[key("h")]
    ToggleHelp,
    /// Load the previous preset tape
    #[key("left")]
    PreviousProgram,
    /// Load the next preset tape
    #[key("right")]
    NextProgram,
}
