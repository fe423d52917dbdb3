/// All possible semantic actions in Tablero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Board
    NewTask,
    DeleteDone,
    ShowInfo,
    Quit,

    // Overlays
    CloseOverlay,
    ScrollUp,
    ScrollDown,

    // New-task form
    FormConfirm,
    FormCancel,
    FormNextField,
    FormPrevField,
    FormChar(char),
    FormBackspace,
    FormDeleteWord,
    FormLeft,
    FormRight,
    FormHome,
    FormEnd,

    // No-op
    None,
}
