//! Keyboard shortcuts mapped to viewer actions.

/// Every user-facing action the viewer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ZoomIn,
    ZoomOut,
    ZoomReset,
    OpenFile,
    NextPage,
    PrevPage,
    ScrollDown,
    ScrollUp,
    ScrollLeft,
    ScrollRight,
    RotateClockwise,
    RotateCounterClockwise,
    ResetView,
}

/// A key press reduced to what the binding table cares about.
///
/// Letters are stored lowercase with `shift` set for capitals. For symbols
/// the character already reflects the shift state (`+` vs `=`), so `shift`
/// is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: char,
    pub shift: bool,
    pub ctrl: bool,
}

impl KeyChord {
    pub const fn new(key: char, shift: bool, ctrl: bool) -> Self {
        if key.is_ascii_alphabetic() {
            Self {
                key: key.to_ascii_lowercase(),
                shift: shift || key.is_ascii_uppercase(),
                ctrl,
            }
        } else {
            Self {
                key,
                shift: false,
                ctrl,
            }
        }
    }

    pub const fn plain(key: char) -> Self {
        Self::new(key, false, false)
    }
}

pub const DEFAULT_BINDINGS: &[(KeyChord, Action)] = &[
    (KeyChord::plain('='), Action::ZoomIn),
    (KeyChord::plain('-'), Action::ZoomOut),
    (KeyChord::plain('+'), Action::ZoomReset),
    (KeyChord::new('o', false, true), Action::OpenFile),
    (KeyChord::new('j', true, false), Action::NextPage),
    (KeyChord::new('k', true, false), Action::PrevPage),
    (KeyChord::plain('j'), Action::ScrollDown),
    (KeyChord::plain('k'), Action::ScrollUp),
    (KeyChord::plain('h'), Action::ScrollLeft),
    (KeyChord::plain('l'), Action::ScrollRight),
    (KeyChord::plain(','), Action::RotateClockwise),
    (KeyChord::plain('.'), Action::RotateCounterClockwise),
    (KeyChord::new('r', true, false), Action::ResetView),
];

pub fn lookup(chord: KeyChord) -> Option<Action> {
    DEFAULT_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == chord)
        .map(|(_, action)| *action)
}
