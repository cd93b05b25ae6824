//! Checklist toggle widget.
//!
//! A `CheckButton` is stateless: the caller supplies `value` on every render
//! and learns about clicks through the callbacks.  In toggle mode a click
//! reports the negated value through `on_change`.  In add mode the button
//! stands for "add a new option" and a click calls `on_click` with no
//! payload.

use std::fmt;
use std::sync::Arc;

type ChangeHandler = Arc<dyn Fn(bool) + Send + Sync>;
type ClickHandler = Arc<dyn Fn() + Send + Sync>;

const ICON_ON: &str = "/img/icons/box-button-on.svg";
const ICON_OFF: &str = "/img/icons/box-button-off.svg";
const ICON_ADD: &str = "/img/icons/box-button-add.svg";

/// What the button currently looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    On,
    Off,
    AddNew,
}

#[derive(Clone)]
pub struct CheckButton {
    label: String,
    value: bool,
    add: bool,
    on_change: Option<ChangeHandler>,
    on_click: Option<ClickHandler>,
}

impl CheckButton {
    /// A toggle button showing `value`.
    pub fn new(label: impl Into<String>, value: bool) -> Self {
        Self {
            label: label.into(),
            value,
            add: false,
            on_change: None,
            on_click: None,
        }
    }

    /// Switches the button to add mode.
    pub fn add_mode(mut self) -> Self {
        self.add = true;
        self
    }

    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(handler));
        self
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn is_add_mode(&self) -> bool {
        self.add
    }

    pub fn visual_state(&self) -> VisualState {
        match (self.add, self.value) {
            (true, _) => VisualState::AddNew,
            (false, true) => VisualState::On,
            (false, false) => VisualState::Off,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.visual_state() {
            VisualState::On => ICON_ON,
            VisualState::Off => ICON_OFF,
            VisualState::AddNew => ICON_ADD,
        }
    }

    /// Background style class; none in add mode.
    pub fn background(&self) -> Option<&'static str> {
        match self.visual_state() {
            VisualState::On => Some("box-button-on"),
            VisualState::Off => Some("box-button-off"),
            VisualState::AddNew => None,
        }
    }

    /// Handles a click.  Missing handlers make the click a no-op.
    pub fn click(&self) {
        if self.add {
            if let Some(handler) = &self.on_click {
                handler();
            }
        } else if let Some(handler) = &self.on_change {
            handler(!self.value);
        }
    }
}

impl fmt::Debug for CheckButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckButton")
            .field("label", &self.label)
            .field("value", &self.value)
            .field("add", &self.add)
            .finish_non_exhaustive()
    }
}

/// One-line text form: `[x] label`, `[ ] label` or `[+] label`.
impl fmt::Display for CheckButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.visual_state() {
            VisualState::On => "x",
            VisualState::Off => " ",
            VisualState::AddNew => "+",
        };
        write!(f, "[{mark}] {}", self.label)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
