#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Shown,
    Dismissing,
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissTrigger {
    BackdropTap,
    EscapeKey,
    CloseRequested,
}

/// Presentation state of the single preview window.
///
/// Transitions only move forward: `Initializing -> Shown -> Dismissing ->
/// Terminated`. Nothing leads back to `Shown` once dismissal started.
#[derive(Debug)]
pub struct WindowState {
    phase: Phase,
    pub visible: bool,
    pub focused: bool,
    pub dismissal_armed: bool,
    trigger: Option<DismissTrigger>,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            phase: Phase::Initializing,
            visible: false,
            focused: false,
            dismissal_armed: false,
            trigger: None,
        }
    }
}

impl WindowState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn trigger(&self) -> Option<DismissTrigger> {
        self.trigger
    }

    /// `Initializing -> Shown`. Returns false if the window was already past it.
    pub fn show(&mut self) -> bool {
        if self.phase != Phase::Initializing {
            return false;
        }
        self.phase = Phase::Shown;
        self.visible = true;
        self.focused = true;
        self.dismissal_armed = true;
        true
    }

    /// `Shown -> Dismissing`. Only the first trigger is recorded.
    pub fn begin_dismissal(&mut self, trigger: DismissTrigger) -> bool {
        match self.phase {
            Phase::Shown | Phase::Initializing => {
                self.phase = Phase::Dismissing;
                self.dismissal_armed = false;
                self.trigger = Some(trigger);
                true
            }
            Phase::Dismissing | Phase::Terminated => false,
        }
    }

    /// `Dismissing -> Terminated`.
    pub fn terminate(&mut self) -> bool {
        if self.phase != Phase::Dismissing {
            return false;
        }
        self.phase = Phase::Terminated;
        self.visible = false;
        self.focused = false;
        true
    }

    pub fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Initializing | Phase::Shown)
    }
}
