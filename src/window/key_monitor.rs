#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn from_egui(key: egui::Key) -> Self {
        match key {
            egui::Key::Escape => Key::Escape,
            other => Key::Other(other.name().to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The monitor acted on the key and it must not reach anything else.
    Consumed,
    PassThrough,
}

/// Process-wide key-down listener.
///
/// Key events from every source (native window, embedded webview) are offered
/// through [`KeyMonitor::on_key_down`] and only acted on while the monitor is
/// armed, which is while the window is key. Dropping the monitor disarms it,
/// so the listener is released on every exit path.
pub struct KeyMonitor {
    armed: bool,
    listen_escape: bool,
}

impl KeyMonitor {
    pub fn new(listen_escape: bool) -> Self {
        Self {
            armed: false,
            listen_escape,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            log::debug!("Key monitor armed");
        }
    }

    /// Returns true if the monitor was armed before the call.
    pub fn disarm(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        log::debug!("Key monitor disarmed");
        true
    }

    pub fn on_key_down(&self, key: &Key) -> KeyDisposition {
        if !self.armed {
            return KeyDisposition::PassThrough;
        }
        log::debug!("Key down: {:?}", key);
        match key {
            Key::Escape if self.listen_escape => KeyDisposition::Consumed,
            _ => KeyDisposition::PassThrough,
        }
    }
}

impl Drop for KeyMonitor {
    fn drop(&mut self) {
        self.disarm();
    }
}
