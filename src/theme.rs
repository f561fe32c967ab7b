//! Light/dark theming: colours, palettes and the theme signal.
//!
//! The hero scene never reads ambient global state for its theme. It is handed
//! a [`ThemeSource`], subscribes on mount and drops the subscription on
//! teardown; [`ThemeSignal`] is the concrete broadcaster used by the binary.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use serde::{Deserialize, Serialize};

use crate::errors::ColorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// sRGB colour in `[0, 1]`, written as `#RRGGBB` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0]);

    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ColorError(hex.to_string()))?;

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorError(hex.to_string()))
        };

        Ok(Color([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    pub fn scaled(self, factor: f32) -> Color {
        Color(self.0.map(|c| c * factor))
    }

    /// sRGB channels decoded to linear light, for blending and lighting.
    pub fn linear(self) -> [f32; 3] {
        self.0.map(|c| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    }

    /// Linear clear colour for an sRGB render target.
    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b] = self.linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// The colour a surface takes in each theme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub dark: Color,
    pub light: Color,
}

impl Palette {
    pub fn new(dark: Color, light: Color) -> Self {
        Self { dark, light }
    }

    /// Same colour in both themes.
    pub fn fixed(color: Color) -> Self {
        Self::new(color, color)
    }

    pub fn resolve(&self, theme: Theme) -> Color {
        match theme {
            Theme::Dark => self.dark,
            Theme::Light => self.light,
        }
    }
}

/// External source of theme changes.
pub trait ThemeSource {
    /// Theme in effect right now.
    fn current(&self) -> Theme;

    /// Register for future changes. Dropping the subscription unsubscribes.
    fn subscribe(&self) -> ThemeSubscription;
}

/// Receiving end of a theme subscription.
#[derive(Debug)]
pub struct ThemeSubscription {
    rx: Receiver<Theme>,
}

impl ThemeSubscription {
    /// Drain pending notifications and return the newest, if any.
    pub fn latest(&self) -> Option<Theme> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(theme) => latest = Some(theme),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return latest,
            }
        }
    }
}

#[derive(Debug)]
struct SignalState {
    current: Theme,
    subscribers: Vec<Sender<Theme>>,
}

/// Single-threaded theme broadcaster. Clones share the same state.
#[derive(Debug, Clone)]
pub struct ThemeSignal {
    inner: Rc<RefCell<SignalState>>,
}

impl ThemeSignal {
    pub fn new(initial: Theme) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalState {
                current: initial,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Publish a theme. Subscribers that were dropped are pruned here.
    pub fn set(&self, theme: Theme) {
        let mut state = self.inner.borrow_mut();
        state.current = theme;
        state.subscribers.retain(|tx| tx.send(theme).is_ok());
        log::debug!("theme set to {theme} ({} subscribers)", state.subscribers.len());
    }

    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set(next);
        next
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl Default for ThemeSignal {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl ThemeSource for ThemeSignal {
    fn current(&self) -> Theme {
        self.inner.borrow().current
    }

    fn subscribe(&self) -> ThemeSubscription {
        let (tx, rx) = mpsc::channel();
        self.inner.borrow_mut().subscribers.push(tx);
        ThemeSubscription { rx }
    }
}
