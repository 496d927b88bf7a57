//! Text readout and the display sink boundary.
//!
//! The core hands the display a finished text buffer and nothing else: at
//! most two lines separated by `'\n'`, at most 16 characters per line. The
//! sink renders synchronously and reports nothing back.

use core::fmt::Write;

use display_interface::{AsyncWriteOnlyDataCommand, DisplayError};
use embedded_graphics::mono_font::iso_8859_1::FONT_8X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use heapless::String;

use crate::sh1107::SH1107;
use crate::{LINE_CHARS, READOUT_BYTES};

/// Consumer of a finished readout.
///
/// Contract: at most two lines of at most [`LINE_CHARS`] characters each, the
/// first line ended by `'\n'` when a second one follows. Errors stay on the
/// sink's side of the boundary.
#[allow(async_fn_in_trait)]
pub trait TextSink {
    type Error;

    async fn show(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Compose the two-line readout: raw sample on top, temperature with its
/// degree suffix below.
pub fn compose(sample: u16, temperature: &str) -> String<READOUT_BYTES> {
    let mut digits: String<5> = String::new();
    let _ = write!(digits, "{}", sample);

    let mut text = String::new();
    push_capped(&mut text, &["A0 = ", &digits]);
    let _ = text.push('\n');
    push_capped(&mut text, &["Temp = ", temperature, "°C"]);
    text
}

/// Append the parts as one panel line, cut at the panel width.
fn push_capped(out: &mut String<READOUT_BYTES>, parts: &[&str]) {
    let mut used = 0;
    for part in parts {
        for ch in part.chars() {
            if used == LINE_CHARS || out.push(ch).is_err() {
                return;
            }
            used += 1;
        }
    }
}

/// Rows the two text lines sit on, chosen for the 8x13 font on a 64px panel.
const LINE_BASELINES: [i32; 2] = [22, 40];

/// [`TextSink`] over the SH1107 panel: 16 characters of 8px glyphs per line.
pub struct TextPanel<DI, RESET> {
    panel: SH1107<DI, RESET>,
}

impl<DI, RESET> TextPanel<DI, RESET>
where
    DI: AsyncWriteOnlyDataCommand,
    RESET: OutputPin<Error = core::convert::Infallible>,
{
    pub fn new(interface: DI, rst: RESET) -> Self {
        Self {
            panel: SH1107::new(interface, rst),
        }
    }

    pub async fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.panel.init(delay).await
    }
}

impl<DI, RESET> TextSink for TextPanel<DI, RESET>
where
    DI: AsyncWriteOnlyDataCommand,
    RESET: OutputPin<Error = core::convert::Infallible>,
{
    type Error = DisplayError;

    async fn show(&mut self, text: &str) -> Result<(), DisplayError> {
        self.panel.clear();
        let style = MonoTextStyle::new(&FONT_8X13, BinaryColor::On);
        for (row, line) in text.lines().take(LINE_BASELINES.len()).enumerate() {
            Text::new(line, Point::new(0, LINE_BASELINES[row]), style).draw(&mut self.panel)?;
        }
        self.panel.flush().await
    }
}
