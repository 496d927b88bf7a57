//! Minimal buffered driver for the SH1107 OLED controller.
//!
//! Drawing only touches the in-memory frame buffer; nothing reaches the bus
//! until [`flush`](SH1107::flush). The controller runs in vertical addressing
//! mode, so the frame is streamed as 64 sixteen-byte stripes.

use display_interface::{AsyncWriteOnlyDataCommand, DataFormat, DisplayError};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

const WIDTH: u8 = 128;
const HEIGHT: u8 = 64;
const BUFFER_SIZE: usize = (WIDTH as usize * HEIGHT as usize) / 8;
const STRIPE_BYTES: usize = BUFFER_SIZE / HEIGHT as usize;

pub struct SH1107<DI, RESET> {
    interface: DI,
    rst: RESET,
    buffer: [u8; BUFFER_SIZE],
}

impl<DI, RESET> SH1107<DI, RESET>
where
    DI: AsyncWriteOnlyDataCommand,
    RESET: OutputPin<Error = core::convert::Infallible>,
{
    pub fn new(interface: DI, rst: RESET) -> Self {
        Self {
            interface,
            rst,
            buffer: [0; BUFFER_SIZE],
        }
    }

    pub async fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.reset(delay).await?;
        self.send_commands(&[0xAE]).await?; // Display off while configuring
        self.send_commands(&[0x00]).await?; // Set lower column address
        self.send_commands(&[0x10]).await?; // Set higher column address
        self.send_commands(&[0xB0]).await?; // Set page address
        self.send_commands(&[0xDC, 0x00]).await?; // Set display start line
        self.send_commands(&[0x81, 0x6F]).await?; // Set contrast control
        self.send_commands(&[0x21]).await?; // Vertical memory addressing mode
        self.send_commands(&[0xA0]).await?; // Set segment remap
        self.send_commands(&[0xC0]).await?; // Set common output scan direction
        self.send_commands(&[0xA4]).await?; // Follow the RAM content
        self.send_commands(&[0xA6]).await?; // Normal (non-inverted) display
        self.send_commands(&[0xA8, 0x3F]).await?; // Multiplex ratio = height - 1
        self.send_commands(&[0xD3, 0x60]).await?; // Set display offset
        self.send_commands(&[0xD5, 0x50]).await?; // Clock divide ratio / oscillator frequency
        self.send_commands(&[0xD9, 0x22]).await?; // Set discharge / precharge period
        self.send_commands(&[0xDB, 0x35]).await?; // Set VCOM deselect level
        self.send_commands(&[0xAD, 0x81]).await?; // DC-DC converter on
        self.send_commands(&[0xAF]).await?; // Display on
        delay.delay_ms(10).await;
        Ok(())
    }

    async fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(1).await;
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(10).await;
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0x00);
    }

    /// Stream the whole frame buffer to the controller.
    pub async fn flush(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[0xB0]).await?;
        for stripe in 0..HEIGHT as usize {
            let column = (HEIGHT as usize - 1 - stripe) as u8;
            self.send_commands(&[column & 0x0F]).await?;
            self.send_commands(&[0x10 | (column >> 4)]).await?;

            let start = stripe * STRIPE_BYTES;
            let mut chunk = [0u8; STRIPE_BYTES];
            chunk.copy_from_slice(&self.buffer[start..start + STRIPE_BYTES]);
            self.send_data(&chunk).await?;
        }
        Ok(())
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_commands(DataFormat::U8(commands)).await
    }

    async fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_data(DataFormat::U8(data)).await
    }
}

impl<DI, RESET> DrawTarget for SH1107<DI, RESET>
where
    DI: AsyncWriteOnlyDataCommand,
    RESET: OutputPin<Error = core::convert::Infallible>,
{
    type Color = BinaryColor;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, colour) in pixels {
            let (x, y) = (coord.x, coord.y);
            if x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32 {
                let index = (y as usize * WIDTH as usize + x as usize) / 8;
                if colour == BinaryColor::On {
                    self.buffer[index] |= 1 << (x % 8);
                } else {
                    self.buffer[index] &= !(1 << (x % 8));
                }
            }
        }
        Ok(())
    }
}

impl<DI, RESET> OriginDimensions for SH1107<DI, RESET> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
