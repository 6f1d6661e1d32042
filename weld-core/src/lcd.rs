//! 20x4 character LCD on a PCF8574 I2C backpack
//!
//! The HD44780 controller is driven in 4-bit mode. Each nibble goes out as
//! two expander writes, one with the enable strobe high and one with it low.
//!
//! | PCF8574 bit | LCD signal |
//! |-------------|------------|
//! | P0          | RS         |
//! | P1          | RW         |
//! | P2          | E          |
//! | P3          | Backlight  |
//! | P4..P7      | D4..D7     |

use core::fmt::{self, Write as _};

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::String;

use crate::report::StatusReport;
use crate::traits::StatusDisplay;

pub const COLUMNS: usize = 20;
pub const ROWS: usize = 4;

const RS: u8 = 0x01;
const ENABLE: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off, blink off
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit, 2 line, 5x8
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40, 0x14, 0x54];

/// Errors that can occur with the LCD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// The expander did not acknowledge a write
    Bus,
    /// Row or column outside the 20x4 area
    OutOfRange,
}

pub struct Lcd2004<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I, D> Lcd2004<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Power-on initialization into 4-bit mode, display cleared
    pub async fn init(&mut self) -> Result<(), LcdError> {
        self.delay.delay_ms(50).await;

        // Three times 8-bit mode, then 4-bit
        self.write_nibble(0x03, 0).await?;
        self.delay.delay_us(4500).await;
        self.write_nibble(0x03, 0).await?;
        self.delay.delay_us(4500).await;
        self.write_nibble(0x03, 0).await?;
        self.delay.delay_us(150).await;
        self.write_nibble(0x02, 0).await?;

        self.command(CMD_FUNCTION_SET).await?;
        self.command(CMD_DISPLAY_ON).await?;
        self.clear().await?;
        self.command(CMD_ENTRY_MODE).await
    }

    pub async fn clear(&mut self) -> Result<(), LcdError> {
        self.command(CMD_CLEAR).await?;
        self.delay.delay_ms(2).await;
        Ok(())
    }

    pub async fn set_cursor(&mut self, row: usize, col: usize) -> Result<(), LcdError> {
        if row >= ROWS || col >= COLUMNS {
            return Err(LcdError::OutOfRange);
        }
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row] + col as u8))
            .await
    }

    /// Write a full row, truncated or padded with spaces to the display width
    pub async fn write_row(&mut self, row: usize, text: &str) -> Result<(), LcdError> {
        self.set_cursor(row, 0).await?;

        let bytes = text.as_bytes();
        for col in 0..COLUMNS {
            let byte = bytes.get(col).copied().unwrap_or(b' ');
            self.data(byte).await?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn release(self) -> I {
        self.i2c
    }

    async fn command(&mut self, byte: u8) -> Result<(), LcdError> {
        self.write_byte(byte, 0).await
    }

    async fn data(&mut self, byte: u8) -> Result<(), LcdError> {
        self.write_byte(byte, RS).await
    }

    async fn write_byte(&mut self, byte: u8, mode: u8) -> Result<(), LcdError> {
        self.write_nibble(byte >> 4, mode).await?;
        self.write_nibble(byte & 0x0F, mode).await
    }

    async fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), LcdError> {
        let bits = (nibble << 4) | mode | BACKLIGHT;
        self.i2c
            .write(self.address, &[bits | ENABLE, bits])
            .await
            .map_err(|_| LcdError::Bus)?;
        // Commands need ~37us to execute
        self.delay.delay_us(50).await;
        Ok(())
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// Row text that stops at the display width
struct Clipped(String<COLUMNS>);

impl fmt::Write for Clipped {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn row(args: fmt::Arguments<'_>) -> String<COLUMNS> {
    let mut text = Clipped(String::new());
    // Clipped never reports an error
    let _ = text.write_fmt(args);
    text.0
}

/// The four status rows shown on the LCD
///
/// Overflowing text is cut at the display width.
pub fn status_rows(report: &StatusReport) -> [String<COLUMNS>; ROWS] {
    let s = &report.signals;
    [
        row(format_args!(
            "Motor {:<3} Steady {}",
            on_off(s.motor_requested),
            if s.motor_steady { "Y" } else { "N" }
        )),
        row(format_args!(
            "Weld {:<3} Ref {:.2}",
            on_off(s.weld_active),
            s.speed_reference
        )),
        row(format_args!(
            "Spd {:.1} Duty {:.2}",
            report.speed, report.compensation
        )),
        row(format_args!(
            "Err {:.1} Adj {:.2}",
            report.error, report.adjusted_error
        )),
    ]
}

impl<I, D> StatusDisplay for Lcd2004<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = LcdError;

    async fn print_status(&mut self, report: &StatusReport) -> Result<(), Self::Error> {
        for (row, text) in status_rows(report).iter().enumerate() {
            self.write_row(row, text).await?;
        }
        Ok(())
    }
}
