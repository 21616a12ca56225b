//! Numeric text output without allocation
//!
//! Everything here is built on a single [`ByteSink::write_byte`]. The
//! serial port is one sink; a `heapless::Vec` is another, which is how
//! replies get rendered into a buffer first when needed.

use heapless::Vec;

/// Digits needed for a 32-bit value in base 2
const DIGIT_STACK: usize = 32;

/// Something that accepts output one byte at a time
pub trait ByteSink {
    /// Emit one byte
    fn write_byte(&mut self, byte: u8);
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }
}

/// Bytes past capacity are discarded
impl<const N: usize> ByteSink for Vec<u8, N> {
    fn write_byte(&mut self, byte: u8) {
        let _ = self.push(byte);
    }
}

/// Text rendering on top of any [`ByteSink`]
pub trait Print: ByteSink {
    /// Emit one raw byte
    fn print_byte(&mut self, byte: u8) {
        self.write_byte(byte);
    }

    /// Emit a string, stopping early at a NUL
    fn print_str(&mut self, s: &str) {
        self.print_pgm_str(s.as_bytes());
    }

    /// Emit a NUL-terminated byte string
    ///
    /// The source may live in a separate read-only region (a `static` in
    /// flash); it is read one byte at a time up to the terminator or the
    /// end of the slice, whichever comes first.
    fn print_pgm_str(&mut self, s: &[u8]) {
        for &byte in s.iter().take_while(|&&byte| byte != 0) {
            self.print_byte(byte);
        }
    }

    /// Emit a line feed
    fn print_newline(&mut self) {
        self.print_byte(b'\n');
    }

    /// Emit `n` in `base`, most significant digit first
    ///
    /// Digits above 9 use `A`-`Z`. `base` is clamped to `2..=36`.
    fn print_integer_in_base(&mut self, n: u32, base: u32) {
        if n == 0 {
            self.print_byte(b'0');
            return;
        }

        let base = base.clamp(2, 36);
        let mut digits: Vec<u8, DIGIT_STACK> = Vec::new();
        let mut n = n;
        while n > 0 {
            // Cannot overflow: base >= 2 needs at most 32 digits
            let _ = digits.push((n % base) as u8);
            n /= base;
        }

        while let Some(digit) = digits.pop() {
            self.print_byte(digit_char(digit));
        }
    }

    /// Emit a signed decimal
    fn print_integer(&mut self, n: i32) {
        if n < 0 {
            self.print_byte(b'-');
        }
        self.print_integer_in_base(n.unsigned_abs(), 10);
    }

    /// Emit a decimal with exactly three fractional digits
    ///
    /// The fraction is scaled by 1000 and rounded half away from zero; a
    /// fraction that rounds up to 1000 carries into the integer part.
    /// Integer parts beyond `u32` saturate.
    fn print_float(&mut self, n: f64) {
        if n.is_nan() {
            self.print_str("nan");
            return;
        }
        if n.is_infinite() {
            if n < 0.0 {
                self.print_byte(b'-');
            }
            self.print_str("inf");
            return;
        }

        let integer = libm::trunc(n);
        let mut millis = libm::round(libm::fabs(n - integer) * 1000.0) as u32;
        let mut whole = libm::fabs(integer) as u32;
        if millis >= 1000 {
            millis -= 1000;
            whole = whole.saturating_add(1);
        }

        if n.is_sign_negative() && (whole > 0 || millis > 0) {
            self.print_byte(b'-');
        }
        self.print_integer_in_base(whole, 10);
        self.print_byte(b'.');
        for digit in [millis / 100, millis / 10 % 10, millis % 10] {
            self.print_byte(b'0' + digit as u8);
        }
    }

    /// Emit `n` in upper-case hexadecimal
    fn print_hex(&mut self, n: u32) {
        self.print_integer_in_base(n, 16);
    }

    /// Emit `n` in octal
    fn print_octal(&mut self, n: u32) {
        self.print_integer_in_base(n, 8);
    }

    /// Emit `n` in binary
    fn print_binary(&mut self, n: u32) {
        self.print_integer_in_base(n, 2);
    }
}

impl<T: ByteSink + ?Sized> Print for T {}

fn digit_char(digit: u8) -> u8 {
    if digit < 10 {
        b'0' + digit
    } else {
        b'A' + digit - 10
    }
}
