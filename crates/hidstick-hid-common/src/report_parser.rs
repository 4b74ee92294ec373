//! HID report parsing and building utilities

use crate::{HidCommonError, HidCommonResult};

/// Little-endian cursor over an inbound report.
pub struct ReportParser<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn read_u8(&mut self) -> HidCommonResult<u8> {
        let value = *self
            .buffer
            .get(self.position)
            .ok_or_else(|| HidCommonError::InvalidReport("Unexpected end of data".to_string()))?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> HidCommonResult<u16> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    pub fn read_i16_le(&mut self) -> HidCommonResult<i16> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Ok(i16::from_le_bytes([lo, hi]))
    }

    pub fn read_bytes(&mut self, count: usize) -> HidCommonResult<&'a [u8]> {
        let buffer: &'a [u8] = self.buffer;
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= buffer.len())
            .ok_or_else(|| HidCommonError::InvalidReport("Unexpected end of data".to_string()))?;
        let result = buffer.get(self.position..end).unwrap_or_default();
        self.position = end;
        Ok(result)
    }

    /// Reads exactly `N` bytes into a fixed array.
    pub fn read_array<const N: usize>(&mut self) -> HidCommonResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn skip(&mut self, count: usize) {
        self.position = self.position.saturating_add(count).min(self.buffer.len());
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn slice(&self) -> &'a [u8] {
        self.buffer
    }
}

/// Append-only byte writer with a hard capacity.
///
/// Every write checks the remaining room first; a write that would not fit
/// fails with [`HidCommonError::BufferOverflow`] and leaves the buffer
/// unchanged.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    buffer: Vec<u8>,
    capacity: usize,
}

impl ReportWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn reserve(&self, additional: usize) -> HidCommonResult<()> {
        let requested = self.buffer.len().saturating_add(additional);
        if requested > self.capacity {
            return Err(HidCommonError::BufferOverflow {
                capacity: self.capacity,
                requested,
            });
        }
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> HidCommonResult<&mut Self> {
        self.reserve(1)?;
        self.buffer.push(value);
        Ok(self)
    }

    pub fn write_u16_le(&mut self, value: u16) -> HidCommonResult<&mut Self> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i16_le(&mut self, value: i16) -> HidCommonResult<&mut Self> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> HidCommonResult<&mut Self> {
        self.reserve(data.len())?;
        self.buffer.extend_from_slice(data);
        Ok(self)
    }

    /// Writes `data` into a fixed-width field, NUL padding the remainder.
    ///
    /// At least one trailing NUL is always kept, so `data` may use at most
    /// `width - 1` bytes.
    pub fn write_padded(&mut self, data: &[u8], width: usize) -> HidCommonResult<&mut Self> {
        if data.len() >= width {
            return Err(HidCommonError::InvalidReport(format!(
                "{} bytes do not fit a NUL-terminated field of {}",
                data.len(),
                width
            )));
        }
        self.reserve(width)?;
        self.buffer.extend_from_slice(data);
        self.buffer.resize(self.buffer.len() + (width - data.len()), 0);
        Ok(self)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.buffer.len())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_parser_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut parser = ReportParser::new(&data);

        assert_eq!(parser.read_u8().expect("read byte"), 0x01);
        assert_eq!(parser.read_u8().expect("read byte"), 0x02);
        assert_eq!(parser.read_u8().expect("read byte"), 0x03);
        assert!(parser.read_u8().is_err());
    }

    #[test]
    fn test_report_parser_i16_le() {
        let data = [0x01, 0x80, 0xFF, 0x7F];
        let mut parser = ReportParser::new(&data);

        assert_eq!(parser.read_i16_le().expect("read i16"), -32767);
        assert_eq!(parser.read_i16_le().expect("read i16"), 32767);
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn test_report_parser_bytes() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut parser = ReportParser::new(&data);

        assert_eq!(parser.read_bytes(3).expect("read bytes"), &[0x01, 0x02, 0x03]);
        assert!(parser.read_bytes(3).is_err());
        assert_eq!(parser.read_array::<2>().expect("read array"), [0x04, 0x05]);
    }

    #[test]
    fn test_report_writer_chain() -> HidCommonResult<()> {
        let mut writer = ReportWriter::with_capacity(8);

        writer
            .write_u8(0x01)?
            .write_u16_le(0x1234)?
            .write_i16_le(-32767)?
            .write_bytes(&[0xAA])?;

        assert_eq!(writer.as_slice(), &[0x01, 0x34, 0x12, 0x01, 0x80, 0xAA]);
        assert_eq!(writer.remaining(), 2);
        Ok(())
    }

    #[test]
    fn test_report_writer_overflow_leaves_buffer_untouched() {
        let mut writer = ReportWriter::with_capacity(3);
        assert!(writer.write_bytes(&[1, 2]).is_ok());

        let result = writer.write_i16_le(7);
        assert!(matches!(
            result,
            Err(HidCommonError::BufferOverflow {
                capacity: 3,
                requested: 4
            })
        ));
        assert_eq!(writer.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_report_writer_padded_field() -> HidCommonResult<()> {
        let mut writer = ReportWriter::with_capacity(16);
        writer.write_padded(b"abc", 6)?;
        assert_eq!(writer.as_slice(), b"abc\0\0\0");

        assert!(writer.write_padded(b"abcdef", 6).is_err());
        assert_eq!(writer.len(), 6);
        Ok(())
    }
}
