//! Binary reader: parses an AAMP byte buffer into a [`ParameterIO`] tree.

use indexmap::IndexMap;

use super::primitive::{read_f32, read_i32, read_string, read_u16, read_u32};
use crate::error::{AampError, Result};
use crate::parameter::{Parameter, ParameterIO, ParameterList, ParameterObject};
use crate::types::{
    BufferBinary, BufferF32, BufferInt, BufferU32, Color, Crc32, Curve, CurveSegment, Quat, Vec2,
    Vec3, Vec4,
};

const HEADER_LEN: usize = 0x30;
const FLAG_LITTLE_ENDIAN: u32 = 1 << 0;
const FLAG_UTF8: u32 = 1 << 1;

/// Reader configuration, analogous to a small `Default`-deriving options
/// struct passed via a builder method rather than a constructor argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderConfig {
    /// When set, every decoded string is recorded in a CRC32 -> string
    /// side table so the name-recovery tier 1 lookup can return it exactly.
    pub track_strings: bool,
}

/// Parses an in-memory AAMP byte buffer.
pub struct Reader<'a> {
    data: &'a [u8],
    config: ReaderConfig,
    seen_strings: IndexMap<Crc32, String>,
}

impl<'a> Reader<'a> {
    /// Validate the header magic and flags and construct a reader.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < 0x0C {
            return Err(AampError::Truncated(data.len()));
        }
        let magic = &data[0..4];
        if magic != b"AAMP" {
            let mut got = [0u8; 4];
            got.copy_from_slice(magic);
            return Err(AampError::InvalidMagic(got));
        }
        let flags = read_u32(data, 0x08)?;
        if flags & FLAG_LITTLE_ENDIAN == 0 {
            return Err(AampError::UnsupportedEndianness);
        }
        if flags & FLAG_UTF8 == 0 {
            return Err(AampError::UnsupportedEncoding);
        }
        Ok(Reader {
            data,
            config: ReaderConfig::default(),
            seen_strings: IndexMap::new(),
        })
    }

    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Strings seen during parse, keyed by their CRC32. Empty unless
    /// [`ReaderConfig::track_strings`] was set.
    pub fn seen_strings(&self) -> &IndexMap<Crc32, String> {
        &self.seen_strings
    }

    /// Parse the whole archive into a [`ParameterIO`]. Can be called only
    /// once per reader since the structure section is consumed positionally,
    /// but takes `&mut self` rather than `self` so callers can still read
    /// back [`Reader::seen_strings`] afterwards.
    pub fn parse(&mut self) -> Result<ParameterIO> {
        let data_type = read_string(self.data, HEADER_LEN, None)?;
        let version = read_u32(self.data, 0x10)?;
        let format_len = read_u32(self.data, 0x14)? as usize;
        let (root_crc32, root) = self.parse_list(HEADER_LEN + format_len)?;
        Ok(ParameterIO::with_root(data_type, version, root_crc32, root))
    }

    fn parse_list(&mut self, offset: usize) -> Result<(Crc32, ParameterList)> {
        let crc32 = Crc32::new(read_u32(self.data, offset)?);
        let mut list = ParameterList::new(crc32);

        let mut obj_offset = offset + 4 * read_u16(self.data, offset + 8)? as usize;
        let obj_count = read_u16(self.data, offset + 0xA)?;
        for _ in 0..obj_count {
            let (obj_crc32, obj) = self.parse_object(obj_offset)?;
            list.objects_mut().insert(obj_crc32, obj);
            obj_offset += 8;
        }

        let mut list_offset = offset + 4 * read_u16(self.data, offset + 4)? as usize;
        let list_count = read_u16(self.data, offset + 6)?;
        for _ in 0..list_count {
            let (child_crc32, child) = self.parse_list(list_offset)?;
            list.lists_mut().insert(child_crc32, child);
            list_offset += 0xC;
        }

        Ok((crc32, list))
    }

    fn parse_object(&mut self, offset: usize) -> Result<(Crc32, ParameterObject)> {
        let crc32 = Crc32::new(read_u32(self.data, offset)?);
        let mut obj = ParameterObject::new(crc32);

        let mut param_offset = offset + 4 * read_u16(self.data, offset + 4)? as usize;
        let param_count = read_u16(self.data, offset + 6)?;
        for _ in 0..param_count {
            let (param_crc32, param) = self.parse_param(param_offset)?;
            obj.params_mut().insert(param_crc32, param);
            param_offset += 8;
        }

        Ok((crc32, obj))
    }

    fn parse_string_value(&mut self, data_offset: usize, max_len: Option<usize>) -> Result<String> {
        let s = read_string(self.data, data_offset, max_len)?;
        if self.config.track_strings {
            self.seen_strings.insert(Crc32::hash(&s), s.clone());
        }
        Ok(s)
    }

    fn parse_param(&mut self, offset: usize) -> Result<(Crc32, Parameter)> {
        let crc32 = Crc32::new(read_u32(self.data, offset)?);
        let field4 = read_u32(self.data, offset + 4)?;
        let data_offset = offset + 4 * (field4 & 0x00FF_FFFF) as usize;
        let param_type = (field4 >> 24) as u8;

        let value = match param_type {
            0 => Parameter::Bool(read_u32(self.data, data_offset)? != 0),
            1 => Parameter::F32(read_f32(self.data, data_offset)?),
            2 => Parameter::Int(read_i32(self.data, data_offset)?),
            3 => Parameter::Vec2(Vec2::new(
                read_f32(self.data, data_offset)?,
                read_f32(self.data, data_offset + 4)?,
            )),
            4 => Parameter::Vec3(Vec3::new(
                read_f32(self.data, data_offset)?,
                read_f32(self.data, data_offset + 4)?,
                read_f32(self.data, data_offset + 8)?,
            )),
            5 => Parameter::Vec4(Vec4::new(
                read_f32(self.data, data_offset)?,
                read_f32(self.data, data_offset + 4)?,
                read_f32(self.data, data_offset + 8)?,
                read_f32(self.data, data_offset + 0xC)?,
            )),
            6 => Parameter::Color(Color::new(
                read_f32(self.data, data_offset)?,
                read_f32(self.data, data_offset + 4)?,
                read_f32(self.data, data_offset + 8)?,
                read_f32(self.data, data_offset + 0xC)?,
            )),
            7 => Parameter::String32(self.parse_string_value(data_offset, Some(32))?.into()),
            8 => Parameter::String64(self.parse_string_value(data_offset, Some(64))?.into()),
            9..=12 => {
                let num_curves = (param_type - 9 + 1) as usize;
                let mut segments = Vec::with_capacity(num_curves);
                for i in 0..num_curves {
                    let base = data_offset + CurveSegment::BYTE_LEN * i;
                    let controls = [
                        read_u32(self.data, base)?,
                        read_u32(self.data, base + 4)?,
                    ];
                    let mut values = [0.0f32; 30];
                    for (x, slot) in values.iter_mut().enumerate() {
                        *slot = read_f32(self.data, base + 8 + 4 * x)?;
                    }
                    segments.push(CurveSegment::new(controls, values));
                }
                let curve = Curve::new(segments);
                match param_type {
                    9 => Parameter::Curve1(curve),
                    10 => Parameter::Curve2(curve),
                    11 => Parameter::Curve3(curve),
                    _ => Parameter::Curve4(curve),
                }
            }
            13 => {
                let count = read_u32(self.data, data_offset - 4)? as usize;
                let mut values = Vec::with_capacity(count);
                for i in 0..count {
                    values.push(read_i32(self.data, data_offset + 4 * i)?);
                }
                Parameter::BufferInt(BufferInt(values))
            }
            14 => {
                let count = read_u32(self.data, data_offset - 4)? as usize;
                let mut values = Vec::with_capacity(count);
                for i in 0..count {
                    values.push(read_f32(self.data, data_offset + 4 * i)?);
                }
                Parameter::BufferF32(BufferF32(values))
            }
            15 => Parameter::String256(self.parse_string_value(data_offset, Some(256))?.into()),
            16 => Parameter::Quat(Quat::new(
                read_f32(self.data, data_offset)?,
                read_f32(self.data, data_offset + 4)?,
                read_f32(self.data, data_offset + 8)?,
                read_f32(self.data, data_offset + 0xC)?,
            )),
            17 => Parameter::U32(read_u32(self.data, data_offset)?),
            18 => {
                let count = read_u32(self.data, data_offset - 4)? as usize;
                let mut values = Vec::with_capacity(count);
                for i in 0..count {
                    values.push(read_u32(self.data, data_offset + 4 * i)?);
                }
                Parameter::BufferU32(BufferU32(values))
            }
            19 => {
                let count = read_u32(self.data, data_offset - 4)? as usize;
                if data_offset.checked_add(count).map_or(true, |e| e > self.data.len()) {
                    return Err(AampError::Truncated(data_offset));
                }
                Parameter::BufferBinary(BufferBinary(self.data[data_offset..data_offset + count].to_vec()))
            }
            20 => Parameter::StringRef(self.parse_string_value(data_offset, None)?),
            other => return Err(AampError::UnknownParameterType(other)),
        };

        Ok((crc32, value))
    }
}

/// Convenience entry point mirroring the writer's free-function symmetry:
/// parse `data` without string tracking.
pub fn decode(data: &[u8]) -> Result<ParameterIO> {
    Reader::new(data)?.parse()
}

/// `align_up` is re-exported here since callers that assemble buffers by
/// hand (tests, benches) commonly need it alongside the reader.
pub use super::primitive::align_up as align;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::writer::write;

    fn smallest_archive() -> ParameterIO {
        ParameterIO::with_root("xml", 0, Crc32::new(0), ParameterList::new(Crc32::new(0)))
    }

    #[test]
    fn test_invalid_magic() {
        let data = [0u8; 48];
        assert!(matches!(Reader::new(&data), Err(AampError::InvalidMagic(_))));
    }

    #[test]
    fn test_decode_smallest_archive() {
        let bytes = write(&smallest_archive()).unwrap();
        let pio = decode(&bytes).unwrap();
        assert_eq!(pio.data_type, "xml");
        assert_eq!(pio.version, 0);
        assert_eq!(pio.root_crc32(), Crc32::new(0));
        assert!(pio.root().objects().is_empty());
        assert!(pio.root().lists().is_empty());
    }

    #[test]
    fn test_align_up_reexport() {
        assert_eq!(align(3, 4), 4);
    }
}
