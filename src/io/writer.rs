//! Binary writer: serialises a [`ParameterIO`] tree into AAMP bytes.
//!
//! Mirrors the three-phase algorithm of the format's canonical encoder:
//! header placeholders, a breadth-first structure section (all list
//! records, then all object records, then all parameter records), and a
//! trailing data section plus string section with deduplication.

use std::collections::VecDeque;
use std::io::{Cursor, Write};

use indexmap::IndexMap;

use super::placeholder::Placeholder;
use super::primitive::{align_up, write_string, WriteLe};
use crate::error::{AampError, Result};
use crate::parameter::{Parameter, ParameterIO, ParameterList, ParameterObject};
use crate::types::Crc32;

const FLAG_LITTLE_ENDIAN: u32 = 1 << 0;
const FLAG_UTF8: u32 = 1 << 1;

struct ListWriteContext<'a> {
    list_offset: Placeholder,
    obj_offset: Placeholder,
    list: &'a ParameterList,
}

struct ObjWriteContext<'a> {
    param_offset: Placeholder,
    obj: &'a ParameterObject,
}

/// Non-string value bytes pending placement in the data section, together
/// with the placeholders that reference them (each paired with the byte
/// offset into this entry the reference should resolve to).
struct ValueEntry {
    bytes: Vec<u8>,
    references: Vec<(usize, Placeholder)>,
}

struct Writer<'a> {
    num_lists: u32,
    num_objects: u32,
    num_params: u32,
    lists: VecDeque<ListWriteContext<'a>>,
    objects: VecDeque<ObjWriteContext<'a>>,
    values: Vec<ValueEntry>,
    strings: IndexMap<Vec<u8>, Vec<Placeholder>>,
}

/// Serialise `pio` to bytes conformant to the binary wire layout.
pub fn write(pio: &ParameterIO) -> Result<Vec<u8>> {
    let mut writer = Writer {
        num_lists: 0,
        num_objects: 0,
        num_params: 0,
        lists: VecDeque::new(),
        objects: VecDeque::new(),
        values: Vec::new(),
        strings: IndexMap::new(),
    };
    writer.run(pio)
}

impl<'a> Writer<'a> {
    fn run(&mut self, pio: &'a ParameterIO) -> Result<Vec<u8>> {
        let mut stream = Cursor::new(Vec::new());

        stream.write_all(b"AAMP")?;
        stream.write_u32_le(2)?;
        stream.write_u32_le(FLAG_LITTLE_ENDIAN | FLAG_UTF8)?;
        let size_ph = Placeholder::write_u32(&mut stream, 0)?;
        stream.write_u32_le(pio.version)?; // offset 0x10
        stream.write_u32_le(align_up(pio.data_type.len() + 1, 4) as u32)?;
        let num_lists_ph = Placeholder::write_u32(&mut stream, 0)?;
        let num_objs_ph = Placeholder::write_u32(&mut stream, 0)?;
        let num_params_ph = Placeholder::write_u32(&mut stream, 0)?;
        let data_size_ph = Placeholder::write_u32(&mut stream, 0)?;
        let string_size_ph = Placeholder::write_u32(&mut stream, 0)?;
        stream.write_u32_le(0)?; // reserved, offset 0x2C

        write_string(&mut stream, &pio.data_type)?;
        pad_to(&mut stream, 4)?;

        // Phase 2: breadth-first structure section, lists before objects.
        self.emit_list(&mut stream, pio.root_crc32(), pio.root())?;

        let mut list_contexts = Vec::new();
        while let Some(ctx) = self.lists.pop_front() {
            list_contexts.push(self.emit_list_children(&mut stream, ctx)?);
        }
        for ctx in &list_contexts {
            let pos = stream.position();
            ctx.obj_offset.resolve_u16(&mut stream, pos)?;
            for (crc32, obj) in ctx.list.objects().iter() {
                self.emit_object(&mut stream, *crc32, obj)?;
            }
        }

        while let Some(ctx) = self.objects.pop_front() {
            self.emit_object_params(&mut stream, ctx)?;
        }

        // Phase 3: data section.
        let data_start = stream.position();
        for entry in &self.values {
            for (rel_offset, ph) in &entry.references {
                let pos = stream.position() + *rel_offset as u64;
                ph.resolve_u24(&mut stream, pos)?;
            }
            stream.write_all(&entry.bytes)?;
            pad_to(&mut stream, 4)?;
        }
        let data_size = stream.position() - data_start;
        data_size_ph.resolve_u32(&mut stream, data_size)?;

        // String section, pooled by exact byte match.
        let string_start = stream.position();
        for (bytes, placeholders) in self.strings.iter() {
            pad_to(&mut stream, 4)?;
            for ph in placeholders {
                let pos = stream.position();
                ph.resolve_u24(&mut stream, pos)?;
            }
            stream.write_all(bytes)?;
        }
        pad_to(&mut stream, 4)?;
        let string_size = stream.position() - string_start;
        string_size_ph.resolve_u32(&mut stream, string_size)?;

        num_lists_ph.resolve_u32(&mut stream, self.num_lists as u64)?;
        num_objs_ph.resolve_u32(&mut stream, self.num_objects as u64)?;
        num_params_ph.resolve_u32(&mut stream, self.num_params as u64)?;
        let final_pos = stream.position();
        size_ph.resolve_u32(&mut stream, final_pos)?;

        Ok(stream.into_inner())
    }

    fn emit_list(
        &mut self,
        stream: &mut Cursor<Vec<u8>>,
        crc32: Crc32,
        list: &'a ParameterList,
    ) -> Result<()> {
        self.num_lists += 1;
        let start = stream.position();
        stream.write_u32_le(crc32.value())?;
        let list_offset = Placeholder::write_u16(stream, start)?;
        stream.write_u16_le(list.lists().len() as u16)?;
        let obj_offset = Placeholder::write_u16(stream, start)?;
        stream.write_u16_le(list.objects().len() as u16)?;
        self.lists.push_back(ListWriteContext {
            list_offset,
            obj_offset,
            list,
        });
        Ok(())
    }

    fn emit_list_children(
        &mut self,
        stream: &mut Cursor<Vec<u8>>,
        ctx: ListWriteContext<'a>,
    ) -> Result<ListWriteContext<'a>> {
        ctx.list_offset.resolve_u16(stream, stream.position())?;
        for (child_crc32, child) in ctx.list.lists().iter() {
            self.emit_list(stream, *child_crc32, child)?;
        }
        Ok(ctx)
    }

    fn emit_object(
        &mut self,
        stream: &mut Cursor<Vec<u8>>,
        crc32: Crc32,
        obj: &'a ParameterObject,
    ) -> Result<()> {
        self.num_objects += 1;
        let start = stream.position();
        stream.write_u32_le(crc32.value())?;
        let param_offset = Placeholder::write_u16(stream, start)?;
        stream.write_u16_le(obj.params().len() as u16)?;
        self.objects.push_back(ObjWriteContext { param_offset, obj });
        Ok(())
    }

    fn emit_object_params(&mut self, stream: &mut Cursor<Vec<u8>>, ctx: ObjWriteContext<'a>) -> Result<()> {
        ctx.param_offset.resolve_u16(stream, stream.position())?;
        for (param_crc32, param) in ctx.obj.params().iter() {
            self.num_params += 1;
            let start = stream.position();
            stream.write_u32_le(param_crc32.value())?;
            let ph = Placeholder::write_u24(stream, start)?;
            stream.write_u8_le(param.type_tag())?;

            if param.is_string() {
                let bytes = string_bytes(param)?;
                self.strings.entry(bytes).or_default().push(ph);
            } else {
                let (bytes, ref_offset) = value_to_bytes(param)?;
                self.add_value(bytes, ref_offset, ph);
            }
        }
        Ok(())
    }

    /// Append a value's bytes to the data-section pool, reusing a prior
    /// entry via substring match when possible.
    fn add_value(&mut self, bytes: Vec<u8>, ref_offset: usize, ph: Placeholder) {
        for entry in &mut self.values {
            if let Some(pos) = find_subslice(&entry.bytes, &bytes) {
                entry.references.push((pos + ref_offset, ph));
                return;
            }
        }
        self.values.push(ValueEntry {
            bytes,
            references: vec![(ref_offset, ph)],
        });
    }
}

fn pad_to(stream: &mut Cursor<Vec<u8>>, align: usize) -> Result<()> {
    let target = align_up(stream.position() as usize, align);
    while (stream.position() as usize) < target {
        stream.write_u8_le(0)?;
    }
    Ok(())
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn string_bytes(param: &Parameter) -> Result<Vec<u8>> {
    let s: &str = match param {
        Parameter::String32(s) => s.as_str(),
        Parameter::String64(s) => s.as_str(),
        Parameter::String256(s) => s.as_str(),
        Parameter::StringRef(s) => s.as_str(),
        _ => return Err(AampError::UnsupportedValue(format!("{:?}", param))),
    };
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    Ok(bytes)
}

/// Encode a non-string parameter's payload and return `(bytes, data_offset)`
/// where `data_offset` is the byte offset within `bytes` the parameter's
/// 24-bit field should end up pointing to (nonzero only for buffers, whose
/// element count sits in the 4 bytes immediately before the data pointer).
fn value_to_bytes(param: &Parameter) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    match param {
        Parameter::Bool(b) => buf.write_u32_le(*b as u32).unwrap(),
        Parameter::F32(f) => buf.write_f32_le(*f).unwrap(),
        Parameter::Int(i) => buf.write_i32_le(*i).unwrap(),
        Parameter::Vec2(v) => {
            buf.write_f32_le(v.x).unwrap();
            buf.write_f32_le(v.y).unwrap();
        }
        Parameter::Vec3(v) => {
            buf.write_f32_le(v.x).unwrap();
            buf.write_f32_le(v.y).unwrap();
            buf.write_f32_le(v.z).unwrap();
        }
        Parameter::Vec4(v) => {
            buf.write_f32_le(v.x).unwrap();
            buf.write_f32_le(v.y).unwrap();
            buf.write_f32_le(v.z).unwrap();
            buf.write_f32_le(v.w).unwrap();
        }
        Parameter::Color(c) => {
            buf.write_f32_le(c.r).unwrap();
            buf.write_f32_le(c.g).unwrap();
            buf.write_f32_le(c.b).unwrap();
            buf.write_f32_le(c.a).unwrap();
        }
        Parameter::Quat(q) => {
            buf.write_f32_le(q.a).unwrap();
            buf.write_f32_le(q.b).unwrap();
            buf.write_f32_le(q.c).unwrap();
            buf.write_f32_le(q.d).unwrap();
        }
        Parameter::U32(u) => buf.write_u32_le(*u).unwrap(),
        Parameter::Curve1(c) | Parameter::Curve2(c) | Parameter::Curve3(c) | Parameter::Curve4(c) => {
            let expected = (param.type_tag() - 9 + 1) as usize;
            if c.segments().len() != expected {
                return Err(AampError::UnsupportedValue(format!(
                    "curve tag {} requires {} segments, got {}",
                    param.type_tag(),
                    expected,
                    c.segments().len()
                )));
            }
            for seg in c.segments() {
                buf.write_u32_le(seg.controls[0]).unwrap();
                buf.write_u32_le(seg.controls[1]).unwrap();
                for v in seg.values {
                    buf.write_f32_le(v).unwrap();
                }
            }
        }
        Parameter::BufferInt(b) => {
            buf.write_u32_le(b.0.len() as u32).unwrap();
            for v in &b.0 {
                buf.write_i32_le(*v).unwrap();
            }
            return Ok((buf, 4));
        }
        Parameter::BufferF32(b) => {
            buf.write_u32_le(b.0.len() as u32).unwrap();
            for v in &b.0 {
                buf.write_f32_le(*v).unwrap();
            }
            return Ok((buf, 4));
        }
        Parameter::BufferU32(b) => {
            buf.write_u32_le(b.0.len() as u32).unwrap();
            for v in &b.0 {
                buf.write_u32_le(*v).unwrap();
            }
            return Ok((buf, 4));
        }
        Parameter::BufferBinary(b) => {
            buf.write_u32_le(b.0.len() as u32).unwrap();
            buf.extend_from_slice(&b.0);
            return Ok((buf, 4));
        }
        Parameter::String32(_) | Parameter::String64(_) | Parameter::String256(_) | Parameter::StringRef(_) => {
            return Err(AampError::UnsupportedValue(
                "string parameters are written through the string pool".to_string(),
            ));
        }
    }
    Ok((buf, 0))
}
